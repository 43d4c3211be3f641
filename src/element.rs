//! Input records handed over by the tag extractor.
//!
//! The extractor splits the source markup into one record per tag and keeps
//! attribute values as untyped strings. Typing happens later, in
//! [`crate::parse`], so that attribute errors can point into the value.

/// Attributes of one source tag, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute. A repeated name keeps the first value on lookup.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

/// The six shape tags the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Path,
    Polygon,
}

impl ShapeKind {
    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Path => "path",
            ShapeKind::Polygon => "polygon",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "rect" => ShapeKind::Rect,
            "circle" => ShapeKind::Circle,
            "ellipse" => ShapeKind::Ellipse,
            "line" => ShapeKind::Line,
            "path" => ShapeKind::Path,
            "polygon" => ShapeKind::Polygon,
            _ => return None,
        })
    }
}

/// One record from the tag extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// The `<svg>` root tag. Only `viewBox` is consumed.
    Header(Attributes),
    /// One style rule, e.g. `.st0{fill:#FFFFFF;stroke:#39B54A;}`
    StyleRule(String),
    /// Character content of a `<text>` element (title/description markers).
    Text(String),
    /// A drawable shape tag.
    Shape(ShapeKind, Attributes),
}

impl Element {
    /// Build an element from a tag name, returning `None` for tags the
    /// converter ignores (`g`, `defs`, `metadata`, ...).
    pub fn from_tag(tag: &str, attrs: Attributes) -> Option<Self> {
        match tag {
            "svg" => Some(Element::Header(attrs)),
            _ => ShapeKind::from_tag(tag).map(|kind| Element::Shape(kind, attrs)),
        }
    }

    pub fn header(view_box: &str) -> Self {
        Element::Header(Attributes::new().with("viewBox", view_box))
    }

    pub fn style_rule(rule: impl Into<String>) -> Self {
        Element::StyleRule(rule.into())
    }

    pub fn shape<N, V>(kind: ShapeKind, attrs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Element::Shape(kind, attrs.into_iter().collect())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Header(_) => "svg",
            Element::StyleRule(_) => "style",
            Element::Text(_) => "text",
            Element::Shape(kind, _) => kind.tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup_keeps_first_value() {
        let attrs = Attributes::new().with("x", "1").with("x", "2").with("y", "3");
        assert_eq!(attrs.get("x"), Some("1"));
        assert_eq!(attrs.get("y"), Some("3"));
        assert_eq!(attrs.get("z"), None);
    }

    #[test]
    fn from_tag_dispatches_known_tags() {
        assert!(matches!(
            Element::from_tag("svg", Attributes::new()),
            Some(Element::Header(_))
        ));
        assert!(matches!(
            Element::from_tag("polygon", Attributes::new()),
            Some(Element::Shape(ShapeKind::Polygon, _))
        ));
        assert_eq!(Element::from_tag("g", Attributes::new()), None);
    }

    #[test]
    fn shape_kind_tags_round_trip() {
        for kind in [
            ShapeKind::Rect,
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Line,
            ShapeKind::Path,
            ShapeKind::Polygon,
        ] {
            assert_eq!(ShapeKind::from_tag(kind.tag()), Some(kind));
        }
    }
}
