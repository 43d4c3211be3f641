//! Conversion session - tracks state during one document's conversion

use crate::element::{Attributes, Element, ShapeKind};
use crate::errors::{ConvertError, Warning};
use crate::log::{debug, warn};
use crate::parse;
use crate::style::{StyleClass, StyleTable};

use super::Conversion;
use super::coords::CoordinateTransformer;
use super::defaults::{DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use super::output::OutputGeometry;
use super::shapes::{ShapeRecord, ToGeometry};

/// Conversion session
///
/// Owned by a single [`convert`](super::convert) call and fed the elements in
/// document order.
#[derive(Debug, Default)]
pub struct ConversionSession {
    /// Style classes seen so far
    pub styles: StyleTable,
    /// Centering offsets, fixed by the first header
    pub coords: Option<CoordinateTransformer>,
    /// Converted shapes in document order
    pub outputs: Vec<OutputGeometry>,
    /// Non-fatal recoveries in document order
    pub warnings: Vec<Warning>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one element.
    pub fn process(&mut self, element: Element) -> Result<(), ConvertError> {
        match element {
            Element::Header(attrs) => self.header(&attrs),
            Element::StyleRule(rule) => self.style_rule(&rule),
            Element::Text(text) => {
                self.text(&text);
                Ok(())
            }
            Element::Shape(kind, attrs) => self.shape(kind, &attrs),
        }
    }

    fn warn(&mut self, warning: Warning) {
        warn!(%warning, "conversion warning");
        self.warnings.push(warning);
    }

    fn header(&mut self, attrs: &Attributes) -> Result<(), ConvertError> {
        if self.coords.is_some() {
            let view_box = attrs.get("viewBox").unwrap_or_default().to_string();
            self.warn(Warning::DuplicateHeader { view_box });
            return Ok(());
        }

        let value = attrs.get("viewBox").ok_or(ConvertError::MissingAttribute {
            element: "svg",
            attribute: "viewBox",
        })?;
        let [_, _, width, height] = parse::view_box(value)?;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConvertError::InvalidViewBox {
                value: value.to_string(),
            });
        }

        let coords = CoordinateTransformer::from_view_box(width, height);
        debug!(width, height, center = ?coords.center(), "document header");
        self.coords = Some(coords);
        Ok(())
    }

    fn style_rule(&mut self, rule: &str) -> Result<(), ConvertError> {
        let class = StyleClass::parse(rule, &mut self.warnings)?;
        self.styles.insert(class);
        Ok(())
    }

    /// Capture `Title:` / `Description:` markers from text content.
    fn text(&mut self, text: &str) {
        if let Some((_, title)) = text.split_once("Title:") {
            self.title = Some(title.trim().to_string());
        }
        if let Some((_, description)) = text.split_once("Description:") {
            self.description = Some(description.trim().to_string());
        }
    }

    fn shape(&mut self, kind: ShapeKind, attrs: &Attributes) -> Result<(), ConvertError> {
        let coords = self
            .coords
            .ok_or(ConvertError::MissingHeader { element: kind.tag() })?;
        let record = ShapeRecord::parse(kind, attrs)?;

        let class = match record.class() {
            Some(name) => {
                let resolved = self.styles.resolve(name);
                if resolved.is_none() {
                    let warning = Warning::UnresolvedClassReference {
                        class: name.to_string(),
                    };
                    warn!(%warning, "conversion warning");
                    self.warnings.push(warning);
                }
                resolved
            }
            None => None,
        };

        let output = record.to_geometry(&coords, class)?;
        debug!(shape = kind.tag(), element = output.element_name(), "converted shape");
        self.outputs.push(output);
        Ok(())
    }

    /// Finish the pass, filling in the default title and description.
    pub fn finish(self) -> Conversion {
        Conversion {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            center: self.coords.map(|c| c.center()),
            geometry: self.outputs,
            warnings: self.warnings,
        }
    }
}
