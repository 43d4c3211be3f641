//! Typed parsing of attribute values with the `attrs.pest` micro-grammars

use glam::{DVec2, dvec2};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::convert::curve::PathCommand;
use crate::element::Attributes;
use crate::errors::ConvertError;

#[derive(Parser)]
#[grammar = "attrs.pest"]
pub struct AttrParser;

/// One declaration of a style rule, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDeclaration {
    /// `key:value`, value trimmed.
    Pair(String, String),
    /// Text between separators that is not `key:value` at all.
    Malformed(String),
}

/// A style rule split into its selector and raw declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRule {
    pub name: String,
    pub declarations: Vec<RawDeclaration>,
}

fn error_offset(err: &pest::error::Error<Rule>) -> usize {
    match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    }
}

fn syntax_error(
    element: &'static str,
    attribute: &'static str,
    value: &str,
    err: pest::error::Error<Rule>,
    expected: &str,
) -> ConvertError {
    ConvertError::invalid_attribute(element, attribute, value, error_offset(&err), expected)
}

/// Parse the single child of a top-level rule (`SOI ~ ... ~ EOI`).
fn parse_top(rule: Rule, value: &str) -> Result<Pair<'_, Rule>, pest::error::Error<Rule>> {
    let mut pairs = AttrParser::parse(rule, value)?;
    // A successful parse of a top-level rule always yields exactly that rule.
    Ok(pairs.next().unwrap_or_else(|| unreachable!("pest returned no pair for {:?}", rule)))
}

fn number_of(pair: Pair<Rule>) -> f64 {
    // The `number` rule only matches strings `f64::from_str` accepts.
    pair.as_str().parse().unwrap_or(f64::NAN)
}

fn pair_of(pair: Pair<Rule>) -> DVec2 {
    let mut inner = pair.into_inner();
    let x = inner.next().map(number_of).unwrap_or(f64::NAN);
    let y = inner.next().map(number_of).unwrap_or(f64::NAN);
    dvec2(x, y)
}

fn numbers_in(pair: Pair<Rule>) -> impl Iterator<Item = f64> + '_ {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::number)
        .map(number_of)
}

/// Parse a plain numeric value such as `298.5` (an optional `px` suffix is accepted).
pub fn number(element: &'static str, attribute: &'static str, value: &str) -> Result<f64, ConvertError> {
    let top = parse_top(Rule::number_value, value)
        .map_err(|e| syntax_error(element, attribute, value, e, "a number"))?;
    numbers_in(top)
        .next()
        .ok_or_else(|| ConvertError::invalid_attribute(element, attribute, value, 0, "a number"))
}

/// Parse a numeric style value, `None` when it is not a number.
pub fn style_number(value: &str) -> Option<f64> {
    let top = parse_top(Rule::number_value, value).ok()?;
    numbers_in(top).next()
}

/// Look up and parse a required numeric attribute.
pub fn required_number(
    element: &'static str,
    attrs: &Attributes,
    attribute: &'static str,
) -> Result<f64, ConvertError> {
    let value = attrs
        .get(attribute)
        .ok_or(ConvertError::MissingAttribute { element, attribute })?;
    number(element, attribute, value)
}

/// Look up and parse an optional numeric attribute, `default` when absent.
pub fn number_or(
    element: &'static str,
    attrs: &Attributes,
    attribute: &'static str,
    default: f64,
) -> Result<f64, ConvertError> {
    attrs
        .get(attribute)
        .map_or(Ok(default), |value| number(element, attribute, value))
}

/// Parse `minX minY width height`.
pub fn view_box(value: &str) -> Result<[f64; 4], ConvertError> {
    let invalid = || ConvertError::InvalidViewBox {
        value: value.to_string(),
    };
    let top = parse_top(Rule::view_box, value).map_err(|_| invalid())?;
    let nums: Vec<f64> = numbers_in(top).collect();
    nums.try_into().map_err(|_| invalid())
}

/// Parse `matrix(a b c d e f)`.
pub fn matrix(element: &'static str, value: &str) -> Result<[f64; 6], ConvertError> {
    let top = parse_top(Rule::matrix, value)
        .map_err(|e| syntax_error(element, "transform", value, e, "matrix(a b c d e f)"))?;
    let nums: Vec<f64> = numbers_in(top).collect();
    nums.try_into().map_err(|_| {
        ConvertError::invalid_attribute(element, "transform", value, 0, "matrix(a b c d e f)")
    })
}

/// Parse a polygon `points` list of `x,y` pairs.
pub fn points(element: &'static str, value: &str) -> Result<Vec<DVec2>, ConvertError> {
    let top = parse_top(Rule::points, value)
        .map_err(|e| syntax_error(element, "points", value, e, "coordinate pairs"))?;
    Ok(top
        .into_inner()
        .filter(|p| p.as_rule() == Rule::pair)
        .map(pair_of)
        .collect())
}

/// Parse path data into commands, one per argument group.
///
/// Coordinates stay in source units; scaling is the approximator's job.
pub fn path_data(value: &str) -> Result<Vec<PathCommand>, ConvertError> {
    let top = parse_top(Rule::path_data, value).map_err(|e| {
        syntax_error("path", "d", value, e, "path commands M, L, l, H, h, V, v, C, c or z")
    })?;

    let mut commands = Vec::new();
    for segment in top.into_inner() {
        let rule = segment.as_rule();
        match rule {
            Rule::move_abs | Rule::line_abs | Rule::line_rel => {
                for (i, p) in segment.into_inner().map(pair_of).enumerate() {
                    commands.push(match rule {
                        // Extra pairs after a moveto are implicit linetos.
                        Rule::move_abs if i == 0 => PathCommand::MoveTo(p),
                        Rule::move_abs | Rule::line_abs => PathCommand::LineTo(p),
                        _ => PathCommand::LineBy(p),
                    });
                }
            }
            Rule::horiz_abs | Rule::horiz_rel | Rule::vert_abs | Rule::vert_rel => {
                for n in numbers_in(segment) {
                    commands.push(match rule {
                        Rule::horiz_abs => PathCommand::HorizontalTo(n),
                        Rule::horiz_rel => PathCommand::HorizontalBy(n),
                        Rule::vert_abs => PathCommand::VerticalTo(n),
                        _ => PathCommand::VerticalBy(n),
                    });
                }
            }
            Rule::cubic_abs | Rule::cubic_rel => {
                for triple in segment.into_inner() {
                    let mut pts = triple.into_inner().map(pair_of);
                    let ctrl = [
                        pts.next().unwrap_or(DVec2::NAN),
                        pts.next().unwrap_or(DVec2::NAN),
                        pts.next().unwrap_or(DVec2::NAN),
                    ];
                    commands.push(if rule == Rule::cubic_abs {
                        PathCommand::CubicTo(ctrl)
                    } else {
                        PathCommand::CubicBy(ctrl)
                    });
                }
            }
            Rule::close => commands.push(PathCommand::Close),
            _ => {}
        }
    }
    Ok(commands)
}

/// Split a style rule into its class name and declarations.
///
/// Declaration values are kept verbatim (trimmed); the style table decides
/// which keys it understands. Only text that is not `.name{...}` is an error;
/// an unreadable declaration inside the braces comes back as
/// [`RawDeclaration::Malformed`].
pub fn style_rule(rule: &str) -> Result<RawRule, ConvertError> {
    let top = parse_top(Rule::style_rule, rule)
        .map_err(|e| syntax_error("style", "rule", rule, e, ".name{key:value;...}"))?;

    let mut name = String::new();
    let mut declarations = Vec::new();
    for inner in top.into_inner() {
        match inner.as_rule() {
            Rule::class_name => name = inner.as_str().to_string(),
            Rule::declaration => {
                let mut parts = inner.into_inner();
                let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                let value = parts.next().map(|p| p.as_str().trim().to_string()).unwrap_or_default();
                declarations.push(RawDeclaration::Pair(key, value));
            }
            Rule::bad_declaration => {
                declarations.push(RawDeclaration::Malformed(inner.as_str().trim().to_string()));
            }
            _ => {}
        }
    }
    Ok(RawRule { name, declarations })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_numbers() {
        assert_eq!(number("rect", "x", "298.5").unwrap(), 298.5);
        assert_eq!(number("rect", "x", " -12 ").unwrap(), -12.0);
        assert_eq!(number("rect", "x", ".5").unwrap(), 0.5);
        assert_eq!(number("rect", "x", "1e2").unwrap(), 100.0);
        assert_eq!(number("rect", "x", "40px").unwrap(), 40.0);
    }

    #[test]
    fn parse_number_rejects_trailing_garbage() {
        let err = number("rect", "width", "12x").unwrap_err();
        match err {
            ConvertError::InvalidAttribute { element, attribute, span, .. } => {
                assert_eq!(element, "rect");
                assert_eq!(attribute, "width");
                assert_eq!(span.offset(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn required_number_reports_missing_attribute() {
        let attrs = Attributes::new().with("x", "1");
        assert!(matches!(
            required_number("rect", &attrs, "y"),
            Err(ConvertError::MissingAttribute { element: "rect", attribute: "y" })
        ));
    }

    #[test]
    fn optional_number_defaults_when_absent() {
        let attrs = Attributes::new().with("x", "4.5");
        assert_eq!(number_or("rect", &attrs, "x", 0.0).unwrap(), 4.5);
        assert_eq!(number_or("rect", &attrs, "y", 0.0).unwrap(), 0.0);
        let bad = Attributes::new().with("x", "left");
        assert!(number_or("rect", &bad, "x", 0.0).is_err());
    }

    #[test]
    fn parse_view_box() {
        assert_eq!(view_box("0 0 595.3 841.9").unwrap(), [0.0, 0.0, 595.3, 841.9]);
        assert_eq!(view_box("0,0,200,100").unwrap(), [0.0, 0.0, 200.0, 100.0]);
        assert!(matches!(view_box("0 0 200"), Err(ConvertError::InvalidViewBox { .. })));
    }

    #[test]
    fn parse_matrix() {
        let m = matrix("rect", "matrix(0.7071 -0.7071 0.7071 0.7071 -114.3 254.5)").unwrap();
        assert_eq!(m, [0.7071, -0.7071, 0.7071, 0.7071, -114.3, 254.5]);
        assert!(matrix("rect", "rotate(45)").is_err());
        assert!(matrix("rect", "matrix(1 0 0 1)").is_err());
    }

    #[test]
    fn parse_points_pairs() {
        let pts = points("polygon", "10,20 30,40 50,60 ").unwrap();
        assert_eq!(pts, vec![dvec2(10.0, 20.0), dvec2(30.0, 40.0), dvec2(50.0, 60.0)]);
        assert!(points("polygon", "10,20 30").is_err());
    }

    #[test]
    fn parse_path_commands() {
        let cmds = path_data("M298.5,421H300v-2.5h4V10c1,2,3,4,5,6C7,8,9,10,11,12z").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(dvec2(298.5, 421.0)),
                PathCommand::HorizontalTo(300.0),
                PathCommand::VerticalBy(-2.5),
                PathCommand::HorizontalBy(4.0),
                PathCommand::VerticalTo(10.0),
                PathCommand::CubicBy([dvec2(1.0, 2.0), dvec2(3.0, 4.0), dvec2(5.0, 6.0)]),
                PathCommand::CubicTo([dvec2(7.0, 8.0), dvec2(9.0, 10.0), dvec2(11.0, 12.0)]),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn parse_path_packed_negative_numbers() {
        let cmds = path_data("M0,0c-1.5-2.5-3.5.5-4-6").unwrap();
        assert_eq!(
            cmds[1],
            PathCommand::CubicBy([dvec2(-1.5, -2.5), dvec2(-3.5, 0.5), dvec2(-4.0, -6.0)])
        );
    }

    #[test]
    fn parse_path_repeated_groups() {
        let cmds = path_data("M0 0 10 10 c1 1 2 2 3 3 4 4 5 5 6 6").unwrap();
        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[1], PathCommand::LineTo(dvec2(10.0, 10.0)));
        assert!(matches!(cmds[2], PathCommand::CubicBy(_)));
        assert!(matches!(cmds[3], PathCommand::CubicBy(_)));
    }

    #[test]
    fn parse_path_rejects_unsupported_command() {
        let err = path_data("M0,0s1,2,3,4").unwrap_err();
        match err {
            ConvertError::InvalidAttribute { span, .. } => assert_eq!(span.offset(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn pair(key: &str, value: &str) -> RawDeclaration {
        RawDeclaration::Pair(key.to_string(), value.to_string())
    }

    #[test]
    fn parse_style_rule_declarations() {
        let rule = style_rule(".st0{fill:#FFFFFF;stroke:#39B54A;stroke-width:2;stroke-miterlimit:10;}").unwrap();
        assert_eq!(rule.name, "st0");
        assert_eq!(
            rule.declarations,
            vec![
                pair("fill", "#FFFFFF"),
                pair("stroke", "#39B54A"),
                pair("stroke-width", "2"),
                pair("stroke-miterlimit", "10"),
            ]
        );
    }

    #[test]
    fn parse_style_rule_without_final_semicolon() {
        let rule = style_rule(".st12{ fill : none ; opacity:0.5 }").unwrap();
        assert_eq!(rule.name, "st12");
        assert_eq!(
            rule.declarations,
            vec![pair("fill", "none"), pair("opacity", "0.5")]
        );
    }

    #[test]
    fn parse_style_rule_keeps_unreadable_declarations() {
        let rule = style_rule(".st0{fill:#FFFFFF;stroke-width 2;;opacity:1}").unwrap();
        assert_eq!(rule.name, "st0");
        assert_eq!(
            rule.declarations,
            vec![
                pair("fill", "#FFFFFF"),
                RawDeclaration::Malformed("stroke-width 2".to_string()),
                pair("opacity", "1"),
            ]
        );
    }

    #[test]
    fn parse_style_rule_rejects_missing_selector() {
        assert!(matches!(
            style_rule("st0{fill:none}"),
            Err(ConvertError::InvalidAttribute { .. })
        ));
        assert!(style_rule(".st0{fill:none").is_err());
    }

    #[test]
    fn style_number_is_lenient() {
        assert_eq!(style_number("2"), Some(2.0));
        assert_eq!(style_number("0.75"), Some(0.75));
        assert_eq!(style_number("abc"), None);
        assert_eq!(style_number(""), None);
    }
}
