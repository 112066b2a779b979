//! Attribute-to-class compiler.
//!
//! Every handler reads the same attribute object and returns its own
//! tokens; the compiled class list is their union in handler order.

use serde_json::Value;

use super::classes::ClassList;
use super::tokens::{
    alignment_utilities, arbitrary_value, convert_colour, flex_direction, font_size_utility,
    font_weight_utility, is_non_zero,
};
use super::types::value_at;

type Handler = fn(&Value) -> ClassList;

const HANDLERS: &[Handler] = &[
    alignment,
    text_alignment,
    directional_spacing,
    gap,
    container,
    layout,
    grid_child,
    colours,
    font_size,
    font_family,
    typography,
    vertical_alignment,
    content_position,
];

/// Compile block attributes into a class string. Non-object input yields `""`.
pub fn compile(attrs: &Value) -> String {
    compile_tokens(attrs).to_string()
}

pub fn compile_tokens(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    if !attrs.is_object() {
        return out;
    }
    for handler in HANDLERS {
        out.extend(&handler(attrs));
    }
    out
}

fn str_at<'a>(attrs: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(attrs, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn alignment(attrs: &Value) -> ClassList {
    match str_at(attrs, &["align"]) {
        Some(align @ ("left" | "right" | "center")) => {
            alignment_utilities(align).map(ClassList::from).unwrap_or_default()
        }
        _ => ClassList::new(),
    }
}

fn text_alignment(attrs: &Value) -> ClassList {
    match str_at(attrs, &["textAlign"]) {
        Some(align @ ("left" | "right" | "center" | "justify")) => {
            ClassList::from(format!("text-{align}").as_str())
        }
        _ => ClassList::new(),
    }
}

/// Flat `marginTop` style keys first, then `style.spacing.margin.top`.
fn spacing_value<'a>(attrs: &'a Value, kind: &str, side: &str) -> Option<&'a Value> {
    let mut flat = String::from(kind);
    let mut chars = side.chars();
    if let Some(first) = chars.next() {
        flat.push(first.to_ascii_uppercase());
        flat.push_str(chars.as_str());
    }
    value_at(attrs, &[flat.as_str()]).or_else(|| value_at(attrs, &["style", "spacing", kind, side]))
}

fn spacing_token(value: Option<&Value>) -> Option<String> {
    if !is_non_zero(value) {
        return None;
    }
    value.and_then(arbitrary_value)
}

fn push_axis(
    out: &mut ClassList,
    prefix: &str,
    axis: char,
    (start_side, start): (char, Option<String>),
    (end_side, end): (char, Option<String>),
) {
    match (start, end) {
        (Some(a), Some(b)) if a == b => out.push(&format!("{prefix}{axis}-[{a}]")),
        (a, b) => {
            if let Some(a) = a {
                out.push(&format!("{prefix}{start_side}-[{a}]"));
            }
            if let Some(b) = b {
                out.push(&format!("{prefix}{end_side}-[{b}]"));
            }
        }
    }
}

fn directional_spacing(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    for (kind, prefix) in [("margin", "m"), ("padding", "p")] {
        let side = |name: &str| spacing_token(spacing_value(attrs, kind, name));
        push_axis(&mut out, prefix, 'y', ('t', side("top")), ('b', side("bottom")));
        push_axis(&mut out, prefix, 'x', ('l', side("left")), ('r', side("right")));
    }
    out
}

fn gap(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    for (key, prefix) in [("gapHorizontal", "gap-x"), ("gapVertical", "gap-y")] {
        if let Some(v) = spacing_token(value_at(attrs, &[key])) {
            out.push(&format!("{prefix}-[{v}]"));
        }
    }
    out
}

fn container(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    match str_at(attrs, &["containerType"]) {
        Some("none") => out.push("max-w-none"),
        Some("full") => out.push("w-full"),
        Some("flex") => out.push("flex-grow h-full"),
        Some("boxed") => {
            if let Some(width) = value_at(attrs, &["containerWidth"]).and_then(arbitrary_value) {
                out.push(&format!("w-[{width}]"));
                let centered = value_at(attrs, &["containerCentered"])
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                if centered {
                    out.push("mx-auto");
                }
            }
        }
        _ => {}
    }
    if let Some(height) = spacing_token(value_at(attrs, &["containerHeight"])) {
        out.push(&format!("h-[{height}]"));
    }
    out
}

fn layout(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    let Some(layout) = value_at(attrs, &["layout"]).filter(|v| v.is_object()) else {
        return out;
    };

    match str_at(layout, &["type"]) {
        Some(kind @ ("flex" | "constrained")) => {
            out.push("flex");

            let default_orientation = if kind == "constrained" { "vertical" } else { "horizontal" };
            let vertical =
                str_at(layout, &["orientation"]).unwrap_or(default_orientation) == "vertical";
            out.push(if vertical { "flex-col" } else { "flex-row" });

            let wrap = match value_at(layout, &["flexWrap"]) {
                Some(Value::String(s)) => Some(s != "nowrap"),
                _ => value_at(layout, &["wrap"]).and_then(Value::as_bool),
            };
            match wrap {
                Some(true) => out.push("flex-wrap"),
                Some(false) => out.push("flex-nowrap"),
                None if kind == "flex" => out.push("flex-wrap"),
                None => {}
            }

            let justify = str_at(layout, &["justifyContent"]).and_then(flex_direction);
            let align = str_at(layout, &["verticalAlignment"]).and_then(flex_direction);
            // Vertical stacks swap the axes: justifyContent positions items
            // across the column, verticalAlignment along it.
            let (main, cross) = if vertical { (align, justify) } else { (justify, align) };
            if let Some(main) = main {
                out.push(&format!("justify-{main}"));
            }
            if let Some(cross) = cross.filter(|c| *c != "between") {
                out.push(&format!("items-{cross}"));
            }

            out.extend(&block_gap(attrs, layout));
        }
        Some("grid") => {
            out.push("grid");
            let count = value_at(layout, &["columnCount"]).and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            });
            match count.filter(|n| *n > 0) {
                Some(n) => out.push(&format!("grid-cols-{n}")),
                None => match value_at(layout, &["minimumColumnWidth"]).and_then(arbitrary_value)
                {
                    Some(width) => out.push(&format!(
                        "grid-cols-[repeat(auto-fill,minmax(min({width},100%),1fr))]"
                    )),
                    None => out.push("grid-cols-1"),
                },
            }
            out.extend(&block_gap(attrs, layout));
        }
        _ => {}
    }
    out
}

fn block_gap(attrs: &Value, layout: &Value) -> ClassList {
    let mut out = ClassList::new();
    match value_at(attrs, &["style", "spacing", "blockGap"]) {
        Some(Value::Object(sides)) => {
            if let Some(v) = spacing_token(sides.get("top")) {
                out.push(&format!("gap-y-[{v}]"));
            }
            if let Some(v) = spacing_token(sides.get("left")) {
                out.push(&format!("gap-x-[{v}]"));
            }
        }
        Some(gap) => {
            if let Some(v) = spacing_token(Some(gap)) {
                out.push(&format!("gap-[{v}]"));
            }
        }
        None => {
            if let Some(v) = spacing_token(value_at(layout, &["gap"])) {
                out.push(&format!("gap-[{v}]"));
            }
        }
    }
    out
}

fn grid_child(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    for (key, prefix) in [("columnSpan", "col-span"), ("rowSpan", "row-span")] {
        let span = value_at(attrs, &["style", "layout", key]).and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        if let Some(span) = span.filter(|n| *n > 0) {
            out.push(&format!("{prefix}-{span}"));
        }
    }
    match str_at(attrs, &["style", "layout", "selfStretch"]) {
        Some("fill") => out.push("flex-1"),
        Some("fixed") => {
            if let Some(size) = value_at(attrs, &["style", "layout", "flexSize"]).and_then(arbitrary_value)
            {
                out.push(&format!("basis-[{size}]"));
            }
        }
        _ => {}
    }
    out
}

fn colours(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    let mut push = |prefix: &str, colour: Option<&str>| {
        if let Some(colour) = colour.and_then(convert_colour) {
            out.push(&format!("{prefix}{colour}"));
        }
    };

    push("text-", str_at(attrs, &["textColor"]));
    push("bg-", str_at(attrs, &["backgroundColor"]));
    push("border-", str_at(attrs, &["borderColor"]));
    push("text-", str_at(attrs, &["style", "color", "text"]));
    push("bg-", str_at(attrs, &["style", "color", "background"]));
    push(
        "[&_a]:text-",
        str_at(attrs, &["style", "elements", "link", "color", "text"]),
    );

    let headings = "[&_:is(h1,h2,h3,h4,h5,h6)]:";
    push(
        &format!("{headings}text-"),
        str_at(attrs, &["style", "elements", "heading", "color", "text"]),
    );
    push(
        &format!("{headings}bg-"),
        str_at(attrs, &["style", "elements", "heading", "color", "background"]),
    );
    out
}

fn font_size(attrs: &Value) -> ClassList {
    str_at(attrs, &["fontSize"])
        .and_then(font_size_utility)
        .map(|token| ClassList::from(token.as_str()))
        .unwrap_or_default()
}

fn font_family(attrs: &Value) -> ClassList {
    str_at(attrs, &["fontFamily"])
        .map(|family| ClassList::from(format!("font-{family}").as_str()))
        .unwrap_or_default()
}

fn typography(attrs: &Value) -> ClassList {
    let mut out = ClassList::new();
    let Some(typography) = value_at(attrs, &["style", "typography"]) else {
        return out;
    };

    match value_at(typography, &["fontStyle"]) {
        Some(Value::Bool(true)) => out.push("italic"),
        Some(Value::Bool(false)) => out.push("not-italic"),
        Some(Value::String(s)) if s == "italic" => out.push("italic"),
        Some(Value::String(s)) if s == "normal" => out.push("not-italic"),
        _ => {}
    }

    if let Some(weight) = value_at(typography, &["fontWeight"]).and_then(font_weight_utility) {
        out.push(&weight);
    }

    if let Some(size) = str_at(typography, &["fontSize"]) {
        match size.strip_prefix("var:preset|font-size|") {
            Some(keyword) => {
                if let Some(token) = font_size_utility(keyword) {
                    out.push(&token);
                }
            }
            None => {
                if let Some(v) = arbitrary_value(&Value::String(size.to_string())) {
                    out.push(&format!("text-[{v}]"));
                }
            }
        }
    }

    for (key, prefix) in [("letterSpacing", "tracking"), ("lineHeight", "leading")] {
        if let Some(v) = value_at(typography, &[key]).and_then(arbitrary_value) {
            out.push(&format!("{prefix}-[{v}]"));
        }
    }

    match str_at(typography, &["textTransform"]) {
        Some(t @ ("uppercase" | "lowercase" | "capitalize")) => out.push(t),
        _ => {}
    }
    out
}

fn vertical_alignment(attrs: &Value) -> ClassList {
    let token = match str_at(attrs, &["verticalAlignment"]) {
        Some("top") => "items-start",
        Some("middle" | "center") => "items-center",
        Some("bottom") => "items-end",
        _ => return ClassList::new(),
    };
    ClassList::from(token)
}

fn content_position(attrs: &Value) -> ClassList {
    str_at(attrs, &["contentPosition"])
        .map(|position| ClassList::from(content_position_utilities(position).as_str()))
        .unwrap_or_default()
}

/// `"center left"` -> `flex items-center justify-start`. Missing halves centre.
pub fn content_position_utilities(position: &str) -> String {
    let mut parts = position.split_whitespace();
    let vertical = parts.next().and_then(flex_direction).unwrap_or("center");
    let horizontal = parts.next().and_then(flex_direction).unwrap_or("center");
    format!("flex items-{vertical} justify-{horizontal}")
}
