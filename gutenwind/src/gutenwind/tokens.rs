//! Value tables shared by the class normalizer and the attribute compiler.
//!
//! Both sides of the pipeline map editor vocabulary (preset slugs, design
//! tokens, raw CSS values) onto utility tokens. Keeping the tables here means
//! a `has-x-large-font-size` class and a `fontSize: "x-large"` attribute can
//! never disagree about the token they produce.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

static FONT_SIZES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("small", "sm"),
        ("medium", "base"),
        ("large", "lg"),
        ("x-large", "xl"),
        ("xx-large", "2xl"),
        ("huge", "3xl"),
    ])
});

static FONT_WEIGHTS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (100, "thin"),
        (200, "extralight"),
        (300, "light"),
        (400, "normal"),
        (500, "medium"),
        (600, "semibold"),
        (700, "bold"),
        (800, "extrabold"),
        (900, "black"),
    ])
});

/// `text-{size}` for an editor font-size keyword. Unmapped keywords pass through.
pub fn font_size_utility(keyword: &str) -> Option<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    let size = FONT_SIZES.get(keyword).copied().unwrap_or(keyword);
    Some(format!("text-{size}"))
}

/// `font-{name}` for a numeric weight such as `700` or `"600"`.
pub fn font_weight_utility(weight: &Value) -> Option<String> {
    let numeric = match weight {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    }?;
    FONT_WEIGHTS
        .get(&numeric)
        .map(|name| format!("font-{name}"))
}

/// Flex direction keyword used by layout and content-position handlers.
pub fn flex_direction(keyword: &str) -> Option<&'static str> {
    match keyword {
        "left" | "start" | "top" => Some("start"),
        "right" | "end" | "bottom" => Some("end"),
        "center" | "middle" => Some("center"),
        "justify" | "space-between" => Some("between"),
        "stretch" => Some("stretch"),
        _ => None,
    }
}

/// Float/margin utilities for block alignment (`alignleft`, `align: "left"`).
pub fn alignment_utilities(align: &str) -> Option<&'static str> {
    match align {
        "left" => Some("float-left mr-4 mb-4"),
        "right" => Some("float-right ml-4 mb-4"),
        "center" => Some("mx-auto"),
        "full" => Some("w-[100cqw] max-w-none"),
        _ => None,
    }
}

/// Reduce any of the editor's colour shapes to a utility colour suffix.
///
/// * `has-primary-color` / `has-primary-background-color` -> `primary`
/// * `var:preset|color|primary` -> `primary`
/// * `var(--wp--preset--color--primary)` -> `primary`
/// * `#ff0000` / `rgb(0, 0, 0)` -> `[#ff0000]` / `[rgb(0,0,0)]`
///
/// Anything else is treated as a palette slug and returned trimmed.
pub fn convert_colour(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(rest) = input.strip_prefix("has-") {
        let slug = rest
            .strip_suffix("-background-color")
            .or_else(|| rest.strip_suffix("-color"))
            .unwrap_or(rest);
        return non_empty(slug);
    }

    if let Some(slug) = input.strip_prefix("var:preset|color|") {
        return non_empty(slug);
    }

    if let Some(slug) = input
        .strip_prefix("var(--wp--preset--color--")
        .and_then(|s| s.strip_suffix(')'))
    {
        return non_empty(slug);
    }

    let lower = input.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("rgb") || lower.starts_with("hsl") {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        return Some(format!("[{compact}]"));
    }

    non_empty(input)
}

/// String form of an attribute value as it appears inside `[...]`.
///
/// Numbers keep their JSON spelling, design tokens such as
/// `var:preset|spacing|40` become `var(--wp--preset--spacing--40)`, and
/// whitespace turns into `_` so the token stays a single class name.
pub fn arbitrary_value(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    let resolved = match raw.strip_prefix("var:") {
        Some(token) => format!("var(--wp--{})", token.replace('|', "--")),
        None => raw,
    };

    Some(resolved.split_whitespace().collect::<Vec<_>>().join("_"))
}

/// [`arbitrary_value`] with bare numbers read as pixel lengths.
pub fn css_length(value: &Value) -> Option<String> {
    let resolved = arbitrary_value(value)?;
    if resolved.chars().all(|c| c.is_ascii_digit() || c == '.') {
        Some(format!("{resolved}px"))
    } else {
        Some(resolved)
    }
}

/// Spacing values that should produce a utility: present, not null, not `"0"`.
pub fn is_non_zero(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => {
            let s = s.trim();
            !s.is_empty() && s != "0"
        }
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(_) => false,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn font_size_keywords_map_through_table() {
        assert_eq!(font_size_utility("x-large").as_deref(), Some("text-xl"));
        assert_eq!(font_size_utility("medium").as_deref(), Some("text-base"));
        assert_eq!(font_size_utility("banana").as_deref(), Some("text-banana"));
        assert_eq!(font_size_utility("  "), None);
    }

    #[test]
    fn font_weights_accept_numbers_and_strings() {
        assert_eq!(font_weight_utility(&json!(700)).as_deref(), Some("font-bold"));
        assert_eq!(font_weight_utility(&json!("300")).as_deref(), Some("font-light"));
        assert_eq!(font_weight_utility(&json!(450)), None);
        assert_eq!(font_weight_utility(&json!(true)), None);
    }

    #[test]
    fn colours_normalise_all_three_shapes() {
        assert_eq!(convert_colour("has-primary-color").as_deref(), Some("primary"));
        assert_eq!(
            convert_colour("has-pale-pink-background-color").as_deref(),
            Some("pale-pink")
        );
        assert_eq!(convert_colour("var:preset|color|accent").as_deref(), Some("accent"));
        assert_eq!(
            convert_colour("var(--wp--preset--color--contrast)").as_deref(),
            Some("contrast")
        );
        assert_eq!(convert_colour("#FF0000").as_deref(), Some("[#FF0000]"));
        assert_eq!(convert_colour("rgb(0, 0, 0)").as_deref(), Some("[rgb(0,0,0)]"));
        assert_eq!(convert_colour(""), None);
    }

    #[test]
    fn arbitrary_values_resolve_tokens() {
        assert_eq!(arbitrary_value(&json!("16px")).as_deref(), Some("16px"));
        assert_eq!(
            arbitrary_value(&json!("var:preset|spacing|40")).as_deref(),
            Some("var(--wp--preset--spacing--40)")
        );
        assert_eq!(
            arbitrary_value(&json!("calc(1rem + 2px)")).as_deref(),
            Some("calc(1rem_+_2px)")
        );
        assert_eq!(arbitrary_value(&json!(12)).as_deref(), Some("12"));
        assert_eq!(arbitrary_value(&json!(null)), None);
    }

    #[test]
    fn lengths_default_to_pixels() {
        assert_eq!(css_length(&json!(300)).as_deref(), Some("300px"));
        assert_eq!(css_length(&json!("48")).as_deref(), Some("48px"));
        assert_eq!(css_length(&json!("50%")).as_deref(), Some("50%"));
        assert_eq!(
            css_length(&json!("var:preset|spacing|50")).as_deref(),
            Some("var(--wp--preset--spacing--50)")
        );
        assert_eq!(css_length(&json!("")), None);
    }

    #[test]
    fn zero_and_missing_spacing_is_suppressed() {
        assert!(!is_non_zero(None));
        assert!(!is_non_zero(Some(&json!(null))));
        assert!(!is_non_zero(Some(&json!(0))));
        assert!(!is_non_zero(Some(&json!("0"))));
        assert!(is_non_zero(Some(&json!("0.5rem"))));
        assert!(is_non_zero(Some(&json!(4))));
    }
}
