use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::tokens::{alignment_utilities, font_size_utility};

/// Ordered, deduplicated list of utility tokens.
///
/// Tokens keep the position they were first seen at, so joining the same
/// inputs in the same order always yields the same class string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every whitespace-separated token in `tokens` not already present.
    pub fn push(&mut self, tokens: &str) {
        for token in tokens.split_whitespace() {
            if !self.contains(token) {
                self.0.push(token.to_string());
            }
        }
    }

    pub fn with(mut self, tokens: &str) -> Self {
        self.push(tokens);
        self
    }

    pub fn extend(&mut self, other: &ClassList) {
        for token in &other.0 {
            if !self.contains(token) {
                self.0.push(token.clone());
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl From<&str> for ClassList {
    fn from(tokens: &str) -> Self {
        ClassList::new().with(tokens)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ClassList::new();
        for tokens in iter {
            list.push(tokens.as_ref());
        }
        list
    }
}

// Block-system boilerplate the utility layer has no use for.
static DENIED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "has-background",
        "has-background-color",
        "has-text-color",
        "has-link-color",
        "has-border-color",
        "has-inline-color",
        "has-custom-font-size",
        "has-custom-content-position",
        "has-global-padding",
        "has-fixed-layout",
        "has-nested-images",
        "is-resized",
        "is-style-default",
        "is-light",
        "is-dark",
        "is-nowrap",
        "is-horizontal",
        "is-vertical",
        "is-image-fill",
        "alignnone",
        "size-full",
        "size-large",
        "size-medium",
        "size-thumbnail",
        "columns-default",
    ])
});

const DENIED_PREFIXES: &[&str] = &[
    "wp-block-",
    "wp-image-",
    "wp-element-",
    "wp-elements-",
    "wp-container-",
    "wp-lightbox-",
    "is-layout-",
    "is-content-justification-",
    "items-justified-",
    "has-background-dim",
    // empty slug, e.g. `has--color`
    "has--",
];

fn is_denied(token: &str) -> bool {
    DENIED.contains(token) || DENIED_PREFIXES.iter().any(|p| token.starts_with(p))
}

type Converter = fn(&str) -> Option<String>;

// First match wins, so the more specific `-background-color` and
// `-border-color` rules sit ahead of the generic `-color` rule.
const CONVERTERS: &[Converter] = &[
    convert_background_color,
    convert_border_color,
    convert_text_alignment,
    convert_font_size,
    convert_font_family,
    convert_text_color,
    convert_vertical_alignment,
    convert_content_position,
    convert_alignment,
    convert_media_position,
    convert_stacked_on_mobile,
    convert_background_flags,
];

/// Normalize a raw class attribute into utility tokens.
///
/// Drops editor boilerplate, deduplicates, and rewrites editor classes
/// (`has-*-color`, `has-text-align-*`, `align*`, ...) to utilities. Tokens no
/// rule recognises pass through unchanged. Running it on its own output is a
/// no-op.
pub fn normalize(class_list: &str) -> String {
    normalize_tokens(class_list).to_string()
}

pub fn normalize_tokens(class_list: &str) -> ClassList {
    let mut out = ClassList::new();
    for token in class_list.split_whitespace() {
        if is_denied(token) {
            continue;
        }
        match CONVERTERS.iter().find_map(|convert| convert(token)) {
            Some(replacement) => out.push(&replacement),
            None => out.push(token),
        }
    }
    out
}

fn has_affix<'a>(token: &'a str, suffix: &str) -> Option<&'a str> {
    token
        .strip_prefix("has-")
        .and_then(|rest| rest.strip_suffix(suffix))
        .filter(|slug| !slug.is_empty() && !slug.starts_with('-') && !slug.ends_with('-'))
}

fn convert_background_color(token: &str) -> Option<String> {
    has_affix(token, "-background-color").map(|c| format!("bg-{c}"))
}

fn convert_border_color(token: &str) -> Option<String> {
    has_affix(token, "-border-color").map(|c| format!("border-{c}"))
}

fn convert_text_alignment(token: &str) -> Option<String> {
    let align = token.strip_prefix("has-text-align-")?;
    match align {
        "left" | "right" | "center" | "justify" => Some(format!("text-{align}")),
        _ => None,
    }
}

fn convert_font_size(token: &str) -> Option<String> {
    has_affix(token, "-font-size").and_then(font_size_utility)
}

fn convert_font_family(token: &str) -> Option<String> {
    has_affix(token, "-font-family").map(|f| format!("font-{f}"))
}

fn convert_text_color(token: &str) -> Option<String> {
    has_affix(token, "-color").map(|c| format!("text-{c}"))
}

fn convert_vertical_alignment(token: &str) -> Option<String> {
    match token.strip_prefix("is-vertically-aligned-")? {
        "top" => Some("items-start".into()),
        "center" => Some("items-center".into()),
        "bottom" => Some("items-end".into()),
        _ => None,
    }
}

fn convert_content_position(token: &str) -> Option<String> {
    let position = token.strip_prefix("is-position-")?;
    let (vertical, horizontal) = position.split_once('-')?;
    let items = match vertical {
        "top" => "start",
        "bottom" => "end",
        _ => "center",
    };
    let justify = match horizontal {
        "left" => "start",
        "right" => "end",
        _ => "center",
    };
    Some(format!("flex items-{items} justify-{justify}"))
}

fn convert_alignment(token: &str) -> Option<String> {
    token
        .strip_prefix("align")
        .and_then(alignment_utilities)
        .map(str::to_string)
}

fn convert_media_position(token: &str) -> Option<String> {
    match token.strip_prefix("has-media-on-the-")? {
        "left" => Some("flex-row".into()),
        "right" => Some("flex-row-reverse".into()),
        _ => None,
    }
}

fn convert_stacked_on_mobile(token: &str) -> Option<String> {
    match token {
        "is-stacked-on-mobile" => Some("max-sm:flex-col".into()),
        "is-not-stacked-on-mobile" => Some(String::new()),
        _ => None,
    }
}

fn convert_background_flags(token: &str) -> Option<String> {
    match token {
        "has-parallax" => Some("bg-fixed".into()),
        "is-repeated" => Some("bg-repeat".into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn class_list_dedups_in_first_seen_order() {
        let mut list = ClassList::from("flex  gap-4 flex");
        list.push("items-center gap-4");
        assert_eq!(list.to_string(), "flex gap-4 items-center");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn converts_editor_classes() {
        assert_eq!(normalize("has-primary-background-color"), "bg-primary");
        assert_eq!(normalize("has-text-align-center"), "text-center");
        assert_eq!(normalize("has-x-large-font-size"), "text-xl");
        assert_eq!(normalize("has-huge-font-size"), "text-3xl");
        assert_eq!(normalize("has-white-color"), "text-white");
        assert_eq!(normalize("has-accent-border-color"), "border-accent");
        assert_eq!(normalize("has-serif-font-family"), "font-serif");
        assert_eq!(normalize("is-vertically-aligned-bottom"), "items-end");
        assert_eq!(normalize("alignleft"), "float-left mr-4 mb-4");
        assert_eq!(normalize("aligncenter"), "mx-auto");
        assert_eq!(normalize("alignfull"), "w-[100cqw] max-w-none");
        assert_eq!(normalize("has-media-on-the-right"), "flex-row-reverse");
        assert_eq!(normalize("is-position-top-left"), "flex items-start justify-start");
        assert_eq!(normalize("has-parallax is-repeated"), "bg-fixed bg-repeat");
    }

    #[test]
    fn drops_boilerplate_and_passes_unknown_through() {
        assert_eq!(
            normalize("wp-block-group has-background is-layout-flex wp-container-core-group-is-layout-1 my-card"),
            "my-card"
        );
        assert_eq!(normalize("is-style-rounded alignwide"), "is-style-rounded alignwide");
        assert_eq!(normalize("has-text-align-sideways"), "has-text-align-sideways");
    }

    #[test]
    fn unmapped_font_size_keyword_passes_through() {
        assert_eq!(normalize("has-banana-font-size"), "text-banana");
    }

    #[test]
    fn empty_and_blank_input_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
        assert_eq!(normalize("has--color"), "");
    }

    #[test]
    fn colour_flags_without_a_slug_are_dropped() {
        assert_eq!(normalize("has-background-color"), "");
        assert_eq!(normalize("has--background-color"), "");
        assert_eq!(normalize("has-text-color has-background-color keep"), "keep");
        assert_eq!(has_affix("has-a--color", "-color"), None);
        assert_eq!(normalize("has-a--color"), "has-a--color");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "wp-block-cover has-black-background-color has-background-dim-60 has-background-dim",
            "alignleft alignleft mr-4 has-small-font-size",
            "has-text-align-right has-vivid-red-color has-link-color custom",
            "is-stacked-on-mobile has-media-on-the-left is-vertically-aligned-center",
            "is-position-bottom-right has-parallax is-repeated alignfull",
            "has-banana-font-size has-text-align-sideways is-not-stacked-on-mobile",
            "has-background-color has--background-color has-primary-background-color",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {sample}");
        }
    }
}
