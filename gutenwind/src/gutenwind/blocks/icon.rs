use once_cell::sync::Lazy;
use regex::Regex;

use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::remove_attributes;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::tokens::{convert_colour, css_length};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

static SVG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<svg[\s>].*?</svg\s*>").expect("svg regex"));

/// First attribute among `keys` that resolves to a colour, else `fallback`.
fn icon_colour(block: &Block, keys: &[&str], fallback: &str) -> String {
    let colour = keys
        .iter()
        .find_map(|key| block.attr_str(key).and_then(convert_colour))
        .unwrap_or_else(|| fallback.to_string());
    if colour.eq_ignore_ascii_case("currentcolor") {
        "current".to_string()
    } else {
        colour
    }
}

/// The icon's SVG without fixed dimensions, so the figure width sizes it.
pub fn icon_svg(html: &str) -> Option<String> {
    let svg = SVG_RE.find(html)?.as_str();
    Some(remove_attributes(svg, "svg", &["width", "height"]))
}

/// Third-party icon block: editor-produced inline SVG.
pub struct IconBlock;

impl BlockRenderer for IconBlock {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let text = icon_colour(
            block,
            &["iconColor", "iconColorValue", "customIconColor"],
            "currentColor",
        );
        let background = icon_colour(
            block,
            &[
                "iconBackgroundColor",
                "iconBackgroundColorValue",
                "customIconBackgroundColor",
            ],
            "transparent",
        );

        let mut class = ClassList::from("icon-block");
        class.extend(&props.classes);
        class.push(&format!("text-{text} bg-{background}"));

        let width = block
            .attr("width")
            .and_then(css_length)
            .unwrap_or_else(|| "24px".to_string());

        let mut figure = Element::new("figure")
            .key(props.key.clone())
            .id(props.id.clone())
            .class(class)
            .style("width", width);
        if let Some(svg) = icon_svg(&block.inner_html) {
            figure = figure.child(Node::Raw(svg));
        }
        Some(figure.into())
    }
}
