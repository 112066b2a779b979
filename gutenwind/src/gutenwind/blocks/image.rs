use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::gutenwind::fragment::{extract_attribute_value, split_figure};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::tokens::css_length;
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

static STYLE_WIDTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[;\s])width\s*:\s*([0-9.]+[a-z%]*)").expect("style width regex")
});

/// Display width: the `width` attribute, else an inline `width:` on the `<img>`.
pub fn image_width(block: &Block, body: &str) -> Option<String> {
    block.attr("width").and_then(css_length).or_else(|| {
        let style = extract_attribute_value(body, Some("img"), "style", 0)?;
        STYLE_WIDTH_RE
            .captures(&style)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn lightbox_enabled(block: &Block, props: &BlockProps<'_>) -> bool {
    block
        .attr_path(&["lightbox", "enabled"])
        .and_then(Value::as_bool)
        .unwrap_or(props.context.lightbox)
}

pub struct Image;

impl BlockRenderer for Image {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let (body, caption) = split_figure(&block.inner_html);
        let src = extract_attribute_value(&body, Some("img"), "src", 0)
            .or_else(|| block.attr_str("url").map(str::to_string))
            .filter(|s| !s.trim().is_empty())?;
        let alt = extract_attribute_value(&body, Some("img"), "alt", 0)
            .or_else(|| block.attr_str("alt").map(str::to_string))
            .unwrap_or_default();

        let width = image_width(block, &body);
        let mut img = Element::new("img")
            .classes("image-itself")
            .attr("src", src.as_str())
            .attr("alt", alt)
            .attr_opt("title", block.attr_str("title"))
            .attr_opt(
                "width",
                block.attr("width").and_then(Value::as_f64).map(|w| w.to_string()),
            )
            .attr_opt(
                "height",
                block.attr("height").and_then(Value::as_f64).map(|h| h.to_string()),
            );
        if let Some(ratio) = block.attr_str("aspectRatio") {
            img = img.style("aspectRatio", ratio);
        }
        if let Some(scale) = block.attr_str("scale") {
            img = img.style("objectFit", scale);
        }

        let linked = block
            .attr_str("linkDestination")
            .is_some_and(|d| d != "none");
        let href = if linked {
            extract_attribute_value(&body, Some("a"), "href", 0)
        } else {
            None
        };

        let media: Node = match href {
            Some(href) => Element::new("a")
                .attr("href", href)
                .attr_opt("target", block.attr_str("linkTarget"))
                .attr_opt("rel", block.attr_str("rel"))
                .child(img)
                .into(),
            None if lightbox_enabled(block, &props) => Element::new("a")
                .classes("lightbox")
                .attr("href", src.as_str())
                .attr("data-lightbox", "gallery")
                .attr("data-src", src.as_str())
                .child(img)
                .into(),
            None => img.into(),
        };

        let mut figure = props.element("figure").child(media);
        if let Some(width) = width {
            figure = figure.classes(&format!("w-[{width}]"));
        }
        if let Some(caption) = caption {
            figure = figure.child(
                Element::new("figcaption")
                    .classes("image-caption")
                    .children(props.inline(&caption)),
            );
        }
        Some(figure.into())
    }
}
