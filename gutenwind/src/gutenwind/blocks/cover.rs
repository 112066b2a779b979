//! `core/cover`: a background image layer, a tinted overlay and a content
//! layer, stacked with z-index inside one positioned container.

use serde_json::Value;

use crate::gutenwind::attributes::content_position_utilities;
use crate::gutenwind::classes::{ClassList, normalize_tokens};
use crate::gutenwind::fragment::extract_attribute_value;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::tokens::convert_colour;
use crate::gutenwind::types::Block;

use super::group::container_tag;
use super::traits::{BlockProps, BlockRenderer};

pub struct Cover;

/// `0.333` -> `33.3`
fn percent(fraction: f64) -> String {
    let value = (fraction * 1000.0).round() / 10.0;
    format!("{value}")
}

/// `bg-position-[x%_y%]` for an off-centre focal point, `bg-center` otherwise.
pub fn focal_point_class(focal: Option<&Value>) -> String {
    let coord = |key: &str| focal.and_then(|f| f.get(key)).and_then(Value::as_f64);
    match (coord("x"), coord("y")) {
        (Some(x), Some(y)) if (x - 0.5).abs() > f64::EPSILON || (y - 0.5).abs() > f64::EPSILON => {
            format!("bg-position-[{}%_{}%]", percent(x), percent(y))
        }
        _ => "bg-center".to_string(),
    }
}

/// Opacity utility for the overlay; a full-strength overlay needs none.
pub fn dim_ratio_class(block: &Block) -> Option<String> {
    let ratio = block
        .attr_f64("dimRatio")
        .filter(|ratio| ratio.is_finite())
        .unwrap_or(100.0)
        .round()
        .clamp(0.0, 100.0) as u8;
    (ratio < 100).then(|| format!("opacity-{ratio}"))
}

fn background_url(block: &Block, props: &BlockProps<'_>) -> Option<String> {
    if block.attr_bool("useFeaturedImage") {
        if let Some(url) = props.context.featured_image() {
            return Some(url.to_string());
        }
    }
    block
        .attr_str("url")
        .map(str::to_string)
        .or_else(|| extract_attribute_value(&block.inner_html, Some("img"), "src", 0))
        .filter(|url| !url.trim().is_empty())
}

impl Cover {
    fn background_layer(&self, block: &Block, props: &BlockProps<'_>) -> Node {
        let url = background_url(block, props);
        let alt = block.attr_str("alt").unwrap_or("");

        if block.attr_str("backgroundType") == Some("video") {
            if let Some(src) = url {
                return Element::new("video")
                    .classes("cover-video absolute inset-0 z-0 w-full h-full object-cover")
                    .attr("src", src)
                    .attr("autoplay", "")
                    .attr("muted", "")
                    .attr("loop", "")
                    .attr("playsinline", "")
                    .attr("aria-label", alt)
                    .into();
            }
        }

        let mut class = ClassList::from("cover-image");
        let image_class = extract_attribute_value(&block.inner_html, Some("img"), "class", 0);
        class.extend(&normalize_tokens(image_class.as_deref().unwrap_or("")));
        class.push("absolute inset-0 z-0 w-full h-full bg-cover");
        class.push(&focal_point_class(block.attr("focalPoint")));
        class.push(if block.attr_bool("hasParallax") { "bg-fixed" } else { "" });
        class.push(if block.attr_bool("isRepeated") { "bg-repeat" } else { "bg-no-repeat" });

        let mut layer = Element::new("div")
            .attr("role", "img")
            .attr("aria-label", alt)
            .class(class);
        if let Some(url) = url {
            layer = layer.style("backgroundImage", format!("url({url})"));
        }
        layer.into()
    }

    fn overlay_layer(&self, block: &Block) -> Node {
        let mut class = ClassList::from("cover-overlay");
        let span_class = extract_attribute_value(&block.inner_html, Some("span"), "class", 0);
        class.extend(&normalize_tokens(span_class.as_deref().unwrap_or("")));
        if let Some(colour) = block.attr_str("overlayColor").and_then(convert_colour) {
            class.push(&format!("bg-{colour}"));
        }
        if let Some(opacity) = dim_ratio_class(block) {
            class.push(&opacity);
        }
        class.push("absolute inset-0 z-[1] pointer-events-none");

        let mut overlay = Element::new("span").attr("aria-hidden", "true").class(class);
        if let Some(colour) = block.attr_str("customOverlayColor") {
            overlay = overlay.style("backgroundColor", colour);
        }
        if let Some(gradient) = block.attr_str("customGradient") {
            overlay = overlay.style("background", gradient);
        }
        overlay.into()
    }
}

impl BlockRenderer for Cover {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = props.class_list();
        class.push("relative flex overflow-hidden");
        if let Some(height) = block.attr_f64("minHeight").filter(|h| *h > 0.0) {
            let unit = block.attr_str("minHeightUnit").unwrap_or("px");
            class.push(&format!("min-h-[{height}{unit}]"));
        }
        if block.attr_str("contentPosition").is_none() {
            class.push(&content_position_utilities("center center"));
        }

        let background = self.background_layer(block, &props);
        let overlay = self.overlay_layer(block);
        // Shrink-wrapped so the row's `justify-*` can place it horizontally.
        let content = Element::new("div")
            .classes("cover-content relative z-[2] flex flex-col max-w-full")
            .children(props.children);

        Some(
            Element::new(container_tag(block, "section"))
                .key(props.key)
                .id(props.id)
                .class(class)
                .child(background)
                .child(overlay)
                .child(content)
                .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutenwind::blocks::BlockRegistry;
    use crate::gutenwind::types::{InheritedProps, PostContext, RenderContext};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const COVER_HTML: &str = r#"<div class="wp-block-cover is-light has-custom-content-position is-position-top-left" style="min-height:400px"><span aria-hidden="true" class="wp-block-cover__background has-black-background-color has-background-dim-60 has-background-dim"></span><img class="wp-block-cover__image-background wp-image-7" alt="" src="/from-html.jpg" data-object-fit="cover"/><div class="wp-block-cover__inner-container"></div></div>"#;

    fn render(block: Block, context: &RenderContext) -> Node {
        BlockRegistry::core()
            .render_block(&block, "k", context, &InheritedProps::default())
            .expect("cover renders")
    }

    #[test]
    fn focal_points_and_dim_ratio() {
        assert_eq!(focal_point_class(Some(&json!({"x": 0.5, "y": 0.5}))), "bg-center");
        assert_eq!(focal_point_class(None), "bg-center");
        assert_eq!(
            focal_point_class(Some(&json!({"x": 0.25, "y": 0.333}))),
            "bg-position-[25%_33.3%]"
        );
        let dim = |attrs| dim_ratio_class(&Block::new("core/cover", attrs, ""));
        assert_eq!(dim(json!({})), None);
        assert_eq!(dim(json!({"dimRatio": 60})), Some("opacity-60".to_string()));
        assert_eq!(dim(json!({"dimRatio": 0})), Some("opacity-0".to_string()));
        assert_eq!(dim(json!({"dimRatio": "NaN"})), None);
    }

    #[test]
    fn horizontal_position_moves_the_content_layer() {
        let classes = |position: &str| {
            let block = Block::new("core/cover", json!({"contentPosition": position}), "");
            let node = render(block, &RenderContext::new(PostContext::default()));
            let section = node.as_element().cloned().expect("element");
            let content = section.children[2].as_element().cloned().expect("content layer");
            (section.class, content.class)
        };

        let (left, left_content) = classes("top left");
        let (right, right_content) = classes("top right");
        assert!(left.contains("justify-start"));
        assert!(right.contains("justify-end"));
        assert!(left.contains("items-start") && right.contains("items-start"));
        assert!(!left.contains("flex-col"));
        for content in [left_content, right_content] {
            assert!(!content.contains("w-full"));
            assert!(content.contains("max-w-full"));
        }
    }

    #[test]
    fn three_layers_in_order() {
        let block = Block::new(
            "core/cover",
            json!({
                "url": "/hero.jpg",
                "alt": "Hills",
                "dimRatio": 60,
                "overlayColor": "black",
                "focalPoint": {"x": 0.25, "y": 0.75},
                "contentPosition": "top left",
                "minHeight": 400,
                "isRepeated": true
            }),
            COVER_HTML,
        )
        .with_inner_blocks(vec![Block::new("core/paragraph", json!({}), "<p>Over</p>")]);

        let node = render(block, &RenderContext::new(PostContext::default()));
        let section = node.as_element().expect("element");
        assert_eq!(section.tag, "section");
        assert_eq!(
            section.class.to_string(),
            "cover-block flex items-start justify-start relative overflow-hidden min-h-[400px]"
        );

        let layers: Vec<&Element> = section.children.iter().filter_map(Node::as_element).collect();
        assert_eq!(layers.len(), 3);

        assert_eq!(layers[0].get_attr("aria-label"), Some("Hills"));
        assert_eq!(layers[0].get_style("backgroundImage"), Some("url(/hero.jpg)"));
        assert!(layers[0].class.contains("bg-position-[25%_75%]"));
        assert!(layers[0].class.contains("bg-repeat"));

        assert_eq!(
            layers[1].class.to_string(),
            "cover-overlay bg-black opacity-60 absolute inset-0 z-[1] pointer-events-none"
        );
        assert!(layers[2].class.contains("z-[2]"));
        assert_eq!(layers[2].children.len(), 1);
    }

    #[test]
    fn featured_image_and_default_position() {
        let context = RenderContext::new(PostContext {
            featured_image: Some("/featured.jpg".into()),
            ..PostContext::default()
        });
        let block = Block::new(
            "core/cover",
            json!({"useFeaturedImage": true, "customOverlayColor": "#102030", "tagName": "div"}),
            "",
        );
        let node = render(block, &context);
        let el = node.as_element().expect("element");
        assert_eq!(el.tag, "div");
        assert!(el.class.contains("items-center"));
        assert!(el.class.contains("justify-center"));

        let image = el.children[0].as_element().expect("image layer");
        assert_eq!(image.get_style("backgroundImage"), Some("url(/featured.jpg)"));
        let overlay = el.children[1].as_element().expect("overlay");
        assert_eq!(overlay.get_style("backgroundColor"), Some("#102030"));
        assert!(!overlay.class.iter().any(|c| c.starts_with("opacity-")));
    }

    #[test]
    fn image_source_falls_back_to_markup() {
        let block = Block::new("core/cover", json!({}), COVER_HTML);
        let node = render(block, &RenderContext::new(PostContext::default()));
        let image = node.as_element().and_then(|el| el.children[0].as_element()).cloned();
        assert_eq!(
            image.and_then(|i| i.get_style("backgroundImage").map(str::to_string)),
            Some("url(/from-html.jpg)".to_string())
        );
    }
}
