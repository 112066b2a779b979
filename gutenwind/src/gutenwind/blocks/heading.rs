use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::{extract_tag_content, strip_wrapper};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

/// `level` attribute clamped to 1..=6, default 2.
pub fn heading_level(block: &Block) -> u8 {
    block
        .attr_f64("level")
        .filter(|level| level.is_finite())
        .map(|level| level.round().clamp(1.0, 6.0) as u8)
        .unwrap_or(2)
}

/// Inner HTML of the first `<tag>`, or the fragment without its wrapper.
fn body_of(html: &str, tag: &str) -> String {
    extract_tag_content(html, tag).unwrap_or_else(|| strip_wrapper(html))
}

pub struct Heading;

impl BlockRenderer for Heading {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let tag = format!("h{}", heading_level(block));
        let body = body_of(&block.inner_html, &tag);
        Some(props.element(&tag).children(props.inline(body.trim())).into())
    }
}

pub struct Paragraph;

impl BlockRenderer for Paragraph {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let body = body_of(&block.inner_html, "p");
        Some(props.element("p").children(props.inline(body.trim())).into())
    }
}

/// Title of the post being rendered. The block carries no markup of its own.
pub struct PostTitle;

impl BlockRenderer for PostTitle {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let tag = format!("h{}", heading_level(block));
        let post = &props.context.post;
        let title = post
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled");

        let mut class = ClassList::from("post-title");
        class.extend(&props.classes);

        let heading = Element::new(&tag)
            .key(props.key.clone())
            .id(props.id.clone())
            .class(class);

        let heading = if block.attr_bool("isLink") {
            heading.child(
                Element::new("a")
                    .attr("href", post.url.as_deref().unwrap_or("#"))
                    .attr_opt("rel", block.attr_str("rel"))
                    .attr_opt("target", block.attr_str("linkTarget"))
                    .text(title),
            )
        } else {
            heading.text(title)
        };
        Some(heading.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutenwind::blocks::BlockRegistry;
    use crate::gutenwind::types::{InheritedProps, PostContext, RenderContext};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(block: Block, context: &RenderContext) -> String {
        BlockRegistry::core()
            .render_block(&block, "k", context, &InheritedProps::default())
            .map(|n| n.to_html())
            .unwrap_or_default()
    }

    fn ctx() -> RenderContext {
        RenderContext::new(PostContext::default())
    }

    #[test]
    fn heading_uses_level_and_wrapper_classes() {
        let html = render(
            Block::new(
                "core/heading",
                json!({"level": 3}),
                r#"<h3 class="wp-block-heading has-text-align-center">Hello</h3>"#,
            ),
            &ctx(),
        );
        assert_eq!(html, r#"<h3 class="heading-block text-center">Hello</h3>"#);
    }

    #[test]
    fn heading_level_defaults_and_clamps() {
        let level = |attrs| heading_level(&Block::new("core/heading", attrs, ""));
        assert_eq!(level(json!({})), 2);
        assert_eq!(level(json!({"level": 9})), 6);
        assert_eq!(level(json!({"level": 0})), 1);
        assert_eq!(level(json!({"level": "4"})), 4);
        assert_eq!(level(json!({"level": "NaN"})), 2);
        assert_eq!(level(json!({"level": "inf"})), 2);
    }

    #[test]
    fn non_numeric_level_renders_h2() {
        let html = render(
            Block::new("core/heading", json!({"level": "NaN"}), "<h2>x</h2>"),
            &ctx(),
        );
        assert_eq!(html, r#"<h2 class="heading-block">x</h2>"#);
    }

    #[test]
    fn heading_falls_back_to_stripped_wrapper() {
        let html = render(
            Block::new("core/heading", json!({}), "<h4>Mismatched level</h4>"),
            &ctx(),
        );
        assert_eq!(html, r#"<h2 class="heading-block">Mismatched level</h2>"#);
    }

    #[test]
    fn paragraph_renders_inline_content() {
        let html = render(
            Block::new(
                "core/paragraph",
                json!({"fontSize": "small"}),
                "\n<p class=\"has-small-font-size\">A <strong>bold</strong> move</p>\n",
            ),
            &ctx(),
        );
        assert_eq!(
            html,
            r#"<p class="paragraph-block text-sm">A <strong>bold</strong> move</p>"#
        );
    }

    #[test]
    fn paragraph_decodes_named_entities() {
        let html = render(
            Block::new(
                "core/paragraph",
                json!({}),
                "<p>Caf&eacute; costs 5&euro; &middot; &times;2</p>",
            ),
            &ctx(),
        );
        assert_eq!(
            html,
            "<p class=\"paragraph-block\">Caf\u{e9} costs 5\u{20ac} \u{b7} \u{d7}2</p>"
        );
    }

    #[test]
    fn post_title_links_to_post() {
        let context = RenderContext::new(PostContext {
            title: Some("Hello & welcome".into()),
            url: Some("/hello/".into()),
            ..PostContext::default()
        });
        let html = render(
            Block::new("core/post-title", json!({"level": 1, "isLink": true}), ""),
            &context,
        );
        assert_eq!(
            html,
            r#"<h1 class="post-title"><a href="/hello/">Hello &amp; welcome</a></h1>"#
        );

        let untitled = render(Block::new("core/post-title", json!({}), ""), &ctx());
        assert_eq!(untitled, r#"<h2 class="post-title">Untitled</h2>"#);
    }
}
