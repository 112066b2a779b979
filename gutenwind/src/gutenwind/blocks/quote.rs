use crate::gutenwind::fragment::{
    extract_all_tag_content, extract_cite_text, extract_outer_tag, extract_tag_content,
    strip_wrapper,
};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

/// `core/quote` and `core/pullquote`. A pullquote is wrapped in a `<figure>`.
pub struct Quote {
    pub figure: bool,
}

impl Quote {
    /// Quote body from raw markup, for quotes saved without inner blocks.
    fn raw_body(&self, block: &Block, props: &BlockProps<'_>) -> Vec<Node> {
        let inner = extract_tag_content(&block.inner_html, "blockquote")
            .unwrap_or_else(|| strip_wrapper(&block.inner_html));
        let inner = match extract_outer_tag(&inner, "cite") {
            Some(cite) => inner.replacen(&cite, "", 1),
            None => inner,
        };

        let paragraphs = extract_all_tag_content(&inner, "p");
        if paragraphs.is_empty() {
            return props.inline(inner.trim());
        }
        paragraphs
            .iter()
            .map(|p| Element::new("p").children(props.inline(p.trim())).into())
            .collect()
    }
}

impl BlockRenderer for Quote {
    fn render(&self, block: &Block, mut props: BlockProps<'_>) -> Option<Node> {
        let children = std::mem::take(&mut props.children);
        let body = if children.is_empty() {
            self.raw_body(block, &props)
        } else {
            children
        };

        let citation = extract_cite_text(&block.inner_content, &block.inner_html)
            .map(|cite| Element::new("cite").classes("block").children(props.inline(&cite)));

        let quote = |el: Element| -> Element {
            let el = el.children(body);
            match citation {
                Some(cite) => el.child(cite),
                None => el,
            }
        };

        let node = if self.figure {
            let blockquote = quote(
                Element::new("blockquote").classes(&format!("{}__blockquote", props.block_class)),
            );
            props.element("figure").child(blockquote)
        } else {
            quote(props.element("blockquote"))
        };
        Some(node.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutenwind::blocks::BlockRegistry;
    use crate::gutenwind::types::{InheritedProps, PostContext, RenderContext};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(block: Block) -> String {
        BlockRegistry::core()
            .render_block(
                &block,
                "k",
                &RenderContext::new(PostContext::default()),
                &InheritedProps::default(),
            )
            .map(|n| n.to_html())
            .unwrap_or_default()
    }

    #[test]
    fn quote_with_inner_blocks_appends_citation() {
        let mut block = Block::new(
            "core/quote",
            json!({}),
            r#"<blockquote class="wp-block-quote"><cite>Ada <em>L.</em></cite></blockquote>"#,
        )
        .with_inner_blocks(vec![Block::new("core/paragraph", json!({}), "<p>Numbers</p>")]);
        block.inner_content = vec![
            Some(r#"<blockquote class="wp-block-quote">"#.into()),
            None,
            Some("<cite>Ada <em>L.</em></cite></blockquote>".into()),
        ];

        assert_eq!(
            render(block),
            r#"<blockquote class="quote-block"><p class="paragraph-block">Numbers</p><cite class="block">Ada <em>L.</em></cite></blockquote>"#
        );
    }

    #[test]
    fn pullquote_from_raw_markup_is_figure_wrapped() {
        let block = Block::new(
            "core/pullquote",
            json!({"textAlign": "center"}),
            r#"<figure class="wp-block-pullquote has-text-align-center"><blockquote><p>First</p><p>Second &amp; last</p><cite>Someone</cite></blockquote></figure>"#,
        );
        assert_eq!(
            render(block),
            concat!(
                r#"<figure class="pullquote-block text-center">"#,
                r#"<blockquote class="pullquote-block__blockquote">"#,
                "<p>First</p><p>Second &amp; last</p>",
                r#"<cite class="block">Someone</cite>"#,
                "</blockquote></figure>"
            )
        );
    }

    #[test]
    fn quote_without_paragraphs_or_citation() {
        let block = Block::new("core/quote", json!({}), "<blockquote>Just text</blockquote>");
        assert_eq!(render(block), r#"<blockquote class="quote-block">Just text</blockquote>"#);
    }
}
