use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::extract_attribute_value;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

/// `core/media-text`: a media column beside a column of inner blocks.
pub struct MediaText;

impl MediaText {
    fn media_url(&self, block: &Block, props: &BlockProps<'_>) -> Option<String> {
        block
            .attr_str("mediaUrl")
            .map(str::to_string)
            .or_else(|| {
                block
                    .attr_bool("useFeaturedImage")
                    .then(|| props.context.featured_image().map(str::to_string))
                    .flatten()
            })
            .or_else(|| extract_attribute_value(&block.inner_html, Some("img"), "src", 0))
            .filter(|url| !url.trim().is_empty())
    }

    fn media(&self, block: &Block, url: String) -> Element {
        let fill = if block.attr_bool("imageFill") { "h-full" } else { "h-auto" };
        let media: Node = if block.attr_str("mediaType") == Some("video") {
            Element::new("video")
                .classes(&format!("w-full object-cover {fill}"))
                .attr("src", url)
                .attr("controls", "")
                .into()
        } else {
            Element::new("img")
                .classes(&format!("w-full object-cover {fill}"))
                .attr("src", url)
                .attr("alt", block.attr_str("mediaAlt").unwrap_or(""))
                .into()
        };
        Element::new("div")
            .classes("media-text--media flex-1")
            .child(Element::new("figure").classes("w-full").child(media))
    }
}

impl BlockRenderer for MediaText {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let direction = if block.attr_str("mediaPosition") == Some("right") {
            "flex-row-reverse"
        } else {
            "flex-row"
        };
        let mut class = ClassList::from(props.block_class.as_str());
        class.push(&format!("flex gap-8 {direction}"));
        class.extend(&props.classes);

        let media = self.media_url(block, &props).map(|url| self.media(block, url));
        let mut container = Element::new("div")
            .key(props.key.clone())
            .id(props.id.clone())
            .class(class);
        if let Some(media) = media {
            container = container.child(media);
        }
        let content = Element::new("div")
            .classes("media-text--content flex-1")
            .children(props.children);
        Some(container.child(content).into())
    }
}
