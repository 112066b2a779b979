pub mod buttons;
pub mod code;
pub mod columns;
pub mod cover;
pub mod details;
pub mod group;
pub mod heading;
pub mod icon;
pub mod image;
pub mod list;
pub mod media_text;
pub mod quote;
pub mod shortcode;
pub mod spacer;
pub mod table;
pub mod traits;

use std::collections::HashMap;

use log::warn;

use crate::gutenwind::attributes::compile_tokens;
use crate::gutenwind::classes::{ClassList, normalize_tokens};
use crate::gutenwind::fragment::wrapper_attribute;
use crate::gutenwind::node::Node;
use crate::gutenwind::types::{Block, InheritedProps, RenderContext};

use self::buttons::{Button, ButtonText, Buttons};
use self::code::{Code, Preformatted};
use self::columns::{Column, Columns};
use self::cover::Cover;
use self::details::Details;
use self::group::Group;
use self::heading::{Heading, Paragraph, PostTitle};
use self::icon::IconBlock;
use self::image::Image;
use self::list::{List, ListItem};
use self::media_text::MediaText;
use self::quote::Quote;
use self::shortcode::Shortcode;
use self::spacer::{Separator, Spacer};
use self::table::Table;
use self::traits::{BlockProps, BlockRenderer};

/// Renders nothing. Footnote lists are produced from inline references.
struct Skip;

impl BlockRenderer for Skip {
    fn render(&self, _block: &Block, _props: BlockProps<'_>) -> Option<Node> {
        None
    }
}

/// Maps block type names to their renderers.
pub struct BlockRegistry {
    renderers: HashMap<String, Box<dyn BlockRenderer>>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::core()
    }
}

impl BlockRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Every block type this crate knows how to render.
    pub fn core() -> Self {
        Self::empty()
            .with_renderer("core/button", Button)
            .with_renderer("core/buttons", Buttons)
            .with_renderer("core/code", Code)
            .with_renderer("core/column", Column)
            .with_renderer("core/columns", Columns)
            .with_renderer("core/cover", Cover)
            .with_renderer("core/details", Details)
            .with_renderer("core/footnotes", Skip)
            .with_renderer("core/group", Group)
            .with_renderer("core/heading", Heading)
            .with_renderer("core/image", Image)
            .with_renderer("core/list", List)
            .with_renderer("core/list-item", ListItem)
            .with_renderer("core/media-text", MediaText)
            .with_renderer("core/paragraph", Paragraph)
            .with_renderer("core/post-title", PostTitle)
            .with_renderer("core/preformatted", Preformatted)
            .with_renderer("core/pullquote", Quote { figure: true })
            .with_renderer("core/quote", Quote { figure: false })
            .with_renderer("core/separator", Separator)
            .with_renderer("core/shortcode", Shortcode::default())
            .with_renderer("core/spacer", Spacer)
            .with_renderer("core/table", Table)
            .with_renderer("costered-blocks/button-text", ButtonText)
            .with_renderer("outermost/icon-block", IconBlock)
    }

    /// Register (or replace) the renderer for a block type.
    pub fn with_renderer(mut self, name: &str, renderer: impl BlockRenderer + 'static) -> Self {
        self.renderers.insert(name.to_string(), Box::new(renderer));
        self
    }

    pub fn handles(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Render a page's top-level blocks.
    pub fn render_blocks(
        &self,
        blocks: &[Block],
        key_prefix: &str,
        context: &RenderContext,
    ) -> Vec<Node> {
        self.render_children(blocks, key_prefix, context, &InheritedProps::default())
    }

    /// Render sibling blocks in source order, dropping those that render nothing.
    pub fn render_children(
        &self,
        blocks: &[Block],
        key_prefix: &str,
        context: &RenderContext,
        inherited: &InheritedProps,
    ) -> Vec<Node> {
        blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| {
                self.render_block(block, &format!("{key_prefix}-{i}"), context, inherited)
            })
            .collect()
    }

    pub fn render_block(
        &self,
        block: &Block,
        key_prefix: &str,
        context: &RenderContext,
        inherited: &InheritedProps,
    ) -> Option<Node> {
        if block.is_blank() {
            return None;
        }

        let name = block.name();
        let Some(renderer) = self.renderers.get(name) else {
            let shown = if name.is_empty() { "<unnamed>" } else { name };
            warn!("Unhandled block type: {shown} ({key_prefix})");
            return None;
        };

        let child_context = renderer.child_context(block, context);
        let child_props = renderer.child_props(block, inherited);
        let children =
            self.render_children(&block.inner_blocks, key_prefix, &child_context, &child_props);

        let props = BlockProps {
            key: key_prefix.to_string(),
            block_class: block_class_name(name),
            classes: block_classes(block),
            id: block
                .attr_str("anchor")
                .map(str::to_string)
                .or_else(|| wrapper_attribute(&block.inner_html, "id")),
            context,
            children,
            inherited,
        };
        renderer.render(block, props)
    }
}

/// `core/heading` -> `heading-block`, `outermost/icon-block` -> `icon-block`.
pub fn block_class_name(name: &str) -> String {
    let short = name.rsplit('/').next().unwrap_or(name);
    if short.ends_with("-block") {
        short.to_string()
    } else {
        format!("{short}-block")
    }
}

/// Classes for a block: its wrapper's class attribute and `className`
/// normalized, joined with the classes compiled from its attributes.
pub fn block_classes(block: &Block) -> ClassList {
    let wrapper = wrapper_attribute(&block.inner_html, "class").unwrap_or_default();
    let custom = block.attr_str("className").unwrap_or("");
    let mut classes = normalize_tokens(&format!("{wrapper} {custom}"));
    classes.extend(&compile_tokens(&block.attrs));
    classes
}
