pub mod attributes;
pub mod blocks;
pub mod cache;
pub mod classes;
pub mod config;
pub mod fragment;
pub mod inline;
pub mod node;
pub mod renderer;
pub mod safelist;
pub mod tokens;
pub mod types;

pub use blocks::BlockRegistry;
pub use config::SiteConfig;
pub use node::{Element, Node, render_html};
pub use renderer::GutenwindEngine;
pub use types::{Block, PostContext, RenderContext, RenderedPage, parse_blocks};

/// Parse a block-JSON string and render it with the core block set.
pub fn render_json(json: &str, post: PostContext) -> Vec<Node> {
    BlockRegistry::core().render_blocks(&parse_blocks(json), "block", &RenderContext::new(post))
}
