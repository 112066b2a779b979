use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::gutenwind::blocks::BlockRegistry;
use crate::gutenwind::cache;
use crate::gutenwind::config::SiteConfig;
use crate::gutenwind::node::{Node, render_html};
use crate::gutenwind::types::{
    Block, PageSource, PostContext, RenderContext, RenderedPage, slugs_under,
};

const SOURCE_EXTENSION: &str = "json";

/// Loads page records from the content root, renders them and caches the HTML.
pub struct GutenwindEngine {
    pub config: SiteConfig,
    registry: BlockRegistry,
    content_root: PathBuf,
    cache_root: PathBuf,
}

impl GutenwindEngine {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let content_root = config.content_root();
        let cache_root = config.build_root();
        Self::with_roots(config, content_root, cache_root)
    }

    pub fn with_roots(config: SiteConfig, content_root: PathBuf, cache_root: PathBuf) -> Result<Self> {
        cache::ensure_cache_root(&cache_root)
            .with_context(|| format!("creating cache root at {}", cache_root.display()))?;

        Ok(Self {
            config,
            registry: BlockRegistry::core(),
            content_root,
            cache_root,
        })
    }

    /// Swap in a registry carrying extra renderers.
    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn context_for(&self, post: PostContext) -> RenderContext {
        RenderContext::new(post)
            .with_diagnostics(self.config.render.diagnostics)
            .with_lightbox(self.config.render.lightbox)
    }

    /// Render a block list against the given post metadata.
    pub fn render_blocks(&self, blocks: &[Block], post: PostContext) -> Vec<Node> {
        self.registry
            .render_blocks(blocks, "block", &self.context_for(post))
    }

    pub fn render_source(&self, source: &PageSource, slug: &str) -> (PostContext, Vec<Node>) {
        let post = source.post_context(slug);
        let blocks = source.blocks.clone().into_blocks();
        let nodes = self.render_blocks(&blocks, post.clone());
        (post, nodes)
    }

    /// Output tree for a page, bypassing the HTML cache.
    pub fn render_nodes(&self, slug: &str) -> Result<Vec<Node>> {
        let source = self.load_source(slug)?;
        Ok(self.render_source(&source, slug).1)
    }

    pub fn page_exists(&self, slug: &str) -> bool {
        self.source_path_for(slug).is_file()
    }

    pub fn render_page(&self, slug: &str) -> Result<RenderedPage> {
        let source_path = self.source_path_for(slug);
        let cache_path = cache::cache_path(&self.cache_root, slug);
        let settings = cache::update_hash_marker(
            &self.cache_root,
            "render",
            &cache::settings_hash(&self.config.render),
        )?;
        let binary_mtime = cache::binary_mtime();

        let use_cache = source_path.exists()
            && cache_path.exists()
            && cache::cache_is_fresh(&source_path, &cache_path, &[settings, binary_mtime])?;

        let source = self.load_source(slug)?;
        let title = source.post_context(slug).title.unwrap_or_default();

        let html = if use_cache {
            debug!("Serving {slug} from {}", cache_path.display());
            fs::read_to_string(&cache_path)
                .with_context(|| format!("reading cached page at {}", cache_path.display()))?
        } else {
            debug!("Rendering {slug} from {}", source_path.display());
            let (_, nodes) = self.render_source(&source, slug);
            let html = render_html(&nodes);
            cache::write_cache(&cache_path, &html)
                .with_context(|| format!("writing cached page to {}", cache_path.display()))?;
            html
        };

        Ok(RenderedPage {
            slug: slug.to_string(),
            title,
            html,
            cached: Some(use_cache),
        })
    }

    fn source_path_for(&self, slug: &str) -> PathBuf {
        let mut path = self.content_root.join(slug);
        if path.extension().is_none() {
            path = path.with_extension(SOURCE_EXTENSION);
        }
        path
    }

    fn load_source(&self, slug: &str) -> Result<PageSource> {
        let path = self.source_path_for(slug);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading page source at {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing page source at {}", path.display()))
    }

    /// Slugs of every page source under the content root.
    pub fn source_slugs(&self) -> Vec<String> {
        slugs_under(&self.content_root, SOURCE_EXTENSION)
    }

    /// Pre-render every page source into the cache, returning the slugs that
    /// rendered. A page that fails is logged and skipped.
    pub fn prebuild_all(&self) -> Result<Vec<String>> {
        let mut slugs = vec![];
        for slug in self.source_slugs() {
            match self.render_page(&slug) {
                Ok(_) => slugs.push(slug),
                Err(err) => error!("failed to prebuild {slug}: {err:#}"),
            }
        }
        info!("Prebuilt {} page(s) into {}", slugs.len(), self.cache_root.display());
        Ok(slugs)
    }

    /// Slugs that currently have rendered HTML in the cache.
    pub fn cached_slugs(&self) -> Vec<String> {
        slugs_under(&self.cache_root, cache::CACHE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "id": 7,
        "title": "About us",
        "uri": "/about/",
        "blocksJSON": "[{\"blockName\":\"core/heading\",\"attrs\":{\"level\":1},\"innerBlocks\":[],\"innerHTML\":\"<h1>About</h1>\",\"innerContent\":[\"<h1>About</h1>\"]}]"
    }"#;

    fn engine(dir: &Path) -> GutenwindEngine {
        GutenwindEngine::with_roots(
            SiteConfig::default(),
            dir.join("content"),
            dir.join("build"),
        )
        .expect("engine")
    }

    #[test]
    fn renders_then_serves_from_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = engine(dir.path());
        fs::create_dir_all(engine.content_root()).expect("content dir");
        fs::write(engine.content_root().join("about.json"), PAGE).expect("page");

        assert!(engine.page_exists("about"));
        assert!(!engine.page_exists("missing"));

        let first = engine.render_page("about").expect("first render");
        assert_eq!(first.title, "About us");
        assert_eq!(first.html, r#"<h1 class="heading-block">About</h1>"#);
        assert_eq!(first.cached, Some(false));

        let second = engine.render_page("about").expect("second render");
        assert_eq!(second.cached, Some(true));
        assert_eq!(second.html, first.html);
        assert_eq!(engine.cached_slugs(), vec!["about".to_string()]);
    }

    #[test]
    fn prebuild_skips_broken_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = engine(dir.path());
        let blog = engine.content_root().join("blog");
        fs::create_dir_all(&blog).expect("content dir");
        fs::write(blog.join("first.json"), PAGE).expect("page");
        fs::write(engine.content_root().join("broken.json"), "{ nope").expect("page");

        assert_eq!(
            engine.source_slugs(),
            vec!["blog/first".to_string(), "broken".to_string()]
        );
        assert_eq!(engine.prebuild_all().expect("prebuild"), vec!["blog/first".to_string()]);
    }
}
