use std::path::Path;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

/// One node of the block editor's JSON tree.
///
/// `attrs` is left as an open JSON value: the editor serialises an empty
/// attribute bag as `[]`, and every consumer only ever asks for keys it
/// knows about.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default, alias = "blockType")]
    pub block_name: Option<String>,
    #[serde(default, alias = "attributes")]
    pub attrs: Value,
    #[serde(default, alias = "children", deserialize_with = "null_as_default")]
    pub inner_blocks: Vec<Block>,
    #[serde(
        default,
        rename = "innerHTML",
        alias = "rawInnerHTML",
        deserialize_with = "null_as_default"
    )]
    pub inner_html: String,
    #[serde(
        default,
        alias = "rawInnerContentFragments",
        deserialize_with = "null_as_default"
    )]
    pub inner_content: Vec<Option<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Block {
    pub fn new(name: &str, attrs: Value, inner_html: &str) -> Self {
        Self {
            block_name: Some(name.to_string()),
            attrs,
            inner_html: inner_html.to_string(),
            ..Self::default()
        }
    }

    pub fn with_inner_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.inner_blocks = blocks;
        self
    }

    pub fn name(&self) -> &str {
        self.block_name.as_deref().unwrap_or("")
    }

    /// No type and no markup: the editor's whitespace filler between blocks.
    pub fn is_blank(&self) -> bool {
        self.name().is_empty() && self.inner_html.trim().is_empty()
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_object().and_then(|map| map.get(key))
    }

    pub fn attr_path(&self, path: &[&str]) -> Option<&Value> {
        value_at(&self.attrs, path)
    }

    /// Non-empty string attribute.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attr(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Numeric attribute; numeric strings are accepted.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Walk nested objects; `None` as soon as a segment is missing or not an object.
pub fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
        .filter(|v| !v.is_null())
}

/// Parse the content source's block JSON. Malformed input yields no blocks.
pub fn parse_blocks(json: &str) -> Vec<Block> {
    if json.trim().is_empty() {
        return vec![];
    }
    match try_parse_blocks(json) {
        Ok(blocks) => blocks,
        Err(err) => {
            let preview: String = json.chars().take(100).collect();
            warn!("Error parsing block data: {err} ({preview})");
            vec![]
        }
    }
}

pub fn try_parse_blocks(json: &str) -> Result<Vec<Block>, serde_json::Error> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(blocks_from_values(items)),
        _ => Ok(vec![]),
    }
}

/// Convert already-parsed block values, skipping entries that are not blocks.
pub fn blocks_from_values(items: Vec<Value>) -> Vec<Block> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Block>(item) {
            Ok(block) => Some(block),
            Err(err) => {
                warn!("Skipping malformed block: {err}");
                None
            }
        })
        .collect()
}

/// Metadata about the post being rendered.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContext {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// Immutable state handed down the block tree.
///
/// Created once per page render. Descending into a block that changes nested
/// state produces a new value; nothing is mutated in place, so sibling
/// subtrees never observe each other.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    pub post: Arc<PostContext>,
    pub list_level: usize,
    pub diagnostics: bool,
    pub lightbox: bool,
}

impl RenderContext {
    pub fn new(post: PostContext) -> Self {
        Self {
            post: Arc::new(post),
            ..Self::default()
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_lightbox(mut self, lightbox: bool) -> Self {
        self.lightbox = lightbox;
        self
    }

    /// Context for the items of a list one level deeper than this one.
    pub fn nested_list(&self) -> Self {
        Self {
            list_level: self.list_level + 1,
            ..self.clone()
        }
    }

    pub fn featured_image(&self) -> Option<&str> {
        self.post
            .featured_image
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

/// Layout hints a parent forwards to its direct children only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritedProps {
    pub column_class: Option<String>,
}

/// Where a page's blocks come from: the encoded string the content source
/// returns, or an array that was already parsed.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum BlockSource {
    Encoded(String),
    Parsed(Vec<Value>),
}

impl Default for BlockSource {
    fn default() -> Self {
        BlockSource::Parsed(vec![])
    }
}

impl BlockSource {
    pub fn into_blocks(self) -> Vec<Block> {
        match self {
            BlockSource::Encoded(json) => parse_blocks(&json),
            BlockSource::Parsed(items) => blocks_from_values(items),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FeaturedImage {
    Url(String),
    Node { node: FeaturedImageNode },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImageNode {
    #[serde(default)]
    pub source_url: Option<String>,
}

/// A page record as the content source delivers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSource {
    #[serde(default, alias = "databaseId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
    #[serde(
        default,
        rename = "blocksJSON",
        alias = "blocks",
        deserialize_with = "null_as_default"
    )]
    pub blocks: BlockSource,
}

impl PageSource {
    pub fn post_context(&self, fallback_slug: &str) -> PostContext {
        let featured_image = match &self.featured_image {
            Some(FeaturedImage::Url(url)) => Some(url.clone()),
            Some(FeaturedImage::Node { node }) => node.source_url.clone(),
            None => None,
        };
        let slug = self.slug.clone().unwrap_or_else(|| fallback_slug.to_string());
        PostContext {
            id: self.id,
            title: self.title.clone(),
            url: self.uri.clone().or_else(|| Some(format!("/{slug}/"))),
            slug: Some(slug),
            featured_image,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

pub fn slug_from_path(path: &Path, content_root: &Path) -> String {
    path.strip_prefix(content_root)
        .ok()
        .and_then(|p| p.with_extension("").to_str().map(|s| s.replace('\\', "/")))
        .unwrap_or_else(|| "index".to_string())
}

/// Sorted slugs of every `*.{extension}` file below `root`. Dotfiles such as
/// cache hash markers are skipped.
pub fn slugs_under(root: &Path, extension: &str) -> Vec<String> {
    let mut slugs: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(|e| slug_from_path(e.path(), root))
        .collect();
    slugs.sort();
    slugs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_editor_block_json() {
        let blocks = parse_blocks(
            r#"[{"blockName":"core/paragraph","attrs":[],"innerBlocks":[],
                "innerHTML":"<p>Hi</p>","innerContent":["<p>Hi</p>"]},
               {"blockName":null,"attrs":{},"innerBlocks":[],"innerHTML":"\n\n","innerContent":["\n\n"]}]"#,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name(), "core/paragraph");
        assert_eq!(blocks[0].attr("anything"), None);
        assert!(blocks[1].is_blank());
    }

    #[test]
    fn malformed_json_yields_no_blocks() {
        assert!(parse_blocks("[{").is_empty());
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks(r#"{"blockName":"core/paragraph"}"#).is_empty());
    }

    #[test]
    fn attribute_helpers_read_nested_values() {
        let block = Block::new(
            "core/group",
            json!({"level": "3", "style": {"spacing": {"margin": {"top": "1rem"}}}, "flag": true}),
            "",
        );
        assert_eq!(block.attr_f64("level"), Some(3.0));
        assert_eq!(
            block.attr_path(&["style", "spacing", "margin", "top"]),
            Some(&json!("1rem"))
        );
        assert_eq!(block.attr_path(&["style", "missing", "top"]), None);
        assert!(block.attr_bool("flag"));
    }

    #[test]
    fn nested_list_context_extends_without_mutating() {
        let root = RenderContext::new(PostContext::default());
        let nested = root.nested_list().nested_list();
        assert_eq!(root.list_level, 0);
        assert_eq!(nested.list_level, 2);
    }

    #[test]
    fn page_source_accepts_encoded_and_parsed_blocks() {
        let encoded: PageSource = serde_json::from_value(json!({
            "title": "About",
            "slug": "about",
            "featuredImage": {"node": {"sourceUrl": "/hero.jpg"}},
            "blocksJSON": "[{\"blockName\":\"core/paragraph\",\"innerHTML\":\"<p>x</p>\"}]"
        }))
        .unwrap();
        let post = encoded.post_context("fallback");
        assert_eq!(post.featured_image.as_deref(), Some("/hero.jpg"));
        assert_eq!(post.url.as_deref(), Some("/about/"));
        assert_eq!(encoded.blocks.into_blocks().len(), 1);

        let parsed: PageSource = serde_json::from_value(json!({
            "blocks": [{"blockName": "core/paragraph", "innerHTML": "<p>x</p>"}, 42]
        }))
        .unwrap();
        assert_eq!(parsed.blocks.into_blocks().len(), 1);
    }

    #[test]
    fn slugs_under_walks_nested_files_of_one_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        std::fs::create_dir_all(root.join("blog")).expect("dir");
        for file in ["index.html", "blog/first.html", "blog/notes.json", ".render_hash.html"] {
            std::fs::write(root.join(file), "").expect("write");
        }

        assert_eq!(slugs_under(root, "html"), vec!["blog/first", "index"]);
        assert_eq!(slugs_under(root, "json"), vec!["blog/notes"]);
        assert!(slugs_under(&root.join("missing"), "html").is_empty());
    }
}
