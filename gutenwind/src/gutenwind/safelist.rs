//! Utility classes the rendered pages use, for the CSS build's safelist.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};

use crate::gutenwind::node::Node;
use crate::gutenwind::renderer::GutenwindEngine;

/// Every class token in the trees, sorted and deduplicated.
pub fn collect_classes(nodes: &[Node]) -> Vec<String> {
    let mut classes = BTreeSet::new();
    for node in nodes {
        for element in node.elements() {
            classes.extend(element.class.iter().map(str::to_string));
        }
    }
    classes.into_iter().collect()
}

/// Render every page and union their classes.
pub fn site_classes(engine: &GutenwindEngine) -> Vec<String> {
    let mut classes = BTreeSet::new();
    for slug in engine.source_slugs() {
        match engine.render_nodes(&slug) {
            Ok(nodes) => classes.extend(collect_classes(&nodes)),
            Err(err) => error!("skipping {slug} in safelist: {err:#}"),
        }
    }
    classes.into_iter().collect()
}

/// Write the site's classes as a JSON array to `path`, returning them.
pub fn write_safelist(engine: &GutenwindEngine, path: &Path) -> Result<Vec<String>> {
    let classes = site_classes(engine);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating safelist dir at {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&classes)?;
    fs::write(path, json).with_context(|| format!("writing safelist to {}", path.display()))?;

    debug!("{} safelist classes written to {}", classes.len(), path.display());
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutenwind::config::SiteConfig;
    use crate::gutenwind::node::Element;
    use pretty_assertions::assert_eq;

    #[test]
    fn classes_are_collected_from_the_whole_tree() {
        let tree: Vec<Node> = vec![
            Element::new("div")
                .classes("flex gap-4")
                .child(Element::new("p").classes("text-center flex"))
                .child(Node::Text("no classes here".into()))
                .into(),
            Element::new("hr").classes("border-t").into(),
        ];
        assert_eq!(
            collect_classes(&tree),
            vec!["border-t", "flex", "gap-4", "text-center"]
        );
    }

    #[test]
    fn safelist_file_is_a_json_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = dir.path().join("content");
        fs::create_dir_all(&content).expect("content dir");
        fs::write(
            content.join("home.json"),
            r#"{"title":"Home","blocks":[{"blockName":"core/paragraph","attrs":{"align":"center"},"innerHTML":"<p>Hi</p>"}]}"#,
        )
        .expect("page");

        let engine =
            GutenwindEngine::with_roots(SiteConfig::default(), content, dir.path().join("build"))
                .expect("engine");
        let path = dir.path().join("out/safelist.json");
        let classes = write_safelist(&engine, &path).expect("safelist");

        assert_eq!(classes, vec!["mx-auto", "paragraph-block"]);
        let written: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(written, classes);
    }
}
