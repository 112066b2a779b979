use std::fs;
use std::path::Path;

use gutenwind::gutenwind::config::resolve;
use gutenwind::gutenwind::safelist::write_safelist;
use gutenwind::gutenwind::{GutenwindEngine, SiteConfig};
use pretty_assertions::assert_eq;

fn sample_engine(build_root: &Path) -> GutenwindEngine {
    GutenwindEngine::with_roots(
        SiteConfig::default(),
        resolve("../content"),
        build_root.to_path_buf(),
    )
    .expect("engine")
}

#[test]
fn sample_content_prebuilds_into_the_cache() {
    let build = tempfile::tempdir().expect("tempdir");
    let engine = sample_engine(build.path());

    let slugs = vec!["blog/hello-world".to_string(), "index".to_string()];
    assert_eq!(engine.source_slugs(), slugs);
    assert_eq!(engine.prebuild_all().expect("prebuild"), slugs);
    assert_eq!(engine.cached_slugs(), slugs);
    assert!(build.path().join("blog/hello-world.html").is_file());
}

#[test]
fn encoded_and_parsed_block_sources_both_render() {
    let build = tempfile::tempdir().expect("tempdir");
    let engine = sample_engine(build.path());

    let post = engine.render_page("blog/hello-world").expect("post");
    assert_eq!(post.title, "Hello world");
    assert!(post.html.contains(r#"<code class="inline-code">blocksJSON</code>"#), "{}", post.html);
    assert!(post.html.contains("<hr"), "{}", post.html);
    assert!(post.html.contains("<blockquote"), "{}", post.html);

    let home = engine.render_page("index").expect("home");
    assert_eq!(home.title, "Home");
    assert!(home.html.contains("Welcome"), "{}", home.html);
    assert!(home.html.contains("col-span-6"), "{}", home.html);
}

#[test]
fn editing_a_page_invalidates_its_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = dir.path().join("content");
    fs::create_dir_all(&content).expect("content dir");
    let engine =
        GutenwindEngine::with_roots(SiteConfig::default(), content.clone(), dir.path().join("build"))
            .expect("engine");

    let page = |text: &str| {
        format!(
            r#"{{"title":"Notes","blocksJSON":[{{"blockName":"core/paragraph","attrs":{{}},"innerHTML":"<p>{text}</p>"}}]}}"#
        )
    };
    fs::write(content.join("notes.json"), page("before")).expect("write");
    assert!(engine.render_page("notes").expect("render").html.contains("before"));

    // Push the cached copy into the past so the rewrite is strictly newer.
    let cached = dir.path().join("build/notes.html");
    let old = fs::File::options().write(true).open(&cached).expect("cached file");
    old.set_modified(std::time::SystemTime::UNIX_EPOCH)
        .expect("set mtime");

    fs::write(content.join("notes.json"), page("after")).expect("rewrite");
    let rendered = engine.render_page("notes").expect("render");
    assert_eq!(rendered.cached, Some(false));
    assert!(rendered.html.contains("after"));
}

#[test]
fn safelist_is_written_for_the_sample_site() {
    let build = tempfile::tempdir().expect("tempdir");
    let engine = sample_engine(build.path());
    let path = build.path().join("safelist.json");

    let classes = write_safelist(&engine, &path).expect("safelist");
    assert!(classes.iter().any(|c| c == "heading-block"));
    assert!(classes.iter().any(|c| c == "col-span-6"));

    let written: Vec<String> =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(written, classes);
}
