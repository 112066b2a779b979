use std::path::Path;

use actix_files::Files;
use actix_web::{HttpResponse, HttpResponseBuilder, Responder, get, post, web};
use handlebars::Handlebars;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gutenwind::safelist::{collect_classes, site_classes};
use crate::gutenwind::types::{BlockSource, PostContext, RenderedPage};
use crate::gutenwind::{GutenwindEngine, Node, SiteConfig, render_html};

pub fn config(conf: &mut web::ServiceConfig, static_root: &Path) {
    let api_scope = web::scope("/api")
        .service(healthcheck_handler)
        .service(render_handler)
        .service(safelist_handler);

    // Catch-all route keeps in sync with content changes without restart
    let site_scope = web::scope("").route("/{slug:.*}", web::get().to(render_slug));

    conf.service(api_scope);
    conf.service(
        Files::new("/static", static_root)
            .prefer_utf8(true)
            .use_last_modified(true),
    );
    conf.service(site_scope);
}

#[get("/health")]
pub async fn healthcheck_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "pong" }))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub blocks: BlockSource,
    #[serde(default)]
    pub post: Option<PostContext>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
    pub classes: Vec<String>,
    pub nodes: Vec<Node>,
}

/// Render posted block JSON without touching the content root or cache.
#[post("/render")]
pub async fn render_handler(
    engine: web::Data<GutenwindEngine>,
    body: web::Json<RenderRequest>,
) -> impl Responder {
    let RenderRequest { blocks, post } = body.into_inner();
    let nodes = engine.render_blocks(&blocks.into_blocks(), post.unwrap_or_default());
    HttpResponse::Ok().json(RenderResponse {
        html: render_html(&nodes),
        classes: collect_classes(&nodes),
        nodes,
    })
}

#[get("/safelist")]
pub async fn safelist_handler(engine: web::Data<GutenwindEngine>) -> impl Responder {
    HttpResponse::Ok().json(site_classes(&engine))
}

/// `""` -> `index`, `blog/` -> `blog/index`, `/about` -> `about`.
pub fn canonical_slug(raw_slug: &str) -> String {
    let trimmed = raw_slug.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else if raw_slug.ends_with('/') {
        format!("{}/index", trimmed)
    } else {
        trimmed.to_string()
    }
}

async fn render_slug(
    path: web::Path<String>,
    engine: web::Data<GutenwindEngine>,
    hb: web::Data<Handlebars<'static>>,
) -> impl Responder {
    let mut slug = canonical_slug(&path.into_inner());
    if slug.split('/').any(|segment| segment == "..") {
        return HttpResponse::NotFound().finish();
    }
    if !engine.page_exists(&slug) {
        // `about/` may be stored as `about.json` rather than `about/index.json`
        match slug.strip_suffix("/index").map(str::to_string) {
            Some(parent) if engine.page_exists(&parent) => slug = parent,
            _ => return HttpResponse::NotFound().finish(),
        }
    }
    let page = match engine.render_page(&slug) {
        Ok(page) => page,
        Err(err) => {
            error!("failed to render page {}: {:#}", slug, err);
            return HttpResponse::NotFound().finish();
        }
    };

    let ctx = page_context(&engine, page);
    render(hb, "page", json!(ctx), HttpResponse::Ok())
}

fn render(
    hb: web::Data<Handlebars<'static>>,
    template: &str,
    data: serde_json::Value,
    mut builder: HttpResponseBuilder,
) -> HttpResponse {
    match hb.render(template, &data) {
        Ok(body) => builder.content_type("text/html; charset=utf-8").body(body),
        Err(err) => HttpResponse::InternalServerError().body(format!("Template error: {}", err)),
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    site: SiteContext<'a>,
    nav: Vec<NavItem>,
    page: RenderedPage,
    footer: FooterContext,
}

#[derive(Serialize)]
struct SiteContext<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<&'a str>,
}

#[derive(Serialize, Clone)]
struct NavItem {
    title: String,
    path: String,
    #[serde(skip_serializing_if = "is_false")]
    current: bool,
}

#[derive(Serialize)]
struct FooterContext {
    version: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn page_context(engine: &GutenwindEngine, page: RenderedPage) -> PageContext<'_> {
    let config: &SiteConfig = &engine.config;
    PageContext {
        site: SiteContext {
            title: &config.site.title,
            base_url: config.site.base_url.as_deref(),
        },
        nav: build_nav(engine, &page.slug),
        page,
        footer: FooterContext {
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

fn build_nav(engine: &GutenwindEngine, current_slug: &str) -> Vec<NavItem> {
    engine
        .source_slugs()
        .into_iter()
        .map(|slug| {
            let path = match slug.strip_suffix("index") {
                Some(parent) if parent.is_empty() || parent.ends_with('/') => format!("/{parent}"),
                _ => format!("/{slug}/"),
            };
            NavItem {
                title: humanize_segment(slug.rsplit('/').next().unwrap_or(&slug)),
                current: slug == current_slug,
                path,
            }
        })
        .collect()
}

fn humanize_segment(segment: &str) -> String {
    let words = segment.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => words,
    }
}
