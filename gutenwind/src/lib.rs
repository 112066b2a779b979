pub mod gutenwind;
pub mod handlers;

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
use anyhow::{Context, Result};
use handlebars::Handlebars;
use log::{error, info};
use walkdir::WalkDir;

use crate::gutenwind::safelist::write_safelist;
use crate::gutenwind::{GutenwindEngine, SiteConfig};

pub async fn run() -> io::Result<()> {
    let config = SiteConfig::load();
    let server_cfg = config.server.clone();
    let static_root = config.static_root();
    let safelist_path = config.safelist_path();

    let engine = GutenwindEngine::new(config).map_err(io::Error::other)?;
    if let Err(err) = engine.prebuild_all() {
        error!("prebuild failed: {err:#}");
    }
    match write_safelist(&engine, &safelist_path) {
        Ok(classes) => info!("Safelist holds {} classes", classes.len()),
        Err(err) => error!("failed to write safelist: {err:#}"),
    }

    // Build the shared Handlebars registry once for all workers.
    let handlebars = build_handlebars().map_err(io::Error::other)?;
    let engine = web::Data::new(engine);
    let handlebars = web::Data::new(handlebars);

    let max_bytes = server_cfg.max_payload_bytes();
    let cors_origins = server_cfg.cors_origins.clone();

    info!(
        "Gutenwind is listening on: http://{}:{}",
        server_cfg.host, server_cfg.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(engine.clone())
            .app_data(handlebars.clone())
            .app_data(web::PayloadConfig::new(max_bytes))
            .app_data(web::JsonConfig::default().limit(max_bytes))
            .wrap(build_cors(&cors_origins))
            .configure(|conf| handlers::config(conf, &static_root))
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await
}

fn build_cors(origins: &[String]) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_any_origin();
    }

    origins
        .iter()
        .fold(base, |c, origin| c.allowed_origin(origin))
        .supports_credentials()
}

pub fn build_handlebars() -> Result<Handlebars<'static>> {
    build_handlebars_from(&Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"))
}

/// Register every .hbs file under `templates_dir`: top-level files become
/// templates named by their stem, nested ones partials named by relative path.
pub fn build_handlebars_from(templates_dir: &Path) -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    for entry in WalkDir::new(templates_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && e.path().extension() == Some(OsStr::new("hbs")))
    {
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(templates_dir) else {
            continue;
        };
        let rel_no_ext = rel.with_extension("");
        let name = rel_no_ext.to_string_lossy().replace('\\', "/");

        if rel.parent().map(|p| p == Path::new("")).unwrap_or(true) {
            handlebars
                .register_template_file(&name, path)
                .with_context(|| format!("registering template {}", path.display()))?;
        } else {
            let partial_src = fs::read_to_string(path)
                .with_context(|| format!("reading partial {}", path.display()))?;
            handlebars
                .register_partial(&name, partial_src)
                .with_context(|| format!("registering partial {name}"))?;
        }
    }

    Ok(handlebars)
}
