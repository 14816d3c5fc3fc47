use std::{ffi::OsStr, path::Path};

use actix_web::{web::Json, HttpRequest, HttpResponse};
use include_dir::{include_dir, Dir};
use serde::Serialize;

use crate::{
    cli,
    collector::{
        interface::{self, InterfaceInfo},
        process::{self, ProcessInfo},
    },
    logger,
    server::error::{Error, Result},
    settings,
    stats::{self, types::Snapshot},
};

#[derive(Debug, Serialize)]
pub struct Info {
    /// Name of the program
    pub name: String,
    /// Version/tag
    pub version: String,
    /// Git SHA
    pub sha: String,
}

pub fn new_info() -> Info {
    Info {
        name: env!("CARGO_PKG_NAME").into(),
        version: cli::manager::build_version(),
        sha: option_env!("VERGEN_GIT_SHA").unwrap_or("?").into(),
    }
}

static DIST: Dir<'_> = include_dir!("frontend/dist");

fn load_file(file_name: &str) -> Option<&'static str> {
    DIST.get_file(file_name)
        .and_then(|file| file.contents_utf8())
}

pub async fn root(req: HttpRequest) -> Result<HttpResponse> {
    let raw = req.match_info().get("filename").unwrap_or("");
    let filename = if raw.is_empty() { "index.html" } else { raw };

    // Try exact file match
    if let Some(content) = load_file(filename) {
        let extension = Path::new(filename)
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("");
        let mime = actix_files::file_extension_to_mime(extension).to_string();
        return Ok(HttpResponse::Ok().content_type(mime).body(content));
    }

    // Fallback: serve index.html, the dashboard is a single page
    if let Some(content) = load_file("index.html") {
        let mime = actix_files::file_extension_to_mime("html").to_string();
        return Ok(HttpResponse::Ok().content_type(mime).body(content));
    }

    Err(Error::NotFound(format!(
        "Page does not exist: {filename:?}"
    )))
}

/// Provide information about the running service
pub async fn info() -> Result<Json<Info>> {
    Ok(Json(new_info()))
}

/// One collection pass: delta-sampled rates plus point-in-time metrics.
/// Always answers; fields degrade to null independently.
pub async fn stats() -> Result<Json<Snapshot>> {
    Ok(Json(stats::manager::snapshot()))
}

/// Top processes by CPU share
pub async fn processes() -> Result<Json<Vec<ProcessInfo>>> {
    Ok(Json(process::top_processes(
        settings::manager::process_list_size(),
    )))
}

/// Network interfaces with status, MAC and addresses
pub async fn interfaces() -> Result<Json<Vec<InterfaceInfo>>> {
    Ok(Json(interface::network_interfaces()))
}

/// Recent log lines from the in-memory history ring
pub async fn log() -> Result<Json<Vec<String>>> {
    let history = logger::manager::HISTORY.lock().map_err(|error| {
        Error::Internal(format!("Failed locking the log history: {error}"))
    })?;
    let (_receiver, lines) = history.subscribe();
    Ok(Json(lines))
}
