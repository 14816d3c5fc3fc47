use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, web, App, HttpRequest, HttpServer};
use tracing::*;
use tracing_actix_web::TracingLogger;

use super::pages;

fn json_error_handler(error: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    warn!("Problem with json: {error}");
    error.into()
}

// Start REST API server with the desired address
pub async fn run(server_address: &str) -> Result<(), std::io::Error> {
    let server_address = server_address.to_string();

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .send_wildcard()
                    .max_age(3600),
            )
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            // Versioned API routes (canonical)
            .service(web::scope("/v1").configure(configure_api_routes))
            // Backward-compatible flat routes (same handlers, for existing clients)
            .configure(configure_api_routes)
            // Static file serving (catch-all, must be last so API routes match first)
            .route("/", web::get().to(pages::root))
            .route(r"/{filename:.+}", web::get().to(pages::root))
    })
    .bind(server_address)
    .expect("Failed starting web API")
    .run()
    .await
}

/// Register all API routes on a `ServiceConfig`.
/// Used for both the `/v1` scope and the backward-compatible flat routes.
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/info", web::get().to(pages::info))
        .route("/stats", web::get().to(pages::stats))
        .route("/processes", web::get().to(pages::processes))
        .route("/interfaces", web::get().to(pages::interfaces))
        .route("/log", web::get().to(pages::log));
}
