use system_status_manager::{cli, logger, server, settings, stats};

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    // CLI should be started before logger to allow control over verbosity
    cli::manager::init();
    // Logger should start before everything else to register any log information
    logger::manager::init();
    settings::manager::init(cli::manager::settings_file());
    stats::manager::init();

    server::manager::run(cli::manager::server_address()).await
}
