use clap::Parser;

use system_status_manager::client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = client::manager::Args::parse();
    client::manager::run(args).await
}
