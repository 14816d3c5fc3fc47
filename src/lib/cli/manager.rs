use std::sync::Arc;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version = Box::leak(build_version().into_boxed_str()) as &str, about = env!("CARGO_PKG_DESCRIPTION"))]
struct Args {
    /// Sets the address for the REST API server
    #[arg(
        long,
        value_name = "IP:PORT",
        default_value = "0.0.0.0:3040",
        env = "SSM_REST_SERVER"
    )]
    rest_server: String,

    /// Settings file path. Relative names resolve inside the user config
    /// directory; the file is created with defaults when missing.
    #[arg(long, value_name = "FILE")]
    settings_file: Option<String>,

    /// Delete settings file content before starting.
    #[arg(long)]
    reset: bool,

    /// Turn all log categories up to Debug, for more information check RUST_LOG env variable.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct Manager {
    args: Args,
}

lazy_static! {
    static ref MANAGER: Arc<Manager> = Arc::new(Manager::new());
}

impl Manager {
    fn new() -> Self {
        Self {
            args: Args::parse(),
        }
    }
}

// Construct our manager, should be done inside main
pub fn init() {
    MANAGER.as_ref();
}

// Check if the verbosity parameter was used
pub fn is_verbose() -> bool {
    MANAGER.args.verbose
}

pub fn is_reset() -> bool {
    MANAGER.args.reset
}

// Return the desired address for the REST API
pub fn server_address() -> &'static str {
    &MANAGER.args.rest_server
}

pub fn settings_file() -> Option<&'static str> {
    MANAGER.args.settings_file.as_deref()
}

// Return the command line used to start this application
pub fn command_line_string() -> String {
    std::env::args().collect::<Vec<String>>().join(" ")
}

pub fn build_version() -> String {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("dev")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arguments() {
        assert!(!is_verbose());
        assert!(!is_reset());
        assert_eq!(server_address(), "0.0.0.0:3040");
        assert_eq!(settings_file(), None);
    }
}
