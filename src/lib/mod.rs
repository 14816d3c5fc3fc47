#[macro_use]
extern crate lazy_static;
extern crate tracing;

pub mod cli;
pub mod client;
pub mod collector;
pub mod logger;
pub mod server;
pub mod settings;
pub mod stats;
