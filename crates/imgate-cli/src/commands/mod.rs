pub mod config;
pub mod disco;
pub mod transports;
mod utils;
