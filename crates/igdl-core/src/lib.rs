pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod preview;
pub mod resolver;
pub mod session;
pub mod validate;
