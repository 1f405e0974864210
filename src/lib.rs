// Shirasagi image delivery library

pub mod assets;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_optimizer;
pub mod logging;
pub mod metrics;
pub mod origin;
pub mod pipeline;
pub mod proxy;
pub mod resolver;
pub mod server;
