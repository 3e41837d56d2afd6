pub mod clusterer;
pub mod config;
pub mod error;
pub mod progress;
pub mod registry;
pub mod resolver;
