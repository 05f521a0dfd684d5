pub mod analyzers;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod records;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;
