//! Aggregations behind the six report charts.
//!
//! Each analyzer is a pure function of the loaded [`DataSet`](crate::loader::DataSet)
//! or its submissions; chart rendering lives in [`crate::charts`].

pub mod cluster;
pub mod explainer;
pub mod features;
pub mod heatmap;
pub mod network;
pub mod radar;
pub mod timeline;
pub mod types;
