//! Learning algorithms used by the report.
//!
//! Everything here is retrained on every run and never written to disk.

pub mod gbdt;
pub mod kmeans;
pub mod preprocess;

pub use gbdt::{Booster, GbdtParams, ImportanceType, Node, Tree};
pub use kmeans::{Clustering, KMeans};
pub use preprocess::{StandardScaler, Split, accuracy, train_test_split};
