//! Aggregates parsed class files into a package dependency graph and
//! computes Ca/Ce/A/I/D plus cycle membership for each package.

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod constraint;
pub mod error;
pub mod graph;
pub mod metrics;

pub use analyzer::{Analyzer, AnalyzerConfig, PackageReport, ParseListener};
pub use constraint::DependencyConstraint;
pub use error::AnalysisError;
pub use graph::DependencyGraph;
