use std::io::Cursor;
use std::path::Path;

use classfile::{ParsedClass, PackageFilter};
use log::{info, warn};

use crate::error::AnalysisError;
use crate::graph::DependencyGraph;
use crate::metrics::{self, Metrics};
use crate::collector::FileCollector;

/// A capability interface delivered once per successfully parsed class, in
/// collector order, on the analyzer's own thread.
pub trait ParseListener {
	fn on_parsed_class(&mut self, class: &ParsedClass);
}

/// Configuration for one analysis session.
pub struct AnalyzerConfig {
	pub filter: PackageFilter,
	pub components: Vec<String>,
	pub accept_inner_classes: bool,
}

impl Default for AnalyzerConfig {
	fn default() -> Self {
		AnalyzerConfig { filter: PackageFilter::accept_all(), components: Vec::new(), accept_inner_classes: true }
	}
}

/// One package's final report line: its name plus its five computed metrics
/// and whether it participates in a dependency cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
	pub name: String,
	pub metrics: Metrics,
	pub contains_cycle: bool,
}

/// Orchestrates a full session: collect, parse, ingest, optionally merge
/// components, then compute metrics and cycles.
pub struct Analyzer {
	config: AnalyzerConfig,
	collector: FileCollector,
	listeners: Vec<Box<dyn ParseListener>>,
}

impl Analyzer {
	pub fn new(config: AnalyzerConfig) -> Analyzer {
		let collector = FileCollector::new(config.accept_inner_classes);
		Analyzer { config, collector, listeners: Vec::new() }
	}

	pub fn add_listener(&mut self, listener: Box<dyn ParseListener>) {
		self.listeners.push(listener);
	}

	/// Runs a full session over `roots`, returning packages in name order.
	pub fn analyze(&mut self, roots: &[&Path]) -> Result<Vec<PackageReport>, AnalysisError> {
		let mut graph = DependencyGraph::new();

		for root in roots {
			info!("collecting class files from {root:?}");
			let entries = self.collector.collect(root)?;

			for (name, bytes) in entries {
				let mut cursor = Cursor::new(bytes);
				match classfile::parse(&mut cursor, &self.config.filter) {
					Ok(parsed) => {
						for listener in &mut self.listeners {
							listener.on_parsed_class(&parsed);
						}
						graph.add_class(&parsed)?;
					}
					Err(e) => warn!("skipping {name}: {e}"),
				}
			}
		}

		if !self.config.components.is_empty() {
			graph.merge_components(&self.config.components);
		}

		metrics::mark_cycles(&mut graph);
		let computed = metrics::compute_metrics(&graph);

		let reports = graph
			.packages()
			.into_iter()
			.map(|package| PackageReport {
				name: package.name.clone(),
				metrics: computed[&package.name],
				contains_cycle: package.contains_cycle,
			})
			.collect();

		Ok(reports)
	}
}
