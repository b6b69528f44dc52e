use indexmap::{IndexMap, IndexSet};
use log::trace;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use classfile::ParsedClass;

use crate::error::AnalysisError;

/// One package node in the dependency graph.
///
/// Afferent and efferent sets are deliberately not stored here: they are
/// derived views over the graph's incoming/outgoing edges, which makes the
/// bidirectional invariant structural instead of something that has to be
/// kept in sync by hand.
#[derive(Debug, Clone)]
pub struct PackageNode {
	pub name: String,
	pub classes: IndexSet<String>,
	pub volatility: u8,
	pub contains_cycle: bool,
}

impl PackageNode {
	fn new(name: String) -> PackageNode {
		PackageNode { name, classes: IndexSet::new(), volatility: 1, contains_cycle: false }
	}
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
	pub name: String,
	pub package_name: String,
	pub is_abstract: bool,
	pub source_file: String,
	pub imported_packages: IndexSet<String>,
}

/// Holds the canonical set of packages and classes for one analysis session.
///
/// Grounded on `version_graph.rs`'s `Graph<Version, Diffs>` plus a side
/// `HashMap<String, NodeIndex>` for name lookup; this uses `IndexMap` instead
/// so that `packages()` without an explicit sort still has a deterministic
/// (insertion-order) fallback ordering.
pub struct DependencyGraph {
	graph: DiGraph<PackageNode, ()>,
	package_index: IndexMap<String, NodeIndex>,
	classes: IndexMap<String, ClassInfo>,
}

impl DependencyGraph {
	pub fn new() -> DependencyGraph {
		DependencyGraph { graph: DiGraph::new(), package_index: IndexMap::new(), classes: IndexMap::new() }
	}

	pub fn get_or_create_package(&mut self, name: &str) -> NodeIndex {
		if let Some(&index) = self.package_index.get(name) {
			return index;
		}
		let index = self.graph.add_node(PackageNode::new(name.to_owned()));
		self.package_index.insert(name.to_owned(), index);
		index
	}

	pub fn find_package(&self, name: &str) -> Option<NodeIndex> {
		self.package_index.get(name).copied()
	}

	pub fn package(&self, index: NodeIndex) -> &PackageNode {
		&self.graph[index]
	}

	pub fn class(&self, name: &str) -> Option<&ClassInfo> {
		self.classes.get(name)
	}

	/// Inserts a parsed class into its home package and wires up efferent
	/// edges to every package it imports. Idempotent: re-adding the same
	/// class with the same imports changes nothing.
	pub fn add_class(&mut self, parsed: &ParsedClass) -> Result<(), AnalysisError> {
		let home = self.get_or_create_package(&parsed.package_name);
		self.graph[home].classes.insert(parsed.name.clone());

		self.classes.insert(parsed.name.clone(), ClassInfo {
			name: parsed.name.clone(),
			package_name: parsed.package_name.clone(),
			is_abstract: parsed.is_abstract,
			source_file: parsed.source_file.clone(),
			imported_packages: parsed.imported_packages.clone(),
		});

		for imported in &parsed.imported_packages {
			let dep = self.get_or_create_package(imported);
			if dep == home {
				return Err(AnalysisError::InvariantViolation {
					message: format!("class {} imports its own package {}", parsed.name, parsed.package_name),
				});
			}
			if !self.graph.contains_edge(home, dep) {
				trace!("{} -> {}", parsed.package_name, imported);
				self.graph.add_edge(home, dep, ());
			}
		}

		Ok(())
	}

	pub fn efferents(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.neighbors_directed(index, Direction::Outgoing)
	}

	pub fn afferents(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.neighbors_directed(index, Direction::Incoming)
	}

	pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.node_indices()
	}

	/// Strongly connected components, as returned by Tarjan's algorithm. A
	/// component of size 1 is only a cycle if its single node has a self-loop,
	/// which `add_class` never allows, so callers can treat size > 1 as
	/// "on a cycle" without checking for self-loops separately.
	pub fn sccs(&self) -> Vec<Vec<NodeIndex>> {
		petgraph::algo::tarjan_scc(&self.graph)
	}

	pub fn set_contains_cycle(&mut self, index: NodeIndex, value: bool) {
		self.graph[index].contains_cycle = value;
	}

	/// Packages in ascending name order, matching the default `PackageComparator`.
	pub fn packages(&self) -> Vec<&PackageNode> {
		let mut packages: Vec<_> = self.graph.node_weights().collect();
		packages.sort_by(|a, b| a.name.cmp(&b.name));
		packages
	}

	/// Collapses every package whose name starts with a component prefix into
	/// a synthetic package named for that prefix. One-shot; run once before
	/// metrics. Classes keep their identity; only `packageName` is rewritten.
	/// Edges that would become self-edges under the rewrite are dropped.
	pub fn merge_components(&mut self, components: &[String]) {
		if components.is_empty() {
			return;
		}

		let mut rewritten_classes: Vec<ClassInfo> = self.classes.values().cloned().collect();
		for class in &mut rewritten_classes {
			if let Some(component) = components.iter().find(|prefix| class.package_name.starts_with(prefix.as_str())) {
				class.package_name = component.clone();
			}
			class.imported_packages = class
				.imported_packages
				.iter()
				.map(|imported| {
					components
						.iter()
						.find(|prefix| imported.starts_with(prefix.as_str()))
						.cloned()
						.unwrap_or_else(|| imported.clone())
				})
				.collect();
			class.imported_packages.shift_remove(&class.package_name);
		}

		let mut rebuilt = DependencyGraph::new();
		for class in rewritten_classes {
			let home = rebuilt.get_or_create_package(&class.package_name);
			rebuilt.graph[home].classes.insert(class.name.clone());
			for imported in &class.imported_packages {
				let dep = rebuilt.get_or_create_package(imported);
				if dep != home && !rebuilt.graph.contains_edge(home, dep) {
					rebuilt.graph.add_edge(home, dep, ());
				}
			}
			rebuilt.classes.insert(class.name.clone(), class);
		}

		*self = rebuilt;
	}
}

impl Default for DependencyGraph {
	fn default() -> Self {
		DependencyGraph::new()
	}
}

#[cfg(test)]
mod testing {
	use classfile::ParsedClass;
	use indexmap::IndexSet;
	use super::DependencyGraph;

	fn class(name: &str, package_name: &str, imports: &[&str]) -> ParsedClass {
		ParsedClass {
			name: name.to_owned(),
			package_name: package_name.to_owned(),
			is_abstract: false,
			source_file: "Unknown".to_owned(),
			imported_packages: imports.iter().map(|s| s.to_string()).collect::<IndexSet<_>>(),
			minor_version: 0,
			major_version: 61,
		}
	}

	fn edge_count(graph: &DependencyGraph) -> usize {
		graph.node_indices().map(|index| graph.efferents(index).count()).sum()
	}

	#[test]
	fn merging_into_components_never_increases_edge_count() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("com.acme.core.X", "com.acme.core", &["com.acme.api"])).unwrap();
		graph.add_class(&class("com.acme.api.Y", "com.acme.api", &["com.other.Z"])).unwrap();
		graph.add_class(&class("com.other.Z", "com.other", &[])).unwrap();

		let before = edge_count(&graph);
		graph.merge_components(&["com.acme".to_owned()]);
		let after = edge_count(&graph);

		assert!(after <= before);
		assert_eq!(graph.packages().len(), 2); // com.acme (merged) and com.other
	}

	#[test]
	fn self_edge_on_add_class_is_an_invariant_violation() {
		let mut graph = DependencyGraph::new();
		let result = graph.add_class(&class("a.X", "a", &["a"]));
		assert!(result.is_err());
	}
}
