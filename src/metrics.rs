use indexmap::{IndexMap, IndexSet};
use petgraph::graph::NodeIndex;

use crate::graph::DependencyGraph;

/// The five per-package numbers this whole project exists to compute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
	pub ca: usize,
	pub ce: usize,
	pub a: f64,
	pub i: f64,
	pub d: f64,
}

/// Computes Ca/Ce/A/I/D for every package currently in `graph`.
///
/// `I` uses only the package's own volatility on the Ce term, per the source
/// design: afferent counts are unweighted on that side of the ratio.
pub fn compute_metrics(graph: &DependencyGraph) -> IndexMap<String, Metrics> {
	let mut metrics = IndexMap::new();

	for index in graph.node_indices() {
		let package = graph.package(index);

		let ca = graph.afferents(index).count();
		let ce = graph.efferents(index).count();

		let abstract_count = package.classes.iter().filter(|name| graph.class(name).is_some_and(|c| c.is_abstract)).count();
		let a = if package.classes.is_empty() { 0.0 } else { abstract_count as f64 / package.classes.len() as f64 };

		let v = package.volatility as f64;
		let denom = ce as f64 * v + ca as f64;
		let i = if denom > 0.0 { (ce as f64 * v) / denom } else { 0.0 };

		let d = (a + i - 1.0).abs();

		metrics.insert(package.name.clone(), Metrics { ca, ce, a, i, d });
	}

	metrics
}

/// Marks `containsCycle` on every package that sits on a cycle. A package is
/// on a cycle iff its strongly connected component has more than one member;
/// a lone node can only be its own component's single member since self-edges
/// are rejected in `add_class`, so there is no size-1-but-cyclic case to miss.
pub fn mark_cycles(graph: &mut DependencyGraph) {
	for component in graph.sccs() {
		if component.len() > 1 {
			for index in component {
				graph.set_contains_cycle(index, true);
			}
		}
	}
}

/// Every simple cycle through `start`, as an ordered list of package names
/// per cycle, with the overall result in lexicographic order.
pub fn collect_all_cycles(graph: &DependencyGraph, start: &str) -> Vec<Vec<String>> {
	let Some(start_index) = graph.find_package(start) else { return Vec::new() };

	let mut cycles = Vec::new();
	let mut path = vec![start_index];
	let mut on_path: IndexSet<NodeIndex> = IndexSet::from([start_index]);
	walk(graph, start_index, start_index, &mut path, &mut on_path, &mut cycles);

	let mut named: Vec<Vec<String>> = cycles
		.into_iter()
		.map(|cycle: Vec<NodeIndex>| cycle.into_iter().map(|index| graph.package(index).name.clone()).collect())
		.collect();
	named.sort();
	named
}

fn walk(
	graph: &DependencyGraph,
	start: NodeIndex,
	current: NodeIndex,
	path: &mut Vec<NodeIndex>,
	on_path: &mut IndexSet<NodeIndex>,
	cycles: &mut Vec<Vec<NodeIndex>>,
) {
	for next in graph.efferents(current) {
		if next == start {
			cycles.push(path.clone());
		} else if !on_path.contains(&next) {
			on_path.insert(next);
			path.push(next);
			walk(graph, start, next, path, on_path, cycles);
			path.pop();
			on_path.shift_remove(&next);
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use classfile::ParsedClass;
	use indexmap::IndexSet;
	use crate::graph::DependencyGraph;
	use super::{compute_metrics, mark_cycles};

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

	#[test]
	fn two_isolated_packages_have_distance_one() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &[])).unwrap();
		graph.add_class(&class("b.Y", "b", &[])).unwrap();

		let metrics = compute_metrics(&graph);
		assert_eq!(metrics["a"].ca, 0);
		assert_eq!(metrics["a"].ce, 0);
		assert_eq!(metrics["a"].a, 0.0);
		assert_eq!(metrics["a"].i, 0.0);
		assert_eq!(metrics["a"].d, 1.0);
	}

	#[test]
	fn linear_dependency_sets_instability() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b"])).unwrap();
		graph.add_class(&class("b.Y", "b", &[])).unwrap();

		let metrics = compute_metrics(&graph);
		assert_eq!(metrics["a"].ce, 1);
		assert_eq!(metrics["a"].ca, 0);
		assert_eq!(metrics["a"].i, 1.0);
		assert_eq!(metrics["b"].ce, 0);
		assert_eq!(metrics["b"].ca, 1);
		assert_eq!(metrics["b"].i, 0.0);
	}

	#[test]
	fn two_node_cycle_marks_both_packages() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b"])).unwrap();
		graph.add_class(&class("b.Y", "b", &["a"])).unwrap();

		mark_cycles(&mut graph);

		for package in graph.packages() {
			assert!(package.contains_cycle, "{} should be marked cyclic", package.name);
		}
	}

	#[test]
	fn three_node_cycle_with_dangling_dependent() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b"])).unwrap();
		graph.add_class(&class("b.Y", "b", &["c"])).unwrap();
		graph.add_class(&class("c.Z", "c", &["a"])).unwrap();
		graph.add_class(&class("d.W", "d", &["a"])).unwrap();

		mark_cycles(&mut graph);

		let by_name = |n: &str| graph.packages().into_iter().find(|p| p.name == n).unwrap().contains_cycle;
		assert!(by_name("a"));
		assert!(by_name("b"));
		assert!(by_name("c"));
		assert!(!by_name("d"));

		let metrics = compute_metrics(&graph);
		assert_eq!(metrics["a"].ca, 2);
		assert_eq!(metrics["a"].ce, 1);
	}

	#[test]
	fn diamond_reachable_via_cross_edge_marks_all_four() {
		// a -> b, a -> c, b -> d, c -> d, d -> a. A DFS from `a` that shares a
		// single visited set across branches can finish `d` while exploring the
		// `b` branch, then silently skip it when the `c` branch reaches it too.
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b", "c"])).unwrap();
		graph.add_class(&class("b.Y", "b", &["d"])).unwrap();
		graph.add_class(&class("c.Z", "c", &["d"])).unwrap();
		graph.add_class(&class("d.W", "d", &["a"])).unwrap();

		mark_cycles(&mut graph);

		for package in graph.packages() {
			assert!(package.contains_cycle, "{} should be marked cyclic", package.name);
		}
	}
}
