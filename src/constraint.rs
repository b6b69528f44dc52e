use indexmap::{IndexMap, IndexSet};

use crate::graph::DependencyGraph;

/// One package in a hand-built expected graph: a name plus the efferent and
/// afferent edges the user declares for it via [`DependencyConstraint::depends_upon`].
#[derive(Debug, Default, Clone)]
struct ExpectedPackage {
	efferents: IndexSet<String>,
	afferents: IndexSet<String>,
}

/// A user-constructed expected package set, built up with [`package`] and
/// [`depends_upon`], and compared against an analyzed graph with [`matches`].
///
/// [`package`]: DependencyConstraint::package
/// [`depends_upon`]: DependencyConstraint::depends_upon
/// [`matches`]: DependencyConstraint::matches
#[derive(Debug, Default)]
pub struct DependencyConstraint {
	packages: IndexMap<String, ExpectedPackage>,
}

impl DependencyConstraint {
	pub fn new() -> DependencyConstraint {
		DependencyConstraint::default()
	}

	/// Declares a package by name, creating it if it doesn't exist yet.
	pub fn package(&mut self, name: &str) -> &mut Self {
		self.packages.entry(name.to_owned()).or_default();
		self
	}

	/// Declares that `from` depends upon `to`: records `from.efferents ← to`
	/// and `to.afferents ← from`, creating either package as needed.
	pub fn depends_upon(&mut self, from: &str, to: &str) -> &mut Self {
		self.package(from);
		self.package(to);
		self.packages.get_mut(from).expect("just inserted").efferents.insert(to.to_owned());
		self.packages.get_mut(to).expect("just inserted").afferents.insert(from.to_owned());
		self
	}

	/// Returns `false` if the package counts differ, or if any expected
	/// package is missing from `actual`, or if its afferent/efferent name
	/// sets don't match exactly.
	pub fn matches(&self, actual: &DependencyGraph) -> bool {
		let actual_packages = actual.packages();
		if actual_packages.len() != self.packages.len() {
			return false;
		}

		for (name, expected) in &self.packages {
			let Some(index) = actual.find_package(name) else { return false };

			let actual_efferents: IndexSet<String> = actual.efferents(index).map(|n| actual.package(n).name.clone()).collect();
			let actual_afferents: IndexSet<String> = actual.afferents(index).map(|n| actual.package(n).name.clone()).collect();

			if actual_efferents != expected.efferents || actual_afferents != expected.afferents {
				return false;
			}
		}

		true
	}
}

#[cfg(test)]
mod testing {
	use classfile::ParsedClass;
	use indexmap::IndexSet;
	use crate::graph::DependencyGraph;
	use super::DependencyConstraint;

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
	fn round_trip_of_comparison() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b"])).unwrap();
		graph.add_class(&class("b.Y", "b", &[])).unwrap();

		let mut expected = DependencyConstraint::new();
		expected.depends_upon("a", "b");

		assert!(expected.matches(&graph));
	}

	#[test]
	fn mismatched_edge_fails() {
		let mut graph = DependencyGraph::new();
		graph.add_class(&class("a.X", "a", &["b"])).unwrap();
		graph.add_class(&class("b.Y", "b", &[])).unwrap();

		let mut expected = DependencyConstraint::new();
		expected.depends_upon("b", "a");

		assert!(!expected.matches(&graph));
	}
}
