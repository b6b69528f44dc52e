/// Accepts or rejects a package name by an ordered list of prefixes.
///
/// Used by the reader to drop uninteresting imports (standard library
/// packages, and the like) before they ever reach a dependency graph.
///
/// A trailing `*` on a configured entry is stripped at construction time,
/// matching is always prefix-based, so `"com.foo"` and `"com.foo*"` behave
/// identically. This mirrors the source tool's behavior exactly rather than
/// "fixing" it into a glob matcher; see `DESIGN.md`.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
	prefixes: Vec<String>,
}

impl PackageFilter {
	/// Builds a filter from an explicit list of prefixes. Empty entries are
	/// discarded, and a trailing `*` is stripped from any entry that has one.
	pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>) -> PackageFilter {
		let prefixes = prefixes.into_iter()
			.map(Into::into)
			.map(|entry| entry.strip_suffix('*').map(str::to_owned).unwrap_or(entry))
			.filter(|entry| !entry.is_empty())
			.collect();

		PackageFilter { prefixes }
	}

	/// A filter that accepts every package name.
	pub fn accept_all() -> PackageFilter {
		PackageFilter { prefixes: Vec::new() }
	}

	/// Returns `false` iff some configured prefix is a prefix of `name`.
	pub fn accept(&self, name: &str) -> bool {
		!self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
	}
}
