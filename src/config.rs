use std::path::{Path, PathBuf};

use log::trace;

use crate::error::AnalysisError;

/// The embedded resource consulted when neither an explicit path nor a
/// per-user config file is found. Grounded on the "parse plain text into
/// typed data, fail loudly with context" idiom used for coordinate and POM
/// parsing elsewhere in the corpus, rather than a dedicated `.properties` crate.
const EMBEDDED_DEFAULT: &str = include_str!("../resources/default.properties");

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
	pub filter_prefixes: Vec<String>,
	pub component_prefixes: Vec<String>,
}

/// Loads filter prefixes and component definitions from a `key=value`
/// property file, following the search order: an explicit path, then
/// `<user-home>/<default_name>`, then the embedded default.
pub struct ConfigLoader {
	default_name: String,
}

impl ConfigLoader {
	pub fn new(default_name: impl Into<String>) -> ConfigLoader {
		ConfigLoader { default_name: default_name.into() }
	}

	pub fn load(&self, explicit_path: Option<&Path>) -> Result<LoadedConfig, AnalysisError> {
		let text = if let Some(path) = explicit_path {
			trace!("loading config from explicit path {path:?}");
			Self::read(path)?
		} else if let Some(home_path) = self.home_path() {
			if home_path.is_file() {
				trace!("loading config from {home_path:?}");
				Self::read(&home_path)?
			} else {
				trace!("no config at {home_path:?}, falling back to the embedded default");
				EMBEDDED_DEFAULT.to_owned()
			}
		} else {
			trace!("no home directory available, falling back to the embedded default");
			EMBEDDED_DEFAULT.to_owned()
		};

		Ok(Self::parse(&text))
	}

	fn home_path(&self) -> Option<PathBuf> {
		std::env::var_os("HOME").map(|home| Path::new(&home).join(&self.default_name))
	}

	fn read(path: &Path) -> Result<String, AnalysisError> {
		std::fs::read_to_string(path).map_err(|source| AnalysisError::Io { path: path.to_owned(), source })
	}

	fn parse(text: &str) -> LoadedConfig {
		let mut filter_prefixes = Vec::new();
		let mut component_prefixes = Vec::new();

		for line in text.lines() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			let Some((key, value)) = line.split_once('=') else { continue };
			let (key, value) = (key.trim(), value.trim());

			if key == "components" {
				component_prefixes = value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect();
			} else if value == "filtered" {
				filter_prefixes.push(key.to_owned());
			}
		}

		LoadedConfig { filter_prefixes, component_prefixes }
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::{ConfigLoader, LoadedConfig};

	#[test]
	fn parses_filters_and_components_skipping_comments() {
		let text = "\
			# a comment\n\
			java.=filtered\n\
			\n\
			components=com.acme.core,com.acme.api\n\
			some.key=not-filtered\n\
		";

		let loaded = ConfigLoader::parse(text);
		assert_eq!(loaded, LoadedConfig {
			filter_prefixes: vec!["java.".to_owned()],
			component_prefixes: vec!["com.acme.core".to_owned(), "com.acme.api".to_owned()],
		});
	}

	#[test]
	fn embedded_default_is_used_without_explicit_path_or_home() {
		std::env::remove_var("HOME");
		let loader = ConfigLoader::new("depcheck.properties");
		let loaded = loader.load(None).unwrap();
		assert!(loaded.filter_prefixes.contains(&"java.".to_owned()));
	}
}
