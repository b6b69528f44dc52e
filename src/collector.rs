use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::AnalysisError;

const ARCHIVE_EXTENSIONS: [&str; 3] = ["jar", "zip", "war"];

/// Walks a registered root (directory or archive) and yields the name and
/// bytes of every entry accepted as a class file.
///
/// Grounded on the directory-walking idiom of `get_files` (`WalkDir::new(...)
/// .into_iter().filter(...).map(...).collect::<Result<_, _>>()`) for the
/// directory side, and on the `Jar`/`OpenedJar` split (`ZipArchive::new`,
/// iterating `0..len()` and reading each entry to a `Vec<u8>`) for the
/// archive side.
pub struct FileCollector {
	accept_inner_classes: bool,
}

impl FileCollector {
	pub fn new(accept_inner_classes: bool) -> FileCollector {
		FileCollector { accept_inner_classes }
	}

	pub fn collect(&self, root: &Path) -> Result<Vec<(String, Vec<u8>)>, AnalysisError> {
		if root.is_dir() {
			self.collect_dir(root)
		} else if is_archive(root) {
			self.collect_archive(root)
		} else {
			Err(AnalysisError::Configuration {
				message: format!("{root:?} is neither a directory nor a .jar/.zip/.war archive"),
			})
		}
	}

	fn collect_dir(&self, root: &Path) -> Result<Vec<(String, Vec<u8>)>, AnalysisError> {
		let mut paths: Vec<_> = WalkDir::new(root)
			.follow_links(false)
			.into_iter()
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.file_type().is_file())
			.map(|entry| entry.into_path())
			.filter(|path| is_class_file_name(&path.to_string_lossy()))
			.filter(|path| self.accept_inner_classes || !is_inner_class_path(path))
			.collect();
		paths.sort();

		let mut entries = Vec::with_capacity(paths.len());
		for path in paths {
			let bytes = std::fs::read(&path).map_err(|source| AnalysisError::Io { path: path.clone(), source })?;
			entries.push((path.to_string_lossy().into_owned(), bytes));
		}

		info!("collected {} class files from {root:?}", entries.len());
		Ok(entries)
	}

	fn collect_archive(&self, root: &Path) -> Result<Vec<(String, Vec<u8>)>, AnalysisError> {
		let file = File::open(root).map_err(|source| AnalysisError::Io { path: root.to_owned(), source })?;
		let mut archive = ZipArchive::new(file).map_err(|e| AnalysisError::Configuration {
			message: format!("failed to read {root:?} as a zip archive: {e}"),
		})?;

		let mut names: Vec<String> = (0..archive.len())
			.filter_map(|index| archive.name_for_index(index).map(str::to_owned))
			.filter(|name| is_class_file_name(name))
			.filter(|name| self.accept_inner_classes || !is_inner_class_path(Path::new(name)))
			.collect();
		names.sort();

		let mut entries = Vec::with_capacity(names.len());
		for name in names {
			let mut zip_file = archive.by_name(&name).map_err(|e| AnalysisError::Configuration {
				message: format!("failed to read entry {name} from {root:?}: {e}"),
			})?;
			let mut data = Vec::with_capacity(zip_file.size() as usize);
			zip_file.read_to_end(&mut data).map_err(|source| AnalysisError::Io { path: root.to_owned(), source })?;
			entries.push((name, data));
		}

		info!("collected {} class files from {root:?}", entries.len());
		Ok(entries)
	}
}

fn is_archive(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn is_class_file_name(name: &str) -> bool {
	name.to_lowercase().ends_with(".class")
}

/// A file is an inner class if its base name (without extension) has a `$`
/// anywhere after the first character.
fn is_inner_class_path(path: &Path) -> bool {
	let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
	stem.char_indices().skip(1).any(|(_, c)| c == '$')
}
