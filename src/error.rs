use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// The analysis-level error taxonomy: failures that are not local to a
/// single class file and either abort registration or abort the session.
#[derive(Debug)]
pub enum AnalysisError {
	/// An invalid root, an unreadable property file, or a malformed component spec.
	Configuration { message: String },
	/// A root-level read failure (an archive that can't be opened at all).
	Io { path: PathBuf, source: std::io::Error },
	/// An attempt to insert an edge that would violate the bidirectional
	/// afferent/efferent invariant. Must never happen from correct graph code.
	InvariantViolation { message: String },
}

impl Display for AnalysisError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			AnalysisError::Configuration { message } => write!(f, "configuration error: {message}"),
			AnalysisError::Io { path, source } => write!(f, "failed to read {path:?}: {source}"),
			AnalysisError::InvariantViolation { message } => write!(f, "invariant violation: {message}"),
		}
	}
}

impl std::error::Error for AnalysisError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			AnalysisError::Io { source, .. } => Some(source),
			_ => None,
		}
	}
}
