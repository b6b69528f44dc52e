use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;

use depcheck::{Analyzer, AnalyzerConfig};
use depcheck::config::ConfigLoader;

/// Reports per-package Ca/Ce/A/I/D and cycle membership for a set of class file roots.
#[derive(Debug, Parser)]
struct Cli {
	/// One or more directories or .jar/.zip/.war archives to analyze.
	roots: Vec<PathBuf>,

	/// Comma-separated list of component prefixes to merge packages into.
	#[arg(long = "components")]
	components: Option<String>,

	/// Write the text report to this file instead of stdout.
	#[arg(long = "file")]
	file: Option<PathBuf>,

	/// An explicit config file, overriding the search in the user's home directory.
	#[arg(long = "config")]
	config: Option<PathBuf>,

	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_logging(cli.verbose).context("failed to set up logging")?;

	if cli.roots.is_empty() {
		return Err(anyhow!("at least one root directory or archive is required"));
	}

	let loaded = ConfigLoader::new("depcheck.properties")
		.load(cli.config.as_deref())
		.context("failed to load configuration")?;

	let components = match &cli.components {
		Some(csv) => csv.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect(),
		None => loaded.component_prefixes,
	};

	let config = AnalyzerConfig {
		filter: classfile::PackageFilter::new(loaded.filter_prefixes),
		components,
		accept_inner_classes: true,
	};

	let mut analyzer = Analyzer::new(config);
	let roots: Vec<&Path> = cli.roots.iter().map(PathBuf::as_path).collect();
	let reports = analyzer.analyze(&roots).context("analysis failed")?;

	let text = render(&reports);
	match &cli.file {
		Some(path) => {
			let mut file = File::create(path).with_context(|| anyhow!("failed to create report file {path:?}"))?;
			file.write_all(text.as_bytes())?;
		}
		None => print!("{text}"),
	}

	Ok(())
}

fn render(reports: &[depcheck::PackageReport]) -> String {
	let mut out = String::new();
	for report in reports {
		out.push_str(&format!(
			"{name}\tCa={ca}\tCe={ce}\tA={a:.2}\tI={i:.2}\tD={d:.2}\tcycle={cycle}\n",
			name = report.name,
			ca = report.metrics.ca,
			ce = report.metrics.ce,
			a = report.metrics.a,
			i = report.metrics.i,
			d = report.metrics.d,
			cycle = report.contains_cycle,
		));
	}
	out
}

fn setup_logging(verbose: bool) -> Result<()> {
	let level = if verbose { LevelFilter::Trace } else { LevelFilter::Info };

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.target(), record.level(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to install logger")
}
