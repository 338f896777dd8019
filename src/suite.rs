//! The full layouts × topologies matrix.

use std::path::{ Path, PathBuf };
use serde::Serialize ;
use thiserror::Error ;
use tracing::info ;

use crate::archive::Packer ;
use crate::bench::{ BenchError, BenchmarkReport, BenchmarkRunner };
use crate::compiler::Compiler ;
use crate::corpus::{ CorpusGenerator, GenerateError, LayoutKind };
use crate::runtime::HostRuntime ;
use crate::topology::TopologyKind ;



#[derive( Error, Debug )]
pub enum SuiteError {
	#[error( "Failed to generate {layout} corpus for {topology}: {source}" )]
	Generate { layout: LayoutKind, topology: TopologyKind, source: GenerateError },
	#[error( "Benchmark of {topology} over {layout} corpus failed: {source}" )]
	Bench { layout: LayoutKind, topology: TopologyKind, source: BenchError },
	#[error( "Failed to clear {}: {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
}

#[derive( Debug, Clone, PartialEq, Eq, Serialize )]
pub struct SuiteEntry {
	pub layout: LayoutKind,
	pub report: BenchmarkReport,
}

/// Benchmarks every configured topology against every layout, each on a freshly generated corpus.
pub struct Suite<C: Compiler, P: Packer, R: HostRuntime> {
	generator: CorpusGenerator<C, P>,
	runner: BenchmarkRunner<R>,
	topologies: Vec<TopologyKind>,
}

impl<C: Compiler, P: Packer, R: HostRuntime> Suite<C, P, R> {

	pub fn new( generator: CorpusGenerator<C, P>, runner: BenchmarkRunner<R>, topologies: Vec<TopologyKind> ) -> Self {
		Self { generator, runner, topologies }
	}

	/// Runs the matrix under `root`, one corpus per cell at `root/repo<i>`.
	///
	/// # Errors
	/// Stops at the first cell whose generation or benchmark fails.
	pub fn run( &self, root: &Path ) -> Result<Vec<SuiteEntry>, SuiteError> {

		if root.exists() {
			std::fs::remove_dir_all( root ).map_err(| source | SuiteError::Io { path: root.to_path_buf(), source })?;
		}

		let cells = LayoutKind::ALL.into_iter()
			.flat_map(| layout | self.topologies.iter().map( move | topology | ( layout, *topology )));

		cells.enumerate().map(|( index, ( layout, topology ))| {
			let corpus = root.join( format!( "repo{}", index + 1 ));
			self.generator.generate( &corpus, layout )
				.map_err(| source | SuiteError::Generate { layout, topology, source })?;
			let report = self.runner.run( &corpus, topology.topology().as_ref() )
				.map_err(| source | SuiteError::Bench { layout, topology, source })?;
			info!( "[{}] {}", layout, report );
			Ok( SuiteEntry { layout, report })
		}).collect()

	}

}
