//! Timed benchmark runs.

use std::path::Path ;
use std::time::{ Duration, Instant };
use serde::Serialize ;
use thiserror::Error ;
use tracing::debug ;

use crate::counters::CounterSnapshot ;
use crate::runtime::{ HostRuntime, ResolutionError };
use crate::synthesis::QualifiedName ;
use crate::topology::{ LoaderTopology, TopologyError };



#[derive( Error, Debug )]
pub enum BenchError {
	#[error( transparent )]
	Topology( #[from] TopologyError ),
	/// Resolving a plugin entry failed. Plugins resolved before it are not rolled back.
	#[error( "Failed to load plugin {plugin}: {source}" )]
	Resolution { plugin: String, source: ResolutionError },
}

/// The outcome of one run of one topology over one corpus.
#[derive( Debug, Clone, PartialEq, Eq, Serialize )]
pub struct BenchmarkReport {
	pub topology: String,
	pub plugin_count: usize,
	pub duration: Duration,
	pub counters: CounterSnapshot,
}

impl std::fmt::Display for BenchmarkReport {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{}: {} plugins loaded in {}ms", self.topology, self.plugin_count, self.duration.as_millis() )
	}
}

/// Runs topologies against a [`HostRuntime`].
pub struct BenchmarkRunner<R: HostRuntime> {
	runtime: R,
}

impl<R: HostRuntime> BenchmarkRunner<R> {

	pub fn new( runtime: R ) -> Self { Self { runtime }}

	#[inline] pub fn runtime( &self ) -> &R { &self.runtime }

	/// Creates the scopes of `topology` over the corpus at `corpus_root`, then resolves
	/// and instantiates every plugin entry in order while timing the whole pass.
	///
	/// Scope creation is not timed. Counters are reset right before timing starts and
	/// read right after it stops.
	///
	/// # Errors
	/// Fails if the topology can't be built, or on the first plugin that doesn't resolve.
	pub fn run( &self, corpus_root: &Path, topology: &dyn LoaderTopology ) -> Result<BenchmarkReport, BenchError> {

		let assignment = topology.create_scopes( corpus_root )?;
		debug!( "{} assigned scopes to {} plugins", topology, assignment.len() );

		self.runtime.reset_counters();
		let started = Instant::now();
		for ( plugin, scope ) in &assignment {
			self.runtime.resolve_and_initialize( QualifiedName::entry_of( plugin ).as_str(), scope )
				.map_err(| source | BenchError::Resolution { plugin: plugin.clone(), source })?;
		}
		let duration = started.elapsed();
		let counters = self.runtime.counters();

		let report = BenchmarkReport { topology: topology.to_string(), plugin_count: assignment.len(), duration, counters };
		debug!( "{}", report );
		Ok( report )

	}

}
