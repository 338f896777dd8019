//! Loader topologies.
//!
//! A [`LoaderTopology`] decides which [`LoadingScope`] resolves each plugin of a
//! corpus. Every topology starts from the same [`CorpusListing`] and differs
//! only in how it shapes the scope graph:
//!
//! - [`PerPluginIsolated`]: one platform scope shared as the parent of a
//! 	separate scope per plugin;
//! - [`CommonShared`]: one flat scope over every root, shared by all plugins;
//! - [`DelegatedModules`]: scopes built from the module descriptors, either one
//! 	per module importing its dependencies or one for the aggregate module.
//!
//! [`TopologyKind`] names the six configured variants the harness benchmarks.

mod listing ;
mod isolated ;
mod common ;
mod delegated ;

use std::fmt::Display ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use serde::Serialize ;
use thiserror::Error ;

use crate::descriptor::DescriptorError ;
use crate::scope::{ LoadingScope, LookupStrategy };
pub use listing::{ CorpusListing, resource_root_for };
pub use isolated::PerPluginIsolated ;
pub use common::CommonShared ;
pub use delegated::{ DelegatedModules, DelegationMode };



/// The scope assigned to every plugin, in plugin order.
pub type ScopeAssignment = Vec<( String, Arc<LoadingScope> )>;

#[derive( Error, Debug )]
pub enum TopologyError {
	/// The corpus root is missing or lacks platform or plugin entries.
	#[error( "Malformed corpus at {}: {reason}", root.display() )]
	MalformedCorpus { root: PathBuf, reason: String },
	/// A module named as a dependency has no readable descriptor.
	#[error( "Module {module} could not be resolved: {source}" )]
	MissingModule { module: String, source: DescriptorError },
	/// Module dependencies form a cycle through the named module.
	#[error( "Loop detected while resolving module {0}" )]
	LoopDetected( String ),
	#[error( "I/O error at {}: {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
}

/// A strategy assigning a loading scope to every plugin of a corpus.
pub trait LoaderTopology: Display {
	/// Builds the scope graph for the corpus at `corpus_root`.
	///
	/// # Errors
	/// Fails with [`TopologyError::MalformedCorpus`] if the corpus has no platform or
	/// plugin entries, or with a descriptor error for the delegated topologies.
	fn create_scopes( &self, corpus_root: &Path ) -> Result<ScopeAssignment, TopologyError> ;
}

/// The configured topologies.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum )]
#[serde( rename_all = "kebab-case" )]
pub enum TopologyKind {
	StandardPerPlugin,
	IndexedPerPlugin,
	StandardCommon,
	IndexedCommon,
	DelegatedPerModule,
	DelegatedAggregate,
}

impl TopologyKind {

	pub const ALL: [Self; 6] = [
		Self::StandardPerPlugin,
		Self::IndexedPerPlugin,
		Self::StandardCommon,
		Self::IndexedCommon,
		Self::DelegatedPerModule,
		Self::DelegatedAggregate,
	];

	pub fn topology( self ) -> Box<dyn LoaderTopology> {
		match self {
			Self::StandardPerPlugin => Box::new( PerPluginIsolated { lookup: LookupStrategy::Scan }),
			Self::IndexedPerPlugin => Box::new( PerPluginIsolated { lookup: LookupStrategy::Indexed }),
			Self::StandardCommon => Box::new( CommonShared { lookup: LookupStrategy::Scan }),
			Self::IndexedCommon => Box::new( CommonShared { lookup: LookupStrategy::Indexed }),
			Self::DelegatedPerModule => Box::new( DelegatedModules { mode: DelegationMode::PerModule }),
			Self::DelegatedAggregate => Box::new( DelegatedModules { mode: DelegationMode::Aggregate }),
		}
	}

}

impl Display for TopologyKind {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.write_str( match self {
			Self::StandardPerPlugin => "standard-per-plugin",
			Self::IndexedPerPlugin => "indexed-per-plugin",
			Self::StandardCommon => "standard-common",
			Self::IndexedCommon => "indexed-common",
			Self::DelegatedPerModule => "delegated-per-module",
			Self::DelegatedAggregate => "delegated-aggregate",
		})
	}
}

fn lookup_prefix( lookup: LookupStrategy ) -> &'static str {
	match lookup {
		LookupStrategy::Scan => "standard",
		LookupStrategy::Indexed => "indexed",
	}
}
