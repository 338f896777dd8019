//! A synthetic module-graph generator and a benchmark harness for loader topologies.
//!
//! The crate measures how the shape of a graph of loading scopes affects the cost of
//! resolving and initializing a large set of interdependent compiled modules. It has
//! two halves that meet only on disk:
//!
//! - **Generation.** A [`CorpusGenerator`] synthesizes a corpus of `N` platform
//! 	modules and `M` plugins, each plugin depending on a sliding window of platform
//! 	modules, compiles every module against exactly its dependencies and packages
//! 	the result in one of three [`LayoutKind`]s.
//! - **Benchmarking.** A [`BenchmarkRunner`] takes one corpus and one
//! 	[`LoaderTopology`], builds the topology's scopes and times resolving and
//! 	instantiating every plugin's `Entry` unit through a [`HostRuntime`].
//!
//! # Core Concepts
//!
//! - **Unit**: one compiled class, named like `org.plugin1.pack3.Impl2`. Its source is
//! 	produced by the [`synthesis`] functions.
//!
//! - **Module**: a set of packages plus one `Entry` unit (`org.<module>.Entry`).
//! 	Instantiating the entry initializes every unit of the module and the entry of
//! 	every dependency. Modules are described by a [`ModuleSpec`] while building and by
//! 	a `module.toml` [`ModuleDescriptor`] once generated.
//!
//! - [`LoadingScope`]: a resolution boundary with resource roots, an optional parent
//! 	and optional imports. Scopes are shared through `Arc` and compared by identity.
//!
//! - [`LoaderTopology`]: a strategy assigning a scope to every plugin. The six
//! 	configured variants are enumerated by [`TopologyKind`].
//!
//! - [`HostRuntime`]: resolves a symbol within a scope and exposes four lookup
//! 	counters. [`NativeRuntime`] emulates class loading over the compiled units.
//!
//! # Collaborators
//!
//! Compilation and packaging are delegated through the [`Compiler`] and [`Packer`]
//! traits. [`Javac`] drives the JDK compiler and [`JarPacker`] writes jar archives;
//! both can be replaced, which is how the tests run without a JDK.
//!
//! # Example
//!
//! The dependency graph is fully determined by the [`CorpusShape`]:
//!
//! ```
//! use loader_bench::{ BuildPlan, CorpusShape };
//!
//! let shape = CorpusShape { platform_modules: 6, plugins: 3, ..CorpusShape::default() };
//! let plan = BuildPlan::new( &shape );
//!
//! let plugin2 = plan.plugins().nth( 1 ).unwrap();
//! assert_eq!( plugin2.name, "plugin2" );
//! assert_eq!( plugin2.dependencies, [ "platform2", "platform3", "platform4", "platform5", "platform6" ]);
//! ```
//!
//! Generating a corpus and benchmarking one topology over it:
//!
//! ```no_run
//! use std::path::Path ;
//! use loader_bench::{
//! 	BenchmarkRunner, CorpusGenerator, CorpusShape, JarPacker, Javac, LayoutKind,
//! 	NativeRuntime, TopologyKind,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = CorpusGenerator::new( CorpusShape::default(), Javac::default(), JarPacker );
//! generator.generate( Path::new( "repo" ), LayoutKind::ManyJars )?;
//!
//! let runner = BenchmarkRunner::new( NativeRuntime::new() );
//! let report = runner.run( Path::new( "repo" ), TopologyKind::IndexedCommon.topology().as_ref() )?;
//! println!( "{}", report );
//! # Ok(())
//! # }
//! ```

pub mod synthesis ;
mod compiler ;
mod module_builder ;
mod archive ;
mod descriptor ;
mod corpus ;
mod classfile ;
mod counters ;
mod scope ;
mod runtime ;
pub mod topology ;
mod bench ;
mod suite ;
mod config ;

pub use compiler::{ Compiler, Diagnostic, Javac, parse_output as parse_javac_output };
pub use module_builder::{ BuildError, ModuleBuilder, ModuleRole, ModuleSpec, OutputRegistry, CLASSES_DIR, SCRATCH_DIR };
pub use archive::{ JarPacker, PackError, Packer };
pub use descriptor::{ DescriptorError, ModuleDescriptor, DESCRIPTOR_FILE };
pub use corpus::{
	BuildPlan, CorpusGenerator, CorpusSummary, GenerateError, LayoutKind, ModuleSummary,
	AGGREGATE_MODULE, MERGED_PLATFORM, PLATFORM_PREFIX, PLUGIN_PREFIX, module_index,
};
pub use classfile::{ ClassFileError, UnitInfo, parse as parse_class_file };
pub use counters::{ CounterSnapshot, Counters };
pub use scope::{ LoadedUnit, LoadingScope, LookupStrategy, ResourceRoot };
pub use runtime::{ HostRuntime, NativeRuntime, ResolutionError, MAX_INITIALIZER_DEPTH };
pub use topology::{ LoaderTopology, ScopeAssignment, TopologyError, TopologyKind };
pub use bench::{ BenchError, BenchmarkReport, BenchmarkRunner };
pub use suite::{ Suite, SuiteEntry, SuiteError };
pub use config::{ BenchConfig, ConfigError, CorpusShape };
