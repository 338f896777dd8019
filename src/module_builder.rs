//! Building a single module.
//!
//! [`ModuleBuilder::build`] synthesizes every unit of a module into a scratch
//! source root, compiles them against the outputs of the module's dependencies
//! and records where the compiled units ended up. The classpath is taken strictly
//! from the [`OutputRegistry`], so a module can only be built once everything it
//! depends on has been.

use std::collections::BTreeMap ;
use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use thiserror::Error ;
use tracing::{ debug, error };

use crate::compiler::{ Compiler, Diagnostic };
use crate::config::CorpusShape ;
use crate::synthesis::{ QualifiedName, UnitSource, synthesize, synthesize_container, synthesize_entry };



/// Directory under the output root that holds scratch source roots.
pub const SCRATCH_DIR: &str = ".scratch" ;
/// Directory inside a module that holds its loose compiled units.
pub const CLASSES_DIR: &str = "classes" ;

/// Errors that abort a module build, and with it the whole corpus generation.
#[derive( Error, Debug )]
pub enum BuildError {
	/// Dependencies that have no recorded output. Lists every missing module, not just the first.
	#[error( "Cannot build {module}: dependencies not built yet: {}", missing.join( ", " ))]
	MissingDependencies { module: String, missing: Vec<String> },
	/// The compiler reported at least one diagnostic.
	#[error( "Compilation of {module} failed with {} diagnostics:\n{}", diagnostics.len(), diagnostics.iter().join( "\n" ))]
	Compilation { module: String, diagnostics: Vec<Diagnostic> },
	/// A module was built twice into the same registry.
	#[error( "Module {0} was already built" )]
	AlreadyBuilt( String ),
	/// Writing sources, running the compiler or cleaning up failed.
	#[error( "I/O error while building {module} at {}: {source}", path.display() )]
	Io { module: String, path: PathBuf, source: std::io::Error },
}

/// Whether a module belongs to the platform layer or the plugin layer.
#[derive( Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize )]
#[serde( rename_all = "kebab-case" )]
pub enum ModuleRole {
	Platform,
	Plugin,
}

/// Everything needed to build one module.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ModuleSpec {
	pub name: String,
	pub role: ModuleRole,
	pub packages: usize,
	pub dependencies: Vec<String>,
}

impl ModuleSpec {

	/// Name of the package `index` (1-based) of this module.
	pub fn package_name( &self, index: usize ) -> String { format!( "org.{}.pack{}", self.name, index )}

	/// The container unit of every package, in package order.
	pub fn containers( &self ) -> Vec<QualifiedName> {
		( 1..=self.packages )
			.map(| index | QualifiedName::in_package( &self.package_name( index ), "Container" ))
			.collect()
	}

	/// The unit whose instantiation initializes the whole module.
	pub fn entry( &self ) -> QualifiedName { QualifiedName::entry_of( &self.name )}

	/// Synthesizes every unit of the module: per package a `Base`, its implementations and a
	/// `Container`, then the module `Entry`.
	pub fn synthesize_units( &self, shape: &CorpusShape ) -> Vec<UnitSource> {

		let packages = ( 1..=self.packages ).flat_map(| index | {
			let package = self.package_name( index );
			let impls = ( 1..=shape.impls_per_package() )
				.map(| impl_index | QualifiedName::in_package( &package, &format!( "Impl{}", impl_index )))
				.collect_vec();

			std::iter::once( synthesize( &QualifiedName::in_package( &package, "Base" ), shape.base_methods, None ))
				.chain( impls.iter().map(| name | synthesize( name, shape.impl_methods, Some( "Base" ))))
				.chain( std::iter::once( synthesize_container( &QualifiedName::in_package( &package, "Container" ), &impls )))
				.collect_vec()
		});

		let dependency_entries = self.dependencies.iter().map(| dependency | QualifiedName::entry_of( dependency )).collect_vec();
		let entry = synthesize_entry( &self.entry(), &self.containers(), &dependency_entries );

		packages.chain( std::iter::once( entry )).collect()

	}

}

/// Where each built module's compiled units live.
///
/// Written once per module during generation, read many times afterwards.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct OutputRegistry {
	outputs: BTreeMap<String, PathBuf>,
}

impl OutputRegistry {

	pub fn new() -> Self { Self::default() }

	/// Records the output of `module`.
	///
	/// # Errors
	/// Returns [`BuildError::AlreadyBuilt`] if the module already has an output.
	pub fn record( &mut self, module: &str, output: PathBuf ) -> Result<(), BuildError> {
		match self.outputs.contains_key( module ) {
			true => Err( BuildError::AlreadyBuilt( module.to_string() )),
			false => { self.outputs.insert( module.to_string(), output ); Ok(()) }
		}
	}

	#[inline] pub fn get( &self, module: &str ) -> Option<&Path> { self.outputs.get( module ).map( PathBuf::as_path )}

	#[inline] pub fn len( &self ) -> usize { self.outputs.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.outputs.is_empty() }

	/// The classpath for a module depending on `dependencies`, in dependency order.
	///
	/// # Errors
	/// Returns [`BuildError::MissingDependencies`] naming every dependency without an output.
	pub fn classpath_for( &self, module: &str, dependencies: &[String] ) -> Result<Vec<PathBuf>, BuildError> {
		let ( classpath, missing ) = dependencies.iter()
			.map(| dependency | self.outputs.get( dependency ).cloned().ok_or_else(|| dependency.clone() ))
			.partition_result::<Vec<_>, Vec<_>, _, _>();
		match missing.is_empty() {
			true => Ok( classpath ),
			false => Err( BuildError::MissingDependencies { module: module.to_string(), missing }),
		}
	}

}

/// Builds modules into `<output_root>/<module>/classes`.
pub struct ModuleBuilder<'a, C: Compiler> {
	compiler: &'a C,
	output_root: &'a Path,
	shape: &'a CorpusShape,
}

impl<'a, C: Compiler> ModuleBuilder<'a, C> {

	pub fn new( compiler: &'a C, output_root: &'a Path, shape: &'a CorpusShape ) -> Self {
		Self { compiler, output_root, shape }
	}

	/// Builds one module and records its output in `registry`.
	///
	/// The scratch source root is deleted only when the build succeeds; a failed build leaves
	/// it behind for inspection.
	///
	/// # Errors
	/// Fails with [`BuildError::MissingDependencies`] before writing anything if a dependency
	/// has not been built, and with [`BuildError::Compilation`] if the compiler reports any
	/// diagnostic.
	pub fn build( &self, module: &ModuleSpec, registry: &mut OutputRegistry ) -> Result<PathBuf, BuildError> {

		let classpath = registry.classpath_for( &module.name, &module.dependencies )?;
		debug!( "Generating {}...", module.name );

		let sources_root = self.output_root.join( SCRATCH_DIR ).join( format!( "module-{}-src", module.name ));

		if sources_root.exists() {
			std::fs::remove_dir_all( &sources_root ).map_err( io_error( &module.name, &sources_root ))?;
		}

		let sources = module.synthesize_units( self.shape ).into_iter()
			.map(| unit | {
				let path = sources_root.join( unit.name.source_path() );
				if let Some( parent ) = path.parent() { std::fs::create_dir_all( parent ).map_err( io_error( &module.name, parent ))?; }
				std::fs::write( &path, unit.text ).map_err( io_error( &module.name, &path ))?;
				Ok( path )
			})
			.collect::<Result<Vec<_>, BuildError>>()?;

		let classes_dir = self.output_root.join( &module.name ).join( CLASSES_DIR );
		std::fs::create_dir_all( &classes_dir ).map_err( io_error( &module.name, &classes_dir ))?;

		let diagnostics = self.compiler.compile( &sources, &classes_dir, &classpath ).map_err( io_error( &module.name, &classes_dir ))?;
		if !diagnostics.is_empty() {
			diagnostics.iter().for_each(| diagnostic | error!( module = %module.name, "{}", diagnostic ));
			return Err( BuildError::Compilation { module: module.name.clone(), diagnostics });
		}

		std::fs::remove_dir_all( &sources_root ).map_err( io_error( &module.name, &sources_root ))?;
		registry.record( &module.name, classes_dir.clone() )?;
		Ok( classes_dir )

	}

}

fn io_error( module: &str, path: &Path ) -> impl FnOnce( std::io::Error ) -> BuildError {
	let ( module, path ) = ( module.to_string(), path.to_path_buf() );
	move | source | BuildError::Io { module, path, source }
}
