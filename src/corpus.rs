//! Whole-corpus generation.
//!
//! A corpus is a fixed-shape graph: `N` platform modules without dependencies
//! and `M` plugins, each depending on a sliding window of platform modules.
//! [`CorpusGenerator::generate`] builds every module in dependency order,
//! packages the compiled units according to a [`LayoutKind`] and leaves a
//! [`ModuleDescriptor`] in every module directory so the corpus can be
//! consumed later without any knowledge of how it was generated.

use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use serde::{ Deserialize, Serialize };
use thiserror::Error ;
use tracing::{ debug, info };

use crate::archive::{ PackError, Packer };
use crate::compiler::Compiler ;
use crate::config::{ ConfigError, CorpusShape };
use crate::descriptor::{ DESCRIPTOR_FILE, DescriptorError, ModuleDescriptor };
use crate::module_builder::{ BuildError, CLASSES_DIR, ModuleBuilder, ModuleRole, ModuleSpec, OutputRegistry, SCRATCH_DIR };



/// Name prefix of platform modules (`platform1`, `platform2`, ...).
pub const PLATFORM_PREFIX: &str = "platform" ;
/// Name prefix of plugin modules (`plugin1`, `plugin2`, ...).
pub const PLUGIN_PREFIX: &str = "plugin" ;
/// Name of the module holding every platform unit in a [`LayoutKind::SingleJar`] corpus.
pub const MERGED_PLATFORM: &str = "platform" ;
/// Name of the module described at the corpus root, spanning every resource root.
pub const AGGREGATE_MODULE: &str = "corpus" ;

#[derive( Error, Debug )]
pub enum GenerateError {
	#[error( transparent )]
	Config( #[from] ConfigError ),
	#[error( transparent )]
	Build( #[from] BuildError ),
	#[error( transparent )]
	Pack( #[from] PackError ),
	#[error( transparent )]
	Descriptor( #[from] DescriptorError ),
	#[error( "I/O error at {}: {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
	/// The directory holds no module descriptors.
	#[error( "{} does not contain a generated corpus", .0.display() )]
	NotACorpus( PathBuf ),
}

/// How the compiled units of a corpus are laid out on disk.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum )]
#[serde( rename_all = "kebab-case" )]
pub enum LayoutKind {
	/// All platform units merged into one archive, one archive per plugin.
	SingleJar,
	/// One archive per module.
	ManyJars,
	/// Loose compiled units, no archives.
	Directories,
}

impl LayoutKind {
	pub const ALL: [Self; 3] = [ Self::SingleJar, Self::ManyJars, Self::Directories ];
}

impl std::fmt::Display for LayoutKind {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.write_str( match self {
			Self::SingleJar => "single-jar",
			Self::ManyJars => "many-jars",
			Self::Directories => "directories",
		})
	}
}

/// The numeric suffix of a module name, e.g. `12` for `plugin12`.
///
/// Names without one (such as the merged `platform` module) sort first.
pub fn module_index( name: &str ) -> usize {
	name.trim_start_matches(| c: char | !c.is_ascii_digit() ).parse().unwrap_or( 0 )
}

fn role_of( name: &str ) -> Option<ModuleRole> {
	if name.starts_with( PLUGIN_PREFIX ) { Some( ModuleRole::Plugin ) }
	else if name.starts_with( PLATFORM_PREFIX ) { Some( ModuleRole::Platform ) }
	else { None }
}

/// The modules of a corpus in build order: platform modules first, then plugins.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct BuildPlan {
	modules: Vec<ModuleSpec>,
}

impl BuildPlan {

	/// Lays out the module graph described by `shape`.
	///
	/// # Panics
	/// In debug builds, if a module would be ordered before one of its dependencies.
	pub fn new( shape: &CorpusShape ) -> Self {

		let platform_names = ( 1..=shape.platform_modules )
			.map(| index | format!( "{}{}", PLATFORM_PREFIX, index ))
			.collect_vec();

		let platform = platform_names.iter().map(| name | ModuleSpec {
			name: name.clone(),
			role: ModuleRole::Platform,
			packages: shape.packages_per_platform_module,
			dependencies: Vec::new(),
		});

		let plugins = ( 0..shape.plugins ).map(| index | ModuleSpec {
			name: format!( "{}{}", PLUGIN_PREFIX, index + 1 ),
			role: ModuleRole::Plugin,
			packages: shape.packages_per_plugin,
			dependencies: platform_names[ shape.window_for( index )].to_vec(),
		});

		let modules = platform.chain( plugins ).collect_vec();
		debug_assert!( modules.iter().enumerate().all(|( position, module )| module.dependencies.iter()
			.all(| dependency | modules[ ..position ].iter().any(| earlier | &earlier.name == dependency ))
		), "build plan orders a module before its dependencies" );

		Self { modules }

	}

	#[inline] pub fn modules( &self ) -> &[ModuleSpec] { &self.modules }

	pub fn platform_modules( &self ) -> impl Iterator<Item = &ModuleSpec> {
		self.modules.iter().filter(| module | module.role == ModuleRole::Platform )
	}

	pub fn plugins( &self ) -> impl Iterator<Item = &ModuleSpec> {
		self.modules.iter().filter(| module | module.role == ModuleRole::Plugin )
	}

}

/// One module directory of a generated corpus.
#[derive( Debug, Clone, PartialEq, Eq, Serialize )]
pub struct ModuleSummary {
	pub name: String,
	pub role: ModuleRole,
	pub dependencies: Vec<String>,
	/// Resource roots relative to the module directory.
	pub resources: Vec<PathBuf>,
}

impl ModuleSummary {
	fn descriptor( &self ) -> ModuleDescriptor {
		ModuleDescriptor { name: self.name.clone(), resources: self.resources.clone(), dependencies: self.dependencies.clone() }
	}
}

/// What a generation run left on disk.
#[derive( Debug, Clone, PartialEq, Eq, Serialize )]
pub struct CorpusSummary {
	pub layout: LayoutKind,
	/// Platform modules then plugins, each ordered by index.
	pub modules: Vec<ModuleSummary>,
	/// Every archive written, in module order.
	pub archives: Vec<PathBuf>,
}

impl CorpusSummary {

	fn new( root: &Path, layout: LayoutKind, mut modules: Vec<ModuleSummary> ) -> Self {
		modules.sort_by_key(| module | ( module.role, module_index( &module.name )));
		let archives = modules.iter()
			.flat_map(| module | module.resources.iter()
				.filter(| resource | resource.extension().is_some_and(| extension | extension == "jar" ))
				.map(| resource | root.join( &module.name ).join( resource )))
			.collect();
		Self { layout, modules, archives }
	}

	/// Reconstructs the summary of the corpus at `root` from its module descriptors.
	///
	/// # Errors
	/// Fails if a descriptor can't be read, or [`GenerateError::NotACorpus`] if there are none.
	pub fn read( root: &Path ) -> Result<Self, GenerateError> {

		let entries = std::fs::read_dir( root ).map_err( io_error( root ))?
			.collect::<Result<Vec<_>, _>>().map_err( io_error( root ))?;

		let modules = entries.into_iter()
			.map(| entry | entry.path() )
			.filter(| path | path.join( DESCRIPTOR_FILE ).is_file() )
			.filter_map(| path | {
				let role = role_of( &path.file_name()?.to_string_lossy() )?;
				Some( ModuleDescriptor::read_from( &path ).map(| descriptor | ModuleSummary {
					name: descriptor.name,
					role,
					dependencies: descriptor.dependencies,
					resources: descriptor.resources,
				}))
			})
			.collect::<Result<Vec<_>, _>>()?;

		if modules.is_empty() { return Err( GenerateError::NotACorpus( root.to_path_buf() )) }

		let layout = if modules.iter().any(| module | module.name == MERGED_PLATFORM ) { LayoutKind::SingleJar }
			else if modules.iter().all(| module | module.resources.iter().all(| resource | resource == Path::new( CLASSES_DIR ))) { LayoutKind::Directories }
			else { LayoutKind::ManyJars };

		Ok( Self::new( root, layout, modules ))

	}

	pub fn platform_modules( &self ) -> impl Iterator<Item = &ModuleSummary> {
		self.modules.iter().filter(| module | module.role == ModuleRole::Platform )
	}

	pub fn plugins( &self ) -> impl Iterator<Item = &ModuleSummary> {
		self.modules.iter().filter(| module | module.role == ModuleRole::Plugin )
	}

}

/// Generates complete corpora with one compiler and one packer.
pub struct CorpusGenerator<C: Compiler, P: Packer> {
	shape: CorpusShape,
	compiler: C,
	packer: P,
}

impl<C: Compiler, P: Packer> CorpusGenerator<C, P> {

	pub fn new( shape: CorpusShape, compiler: C, packer: P ) -> Self { Self { shape, compiler, packer }}

	#[inline] pub fn shape( &self ) -> &CorpusShape { &self.shape }

	/// Generates a fresh corpus at `root`, deleting whatever was there before.
	///
	/// Any failure aborts the run and leaves the partial corpus in place.
	///
	/// # Errors
	/// Fails on an invalid shape, the first module that doesn't build, and any
	/// packaging or descriptor I/O error.
	pub fn generate( &self, root: &Path, layout: LayoutKind ) -> Result<CorpusSummary, GenerateError> {

		self.shape.validate()?;
		info!( "Generating {} corpus at {}", layout, root.display() );

		if root.exists() { std::fs::remove_dir_all( root ).map_err( io_error( root ))?; }
		std::fs::create_dir_all( root ).map_err( io_error( root ))?;

		let plan = BuildPlan::new( &self.shape );
		let mut registry = OutputRegistry::new();
		let builder = ModuleBuilder::new( &self.compiler, root, &self.shape );
		plan.modules().iter().try_for_each(| module | builder.build( module, &mut registry ).map(| _ | ()))?;
		debug!( "Built {} modules", registry.len() );

		let modules = match layout {
			LayoutKind::SingleJar => self.package_single_jar( root, &plan )?,
			LayoutKind::ManyJars => plan.modules().iter()
				.map(| module | {
					let archive = self.pack_module( root, &module.name, &[ module.name.as_str() ])?;
					Ok( ModuleSummary {
						name: module.name.clone(),
						role: module.role,
						dependencies: module.dependencies.clone(),
						resources: vec![ archive ],
					})
				})
				.collect::<Result<Vec<_>, GenerateError>>()?,
			LayoutKind::Directories => plan.modules().iter()
				.map(| module | ModuleSummary {
					name: module.name.clone(),
					role: module.role,
					dependencies: module.dependencies.clone(),
					resources: vec![ PathBuf::from( CLASSES_DIR )],
				})
				.collect(),
		};

		modules.iter().try_for_each(| module | module.descriptor().write_to( &root.join( &module.name )))?;
		ModuleDescriptor {
			name: AGGREGATE_MODULE.to_string(),
			resources: modules.iter()
				.flat_map(| module | module.resources.iter().map(| resource | Path::new( &module.name ).join( resource )))
				.collect(),
			dependencies: Vec::new(),
		}.write_to( root )?;

		let scratch = root.join( SCRATCH_DIR );
		if scratch.exists() { std::fs::remove_dir_all( &scratch ).map_err( io_error( &scratch ))?; }

		let summary = CorpusSummary::new( root, layout, modules );
		info!( "Generated {} modules and {} archives", summary.modules.len(), summary.archives.len() );
		Ok( summary )

	}

	fn package_single_jar( &self, root: &Path, plan: &BuildPlan ) -> Result<Vec<ModuleSummary>, GenerateError> {

		let platform_names = plan.platform_modules().map(| module | module.name.as_str() ).collect_vec();
		let merged_archive = self.pack_module( root, MERGED_PLATFORM, &platform_names )?;
		platform_names.iter()
			.map(| name | root.join( name ))
			.filter(| dir | dir.exists() )
			.try_for_each(| dir | std::fs::remove_dir_all( &dir ).map_err( io_error( &dir )))?;

		let merged = ModuleSummary {
			name: MERGED_PLATFORM.to_string(),
			role: ModuleRole::Platform,
			dependencies: Vec::new(),
			resources: vec![ merged_archive ],
		};

		std::iter::once( Ok( merged ))
			.chain( plan.plugins().map(| module | Ok( ModuleSummary {
				name: module.name.clone(),
				role: module.role,
				dependencies: vec![ MERGED_PLATFORM.to_string() ],
				resources: vec![ self.pack_module( root, &module.name, &[ module.name.as_str() ])? ],
			})))
			.collect()

	}

	/// Packs the classes of `sources` into `<root>/<archive_module>/<archive_module>.jar`,
	/// then removes the consumed `classes` directories. Returns the archive path relative
	/// to its module directory.
	fn pack_module( &self, root: &Path, archive_module: &str, sources: &[&str] ) -> Result<PathBuf, GenerateError> {

		let module_dir = root.join( archive_module );
		std::fs::create_dir_all( &module_dir ).map_err( io_error( &module_dir ))?;

		let archive_name = PathBuf::from( format!( "{}.jar", archive_module ));
		let class_dirs = sources.iter().map(| source | root.join( source ).join( CLASSES_DIR )).collect_vec();
		self.packer.pack( &module_dir.join( &archive_name ), &class_dirs )?;
		debug!( "Packed {} into {}", sources.iter().join( ", " ), archive_name.display() );

		class_dirs.iter().try_for_each(| dir | std::fs::remove_dir_all( dir ).map_err( io_error( dir )))?;
		Ok( archive_name )

	}

}

fn io_error( path: &Path ) -> impl FnOnce( std::io::Error ) -> GenerateError {
	let path = path.to_path_buf();
	move | source | GenerateError::Io { path, source }
}
