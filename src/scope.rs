//! Loading scopes.
//!
//! A [`LoadingScope`] is one resolution boundary: a set of resource roots,
//! an optional parent it delegates to first, the scopes it imports and the table
//! of units it has defined. Scopes are built by a
//! [`LoaderTopology`]( crate::LoaderTopology ) for one benchmark run and shared
//! through [`Arc`]; identity is pointer identity.

use std::collections::HashMap ;
use std::fs::File ;
use std::io::{ BufReader, Read };
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };
use std::sync::atomic::{ AtomicBool, Ordering };
use serde::Serialize ;
use zip::ZipArchive ;
use zip::result::ZipError ;

use crate::classfile::UnitInfo ;



/// How a scope searches its resource roots.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize )]
#[serde( rename_all = "kebab-case" )]
pub enum LookupStrategy {
	/// Probe every root in order on every lookup.
	#[default]
	Scan,
	/// Index every root on the first lookup, then answer from the index.
	Indexed,
}

/// One place a scope reads compiled units from.
///
/// A root that doesn't exist on disk simply contains nothing.
pub enum ResourceRoot {
	Directory( PathBuf ),
	Archive { path: PathBuf, archive: Mutex<Option<ZipArchive<BufReader<File>>>> },
}

impl ResourceRoot {

	/// Archives are recognized by their `.jar` extension.
	pub fn new( path: PathBuf ) -> Self {
		match path.extension().is_some_and(| extension | extension == "jar" ) {
			true => Self::Archive { path, archive: Mutex::new( None )},
			false => Self::Directory( path ),
		}
	}

	pub fn path( &self ) -> &Path {
		match self {
			Self::Directory( path ) | Self::Archive { path, .. } => path,
		}
	}

	/// Reads the unit at the forward-slash `unit_path`, or `None` if this root doesn't hold it.
	///
	/// # Errors
	/// Fails if the root exists but can't be read.
	pub fn read( &self, unit_path: &str ) -> std::io::Result<Option<Vec<u8>>> {
		match self {
			Self::Directory( dir ) => {
				let path = dir.join( unit_path );
				match path.is_file() {
					true => std::fs::read( &path ).map( Some ),
					false => Ok( None ),
				}
			}
			Self::Archive { path, archive } => {
				let mut guard = lock( archive );
				let Some( archive ) = open_archive( path, &mut guard )? else { return Ok( None ) };
				let mut entry = match archive.by_name( unit_path ) {
					Ok( entry ) => entry,
					Err( ZipError::FileNotFound ) => return Ok( None ),
					Err( err ) => return Err( err.into() ),
				};
				let mut bytes = Vec::with_capacity( usize::try_from( entry.size() ).unwrap_or( 0 ));
				entry.read_to_end( &mut bytes )?;
				Ok( Some( bytes ))
			}
		}
	}

	/// Every file path this root holds, forward-slash separated.
	///
	/// # Errors
	/// Fails if the root exists but can't be listed.
	pub fn list( &self ) -> std::io::Result<Vec<String>> {
		match self {
			Self::Directory( dir ) => {
				let mut paths = Vec::new();
				if dir.is_dir() { list_dir( dir, "", &mut paths )?; }
				Ok( paths )
			}
			Self::Archive { path, archive } => {
				let mut guard = lock( archive );
				Ok( open_archive( path, &mut guard )?
					.map(| archive | archive.file_names().filter(| name | !name.ends_with( '/' )).map( str::to_string ).collect() )
					.unwrap_or_default() )
			}
		}
	}

}

impl std::fmt::Debug for ResourceRoot {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Directory( path ) => f.debug_tuple( "Directory" ).field( path ).finish(),
			Self::Archive { path, .. } => f.debug_tuple( "Archive" ).field( path ).finish(),
		}
	}
}

fn open_archive<'a>(
	path: &Path,
	slot: &'a mut Option<ZipArchive<BufReader<File>>>,
) -> std::io::Result<Option<&'a mut ZipArchive<BufReader<File>>>> {
	if slot.is_none() {
		if !path.is_file() { return Ok( None ) }
		*slot = Some( ZipArchive::new( BufReader::new( File::open( path )? ))?);
	}
	Ok( slot.as_mut() )
}

fn list_dir( dir: &Path, prefix: &str, paths: &mut Vec<String> ) -> std::io::Result<()> {
	for entry in std::fs::read_dir( dir )? {
		let entry = entry?;
		let name = format!( "{}{}", prefix, entry.file_name().to_string_lossy() );
		match entry.file_type()?.is_dir() {
			true => list_dir( &entry.path(), &format!( "{}/", name ), paths )?,
			false => paths.push( name ),
		}
	}
	Ok(())
}

fn lock<T>( mutex: &Mutex<T> ) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else( PoisonError::into_inner )}

/// A unit defined by a scope.
#[derive( Debug )]
pub struct LoadedUnit {
	info: UnitInfo,
	initialized: AtomicBool,
}

impl LoadedUnit {

	pub fn new( info: UnitInfo ) -> Self { Self { info, initialized: AtomicBool::new( false )}}

	#[inline] pub fn info( &self ) -> &UnitInfo { &self.info }
	#[inline] pub fn name( &self ) -> &str { &self.info.name }
	#[inline] pub fn is_initialized( &self ) -> bool { self.initialized.load( Ordering::Acquire )}

	/// Marks the unit initialized. Returns `false` if it already was.
	pub fn begin_initialization( &self ) -> bool { !self.initialized.swap( true, Ordering::AcqRel )}

}

/// A resolution boundary.
pub struct LoadingScope {
	name: String,
	roots: Vec<ResourceRoot>,
	lookup: LookupStrategy,
	parent: Option<Arc<LoadingScope>>,
	imports: Vec<Arc<LoadingScope>>,
	index: Mutex<Option<HashMap<String, usize>>>,
	defined: Mutex<HashMap<String, Arc<LoadedUnit>>>,
}

impl LoadingScope {

	/// A scope over `roots` whose parent is the system root.
	pub fn new( name: impl Into<String>, roots: impl IntoIterator<Item = PathBuf>, lookup: LookupStrategy ) -> Self {
		Self {
			name: name.into(),
			roots: roots.into_iter().map( ResourceRoot::new ).collect(),
			lookup,
			parent: None,
			imports: Vec::new(),
			index: Mutex::new( None ),
			defined: Mutex::new( HashMap::new() ),
		}
	}

	pub fn with_parent( mut self, parent: Arc<LoadingScope> ) -> Self {
		self.parent = Some( parent );
		self
	}

	pub fn with_imports( mut self, imports: Vec<Arc<LoadingScope>> ) -> Self {
		self.imports = imports ;
		self
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn roots( &self ) -> &[ResourceRoot] { &self.roots }
	#[inline] pub fn lookup( &self ) -> LookupStrategy { self.lookup }
	/// `None` means the system root.
	#[inline] pub fn parent( &self ) -> Option<&Arc<LoadingScope>> { self.parent.as_ref() }
	#[inline] pub fn imports( &self ) -> &[Arc<LoadingScope>] { &self.imports }

	/// The unit `name` if this scope defined it.
	pub fn defined( &self, name: &str ) -> Option<Arc<LoadedUnit>> { lock( &self.defined ).get( name ).cloned() }

	pub fn defined_count( &self ) -> usize { lock( &self.defined ).len() }

	/// Defines `unit` in this scope. A unit defined earlier under the same name wins.
	pub fn define( &self, unit: LoadedUnit ) -> Arc<LoadedUnit> {
		lock( &self.defined )
			.entry( unit.name().to_string() )
			.or_insert_with(|| Arc::new( unit ))
			.clone()
	}

	/// Reads the unit at `unit_path` from this scope's own roots, first root first.
	///
	/// # Errors
	/// Fails if a root can't be read or, with [`LookupStrategy::Indexed`], indexed.
	pub fn find_resource( &self, unit_path: &str ) -> std::io::Result<Option<Vec<u8>>> {
		match self.lookup {
			LookupStrategy::Scan => {
				for root in &self.roots {
					if let Some( bytes ) = root.read( unit_path )? { return Ok( Some( bytes )) }
				}
				Ok( None )
			}
			LookupStrategy::Indexed => {
				let root = {
					let mut index = lock( &self.index );
					if index.is_none() { *index = Some( self.build_index()? ); }
					index.as_ref().and_then(| index | index.get( unit_path ).copied() )
				};
				match root {
					Some( root ) => self.roots[ root ].read( unit_path ),
					None => Ok( None ),
				}
			}
		}
	}

	fn build_index( &self ) -> std::io::Result<HashMap<String, usize>> {
		let mut index = HashMap::new();
		for ( position, root ) in self.roots.iter().enumerate() {
			for path in root.list()? { index.entry( path ).or_insert( position ); }
		}
		Ok( index )
	}

}

impl std::fmt::Debug for LoadingScope {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoadingScope" )
			.field( "name", &self.name )
			.field( "roots", &self.roots )
			.field( "lookup", &self.lookup )
			.field( "parent", &self.parent.as_ref().map(| parent | parent.name() ))
			.field( "imports", &self.imports.iter().map(| import | import.name() ).collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}

impl std::fmt::Display for LoadingScope {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.name )}
}
