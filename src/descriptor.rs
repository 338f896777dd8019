//! Module descriptors.
//!
//! Every module directory of a generated corpus carries a `module.toml` naming
//! the module, its resource roots and its dependencies. The delegated topologies
//! resolve modules exclusively through these files; the corpus root holds one
//! more descriptor for the aggregate module that lists every root at once.
//!
//! ```toml
//! name = "plugin1"
//! resources = [ "plugin1.jar" ]
//! dependencies = [ "platform2", "platform3" ]
//! ```

use std::path::{ Path, PathBuf };
use serde::{ Deserialize, Serialize };
use thiserror::Error ;



/// File name of a module descriptor inside its module directory.
pub const DESCRIPTOR_FILE: &str = "module.toml" ;

#[derive( Error, Debug )]
pub enum DescriptorError {
	#[error( "Failed to access descriptor {}: {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
	#[error( "Malformed descriptor {}: {source}", path.display() )]
	Parse { path: PathBuf, source: toml::de::Error },
	#[error( "Failed to serialize descriptor for {module}: {source}" )]
	Serialize { module: String, source: toml::ser::Error },
}

/// The description of one module as read by the delegated topologies.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( deny_unknown_fields )]
pub struct ModuleDescriptor {
	pub name: String,
	/// Resource roots relative to the directory holding the descriptor.
	#[serde( default )]
	pub resources: Vec<PathBuf>,
	/// Names of the modules this one imports.
	#[serde( default )]
	pub dependencies: Vec<String>,
}

impl ModuleDescriptor {

	/// Writes the descriptor to `<dir>/module.toml`.
	///
	/// # Errors
	/// Fails if the descriptor can't be serialized or written.
	pub fn write_to( &self, dir: &Path ) -> Result<(), DescriptorError> {
		let path = dir.join( DESCRIPTOR_FILE );
		let text = toml::to_string( self )
			.map_err(| source | DescriptorError::Serialize { module: self.name.clone(), source })?;
		std::fs::write( &path, text ).map_err(| source | DescriptorError::Io { path, source })
	}

	/// Reads the descriptor from `<dir>/module.toml`.
	///
	/// # Errors
	/// Fails if the file is missing, unreadable or malformed.
	pub fn read_from( dir: &Path ) -> Result<Self, DescriptorError> {
		let path = dir.join( DESCRIPTOR_FILE );
		let text = std::fs::read_to_string( &path )
			.map_err(| source | DescriptorError::Io { path: path.clone(), source })?;
		toml::from_str( &text ).map_err(| source | DescriptorError::Parse { path, source })
	}

	/// The resource roots resolved against `dir`.
	pub fn resolved_resources( &self, dir: &Path ) -> Vec<PathBuf> {
		self.resources.iter().map(| resource | dir.join( resource )).collect()
	}

}
