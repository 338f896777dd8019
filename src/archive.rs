//! The archive-packaging collaborator.
//!
//! [`JarPacker`] writes jar files: a zip archive with a `META-INF/MANIFEST.MF`
//! entry followed by the contents of one or more compiled-unit directories.
//! When several modules are merged into one archive, a path already written by
//! an earlier directory is skipped rather than duplicated.

use std::collections::HashSet ;
use std::fs::File ;
use std::io::{ BufWriter, Write };
use std::path::{ Path, PathBuf };
use thiserror::Error ;
use tracing::debug ;
use zip::ZipWriter ;
use zip::write::SimpleFileOptions ;



/// Errors that can occur while writing an archive.
#[derive( Error, Debug )]
pub enum PackError {
	#[error( "I/O error packing {}: {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
	#[error( "Zip error writing {}: {source}", archive.display() )]
	Zip { archive: PathBuf, source: zip::result::ZipError },
}

/// Packs directories of compiled units into a single archive.
pub trait Packer {
	/// Writes `archive`, appending the contents of each of `source_dirs` under
	/// archive-root-relative paths.
	///
	/// # Errors
	/// Returns an error if a source directory can't be read or the archive can't be written.
	fn pack( &self, archive: &Path, source_dirs: &[PathBuf] ) -> Result<(), PackError> ;
}

/// Writes deflated jar archives.
#[derive( Debug, Clone, Copy, Default )]
pub struct JarPacker ;

impl JarPacker {
	const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF" ;
	const MANIFEST: &[u8] = b"Manifest-Version: 1.0\r\n\r\n" ;
}

impl Packer for JarPacker {
	fn pack( &self, archive: &Path, source_dirs: &[PathBuf] ) -> Result<(), PackError> {

		let zip_error = | source | PackError::Zip { archive: archive.to_path_buf(), source };
		let file = File::create( archive ).map_err(| source | PackError::Io { path: archive.to_path_buf(), source })?;
		let mut writer = ZipWriter::new( BufWriter::new( file ));
		let options = SimpleFileOptions::default().compression_method( zip::CompressionMethod::Deflated );

		writer.add_directory( "META-INF/", options ).map_err( zip_error )?;
		writer.start_file( Self::MANIFEST_PATH, options ).map_err( zip_error )?;
		writer.write_all( Self::MANIFEST ).map_err(| source | PackError::Io { path: archive.to_path_buf(), source })?;

		let mut written = HashSet::from([ "META-INF/".to_string(), Self::MANIFEST_PATH.to_string() ]);
		for source_dir in source_dirs {
			add_dir_recursively( &mut writer, archive, source_dir, "", options, &mut written )?;
		}

		writer.finish().map_err( zip_error )?
			.flush().map_err(| source | PackError::Io { path: archive.to_path_buf(), source })?;
		debug!( "Packed {} entries into {}", written.len(), archive.display() );
		Ok(())

	}
}

fn add_dir_recursively<W: Write + std::io::Seek>(
	writer: &mut ZipWriter<W>,
	archive: &Path,
	dir: &Path,
	prefix: &str,
	options: SimpleFileOptions,
	written: &mut HashSet<String>,
) -> Result<(), PackError> {

	let io_error = | path: &Path | { let path = path.to_path_buf(); move | source | PackError::Io { path, source }};
	let zip_error = | source | PackError::Zip { archive: archive.to_path_buf(), source };

	let mut entries = std::fs::read_dir( dir ).map_err( io_error( dir ))?
		.collect::<Result<Vec<_>, _>>().map_err( io_error( dir ))?;
	entries.sort_by_key( std::fs::DirEntry::file_name );

	for entry in entries {
		let path = entry.path();
		let name = format!( "{}{}", prefix, entry.file_name().to_string_lossy() );
		match path.is_dir() {
			true => {
				let dir_name = format!( "{}/", name );
				if written.insert( dir_name.clone() ) { writer.add_directory( dir_name.as_str(), options ).map_err( zip_error )?; }
				add_dir_recursively( writer, archive, &path, &dir_name, options, written )?;
			}
			false => {
				if !written.insert( name.clone() ) { continue }
				writer.start_file( name.as_str(), options ).map_err( zip_error )?;
				let bytes = std::fs::read( &path ).map_err( io_error( &path ))?;
				writer.write_all( &bytes ).map_err( io_error( &path ))?;
			}
		}
	}

	Ok(())

}
