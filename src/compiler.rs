//! The compile collaborator.
//!
//! Turning generated sources into compiled units is delegated to an external
//! toolchain behind the [`Compiler`] trait. [`Javac`] drives the JDK compiler as
//! a child process; tests substitute their own implementation.

use std::path::{ Path, PathBuf };
use std::process::Command ;
use tracing::debug ;



/// Environment variables the JVM launcher echoes back as a `Picked up ...` banner.
const LAUNCHER_OPTION_VARIABLES: [&str; 3] = [ "JAVA_TOOL_OPTIONS", "_JAVA_OPTIONS", "JDK_JAVA_OPTIONS" ];

/// One message reported by the compiler. Any diagnostic fails the build.
///
/// A message may span several lines, such as the offending source line and a caret.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Diagnostic( pub String );

impl std::fmt::Display for Diagnostic {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 )}
}

/// Compiles a set of source files into an output directory.
pub trait Compiler {
	/// Compiles `sources` into `output_dir`, resolving references against `classpath`.
	///
	/// An empty diagnostic list means success.
	///
	/// # Errors
	/// Returns an I/O error only if the compiler couldn't be run at all; problems with the
	/// sources themselves are reported as diagnostics.
	fn compile( &self, sources: &[PathBuf], output_dir: &Path, classpath: &[PathBuf] ) -> std::io::Result<Vec<Diagnostic>> ;
}

/// Runs the JDK `javac` executable.
#[derive( Debug, Clone )]
pub struct Javac {
	program: PathBuf,
}

impl Javac {
	pub fn new( program: impl Into<PathBuf> ) -> Self { Self { program: program.into() }}
}

impl Default for Javac {
	fn default() -> Self { Self::new( "javac" )}
}

impl Compiler for Javac {
	fn compile( &self, sources: &[PathBuf], output_dir: &Path, classpath: &[PathBuf] ) -> std::io::Result<Vec<Diagnostic>> {

		let classpath = std::env::join_paths( classpath )
			.map_err(| err | std::io::Error::new( std::io::ErrorKind::InvalidInput, err ))?;

		let mut command = Command::new( &self.program );
		LAUNCHER_OPTION_VARIABLES.iter().for_each(| variable | { command.env_remove( variable ); });
		command
			.arg( "-encoding" ).arg( "UTF-8" )
			.arg( "-d" ).arg( output_dir )
			.arg( "-classpath" ).arg( classpath )
			.args( sources );

		debug!( "Running {} on {} sources", self.program.display(), sources.len() );
		let output = command.output()?;

		let mut diagnostics = parse_output( &String::from_utf8_lossy( &output.stderr ));
		diagnostics.extend( parse_output( &String::from_utf8_lossy( &output.stdout )));

		if !output.status.success() && diagnostics.is_empty() {
			diagnostics.push( Diagnostic( format!( "{} exited with {}", self.program.display(), output.status )));
		}

		Ok( diagnostics )

	}
}

/// Groups `javac` output into diagnostics.
///
/// A diagnostic starts at a `<file>:<line>: error:` style header (or a bare
/// `error:`, `warning:` or `Note:` line) and takes every following line up to the
/// next header. Launcher banners and the trailing `N errors` count are dropped.
pub fn parse_output( output: &str ) -> Vec<Diagnostic> {

	let mut diagnostics: Vec<Diagnostic> = Vec::new();
	for line in output.lines().map( str::trim_end ).filter(| line | !line.is_empty() ) {
		if line.starts_with( "Picked up " ) || is_count_footer( line ) { continue }
		match ( is_message_header( line ), diagnostics.last_mut() ) {
			( false, Some( Diagnostic( message ))) => { message.push( '\n' ); message.push_str( line ); }
			_ => diagnostics.push( Diagnostic( line.to_string() )),
		}
	}
	diagnostics

}

fn is_message_header( line: &str ) -> bool {
	[ "error: ", "warning: ", "Note: " ].iter().any(| kind | line.starts_with( kind ))
		|| [ ": error: ", ": warning: " ].iter().any(| kind | line.contains( kind ))
}

fn is_count_footer( line: &str ) -> bool {
	match line.split_once( ' ' ) {
		Some(( count, noun )) => !count.is_empty()
			&& count.bytes().all(| byte | byte.is_ascii_digit() )
			&& matches!( noun, "error" | "errors" | "warning" | "warnings" ),
		None => false,
	}
}
