//! Source synthesis for individual units.
//!
//! Every generated unit is a small Java class. Leaf units carry a configurable
//! number of no-op instance methods; containers and entries carry an `init()`
//! body that calls `init()` on other units. Loading and instantiating a module's
//! `Entry` therefore drags every unit of the module, and the entries of all its
//! dependencies, through resolution and initialization.

use std::fmt::Write ;
use std::path::PathBuf ;
use itertools::Itertools ;



/// A package-qualified unit name such as `org.plugin1.pack3.Container`.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct QualifiedName( String );

impl QualifiedName {

	/// Wraps a dotted name.
	pub fn new( name: impl Into<String> ) -> Self { Self( name.into() )}

	/// Joins a package and a simple name.
	pub fn in_package( package: &str, simple_name: &str ) -> Self {
		match package.is_empty() {
			true => Self( simple_name.to_string() ),
			false => Self( format!( "{}.{}", package, simple_name )),
		}
	}

	/// The name of the `Entry` unit of `module`.
	pub fn entry_of( module: &str ) -> Self { Self( format!( "org.{}.Entry", module ))}

	#[inline] pub fn as_str( &self ) -> &str { &self.0 }

	/// Everything before the last dot, or `""` for the default package.
	pub fn package( &self ) -> &str {
		self.0.rsplit_once( '.' ).map_or( "", |( package, _ )| package )
	}

	/// Everything after the last dot.
	pub fn simple_name( &self ) -> &str {
		self.0.rsplit_once( '.' ).map_or( self.0.as_str(), |( _, name )| name )
	}

	/// Path of the source file relative to a source root, e.g. `org/plugin1/Entry.java`.
	pub fn source_path( &self ) -> PathBuf { PathBuf::from( format!( "{}.java", self.0.replace( '.', "/" )))}

	/// Archive-style path of the compiled unit, e.g. `org/plugin1/Entry.class`.
	///
	/// Always uses forward slashes, so it is valid both inside jars and as a relative
	/// path on every platform.
	pub fn unit_path( &self ) -> String { format!( "{}.class", self.0.replace( '.', "/" ))}

}

impl std::fmt::Display for QualifiedName {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 )}
}

/// Generated source text of one unit.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct UnitSource {
	pub name: QualifiedName,
	pub text: String,
}

/// Synthesizes a leaf unit with `method_count` no-op instance methods and an empty
/// static `init()`, optionally extending `super_type` (a simple name in the same package).
pub fn synthesize( name: &QualifiedName, method_count: usize, super_type: Option<&str> ) -> UnitSource {
	let methods = ( 1..=method_count )
		.map(| index | format!( "public void m{}(int p) {{\n}}", index ))
		.chain( std::iter::once( "public static void init(){}".to_string() ))
		.join( "\n" );
	render( name, super_type, &methods )
}

/// Synthesizes a container whose `init()` initializes each of `members`.
///
/// Member names are resolved relative to the container's own package.
pub fn synthesize_container( name: &QualifiedName, members: &[QualifiedName] ) -> UnitSource {
	let calls = members.iter().map(| member | match member.package() == name.package() {
		true => format!( "{}.init();", member.simple_name() ),
		false => format!( "{}.init();", member ),
	}).collect::<Vec<_>>();
	render( name, None, &init_method( &calls ))
}

/// Synthesizes a module entry.
///
/// Its `init()` initializes every package container of the module and then the entry
/// of every dependency module. The instance initializer `{init();}` makes plain
/// instantiation run that cascade.
pub fn synthesize_entry( name: &QualifiedName, containers: &[QualifiedName], dependency_entries: &[QualifiedName] ) -> UnitSource {
	let calls = containers.iter()
		.chain( dependency_entries )
		.map(| target | format!( "{}.init();", target ))
		.collect::<Vec<_>>();
	render( name, None, &format!( "{}\n{{init();}}", init_method( &calls )))
}

fn init_method( calls: &[String] ) -> String {
	let mut body = String::from( "public static void init(){\n" );
	calls.iter().for_each(| call | { let _ = writeln!( body, "{}", call ); });
	body.push_str( "}\n" );
	body
}

fn render( name: &QualifiedName, super_type: Option<&str>, body: &str ) -> UnitSource {
	let extends = super_type.map(| super_type | format!( " extends {}", super_type )).unwrap_or_default();
	let body = body.split( '\n' ).map(| line | format!( "    {}", line )).join( "\n" );
	let header = match name.package().is_empty() {
		true => String::new(),
		false => format!( "package {};\n", name.package() ),
	};
	UnitSource {
		name: name.clone(),
		text: format!( "{}public class {}{} {{\n{}\n}}\n", header, name.simple_name(), extends, body ),
	}
}
