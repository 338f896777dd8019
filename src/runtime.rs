//! Symbol resolution and initialization.
//!
//! [`HostRuntime`] is the seam between the benchmark and whatever actually
//! loads compiled units. [`NativeRuntime`] implements it over the `.class` files
//! of a corpus, following class-loader semantics closely enough that the shape
//! of a [`LoadingScope`] graph shows up in both the wall-clock time and the
//! [`Counters`]:
//!
//! - a scope first answers from the units it already defined, then delegates to
//! 	its parent (or the system root), then to the scopes it imports, and only
//! 	then searches its own resource roots;
//! - a unit is initialized once per defining scope, superclass first;
//! - invoking a unit's `init()` initializes it and then invokes `init()` on every
//! 	unit it references that way, which is how instantiating a module `Entry`
//! 	cascades through the module and its dependencies.

use std::sync::{ Arc, Mutex, PoisonError };
use std::time::Instant ;
use thiserror::Error ;
use tracing::trace ;

use crate::classfile::{ self, ClassFileError };
use crate::counters::{ CounterSnapshot, Counters };
use crate::scope::{ LoadedUnit, LoadingScope };



/// Initializer chains deeper than this are reported instead of followed.
pub const MAX_INITIALIZER_DEPTH: usize = 256 ;

/// Why a symbol could not be resolved or initialized.
#[derive( Error, Debug )]
pub enum ResolutionError {
	#[error( "Symbol {symbol} not found in scope {scope}" )]
	NotFound { symbol: String, scope: String },
	#[error( "Compiled unit {symbol} is malformed: {source}" )]
	Malformed { symbol: String, source: ClassFileError },
	#[error( "Compiled unit at the path of {symbol} declares {found}" )]
	WrongName { symbol: String, found: String },
	#[error( "Initializer chain through {symbol} is deeper than {depth}" )]
	InitializerTooDeep { symbol: String, depth: usize },
	#[error( "Failed to read {symbol} in scope {scope}: {source}" )]
	Io { symbol: String, scope: String, source: std::io::Error },
}

/// Resolves symbols within scopes and keeps lookup counters.
pub trait HostRuntime {

	/// Resolves `symbol` within `scope` and instantiates it, running its whole
	/// initializer cascade before returning.
	///
	/// # Errors
	/// Fails if the symbol, or anything its initializer reaches, can't be resolved.
	fn resolve_and_initialize( &self, symbol: &str, scope: &LoadingScope ) -> Result<(), ResolutionError> ;

	fn reset_counters( &self );

	fn counters( &self ) -> CounterSnapshot ;

}

/// Units the system root provides. They're never read from a corpus.
fn is_system_symbol( symbol: &str ) -> bool { symbol.starts_with( "java." )}

fn unit_path( symbol: &str ) -> String { format!( "{}.class", symbol.replace( '.', "/" ))}

/// Class-loader emulation over compiled units on disk.
#[derive( Debug, Default )]
pub struct NativeRuntime {
	counters: Counters,
	initialization_log: Mutex<Option<Vec<String>>>,
}

impl NativeRuntime {

	pub fn new() -> Self { Self::default() }

	/// Records the name of every unit whose `init()` is invoked.
	pub fn with_initialization_log( self ) -> Self {
		Self { initialization_log: Mutex::new( Some( Vec::new() )), ..self }
	}

	/// Drains the initialization log. Empty if logging is disabled.
	pub fn take_initialization_log( &self ) -> Vec<String> {
		self.initialization_log.lock().unwrap_or_else( PoisonError::into_inner )
			.as_mut()
			.map( std::mem::take )
			.unwrap_or_default()
	}

	/// Loads `symbol` through `scope` and returns it with the scope that defined it.
	fn load<'s>( &self, symbol: &str, scope: &'s LoadingScope, depth: usize ) -> Result<Option<( Arc<LoadedUnit>, &'s LoadingScope )>, ResolutionError> {

		if depth > MAX_INITIALIZER_DEPTH {
			return Err( ResolutionError::InitializerTooDeep { symbol: symbol.to_string(), depth: MAX_INITIALIZER_DEPTH })
		}
		if let Some( unit ) = scope.defined( symbol ) { return Ok( Some(( unit, scope ))) }

		let delegation_started = Instant::now();
		if let Some( parent ) = scope.parent() {
			if let Some( found ) = self.load( symbol, parent, depth )? { return Ok( Some( found )) }
		}
		for import in scope.imports() {
			if let Some( found ) = self.load( symbol, import, depth )? { return Ok( Some( found )) }
		}
		let delegation_time = delegation_started.elapsed();

		let find_started = Instant::now();
		let Some( bytes ) = self.read( symbol, scope )? else { return Ok( None ) };
		let info = classfile::parse( &bytes )
			.map_err(| source | ResolutionError::Malformed { symbol: symbol.to_string(), source })?;
		if info.name != symbol {
			return Err( ResolutionError::WrongName { symbol: symbol.to_string(), found: info.name })
		}

		if let Some( super_name ) = info.super_name.as_deref().filter(| name | !is_system_symbol( name )) {
			self.load_required( super_name, scope, depth + 1 )?;
		}

		let unit = scope.define( LoadedUnit::new( info ));
		self.counters.record_find( find_started.elapsed(), delegation_time );
		trace!( "{} defined {}", scope, symbol );
		Ok( Some(( unit, scope )))

	}

	fn load_required<'s>( &self, symbol: &str, scope: &'s LoadingScope, depth: usize ) -> Result<( Arc<LoadedUnit>, &'s LoadingScope ), ResolutionError> {
		self.load( symbol, scope, depth )?
			.ok_or_else(|| ResolutionError::NotFound { symbol: symbol.to_string(), scope: scope.name().to_string() })
	}

	fn read( &self, symbol: &str, scope: &LoadingScope ) -> Result<Option<Vec<u8>>, ResolutionError> {
		let started = Instant::now();
		let bytes = scope.find_resource( &unit_path( symbol ))
			.map_err(| source | ResolutionError::Io { symbol: symbol.to_string(), scope: scope.name().to_string(), source })?;
		if bytes.is_some() { self.counters.record_read( started.elapsed() ); }
		Ok( bytes )
	}

	/// Runs class initialization of `unit` unless its defining scope already did, superclass first.
	fn initialize( &self, unit: &LoadedUnit, scope: &LoadingScope, depth: usize ) -> Result<(), ResolutionError> {
		if !unit.begin_initialization() { return Ok(()) }
		match unit.info().super_name.as_deref().filter(| name | !is_system_symbol( name )) {
			Some( super_name ) => {
				let ( super_unit, super_scope ) = self.load_required( super_name, scope, depth + 1 )?;
				self.initialize( &super_unit, super_scope, depth + 1 )
			}
			None => Ok(()),
		}
	}

	/// Invokes the static `init()` of `unit`.
	fn invoke_init( &self, unit: &LoadedUnit, scope: &LoadingScope, depth: usize ) -> Result<(), ResolutionError> {

		if depth > MAX_INITIALIZER_DEPTH {
			return Err( ResolutionError::InitializerTooDeep { symbol: unit.name().to_string(), depth: MAX_INITIALIZER_DEPTH })
		}

		self.initialize( unit, scope, depth )?;
		if let Some( log ) = self.initialization_log.lock().unwrap_or_else( PoisonError::into_inner ).as_mut() {
			log.push( unit.name().to_string() );
		}

		unit.info().init_calls.iter()
			.filter(| target | *target != unit.name() && !is_system_symbol( target ))
			.try_for_each(| target | {
				let ( target_unit, target_scope ) = self.load_required( target, scope, depth + 1 )?;
				self.invoke_init( &target_unit, target_scope, depth + 1 )
			})

	}

}

impl HostRuntime for NativeRuntime {

	fn resolve_and_initialize( &self, symbol: &str, scope: &LoadingScope ) -> Result<(), ResolutionError> {
		let ( unit, defining_scope ) = self.load_required( symbol, scope, 0 )?;
		self.invoke_init( &unit, defining_scope, 0 )
	}

	fn reset_counters( &self ) { self.counters.reset() }

	fn counters( &self ) -> CounterSnapshot { self.counters.snapshot() }

}
