//! Run configuration.
//!
//! Everything that shapes a run is passed in explicitly through [`BenchConfig`]:
//! the corpus geometry, the compiler executable and the log verbosity. The
//! configuration is read from a TOML file whose keys all have defaults, so an
//! empty file (or no file at all) reproduces the reference workload of 50
//! platform modules and 50 plugins.
//!
//! ```toml
//! verbose = true
//! javac = "/usr/lib/jvm/default/bin/javac"
//!
//! [corpus]
//! platform_modules = 10
//! plugins = 10
//! ```

use std::ops::Range ;
use std::path::{ Path, PathBuf };
use serde::{ Deserialize, Serialize };
use thiserror::Error ;



/// Errors raised while loading or validating a configuration.
#[derive( Error, Debug )]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error( "Failed to read config {}: {source}", path.display() )]
    Io { path: PathBuf, source: std::io::Error },
    /// The configuration file is not valid TOML or contains unknown keys.
    #[error( "Failed to parse config {}: {source}", path.display() )]
    Parse { path: PathBuf, source: toml::de::Error },
    /// The corpus shape cannot produce a well-formed corpus.
    #[error( "Invalid corpus shape: {0}" )]
    InvalidShape( String ),
}

/// Top-level configuration of the generator and the harness.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default, deny_unknown_fields )]
pub struct BenchConfig {
    /// Emit debug-level progress logs (one line per generated module, per scope, ...).
    pub verbose: bool,
    /// The `javac` executable used by [`Javac`]( crate::Javac ).
    pub javac: PathBuf,
    /// Geometry of the generated corpus.
    pub corpus: CorpusShape,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            javac: PathBuf::from( "javac" ),
            corpus: CorpusShape::default(),
        }
    }
}

impl BenchConfig {

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    /// Fails if the file can't be read, doesn't parse, or describes an invalid corpus shape.
    pub fn load( path: &Path ) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string( path )
            .map_err(| source | ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str( &text )
            .map_err(| source | ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.corpus.validate()?;
        Ok( config )
    }

}

/// Geometry of a synthetic corpus.
///
/// The dependency graph itself is fixed: platform modules have no dependencies
/// and every plugin depends on a sliding window of platform modules (see
/// [`window_for`]( Self::window_for )). Only the sizes vary.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default, deny_unknown_fields )]
pub struct CorpusShape {
    /// Number of platform modules (N).
    pub platform_modules: usize,
    /// Number of plugin modules (M).
    pub plugins: usize,
    /// Packages generated in every platform module.
    pub packages_per_platform_module: usize,
    /// Packages generated in every plugin module.
    pub packages_per_plugin: usize,
    /// Units per package: one `Base`, one `Container` and `units_per_package - 2` implementations.
    pub units_per_package: usize,
    /// Instance methods on every `Base` unit.
    pub base_methods: usize,
    /// Instance methods on every implementation unit.
    pub impl_methods: usize,
    /// Number of platform modules each plugin depends on, clamped to `platform_modules`.
    pub dependency_window: usize,
}

impl Default for CorpusShape {
    fn default() -> Self {
        Self {
            platform_modules: 50,
            plugins: 50,
            packages_per_platform_module: 10,
            packages_per_plugin: 10,
            units_per_package: 10,
            base_methods: 10,
            impl_methods: 15,
            dependency_window: 5,
        }
    }
}

impl CorpusShape {

    /// Checks that the shape can produce a corpus.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidShape`] if a module count or the window is zero,
    /// a module would have no packages, or a package can't hold a `Base` and a `Container`.
    pub fn validate( &self ) -> Result<(), ConfigError> {
        if self.platform_modules == 0 { return Err( ConfigError::InvalidShape( "at least one platform module is required".to_string() )) }
        if self.plugins == 0 { return Err( ConfigError::InvalidShape( "at least one plugin is required".to_string() )) }
        if self.packages_per_platform_module == 0 || self.packages_per_plugin == 0 {
            return Err( ConfigError::InvalidShape( "every module needs at least one package".to_string() ))
        }
        if self.units_per_package < 2 {
            return Err( ConfigError::InvalidShape( format!( "units_per_package must be at least 2, got {}", self.units_per_package )))
        }
        if self.dependency_window == 0 { return Err( ConfigError::InvalidShape( "dependency_window must be positive".to_string() )) }
        Ok(())
    }

    /// The effective window size, `min( dependency_window, platform_modules )`.
    #[inline] pub fn window_size( &self ) -> usize { self.dependency_window.min( self.platform_modules )}

    /// 0-based indices of the platform modules the plugin at `plugin_index` depends on.
    ///
    /// The window starts at `plugin_index mod ( N - w + 1 )` so it always fits inside the
    /// platform layer; with the default window of 5 this is `plugin_index mod ( N - 4 )`.
    pub fn window_for( &self, plugin_index: usize ) -> Range<usize> {
        let size = self.window_size();
        let from = plugin_index % ( self.platform_modules - size + 1 );
        from..from + size
    }

    /// Number of implementation units per package.
    #[inline] pub fn impls_per_package( &self ) -> usize { self.units_per_package.saturating_sub( 2 )}

}
