use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use tracing::debug ;

use crate::corpus::{ PLATFORM_PREFIX, PLUGIN_PREFIX, module_index };
use crate::module_builder::CLASSES_DIR ;
use super::TopologyError ;



/// The module entries found under a corpus root, each group ordered by index.
#[derive( Debug, Clone )]
pub struct CorpusListing {
    platform: NEVec<PathBuf>,
    plugins: NEVec<PathBuf>,
}

impl CorpusListing {

    /// Lists the `platform*` and `plugin*` entries of `root`.
    ///
    /// # Errors
    /// Returns [`TopologyError::MalformedCorpus`] if `root` doesn't exist or either
    /// group is empty.
    pub fn scan( root: &Path ) -> Result<Self, TopologyError> {

        let malformed = | reason: &str | TopologyError::MalformedCorpus { root: root.to_path_buf(), reason: reason.to_string() };
        if !root.is_dir() { return Err( malformed( "root directory does not exist" )) }

        let entries = std::fs::read_dir( root )
            .and_then(| entries | entries.collect::<Result<Vec<_>, _>>() )
            .map_err(| source | TopologyError::Io { path: root.to_path_buf(), source })?
            .into_iter()
            .map(| entry | entry.path() )
            .filter(| path | path.is_dir() )
            .filter_map(| path | Some(( path.file_name()?.to_string_lossy().into_owned(), path )))
            .collect_vec();

        // `plugin` and `platform` share no prefix, so the groups can't overlap
        let group = | prefix: &str | entries.iter()
            .filter(|( name, _ )| name.starts_with( prefix ))
            .sorted_by_key(|( name, _ )| module_index( name ))
            .map(|( _, path )| path.clone() )
            .collect_vec();

        let platform = NEVec::try_from_vec( group( PLATFORM_PREFIX )).ok_or_else(|| malformed( "no platform modules" ))?;
        let plugins = NEVec::try_from_vec( group( PLUGIN_PREFIX )).ok_or_else(|| malformed( "no plugin modules" ))?;
        debug!( "Found {} platform modules and {} plugins in {}", platform.len(), plugins.len(), root.display() );

        Ok( Self { platform, plugins })

    }

    #[inline] pub fn platform( &self ) -> &NEVec<PathBuf> { &self.platform }
    #[inline] pub fn plugins( &self ) -> &NEVec<PathBuf> { &self.plugins }

    /// Resource roots of every platform module, in order.
    pub fn platform_roots( &self ) -> Vec<PathBuf> {
        ( &self.platform ).into_iter().map(| entry | resource_root_for( entry )).collect()
    }

    /// Names of the plugins paired with their resource roots, in order.
    pub fn plugin_roots( &self ) -> Vec<( String, PathBuf )> {
        ( &self.plugins ).into_iter()
            .map(| entry | ( entry_name( entry ), resource_root_for( entry )))
            .collect()
    }

}

pub(super) fn entry_name( entry: &Path ) -> String {
    entry.file_name().map(| name | name.to_string_lossy().into_owned() ).unwrap_or_default()
}

/// The resource root of a module entry: its `classes` directory if there is one,
/// otherwise the archive named after the entry.
pub fn resource_root_for( entry: &Path ) -> PathBuf {
    let classes = entry.join( CLASSES_DIR );
    match classes.is_dir() {
        true => classes,
        false => entry.join( format!( "{}.jar", entry_name( entry ))),
    }
}
