use std::path::Path ;
use std::sync::Arc ;
use tracing::debug ;

use crate::scope::{ LoadingScope, LookupStrategy };
use super::{ CorpusListing, LoaderTopology, ScopeAssignment, TopologyError, lookup_prefix };



/// A shared platform scope and one isolated child scope per plugin.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct PerPluginIsolated {
    pub lookup: LookupStrategy,
}

impl LoaderTopology for PerPluginIsolated {
    fn create_scopes( &self, corpus_root: &Path ) -> Result<ScopeAssignment, TopologyError> {

        let listing = CorpusListing::scan( corpus_root )?;
        let platform = Arc::new( LoadingScope::new( "platform", listing.platform_roots(), self.lookup ));
        debug!( "Created platform scope over {} roots", platform.roots().len() );

        Ok( listing.plugin_roots().into_iter()
            .map(|( name, root )| {
                let scope = LoadingScope::new( name.clone(), [ root ], self.lookup ).with_parent( Arc::clone( &platform ));
                ( name, Arc::new( scope ))
            })
            .collect() )

    }
}

impl std::fmt::Display for PerPluginIsolated {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        write!( f, "{}-per-plugin", lookup_prefix( self.lookup ))
    }
}
