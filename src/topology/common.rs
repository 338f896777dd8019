use std::path::Path ;
use std::sync::Arc ;
use tracing::debug ;

use crate::scope::{ LoadingScope, LookupStrategy };
use super::{ CorpusListing, LoaderTopology, ScopeAssignment, TopologyError, lookup_prefix };



/// One flat scope over every resource root, shared by all plugins.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct CommonShared {
    pub lookup: LookupStrategy,
}

impl LoaderTopology for CommonShared {
    fn create_scopes( &self, corpus_root: &Path ) -> Result<ScopeAssignment, TopologyError> {

        let listing = CorpusListing::scan( corpus_root )?;
        let plugin_roots = listing.plugin_roots();
        let roots = listing.platform_roots().into_iter()
            .chain( plugin_roots.iter().map(|( _, root )| root.clone() ));
        let common = Arc::new( LoadingScope::new( "common", roots, self.lookup ));
        debug!( "Created common scope over {} roots", common.roots().len() );

        Ok( plugin_roots.into_iter().map(|( name, _ )| ( name, Arc::clone( &common ))).collect() )

    }
}

impl std::fmt::Display for CommonShared {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        write!( f, "{}-common", lookup_prefix( self.lookup ))
    }
}
