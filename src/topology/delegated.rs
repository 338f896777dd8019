use std::collections::HashMap ;
use std::path::Path ;
use std::sync::Arc ;
use pipe_trait::Pipe ;
use tracing::debug ;

use crate::corpus::AGGREGATE_MODULE ;
use crate::descriptor::ModuleDescriptor ;
use crate::scope::{ LoadingScope, LookupStrategy };
use super::{ CorpusListing, LoaderTopology, ScopeAssignment, TopologyError };
use super::listing::entry_name ;



/// How [`DelegatedModules`] maps plugins onto module scopes.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum DelegationMode {
    /// Every module gets its own scope importing the scopes of its dependencies.
    PerModule,
    /// The aggregate module at the corpus root is resolved once and shared by every plugin.
    Aggregate,
}

/// Scopes derived from the module descriptors of the corpus.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct DelegatedModules {
    pub mode: DelegationMode,
}

#[derive( Debug )]
enum ModuleState {
    Loaded( Arc<LoadingScope> ),
    Borrowed,
}

impl LoaderTopology for DelegatedModules {
    fn create_scopes( &self, corpus_root: &Path ) -> Result<ScopeAssignment, TopologyError> {

        let listing = CorpusListing::scan( corpus_root )?;
        let plugins = listing.plugins().into_iter().map(| entry | entry_name( entry ));

        match self.mode {
            DelegationMode::PerModule => {
                let mut modules = HashMap::new();
                let assignment = plugins
                    .map(| name | Ok(( name.clone(), resolve_module( corpus_root, &name, &mut modules )? )))
                    .collect::<Result<ScopeAssignment, TopologyError>>()?;
                debug!( "Resolved {} module scopes", modules.len() );
                Ok( assignment )
            }
            DelegationMode::Aggregate => {
                let aggregate = ModuleDescriptor::read_from( corpus_root )
                    .map_err(| source | TopologyError::MissingModule { module: AGGREGATE_MODULE.to_string(), source })?
                    .pipe(| descriptor | module_scope( corpus_root, &descriptor, Vec::with_capacity( 0 )))
                    .pipe( Arc::new );
                debug!( "Resolved aggregate module over {} roots", aggregate.roots().len() );
                Ok( plugins.map(| name | ( name, Arc::clone( &aggregate ))).collect() )
            }
        }

    }
}

/// Resolves `name` and, before it, every module it depends on. Resolved scopes are memoized in `modules`.
fn resolve_module(
    corpus_root: &Path,
    name: &str,
    modules: &mut HashMap<String, ModuleState>,
) -> Result<Arc<LoadingScope>, TopologyError> {

    // NOTE: the entry is put back once the module is resolved
    match modules.insert( name.to_string(), ModuleState::Borrowed ) {
        Some( ModuleState::Borrowed ) => return Err( TopologyError::LoopDetected( name.to_string() )),
        Some( ModuleState::Loaded( scope )) => {
            modules.insert( name.to_string(), ModuleState::Loaded( Arc::clone( &scope )));
            return Ok( scope )
        }
        None => {}
    }

    let module_dir = corpus_root.join( name );
    let descriptor = ModuleDescriptor::read_from( &module_dir )
        .map_err(| source | TopologyError::MissingModule { module: name.to_string(), source })?;

    let imports = descriptor.dependencies.iter()
        .map(| dependency | resolve_module( corpus_root, dependency, modules ))
        .collect::<Result<Vec<_>, _>>()?;

    let scope = Arc::new( module_scope( &module_dir, &descriptor, imports ));
    modules.insert( name.to_string(), ModuleState::Loaded( Arc::clone( &scope )));
    Ok( scope )

}

fn module_scope( dir: &Path, descriptor: &ModuleDescriptor, imports: Vec<Arc<LoadingScope>> ) -> LoadingScope {
    LoadingScope::new( descriptor.name.clone(), descriptor.resolved_resources( dir ), LookupStrategy::Indexed )
        .with_imports( imports )
}

impl std::fmt::Display for DelegatedModules {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.write_str( match self.mode {
            DelegationMode::PerModule => "delegated-per-module",
            DelegationMode::Aggregate => "delegated-aggregate",
        })
    }
}
