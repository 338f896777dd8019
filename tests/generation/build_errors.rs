use std::path::PathBuf ;
use loader_bench::{
    BuildError, CorpusGenerator, CorpusShape, GenerateError, JarPacker, LayoutKind,
    ModuleBuilder, ModuleRole, ModuleSpec, OutputRegistry, ConfigError,
};
use crate::corpus_fixture::small_shape ;
use crate::fake_compiler::{ FakeCompiler, RejectingCompiler };

fn plugin_spec() -> ModuleSpec {
    ModuleSpec {
        name: "plugin1".to_string(),
        role: ModuleRole::Plugin,
        packages: 2,
        dependencies: vec![ "platform1".to_string(), "platform2".to_string(), "platform3".to_string() ],
    }
}

fn platform_spec( name: &str ) -> ModuleSpec {
    ModuleSpec { name: name.to_string(), role: ModuleRole::Platform, packages: 2, dependencies: Vec::new() }
}

#[test]
fn build_errors_missing_dependencies_are_all_listed() {

    let mut registry = OutputRegistry::new();
    registry.record( "platform1", PathBuf::from( "platform1/classes" )).expect( "Failed to record output" );

    match registry.classpath_for( "plugin1", &plugin_spec().dependencies ) {
        Err( BuildError::MissingDependencies { module, missing }) => {
            assert_eq!( module, "plugin1" );
            assert_eq!( missing, [ "platform2", "platform3" ]);
        }
        other => panic!( "Expected MissingDependencies, found {:?}", other ),
    }

}

#[test]
fn build_errors_missing_dependencies_abort_before_writing() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let compiler = FakeCompiler::new();
    let shape = small_shape( 3, 1 );
    let builder = ModuleBuilder::new( &compiler, dir.path(), &shape );

    let result = builder.build( &plugin_spec(), &mut OutputRegistry::new() );
    assert!( matches!( result, Err( BuildError::MissingDependencies { ref missing, .. }) if missing.len() == 3 ));
    assert_eq!( compiler.invocations(), 0 );
    assert!( !dir.path().join( ".scratch" ).exists() );
    assert!( !dir.path().join( "plugin1" ).exists() );

}

#[test]
fn build_errors_output_recorded_once() {

    let mut registry = OutputRegistry::new();
    registry.record( "platform1", PathBuf::from( "a" )).expect( "Failed to record output" );
    assert!( matches!( registry.record( "platform1", PathBuf::from( "b" )), Err( BuildError::AlreadyBuilt( ref module )) if module == "platform1" ));
    assert_eq!( registry.get( "platform1" ), Some( PathBuf::from( "a" ).as_path() ));
    assert_eq!( registry.len(), 1 );

}

#[test]
fn build_errors_successful_build_is_recorded() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let compiler = FakeCompiler::new();
    let shape = small_shape( 1, 1 );
    let builder = ModuleBuilder::new( &compiler, dir.path(), &shape );
    let mut registry = OutputRegistry::new();

    let output = builder.build( &platform_spec( "platform1" ), &mut registry ).expect( "Failed to build module" );
    assert_eq!( output, dir.path().join( "platform1" ).join( "classes" ));
    assert_eq!( registry.get( "platform1" ), Some( output.as_path() ));
    assert!( output.join( "org/platform1/Entry.class" ).is_file() );
    assert!( !dir.path().join( ".scratch" ).join( "module-platform1-src" ).exists() );

}

#[test]
fn build_errors_diagnostics_fail_the_build() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let shape = small_shape( 1, 1 );
    let builder = ModuleBuilder::new( &RejectingCompiler, dir.path(), &shape );
    let mut registry = OutputRegistry::new();

    match builder.build( &platform_spec( "platform1" ), &mut registry ) {
        Err( BuildError::Compilation { module, diagnostics }) => {
            assert_eq!( module, "platform1" );
            assert_eq!( diagnostics.len(), 1 );
            assert!( diagnostics[0].0.ends_with( "error: rejected" ));
        }
        other => panic!( "Expected Compilation, found {:?}", other ),
    }
    assert!( registry.is_empty() );
    // kept for inspection
    assert!( dir.path().join( ".scratch" ).join( "module-platform1-src" ).join( "org/platform1/Entry.java" ).is_file() );

}

#[test]
fn build_errors_classpath_is_the_only_source_of_dependencies() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let compiler = FakeCompiler::new();
    let shape = small_shape( 3, 1 );
    let builder = ModuleBuilder::new( &compiler, dir.path(), &shape );

    // every dependency is "built", but into an empty directory
    let empty = dir.path().join( "empty" );
    std::fs::create_dir_all( &empty ).expect( "Failed to create dir" );
    let mut registry = OutputRegistry::new();
    for platform in [ "platform1", "platform2", "platform3" ] {
        registry.record( platform, empty.clone() ).expect( "Failed to record output" );
    }

    match builder.build( &plugin_spec(), &mut registry ) {
        Err( BuildError::Compilation { diagnostics, .. }) => {
            assert_eq!( diagnostics.len(), 3 );
            assert!( diagnostics.iter().all(| diagnostic | diagnostic.0.contains( "cannot find symbol org.platform" )));
        }
        other => panic!( "Expected Compilation, found {:?}", other ),
    }

}

#[test]
fn build_errors_abort_generation() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let root = dir.path().join( "repo" );
    let generator = CorpusGenerator::new( small_shape( 2, 1 ), RejectingCompiler, JarPacker );

    let result = generator.generate( &root, LayoutKind::ManyJars );
    assert!( matches!( result, Err( GenerateError::Build( BuildError::Compilation { ref module, .. })) if module == "platform1" ));
    assert!( !root.join( "platform2" ).exists() );

}

#[test]
fn build_errors_invalid_shape() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let shape = CorpusShape { platform_modules: 0, ..CorpusShape::default() };
    let generator = CorpusGenerator::new( shape, FakeCompiler::new(), JarPacker );

    let result = generator.generate( &dir.path().join( "repo" ), LayoutKind::Directories );
    assert!( matches!( result, Err( GenerateError::Config( ConfigError::InvalidShape( _ )))));

}
