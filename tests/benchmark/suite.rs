use loader_bench::{ BenchmarkRunner, JarPacker, LayoutKind, NativeRuntime, Suite, SuiteError, TopologyKind, BenchError };
use crate::corpus_fixture::{ UNITS_PER_MODULE, generator, small_shape };
use crate::fake_compiler::RejectingCompiler ;
use crate::counting_runtime::CountingRuntime ;

#[test]
fn suite_runs_the_whole_matrix() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let root = dir.path().join( "suite" );
    std::fs::create_dir_all( root.join( "stale" )).expect( "Failed to create dir" );

    let suite = Suite::new(
        generator( 2, 1 ),
        BenchmarkRunner::new( NativeRuntime::new() ),
        vec![ TopologyKind::StandardCommon, TopologyKind::DelegatedPerModule ],
    );
    let entries = suite.run( &root ).expect( "Failed to run suite" );

    let cells = entries.iter().map(| entry | ( entry.layout, entry.report.topology.as_str() )).collect::<Vec<_>>();
    assert_eq!( cells, [
        ( LayoutKind::SingleJar, "standard-common" ),
        ( LayoutKind::SingleJar, "delegated-per-module" ),
        ( LayoutKind::ManyJars, "standard-common" ),
        ( LayoutKind::ManyJars, "delegated-per-module" ),
        ( LayoutKind::Directories, "standard-common" ),
        ( LayoutKind::Directories, "delegated-per-module" ),
    ]);
    assert!( entries.iter().all(| entry | entry.report.plugin_count == 1 && entry.report.counters.find_count == 3 * UNITS_PER_MODULE ));

    ( 1..=6 ).for_each(| index | assert!( root.join( format!( "repo{}", index )).join( "plugin1" ).is_dir() ));
    assert!( !root.join( "repo7" ).exists() );
    assert!( !root.join( "stale" ).exists() );

    let json = serde_json::to_value( &entries ).expect( "Failed to serialize entries" );
    assert_eq!( json[0]["layout"], "single-jar" );
    assert_eq!( json[5]["report"]["counters"]["find_count"], 3 * UNITS_PER_MODULE );

}

#[test]
fn suite_stops_at_first_failure() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let generator = loader_bench::CorpusGenerator::new( small_shape( 2, 1 ), RejectingCompiler, JarPacker );
    let suite = Suite::new( generator, BenchmarkRunner::new( CountingRuntime::new() ), TopologyKind::ALL.to_vec() );

    match suite.run( dir.path() ) {
        Err( SuiteError::Generate { layout, topology, .. }) => {
            assert_eq!( layout, LayoutKind::SingleJar );
            assert_eq!( topology, TopologyKind::StandardPerPlugin );
        }
        other => panic!( "Expected Generate, found {:?}", other ),
    }
    assert!( !dir.path().join( "repo2" ).exists() );

}

#[test]
fn suite_reports_benchmark_failures() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let suite = Suite::new(
        generator( 2, 1 ),
        BenchmarkRunner::new( CountingRuntime::failing_on( "org.plugin1.Entry" )),
        vec![ TopologyKind::IndexedCommon ],
    );

    assert!( matches!( suite.run( dir.path() ), Err( SuiteError::Bench {
        layout: LayoutKind::SingleJar,
        topology: TopologyKind::IndexedCommon,
        source: BenchError::Resolution { .. },
    })));

}
