use loader_bench::{ BenchError, BenchmarkRunner, LayoutKind, ResolutionError, TopologyError, TopologyKind };
use crate::corpus_fixture::generate ;
use crate::counting_runtime::CountingRuntime ;

#[test]
fn runner_resolves_every_entry_in_order() {

    let corpus = generate( LayoutKind::ManyJars, 3, 2 );
    let runner = BenchmarkRunner::new( CountingRuntime::new() );

    let report = runner.run( &corpus.root, TopologyKind::StandardCommon.topology().as_ref() ).expect( "Failed to run benchmark" );

    assert_eq!( runner.runtime().requests(), [
        ( "org.plugin1.Entry".to_string(), "common".to_string() ),
        ( "org.plugin2.Entry".to_string(), "common".to_string() ),
    ]);
    assert_eq!( runner.runtime().resets(), 1 );
    assert_eq!( report.topology, "standard-common" );
    assert_eq!( report.plugin_count, 2 );
    assert_eq!( report.counters.find_count, 2 );
    assert!( report.to_string().starts_with( "standard-common: 2 plugins loaded in " ));
    assert!( report.to_string().ends_with( "ms" ));

}

#[test]
fn runner_uses_assigned_scopes() {

    let corpus = generate( LayoutKind::Directories, 2, 3 );
    let runner = BenchmarkRunner::new( CountingRuntime::new() );
    runner.run( &corpus.root, TopologyKind::IndexedPerPlugin.topology().as_ref() ).expect( "Failed to run benchmark" );

    let scopes = runner.runtime().requests().into_iter().map(|( _, scope )| scope ).collect::<Vec<_>>();
    assert_eq!( scopes, [ "plugin1", "plugin2", "plugin3" ]);

}

#[test]
fn runner_counters_reset_per_run() {

    let corpus = generate( LayoutKind::ManyJars, 2, 2 );
    let runner = BenchmarkRunner::new( CountingRuntime::new() );
    let topology = TopologyKind::DelegatedAggregate.topology();

    let first = runner.run( &corpus.root, topology.as_ref() ).expect( "Failed to run benchmark" );
    let second = runner.run( &corpus.root, topology.as_ref() ).expect( "Failed to run benchmark" );

    assert_eq!( first.counters.find_count, 2 );
    assert_eq!( second.counters.find_count, 2 );
    assert_eq!( runner.runtime().resets(), 2 );

}

#[test]
fn runner_first_failure_aborts() {

    let corpus = generate( LayoutKind::ManyJars, 2, 3 );
    let runner = BenchmarkRunner::new( CountingRuntime::failing_on( "org.plugin2.Entry" ));

    match runner.run( &corpus.root, TopologyKind::StandardCommon.topology().as_ref() ) {
        Err( BenchError::Resolution { plugin, source: ResolutionError::NotFound { symbol, .. }}) => {
            assert_eq!( plugin, "plugin2" );
            assert_eq!( symbol, "org.plugin2.Entry" );
        }
        other => panic!( "Expected Resolution, found {:?}", other ),
    }
    // plugin1 stays resolved, plugin3 is never attempted
    assert_eq!( runner.runtime().requests().len(), 2 );

}

#[test]
fn runner_malformed_corpus() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    let runner = BenchmarkRunner::new( CountingRuntime::new() );

    let result = runner.run( dir.path(), TopologyKind::StandardPerPlugin.topology().as_ref() );
    assert!( matches!( result, Err( BenchError::Topology( TopologyError::MalformedCorpus { .. }))));
    assert_eq!( runner.runtime().resets(), 0 );
    assert!( runner.runtime().requests().is_empty() );

}
