use std::path::Path ;
use loader_bench::topology::{ CorpusListing, resource_root_for };

fn make_dirs( root: &Path, names: &[&str] ) {
    names.iter().for_each(| name | std::fs::create_dir_all( root.join( name )).expect( "Failed to create dir" ));
}

#[test]
fn listing_orders_by_numeric_suffix() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    make_dirs( dir.path(), &[ "platform10", "platform2", "platform1", "plugin11", "plugin9", ".scratch", "other" ]);
    std::fs::write( dir.path().join( "plugin3" ), "not a directory" ).expect( "Failed to write file" );

    let listing = CorpusListing::scan( dir.path() ).expect( "Failed to scan corpus" );
    let platform = listing.platform().into_iter().map(| path | path.file_name().unwrap().to_string_lossy().into_owned() ).collect::<Vec<_>>();
    let plugins = listing.plugin_roots().into_iter().map(|( name, _ )| name ).collect::<Vec<_>>();

    assert_eq!( platform, [ "platform1", "platform2", "platform10" ]);
    assert_eq!( plugins, [ "plugin9", "plugin11" ]);
    assert_eq!( listing.plugins().len().get(), 2 );

}

#[test]
fn listing_resource_root() {

    let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
    make_dirs( dir.path(), &[ "plugin1/classes", "plugin2" ]);

    assert_eq!( resource_root_for( &dir.path().join( "plugin1" )), dir.path().join( "plugin1/classes" ));
    assert_eq!( resource_root_for( &dir.path().join( "plugin2" )), dir.path().join( "plugin2/plugin2.jar" ));

}
