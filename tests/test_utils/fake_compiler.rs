#[allow( dead_code )]
mod fake_compiler {

    use std::collections::HashSet ;
    use std::path::{ Path, PathBuf };
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use loader_bench::{ Compiler, Diagnostic };
    use loader_bench::synthesis::QualifiedName ;

    /// Stands in for `javac`: reads the generated sources just far enough to find each
    /// unit's name, superclass and `init()` calls, checks that every referenced unit is
    /// either being compiled or present on the classpath, and writes stub class files.
    #[derive( Debug, Default )]
    pub struct FakeCompiler {
        invocations: AtomicUsize,
    }

    impl FakeCompiler {
        pub fn new() -> Self { Self::default() }
        pub fn invocations( &self ) -> usize { self.invocations.load( Ordering::SeqCst ) }
    }

    #[derive( Debug )]
    struct ParsedUnit {
        source: PathBuf,
        name: QualifiedName,
        super_name: Option<String>,
        init_calls: Vec<String>,
    }

    fn parse_source( source: &Path ) -> std::io::Result<ParsedUnit> {

        let text = std::fs::read_to_string( source )?;
        let package = text.lines()
            .find_map(| line | line.trim().strip_prefix( "package " ))
            .map(| package | package.trim_end_matches( ';' ).to_string() )
            .unwrap_or_default();
        let qualify = | simple: &str | match simple.contains( '.' ) || package.is_empty() {
            true => simple.to_string(),
            false => format!( "{}.{}", package, simple ),
        };

        let declaration = text.lines()
            .find_map(| line | line.trim().strip_prefix( "public class " ))
            .expect( "generated source declares a class" );
        let mut words = declaration.split_whitespace();
        let simple_name = words.next().expect( "class name" ).to_string();
        let super_name = match words.next() {
            Some( "extends" ) => Some( qualify( words.next().expect( "superclass name" ))),
            _ => None,
        };

        let name = QualifiedName::in_package( &package, &simple_name );
        let mut init_calls = text.lines()
            .filter_map(| line | line.trim().strip_suffix( ".init();" ))
            .map( qualify )
            .collect::<Vec<_>>();
        if text.contains( "{init();}" ) { init_calls.push( name.to_string() ); }

        Ok( ParsedUnit { source: source.to_path_buf(), name, super_name, init_calls })

    }

    impl Compiler for FakeCompiler {
        fn compile( &self, sources: &[PathBuf], output_dir: &Path, classpath: &[PathBuf] ) -> std::io::Result<Vec<Diagnostic>> {

            self.invocations.fetch_add( 1, Ordering::SeqCst );
            let units = sources.iter().map(| source | parse_source( source )).collect::<std::io::Result<Vec<_>>>()?;
            let compiled = units.iter().map(| unit | unit.name.to_string() ).collect::<HashSet<_>>();

            let visible = | name: &str | compiled.contains( name ) || classpath.iter()
                .any(| root | root.join( QualifiedName::new( name ).unit_path() ).is_file() );

            let diagnostics = units.iter()
                .flat_map(| unit | unit.super_name.iter().chain( &unit.init_calls ).map( move | target | ( unit, target )))
                .filter(|( _, target )| !visible( target ))
                .map(|( unit, target )| Diagnostic( format!( "{}: error: cannot find symbol {}", unit.source.display(), target )))
                .collect::<Vec<_>>();
            if !diagnostics.is_empty() { return Ok( diagnostics ) }

            for unit in &units {
                let path = output_dir.join( unit.name.unit_path() );
                std::fs::create_dir_all( path.parent().expect( "unit path has a parent" ))?;
                let calls = unit.init_calls.iter().map( String::as_str ).collect::<Vec<_>>();
                let super_name = unit.super_name.as_deref().unwrap_or( "java.lang.Object" );
                std::fs::write( &path, crate::class_stub::encode( unit.name.as_str(), Some( super_name ), &calls ))?;
            }

            Ok( Vec::with_capacity( 0 ))

        }
    }

    /// Reports one diagnostic for every compilation.
    #[derive( Debug, Default )]
    pub struct RejectingCompiler ;

    impl Compiler for RejectingCompiler {
        fn compile( &self, sources: &[PathBuf], _: &Path, _: &[PathBuf] ) -> std::io::Result<Vec<Diagnostic>> {
            Ok( vec![ Diagnostic( format!( "{}: error: rejected", sources[0].display() ))])
        }
    }

}
