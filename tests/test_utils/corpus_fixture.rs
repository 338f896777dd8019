#[allow( dead_code )]
mod corpus_fixture {

    use std::path::PathBuf ;
    use loader_bench::{ CorpusGenerator, CorpusShape, CorpusSummary, JarPacker, LayoutKind };
    use tempfile::TempDir ;
    use crate::fake_compiler::FakeCompiler ;

    /// Units defined per module by [`small_shape`]: two packages of four units, plus the entry.
    pub const UNITS_PER_MODULE: u64 = 2 * 4 + 1 ;

    /// A corpus shape small enough to generate in every test.
    pub fn small_shape( platform_modules: usize, plugins: usize ) -> CorpusShape {
        CorpusShape {
            platform_modules,
            plugins,
            packages_per_platform_module: 2,
            packages_per_plugin: 2,
            units_per_package: 4,
            base_methods: 2,
            impl_methods: 3,
            ..CorpusShape::default()
        }
    }

    pub fn generator( platform_modules: usize, plugins: usize ) -> CorpusGenerator<FakeCompiler, JarPacker> {
        CorpusGenerator::new( small_shape( platform_modules, plugins ), FakeCompiler::new(), JarPacker )
    }

    pub struct Corpus {
        // keeps the directory alive
        pub dir: TempDir,
        pub root: PathBuf,
        pub summary: CorpusSummary,
    }

    /// Generates a corpus under a fresh temporary directory.
    pub fn generate( layout: LayoutKind, platform_modules: usize, plugins: usize ) -> Corpus {
        let dir = tempfile::tempdir().expect( "Failed to create temp dir" );
        let root = dir.path().join( "repo" );
        let summary = generator( platform_modules, plugins )
            .generate( &root, layout )
            .expect( "Failed to generate corpus" );
        Corpus { dir, root, summary }
    }

    /// Lists the entries of a jar.
    pub fn jar_entries( path: &std::path::Path ) -> Vec<String> {
        let file = std::fs::File::open( path ).expect( "Failed to open jar" );
        let archive = zip::ZipArchive::new( file ).expect( "Failed to read jar" );
        archive.file_names().map( str::to_string ).collect()
    }

}
