use std::path::PathBuf ;
use std::process::ExitCode ;
use clap::{ Parser, Subcommand };
use serde::Serialize ;
use tracing::Level ;

use loader_bench::{
	BenchConfig, BenchmarkRunner, CorpusGenerator, JarPacker, Javac, LayoutKind,
	NativeRuntime, Suite, TopologyKind,
};



#[derive( Parser )]
#[command( name = "loader-bench", version )]
#[command( about = "Generates synthetic module corpora and benchmarks loader topologies over them" )]
struct Cli {
	/// TOML configuration; every key is optional.
	#[arg( long, global = true )]
	config: Option<PathBuf>,
	/// Log progress at debug level.
	#[arg( short, long, global = true )]
	verbose: bool,
	#[command( subcommand )]
	command: Command,
}

#[derive( Subcommand )]
enum Command {
	/// Generate a corpus
	Generate {
		#[arg( long )]
		out: PathBuf,
		#[arg( long, value_enum )]
		layout: LayoutKind,
	},
	/// Benchmark one topology over an existing corpus
	Bench {
		#[arg( long )]
		corpus: PathBuf,
		#[arg( long, value_enum )]
		topology: TopologyKind,
		/// Print the report as JSON.
		#[arg( long )]
		json: bool,
	},
	/// Generate a fresh corpus for every layout and topology and benchmark each
	Suite {
		#[arg( long )]
		out: PathBuf,
		/// Topologies to run; all of them if omitted.
		#[arg( long, value_enum )]
		topology: Vec<TopologyKind>,
		#[arg( long )]
		json: bool,
	},
}

fn main() -> ExitCode {

	let cli = Cli::parse();
	let config = match cli.config.as_deref().map( BenchConfig::load ).transpose() {
		Ok( config ) => config.unwrap_or_default(),
		Err( err ) => { eprintln!( "{}", err ); return ExitCode::FAILURE }
	};

	let level = match cli.verbose || config.verbose { true => Level::DEBUG, false => Level::INFO };
	tracing_subscriber::fmt().with_max_level( level ).with_writer( std::io::stderr ).init();

	match run( cli.command, config ) {
		Ok(()) => ExitCode::SUCCESS,
		Err( err ) => { eprintln!( "{}", err ); ExitCode::FAILURE }
	}

}

fn run( command: Command, config: BenchConfig ) -> Result<(), Box<dyn std::error::Error>> {

	let generator = CorpusGenerator::new( config.corpus, Javac::new( config.javac ), JarPacker );

	match command {
		Command::Generate { out, layout } => {
			let summary = generator.generate( &out, layout )?;
			println!( "{} corpus with {} modules written to {}", summary.layout, summary.modules.len(), out.display() );
		}
		Command::Bench { corpus, topology, json } => {
			let report = BenchmarkRunner::new( NativeRuntime::new() ).run( &corpus, topology.topology().as_ref() )?;
			print_report( &report, json )?;
		}
		Command::Suite { out, topology, json } => {
			let topologies = match topology.is_empty() { true => TopologyKind::ALL.to_vec(), false => topology };
			let entries = Suite::new( generator, BenchmarkRunner::new( NativeRuntime::new() ), topologies ).run( &out )?;
			match json {
				true => println!( "{}", serde_json::to_string_pretty( &entries )? ),
				false => entries.iter().for_each(| entry | println!( "[{}] {}", entry.layout, entry.report )),
			}
		}
	}

	Ok(())

}

fn print_report<T: Serialize + std::fmt::Display>( report: &T, json: bool ) -> serde_json::Result<()> {
	match json {
		true => println!( "{}", serde_json::to_string_pretty( report )? ),
		false => println!( "{}", report ),
	}
	Ok(())
}
