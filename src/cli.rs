pub use clap::Parser;

use utils::{CLOCK_FUNC, ENTRY_FUNC, REPORT_FUNC, STORAGE_VAR};

/// Instruments the loops of a textual IR module with timing code.
#[derive(Parser, Debug)]
#[command(name = "loopprof", version)]
pub struct Args {
	/// Run the registry-based pass manager
	#[arg(long)]
	pub legacy: bool,

	/// Comma separated pass names to run instead of the profiling pipeline
	#[arg(long, value_delimiter = ',')]
	pub passes: Option<Vec<String>>,

	#[arg(long, default_value = REPORT_FUNC)]
	pub report_fn: String,

	#[arg(long, default_value = CLOCK_FUNC)]
	pub clock_fn: String,

	#[arg(long, default_value = STORAGE_VAR)]
	pub storage: String,

	/// Function whose returns report the timings
	#[arg(long, default_value = ENTRY_FUNC)]
	pub entry: String,

	/// Do not insert the report call
	#[arg(long)]
	pub no_report: bool,

	/// Print the number of loops visited to stderr
	#[arg(long)]
	pub count: bool,

	#[arg(short)]
	pub output: Option<String>,

	#[arg(value_parser)]
	pub input: Option<String>,
}
