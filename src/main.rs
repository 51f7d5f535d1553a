mod cli;
mod config;
mod logging;

use std::{
	fs::{self, File},
	io::{self, Write},
};

use anyhow::Result;
use clap::Parser;
use cli::Args;
use log::trace;
use optimizer::*;
use rrvm::program::LlvmProgram;
use utils::{fatal_error, map_sys_err, warning};

fn step_parse(file_name: &str) -> Result<LlvmProgram> {
	let code = fs::read_to_string(file_name).map_err(map_sys_err)?;
	Ok(irparser::parse(&code)?)
}

fn step_new_pm(
	program: &mut LlvmProgram,
	ctx: &mut ProfileContext,
	passes: Option<&[String]>,
) -> Result<bool> {
	let pm = match passes {
		Some(names) => PassBuilder::parse_pipeline(names)?,
		None => PassBuilder::profiling_pipeline(&ctx.config),
	};
	let preserved = pm.run(program, ctx)?;
	Ok(!preserved.are_all_preserved())
}

fn step_legacy_pm(
	program: &mut LlvmProgram,
	ctx: &mut ProfileContext,
	passes: Option<&[String]>,
) -> Result<bool> {
	let registry = PassRegistry::with_profiler_passes()?;
	let mut pm = match passes {
		Some(names) => {
			let mut pm = LegacyPassManager::new(&registry);
			for name in names {
				pm.add(name.trim())?;
			}
			pm
		}
		None => LegacyPassManager::profiling_pipeline(&registry, &ctx.config)?,
	};
	Ok(pm.run(program, ctx)?)
}

fn main() -> Result<()> {
	logging::init();
	trace!("start");
	let args = Args::parse();

	let mut writer: Box<dyn Write> = if let Some(o) = &args.output {
		Box::new(File::create(o).map_err(map_sys_err)?)
	} else {
		Box::new(io::stdout())
	};

	let file_name = args.input.clone().unwrap_or_else(|| {
		fatal_error("no input files");
		unreachable!()
	});

	let mut program = step_parse(&file_name)?;

	let tally = LoopTally::new();
	let mut ctx = ProfileContext::for_module(&tally, config::profiler_config(&args));
	let passes = args.passes.as_deref();
	let changed = if args.legacy {
		step_legacy_pm(&mut program, &mut ctx, passes)?
	} else {
		step_new_pm(&mut program, &mut ctx, passes)?
	};
	trace!("{} changed: {}", file_name, changed);
	if ctx.instrumentation.is_some() && ctx.slots.used() == 0 {
		warning(format!("{}: no loop was timed", file_name));
	}

	write!(writer, "{}", program)?;
	if args.count {
		eprintln!("{} loops", tally.get());
	}
	Ok(())
}
