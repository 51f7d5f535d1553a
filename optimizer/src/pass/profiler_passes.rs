use llvm::LlvmTempManager;
use log::{error, warn};
use loopprof_derive::PassName;
use rrvm::{
	program::{LlvmFunc, LlvmProgram},
	rrvm_loop::Loop,
};
use utils::Result;

use super::{LoopPass, ModulePass, PreservedAnalyses};
use crate::{
	analysis::LoopStandardAnalysisResults,
	profiler::{CountLoops, InsertReport, InsertStr, InsertTimer, ProfileContext},
	PassName,
};

#[derive(PassName)]
pub struct CountLoopsPass;

#[derive(PassName)]
pub struct InsertStrPass;

#[derive(PassName)]
pub struct InsertTimerPass;

#[derive(PassName)]
pub struct InsertReportPass;

impl LoopPass for CountLoopsPass {
	fn name(&self) -> &'static str {
		Self::NAME
	}
	fn run(
		&self,
		loop_: &Loop,
		_func: &mut LlvmFunc,
		_temp_mgr: &mut LlvmTempManager,
		_analyses: &LoopStandardAnalysisResults,
		ctx: &mut ProfileContext,
	) -> PreservedAnalyses {
		CountLoops.run_on_loop(loop_, &ctx.tally).into()
	}
}

impl ModulePass for InsertStrPass {
	fn name(&self) -> &'static str {
		Self::NAME
	}
	fn run(
		&self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<PreservedAnalyses> {
		let (result, state) = InsertStr.run_on_module(program, &ctx.config);
		ctx.instrumentation = Some(state);
		Ok(result.into())
	}
}

impl LoopPass for InsertTimerPass {
	fn name(&self) -> &'static str {
		Self::NAME
	}
	fn requires(&self) -> &'static [&'static str] {
		&[InsertStrPass::NAME]
	}
	fn run(
		&self,
		loop_: &Loop,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		_analyses: &LoopStandardAnalysisResults,
		ctx: &mut ProfileContext,
	) -> PreservedAnalyses {
		// the manager refuses pipelines without insert-str ahead of us
		let Some(state) = ctx.instrumentation.as_mut() else {
			error!("{} ran before {}", Self::NAME, InsertStrPass::NAME);
			return PreservedAnalyses::All;
		};
		InsertTimer
			.run_on_loop(loop_, func, temp_mgr, state, &mut ctx.slots)
			.into()
	}
}

impl ModulePass for InsertReportPass {
	fn name(&self) -> &'static str {
		Self::NAME
	}
	fn requires(&self) -> &'static [&'static str] {
		&[InsertStrPass::NAME]
	}
	fn run(
		&self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<PreservedAnalyses> {
		let Some(state) = ctx.instrumentation.as_ref() else {
			warn!("module has no profiling storage, no report is inserted");
			return Ok(PreservedAnalyses::All);
		};
		let result = InsertReport.run_on_module(
			program,
			state,
			ctx.slots.used(),
			&ctx.config.entry_fn,
		);
		Ok(result.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pass_names() {
		assert_eq!(CountLoopsPass::NAME, "count-loops");
		assert_eq!(InsertStrPass::NAME, "insert-str");
		assert_eq!(InsertTimerPass::NAME, "insert-timer");
		assert_eq!(InsertReportPass::NAME, "insert-report");
	}
}
