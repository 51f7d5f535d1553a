use llvm::LlvmTempManager;
use log::{error, warn};
use loopprof_derive::PassName;
use rrvm::{
	program::{LlvmFunc, LlvmProgram},
	rrvm_loop::Loop,
};
use utils::Result;

use super::{
	Analysis, AnalysisUsage, LegacyLoopPass, LegacyModulePass, LegacyPass, PassId,
	PassInfo, PassKind,
};
use crate::{
	profiler::{CountLoops, InsertReport, InsertStr, InsertTimer, ProfileContext},
	PassName,
};

#[derive(PassName)]
pub struct CountLoopsLegacy;

#[derive(PassName)]
pub struct InsertStrLegacy;

#[derive(PassName)]
pub struct InsertTimerLegacy;

#[derive(PassName)]
pub struct InsertReportLegacy;

impl CountLoopsLegacy {
	pub fn info() -> PassInfo {
		PassInfo {
			name: Self::NAME,
			description: "Count the loops of every module",
			kind: PassKind::Loop,
			ctor: || LegacyPass::Loop(Box::new(Self)),
		}
	}
}

impl LegacyLoopPass for CountLoopsLegacy {
	fn pass_id(&self) -> PassId {
		Self::NAME
	}
	fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
		usage.add_required_analysis(Analysis::LoopInfo).set_preserves_all();
	}
	fn run_on_loop(
		&mut self,
		loop_: &Loop,
		_func: &mut LlvmFunc,
		_temp_mgr: &mut LlvmTempManager,
		ctx: &mut ProfileContext,
	) -> bool {
		CountLoops.run_on_loop(loop_, &ctx.tally).into()
	}
}

impl InsertStrLegacy {
	pub fn info() -> PassInfo {
		PassInfo {
			name: Self::NAME,
			description: "Declare the loop profiler runtime and storage",
			kind: PassKind::Module,
			ctor: || LegacyPass::Module(Box::new(Self)),
		}
	}
}

impl LegacyModulePass for InsertStrLegacy {
	fn pass_id(&self) -> PassId {
		Self::NAME
	}
	fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
		usage.add_required_analysis(Analysis::LoopInfo);
	}
	fn run_on_module(
		&mut self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<bool> {
		let (result, state) = InsertStr.run_on_module(program, &ctx.config);
		ctx.instrumentation = Some(state);
		Ok(result.into())
	}
}

impl InsertTimerLegacy {
	pub fn info() -> PassInfo {
		PassInfo {
			name: Self::NAME,
			description: "Time every loop into its profiling slot",
			kind: PassKind::Loop,
			ctor: || LegacyPass::Loop(Box::new(Self)),
		}
	}
}

impl LegacyLoopPass for InsertTimerLegacy {
	fn pass_id(&self) -> PassId {
		Self::NAME
	}
	fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
		usage
			.add_required(InsertStrLegacy::NAME)
			.add_required_analysis(Analysis::LoopInfo);
	}
	fn run_on_loop(
		&mut self,
		loop_: &Loop,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		ctx: &mut ProfileContext,
	) -> bool {
		// insert-str is always scheduled before us
		let Some(state) = ctx.instrumentation.as_mut() else {
			error!("{} ran before {}", Self::NAME, InsertStrLegacy::NAME);
			return false;
		};
		InsertTimer
			.run_on_loop(loop_, func, temp_mgr, state, &mut ctx.slots)
			.into()
	}
}

impl InsertReportLegacy {
	pub fn info() -> PassInfo {
		PassInfo {
			name: Self::NAME,
			description: "Report the loop timings when the entry function returns",
			kind: PassKind::Module,
			ctor: || LegacyPass::Module(Box::new(Self)),
		}
	}
}

impl LegacyModulePass for InsertReportLegacy {
	fn pass_id(&self) -> PassId {
		Self::NAME
	}
	fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
		usage.add_required(InsertStrLegacy::NAME);
	}
	fn run_on_module(
		&mut self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<bool> {
		let Some(state) = ctx.instrumentation.as_ref() else {
			warn!("module has no profiling storage, no report is inserted");
			return Ok(false);
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
