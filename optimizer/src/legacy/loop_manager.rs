use llvm::LlvmTempManager;
use log::{debug, trace};
use rrvm::program::{LlvmFunc, LlvmProgram};

use super::{AnalysisUsage, LegacyLoopPass, PassId};
use crate::{analysis::LoopStandardAnalysisResults, profiler::ProfileContext};

/// Runs a group of loop passes over every loop of every function, inner
/// loops first. All passes finish a loop before the next one starts.
#[derive(Default)]
pub struct LPPassManager {
	passes: Vec<Box<dyn LegacyLoopPass>>,
}

impl LPPassManager {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn add(&mut self, pass: Box<dyn LegacyLoopPass>) {
		self.passes.push(pass);
	}
	pub fn pass_ids(&self) -> Vec<PassId> {
		self.passes.iter().map(|v| v.pass_id()).collect()
	}

	pub fn run(&mut self, program: &mut LlvmProgram, ctx: &mut ProfileContext) -> bool {
		let mut changed = false;
		for func in program.funcs.iter_mut() {
			changed |= self.run_on_function(func, &mut program.temp_mgr, ctx);
		}
		changed
	}

	fn run_on_function(
		&mut self,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		ctx: &mut ProfileContext,
	) -> bool {
		let mut analyses = LoopStandardAnalysisResults::compute(&func.cfg);
		debug!("{} loops in @{}", analyses.loop_info.len(), func.name);
		let mut changed = false;
		for header in analyses.visit_order() {
			for pass in self.passes.iter_mut() {
				let Some(loop_) = analyses.loop_info.get_by_header(header).cloned() else {
					break;
				};
				trace!("run {} on {}", pass.pass_id(), loop_);
				if pass.run_on_loop(&loop_, func, temp_mgr, ctx) {
					changed = true;
					let mut usage = AnalysisUsage::default();
					pass.get_analysis_usage(&mut usage);
					if !usage.preserves_all() {
						analyses = LoopStandardAnalysisResults::compute(&func.cfg);
					}
				}
			}
		}
		changed
	}
}
