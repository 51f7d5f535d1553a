use utils::{LoopprofError, Result};

use super::{
	CountLoopsPass, InsertReportPass, InsertStrPass, InsertTimerPass, PassManager,
};
use crate::{profiler::ProfilerConfig, PassName};

pub struct PassBuilder;

impl PassBuilder {
	/// insert-str, then count-loops and insert-timer on every loop, then
	/// insert-report when the module should report on exit.
	pub fn profiling_pipeline(config: &ProfilerConfig) -> PassManager {
		let mut pm = PassManager::new();
		pm.add_module_pass(InsertStrPass)
			.add_loop_pass(CountLoopsPass)
			.add_loop_pass(InsertTimerPass);
		if config.report_on_exit {
			pm.add_late_pass(InsertReportPass);
		}
		pm
	}

	/// Builds a pipeline from pass names. Module passes named after a loop
	/// pass run after the loops.
	pub fn parse_pipeline<S: AsRef<str>>(names: &[S]) -> Result<PassManager> {
		let mut pm = PassManager::new();
		let mut after_loops = false;
		for name in names.iter().map(|v| v.as_ref().trim()) {
			match name {
				CountLoopsPass::NAME => {
					pm.add_loop_pass(CountLoopsPass);
					after_loops = true;
				}
				InsertTimerPass::NAME => {
					pm.add_loop_pass(InsertTimerPass);
					after_loops = true;
				}
				InsertStrPass::NAME if after_loops => {
					pm.add_late_pass(InsertStrPass);
				}
				InsertStrPass::NAME => {
					pm.add_module_pass(InsertStrPass);
				}
				InsertReportPass::NAME if after_loops => {
					pm.add_late_pass(InsertReportPass);
				}
				InsertReportPass::NAME => {
					pm.add_module_pass(InsertReportPass);
				}
				_ => return Err(LoopprofError::UnknownPass(name.to_string())),
			}
		}
		Ok(pm)
	}
}
