use llvm::LlvmTempManager;
use log::{debug, trace};
use rrvm::program::{LlvmFunc, LlvmProgram};
use utils::{LoopprofError, Result};

use super::{LoopPass, ModulePass, PreservedAnalyses};
use crate::{analysis::LoopStandardAnalysisResults, profiler::ProfileContext};

/// Runs module passes, then every loop pass on every loop, then the late
/// module passes.
#[derive(Default)]
pub struct PassManager {
	module_passes: Vec<Box<dyn ModulePass>>,
	loop_passes: Vec<Box<dyn LoopPass>>,
	late_passes: Vec<Box<dyn ModulePass>>,
}

impl PassManager {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn add_module_pass(&mut self, pass: impl ModulePass + 'static) -> &mut Self {
		self.module_passes.push(Box::new(pass));
		self
	}
	pub fn add_loop_pass(&mut self, pass: impl LoopPass + 'static) -> &mut Self {
		self.loop_passes.push(Box::new(pass));
		self
	}
	// module passes that run after the loop passes
	pub fn add_late_pass(&mut self, pass: impl ModulePass + 'static) -> &mut Self {
		self.late_passes.push(Box::new(pass));
		self
	}
	pub fn pass_names(&self) -> Vec<&'static str> {
		self
			.module_passes
			.iter()
			.map(|v| v.name())
			.chain(self.loop_passes.iter().map(|v| v.name()))
			.chain(self.late_passes.iter().map(|v| v.name()))
			.collect()
	}

	/// Checks that every requirement names a module pass scheduled earlier.
	pub fn validate(&self) -> Result<()> {
		let mut done: Vec<&str> = Vec::new();
		for pass in self.module_passes.iter() {
			check(pass.name(), pass.requires(), &done)?;
			done.push(pass.name());
		}
		for pass in self.loop_passes.iter() {
			check(pass.name(), pass.requires(), &done)?;
		}
		for pass in self.late_passes.iter() {
			check(pass.name(), pass.requires(), &done)?;
			done.push(pass.name());
		}
		Ok(())
	}

	pub fn run(
		&self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<PreservedAnalyses> {
		self.validate()?;
		let mut preserved = PreservedAnalyses::All;
		for pass in self.module_passes.iter() {
			trace!("run {}", pass.name());
			preserved = preserved & pass.run(program, ctx)?;
		}
		if !self.loop_passes.is_empty() {
			for func in program.funcs.iter_mut() {
				preserved = preserved & self.run_loops(func, &mut program.temp_mgr, ctx);
			}
			if let Some(state) = ctx.instrumentation.as_ref() {
				if state.sync_storage(program) {
					preserved = PreservedAnalyses::None;
				}
			}
		}
		for pass in self.late_passes.iter() {
			trace!("run {}", pass.name());
			preserved = preserved & pass.run(program, ctx)?;
		}
		Ok(preserved)
	}

	fn run_loops(
		&self,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		ctx: &mut ProfileContext,
	) -> PreservedAnalyses {
		let mut analyses = LoopStandardAnalysisResults::compute(&func.cfg);
		let mut preserved = PreservedAnalyses::All;
		debug!("{} loops in @{}", analyses.loop_info.len(), func.name);
		for header in analyses.visit_order() {
			for pass in self.loop_passes.iter() {
				// a pass may have reshaped the loop; find it again by its header
				let Some(loop_) = analyses.loop_info.get_by_header(header).cloned() else {
					break;
				};
				let result = pass.run(&loop_, func, temp_mgr, &analyses, ctx);
				if !result.are_all_preserved() {
					preserved = PreservedAnalyses::None;
					analyses = LoopStandardAnalysisResults::compute(&func.cfg);
				}
			}
		}
		preserved
	}
}

fn check(name: &str, requires: &[&str], done: &[&str]) -> Result<()> {
	match requires.iter().find(|v| !done.contains(*v)) {
		Some(required) => Err(LoopprofError::Unscheduled {
			pass: name.to_string(),
			required: required.to_string(),
		}),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		pass::{CountLoopsPass, InsertReportPass, InsertStrPass, InsertTimerPass},
		profiler::{LoopTally, ProfilerConfig},
	};

	#[test]
	fn timer_without_declarator_is_rejected() {
		let mut pm = PassManager::new();
		pm.add_loop_pass(CountLoopsPass).add_loop_pass(InsertTimerPass);
		let mut program = LlvmProgram::new();
		let tally = LoopTally::new();
		let mut ctx = ProfileContext::for_module(&tally, ProfilerConfig::default());
		let err = pm.run(&mut program, &mut ctx).unwrap_err();
		assert!(matches!(
			err,
			LoopprofError::Unscheduled { ref pass, ref required }
				if pass == "insert-timer" && required == "insert-str"
		));
		assert!(program.func_decls.is_empty());
	}

	#[test]
	fn declarator_must_come_first() {
		let mut pm = PassManager::new();
		pm.add_late_pass(InsertStrPass).add_late_pass(InsertReportPass);
		assert!(pm.validate().is_ok());

		let mut pm = PassManager::new();
		pm.add_late_pass(InsertReportPass).add_late_pass(InsertStrPass);
		assert!(pm.validate().is_err());
	}

	#[test]
	fn runs_on_every_function() {
		let text = "define void @f() {
entry:
  br label %B1
B1:
  br label %B1
}

define void @g(i32 %0) {
entry:
  br label %B1
B1:
  br i32 %0, label %B1, label %B2
B2:
  ret void
}
";
		let mut program = irparser::parse(text).unwrap();
		let mut pm = PassManager::new();
		pm.add_module_pass(InsertStrPass)
			.add_loop_pass(CountLoopsPass)
			.add_loop_pass(InsertTimerPass);
		let tally = LoopTally::new();
		let mut ctx = ProfileContext::for_module(&tally, ProfilerConfig::default());
		let preserved = pm.run(&mut program, &mut ctx).unwrap();
		assert_eq!(preserved, PreservedAnalyses::None);
		assert_eq!(tally.get(), 2);
		// the spinning loop in @f takes no slot
		assert_eq!(ctx.slots.used(), 1);
		assert_eq!(
			pm.pass_names(),
			vec!["insert-str", "count-loops", "insert-timer"]
		);
	}
}
