use log::{debug, trace};
use rrvm::program::LlvmProgram;
use utils::{LoopprofError, Result};

use super::{
	CountLoopsLegacy, InsertReportLegacy, InsertStrLegacy, InsertTimerLegacy,
	LPPassManager, LegacyModulePass, LegacyPass, PassId, PassRegistry,
};
use crate::{
	profiler::{ProfileContext, ProfilerConfig},
	PassName,
};

enum Stage {
	Module(Box<dyn LegacyModulePass>),
	Loops(LPPassManager),
}

/// Schedules passes by id, pulling in whatever they require first.
pub struct LegacyPassManager<'a> {
	registry: &'a PassRegistry,
	scheduled: Vec<PassId>,
	stages: Vec<Stage>,
}

impl<'a> LegacyPassManager<'a> {
	pub fn new(registry: &'a PassRegistry) -> Self {
		Self {
			registry,
			scheduled: Vec::new(),
			stages: Vec::new(),
		}
	}

	/// The same pipeline `PassBuilder::profiling_pipeline` builds.
	pub fn profiling_pipeline(
		registry: &'a PassRegistry,
		config: &ProfilerConfig,
	) -> Result<Self> {
		let mut pm = Self::new(registry);
		pm.add(InsertStrLegacy::NAME)?;
		pm.add(CountLoopsLegacy::NAME)?;
		pm.add(InsertTimerLegacy::NAME)?;
		if config.report_on_exit {
			pm.add(InsertReportLegacy::NAME)?;
		}
		Ok(pm)
	}

	/// Schedules `id` after its requirements. A pass already scheduled is
	/// not added again.
	pub fn add(&mut self, id: &str) -> Result<()> {
		let mut visiting = Vec::new();
		self.schedule(id, &mut visiting)
	}

	fn schedule(&mut self, id: &str, visiting: &mut Vec<PassId>) -> Result<()> {
		let registry = self.registry;
		let info = registry
			.get(id)
			.ok_or_else(|| LoopprofError::UnknownPass(id.to_string()))?;
		if visiting.contains(&info.name) {
			return Err(LoopprofError::DependencyCycle(info.name.to_string()));
		}
		if self.scheduled.contains(&info.name) {
			trace!("{} is already scheduled", info.name);
			return Ok(());
		}

		let pass = (info.ctor)();
		let usage = pass.analysis_usage();
		for analysis in usage.required_analyses() {
			trace!("{} uses {}", info.name, analysis);
		}
		visiting.push(info.name);
		for required in usage.required() {
			if !self.scheduled.contains(required) {
				debug!("schedule {} for {}", required, info.name);
				self.schedule(required, visiting)?;
			}
		}
		visiting.pop();

		self.scheduled.push(info.name);
		match pass {
			LegacyPass::Module(pass) => self.stages.push(Stage::Module(pass)),
			LegacyPass::Loop(pass) => match self.stages.last_mut() {
				Some(Stage::Loops(lpm)) => lpm.add(pass),
				_ => {
					let mut lpm = LPPassManager::new();
					lpm.add(pass);
					self.stages.push(Stage::Loops(lpm));
				}
			},
		}
		Ok(())
	}

	// pass ids in the order they run; loop passes of one group share a loop walk
	pub fn schedule_order(&self) -> Vec<PassId> {
		self
			.stages
			.iter()
			.flat_map(|stage| match stage {
				Stage::Module(pass) => vec![pass.pass_id()],
				Stage::Loops(lpm) => lpm.pass_ids(),
			})
			.collect()
	}

	pub fn run(
		&mut self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<bool> {
		let mut changed = false;
		for stage in self.stages.iter_mut() {
			match stage {
				Stage::Module(pass) => {
					trace!("run {}", pass.pass_id());
					changed |= pass.run_on_module(program, ctx)?;
				}
				Stage::Loops(lpm) => {
					changed |= lpm.run(program, ctx);
					if let Some(state) = ctx.instrumentation.as_ref() {
						changed |= state.sync_storage(program);
					}
				}
			}
		}
		Ok(changed)
	}
}

#[cfg(test)]
mod tests {
	use llvm::LlvmTempManager;
	use loopprof_derive::PassName;
	use rrvm::{program::LlvmFunc, rrvm_loop::Loop};

	use super::*;
	use crate::legacy::{AnalysisUsage, LegacyLoopPass, PassInfo, PassKind};

	#[test]
	fn requirements_are_scheduled_first() {
		let registry = PassRegistry::with_profiler_passes().unwrap();
		let mut pm = LegacyPassManager::new(&registry);
		pm.add("insert-timer").unwrap();
		pm.add("count-loops").unwrap();
		pm.add("insert-str").unwrap();
		assert_eq!(
			pm.schedule_order(),
			vec!["insert-str", "insert-timer", "count-loops"]
		);
	}

	#[test]
	fn unknown_pass() {
		let registry = PassRegistry::with_profiler_passes().unwrap();
		let mut pm = LegacyPassManager::new(&registry);
		assert!(matches!(
			pm.add("licm"),
			Err(LoopprofError::UnknownPass(ref id)) if id == "licm"
		));
	}

	#[derive(PassName)]
	struct PingLegacy;
	#[derive(PassName)]
	struct PongLegacy;

	impl LegacyLoopPass for PingLegacy {
		fn pass_id(&self) -> PassId {
			Self::NAME
		}
		fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
			usage.add_required(PongLegacy::NAME);
		}
		fn run_on_loop(
			&mut self,
			_loop_: &Loop,
			_func: &mut LlvmFunc,
			_temp_mgr: &mut LlvmTempManager,
			_ctx: &mut ProfileContext,
		) -> bool {
			false
		}
	}

	impl LegacyLoopPass for PongLegacy {
		fn pass_id(&self) -> PassId {
			Self::NAME
		}
		fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
			usage.add_required(PingLegacy::NAME);
		}
		fn run_on_loop(
			&mut self,
			_loop_: &Loop,
			_func: &mut LlvmFunc,
			_temp_mgr: &mut LlvmTempManager,
			_ctx: &mut ProfileContext,
		) -> bool {
			false
		}
	}

	#[test]
	fn dependency_cycle() {
		let mut registry = PassRegistry::new();
		registry
			.register(PassInfo {
				name: PingLegacy::NAME,
				description: "ping",
				kind: PassKind::Loop,
				ctor: || LegacyPass::Loop(Box::new(PingLegacy)),
			})
			.unwrap();
		registry
			.register(PassInfo {
				name: PongLegacy::NAME,
				description: "pong",
				kind: PassKind::Loop,
				ctor: || LegacyPass::Loop(Box::new(PongLegacy)),
			})
			.unwrap();
		let mut pm = LegacyPassManager::new(&registry);
		assert!(matches!(
			pm.add("ping"),
			Err(LoopprofError::DependencyCycle(_))
		));
	}
}
