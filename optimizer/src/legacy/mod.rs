mod analysis_usage;
mod loop_manager;
mod manager;
mod profiler_passes;
mod registry;

use llvm::LlvmTempManager;
use loopprof_derive::LowerDisplay;
use rrvm::{
	program::{LlvmFunc, LlvmProgram},
	rrvm_loop::Loop,
};
use utils::Result;

use crate::profiler::ProfileContext;

pub use analysis_usage::{Analysis, AnalysisUsage};
pub use loop_manager::LPPassManager;
pub use manager::LegacyPassManager;
pub use profiler_passes::*;
pub use registry::{PassInfo, PassRegistry};

/// Stable identity of a registered pass.
pub type PassId = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, LowerDisplay)]
pub enum PassKind {
	Module,
	Loop,
}

pub trait LegacyModulePass {
	fn pass_id(&self) -> PassId;
	fn get_analysis_usage(&self, _usage: &mut AnalysisUsage) {}
	fn run_on_module(
		&mut self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<bool>;
}

pub trait LegacyLoopPass {
	fn pass_id(&self) -> PassId;
	fn get_analysis_usage(&self, _usage: &mut AnalysisUsage) {}
	fn run_on_loop(
		&mut self,
		loop_: &Loop,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		ctx: &mut ProfileContext,
	) -> bool;
}

/// A pass instance built from its registry entry.
pub enum LegacyPass {
	Module(Box<dyn LegacyModulePass>),
	Loop(Box<dyn LegacyLoopPass>),
}

impl LegacyPass {
	pub fn pass_id(&self) -> PassId {
		match self {
			LegacyPass::Module(pass) => pass.pass_id(),
			LegacyPass::Loop(pass) => pass.pass_id(),
		}
	}
	pub fn kind(&self) -> PassKind {
		match self {
			LegacyPass::Module(_) => PassKind::Module,
			LegacyPass::Loop(_) => PassKind::Loop,
		}
	}
	pub fn analysis_usage(&self) -> AnalysisUsage {
		let mut usage = AnalysisUsage::default();
		match self {
			LegacyPass::Module(pass) => pass.get_analysis_usage(&mut usage),
			LegacyPass::Loop(pass) => pass.get_analysis_usage(&mut usage),
		}
		usage
	}
}
