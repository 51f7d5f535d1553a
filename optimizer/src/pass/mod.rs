mod builder;
mod manager;
mod profiler_passes;

use std::ops::BitAnd;

use llvm::LlvmTempManager;
use rrvm::{
	program::{LlvmFunc, LlvmProgram},
	rrvm_loop::Loop,
};
use utils::Result;

use crate::{
	analysis::LoopStandardAnalysisResults,
	profiler::{PassResult, ProfileContext},
};

pub use builder::PassBuilder;
pub use manager::PassManager;
pub use profiler_passes::*;

/// Which analyses are still valid after a pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedAnalyses {
	All,
	None,
}

impl PreservedAnalyses {
	pub fn are_all_preserved(self) -> bool {
		self == PreservedAnalyses::All
	}
}

impl From<PassResult> for PreservedAnalyses {
	fn from(result: PassResult) -> Self {
		match result {
			PassResult::NoChange => PreservedAnalyses::All,
			PassResult::Changed => PreservedAnalyses::None,
		}
	}
}

// intersection of what two passes kept
impl BitAnd for PreservedAnalyses {
	type Output = PreservedAnalyses;
	fn bitand(self, rhs: Self) -> Self::Output {
		if self.are_all_preserved() && rhs.are_all_preserved() {
			PreservedAnalyses::All
		} else {
			PreservedAnalyses::None
		}
	}
}

pub trait ModulePass {
	fn name(&self) -> &'static str;
	// module passes that must be scheduled earlier
	fn requires(&self) -> &'static [&'static str] {
		&[]
	}
	fn run(
		&self,
		program: &mut LlvmProgram,
		ctx: &mut ProfileContext,
	) -> Result<PreservedAnalyses>;
}

pub trait LoopPass {
	fn name(&self) -> &'static str;
	fn requires(&self) -> &'static [&'static str] {
		&[]
	}
	fn run(
		&self,
		loop_: &Loop,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		analyses: &LoopStandardAnalysisResults,
		ctx: &mut ProfileContext,
	) -> PreservedAnalyses;
}
