pub mod analysis;
pub mod legacy;
pub mod pass;
pub mod profiler;

pub use analysis::LoopStandardAnalysisResults;
pub use legacy::{LegacyPassManager, PassRegistry};
pub use pass::{PassBuilder, PassManager, PreservedAnalyses};
pub use profiler::{LoopTally, PassResult, ProfileContext, ProfilerConfig};

/// Stable kebab-case identity of a pass, shared by both pass managers.
/// Derived with `#[derive(PassName)]`.
pub trait PassName {
	const NAME: &'static str;
}
