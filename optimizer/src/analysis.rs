use rrvm::{
	dominator::{compute_dominator, DomTree},
	rrvm_loop::LoopInfo,
	LlvmCFG,
};

/// The function-level analyses every loop pass is handed.
pub struct LoopStandardAnalysisResults {
	pub dom_tree: DomTree,
	pub loop_info: LoopInfo,
}

impl LoopStandardAnalysisResults {
	pub fn compute(cfg: &LlvmCFG) -> Self {
		let dom_tree = compute_dominator(cfg);
		let loop_info = cfg.loop_analysis(&dom_tree);
		Self {
			dom_tree,
			loop_info,
		}
	}
	// headers in the order loop passes visit them
	pub fn visit_order(&self) -> Vec<i32> {
		self.loop_info.post_order().iter().map(|v| v.header_id()).collect()
	}
}
