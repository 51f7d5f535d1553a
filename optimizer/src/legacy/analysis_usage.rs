use loopprof_derive::LowerDisplay;

use super::PassId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, LowerDisplay)]
pub enum Analysis {
	#[style("domtree")]
	DominatorTree,
	#[style("loops")]
	LoopInfo,
}

/// What a legacy pass needs before it runs and what it leaves intact.
#[derive(Debug, Default, Clone)]
pub struct AnalysisUsage {
	required: Vec<PassId>,
	required_analyses: Vec<Analysis>,
	preserves_all: bool,
}

impl AnalysisUsage {
	pub fn add_required(&mut self, id: PassId) -> &mut Self {
		if !self.required.contains(&id) {
			self.required.push(id);
		}
		self
	}
	pub fn add_required_analysis(&mut self, analysis: Analysis) -> &mut Self {
		if !self.required_analyses.contains(&analysis) {
			self.required_analyses.push(analysis);
		}
		self
	}
	pub fn set_preserves_all(&mut self) -> &mut Self {
		self.preserves_all = true;
		self
	}
	pub fn required(&self) -> &[PassId] {
		&self.required
	}
	pub fn required_analyses(&self) -> &[Analysis] {
		&self.required_analyses
	}
	pub fn preserves_all(&self) -> bool {
		self.preserves_all
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn records_requirements_once() {
		let mut usage = AnalysisUsage::default();
		usage
			.add_required("insert-str")
			.add_required("insert-str")
			.add_required_analysis(Analysis::LoopInfo);
		assert_eq!(usage.required(), &["insert-str"]);
		assert_eq!(usage.required_analyses(), &[Analysis::LoopInfo]);
		assert!(!usage.preserves_all());
		assert_eq!(Analysis::DominatorTree.to_string(), "domtree");
	}
}
