use log::trace;
use rrvm::rrvm_loop::Loop;

use super::{LoopTally, PassResult};

/// Counts every loop it is run on, artificial ones included.
#[derive(Default, Clone, Copy)]
pub struct CountLoops;

impl CountLoops {
	pub fn run_on_loop(&self, loop_: &Loop, tally: &LoopTally) -> PassResult {
		let count = tally.increment();
		trace!("count loop at {}: {} loops so far", loop_.header.borrow().label(), count);
		PassResult::NoChange
	}
}

#[cfg(test)]
mod tests {
	use rrvm::{
		cfg::{link_node, BasicBlock},
		dominator::compute_dominator,
		LlvmCFG, LlvmNode,
	};

	use super::*;

	#[test]
	fn counts_each_visit() {
		let blocks: Vec<LlvmNode> = (0..2).map(BasicBlock::new_node).collect();
		link_node(&blocks[0], &blocks[1]);
		link_node(&blocks[1], &blocks[1]);
		let cfg = LlvmCFG::from_blocks(blocks);
		let info = cfg.loop_analysis(&compute_dominator(&cfg));
		let loop_ = info.get(0).unwrap();

		let tally = LoopTally::new();
		for _ in 0..3 {
			assert_eq!(CountLoops.run_on_loop(loop_, &tally), PassResult::NoChange);
		}
		assert_eq!(tally.get(), 3);
		assert!(cfg.blocks.iter().all(|v| v.borrow().instrs.is_empty()));
	}
}
