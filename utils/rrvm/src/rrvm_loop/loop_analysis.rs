use std::collections::HashSet;

use log::trace;

use crate::{dominator::DomTree, LlvmCFG, LlvmNode};

use super::{Loop, LoopInfo};

impl LlvmCFG {
	pub fn loop_analysis(&self, dom_tree: &DomTree) -> LoopInfo {
		let mut bodies: Vec<(LlvmNode, HashSet<i32>)> = Vec::new();
		for bb in self.blocks.iter() {
			let header = bb.borrow().id;
			if !dom_tree.is_reachable(header) {
				continue;
			}
			// 前驱中被自己支配的块与自己之间的边就是 backedge
			let latches: Vec<LlvmNode> = bb
				.borrow()
				.prev
				.iter()
				.filter(|p| dom_tree.dominates(header, p.borrow().id))
				.cloned()
				.collect();
			if latches.is_empty() {
				continue;
			}
			bodies.push((bb.clone(), natural_loop(header, latches, dom_tree)));
		}

		let mut info = LoopInfo::default();
		for (id, (header, body)) in bodies.iter().enumerate() {
			let blocks = self
				.blocks
				.iter()
				.filter(|v| body.contains(&v.borrow().id))
				.cloned()
				.collect();
			info.loops.push(Loop {
				id: id as u32,
				header: header.clone(),
				blocks,
				outer: None,
				subloops: Vec::new(),
				level: 1,
			});
		}

		// the parent of a loop is the smallest other loop whose body contains its header
		for id in 0..bodies.len() {
			let header = bodies[id].0.borrow().id;
			let outer = (0..bodies.len())
				.filter(|&other| other != id && bodies[other].1.contains(&header))
				.min_by_key(|&other| bodies[other].1.len());
			if let Some(outer) = outer {
				info.loops[id].outer = Some(outer as u32);
				info.loops[outer].subloops.push(id as u32);
			}
		}
		for id in 0..info.loops.len() {
			let mut level = 1;
			let mut cur = info.loops[id].outer;
			while let Some(outer) = cur {
				level += 1;
				cur = info.loops[outer as usize].outer;
			}
			info.loops[id].level = level;
		}

		for bb in self.blocks.iter() {
			let bb_id = bb.borrow().id;
			let innermost = (0..bodies.len())
				.filter(|&id| bodies[id].1.contains(&bb_id))
				.min_by_key(|&id| bodies[id].1.len());
			if let Some(id) = innermost {
				info.loop_map.insert(bb_id, id as u32);
			}
		}

		for loop_ in info.loops.iter() {
			trace!("{}", loop_);
		}
		info
	}
}

// header plus every block that reaches a latch without passing the header
fn natural_loop(header: i32, latches: Vec<LlvmNode>, dom_tree: &DomTree) -> HashSet<i32> {
	let mut body = HashSet::from([header]);
	let mut stack = latches;
	while let Some(bb) = stack.pop() {
		let id = bb.borrow().id;
		if !body.insert(id) {
			continue;
		}
		for prev in bb.borrow().prev.iter() {
			let prev_id = prev.borrow().id;
			if dom_tree.is_reachable(prev_id) && !body.contains(&prev_id) {
				stack.push(prev.clone());
			}
		}
	}
	body
}

#[cfg(test)]
mod tests {
	use crate::{
		basicblock::BasicBlock, cfg::link_node, dominator::compute_dominator,
		LlvmCFG,
	};

	fn build(n: i32, edges: &[(i32, i32)]) -> LlvmCFG {
		let blocks: Vec<_> = (0..n).map(BasicBlock::new_node).collect();
		for &(from, to) in edges {
			link_node(&blocks[from as usize], &blocks[to as usize]);
		}
		LlvmCFG::from_blocks(blocks)
	}

	fn ids(nodes: &[crate::LlvmNode]) -> Vec<i32> {
		nodes.iter().map(|v| v.borrow().id).collect()
	}

	#[test]
	fn nested_loops() {
		let cfg = build(
			6,
			&[(0, 1), (1, 2), (1, 5), (2, 3), (3, 2), (3, 4), (4, 1)],
		);
		let dom_tree = compute_dominator(&cfg);
		assert!(dom_tree.dominates(1, 4));
		assert!(!dom_tree.dominates(2, 5));
		assert_eq!(dom_tree.idom(3), Some(2));
		assert_eq!(dom_tree.idom(5), Some(1));

		let info = cfg.loop_analysis(&dom_tree);
		assert_eq!(info.len(), 2);
		let outer = info.get_by_header(1).unwrap();
		let inner = info.get_by_header(2).unwrap();
		assert_eq!(ids(&outer.blocks), vec![1, 2, 3, 4]);
		assert_eq!(ids(&inner.blocks), vec![2, 3]);
		assert_eq!(inner.outer, Some(outer.id));
		assert_eq!(inner.level, 2);
		assert_eq!(outer.subloops, vec![inner.id]);
		assert_eq!(info.get_loop_for(3).map(|v| v.id), Some(inner.id));

		let order: Vec<i32> = info.post_order().iter().map(|v| v.header_id()).collect();
		assert_eq!(order, vec![2, 1]);

		assert_eq!(ids(&outer.exit_blocks()), vec![5]);
		assert_eq!(ids(&inner.exit_blocks()), vec![4]);
	}

	#[test]
	fn multiple_exits() {
		let cfg = build(5, &[(0, 1), (1, 2), (1, 3), (2, 1), (2, 4)]);
		let info = cfg.loop_analysis(&compute_dominator(&cfg));
		assert_eq!(info.len(), 1);
		assert_eq!(ids(&info.loops[0].exit_blocks()), vec![3, 4]);
	}

	#[test]
	fn self_loop_and_unreachable_cycle() {
		let cfg = build(4, &[(0, 1), (1, 1), (2, 3), (3, 2)]);
		let dom_tree = compute_dominator(&cfg);
		assert!(!dom_tree.is_reachable(2));
		let info = cfg.loop_analysis(&dom_tree);
		assert_eq!(info.len(), 1);
		assert_eq!(ids(&info.loops[0].blocks), vec![1]);
		assert!(info.loops[0].exit_blocks().is_empty());
	}
}
