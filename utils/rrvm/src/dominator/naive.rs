// naive algorithm computing dominator tree with complexity O(n*m)
// Ref: https://blog.csdn.net/Dong_HFUT/article/details/121375025?spm=1001.2014.3001.5501

use std::{
	collections::{HashSet, VecDeque},
	fmt::Display,
};

use crate::cfg::{Node, CFG};

use super::DomTree;

fn reachable_without<T: Display>(entry: &Node<T>, removed: Option<i32>) -> HashSet<i32> {
	let mut reachable = HashSet::new();
	let mut worklist = VecDeque::new();
	if removed != Some(entry.borrow().id) {
		worklist.push_back(entry.clone());
	}
	while let Some(bb) = worklist.pop_front() {
		if !reachable.insert(bb.borrow().id) {
			continue;
		}
		for succ in bb.borrow().succ.iter() {
			let id = succ.borrow().id;
			if Some(id) != removed && !reachable.contains(&id) {
				worklist.push_back(succ.clone());
			}
		}
	}
	reachable
}

pub fn compute_dominator<T: Display>(cfg: &CFG<T>) -> DomTree {
	let mut dom_tree = DomTree::default();
	let entry = cfg.get_entry();
	let all = reachable_without(&entry, None);
	let order: Vec<i32> = cfg
		.blocks
		.iter()
		.map(|v| v.borrow().id)
		.filter(|id| all.contains(id))
		.collect();

	for &id in order.iter() {
		// 去掉这个块后从 entry 无法到达的块即为它支配的块
		let reachable = reachable_without(&entry, Some(id));
		let dominated = all.difference(&reachable).copied().collect();
		dom_tree.dominates.insert(id, dominated);
	}

	// the immediate dominator is the strict dominator dominating the fewest blocks
	for &id in order.iter() {
		let idom = order
			.iter()
			.filter(|&&d| d != id && dom_tree.dominates(d, id))
			.min_by_key(|&&d| dom_tree.dominates[&d].len())
			.copied();
		if let Some(idom) = idom {
			dom_tree.dominator.insert(id, idom);
		}
	}
	dom_tree
}
