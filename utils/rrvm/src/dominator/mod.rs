mod naive;

use std::collections::{HashMap, HashSet};

pub use naive::*;

/// Dominance facts of a CFG, keyed by block id. Blocks unreachable from
/// the entry take no part in dominance and never appear here.
#[derive(Default, Debug)]
pub struct DomTree {
	// block -> blocks it dominates, itself included
	pub dominates: HashMap<i32, HashSet<i32>>,
	// block -> immediate dominator
	pub dominator: HashMap<i32, i32>,
}

impl DomTree {
	pub fn is_reachable(&self, id: i32) -> bool {
		self.dominates.contains_key(&id)
	}
	pub fn dominates(&self, a: i32, b: i32) -> bool {
		self.dominates.get(&a).is_some_and(|v| v.contains(&b))
	}
	pub fn idom(&self, id: i32) -> Option<i32> {
		self.dominator.get(&id).copied()
	}
}
