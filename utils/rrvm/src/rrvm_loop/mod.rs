use std::{collections::HashMap, fmt::Display};

use crate::LlvmNode;

mod loop_analysis;
pub mod utils;

pub use self::utils::*;

// Instances of this class are used to represent loops that are detected in the flow graph.
#[derive(Clone)]
pub struct Loop {
	pub id: u32,
	pub header: LlvmNode,
	// member blocks in layout order, header included
	pub blocks: Vec<LlvmNode>,
	pub outer: Option<u32>,
	pub subloops: Vec<u32>,
	pub level: u32,
}

impl Loop {
	pub fn header_id(&self) -> i32 {
		self.header.borrow().id
	}
	pub fn contains_block(&self, id: i32) -> bool {
		self.blocks.iter().any(|v| v.borrow().id == id)
	}
	pub fn no_inner(&self) -> bool {
		self.subloops.is_empty()
	}
	/// Blocks outside the loop with a predecessor inside it, without
	/// duplicates, in the order they are first reached from the members.
	pub fn exit_blocks(&self) -> Vec<LlvmNode> {
		let mut exits: Vec<LlvmNode> = Vec::new();
		for bb in self.blocks.iter() {
			for succ in bb.borrow().succ.iter() {
				let id = succ.borrow().id;
				if !self.contains_block(id) && !exits.iter().any(|v| v.borrow().id == id) {
					exits.push(succ.clone());
				}
			}
		}
		exits
	}
}

impl Display for Loop {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let outer = match self.outer {
			Some(outer) => outer.to_string(),
			None => "None".to_string(),
		};
		write!(
			f,
			"loop {}: outer: {}, header: {}, level: {}, no_inner: {}",
			self.id,
			outer,
			self.header.borrow().label(),
			self.level,
			self.no_inner()
		)
	}
}

/// The loop forest of one function.
#[derive(Default, Clone)]
pub struct LoopInfo {
	pub loops: Vec<Loop>,
	// basicblock id to the innermost loop containing it
	pub loop_map: HashMap<i32, u32>,
}

impl LoopInfo {
	pub fn len(&self) -> usize {
		self.loops.len()
	}
	pub fn is_empty(&self) -> bool {
		self.loops.is_empty()
	}
	pub fn get(&self, id: u32) -> Option<&Loop> {
		self.loops.get(id as usize)
	}
	pub fn get_by_header(&self, header: i32) -> Option<&Loop> {
		self.loops.iter().find(|v| v.header_id() == header)
	}
	pub fn get_loop_for(&self, block: i32) -> Option<&Loop> {
		self.loop_map.get(&block).and_then(|id| self.get(*id))
	}
	pub fn top_level(&self) -> impl Iterator<Item = &Loop> {
		self.loops.iter().filter(|v| v.outer.is_none())
	}
	// 内层循环先于外层循环
	pub fn post_order(&self) -> Vec<&Loop> {
		fn dfs<'a>(info: &'a LoopInfo, node: &'a Loop, order: &mut Vec<&'a Loop>) {
			for sub in node.subloops.iter().filter_map(|id| info.get(*id)) {
				dfs(info, sub, order);
			}
			order.push(node);
		}
		let mut order = Vec::new();
		for node in self.top_level() {
			dfs(self, node, &mut order);
		}
		order
	}
}
