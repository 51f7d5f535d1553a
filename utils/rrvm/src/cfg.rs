use std::{fmt::Display, rc::Rc};

pub use crate::basicblock::{BasicBlock, Node};

pub struct CFG<T: Display> {
	pub blocks: Vec<Node<T>>,
}

impl<T: Display> CFG<T> {
	pub fn new(id: i32) -> Self {
		Self {
			blocks: vec![BasicBlock::new_node(id)],
		}
	}
	pub fn from_blocks(blocks: Vec<Node<T>>) -> Self {
		Self { blocks }
	}
	pub fn get_entry(&self) -> Node<T> {
		self.blocks[0].clone()
	}
	pub fn get_block(&self, id: i32) -> Option<Node<T>> {
		self.blocks.iter().find(|v| v.borrow().id == id).cloned()
	}
	pub fn size(&self) -> usize {
		self.blocks.len()
	}
	// breaks the prev/succ reference cycles so the blocks can be dropped
	pub fn clear(&mut self) {
		self.blocks.iter().for_each(|v| v.borrow_mut().clear());
	}
}

// moves the edge `from -> old` over to `from -> new`, keeping successor order
pub fn redirect_edge<T: Display>(from: &Node<T>, old: &Node<T>, new: &Node<T>) {
	let Some(pos) = from.borrow().succ.iter().position(|v| Rc::ptr_eq(v, old)) else {
		return;
	};
	from.borrow_mut().succ[pos] = new.clone();
	old.borrow_mut().prev.retain(|v| !Rc::ptr_eq(v, from));
	new.borrow_mut().prev.push(from.clone());
}

pub fn link_node<T: Display>(from: &Node<T>, to: &Node<T>) {
	let to_id = to.borrow().id;
	if from.borrow().succ.iter().any(|v| v.borrow().id == to_id) {
		return;
	}
	from.borrow_mut().succ.push(to.clone());
	to.borrow_mut().prev.push(from.clone());
}
