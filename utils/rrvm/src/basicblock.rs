use std::{cell::RefCell, fmt::Display, rc::Rc};

use llvm::{LlvmInstr, PhiInstr};
use utils::{to_label, Label};

pub type Node<T> = Rc<RefCell<BasicBlock<T>>>;

pub struct BasicBlock<T: Display> {
	pub id: i32,
	pub prev: Vec<Node<T>>,
	pub succ: Vec<Node<T>>,
	pub phi_instrs: Vec<PhiInstr>,
	pub instrs: Vec<T>,
	pub jump_instr: Option<T>,
}

impl<T: Display> BasicBlock<T> {
	pub fn new(id: i32) -> BasicBlock<T> {
		BasicBlock {
			id,
			prev: Vec::new(),
			succ: Vec::new(),
			phi_instrs: Vec::new(),
			instrs: Vec::new(),
			jump_instr: None,
		}
	}
	pub fn new_node(id: i32) -> Node<T> {
		Rc::new(RefCell::new(Self::new(id)))
	}
	pub fn label(&self) -> Label {
		to_label(self.id)
	}
	pub fn clear(&mut self) {
		self.prev.clear();
		self.succ.clear();
	}
	pub fn push(&mut self, instr: T) {
		self.instrs.push(instr);
	}
	pub fn push_phi(&mut self, instr: PhiInstr) {
		self.phi_instrs.push(instr);
	}
	/// Inserts `instrs` before position `pos` of the ordinary instructions.
	/// Phi instructions are kept apart, so position 0 is right after them.
	pub fn insert_instrs(&mut self, pos: usize, instrs: Vec<T>) {
		let pos = pos.min(self.instrs.len());
		for (offset, instr) in instrs.into_iter().enumerate() {
			self.instrs.insert(pos + offset, instr);
		}
	}
	pub fn succ_ids(&self) -> Vec<i32> {
		self.succ.iter().map(|v| v.borrow().id).collect()
	}
	pub fn prev_ids(&self) -> Vec<i32> {
		self.prev.iter().map(|v| v.borrow().id).collect()
	}
}

impl BasicBlock<LlvmInstr> {
	pub fn set_jump(&mut self, instr: Option<LlvmInstr>) {
		self.jump_instr = instr;
	}
	pub fn is_ret(&self) -> bool {
		self.jump_instr.as_ref().is_some_and(|v| v.is_ret())
	}
}

fn instr_format<T: Display>(v: T) -> String {
	format!("  {}", v)
}

#[cfg(not(feature = "debug"))]
impl<T: Display> Display for BasicBlock<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let instrs = self
			.phi_instrs
			.iter()
			.map(instr_format)
			.chain(self.instrs.iter().map(instr_format))
			.chain(self.jump_instr.iter().map(instr_format))
			.collect::<Vec<_>>()
			.join("\n");
		write!(f, "{}:\n{}", self.label(), instrs)
	}
}

#[cfg(feature = "debug")]
impl<T: Display> Display for BasicBlock<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let instrs = self
			.phi_instrs
			.iter()
			.map(instr_format)
			.chain(self.instrs.iter().map(instr_format))
			.chain(self.jump_instr.iter().map(instr_format))
			.collect::<Vec<_>>()
			.join("\n");
		write!(
			f,
			"{}:  ; prev: {:?} succ: {:?}\n{}",
			self.label(),
			self.prev_ids(),
			self.succ_ids(),
			instrs
		)
	}
}
