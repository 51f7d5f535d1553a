use std::fmt::Display;

use llvm::{LlvmTemp, VarType};

use crate::cfg::CFG;

pub struct RrvmFunc<T: Display> {
	pub total: i32, // highest block id in use; new blocks take total + 1
	pub cfg: CFG<T>,
	pub name: String,
	pub ret_type: VarType,
	pub params: Vec<LlvmTemp>,
}

impl<T: Display> RrvmFunc<T> {
	pub fn new(name: impl Display, ret_type: VarType, params: Vec<LlvmTemp>) -> Self {
		Self {
			total: 0,
			cfg: CFG::new(0),
			name: name.to_string(),
			ret_type,
			params,
		}
	}
}

impl<T: Display> Drop for RrvmFunc<T> {
	fn drop(&mut self) {
		self.cfg.clear();
	}
}
