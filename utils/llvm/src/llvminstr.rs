use std::fmt::{Debug, Display};

use utils::Label;

use crate::{llvmop::*, llvmvar::VarType, temp::Temp, LlvmInstrVariant};

pub trait LlvmInstrTrait: Display + Debug {
	fn get_read(&self) -> Vec<Temp> {
		Vec::new()
	}
	fn get_write(&self) -> Option<Temp> {
		None
	}
	fn is_ret(&self) -> bool {
		false
	}
	fn get_callee(&self) -> Option<&Label> {
		None
	}
	// successor labels of a terminator
	fn jump_targets(&self) -> Vec<Label> {
		Vec::new()
	}
	// retargets a terminator's edges to `old` at `new`
	fn replace_jump_target(&mut self, _old: &Label, _new: &Label) {}
	fn get_variant(&self) -> LlvmInstrVariant;
}

#[derive(Debug, Clone)]
pub struct ArithInstr {
	pub target: Temp,
	pub op: ArithOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Debug, Clone)]
pub struct CompInstr {
	pub kind: CompKind,
	pub target: Temp,
	pub op: CompOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Debug, Clone)]
pub struct JumpInstr {
	pub target: Label,
}

#[derive(Debug, Clone)]
pub struct JumpCondInstr {
	pub var_type: VarType,
	pub cond: Value,
	pub target_true: Label,
	pub target_false: Label,
}

#[derive(Debug, Clone)]
pub struct PhiInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub source: Vec<(Value, Label)>,
}

#[derive(Debug, Clone)]
pub struct RetInstr {
	pub value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct AllocInstr {
	pub target: Temp,
	// element type; `target` is a pointer to it
	pub var_type: VarType,
	pub length: Value,
}

#[derive(Debug, Clone)]
pub struct StoreInstr {
	pub value: Value,
	pub addr: Value,
}

#[derive(Debug, Clone)]
pub struct LoadInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
}

#[derive(Debug, Clone)]
pub struct GEPInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
	pub offset: Value,
}

#[derive(Debug, Clone)]
pub struct CallInstr {
	// `None` for calls returning void
	pub target: Option<Temp>,
	pub var_type: VarType,
	pub func: Label,
	pub params: Vec<(VarType, Value)>,
}

impl PhiInstr {
	pub fn new(target: Temp, source: Vec<(Value, Label)>) -> Self {
		Self {
			var_type: target.var_type,
			target,
			source,
		}
	}
}

impl CallInstr {
	pub fn new(
		target: Option<Temp>,
		var_type: VarType,
		func: Label,
		params: Vec<(VarType, Value)>,
	) -> Self {
		Self {
			target,
			var_type,
			func,
			params,
		}
	}
}
