use std::fmt::Display;

use loopprof_derive::LowerDisplay;

use crate::{llvmvar::VarType, temp::Temp};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Int(i32),
	Long(i64),
	Float(f32),
	Temp(Temp),
}

#[derive(LowerDisplay, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
	Add,
	Sub,
	Mul,
	#[style("sdiv")]
	Div,
	// modulo
	#[style("srem")]
	Rem,
	// Float add
	Fadd,
	// Float sub
	Fsub,
	// Float mul
	Fmul,
	// Float div
	Fdiv,
}

#[derive(LowerDisplay, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompOp {
	EQ,
	NE,
	// signed greater than
	SGT,
	// signed greater or equal
	SGE,
	// signed less than
	SLT,
	// signed less or equal
	SLE,
}

#[derive(LowerDisplay, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompKind {
	Icmp,
}

impl Value {
	pub fn get_type(&self) -> VarType {
		match self {
			Self::Int(_) => VarType::I32,
			Self::Long(_) => VarType::I64,
			Self::Float(_) => VarType::F32,
			Self::Temp(v) => v.var_type,
		}
	}
	pub fn unwrap_temp(&self) -> Option<Temp> {
		match self {
			Self::Temp(v) => Some(v.clone()),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Int(v) => write!(f, "{}", v),
			Self::Long(v) => write!(f, "{}", v),
			Self::Float(v) => write!(f, "{:?}", v),
			Self::Temp(v) => write!(f, "{}", v),
		}
	}
}

impl From<Temp> for Value {
	fn from(temp: Temp) -> Self {
		Self::Temp(temp)
	}
}
