use std::fmt::Display;

use llvm::{LlvmInstr, LlvmTempManager, VarType};
use utils::GlobalVar;

use crate::func::RrvmFunc;

pub type LlvmFunc = RrvmFunc<LlvmInstr>;
pub type LlvmProgram = RrvmProgram<LlvmInstr, LlvmTempManager>;

/// An externally defined function, printed as a `declare` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
	pub name: String,
	pub ret_type: VarType,
	pub params: Vec<VarType>,
	pub is_variadic: bool,
}

pub struct RrvmProgram<T: Display, M> {
	pub func_decls: Vec<FuncDecl>,
	pub global_vars: Vec<GlobalVar>,
	pub funcs: Vec<RrvmFunc<T>>,
	pub temp_mgr: M,
}

impl FuncDecl {
	pub fn new(
		name: impl Display,
		ret_type: VarType,
		params: Vec<VarType>,
		is_variadic: bool,
	) -> Self {
		Self {
			name: name.to_string(),
			ret_type,
			params,
			is_variadic,
		}
	}
}

impl<T: Display, M> RrvmProgram<T, M> {
	pub fn get_decl(&self, name: &str) -> Option<&FuncDecl> {
		self.func_decls.iter().find(|v| v.name == name)
	}
	pub fn get_global(&self, name: &str) -> Option<&GlobalVar> {
		self.global_vars.iter().find(|v| v.ident == name)
	}
	pub fn get_global_mut(&mut self, name: &str) -> Option<&mut GlobalVar> {
		self.global_vars.iter_mut().find(|v| v.ident == name)
	}
	pub fn get_func(&self, name: &str) -> Option<&RrvmFunc<T>> {
		self.funcs.iter().find(|v| v.name == name)
	}
	pub fn get_func_mut(&mut self, name: &str) -> Option<&mut RrvmFunc<T>> {
		self.funcs.iter_mut().find(|v| v.name == name)
	}
}
