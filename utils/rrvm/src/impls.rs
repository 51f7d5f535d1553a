use std::fmt::Display;

use crate::{
	cfg::CFG,
	func::RrvmFunc,
	program::{FuncDecl, RrvmProgram},
};

impl<T: Display> Display for CFG<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{}",
			self
				.blocks
				.iter()
				.map(|v| v.borrow().to_string())
				.collect::<Vec<_>>()
				.join("\n")
		)
	}
}

impl<T: Display> Display for RrvmFunc<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let params = self
			.params
			.iter()
			.map(|v| format!("{} {}", v.var_type, v))
			.collect::<Vec<_>>()
			.join(", ");
		let head = format!("define {} @{}({})", self.ret_type, self.name, params);
		write!(f, "{} {{\n{}\n}}", head, self.cfg)
	}
}

impl Display for FuncDecl {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let mut params: Vec<_> = self.params.iter().map(|v| v.to_string()).collect();
		if self.is_variadic {
			params.push("...".to_string());
		}
		write!(
			f,
			"declare {} @{}({})",
			self.ret_type,
			self.name,
			params.join(", ")
		)
	}
}

impl<T: Display, M> Display for RrvmProgram<T, M> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		for decl in &self.func_decls {
			writeln!(f, "{}", decl)?;
		}
		for item in &self.global_vars {
			writeln!(f, "{}", item)?;
		}
		if !self.func_decls.is_empty() || !self.global_vars.is_empty() {
			writeln!(f)?;
		}
		let funcs =
			self.funcs.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\n\n");
		writeln!(f, "{}", funcs)
	}
}

impl<T: Display, M: Default> RrvmProgram<T, M> {
	pub fn new() -> Self {
		Self {
			func_decls: Vec::new(),
			global_vars: Vec::new(),
			funcs: Vec::new(),
			temp_mgr: M::default(),
		}
	}
}

impl<T: Display, M: Default> Default for RrvmProgram<T, M> {
	fn default() -> Self {
		Self::new()
	}
}
