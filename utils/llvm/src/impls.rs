use std::fmt::Display;

use utils::Label;

use crate::{llvminstr::*, temp::Temp, unwrap_values, LlvmInstrVariant};

impl Display for ArithInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {}, {}",
			self.target, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl LlvmInstrTrait for ArithInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::ArithInstr(self)
	}
}

impl Display for CompInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {} {}, {}",
			self.target, self.kind, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl LlvmInstrTrait for CompInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::CompInstr(self)
	}
}

impl Display for JumpInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "br label %{}", self.target)
	}
}

impl LlvmInstrTrait for JumpInstr {
	fn jump_targets(&self) -> Vec<Label> {
		vec![self.target.clone()]
	}
	fn replace_jump_target(&mut self, old: &Label, new: &Label) {
		if self.target == *old {
			self.target = new.clone();
		}
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::JumpInstr(self)
	}
}

impl Display for JumpCondInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"br {} {}, label %{}, label %{}",
			self.var_type, self.cond, self.target_true, self.target_false
		)
	}
}

impl LlvmInstrTrait for JumpCondInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.cond])
	}
	fn jump_targets(&self) -> Vec<Label> {
		if self.target_true == self.target_false {
			vec![self.target_true.clone()]
		} else {
			vec![self.target_true.clone(), self.target_false.clone()]
		}
	}
	fn replace_jump_target(&mut self, old: &Label, new: &Label) {
		if self.target_true == *old {
			self.target_true = new.clone();
		}
		if self.target_false == *old {
			self.target_false = new.clone();
		}
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::JumpCondInstr(self)
	}
}

impl Display for PhiInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let source = self
			.source
			.iter()
			.map(|(v, l)| format!("[{}, %{}]", v, l))
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "{} = phi {} {}", self.target, self.var_type, source)
	}
}

impl LlvmInstrTrait for PhiInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(self.source.iter().map(|(v, _)| v).collect())
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::PhiInstr(self)
	}
}

impl Display for RetInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.value {
			Some(v) => write!(f, "ret {} {}", v.get_type(), v),
			None => write!(f, "ret void"),
		}
	}
}

impl LlvmInstrTrait for RetInstr {
	fn get_read(&self) -> Vec<Temp> {
		self.value.iter().flat_map(|v| v.unwrap_temp()).collect()
	}
	fn is_ret(&self) -> bool {
		true
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::RetInstr(self)
	}
}

impl Display for AllocInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = alloca {}, {} {}",
			self.target,
			self.var_type,
			self.length.get_type(),
			self.length
		)
	}
}

impl LlvmInstrTrait for AllocInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.length])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::AllocInstr(self)
	}
}

impl Display for StoreInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"store {} {}, {} {}",
			self.value.get_type(),
			self.value,
			self.addr.get_type(),
			self.addr
		)
	}
}

impl LlvmInstrTrait for StoreInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.value, &self.addr])
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::StoreInstr(self)
	}
}

impl Display for LoadInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = load {}, {} {}",
			self.target,
			self.var_type,
			self.addr.get_type(),
			self.addr
		)
	}
}

impl LlvmInstrTrait for LoadInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::LoadInstr(self)
	}
}

impl Display for GEPInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = getelementptr {}, {} {}, {} {}",
			self.target,
			self.var_type,
			self.addr.get_type(),
			self.addr,
			self.offset.get_type(),
			self.offset
		)
	}
}

impl LlvmInstrTrait for GEPInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr, &self.offset])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::GEPInstr(self)
	}
}

impl Display for CallInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let params = self
			.params
			.iter()
			.map(|(t, v)| format!("{} {}", t, v))
			.collect::<Vec<_>>()
			.join(", ");
		if let Some(target) = &self.target {
			write!(f, "{} = ", target)?;
		}
		write!(f, "call {} @{}({})", self.var_type, self.func, params)
	}
}

impl LlvmInstrTrait for CallInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(self.params.iter().map(|(_, v)| v).collect())
	}
	fn get_write(&self) -> Option<Temp> {
		self.target.clone()
	}
	fn get_callee(&self) -> Option<&Label> {
		Some(&self.func)
	}
	fn get_variant(&self) -> LlvmInstrVariant {
		LlvmInstrVariant::CallInstr(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ArithOp, Value, VarType};

	#[test]
	fn instr_format() {
		let stash = Temp::new(3, VarType::I64Ptr, false);
		let storage = Temp::new("__loopprof_elapsed", VarType::I64Ptr, true);
		let clock = CallInstr::new(
			Some(Temp::new(4, VarType::I64, false)),
			VarType::I64,
			Label::new("__loopprof_clock"),
			vec![],
		);
		assert_eq!(clock.to_string(), "%4 = call i64 @__loopprof_clock()");
		assert_eq!(clock.get_callee().map(|l| l.name.as_str()), Some("__loopprof_clock"));

		let load = LoadInstr {
			target: Temp::new(5, VarType::I64, false),
			var_type: VarType::I64,
			addr: Value::Temp(stash.clone()),
		};
		assert_eq!(load.to_string(), "%5 = load i64, i64* %3");

		let sub = ArithInstr {
			target: Temp::new(6, VarType::I64, false),
			op: ArithOp::Sub,
			var_type: VarType::I64,
			lhs: Value::Temp(Temp::new(4, VarType::I64, false)),
			rhs: Value::Temp(Temp::new(5, VarType::I64, false)),
		};
		assert_eq!(sub.to_string(), "%6 = sub i64 %4, %5");
		assert_eq!(sub.get_read().len(), 2);

		let gep = GEPInstr {
			target: Temp::new(7, VarType::I64Ptr, false),
			var_type: VarType::I64,
			addr: Value::Temp(storage),
			offset: Value::Int(2),
		};
		assert_eq!(
			gep.to_string(),
			"%7 = getelementptr i64, i64* @__loopprof_elapsed, i32 2"
		);

		let alloc = AllocInstr {
			target: stash,
			var_type: VarType::I64,
			length: Value::Int(1),
		};
		assert_eq!(alloc.to_string(), "%3 = alloca i64, i32 1");
	}

	#[test]
	fn terminators() {
		let br = JumpCondInstr {
			var_type: VarType::I32,
			cond: Value::Temp(Temp::new(1, VarType::I32, false)),
			target_true: Label::new("B2"),
			target_false: Label::new("B3"),
		};
		assert_eq!(br.to_string(), "br i32 %1, label %B2, label %B3");
		assert_eq!(br.jump_targets().len(), 2);

		let mut br = br;
		br.replace_jump_target(&Label::new("B3"), &Label::new("B9"));
		assert_eq!(br.to_string(), "br i32 %1, label %B2, label %B9");
		let mut jump = JumpInstr {
			target: Label::new("B2"),
		};
		jump.replace_jump_target(&Label::new("B3"), &Label::new("B9"));
		assert_eq!(jump.to_string(), "br label %B2");

		let ret = RetInstr { value: None };
		assert_eq!(ret.to_string(), "ret void");
		assert!(ret.is_ret());
		assert!(ret.jump_targets().is_empty());
	}
}
