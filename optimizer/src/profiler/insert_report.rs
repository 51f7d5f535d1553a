use llvm::{CallInstr, LlvmInstr, Value, VarType};
use log::{debug, warn};
use rrvm::program::LlvmProgram;

use super::{ModuleInstrumentation, PassResult};

/// Hands the storage to the report routine right before the entry function
/// returns.
#[derive(Default, Clone, Copy)]
pub struct InsertReport;

impl InsertReport {
	pub fn run_on_module(
		&self,
		program: &mut LlvmProgram,
		state: &ModuleInstrumentation,
		slots_used: u32,
		entry_fn: &str,
	) -> PassResult {
		let report = &state.report_fn;
		if program.get_decl(&report.name).is_none()
			&& program.get_func(&report.name).is_none()
		{
			warn!("@{} is not declared, no report is inserted", report);
			return PassResult::NoChange;
		}
		let Some(func) = program.get_func(entry_fn) else {
			warn!("entry function @{} not found, no report is inserted", entry_fn);
			return PassResult::NoChange;
		};

		let mut result = PassResult::NoChange;
		for bb in func.cfg.blocks.iter() {
			if !bb.borrow().is_ret() {
				continue;
			}
			let reported = bb
				.borrow()
				.instrs
				.iter()
				.any(|v| v.get_callee().is_some_and(|f| f == report));
			if reported {
				continue;
			}
			let call: LlvmInstr = Box::new(CallInstr::new(
				None,
				VarType::Void,
				report.clone(),
				vec![
					(VarType::I64Ptr, state.storage.clone().into()),
					(VarType::I32, Value::Int(slots_used as i32)),
				],
			));
			debug!(
				"report {} slots before the return of {}",
				slots_used,
				bb.borrow().label()
			);
			bb.borrow_mut().push(call);
			result = PassResult::Changed;
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::profiler::{InsertStr, ProfilerConfig};

	const TWO_RETS: &str = "define i32 @main(i32 %0) {
entry:
  br i32 %0, label %B1, label %B2
B1:
  ret i32 0
B2:
  ret i32 1
}
";

	#[test]
	fn one_call_per_return() {
		let mut program = irparser::parse(TWO_RETS).unwrap();
		let (_, state) = InsertStr.run_on_module(&mut program, &ProfilerConfig::default());

		let result = InsertReport.run_on_module(&mut program, &state, 3, "main");
		assert_eq!(result, PassResult::Changed);
		let cfg = &program.funcs[0].cfg;
		for id in [1, 2] {
			let bb = cfg.get_block(id).unwrap();
			let bb = bb.borrow();
			assert_eq!(bb.instrs.len(), 1);
			assert_eq!(
				bb.instrs[0].to_string(),
				"call void @__loopprof_report(i64* @__loopprof_elapsed, i32 3)"
			);
		}

		let result = InsertReport.run_on_module(&mut program, &state, 3, "main");
		assert_eq!(result, PassResult::NoChange);
		let bb = program.funcs[0].cfg.get_block(1).unwrap();
		assert_eq!(bb.borrow().instrs.len(), 1);
	}

	#[test]
	fn missing_entry_or_declaration() {
		let mut program = irparser::parse(TWO_RETS).unwrap();
		let (_, state) = InsertStr.run_on_module(&mut program, &ProfilerConfig::default());
		let result = InsertReport.run_on_module(&mut program, &state, 1, "start");
		assert_eq!(result, PassResult::NoChange);

		program.func_decls.clear();
		let result = InsertReport.run_on_module(&mut program, &state, 1, "main");
		assert_eq!(result, PassResult::NoChange);
	}
}
