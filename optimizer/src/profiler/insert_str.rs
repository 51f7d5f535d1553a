use llvm::{LlvmTemp, VarType};
use log::{debug, trace};
use rrvm::{
	dominator::compute_dominator,
	program::{FuncDecl, LlvmProgram},
};
use utils::{GlobalVar, Label, SLOT_BITS};

use super::{PassResult, ProfilerConfig};

/// What the declarator left in a module: the routines the timers call and
/// the storage they write into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInstrumentation {
	pub report_fn: Label,
	pub clock_fn: Label,
	// `@storage`, typed as a pointer to its first element
	pub storage: LlvmTemp,
	// number of elements the storage must hold
	pub len: usize,
}

impl ModuleInstrumentation {
	fn new(config: &ProfilerConfig, len: usize) -> Self {
		Self {
			report_fn: Label::new(&config.report_fn),
			clock_fn: Label::new(&config.clock_fn),
			storage: LlvmTemp::new(&config.storage, VarType::I64Ptr, true),
			len,
		}
	}

	/// Recovers the state of a module the declarator has already run on.
	pub fn find(program: &LlvmProgram, config: &ProfilerConfig) -> Option<Self> {
		if !is_declared(program, &config.report_fn) || !is_declared(program, &config.clock_fn) {
			return None;
		}
		let storage = program.get_global(&config.storage)?;
		Some(Self::new(config, storage.len()))
	}

	/// Makes room for `slot`. Returns whether the required length grew.
	pub fn require(&mut self, slot: u32) -> bool {
		let len = slot as usize + 1;
		if len <= self.len {
			return false;
		}
		self.len = len;
		true
	}

	/// Grows the storage global to the required length.
	pub fn sync_storage(&self, program: &mut LlvmProgram) -> bool {
		match program.get_global_mut(&self.storage.name) {
			Some(var) => {
				let grown = var.grow_to(self.len);
				if grown {
					debug!("grow {} to {} slots", self.storage, self.len);
				}
				grown
			}
			None => false,
		}
	}
}

/// Declares the report and clock routines and the storage global.
#[derive(Default, Clone, Copy)]
pub struct InsertStr;

impl InsertStr {
	pub fn run_on_module(
		&self,
		program: &mut LlvmProgram,
		config: &ProfilerConfig,
	) -> (PassResult, ModuleInstrumentation) {
		if let Some(state) = ModuleInstrumentation::find(program, config) {
			trace!("reuse @{} with {} slots", config.storage, state.len);
			return (PassResult::NoChange, state);
		}
		let mut result = PassResult::NoChange;

		let report_params = vec![VarType::I64Ptr, VarType::I32];
		let report = FuncDecl::new(&config.report_fn, VarType::Void, report_params, true);
		let clock = FuncDecl::new(&config.clock_fn, VarType::I64, Vec::new(), false);
		result |= declare(program, report);
		result |= declare(program, clock);

		let len = match program.get_global(&config.storage) {
			Some(var) => {
				trace!("reuse @{} with {} slots", config.storage, var.len());
				var.len()
			}
			None => {
				let len = count_loops(program).max(config.min_slots);
				let var = GlobalVar::zeroed_array(&config.storage, len, SLOT_BITS);
				debug!("define {}", var);
				program.global_vars.push(var);
				result = PassResult::Changed;
				len
			}
		};

		(result, ModuleInstrumentation::new(config, len))
	}
}

// a declaration or a definition of that name
fn is_declared(program: &LlvmProgram, name: &str) -> bool {
	program.get_decl(name).is_some() || program.get_func(name).is_some()
}

fn declare(program: &mut LlvmProgram, decl: FuncDecl) -> PassResult {
	if is_declared(program, &decl.name) {
		trace!("reuse @{}", decl.name);
		return PassResult::NoChange;
	}
	debug!("{}", decl);
	program.func_decls.push(decl);
	PassResult::Changed
}

// natural loops of the whole module
fn count_loops(program: &LlvmProgram) -> usize {
	program
		.funcs
		.iter()
		.map(|func| func.cfg.loop_analysis(&compute_dominator(&func.cfg)).len())
		.sum()
}
