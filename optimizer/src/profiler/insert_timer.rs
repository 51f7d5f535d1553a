use llvm::*;
use log::{debug, trace};
use rrvm::{
	program::LlvmFunc,
	rrvm_loop::{form_dedicated_exit_blocks, Loop},
	LlvmNode,
};

use super::{ModuleInstrumentation, PassResult, SlotCounter};

/// Times every loop with an exit: a clock sample is stashed at the header
/// and each exit block stores `clock - stash` into the loop's slot. Exits
/// that other code also branches to are split first, so the store only
/// runs when control leaves the loop.
#[derive(Default, Clone, Copy)]
pub struct InsertTimer;

impl InsertTimer {
	pub fn run_on_loop(
		&self,
		loop_: &Loop,
		func: &mut LlvmFunc,
		temp_mgr: &mut LlvmTempManager,
		state: &mut ModuleInstrumentation,
		slots: &mut SlotCounter,
	) -> PassResult {
		let header = loop_.header.clone();
		if loop_.exit_blocks().is_empty() {
			trace!(
				"loop at {} in @{} never exits, skip",
				header.borrow().label(),
				func.name
			);
			return PassResult::NoChange;
		}

		if form_dedicated_exit_blocks(loop_, func, temp_mgr) {
			trace!("split shared exits of loop at {}", header.borrow().label());
		}
		let exits = loop_.exit_blocks();

		let slot = slots.take();
		if state.require(slot) {
			debug!("{} needs {} slots", state.storage, state.len);
		}

		let stash = temp_mgr.new_temp(VarType::I64Ptr, false);
		let alloc: LlvmInstr = Box::new(AllocInstr {
			target: stash.clone(),
			var_type: VarType::I64,
			length: Value::Int(1),
		});
		func.cfg.get_entry().borrow_mut().insert_instrs(0, vec![alloc]);

		let clock = temp_mgr.new_temp(VarType::I64, false);
		let sample = vec![
			read_clock(&clock, state),
			Box::new(StoreInstr {
				value: clock.into(),
				addr: stash.clone().into(),
			}),
		];
		insert_at_top(&header, sample);

		for exit in exits.iter() {
			insert_at_top(exit, record_elapsed(&stash, slot, state, temp_mgr));
		}

		debug!(
			"timed loop at {} in @{}: slot {}, {} exits",
			header.borrow().label(),
			func.name,
			slot,
			exits.len()
		);
		PassResult::Changed
	}
}

fn read_clock(target: &LlvmTemp, state: &ModuleInstrumentation) -> LlvmInstr {
	Box::new(CallInstr::new(
		Some(target.clone()),
		VarType::I64,
		state.clock_fn.clone(),
		Vec::new(),
	))
}

// clock, reload the header sample, subtract, store into the slot
fn record_elapsed(
	stash: &LlvmTemp,
	slot: u32,
	state: &ModuleInstrumentation,
	temp_mgr: &mut LlvmTempManager,
) -> Vec<LlvmInstr> {
	let end = temp_mgr.new_temp(VarType::I64, false);
	let begin = temp_mgr.new_temp(VarType::I64, false);
	let elapsed = temp_mgr.new_temp(VarType::I64, false);
	let addr = temp_mgr.new_temp(VarType::I64Ptr, false);
	vec![
		read_clock(&end, state),
		Box::new(LoadInstr {
			target: begin.clone(),
			var_type: VarType::I64,
			addr: stash.clone().into(),
		}),
		Box::new(ArithInstr {
			target: elapsed.clone(),
			op: ArithOp::Sub,
			var_type: VarType::I64,
			lhs: end.into(),
			rhs: begin.into(),
		}),
		Box::new(GEPInstr {
			target: addr.clone(),
			var_type: VarType::I64,
			addr: state.storage.clone().into(),
			offset: Value::Int(slot as i32),
		}),
		Box::new(StoreInstr {
			value: elapsed.into(),
			addr: addr.into(),
		}),
	]
}

// after the phis and the stack slots at the start of the block
fn insert_at_top(bb: &LlvmNode, instrs: Vec<LlvmInstr>) {
	let pos = bb
		.borrow()
		.instrs
		.iter()
		.take_while(|v| matches!(v.get_variant(), LlvmInstrVariant::AllocInstr(_)))
		.count();
	bb.borrow_mut().insert_instrs(pos, instrs);
}
