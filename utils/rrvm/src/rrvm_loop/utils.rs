use std::rc::Rc;

use llvm::{JumpInstr, LlvmTempManager, PhiInstr, Value};
use log::trace;

use crate::{
	basicblock::BasicBlock,
	cfg::{link_node, redirect_edge},
	program::LlvmFunc,
	LlvmNode,
};

use super::Loop;

/// Moves the edges from `preds` into `bb` over to a new block that falls
/// through to `bb`, and returns the new block. Phi entries for the moved
/// edges are merged into the new block.
pub fn split_block_predecessors(
	bb: &LlvmNode,
	preds: &[LlvmNode],
	func: &mut LlvmFunc,
	temp_mgr: &mut LlvmTempManager,
) -> LlvmNode {
	func.total += 1;
	let new_bb: LlvmNode = BasicBlock::new_node(func.total);
	let old_label = bb.borrow().label();
	let new_label = new_bb.borrow().label();

	for pred in preds.iter() {
		redirect_edge(pred, bb, &new_bb);
		if let Some(jump) = pred.borrow_mut().jump_instr.as_mut() {
			jump.replace_jump_target(&old_label, &new_label);
		}
	}
	let pred_labels: Vec<_> = preds.iter().map(|v| v.borrow().label()).collect();

	let mut new_phis = Vec::new();
	for phi in bb.borrow_mut().phi_instrs.iter_mut() {
		let incoming: Vec<_> =
			phi.source.iter().filter(|(_, l)| pred_labels.contains(l)).cloned().collect();
		let Some((first, _)) = incoming.first().cloned() else {
			continue;
		};
		phi.source.retain(|(_, l)| !pred_labels.contains(l));
		// 所有搬走的边带来同一个值时不需要新的 phi
		let value = if incoming.iter().all(|(v, _)| *v == first) {
			first
		} else {
			let target = temp_mgr.new_temp(phi.var_type, false);
			new_phis.push(PhiInstr::new(target.clone(), incoming));
			Value::Temp(target)
		};
		phi.source.push((value, new_label.clone()));
	}
	new_bb.borrow_mut().phi_instrs = new_phis;
	new_bb.borrow_mut().set_jump(Some(Box::new(JumpInstr { target: old_label })));
	link_node(&new_bb, bb);

	// the entry block has to stay first
	let pos = func
		.cfg
		.blocks
		.iter()
		.position(|v| Rc::ptr_eq(v, bb))
		.unwrap_or(func.cfg.blocks.len())
		.max(1);
	func.cfg.blocks.insert(pos, new_bb.clone());
	new_bb
}

/// Gives every exit of `loop_` that is also reached from outside the loop a
/// block of its own, entered only from the loop. The function entry counts
/// as reached from outside. Returns whether a block was added.
pub fn form_dedicated_exit_blocks(
	loop_: &Loop,
	func: &mut LlvmFunc,
	temp_mgr: &mut LlvmTempManager,
) -> bool {
	let entry = func.cfg.get_entry();
	let mut changed = false;
	for exit in loop_.exit_blocks() {
		let (inside, outside): (Vec<LlvmNode>, Vec<LlvmNode>) = exit
			.borrow()
			.prev
			.iter()
			.cloned()
			.partition(|v| loop_.contains_block(v.borrow().id));
		if outside.is_empty() && !Rc::ptr_eq(&exit, &entry) {
			trace!("{} is already a dedicated exit", exit.borrow().label());
			continue;
		}
		let new_bb = split_block_predecessors(&exit, &inside, func, temp_mgr);
		trace!(
			"dedicated exit {} for {}",
			new_bb.borrow().label(),
			exit.borrow().label()
		);
		changed = true;
	}
	changed
}
