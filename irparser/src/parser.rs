use std::{collections::HashSet, fmt::Display};

use llvm::*;
use pest::{
	iterators::{Pair, Pairs},
	Parser,
};
use pest_derive::Parser;
use rrvm::{
	basicblock::BasicBlock,
	cfg::{link_node, CFG},
	program::{FuncDecl, LlvmFunc, LlvmProgram},
	LlvmNode,
};
use utils::{
	from_label, GlobalVar, Label,
	LoopprofError::{self, IrSyntaxError},
	Result, ValueItem,
};

#[derive(Parser)]
#[grammar = "llvmir.pest"]
struct IrParser;

enum ParsedInstr {
	Phi(PhiInstr),
	Seq(LlvmInstr),
	Term(LlvmInstr),
}

fn syntax_err(msg: impl Display) -> LoopprofError {
	IrSyntaxError(msg.to_string())
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<Pair<'i, Rule>> {
	pairs.next().ok_or_else(|| syntax_err("unexpected end of item"))
}

// drops the leading sigil of `%name`, `@name` and `%label`
fn name_of<'i>(pair: &Pair<'i, Rule>) -> &'i str {
	&pair.as_str()[1..]
}

fn parse_type(pair: Pair<Rule>) -> VarType {
	match pair.as_str() {
		"i32" => VarType::I32,
		"i64" => VarType::I64,
		"f32" => VarType::F32,
		"i32*" => VarType::I32Ptr,
		"i64*" => VarType::I64Ptr,
		"f32*" => VarType::F32Ptr,
		_ => VarType::Void,
	}
}

fn type_bits(var_type: VarType) -> u32 {
	match var_type {
		VarType::I64 => 64,
		_ => 32,
	}
}

fn parse_int(pair: Pair<Rule>) -> Result<i64> {
	pair
		.as_str()
		.parse()
		.map_err(|_| syntax_err(format!("invalid integer '{}'", pair.as_str())))
}

fn local(pair: &Pair<Rule>, var_type: VarType) -> Temp {
	Temp::new(name_of(pair), var_type, false)
}

fn parse_value(pair: Pair<Rule>, var_type: VarType) -> Result<Value> {
	Ok(match pair.as_rule() {
		Rule::LocalName => Value::Temp(Temp::new(name_of(&pair), var_type, false)),
		Rule::GlobalName => Value::Temp(Temp::new(name_of(&pair), var_type, true)),
		Rule::Float => Value::Float(
			pair
				.as_str()
				.parse()
				.map_err(|_| syntax_err(format!("invalid float '{}'", pair.as_str())))?,
		),
		Rule::Int => match var_type {
			VarType::I64 => Value::Long(parse_int(pair)?),
			_ => {
				let text = pair.as_str();
				let value = parse_int(pair)?;
				Value::Int(i32::try_from(value).map_err(|_| {
					syntax_err(format!("integer '{}' does not fit in {}", text, var_type))
				})?)
			}
		},
		_ => unreachable!(),
	})
}

// a type followed by a value of that type
fn typed_value(pairs: &mut Pairs<Rule>) -> Result<(VarType, Value)> {
	let var_type = parse_type(next(pairs)?);
	let value = parse_value(next(pairs)?, var_type)?;
	Ok((var_type, value))
}

fn label_ref(pair: &Pair<Rule>) -> Label {
	Label::new(name_of(pair))
}

fn parse_arith_op(str: &str) -> ArithOp {
	match str {
		"add" => ArithOp::Add,
		"sub" => ArithOp::Sub,
		"mul" => ArithOp::Mul,
		"sdiv" => ArithOp::Div,
		"srem" => ArithOp::Rem,
		"fadd" => ArithOp::Fadd,
		"fsub" => ArithOp::Fsub,
		"fmul" => ArithOp::Fmul,
		_ => ArithOp::Fdiv,
	}
}

fn parse_comp_op(str: &str) -> CompOp {
	match str {
		"eq" => CompOp::EQ,
		"ne" => CompOp::NE,
		"sgt" => CompOp::SGT,
		"sge" => CompOp::SGE,
		"slt" => CompOp::SLT,
		_ => CompOp::SLE,
	}
}

fn parse_instr(pair: Pair<Rule>) -> Result<ParsedInstr> {
	let rule = pair.as_rule();
	let mut it = pair.into_inner();
	let instr = match rule {
		Rule::Arith => {
			let target = next(&mut it)?;
			let op = parse_arith_op(next(&mut it)?.as_str());
			let (var_type, lhs) = typed_value(&mut it)?;
			let rhs = parse_value(next(&mut it)?, var_type)?;
			ParsedInstr::Seq(Box::new(ArithInstr {
				target: local(&target, var_type),
				op,
				var_type,
				lhs,
				rhs,
			}))
		}
		Rule::Comp => {
			let target = next(&mut it)?;
			let op = parse_comp_op(next(&mut it)?.as_str());
			let (var_type, lhs) = typed_value(&mut it)?;
			let rhs = parse_value(next(&mut it)?, var_type)?;
			ParsedInstr::Seq(Box::new(CompInstr {
				kind: CompKind::Icmp,
				target: local(&target, VarType::I32),
				op,
				var_type,
				lhs,
				rhs,
			}))
		}
		Rule::Phi => {
			let target = next(&mut it)?;
			let var_type = parse_type(next(&mut it)?);
			let mut source = Vec::new();
			for item in it {
				let mut item = item.into_inner();
				let value = parse_value(next(&mut item)?, var_type)?;
				source.push((value, label_ref(&next(&mut item)?)));
			}
			ParsedInstr::Phi(PhiInstr::new(local(&target, var_type), source))
		}
		Rule::Alloca => {
			let target = next(&mut it)?;
			let var_type = parse_type(next(&mut it)?);
			let (_, length) = typed_value(&mut it)?;
			ParsedInstr::Seq(Box::new(AllocInstr {
				target: local(&target, var_type.to_ptr()),
				var_type,
				length,
			}))
		}
		Rule::Load => {
			let target = next(&mut it)?;
			let var_type = parse_type(next(&mut it)?);
			let (_, addr) = typed_value(&mut it)?;
			ParsedInstr::Seq(Box::new(LoadInstr {
				target: local(&target, var_type),
				var_type,
				addr,
			}))
		}
		Rule::Gep => {
			let target = next(&mut it)?;
			let var_type = parse_type(next(&mut it)?);
			let (ptr_type, addr) = typed_value(&mut it)?;
			let (_, offset) = typed_value(&mut it)?;
			ParsedInstr::Seq(Box::new(GEPInstr {
				target: local(&target, ptr_type),
				var_type,
				addr,
				offset,
			}))
		}
		Rule::Call => {
			let mut first = next(&mut it)?;
			let target = if first.as_rule() == Rule::LocalName {
				let target = first;
				first = next(&mut it)?;
				Some(target)
			} else {
				None
			};
			let var_type = parse_type(first);
			let func = Label::new(name_of(&next(&mut it)?));
			let mut params = Vec::new();
			for arg in it {
				params.push(typed_value(&mut arg.into_inner())?);
			}
			ParsedInstr::Seq(Box::new(CallInstr::new(
				target.map(|v| local(&v, var_type)),
				var_type,
				func,
				params,
			)))
		}
		Rule::Store => {
			let (_, value) = typed_value(&mut it)?;
			let (_, addr) = typed_value(&mut it)?;
			ParsedInstr::Seq(Box::new(StoreInstr { value, addr }))
		}
		Rule::Jump => ParsedInstr::Term(Box::new(JumpInstr {
			target: label_ref(&next(&mut it)?),
		})),
		Rule::JumpCond => {
			let (var_type, cond) = typed_value(&mut it)?;
			let target_true = label_ref(&next(&mut it)?);
			let target_false = label_ref(&next(&mut it)?);
			ParsedInstr::Term(Box::new(JumpCondInstr {
				var_type,
				cond,
				target_true,
				target_false,
			}))
		}
		Rule::Ret => {
			let first = next(&mut it)?;
			let value = if first.as_rule() == Rule::RetVoid {
				None
			} else {
				let var_type = parse_type(first);
				Some(parse_value(next(&mut it)?, var_type)?)
			};
			ParsedInstr::Term(Box::new(RetInstr { value }))
		}
		_ => unreachable!(),
	};
	Ok(instr)
}

fn parse_declare(pair: Pair<Rule>) -> Result<FuncDecl> {
	let mut it = pair.into_inner();
	let ret_type = parse_type(next(&mut it)?);
	let name = name_of(&next(&mut it)?).to_string();
	let mut params = Vec::new();
	let mut is_variadic = false;
	for param in it {
		match param.as_rule() {
			Rule::Variadic => is_variadic = true,
			_ => params.push(parse_type(param)),
		}
	}
	Ok(FuncDecl::new(name, ret_type, params, is_variadic))
}

fn parse_global(pair: Pair<Rule>) -> Result<GlobalVar> {
	let mut it = pair.into_inner();
	let name = name_of(&next(&mut it)?).to_string();
	let init = next(&mut it)?;
	let is_array = init.as_rule() == Rule::ArrayInit;
	let mut it = init.into_inner();
	if !is_array {
		let var_type = parse_type(next(&mut it)?);
		let value = parse_int(next(&mut it)?)?;
		return Ok(GlobalVar::new(
			name,
			vec![ValueItem::Word(value as u64)],
			type_bits(var_type),
			false,
		));
	}
	let len = parse_int(next(&mut it)?)?;
	let len = usize::try_from(len)
		.map_err(|_| syntax_err(format!("global @{} has negative length {}", name, len)))?;
	let bits = type_bits(parse_type(next(&mut it)?));
	let mut data = Vec::new();
	for item in it {
		match item.as_rule() {
			Rule::Zeroinit => data.push(ValueItem::Zero(len)),
			_ => {
				let mut item = item.into_inner();
				next(&mut item)?;
				data.push(ValueItem::Word(parse_int(next(&mut item)?)? as u64));
			}
		}
	}
	let var = GlobalVar::new(name, data, bits, true);
	if var.len() != len {
		return Err(syntax_err(format!(
			"global @{} declares {} elements but initializes {}",
			var.ident,
			len,
			var.len()
		)));
	}
	Ok(var)
}

fn parse_block(
	pair: Pair<Rule>,
	func_name: &str,
	temp_mgr: &mut LlvmTempManager,
) -> Result<LlvmNode> {
	let mut it = pair.into_inner();
	let label = Label::new(next(&mut it)?.as_str());
	let id = from_label(&label).ok_or_else(|| {
		syntax_err(format!("invalid block label '{}' in @{}", label, func_name))
	})?;
	let node = BasicBlock::new_node(id);
	for instr in it {
		if node.borrow().jump_instr.is_some() {
			return Err(syntax_err(format!(
				"instruction after terminator in {} of @{}",
				label, func_name
			)));
		}
		match parse_instr(instr)? {
			ParsedInstr::Phi(phi) => {
				temp_mgr.reserve(&phi.target);
				node.borrow_mut().push_phi(phi);
			}
			ParsedInstr::Seq(instr) => {
				if let Some(target) = instr.get_write() {
					temp_mgr.reserve(&target);
				}
				node.borrow_mut().push(instr);
			}
			ParsedInstr::Term(instr) => node.borrow_mut().set_jump(Some(instr)),
		}
	}
	if node.borrow().jump_instr.is_none() {
		return Err(syntax_err(format!(
			"block {} of @{} has no terminator",
			label, func_name
		)));
	}
	Ok(node)
}

// every local value read in the function must be a parameter or defined in it
fn check_operands(name: &str, params: &[LlvmTemp], blocks: &[LlvmNode]) -> Result<()> {
	let mut defined: HashSet<String> = params.iter().map(|v| v.name.clone()).collect();
	let mut read = Vec::new();
	for bb in blocks.iter() {
		let bb = bb.borrow();
		for phi in bb.phi_instrs.iter() {
			defined.insert(phi.target.name.clone());
			read.extend(phi.get_read());
		}
		for instr in bb.instrs.iter().chain(bb.jump_instr.iter()) {
			defined.extend(instr.get_write().map(|v| v.name));
			read.extend(instr.get_read());
		}
	}
	match read.iter().find(|v| !v.is_global && !defined.contains(&v.name)) {
		Some(temp) => Err(syntax_err(format!(
			"use of undefined value {} in @{}",
			temp, name
		))),
		None => Ok(()),
	}
}

fn parse_define(pair: Pair<Rule>, temp_mgr: &mut LlvmTempManager) -> Result<LlvmFunc> {
	let mut it = pair.into_inner();
	let ret_type = parse_type(next(&mut it)?);
	let name = name_of(&next(&mut it)?).to_string();
	let mut params = Vec::new();
	let mut blocks: Vec<LlvmNode> = Vec::new();
	for item in it {
		match item.as_rule() {
			Rule::Param => {
				let mut param = item.into_inner();
				let var_type = parse_type(next(&mut param)?);
				let temp = local(&next(&mut param)?, var_type);
				temp_mgr.reserve(&temp);
				params.push(temp);
			}
			_ => {
				let node = parse_block(item, &name, temp_mgr)?;
				let id = node.borrow().id;
				if blocks.iter().any(|v| v.borrow().id == id) {
					return Err(syntax_err(format!(
						"block {} defined twice in @{}",
						node.borrow().label(),
						name
					)));
				}
				blocks.push(node);
			}
		}
	}
	if blocks.first().map(|v| v.borrow().id) != Some(0) {
		return Err(syntax_err(format!("@{} must start with the entry block", name)));
	}
	check_operands(&name, &params, &blocks)?;

	for node in blocks.iter() {
		let targets = node
			.borrow()
			.jump_instr
			.as_ref()
			.map(|v| v.jump_targets())
			.unwrap_or_default();
		for target in targets {
			let succ = from_label(&target)
				.and_then(|id| blocks.iter().find(|v| v.borrow().id == id))
				.ok_or_else(|| {
					syntax_err(format!("unknown block %{} in @{}", target, name))
				})?;
			link_node(node, succ);
		}
	}

	let mut func = LlvmFunc::new(&name, ret_type, params);
	func.total = blocks.iter().map(|v| v.borrow().id).max().unwrap_or(0);
	func.cfg = CFG::from_blocks(blocks);
	Ok(func)
}

pub fn parse(str: &str) -> Result<LlvmProgram> {
	let program = IrParser::parse(Rule::Program, str)
		.map_err(syntax_err)?
		.next()
		.ok_or_else(|| syntax_err("empty program"))?;
	let mut result = LlvmProgram::new();
	for item in program.into_inner() {
		match item.as_rule() {
			Rule::Declare => result.func_decls.push(parse_declare(item)?),
			Rule::Global => result.global_vars.push(parse_global(item)?),
			Rule::Define => {
				let func = parse_define(item, &mut result.temp_mgr)?;
				if result.get_func(&func.name).is_some() {
					return Err(syntax_err(format!("function @{} defined twice", func.name)));
				}
				result.funcs.push(func);
			}
			_ => {}
		}
	}
	Ok(result)
}
