use llvm::{LlvmInstrVariant, Value};
use optimizer::{
	legacy::LegacyPassManager,
	pass::{PassBuilder, PreservedAnalyses},
	profiler::{InsertStr, PassResult},
	LoopTally, PassRegistry, ProfileContext, ProfilerConfig,
};
use rrvm::{program::LlvmProgram, LlvmNode};
use utils::{GlobalVar, CLOCK_FUNC, REPORT_FUNC, STORAGE_VAR};

// L1 = {B1, B2} leaves through B5 and B3, L2 = {B4} through B6
const MODULE_M: &str = "define i32 @main(i32 %0) {
entry:
  br label %B1
B1:
  %1 = phi i32 [0, %entry], [%3, %B2]
  br i32 %0, label %B2, label %B5
B2:
  %2 = icmp slt i32 %1, 10
  %3 = add i32 %1, 1
  br i32 %2, label %B1, label %B3
B3:
  br label %B4
B4:
  br i32 %0, label %B4, label %B6
B5:
  ret i32 1
B6:
  ret i32 0
}
";

fn block(program: &LlvmProgram, id: i32) -> LlvmNode {
	program.funcs[0].cfg.get_block(id).unwrap()
}

fn calls_to(bb: &LlvmNode, callee: &str) -> usize {
	bb.borrow()
		.instrs
		.iter()
		.filter(|v| v.get_callee().is_some_and(|f| f.name == callee))
		.count()
}

fn stored_slots(bb: &LlvmNode) -> Vec<i32> {
	bb.borrow()
		.instrs
		.iter()
		.filter_map(|v| match v.get_variant() {
			LlvmInstrVariant::GEPInstr(gep) => match gep.offset {
				Value::Int(slot) => Some(slot),
				_ => None,
			},
			_ => None,
		})
		.collect()
}

fn run_new(
	text: &str,
	config: ProfilerConfig,
	tally: &LoopTally,
) -> (LlvmProgram, ProfileContext) {
	let mut program = irparser::parse(text).unwrap();
	let mut ctx = ProfileContext::for_module(tally, config);
	PassBuilder::profiling_pipeline(&ctx.config)
		.run(&mut program, &mut ctx)
		.unwrap();
	(program, ctx)
}

fn run_legacy(
	text: &str,
	config: ProfilerConfig,
	tally: &LoopTally,
) -> (LlvmProgram, ProfileContext) {
	let mut program = irparser::parse(text).unwrap();
	let mut ctx = ProfileContext::for_module(tally, config);
	let registry = PassRegistry::with_profiler_passes().unwrap();
	LegacyPassManager::profiling_pipeline(&registry, &ctx.config)
		.unwrap()
		.run(&mut program, &mut ctx)
		.unwrap();
	(program, ctx)
}

#[test]
fn scenario_two_loops() {
	let tally = LoopTally::new();
	let mut program = irparser::parse(MODULE_M).unwrap();
	let config = ProfilerConfig {
		report_on_exit: false,
		..Default::default()
	};
	let mut ctx = ProfileContext::for_module(&tally, config.clone());
	let preserved = PassBuilder::profiling_pipeline(&config)
		.run(&mut program, &mut ctx)
		.unwrap();
	assert_eq!(preserved, PreservedAnalyses::None);
	assert_eq!(tally.get(), 2);
	assert_eq!(ctx.slots.used(), 2);

	// one header sample each
	assert_eq!(calls_to(&block(&program, 1), CLOCK_FUNC), 1);
	assert_eq!(calls_to(&block(&program, 4), CLOCK_FUNC), 1);
	// L1 reports to slot 0 from both of its exits, L2 to slot 1
	assert_eq!(stored_slots(&block(&program, 5)), vec![0]);
	assert_eq!(stored_slots(&block(&program, 3)), vec![0]);
	assert_eq!(stored_slots(&block(&program, 6)), vec![1]);
	let samples: usize = program.funcs[0]
		.cfg
		.blocks
		.iter()
		.map(|v| calls_to(v, CLOCK_FUNC))
		.sum();
	assert_eq!(samples, 5);
	assert_eq!(program.get_global(STORAGE_VAR).unwrap().len(), 2);

	// rerunning the declarator changes nothing
	let storage = program.get_global(STORAGE_VAR).unwrap().clone();
	let (result, state) = InsertStr.run_on_module(&mut program, &ProfilerConfig::default());
	assert_eq!(result, PassResult::NoChange);
	assert_eq!(state.len, 2);
	assert_eq!(program.get_global(STORAGE_VAR), Some(&storage));
	assert_eq!(program.func_decls.len(), 2);
}

#[test]
fn report_before_every_return() {
	let tally = LoopTally::new();
	let (program, _) = run_new(MODULE_M, ProfilerConfig::default(), &tally);
	for id in [5, 6] {
		let bb = block(&program, id);
		assert_eq!(calls_to(&bb, REPORT_FUNC), 1);
		let last = bb.borrow().instrs.last().unwrap().to_string();
		assert_eq!(
			last,
			"call void @__loopprof_report(i64* @__loopprof_elapsed, i32 2)"
		);
	}
	assert_eq!(calls_to(&block(&program, 3), REPORT_FUNC), 0);
}

#[test]
fn both_managers_agree() {
	let tally = LoopTally::new();
	let (new_pm, new_ctx) = run_new(MODULE_M, ProfilerConfig::default(), &tally);
	let (legacy_pm, legacy_ctx) = run_legacy(MODULE_M, ProfilerConfig::default(), &tally);
	assert_eq!(new_pm.to_string(), legacy_pm.to_string());
	assert_eq!(new_ctx.slots.used(), legacy_ctx.slots.used());
	// both contexts count into the same tally
	assert_eq!(tally.get(), 4);
}

// L1 = {B1} leaves straight into the header of L2 = {B2}
const MODULE_CHAIN: &str = "define i32 @main(i32 %0) {
entry:
  br label %B1
B1:
  %1 = phi i32 [0, %entry], [%2, %B1]
  %2 = add i32 %1, 1
  br i32 %0, label %B1, label %B2
B2:
  %3 = phi i32 [%2, %B1], [%4, %B2]
  %4 = add i32 %3, 1
  br i32 %0, label %B2, label %B3
B3:
  ret i32 %4
}
";

#[test]
fn shared_exit_is_split_by_both_managers() {
	let tally = LoopTally::new();
	let (new_pm, _) = run_new(MODULE_CHAIN, ProfilerConfig::default(), &tally);
	let (legacy_pm, _) = run_legacy(MODULE_CHAIN, ProfilerConfig::default(), &tally);
	assert_eq!(new_pm.to_string(), legacy_pm.to_string());

	// B4 now sits between L1 and L2 and is the only place slot 0 is written
	assert_eq!(stored_slots(&block(&new_pm, 2)), Vec::<i32>::new());
	assert_eq!(stored_slots(&block(&new_pm, 4)), vec![0]);
	assert_eq!(block(&new_pm, 4).borrow().prev_ids(), vec![1]);
	assert_eq!(
		block(&new_pm, 2).borrow().phi_instrs[0].to_string(),
		"%3 = phi i32 [%4, %B2], [%2, %B4]"
	);
	let text = new_pm.to_string();
	assert_eq!(irparser::parse(&text).unwrap().to_string(), text);
}

#[test]
fn instrumented_output_parses_back() {
	let tally = LoopTally::new();
	let (program, _) = run_new(MODULE_M, ProfilerConfig::default(), &tally);
	let text = program.to_string();
	let reparsed = irparser::parse(&text).unwrap();
	assert_eq!(reparsed.to_string(), text);
}

#[test]
fn tally_equals_loops_visited() {
	for n in [0, 1, 5] {
		let mut text = String::from("define void @f(i32 %0) {\nentry:\n  br label %B1\n");
		for i in 1..=n {
			text += &format!("B{}:\n  br i32 %0, label %B{}, label %B{}\n", i, i, i + 1);
		}
		text += &format!("B{}:\n  ret void\n}}\n", n + 1);

		let tally = LoopTally::new();
		let (program, ctx) = run_new(&text, ProfilerConfig::default(), &tally);
		assert_eq!(tally.get(), n);
		assert_eq!(ctx.slots.used() as usize, n);
		let len = program.get_global(STORAGE_VAR).unwrap().len();
		assert_eq!(len, n.max(1));
	}
}

#[test]
fn legacy_pulls_in_declarator() {
	let registry = PassRegistry::with_profiler_passes().unwrap();
	let mut pm = LegacyPassManager::new(&registry);
	pm.add("insert-timer").unwrap();
	assert_eq!(pm.schedule_order(), vec!["insert-str", "insert-timer"]);

	let mut program = irparser::parse(MODULE_M).unwrap();
	let tally = LoopTally::new();
	let mut ctx = ProfileContext::for_module(&tally, ProfilerConfig::default());
	assert!(pm.run(&mut program, &mut ctx).unwrap());
	assert!(program.get_decl(CLOCK_FUNC).is_some());
	assert_eq!(ctx.slots.used(), 2);
	// nothing counted, no report requested
	assert_eq!(tally.get(), 0);
	assert_eq!(calls_to(&block(&program, 5), REPORT_FUNC), 0);
}

#[test]
fn storage_grows_for_late_loops() {
	let mut program = irparser::parse(MODULE_M).unwrap();
	// storage left behind by an earlier run that saw a single loop
	program
		.global_vars
		.push(GlobalVar::zeroed_array(STORAGE_VAR, 1, 64));
	let tally = LoopTally::new();
	let mut ctx = ProfileContext::for_module(&tally, ProfilerConfig::default());
	PassBuilder::profiling_pipeline(&ctx.config)
		.run(&mut program, &mut ctx)
		.unwrap();
	assert_eq!(program.global_vars.len(), 1);
	assert_eq!(program.get_global(STORAGE_VAR).unwrap().len(), 2);
	assert_eq!(ctx.instrumentation.unwrap().len, 2);
}

#[test]
fn custom_symbols() {
	let config = ProfilerConfig {
		report_fn: "dump".to_string(),
		clock_fn: "rdtsc".to_string(),
		storage: "cycles".to_string(),
		..Default::default()
	};
	let tally = LoopTally::new();
	let (program, _) = run_new(MODULE_M, config, &tally);
	let text = program.to_string();
	assert!(text.starts_with("declare void @dump(i64*, i32, ...)\ndeclare i64 @rdtsc()\n"));
	assert!(text.contains("@cycles = global [2 x i64] zeroinitializer"));
	assert!(text.contains("call void @dump(i64* @cycles, i32 2)"));
	assert!(!text.contains(CLOCK_FUNC));
}
