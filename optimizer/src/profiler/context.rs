use std::{
	ops::{BitOr, BitOrAssign},
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
};

use utils::{CLOCK_FUNC, ENTRY_FUNC, MIN_PROFILE_SLOTS, REPORT_FUNC, STORAGE_VAR};

use super::ModuleInstrumentation;

/// Number of loops visited during the whole run. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct LoopTally(Arc<AtomicUsize>);

impl LoopTally {
	pub fn new() -> Self {
		Self::default()
	}
	// returns the new count
	pub fn increment(&self) -> usize {
		self.0.fetch_add(1, Ordering::Relaxed) + 1
	}
	pub fn get(&self) -> usize {
		self.0.load(Ordering::Relaxed)
	}
}

/// Hands out instrumentation slots of one module, starting at 0.
#[derive(Debug, Default)]
pub struct SlotCounter {
	next: u32,
}

impl SlotCounter {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn take(&mut self) -> u32 {
		let slot = self.next;
		self.next += 1;
		slot
	}
	// number of slots handed out so far
	pub fn used(&self) -> u32 {
		self.next
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassResult {
	NoChange,
	Changed,
}

impl PassResult {
	pub fn is_changed(self) -> bool {
		self == PassResult::Changed
	}
}

impl From<bool> for PassResult {
	fn from(changed: bool) -> Self {
		if changed {
			PassResult::Changed
		} else {
			PassResult::NoChange
		}
	}
}

impl From<PassResult> for bool {
	fn from(result: PassResult) -> Self {
		result.is_changed()
	}
}

impl BitOr for PassResult {
	type Output = PassResult;
	fn bitor(self, rhs: Self) -> Self::Output {
		(self.is_changed() || rhs.is_changed()).into()
	}
}

impl BitOrAssign for PassResult {
	fn bitor_assign(&mut self, rhs: Self) {
		*self = *self | rhs;
	}
}

/// Symbol names and knobs of the instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
	pub report_fn: String,
	pub clock_fn: String,
	pub storage: String,
	// function whose returns get the report call
	pub entry_fn: String,
	pub min_slots: usize,
	pub report_on_exit: bool,
}

impl Default for ProfilerConfig {
	fn default() -> Self {
		Self {
			report_fn: REPORT_FUNC.to_string(),
			clock_fn: CLOCK_FUNC.to_string(),
			storage: STORAGE_VAR.to_string(),
			entry_fn: ENTRY_FUNC.to_string(),
			min_slots: MIN_PROFILE_SLOTS,
			report_on_exit: true,
		}
	}
}

/// State threaded through every profiler pass run on one module.
#[derive(Debug)]
pub struct ProfileContext {
	pub tally: LoopTally,
	pub slots: SlotCounter,
	// set once the declarator has run on the module
	pub instrumentation: Option<ModuleInstrumentation>,
	pub config: ProfilerConfig,
}

impl ProfileContext {
	pub fn for_module(tally: &LoopTally, config: ProfilerConfig) -> Self {
		Self {
			tally: tally.clone(),
			slots: SlotCounter::new(),
			instrumentation: None,
			config,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tally_is_shared() {
		let tally = LoopTally::new();
		let first = ProfileContext::for_module(&tally, ProfilerConfig::default());
		let second = ProfileContext::for_module(&tally, ProfilerConfig::default());
		first.tally.increment();
		assert_eq!(second.tally.increment(), 2);
		assert_eq!(tally.get(), 2);
		assert_eq!(second.slots.used(), 0);
	}

	#[test]
	fn tally_counts_across_threads() {
		let tally = LoopTally::new();
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let tally = tally.clone();
				std::thread::spawn(move || {
					for _ in 0..100 {
						tally.increment();
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}
		assert_eq!(tally.get(), 400);
	}

	#[test]
	fn slots_are_monotonic() {
		let mut slots = SlotCounter::new();
		assert_eq!(slots.take(), 0);
		assert_eq!(slots.take(), 1);
		assert_eq!(slots.take(), 2);
		assert_eq!(slots.used(), 3);
	}

	#[test]
	fn pass_result_combines() {
		use PassResult::*;
		assert_eq!(NoChange | NoChange, NoChange);
		assert_eq!(NoChange | Changed, Changed);
		let mut result = NoChange;
		result |= true.into();
		assert!(bool::from(result));
	}
}
