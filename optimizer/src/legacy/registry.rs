use log::trace;
use utils::{LoopprofError, Result};

use super::{
	CountLoopsLegacy, InsertReportLegacy, InsertStrLegacy, InsertTimerLegacy,
	LegacyPass, PassId, PassKind,
};

/// How to describe and build a pass that is known by id.
#[derive(Clone)]
pub struct PassInfo {
	pub name: PassId,
	pub description: &'static str,
	pub kind: PassKind,
	pub ctor: fn() -> LegacyPass,
}

/// Every pass the legacy manager can schedule, in registration order.
#[derive(Default)]
pub struct PassRegistry {
	passes: Vec<PassInfo>,
}

impl PassRegistry {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn with_profiler_passes() -> Result<Self> {
		let mut registry = Self::new();
		registry.register(CountLoopsLegacy::info())?;
		registry.register(InsertStrLegacy::info())?;
		registry.register(InsertTimerLegacy::info())?;
		registry.register(InsertReportLegacy::info())?;
		Ok(registry)
	}
	pub fn register(&mut self, info: PassInfo) -> Result<()> {
		if self.get(info.name).is_some() {
			return Err(LoopprofError::DuplicatePass(info.name.to_string()));
		}
		trace!("register {} pass {}", info.kind, info.name);
		self.passes.push(info);
		Ok(())
	}
	pub fn get(&self, id: &str) -> Option<&PassInfo> {
		self.passes.iter().find(|v| v.name == id)
	}
	pub fn iter(&self) -> impl Iterator<Item = &PassInfo> {
		self.passes.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn profiler_passes_are_registered() {
		let registry = PassRegistry::with_profiler_passes().unwrap();
		let names: Vec<_> = registry.iter().map(|v| v.name).collect();
		assert_eq!(
			names,
			vec!["count-loops", "insert-str", "insert-timer", "insert-report"]
		);
		let timer = registry.get("insert-timer").unwrap();
		assert_eq!(timer.kind, PassKind::Loop);
		let pass = (timer.ctor)();
		assert_eq!(pass.pass_id(), "insert-timer");
		assert_eq!(pass.kind(), PassKind::Loop);
		assert_eq!(pass.analysis_usage().required(), &["insert-str"]);
	}

	#[test]
	fn duplicate_registration() {
		let mut registry = PassRegistry::with_profiler_passes().unwrap();
		assert!(matches!(
			registry.register(InsertStrLegacy::info()),
			Err(LoopprofError::DuplicatePass(ref id)) if id == "insert-str"
		));
	}
}
