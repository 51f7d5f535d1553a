use optimizer::ProfilerConfig;
use utils::MIN_PROFILE_SLOTS;

use crate::cli::Args;

pub fn profiler_config(args: &Args) -> ProfilerConfig {
	ProfilerConfig {
		report_fn: args.report_fn.clone(),
		clock_fn: args.clock_fn.clone(),
		storage: args.storage.clone(),
		entry_fn: args.entry.clone(),
		min_slots: MIN_PROFILE_SLOTS,
		report_on_exit: !args.no_report,
	}
}
