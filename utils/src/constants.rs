// Default names of the symbols the loop profiler adds to a module.
pub const REPORT_FUNC: &str = "__loopprof_report";
pub const CLOCK_FUNC: &str = "__loopprof_clock";
pub const STORAGE_VAR: &str = "__loopprof_elapsed";
pub const ENTRY_FUNC: &str = "main";

pub const MIN_PROFILE_SLOTS: usize = 1;
// Width in bits of one stored measurement.
pub const SLOT_BITS: u32 = 64;

pub const LOG_ENV: &str = "LOOPPROF_LOG";
