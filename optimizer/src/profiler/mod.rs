mod context;
mod count_loops;
mod insert_report;
mod insert_str;
mod insert_timer;

pub use context::*;
pub use count_loops::CountLoops;
pub use insert_report::InsertReport;
pub use insert_str::{InsertStr, ModuleInstrumentation};
pub use insert_timer::InsertTimer;
