use env_logger::{Builder, Env, Target};
use utils::LOG_ENV;

// `LOOPPROF_LOG=debug` and the like; warnings only by default
pub fn init() {
	Builder::from_env(Env::new().filter_or(LOG_ENV, "warn"))
		.target(Target::Stderr)
		.format_timestamp(None)
		.init();
}
