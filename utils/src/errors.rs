use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoopprofError {
	#[error("ir syntax error: {0}")]
	IrSyntaxError(String),
	#[error("system error: {0}")]
	SystemError(String),
	#[error("unknown pass '{0}'")]
	UnknownPass(String),
	#[error("pass '{0}' is already registered")]
	DuplicatePass(String),
	#[error("pass dependency cycle through '{0}'")]
	DependencyCycle(String),
	#[error("pass '{pass}' requires '{required}' to be scheduled before it")]
	Unscheduled { pass: String, required: String },
}

pub type Result<T, E = LoopprofError> = std::result::Result<T, E>;

pub fn map_sys_err(e: std::io::Error) -> LoopprofError {
	LoopprofError::SystemError(e.to_string())
}
