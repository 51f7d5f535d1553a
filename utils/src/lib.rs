pub mod constants;
pub mod errors;
pub mod global_var;
pub mod label;

pub use constants::*;
pub use errors::*;
pub use global_var::*;
pub use label::*;

use std::fmt::Display;

pub fn fatal_error(str: impl Display) {
	eprintln!("{}: {}", console::style("fatal error").bold().red(), str);
	std::process::exit(1);
}

pub fn warning(str: impl Display) {
	eprintln!("{}: {}", console::style("warning").bold().yellow(), str);
}
