mod parser;

pub use parser::parse;
