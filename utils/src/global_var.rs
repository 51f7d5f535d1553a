use std::fmt::Display;

pub use ValueItem::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueItem {
	Word(u64),
	Zero(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVar {
	pub ident: String,
	pub data: Vec<ValueItem>,
	// element width in bits
	pub bits: u32,
	pub is_array: bool,
}

impl ValueItem {
	// number of elements covered by this item
	fn len(&self) -> usize {
		match self {
			Word(_) => 1,
			Zero(v) => *v,
		}
	}
}

impl Display for GlobalVar {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		if !self.is_array {
			let value = match self.data.first() {
				Some(Word(v)) => *v,
				_ => 0,
			};
			return write!(f, "@{} = global i{} {}", self.ident, self.bits, value);
		}
		let ty = format!("[{} x i{}]", self.len(), self.bits);
		if self.is_bss() {
			return write!(f, "@{} = global {} zeroinitializer", self.ident, ty);
		}
		let items = self
			.data
			.iter()
			.flat_map(|v| match v {
				Word(w) => vec![*w],
				Zero(n) => vec![0; *n],
			})
			.map(|v| format!("i{} {}", self.bits, v))
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "@{} = global {} [{}]", self.ident, ty, items)
	}
}

impl GlobalVar {
	pub fn new(
		ident: impl Display,
		data: Vec<ValueItem>,
		bits: u32,
		is_array: bool,
	) -> Self {
		Self {
			ident: ident.to_string(),
			data,
			bits,
			is_array,
		}
	}
	pub fn zeroed_array(ident: impl Display, len: usize, bits: u32) -> Self {
		Self::new(ident, vec![Zero(len)], bits, true)
	}
	// element count
	pub fn len(&self) -> usize {
		self.data.iter().map(|v| v.len()).sum()
	}
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
	pub fn is_bss(&self) -> bool {
		self.data.iter().all(|v| matches!(v, Zero(_)))
	}
	/// Pads the array with zeros until it holds at least `len` elements.
	pub fn grow_to(&mut self, len: usize) -> bool {
		let cur = self.len();
		if cur >= len {
			return false;
		}
		match self.data.last_mut() {
			Some(Zero(v)) => *v += len - cur,
			_ => self.data.push(Zero(len - cur)),
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zeroed_array_display() {
		let var = GlobalVar::zeroed_array("__loopprof_elapsed", 3, 64);
		assert_eq!(
			var.to_string(),
			"@__loopprof_elapsed = global [3 x i64] zeroinitializer"
		);
		assert!(var.is_bss());
	}

	#[test]
	fn grow_keeps_contents() {
		let mut var = GlobalVar::new("g", vec![Word(5)], 64, true);
		assert!(var.grow_to(3));
		assert!(!var.grow_to(2));
		assert_eq!(var.len(), 3);
		assert_eq!(var.to_string(), "@g = global [3 x i64] [i64 5, i64 0, i64 0]");
	}
}
