use loopprof_derive::LowerDisplay;

#[derive(LowerDisplay, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarType {
	I32,
	I64,
	F32,
	#[style("i32*")]
	I32Ptr,
	#[style("i64*")]
	I64Ptr,
	#[style("f32*")]
	F32Ptr,
	Void,
}

impl VarType {
	pub fn to_ptr(self) -> VarType {
		match self {
			Self::I32 => Self::I32Ptr,
			Self::I64 => Self::I64Ptr,
			Self::F32 => Self::F32Ptr,
			_ => self,
		}
	}
}
