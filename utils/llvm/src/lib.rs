pub mod llvminstr;
pub mod llvmop;
pub mod llvmvar;
pub mod temp;

mod impls;
mod utils_llvm;

pub use llvminstr::*;
pub use llvmop::*;
pub use llvmvar::*;
pub use temp::*;
pub use utils_llvm::*;

pub type LlvmTemp = Temp;
pub type LlvmTempManager = TempManager;
pub type LlvmInstr = Box<dyn LlvmInstrTrait>;

pub enum LlvmInstrVariant<'a> {
	ArithInstr(&'a ArithInstr),
	CompInstr(&'a CompInstr),
	JumpInstr(&'a JumpInstr),
	JumpCondInstr(&'a JumpCondInstr),
	PhiInstr(&'a PhiInstr),
	RetInstr(&'a RetInstr),
	AllocInstr(&'a AllocInstr),
	StoreInstr(&'a StoreInstr),
	LoadInstr(&'a LoadInstr),
	GEPInstr(&'a GEPInstr),
	CallInstr(&'a CallInstr),
}
