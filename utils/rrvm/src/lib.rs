use basicblock::Node;
use cfg::CFG;
use llvm::LlvmInstr;

pub mod basicblock;
pub mod cfg;
pub mod dominator;
pub mod func;
pub mod impls;
pub mod program;
pub mod rrvm_loop;

pub type LlvmCFG = CFG<LlvmInstr>;
pub type LlvmNode = Node<LlvmInstr>;
