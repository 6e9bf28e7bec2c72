//! Model, codec, and editing support for JVM bytecode instruction sequences
//!
//! The three layers, from the bottom up:
//!
//!   - [`Opcode`] and the catalog behind it: one byte per opcode, a mnemonic,
//!     and a declared operand width
//!
//!   - [`Instruction`]: a closed tagged union of instruction families, with
//!     checked constructors for range-restricted literals, derived
//!     [`Capabilities`], stack effect and thrown-error queries, and an exact
//!     big-endian binary codec
//!
//!   - [`InstructionList`]: an editable sequence addressed through stable
//!     [`InstructionHandle`]s, where branches target instructions (not
//!     offsets) and removal of a targeted instruction is refused until every
//!     [`Targeter`] has been redirected
//!
//! ```
//! use bytegen::{
//!     ArithOp, BranchOp, CpIndex, FieldOp, IfCond, Instruction, InstructionList, PushOp,
//!     ReturnOp,
//! };
//!
//! # fn main() -> Result<(), bytegen::Error> {
//! // getstatic #5 / iconst_3 / idiv / ifne <back to the getstatic> / return
//! let mut code = InstructionList::new();
//! let load = code.append(Instruction::Field(FieldOp::GetStatic, CpIndex(5)))?;
//! code.append(Instruction::Push(PushOp::iconst(3)?))?;
//! code.append(Instruction::Arith(ArithOp::IDiv))?;
//! code.append(Instruction::Branch(BranchOp::If(IfCond::Ne), load))?;
//! code.append(Instruction::Return(ReturnOp::Return))?;
//!
//! let mut bytes = vec![];
//! code.encode(&mut bytes)?;
//! assert_eq!(bytes, [0xb2, 0x00, 0x05, 0x06, 0x6c, 0x9a, 0xff, 0xfb, 0xb1]);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod encoding;
pub mod errors;
pub mod exceptions;
pub mod instruction;
pub mod list;
pub mod opcode;
pub mod types;
pub mod util;
pub mod visitor;

pub use encoding::Serialize;
pub use errors::Error;
pub use exceptions::ExceptionKind;
pub use instruction::{
    AllocOp, ArithOp, ArrayKind, ArrayOp, BranchOp, Capabilities, CastOp, CmpOp, ConstLoad,
    ConvertOp, EqCond, FieldOp, IfCond, Instruction, LocalKind, LocalOp, MonitorOp, PushOp,
    ReturnOp, StackOp,
};
pub use list::{InstructionHandle, InstructionList, Targeter};
pub use opcode::{Opcode, OperandBytes};
pub use types::{ConstantPool, CpIndex, ElementType, Type};
pub use util::{Offset, Width};
pub use visitor::Visitor;
