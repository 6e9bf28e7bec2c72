use crate::list::{InstructionHandle, Targeter};
use crate::opcode::Opcode;

/// Everything that can go wrong building, editing, encoding or decoding
/// instruction sequences
///
/// All variants except `Io` are expected, recoverable conditions with a
/// defined retry path (fix the literal, redirect the targeter, supply more
/// bytes). Catalog defects are not represented here: querying a type table
/// with an opcode outside its family's domain is a bug and panics.
#[derive(Debug)]
pub enum Error {
    /// A range-restricted instruction was built with a literal outside its
    /// declared domain (eg. `iconst` outside `-1..=5`)
    OutOfDomain {
        constructor: &'static str,
        value: String,
    },

    /// Byte stream ended before the opcode's declared operand width was read
    Decode { opcode: Opcode, expected: usize },

    /// Byte is not a defined opcode, or is defined but not modelled
    /// (`invokedynamic`, switches)
    UnsupportedOpcode(u8),

    /// Operand bytes were present but carry a value the opcode does not admit
    /// (eg. a `newarray` element code outside 4..=11)
    BadOperand { opcode: Opcode, value: i64 },

    /// A decoded branch displacement does not land on an instruction boundary
    BadBranchDisplacement {
        opcode: Opcode,
        displacement: i32,
    },

    /// Remove was attempted on a handle other elements still reference; the
    /// sequence is unchanged and the full targeter list is reported
    TargetStillReferenced {
        handle: InstructionHandle,
        targeters: Vec<Targeter>,
    },

    /// The targeter is not currently registered on the handle it claims to
    /// reference
    NotATargeter {
        targeter: Targeter,
        handle: InstructionHandle,
    },

    /// A branch or external marker references a handle that is not a live
    /// member of this sequence
    UnresolvedTarget { target: InstructionHandle },

    /// Handle belongs to another sequence, or was already removed
    InvalidHandle(InstructionHandle),

    /// Byte offsets were requested after an insert/remove invalidated them;
    /// rerun linearize first
    StaleOffsets,

    /// Resolved displacement does not fit the branch's fixed operand width
    /// (narrow forms are never silently widened)
    BranchOffsetOverflow {
        opcode: Opcode,
        displacement: isize,
    },

    Io(std::io::Error),
}
