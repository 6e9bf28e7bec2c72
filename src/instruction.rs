//! This module contains the AST of JVM bytecode instructions. The
//! representation is slightly different from the usual presentation to make it
//! more convenient to construct and edit bytecode:
//!
//!   - The `wide` instruction doesn't show up at all, but instead gets merged
//!     into the instructions it is allowed to modify
//!
//!   - Short forms (`iload_0`, `iconst_3`, ...) are folded into one canonical
//!     variant with a field; the codec picks the most compact encoding
//!
//!   - Deliberately wide forms (`ldc_w`, `goto_w`, `jsr_w`) stay distinct
//!     values: the codec never silently widens an instruction, it fails when a
//!     narrow form's operand no longer fits
//!
//! Each instruction family also carries a statically derived capability set
//! (see [`Capabilities`]), which is what external analyses should dispatch on.

use crate::exceptions::{self, ExceptionKind};
use crate::opcode::Opcode;
use crate::types::{ConstantPool, CpIndex, ElementType, Type};
use crate::util::Width;
use crate::Error;
use bitflags::bitflags;
use std::ops::Not;

bitflags! {
    /// Behavioral facets an instruction possesses, independent of its concrete
    /// family
    ///
    /// Membership is a pure function of the family tag (the opcode), never of
    /// operand values. Analyses written against these bits keep working when
    /// new families are added to the catalog.
    pub struct Capabilities: u16 {
        /// Pushes at least one value onto the operand stack
        const STACK_PRODUCER = 1 << 0;
        /// Pops at least one value off the operand stack
        const STACK_CONSUMER = 1 << 1;
        /// Can raise a runtime or linking error kind
        const EXCEPTION_THROWER = 1 << 2;
        /// Has a derivable produced/consumed value type
        const TYPED = 1 << 3;
        /// Pushes a literal constant (equality compares the literal)
        const CONSTANT_PUSH = 1 << 4;
        /// Carries a constant pool index (equality compares the index)
        const INDEXED = 1 << 5;
        /// Reads or writes a local variable slot
        const LOCAL_VARIABLE = 1 << 6;
        /// Allocates an object or array
        const ALLOCATION = 1 << 7;
        /// May trigger loading of a referenced class
        const LOAD_CLASS = 1 << 8;
        /// Transfers control to a target instruction
        const BRANCH = 1 << 9;
    }
}

/// Constant push instruction: literal encoded in the opcode choice or in an
/// immediate operand
///
/// The range-restricted forms must be built through the checked constructors
/// ([`PushOp::iconst`] and friends); hand-building a variant with a literal
/// outside its domain is a programmer error and trips an internal consistency
/// panic during opcode derivation, never a silent mis-encode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PushOp {
    AConstNull,
    /// `iconst_m1`..`iconst_5`: literal in `-1..=5`
    IConst(i32),
    /// `lconst_0`/`lconst_1`: literal in `{0, 1}`
    LConst(i64),
    /// `fconst_0`..`fconst_2`: literal in `{0.0, 1.0, 2.0}`
    FConst(f32),
    /// `dconst_0`/`dconst_1`: literal in `{0.0, 1.0}`
    DConst(f64),
    BiPush(i8),
    SiPush(i16),
}

impl PushOp {
    pub fn iconst(value: i32) -> Result<PushOp, Error> {
        match value {
            -1..=5 => Ok(PushOp::IConst(value)),
            _ => Err(Error::OutOfDomain {
                constructor: "iconst",
                value: value.to_string(),
            }),
        }
    }

    pub fn lconst(value: i64) -> Result<PushOp, Error> {
        match value {
            0 | 1 => Ok(PushOp::LConst(value)),
            _ => Err(Error::OutOfDomain {
                constructor: "lconst",
                value: value.to_string(),
            }),
        }
    }

    pub fn fconst(value: f32) -> Result<PushOp, Error> {
        if value == 0.0 || value == 1.0 || value == 2.0 {
            Ok(PushOp::FConst(value))
        } else {
            Err(Error::OutOfDomain {
                constructor: "fconst",
                value: value.to_string(),
            })
        }
    }

    pub fn dconst(value: f64) -> Result<PushOp, Error> {
        if value == 0.0 || value == 1.0 {
            Ok(PushOp::DConst(value))
        } else {
            Err(Error::OutOfDomain {
                constructor: "dconst",
                value: value.to_string(),
            })
        }
    }

    pub fn opcode(self) -> Opcode {
        let byte = match self {
            PushOp::AConstNull => 0x01,
            PushOp::IConst(v @ -1..=5) => (0x03 + v) as u8,
            PushOp::IConst(v) => unreachable!("iconst literal {} out of domain", v),
            PushOp::LConst(0) => 0x09,
            PushOp::LConst(1) => 0x0a,
            PushOp::LConst(v) => unreachable!("lconst literal {} out of domain", v),
            PushOp::FConst(v) if v == 0.0 => 0x0b,
            PushOp::FConst(v) if v == 1.0 => 0x0c,
            PushOp::FConst(v) if v == 2.0 => 0x0d,
            PushOp::FConst(v) => unreachable!("fconst literal {} out of domain", v),
            PushOp::DConst(v) if v == 0.0 => 0x0e,
            PushOp::DConst(v) if v == 1.0 => 0x0f,
            PushOp::DConst(v) => unreachable!("dconst literal {} out of domain", v),
            PushOp::BiPush(_) => 0x10,
            PushOp::SiPush(_) => 0x11,
        };
        Opcode::new(byte)
    }

    pub fn produced_type(self) -> Type {
        match self {
            PushOp::AConstNull => Type::Reference,
            PushOp::IConst(_) | PushOp::BiPush(_) | PushOp::SiPush(_) => Type::Int,
            PushOp::LConst(_) => Type::Long,
            PushOp::FConst(_) => Type::Float,
            PushOp::DConst(_) => Type::Double,
        }
    }
}

/// Constant pool load: narrow vs. wide is chosen explicitly at construction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstLoad {
    /// `ldc`: 8-bit pool index
    Ldc(u8),
    /// `ldc_w`: 16-bit pool index
    LdcW(CpIndex),
    /// `ldc2_w`: 16-bit pool index of a long/double constant (always wide)
    Ldc2W(CpIndex),
}

impl ConstLoad {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            ConstLoad::Ldc(_) => 0x12,
            ConstLoad::LdcW(_) => 0x13,
            ConstLoad::Ldc2W(_) => 0x14,
        })
    }

    pub fn index(self) -> CpIndex {
        match self {
            ConstLoad::Ldc(idx) => CpIndex(idx as u16),
            ConstLoad::LdcW(idx) | ConstLoad::Ldc2W(idx) => idx,
        }
    }
}

/// Local variable slot kind, in opcode table order
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalKind {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

impl LocalKind {
    pub(crate) fn table_index(self) -> u8 {
        match self {
            LocalKind::Int => 0,
            LocalKind::Long => 1,
            LocalKind::Float => 2,
            LocalKind::Double => 3,
            LocalKind::Reference => 4,
        }
    }

    pub(crate) fn from_table_index(index: u8) -> Option<LocalKind> {
        match index {
            0 => Some(LocalKind::Int),
            1 => Some(LocalKind::Long),
            2 => Some(LocalKind::Float),
            3 => Some(LocalKind::Double),
            4 => Some(LocalKind::Reference),
            _ => None,
        }
    }

    pub fn ty(self) -> Type {
        match self {
            LocalKind::Int => Type::Int,
            LocalKind::Long => Type::Long,
            LocalKind::Float => Type::Float,
            LocalKind::Double => Type::Double,
            LocalKind::Reference => Type::Reference,
        }
    }
}

/// Local variable access
///
/// One variant covers the short forms (`iload_0`..), the one-byte-index form
/// and the `wide` form; the codec picks the most compact encoding for the
/// index, exactly like a class file writer would.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocalOp {
    Load(LocalKind, u16),
    Store(LocalKind, u16),
    IInc { index: u16, delta: i16 },
    /// Return from subroutine (`jsr` counterpart)
    Ret(u16),
}

impl LocalOp {
    /// Canonical (non-short, non-wide) opcode
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            LocalOp::Load(kind, _) => 0x15 + kind.table_index(),
            LocalOp::Store(kind, _) => 0x36 + kind.table_index(),
            LocalOp::IInc { .. } => 0x84,
            LocalOp::Ret(_) => 0xa9,
        })
    }

    pub fn index(self) -> u16 {
        match self {
            LocalOp::Load(_, idx) | LocalOp::Store(_, idx) | LocalOp::Ret(idx) => idx,
            LocalOp::IInc { index, .. } => index,
        }
    }
}

macro_rules! contiguous_op_enum {
    (
        $(#[$meta:meta])*
        $name:ident starting at $base:literal { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub(crate) const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn opcode(self) -> Opcode {
                Opcode::new($base + self as u8)
            }

            pub(crate) fn from_byte(byte: u8) -> Option<$name> {
                byte.checked_sub($base)
                    .and_then(|rel| $name::ALL.get(rel as usize))
                    .copied()
            }
        }
    };
}

contiguous_op_enum! {
    /// Arithmetic and logic family (`iadd`..`lxor`, opcodes 0x60..=0x83)
    ArithOp starting at 0x60 {
        IAdd, LAdd, FAdd, DAdd,
        ISub, LSub, FSub, DSub,
        IMul, LMul, FMul, DMul,
        IDiv, LDiv, FDiv, DDiv,
        IRem, LRem, FRem, DRem,
        INeg, LNeg, FNeg, DNeg,
        IShl, LShl, IShr, LShr, IUShr, LUShr,
        IAnd, LAnd, IOr, LOr, IXor, LXor,
    }
}

impl ArithOp {
    /// Type of the value this operation leaves on the stack
    pub fn result_type(self) -> Type {
        use ArithOp::*;
        match self {
            IAdd | ISub | IMul | IDiv | IRem | INeg | IShl | IShr | IUShr | IAnd | IOr
            | IXor => Type::Int,
            LAdd | LSub | LMul | LDiv | LRem | LNeg | LShl | LShr | LUShr | LAnd | LOr
            | LXor => Type::Long,
            FAdd | FSub | FMul | FDiv | FRem | FNeg => Type::Float,
            DAdd | DSub | DMul | DDiv | DRem | DNeg => Type::Double,
        }
    }

    fn consumed_slots(self) -> usize {
        use ArithOp::*;
        match self {
            INeg | FNeg => 1,
            LNeg | DNeg => 2,
            // long value shifted by an int amount
            LShl | LShr | LUShr => 3,
            IAdd | ISub | IMul | IDiv | IRem | FAdd | FSub | FMul | FDiv | FRem | IShl
            | IShr | IUShr | IAnd | IOr | IXor => 2,
            LAdd | LSub | LMul | LDiv | LRem | DAdd | DSub | DMul | DDiv | DRem | LAnd
            | LOr | LXor => 4,
        }
    }

    fn is_integer_division(self) -> bool {
        matches!(
            self,
            ArithOp::IDiv | ArithOp::LDiv | ArithOp::IRem | ArithOp::LRem
        )
    }
}

contiguous_op_enum! {
    /// Numeric conversion family (`i2l`..`i2s`, opcodes 0x85..=0x93)
    ConvertOp starting at 0x85 {
        I2L, I2F, I2D,
        L2I, L2F, L2D,
        F2I, F2L, F2D,
        D2I, D2L, D2F,
        I2B, I2C, I2S,
    }
}

impl ConvertOp {
    /// Exhaustive opcode-to-produced-type table for the conversion family
    pub fn produced_type(self) -> Type {
        use ConvertOp::*;
        match self {
            L2I | F2I | D2I => Type::Int,
            I2L | F2L | D2L => Type::Long,
            I2F | L2F | D2F => Type::Float,
            I2D | L2D | F2D => Type::Double,
            I2B => Type::Byte,
            I2C => Type::Char,
            I2S => Type::Short,
        }
    }

    pub fn consumed_type(self) -> Type {
        use ConvertOp::*;
        match self {
            I2L | I2F | I2D | I2B | I2C | I2S => Type::Int,
            L2I | L2F | L2D => Type::Long,
            F2I | F2L | F2D => Type::Float,
            D2I | D2L | D2F => Type::Double,
        }
    }
}

contiguous_op_enum! {
    /// Untyped operand stack manipulation (`pop`..`swap`, opcodes 0x57..=0x5F)
    StackOp starting at 0x57 {
        Pop, Pop2, Dup, DupX1, DupX2, Dup2, Dup2X1, Dup2X2, Swap,
    }
}

impl StackOp {
    fn stack_effect(self) -> (usize, usize) {
        match self {
            StackOp::Pop => (1, 0),
            StackOp::Pop2 => (2, 0),
            StackOp::Dup => (1, 2),
            StackOp::DupX1 => (2, 3),
            StackOp::DupX2 => (3, 4),
            StackOp::Dup2 => (2, 4),
            StackOp::Dup2X1 => (3, 5),
            StackOp::Dup2X2 => (4, 6),
            StackOp::Swap => (2, 2),
        }
    }
}

contiguous_op_enum! {
    /// Long and floating point comparison family (`lcmp`..`dcmpg`, opcodes
    /// 0x94..=0x98)
    CmpOp starting at 0x94 {
        LCmp, FCmpL, FCmpG, DCmpL, DCmpG,
    }
}

impl CmpOp {
    fn consumed_slots(self) -> usize {
        match self {
            CmpOp::LCmp | CmpOp::DCmpL | CmpOp::DCmpG => 4,
            CmpOp::FCmpL | CmpOp::FCmpG => 2,
        }
    }
}

/// Array element kind, in opcode table order
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Int,
    Long,
    Float,
    Double,
    Reference,
    Byte,
    Char,
    Short,
}

impl ArrayKind {
    fn table_index(self) -> u8 {
        match self {
            ArrayKind::Int => 0,
            ArrayKind::Long => 1,
            ArrayKind::Float => 2,
            ArrayKind::Double => 3,
            ArrayKind::Reference => 4,
            ArrayKind::Byte => 5,
            ArrayKind::Char => 6,
            ArrayKind::Short => 7,
        }
    }

    pub(crate) fn from_table_index(index: u8) -> Option<ArrayKind> {
        match index {
            0 => Some(ArrayKind::Int),
            1 => Some(ArrayKind::Long),
            2 => Some(ArrayKind::Float),
            3 => Some(ArrayKind::Double),
            4 => Some(ArrayKind::Reference),
            5 => Some(ArrayKind::Byte),
            6 => Some(ArrayKind::Char),
            7 => Some(ArrayKind::Short),
            _ => None,
        }
    }

    pub fn ty(self) -> Type {
        match self {
            ArrayKind::Int => Type::Int,
            ArrayKind::Long => Type::Long,
            ArrayKind::Float => Type::Float,
            ArrayKind::Double => Type::Double,
            ArrayKind::Reference => Type::Reference,
            ArrayKind::Byte => Type::Byte,
            ArrayKind::Char => Type::Char,
            ArrayKind::Short => Type::Short,
        }
    }
}

/// Array element access family
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrayOp {
    Load(ArrayKind),
    Store(ArrayKind),
    Length,
}

impl ArrayOp {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            ArrayOp::Load(kind) => 0x2e + kind.table_index(),
            ArrayOp::Store(kind) => 0x4f + kind.table_index(),
            ArrayOp::Length => 0xbe,
        })
    }
}

/// Field access family (all carry a 16-bit pool index)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldOp {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

impl FieldOp {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            FieldOp::GetStatic => 0xb2,
            FieldOp::PutStatic => 0xb3,
            FieldOp::GetField => 0xb4,
            FieldOp::PutField => 0xb5,
        })
    }

    pub fn is_get(self) -> bool {
        matches!(self, FieldOp::GetStatic | FieldOp::GetField)
    }

    pub fn is_static(self) -> bool {
        matches!(self, FieldOp::GetStatic | FieldOp::PutStatic)
    }
}

/// Allocation family
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AllocOp {
    New(CpIndex),
    NewArray(ElementType),
    ANewArray(CpIndex),
    /// Built through [`AllocOp::multianewarray`]: dimension count is 1..=255
    MultiANewArray(CpIndex, u8),
}

impl AllocOp {
    pub fn multianewarray(index: CpIndex, dimensions: u8) -> Result<AllocOp, Error> {
        if dimensions == 0 {
            return Err(Error::OutOfDomain {
                constructor: "multianewarray",
                value: dimensions.to_string(),
            });
        }
        Ok(AllocOp::MultiANewArray(index, dimensions))
    }

    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            AllocOp::New(_) => 0xbb,
            AllocOp::NewArray(_) => 0xbc,
            AllocOp::ANewArray(_) => 0xbd,
            AllocOp::MultiANewArray(_, _) => 0xc5,
        })
    }
}

/// Type check family
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastOp {
    CheckCast,
    InstanceOf,
}

impl CastOp {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            CastOp::CheckCast => 0xc0,
            CastOp::InstanceOf => 0xc1,
        })
    }
}

contiguous_op_enum! {
    /// Method return family (`ireturn`..`return`, opcodes 0xAC..=0xB1)
    ReturnOp starting at 0xac {
        IReturn, LReturn, FReturn, DReturn, AReturn, Return,
    }
}

impl ReturnOp {
    /// Exhaustive opcode-to-returned-type table for the return family
    pub fn return_type(self) -> Type {
        match self {
            ReturnOp::IReturn => Type::Int,
            ReturnOp::LReturn => Type::Long,
            ReturnOp::FReturn => Type::Float,
            ReturnOp::DReturn => Type::Double,
            ReturnOp::AReturn => Type::Reference,
            ReturnOp::Return => Type::Void,
        }
    }
}

/// Monitor family
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MonitorOp {
    Enter,
    Exit,
}

impl MonitorOp {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            MonitorOp::Enter => 0xc2,
            MonitorOp::Exit => 0xc3,
        })
    }
}

/// Comparison operators available for single-value and int-pair branches
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IfCond {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl IfCond {
    fn table_index(self) -> u8 {
        match self {
            IfCond::Eq => 0,
            IfCond::Ne => 1,
            IfCond::Lt => 2,
            IfCond::Ge => 3,
            IfCond::Gt => 4,
            IfCond::Le => 5,
        }
    }

    pub(crate) fn from_table_index(index: u8) -> Option<IfCond> {
        match index {
            0 => Some(IfCond::Eq),
            1 => Some(IfCond::Ne),
            2 => Some(IfCond::Lt),
            3 => Some(IfCond::Ge),
            4 => Some(IfCond::Gt),
            5 => Some(IfCond::Le),
            _ => None,
        }
    }
}

impl Not for IfCond {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            IfCond::Eq => IfCond::Ne,
            IfCond::Ne => IfCond::Eq,
            IfCond::Lt => IfCond::Ge,
            IfCond::Ge => IfCond::Lt,
            IfCond::Gt => IfCond::Le,
            IfCond::Le => IfCond::Gt,
        }
    }
}

/// Equality/inequality comparison operators
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EqCond {
    Eq,
    Ne,
}

impl Not for EqCond {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            EqCond::Eq => EqCond::Ne,
            EqCond::Ne => EqCond::Eq,
        }
    }
}

/// Branch family, without its target (the target lives on the
/// [`Instruction::Branch`] variant so it can be represented differently in a
/// list vs. in decoded output)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BranchOp {
    /// `ifeq`..`ifle`: compare one int against zero
    If(IfCond),
    /// `if_icmpeq`..`if_icmple`: compare two ints
    IfICmp(IfCond),
    /// `if_acmpeq`/`if_acmpne`: compare two references
    IfACmp(EqCond),
    /// `ifnull`/`ifnonnull`
    IfNull(EqCond),
    Goto,
    Jsr,
    /// Wide `goto`: chosen at construction, never by the encoder
    GotoW,
    /// Wide `jsr`: chosen at construction, never by the encoder
    JsrW,
}

impl BranchOp {
    pub fn opcode(self) -> Opcode {
        Opcode::new(match self {
            BranchOp::If(cond) => 0x99 + cond.table_index(),
            BranchOp::IfICmp(cond) => 0x9f + cond.table_index(),
            BranchOp::IfACmp(EqCond::Eq) => 0xa5,
            BranchOp::IfACmp(EqCond::Ne) => 0xa6,
            BranchOp::Goto => 0xa7,
            BranchOp::Jsr => 0xa8,
            BranchOp::IfNull(EqCond::Eq) => 0xc6,
            BranchOp::IfNull(EqCond::Ne) => 0xc7,
            BranchOp::GotoW => 0xc8,
            BranchOp::JsrW => 0xc9,
        })
    }

    /// Invert the branch condition; `None` for unconditional forms
    ///
    /// Negation is an involution: `op.negate().and_then(BranchOp::negate)`
    /// gives back `op`.
    pub fn negate(self) -> Option<BranchOp> {
        match self {
            BranchOp::If(cond) => Some(BranchOp::If(!cond)),
            BranchOp::IfICmp(cond) => Some(BranchOp::IfICmp(!cond)),
            BranchOp::IfACmp(cond) => Some(BranchOp::IfACmp(!cond)),
            BranchOp::IfNull(cond) => Some(BranchOp::IfNull(!cond)),
            BranchOp::Goto | BranchOp::Jsr | BranchOp::GotoW | BranchOp::JsrW => None,
        }
    }

    pub fn is_conditional(self) -> bool {
        !matches!(
            self,
            BranchOp::Goto | BranchOp::Jsr | BranchOp::GotoW | BranchOp::JsrW
        )
    }

    /// Whether the displacement operand is 32-bit rather than 16-bit
    pub fn is_wide(self) -> bool {
        matches!(self, BranchOp::GotoW | BranchOp::JsrW)
    }
}

/// JVM bytecode instruction: a closed tagged union, one tag per family
///
/// The type parameter abstracts over the branch target representation:
/// instructions inside an [`InstructionList`] use
/// [`InstructionHandle`] targets, while the codec works with resolved signed
/// byte displacements (`Instruction<i32>`).
///
/// [`InstructionList`]: crate::InstructionList
/// [`InstructionHandle`]: crate::InstructionHandle
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction<Lbl> {
    Nop,
    Push(PushOp),
    LoadConst(ConstLoad),
    Local(LocalOp),
    Arith(ArithOp),
    Convert(ConvertOp),
    Stack(StackOp),
    Cmp(CmpOp),
    Array(ArrayOp),
    Field(FieldOp, CpIndex),
    Alloc(AllocOp),
    Cast(CastOp, CpIndex),
    Return(ReturnOp),
    Throw,
    Monitor(MonitorOp),
    Branch(BranchOp, Lbl),
}

impl<Lbl> Instruction<Lbl> {
    /// Canonical opcode of this instruction
    ///
    /// "Canonical" means the non-short, non-`wide` form: the codec may still
    /// emit `iload_2` or a `wide` prefix for a [`LocalOp`] depending on its
    /// index, but the family is identified by this opcode.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::new(0x00),
            Instruction::Push(op) => op.opcode(),
            Instruction::LoadConst(op) => op.opcode(),
            Instruction::Local(op) => op.opcode(),
            Instruction::Arith(op) => op.opcode(),
            Instruction::Convert(op) => op.opcode(),
            Instruction::Stack(op) => op.opcode(),
            Instruction::Cmp(op) => op.opcode(),
            Instruction::Array(op) => op.opcode(),
            Instruction::Field(op, _) => op.opcode(),
            Instruction::Alloc(op) => op.opcode(),
            Instruction::Cast(op, _) => op.opcode(),
            Instruction::Return(op) => op.opcode(),
            Instruction::Throw => Opcode::new(0xbf),
            Instruction::Monitor(op) => op.opcode(),
            Instruction::Branch(op, _) => op.opcode(),
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Capability set, derived entirely from the family tag
    pub fn capabilities(&self) -> Capabilities {
        use Capabilities as C;
        match self {
            Instruction::Nop => C::empty(),
            Instruction::Push(_) => C::STACK_PRODUCER | C::TYPED | C::CONSTANT_PUSH,
            Instruction::LoadConst(_) => {
                C::STACK_PRODUCER
                    | C::EXCEPTION_THROWER
                    | C::TYPED
                    | C::CONSTANT_PUSH
                    | C::INDEXED
                    | C::LOAD_CLASS
            }
            Instruction::Local(LocalOp::Load(_, _)) => {
                C::STACK_PRODUCER | C::TYPED | C::LOCAL_VARIABLE
            }
            Instruction::Local(LocalOp::Store(_, _)) => {
                C::STACK_CONSUMER | C::TYPED | C::LOCAL_VARIABLE
            }
            Instruction::Local(LocalOp::IInc { .. }) | Instruction::Local(LocalOp::Ret(_)) => {
                C::LOCAL_VARIABLE
            }
            Instruction::Arith(op) => {
                let base = C::STACK_PRODUCER | C::STACK_CONSUMER | C::TYPED;
                if op.is_integer_division() {
                    base | C::EXCEPTION_THROWER
                } else {
                    base
                }
            }
            Instruction::Convert(_) => C::STACK_PRODUCER | C::STACK_CONSUMER | C::TYPED,
            Instruction::Stack(StackOp::Pop) | Instruction::Stack(StackOp::Pop2) => {
                C::STACK_CONSUMER
            }
            Instruction::Stack(_) => C::STACK_PRODUCER | C::STACK_CONSUMER,
            Instruction::Cmp(_) => C::STACK_PRODUCER | C::STACK_CONSUMER | C::TYPED,
            Instruction::Array(ArrayOp::Load(_)) => {
                C::STACK_PRODUCER | C::STACK_CONSUMER | C::TYPED | C::EXCEPTION_THROWER
            }
            Instruction::Array(ArrayOp::Store(_)) => {
                C::STACK_CONSUMER | C::TYPED | C::EXCEPTION_THROWER
            }
            Instruction::Array(ArrayOp::Length) => {
                C::STACK_PRODUCER | C::STACK_CONSUMER | C::EXCEPTION_THROWER
            }
            Instruction::Field(op, _) => {
                let base = C::TYPED | C::INDEXED | C::EXCEPTION_THROWER | C::LOAD_CLASS;
                let stack = if op.is_get() {
                    if op.is_static() {
                        C::STACK_PRODUCER
                    } else {
                        C::STACK_PRODUCER | C::STACK_CONSUMER
                    }
                } else {
                    C::STACK_CONSUMER
                };
                base | stack
            }
            Instruction::Alloc(AllocOp::New(_)) => {
                C::STACK_PRODUCER
                    | C::TYPED
                    | C::ALLOCATION
                    | C::INDEXED
                    | C::EXCEPTION_THROWER
                    | C::LOAD_CLASS
            }
            Instruction::Alloc(AllocOp::NewArray(_)) => {
                C::STACK_PRODUCER
                    | C::STACK_CONSUMER
                    | C::TYPED
                    | C::ALLOCATION
                    | C::EXCEPTION_THROWER
            }
            Instruction::Alloc(AllocOp::ANewArray(_))
            | Instruction::Alloc(AllocOp::MultiANewArray(_, _)) => {
                C::STACK_PRODUCER
                    | C::STACK_CONSUMER
                    | C::TYPED
                    | C::ALLOCATION
                    | C::INDEXED
                    | C::EXCEPTION_THROWER
                    | C::LOAD_CLASS
            }
            Instruction::Cast(_, _) => {
                C::STACK_PRODUCER
                    | C::STACK_CONSUMER
                    | C::TYPED
                    | C::INDEXED
                    | C::EXCEPTION_THROWER
                    | C::LOAD_CLASS
            }
            Instruction::Return(ReturnOp::Return) => C::TYPED | C::EXCEPTION_THROWER,
            Instruction::Return(_) => C::STACK_CONSUMER | C::TYPED | C::EXCEPTION_THROWER,
            Instruction::Throw => C::STACK_CONSUMER | C::EXCEPTION_THROWER,
            Instruction::Monitor(_) => C::STACK_CONSUMER | C::EXCEPTION_THROWER,
            Instruction::Branch(op, _) => {
                if op.is_conditional() {
                    C::STACK_CONSUMER | C::BRANCH
                } else if matches!(op, BranchOp::Jsr | BranchOp::JsrW) {
                    C::STACK_PRODUCER | C::BRANCH
                } else {
                    C::BRANCH
                }
            }
        }
    }

    /// Ordered set of error kinds this instruction can raise
    pub fn thrown_exceptions(&self) -> &'static [ExceptionKind] {
        match self {
            Instruction::LoadConst(_) => &exceptions::CLASS_RESOLUTION,
            Instruction::Arith(op) if op.is_integer_division() => &exceptions::DIVISION,
            Instruction::Array(ArrayOp::Load(_)) => &exceptions::ARRAY_ACCESS,
            Instruction::Array(ArrayOp::Store(ArrayKind::Reference)) => &exceptions::ARRAY_STORE,
            Instruction::Array(ArrayOp::Store(_)) => &exceptions::ARRAY_ACCESS,
            Instruction::Array(ArrayOp::Length) => &exceptions::ARRAY_LENGTH,
            Instruction::Field(_, _) => &exceptions::FIELD_RESOLUTION,
            Instruction::Alloc(AllocOp::New(_)) => &exceptions::ALLOCATION,
            Instruction::Alloc(AllocOp::NewArray(_)) => &exceptions::ARRAY_ALLOCATION,
            Instruction::Alloc(_) => &exceptions::INDEXED_ARRAY_ALLOCATION,
            Instruction::Cast(CastOp::CheckCast, _) => &exceptions::CHECK_CAST,
            Instruction::Cast(CastOp::InstanceOf, _) => &exceptions::CLASS_RESOLUTION,
            Instruction::Return(_) => &exceptions::METHOD_RETURN,
            Instruction::Throw => &exceptions::THROW,
            Instruction::Monitor(MonitorOp::Enter) => &exceptions::MONITOR_ENTER,
            Instruction::Monitor(MonitorOp::Exit) => &exceptions::MONITOR_EXIT,
            _ => &exceptions::NONE,
        }
    }

    /// Type of the value this instruction leaves on top of the stack, if any
    ///
    /// Field and constant loads derive their type from the referenced pool
    /// entry; `None` is returned when the instruction produces nothing or the
    /// pool has no answer for the index.
    pub fn produced_type(&self, pool: &dyn ConstantPool) -> Option<Type> {
        match self {
            Instruction::Push(op) => Some(op.produced_type()),
            Instruction::LoadConst(op) => pool.entry_type(op.index()),
            Instruction::Local(LocalOp::Load(kind, _)) => Some(kind.ty()),
            Instruction::Arith(op) => Some(op.result_type()),
            Instruction::Convert(op) => Some(op.produced_type()),
            Instruction::Cmp(_) => Some(Type::Int),
            Instruction::Array(ArrayOp::Load(kind)) => Some(kind.ty()),
            Instruction::Array(ArrayOp::Length) => Some(Type::Int),
            Instruction::Field(op, index) if op.is_get() => pool.entry_type(*index),
            Instruction::Alloc(_) => Some(Type::Reference),
            Instruction::Cast(CastOp::CheckCast, _) => Some(Type::Reference),
            Instruction::Cast(CastOp::InstanceOf, _) => Some(Type::Int),
            Instruction::Branch(BranchOp::Jsr, _) | Instruction::Branch(BranchOp::JsrW, _) => {
                Some(Type::ReturnAddress)
            }
            _ => None,
        }
    }

    /// Stack slots this instruction pops; `None` when the answer needs a pool
    /// entry the pool cannot resolve
    pub fn consumed_slots(&self, pool: &dyn ConstantPool) -> Option<usize> {
        let field_slots = |index: &CpIndex| pool.entry_type(*index).map(Type::slots);
        Some(match self {
            Instruction::Nop | Instruction::Push(_) | Instruction::LoadConst(_) => 0,
            Instruction::Local(LocalOp::Load(_, _))
            | Instruction::Local(LocalOp::IInc { .. })
            | Instruction::Local(LocalOp::Ret(_)) => 0,
            Instruction::Local(LocalOp::Store(kind, _)) => kind.ty().slots(),
            Instruction::Arith(op) => op.consumed_slots(),
            Instruction::Convert(op) => op.consumed_type().slots(),
            Instruction::Stack(op) => op.stack_effect().0,
            Instruction::Cmp(op) => op.consumed_slots(),
            Instruction::Array(ArrayOp::Load(_)) => 2,
            Instruction::Array(ArrayOp::Store(kind)) => 2 + kind.ty().slots(),
            Instruction::Array(ArrayOp::Length) => 1,
            Instruction::Field(FieldOp::GetStatic, _) => 0,
            Instruction::Field(FieldOp::GetField, _) => 1,
            Instruction::Field(FieldOp::PutStatic, index) => field_slots(index)?,
            Instruction::Field(FieldOp::PutField, index) => 1 + field_slots(index)?,
            Instruction::Alloc(AllocOp::New(_)) => 0,
            Instruction::Alloc(AllocOp::NewArray(_)) | Instruction::Alloc(AllocOp::ANewArray(_)) => 1,
            Instruction::Alloc(AllocOp::MultiANewArray(_, dims)) => *dims as usize,
            Instruction::Cast(_, _) => 1,
            Instruction::Return(op) => op.return_type().slots(),
            Instruction::Throw => 1,
            Instruction::Monitor(_) => 1,
            Instruction::Branch(op, _) => match op {
                BranchOp::If(_) | BranchOp::IfNull(_) => 1,
                BranchOp::IfICmp(_) | BranchOp::IfACmp(_) => 2,
                BranchOp::Goto | BranchOp::GotoW | BranchOp::Jsr | BranchOp::JsrW => 0,
            },
        })
    }

    /// Stack slots this instruction pushes; `None` when the answer needs a
    /// pool entry the pool cannot resolve
    pub fn produced_slots(&self, pool: &dyn ConstantPool) -> Option<usize> {
        Some(match self {
            Instruction::Push(op) => op.produced_type().slots(),
            Instruction::LoadConst(ConstLoad::Ldc2W(_)) => 2,
            Instruction::LoadConst(_) => 1,
            Instruction::Local(LocalOp::Load(kind, _)) => kind.ty().slots(),
            Instruction::Arith(op) => op.result_type().slots(),
            Instruction::Convert(op) => op.produced_type().slots(),
            Instruction::Stack(op) => op.stack_effect().1,
            Instruction::Cmp(_) => 1,
            Instruction::Array(ArrayOp::Load(kind)) => kind.ty().slots(),
            Instruction::Array(ArrayOp::Length) => 1,
            Instruction::Field(op, index) if op.is_get() => {
                pool.entry_type(*index).map(Type::slots)?
            }
            Instruction::Alloc(_) => 1,
            Instruction::Cast(_, _) => 1,
            Instruction::Throw => 1,
            Instruction::Branch(BranchOp::Jsr, _) | Instruction::Branch(BranchOp::JsrW, _) => 1,
            _ => 0,
        })
    }

    /// Invert a conditional branch, keeping its target; `None` for everything
    /// else
    pub fn negate(&self) -> Option<Instruction<Lbl>>
    where
        Lbl: Clone,
    {
        match self {
            Instruction::Branch(op, target) => {
                Some(Instruction::Branch(op.negate()?, target.clone()))
            }
            _ => None,
        }
    }

    /// Value-level instruction comparison used for deduplication
    ///
    /// Two instructions are DEFAULT-equal iff they have the same opcode and,
    /// where applicable, the same pool index, literal, or element-type code.
    /// Branch instructions are never equal to one another (not even to
    /// themselves): list-editing code that merges "equal" instructions must
    /// never accidentally fuse two distinct jump sites.
    pub fn default_eq(&self, other: &Instruction<Lbl>) -> bool {
        use Instruction::*;
        match (self, other) {
            (Branch(_, _), _) | (_, Branch(_, _)) => false,
            (Nop, Nop) | (Throw, Throw) => true,
            (Push(a), Push(b)) => a == b,
            (LoadConst(a), LoadConst(b)) => a == b,
            (Local(a), Local(b)) => a == b,
            (Arith(a), Arith(b)) => a == b,
            (Convert(a), Convert(b)) => a == b,
            (Stack(a), Stack(b)) => a == b,
            (Cmp(a), Cmp(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Field(a, i), Field(b, j)) => a == b && i == j,
            (Alloc(a), Alloc(b)) => a == b,
            (Cast(a, i), Cast(b, j)) => a == b && i == j,
            (Return(a), Return(b)) => a == b,
            (Monitor(a), Monitor(b)) => a == b,
            _ => false,
        }
    }

    /// Rewrite the branch target representation, leaving everything else
    /// untouched
    pub fn map_target<Lbl2, E>(
        &self,
        map_target: impl FnOnce(&Lbl) -> Result<Lbl2, E>,
    ) -> Result<Instruction<Lbl2>, E> {
        use Instruction::*;
        Ok(match self {
            Nop => Nop,
            Push(op) => Push(*op),
            LoadConst(op) => LoadConst(*op),
            Local(op) => Local(*op),
            Arith(op) => Arith(*op),
            Convert(op) => Convert(*op),
            Stack(op) => Stack(*op),
            Cmp(op) => Cmp(*op),
            Array(op) => Array(*op),
            Field(op, index) => Field(*op, *index),
            Alloc(op) => Alloc(*op),
            Cast(op, index) => Cast(*op, *index),
            Return(op) => Return(*op),
            Throw => Throw,
            Monitor(op) => Monitor(*op),
            Branch(op, target) => Branch(*op, map_target(target)?),
        })
    }

    /// Branch target, if this instruction is a branch
    pub fn branch_target(&self) -> Option<&Lbl> {
        match self {
            Instruction::Branch(_, target) => Some(target),
            _ => None,
        }
    }
}

impl<Lbl> Width for Instruction<Lbl> {
    /// Encoded length in bytes, including the opcode byte (and the `wide`
    /// prefix where the operand forces it)
    fn width(&self) -> usize {
        match self {
            Instruction::Nop
            | Instruction::Push(PushOp::AConstNull)
            | Instruction::Push(PushOp::IConst(_))
            | Instruction::Push(PushOp::LConst(_))
            | Instruction::Push(PushOp::FConst(_))
            | Instruction::Push(PushOp::DConst(_))
            | Instruction::Arith(_)
            | Instruction::Convert(_)
            | Instruction::Stack(_)
            | Instruction::Cmp(_)
            | Instruction::Array(_)
            | Instruction::Return(_)
            | Instruction::Throw
            | Instruction::Monitor(_) => 1,

            Instruction::Push(PushOp::BiPush(_)) => 2,
            Instruction::Push(PushOp::SiPush(_)) => 3,

            Instruction::LoadConst(ConstLoad::Ldc(_)) => 2,
            Instruction::LoadConst(ConstLoad::LdcW(_))
            | Instruction::LoadConst(ConstLoad::Ldc2W(_)) => 3,

            Instruction::Local(LocalOp::Load(_, 0..=3))
            | Instruction::Local(LocalOp::Store(_, 0..=3)) => 1,
            Instruction::Local(LocalOp::Load(_, 4..=255))
            | Instruction::Local(LocalOp::Store(_, 4..=255)) => 2,
            Instruction::Local(LocalOp::Load(_, _)) | Instruction::Local(LocalOp::Store(_, _)) => 4,
            Instruction::Local(LocalOp::IInc { index: 0..=255, delta: -128..=127 }) => 3,
            Instruction::Local(LocalOp::IInc { .. }) => 6,
            Instruction::Local(LocalOp::Ret(0..=255)) => 2,
            Instruction::Local(LocalOp::Ret(_)) => 4,

            Instruction::Field(_, _) | Instruction::Cast(_, _) => 3,

            Instruction::Alloc(AllocOp::New(_)) | Instruction::Alloc(AllocOp::ANewArray(_)) => 3,
            Instruction::Alloc(AllocOp::NewArray(_)) => 2,
            Instruction::Alloc(AllocOp::MultiANewArray(_, _)) => 4,

            Instruction::Branch(op, _) => {
                if op.is_wide() {
                    5
                } else {
                    3
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Type;

    #[test]
    fn iconst_literal_domain() {
        for value in -1..=5 {
            let op = PushOp::iconst(value).unwrap();
            assert_eq!(op, PushOp::IConst(value));
        }
        assert!(matches!(
            PushOp::iconst(-2),
            Err(Error::OutOfDomain { constructor: "iconst", .. })
        ));
        assert!(matches!(
            PushOp::iconst(6),
            Err(Error::OutOfDomain { constructor: "iconst", .. })
        ));
    }

    #[test]
    fn wide_literal_domains() {
        assert!(PushOp::lconst(0).is_ok());
        assert!(PushOp::lconst(1).is_ok());
        assert!(PushOp::lconst(2).is_err());
        assert!(PushOp::dconst(0.0).is_ok());
        assert!(PushOp::dconst(1.0).is_ok());
        assert!(PushOp::dconst(0.5).is_err());
        assert!(PushOp::fconst(2.0).is_ok());
        assert!(PushOp::fconst(3.0).is_err());
    }

    #[test]
    fn push_opcode_choice_encodes_the_literal() {
        assert_eq!(PushOp::iconst(-1).unwrap().opcode().mnemonic(), "iconst_m1");
        assert_eq!(PushOp::iconst(3).unwrap().opcode().mnemonic(), "iconst_3");
        assert_eq!(PushOp::lconst(1).unwrap().opcode().mnemonic(), "lconst_1");
        assert_eq!(PushOp::dconst(0.0).unwrap().opcode().mnemonic(), "dconst_0");
    }

    #[test]
    fn conversion_produced_types() {
        assert_eq!(ConvertOp::D2I.produced_type(), Type::Int);
        assert_eq!(ConvertOp::F2I.produced_type(), Type::Int);
        assert_eq!(ConvertOp::L2I.produced_type(), Type::Int);
        assert_eq!(ConvertOp::I2L.produced_type(), Type::Long);
        assert_eq!(ConvertOp::F2D.produced_type(), Type::Double);
        assert_eq!(ConvertOp::I2B.produced_type(), Type::Byte);
        assert_eq!(ConvertOp::I2C.produced_type(), Type::Char);
        assert_eq!(ConvertOp::I2S.produced_type(), Type::Short);
    }

    #[test]
    fn return_family_throws_illegal_monitor_state() {
        for op in [ReturnOp::IReturn, ReturnOp::DReturn, ReturnOp::Return] {
            let insn: Instruction<i32> = Instruction::Return(op);
            assert_eq!(
                insn.thrown_exceptions(),
                &[ExceptionKind::IllegalMonitorState][..]
            );
        }
    }

    #[test]
    fn branch_negation_is_an_involution() {
        let branch: Instruction<u32> = Instruction::Branch(BranchOp::If(IfCond::Ne), 7);
        let negated = branch.negate().unwrap();
        assert_eq!(negated, Instruction::Branch(BranchOp::If(IfCond::Eq), 7));
        assert_eq!(negated.negate().unwrap(), branch);

        // unconditional jumps have no negation
        let goto: Instruction<u32> = Instruction::Branch(BranchOp::Goto, 7);
        assert_eq!(goto.negate(), None);
    }

    #[test]
    fn default_equality_compares_opcode_and_operand() {
        let get5: Instruction<i32> = Instruction::Field(FieldOp::GetStatic, CpIndex(5));
        let get5b: Instruction<i32> = Instruction::Field(FieldOp::GetStatic, CpIndex(5));
        let get6: Instruction<i32> = Instruction::Field(FieldOp::GetStatic, CpIndex(6));
        let put5: Instruction<i32> = Instruction::Field(FieldOp::PutStatic, CpIndex(5));
        assert!(get5.default_eq(&get5b));
        assert!(!get5.default_eq(&get6));
        assert!(!get5.default_eq(&put5));

        let newarray_int: Instruction<i32> =
            Instruction::Alloc(AllocOp::NewArray(ElementType::Int));
        let newarray_long: Instruction<i32> =
            Instruction::Alloc(AllocOp::NewArray(ElementType::Long));
        assert!(!newarray_int.default_eq(&newarray_long));
    }

    #[test]
    fn branches_are_never_default_equal() {
        let a: Instruction<i32> = Instruction::Branch(BranchOp::If(IfCond::Ne), -5);
        let b = a.clone();
        assert!(!a.default_eq(&b));
        assert!(!a.default_eq(&a));
        // but they stay structurally comparable
        assert_eq!(a, b);
    }

    #[test]
    fn ldc_capability_set() {
        let ldc: Instruction<i32> = Instruction::LoadConst(ConstLoad::LdcW(CpIndex(9)));
        let caps = ldc.capabilities();
        assert_eq!(
            caps,
            Capabilities::STACK_PRODUCER
                | Capabilities::EXCEPTION_THROWER
                | Capabilities::TYPED
                | Capabilities::CONSTANT_PUSH
                | Capabilities::INDEXED
                | Capabilities::LOAD_CLASS
        );
        assert!(!caps.contains(Capabilities::BRANCH));
    }

    #[test]
    fn widths_match_the_published_table() {
        let cases: Vec<(Instruction<i32>, usize)> = vec![
            (Instruction::Push(PushOp::IConst(3)), 1),
            (Instruction::Arith(ArithOp::IDiv), 1),
            (Instruction::Branch(BranchOp::If(IfCond::Ne), 0), 3),
            (Instruction::Field(FieldOp::GetStatic, CpIndex(5)), 3),
            (Instruction::Alloc(AllocOp::New(CpIndex(8))), 3),
            (Instruction::LoadConst(ConstLoad::Ldc(20)), 2),
            (Instruction::LoadConst(ConstLoad::LdcW(CpIndex(300))), 3),
            (Instruction::Branch(BranchOp::JsrW, 0), 5),
            (Instruction::Local(LocalOp::Load(LocalKind::Int, 2)), 1),
            (Instruction::Local(LocalOp::Load(LocalKind::Int, 200)), 2),
            (Instruction::Local(LocalOp::Load(LocalKind::Int, 300)), 4),
            (Instruction::Local(LocalOp::IInc { index: 1, delta: -1 }), 3),
            (Instruction::Local(LocalOp::IInc { index: 300, delta: 1 }), 6),
        ];
        for (insn, expected) in cases {
            assert_eq!(insn.width(), expected, "width of {:?}", insn);
        }
    }

    #[test]
    fn multianewarray_needs_at_least_one_dimension() {
        assert!(AllocOp::multianewarray(CpIndex(4), 0).is_err());
        assert!(AllocOp::multianewarray(CpIndex(4), 2).is_ok());
    }

    struct NoPool;
    impl ConstantPool for NoPool {
        fn entry_type(&self, _index: CpIndex) -> Option<Type> {
            None
        }
    }

    #[test]
    fn stack_effects_without_pool_answers() {
        let pool = NoPool;
        let idiv: Instruction<i32> = Instruction::Arith(ArithOp::IDiv);
        assert_eq!(idiv.consumed_slots(&pool), Some(2));
        assert_eq!(idiv.produced_slots(&pool), Some(1));

        let ladd: Instruction<i32> = Instruction::Arith(ArithOp::LAdd);
        assert_eq!(ladd.consumed_slots(&pool), Some(4));
        assert_eq!(ladd.produced_slots(&pool), Some(2));

        // field effects need the pool to answer
        let put: Instruction<i32> = Instruction::Field(FieldOp::PutField, CpIndex(5));
        assert_eq!(put.consumed_slots(&pool), None);
    }
}
