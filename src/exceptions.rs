//! Runtime and linking error kinds instructions can raise, and the per-family
//! thrown-error sets.
//!
//! The sets are ordered and fixed per opcode family; they never depend on
//! operand values.

/// Error kind an instruction may raise at run or link time
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExceptionKind {
    NullPointer,
    Arithmetic,
    ArrayIndexOutOfBounds,
    ArrayStore,
    NegativeArraySize,
    ClassCast,
    IllegalMonitorState,
    IllegalAccess,
    IncompatibleClassChange,
    NoSuchField,
    OutOfMemory,
    ClassNotFound,
    Linkage,
}

/// Errors any class or interface resolution can raise
pub static CLASS_RESOLUTION: [ExceptionKind; 2] =
    [ExceptionKind::ClassNotFound, ExceptionKind::Linkage];

/// Errors field resolution can raise (resolution errors first, then access checks)
pub static FIELD_RESOLUTION: [ExceptionKind; 5] = [
    ExceptionKind::ClassNotFound,
    ExceptionKind::Linkage,
    ExceptionKind::NoSuchField,
    ExceptionKind::IllegalAccess,
    ExceptionKind::IncompatibleClassChange,
];

/// Errors object/array allocation can raise
pub static ALLOCATION: [ExceptionKind; 3] = [
    ExceptionKind::ClassNotFound,
    ExceptionKind::Linkage,
    ExceptionKind::OutOfMemory,
];

pub static ARRAY_ALLOCATION: [ExceptionKind; 1] = [ExceptionKind::NegativeArraySize];

pub static INDEXED_ARRAY_ALLOCATION: [ExceptionKind; 4] = [
    ExceptionKind::ClassNotFound,
    ExceptionKind::Linkage,
    ExceptionKind::OutOfMemory,
    ExceptionKind::NegativeArraySize,
];

pub static DIVISION: [ExceptionKind; 1] = [ExceptionKind::Arithmetic];

pub static ARRAY_ACCESS: [ExceptionKind; 2] = [
    ExceptionKind::NullPointer,
    ExceptionKind::ArrayIndexOutOfBounds,
];

pub static ARRAY_STORE: [ExceptionKind; 3] = [
    ExceptionKind::NullPointer,
    ExceptionKind::ArrayIndexOutOfBounds,
    ExceptionKind::ArrayStore,
];

pub static ARRAY_LENGTH: [ExceptionKind; 1] = [ExceptionKind::NullPointer];

pub static METHOD_RETURN: [ExceptionKind; 1] = [ExceptionKind::IllegalMonitorState];

pub static THROW: [ExceptionKind; 2] = [
    ExceptionKind::NullPointer,
    ExceptionKind::IllegalMonitorState,
];

pub static CHECK_CAST: [ExceptionKind; 3] = [
    ExceptionKind::ClassNotFound,
    ExceptionKind::Linkage,
    ExceptionKind::ClassCast,
];

pub static MONITOR_ENTER: [ExceptionKind; 1] = [ExceptionKind::NullPointer];

pub static MONITOR_EXIT: [ExceptionKind; 2] = [
    ExceptionKind::NullPointer,
    ExceptionKind::IllegalMonitorState,
];

pub static NONE: [ExceptionKind; 0] = [];
