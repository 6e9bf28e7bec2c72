//! Value types produced and consumed by instructions, plus the constant pool
//! surface instructions need when their type depends on a pool entry.

/// JVM value type, as relevant to instruction stack effects
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Byte,
    Short,
    Char,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Reference,
    /// Produced by `jsr`/`jsr_w`
    ReturnAddress,
    Void,
}

impl Type {
    /// Number of operand stack slots a value of this type occupies
    pub fn slots(self) -> usize {
        match self {
            Type::Long | Type::Double => 2,
            Type::Void => 0,
            _ => 1,
        }
    }
}

/// Index into the class file constant pool
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct CpIndex(pub u16);

/// Constant pool lookup, as needed by instructions whose produced/consumed type
/// is determined by the referenced symbol (field access, `ldc`).
///
/// Pool construction and symbol resolution live outside this crate; this trait
/// is the only thing the instruction model asks of them.
pub trait ConstantPool {
    /// Type of the field or loadable constant at `index`, if the entry exists
    /// and has one
    fn entry_type(&self, index: CpIndex) -> Option<Type>;
}

/// Primitive element type codes used by `newarray`
///
/// The discriminants are the operand byte values fixed by the JVM spec.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum ElementType {
    Boolean = 4,
    Char = 5,
    Float = 6,
    Double = 7,
    Byte = 8,
    Short = 9,
    Int = 10,
    Long = 11,
}

impl ElementType {
    /// Operand byte encoding this element type
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<ElementType> {
        match code {
            4 => Some(ElementType::Boolean),
            5 => Some(ElementType::Char),
            6 => Some(ElementType::Float),
            7 => Some(ElementType::Double),
            8 => Some(ElementType::Byte),
            9 => Some(ElementType::Short),
            10 => Some(ElementType::Int),
            11 => Some(ElementType::Long),
            _ => None,
        }
    }

    pub fn ty(self) -> Type {
        match self {
            ElementType::Boolean => Type::Boolean,
            ElementType::Char => Type::Char,
            ElementType::Float => Type::Float,
            ElementType::Double => Type::Double,
            ElementType::Byte => Type::Byte,
            ElementType::Short => Type::Short,
            ElementType::Int => Type::Int,
            ElementType::Long => Type::Long,
        }
    }
}

impl TryFrom<u8> for ElementType {
    type Error = crate::Error;

    fn try_from(code: u8) -> Result<ElementType, crate::Error> {
        ElementType::from_code(code).ok_or(crate::Error::OutOfDomain {
            constructor: "newarray element type",
            value: code.to_string(),
        })
    }
}
