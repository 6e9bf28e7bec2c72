//! Opcode catalog: every defined JVM opcode, its mnemonic, and its fixed
//! operand width. This is the single source of truth for binary layout; the
//! codec never re-declares operand widths per instruction family.

use std::fmt;

/// Operand count sentinel: byte is not a defined opcode
const UNDEFINED: i8 = -1;

/// Operand count sentinel: operand width is not fixed (`tableswitch`,
/// `lookupswitch`, `wide`)
const VARIABLE: i8 = -2;

/// Operand count sentinel: reserved for debuggers/implementations
/// (`breakpoint`, `impdep1`, `impdep2`), never valid inside a method body
const RESERVED: i8 = -3;

/// Number of operand bytes following each opcode byte, indexed by opcode
#[rustfmt::skip]
static OPERAND_BYTES: [i8; 256] = [
    // 0x00..0x0F: nop, aconst_null, iconst_m1..iconst_5, lconst, fconst, dconst
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x10..0x14: bipush, sipush, ldc, ldc_w, ldc2_w
    1, 2, 1, 2, 2,
    // 0x15..0x19: iload..aload
    1, 1, 1, 1, 1,
    // 0x1A..0x2D: iload_0..aload_3
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x2E..0x35: iaload..saload
    0, 0, 0, 0, 0, 0, 0, 0,
    // 0x36..0x3A: istore..astore
    1, 1, 1, 1, 1,
    // 0x3B..0x4E: istore_0..astore_3
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x4F..0x56: iastore..sastore
    0, 0, 0, 0, 0, 0, 0, 0,
    // 0x57..0x5F: pop..swap
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x60..0x83: iadd..lxor
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x84: iinc
    2,
    // 0x85..0x93: i2l..i2s
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x94..0x98: lcmp, fcmpl, fcmpg, dcmpl, dcmpg
    0, 0, 0, 0, 0,
    // 0x99..0xA6: ifeq..if_acmpne
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    // 0xA7..0xA9: goto, jsr, ret
    2, 2, 1,
    // 0xAA..0xAB: tableswitch, lookupswitch
    VARIABLE, VARIABLE,
    // 0xAC..0xB1: ireturn..return
    0, 0, 0, 0, 0, 0,
    // 0xB2..0xB5: getstatic..putfield
    2, 2, 2, 2,
    // 0xB6..0xBA: invokevirtual..invokedynamic
    2, 2, 2, 4, 4,
    // 0xBB..0xBE: new, newarray, anewarray, arraylength
    2, 1, 2, 0,
    // 0xBF: athrow
    0,
    // 0xC0..0xC3: checkcast, instanceof, monitorenter, monitorexit
    2, 2, 0, 0,
    // 0xC4..0xC5: wide, multianewarray
    VARIABLE, 3,
    // 0xC6..0xC9: ifnull, ifnonnull, goto_w, jsr_w
    2, 2, 4, 4,
    // 0xCA: breakpoint
    RESERVED,
    // 0xCB..0xFD: undefined
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED, UNDEFINED,
    // 0xFE..0xFF: impdep1, impdep2
    RESERVED, RESERVED,
];

/// Opcode mnemonics, indexed by opcode; empty string for undefined bytes
#[rustfmt::skip]
static MNEMONICS: [&str; 256] = [
    "nop", "aconst_null", "iconst_m1", "iconst_0", "iconst_1", "iconst_2",
    "iconst_3", "iconst_4", "iconst_5", "lconst_0", "lconst_1", "fconst_0",
    "fconst_1", "fconst_2", "dconst_0", "dconst_1", "bipush", "sipush", "ldc",
    "ldc_w", "ldc2_w", "iload", "lload", "fload", "dload", "aload", "iload_0",
    "iload_1", "iload_2", "iload_3", "lload_0", "lload_1", "lload_2", "lload_3",
    "fload_0", "fload_1", "fload_2", "fload_3", "dload_0", "dload_1", "dload_2",
    "dload_3", "aload_0", "aload_1", "aload_2", "aload_3", "iaload", "laload",
    "faload", "daload", "aaload", "baload", "caload", "saload", "istore",
    "lstore", "fstore", "dstore", "astore", "istore_0", "istore_1", "istore_2",
    "istore_3", "lstore_0", "lstore_1", "lstore_2", "lstore_3", "fstore_0",
    "fstore_1", "fstore_2", "fstore_3", "dstore_0", "dstore_1", "dstore_2",
    "dstore_3", "astore_0", "astore_1", "astore_2", "astore_3", "iastore",
    "lastore", "fastore", "dastore", "aastore", "bastore", "castore", "sastore",
    "pop", "pop2", "dup", "dup_x1", "dup_x2", "dup2", "dup2_x1", "dup2_x2",
    "swap", "iadd", "ladd", "fadd", "dadd", "isub", "lsub", "fsub", "dsub",
    "imul", "lmul", "fmul", "dmul", "idiv", "ldiv", "fdiv", "ddiv", "irem",
    "lrem", "frem", "drem", "ineg", "lneg", "fneg", "dneg", "ishl", "lshl",
    "ishr", "lshr", "iushr", "lushr", "iand", "land", "ior", "lor", "ixor",
    "lxor", "iinc", "i2l", "i2f", "i2d", "l2i", "l2f", "l2d", "f2i", "f2l",
    "f2d", "d2i", "d2l", "d2f", "i2b", "i2c", "i2s", "lcmp", "fcmpl", "fcmpg",
    "dcmpl", "dcmpg", "ifeq", "ifne", "iflt", "ifge", "ifgt", "ifle",
    "if_icmpeq", "if_icmpne", "if_icmplt", "if_icmpge", "if_icmpgt",
    "if_icmple", "if_acmpeq", "if_acmpne", "goto", "jsr", "ret", "tableswitch",
    "lookupswitch", "ireturn", "lreturn", "freturn", "dreturn", "areturn",
    "return", "getstatic", "putstatic", "getfield", "putfield",
    "invokevirtual", "invokespecial", "invokestatic", "invokeinterface",
    "invokedynamic", "new", "newarray", "anewarray", "arraylength", "athrow",
    "checkcast", "instanceof", "monitorenter", "monitorexit", "wide",
    "multianewarray", "ifnull", "ifnonnull", "goto_w", "jsr_w", "breakpoint",
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    "impdep1", "impdep2",
];

/// Numeric code identifying an instruction's operation and binary layout
///
/// Only defined opcodes can be obtained: [`Opcode::from_byte`] refuses
/// undefined and reserved bytes, and instructions hand out their own opcode
/// through [`Instruction::opcode`](crate::Instruction::opcode).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Opcode(u8);

/// `wide` operand-width modifier prefix
pub(crate) const WIDE: u8 = 0xC4;

/// Operand width of an opcode, not counting the opcode byte itself
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OperandBytes {
    Fixed(usize),
    /// `tableswitch`, `lookupswitch` and `wide`: width depends on operands
    Variable,
}

impl Opcode {
    pub(crate) const fn new(byte: u8) -> Opcode {
        Opcode(byte)
    }

    /// Look up a defined opcode by its byte value
    ///
    /// Returns `None` for undefined bytes and for the reserved opcodes
    /// (`breakpoint`, `impdep1`, `impdep2`), which never appear in a valid
    /// method body.
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        match OPERAND_BYTES[byte as usize] {
            UNDEFINED | RESERVED => None,
            _ => Some(Opcode(byte)),
        }
    }

    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self.0 as usize]
    }

    /// Declared operand width, from the catalog table
    pub fn operand_bytes(self) -> OperandBytes {
        match OPERAND_BYTES[self.0 as usize] {
            VARIABLE => OperandBytes::Variable,
            n if n >= 0 => OperandBytes::Fixed(n as usize),
            // `from_byte` is the only public constructor and it rejects these
            _ => unreachable!("undefined opcode 0x{:02x} in catalog lookup", self.0),
        }
    }

    /// Total fixed encoded length, including the opcode byte
    pub fn len(self) -> Option<usize> {
        match self.operand_bytes() {
            OperandBytes::Fixed(n) => Some(1 + n),
            OperandBytes::Variable => None,
        }
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("{}(0x{:02x})", self.mnemonic(), self.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalog_lengths_match_published_encoding() {
        let expect = [
            ("iconst_0", 0x03u8, 1usize),
            ("dconst_1", 0x0f, 1),
            ("idiv", 0x6c, 1),
            ("ifne", 0x9a, 3),
            ("getstatic", 0xb2, 3),
            ("new", 0xbb, 3),
            ("ldc", 0x12, 2),
            ("ldc_w", 0x13, 3),
            ("jsr_w", 0xc9, 5),
        ];
        for (mnemonic, byte, len) in expect {
            let opcode = Opcode::from_byte(byte).unwrap();
            assert_eq!(opcode.mnemonic(), mnemonic);
            assert_eq!(opcode.len(), Some(len));
        }
    }

    #[test]
    fn switches_and_wide_have_no_fixed_length() {
        for byte in [0xaa, 0xab, 0xc4] {
            assert_eq!(Opcode::from_byte(byte).unwrap().len(), None);
        }
    }

    #[test]
    fn undefined_and_reserved_bytes_are_rejected() {
        assert_eq!(Opcode::from_byte(0xcb), None);
        assert_eq!(Opcode::from_byte(0xf0), None);
        assert_eq!(Opcode::from_byte(0xca), None); // breakpoint
        assert_eq!(Opcode::from_byte(0xfe), None); // impdep1
        assert_eq!(Opcode::from_byte(0xff), None); // impdep2
    }
}
