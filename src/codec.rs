//! Binary encoder and decoder for instructions whose branch targets are
//! resolved signed byte displacements
//!
//! The encoder always picks the most compact legal encoding: short forms for
//! small local variable indices, a `wide` prefix only when an operand forces
//! it. It never changes the instruction itself, so a narrow branch whose
//! displacement no longer fits 16 bits is an error, not a silent `goto_w`.
//!
//! The decoder is the inverse: short forms fold back into their canonical
//! variants, a `wide` prefix is consumed into the instruction it modifies, and
//! every operand read that runs off the end of the stream reports the opcode
//! and the operand width the catalog promised.

use crate::encoding::Serialize;
use crate::instruction::{
    AllocOp, ArithOp, ArrayKind, ArrayOp, BranchOp, CastOp, CmpOp, ConstLoad, ConvertOp, EqCond,
    FieldOp, IfCond, Instruction, LocalKind, LocalOp, MonitorOp, PushOp, ReturnOp, StackOp,
};
use crate::opcode::{self, Opcode, OperandBytes};
use crate::types::{CpIndex, ElementType};
use crate::Error;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io;

impl Instruction<i32> {
    /// Write the most compact encoding of this instruction
    ///
    /// Fails with [`Error::BranchOffsetOverflow`] if a narrow branch's
    /// displacement does not fit in 16 bits (build a
    /// [`BranchOp::GotoW`]/[`BranchOp::JsrW`] instead).
    pub fn encode<W: WriteBytesExt>(&self, writer: &mut W) -> Result<(), Error> {
        if let Instruction::Branch(op, displacement) = self {
            if !op.is_wide() && i16::try_from(*displacement).is_err() {
                return Err(Error::BranchOffsetOverflow {
                    opcode: op.opcode(),
                    displacement: *displacement as isize,
                });
            }
        }
        self.write_to(writer).map_err(Error::Io)
    }

    fn write_to<W: WriteBytesExt>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Instruction::Push(PushOp::BiPush(value)) => {
                0x10u8.serialize(writer)?;
                value.serialize(writer)
            }
            Instruction::Push(PushOp::SiPush(value)) => {
                0x11u8.serialize(writer)?;
                value.serialize(writer)
            }

            Instruction::LoadConst(ConstLoad::Ldc(index)) => {
                0x12u8.serialize(writer)?;
                index.serialize(writer)
            }
            Instruction::LoadConst(ConstLoad::LdcW(CpIndex(index))) => {
                0x13u8.serialize(writer)?;
                index.serialize(writer)
            }
            Instruction::LoadConst(ConstLoad::Ldc2W(CpIndex(index))) => {
                0x14u8.serialize(writer)?;
                index.serialize(writer)
            }

            Instruction::Local(LocalOp::Load(kind, index)) => write_load_or_store(
                *index,
                0x1a + 4 * kind.table_index(),
                0x15 + kind.table_index(),
                writer,
            ),
            Instruction::Local(LocalOp::Store(kind, index)) => write_load_or_store(
                *index,
                0x3b + 4 * kind.table_index(),
                0x36 + kind.table_index(),
                writer,
            ),
            Instruction::Local(LocalOp::IInc { index, delta }) => {
                match (u8::try_from(*index), i8::try_from(*delta)) {
                    (Ok(index), Ok(delta)) => {
                        0x84u8.serialize(writer)?;
                        index.serialize(writer)?;
                        delta.serialize(writer)
                    }
                    _ => {
                        opcode::WIDE.serialize(writer)?;
                        0x84u8.serialize(writer)?;
                        index.serialize(writer)?;
                        delta.serialize(writer)
                    }
                }
            }
            Instruction::Local(LocalOp::Ret(index)) => match u8::try_from(*index) {
                Ok(index) => {
                    0xa9u8.serialize(writer)?;
                    index.serialize(writer)
                }
                Err(_) => {
                    opcode::WIDE.serialize(writer)?;
                    0xa9u8.serialize(writer)?;
                    index.serialize(writer)
                }
            },

            Instruction::Field(_, CpIndex(index)) | Instruction::Cast(_, CpIndex(index)) => {
                self.opcode().byte().serialize(writer)?;
                index.serialize(writer)
            }

            Instruction::Alloc(AllocOp::New(CpIndex(index)))
            | Instruction::Alloc(AllocOp::ANewArray(CpIndex(index))) => {
                self.opcode().byte().serialize(writer)?;
                index.serialize(writer)
            }
            Instruction::Alloc(AllocOp::NewArray(element)) => {
                0xbcu8.serialize(writer)?;
                element.code().serialize(writer)
            }
            Instruction::Alloc(AllocOp::MultiANewArray(CpIndex(index), dimensions)) => {
                0xc5u8.serialize(writer)?;
                index.serialize(writer)?;
                dimensions.serialize(writer)
            }

            Instruction::Branch(op, displacement) => {
                self.opcode().byte().serialize(writer)?;
                if op.is_wide() {
                    displacement.serialize(writer)
                } else {
                    // checked in `encode` before anything was written
                    (*displacement as i16).serialize(writer)
                }
            }

            // everything left encodes as a bare opcode byte
            other => other.opcode().byte().serialize(writer),
        }
    }

    /// Read one instruction, starting from its opcode byte (or `wide` prefix)
    pub fn read_from<R: ReadBytesExt>(reader: &mut R) -> Result<Instruction<i32>, Error> {
        let byte = reader.read_u8().map_err(Error::Io)?;
        if byte == opcode::WIDE {
            return Instruction::read_wide(reader);
        }
        let opcode = Opcode::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?;
        Instruction::decode(opcode, reader)
    }

    /// Read the instruction modified by an already-consumed `wide` prefix
    ///
    /// Only local variable accesses, `iinc`, and `ret` change shape under the
    /// prefix. The deliberately wide forms (`ldc_w`, `ldc2_w`, `goto_w`,
    /// `jsr_w`) are already at full width, so the flag is a no-op for them;
    /// any other opcode after `wide` is malformed.
    fn read_wide<R: ReadBytesExt>(reader: &mut R) -> Result<Instruction<i32>, Error> {
        let wide = Opcode::new(opcode::WIDE);
        let byte = reader
            .read_u8()
            .map_err(|_| Error::Decode { opcode: wide, expected: 1 })?;
        let opcode = Opcode::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?;
        let short = move |_: io::Error| Error::Decode { opcode, expected: 2 };
        match byte {
            0x15..=0x19 => {
                let kind = LocalKind::from_table_index(byte - 0x15)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let index = reader.read_u16::<BigEndian>().map_err(short)?;
                Ok(Instruction::Local(LocalOp::Load(kind, index)))
            }
            0x36..=0x3a => {
                let kind = LocalKind::from_table_index(byte - 0x36)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let index = reader.read_u16::<BigEndian>().map_err(short)?;
                Ok(Instruction::Local(LocalOp::Store(kind, index)))
            }
            0x84 => {
                let short = move |_: io::Error| Error::Decode { opcode, expected: 4 };
                let index = reader.read_u16::<BigEndian>().map_err(short)?;
                let delta = reader.read_i16::<BigEndian>().map_err(short)?;
                Ok(Instruction::Local(LocalOp::IInc { index, delta }))
            }
            0xa9 => {
                let index = reader.read_u16::<BigEndian>().map_err(short)?;
                Ok(Instruction::Local(LocalOp::Ret(index)))
            }
            0x13 | 0x14 | 0xc8 | 0xc9 => Instruction::decode(opcode, reader),
            _ => Err(Error::UnsupportedOpcode(byte)),
        }
    }

    /// Decode the operands of an already-identified opcode
    pub fn decode<R: ReadBytesExt>(
        opcode: Opcode,
        reader: &mut R,
    ) -> Result<Instruction<i32>, Error> {
        let expected = match opcode.operand_bytes() {
            OperandBytes::Fixed(n) => n,
            // switches and `wide` have no fixed shape here
            OperandBytes::Variable => return Err(Error::UnsupportedOpcode(opcode.byte())),
        };
        let short = move |_: io::Error| Error::Decode { opcode, expected };
        let byte = opcode.byte();
        Ok(match byte {
            0x00 => Instruction::Nop,

            0x01 => Instruction::Push(PushOp::AConstNull),
            0x02..=0x08 => Instruction::Push(PushOp::IConst(byte as i32 - 3)),
            0x09 | 0x0a => Instruction::Push(PushOp::LConst((byte - 0x09) as i64)),
            0x0b..=0x0d => Instruction::Push(PushOp::FConst((byte - 0x0b) as f32)),
            0x0e | 0x0f => Instruction::Push(PushOp::DConst((byte - 0x0e) as f64)),
            0x10 => Instruction::Push(PushOp::BiPush(reader.read_i8().map_err(short)?)),
            0x11 => Instruction::Push(PushOp::SiPush(
                reader.read_i16::<BigEndian>().map_err(short)?,
            )),

            0x12 => Instruction::LoadConst(ConstLoad::Ldc(reader.read_u8().map_err(short)?)),
            0x13 => Instruction::LoadConst(ConstLoad::LdcW(CpIndex(
                reader.read_u16::<BigEndian>().map_err(short)?,
            ))),
            0x14 => Instruction::LoadConst(ConstLoad::Ldc2W(CpIndex(
                reader.read_u16::<BigEndian>().map_err(short)?,
            ))),

            0x15..=0x19 => {
                let kind = LocalKind::from_table_index(byte - 0x15)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let index = reader.read_u8().map_err(short)? as u16;
                Instruction::Local(LocalOp::Load(kind, index))
            }
            0x1a..=0x2d => {
                let relative = byte - 0x1a;
                let kind = LocalKind::from_table_index(relative / 4)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                Instruction::Local(LocalOp::Load(kind, (relative % 4) as u16))
            }
            0x36..=0x3a => {
                let kind = LocalKind::from_table_index(byte - 0x36)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let index = reader.read_u8().map_err(short)? as u16;
                Instruction::Local(LocalOp::Store(kind, index))
            }
            0x3b..=0x4e => {
                let relative = byte - 0x3b;
                let kind = LocalKind::from_table_index(relative / 4)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                Instruction::Local(LocalOp::Store(kind, (relative % 4) as u16))
            }
            0x84 => Instruction::Local(LocalOp::IInc {
                index: reader.read_u8().map_err(short)? as u16,
                delta: reader.read_i8().map_err(short)? as i16,
            }),
            0xa9 => Instruction::Local(LocalOp::Ret(reader.read_u8().map_err(short)? as u16)),

            0x2e..=0x35 => {
                let kind = ArrayKind::from_table_index(byte - 0x2e)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                Instruction::Array(ArrayOp::Load(kind))
            }
            0x4f..=0x56 => {
                let kind = ArrayKind::from_table_index(byte - 0x4f)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                Instruction::Array(ArrayOp::Store(kind))
            }
            0xbe => Instruction::Array(ArrayOp::Length),

            0x57..=0x5f => {
                Instruction::Stack(StackOp::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?)
            }
            0x60..=0x83 => {
                Instruction::Arith(ArithOp::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?)
            }
            0x85..=0x93 => Instruction::Convert(
                ConvertOp::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?,
            ),
            0x94..=0x98 => {
                Instruction::Cmp(CmpOp::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?)
            }
            0xac..=0xb1 => Instruction::Return(
                ReturnOp::from_byte(byte).ok_or(Error::UnsupportedOpcode(byte))?,
            ),

            0x99..=0x9e => {
                let cond = IfCond::from_table_index(byte - 0x99)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let displacement = reader.read_i16::<BigEndian>().map_err(short)? as i32;
                Instruction::Branch(BranchOp::If(cond), displacement)
            }
            0x9f..=0xa4 => {
                let cond = IfCond::from_table_index(byte - 0x9f)
                    .ok_or(Error::UnsupportedOpcode(byte))?;
                let displacement = reader.read_i16::<BigEndian>().map_err(short)? as i32;
                Instruction::Branch(BranchOp::IfICmp(cond), displacement)
            }
            0xa5 | 0xa6 => {
                let cond = if byte == 0xa5 { EqCond::Eq } else { EqCond::Ne };
                let displacement = reader.read_i16::<BigEndian>().map_err(short)? as i32;
                Instruction::Branch(BranchOp::IfACmp(cond), displacement)
            }
            0xc6 | 0xc7 => {
                let cond = if byte == 0xc6 { EqCond::Eq } else { EqCond::Ne };
                let displacement = reader.read_i16::<BigEndian>().map_err(short)? as i32;
                Instruction::Branch(BranchOp::IfNull(cond), displacement)
            }
            0xa7 => Instruction::Branch(
                BranchOp::Goto,
                reader.read_i16::<BigEndian>().map_err(short)? as i32,
            ),
            0xa8 => Instruction::Branch(
                BranchOp::Jsr,
                reader.read_i16::<BigEndian>().map_err(short)? as i32,
            ),
            0xc8 => Instruction::Branch(
                BranchOp::GotoW,
                reader.read_i32::<BigEndian>().map_err(short)?,
            ),
            0xc9 => Instruction::Branch(
                BranchOp::JsrW,
                reader.read_i32::<BigEndian>().map_err(short)?,
            ),

            0xb2..=0xb5 => {
                let op = match byte {
                    0xb2 => FieldOp::GetStatic,
                    0xb3 => FieldOp::PutStatic,
                    0xb4 => FieldOp::GetField,
                    _ => FieldOp::PutField,
                };
                Instruction::Field(op, CpIndex(reader.read_u16::<BigEndian>().map_err(short)?))
            }

            0xbb => Instruction::Alloc(AllocOp::New(CpIndex(
                reader.read_u16::<BigEndian>().map_err(short)?,
            ))),
            0xbc => {
                let code = reader.read_u8().map_err(short)?;
                let element = ElementType::from_code(code).ok_or(Error::BadOperand {
                    opcode,
                    value: code as i64,
                })?;
                Instruction::Alloc(AllocOp::NewArray(element))
            }
            0xbd => Instruction::Alloc(AllocOp::ANewArray(CpIndex(
                reader.read_u16::<BigEndian>().map_err(short)?,
            ))),
            0xc5 => {
                let index = CpIndex(reader.read_u16::<BigEndian>().map_err(short)?);
                let dimensions = reader.read_u8().map_err(short)?;
                AllocOp::multianewarray(index, dimensions)
                    .map(Instruction::Alloc)
                    .map_err(|_| Error::BadOperand {
                        opcode,
                        value: dimensions as i64,
                    })?
            }

            0xc0 => Instruction::Cast(
                CastOp::CheckCast,
                CpIndex(reader.read_u16::<BigEndian>().map_err(short)?),
            ),
            0xc1 => Instruction::Cast(
                CastOp::InstanceOf,
                CpIndex(reader.read_u16::<BigEndian>().map_err(short)?),
            ),

            0xbf => Instruction::Throw,
            0xc2 => Instruction::Monitor(MonitorOp::Enter),
            0xc3 => Instruction::Monitor(MonitorOp::Exit),

            // invokes and anything else the model doesn't cover
            _ => return Err(Error::UnsupportedOpcode(byte)),
        })
    }
}

/// Emit a local variable access with the most compact of the three encodings:
/// embedded-index short form, one-byte-index general form, or the general
/// form under a `wide` prefix
fn write_load_or_store<W: WriteBytesExt>(
    index: u16,
    short_form_base: u8,
    general_form: u8,
    writer: &mut W,
) -> io::Result<()> {
    if index < 4 {
        (short_form_base + index as u8).serialize(writer)
    } else if let Ok(index) = u8::try_from(index) {
        general_form.serialize(writer)?;
        index.serialize(writer)
    } else {
        opcode::WIDE.serialize(writer)?;
        general_form.serialize(writer)?;
        index.serialize(writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::Width;

    fn encoded(insn: &Instruction<i32>) -> Vec<u8> {
        let mut buffer = vec![];
        insn.encode(&mut buffer).unwrap();
        buffer
    }

    fn roundtrip(insn: Instruction<i32>) {
        let bytes = encoded(&insn);
        assert_eq!(bytes.len(), insn.width(), "width of {:?}", insn);
        let mut cursor = io::Cursor::new(&bytes[..]);
        let decoded = Instruction::read_from(&mut cursor).unwrap();
        assert_eq!(decoded, insn);
        assert_eq!(cursor.position() as usize, bytes.len());
        // value-level comparison agrees, except for branches which are never
        // DEFAULT-equal to anything
        if !matches!(insn, Instruction::Branch(_, _)) {
            assert!(decoded.default_eq(&insn));
        }
    }

    #[test]
    fn roundtrip_every_family() {
        let instructions: Vec<Instruction<i32>> = vec![
            Instruction::Nop,
            Instruction::Push(PushOp::AConstNull),
            Instruction::Push(PushOp::IConst(-1)),
            Instruction::Push(PushOp::IConst(5)),
            Instruction::Push(PushOp::LConst(1)),
            Instruction::Push(PushOp::FConst(2.0)),
            Instruction::Push(PushOp::DConst(0.0)),
            Instruction::Push(PushOp::BiPush(-7)),
            Instruction::Push(PushOp::SiPush(1000)),
            Instruction::LoadConst(ConstLoad::Ldc(20)),
            Instruction::LoadConst(ConstLoad::LdcW(CpIndex(300))),
            Instruction::LoadConst(ConstLoad::Ldc2W(CpIndex(7))),
            Instruction::Local(LocalOp::Load(LocalKind::Int, 0)),
            Instruction::Local(LocalOp::Load(LocalKind::Reference, 4)),
            Instruction::Local(LocalOp::Load(LocalKind::Long, 300)),
            Instruction::Local(LocalOp::Store(LocalKind::Double, 200)),
            Instruction::Local(LocalOp::Store(LocalKind::Float, 2)),
            Instruction::Local(LocalOp::IInc { index: 1, delta: -1 }),
            Instruction::Local(LocalOp::IInc { index: 300, delta: 200 }),
            Instruction::Local(LocalOp::Ret(5)),
            Instruction::Local(LocalOp::Ret(600)),
            Instruction::Arith(ArithOp::IDiv),
            Instruction::Arith(ArithOp::LXor),
            Instruction::Convert(ConvertOp::D2I),
            Instruction::Convert(ConvertOp::I2S),
            Instruction::Stack(StackOp::Dup2X1),
            Instruction::Cmp(CmpOp::FCmpG),
            Instruction::Array(ArrayOp::Load(ArrayKind::Char)),
            Instruction::Array(ArrayOp::Store(ArrayKind::Reference)),
            Instruction::Array(ArrayOp::Length),
            Instruction::Field(FieldOp::PutField, CpIndex(9)),
            Instruction::Alloc(AllocOp::New(CpIndex(8))),
            Instruction::Alloc(AllocOp::NewArray(ElementType::Long)),
            Instruction::Alloc(AllocOp::ANewArray(CpIndex(11))),
            Instruction::Alloc(AllocOp::MultiANewArray(CpIndex(12), 3)),
            Instruction::Cast(CastOp::CheckCast, CpIndex(4)),
            Instruction::Cast(CastOp::InstanceOf, CpIndex(4)),
            Instruction::Return(ReturnOp::AReturn),
            Instruction::Throw,
            Instruction::Monitor(MonitorOp::Exit),
            Instruction::Branch(BranchOp::If(IfCond::Ne), -5),
            Instruction::Branch(BranchOp::IfICmp(IfCond::Le), 12),
            Instruction::Branch(BranchOp::IfACmp(EqCond::Eq), 4),
            Instruction::Branch(BranchOp::IfNull(EqCond::Ne), -100),
            Instruction::Branch(BranchOp::Goto, 32000),
            Instruction::Branch(BranchOp::Jsr, -32000),
            Instruction::Branch(BranchOp::GotoW, 100_000),
            Instruction::Branch(BranchOp::JsrW, -100_000),
        ];
        for insn in instructions {
            roundtrip(insn);
        }
    }

    #[test]
    fn roundtrip_exhausts_the_fixed_shape_families() {
        for &op in ArithOp::ALL {
            roundtrip(Instruction::Arith(op));
        }
        for &op in ConvertOp::ALL {
            roundtrip(Instruction::Convert(op));
        }
        for &op in StackOp::ALL {
            roundtrip(Instruction::Stack(op));
        }
        for &op in CmpOp::ALL {
            roundtrip(Instruction::Cmp(op));
        }
        for &op in ReturnOp::ALL {
            roundtrip(Instruction::Return(op));
        }
        for index in 0..8 {
            let kind = ArrayKind::from_table_index(index).unwrap();
            roundtrip(Instruction::Array(ArrayOp::Load(kind)));
            roundtrip(Instruction::Array(ArrayOp::Store(kind)));
        }
        for index in 0..5 {
            let kind = LocalKind::from_table_index(index).unwrap();
            for slot in [0, 3, 4, 255, 256, u16::MAX] {
                roundtrip(Instruction::Local(LocalOp::Load(kind, slot)));
                roundtrip(Instruction::Local(LocalOp::Store(kind, slot)));
            }
        }
        for index in 0..6 {
            let cond = IfCond::from_table_index(index).unwrap();
            roundtrip(Instruction::Branch(BranchOp::If(cond), -5));
            roundtrip(Instruction::Branch(BranchOp::IfICmp(cond), 9));
        }
        for value in -1..=5 {
            roundtrip(Instruction::Push(PushOp::iconst(value).unwrap()));
        }
    }

    #[test]
    fn exact_bytes() {
        assert_eq!(
            encoded(&Instruction::Field(FieldOp::GetStatic, CpIndex(5))),
            vec![0xb2, 0x00, 0x05]
        );
        assert_eq!(encoded(&Instruction::Push(PushOp::IConst(3))), vec![0x06]);
        assert_eq!(encoded(&Instruction::Arith(ArithOp::IDiv)), vec![0x6c]);
        assert_eq!(
            encoded(&Instruction::Branch(BranchOp::If(IfCond::Ne), -5)),
            vec![0x9a, 0xff, 0xfb]
        );
        assert_eq!(encoded(&Instruction::Return(ReturnOp::Return)), vec![0xb1]);
    }

    #[test]
    fn narrow_and_wide_constant_loads_stay_distinct() {
        assert_eq!(
            encoded(&Instruction::LoadConst(ConstLoad::Ldc(20))),
            vec![0x12, 20]
        );
        // same index, deliberately wide form: three bytes, different opcode
        assert_eq!(
            encoded(&Instruction::LoadConst(ConstLoad::LdcW(CpIndex(20)))),
            vec![0x13, 0x00, 20]
        );
    }

    #[test]
    fn local_access_picks_the_compact_form() {
        assert_eq!(
            encoded(&Instruction::Local(LocalOp::Load(LocalKind::Int, 1))),
            vec![0x1b]
        );
        assert_eq!(
            encoded(&Instruction::Local(LocalOp::Load(LocalKind::Int, 200))),
            vec![0x15, 200]
        );
        assert_eq!(
            encoded(&Instruction::Local(LocalOp::Load(LocalKind::Int, 300))),
            vec![0xc4, 0x15, 0x01, 0x2c]
        );
        assert_eq!(
            encoded(&Instruction::Local(LocalOp::Store(LocalKind::Reference, 3))),
            vec![0x4e]
        );
    }

    #[test]
    fn short_forms_fold_on_decode() {
        let mut cursor = io::Cursor::new(&[0x1bu8][..]);
        assert_eq!(
            Instruction::read_from(&mut cursor).unwrap(),
            Instruction::Local(LocalOp::Load(LocalKind::Int, 1))
        );

        let mut cursor = io::Cursor::new(&[0x04u8][..]);
        assert_eq!(
            Instruction::read_from(&mut cursor).unwrap(),
            Instruction::Push(PushOp::IConst(1))
        );
    }

    #[test]
    fn wide_prefix_decodes_into_the_modified_instruction() {
        let mut cursor = io::Cursor::new(&[0xc4u8, 0x15, 0x01, 0x2c][..]);
        assert_eq!(
            Instruction::read_from(&mut cursor).unwrap(),
            Instruction::Local(LocalOp::Load(LocalKind::Int, 300))
        );

        let mut cursor = io::Cursor::new(&[0xc4u8, 0x84, 0x01, 0x00, 0x00, 0x7f][..]);
        assert_eq!(
            Instruction::read_from(&mut cursor).unwrap(),
            Instruction::Local(LocalOp::IInc { index: 256, delta: 127 })
        );

        // `wide` before an opcode the prefix cannot modify
        let mut cursor = io::Cursor::new(&[0xc4u8, 0x60][..]);
        assert!(matches!(
            Instruction::read_from(&mut cursor),
            Err(Error::UnsupportedOpcode(0x60))
        ));
    }

    #[test]
    fn truncated_operands_report_opcode_and_expected_width() {
        let mut cursor = io::Cursor::new(&[0xb2u8, 0x00][..]);
        match Instruction::read_from(&mut cursor) {
            Err(Error::Decode { opcode, expected }) => {
                assert_eq!(opcode.byte(), 0xb2);
                assert_eq!(expected, 2);
            }
            other => panic!("expected a truncation error, got {:?}", other),
        }

        let mut cursor = io::Cursor::new(&[0x10u8][..]);
        assert!(matches!(
            Instruction::read_from(&mut cursor),
            Err(Error::Decode { expected: 1, .. })
        ));
    }

    #[test]
    fn undefined_and_unmodelled_opcodes_are_rejected() {
        for byte in [0xcbu8, 0xfe, 0xff] {
            let bytes = [byte];
            let mut cursor = io::Cursor::new(&bytes[..]);
            assert!(matches!(
                Instruction::read_from(&mut cursor),
                Err(Error::UnsupportedOpcode(b)) if b == byte
            ));
        }

        // defined but outside the model: tableswitch and invokevirtual
        for byte in [0xaau8, 0xb6] {
            let bytes = [byte, 0, 0, 0, 0];
            let mut cursor = io::Cursor::new(&bytes[..]);
            assert!(matches!(
                Instruction::read_from(&mut cursor),
                Err(Error::UnsupportedOpcode(b)) if b == byte
            ));
        }
    }

    #[test]
    fn narrow_branches_are_never_silently_widened() {
        let mut buffer = vec![];
        let too_far = Instruction::Branch(BranchOp::Goto, 40_000);
        match too_far.encode(&mut buffer) {
            Err(Error::BranchOffsetOverflow { displacement, .. }) => {
                assert_eq!(displacement, 40_000);
            }
            other => panic!("expected an overflow error, got {:?}", other),
        }
        // nothing was written
        assert!(buffer.is_empty());

        let wide = Instruction::Branch(BranchOp::GotoW, 40_000);
        wide.encode(&mut buffer).unwrap();
        assert_eq!(buffer, vec![0xc8, 0x00, 0x00, 0x9c, 0x40]);
    }

    #[test]
    fn bad_newarray_element_code() {
        let mut cursor = io::Cursor::new(&[0xbcu8, 0x03][..]);
        assert!(matches!(
            Instruction::read_from(&mut cursor),
            Err(Error::BadOperand { value: 3, .. })
        ));
    }
}
