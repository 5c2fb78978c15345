//! Decoding of 32-bit protected mode machine code.

mod modrm;
mod tables;
mod vex;

use std::fmt;
use std::io::Read;

use bitflags::bitflags;
use decoder::{Decodable, Error, ErrorKind, Reader};

use crate::operand::{Address, Constant, Indirect, Operand};
use crate::{Instruction, Opcode, RegSpec};

use modrm::{
    read_E, read_E_xmm, read_G, read_M, read_imm, read_imm_signed_byte, read_imm_unsigned,
    read_modrm, read_num,
};
use tables::{Interpretation, OpcodeRecord, OperandCode, OPCODES};

bitflags! {
    /// legacy prefixes seen before the opcode. only the operand-size override is modeled.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Prefixes: u8 {
        /// `66`: select the 16-bit form of an instruction.
        const OPERAND_SIZE = 1 << 0;
    }
}

bitflags! {
    /// ISA extensions whose instructions a [`Decoder`] accepts.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Extensions: u16 {
        /// `andn`, `bextr`, `blsi`, `blsmsk`, `blsr` and `tzcnt`.
        const BMI1 = 1 << 0;
        /// `bzhi`, `mulx`, `pdep`, `pext`, `rorx`, `sarx`, `shlx` and `shrx`.
        const BMI2 = 1 << 1;
        const POPCNT = 1 << 2;
        const LZCNT = 1 << 3;
        const MOVBE = 1 << 4;
        const RDRAND = 1 << 5;
        const RDSEED = 1 << 6;
        const RDTSCP = 1 << 7;
        const CLFLUSHOPT = 1 << 8;
        const CLWB = 1 << 9;
        /// `prefetchw`, originally part of 3dnow.
        const PREFETCHW = 1 << 10;
        /// `sfence`, the `prefetch` hints and the single precision conversions.
        const SSE = 1 << 11;
        /// `lfence`, `mfence`, `clflush` and the double precision conversions.
        const SSE2 = 1 << 12;
    }
}

/// an `x86` instruction decoder.
///
/// fundamentally this is a set of extension flags with no additional state kept during decoding.
/// it can be copied, hashed and compared cheaply, and shared between threads freely.
#[derive(PartialEq, Copy, Clone, Eq, Hash)]
pub struct Decoder {
    extensions: Extensions,
}

macro_rules! extension {
    ($($flag:ident => $get:ident, $with:ident;)*) => {
        $(
            pub fn $get(&self) -> bool {
                self.extensions.contains(Extensions::$flag)
            }

            pub fn $with(mut self) -> Self {
                self.extensions |= Extensions::$flag;
                self
            }
        )*
    };
}

impl Decoder {
    /// instantiates a decoder that decodes the bare minimum of protected-mode x86.
    ///
    /// pedantic and rejects any instruction defined by an extension.
    pub fn minimal() -> Self {
        Decoder {
            extensions: Extensions::empty(),
        }
    }

    pub fn with_extensions(extensions: Extensions) -> Self {
        Decoder { extensions }
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// disable every extension in `extensions`.
    pub fn without(mut self, extensions: Extensions) -> Self {
        self.extensions.remove(extensions);
        self
    }

    extension! {
        BMI1 => bmi1, with_bmi1;
        BMI2 => bmi2, with_bmi2;
        POPCNT => popcnt, with_popcnt;
        LZCNT => lzcnt, with_lzcnt;
        MOVBE => movbe, with_movbe;
        RDRAND => rdrand, with_rdrand;
        RDSEED => rdseed, with_rdseed;
        RDTSCP => rdtscp, with_rdtscp;
        CLFLUSHOPT => clflushopt, with_clflushopt;
        CLWB => clwb, with_clwb;
        PREFETCHW => prefetchw, with_prefetchw;
        SSE => sse, with_sse;
        SSE2 => sse2, with_sse2;
    }

    /// helper to decode an instruction directly from a byte slice.
    ///
    /// this lets callers avoid the work of setting up a [`decoder::Reader`] for the slice.
    pub fn decode_slice(&self, data: &[u8]) -> Result<(Instruction, usize), Error> {
        let mut reader = Reader::new(data);
        self.decode(&mut reader)
    }

    /// optionally reject or reinterpret instructions according to the decoder's
    /// declared extensions.
    fn revise_instruction(&self, inst: Instruction) -> Result<Instruction, ErrorKind> {
        let opcode = inst.opcode();
        let Some(extension) = extension_of(opcode) else {
            return Ok(inst);
        };

        if self.extensions.contains(extension) {
            return Ok(inst);
        }

        // processors without these extensions ignore the `f3` and run the older instruction.
        let fallback = match opcode {
            Opcode::TZCNT => Opcode::BSF,
            Opcode::LZCNT => Opcode::BSR,
            _ => return Err(ErrorKind::UnrecognizedOpcode),
        };

        Instruction::from_operands(fallback, inst.operands())
            .map_err(|_| ErrorKind::UnrecognizedOpcode)
    }
}

impl Default for Decoder {
    /// instantiates a decoder that accepts every extension it knows of.
    fn default() -> Self {
        Decoder {
            extensions: Extensions::all(),
        }
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extensions == Extensions::all() {
            return f.write_str("<all extensions>");
        }

        if self.extensions.is_empty() {
            return f.write_str("<no extensions>");
        }

        for (idx, (name, _)) in self.extensions.iter_names().enumerate() {
            if idx != 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decoder({self})")
    }
}

/// the extension an instruction needs, if any.
fn extension_of(opcode: Opcode) -> Option<Extensions> {
    let extension = match opcode {
        Opcode::ANDN
        | Opcode::BEXTR
        | Opcode::BLSI
        | Opcode::BLSMSK
        | Opcode::BLSR
        | Opcode::TZCNT => Extensions::BMI1,
        Opcode::BZHI
        | Opcode::MULX
        | Opcode::PDEP
        | Opcode::PEXT
        | Opcode::RORX
        | Opcode::SARX
        | Opcode::SHLX
        | Opcode::SHRX => Extensions::BMI2,
        Opcode::POPCNT => Extensions::POPCNT,
        Opcode::LZCNT => Extensions::LZCNT,
        Opcode::MOVBE => Extensions::MOVBE,
        Opcode::RDRAND => Extensions::RDRAND,
        Opcode::RDSEED => Extensions::RDSEED,
        Opcode::RDTSCP => Extensions::RDTSCP,
        Opcode::CLFLUSHOPT => Extensions::CLFLUSHOPT,
        Opcode::CLWB => Extensions::CLWB,
        Opcode::PREFETCHW => Extensions::PREFETCHW,
        Opcode::SFENCE
        | Opcode::PREFETCHNTA
        | Opcode::PREFETCHT0
        | Opcode::PREFETCHT1
        | Opcode::PREFETCHT2
        | Opcode::CVTSS2SI
        | Opcode::CVTTSS2SI => Extensions::SSE,
        Opcode::LFENCE
        | Opcode::MFENCE
        | Opcode::CLFLUSH
        | Opcode::CVTSD2SI
        | Opcode::CVTTSD2SI => Extensions::SSE2,
        _ => return None,
    };

    Some(extension)
}

impl Decodable for Decoder {
    type Instruction = Instruction;

    fn decode<S: Read>(&self, reader: &mut Reader<S>) -> Result<(Instruction, usize), Error> {
        let inst = read(reader)
            .and_then(|inst| self.revise_instruction(inst))
            .map_err(|kind| Error::new(kind, reader.offset()))?;

        Ok((inst, reader.commit()))
    }

    fn max_width(&self) -> usize {
        15
    }
}

/// read up to four `66` prefixes, leaving the cursor on the first byte that isn't one.
fn read_prefixes<S: Read>(words: &mut Reader<S>) -> Result<Prefixes, ErrorKind> {
    let mut prefixes = Prefixes::empty();

    for _ in 0..4 {
        if words.next()? != 0x66 {
            words.unread();
            break;
        }

        prefixes |= Prefixes::OPERAND_SIZE;
    }

    Ok(prefixes)
}

/// read one byte and look it up in `map`. when the map has no entry the byte is given back.
fn escape<S: Read>(
    words: &mut Reader<S>,
    map: fn(u8) -> OpcodeRecord,
) -> Result<(u8, OpcodeRecord), ErrorKind> {
    let byte = words.next()?;
    let record = map(byte);

    if record.0 == Interpretation::Invalid {
        words.unread();
        return Err(ErrorKind::UnrecognizedOpcode);
    }

    Ok((byte, record))
}

/// follow an escape byte into the map it selects, and on into any map nested in that one.
fn read_escaped<S: Read>(
    words: &mut Reader<S>,
    byte0: u8,
) -> Result<(u8, OpcodeRecord), ErrorKind> {
    let (outer, inner): (fn(u8) -> OpcodeRecord, fn(u8) -> OpcodeRecord) = match byte0 {
        0x0f => (tables::read_0f_opcode, tables::read_0f38_opcode),
        0xf2 => (tables::read_f2_opcode, tables::read_f20f_opcode),
        0xf3 => (tables::read_f3_opcode, tables::read_f30f_opcode),
        _ => return Err(ErrorKind::UnrecognizedOpcode),
    };

    let (byte, record) = escape(words, outer)?;
    match record.0 {
        Interpretation::Escape => escape(words, inner),
        _ => Ok((byte, record)),
    }
}

pub(crate) fn read<S: Read>(words: &mut Reader<S>) -> Result<Instruction, ErrorKind> {
    let prefixes = read_prefixes(words)?;
    let byte0 = words.next()?;

    let (byte, OpcodeRecord(interpretation, operand_code)) = match OPCODES[byte0 as usize] {
        OpcodeRecord(Interpretation::Escape, _) if byte0 == 0xc4 => {
            return vex::read_vex(words, prefixes);
        }
        OpcodeRecord(Interpretation::Escape, _) => read_escaped(words, byte0)?,
        record => (byte0, record),
    };

    let (opcode, operand_code) = match interpretation {
        Interpretation::Instruction(opcode) => (opcode, operand_code),
        Interpretation::Group(group) => {
            // peek at the modrm byte to find out which member of the group this is.
            let modrm = read_modrm(words)?;
            words.unread();
            group
                .resolve(modrm, prefixes, operand_code)
                .ok_or(ErrorKind::UnrecognizedOpcode)?
        }
        Interpretation::Escape | Interpretation::Invalid => {
            return Err(ErrorKind::UnrecognizedOpcode);
        }
    };

    read_operands(words, prefixes, byte, opcode, operand_code)
}

/// the 16-bit name of instructions that only differ by the width of their implicit operands.
fn word_form(opcode: Opcode) -> Opcode {
    match opcode {
        Opcode::CWDE => Opcode::CBW,
        Opcode::CDQ => Opcode::CWD,
        Opcode::PUSHAD => Opcode::PUSHA,
        Opcode::POPAD => Opcode::POPA,
        Opcode::PUSHFD => Opcode::PUSHF,
        Opcode::POPFD => Opcode::POPF,
        opcode => opcode,
    }
}

fn build(opcode: Opcode, operands: &[Operand]) -> Result<Instruction, ErrorKind> {
    Instruction::from_operands(opcode, operands).map_err(|_| ErrorKind::UnrecognizedOpcode)
}

fn read_operands<S: Read>(
    words: &mut Reader<S>,
    prefixes: Prefixes,
    byte: u8,
    opcode: Opcode,
    operand_code: OperandCode,
) -> Result<Instruction, ErrorKind> {
    let operand_size = prefixes.contains(Prefixes::OPERAND_SIZE);
    let width = if operand_size { 2 } else { 4 };
    let embedded = |width| Operand::Register(RegSpec::gp(byte & 7, width));
    let accumulator = |width| Operand::Register(RegSpec::gp(0, width));

    match operand_code {
        OperandCode::Nothing => {
            let opcode = if operand_size { word_form(opcode) } else { opcode };
            build(opcode, &[])
        }
        OperandCode::ModRM => {
            read_modrm(words)?;
            build(opcode, &[])
        }
        OperandCode::Eb_Gb | OperandCode::Ev_Gv => {
            let width = if operand_code == OperandCode::Eb_Gb { 1 } else { width };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            build(opcode, &[rm, read_G(modrm, width).into()])
        }
        OperandCode::Gb_Eb | OperandCode::Gv_Ev => {
            let width = if operand_code == OperandCode::Gb_Eb { 1 } else { width };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            build(opcode, &[read_G(modrm, width).into(), rm])
        }
        OperandCode::Gv_Eb | OperandCode::Gv_Ew => {
            let source_width = if operand_code == OperandCode::Gv_Eb { 1 } else { 2 };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, source_width)?;
            build(opcode, &[read_G(modrm, width).into(), rm])
        }
        OperandCode::AL_Ib => build(opcode, &[accumulator(1), read_imm(words, 1)?.into()]),
        OperandCode::AX_Iv => build(opcode, &[accumulator(width), read_imm(words, width)?.into()]),
        OperandCode::Zv_R => build(opcode, &[embedded(width)]),
        OperandCode::Zv_AX => build(opcode, &[accumulator(width), embedded(width)]),
        OperandCode::Zb_Ib_R => build(opcode, &[embedded(1), read_imm(words, 1)?.into()]),
        OperandCode::Zv_Iv_R => build(opcode, &[embedded(width), read_imm(words, width)?.into()]),
        OperandCode::Zd_R => {
            // `bswap` of a 16-bit register is undefined.
            if operand_size {
                return Err(ErrorKind::UnrecognizedOpcode);
            }
            build(opcode, &[embedded(4)])
        }
        OperandCode::Ib => build(opcode, &[read_imm(words, 1)?.into()]),
        OperandCode::Ibs | OperandCode::Jbs => {
            build(opcode, &[read_imm_signed_byte(words)?.into()])
        }
        OperandCode::Iv | OperandCode::Jvds => build(opcode, &[read_imm(words, width)?.into()]),
        OperandCode::Iw => build(opcode, &[read_imm_unsigned(words, 2)?.into()]),
        OperandCode::Iw_Ib => {
            let size = read_imm_unsigned(words, 2)?;
            let level = read_imm_unsigned(words, 1)?;
            build(opcode, &[size.into(), level.into()])
        }
        OperandCode::Eb | OperandCode::Ev => {
            let width = if operand_code == OperandCode::Eb { 1 } else { width };
            let modrm = read_modrm(words)?;
            build(opcode, &[read_E(words, modrm, width)?])
        }
        OperandCode::Eb_Ib | OperandCode::Ev_Ib | OperandCode::Ev_Ibs | OperandCode::Ev_Iv => {
            let width = if operand_code == OperandCode::Eb_Ib { 1 } else { width };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            let imm = match operand_code {
                OperandCode::Ev_Ibs => read_imm_signed_byte(words)?,
                OperandCode::Ev_Iv => read_imm(words, width)?,
                _ => read_imm(words, 1)?,
            };
            build(opcode, &[rm, imm.into()])
        }
        OperandCode::Eb_1 | OperandCode::Ev_1 => {
            let width = if operand_code == OperandCode::Eb_1 { 1 } else { width };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            build(opcode, &[rm, Constant::byte(1).into()])
        }
        OperandCode::Eb_CL | OperandCode::Ev_CL => {
            let width = if operand_code == OperandCode::Eb_CL { 1 } else { width };
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            build(opcode, &[rm, RegSpec::cl().into()])
        }
        OperandCode::Gv_Ev_Iv | OperandCode::Gv_Ev_Ibs => {
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            let imm = if operand_code == OperandCode::Gv_Ev_Ibs {
                read_imm_signed_byte(words)?
            } else {
                read_imm(words, width)?
            };
            build(opcode, &[read_G(modrm, width).into(), rm, imm.into()])
        }
        OperandCode::Ev_Gv_Ib | OperandCode::Ev_Gv_CL => {
            let modrm = read_modrm(words)?;
            let rm = read_E(words, modrm, width)?;
            let count: Operand = if operand_code == OperandCode::Ev_Gv_Ib {
                read_imm(words, 1)?.into()
            } else {
                RegSpec::cl().into()
            };
            build(opcode, &[rm, read_G(modrm, width).into(), count])
        }
        OperandCode::AL_Ob | OperandCode::AX_Ov | OperandCode::Ob_AL | OperandCode::Ov_AX => {
            let width = match operand_code {
                OperandCode::AL_Ob | OperandCode::Ob_AL => 1,
                _ => width,
            };
            let offset = read_num(words, 4)? as i32;
            let mem = Operand::Indirect(Indirect::new(width, Address::absolute(offset)));
            match operand_code {
                OperandCode::AL_Ob | OperandCode::AX_Ov => {
                    build(opcode, &[accumulator(width), mem])
                }
                _ => build(opcode, &[mem, accumulator(width)]),
            }
        }
        OperandCode::Gv_A | OperandCode::Gv_M | OperandCode::M_Gv => {
            let modrm = read_modrm(words)?;
            if modrm >= 0b11000000 {
                return Err(ErrorKind::UnrecognizedOpcode);
            }
            let address = read_M(words, modrm)?;
            let reg: Operand = read_G(modrm, width).into();
            match operand_code {
                OperandCode::Gv_A => build(opcode, &[reg, address.into()]),
                OperandCode::Gv_M => build(opcode, &[reg, Indirect::new(width, address).into()]),
                _ => build(opcode, &[Indirect::new(width, address).into(), reg]),
            }
        }
        OperandCode::Mb => {
            let modrm = read_modrm(words)?;
            if modrm >= 0b11000000 {
                return Err(ErrorKind::UnrecognizedOpcode);
            }
            build(opcode, &[Operand::byte_ptr(read_M(words, modrm)?)])
        }
        OperandCode::Rv => {
            let modrm = read_modrm(words)?;
            if modrm < 0b11000000 {
                return Err(ErrorKind::UnrecognizedOpcode);
            }
            build(opcode, &[read_E(words, modrm, width)?])
        }
        OperandCode::Gd_Wss | OperandCode::Gd_Wsd => {
            let source_width = if operand_code == OperandCode::Gd_Wss { 4 } else { 8 };
            let modrm = read_modrm(words)?;
            let source = read_E_xmm(words, modrm, source_width)?;
            build(opcode, &[read_G(modrm, 4).into(), source])
        }
    }
}
