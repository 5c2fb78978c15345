//! Three-byte `c4` VEX encodings, for the BMI1 and BMI2 general purpose instructions.

use std::io::Read;

use decoder::{ErrorKind, Reader};

use super::modrm::{read_E, read_G, read_imm_unsigned, read_modrm};
use super::Prefixes;
use crate::{Instruction, Opcode, Operand, RegSpec};

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VexOperandCode {
    /// `modrm.reg`, `vex.vvvv`, `modrm.rm`
    G_V_E,
    /// `modrm.reg`, `modrm.rm`, `vex.vvvv`
    G_E_V,
    /// `vex.vvvv`, `modrm.rm`
    V_E,
    G_E_Ib,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VexMap {
    M0F38,
    M0F3A,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VexPrefix {
    None,
    P66,
    PF3,
    PF2,
}

/// decode the rest of an instruction after its `c4` byte.
pub(super) fn read_vex<S: Read>(
    words: &mut Reader<S>,
    prefixes: Prefixes,
) -> Result<Instruction, ErrorKind> {
    if prefixes.contains(Prefixes::OPERAND_SIZE) {
        return Err(ErrorKind::UnrecognizedOpcode);
    }

    let byte1 = words.next()?;

    // outside of long mode, a second byte with `mod != 11` makes this `les`.
    if byte1 < 0b11000000 {
        words.unread();
        return Err(ErrorKind::UnrecognizedOpcode);
    }

    let map = match byte1 & 0b11111 {
        0b00010 => VexMap::M0F38,
        0b00011 => VexMap::M0F3A,
        _ => return Err(ErrorKind::UnrecognizedOpcode),
    };

    let byte2 = words.next()?;

    // only the low three bits of `vvvv` name a register in protected mode. `vex.w` selects
    // 64-bit operands in long mode and is ignored here.
    let vvvv = (!byte2 >> 3) & 0b111;

    // the general purpose forms are all `vex.lz`.
    if byte2 & 0b100 != 0 {
        return Err(ErrorKind::UnrecognizedOpcode);
    }

    let prefix = match byte2 & 0b11 {
        0b00 => VexPrefix::None,
        0b01 => VexPrefix::P66,
        0b10 => VexPrefix::PF3,
        _ => VexPrefix::PF2,
    };

    let opc = words.next()?;
    let (opcode, code) = match (map, prefix, opc) {
        (VexMap::M0F38, VexPrefix::None, 0xf2) => (Some(Opcode::ANDN), VexOperandCode::G_V_E),
        (VexMap::M0F38, VexPrefix::None, 0xf3) => (None, VexOperandCode::V_E),
        (VexMap::M0F38, VexPrefix::None, 0xf5) => (Some(Opcode::BZHI), VexOperandCode::G_E_V),
        (VexMap::M0F38, VexPrefix::None, 0xf7) => (Some(Opcode::BEXTR), VexOperandCode::G_E_V),
        (VexMap::M0F38, VexPrefix::P66, 0xf7) => (Some(Opcode::SHLX), VexOperandCode::G_E_V),
        (VexMap::M0F38, VexPrefix::PF3, 0xf5) => (Some(Opcode::PEXT), VexOperandCode::G_V_E),
        (VexMap::M0F38, VexPrefix::PF3, 0xf7) => (Some(Opcode::SARX), VexOperandCode::G_E_V),
        (VexMap::M0F38, VexPrefix::PF2, 0xf5) => (Some(Opcode::PDEP), VexOperandCode::G_V_E),
        (VexMap::M0F38, VexPrefix::PF2, 0xf6) => (Some(Opcode::MULX), VexOperandCode::G_V_E),
        (VexMap::M0F38, VexPrefix::PF2, 0xf7) => (Some(Opcode::SHRX), VexOperandCode::G_E_V),
        (VexMap::M0F3A, VexPrefix::PF2, 0xf0) => (Some(Opcode::RORX), VexOperandCode::G_E_Ib),
        _ => {
            words.unread();
            return Err(ErrorKind::UnrecognizedOpcode);
        }
    };

    let modrm = read_modrm(words)?;
    let opcode = match opcode {
        Some(opcode) => opcode,
        // group 17
        None => match (modrm >> 3) & 7 {
            1 => Opcode::BLSR,
            2 => Opcode::BLSMSK,
            3 => Opcode::BLSI,
            _ => return Err(ErrorKind::UnrecognizedOpcode),
        },
    };

    let vex_reg = Operand::Register(RegSpec::gp(vvvv, 4));
    let reg = Operand::Register(read_G(modrm, 4));

    let instruction = match code {
        VexOperandCode::G_V_E => {
            Instruction::from_operands(opcode, &[reg, vex_reg, read_E(words, modrm, 4)?])
        }
        VexOperandCode::G_E_V => {
            Instruction::from_operands(opcode, &[reg, read_E(words, modrm, 4)?, vex_reg])
        }
        VexOperandCode::V_E => {
            Instruction::from_operands(opcode, &[vex_reg, read_E(words, modrm, 4)?])
        }
        VexOperandCode::G_E_Ib => {
            let rm = read_E(words, modrm, 4)?;
            let imm = read_imm_unsigned(words, 1)?;
            Instruction::from_operands(opcode, &[reg, rm, imm.into()])
        }
    };

    instruction.map_err(|_| ErrorKind::UnrecognizedOpcode)
}
