//! ModRM, SIB, displacement and immediate decoding.

use std::io::Read;

use decoder::{ErrorKind, Reader};

use crate::operand::{Address, Constant, Indirect, Operand, ScaledIndex};
use crate::RegSpec;

#[inline]
pub(super) fn read_modrm<S: Read>(words: &mut Reader<S>) -> Result<u8, ErrorKind> {
    words.next()
}

/// the register in `modrm.reg`.
#[allow(non_snake_case)]
#[inline]
pub(super) fn read_G(modrm: u8, width: u8) -> RegSpec {
    RegSpec::gp((modrm >> 3) & 7, width)
}

/// a register or memory operand of `width` bytes.
#[allow(non_snake_case)]
pub(super) fn read_E<S: Read>(
    words: &mut Reader<S>,
    modrm: u8,
    width: u8,
) -> Result<Operand, ErrorKind> {
    if modrm >= 0b11000000 {
        Ok(Operand::Register(RegSpec::gp(modrm & 7, width)))
    } else {
        Ok(Operand::Indirect(Indirect::new(width, read_M(words, modrm)?)))
    }
}

/// an xmm register, or a scalar of `width` bytes in memory.
#[allow(non_snake_case)]
pub(super) fn read_E_xmm<S: Read>(
    words: &mut Reader<S>,
    modrm: u8,
    width: u8,
) -> Result<Operand, ErrorKind> {
    if modrm >= 0b11000000 {
        Ok(Operand::Register(RegSpec::xmm(modrm & 7)))
    } else {
        Ok(Operand::Indirect(Indirect::new(width, read_M(words, modrm)?)))
    }
}

/// the address of a memory operand. callers reject `mod == 11` before getting here.
#[allow(non_snake_case)]
pub(super) fn read_M<S: Read>(words: &mut Reader<S>, modrm: u8) -> Result<Address, ErrorKind> {
    let modbits = modrm >> 6;
    let mmm = modrm & 7;

    if mmm == 0b100 {
        return read_sib(words, modbits);
    }

    if mmm == 0b101 && modbits == 0b00 {
        return Ok(Address::absolute(read_num(words, 4)? as i32));
    }

    let displacement = read_disp(words, modbits)?;
    Ok(Address::base(RegSpec::gp(mmm, 4)).with_displacement(displacement))
}

#[inline]
fn read_disp<S: Read>(words: &mut Reader<S>, modbits: u8) -> Result<i32, ErrorKind> {
    match modbits {
        0b00 => Ok(0),
        0b01 => Ok(read_num(words, 1)? as i8 as i32),
        _ => Ok(read_num(words, 4)? as i32),
    }
}

fn read_sib<S: Read>(words: &mut Reader<S>, modbits: u8) -> Result<Address, ErrorKind> {
    let sibbyte = words.next()?;
    let base = sibbyte & 7;
    let index = (sibbyte >> 3) & 7;

    // esp can't be an index, so its encoding means there is none.
    let index = (index != 0b100)
        .then(|| ScaledIndex::from_sib_bits(RegSpec::gp(index, 4), sibbyte >> 6));

    let (base, displacement) = if base == 0b101 && modbits == 0b00 {
        (None, read_num(words, 4)? as i32)
    } else {
        (Some(RegSpec::gp(base, 4)), read_disp(words, modbits)?)
    };

    Ok(Address {
        base,
        index,
        displacement,
    })
}

/// a little-endian number of `width` bytes, zero-extended.
pub(super) fn read_num<S: Read>(words: &mut Reader<S>, width: u8) -> Result<u32, ErrorKind> {
    match width {
        1 => words.next().map(|x| x as u32),
        2 => {
            let mut buf = [0u8; 2];
            words.next_n(&mut buf)?;
            Ok(u16::from_le_bytes(buf) as u32)
        }
        _ => {
            let mut buf = [0u8; 4];
            words.next_n(&mut buf)?;
            Ok(u32::from_le_bytes(buf))
        }
    }
}

/// an immediate of `width` bytes. single bytes are unsigned, words and dwords signed.
pub(super) fn read_imm<S: Read>(words: &mut Reader<S>, width: u8) -> Result<Constant, ErrorKind> {
    let num = read_num(words, width)?;
    Ok(match width {
        1 => Constant::byte(num as i64),
        2 => Constant::word(num as u16 as i16 as i64),
        _ => Constant::dword(num as i32 as i64),
    })
}

/// an unsigned immediate of `width` bytes.
pub(super) fn read_imm_unsigned<S: Read>(
    words: &mut Reader<S>,
    width: u8,
) -> Result<Constant, ErrorKind> {
    let num = read_num(words, width)? as i64;
    Ok(match width {
        1 => Constant::byte(num),
        2 => Constant::word(num),
        _ => Constant::dword(num),
    })
}

/// a byte that the processor sign-extends: `disp8`, `rel8`, and the `ib` of `6a`, `6b` and `83`.
pub(super) fn read_imm_signed_byte<S: Read>(words: &mut Reader<S>) -> Result<Constant, ErrorKind> {
    Ok(Constant::byte(read_num(words, 1)? as i8 as i64))
}
