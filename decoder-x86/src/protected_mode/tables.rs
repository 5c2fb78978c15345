//! Opcode maps. Every map answers a byte with an [`OpcodeRecord`]; `Interpretation::Invalid`
//! is the uniform "no entry" answer.

use crate::instruction::{CMOVCC, JCC, SETCC};
use crate::Opcode;

use super::Prefixes;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Interpretation {
    Instruction(Opcode),
    /// the opcode is picked by the reg field of the modrm byte.
    Group(Group),
    /// the byte selects another opcode map.
    Escape,
    Invalid,
}

/// opcode extensions selected by `modrm.reg`, named as in the intel manual's opcode tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Group {
    /// `80`, `81`, `83`: integer arithmetic with an immediate.
    G1,
    /// `8f /0`
    G1A,
    /// shifts and rotates.
    G2,
    /// `f6`, `f7`: test, not, neg and the multiplies and divides.
    G3,
    /// `fe`: byte inc/dec.
    G4,
    /// `ff`: inc/dec, indirect call/jmp and push.
    G5,
    /// `0f 01`
    G7,
    /// `0f ba`: bit tests with an immediate bit index.
    G8,
    /// `0f c7`
    G9,
    /// `c6 /0`, `c7 /0`
    G11,
    /// `0f ae`: cache flushes and fences.
    G15,
    /// `0f 18`: prefetch hints.
    G16,
    /// `0f 0d`
    Prefetch,
    /// `0f 1f`
    Nop,
}

/// how the bytes following an opcode are read into operands.
///
/// names follow the intel manual's operand abbreviations: `E` is a modrm `r/m` operand, `G` the
/// register in `modrm.reg`, `Z` a register in the low three bits of the opcode byte, `I` an
/// immediate, `J` a relative branch target and `O` an absolute offset. the width letter is `b`
/// (byte), `w` (word), `d` (dword) or `v` (word or dword by operand size). a trailing `s` marks a
/// byte that is sign-extended.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum OperandCode {
    Nothing,
    /// a modrm byte that carries no operands.
    ModRM,
    Eb_Gb,
    Ev_Gv,
    Gb_Eb,
    Gv_Ev,
    Gv_Eb,
    Gv_Ew,
    AL_Ib,
    AX_Iv,
    Zv_R,
    Zv_AX,
    Zb_Ib_R,
    Zv_Iv_R,
    Zd_R,
    Ib,
    Ibs,
    Iv,
    Iw,
    Iw_Ib,
    Jbs,
    Jvds,
    Eb,
    Ev,
    Eb_Ib,
    Ev_Ib,
    Ev_Ibs,
    Ev_Iv,
    Eb_1,
    Ev_1,
    Eb_CL,
    Ev_CL,
    Gv_Ev_Iv,
    Gv_Ev_Ibs,
    Ev_Gv_Ib,
    Ev_Gv_CL,
    AL_Ob,
    AX_Ov,
    Ob_AL,
    Ov_AX,
    /// `lea`: an address that is never dereferenced.
    Gv_A,
    Gv_M,
    M_Gv,
    /// a memory-only byte operand.
    Mb,
    /// a register-only operand.
    Rv,
    Gd_Wss,
    Gd_Wsd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) struct OpcodeRecord(pub Interpretation, pub OperandCode);

const INVALID: OpcodeRecord = OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing);
const ESCAPE: OpcodeRecord = OpcodeRecord(Interpretation::Escape, OperandCode::Nothing);

const fn inst(opcode: Opcode, code: OperandCode) -> OpcodeRecord {
    OpcodeRecord(Interpretation::Instruction(opcode), code)
}

const fn group(group: Group, code: OperandCode) -> OpcodeRecord {
    OpcodeRecord(Interpretation::Group(group), code)
}

const ALU_OPCODE_MAP: [Opcode; 8] = [
    Opcode::ADD,
    Opcode::OR,
    Opcode::ADC,
    Opcode::SBB,
    Opcode::AND,
    Opcode::SUB,
    Opcode::XOR,
    Opcode::CMP,
];

const BITWISE_OPCODE_MAP: [Opcode; 8] = [
    Opcode::ROL,
    Opcode::ROR,
    Opcode::RCL,
    Opcode::RCR,
    Opcode::SHL,
    Opcode::SHR,
    Opcode::SAL,
    Opcode::SAR,
];

impl Group {
    /// pick the opcode selected by `modrm`, and the operand code it reads with.
    ///
    /// `code` is the operand code shared by the group, which a few members override.
    pub(super) fn resolve(
        self,
        modrm: u8,
        prefixes: Prefixes,
        code: OperandCode,
    ) -> Option<(Opcode, OperandCode)> {
        let reg = (modrm >> 3) & 7;
        let register_form = modrm >= 0b11000000;
        let operand_size = prefixes.contains(Prefixes::OPERAND_SIZE);

        let opcode = match self {
            Group::G1 => ALU_OPCODE_MAP[reg as usize],
            Group::G1A | Group::G11 if reg != 0 => return None,
            Group::G1A => Opcode::POP,
            Group::G11 => Opcode::MOV,
            Group::G2 => BITWISE_OPCODE_MAP[reg as usize],
            Group::G3 => {
                return match reg {
                    0 if code == OperandCode::Eb => Some((Opcode::TEST, OperandCode::Eb_Ib)),
                    0 => Some((Opcode::TEST, OperandCode::Ev_Iv)),
                    2 => Some((Opcode::NOT, code)),
                    3 => Some((Opcode::NEG, code)),
                    4 => Some((Opcode::MUL, code)),
                    5 => Some((Opcode::IMUL, code)),
                    6 => Some((Opcode::DIV, code)),
                    7 => Some((Opcode::IDIV, code)),
                    _ => None,
                };
            }
            Group::G4 => match reg {
                0 => Opcode::INC,
                1 => Opcode::DEC,
                _ => return None,
            },
            Group::G5 => match reg {
                0 => Opcode::INC,
                1 => Opcode::DEC,
                2 => Opcode::CALL,
                4 => Opcode::JMP,
                6 => Opcode::PUSH,
                // far call/jmp and /7 aren't supported
                _ => return None,
            },
            Group::G7 => match modrm {
                0xf9 => Opcode::RDTSCP,
                _ => return None,
            },
            Group::G8 => match reg {
                4 => Opcode::BT,
                5 => Opcode::BTS,
                6 => Opcode::BTR,
                7 => Opcode::BTC,
                _ => return None,
            },
            Group::G9 => match (register_form, reg) {
                (true, 6) => Opcode::RDRAND,
                (true, 7) => Opcode::RDSEED,
                _ => return None,
            },
            Group::G15 => {
                return match (register_form, reg, operand_size) {
                    (true, 5, false) => Some((Opcode::LFENCE, OperandCode::ModRM)),
                    (true, 6, false) => Some((Opcode::MFENCE, OperandCode::ModRM)),
                    (true, 7, false) => Some((Opcode::SFENCE, OperandCode::ModRM)),
                    (false, 6, true) => Some((Opcode::CLWB, code)),
                    (false, 7, false) => Some((Opcode::CLFLUSH, code)),
                    (false, 7, true) => Some((Opcode::CLFLUSHOPT, code)),
                    _ => None,
                };
            }
            Group::G16 => match (register_form, reg) {
                (false, 0) => Opcode::PREFETCHNTA,
                (false, 1) => Opcode::PREFETCHT0,
                (false, 2) => Opcode::PREFETCHT1,
                (false, 3) => Opcode::PREFETCHT2,
                _ => return None,
            },
            Group::Prefetch => match (register_form, reg) {
                (false, 1) => Opcode::PREFETCHW,
                _ => return None,
            },
            Group::Nop => match reg {
                0 => Opcode::LONGNOP,
                _ => return None,
            },
        };

        Some((opcode, code))
    }
}

pub(super) fn read_0f_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0x01 => group(Group::G7, OperandCode::ModRM),
        0x0b => inst(Opcode::UD2, OperandCode::Nothing),
        0x0d => group(Group::Prefetch, OperandCode::Mb),
        0x18 => group(Group::G16, OperandCode::Mb),
        0x1f => group(Group::Nop, OperandCode::Ev),
        0x31 => inst(Opcode::RDTSC, OperandCode::Nothing),
        0x33 => inst(Opcode::RDPMC, OperandCode::Nothing),
        0x38 => ESCAPE,
        0x40..=0x4f => inst(CMOVCC[(opcode & 0xf) as usize], OperandCode::Gv_Ev),
        0x80..=0x8f => inst(JCC[(opcode & 0xf) as usize], OperandCode::Jvds),
        0x90..=0x9f => inst(SETCC[(opcode & 0xf) as usize], OperandCode::Eb),
        0xa2 => inst(Opcode::CPUID, OperandCode::Nothing),
        0xa3 => inst(Opcode::BT, OperandCode::Ev_Gv),
        0xa4 => inst(Opcode::SHLD, OperandCode::Ev_Gv_Ib),
        0xa5 => inst(Opcode::SHLD, OperandCode::Ev_Gv_CL),
        0xab => inst(Opcode::BTS, OperandCode::Ev_Gv),
        0xac => inst(Opcode::SHRD, OperandCode::Ev_Gv_Ib),
        0xad => inst(Opcode::SHRD, OperandCode::Ev_Gv_CL),
        0xae => group(Group::G15, OperandCode::Mb),
        0xaf => inst(Opcode::IMUL2, OperandCode::Gv_Ev),
        0xb3 => inst(Opcode::BTR, OperandCode::Ev_Gv),
        0xb6 => inst(Opcode::MOVZX, OperandCode::Gv_Eb),
        0xb7 => inst(Opcode::MOVZX, OperandCode::Gv_Ew),
        0xba => group(Group::G8, OperandCode::Ev_Ib),
        0xbb => inst(Opcode::BTC, OperandCode::Ev_Gv),
        0xbc => inst(Opcode::BSF, OperandCode::Gv_Ev),
        0xbd => inst(Opcode::BSR, OperandCode::Gv_Ev),
        0xbe => inst(Opcode::MOVSX, OperandCode::Gv_Eb),
        0xbf => inst(Opcode::MOVSX, OperandCode::Gv_Ew),
        0xc7 => group(Group::G9, OperandCode::Rv),
        0xc8..=0xcf => inst(Opcode::BSWAP, OperandCode::Zd_R),
        _ => INVALID,
    }
}

pub(super) fn read_0f38_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0xf0 => inst(Opcode::MOVBE, OperandCode::Gv_M),
        0xf1 => inst(Opcode::MOVBE, OperandCode::M_Gv),
        _ => INVALID,
    }
}

/// the `f3` map; `f3 90` is `pause`, everything else goes through `f3 0f`.
pub(super) fn read_f3_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0x0f => ESCAPE,
        0x90 => inst(Opcode::PAUSE, OperandCode::Nothing),
        _ => INVALID,
    }
}

pub(super) fn read_f30f_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0x2c => inst(Opcode::CVTTSS2SI, OperandCode::Gd_Wss),
        0x2d => inst(Opcode::CVTSS2SI, OperandCode::Gd_Wss),
        0xb8 => inst(Opcode::POPCNT, OperandCode::Gv_Ev),
        0xbc => inst(Opcode::TZCNT, OperandCode::Gv_Ev),
        0xbd => inst(Opcode::LZCNT, OperandCode::Gv_Ev),
        _ => INVALID,
    }
}

pub(super) fn read_f2_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0x0f => ESCAPE,
        _ => INVALID,
    }
}

pub(super) fn read_f20f_opcode(opcode: u8) -> OpcodeRecord {
    match opcode {
        0x2c => inst(Opcode::CVTTSD2SI, OperandCode::Gd_Wsd),
        0x2d => inst(Opcode::CVTSD2SI, OperandCode::Gd_Wsd),
        _ => INVALID,
    }
}

#[rustfmt::skip]
pub(super) const OPCODES: [OpcodeRecord; 256] = [
    // 0x00
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADD), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::OR), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Escape, OperandCode::Nothing),
    // 0x10
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::ADC), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::SBB), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0x20
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::AND), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::SUB), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0x30
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::XOR), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMP), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0x40
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::INC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::DEC), OperandCode::Zv_R),
    // 0x50
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::POP), OperandCode::Zv_R),
    // 0x60
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSHAD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::POPAD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Iv),
    OpcodeRecord(Interpretation::Instruction(Opcode::IMUL3), OperandCode::Gv_Ev_Iv),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSH), OperandCode::Ibs),
    OpcodeRecord(Interpretation::Instruction(Opcode::IMUL3), OperandCode::Gv_Ev_Ibs),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0x70
    OpcodeRecord(Interpretation::Instruction(Opcode::JO), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JNO), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JB), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JAE), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JZ), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JNZ), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JBE), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JA), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JS), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JNS), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JP), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JNP), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JL), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JGE), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JLE), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Instruction(Opcode::JG), OperandCode::Jbs),
    // 0x80
    OpcodeRecord(Interpretation::Group(Group::G1), OperandCode::Eb_Ib),
    OpcodeRecord(Interpretation::Group(Group::G1), OperandCode::Ev_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Group(Group::G1), OperandCode::Ev_Ibs),
    OpcodeRecord(Interpretation::Instruction(Opcode::TEST), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::TEST), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Eb_Gb),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Ev_Gv),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Gb_Eb),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Gv_Ev),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::LEA), OperandCode::Gv_A),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Group(Group::G1A), OperandCode::Ev),
    // 0x90
    OpcodeRecord(Interpretation::Instruction(Opcode::NOP), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::XCHG), OperandCode::Zv_AX),
    OpcodeRecord(Interpretation::Instruction(Opcode::CWDE), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CDQ), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::PUSHFD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::POPFD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::SAHF), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::LAHF), OperandCode::Nothing),
    // 0xa0
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::AL_Ob),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::AX_Ov),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Ob_AL),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Ov_AX),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::TEST), OperandCode::AL_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::TEST), OperandCode::AX_Iv),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0xb0
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zb_Ib_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    OpcodeRecord(Interpretation::Instruction(Opcode::MOV), OperandCode::Zv_Iv_R),
    // 0xc0
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Eb_Ib),
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Ev_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::RETN), OperandCode::Iw),
    OpcodeRecord(Interpretation::Instruction(Opcode::RET), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Escape, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Group(Group::G11), OperandCode::Eb_Ib),
    OpcodeRecord(Interpretation::Group(Group::G11), OperandCode::Ev_Iv),
    OpcodeRecord(Interpretation::Instruction(Opcode::ENTER), OperandCode::Iw_Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::LEAVE), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::INT3), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::INT), OperandCode::Ib),
    OpcodeRecord(Interpretation::Instruction(Opcode::INTO), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0xd0
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Eb_1),
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Ev_1),
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Eb_CL),
    OpcodeRecord(Interpretation::Group(Group::G2), OperandCode::Ev_CL),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0xe0
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::JECXZ), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CALL), OperandCode::Jvds),
    OpcodeRecord(Interpretation::Instruction(Opcode::JMP), OperandCode::Jvds),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::JMP), OperandCode::Jbs),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    // 0xf0
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Invalid, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Escape, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Escape, OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::HLT), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CMC), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Group(Group::G3), OperandCode::Eb),
    OpcodeRecord(Interpretation::Group(Group::G3), OperandCode::Ev),
    OpcodeRecord(Interpretation::Instruction(Opcode::CLC), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::STC), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CLI), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::STI), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::CLD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Instruction(Opcode::STD), OperandCode::Nothing),
    OpcodeRecord(Interpretation::Group(Group::G4), OperandCode::Eb),
    OpcodeRecord(Interpretation::Group(Group::G5), OperandCode::Ev),
];
