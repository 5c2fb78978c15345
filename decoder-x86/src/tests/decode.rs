use decoder::{Decodable, ErrorKind, Reader};

use super::{test_decode, test_decode_under, test_invalid, test_invalid_under};
use crate::{
    Address, Arithmetic, Constant, Decoder, Extensions, Instruction, Jump, Nullary, Operand,
    RegSpec, ScaledIndex, Ternary, Unary,
};

fn arith(destination: impl Into<Operand>, source: impl Into<Operand>) -> Arithmetic {
    Arithmetic::new(destination, source)
}

fn ternary(
    destination: impl Into<Operand>,
    source: impl Into<Operand>,
    third: impl Into<Operand>,
) -> Ternary {
    Ternary::new(destination, source, third)
}

fn scaled(index: RegSpec, scale: u8) -> ScaledIndex {
    ScaledIndex::new(index, scale).unwrap()
}

fn dword_at(base: RegSpec) -> Operand {
    Operand::dword_ptr(Address::base(base))
}

fn byte_at(base: RegSpec) -> Operand {
    Operand::byte_ptr(Address::base(base))
}

#[test]
fn push_operand_size() {
    test_decode(&[0x50], Instruction::Push(Unary::new(RegSpec::eax())));
    test_decode(&[0x66, 0x50], Instruction::Push(Unary::new(RegSpec::ax())));
    test_decode(&[0x57], Instruction::Push(Unary::new(RegSpec::edi())));
    test_decode(&[0x5d], Instruction::Pop(Unary::new(RegSpec::ebp())));
    test_decode(&[0x66, 0x66, 0x66, 0x66, 0x50], Instruction::Push(Unary::new(RegSpec::ax())));
    // a fifth `66` is read as the opcode
    test_invalid(&[0x66, 0x66, 0x66, 0x66, 0x66, 0x50]);
}

#[test]
fn modrm_decode() {
    test_decode(&[0x01, 0xc8], Instruction::Add(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x33, 0x08], Instruction::Xor(arith(RegSpec::ecx(), dword_at(RegSpec::eax()))));
    test_decode(
        &[0x8b, 0x45, 0xfc],
        Instruction::Mov(arith(
            RegSpec::eax(),
            Operand::dword_ptr(Address::base(RegSpec::ebp()).with_displacement(-4)),
        )),
    );
    test_decode(
        &[0x8b, 0x85, 0x00, 0x01, 0x00, 0x00],
        Instruction::Mov(arith(
            RegSpec::eax(),
            Operand::dword_ptr(Address::base(RegSpec::ebp()).with_displacement(0x100)),
        )),
    );
    test_decode(
        &[0x8b, 0x05, 0x00, 0x10, 0x00, 0x00],
        Instruction::Mov(arith(RegSpec::eax(), Operand::dword_ptr(Address::absolute(0x1000)))),
    );
    test_decode(
        &[0x66, 0x33, 0x08],
        Instruction::Xor(arith(
            RegSpec::cx(),
            Operand::word_ptr(Address::base(RegSpec::eax())),
        )),
    );
    test_decode(&[0x32, 0x08], Instruction::Xor(arith(RegSpec::cl(), byte_at(RegSpec::eax()))));
    test_decode(&[0x88, 0xe0], Instruction::Mov(arith(RegSpec::al(), RegSpec::ah())));
}

#[test]
fn sib_decode() {
    // no base, no index
    test_decode(
        &[0x8b, 0x04, 0x25, 0x78, 0x56, 0x34, 0x12],
        Instruction::Mov(arith(
            RegSpec::eax(),
            Operand::dword_ptr(Address::absolute(0x12345678)),
        )),
    );
    // no base, scaled index
    test_decode(
        &[0x8b, 0x04, 0x8d, 0x10, 0x00, 0x00, 0x00],
        Instruction::Mov(arith(
            RegSpec::eax(),
            Operand::dword_ptr(
                Address::absolute(0x10).with_index(scaled(RegSpec::ecx(), 4)),
            ),
        )),
    );
    test_decode(
        &[0x8b, 0x44, 0x24, 0x04],
        Instruction::Mov(arith(
            RegSpec::eax(),
            Operand::dword_ptr(Address::base(RegSpec::esp()).with_displacement(4)),
        )),
    );
    test_decode(
        &[0x8b, 0x5c, 0xf5, 0x80],
        Instruction::Mov(arith(
            RegSpec::ebx(),
            Operand::dword_ptr(
                Address::base(RegSpec::ebp())
                    .with_index(scaled(RegSpec::esi(), 8))
                    .with_displacement(-0x80),
            ),
        )),
    );
    test_decode(
        &[0x0f, 0x1f, 0x44, 0x00, 0x00],
        Instruction::LongNop(Unary::new(Operand::dword_ptr(
            Address::base(RegSpec::eax()).with_index(scaled(RegSpec::eax(), 1)),
        ))),
    );
}

#[test]
fn lea() {
    test_decode(
        &[0x8d, 0x04, 0x8b],
        Instruction::Lea(arith(
            RegSpec::eax(),
            Address::base(RegSpec::ebx()).with_index(scaled(RegSpec::ecx(), 4)),
        )),
    );
    test_decode(
        &[0x66, 0x8d, 0x40, 0x01],
        Instruction::Lea(arith(RegSpec::ax(), Address::base(RegSpec::eax()).with_displacement(1))),
    );
    test_invalid(&[0x8d, 0xc0]);
}

#[test]
fn immediates() {
    test_decode(&[0x04, 0x80], Instruction::Add(arith(RegSpec::al(), Constant::byte(0x80))));
    test_decode(
        &[0x05, 0xff, 0xff, 0xff, 0xff],
        Instruction::Add(arith(RegSpec::eax(), Constant::dword(-1))),
    );
    test_decode(
        &[0x66, 0x2d, 0x00, 0x80],
        Instruction::Sub(arith(RegSpec::ax(), Constant::word(-0x8000))),
    );
    test_decode(&[0x80, 0xc1, 0xff], Instruction::Add(arith(RegSpec::cl(), Constant::byte(0xff))));
    test_decode(&[0x83, 0xc0, 0xff], Instruction::Add(arith(RegSpec::eax(), Constant::byte(-1))));
    test_decode(&[0x83, 0xf8, 0x10], Instruction::Cmp(arith(RegSpec::eax(), Constant::byte(0x10))));
    test_decode(
        &[0x81, 0xe9, 0x00, 0x01, 0x00, 0x00],
        Instruction::Sub(arith(RegSpec::ecx(), Constant::dword(0x100))),
    );
    test_decode(
        &[0x66, 0x81, 0xc1, 0x34, 0x12],
        Instruction::Add(arith(RegSpec::cx(), Constant::word(0x1234))),
    );
    test_decode(&[0x6a, 0xff], Instruction::Push(Unary::new(Constant::byte(-1))));
    test_decode(
        &[0x68, 0x78, 0x56, 0x34, 0x12],
        Instruction::Push(Unary::new(Constant::dword(0x12345678))),
    );
    test_decode(&[0xb4, 0x12], Instruction::Mov(arith(RegSpec::ah(), Constant::byte(0x12))));
    test_decode(
        &[0xb8, 0x78, 0x56, 0x34, 0x12],
        Instruction::Mov(arith(RegSpec::eax(), Constant::dword(0x12345678))),
    );
    test_decode(
        &[0x66, 0xbb, 0x34, 0x12],
        Instruction::Mov(arith(RegSpec::bx(), Constant::word(0x1234))),
    );
    test_decode(
        &[0xc6, 0x00, 0x05],
        Instruction::Mov(arith(byte_at(RegSpec::eax()), Constant::byte(5))),
    );
    test_decode(
        &[0xc7, 0x45, 0xfc, 0x01, 0x00, 0x00, 0x00],
        Instruction::Mov(arith(
            Operand::dword_ptr(Address::base(RegSpec::ebp()).with_displacement(-4)),
            Constant::dword(1),
        )),
    );
    test_invalid(&[0xc7, 0xc8, 0x01, 0x00, 0x00, 0x00]);
    test_decode(&[0xcd, 0x80], Instruction::Int(Unary::new(Constant::byte(0x80))));
}

#[test]
fn multiply() {
    test_decode(&[0xf7, 0xe9], Instruction::Imul(Unary::new(RegSpec::ecx())));
    test_decode(&[0x0f, 0xaf, 0xc1], Instruction::Imul2(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(
        &[0x6b, 0xc1, 0x10],
        Instruction::Imul3(ternary(RegSpec::eax(), RegSpec::ecx(), Constant::byte(0x10))),
    );
    test_decode(
        &[0x6b, 0xc1, 0xf0],
        Instruction::Imul3(ternary(RegSpec::eax(), RegSpec::ecx(), Constant::byte(-0x10))),
    );
    test_decode(
        &[0x69, 0xc1, 0x00, 0x01, 0x00, 0x00],
        Instruction::Imul3(ternary(RegSpec::eax(), RegSpec::ecx(), Constant::dword(0x100))),
    );
    test_decode(&[0xf6, 0xe1], Instruction::Mul(Unary::new(RegSpec::cl())));
    test_decode(&[0xf7, 0x30], Instruction::Div(Unary::new(dword_at(RegSpec::eax()))));
    test_decode(&[0xf7, 0xf9], Instruction::Idiv(Unary::new(RegSpec::ecx())));
}

#[test]
fn unary_groups() {
    test_decode(
        &[0xf7, 0xc1, 0x01, 0x00, 0x00, 0x00],
        Instruction::Test(arith(RegSpec::ecx(), Constant::dword(1))),
    );
    test_decode(&[0xf6, 0xc1, 0x01], Instruction::Test(arith(RegSpec::cl(), Constant::byte(1))));
    test_decode(&[0xf6, 0xd0], Instruction::Not(Unary::new(RegSpec::al())));
    test_decode(&[0xf7, 0xd8], Instruction::Neg(Unary::new(RegSpec::eax())));
    test_invalid(&[0xf6, 0xc8]);

    test_decode(&[0x40], Instruction::Inc(Unary::new(RegSpec::eax())));
    test_decode(&[0x4f], Instruction::Dec(Unary::new(RegSpec::edi())));
    test_decode(&[0xfe, 0xc0], Instruction::Inc(Unary::new(RegSpec::al())));
    test_decode(&[0xfe, 0x08], Instruction::Dec(Unary::new(byte_at(RegSpec::eax()))));
    test_invalid(&[0xfe, 0xd0]);
    test_decode(&[0xff, 0xc8], Instruction::Dec(Unary::new(RegSpec::eax())));
    test_decode(&[0xff, 0x30], Instruction::Push(Unary::new(dword_at(RegSpec::eax()))));
    test_decode(&[0xff, 0xd0], Instruction::Call(Jump::new(RegSpec::eax())));
    test_decode(
        &[0xff, 0x25, 0x00, 0x10, 0x00, 0x00],
        Instruction::Jmp(Jump::new(Operand::dword_ptr(Address::absolute(0x1000)))),
    );
    test_decode(&[0x66, 0xff, 0xe0], Instruction::Jmp(Jump::new(RegSpec::ax())));
    test_invalid(&[0xff, 0x18]);
    test_invalid(&[0xff, 0x28]);
    test_invalid(&[0xff, 0xf8]);

    test_decode(&[0x8f, 0xc0], Instruction::Pop(Unary::new(RegSpec::eax())));
    test_invalid(&[0x8f, 0xc8]);
}

#[test]
fn shifts() {
    test_decode(&[0xd1, 0xe0], Instruction::Shl(arith(RegSpec::eax(), Constant::byte(1))));
    test_decode(&[0xd0, 0xc0], Instruction::Rol(arith(RegSpec::al(), Constant::byte(1))));
    test_decode(&[0xc1, 0xf8, 0x02], Instruction::Sar(arith(RegSpec::eax(), Constant::byte(2))));
    test_decode(&[0xc1, 0xf0, 0x02], Instruction::Sal(arith(RegSpec::eax(), Constant::byte(2))));
    test_decode(&[0xd3, 0xe8], Instruction::Shr(arith(RegSpec::eax(), RegSpec::cl())));
    test_decode(&[0xd2, 0xd9], Instruction::Rcr(arith(RegSpec::cl(), RegSpec::cl())));
    test_decode(
        &[0x0f, 0xa4, 0xc8, 0x04],
        Instruction::Shld(ternary(RegSpec::eax(), RegSpec::ecx(), Constant::byte(4))),
    );
    test_decode(
        &[0x0f, 0xad, 0xc8],
        Instruction::Shrd(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::cl())),
    );
}

#[test]
fn data_movement() {
    test_decode(&[0x0f, 0xb6, 0xc1], Instruction::Movzx(arith(RegSpec::eax(), RegSpec::cl())));
    test_decode(&[0x66, 0x0f, 0xb6, 0xc1], Instruction::Movzx(arith(RegSpec::ax(), RegSpec::cl())));
    test_decode(&[0x0f, 0xbf, 0xc1], Instruction::Movsx(arith(RegSpec::eax(), RegSpec::cx())));
    test_decode(
        &[0x0f, 0xbe, 0x00],
        Instruction::Movsx(arith(RegSpec::eax(), byte_at(RegSpec::eax()))),
    );
    test_decode(
        &[0xa1, 0x00, 0x10, 0x00, 0x00],
        Instruction::Mov(arith(RegSpec::eax(), Operand::dword_ptr(Address::absolute(0x1000)))),
    );
    test_decode(
        &[0xa2, 0x00, 0x10, 0x00, 0x00],
        Instruction::Mov(arith(Operand::byte_ptr(Address::absolute(0x1000)), RegSpec::al())),
    );
    test_decode(&[0x91], Instruction::Xchg(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x66, 0x97], Instruction::Xchg(arith(RegSpec::ax(), RegSpec::di())));
    test_decode(&[0x87, 0xca], Instruction::Xchg(arith(RegSpec::edx(), RegSpec::ecx())));
    test_decode(&[0x0f, 0xc9], Instruction::Bswap(Unary::new(RegSpec::ecx())));
    test_invalid(&[0x66, 0x0f, 0xc8]);
    test_decode(
        &[0x0f, 0x38, 0xf0, 0x00],
        Instruction::Movbe(arith(RegSpec::eax(), dword_at(RegSpec::eax()))),
    );
    test_decode(
        &[0x0f, 0x38, 0xf1, 0x08],
        Instruction::Movbe(arith(dword_at(RegSpec::eax()), RegSpec::ecx())),
    );
    test_invalid(&[0x0f, 0x38, 0xf0, 0xc0]);
}

#[test]
fn width_variants() {
    test_decode(&[0x98], Instruction::Cwde(Nullary::new()));
    test_decode(&[0x66, 0x98], Instruction::Cbw(Nullary::new()));
    test_decode(&[0x99], Instruction::Cdq(Nullary::new()));
    test_decode(&[0x66, 0x99], Instruction::Cwd(Nullary::new()));
    test_decode(&[0x60], Instruction::Pushad(Nullary::new()));
    test_decode(&[0x66, 0x60], Instruction::Pusha(Nullary::new()));
    test_decode(&[0x61], Instruction::Popad(Nullary::new()));
    test_decode(&[0x66, 0x61], Instruction::Popa(Nullary::new()));
    test_decode(&[0x9c], Instruction::Pushfd(Nullary::new()));
    test_decode(&[0x66, 0x9d], Instruction::Popf(Nullary::new()));
}

#[test]
fn control_flow() {
    test_decode(&[0x74, 0xfe], Instruction::Jz(Jump::new(Constant::byte(-2))));
    test_decode(&[0x7f, 0x10], Instruction::Jg(Jump::new(Constant::byte(0x10))));
    test_decode(&[0xeb, 0x10], Instruction::Jmp(Jump::new(Constant::byte(0x10))));
    test_decode(
        &[0xe8, 0x00, 0x00, 0x00, 0x00],
        Instruction::Call(Jump::new(Constant::dword(0))),
    );
    test_decode(
        &[0xe9, 0xfb, 0xff, 0xff, 0xff],
        Instruction::Jmp(Jump::new(Constant::dword(-5))),
    );
    test_decode(
        &[0x0f, 0x84, 0x10, 0x00, 0x00, 0x00],
        Instruction::Jz(Jump::new(Constant::dword(0x10))),
    );
    test_decode(
        &[0x66, 0x0f, 0x85, 0x10, 0x00],
        Instruction::Jnz(Jump::new(Constant::word(0x10))),
    );
    test_decode(&[0xe3, 0x05], Instruction::Jecxz(Jump::new(Constant::byte(5))));
    test_decode(&[0x66, 0xe3, 0x05], Instruction::Jecxz(Jump::new(Constant::byte(5))));
    test_decode(&[0xc3], Instruction::Ret(Nullary::new()));
    test_decode(&[0xc2, 0x08, 0x00], Instruction::RetN(Unary::new(Constant::word(8))));
    test_decode(&[0xc2, 0xff, 0xff], Instruction::RetN(Unary::new(Constant::word(0xffff))));
    test_decode(
        &[0xc8, 0x10, 0x00, 0x01],
        Instruction::Enter(arith(Constant::word(0x10), Constant::byte(1))),
    );
    test_decode(&[0xc9], Instruction::Leave(Nullary::new()));
    test_decode(&[0xcc], Instruction::Int3(Nullary::new()));
    test_decode(&[0xce], Instruction::Into(Nullary::new()));
}

#[test]
fn conditional() {
    test_decode(&[0x0f, 0x44, 0xc1], Instruction::Cmovz(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x0f, 0x4c, 0xc1], Instruction::Cmovl(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x0f, 0x94, 0xc0], Instruction::Setz(Unary::new(RegSpec::al())));
    test_decode(&[0x0f, 0x9f, 0xc1], Instruction::Setg(Unary::new(RegSpec::cl())));
    test_decode(&[0x0f, 0x97, 0x00], Instruction::Seta(Unary::new(byte_at(RegSpec::eax()))));
}

#[test]
fn bits() {
    test_decode(&[0x0f, 0xa3, 0xc8], Instruction::Bt(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x0f, 0xab, 0xc8], Instruction::Bts(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(
        &[0x0f, 0xba, 0xe0, 0x05],
        Instruction::Bt(arith(RegSpec::eax(), Constant::byte(5))),
    );
    test_decode(
        &[0x0f, 0xba, 0xf8, 0x1f],
        Instruction::Btc(arith(RegSpec::eax(), Constant::byte(0x1f))),
    );
    test_invalid(&[0x0f, 0xba, 0xc0, 0x05]);
    test_decode(&[0x0f, 0xbc, 0xc1], Instruction::Bsf(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(&[0x0f, 0xbd, 0xc1], Instruction::Bsr(arith(RegSpec::eax(), RegSpec::ecx())));
    test_decode(
        &[0xf3, 0x0f, 0xb8, 0xc1],
        Instruction::Popcnt(arith(RegSpec::eax(), RegSpec::ecx())),
    );
    test_decode(
        &[0x66, 0xf3, 0x0f, 0xb8, 0xc1],
        Instruction::Popcnt(arith(RegSpec::ax(), RegSpec::cx())),
    );
    test_decode(
        &[0xf3, 0x0f, 0xbc, 0xc1],
        Instruction::Tzcnt(arith(RegSpec::eax(), RegSpec::ecx())),
    );
    test_decode(
        &[0xf3, 0x0f, 0xbd, 0xc1],
        Instruction::Lzcnt(arith(RegSpec::eax(), RegSpec::ecx())),
    );
}

#[test]
fn bmi() {
    test_decode(
        &[0xc4, 0xe2, 0x60, 0xf2, 0xc1],
        Instruction::Andn(ternary(RegSpec::eax(), RegSpec::ebx(), RegSpec::ecx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x68, 0xf7, 0xc1],
        Instruction::Bextr(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::edx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x70, 0xf3, 0xc8],
        Instruction::Blsr(arith(RegSpec::ecx(), RegSpec::eax())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x70, 0xf3, 0xd0],
        Instruction::Blsmsk(arith(RegSpec::ecx(), RegSpec::eax())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x70, 0xf3, 0xd8],
        Instruction::Blsi(arith(RegSpec::ecx(), RegSpec::eax())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x70, 0xf3, 0x18],
        Instruction::Blsi(arith(RegSpec::ecx(), dword_at(RegSpec::eax()))),
    );
    test_invalid(&[0xc4, 0xe2, 0x70, 0xf3, 0xc0]);
}

#[test]
fn bmi2() {
    test_decode(
        &[0xc4, 0xe2, 0x68, 0xf5, 0xc1],
        Instruction::Bzhi(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::edx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x63, 0xf5, 0xc1],
        Instruction::Pdep(ternary(RegSpec::eax(), RegSpec::ebx(), RegSpec::ecx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x62, 0xf5, 0xc1],
        Instruction::Pext(ternary(RegSpec::eax(), RegSpec::ebx(), RegSpec::ecx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x63, 0xf6, 0xc1],
        Instruction::Mulx(ternary(RegSpec::eax(), RegSpec::ebx(), RegSpec::ecx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x69, 0xf7, 0xc1],
        Instruction::Shlx(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::edx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x6a, 0xf7, 0xc1],
        Instruction::Sarx(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::edx())),
    );
    test_decode(
        &[0xc4, 0xe2, 0x6b, 0xf7, 0xc1],
        Instruction::Shrx(ternary(RegSpec::eax(), RegSpec::ecx(), RegSpec::edx())),
    );
    test_decode(
        &[0xc4, 0xe3, 0x7b, 0xf0, 0xc1, 0x05],
        Instruction::Rorx(ternary(RegSpec::eax(), RegSpec::ecx(), Constant::byte(5))),
    );
}

#[test]
fn vex_invalid() {
    // operand-size prefix before vex
    test_invalid(&[0x66, 0xc4, 0xe2, 0x60, 0xf2, 0xc1]);
    // `les`
    test_invalid(&[0xc4, 0x00]);
    // vex.l
    test_invalid(&[0xc4, 0xe2, 0x64, 0xf2, 0xc1]);
    // map 0f
    test_invalid(&[0xc4, 0xe1, 0x60, 0xf2, 0xc1]);
    // no such opcode
    test_invalid(&[0xc4, 0xe2, 0x60, 0x00, 0xc1]);
}

#[test]
fn cache_and_fences() {
    test_decode(&[0x0f, 0xae, 0xe8], Instruction::Lfence(Nullary::new()));
    test_decode(&[0x0f, 0xae, 0xef], Instruction::Lfence(Nullary::new()));
    test_decode(&[0x0f, 0xae, 0xf0], Instruction::Mfence(Nullary::new()));
    test_decode(&[0x0f, 0xae, 0xf8], Instruction::Sfence(Nullary::new()));
    test_decode(&[0x0f, 0xae, 0x38], Instruction::Clflush(Unary::new(byte_at(RegSpec::eax()))));
    test_decode(
        &[0x66, 0x0f, 0xae, 0x38],
        Instruction::Clflushopt(Unary::new(byte_at(RegSpec::eax()))),
    );
    test_decode(&[0x66, 0x0f, 0xae, 0x30], Instruction::Clwb(Unary::new(byte_at(RegSpec::eax()))));
    test_invalid(&[0x0f, 0xae, 0x30]);
    test_invalid(&[0x66, 0x0f, 0xae, 0xe8]);

    test_decode(&[0x0f, 0x18, 0x00], Instruction::Prefetchnta(Unary::new(byte_at(RegSpec::eax()))));
    test_decode(&[0x0f, 0x18, 0x08], Instruction::Prefetcht0(Unary::new(byte_at(RegSpec::eax()))));
    test_decode(&[0x0f, 0x18, 0x10], Instruction::Prefetcht1(Unary::new(byte_at(RegSpec::eax()))));
    test_decode(&[0x0f, 0x18, 0x18], Instruction::Prefetcht2(Unary::new(byte_at(RegSpec::eax()))));
    test_decode(&[0x0f, 0x0d, 0x08], Instruction::Prefetchw(Unary::new(byte_at(RegSpec::eax()))));
    test_invalid(&[0x0f, 0x18, 0xc0]);
    test_decode(&[0xf3, 0x90], Instruction::Pause(Nullary::new()));
}

#[test]
fn system() {
    test_decode(&[0x0f, 0xa2], Instruction::Cpuid(Nullary::new()));
    test_decode(&[0x0f, 0x31], Instruction::Rdtsc(Nullary::new()));
    test_decode(&[0x0f, 0x33], Instruction::Rdpmc(Nullary::new()));
    test_decode(&[0x0f, 0x01, 0xf9], Instruction::Rdtscp(Nullary::new()));
    test_invalid(&[0x0f, 0x01, 0xf8]);
    test_decode(&[0x0f, 0xc7, 0xf0], Instruction::Rdrand(Unary::new(RegSpec::eax())));
    test_decode(&[0x66, 0x0f, 0xc7, 0xf8], Instruction::Rdseed(Unary::new(RegSpec::ax())));
    test_invalid(&[0x0f, 0xc7, 0x30]);
    test_decode(&[0x0f, 0x0b], Instruction::Ud2(Nullary::new()));
    test_decode(&[0x90], Instruction::Nop(Nullary::new()));
    test_decode(&[0x0f, 0x1f, 0xc0], Instruction::LongNop(Unary::new(RegSpec::eax())));
    test_decode(&[0xf4], Instruction::Hlt(Nullary::new()));
    test_decode(&[0xf5], Instruction::Cmc(Nullary::new()));
    test_decode(&[0xf8], Instruction::Clc(Nullary::new()));
    test_decode(&[0xf9], Instruction::Stc(Nullary::new()));
    test_decode(&[0xfa], Instruction::Cli(Nullary::new()));
    test_decode(&[0xfb], Instruction::Sti(Nullary::new()));
    test_decode(&[0xfc], Instruction::Cld(Nullary::new()));
    test_decode(&[0xfd], Instruction::Std(Nullary::new()));
    test_decode(&[0x9e], Instruction::Sahf(Nullary::new()));
    test_decode(&[0x9f], Instruction::Lahf(Nullary::new()));
}

#[test]
fn conversions() {
    test_decode(
        &[0xf3, 0x0f, 0x2d, 0xc1],
        Instruction::Cvtss2si(arith(RegSpec::eax(), RegSpec::xmm(1))),
    );
    test_decode(
        &[0xf3, 0x0f, 0x2c, 0x00],
        Instruction::Cvttss2si(arith(RegSpec::eax(), dword_at(RegSpec::eax()))),
    );
    test_decode(
        &[0xf2, 0x0f, 0x2d, 0x00],
        Instruction::Cvtsd2si(arith(
            RegSpec::eax(),
            Operand::Indirect(crate::Indirect::new(8, Address::base(RegSpec::eax()))),
        )),
    );
    test_decode(
        &[0xf2, 0x0f, 0x2c, 0xca],
        Instruction::Cvttsd2si(arith(RegSpec::ecx(), RegSpec::xmm(2))),
    );
}

#[test]
fn unsupported() {
    test_invalid(&[0xf1]);
    // segment override, lock and address size aren't modeled
    test_invalid(&[0x26, 0x01, 0xc8]);
    test_invalid(&[0xf0, 0x01, 0x08]);
    test_invalid(&[0x67, 0x8b, 0x00]);
    test_invalid(&[0x82, 0xc0, 0x01]);
    test_invalid(&[0x0f, 0x3a, 0x0f, 0xc1, 0x01]);
    test_invalid(&[0x0f, 0x38, 0x00, 0xc1]);
    test_invalid(&[0xf3, 0x01]);
    test_invalid(&[0xf2, 0x90]);
    test_invalid(&[0xf3, 0x0f, 0x10, 0xc1]);
    test_invalid(&[0xd8, 0xc1]);
}

#[test]
fn exhausted_input() {
    let decoder = Decoder::default();

    let err = decoder.decode_slice(&[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExhaustedInput);
    assert!(err.is_end_of_stream());

    let err = decoder.decode_slice(&[0x66]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExhaustedInput);
    assert_eq!(err.size(), 1);
    assert!(!err.is_end_of_stream());

    let err = decoder.decode_slice(&[0x05, 0x01]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExhaustedInput);

    let err = decoder.decode_slice(&[0xff]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExhaustedInput);

    let err = decoder.decode_slice(&[0x8b, 0x04]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExhaustedInput);
}

#[test]
fn extension_gating() {
    let minimal = Decoder::minimal();

    // without bmi1 and lzcnt the `f3` is ignored
    test_decode_under(
        &minimal,
        &[0xf3, 0x0f, 0xbc, 0xc1],
        Instruction::Bsf(arith(RegSpec::eax(), RegSpec::ecx())),
    );
    test_decode_under(
        &minimal,
        &[0xf3, 0x0f, 0xbd, 0xc1],
        Instruction::Bsr(arith(RegSpec::eax(), RegSpec::ecx())),
    );
    test_invalid_under(&minimal, &[0xf3, 0x0f, 0xb8, 0xc1]);
    test_invalid_under(&minimal, &[0xc4, 0xe2, 0x60, 0xf2, 0xc1]);
    test_invalid_under(&minimal, &[0x0f, 0x01, 0xf9]);
    test_invalid_under(&minimal, &[0x0f, 0xae, 0xe8]);
    test_invalid_under(&minimal, &[0xf3, 0x0f, 0x2d, 0xc1]);
    test_decode_under(
        &minimal,
        &[0x01, 0xc8],
        Instruction::Add(arith(RegSpec::eax(), RegSpec::ecx())),
    );

    let no_bmi2 = Decoder::default().without(Extensions::BMI2);
    assert!(no_bmi2.bmi1());
    assert!(!no_bmi2.bmi2());
    test_invalid_under(&no_bmi2, &[0xc4, 0xe2, 0x63, 0xf5, 0xc1]);
    test_decode_under(
        &no_bmi2,
        &[0xc4, 0xe2, 0x60, 0xf2, 0xc1],
        Instruction::Andn(ternary(RegSpec::eax(), RegSpec::ebx(), RegSpec::ecx())),
    );

    let popcnt = Decoder::minimal().with_popcnt();
    assert!(popcnt.popcnt());
    test_decode_under(
        &popcnt,
        &[0xf3, 0x0f, 0xb8, 0xc1],
        Instruction::Popcnt(arith(RegSpec::eax(), RegSpec::ecx())),
    );
}

#[test]
fn consumes_exactly_what_it_reads() {
    let data = [0x55, 0x89, 0xe5, 0x83, 0xec, 0x08, 0xc9, 0xc3];
    let decoder = Decoder::default();
    let mut reader = Reader::new(&data[..]);

    let mut widths = Vec::new();
    loop {
        match decoder.decode(&mut reader) {
            Ok((_, width)) => widths.push(width),
            Err(err) => {
                assert!(err.is_end_of_stream());
                break;
            }
        }
    }

    assert_eq!(widths, [1, 2, 3, 1, 1]);
    assert_eq!(reader.total_offset(), data.len());
}
