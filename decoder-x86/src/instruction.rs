//! Instructions and the operand shapes they share.
//!
//! Each supported mnemonic is one variant of [`Instruction`], carrying the form its operands
//! take. The form fixes the arity: an `add` always has a destination and a source, a `ret` never
//! has operands. [`Opcode`] is the fieldless tag of each variant and knows its form's [`Shape`].

use crate::{Operand, RangeError};

/// the operand layout shared by a family of instructions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// no operands, such as `ret` or `cpuid`.
    Nullary,
    /// a single operand, such as `push eax` or `setz al`.
    Unary,
    /// a branch target, such as `jmp` or `call`.
    Jump,
    /// a destination and a source, such as `add` or `mov`.
    Arithmetic,
    /// a destination and two sources, such as `imul eax, ecx, 7` or `andn`.
    Ternary,
}

impl Shape {
    pub fn arity(&self) -> usize {
        match self {
            Shape::Nullary => 0,
            Shape::Unary | Shape::Jump => 1,
            Shape::Arithmetic => 2,
            Shape::Ternary => 3,
        }
    }
}

/// behaviour common to every operand form.
pub trait Form: Sized {
    const SHAPE: Shape;

    fn operands(&self) -> &[Operand];

    fn from_operands(operands: &[Operand]) -> Option<Self>;

    fn comment(&self) -> Option<&str>;

    fn set_comment(&mut self, comment: Option<String>);
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Nullary {
    pub comment: Option<String>,
}

impl Nullary {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unary {
    operands: [Operand; 1],
    pub comment: Option<String>,
}

impl Unary {
    pub fn new(operand: impl Into<Operand>) -> Self {
        Self {
            operands: [operand.into()],
            comment: None,
        }
    }

    pub fn operand(&self) -> &Operand {
        &self.operands[0]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jump {
    operands: [Operand; 1],
    pub comment: Option<String>,
}

impl Jump {
    pub fn new(target: impl Into<Operand>) -> Self {
        Self {
            operands: [target.into()],
            comment: None,
        }
    }

    pub fn target(&self) -> &Operand {
        &self.operands[0]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arithmetic {
    operands: [Operand; 2],
    pub comment: Option<String>,
}

impl Arithmetic {
    pub fn new(destination: impl Into<Operand>, source: impl Into<Operand>) -> Self {
        Self {
            operands: [destination.into(), source.into()],
            comment: None,
        }
    }

    pub fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn source(&self) -> &Operand {
        &self.operands[1]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ternary {
    operands: [Operand; 3],
    pub comment: Option<String>,
}

impl Ternary {
    pub fn new(
        destination: impl Into<Operand>,
        source: impl Into<Operand>,
        third: impl Into<Operand>,
    ) -> Self {
        Self {
            operands: [destination.into(), source.into(), third.into()],
            comment: None,
        }
    }

    pub fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn source(&self) -> &Operand {
        &self.operands[1]
    }

    pub fn third(&self) -> &Operand {
        &self.operands[2]
    }
}

macro_rules! form {
    ($form:ident, $shape:ident, $arity:literal) => {
        impl Form for $form {
            const SHAPE: Shape = Shape::$shape;

            fn operands(&self) -> &[Operand] {
                &self.operands
            }

            fn from_operands(operands: &[Operand]) -> Option<Self> {
                let operands: [Operand; $arity] = operands.try_into().ok()?;
                Some(Self {
                    operands,
                    comment: None,
                })
            }

            fn comment(&self) -> Option<&str> {
                self.comment.as_deref()
            }

            fn set_comment(&mut self, comment: Option<String>) {
                self.comment = comment;
            }
        }
    };
}

form!(Unary, Unary, 1);
form!(Jump, Jump, 1);
form!(Arithmetic, Arithmetic, 2);
form!(Ternary, Ternary, 3);

impl Form for Nullary {
    const SHAPE: Shape = Shape::Nullary;

    fn operands(&self) -> &[Operand] {
        &[]
    }

    fn from_operands(operands: &[Operand]) -> Option<Self> {
        operands.is_empty().then(Nullary::new)
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }
}

macro_rules! instructions {
    ($($variant:ident($form:ident) = $opcode:ident => $name:literal,)*) => {
        /// the mnemonic of an [`Instruction`], without its operands.
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub enum Opcode {
            $($opcode,)*
        }

        impl Opcode {
            /// every opcode, in declaration order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$opcode,)*];

            /// the operand layout every instruction with this opcode has.
            pub fn shape(&self) -> Shape {
                match self {
                    $(Opcode::$opcode => <$form as Form>::SHAPE,)*
                }
            }

            /// the lowercase mnemonic. forms of one mnemonic that take different operand counts
            /// (`imul`, `ret`, `nop`) share a name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Opcode::$opcode => $name,)*
                }
            }
        }

        /// an `x86` instruction.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Instruction {
            $($variant($form),)*
        }

        impl Instruction {
            /// get the `Opcode` of this instruction.
            pub fn opcode(&self) -> Opcode {
                match self {
                    $(Instruction::$variant(_) => Opcode::$opcode,)*
                }
            }

            /// the operands of this instruction, in encoding-agnostic intel order.
            pub fn operands(&self) -> &[Operand] {
                match self {
                    $(Instruction::$variant(form) => form.operands(),)*
                }
            }

            pub fn comment(&self) -> Option<&str> {
                match self {
                    $(Instruction::$variant(form) => form.comment(),)*
                }
            }

            pub fn set_comment(&mut self, comment: Option<String>) {
                match self {
                    $(Instruction::$variant(form) => form.set_comment(comment),)*
                }
            }

            /// build the instruction for `opcode` out of a list of operands. fails if the
            /// number of operands doesn't match the opcode's shape.
            pub fn from_operands(opcode: Opcode, operands: &[Operand]) -> Result<Self, RangeError> {
                let instruction = match opcode {
                    $(Opcode::$opcode => <$form as Form>::from_operands(operands).map(Instruction::$variant),)*
                };

                instruction.ok_or(RangeError::Arity {
                    opcode,
                    expected: opcode.shape().arity(),
                    found: operands.len(),
                })
            }
        }
    };
}

instructions! {
    // integer arithmetic and logic
    Add(Arithmetic) = ADD => "add",
    Or(Arithmetic) = OR => "or",
    Adc(Arithmetic) = ADC => "adc",
    Sbb(Arithmetic) = SBB => "sbb",
    And(Arithmetic) = AND => "and",
    Sub(Arithmetic) = SUB => "sub",
    Xor(Arithmetic) = XOR => "xor",
    Cmp(Arithmetic) = CMP => "cmp",
    Test(Arithmetic) = TEST => "test",
    Inc(Unary) = INC => "inc",
    Dec(Unary) = DEC => "dec",
    Not(Unary) = NOT => "not",
    Neg(Unary) = NEG => "neg",
    Mul(Unary) = MUL => "mul",
    Imul(Unary) = IMUL => "imul",
    Imul2(Arithmetic) = IMUL2 => "imul",
    Imul3(Ternary) = IMUL3 => "imul",
    Div(Unary) = DIV => "div",
    Idiv(Unary) = IDIV => "idiv",

    // data movement
    Mov(Arithmetic) = MOV => "mov",
    Movzx(Arithmetic) = MOVZX => "movzx",
    Movsx(Arithmetic) = MOVSX => "movsx",
    Movbe(Arithmetic) = MOVBE => "movbe",
    Lea(Arithmetic) = LEA => "lea",
    Xchg(Arithmetic) = XCHG => "xchg",
    Bswap(Unary) = BSWAP => "bswap",
    Cbw(Nullary) = CBW => "cbw",
    Cwde(Nullary) = CWDE => "cwde",
    Cwd(Nullary) = CWD => "cwd",
    Cdq(Nullary) = CDQ => "cdq",

    // stack
    Push(Unary) = PUSH => "push",
    Pop(Unary) = POP => "pop",
    Pusha(Nullary) = PUSHA => "pusha",
    Pushad(Nullary) = PUSHAD => "pushad",
    Popa(Nullary) = POPA => "popa",
    Popad(Nullary) = POPAD => "popad",
    Pushf(Nullary) = PUSHF => "pushf",
    Pushfd(Nullary) = PUSHFD => "pushfd",
    Popf(Nullary) = POPF => "popf",
    Popfd(Nullary) = POPFD => "popfd",
    Enter(Arithmetic) = ENTER => "enter",
    Leave(Nullary) = LEAVE => "leave",

    // control flow
    Jmp(Jump) = JMP => "jmp",
    Call(Jump) = CALL => "call",
    Ret(Nullary) = RET => "ret",
    RetN(Unary) = RETN => "ret",
    Int(Unary) = INT => "int",
    Int3(Nullary) = INT3 => "int3",
    Into(Nullary) = INTO => "into",
    Jecxz(Jump) = JECXZ => "jecxz",
    Jo(Jump) = JO => "jo",
    Jno(Jump) = JNO => "jno",
    Jb(Jump) = JB => "jb",
    Jae(Jump) = JAE => "jae",
    Jz(Jump) = JZ => "jz",
    Jnz(Jump) = JNZ => "jnz",
    Jbe(Jump) = JBE => "jbe",
    Ja(Jump) = JA => "ja",
    Js(Jump) = JS => "js",
    Jns(Jump) = JNS => "jns",
    Jp(Jump) = JP => "jp",
    Jnp(Jump) = JNP => "jnp",
    Jl(Jump) = JL => "jl",
    Jge(Jump) = JGE => "jge",
    Jle(Jump) = JLE => "jle",
    Jg(Jump) = JG => "jg",

    // shifts and rotates
    Rol(Arithmetic) = ROL => "rol",
    Ror(Arithmetic) = ROR => "ror",
    Rcl(Arithmetic) = RCL => "rcl",
    Rcr(Arithmetic) = RCR => "rcr",
    Shl(Arithmetic) = SHL => "shl",
    Shr(Arithmetic) = SHR => "shr",
    Sal(Arithmetic) = SAL => "sal",
    Sar(Arithmetic) = SAR => "sar",
    Shld(Ternary) = SHLD => "shld",
    Shrd(Ternary) = SHRD => "shrd",
    Shlx(Ternary) = SHLX => "shlx",
    Shrx(Ternary) = SHRX => "shrx",
    Sarx(Ternary) = SARX => "sarx",
    Rorx(Ternary) = RORX => "rorx",

    // bit manipulation
    Bt(Arithmetic) = BT => "bt",
    Bts(Arithmetic) = BTS => "bts",
    Btr(Arithmetic) = BTR => "btr",
    Btc(Arithmetic) = BTC => "btc",
    Bsf(Arithmetic) = BSF => "bsf",
    Bsr(Arithmetic) = BSR => "bsr",
    Popcnt(Arithmetic) = POPCNT => "popcnt",
    Lzcnt(Arithmetic) = LZCNT => "lzcnt",
    Tzcnt(Arithmetic) = TZCNT => "tzcnt",
    Andn(Ternary) = ANDN => "andn",
    Bextr(Ternary) = BEXTR => "bextr",
    Blsi(Arithmetic) = BLSI => "blsi",
    Blsmsk(Arithmetic) = BLSMSK => "blsmsk",
    Blsr(Arithmetic) = BLSR => "blsr",
    Bzhi(Ternary) = BZHI => "bzhi",
    Pdep(Ternary) = PDEP => "pdep",
    Pext(Ternary) = PEXT => "pext",
    Mulx(Ternary) = MULX => "mulx",

    // conditional moves
    Cmovo(Arithmetic) = CMOVO => "cmovo",
    Cmovno(Arithmetic) = CMOVNO => "cmovno",
    Cmovb(Arithmetic) = CMOVB => "cmovb",
    Cmovae(Arithmetic) = CMOVAE => "cmovae",
    Cmovz(Arithmetic) = CMOVZ => "cmovz",
    Cmovnz(Arithmetic) = CMOVNZ => "cmovnz",
    Cmovbe(Arithmetic) = CMOVBE => "cmovbe",
    Cmova(Arithmetic) = CMOVA => "cmova",
    Cmovs(Arithmetic) = CMOVS => "cmovs",
    Cmovns(Arithmetic) = CMOVNS => "cmovns",
    Cmovp(Arithmetic) = CMOVP => "cmovp",
    Cmovnp(Arithmetic) = CMOVNP => "cmovnp",
    Cmovl(Arithmetic) = CMOVL => "cmovl",
    Cmovge(Arithmetic) = CMOVGE => "cmovge",
    Cmovle(Arithmetic) = CMOVLE => "cmovle",
    Cmovg(Arithmetic) = CMOVG => "cmovg",

    // conditional sets
    Seto(Unary) = SETO => "seto",
    Setno(Unary) = SETNO => "setno",
    Setb(Unary) = SETB => "setb",
    Setae(Unary) = SETAE => "setae",
    Setz(Unary) = SETZ => "setz",
    Setnz(Unary) = SETNZ => "setnz",
    Setbe(Unary) = SETBE => "setbe",
    Seta(Unary) = SETA => "seta",
    Sets(Unary) = SETS => "sets",
    Setns(Unary) = SETNS => "setns",
    Setp(Unary) = SETP => "setp",
    Setnp(Unary) = SETNP => "setnp",
    Setl(Unary) = SETL => "setl",
    Setge(Unary) = SETGE => "setge",
    Setle(Unary) = SETLE => "setle",
    Setg(Unary) = SETG => "setg",

    // cache control, fences and prefetches
    Clflush(Unary) = CLFLUSH => "clflush",
    Clflushopt(Unary) = CLFLUSHOPT => "clflushopt",
    Clwb(Unary) = CLWB => "clwb",
    Lfence(Nullary) = LFENCE => "lfence",
    Mfence(Nullary) = MFENCE => "mfence",
    Sfence(Nullary) = SFENCE => "sfence",
    Prefetchnta(Unary) = PREFETCHNTA => "prefetchnta",
    Prefetcht0(Unary) = PREFETCHT0 => "prefetcht0",
    Prefetcht1(Unary) = PREFETCHT1 => "prefetcht1",
    Prefetcht2(Unary) = PREFETCHT2 => "prefetcht2",
    Prefetchw(Unary) = PREFETCHW => "prefetchw",
    Pause(Nullary) = PAUSE => "pause",

    // processor identification and counters
    Cpuid(Nullary) = CPUID => "cpuid",
    Rdtsc(Nullary) = RDTSC => "rdtsc",
    Rdtscp(Nullary) = RDTSCP => "rdtscp",
    Rdpmc(Nullary) = RDPMC => "rdpmc",
    Rdrand(Unary) = RDRAND => "rdrand",
    Rdseed(Unary) = RDSEED => "rdseed",

    // scalar floating point to integer conversions
    Cvtss2si(Arithmetic) = CVTSS2SI => "cvtss2si",
    Cvttss2si(Arithmetic) = CVTTSS2SI => "cvttss2si",
    Cvtsd2si(Arithmetic) = CVTSD2SI => "cvtsd2si",
    Cvttsd2si(Arithmetic) = CVTTSD2SI => "cvttsd2si",

    // everything else
    Nop(Nullary) = NOP => "nop",
    LongNop(Unary) = LONGNOP => "nop",
    Ud2(Nullary) = UD2 => "ud2",
    Hlt(Nullary) = HLT => "hlt",
    Clc(Nullary) = CLC => "clc",
    Stc(Nullary) = STC => "stc",
    Cmc(Nullary) = CMC => "cmc",
    Cld(Nullary) = CLD => "cld",
    Std(Nullary) = STD => "std",
    Cli(Nullary) = CLI => "cli",
    Sti(Nullary) = STI => "sti",
    Sahf(Nullary) = SAHF => "sahf",
    Lahf(Nullary) = LAHF => "lahf",
}

/// the condition for a conditional instruction.
///
/// these are only obtained through [`Opcode::condition()`]:
/// ```
/// use x86::{Opcode, ConditionCode};
///
/// assert_eq!(Opcode::JB.condition(), Some(ConditionCode::B));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    O,
    NO,
    B,
    AE,
    Z,
    NZ,
    BE,
    A,
    S,
    NS,
    P,
    NP,
    L,
    GE,
    LE,
    G,
}

/// condition codes in the order of the low nibble of `Jcc`, `SETcc` and `CMOVcc` opcodes.
pub(crate) const CONDITIONS: [ConditionCode; 16] = [
    ConditionCode::O,
    ConditionCode::NO,
    ConditionCode::B,
    ConditionCode::AE,
    ConditionCode::Z,
    ConditionCode::NZ,
    ConditionCode::BE,
    ConditionCode::A,
    ConditionCode::S,
    ConditionCode::NS,
    ConditionCode::P,
    ConditionCode::NP,
    ConditionCode::L,
    ConditionCode::GE,
    ConditionCode::LE,
    ConditionCode::G,
];

pub(crate) const JCC: [Opcode; 16] = [
    Opcode::JO,
    Opcode::JNO,
    Opcode::JB,
    Opcode::JAE,
    Opcode::JZ,
    Opcode::JNZ,
    Opcode::JBE,
    Opcode::JA,
    Opcode::JS,
    Opcode::JNS,
    Opcode::JP,
    Opcode::JNP,
    Opcode::JL,
    Opcode::JGE,
    Opcode::JLE,
    Opcode::JG,
];

pub(crate) const SETCC: [Opcode; 16] = [
    Opcode::SETO,
    Opcode::SETNO,
    Opcode::SETB,
    Opcode::SETAE,
    Opcode::SETZ,
    Opcode::SETNZ,
    Opcode::SETBE,
    Opcode::SETA,
    Opcode::SETS,
    Opcode::SETNS,
    Opcode::SETP,
    Opcode::SETNP,
    Opcode::SETL,
    Opcode::SETGE,
    Opcode::SETLE,
    Opcode::SETG,
];

pub(crate) const CMOVCC: [Opcode; 16] = [
    Opcode::CMOVO,
    Opcode::CMOVNO,
    Opcode::CMOVB,
    Opcode::CMOVAE,
    Opcode::CMOVZ,
    Opcode::CMOVNZ,
    Opcode::CMOVBE,
    Opcode::CMOVA,
    Opcode::CMOVS,
    Opcode::CMOVNS,
    Opcode::CMOVP,
    Opcode::CMOVNP,
    Opcode::CMOVL,
    Opcode::CMOVGE,
    Opcode::CMOVLE,
    Opcode::CMOVG,
];

impl Opcode {
    /// check if the instruction is one of x86's sixteen conditional jump instructions.
    pub fn is_jcc(&self) -> bool {
        JCC.contains(self)
    }

    /// check if the instruction is one of x86's sixteen conditional move instructions.
    pub fn is_cmovcc(&self) -> bool {
        CMOVCC.contains(self)
    }

    /// check if the instruction is one of x86's sixteen conditional set instructions.
    pub fn is_setcc(&self) -> bool {
        SETCC.contains(self)
    }

    /// get the [`ConditionCode`] for this instruction, if it is in fact conditional. x86's
    /// conditional instructions are `Jcc`, `CMOVcc`, and `SETcc`.
    pub fn condition(&self) -> Option<ConditionCode> {
        [&JCC, &SETCC, &CMOVCC]
            .iter()
            .find_map(|family| family.iter().position(|opc| opc == self))
            .map(|idx| CONDITIONS[idx])
    }
}

impl Instruction {
    /// the operand layout of this instruction.
    pub fn shape(&self) -> Shape {
        self.opcode().shape()
    }

    /// a conditional jump to `target`, taken on `condition`.
    pub fn jcc(condition: ConditionCode, target: impl Into<Operand>) -> Self {
        let jump = Jump::new(target);
        match condition {
            ConditionCode::O => Instruction::Jo(jump),
            ConditionCode::NO => Instruction::Jno(jump),
            ConditionCode::B => Instruction::Jb(jump),
            ConditionCode::AE => Instruction::Jae(jump),
            ConditionCode::Z => Instruction::Jz(jump),
            ConditionCode::NZ => Instruction::Jnz(jump),
            ConditionCode::BE => Instruction::Jbe(jump),
            ConditionCode::A => Instruction::Ja(jump),
            ConditionCode::S => Instruction::Js(jump),
            ConditionCode::NS => Instruction::Jns(jump),
            ConditionCode::P => Instruction::Jp(jump),
            ConditionCode::NP => Instruction::Jnp(jump),
            ConditionCode::L => Instruction::Jl(jump),
            ConditionCode::GE => Instruction::Jge(jump),
            ConditionCode::LE => Instruction::Jle(jump),
            ConditionCode::G => Instruction::Jg(jump),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.set_comment(Some(comment.into()));
        self
    }

    /// get the `Operand` at the provided index, if there is one.
    pub fn operand(&self, idx: usize) -> Option<&Operand> {
        self.operands().get(idx)
    }

    /// get the number of operands in this instruction.
    pub fn operand_count(&self) -> usize {
        self.operands().len()
    }
}
