//! The register catalogue.
//!
//! Every register is a [`RegSpec`], a copyable `(bank, number)` handle into a static table that
//! records the register's name, width and the narrower registers it contains. Handles compare by
//! identity; nothing here allocates.

use std::fmt;

/// an `x86` register, identified by its bank and its number within that bank.
///
/// ```
/// use x86::RegSpec;
///
/// assert_eq!(RegSpec::ecx().num(), 1);
/// assert_eq!(RegSpec::ecx().width(), 4);
/// assert_eq!(RegSpec::eax().contained(), &[RegSpec::ax()]);
/// ```
#[derive(Copy, Clone, PartialOrd, Ord, Eq, PartialEq, Hash)]
pub struct RegSpec {
    num: u8,
    bank: RegisterBank,
}

#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub(crate) enum RegisterBank {
    D,
    W,
    B,
    /// low bytes of the stack and index registers, never reachable from a 3-bit field.
    L,
    X,
}

/// an `x86` register class: `dword`, `word`, `byte`, `low byte` or `xmm`.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct RegisterClass {
    kind: RegisterBank,
}

pub mod register_class {
    use super::{RegisterBank, RegisterClass};

    /// dword registers: `eax` through `edi`.
    pub const D: RegisterClass = RegisterClass { kind: RegisterBank::D };
    /// word registers: `ax` through `di`.
    pub const W: RegisterClass = RegisterClass { kind: RegisterBank::W };
    /// byte registers: `al` through `bh`.
    pub const B: RegisterClass = RegisterClass { kind: RegisterBank::B };
    /// byte registers aliasing the stack and index registers: `spl` through `dil`.
    pub const L: RegisterClass = RegisterClass { kind: RegisterBank::L };
    /// sse registers: `xmm0` through `xmm7`.
    pub const X: RegisterClass = RegisterClass { kind: RegisterBank::X };
}

impl RegisterClass {
    /// return a human-friendly name for this register class
    pub fn name(&self) -> &'static str {
        match self.kind {
            RegisterBank::D => "dword",
            RegisterBank::W => "word",
            RegisterBank::B => "byte",
            RegisterBank::L => "low byte",
            RegisterBank::X => "xmm",
        }
    }

    /// return the size of this register class, in bytes
    pub fn width(&self) -> u8 {
        match self.kind {
            RegisterBank::D => 4,
            RegisterBank::W => 2,
            RegisterBank::B | RegisterBank::L => 1,
            RegisterBank::X => 16,
        }
    }
}

impl RegisterBank {
    fn table(self) -> &'static [RegisterInfo] {
        match self {
            RegisterBank::D => &DWORD,
            RegisterBank::W => &WORD,
            RegisterBank::B => &BYTE,
            RegisterBank::L => &LOW_BYTE,
            RegisterBank::X => &XMM,
        }
    }
}

struct RegisterInfo {
    name: &'static str,
    contained: &'static [RegSpec],
}

macro_rules! register {
    ($bank:ident, $name:ident => $num:expr, $($tail:tt)+) => {
        #[inline]
        pub const fn $name() -> RegSpec {
            RegSpec { bank: RegisterBank::$bank, num: $num }
        }

        register!($bank, $($tail)*);
    };
    ($bank:ident, $name:ident => $num:expr) => {
        #[inline]
        pub const fn $name() -> RegSpec {
            RegSpec { bank: RegisterBank::$bank, num: $num }
        }
    };
}

static DWORD: [RegisterInfo; 8] = [
    RegisterInfo { name: "eax", contained: &[RegSpec::ax()] },
    RegisterInfo { name: "ecx", contained: &[RegSpec::cx()] },
    RegisterInfo { name: "edx", contained: &[RegSpec::dx()] },
    RegisterInfo { name: "ebx", contained: &[RegSpec::bx()] },
    RegisterInfo { name: "esp", contained: &[RegSpec::sp()] },
    RegisterInfo { name: "ebp", contained: &[RegSpec::bp()] },
    RegisterInfo { name: "esi", contained: &[RegSpec::si()] },
    RegisterInfo { name: "edi", contained: &[RegSpec::di()] },
];

// a/c/d/b split into two byte halves, the stack and index registers only have a low byte.
static WORD: [RegisterInfo; 8] = [
    RegisterInfo { name: "ax", contained: &[RegSpec::al(), RegSpec::ah()] },
    RegisterInfo { name: "cx", contained: &[RegSpec::cl(), RegSpec::ch()] },
    RegisterInfo { name: "dx", contained: &[RegSpec::dl(), RegSpec::dh()] },
    RegisterInfo { name: "bx", contained: &[RegSpec::bl(), RegSpec::bh()] },
    RegisterInfo { name: "sp", contained: &[RegSpec::spl()] },
    RegisterInfo { name: "bp", contained: &[RegSpec::bpl()] },
    RegisterInfo { name: "si", contained: &[RegSpec::sil()] },
    RegisterInfo { name: "di", contained: &[RegSpec::dil()] },
];

static BYTE: [RegisterInfo; 8] = [
    RegisterInfo { name: "al", contained: &[] },
    RegisterInfo { name: "cl", contained: &[] },
    RegisterInfo { name: "dl", contained: &[] },
    RegisterInfo { name: "bl", contained: &[] },
    RegisterInfo { name: "ah", contained: &[] },
    RegisterInfo { name: "ch", contained: &[] },
    RegisterInfo { name: "dh", contained: &[] },
    RegisterInfo { name: "bh", contained: &[] },
];

static LOW_BYTE: [RegisterInfo; 4] = [
    RegisterInfo { name: "spl", contained: &[] },
    RegisterInfo { name: "bpl", contained: &[] },
    RegisterInfo { name: "sil", contained: &[] },
    RegisterInfo { name: "dil", contained: &[] },
];

static XMM: [RegisterInfo; 8] = [
    RegisterInfo { name: "xmm0", contained: &[] },
    RegisterInfo { name: "xmm1", contained: &[] },
    RegisterInfo { name: "xmm2", contained: &[] },
    RegisterInfo { name: "xmm3", contained: &[] },
    RegisterInfo { name: "xmm4", contained: &[] },
    RegisterInfo { name: "xmm5", contained: &[] },
    RegisterInfo { name: "xmm6", contained: &[] },
    RegisterInfo { name: "xmm7", contained: &[] },
];

#[allow(non_snake_case)]
impl RegSpec {
    /// the number of this register in its `RegisterClass`.
    ///
    /// for the general purpose registers this is the canonical encoding order: `eax`, `ecx`,
    /// `edx`, `ebx`, `esp`, `ebp`, `esi`, `edi` (and `al`, `cl`, `dl`, `bl`, `ah`, `ch`, `dh`,
    /// `bh` for bytes). `spl`, `bpl`, `sil` and `dil` are numbered 0 through 3 in their own class.
    pub fn num(&self) -> u8 {
        self.num
    }

    /// the class of register this register is in.
    pub fn class(&self) -> RegisterClass {
        RegisterClass { kind: self.bank }
    }

    fn info(&self) -> &'static RegisterInfo {
        &self.bank.table()[self.num as usize]
    }

    /// return a human-friendly name for this register.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// the registers directly aliased by the low bits of this one, widest first.
    pub fn contained(&self) -> &'static [RegSpec] {
        self.info().contained
    }

    /// whether `other` is this register or is nested anywhere inside it.
    pub fn contains(&self, other: RegSpec) -> bool {
        *self == other || self.contained().iter().any(|reg| reg.contains(other))
    }

    /// whether writing one of the two registers can change the value of the other.
    pub fn aliases(&self, other: RegSpec) -> bool {
        self.contains(other) || other.contains(*self)
    }

    /// return the size of this register, in bytes
    #[inline]
    pub fn width(&self) -> u8 {
        self.class().width()
    }

    /// construct a `RegSpec` for dword reg `num`
    #[inline]
    pub fn d(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 dword reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::D,
        }
    }

    /// construct a `RegSpec` for word reg `num`
    #[inline]
    pub fn w(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 word reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::W,
        }
    }

    /// construct a `RegSpec` for byte reg `num`
    #[inline]
    pub fn b(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 byte reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::B,
        }
    }

    /// construct a `RegSpec` for xmm reg `num`
    #[inline]
    pub fn xmm(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 xmm reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::X,
        }
    }

    /// the general purpose register numbered `num` that is `width` bytes wide.
    ///
    /// this is the width-keyed lookup used for every 3-bit register field of an encoding.
    #[inline]
    pub(crate) fn gp(num: u8, width: u8) -> RegSpec {
        let bank = match width {
            1 => RegisterBank::B,
            2 => RegisterBank::W,
            _ => RegisterBank::D,
        };

        RegSpec { num: num & 0b111, bank }
    }

    /// every register in the catalogue, dword registers first.
    pub fn all() -> impl Iterator<Item = RegSpec> {
        [RegisterBank::D, RegisterBank::W, RegisterBank::B, RegisterBank::L, RegisterBank::X]
            .into_iter()
            .flat_map(|bank| (0..bank.table().len() as u8).map(move |num| RegSpec { num, bank }))
    }

    register!(D,
        eax => 0, ecx => 1, edx => 2, ebx => 3,
        esp => 4, ebp => 5, esi => 6, edi => 7
    );

    register!(W,
        ax => 0, cx => 1, dx => 2, bx => 3,
        sp => 4, bp => 5, si => 6, di => 7
    );

    register!(B,
        al => 0, cl => 1, dl => 2, bl => 3,
        ah => 4, ch => 5, dh => 6, bh => 7
    );

    register!(L, spl => 0, bpl => 1, sil => 2, dil => 3);

    #[inline]
    pub const fn xmm0() -> RegSpec {
        RegSpec {
            bank: RegisterBank::X,
            num: 0,
        }
    }
}

impl fmt::Debug for RegSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
