use std::fmt;

use crate::{RangeError, RegSpec};

/// an index register together with the factor it is multiplied by, as in `[eax + ecx * 4]`.
///
/// the factor is always one of 1, 2, 4 or 8; [`ScaledIndex::new`] rejects anything else.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScaledIndex {
    index: RegSpec,
    scale: u8,
}

impl ScaledIndex {
    pub fn new(index: RegSpec, scale: u8) -> Result<Self, RangeError> {
        match scale {
            1 | 2 | 4 | 8 => Ok(Self { index, scale }),
            _ => Err(RangeError::Scale(scale)),
        }
    }

    /// the two scale bits of a sib byte select a factor of `1 << bits`.
    #[inline]
    pub(crate) fn from_sib_bits(index: RegSpec, bits: u8) -> Self {
        Self {
            index,
            scale: 1 << (bits & 0b11),
        }
    }

    pub fn index(&self) -> RegSpec {
        self.index
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

/// a memory address expression, `[base + index * scale + displacement]`, with no access width.
///
/// `lea` is the only instruction that takes one of these directly; every other memory operand
/// is an [`Indirect`] through an address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Address {
    pub base: Option<RegSpec>,
    pub index: Option<ScaledIndex>,
    pub displacement: i32,
}

impl Address {
    /// `[base]`
    pub fn base(base: RegSpec) -> Self {
        Self {
            base: Some(base),
            index: None,
            displacement: 0,
        }
    }

    /// `[displacement]`
    pub fn absolute(displacement: i32) -> Self {
        Self {
            base: None,
            index: None,
            displacement,
        }
    }

    pub fn with_index(mut self, index: ScaledIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_displacement(mut self, displacement: i32) -> Self {
        self.displacement = displacement;
        self
    }

    /// every register this address reads.
    pub fn registers(&self) -> impl Iterator<Item = RegSpec> {
        self.base
            .into_iter()
            .chain(self.index.map(|index| index.index()))
    }
}

/// an immediate value. `width` is the number of bytes the value was encoded in (or is meant to
/// be encoded in), which is not always the width of the operation: `83 /0 ib` adds a
/// sign-extended byte to a dword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constant {
    width: u8,
    value: i64,
}

impl Constant {
    pub fn new(width: u8, value: i64) -> Result<Self, RangeError> {
        match width {
            1 | 2 | 4 | 8 => Ok(Self { width, value }),
            _ => Err(RangeError::Width(width)),
        }
    }

    #[inline]
    pub fn byte(value: i64) -> Self {
        Self { width: 1, value }
    }

    #[inline]
    pub fn word(value: i64) -> Self {
        Self { width: 2, value }
    }

    #[inline]
    pub fn dword(value: i64) -> Self {
        Self { width: 4, value }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// a read or write of `width` bytes of memory at `address`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Indirect {
    pub width: u8,
    pub address: Address,
}

impl Indirect {
    pub fn new(width: u8, address: Address) -> Self {
        Self { width, address }
    }
}

/// a handle to a label owned by whoever handed it out.
///
/// the handle says nothing about where the label ends up; a reference may exist before its
/// label has been placed anywhere.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelRef(u32);

impl LabelRef {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LabelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label#{}", self.0)
    }
}

/// an operand for an `x86` instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// a bare register operand, such as `ecx`.
    Register(RegSpec),
    /// an immediate, or the signed offset of a relative branch.
    Constant(Constant),
    /// an address expression that is computed but not dereferenced.
    Address(Address),
    /// a sized memory access through an address expression, such as `dword [esi + 0x14]`.
    Indirect(Indirect),
    /// a reference to a label, resolved by whoever owns the label.
    Label(LabelRef),
}

impl Operand {
    /// returns `true` if this operand implies a memory access, `false` otherwise.
    ///
    /// notably, the bare address taken by `lea` is not a memory access.
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Indirect(_))
    }

    /// return the width of this operand, in bytes. addresses and labels have no width.
    pub fn width(&self) -> Option<u8> {
        match self {
            Operand::Register(reg) => Some(reg.width()),
            Operand::Constant(constant) => Some(constant.width()),
            Operand::Indirect(indirect) => Some(indirect.width),
            Operand::Address(_) | Operand::Label(_) => None,
        }
    }

    pub fn as_register(&self) -> Option<RegSpec> {
        match self {
            Operand::Register(reg) => Some(*reg),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Operand::Constant(constant) => Some(*constant),
            _ => None,
        }
    }

    /// `byte [address]`
    pub fn byte_ptr(address: Address) -> Self {
        Operand::Indirect(Indirect::new(1, address))
    }

    /// `word [address]`
    pub fn word_ptr(address: Address) -> Self {
        Operand::Indirect(Indirect::new(2, address))
    }

    /// `dword [address]`
    pub fn dword_ptr(address: Address) -> Self {
        Operand::Indirect(Indirect::new(4, address))
    }
}

impl From<RegSpec> for Operand {
    fn from(reg: RegSpec) -> Self {
        Operand::Register(reg)
    }
}

impl From<Constant> for Operand {
    fn from(constant: Constant) -> Self {
        Operand::Constant(constant)
    }
}

impl From<Address> for Operand {
    fn from(address: Address) -> Self {
        Operand::Address(address)
    }
}

impl From<Indirect> for Operand {
    fn from(indirect: Indirect) -> Self {
        Operand::Indirect(indirect)
    }
}

impl From<LabelRef> for Operand {
    fn from(label: LabelRef) -> Self {
        Operand::Label(label)
    }
}
