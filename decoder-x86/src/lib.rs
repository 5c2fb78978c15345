//! # `x86`, a decoder for 32-bit protected mode x86
//!
//! Raw machine code goes in through a [`decoder::Reader`], typed [`Instruction`]s come out. The
//! model is deliberately small: registers are handles into a static catalogue ([`RegSpec`]),
//! operands are a closed set of plain values ([`Operand`]) and every instruction fixes the shape of
//! its operands in its type.
//!
//! ```
//! use x86::{Arithmetic, Decoder, Instruction, RegSpec};
//!
//! let (inst, width) = Decoder::default().decode_slice(&[0x01, 0xc8]).unwrap();
//! assert_eq!(inst, Instruction::Add(Arithmetic::new(RegSpec::eax(), RegSpec::ecx())));
//! assert_eq!(width, 2);
//! ```

mod instruction;
mod operand;
mod reg;
mod stream;

pub mod protected_mode;

mod tests;

use std::fmt;

pub use instruction::{
    Arithmetic, ConditionCode, Form, Instruction, Jump, Nullary, Opcode, Shape, Ternary, Unary,
};
pub use operand::{Address, Constant, Indirect, LabelRef, Operand, ScaledIndex};
pub use protected_mode::{Decoder, Extensions, Prefixes};
pub use reg::{register_class, RegSpec, RegisterClass};
pub use stream::{Decoded, Stream};

/// a value handed to a constructor was outside of the range it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// index scale that isn't one of 1, 2, 4 or 8.
    Scale(u8),

    /// operand width that isn't one of 1, 2, 4 or 8 bytes.
    Width(u8),

    /// an instruction was built with the wrong number of operands.
    Arity {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// a seek landed before the first element or past the last one.
    Position { requested: i64, len: usize },

    /// a label was placed a second time.
    LabelRebound(LabelRef),

    /// a label reference that wasn't handed out by this builder.
    UnknownLabel(LabelRef),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Scale(scale) => write!(f, "invalid index scale {scale}"),
            RangeError::Width(width) => write!(f, "invalid operand width {width}"),
            RangeError::Arity {
                opcode,
                expected,
                found,
            } => write!(
                f,
                "`{}` takes {expected} operand(s) but {found} were given",
                opcode.name()
            ),
            RangeError::Position { requested, len } => {
                write!(f, "position {requested} is outside of 0..={len}")
            }
            RangeError::LabelRebound(label) => write!(f, "{label:?} was already bound"),
            RangeError::UnknownLabel(label) => write!(f, "{label:?} doesn't exist"),
        }
    }
}

impl std::error::Error for RangeError {}
