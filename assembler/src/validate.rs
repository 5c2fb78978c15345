//! Structural checks on instructions, looked up by opcode.
//!
//! Every [`Opcode`] maps to one [`Validator`] in a table that is built on first use. The rules
//! are about shape only: where constants, memory and labels may appear, and whether the two
//! sides of a same-width operation agree.

use std::fmt;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use x86::{Instruction, LabelRef, Opcode, Operand, Shape};

use crate::{Assembly, CodeElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// a constant where the instruction writes its result.
    ConstantDestination(Opcode),

    /// an address that isn't dereferenced, where the instruction writes its result.
    AddressDestination(Opcode),

    /// an address that isn't dereferenced anywhere but the source of `lea`.
    BareAddress(Opcode),

    MultipleMemoryOperands(Opcode),

    WidthMismatch {
        opcode: Opcode,
        destination: u8,
        source: u8,
    },

    /// a label reference that isn't a branch target.
    LabelOutsideJump(Opcode),

    /// a branch to a label that was never placed in the listing.
    UnboundLabel { opcode: Opcode, label: LabelRef },

    /// an operand of a kind the instruction can't take at all.
    UnexpectedOperand { opcode: Opcode, position: usize },
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::ConstantDestination(opcode) => {
                write!(f, "`{}` can't write to a constant", opcode.name())
            }
            StructuralError::AddressDestination(opcode) => {
                write!(f, "`{}` can't write to an address", opcode.name())
            }
            StructuralError::BareAddress(opcode) => {
                write!(f, "`{}` can't take an address without a memory access", opcode.name())
            }
            StructuralError::MultipleMemoryOperands(opcode) => {
                write!(f, "`{}` accesses memory more than once", opcode.name())
            }
            StructuralError::WidthMismatch {
                opcode,
                destination,
                source,
            } => write!(
                f,
                "`{}` mixes a {destination} byte destination with a {source} byte source",
                opcode.name()
            ),
            StructuralError::LabelOutsideJump(opcode) => {
                write!(f, "`{}` can't take a label", opcode.name())
            }
            StructuralError::UnboundLabel { opcode, label } => {
                write!(f, "`{}` targets {label:?}, which was never placed", opcode.name())
            }
            StructuralError::UnexpectedOperand { opcode, position } => {
                write!(f, "`{}` can't take operand {position}", opcode.name())
            }
        }
    }
}

impl std::error::Error for StructuralError {}

/// What a validator may know about the surroundings of an instruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    assembly: Option<&'a Assembly>,
}

impl<'a> Context<'a> {
    /// An instruction on its own. Labels can't be resolved so any label target is accepted.
    pub fn detached() -> Self {
        Self { assembly: None }
    }

    pub fn new(assembly: &'a Assembly) -> Self {
        Self {
            assembly: Some(assembly),
        }
    }

    pub fn assembly(&self) -> Option<&'a Assembly> {
        self.assembly
    }

    fn is_bound(&self, label: LabelRef) -> bool {
        match self.assembly {
            Some(assembly) => assembly.position_of(label).is_some(),
            None => true,
        }
    }
}

pub trait Validator: Send + Sync {
    fn validate(&self, ctx: &Context, inst: &Instruction) -> Result<(), StructuralError>;
}

/// Instructions without operands.
struct Bare;

/// A single operand. Only some of these read an immediate.
struct Single {
    constant: bool,
}

/// A branch target.
struct Branch;

/// A destination followed by one or two sources.
struct Destination {
    same_width: bool,
}

/// `lea`, the only reader of a bare address.
struct Lea;

/// `enter`, whose operands are both sizes.
struct Enter;

impl Validator for Bare {
    fn validate(&self, _: &Context, _: &Instruction) -> Result<(), StructuralError> {
        Ok(())
    }
}

impl Validator for Single {
    fn validate(&self, _: &Context, inst: &Instruction) -> Result<(), StructuralError> {
        let opcode = inst.opcode();
        no_labels(inst)?;

        match inst.operand(0) {
            Some(Operand::Address(_)) => Err(StructuralError::BareAddress(opcode)),
            Some(Operand::Constant(_)) if !self.constant => {
                Err(StructuralError::ConstantDestination(opcode))
            }
            _ => Ok(()),
        }
    }
}

impl Validator for Branch {
    fn validate(&self, ctx: &Context, inst: &Instruction) -> Result<(), StructuralError> {
        let opcode = inst.opcode();

        match inst.operand(0) {
            Some(Operand::Address(_)) => Err(StructuralError::BareAddress(opcode)),
            Some(&Operand::Label(label)) if !ctx.is_bound(label) => {
                Err(StructuralError::UnboundLabel { opcode, label })
            }
            _ => Ok(()),
        }
    }
}

impl Validator for Destination {
    fn validate(&self, _: &Context, inst: &Instruction) -> Result<(), StructuralError> {
        let opcode = inst.opcode();
        let operands = inst.operands();

        no_labels(inst)?;
        writable(opcode, &operands[0])?;

        if operands[1..].iter().any(|op| matches!(op, Operand::Address(_))) {
            return Err(StructuralError::BareAddress(opcode));
        }

        single_memory_access(inst)?;

        if self.same_width {
            widths_agree(opcode, &operands[0], &operands[1])?;
        }

        Ok(())
    }
}

impl Validator for Lea {
    fn validate(&self, _: &Context, inst: &Instruction) -> Result<(), StructuralError> {
        let opcode = inst.opcode();
        no_labels(inst)?;

        match inst.operands() {
            [Operand::Register(_), Operand::Address(_)] => Ok(()),
            [Operand::Register(_), _] => Err(StructuralError::UnexpectedOperand {
                opcode,
                position: 1,
            }),
            [destination, _] => {
                writable(opcode, destination)?;
                Err(StructuralError::UnexpectedOperand {
                    opcode,
                    position: 0,
                })
            }
            _ => Ok(()),
        }
    }
}

impl Validator for Enter {
    fn validate(&self, _: &Context, inst: &Instruction) -> Result<(), StructuralError> {
        let opcode = inst.opcode();
        no_labels(inst)?;

        match inst
            .operands()
            .iter()
            .position(|op| !matches!(op, Operand::Constant(_)))
        {
            Some(position) => Err(StructuralError::UnexpectedOperand { opcode, position }),
            None => Ok(()),
        }
    }
}

fn no_labels(inst: &Instruction) -> Result<(), StructuralError> {
    if inst.operands().iter().any(|op| matches!(op, Operand::Label(_))) {
        return Err(StructuralError::LabelOutsideJump(inst.opcode()));
    }

    Ok(())
}

fn writable(opcode: Opcode, destination: &Operand) -> Result<(), StructuralError> {
    match destination {
        Operand::Constant(_) => Err(StructuralError::ConstantDestination(opcode)),
        Operand::Address(_) => Err(StructuralError::AddressDestination(opcode)),
        _ => Ok(()),
    }
}

fn single_memory_access(inst: &Instruction) -> Result<(), StructuralError> {
    if inst.operands().iter().filter(|op| op.is_memory()).count() > 1 {
        return Err(StructuralError::MultipleMemoryOperands(inst.opcode()));
    }

    Ok(())
}

/// Constants may be narrower than the destination since the processor extends them.
fn widths_agree(
    opcode: Opcode,
    destination: &Operand,
    source: &Operand,
) -> Result<(), StructuralError> {
    let (Some(dst), Some(src)) = (destination.width(), source.width()) else {
        return Ok(());
    };

    let agree = match source {
        Operand::Constant(_) => src <= dst,
        _ => src == dst,
    };

    if !agree {
        return Err(StructuralError::WidthMismatch {
            opcode,
            destination: dst,
            source: src,
        });
    }

    Ok(())
}

/// Two operand instructions whose operands are the same size.
fn is_same_width(opcode: Opcode) -> bool {
    opcode.is_cmovcc()
        || matches!(
            opcode,
            Opcode::ADD
                | Opcode::OR
                | Opcode::ADC
                | Opcode::SBB
                | Opcode::AND
                | Opcode::SUB
                | Opcode::XOR
                | Opcode::CMP
                | Opcode::TEST
                | Opcode::MOV
                | Opcode::XCHG
                | Opcode::IMUL2
                | Opcode::MOVBE
                | Opcode::BT
                | Opcode::BTS
                | Opcode::BTR
                | Opcode::BTC
                | Opcode::BSF
                | Opcode::BSR
                | Opcode::POPCNT
                | Opcode::LZCNT
                | Opcode::TZCNT
        )
}

static VALIDATORS: Lazy<FxHashMap<Opcode, Box<dyn Validator>>> = Lazy::new(|| {
    let mut table: FxHashMap<Opcode, Box<dyn Validator>> = FxHashMap::default();

    for &opcode in Opcode::ALL {
        let validator: Box<dyn Validator> = match opcode {
            Opcode::LEA => Box::new(Lea),
            Opcode::ENTER => Box::new(Enter),
            Opcode::PUSH | Opcode::INT | Opcode::RETN => Box::new(Single { constant: true }),
            _ => match opcode.shape() {
                Shape::Nullary => Box::new(Bare),
                Shape::Unary => Box::new(Single { constant: false }),
                Shape::Jump => Box::new(Branch),
                Shape::Arithmetic | Shape::Ternary => Box::new(Destination {
                    same_width: is_same_width(opcode),
                }),
            },
        };

        table.insert(opcode, validator);
    }

    table
});

/// The rules for `opcode`.
pub fn validator(opcode: Opcode) -> Option<&'static dyn Validator> {
    VALIDATORS.get(&opcode).map(|validator| validator.as_ref())
}

pub fn validate(ctx: &Context, inst: &Instruction) -> Result<(), StructuralError> {
    match validator(inst.opcode()) {
        Some(validator) => validator.validate(ctx, inst),
        None => Ok(()),
    }
}

/// Validate every instruction in the listing. Errors are paired with the index of the element
/// they were found at.
pub fn validate_assembly(assembly: &Assembly) -> Result<(), Vec<(usize, StructuralError)>> {
    let ctx = Context::new(assembly);
    let errors: Vec<(usize, StructuralError)> = assembly
        .elements()
        .iter()
        .enumerate()
        .filter_map(|(idx, element)| match element {
            CodeElement::Instruction(inst) => validate(&ctx, inst).err().map(|err| (idx, err)),
            _ => None,
        })
        .collect();

    if errors.is_empty() {
        return Ok(());
    }

    log::warn!(
        "{} of {} instructions failed validation.",
        errors.len(),
        assembly.instructions().count()
    );

    Err(errors)
}
