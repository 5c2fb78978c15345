//! Programmatic construction of instruction listings.
//!
//! A [`Builder`] holds an ordered list of [`CodeElement`]s and a cursor. Writes insert at the
//! cursor and move it past the new element, so a builder that is never seeked simply appends.
//! Labels are placed in the listing like any other element and referenced through
//! [`LabelRef`] handles, which may be handed out before the label is placed.

pub mod validate;

use std::io::SeekFrom;

use rustc_hash::FxHashMap;
use x86::{
    Arithmetic, ConditionCode, Instruction, Jump, LabelRef, Nullary, Operand, RangeError, Unary,
};

pub use validate::{validate, validate_assembly, Context, StructuralError, Validator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeElement {
    Instruction(Instruction),
    Label(LabelRef),
    Comment(String),
}

impl From<Instruction> for CodeElement {
    fn from(instruction: Instruction) -> Self {
        CodeElement::Instruction(instruction)
    }
}

#[derive(Debug, Clone)]
struct Label {
    name: String,
    bound: bool,
}

#[derive(Debug, Default)]
pub struct Builder {
    elements: Vec<CodeElement>,
    cursor: usize,
    labels: Vec<Label>,

    /// most recently declared label for each name.
    names: FxHashMap<String, LabelRef>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn elements(&self) -> &[CodeElement] {
        &self.elements
    }

    /// Move the cursor, returning its new position. Positions range from zero up to and
    /// including the element count.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<usize, RangeError> {
        let len = self.elements.len();
        let requested = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            SeekFrom::Current(delta) => (self.cursor as i64).saturating_add(delta),
            SeekFrom::End(delta) => (len as i64).saturating_add(delta),
        };

        if requested < 0 || requested > len as i64 {
            return Err(RangeError::Position { requested, len });
        }

        self.cursor = requested as usize;
        Ok(self.cursor)
    }

    /// Insert an element at the cursor and advance past it. Labels are placed through
    /// [`Builder::bind`] and fail the same way.
    pub fn write(&mut self, element: impl Into<CodeElement>) -> Result<&mut Self, RangeError> {
        match element.into() {
            CodeElement::Label(label) => self.bind(label)?,
            element => {
                self.insert(element);
            }
        }

        Ok(self)
    }

    pub fn instruction(&mut self, instruction: Instruction) -> &mut Self {
        self.insert(CodeElement::Instruction(instruction))
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.insert(CodeElement::Comment(text.into()))
    }

    fn insert(&mut self, element: CodeElement) -> &mut Self {
        self.elements.insert(self.cursor, element);
        self.cursor += 1;
        self
    }

    /// Place a new label at the cursor.
    pub fn label(&mut self, name: impl Into<String>) -> LabelRef {
        let label = self.declare_label(name);
        self.labels[label.id() as usize].bound = true;
        self.insert(CodeElement::Label(label));
        label
    }

    /// Hand out a reference to a label that is placed later with [`Builder::bind`].
    /// Declaring a name twice yields two distinct labels; lookups find the newer one.
    pub fn declare_label(&mut self, name: impl Into<String>) -> LabelRef {
        let name = name.into();
        let label = LabelRef::new(self.labels.len() as u32);
        self.names.insert(name.clone(), label);
        self.labels.push(Label { name, bound: false });
        label
    }

    /// Place a declared label at the cursor.
    pub fn bind(&mut self, label: LabelRef) -> Result<(), RangeError> {
        let entry = self
            .labels
            .get_mut(label.id() as usize)
            .ok_or(RangeError::UnknownLabel(label))?;

        if entry.bound {
            return Err(RangeError::LabelRebound(label));
        }

        entry.bound = true;
        self.insert(CodeElement::Label(label));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<LabelRef> {
        self.names.get(name).copied()
    }

    pub fn jcc(&mut self, condition: ConditionCode, target: impl Into<Operand>) -> &mut Self {
        self.instruction(Instruction::jcc(condition, target))
    }

    /// Snapshot the listing. Later writes to the builder don't show up in the snapshot.
    pub fn to_assembly(&self) -> Assembly {
        let positions = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(idx, element)| match element {
                CodeElement::Label(label) => Some((*label, idx)),
                _ => None,
            })
            .collect();

        Assembly {
            elements: self.elements.clone(),
            labels: self.labels.iter().map(|label| label.name.clone()).collect(),
            positions,
        }
    }
}

macro_rules! mnemonics {
    ($($method:ident => $variant:ident($form:ident $(, $arg:ident)*);)*) => {
        impl Builder {
            $(
                pub fn $method(&mut self $(, $arg: impl Into<Operand>)*) -> &mut Self {
                    self.instruction(Instruction::$variant($form::new($($arg),*)))
                }
            )*
        }
    };
}

mnemonics! {
    push => Push(Unary, operand);
    pop => Pop(Unary, operand);
    inc => Inc(Unary, operand);
    dec => Dec(Unary, operand);
    not => Not(Unary, operand);
    neg => Neg(Unary, operand);
    add => Add(Arithmetic, destination, source);
    or => Or(Arithmetic, destination, source);
    adc => Adc(Arithmetic, destination, source);
    sbb => Sbb(Arithmetic, destination, source);
    and => And(Arithmetic, destination, source);
    sub => Sub(Arithmetic, destination, source);
    xor => Xor(Arithmetic, destination, source);
    cmp => Cmp(Arithmetic, destination, source);
    test => Test(Arithmetic, destination, source);
    mov => Mov(Arithmetic, destination, source);
    movzx => Movzx(Arithmetic, destination, source);
    movsx => Movsx(Arithmetic, destination, source);
    lea => Lea(Arithmetic, destination, source);
    xchg => Xchg(Arithmetic, destination, source);
    imul => Imul2(Arithmetic, destination, source);
    shl => Shl(Arithmetic, destination, count);
    shr => Shr(Arithmetic, destination, count);
    sar => Sar(Arithmetic, destination, count);
    jmp => Jmp(Jump, target);
    call => Call(Jump, target);
    ret => Ret(Nullary);
    leave => Leave(Nullary);
    nop => Nop(Nullary);
    int3 => Int3(Nullary);
    hlt => Hlt(Nullary);
}

/// An immutable listing produced by [`Builder::to_assembly`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    elements: Vec<CodeElement>,
    labels: Vec<String>,

    /// element index of every placed label.
    positions: FxHashMap<LabelRef, usize>,
}

impl Assembly {
    pub fn elements(&self) -> &[CodeElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.elements.iter().filter_map(|element| match element {
            CodeElement::Instruction(instruction) => Some(instruction),
            _ => None,
        })
    }

    pub fn label_name(&self, label: LabelRef) -> Option<&str> {
        self.labels.get(label.id() as usize).map(String::as_str)
    }

    /// Element index the label was placed at, if it was placed at all.
    pub fn position_of(&self, label: LabelRef) -> Option<usize> {
        self.positions.get(&label).copied()
    }
}
