//! The abstract operand stack and control-frame stack used to type-check a
//! function body.
//!
//! This follows the reference validation algorithm for a stack machine with
//! structured control: after an unconditional branch (`br`, `br_table`,
//! `return`) or `unreachable`, the remainder of the current block is
//! type-checked against a polymorphic stack that can supply or absorb any
//! type, so dead code with inconsistent stack effects is never rejected.

use wrt_error::{codes, Error};
use wrt_format::types::ValueType;

/// An abstract operand stack entry: a concrete type, or `Unknown` standing
/// in for "any type", produced once a block becomes unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackVal {
    Known(ValueType),
    Unknown,
}

impl From<ValueType> for StackVal {
    fn from(t: ValueType) -> Self {
        StackVal::Known(t)
    }
}

/// One entry in the control-frame stack: a `block`, `loop`, `if`, or the
/// implicit function-body frame.
pub struct CtrlFrame {
    /// Types a branch *to this frame's label* must supply.
    pub label_types: Vec<ValueType>,
    /// Types that must be on the stack when this frame ends normally.
    pub end_types: Vec<ValueType>,
    /// Operand stack height when this frame was entered.
    pub height: usize,
    /// Set once an instruction makes the rest of this block unreachable.
    pub unreachable: bool,
}

pub struct Ctx {
    pub vals: Vec<StackVal>,
    pub ctrls: Vec<CtrlFrame>,
}

fn err(message: impl Into<String>) -> Error {
    Error::validation(codes::STACK_MISMATCH, message)
}

impl Ctx {
    pub fn new() -> Self {
        Self { vals: Vec::new(), ctrls: Vec::new() }
    }

    pub fn push_val(&mut self, t: StackVal) {
        self.vals.push(t);
    }

    pub fn push_vals(&mut self, types: &[ValueType]) {
        for t in types {
            self.push_val(StackVal::Known(*t));
        }
    }

    pub fn pop_val(&mut self) -> Result<StackVal, Error> {
        let frame = self.ctrls.last().expect("at least the function frame is always present");
        if self.vals.len() == frame.height {
            if frame.unreachable {
                return Ok(StackVal::Unknown);
            }
            return Err(err("operand stack underflow"));
        }
        Ok(self.vals.pop().expect("checked non-empty above"))
    }

    pub fn pop_expect(&mut self, want: ValueType) -> Result<(), Error> {
        match self.pop_val()? {
            StackVal::Unknown => Ok(()),
            StackVal::Known(t) if t == want => Ok(()),
            StackVal::Known(t) => {
                Err(Error::validation(codes::TYPE_MISMATCH, format!("expected {want:?}, found {t:?}")))
            }
        }
    }

    pub fn pop_vals(&mut self, types: &[ValueType]) -> Result<(), Error> {
        for t in types.iter().rev() {
            self.pop_expect(*t)?;
        }
        Ok(())
    }

    /// Pop two operands that must be the same type (either may be
    /// `Unknown`), returning their unified type. Used by `select`.
    pub fn pop_same(&mut self) -> Result<StackVal, Error> {
        let b = self.pop_val()?;
        let a = self.pop_val()?;
        match (a, b) {
            (StackVal::Unknown, StackVal::Unknown) => Ok(StackVal::Unknown),
            (StackVal::Unknown, StackVal::Known(t)) | (StackVal::Known(t), StackVal::Unknown) => {
                Ok(StackVal::Known(t))
            }
            (StackVal::Known(a), StackVal::Known(b)) if a == b => Ok(StackVal::Known(a)),
            (StackVal::Known(a), StackVal::Known(b)) => Err(Error::validation(
                codes::TYPE_MISMATCH,
                format!("select operands disagree: {a:?} vs {b:?}"),
            )),
        }
    }

    pub fn push_ctrl(&mut self, label_types: Vec<ValueType>, end_types: Vec<ValueType>) {
        let height = self.vals.len();
        self.ctrls.push(CtrlFrame { label_types, end_types, height, unreachable: false });
    }

    /// Close the innermost frame: check its `end_types` are present, then
    /// remove it and the values beneath it, returning those end types so
    /// the caller can push them onto the *enclosing* frame's stack.
    pub fn pop_ctrl(&mut self) -> Result<Vec<ValueType>, Error> {
        let (end_types, height) = {
            let frame = self.ctrls.last().ok_or_else(|| err("no open control frame"))?;
            (frame.end_types.clone(), frame.height)
        };
        self.pop_vals(&end_types)?;
        if self.vals.len() != height {
            return Err(err("extra values left on the stack at block end"));
        }
        self.ctrls.pop();
        Ok(end_types)
    }

    /// Marks the current frame unreachable: truncates the stack back to the
    /// frame's starting height and lets further pops return `Unknown`
    /// rather than underflowing. Used after `unreachable`, `br`, `return`,
    /// and `br_table`, which never fall through.
    pub fn mark_unreachable(&mut self) {
        let frame = self.ctrls.last_mut().expect("at least the function frame is always present");
        self.vals.truncate(frame.height);
        frame.unreachable = true;
    }

    /// The label types of the frame `depth` levels up from the innermost
    /// (0 = innermost).
    pub fn label_types(&self, depth: u32) -> Result<Vec<ValueType>, Error> {
        let idx = self
            .ctrls
            .len()
            .checked_sub(1 + depth as usize)
            .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "branch depth out of range"))?;
        Ok(self.ctrls[idx].label_types.clone())
    }
}
