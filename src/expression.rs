//! The dual-representation expression node.
//!
//! An [`Expression`] pairs a deferred numeric recipe with the LaTeX notation
//! describing it. The recipe is a base [`LabeledArray`] plus an ordered chain
//! of [`Step`]s. Building expressions only extends the chain and composes
//! notation; the array contents are not touched until [`Expression::force`]
//! drains the chain. A node whose chain is empty is *realized*: its base is
//! its value.
//!
//! ```
//! use notated::{Axis, Expression, LabeledArray};
//!
//! let x = LabeledArray::from_vec(vec![Axis::new("t", 2)], vec![1.0, 2.0])?
//!   .with_symbol("x");
//! let x = Expression::from(x);
//! let y = (&x * 2.0).ln();
//! assert_eq!(y.notation(), r"\ln{\left(\left(x_{t}\right)\left(2\right)\right)}");
//! assert_eq!(y.force()?.payload().map(|v| v.len()), Some(2));
//! # Ok::<(), notated::Error>(())
//! ```

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::array::LabeledArray;
use crate::notation;
use crate::ops::BinaryOp;
use crate::render::Renderer;
use crate::{Error, Result};

mod overload;

/// Which side of a binary step the running value sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
  /// `value op operand`
  Forward,
  /// `operand op value`, used when a literal appears on the left.
  Reversed,
}

/// One deferred transformation of a running value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
  Binary {
    op: BinaryOp,
    order: Order,
    operand: Arc<Expression>,
  },
  Sum {
    axis: Option<String>,
  },
  Ln,
}

impl Step {
  pub fn name(&self) -> &'static str {
    match self {
      Step::Binary { op, .. } => op.as_str(),
      Step::Sum { .. } => "sum",
      Step::Ln => "ln",
    }
  }

  /// Pending expression this step needs forced before it can run.
  fn pending_operand(&self) -> Option<&Expression> {
    match self {
      Step::Binary { operand, .. } if !operand.is_realized() => {
        Some(&**operand)
      }
      _ => None,
    }
  }

  /// Apply the step to `value`. `forced` is the forced operand of a binary
  /// step whose operand was pending.
  fn apply(
    &self,
    value: &LabeledArray,
    forced: Option<&LabeledArray>,
  ) -> Result<LabeledArray> {
    match self {
      Step::Binary { op, order, operand } => {
        let operand = forced.unwrap_or(&*operand.base);
        match order {
          Order::Forward => value.zip_with(operand, *op),
          Order::Reversed => operand.zip_with(value, *op),
        }
      }
      Step::Sum { axis } => value.sum(axis.as_deref()),
      Step::Ln => value.ln(),
    }
  }
}

/// An expression part way through [`Expression::force`].
struct Frame<'a> {
  expression: &'a Expression,
  value: Option<LabeledArray>,
  next: usize,
}

impl<'a> Frame<'a> {
  fn new(expression: &'a Expression) -> Self {
    Frame {
      expression,
      value: None,
      next: 0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
  #[serde(serialize_with = "summarize")]
  base: Arc<LabeledArray>,
  steps: Vec<Step>,
  notation: String,
}

fn summarize<S: Serializer>(
  base: &Arc<LabeledArray>,
  serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
  base.summary().serialize(serializer)
}

impl Expression {
  /// Wrap `value` with an explicit notation.
  pub fn with_notation(
    value: LabeledArray,
    notation: impl Into<String>,
  ) -> Self {
    Expression {
      base: Arc::new(value),
      steps: Vec::new(),
      notation: notation.into(),
    }
  }

  /// A zero-history node for a plain number.
  pub fn literal(value: f64) -> Self {
    Expression::with_notation(
      LabeledArray::scalar(value),
      notation::literal(value),
    )
  }

  pub fn notation(&self) -> &str {
    &self.notation
  }

  /// Steps still to be applied to the base value.
  pub fn pending_operations(&self) -> &[Step] {
    &self.steps
  }

  pub fn is_realized(&self) -> bool {
    self.steps.is_empty()
  }

  /// The realized value, or `None` while steps are pending.
  pub fn payload(&self) -> Option<&LabeledArray> {
    self.is_realized().then_some(&*self.base)
  }

  fn require_realized(&self, action: &str) -> Result<&LabeledArray> {
    self.payload().ok_or_else(|| {
      Error::IllegalState(format!(
        "cannot {action} with {} pending operations; force the expression first",
        self.steps.len()
      ))
    })
  }

  /// Axis names of the realized value.
  pub fn axes(&self) -> Result<Vec<&str>> {
    Ok(self.require_realized("read axes")?.axis_names())
  }

  fn extend(&self, step: Step, notation: String) -> Expression {
    let mut steps = Vec::with_capacity(self.steps.len() + 1);
    steps.extend_from_slice(&self.steps);
    steps.push(step);
    Expression {
      base: Arc::clone(&self.base),
      steps,
      notation,
    }
  }

  fn binary(
    &self,
    op: BinaryOp,
    other: Expression,
    order: Order,
  ) -> Expression {
    let notation = match order {
      Order::Forward => notation::binary(op, &self.notation, &other.notation),
      Order::Reversed => notation::binary(op, &other.notation, &self.notation),
    };
    self.extend(
      Step::Binary {
        op,
        order,
        operand: Arc::new(other),
      },
      notation,
    )
  }

  /// `self + rhs`
  pub fn add(&self, rhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Add, rhs.into(), Order::Forward)
  }

  /// `lhs + self`
  pub fn radd(&self, lhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Add, lhs.into(), Order::Reversed)
  }

  /// `self - rhs`
  pub fn subtract(&self, rhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Subtract, rhs.into(), Order::Forward)
  }

  /// `lhs - self`
  pub fn rsubtract(&self, lhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Subtract, lhs.into(), Order::Reversed)
  }

  /// `self * rhs`
  pub fn multiply(&self, rhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Multiply, rhs.into(), Order::Forward)
  }

  /// `lhs * self`
  pub fn rmultiply(&self, lhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Multiply, lhs.into(), Order::Reversed)
  }

  /// `self / rhs`
  pub fn divide(&self, rhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Divide, rhs.into(), Order::Forward)
  }

  /// `lhs / self`
  pub fn rdivide(&self, lhs: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Divide, lhs.into(), Order::Reversed)
  }

  /// `self ^ exponent`
  pub fn power(&self, exponent: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Power, exponent.into(), Order::Forward)
  }

  /// `base ^ self`
  pub fn rpower(&self, base: impl Into<Expression>) -> Expression {
    self.binary(BinaryOp::Power, base.into(), Order::Reversed)
  }

  /// Sum over `axis`, or over every axis when `None`.
  ///
  /// The axis is checked when the expression is forced, not here.
  pub fn sum(&self, axis: Option<&str>) -> Expression {
    self.extend(
      Step::Sum {
        axis: axis.map(str::to_string),
      },
      notation::summation(axis, &self.notation),
    )
  }

  /// Element-wise natural logarithm.
  pub fn ln(&self) -> Expression {
    self.extend(Step::Ln, notation::natural_log(&self.notation))
  }

  /// Apply every pending step, in order, to the base value.
  ///
  /// Forcing a realized expression returns an equal copy. Pending operands
  /// are forced from an explicit stack, so nesting depth is bounded by
  /// memory rather than by the call stack.
  pub fn force(&self) -> Result<Expression> {
    if self.is_realized() {
      return Ok(self.clone());
    }
    let value = self.evaluate()?;
    debug!(
      steps = self.steps.len(),
      axes = ?value.axis_names(),
      "expression forced"
    );
    Ok(Expression {
      base: Arc::new(value),
      steps: Vec::new(),
      notation: self.notation.clone(),
    })
  }

  fn evaluate(&self) -> Result<LabeledArray> {
    let mut stack = vec![Frame::new(self)];
    // Value of the operand most recently popped off the stack.
    let mut forced: Option<LabeledArray> = None;
    loop {
      let depth = stack.len();
      let Some(frame) = stack.last_mut() else { break };
      let expression = frame.expression;
      let Some(step) = expression.steps.get(frame.next) else {
        let value = match frame.value.take() {
          Some(value) => value,
          None => (*expression.base).clone(),
        };
        stack.pop();
        if stack.is_empty() {
          return Ok(value);
        }
        forced = Some(value);
        continue;
      };
      if forced.is_none() {
        if let Some(operand) = step.pending_operand() {
          stack.push(Frame::new(operand));
          continue;
        }
      }
      trace!(step = step.name(), depth = depth, "applying step");
      let current = frame.value.as_ref().unwrap_or(&*expression.base);
      let value = step.apply(current, forced.take().as_ref())?;
      frame.value = Some(value);
      frame.next += 1;
    }
    Err(Error::IllegalState("expression has nothing to force".to_string()))
  }

  /// Symbol attached to the realized value. Pending expressions have none.
  pub fn symbol(&self) -> Option<&str> {
    self.payload().and_then(LabeledArray::symbol)
  }

  /// Attach a symbol to the realized value.
  pub fn set_symbol(&mut self, symbol: impl Into<String>) -> Result<()> {
    self.require_realized("attach a symbol")?;
    Arc::make_mut(&mut self.base).set_symbol(symbol);
    Ok(())
  }

  /// The symbol subscripted by the realized axes, e.g. `T_{bins,region,time}`.
  pub fn canonical_symbol(&self) -> Result<String> {
    let symbol = self.symbol().ok_or(Error::MissingSymbol)?;
    Ok(notation::indexed(symbol, &self.axes()?))
  }

  /// `canonical symbol = notation`
  pub fn equation(&self) -> Result<String> {
    Ok(notation::equation(&self.canonical_symbol()?, &self.notation))
  }

  /// Replace the notation with `label` subscripted by the realized axes,
  /// collapsing the derivation into a short reference.
  pub fn set_notation(&mut self, label: &str) -> Result<()> {
    let relabeled = notation::indexed(label, &self.axes()?);
    self.notation = relabeled;
    Ok(())
  }

  /// Like [`Expression::set_notation`], leaving `self` untouched.
  pub fn relabel(&self, label: &str) -> Result<Expression> {
    let mut relabeled = self.clone();
    relabeled.set_notation(label)?;
    Ok(relabeled)
  }

  /// Send the equation to a rendering sink.
  pub fn display(&self, renderer: &mut dyn Renderer) -> Result<()> {
    renderer.render_equation(&self.equation()?);
    Ok(())
  }

  /// Send the bare notation to a rendering sink.
  pub fn display_notation(&self, renderer: &mut dyn Renderer) {
    renderer.render_notation(&self.notation);
  }

  /// JSON description of the recipe: base summary, steps and notation.
  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string(self)
      .map_err(|e| Error::Serialization(e.to_string()))
  }
}

/// Wraps an array; its notation is the indexed symbol when one is attached,
/// otherwise the literal values.
impl From<LabeledArray> for Expression {
  fn from(value: LabeledArray) -> Self {
    let notation = match value.symbol() {
      Some(symbol) => notation::indexed(symbol, &value.axis_names()),
      None => match value.as_scalar() {
        Some(scalar) => notation::literal(scalar),
        None => value.to_string(),
      },
    };
    Expression::with_notation(value, notation)
  }
}

impl From<f64> for Expression {
  fn from(value: f64) -> Self {
    Expression::literal(value)
  }
}

impl From<i32> for Expression {
  fn from(value: i32) -> Self {
    Expression::literal(f64::from(value))
  }
}

impl From<&Expression> for Expression {
  fn from(expression: &Expression) -> Self {
    expression.clone()
  }
}

impl std::fmt::Display for Expression {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.notation)
  }
}

/// Operands are unlinked into a local worklist before they are dropped, so
/// deeply nested expressions are freed without recursing once per level.
impl Drop for Expression {
  fn drop(&mut self) {
    let mut operands = take_operands(&mut self.steps);
    while let Some(operand) = operands.pop() {
      if let Ok(mut expression) = Arc::try_unwrap(operand) {
        operands.extend(take_operands(&mut expression.steps));
      }
    }
  }
}

fn take_operands(steps: &mut Vec<Step>) -> Vec<Arc<Expression>> {
  steps
    .drain(..)
    .filter_map(|step| match step {
      Step::Binary { operand, .. } => Some(operand),
      _ => None,
    })
    .collect()
}
