use serde::Serialize;

use crate::{Error, Result};

/// Arithmetic operators an expression can be combined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
  Add,
  Subtract,
  Multiply,
  Divide,
  Power,
}

impl BinaryOp {
  /// Apply the operator to a pair of elements.
  ///
  /// Fails with [`Error::DomainError`] when the result is undefined, i.e.
  /// a division by zero, zero raised to a negative power, or a power
  /// without a real value.
  pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64> {
    match self {
      BinaryOp::Add => Ok(lhs + rhs),
      BinaryOp::Subtract => Ok(lhs - rhs),
      BinaryOp::Multiply => Ok(lhs * rhs),
      BinaryOp::Divide => {
        if rhs == 0.0 {
          Err(Error::DomainError(format!("division of {lhs} by zero")))
        } else {
          Ok(lhs / rhs)
        }
      }
      BinaryOp::Power => {
        if lhs == 0.0 && rhs < 0.0 {
          return Err(Error::DomainError(format!(
            "zero raised to the negative power {rhs}"
          )));
        }
        let result = lhs.powf(rhs);
        if result.is_nan() && !lhs.is_nan() && !rhs.is_nan() {
          Err(Error::DomainError(format!(
            "{lhs} raised to {rhs} has no real value"
          )))
        } else {
          Ok(result)
        }
      }
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      BinaryOp::Add => "add",
      BinaryOp::Subtract => "subtract",
      BinaryOp::Multiply => "multiply",
      BinaryOp::Divide => "divide",
      BinaryOp::Power => "power",
    }
  }
}

impl std::fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
