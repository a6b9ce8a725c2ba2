//! LaTeX markup for derivations.
//!
//! Every function here wraps already-valid markup in a construct that keeps
//! it valid, so any composition of them yields balanced braces and paired
//! `\left`/`\right` delimiters.

use crate::ops::BinaryOp;

/// Literal form of a plain number: `5.0` renders as `5`, `2.5` as `2.5`.
pub fn literal(value: f64) -> String {
  format!("{value}")
}

/// A symbol subscripted by its axes, e.g. `T_{bins,region,time}`.
pub fn indexed(symbol: &str, axes: &[&str]) -> String {
  format!("{symbol}_{{{}}}", axes.join(","))
}

fn parenthesized(markup: &str) -> String {
  format!(r"\left({markup}\right)")
}

pub fn binary(op: BinaryOp, lhs: &str, rhs: &str) -> String {
  match op {
    BinaryOp::Add => format!("{lhs} + {rhs}"),
    BinaryOp::Subtract => format!("{lhs} - {rhs}"),
    BinaryOp::Multiply => {
      format!("{}{}", parenthesized(lhs), parenthesized(rhs))
    }
    BinaryOp::Divide => {
      format!(r"\frac{{{}}}{{{}}}", parenthesized(lhs), parenthesized(rhs))
    }
    BinaryOp::Power => {
      format!("{{{}}}^{{{}}}", parenthesized(lhs), parenthesized(rhs))
    }
  }
}

/// Summation over `axis`, or over everything when no axis is named.
pub fn summation(axis: Option<&str>, body: &str) -> String {
  let bound = axis.map(|axis| format!("_{{{axis}}}")).unwrap_or_default();
  format!(r"\sum{bound}{{\left\{{{body}\right\}}}}")
}

pub fn natural_log(body: &str) -> String {
  format!(r"\ln{{{}}}", parenthesized(body))
}

/// `lhs = rhs`
pub fn equation(lhs: &str, rhs: &str) -> String {
  format!("{lhs} = {rhs}")
}

/// Inline math mode, `$markup$`.
pub fn inline_math(markup: &str) -> String {
  format!("${markup}$")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn literals() {
    assert_eq!(literal(5.0), "5");
    assert_eq!(literal(2.5), "2.5");
    assert_eq!(literal(-0.125), "-0.125");
  }

  #[test]
  fn indexed_symbols() {
    assert_eq!(
      indexed("T", &["bins", "region", "time"]),
      "T_{bins,region,time}"
    );
    assert_eq!(indexed(r"\alpha", &["bins"]), r"\alpha_{bins}");
    assert_eq!(indexed("c", &[]), "c_{}");
  }

  #[test]
  fn binary_operators() {
    assert_eq!(binary(BinaryOp::Add, "a", "b"), "a + b");
    assert_eq!(binary(BinaryOp::Subtract, "a", "b"), "a - b");
    assert_eq!(
      binary(BinaryOp::Multiply, "a", "b"),
      r"\left(a\right)\left(b\right)"
    );
    assert_eq!(
      binary(BinaryOp::Divide, "a", "b"),
      r"\frac{\left(a\right)}{\left(b\right)}"
    );
    assert_eq!(
      binary(BinaryOp::Power, "a", "b"),
      r"{\left(a\right)}^{\left(b\right)}"
    );
  }

  #[test]
  fn summations() {
    assert_eq!(
      summation(Some("bins"), "x"),
      r"\sum_{bins}{\left\{x\right\}}"
    );
    assert_eq!(summation(None, "x"), r"\sum{\left\{x\right\}}");
  }

  #[test]
  fn logarithm() {
    assert_eq!(natural_log("x"), r"\ln{\left(x\right)}");
  }

  #[test]
  fn equations() {
    assert_eq!(equation("y_{t}", "x_{t} + 1"), "y_{t} = x_{t} + 1");
    assert_eq!(inline_math("y = x"), "$y = x$");
  }
}
