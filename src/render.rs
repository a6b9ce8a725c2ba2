//! Rendering sinks for notation and equations.

use crate::notation;

/// Accepts LaTeX markup for display.
pub trait Renderer {
  fn render_notation(&mut self, notation: &str);
  fn render_equation(&mut self, equation: &str);
}

/// Prints markup to stdout in inline math mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
  fn render_notation(&mut self, notation: &str) {
    println!("{}", notation::inline_math(notation));
  }

  fn render_equation(&mut self, equation: &str) {
    println!("{}", notation::inline_math(equation));
  }
}

/// Collects rendered markup in memory.
#[derive(Debug, Default, Clone)]
pub struct CapturedRenderer {
  pub notations: Vec<String>,
  pub equations: Vec<String>,
}

impl CapturedRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  /// The most recently rendered equation.
  pub fn last_equation(&self) -> Option<&str> {
    self.equations.last().map(String::as_str)
  }
}

impl Renderer for CapturedRenderer {
  fn render_notation(&mut self, notation: &str) {
    self.notations.push(notation.to_string());
  }

  fn render_equation(&mut self, equation: &str) {
    self.equations.push(equation.to_string());
  }
}
