//! Arithmetic over named-axis arrays that derives a LaTeX notation for every
//! intermediate result.
//!
//! Values come from a [`Catalog`] as [`Expression`]s. Composing expressions
//! builds a deferred recipe and its notation side by side;
//! [`Expression::force`] runs the recipe.
//!
//! ```
//! use notated::{Catalog, CatalogConfig, Dimensions};
//!
//! let catalog = Catalog::with_config(&CatalogConfig {
//!   dimensions: Dimensions::small(),
//!   ..CatalogConfig::default()
//! })?;
//! let t = catalog.get("temperature")?;
//! let total = t.sum(Some("bins"));
//! assert_eq!(total.notation(), r"\sum_{bins}{\left\{T_{bins,region,time}\right\}}");
//! assert_eq!(total.force()?.axes()?, vec!["region", "time"]);
//! # Ok::<(), notated::Error>(())
//! ```

use thiserror::Error;

pub mod array;
pub mod catalog;
pub mod expression;
pub mod notation;
pub mod ops;
pub mod render;

pub use array::{Axis, LabeledArray};
pub use catalog::{Catalog, CatalogConfig, Dimensions};
pub use expression::{Expression, Order, Step};
pub use ops::BinaryOp;
pub use render::{CapturedRenderer, Renderer, StdoutRenderer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  #[error("Unknown variable: {0}")]
  UnknownVariable(String),
  #[error("No symbol attached to expression")]
  MissingSymbol,
  #[error("Illegal state: {0}")]
  IllegalState(String),
  #[error("Invalid axis {axis:?}, available axes: {available:?}")]
  InvalidAxis {
    axis: String,
    available: Vec<String>,
  },
  #[error("Domain error: {0}")]
  DomainError(String),
  #[error("Axis {axis:?} has length {left} on the left and {right} on the right")]
  ShapeMismatch {
    axis: String,
    left: usize,
    right: usize,
  },
  #[error("Invalid shape: {0}")]
  InvalidShape(String),
  #[error("Serialization error: {0}")]
  Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
