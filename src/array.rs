//! Dense labeled arrays.
//!
//! A [`LabeledArray`] is an N-dimensional block of `f64` values stored in
//! row-major order, where every axis carries a name. Binary operations align
//! operands by axis name rather than by position: an axis present on only one
//! side is broadcast over the other. The result keeps the left operand's axes
//! first, followed by any axes only the right operand has.
//!
//! Arithmetic results never inherit the `symbol` or `description` attributes
//! of their inputs. Those describe a concrete catalog entry, not a value
//! derived from it.

use serde::Serialize;

use crate::ops::BinaryOp;
use crate::{Error, Result};

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Axis {
  pub name: String,
  pub len: usize,
}

impl Axis {
  pub fn new(name: impl Into<String>, len: usize) -> Self {
    Axis {
      name: name.into(),
      len,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
  axes: Vec<Axis>,
  data: Vec<f64>,
  symbol: Option<String>,
  description: Option<String>,
}

/// Metadata of an array without its values.
#[derive(Debug, Serialize)]
pub struct ArraySummary<'a> {
  pub axes: &'a [Axis],
  #[serde(skip_serializing_if = "Option::is_none")]
  pub symbol: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<f64>,
}

fn element_count(axes: &[Axis]) -> usize {
  axes.iter().map(|axis| axis.len).product()
}

/// Row-major strides for `axes`.
fn strides(axes: &[Axis]) -> Vec<usize> {
  let mut strides = vec![1; axes.len()];
  for i in (0..axes.len().saturating_sub(1)).rev() {
    strides[i] = strides[i + 1] * axes[i + 1].len;
  }
  strides
}

fn check_unique(axes: &[Axis]) -> Result<()> {
  for (i, axis) in axes.iter().enumerate() {
    if axes[..i].iter().any(|other| other.name == axis.name) {
      return Err(Error::InvalidShape(format!(
        "axis {:?} appears more than once",
        axis.name
      )));
    }
  }
  Ok(())
}

impl LabeledArray {
  /// A zero-dimensional array holding a single value.
  pub fn scalar(value: f64) -> Self {
    LabeledArray {
      axes: Vec::new(),
      data: vec![value],
      symbol: None,
      description: None,
    }
  }

  /// Build an array from row-major `data`.
  pub fn from_vec(axes: Vec<Axis>, data: Vec<f64>) -> Result<Self> {
    check_unique(&axes)?;
    let expected = element_count(&axes);
    if data.len() != expected {
      return Err(Error::InvalidShape(format!(
        "expected {expected} values for shape {:?}, got {}",
        axes.iter().map(|axis| axis.len).collect::<Vec<_>>(),
        data.len()
      )));
    }
    Ok(LabeledArray {
      axes,
      data,
      symbol: None,
      description: None,
    })
  }

  /// Build an array by calling `f` once per element in row-major order.
  pub fn from_fn(axes: Vec<Axis>, f: impl FnMut() -> f64) -> Result<Self> {
    check_unique(&axes)?;
    let data = std::iter::repeat_with(f)
      .take(element_count(&axes))
      .collect();
    Ok(LabeledArray {
      axes,
      data,
      symbol: None,
      description: None,
    })
  }

  pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
    self.symbol = Some(symbol.into());
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn axes(&self) -> &[Axis] {
    &self.axes
  }

  pub fn axis_names(&self) -> Vec<&str> {
    self.axes.iter().map(|axis| axis.name.as_str()).collect()
  }

  pub fn shape(&self) -> Vec<usize> {
    self.axes.iter().map(|axis| axis.len).collect()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn values(&self) -> &[f64] {
    &self.data
  }

  /// Element at a multi-index, one coordinate per axis.
  pub fn get(&self, index: &[usize]) -> Option<f64> {
    if index.len() != self.axes.len()
      || index.iter().zip(&self.axes).any(|(i, axis)| *i >= axis.len)
    {
      return None;
    }
    let offset: usize = index
      .iter()
      .zip(strides(&self.axes))
      .map(|(i, stride)| i * stride)
      .sum();
    self.data.get(offset).copied()
  }

  /// The single value of a zero-dimensional array.
  pub fn as_scalar(&self) -> Option<f64> {
    if self.axes.is_empty() {
      self.data.first().copied()
    } else {
      None
    }
  }

  pub fn symbol(&self) -> Option<&str> {
    self.symbol.as_deref()
  }

  pub fn set_symbol(&mut self, symbol: impl Into<String>) {
    self.symbol = Some(symbol.into());
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn summary(&self) -> ArraySummary<'_> {
    ArraySummary {
      axes: &self.axes,
      symbol: self.symbol(),
      value: self.as_scalar(),
    }
  }

  fn position(&self, name: &str) -> Option<usize> {
    self.axes.iter().position(|axis| axis.name == name)
  }

  /// Combine two arrays element-wise, broadcasting by axis name.
  pub fn zip_with(&self, other: &LabeledArray, op: BinaryOp) -> Result<Self> {
    let mut axes = self.axes.clone();
    for axis in &other.axes {
      match self.position(&axis.name) {
        Some(i) if self.axes[i].len != axis.len => {
          return Err(Error::ShapeMismatch {
            axis: axis.name.clone(),
            left: self.axes[i].len,
            right: axis.len,
          });
        }
        Some(_) => {}
        None => axes.push(axis.clone()),
      }
    }

    // Stride of each result axis within each operand, zero when broadcast.
    let operand_strides = |array: &LabeledArray| -> Vec<usize> {
      let own = strides(&array.axes);
      axes
        .iter()
        .map(|axis| array.position(&axis.name).map_or(0, |i| own[i]))
        .collect()
    };
    let lhs_strides = operand_strides(self);
    let rhs_strides = operand_strides(other);

    let total = element_count(&axes);
    let mut data = Vec::with_capacity(total);
    let mut index = vec![0usize; axes.len()];
    let (mut lhs_offset, mut rhs_offset) = (0usize, 0usize);
    for _ in 0..total {
      data.push(op.apply(self.data[lhs_offset], other.data[rhs_offset])?);
      for d in (0..axes.len()).rev() {
        index[d] += 1;
        lhs_offset += lhs_strides[d];
        rhs_offset += rhs_strides[d];
        if index[d] < axes[d].len {
          break;
        }
        lhs_offset -= lhs_strides[d] * axes[d].len;
        rhs_offset -= rhs_strides[d] * axes[d].len;
        index[d] = 0;
      }
    }

    Ok(LabeledArray {
      axes,
      data,
      symbol: None,
      description: None,
    })
  }

  /// Sum over the named axis, or over every axis when `axis` is `None`.
  pub fn sum(&self, axis: Option<&str>) -> Result<Self> {
    let Some(name) = axis else {
      return Ok(LabeledArray::scalar(self.data.iter().sum()));
    };
    let position = self.position(name).ok_or_else(|| Error::InvalidAxis {
      axis: name.to_string(),
      available: self.axes.iter().map(|axis| axis.name.clone()).collect(),
    })?;

    let outer: usize = element_count(&self.axes[..position]);
    let reduced = self.axes[position].len;
    let inner: usize = element_count(&self.axes[position + 1..]);
    let mut data = vec![0.0; outer * inner];
    for o in 0..outer {
      for k in 0..reduced {
        let row = (o * reduced + k) * inner;
        for (i, slot) in data[o * inner..(o + 1) * inner].iter_mut().enumerate()
        {
          *slot += self.data[row + i];
        }
      }
    }

    let mut axes = self.axes.clone();
    axes.remove(position);
    Ok(LabeledArray {
      axes,
      data,
      symbol: None,
      description: None,
    })
  }

  /// Element-wise natural logarithm.
  pub fn ln(&self) -> Result<Self> {
    let data = self
      .data
      .iter()
      .map(|&value| {
        if value > 0.0 {
          Ok(value.ln())
        } else {
          Err(Error::DomainError(format!(
            "logarithm of non-positive value {value}"
          )))
        }
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(LabeledArray {
      axes: self.axes.clone(),
      data,
      symbol: None,
      description: None,
    })
  }
}

/// Nested list rendering, e.g. `[[1, 2], [3, 4]]`.
impl std::fmt::Display for LabeledArray {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    fn nested(
      f: &mut std::fmt::Formatter<'_>,
      shape: &[usize],
      data: &[f64],
    ) -> std::fmt::Result {
      let Some((&len, rest)) = shape.split_first() else {
        return write!(f, "{}", data[0]);
      };
      let chunk = rest.iter().product::<usize>();
      write!(f, "[")?;
      for i in 0..len {
        if i > 0 {
          write!(f, ", ")?;
        }
        nested(f, rest, &data[i * chunk..(i + 1) * chunk])?;
      }
      write!(f, "]")
    }
    nested(f, &self.shape(), &self.data)
  }
}
