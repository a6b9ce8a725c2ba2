//! Operator sugar. Every impl here delegates to `Expression::binary`.

use std::ops::{
  Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign,
};

use super::{Expression, Order};
use crate::ops::BinaryOp;

macro_rules! binary_operator {
  ($trait:ident, $method:ident, $assign_trait:ident, $assign:ident, $op:expr) => {
    impl<T: Into<Expression>> $trait<T> for &Expression {
      type Output = Expression;

      fn $method(self, rhs: T) -> Expression {
        self.binary($op, rhs.into(), Order::Forward)
      }
    }

    impl<T: Into<Expression>> $trait<T> for Expression {
      type Output = Expression;

      fn $method(self, rhs: T) -> Expression {
        self.binary($op, rhs.into(), Order::Forward)
      }
    }

    impl $trait<&Expression> for f64 {
      type Output = Expression;

      fn $method(self, rhs: &Expression) -> Expression {
        rhs.binary($op, Expression::literal(self), Order::Reversed)
      }
    }

    impl $trait<Expression> for f64 {
      type Output = Expression;

      fn $method(self, rhs: Expression) -> Expression {
        rhs.binary($op, Expression::literal(self), Order::Reversed)
      }
    }

    impl<T: Into<Expression>> $assign_trait<T> for Expression {
      fn $assign(&mut self, rhs: T) {
        *self = self.binary($op, rhs.into(), Order::Forward);
      }
    }
  };
}

binary_operator!(Add, add, AddAssign, add_assign, BinaryOp::Add);
binary_operator!(Sub, sub, SubAssign, sub_assign, BinaryOp::Subtract);
binary_operator!(Mul, mul, MulAssign, mul_assign, BinaryOp::Multiply);
binary_operator!(Div, div, DivAssign, div_assign, BinaryOp::Divide);
