//! Monoid policies for the sortable segment tree.
//!
//! Aggregates are folded left to right over positions. Policies whose `op`
//! is not commutative rely on the structure keeping a reverse aggregate next
//! to the forward one, so that a descending run can be folded without
//! touching its nodes.

use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg};

use modint::ModInt;

/// A monoid over `Value` with an evaluation step into `Scalar`.
pub trait Monoid {
    type Value: Clone;
    type Scalar;

    /// Whether `op` is commutative.
    ///
    /// If `true`, implementations may reuse the forward aggregate as the
    /// reverse aggregate.
    const COMMUTE: bool;

    fn unit() -> Self::Value;

    /// Combine as `left` followed by `right`.
    fn op(left: &Self::Value, right: &Self::Value) -> Self::Value;

    /// Apply an aggregate to a scalar.
    fn eval(value: &Self::Value, x: Self::Scalar) -> Self::Scalar;
}

/// Field-like coefficient used by the provided policies.
pub trait Coefficient:
    Copy + PartialEq + Add<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn checked_inv(self) -> Option<Self>;
}

impl<const MOD: u32> Coefficient for ModInt<MOD> {
    #[inline(always)]
    fn zero() -> Self {
        ModInt::zero()
    }

    #[inline(always)]
    fn one() -> Self {
        ModInt::one()
    }

    #[inline(always)]
    fn checked_inv(self) -> Option<Self> {
        self.inv().ok()
    }
}

/// The affine map `x -> a * x + b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine<K> {
    pub a: K,
    pub b: K,
}

impl<K: Coefficient> Affine<K> {
    pub fn new(a: K, b: K) -> Self {
        Self { a, b }
    }

    pub fn identity() -> Self {
        Self {
            a: K::one(),
            b: K::zero(),
        }
    }

    #[inline(always)]
    pub fn apply(&self, x: K) -> K {
        self.a * x + self.b
    }

    /// `None` when `a` has no inverse.
    pub fn inverse(&self) -> Option<Self> {
        let a = self.a.checked_inv()?;
        Some(Self { a, b: -(a * self.b) })
    }
}

/// Composition of affine maps in position order.
///
/// `op(f, g)` is "apply `f`, then `g`", i.e. `g ∘ f`.
#[derive(Clone, Copy, Debug)]
pub struct AffineComposite<K>(PhantomData<K>);

impl<K: Coefficient> Monoid for AffineComposite<K> {
    type Value = Affine<K>;
    type Scalar = K;

    const COMMUTE: bool = false;

    #[inline(always)]
    fn unit() -> Self::Value {
        Affine::identity()
    }

    #[inline(always)]
    fn op(left: &Self::Value, right: &Self::Value) -> Self::Value {
        // right ∘ left
        Affine {
            a: left.a * right.a,
            b: left.b * right.a + right.b,
        }
    }

    #[inline(always)]
    fn eval(value: &Self::Value, x: Self::Scalar) -> Self::Scalar {
        value.apply(x)
    }
}

/// Sum of coefficients; `eval` adds the sum to the scalar.
#[derive(Clone, Copy, Debug)]
pub struct RangeSum<K>(PhantomData<K>);

impl<K: Coefficient> Monoid for RangeSum<K> {
    type Value = K;
    type Scalar = K;

    const COMMUTE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {
        K::zero()
    }

    #[inline(always)]
    fn op(left: &Self::Value, right: &Self::Value) -> Self::Value {
        *left + *right
    }

    #[inline(always)]
    fn eval(value: &Self::Value, x: Self::Scalar) -> Self::Scalar {
        *value + x
    }
}
