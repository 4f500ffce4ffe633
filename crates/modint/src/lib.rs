//! Integers modulo a compile-time modulus.
//!
//! `ModInt<MOD>` keeps its residue in `[0, MOD)` and is `Copy`, so it can be
//! used directly as a coefficient in monoid policies.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use thiserror::Error;

pub const MOD998244353: u32 = 998_244_353;
pub const MOD1000000007: u32 = 1_000_000_007;

pub type ModInt998 = ModInt<MOD998244353>;
pub type ModInt1000000007 = ModInt<MOD1000000007>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ModIntError {
    #[error("zero has no multiplicative inverse")]
    ZeroInverse,
    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible { value: u32, modulus: u32 },
}

pub type Result<T> = std::result::Result<T, ModIntError>;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModInt<const MOD: u32> {
    val: u32,
}

impl<const MOD: u32> ModInt<MOD> {
    pub const fn modulus() -> u32 {
        MOD
    }

    pub const fn zero() -> Self {
        Self { val: 0 }
    }

    pub const fn one() -> Self {
        Self { val: 1 % MOD }
    }

    pub fn new(value: u64) -> Self {
        Self {
            val: (value % MOD as u64) as u32,
        }
    }

    /// Wraps an already reduced residue.
    #[inline(always)]
    pub const fn from_raw(val: u32) -> Self {
        debug_assert!(val < MOD);
        Self { val }
    }

    #[inline(always)]
    pub const fn value(self) -> u32 {
        self.val
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.val == 0
    }

    pub fn pow(self, mut exp: u64) -> Self {
        let mut res = Self::one();
        let mut base = self;
        while exp > 0 {
            if exp & 1 == 1 {
                res *= base;
            }
            base *= base;
            exp >>= 1;
        }
        res
    }

    /// Multiplicative inverse by the extended Euclidean algorithm.
    ///
    /// Works for any modulus as long as `gcd(self, MOD) == 1`.
    pub fn inv(self) -> Result<Self> {
        if self.val == 0 {
            return Err(ModIntError::ZeroInverse);
        }

        let (mut a, mut b) = (self.val as i64, MOD as i64);
        let (mut u, mut v) = (1_i64, 0_i64);
        while b != 0 {
            let t = a / b;
            a -= t * b;
            std::mem::swap(&mut a, &mut b);
            u -= t * v;
            std::mem::swap(&mut u, &mut v);
        }
        if a != 1 {
            return Err(ModIntError::NotInvertible {
                value: self.val,
                modulus: MOD,
            });
        }
        Ok(Self::from(u))
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        Ok(self * rhs.inv()?)
    }
}

impl<const MOD: u32> From<i64> for ModInt<MOD> {
    fn from(value: i64) -> Self {
        let m = MOD as i64;
        Self {
            val: value.rem_euclid(m) as u32,
        }
    }
}

impl<const MOD: u32> From<u32> for ModInt<MOD> {
    fn from(value: u32) -> Self {
        Self { val: value % MOD }
    }
}

impl<const MOD: u32> From<u64> for ModInt<MOD> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const MOD: u32> fmt::Debug for ModInt<MOD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.val, f)
    }
}

impl<const MOD: u32> fmt::Display for ModInt<MOD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.val, f)
    }
}

impl<const MOD: u32> AddAssign for ModInt<MOD> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        let sum = self.val as u64 + rhs.val as u64;
        self.val = if sum >= MOD as u64 {
            (sum - MOD as u64) as u32
        } else {
            sum as u32
        };
    }
}

impl<const MOD: u32> SubAssign for ModInt<MOD> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.val = if self.val < rhs.val {
            (self.val as u64 + MOD as u64 - rhs.val as u64) as u32
        } else {
            self.val - rhs.val
        };
    }
}

impl<const MOD: u32> MulAssign for ModInt<MOD> {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        self.val = (self.val as u64 * rhs.val as u64 % MOD as u64) as u32;
    }
}

impl<const MOD: u32> Add for ModInt<MOD> {
    type Output = Self;

    #[inline(always)]
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const MOD: u32> Sub for ModInt<MOD> {
    type Output = Self;

    #[inline(always)]
    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const MOD: u32> Mul for ModInt<MOD> {
    type Output = Self;

    #[inline(always)]
    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl<const MOD: u32> Neg for ModInt<MOD> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self::zero() - self
    }
}
