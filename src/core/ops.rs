//! Built-in binary operators and semirings.
//!
//! | Semiring | ⊕ | ⊗ | identity | Typical use |
//! |----------|---|---|----------|-------------|
//! | [`PlusMultiplies`] | + | × | 0 | PageRank, counting paths |
//! | [`MinPlus`] | min | + | +∞ | shortest paths |
//! | [`MaxPlus`] | max | + | -∞ | longest / critical paths |
//! | [`LogicalOrAnd`] | ∨ | ∧ | false | reachability, BFS |
//!
//! Anything else can be expressed with [`CustomSemiring`].

use std::marker::PhantomData;
use std::ops::{Add, Mul};

use num_traits::{Float, Zero};

use crate::core::traits::{BinaryOp, Semiring};

/// `x + y`
#[derive(Debug, Clone, Copy, Default)]
pub struct Plus;

impl<T: Add<Output = T>> BinaryOp<T> for Plus {
    fn apply(&self, x: T, y: T) -> T {
        x + y
    }
}

/// `x * y`
#[derive(Debug, Clone, Copy, Default)]
pub struct Times;

impl<T: Mul<Output = T>> BinaryOp<T> for Times {
    fn apply(&self, x: T, y: T) -> T {
        x * y
    }
}

/// `min(x, y)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl<T: PartialOrd> BinaryOp<T> for Min {
    fn apply(&self, x: T, y: T) -> T {
        if y < x { y } else { x }
    }
}

/// `max(x, y)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl<T: PartialOrd> BinaryOp<T> for Max {
    fn apply(&self, x: T, y: T) -> T {
        if y > x { y } else { x }
    }
}

/// Keeps the left operand. As a duplicate-merge operator this keeps the first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl<T> BinaryOp<T> for First {
    fn apply(&self, x: T, _y: T) -> T {
        x
    }
}

/// Keeps the right operand (last occurrence wins).
#[derive(Debug, Clone, Copy, Default)]
pub struct Second;

impl<T> BinaryOp<T> for Second {
    fn apply(&self, _x: T, y: T) -> T {
        y
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalOr;

impl BinaryOp<bool> for LogicalOr {
    fn apply(&self, x: bool, y: bool) -> bool {
        x || y
    }
}

/// The arithmetic `(+, ×, 0)` semiring.
#[derive(Debug, Clone, Copy)]
pub struct PlusMultiplies<T>(PhantomData<T>);

impl<T> PlusMultiplies<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for PlusMultiplies<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Semiring<T> for PlusMultiplies<T>
where
    T: Copy + Zero + Mul<Output = T> + Sync,
{
    fn add(&self, x: T, y: T) -> T {
        x + y
    }
    fn multiply(&self, x: T, y: T) -> T {
        x * y
    }
    fn identity(&self) -> T {
        T::zero()
    }
}

/// The tropical `(min, +, +∞)` semiring.
#[derive(Debug, Clone, Copy)]
pub struct MinPlus<T>(PhantomData<T>);

impl<T> MinPlus<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for MinPlus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Sync> Semiring<T> for MinPlus<T> {
    fn add(&self, x: T, y: T) -> T {
        x.min(y)
    }
    fn multiply(&self, x: T, y: T) -> T {
        x + y
    }
    fn identity(&self) -> T {
        T::infinity()
    }
}

/// The tropical `(max, +, -∞)` semiring.
#[derive(Debug, Clone, Copy)]
pub struct MaxPlus<T>(PhantomData<T>);

impl<T> MaxPlus<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for MaxPlus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Sync> Semiring<T> for MaxPlus<T> {
    fn add(&self, x: T, y: T) -> T {
        x.max(y)
    }
    fn multiply(&self, x: T, y: T) -> T {
        x + y
    }
    fn identity(&self) -> T {
        T::neg_infinity()
    }
}

/// The boolean `(∨, ∧, false)` semiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalOrAnd;

impl Semiring<bool> for LogicalOrAnd {
    fn add(&self, x: bool, y: bool) -> bool {
        x || y
    }
    fn multiply(&self, x: bool, y: bool) -> bool {
        x && y
    }
    fn identity(&self) -> bool {
        false
    }
}

/// A semiring assembled from two closures and an identity.
///
/// ```
/// use graphmv::CustomSemiring;
/// // (max, min, 0) "widest path" semiring over non-negative capacities
/// let widest = CustomSemiring::new(|a: f32, b: f32| a.max(b), |a: f32, b: f32| a.min(b), 0.0);
/// # let _ = widest;
/// ```
#[derive(Clone)]
pub struct CustomSemiring<T, A, M> {
    add: A,
    mul: M,
    identity: T,
}

impl<T, A, M> CustomSemiring<T, A, M>
where
    A: Fn(T, T) -> T,
    M: Fn(T, T) -> T,
{
    pub fn new(add: A, mul: M, identity: T) -> Self {
        Self { add, mul, identity }
    }
}

impl<T, A, M> Semiring<T> for CustomSemiring<T, A, M>
where
    T: Copy + Sync,
    A: Fn(T, T) -> T + Sync,
    M: Fn(T, T) -> T + Sync,
{
    fn add(&self, x: T, y: T) -> T {
        (self.add)(x, y)
    }
    fn multiply(&self, x: T, y: T) -> T {
        (self.mul)(x, y)
    }
    fn identity(&self) -> T {
        self.identity
    }
}
