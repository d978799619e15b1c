use std::fmt::Debug;
use num_traits::{Bounded, CheckedAdd, Float, Zero};
use ordered_float::OrderedFloat;

/// Trait representing an edge weight usable in a distance matrix
///
/// Every weight type carries an explicit "no path" value. Adding anything to
/// that value yields it again, so unreachable cells stay unreachable no matter
/// how many rounds touch them.
pub trait Weight: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// The "no path" sentinel
    fn infinity() -> Self;

    /// The distance from a vertex to itself
    fn zero() -> Self;

    /// Returns true if this is the "no path" sentinel
    fn is_infinite(&self) -> bool;

    /// Length of the path formed by joining two paths
    fn path_add(self, other: Self) -> Self;

    /// Returns true if this weight is strictly below zero
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }
}

macro_rules! float_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn infinity() -> Self {
                    <$t as Float>::infinity()
                }

                #[inline]
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }

                #[inline]
                fn is_infinite(&self) -> bool {
                    Float::is_infinite(*self) && Float::is_sign_positive(*self)
                }

                // IEEE-754: inf + finite = inf and inf + inf = inf
                #[inline]
                fn path_add(self, other: Self) -> Self {
                    self + other
                }
            }
        )*
    };
}

float_weight!(f32, f64, OrderedFloat<f32>, OrderedFloat<f64>);

macro_rules! integer_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn infinity() -> Self {
                    <$t as Bounded>::max_value()
                }

                #[inline]
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }

                #[inline]
                fn is_infinite(&self) -> bool {
                    *self == <$t as Bounded>::max_value()
                }

                #[inline]
                fn path_add(self, other: Self) -> Self {
                    if Weight::is_infinite(&self) || Weight::is_infinite(&other) {
                        return <$t as Weight>::infinity();
                    }
                    let zero = <$t as Zero>::zero();
                    match CheckedAdd::checked_add(&self, &other) {
                        Some(sum) => sum,
                        // Overflow can only go downwards when both operands are negative
                        None if other < zero => <$t as Bounded>::min_value(),
                        None => <$t as Weight>::infinity(),
                    }
                }
            }
        )*
    };
}

integer_weight!(i32, i64, u32, u64);
