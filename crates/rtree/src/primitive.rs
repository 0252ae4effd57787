/* ---------------------------------------------------------------------------------------------- */
/*                                             TRAITS                                             */
/* ---------------------------------------------------------------------------------------------- */

use std::fmt::Debug;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

macro_rules! trait_alias {
	($vis:vis trait $name:ident {}, $($args:tt)*) => {
		$vis trait $name: $($args)+ {}
		impl<T> $name for T where T: $($args)+ {}
	};
}
trait_alias!(
    pub trait Number {},
    Copy + Debug + PartialOrd + Add<Output = Self> + Mul<Output = Self> + Sub<Output = Self> + NumberCommon
);

/// Coordinate scalar. Only signed types are supported, as area differences computed by the
/// split heuristics can go negative.
pub trait NumberCommon {
    /// Lowest value of the type. Negative infinity for floating point types.
    const MINVALUE: Self;

    /// Highest value of the type. Positive infinity for floating point types.
    const MAXVALUE: Self;

    fn one() -> Self;
    fn zero() -> Self;
}

pub trait Vector:
    Clone
    + Copy
    + Sized
    + Debug
    + PartialEq
    + Index<usize, Output = Self::Num>
    + IndexMut<usize, Output = Self::Num>
{
    type Num: Number;
    const D: AxisIndex;

    fn zero() -> Self;
    fn get(&self, i: AxisIndex) -> Self::Num;
    fn set(&mut self, i: AxisIndex, value: Self::Num);
}

pub type AxisIndex = usize;

/* -------------------------------------------- Exts -------------------------------------------- */

pub trait NumExt: Number {
    fn min_value(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    fn max_value(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }
}

impl<T: Number> NumExt for T {}

pub trait VectorExt: Vector {
    fn values(value: Self::Num) -> Self {
        let mut v = Self::zero();
        for i in 0..Self::D {
            v.set(i, value);
        }
        v
    }

    fn min_values(&self, other: &Self) -> Self {
        let mut v = Self::zero();
        for i in 0..Self::D {
            v.set(i, self.get(i).min_value(other.get(i)));
        }
        v
    }

    fn max_values(&self, other: &Self) -> Self {
        let mut v = Self::zero();
        for i in 0..Self::D {
            v.set(i, self.get(i).max_value(other.get(i)));
        }
        v
    }
}

impl<T: Vector> VectorExt for T {}

/* ------------------------------------------ Defaults ------------------------------------------ */

impl<T: Number, const D: usize> Vector for [T; D] {
    type Num = T;
    const D: AxisIndex = D;

    fn zero() -> Self {
        [T::zero(); D]
    }

    fn get(&self, i: AxisIndex) -> Self::Num {
        self[i]
    }

    fn set(&mut self, i: AxisIndex, value: Self::Num) {
        self[i] = value;
    }
}

#[doc(hidden)]
mod _impl_number {
    use super::NumberCommon;

    macro_rules! define_minmax {
        ($($ty:ty), *) => {
            $(impl NumberCommon for $ty {
                const MINVALUE: Self = Self::MIN;
                const MAXVALUE: Self = Self::MAX;

                fn one() -> Self {
                    1
                }

                fn zero() -> Self {
                    0
                }
            })*
        };
    }

    define_minmax!(i8, i16, i32, i64, i128, isize);

    macro_rules! define_minmax_float {
        ($($ty:ty), *) => {
            $(impl NumberCommon for $ty {
                const MINVALUE: Self = Self::NEG_INFINITY;
                const MAXVALUE: Self = Self::INFINITY;

                fn one() -> Self {
                    1.
                }

                fn zero() -> Self {
                    0.
                }
            })*
        };
    }

    define_minmax_float!(f32, f64);
}

/* ---------------------------------------------------------------------------------------------- */
/*                                         BOUNDING RECT                                          */
/* ---------------------------------------------------------------------------------------------- */

/// Axis aligned minimum bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound<V: Vector> {
    min: V,
    max: V,
}

impl<V: Vector> Default for Bound<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Vector> Bound<V> {
    /// Creates a new `Bound` spanning two corner points.
    ///
    /// The corners are reordered per axis, so that `min` is never greater than `max`.
    pub fn new(mut p1: V, mut p2: V) -> Self {
        for i in 0..V::D {
            let a = &mut p1[i];
            let b = &mut p2[i];

            if a > b {
                std::mem::swap(a, b);
            }
        }

        Self { min: p1, max: p2 }
    }

    /// Creates a `Bound` from raw extents, as given.
    ///
    /// No reordering is performed. An axis with `min > max` makes the rectangle empty.
    pub fn from_extents(min: V, max: V) -> Self {
        Self { min, max }
    }

    /// Degenerate rectangle covering a single point.
    pub fn point(p: V) -> Self {
        Self { min: p, max: p }
    }

    /// The identity element of [`Bound::union`]; contains nothing and overlaps nothing.
    pub fn empty() -> Self {
        Self {
            min: V::values(V::Num::MAXVALUE),
            max: V::values(V::Num::MINVALUE),
        }
    }

    pub fn min(&self) -> &V {
        &self.min
    }

    pub fn max(&self) -> &V {
        &self.max
    }

    pub fn is_empty(&self) -> bool {
        (0..V::D).any(|i| self.min[i] > self.max[i])
    }

    /// Product of the side lengths, taken as absolute values so that inverted extents still
    /// measure their span. Only [`Bound::empty`] has zero area by definition.
    pub fn area(&self) -> V::Num {
        if self.is_identity() {
            return V::Num::zero();
        }

        let mut area = V::Num::one();
        for i in 0..V::D {
            let (min, max) = (self.min[i], self.max[i]);
            area = area * if max > min { max - min } else { min - max };
        }
        area
    }

    fn is_identity(&self) -> bool {
        (0..V::D).all(|i| self.min[i] == V::Num::MAXVALUE && self.max[i] == V::Num::MINVALUE)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_values(&other.min),
            max: self.max.max_values(&other.max),
        }
    }

    pub fn expand(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// Area growth needed for `self` to cover `other` as well.
    pub fn enlargement(&self, other: &Self) -> V::Num {
        self.union(other).area() - self.area()
    }

    /// Inclusive on every border.
    pub fn contains(&self, other: &Self) -> bool {
        (0..V::D).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    pub fn contains_point(&self, point: &V) -> bool {
        (0..V::D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Rectangles sharing only a border still overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..V::D).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }
}

/* ----------------------------------------- Planar Form ---------------------------------------- */

impl<N: Number> Bound<[N; 2]> {
    /// Planar rectangle in `min_x, max_x, min_y, max_y` order. Extents are taken as given.
    pub fn from_xy(min_x: N, max_x: N, min_y: N, max_y: N) -> Self {
        Self::from_extents([min_x, min_y], [max_x, max_y])
    }

    pub fn min_x(&self) -> N {
        self.min[0]
    }

    pub fn max_x(&self) -> N {
        self.max[0]
    }

    pub fn min_y(&self) -> N {
        self.min[1]
    }

    pub fn max_y(&self) -> N {
        self.max[1]
    }
}

/* ---------------------------------------------------------------------------------------------- */
/*                                              TESTS                                             */
/* ---------------------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::Bound;

    type B = Bound<[f64; 2]>;

    #[test]
    fn union_with_empty_is_identity() {
        let rect = B::from_xy(1., 2., 3., 4.);

        assert_eq!(B::empty().union(&rect), rect);
        assert_eq!(rect.union(&B::empty()), rect);
        assert_eq!(B::empty().union(&B::empty()), B::empty());
        assert!(B::empty().is_empty());
        assert!(B::default().is_empty());
    }

    #[test]
    fn union_spans_both() {
        let a = B::from_xy(1., 2., 3., 4.);
        let b = B::from_xy(4., 8., 4., 8.);
        let u = a.union(&b);

        assert_eq!(u, b.union(&a));
        assert_eq!([u.min_x(), u.max_x(), u.min_y(), u.max_y()], [1., 8., 3., 8.]);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn area() {
        assert_eq!(B::from_xy(1., 2., 3., 4.).area(), 1.);
        assert_eq!(B::from_xy(4., 8., 4., 8.).area(), 16.);
        assert_eq!(B::from_xy(0., 0.5, 0., 3.).area(), 1.5);
        assert_eq!(B::point([3., 3.]).area(), 0.);
        assert_eq!(B::empty().area(), 0.);
        assert_eq!(Bound::new([0, 0, 0], [2, 3, 4]).area(), 24);
    }

    #[test]
    fn inverted_extents_keep_their_area() {
        let inverted = B::from_xy(5., 1., 0., 3.);
        assert!(inverted.is_empty());
        assert_eq!(inverted.area(), 12.);
        assert_eq!(B::from_xy(5., 1., 3., 0.).area(), 12.);

        // Grows like any other rectangle once merged.
        assert_eq!(B::from_xy(1., 5., 0., 3.).enlargement(&inverted), 0.);

        let inverted = Bound::<[i32; 2]>::from_xy(4, 0, 0, 2);
        assert_eq!(inverted.area(), 8);

        // No `MAX - MIN` overflow on the integer empty bound.
        assert_eq!(Bound::<[i32; 2]>::empty().area(), 0);
        assert_eq!(Bound::<[i64; 3]>::empty().area(), 0);
    }

    #[test]
    fn enlargement() {
        let a = B::from_xy(0., 1., 0., 1.);

        assert_eq!(a.enlargement(&B::from_xy(0.2, 0.8, 0.2, 0.8)), 0.);
        assert_eq!(a.enlargement(&B::from_xy(1., 2., 0., 1.)), 1.);
        assert_eq!(B::empty().enlargement(&a), 1.);
    }

    #[test]
    fn new_reorders_corners() {
        let rect = B::new([5., 1.], [2., 7.]);
        assert_eq!(rect, B::from_xy(2., 5., 1., 7.));
        assert!(!rect.is_empty());
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = B::from_xy(0., 5., 0., 5.);

        assert!(a.overlaps(&B::from_xy(5., 6., 5., 6.)));
        assert!(a.overlaps(&B::from_xy(-1., 0., 2., 3.)));
        assert!(a.overlaps(&B::from_xy(1., 2., 1., 2.)));
        assert!(!a.overlaps(&B::from_xy(5.1, 6., 5., 6.)));
        assert!(!a.overlaps(&B::from_xy(10., 11., 10., 11.)));
        assert!(!a.overlaps(&B::empty()));
        assert!(!B::empty().overlaps(&a));
    }

    #[test]
    fn containment() {
        let outer = B::from_xy(0., 10., 0., 10.);

        assert!(outer.contains(&outer));
        assert!(outer.contains(&B::from_xy(0., 1., 9., 10.)));
        assert!(!outer.contains(&B::from_xy(-1., 1., 9., 10.)));
        assert!(outer.contains_point(&[10., 0.]));
        assert!(!outer.contains_point(&[10.5, 0.]));

        // Containment always implies overlap.
        let inner = B::from_xy(2., 3., 2., 3.);
        assert!(outer.contains(&inner) && outer.overlaps(&inner));
    }

    #[test]
    fn integer_coordinates() {
        let a = Bound::<[i32; 2]>::from_xy(0, 4, 0, 4);
        let b = Bound::<[i32; 2]>::from_xy(2, 6, 2, 6);

        assert_eq!(Bound::empty().union(&a), a);
        assert_eq!(a.union(&b).area(), 36);
        assert_eq!(a.enlargement(&b), 20);
        assert!(a.overlaps(&b));
    }
}
