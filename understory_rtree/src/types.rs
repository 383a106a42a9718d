// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

use crate::error::BoxError;
use crate::wide::WideInt;

/// Axis-aligned bounding box in 2D.
///
/// Boxes are always well formed: `min_x <= max_x` and `min_y <= max_y`.
/// Degenerate boxes (zero width and/or height, including points) are valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Create a new AABB from min/max corners, rejecting inverted or unordered bounds.
    pub fn try_new(min_x: T, min_y: T, max_x: T, max_y: T) -> Result<Self, BoxError> {
        match min_x.partial_cmp(&max_x) {
            None => return Err(BoxError::NotComparable),
            Some(Ordering::Greater) => return Err(BoxError::InvertedX),
            _ => {}
        }
        match min_y.partial_cmp(&max_y) {
            None => return Err(BoxError::NotComparable),
            Some(Ordering::Greater) => return Err(BoxError::InvertedY),
            _ => {}
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Create a new AABB from min/max corners.
    ///
    /// # Panics
    ///
    /// Panics if a minimum exceeds its maximum or a bound is NaN.
    /// Use [`Aabb2D::try_new`] to handle untrusted input.
    #[track_caller]
    pub fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        match Self::try_new(min_x, min_y, max_x, max_y) {
            Ok(b) => b,
            Err(e) => panic!("malformed box: {e}"),
        }
    }

    /// A degenerate box covering a single point.
    #[track_caller]
    pub fn point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }

    /// Whether this AABB contains the point (boundary inclusive).
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether this AABB fully contains `other`.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether the two boxes intersect. Touching edges or corners count.
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// The tightest box covering both inputs.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }
}

impl Aabb2D<f32> {
    /// Create an AABB from origin and size in f32.
    #[track_caller]
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    #[track_caller]
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64.
    #[track_caller]
    pub fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Aabb2D<f64> {
    /// Converts a Kurbo rectangle, normalizing negative widths or heights.
    ///
    /// The rectangle must not contain NaN coordinates.
    fn from(rect: kurbo::Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl From<Aabb2D<f64>> for kurbo::Rect {
    fn from(b: Aabb2D<f64>) -> Self {
        Self::new(b.min_x, b.min_y, b.max_x, b.max_y)
    }
}

/// Numeric scalar abstraction for 2D AABBs used by the tree.
///
/// Areas, enlargements and squared distances are computed entirely in the
/// associated accumulator type: each coordinate is widened first and only then
/// subtracted, so spans never overflow or lose precision in `Self`
/// (f32→f64, f64→f64, i64→[`WideInt`]).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/distance computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Midpoint between a and b (used for centroid ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        f64::from(v)
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }
}

impl Scalar for i64 {
    type Acc = WideInt;

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        WideInt::from(i128::from(v))
    }
}

/// Compute the area of an AABB using the scalar's widened accumulator type.
#[inline]
pub fn area<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    let w = T::widen(a.max_x) - T::widen(a.min_x);
    let h = T::widen(a.max_y) - T::widen(a.min_y);
    w * h
}

/// Area of `union(a, b)` minus the area of `a`: how much `a` must grow to cover `b`.
#[inline]
pub fn enlargement<T: Scalar>(a: &Aabb2D<T>, b: &Aabb2D<T>) -> T::Acc {
    area(&union_aabb(*a, *b)) - area(a)
}

/// Squared Euclidean distance between the closest points of two boxes.
///
/// Zero when the boxes overlap or touch.
#[inline]
pub fn distance_sq<T: Scalar>(a: &Aabb2D<T>, b: &Aabb2D<T>) -> T::Acc {
    let dx = axis_gap(a.min_x, a.max_x, b.min_x, b.max_x);
    let dy = axis_gap(a.min_y, a.max_y, b.min_y, b.max_y);
    dx * dx + dy * dy
}

fn axis_gap<T: Scalar>(a_min: T, a_max: T, b_min: T, b_max: T) -> T::Acc {
    if lt(a_max, b_min) {
        T::widen(b_min) - T::widen(a_max)
    } else if lt(b_max, a_min) {
        T::widen(a_min) - T::widen(b_max)
    } else {
        T::widen(T::zero())
    }
}

/// Total order over accumulator values; incomparable values are treated as equal.
pub(crate) fn cmp_acc<A: PartialOrd>(a: &A, b: &A) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}
