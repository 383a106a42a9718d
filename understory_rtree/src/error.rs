// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types and the traversal control signal returned by search visitors.

use thiserror::Error;

/// Why a box could not be constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BoxError {
    /// `min_x` is greater than `max_x`.
    #[error("min_x is greater than max_x")]
    InvertedX,
    /// `min_y` is greater than `max_y`.
    #[error("min_y is greater than max_y")]
    InvertedY,
    /// A bound could not be ordered against its counterpart (NaN).
    #[error("bounds are not comparable (NaN)")]
    NotComparable,
}

/// Why a set of tree parameters was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Nodes must hold at least three entries so an overflowing node can be split
    /// into two nodes of at least two entries each.
    #[error("max_entries must be at least 3, got {0}")]
    MaxEntriesTooSmall(usize),
    /// The fill floor must be at least 2 and leave room for a valid split.
    #[error("min_entries {min} is out of range for max_entries {max}")]
    MinEntriesOutOfRange {
        /// Requested minimum fill.
        min: usize,
        /// Requested node capacity.
        max: usize,
    },
}

/// Signal returned by a search visitor to end a traversal early.
///
/// [`Halt::Stop`] ends the traversal and the search reports success.
/// [`Halt::Abort`] ends the traversal and the search returns the wrapped error.
/// Any `E` converts into `Halt::Abort`, so visitors can use `?` directly.
///
/// ```
/// use understory_rtree::{Aabb2D, Halt, RTreeF64};
///
/// let mut tree = RTreeF64::new();
/// for i in 0..10 {
///     let x = i as f64;
///     tree.insert(Aabb2D::new(x, 0.0, x + 0.5, 0.5), i);
/// }
///
/// // Take the first three hits in distance order, then stop.
/// let mut seen = Vec::new();
/// let res: Result<(), core::convert::Infallible> =
///     tree.nearest_search(Aabb2D::point(0.0, 0.0), |id| {
///         seen.push(id);
///         if seen.len() == 3 { Err(Halt::Stop) } else { Ok(()) }
///     });
/// assert!(res.is_ok());
/// assert_eq!(seen, [0, 1, 2]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Halt<E> {
    /// Stop visiting; not an error.
    #[error("traversal stopped")]
    Stop,
    /// Abort the traversal and propagate the error to the caller.
    #[error("traversal aborted: {0}")]
    Abort(E),
}

impl<E> From<E> for Halt<E> {
    fn from(err: E) -> Self {
        Self::Abort(err)
    }
}

/// Fold a visitor's [`Halt`] into the search result.
pub(crate) fn settle<E>(halt: Halt<E>) -> Result<(), E> {
    match halt {
        Halt::Stop => Ok(()),
        Halt::Abort(err) => Err(err),
    }
}
