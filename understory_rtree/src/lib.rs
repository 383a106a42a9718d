// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory R-tree: a dynamic 2D R-tree over axis-aligned boxes.
//!
//! Understory R-tree stores records, each an axis-aligned box tagged with an opaque
//! [`RecordId`], in a balanced tree of nested bounding boxes.
//!
//! - Insert records one at a time, or pack a whole set with [`RTree::bulk_load`].
//! - Delete a record by id, locating it with any box that overlaps its stored box.
//! - Search for every record overlapping a query box.
//! - Walk records nearest-first from a query box, stopping whenever you like.
//!
//! Nodes hold between `min_entries` and `max_entries` entries (see [`Params`]), all
//! leaves sit at the same depth, and every subtree entry's box is the exact union of
//! its child's entries. Overflowing nodes are split with Guttman's quadratic split.
//! Deletion dissolves under-full nodes and reinserts their records.
//!
//! The tree is generic over the scalar type `T` and uses widened accumulators for
//! areas and distances (f32→f64, f64→f64, i64→[`WideInt`]).
//!
//! # Example
//!
//! ```rust
//! use understory_rtree::{Aabb2D, RTreeF64};
//!
//! let mut tree = RTreeF64::new();
//! tree.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), 1);
//! tree.insert(Aabb2D::new(5.0, 5.0, 6.0, 6.0), 2);
//! tree.insert(Aabb2D::new(10.0, 10.0, 11.0, 11.0), 3);
//!
//! // Range search.
//! assert_eq!(tree.query_rect(Aabb2D::new(0.0, 0.0, 2.0, 2.0)), [1]);
//!
//! // Nearest-first from the far corner.
//! assert_eq!(tree.nearest(Aabb2D::point(12.0, 12.0), 3), [3, 2, 1]);
//!
//! // Delete with a box that merely overlaps the stored one.
//! assert!(tree.delete(Aabb2D::new(5.5, 5.5, 7.0, 7.0), 2));
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! Visitors drive the early-exit forms of search. Return [`Halt::Stop`] to end a
//! traversal successfully, or propagate your own error with `?`:
//!
//! ```rust
//! use understory_rtree::{Aabb2D, Halt, RTreeI64};
//!
//! let mut tree = RTreeI64::new();
//! for i in 0..100_i64 {
//!     tree.insert(Aabb2D::new(i, 0, i + 1, 1), i as usize);
//! }
//!
//! let mut first = None;
//! let res: Result<(), &str> = tree.search(Aabb2D::new(10, 0, 20, 1), |id| {
//!     first = Some(id);
//!     Err(Halt::Stop)
//! });
//! assert!(res.is_ok());
//! assert!(first.is_some());
//! ```
//!
//! ## Tuning
//!
//! [`Params::new`] sets the node capacity and derives a fill floor of 40% of it.
//! Small capacities (4 to 8) favour updates; larger ones favour query-heavy and
//! bulk-loaded trees. Use [`Params::with_min_entries`] for an explicit floor.
//!
//! ### Float semantics
//!
//! Boxes are validated on construction: [`Aabb2D::new`] panics on inverted or NaN
//! bounds and [`Aabb2D::try_new`] reports them as a [`BoxError`].
//!
//! ## Features
//!
//! - `std` (default): forwarded to optional dependencies.
//! - `libm`: forwarded to optional dependencies for `no_std` float math.
//! - `kurbo`: conversions between [`Aabb2D<f64>`] and `kurbo::Rect`.

#![no_std]

extern crate alloc;

mod bulk;
pub mod config;
mod delete;
pub mod error;
mod nearest;
mod node;
mod rtree;
mod search;
mod split;
pub mod types;
mod validate;
mod wide;

pub use config::Params;
pub use error::{BoxError, ConfigError, Halt};
pub use nearest::NearestIter;
pub use node::RecordId;
pub use rtree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use types::{Aabb2D, Scalar, area, distance_sq, enlargement};
pub use wide::WideInt;
