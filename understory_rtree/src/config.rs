// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tree node capacity parameters.

use crate::error::ConfigError;

/// Node fan-out limits for an [`RTree`](crate::RTree).
///
/// Every node other than the root holds between `min_entries` and `max_entries`
/// entries. The floor is conventionally 40% of the capacity, rounded up, and
/// never below 2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Params {
    max_entries: usize,
    min_entries: usize,
}

impl Params {
    /// Capacity used by [`Params::default`].
    pub const DEFAULT_MAX_ENTRIES: usize = 8;

    /// Parameters with the given capacity and a derived floor of
    /// `max(2, ceil(0.4 * max_entries))`.
    pub fn new(max_entries: usize) -> Result<Self, ConfigError> {
        if max_entries < 3 {
            return Err(ConfigError::MaxEntriesTooSmall(max_entries));
        }
        Self::with_min_entries(max_entries, Self::derived_min(max_entries))
    }

    /// Parameters with an explicit fill floor.
    ///
    /// The floor must be at least 2 and at most `(max_entries + 1) / 2`, so that an
    /// overflowing node can always be split into two valid nodes.
    pub fn with_min_entries(max_entries: usize, min_entries: usize) -> Result<Self, ConfigError> {
        if max_entries < 3 {
            return Err(ConfigError::MaxEntriesTooSmall(max_entries));
        }
        if min_entries < 2 || 2 * min_entries > max_entries + 1 {
            return Err(ConfigError::MinEntriesOutOfRange {
                min: min_entries,
                max: max_entries,
            });
        }
        Ok(Self {
            max_entries,
            min_entries,
        })
    }

    /// Maximum number of entries per node.
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum number of entries per non-root node.
    pub const fn min_entries(&self) -> usize {
        self.min_entries
    }

    const fn derived_min(max_entries: usize) -> usize {
        // ceil(0.4 * max) in integer arithmetic.
        let m = (2 * max_entries).div_ceil(5);
        if m < 2 { 2 } else { m }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_entries: Self::DEFAULT_MAX_ENTRIES,
            min_entries: Self::derived_min(Self::DEFAULT_MAX_ENTRIES),
        }
    }
}
