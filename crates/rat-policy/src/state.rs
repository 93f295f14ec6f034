//! Discrete state encoding.
//!
//! A state is `(distance bucket, set of available technologies)`.  The set is
//! a [`TechSet`] bitmask, so two agents seeing the same radios share a key
//! no matter what order the radios were discovered in.

use rat_core::TechSet;
use rat_net::{Availability, NetworkCatalog};

use crate::{PolicyError, PolicyResult};

/// Coarse distance from the nearest infrastructure node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceBucket {
    Close,
    Medium,
    Far,
}

/// Upper bounds (inclusive, metres) of the `Close` and `Medium` buckets.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketThresholds {
    pub close:  f64,
    pub medium: f64,
}

impl BucketThresholds {
    pub fn new(close: f64, medium: f64) -> PolicyResult<Self> {
        let t = Self { close, medium };
        t.validate()?;
        Ok(t)
    }

    /// Close ends at the shortest catalog range, medium at the second
    /// shortest.  With one technology both bounds equal its range.
    pub fn from_catalog(catalog: &NetworkCatalog) -> Self {
        let mut ranges: Vec<f64> = catalog.iter().map(|p| p.range).collect();
        ranges.sort_by(f64::total_cmp);
        let close = ranges.first().copied().unwrap_or(0.0);
        let medium = ranges.get(1).copied().unwrap_or(close);
        Self { close, medium }
    }

    pub fn validate(&self) -> PolicyResult<()> {
        let ok = self.close.is_finite()
            && self.medium.is_finite()
            && self.close >= 0.0
            && self.close <= self.medium;
        if ok {
            Ok(())
        } else {
            Err(PolicyError::InvalidThresholds { close: self.close, medium: self.medium })
        }
    }

    pub fn bucket(&self, distance: f64) -> DistanceBucket {
        if distance <= self.close {
            DistanceBucket::Close
        } else if distance <= self.medium {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Far
        }
    }
}

/// Hashable state identity used to index the Q-table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateKey {
    pub bucket:    DistanceBucket,
    pub available: TechSet,
}

impl StateKey {
    #[inline]
    pub fn new(bucket: DistanceBucket, available: TechSet) -> Self {
        Self { bucket, available }
    }

    /// Encode an availability query result.
    pub fn from_availability(availability: &Availability, thresholds: &BucketThresholds) -> Self {
        Self {
            bucket:    thresholds.bucket(availability.nearest_distance),
            available: availability.techs,
        }
    }
}
