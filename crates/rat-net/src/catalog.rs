//! The technology catalog: one immutable [`NetworkProfile`] per radio access
//! technology plus the global dead-zone range.
//!
//! Catalogs are only constructed through [`NetworkCatalogBuilder`], which
//! validates every profile eagerly.  A `TechId` handed out by a catalog is
//! therefore always a valid index into it.

use tracing::debug;

use rat_core::{TechId, TechSet};

use crate::{NetError, NetResult};

// ── NetworkProfile ────────────────────────────────────────────────────────────

/// Static description of one radio access technology.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NetworkProfile {
    /// Position in the catalog.
    pub id: TechId,
    /// Display name, e.g. `"DSRC"`.  Unique within a catalog.
    pub name: String,
    /// Latency at zero distance, in milliseconds.
    pub base_latency_ms: f64,
    /// Packet-loss probability anywhere inside `range`.
    pub base_loss_rate: f64,
    /// Maximum reliable range in metres.
    pub range: f64,
}

// ── NetworkCatalog ────────────────────────────────────────────────────────────

/// Validated set of technology profiles sharing one dead-zone range.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NetworkCatalog {
    profiles:        Vec<NetworkProfile>,
    max_total_range: f64,
}

impl NetworkCatalog {
    /// The three-radio fixture: DSRC (short), WIFI (medium), LTE (wide-area)
    /// with a 150 m dead zone.
    pub fn default_v2x() -> Self {
        NetworkCatalogBuilder::new(150.0)
            .profile("DSRC", 20.0, 0.02, 40.0)
            .profile("WIFI", 50.0, 0.05, 60.0)
            .profile("LTE", 120.0, 0.10, 150.0)
            .build()
            .unwrap_or_else(|e| unreachable!("built-in catalog is valid: {e}"))
    }

    /// Distance beyond which every technology loses every packet.
    #[inline]
    pub fn max_total_range(&self) -> f64 {
        self.max_total_range
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile for `tech`, or `None` for an id this catalog did not issue.
    #[inline]
    pub fn get(&self, tech: TechId) -> Option<&NetworkProfile> {
        self.profiles.get(tech.index())
    }

    /// Profile for `tech`.
    ///
    /// # Panics
    /// Panics if `tech` was not issued by this catalog.
    #[inline]
    pub fn profile(&self, tech: TechId) -> &NetworkProfile {
        &self.profiles[tech.index()]
    }

    /// Look a technology up by name.
    pub fn lookup(&self, name: &str) -> Option<TechId> {
        self.profiles.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// Every technology in the catalog.
    pub fn all(&self) -> TechSet {
        TechSet::first_n(self.profiles.len())
    }

    /// Profiles in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkProfile> + '_ {
        self.profiles.iter()
    }

    /// Human-readable name; `"None"` for the disconnected sentinel.
    pub fn name_of(&self, tech: Option<TechId>) -> &str {
        tech.and_then(|t| self.get(t)).map_or("None", |p| p.name.as_str())
    }
}

// ── NetworkCatalogBuilder ─────────────────────────────────────────────────────

/// Collect profiles, then validate them all at once in [`build`](Self::build).
///
/// ```
/// use rat_net::NetworkCatalogBuilder;
///
/// let catalog = NetworkCatalogBuilder::new(150.0)
///     .profile("DSRC", 20.0, 0.02, 40.0)
///     .profile("LTE", 120.0, 0.10, 150.0)
///     .build()
///     .unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.lookup("LTE").unwrap().0, 1);
/// ```
pub struct NetworkCatalogBuilder {
    max_total_range: f64,
    raw:             Vec<(String, f64, f64, f64)>,
}

impl NetworkCatalogBuilder {
    pub fn new(max_total_range: f64) -> Self {
        Self { max_total_range, raw: Vec::new() }
    }

    /// Add a technology.  Ids are assigned in insertion order.
    pub fn profile(
        mut self,
        name:       impl Into<String>,
        latency_ms: f64,
        loss_rate:  f64,
        range:      f64,
    ) -> Self {
        self.raw.push((name.into(), latency_ms, loss_rate, range));
        self
    }

    pub fn build(self) -> NetResult<NetworkCatalog> {
        let max = self.max_total_range;
        if !(max.is_finite() && max > 0.0) {
            return Err(NetError::InvalidMaxRange(max));
        }
        if self.raw.is_empty() {
            return Err(NetError::EmptyCatalog);
        }
        if self.raw.len() > TechSet::CAPACITY {
            return Err(NetError::TooManyTechnologies(self.raw.len()));
        }

        let mut profiles = Vec::with_capacity(self.raw.len());
        for (i, (name, latency, loss, range)) in self.raw.into_iter().enumerate() {
            if profiles.iter().any(|p: &NetworkProfile| p.name == name) {
                return Err(NetError::DuplicateTechnology(name));
            }
            for (field, value) in [("latency", latency), ("range", range)] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(NetError::InvalidParameter { name, field, value });
                }
            }
            if !(0.0..=1.0).contains(&loss) {
                return Err(NetError::InvalidLossRate { name, value: loss });
            }
            if range > max {
                return Err(NetError::RangeBeyondDeadZone { name, range, max_total_range: max });
            }
            profiles.push(NetworkProfile {
                id:              TechId(i as u8),
                name,
                base_latency_ms: latency,
                base_loss_rate:  loss,
                range,
            });
        }

        debug!(technologies = profiles.len(), max_total_range = max, "catalog built");
        Ok(NetworkCatalog { profiles, max_total_range: max })
    }
}

// ── Serde specs ───────────────────────────────────────────────────────────────

/// One technology as written in a JSON catalog file.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ProfileSpec {
    pub name:       String,
    pub latency_ms: f64,
    pub loss_rate:  f64,
    pub range:      f64,
}

/// A JSON catalog file.  Converted through the same validation as the
/// builder:
///
/// ```json
/// { "max_total_range": 150,
///   "profiles": [ { "name": "DSRC", "latency_ms": 20, "loss_rate": 0.02, "range": 40 } ] }
/// ```
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Deserialize)]
pub struct CatalogSpec {
    pub max_total_range: f64,
    pub profiles:        Vec<ProfileSpec>,
}

#[cfg(feature = "serde")]
impl TryFrom<CatalogSpec> for NetworkCatalog {
    type Error = NetError;

    fn try_from(spec: CatalogSpec) -> NetResult<Self> {
        spec.profiles
            .into_iter()
            .fold(NetworkCatalogBuilder::new(spec.max_total_range), |b, p| {
                b.profile(p.name, p.latency_ms, p.loss_rate, p.range)
            })
            .build()
    }
}
