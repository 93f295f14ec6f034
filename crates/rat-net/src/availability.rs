//! Which technologies reach an agent from where it stands.

use rat_core::{NodeId, Position, TechId, TechSet};

use crate::{InfrastructureLayout, NetworkCatalog};

/// Result of one availability query.
///
/// `techs` holds every technology whose nearest serving node lies within the
/// profile's range.  An empty set is a normal, terminal answer ("no
/// network"), not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Availability {
    pub techs: TechSet,
    /// Serving node and distance for each technology, indexed by `TechId`.
    /// Filled for every catalog technology, reachable or not.
    pub links: Vec<Option<(NodeId, f64)>>,
    /// Distance to the nearest node of any technology.
    pub nearest_distance: f64,
}

impl Availability {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }

    /// Distance to the node serving `tech`.
    pub fn distance(&self, tech: TechId) -> Option<f64> {
        self.links.get(tech.index()).copied().flatten().map(|(_, d)| d)
    }

    /// Node serving `tech`.
    pub fn node(&self, tech: TechId) -> Option<NodeId> {
        self.links.get(tech.index()).copied().flatten().map(|(n, _)| n)
    }

    /// Available technologies in catalog order.
    pub fn ordered(&self) -> Vec<TechId> {
        self.techs.iter().collect()
    }
}

/// Resolves availability against a borrowed catalog and layout.
pub struct AvailabilityResolver<'a> {
    catalog: &'a NetworkCatalog,
    layout:  &'a InfrastructureLayout,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(catalog: &'a NetworkCatalog, layout: &'a InfrastructureLayout) -> Self {
        Self { catalog, layout }
    }

    /// Technologies covering `pos`: included iff `distance <= range`.
    pub fn available(&self, pos: Position) -> Availability {
        let mut techs = TechSet::EMPTY;
        let mut links = Vec::with_capacity(self.catalog.len());
        for profile in self.catalog.iter() {
            let link = self.layout.nearest(profile.id, pos);
            if let Some((_, d)) = link {
                if d <= profile.range {
                    techs.insert(profile.id);
                }
            }
            links.push(link);
        }
        let nearest_distance = self
            .layout
            .nearest_any(pos)
            .map_or(f64::INFINITY, |(_, d)| d);
        Availability { techs, links, nearest_distance }
    }
}
