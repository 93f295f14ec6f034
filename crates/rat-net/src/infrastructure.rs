//! Fixed infrastructure nodes and a per-technology spatial index.
//!
//! # Layouts
//!
//! A node either serves one technology (a dedicated tower per radio) or
//! several (a shared road-side unit).  Both shapes are the same type:
//! [`InfrastructureNode::serves`] is a [`TechSet`].
//!
//! # Spatial index
//!
//! One R-tree (via `rstar`) per technology maps an agent position to the
//! nearest node serving that technology.  Nodes are immutable after
//! [`InfrastructureLayoutBuilder::build`].

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use rat_core::{NodeId, Position, TechId, TechSet};

use crate::{NetError, NetResult, NetworkCatalog};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── InfrastructureNode ────────────────────────────────────────────────────────

/// A fixed point agents transmit toward.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfrastructureNode {
    pub id:       NodeId,
    pub position: Position,
    pub serves:   TechSet,
}

// ── InfrastructureLayout ──────────────────────────────────────────────────────

/// All infrastructure nodes plus one nearest-node index per technology.
///
/// Construct with [`InfrastructureLayoutBuilder`].
#[derive(Debug)]
pub struct InfrastructureLayout {
    nodes:   Vec<InfrastructureNode>,
    /// Indexed by `TechId`.
    by_tech: Vec<RTree<NodeEntry>>,
    /// Every node regardless of technology.
    any:     RTree<NodeEntry>,
}

impl InfrastructureLayout {
    pub fn nodes(&self) -> &[InfrastructureNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&InfrastructureNode> {
        self.nodes.get(id.index())
    }

    /// Number of technologies this layout was validated against.
    pub fn tech_count(&self) -> usize {
        self.by_tech.len()
    }

    /// Nearest node serving `tech`, with its distance in metres.
    ///
    /// `None` if `tech` is unknown to this layout.
    pub fn nearest(&self, tech: TechId, pos: Position) -> Option<(NodeId, f64)> {
        self.by_tech
            .get(tech.index())?
            .nearest_neighbor(&pos.to_array())
            .map(|e| (e.id, e.distance_2(&pos.to_array()).sqrt()))
    }

    /// Nearest node of any technology, with its distance in metres.
    pub fn nearest_any(&self, pos: Position) -> Option<(NodeId, f64)> {
        self.any
            .nearest_neighbor(&pos.to_array())
            .map(|e| (e.id, e.distance_2(&pos.to_array()).sqrt()))
    }
}

// ── InfrastructureLayoutBuilder ───────────────────────────────────────────────

/// Add towers and road-side units, then [`build`](Self::build) against a
/// catalog.
///
/// ```
/// use rat_core::Position;
/// use rat_net::{InfrastructureLayoutBuilder, NetworkCatalog};
///
/// let catalog = NetworkCatalog::default_v2x();
/// let mut b = InfrastructureLayoutBuilder::new();
/// b.add_shared(Position::ground(0.0, 0.0), catalog.all());
/// let layout = b.build(&catalog).unwrap();
/// assert_eq!(layout.nodes().len(), 1);
/// ```
#[derive(Default)]
pub struct InfrastructureLayoutBuilder {
    nodes: Vec<InfrastructureNode>,
}

impl InfrastructureLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node serving exactly `techs` and return its id.
    pub fn add_shared(&mut self, position: Position, techs: TechSet) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(InfrastructureNode { id, position, serves: techs });
        id
    }

    /// Add a dedicated tower for a single technology.
    ///
    /// Fails with [`NetError::Core`] if `tech` cannot be held in a
    /// [`TechSet`].
    pub fn add_tower(&mut self, position: Position, tech: TechId) -> NetResult<NodeId> {
        let serves = TechSet::single(tech)?;
        Ok(self.add_shared(position, serves))
    }

    /// Validate against `catalog` and bulk-load the R-trees.
    ///
    /// Every node must serve at least one catalog technology and nothing
    /// outside it; every catalog technology must be served somewhere.
    pub fn build(self, catalog: &NetworkCatalog) -> NetResult<InfrastructureLayout> {
        let known = catalog.all();
        for node in &self.nodes {
            if node.serves.is_empty() {
                return Err(NetError::NodeServesNothing(node.id));
            }
            if let Some(tech) = node.serves.iter().find(|t| !known.contains(*t)) {
                return Err(NetError::UnknownTechnology { node: node.id, tech });
            }
            if !node.position.is_finite() {
                return Err(NetError::InvalidPosition(node.id));
            }
        }

        let mut by_tech = Vec::with_capacity(catalog.len());
        for profile in catalog.iter() {
            let entries: Vec<NodeEntry> = self.nodes
                .iter()
                .filter(|n| n.serves.contains(profile.id))
                .map(|n| NodeEntry { point: n.position.to_array(), id: n.id })
                .collect();
            if entries.is_empty() {
                return Err(NetError::UnservedTechnology(profile.name.clone()));
            }
            by_tech.push(RTree::bulk_load(entries));
        }

        let any = RTree::bulk_load(
            self.nodes
                .iter()
                .map(|n| NodeEntry { point: n.position.to_array(), id: n.id })
                .collect(),
        );

        debug!(nodes = self.nodes.len(), technologies = by_tech.len(), "infrastructure layout built");
        Ok(InfrastructureLayout { nodes: self.nodes, by_tech, any })
    }
}
