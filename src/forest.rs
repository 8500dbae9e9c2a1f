/// Octree forest adapter ([`OctForest`](oct::OctForest)) and its [`Octant`](oct::Octant) cells
pub mod oct;
/// Quadtree forest adapter ([`QuadForest`](quad::QuadForest)) and its [`Quadrant`](quad::Quadrant) cells
pub mod quad;

use std::fmt;

/// Maximum supported interpolation order (nodes per cell edge)
pub const MAX_ORDER: usize = 10;

/// The portion of a mesh forest a creator consumes: the local cell partition,
/// its connectivity and node locations, and the attribute-tagged boundary
/// entities. Satisfied by [`quad::QuadForest`] and [`oct::OctForest`].
///
/// Node indices are local to the process partition. Nodes `0..num_owned_nodes`
/// are owned by this process; the remainder are halo nodes referenced from
/// neighboring partitions. Global numbering consistency and ghost coordinate
/// exchange are the forest's responsibility and must be complete before a
/// creator runs.
pub trait Forest {
    /// The mesh cell type (quadrant or octant)
    type Cell;
    /// The node location type (2D or 3D point)
    type Point: Copy;

    /// The interpolation order this forest's connectivity was built for
    fn mesh_order(&self) -> usize;

    /// Number of nodes in each cell's connectivity (`order^2` or `order^3`)
    fn nodes_per_cell(&self) -> usize;

    /// Number of nodes referenced by the local partition (owned + halo)
    fn num_local_nodes(&self) -> usize;

    /// Number of local nodes owned by this process
    fn num_owned_nodes(&self) -> usize;

    /// The local cell partition
    fn cells(&self) -> &[Self::Cell];

    /// The ordered node indices of the `cell_idx`-th local cell
    fn cell_nodes(&self, cell_idx: usize) -> &[usize];

    /// The location of a local node, if the forest has computed one
    fn node_location(&self, node: usize) -> Option<Self::Point>;

    /// The attribute-tagged boundary entities of the local partition
    fn boundary_entities(&self) -> &[BoundaryEntity];
}

/// Classification of an attribute-tagged boundary entity
///
/// Quadtree forests report `Face` and `Edge` entities; octree forests
/// additionally report `Vertex` entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityClass {
    Face,
    Edge,
    Vertex,
}

/// A geometric boundary entity carrying an attribute and the set of local
/// nodes it owns
///
/// Constraint resolution matches the attribute against a
/// [`BoundaryConditions`](crate::bcs::BoundaryConditions) registry and
/// applies the resulting dof list to every owned node.
#[derive(Clone, Debug)]
pub struct BoundaryEntity {
    pub class: EntityClass,
    pub attr: String,
    pub nodes: Vec<usize>,
}

impl BoundaryEntity {
    pub fn new(class: EntityClass, attr: impl Into<String>, nodes: Vec<usize>) -> Self {
        Self {
            class,
            attr: attr.into(),
            nodes,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ForestError {
    InvalidOrder(usize),
    ConnectivityLen {
        expected: usize,
        found: usize,
    },
    NodeOutOfRange {
        node: usize,
        num_local_nodes: usize,
    },
    OwnedExceedsLocal {
        owned: usize,
        local: usize,
    },
    LevelExceedsMax {
        level: u8,
        max_level: u8,
    },
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidOrder(order) => write!(
                f,
                "Interpolation order {} is outside the supported range [2, {}]; Cannot construct Forest!",
                order, MAX_ORDER
            ),
            Self::ConnectivityLen { expected, found } => write!(
                f,
                "Cell connectivity has {} nodes where {} were expected; Cannot add cell!",
                found, expected
            ),
            Self::NodeOutOfRange {
                node,
                num_local_nodes,
            } => write!(
                f,
                "Node {} is out of range for a partition of {} local nodes; Cannot update Forest!",
                node, num_local_nodes
            ),
            Self::OwnedExceedsLocal { owned, local } => write!(
                f,
                "Owned node count {} exceeds the {} local nodes; Cannot update Forest!",
                owned, local
            ),
            Self::LevelExceedsMax { level, max_level } => write!(
                f,
                "Refinement level {} exceeds the maximum of {}; Cannot construct cell!",
                level, max_level
            ),
        }
    }
}
