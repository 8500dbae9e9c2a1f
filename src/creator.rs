use crate::assembler::{Assembler, AuxElement, NodeConstraint};
use crate::bcs::{BoundaryConditions, EXPECTED_NUM_CONSTRAINED_DOFS};
use crate::forest::{oct::OctForest, quad::QuadForest, Forest};

use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// The element factory a creator's caller supplies: one element per mesh
/// cell, with an optional auxiliary element for loads and tractions
///
/// `create_element` must be deterministic and side-effect-free with respect
/// to global state; it may freely allocate a new element per call. Returning
/// `None` is not an error: the cell contributes no equations but keeps its
/// connectivity slot.
pub trait ElementFactory<F: Forest> {
    /// The element type handed to the assembler
    type Elem;

    /// Create the primary element for a mesh cell
    fn create_element(&mut self, order: usize, forest: &F, cell: &F::Cell) -> Option<Self::Elem>;

    /// Create an auxiliary element layered on top of the primary element,
    /// bound to the same connectivity
    fn create_aux_element(
        &mut self,
        _order: usize,
        _forest: &F,
        _cell: &F::Cell,
    ) -> Option<Self::Elem> {
        None
    }
}

/// Binds a forest topology, a [`BoundaryConditions`] registry, and an
/// [`ElementFactory`] into ready-to-use [`Assembler`]s
///
/// A creator is bound to exactly one registry for its lifetime and is
/// reusable across [`create_assembler`](Self::create_assembler) calls; one
/// registry may serve several creators acting on different forests of the
/// same problem. Each call runs strictly sequentially within the process;
/// cross-process consistency of the node numbering is the forest's concern.
pub struct Creator<'b, F: Forest, A: ElementFactory<F>> {
    bcs: &'b BoundaryConditions,
    factory: A,
    _topology: PhantomData<fn(&F)>,
}

/// Creator for quadrilateral forests
pub type QuadCreator<'b, A> = Creator<'b, QuadForest, A>;
/// Creator for octant forests
pub type OctCreator<'b, A> = Creator<'b, OctForest, A>;

impl<'b, F: Forest, A: ElementFactory<F>> Creator<'b, F, A> {
    pub fn new(bcs: &'b BoundaryConditions, factory: A) -> Self {
        Self {
            bcs,
            factory,
            _topology: PhantomData,
        }
    }

    /// Build a fully populated [`Assembler`] from the forest's local partition
    ///
    /// Walks the local cells in order, invoking the factory once per cell,
    /// then populates node locations and resolves boundary constraints
    /// against the registry. Ownership of every created element transfers
    /// into the returned assembler.
    ///
    /// `order` must match the forest's configured interpolation order; on
    /// any error no assembler is returned and nothing is left half-built.
    pub fn create_assembler(
        &mut self,
        order: usize,
        forest: &F,
    ) -> Result<Assembler<A::Elem, F::Point>, CreateError> {
        if order != forest.mesh_order() {
            return Err(CreateError::OrderMismatch {
                requested: order,
                configured: forest.mesh_order(),
            });
        }

        let num_local_nodes = forest.num_local_nodes();
        let cells = forest.cells();
        let nodes_per_element = forest.nodes_per_cell();

        // one element slot per cell, nullable; aux elements share the slot's connectivity
        let mut elements: Vec<Option<A::Elem>> = Vec::with_capacity(cells.len());
        let mut aux_elements: Vec<AuxElement<A::Elem>> = Vec::new();
        let mut conn: Vec<usize> = Vec::with_capacity(cells.len() * nodes_per_element);

        for (cell_idx, cell) in cells.iter().enumerate() {
            let cell_nodes = forest.cell_nodes(cell_idx);
            if let Some(&node) = cell_nodes.iter().find(|&&node| node >= num_local_nodes) {
                return Err(CreateError::NodeIndexOutOfRange {
                    node,
                    num_local_nodes,
                });
            }
            conn.extend_from_slice(cell_nodes);

            elements.push(self.factory.create_element(order, forest, cell));
            if let Some(aux) = self.factory.create_aux_element(order, forest, cell) {
                aux_elements.push(AuxElement {
                    cell: cell_idx,
                    element: aux,
                });
            }
        }

        let locations = self.node_locations(forest)?;
        let constraints = self.resolve_constraints(forest)?;

        Ok(Assembler::new(
            elements,
            aux_elements,
            conn,
            nodes_per_element,
            locations,
            forest.num_owned_nodes(),
            constraints,
        ))
    }

    // Fetch the location of every local node. A node present in the
    // partition without a location is a consistency violation.
    fn node_locations(&self, forest: &F) -> Result<Vec<F::Point>, CreateError> {
        (0..forest.num_local_nodes())
            .map(|node| {
                forest
                    .node_location(node)
                    .ok_or(CreateError::MissingNodeLocation(node))
            })
            .collect()
    }

    // Run the registry's union resolution over every attribute-tagged
    // boundary entity, accumulating per-node constraint unions
    fn resolve_constraints(&self, forest: &F) -> Result<Vec<NodeConstraint>, CreateError> {
        let num_local_nodes = forest.num_local_nodes();
        let mut node_dofs: BTreeMap<usize, SmallVec<[usize; EXPECTED_NUM_CONSTRAINED_DOFS]>> =
            BTreeMap::new();

        for entity in forest.boundary_entities() {
            let dofs = self.bcs.constrained_dofs(&entity.attr);
            if dofs.is_empty() {
                continue;
            }

            for &node in entity.nodes.iter() {
                if node >= num_local_nodes {
                    return Err(CreateError::NodeIndexOutOfRange {
                        node,
                        num_local_nodes,
                    });
                }

                let union = node_dofs.entry(node).or_default();
                for &dof in dofs.iter() {
                    if !union.contains(&dof) {
                        union.push(dof);
                    }
                }
            }
        }

        // BTreeMap iteration yields the node-sorted order the assembler expects
        Ok(node_dofs
            .into_iter()
            .map(|(node, dofs)| NodeConstraint { node, dofs })
            .collect())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CreateError {
    OrderMismatch {
        requested: usize,
        configured: usize,
    },
    MissingNodeLocation(usize),
    NodeIndexOutOfRange {
        node: usize,
        num_local_nodes: usize,
    },
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OrderMismatch {
                requested,
                configured,
            } => write!(
                f,
                "Requested interpolation order {} does not match the Forest's configured order {}; Cannot create Assembler!",
                requested, configured
            ),
            Self::MissingNodeLocation(node) => write!(
                f,
                "Node {} has no location in the Forest; Cannot create Assembler!",
                node
            ),
            Self::NodeIndexOutOfRange {
                node,
                num_local_nodes,
            } => write!(
                f,
                "Connectivity references Node {} but the partition only has {} local nodes; Cannot create Assembler!",
                node, num_local_nodes
            ),
        }
    }
}
