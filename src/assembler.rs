use crate::bcs::EXPECTED_NUM_CONSTRAINED_DOFS;
use smallvec::SmallVec;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// An auxiliary element (e.g. a surface traction) layered on top of the
/// primary element of cell `cell`, contributing additional terms through
/// the same connectivity
#[derive(Debug, Clone)]
pub struct AuxElement<E> {
    pub cell: usize,
    pub element: E,
}

/// The resolved constraint union of one node: every dof listed here is
/// eliminated or pinned during assembly
///
/// Dof indices are not validated against the per-node dof count of the
/// element occupying the node; consumers must check them against their own
/// element definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConstraint {
    pub node: usize,
    pub dofs: SmallVec<[usize; EXPECTED_NUM_CONSTRAINED_DOFS]>,
}

/// The flat, ordered output of a creator: per-cell elements, connectivity,
/// node locations, and boundary constraints, ready for global assembly
///
/// An `Assembler` is constructed once per
/// [`create_assembler`](crate::creator::Creator::create_assembler) call and
/// takes sole ownership of its inputs. `E` is the caller's element type;
/// `P` is the node location type of the forest topology it was built from.
///
/// Element slots are nullable: a cell whose factory produced no element
/// still occupies a slot so connectivity bookkeeping stays aligned.
#[derive(Debug, Clone)]
pub struct Assembler<E, P> {
    elements: Vec<Option<E>>,
    aux_elements: Vec<AuxElement<E>>,
    conn: Vec<usize>,
    nodes_per_element: usize,
    locations: Vec<P>,
    num_owned_nodes: usize,
    constraints: Vec<NodeConstraint>,
}

impl<E, P> Assembler<E, P> {
    // `constraints` must be sorted by node id; `conn` and `locations` must be
    // complete for the element and node counts they imply
    pub(crate) fn new(
        elements: Vec<Option<E>>,
        aux_elements: Vec<AuxElement<E>>,
        conn: Vec<usize>,
        nodes_per_element: usize,
        locations: Vec<P>,
        num_owned_nodes: usize,
        constraints: Vec<NodeConstraint>,
    ) -> Self {
        debug_assert_eq!(conn.len(), elements.len() * nodes_per_element);
        debug_assert!(constraints.windows(2).all(|w| w[0].node < w[1].node));

        Self {
            elements,
            aux_elements,
            conn,
            nodes_per_element,
            locations,
            num_owned_nodes,
            constraints,
        }
    }

    /// Number of element slots (one per local cell, populated or not)
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Number of populated element slots
    pub fn num_defined_elements(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    pub fn num_aux_elements(&self) -> usize {
        self.aux_elements.len()
    }

    /// Number of local nodes (owned + halo)
    pub fn num_nodes(&self) -> usize {
        self.locations.len()
    }

    /// Number of local nodes owned by this process
    pub fn num_owned_nodes(&self) -> usize {
        self.num_owned_nodes
    }

    /// The per-cell element slots, in cell order
    pub fn elements(&self) -> &[Option<E>] {
        &self.elements
    }

    /// The auxiliary elements, each bound to the cell whose connectivity it shares
    pub fn aux_elements(&self) -> &[AuxElement<E>] {
        &self.aux_elements
    }

    /// Nodes carried by each element slot
    pub fn nodes_per_element(&self) -> usize {
        self.nodes_per_element
    }

    /// The ordered node indices of the `elem_idx`-th element slot
    pub fn element_nodes(&self, elem_idx: usize) -> &[usize] {
        &self.conn[elem_idx * self.nodes_per_element..(elem_idx + 1) * self.nodes_per_element]
    }

    /// The full flattened connectivity array
    pub fn connectivity(&self) -> &[usize] {
        &self.conn
    }

    /// The location of a local node
    pub fn node_location(&self, node: usize) -> &P {
        &self.locations[node]
    }

    /// All node locations, indexed by local node id
    pub fn node_locations(&self) -> &[P] {
        &self.locations
    }

    /// The resolved constraints, sorted by node id
    pub fn constraints(&self) -> &[NodeConstraint] {
        &self.constraints
    }

    /// The constrained dof list of a node, or `None` if it is unconstrained
    pub fn constrained_dofs(&self, node: usize) -> Option<&[usize]> {
        self.constraints
            .binary_search_by_key(&node, |constraint| constraint.node)
            .ok()
            .map(|idx| self.constraints[idx].dofs.as_slice())
    }
}

#[cfg(feature = "json_export")]
impl<E, P: Copy + Into<JsonValue>> Assembler<E, P> {
    /// Produce a Json Object describing this assembler's structure
    /// (element slots are reported by presence; element internals are opaque)
    pub fn to_json(&self) -> JsonValue {
        object! {
            "num_owned_nodes": self.num_owned_nodes,
            "nodes_per_element": self.nodes_per_element,
            "elements": JsonValue::from(
                self.elements
                    .iter()
                    .enumerate()
                    .map(|(elem_idx, slot)| {
                        object! {
                            "defined": slot.is_some(),
                            "nodes": self.element_nodes(elem_idx).to_vec(),
                        }
                    })
                    .collect::<Vec<JsonValue>>()
            ),
            "aux_elements": JsonValue::from(
                self.aux_elements
                    .iter()
                    .map(|aux| aux.cell)
                    .collect::<Vec<usize>>()
            ),
            "node_locations": JsonValue::from(
                self.locations
                    .iter()
                    .map(|point| (*point).into())
                    .collect::<Vec<JsonValue>>()
            ),
            "constraints": JsonValue::from(
                self.constraints
                    .iter()
                    .map(|constraint| {
                        object! {
                            "node": constraint.node,
                            "dofs": constraint.dofs.to_vec(),
                        }
                    })
                    .collect::<Vec<JsonValue>>()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Point2d;
    use smallvec::smallvec;

    fn two_cell_assembler() -> Assembler<&'static str, Point2d> {
        Assembler::new(
            vec![Some("solid"), None],
            vec![AuxElement {
                cell: 0,
                element: "traction",
            }],
            vec![0, 1, 3, 4, 1, 2, 4, 5],
            4,
            vec![
                Point2d::new(0.0, 0.0),
                Point2d::new(1.0, 0.0),
                Point2d::new(2.0, 0.0),
                Point2d::new(0.0, 1.0),
                Point2d::new(1.0, 1.0),
                Point2d::new(2.0, 1.0),
            ],
            6,
            vec![
                NodeConstraint {
                    node: 0,
                    dofs: smallvec![0, 1],
                },
                NodeConstraint {
                    node: 3,
                    dofs: smallvec![0, 1],
                },
            ],
        )
    }

    #[test]
    fn counts_and_connectivity() {
        let assembler = two_cell_assembler();

        assert_eq!(assembler.num_elements(), 2);
        assert_eq!(assembler.num_defined_elements(), 1);
        assert_eq!(assembler.num_aux_elements(), 1);
        assert_eq!(assembler.num_nodes(), 6);
        assert_eq!(assembler.num_owned_nodes(), 6);
        assert_eq!(assembler.element_nodes(0), &[0, 1, 3, 4]);
        assert_eq!(assembler.element_nodes(1), &[1, 2, 4, 5]);
        assert_eq!(assembler.connectivity().len(), 8);
    }

    #[test]
    fn constraint_lookup_by_node() {
        let assembler = two_cell_assembler();

        assert_eq!(assembler.constrained_dofs(0), Some([0, 1].as_slice()));
        assert_eq!(assembler.constrained_dofs(3), Some([0, 1].as_slice()));
        assert_eq!(assembler.constrained_dofs(1), None);
        assert_eq!(assembler.constrained_dofs(5), None);
    }

    #[cfg(feature = "json_export")]
    #[test]
    fn json_export_reports_structure() {
        let exported = two_cell_assembler().to_json();

        assert_eq!(exported["elements"].len(), 2);
        assert_eq!(exported["elements"][0]["defined"], true);
        assert_eq!(exported["elements"][1]["defined"], false);
        assert_eq!(exported["constraints"][1]["node"], 3);
    }
}
