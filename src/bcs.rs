use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// Number of constrained degrees of freedom expected on a typical node.
/// Determines the stack allocation size of the `SmallVec`s holding dof lists.
pub const EXPECTED_NUM_CONSTRAINED_DOFS: usize = 8;

/// A single boundary condition: an attribute string and the list of
/// degrees of freedom to constrain on every node owned by an entity
/// carrying that attribute.
///
/// Attributes are not required to be unique across specs; all specs whose
/// attribute matches an entity contribute their dofs (see
/// [`BoundaryConditions::constrained_dofs`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcSpec {
    attr: String,
    dofs: SmallVec<[usize; EXPECTED_NUM_CONSTRAINED_DOFS]>,
}

impl BcSpec {
    /// The attribute string this spec applies to
    pub fn attr(&self) -> &str {
        &self.attr
    }

    /// The constrained dof indices, in the order they were supplied
    pub fn dofs(&self) -> &[usize] {
        &self.dofs
    }

    /// Number of constrained dofs in this spec
    pub fn num_dofs(&self) -> usize {
        self.dofs.len()
    }
}

impl fmt::Display for BcSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}' \t {:?}", self.attr, self.dofs.as_slice())
    }
}

/// An insertion-ordered, append-only collection of [`BcSpec`]s
///
/// One registry is typically constructed before meshing and shared by every
/// creator acting on the same problem. Specs cannot be removed or updated
/// once added.
///
/// No validation of dof indices against any element's true per-node dof
/// count is performed here; a spec listing dofs an element does not have
/// surfaces as an assembler-side error.
#[derive(Debug, Clone, Default)]
pub struct BoundaryConditions {
    specs: Vec<BcSpec>,
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Append a new boundary condition spec. The dof list is copied.
    pub fn add_boundary_condition(&mut self, attr: impl Into<String>, dofs: &[usize]) {
        self.specs.push(BcSpec {
            attr: attr.into(),
            dofs: SmallVec::from_slice(dofs),
        });
    }

    /// Number of specs added so far
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Retrieve the `i`-th spec by insertion position
    pub fn get(&self, i: usize) -> Result<&BcSpec, BcError> {
        self.specs.get(i).ok_or(BcError::IndexOutOfRange {
            index: i,
            len: self.specs.len(),
        })
    }

    /// Iterate over all specs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &BcSpec> + '_ {
        self.specs.iter()
    }

    /// The union of the dof lists of every spec whose attribute equals
    /// `attr`, in first-discovery order, deduplicated
    ///
    /// An empty result means no spec applies to the attribute.
    pub fn constrained_dofs(&self, attr: &str) -> SmallVec<[usize; EXPECTED_NUM_CONSTRAINED_DOFS]> {
        let mut union: SmallVec<[usize; EXPECTED_NUM_CONSTRAINED_DOFS]> = SmallVec::new();

        for spec in self.specs.iter().filter(|spec| spec.attr == attr) {
            for &dof in spec.dofs.iter() {
                if !union.contains(&dof) {
                    union.push(dof);
                }
            }
        }

        union
    }

    /// Produce a Json Object that describes this registry
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "boundary_conditions": JsonValue::from(
                self.specs
                    .iter()
                    .map(|spec| {
                        object! {
                            "attr": spec.attr.as_str(),
                            "dofs": spec.dofs.to_vec(),
                        }
                    })
                    .collect::<Vec<JsonValue>>()
            )
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BcError {
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for BcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => write!(
                f,
                "Boundary condition index {} is out of range for a registry of {} specs; Cannot retrieve spec!",
                index, len
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_are_kept_in_insertion_order() {
        let mut bcs = BoundaryConditions::new();
        bcs.add_boundary_condition("clamped", &[0, 1, 2]);
        bcs.add_boundary_condition("pinned", &[0, 1]);
        bcs.add_boundary_condition("symmetry", &[2]);

        assert_eq!(bcs.len(), 3);
        assert_eq!(bcs.get(0).unwrap().attr(), "clamped");
        assert_eq!(bcs.get(1).unwrap().attr(), "pinned");
        assert_eq!(bcs.get(2).unwrap().attr(), "symmetry");
        assert_eq!(bcs.get(1).unwrap().dofs(), &[0, 1]);
        assert_eq!(bcs.get(0).unwrap().num_dofs(), 3);
    }

    #[test]
    fn resolution_ignores_unrelated_specs() {
        let mut bcs = BoundaryConditions::new();
        bcs.add_boundary_condition("inlet", &[3]);
        bcs.add_boundary_condition("clamped", &[0, 1, 2]);
        bcs.add_boundary_condition("outlet", &[4, 5]);

        assert_eq!(bcs.constrained_dofs("clamped").as_slice(), &[0, 1, 2]);
        assert_eq!(bcs.constrained_dofs("inlet").as_slice(), &[3]);
        assert!(bcs.constrained_dofs("traction").is_empty());
    }

    #[test]
    fn matching_specs_union_their_dofs() {
        let mut bcs = BoundaryConditions::new();
        bcs.add_boundary_condition("edge", &[0, 1]);
        bcs.add_boundary_condition("edge", &[2, 3]);

        assert_eq!(bcs.constrained_dofs("edge").as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn overlapping_specs_do_not_duplicate_dofs() {
        let mut bcs = BoundaryConditions::new();
        bcs.add_boundary_condition("edge", &[0, 1]);
        bcs.add_boundary_condition("edge", &[1, 2]);

        assert_eq!(bcs.constrained_dofs("edge").as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn get_out_of_range_fails_without_mutation() {
        let mut bcs = BoundaryConditions::new();
        bcs.add_boundary_condition("clamped", &[0, 1]);

        assert_eq!(
            bcs.get(1),
            Err(BcError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            bcs.get(7),
            Err(BcError::IndexOutOfRange { index: 7, len: 1 })
        );

        assert_eq!(bcs.len(), 1);
        assert_eq!(bcs.get(0).unwrap().attr(), "clamped");
    }
}
