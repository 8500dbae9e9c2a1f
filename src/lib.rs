//! Binds adaptive quadtree/octree mesh forests to flat, assembler-ready
//! data structures: per-element connectivity, node locations, boundary
//! condition constraints, and optional auxiliary (load) elements.
//!
//! A [`Creator`] consumes a forest's local partition, a
//! [`BoundaryConditions`] registry, and a caller-supplied
//! [`ElementFactory`], and produces a fully populated [`Assembler`] that
//! takes ownership of everything it needs for global assembly. The same
//! build sequence runs independently on every process of a distributed
//! mesh; cross-process node numbering consistency is the forest's concern.

/// The assembler-ready output structure owning elements, connectivity, locations, and constraints
pub mod assembler;
/// The boundary condition registry: attribute-keyed constraint specs
pub mod bcs;
/// The creators binding forests, registries, and element factories into assemblers
pub mod creator;
/// The forest interface and the quadtree/octree adapters satisfying it
pub mod forest;
/// 2D and 3D node location primitives
pub mod space;

pub use assembler::{Assembler, AuxElement, NodeConstraint};
pub use bcs::{BcSpec, BoundaryConditions};
pub use creator::{Creator, ElementFactory, OctCreator, QuadCreator};
pub use forest::{
    oct::{OctForest, Octant},
    quad::{QuadForest, Quadrant},
    BoundaryEntity, EntityClass, Forest,
};
pub use space::{Point2d, Point3d};
