//! Collision detection and resolution
//!
//! Overlapping particles are found pairwise, joined into connected groups
//! with a disjoint-set forest, and each group is replaced by a single
//! particle through a perfectly inelastic, momentum-conserving merge.

pub mod detection;
pub mod resolution;
pub mod union_find;

#[cfg(test)]
mod detection_test;

pub use detection::{CollisionDetector, CollisionEvent, DirectDetector};
pub use resolution::{
    CollisionGroup, CollisionResolver, group_collisions, merge_group, resolve_collisions,
};
pub use union_find::DisjointSet;
