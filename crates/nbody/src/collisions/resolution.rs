//! Collision resolution through momentum-conserving mergers
//!
//! Every connected group of overlapping particles becomes one particle that
//! conserves:
//! - Total mass (area, since density is uniform)
//! - Total momentum
//! - Centre of mass

use crate::collisions::detection::{CollisionDetector, CollisionEvent, DirectDetector};
use crate::collisions::union_find::DisjointSet;
use crate::particle::{Particle, ParticleId};
use crate::store::ParticleStore;
use nalgebra::{Point2, Vector2};
use std::collections::HashMap;

/// A maximal set of particles connected by overlaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroup {
    /// Id carried by the merged particle (the smallest member id)
    pub survivor: ParticleId,
    /// Member ids in ascending order
    pub members: Vec<ParticleId>,
}

/// Merge a group of particles into one, conserving mass and momentum
///
/// The merged particle takes the smallest id of the group, sits at the
/// mass-weighted centroid, moves with total momentum over total mass and has
/// radius `sqrt(total mass)`. Sums run in the order given, so callers that
/// want bit-stable results should pass members sorted by id.
///
/// Returns `None` for an empty group.
///
/// # Examples
///
/// ```
/// use nbody::collisions::merge_group;
/// use nbody::particle::{Particle, ParticleId};
/// use nalgebra::{Point2, Vector2};
///
/// let a = Particle::new(ParticleId(4), Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0), 1.0);
/// let b = Particle::new(ParticleId(2), Point2::new(2.0, 0.0), Vector2::new(-1.0, 0.0), 1.0);
///
/// let merged = merge_group(&[a, b]).unwrap();
///
/// assert_eq!(merged.id, ParticleId(2));
/// assert_eq!(merged.mass, 2.0);
/// assert_eq!(merged.position, Point2::new(1.0, 0.0));
/// assert_eq!(merged.velocity, Vector2::zeros());
/// ```
pub fn merge_group(members: &[Particle]) -> Option<Particle> {
    let id = members.iter().map(|p| p.id).min()?;

    let (total_mass, weighted_position, momentum) = members.iter().fold(
        (0.0, Vector2::zeros(), Vector2::zeros()),
        |(mass, position, momentum): (f64, Vector2<f64>, Vector2<f64>), p| {
            (
                mass + p.mass,
                position + p.position.coords * p.mass,
                momentum + p.momentum(),
            )
        },
    );

    let position = Point2::from(weighted_position / total_mass);
    let velocity = momentum / total_mass;

    Some(Particle::from_mass(id, position, velocity, total_mass))
}

/// Index groups (ascending indices, ordered by smallest member id)
fn group_indices(particles: &[Particle], events: &[CollisionEvent]) -> Vec<Vec<usize>> {
    let index: HashMap<ParticleId, usize> = particles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    let mut sets = DisjointSet::new(particles.len());
    for event in events {
        if let (Some(&a), Some(&b)) = (index.get(&event.body_a), index.get(&event.body_b)) {
            sets.union(a, b);
        }
    }

    let mut groups = sets.groups();
    for group in &mut groups {
        group.sort_by_key(|&i| particles[i].id);
    }
    groups.sort_by_key(|group| particles[group[0]].id);
    groups
}

/// Partition colliding particles into connected groups
///
/// Groups are independent of the order in which events are listed.
pub fn group_collisions(particles: &[Particle], events: &[CollisionEvent]) -> Vec<CollisionGroup> {
    group_indices(particles, events)
        .into_iter()
        .map(|group| {
            let members: Vec<ParticleId> = group.iter().map(|&i| particles[i].id).collect();
            CollisionGroup {
                survivor: members[0],
                members,
            }
        })
        .collect()
}

/// Replace every colliding group in the store by its merge product
///
/// Particles outside any group keep their order; merged particles follow,
/// ordered by survivor id.
///
/// # Returns
///
/// The groups that were merged
///
/// # Examples
///
/// ```
/// use nbody::collisions::{CollisionDetector, DirectDetector, resolve_collisions};
/// use nbody::store::ParticleStore;
/// use nalgebra::{Point2, Vector2};
///
/// let mut store = ParticleStore::new();
/// store.add(Point2::new(0.0, 0.0), Vector2::zeros(), 1.0);
/// store.add(Point2::new(1.0, 0.0), Vector2::zeros(), 1.0);
/// store.add(Point2::new(9.0, 0.0), Vector2::zeros(), 1.0);
///
/// let events = DirectDetector.detect(store.particles());
/// let groups = resolve_collisions(&mut store, &events);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(store.len(), 2);
/// ```
pub fn resolve_collisions(store: &mut ParticleStore, events: &[CollisionEvent]) -> Vec<CollisionGroup> {
    if events.is_empty() {
        return Vec::new();
    }

    let particles = store.particles();
    let groups = group_indices(particles, events);

    let mut grouped = vec![false; particles.len()];
    for &i in groups.iter().flatten() {
        grouped[i] = true;
    }

    let mut next: Vec<Particle> = particles
        .iter()
        .zip(grouped.iter())
        .filter(|(_, in_group)| !**in_group)
        .map(|(p, _)| *p)
        .collect();

    let mut merged_groups = Vec::with_capacity(groups.len());
    for group in &groups {
        let members: Vec<Particle> = group.iter().map(|&i| particles[i]).collect();
        if let Some(merged) = merge_group(&members) {
            log::trace!(
                "merged {} particles into {:?} (mass {})",
                members.len(),
                merged.id,
                merged.mass
            );
            merged_groups.push(CollisionGroup {
                survivor: merged.id,
                members: members.iter().map(|p| p.id).collect(),
            });
            next.push(merged);
        }
    }

    store.replace(next);
    merged_groups
}

/// Detects overlaps and merges them in one call
///
/// # Examples
///
/// ```
/// use nbody::collisions::CollisionResolver;
/// use nbody::store::ParticleStore;
/// use nalgebra::{Point2, Vector2};
///
/// let mut store = ParticleStore::new();
/// store.add(Point2::new(0.0, 0.0), Vector2::zeros(), 1.0);
/// store.add(Point2::new(1.0, 0.0), Vector2::zeros(), 1.0);
///
/// let groups = CollisionResolver::new().resolve(&mut store);
/// assert_eq!(groups[0].members.len(), 2);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver<D = DirectDetector> {
    pub detector: D,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self {
            detector: DirectDetector,
        }
    }
}

impl<D: CollisionDetector> CollisionResolver<D> {
    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    /// Merge every overlapping group in the store
    pub fn resolve(&self, store: &mut ParticleStore) -> Vec<CollisionGroup> {
        let events = self.detector.detect(store.particles());
        resolve_collisions(store, &events)
    }
}
