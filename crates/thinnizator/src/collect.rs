//! Partitions the meshes under a root into groups of interchangeable meshes.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::config::ScanDepth;
use crate::context::SceneContext;
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::markers::Marker;
use crate::predicate::{NamePrefixes, Predicate};
use crate::report::GroupStatus;
use crate::Thinnizator;

/// Meshes sharing one fingerprint; `prefab` is the first member in scene order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<N> {
    pub fingerprint: Fingerprint,
    pub prefab: N,
    pub members: Vec<N>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Skipped<N> {
    NoMaterial { node: N },
    BelowThreshold {
        fingerprint: Fingerprint,
        members: Vec<N>,
    },
}

impl<N> Skipped<N> {
    pub fn status(&self) -> GroupStatus {
        match self {
            Self::NoMaterial { .. } => GroupStatus::SkippedNoMaterial,
            Self::BelowThreshold { .. } => GroupStatus::SkippedBelowThreshold,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Collection<N> {
    pub groups: IndexMap<Fingerprint, Group<N>>,
    pub skipped: Vec<Skipped<N>>,
    // node -> fingerprint for every node stamped by this collect
    stamps: HashMap<N, Fingerprint>,
}

impl<N> Default for Collection<N> {
    fn default() -> Self {
        Self {
            groups: IndexMap::new(),
            skipped: Vec::new(),
            stamps: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + std::hash::Hash> Collection<N> {
    pub fn get(&self, fingerprint: &str) -> Option<&Group<N>> {
        self.groups.get(fingerprint)
    }

    pub fn fingerprint_of(&self, node: N) -> Option<&Fingerprint> {
        self.stamps.get(&node)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &Group<N>)> {
        self.groups.iter()
    }

    pub fn member_count(&self) -> usize {
        self.groups.values().map(|group| group.members.len()).sum()
    }
}

struct Candidate<N> {
    fingerprint: Fingerprint,
    node: N,
    material_name: String,
    parent: Option<N>,
}

impl Thinnizator {
    /// Read-only grouping pass; safe to call repeatedly for previews.
    ///
    /// Scans the root's meshes (see [`ScanDepth`]), fingerprints every node the
    /// predicate accepts and that has a named material, then gathers each distinct
    /// fingerprint's members from the whole scene in scene order. Groups smaller
    /// than the threshold are reported as skipped. Markers are rebuilt from scratch.
    pub fn collect<C: SceneContext>(
        &mut self,
        root: C::Node,
        predicate: Option<&Predicate<'_, C>>,
        scene: &C,
    ) -> Collection<C::Node> {
        let _maybe_span_guard = if self.config.logging.pass_timings {
            Some(tracing::span!(tracing::Level::INFO, "Thinnizator collect").entered())
        } else {
            None
        };

        self.markers.clear();

        let scanned = match self.config.scan_depth {
            ScanDepth::Children => scene.child_meshes(root),
            ScanDepth::Descendants => scene.descendant_meshes(root),
        };

        let mut collection = Collection::default();
        let mut candidates = Vec::new();

        for node in scanned {
            if let Some(predicate) = predicate {
                if !predicate(scene, node) {
                    continue;
                }
            }

            let material_name = match scene.node_material_name(node) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    collection.skipped.push(Skipped::NoMaterial { node });
                    continue;
                }
            };

            let fingerprint = fingerprint(scene, node, root);
            collection.stamps.insert(node, fingerprint.clone());
            candidates.push(Candidate {
                fingerprint,
                node,
                material_name,
                parent: scene.parent(node),
            });
        }

        let mut distinct = IndexSet::new();
        for candidate in &candidates {
            tracing::trace!(
                node = ?candidate.node,
                parent = ?candidate.parent,
                material = %candidate.material_name,
                fingerprint = %candidate.fingerprint,
                "candidate"
            );
            distinct.insert(candidate.fingerprint.clone());
        }

        let threshold = self.config.effective_threshold();
        let meshes = scene.meshes();

        for fingerprint in distinct {
            let members: Vec<C::Node> = meshes
                .iter()
                .copied()
                .filter(|mesh| collection.stamps.get(mesh) == Some(&fingerprint))
                .collect();

            if members.len() < threshold {
                tracing::debug!(
                    "{fingerprint}: {} member(s), below threshold {threshold}",
                    members.len()
                );
                collection.skipped.push(Skipped::BelowThreshold {
                    fingerprint,
                    members,
                });
                continue;
            }

            let prefab = members[0];

            self.markers
                .push_prefab_marker(marker_for(scene, prefab));
            for member in &members {
                self.markers.push_spawn_point(marker_for(scene, *member));
            }

            collection.groups.insert(
                fingerprint.clone(),
                Group {
                    fingerprint,
                    prefab,
                    members,
                },
            );
        }

        tracing::debug!(
            "collected {} group(s) covering {} mesh(es)",
            collection.len(),
            collection.member_count()
        );

        collection
    }

    /// [`Thinnizator::collect`] with the root looked up by name and the configured
    /// name-prefix predicate; an unknown root yields an empty collection.
    pub fn collect_named<C: SceneContext>(
        &mut self,
        root_name: &str,
        scene: &C,
    ) -> Collection<C::Node> {
        let Some(root) = scene.find_node_by_name(root_name) else {
            tracing::debug!("collect: no node named {root_name}");
            return Collection::default();
        };

        match self.config.name_prefixes.clone() {
            Some(prefixes) => {
                let prefixes = NamePrefixes::new(prefixes);
                let predicate: &Predicate<'_, C> =
                    &|scene: &C, node: C::Node| prefixes.test(scene, node);
                self.collect(root, Some(predicate), scene)
            }
            None => self.collect(root, None, scene),
        }
    }
}

fn marker_for<C: SceneContext>(scene: &C, node: C::Node) -> Marker {
    Marker::new(
        scene.name(node).unwrap_or_default(),
        scene.absolute_position(node).unwrap_or_default(),
    )
}
