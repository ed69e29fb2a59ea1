//! Spawn points and prefab markers recorded by the last collect, for previews.

use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub name: String,
    pub position: Vec3,
}

impl Marker {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Badge text, e.g. `Box.2 [5.000, 0.000, 0.000]`.
    pub fn label(&self) -> String {
        format!(
            "{} [{:.3}, {:.3}, {:.3}]",
            self.name, self.position.x, self.position.y, self.position.z
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct Markers {
    spawn_points: Vec<Marker>,
    prefab_markers: Vec<Marker>,
}

impl Markers {
    pub fn clear(&mut self) {
        self.spawn_points.clear();
        self.prefab_markers.clear();
    }

    pub fn push_spawn_point(&mut self, marker: Marker) {
        self.spawn_points.push(marker);
    }

    pub fn push_prefab_marker(&mut self, marker: Marker) {
        self.prefab_markers.push(marker);
    }

    /// One per member of every materialized group.
    pub fn spawn_points(&self) -> &[Marker] {
        &self.spawn_points
    }

    /// One per chosen prefab.
    pub fn prefab_markers(&self) -> &[Marker] {
        &self.prefab_markers
    }

    pub fn spawn_point(&self, name: &str) -> Option<&Marker> {
        self.spawn_points.iter().find(|marker| marker.name == name)
    }

    pub fn prefab_marker(&self, name: &str) -> Option<&Marker> {
        self.prefab_markers.iter().find(|marker| marker.name == name)
    }
}
