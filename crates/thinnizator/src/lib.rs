//! Collapses repeated static meshes into GPU-instanced prefabs.
//!
//! Meshes under a root are grouped by a cheap fingerprint (material name plus
//! vertex count). For each group that reaches the threshold, the first member
//! becomes a prefab carrying one 4x4 matrix per member, and the other members
//! are destroyed. Everything goes through a [`SceneContext`], so the same
//! passes run against any host scene graph.
//!
//! ```ignore
//! let mut thinnizator = Thinnizator::new(ThinnizatorConfig::default().with_threshold(3));
//! let preview = thinnizator.collect_named("Furniture", &scene);
//! let report = thinnizator.thinnize_named("Furniture", "Prefabs", &mut scene)?;
//! ```

pub mod collect;
pub mod config;
pub mod context;
pub mod dispose;
pub mod error;
pub mod fingerprint;
pub mod instancing;
pub mod markers;
pub mod predicate;
pub mod report;
pub mod resolve;
mod thinnize;

#[cfg(all(test, feature = "host-scene"))]
mod fixtures;

pub use collect::{Collection, Group, Skipped};
pub use config::{ScanDepth, ThinnizatorConfig, ThinnizatorLogging};
pub use context::SceneContext;
pub use error::{Result, ThinnizatorError};
pub use fingerprint::Fingerprint;
pub use markers::{Marker, Markers};
pub use predicate::{NamePrefixes, Predicate};
pub use report::{GroupOutcome, GroupStatus, OperationLog, ThinnizeReport};

#[cfg(feature = "host-scene")]
pub use thinnizator_scene as scene;

/// Holds the configuration and the markers of the most recent collect.
#[derive(Clone, Debug, Default)]
pub struct Thinnizator {
    pub(crate) config: ThinnizatorConfig,
    pub(crate) markers: Markers,
}

impl Thinnizator {
    pub fn new(config: ThinnizatorConfig) -> Self {
        Self {
            config,
            markers: Markers::default(),
        }
    }

    pub fn config(&self) -> &ThinnizatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ThinnizatorConfig {
        &mut self.config
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn spawn_points(&self) -> &[Marker] {
        self.markers.spawn_points()
    }

    pub fn prefab_markers(&self) -> &[Marker] {
        self.markers.prefab_markers()
    }

    /// Spawn point of the member called `name`, if the last collect grouped it.
    pub fn highlight_instance(&self, name: &str) -> Option<&Marker> {
        self.markers.spawn_point(name)
    }

    /// Marker of the prefab called `name`, if the last collect chose it.
    pub fn highlight_prefab(&self, name: &str) -> Option<&Marker> {
        self.markers.prefab_marker(name)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use crate::config::{ScanDepth, ThinnizatorConfig};

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: ThinnizatorConfig =
            serde_json::from_str(r#"{"threshold": 3, "scan_depth": "descendants"}"#).unwrap();

        assert_eq!(config.threshold, 3);
        assert_eq!(config.scan_depth, ScanDepth::Descendants);
        assert_eq!(config.name_prefixes, None);
        assert!(!config.logging.pass_timings);
    }

    #[test]
    fn empty_config_is_default() {
        let config: ThinnizatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ThinnizatorConfig::default());
    }
}
