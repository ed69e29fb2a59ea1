/// Which meshes under the scan root are considered for grouping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScanDepth {
    /// Immediate child meshes of the root only.
    #[default]
    Children,
    /// Every mesh anywhere below the root.
    Descendants,
}

/// Logging flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThinnizatorLogging {
    /// Wrap each phase of a pass in an INFO span.
    pub pass_timings: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThinnizatorConfig {
    /// Minimum number of scene-wide members before a group is instanced.
    pub threshold: usize,
    pub scan_depth: ScanDepth,
    /// Used by the named entry points; `None` accepts every node.
    pub name_prefixes: Option<Vec<String>>,
    pub logging: ThinnizatorLogging,
}

impl Default for ThinnizatorConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            scan_depth: ScanDepth::default(),
            name_prefixes: None,
            logging: ThinnizatorLogging::default(),
        }
    }
}

impl ThinnizatorConfig {
    pub const DEFAULT_THRESHOLD: usize = 2;

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_scan_depth(mut self, scan_depth: ScanDepth) -> Self {
        self.scan_depth = scan_depth;
        self
    }

    pub fn with_name_prefixes<S: Into<String>>(mut self, prefixes: impl IntoIterator<Item = S>) -> Self {
        self.name_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_logging(mut self, logging: ThinnizatorLogging) -> Self {
        self.logging = logging;
        self
    }

    // a threshold of zero would materialize empty groups
    pub fn effective_threshold(&self) -> usize {
        self.threshold.max(1)
    }
}
