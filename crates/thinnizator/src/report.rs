//! Structured trace of a pass, plus the flat text log built alongside it.

use glam::Vec3;
use strum::{AsRefStr, Display};

use crate::collect::Skipped;
use crate::fingerprint::Fingerprint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum GroupStatus {
    Instanced,
    SkippedBelowThreshold,
    SkippedNoMaterial,
    SkippedBufferUnsupported,
    /// The host scene rejected one of the prefab edits.
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupOutcome<N> {
    pub fingerprint: Fingerprint,
    pub prefab: N,
    /// Name after the pass (`prefab-...` once instanced).
    pub prefab_name: String,
    pub member_count: usize,
    pub status: GroupStatus,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisposalFailure {
    pub name: String,
    pub error: String,
}

#[derive(Clone, Debug)]
pub struct ThinnizeReport<N> {
    pub groups: Vec<GroupOutcome<N>>,
    pub skipped: Vec<Skipped<N>>,
    pub disposed: Vec<String>,
    pub disposal_failures: Vec<DisposalFailure>,
    pub log: OperationLog,
}

impl<N> Default for ThinnizeReport<N> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            skipped: Vec::new(),
            disposed: Vec::new(),
            disposal_failures: Vec::new(),
            log: OperationLog::default(),
        }
    }
}

impl<N> ThinnizeReport<N> {
    pub fn instanced(&self) -> impl Iterator<Item = &GroupOutcome<N>> {
        self.groups
            .iter()
            .filter(|group| group.status == GroupStatus::Instanced)
    }

    pub fn instanced_count(&self) -> usize {
        self.instanced().count()
    }

    pub fn instance_count(&self) -> usize {
        self.instanced().map(|group| group.member_count).sum()
    }

    pub fn group(&self, fingerprint: &str) -> Option<&GroupOutcome<N>> {
        self.groups
            .iter()
            .find(|group| group.fingerprint.as_str() == fingerprint)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.skipped.is_empty()
    }
}

/// Line-oriented operation log; every line is mirrored to `tracing`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationLog {
    lines: Vec<String>,
}

impl OperationLog {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub(crate) fn instance(
        &mut self,
        member: &str,
        prefab: &str,
        material: Option<&str>,
        scale: Vec3,
        position: Vec3,
    ) {
        let line = format!(
            "{member} using prefab {prefab} material {} scaling {scale} spawning at {}, {}, {}",
            material.unwrap_or("n/a"),
            position.x,
            position.y,
            position.z
        );
        tracing::debug!("{line}");
        self.lines.push(line);
    }

    pub(crate) fn thinning(&mut self, prefab: &str, count: usize) {
        let line = format!("THINNING prefab {prefab} {count} times");
        tracing::info!("{line}");
        self.lines.push(line);
    }

    pub(crate) fn skipped(&mut self, prefab: &str, status: GroupStatus, reason: &str) {
        let line = format!("{status} prefab {prefab}: {reason}");
        tracing::warn!("{line}");
        self.lines.push(line);
    }

    pub(crate) fn disposing(&mut self, name: &str) {
        let line = format!("Disposing {name}");
        tracing::debug!("{line}");
        self.lines.push(line);
    }

    pub(crate) fn disposal_failed(&mut self, name: &str, error: &str) {
        let line = format!("Disposing {name} failed: {error}");
        tracing::warn!("{line}");
        self.lines.push(line);
    }

    pub(crate) fn summary(&mut self, groups: usize, instances: usize, disposed: usize) {
        let line = format!(
            "Thinnized {groups} group(s) into {instances} instance(s), disposed {disposed} mesh(es)"
        );
        tracing::info!("{line}");
        self.lines.push(line);
    }
}
