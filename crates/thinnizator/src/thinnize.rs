//! The full pass: collect, capture placements, build prefabs, dispose the rest.

use crate::collect::Group;
use crate::context::SceneContext;
use crate::dispose::dispose;
use crate::error::{Result, ThinnizatorError};
use crate::instancing::build_instances;
use crate::predicate::{NamePrefixes, Predicate};
use crate::report::{GroupOutcome, GroupStatus, ThinnizeReport};
use crate::resolve::{node_label, pack, placements, InstancePlacement};
use crate::Thinnizator;

impl Thinnizator {
    /// Replaces every materialized group with one instanced prefab under `output`.
    ///
    /// Placements for all groups are captured before the scene is touched, and
    /// members are only destroyed once every group has been processed. Groups the
    /// host cannot instance, or whose prefab edits fail, keep all their members.
    pub fn thinnize<C: SceneContext>(
        &mut self,
        root: C::Node,
        predicate: Option<&Predicate<'_, C>>,
        output: C::Node,
        scene: &mut C,
    ) -> ThinnizeReport<C::Node> {
        let _maybe_span_guard = if self.config.logging.pass_timings {
            Some(tracing::span!(tracing::Level::INFO, "Thinnizator thinnize").entered())
        } else {
            None
        };

        let collection = self.collect(root, predicate, &*scene);

        let mut report = ThinnizeReport {
            skipped: collection.skipped.clone(),
            ..ThinnizeReport::default()
        };

        let resolved: Vec<(&Group<C::Node>, Result<Vec<InstancePlacement>>)> = {
            let _maybe_span_guard = if self.config.logging.pass_timings {
                Some(tracing::span!(tracing::Level::INFO, "Resolve placements").entered())
            } else {
                None
            };
            collection
                .groups
                .values()
                .map(|group| (group, placements(&*scene, &group.members)))
                .collect()
        };

        let mut doomed = Vec::new();
        let mut prefabs = Vec::new();

        {
            let _maybe_span_guard = if self.config.logging.pass_timings {
                Some(tracing::span!(tracing::Level::INFO, "Build prefabs").entered())
            } else {
                None
            };

            for (group, placements) in resolved {
                let prefab_name = node_label(&*scene, group.prefab);
                let mut outcome = GroupOutcome {
                    fingerprint: group.fingerprint.clone(),
                    prefab: group.prefab,
                    prefab_name: prefab_name.clone(),
                    member_count: group.members.len(),
                    status: GroupStatus::Failed,
                    error: None,
                };

                let placements = match placements {
                    Ok(placements) => placements,
                    Err(err) => {
                        report
                            .log
                            .skipped(&prefab_name, GroupStatus::Failed, &err.to_string());
                        outcome.error = Some(err.to_string());
                        report.groups.push(outcome);
                        continue;
                    }
                };

                if !scene.supports_instancing(group.prefab) {
                    report.log.skipped(
                        &prefab_name,
                        GroupStatus::SkippedBufferUnsupported,
                        "instance buffers not supported",
                    );
                    outcome.status = GroupStatus::SkippedBufferUnsupported;
                    report.groups.push(outcome);
                    continue;
                }

                for (member, placement) in group.members.iter().zip(&placements) {
                    report.log.instance(
                        &node_label(&*scene, *member),
                        &prefab_name,
                        scene.node_material_name(*member),
                        placement.scale,
                        placement.position,
                    );
                }

                report.log.thinning(&prefab_name, group.members.len());

                match build_instances(scene, group, pack(&placements), output) {
                    Ok(built) => {
                        outcome.prefab_name = built.name;
                        outcome.status = GroupStatus::Instanced;
                        doomed.extend(group.members.iter().copied());
                        prefabs.push(built.node);
                    }
                    Err(err) => {
                        report
                            .log
                            .skipped(&prefab_name, GroupStatus::Failed, &err.to_string());
                        outcome.prefab_name = node_label(&*scene, group.prefab);
                        outcome.error = Some(err.to_string());
                    }
                }

                report.groups.push(outcome);
            }
        }

        let disposal = {
            let _maybe_span_guard = if self.config.logging.pass_timings {
                Some(tracing::span!(tracing::Level::INFO, "Dispose").entered())
            } else {
                None
            };
            dispose(scene, &doomed, &prefabs, &mut report.log)
        };
        report.disposed = disposal.disposed;
        report.disposal_failures = disposal.failures;

        report.log.summary(
            report.instanced_count(),
            report.instance_count(),
            report.disposed.len(),
        );

        report
    }

    /// [`Thinnizator::thinnize`] with nodes looked up by name.
    ///
    /// An unknown root is a no-op. The output node is created at the top level
    /// when no node carries `output_name` yet.
    pub fn thinnize_named<C: SceneContext>(
        &mut self,
        root_name: &str,
        output_name: &str,
        scene: &mut C,
    ) -> Result<ThinnizeReport<C::Node>> {
        let Some(root) = scene.find_node_by_name(root_name) else {
            tracing::debug!("thinnize: no node named {root_name}");
            return Ok(ThinnizeReport::default());
        };

        let output = match scene.find_node_by_name(output_name) {
            Some(output) => output,
            None => scene
                .create_node(output_name, None)
                .map_err(ThinnizatorError::scene("create_node", output_name))?,
        };

        match self.config.name_prefixes.clone() {
            Some(prefixes) => {
                let prefixes = NamePrefixes::new(prefixes);
                let predicate: &Predicate<'_, C> =
                    &|scene: &C, node: C::Node| prefixes.test(scene, node);
                Ok(self.thinnize(root, Some(predicate), output, scene))
            }
            None => Ok(self.thinnize(root, None, output, scene)),
        }
    }
}
