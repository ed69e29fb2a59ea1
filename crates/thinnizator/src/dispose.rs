//! Removes every instanced member except the prefabs.

use std::collections::HashSet;

use crate::context::SceneContext;
use crate::report::{DisposalFailure, OperationLog};
use crate::resolve::node_label;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Disposal {
    pub disposed: Vec<String>,
    pub failures: Vec<DisposalFailure>,
}

/// Must run after every group's matrices have been captured. Prefabs are matched
/// by node identity since names are not unique. A node that is already gone
/// (e.g. destroyed together with an earlier member's subtree) is recorded as a
/// failure and otherwise ignored.
pub fn dispose<C: SceneContext>(
    scene: &mut C,
    members: &[C::Node],
    prefabs: &[C::Node],
    log: &mut OperationLog,
) -> Disposal {
    let prefabs: HashSet<C::Node> = prefabs.iter().copied().collect();
    let mut disposal = Disposal::default();

    for member in members.iter().filter(|member| !prefabs.contains(*member)) {
        let name = node_label(scene, *member);
        match scene.destroy(*member) {
            Ok(()) => {
                log.disposing(&name);
                disposal.disposed.push(name);
            }
            Err(err) => {
                let error = err.to_string();
                log.disposal_failed(&name, &error);
                disposal.failures.push(DisposalFailure { name, error });
            }
        }
    }

    disposal
}
