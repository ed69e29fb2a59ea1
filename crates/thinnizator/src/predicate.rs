//! Node filters applied while scanning the root.

use crate::context::SceneContext;

/// Caller-supplied inclusion test. An absent predicate includes everything.
pub type Predicate<'a, C> = dyn Fn(&C, <C as SceneContext>::Node) -> bool + 'a;

pub fn all_nodes<C: SceneContext>() -> impl Fn(&C, C::Node) -> bool {
    |_, _| true
}

/// Matches nodes whose name starts with one of the prefixes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamePrefixes {
    prefixes: Vec<String>,
}

impl NamePrefixes {
    pub fn new<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    // unnamed nodes never match
    pub fn test<C: SceneContext>(&self, scene: &C, node: C::Node) -> bool {
        scene.name(node).is_some_and(|name| self.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::NamePrefixes;

    #[test]
    fn prefix_match_is_anchored_at_start() {
        let prefixes = NamePrefixes::new(["Cube", "Stolik maly"]);
        assert!(prefixes.matches("Cube.001"));
        assert!(prefixes.matches("Stolik maly_primitive0"));
        assert!(!prefixes.matches("BigCube"));
        assert!(!prefixes.matches(""));
    }

    #[test]
    fn empty_prefix_list_matches_nothing() {
        let prefixes = NamePrefixes::default();
        assert!(!prefixes.matches("Cube"));
    }
}
