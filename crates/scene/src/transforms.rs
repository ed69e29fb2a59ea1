//! Node hierarchy with local transforms and cached world matrices.

use glam::{Mat4, Quat, Vec3};
use std::collections::HashSet;
use thiserror::Error;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

pub struct Transforms {
    locals: SlotMap<TransformKey, Transform>,
    world_matrices: SecondaryMap<TransformKey, Mat4>,
    children: SecondaryMap<TransformKey, Vec<TransformKey>>,
    parents: SecondaryMap<TransformKey, TransformKey>,
    names: SecondaryMap<TransformKey, String>,
    // These are the transforms that are dirtied from the outside
    // e.g. may be set multiples times by the user or randomly in the hierarchy
    dirties: HashSet<TransformKey>,
    root_node: TransformKey,
}

impl Default for Transforms {
    fn default() -> Self {
        Self::new()
    }
}

impl Transforms {
    pub const INITIAL_CAPACITY: usize = 32;

    pub fn new() -> Self {
        let mut locals = SlotMap::with_capacity_and_key(Self::INITIAL_CAPACITY);
        let mut world_matrices = SecondaryMap::with_capacity(Self::INITIAL_CAPACITY);
        let mut children = SecondaryMap::new();

        let root_node = locals.insert(Transform::default());
        world_matrices.insert(root_node, Mat4::IDENTITY);
        children.insert(root_node, Vec::new());

        Self {
            locals,
            world_matrices,
            children,
            parents: SecondaryMap::new(),
            names: SecondaryMap::new(),
            dirties: HashSet::new(),
            root_node,
        }
    }

    pub fn root(&self) -> TransformKey {
        self.root_node
    }

    pub fn contains(&self, key: TransformKey) -> bool {
        self.locals.contains_key(key)
    }

    // if parent is None then the parent is the root node
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<TransformKey>,
    ) -> Result<TransformKey> {
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(TransformError::ParentNotFound(parent));
            }
        }

        let world_matrix = transform.to_matrix();

        let key = self.locals.insert(transform);

        self.world_matrices.insert(key, world_matrix);
        self.children.insert(key, Vec::new());
        self.names.insert(key, name.into());
        self.dirties.insert(key);

        self.set_parent(key, parent)?;

        Ok(key)
    }

    /// Removes the node and its whole subtree, returning every removed key (node first).
    pub fn remove(&mut self, key: TransformKey) -> Result<Vec<TransformKey>> {
        if key == self.root_node {
            return Err(TransformError::CannotModifyRootNode);
        }
        if !self.contains(key) {
            return Err(TransformError::LocalNotFound(key));
        }

        // happens separately so that we can remove the node from the parent's children list
        self.unset_parent(key);

        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.children.remove(current) {
                stack.extend(children.into_iter().rev());
            }
            self.parents.remove(current);
            self.locals.remove(current);
            self.world_matrices.remove(current);
            self.names.remove(current);
            self.dirties.remove(&current);
            removed.push(current);
        }

        Ok(removed)
    }

    // This is the only way to modify the matrices (since it must manage the dirty flags)
    // world transforms are updated by calling update_world()
    pub fn set_local(&mut self, key: TransformKey, transform: Transform) -> Result<()> {
        self.update_local(key, |existing| *existing = transform)
    }

    pub fn update_local(&mut self, key: TransformKey, f: impl FnOnce(&mut Transform)) -> Result<()> {
        if key == self.root_node {
            return Err(TransformError::CannotModifyRootNode);
        }
        match self.locals.get_mut(key) {
            Some(existing) => {
                f(existing);
                self.dirties.insert(key);
                Ok(())
            }
            None => Err(TransformError::LocalNotFound(key)),
        }
    }

    // if parent is None then the parent is the root node
    // the local transform is kept as-is, so the world transform follows the new parent
    pub fn set_parent(&mut self, child: TransformKey, parent: Option<TransformKey>) -> Result<()> {
        if child == self.root_node {
            return Err(TransformError::CannotModifyRootNode);
        }
        if !self.contains(child) {
            return Err(TransformError::LocalNotFound(child));
        }

        let parent = parent.unwrap_or(self.root_node);

        if !self.contains(parent) {
            return Err(TransformError::ParentNotFound(parent));
        }

        if parent == child || self.is_ancestor(child, parent) {
            return Err(TransformError::CyclicParent { child, parent });
        }

        if let Some(existing_parent) = self.parents.get(child) {
            if *existing_parent == parent {
                return Ok(());
            }
            self.unset_parent(child);
        }

        // all transforms have a children vec when created
        if let Some(children) = self.children.get_mut(parent) {
            children.push(child);
        }

        self.parents.insert(child, parent);
        self.dirties.insert(child);

        Ok(())
    }

    /// Parent of a node, or `None` when it hangs directly off the root.
    pub fn parent(&self, child: TransformKey) -> Option<TransformKey> {
        self.parents
            .get(child)
            .copied()
            .filter(|parent| *parent != self.root_node)
    }

    pub fn get_parent(&self, child: TransformKey) -> Result<TransformKey> {
        if child == self.root_node {
            return Err(TransformError::CannotGetParentOfRootNode);
        }

        self.parents
            .get(child)
            .copied()
            .ok_or(TransformError::CannotGetParent(child))
    }

    pub fn children(&self, key: TransformKey) -> Result<&[TransformKey]> {
        self.children
            .get(key)
            .map(|children| children.as_slice())
            .ok_or(TransformError::LocalNotFound(key))
    }

    pub fn get_local(&self, key: TransformKey) -> Result<&Transform> {
        self.locals
            .get(key)
            .ok_or(TransformError::LocalNotFound(key))
    }

    pub fn get_world(&self, key: TransformKey) -> Result<&Mat4> {
        self.world_matrices
            .get(key)
            .ok_or(TransformError::WorldNotFound(key))
    }

    pub fn name(&self, key: TransformKey) -> Option<&str> {
        self.names.get(key).map(|name| name.as_str())
    }

    pub fn rename(&mut self, key: TransformKey, name: impl Into<String>) -> Result<()> {
        match self.names.get_mut(key) {
            Some(existing) => {
                *existing = name.into();
                Ok(())
            }
            None => Err(TransformError::LocalNotFound(key)),
        }
    }

    /// First node with the given name, walking the hierarchy depth-first in child order.
    pub fn find_by_name(&self, name: &str) -> Option<TransformKey> {
        self.depth_first(self.root_node)
            .into_iter()
            .find(|key| self.name(*key) == Some(name))
    }

    /// All nodes below `key` (excluding `key`), depth-first in child order.
    pub fn depth_first(&self, key: TransformKey) -> Vec<TransformKey> {
        let mut out = Vec::new();
        let mut stack: Vec<TransformKey> = match self.children.get(key) {
            Some(children) => children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(children) = self.children.get(current) {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }

    // This is the only way to update the world matrices
    pub fn update_world(&mut self) {
        if self.dirties.is_empty() {
            return;
        }

        self.update_inner_recursively(self.root_node, false);

        self.dirties.clear();
    }

    // See: https://gameprogrammingpatterns.com/dirty-flag.html
    // the overall idea is we walk the tree and skip over nodes that are not dirty
    // whenever we encounter a dirty node, we must also mark all of its children dirty
    // finally, for each dirty node, its world transform is its parent's world transform
    // multiplied by its local transform
    fn update_inner_recursively(&mut self, key: TransformKey, dirty_tracker: bool) {
        let dirty = self.dirties.contains(&key) | dirty_tracker;

        if dirty {
            let local_matrix = self.locals[key].to_matrix();

            let world_matrix = match self.parents.get(key) {
                Some(parent) => self.world_matrices[*parent].mul_mat4(&local_matrix),
                None => local_matrix,
            };

            self.world_matrices[key] = world_matrix;
        }

        // can't keep a mutable reference to self while it has a borrow of the iterator
        let children = self.children[key].clone();
        for child in children {
            self.update_inner_recursively(child, dirty);
        }
    }

    fn is_ancestor(&self, ancestor: TransformKey, mut key: TransformKey) -> bool {
        while let Some(parent) = self.parents.get(key) {
            if *parent == ancestor {
                return true;
            }
            key = *parent;
        }
        false
    }

    // internal-only function - leaves the node dangling
    // after this call, the node should either be immediately removed or reparented
    fn unset_parent(&mut self, child: TransformKey) {
        if let Some(parent) = self.parents.remove(child) {
            if let Some(children) = self.children.get_mut(parent) {
                children.retain(|&c| c != child);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self::from_matrix(matrix)
    }
}

new_key_type! {
    pub struct TransformKey;
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("[transform] local transform does not exist {0:?}")]
    LocalNotFound(TransformKey),

    #[error("[transform] world transform does not exist {0:?}")]
    WorldNotFound(TransformKey),

    #[error("[transform] parent does not exist {0:?}")]
    ParentNotFound(TransformKey),

    #[error("[transform] cannot modify root node")]
    CannotModifyRootNode,

    #[error("[transform] cannot get parent of root node")]
    CannotGetParentOfRootNode,

    #[error("[transform] cannot get parent for {0:?}")]
    CannotGetParent(TransformKey),

    #[error("[transform] {child:?} cannot be parented under its own descendant {parent:?}")]
    CyclicParent {
        child: TransformKey,
        parent: TransformKey,
    },
}
