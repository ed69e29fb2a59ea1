use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

#[derive(Default)]
pub struct Materials {
    lookup: SlotMap<MaterialKey, Material>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_base_color(mut self, base_color: [f32; 4]) -> Self {
        self.base_color = base_color;
        self
    }
}

impl Materials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MaterialKey) -> Result<&Material> {
        self.lookup.get(key).ok_or(MaterialError::NotFound(key))
    }

    pub fn insert(&mut self, material: Material) -> MaterialKey {
        self.lookup.insert(material)
    }

    pub fn update(&mut self, key: MaterialKey, f: impl FnOnce(&mut Material)) -> Result<()> {
        let material = self
            .lookup
            .get_mut(key)
            .ok_or(MaterialError::NotFound(key))?;
        f(material);
        Ok(())
    }

    /// Copies a material under a new name, the source is left untouched.
    pub fn clone_material(&mut self, key: MaterialKey, name: impl Into<String>) -> Result<MaterialKey> {
        let mut material = self.get(key)?.clone();
        material.name = name.into();
        Ok(self.lookup.insert(material))
    }

    pub fn find_by_name(&self, name: &str) -> Option<MaterialKey> {
        self.lookup
            .iter()
            .find(|(_, material)| material.name == name)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

new_key_type! {
    pub struct MaterialKey;
}

pub type Result<T> = std::result::Result<T, MaterialError>;

#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("[material] not found: {0:?}")]
    NotFound(MaterialKey),
}
