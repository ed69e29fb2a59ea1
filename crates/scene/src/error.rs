use thiserror::Error;

use crate::{
    instances::InstanceError, materials::MaterialError, meshes::MeshError,
    transforms::TransformError,
};

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("{0}")]
    Transform(#[from] TransformError),

    #[error("{0}")]
    Mesh(#[from] MeshError),

    #[error("{0}")]
    Material(#[from] MaterialError),

    #[error("{0}")]
    Instance(#[from] InstanceError),
}

pub type Result<T> = std::result::Result<T, SceneError>;
