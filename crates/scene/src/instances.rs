//! Instance matrix buffers attached to mesh nodes.

use glam::Mat4;
use slotmap::SecondaryMap;
use thiserror::Error;

use crate::transforms::{Transform, TransformKey};

/// Raw float attribute buffer, `stride` floats per instance.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceBuffer {
    pub data: Vec<f32>,
    pub stride: usize,
    pub normalized: bool,
}

impl InstanceBuffer {
    pub fn instance_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.data.len() / self.stride
        }
    }

    /// Reads one instance as a column-major matrix, only meaningful for 16-float strides.
    pub fn matrix(&self, index: usize) -> Option<Mat4> {
        if self.stride != Instances::MATRIX_STRIDE {
            return None;
        }
        let offset = index * self.stride;
        let slice = self.data.get(offset..offset + self.stride)?;
        Some(Mat4::from_cols_slice(slice))
    }

    pub fn transform(&self, index: usize) -> Option<Transform> {
        self.matrix(index).map(Transform::from)
    }
}

#[derive(Default)]
pub struct Instances {
    buffers: SecondaryMap<TransformKey, InstanceBuffer>,
}

impl Instances {
    /// 4x4 matrix of f32
    pub const MATRIX_STRIDE: usize = 16;

    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous buffer for the key.
    pub fn insert(
        &mut self,
        key: TransformKey,
        data: Vec<f32>,
        stride: usize,
        normalized: bool,
    ) -> Result<()> {
        if stride == 0 || data.len() % stride != 0 {
            return Err(InstanceError::BadStride {
                len: data.len(),
                stride,
            });
        }

        self.buffers.insert(
            key,
            InstanceBuffer {
                data,
                stride,
                normalized,
            },
        );

        Ok(())
    }

    pub fn insert_transforms(&mut self, key: TransformKey, transforms: &[Transform]) -> Result<()> {
        let mut data = Vec::with_capacity(transforms.len() * Self::MATRIX_STRIDE);
        for transform in transforms {
            data.extend_from_slice(&transform.to_matrix().to_cols_array());
        }
        self.insert(key, data, Self::MATRIX_STRIDE, false)
    }

    pub fn get(&self, key: TransformKey) -> Result<&InstanceBuffer> {
        self.buffers
            .get(key)
            .ok_or(InstanceError::BufferNotFound(key))
    }

    pub fn instance_count(&self, key: TransformKey) -> Option<usize> {
        self.buffers.get(key).map(InstanceBuffer::instance_count)
    }

    pub fn remove(&mut self, key: TransformKey) -> Option<InstanceBuffer> {
        self.buffers.remove(key)
    }

    pub fn contains(&self, key: TransformKey) -> bool {
        self.buffers.contains_key(key)
    }
}

pub type Result<T> = std::result::Result<T, InstanceError>;

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("[instance] buffer does not exist {0:?}")]
    BufferNotFound(TransformKey),

    #[error("[instance] buffer of {len} floats does not divide into stride {stride}")]
    BadStride { len: usize, stride: usize },

    #[error("[instance] {0:?} is not an instanceable mesh")]
    NotInstanceable(TransformKey),
}
