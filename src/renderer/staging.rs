use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::renderer::{AttributeData, RenderBackend};

/// CPU-side [`RenderBackend`] that keeps a byte copy of everything uploaded.
///
/// Every upload replaces the previous data of the same name and bumps a
/// version counter, so callers can tell whether something changed since they
/// last looked.
#[derive(Debug, Default)]
pub struct StagingBackend {
    attributes: FxHashMap<String, StagedBuffer>,
    uniforms: FxHashMap<String, StagedBuffer>,
    indices: Option<StagedBuffer>,
}

#[derive(Debug, Clone, Default)]
pub struct StagedBuffer {
    pub data: Vec<u8>,
    /// Element count (vertices, indices or matrices).
    pub count: usize,
    pub version: u64,
}

impl StagedBuffer {
    fn replace(&mut self, bytes: &[u8], count: usize) {
        self.data.clear();
        self.data.extend_from_slice(bytes);
        self.count = count;
        self.version += 1;
    }
}

impl StagingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&StagedBuffer> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&StagedBuffer> {
        self.uniforms.get(name)
    }

    #[must_use]
    pub fn indices(&self) -> Option<&StagedBuffer> {
        self.indices.as_ref()
    }

    /// Reads a staged uniform back as matrices.
    #[must_use]
    pub fn uniform_matrices(&self, name: &str) -> Option<Vec<Mat4>> {
        self.uniforms.get(name).map(|b| {
            b.data
                .chunks_exact(size_of::<Mat4>())
                .map(bytemuck::pod_read_unaligned::<Mat4>)
                .collect()
        })
    }
}

impl RenderBackend for StagingBackend {
    fn upload_attribute(&mut self, name: &str, data: AttributeData<'_>) {
        self.attributes
            .entry(name.to_string())
            .or_default()
            .replace(data.as_bytes(), data.len());
    }

    fn upload_indices(&mut self, indices: &[u32]) {
        self.indices
            .get_or_insert_with(StagedBuffer::default)
            .replace(bytemuck::cast_slice(indices), indices.len());
    }

    fn upload_uniform(&mut self, name: &str, matrices: &[Mat4]) {
        self.uniforms
            .entry(name.to_string())
            .or_default()
            .replace(bytemuck::cast_slice(matrices), matrices.len());
    }
}
