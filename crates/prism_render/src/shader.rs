//! Shader programs: validated module pairs plus a named-uniform table.
//!
//! Compilation uses a validation error scope so a broken program fails
//! at its own call site with the driver diagnostic, without poisoning
//! other programs. Setting a uniform name the program never declared is
//! a NO-OP, not an error; callers may push partially-used uniform sets.

use std::ops::Range;

use glam::{Mat4, Vec3};

use crate::error::{CompileError, ShaderStage};
use crate::wgpu;

/// Validate one WGSL module, surfacing the diagnostic verbatim.
pub fn compile_module(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, CompileError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(module),
        Some(err) => Err(CompileError {
            stage,
            label: label.to_string(),
            detail: err.to_string(),
        }),
    }
}

/// CPU-side staging for a program's per-draw uniform buffer, addressed
/// by uniform name. Unknown names no-op by design.
#[derive(Debug, Default)]
pub struct UniformTable {
    entries: Vec<(String, Range<usize>)>,
    staging: Vec<u8>,
    dirty: bool,
}

impl UniformTable {
    pub fn new(size: usize) -> Self {
        Self {
            entries: Vec::new(),
            staging: vec![0; size],
            dirty: false,
        }
    }

    pub fn declare(mut self, name: &str, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.staging.len(), "uniform past end of block");
        self.entries.push((name.to_string(), offset..offset + len));
        self
    }

    pub fn set_bytes(&mut self, name: &str, bytes: &[u8]) {
        let Some((_, range)) = self.entries.iter().find(|(n, _)| n == name) else {
            return;
        };
        assert_eq!(bytes.len(), range.len(), "wrong size for uniform '{name}'");
        self.staging[range.clone()].copy_from_slice(bytes);
        self.dirty = true;
    }

    pub fn set_mat4(&mut self, name: &str, m: Mat4) {
        self.set_bytes(name, bytemuck::bytes_of(&m.to_cols_array_2d()));
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) {
        self.set_bytes(name, bytemuck::bytes_of(&v.to_array()));
    }

    pub fn set_f32(&mut self, name: &str, v: f32) {
        self.set_bytes(name, bytemuck::bytes_of(&v));
    }

    pub fn set_i32(&mut self, name: &str, v: i32) {
        self.set_bytes(name, bytemuck::bytes_of(&v));
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn bytes(&self) -> &[u8] {
        &self.staging
    }

    /// Reset the dirty flag once staged bytes have been written out.
    pub fn mark_flushed(&mut self) {
        self.dirty = false;
    }
}

/// A compiled vertex+fragment pair with its uniform staging buffer.
pub struct ShaderProgram {
    pub label: String,
    pub vs: wgpu::ShaderModule,
    pub fs: wgpu::ShaderModule,
    pub uniforms: UniformTable,
    buffer: Option<wgpu::Buffer>,
}

impl ShaderProgram {
    /// Compile both stages. A failure in either stage is fatal to this
    /// program only.
    pub fn compile(
        device: &wgpu::Device,
        label: &str,
        vs_source: &str,
        fs_source: &str,
        uniforms: UniformTable,
    ) -> Result<Self, CompileError> {
        let vs = compile_module(device, label, ShaderStage::Vertex, vs_source)?;
        let fs = compile_module(device, label, ShaderStage::Fragment, fs_source)?;
        let buffer = if uniforms.bytes().is_empty() {
            None
        } else {
            Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label}_uniforms")),
                size: uniforms.bytes().len() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }))
        };
        Ok(Self {
            label: label.to_string(),
            vs,
            fs,
            uniforms,
            buffer,
        })
    }

    pub fn uniform_buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Push staged uniform values to the GPU in one write. Must run
    /// before the frame's passes are encoded; buffer writes are ordered
    /// ahead of command submission.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if !self.uniforms.is_dirty() {
            return;
        }
        if let Some(buf) = &self.buffer {
            queue.write_buffer(buf, 0, self.uniforms.bytes());
        }
        self.uniforms.mark_flushed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_uniform_lands_at_its_offset() {
        let mut table = UniformTable::new(80)
            .declare("model_to_world", 0, 64)
            .declare("exposure", 64, 4);

        table.set_f32("exposure", 0.7);
        assert!(table.is_dirty());
        let bytes = &table.bytes()[64..68];
        assert_eq!(bytes, 0.7f32.to_ne_bytes());

        table.set_mat4("model_to_world", Mat4::IDENTITY);
        let first: f32 = *bytemuck::from_bytes(&table.bytes()[0..4]);
        assert_eq!(first, 1.0);
    }

    #[test]
    fn undeclared_uniform_is_a_noop() {
        let mut table = UniformTable::new(64).declare("model_to_world", 0, 64);
        let before = table.bytes().to_vec();
        table.set_f32("t", 1.0);
        table.set_vec3("camera_pos", Vec3::ONE);
        assert_eq!(table.bytes(), &before[..]);
        assert!(!table.is_dirty());
    }

    #[test]
    #[should_panic]
    fn wrong_size_for_declared_uniform_panics() {
        let mut table = UniformTable::new(64).declare("model_to_world", 0, 64);
        table.set_f32("model_to_world", 1.0);
    }
}
