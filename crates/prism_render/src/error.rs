//! Error taxonomy for the renderer.
//!
//! Initialization and asset failures are surfaced synchronously at the
//! call that caused them and never retried. Programmer errors (double
//! session start, out-of-range attachment indices, indices past the end
//! of a vertex buffer) are asserts, not `Result`s.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failures: no usable adapter, device, or surface.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    Device(String),
    #[error("surface creation failed: {0}")]
    Surface(String),
}

/// Failures loading a single asset. Fatal to that asset only; the caller
/// decides whether to abort or continue without it.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("could not read {path}: {detail}")]
    Io { path: PathBuf, detail: String },
    #[error("could not decode {path}: {detail}")]
    Decode { path: PathBuf, detail: String },
    #[error("a skybox needs exactly 6 face images, got {0}")]
    FaceCount(usize),
    #[error("cubemap face {face} is {got_w}x{got_h}, expected {expected}x{expected}")]
    FaceSize {
        face: usize,
        expected: u32,
        got_w: u32,
        got_h: u32,
    },
    #[error("model has no meshes")]
    EmptyModel,
    #[error("mesh {mesh} references material {index} but only {materials} exist")]
    BadMaterialIndex {
        mesh: usize,
        index: usize,
        materials: usize,
    },
    #[error(transparent)]
    Shader(#[from] CompileError),
}

impl AssetLoadError {
    /// Split decoder failures from plain file errors so the caller sees
    /// which one happened.
    pub(crate) fn from_image(path: &std::path::Path, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => AssetLoadError::Io {
                path: path.to_path_buf(),
                detail: io.to_string(),
            },
            other => AssetLoadError::Decode {
                path: path.to_path_buf(),
                detail: other.to_string(),
            },
        }
    }
}

/// Which shader stage a compile failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// A shader failed validation. Fatal to that program only; the driver
/// diagnostic is carried verbatim.
#[derive(Debug, Error)]
#[error("{stage} shader '{label}' failed validation: {detail}")]
pub struct CompileError {
    pub stage: ShaderStage,
    pub label: String,
    pub detail: String,
}

/// An attachment set that can never form a complete framebuffer.
/// Reported at creation; an incomplete framebuffer is never handed back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("framebuffer has no attachments")]
    NoAttachments,
    #[error("framebuffer wants at most 8 color attachments, got {0}")]
    TooManyColorAttachments(usize),
    #[error("attachment is {got_w}x{got_h}, framebuffer is {expected_w}x{expected_h}")]
    SizeMismatch {
        expected_w: u32,
        expected_h: u32,
        got_w: u32,
        got_h: u32,
    },
    #[error("attachment has sample count {got}, framebuffer uses {expected}")]
    SampleCountMismatch { expected: u32, got: u32 },
}
