//! Public surface of the renderer crate.

pub use wgpu;
pub use winit;

mod framegraph;
pub use framegraph::{FrameGraph, Pass};

pub mod gfx; // Gfx session + config

pub mod cubemap;     // six-face environment textures
pub mod error;       // init / asset / shader / framebuffer errors
pub mod framebuffer; // offscreen targets with shared depth
pub mod geometry;    // vertex layouts + indexed buffers
pub mod model;       // CPU model data + GPU upload
pub mod shader;      // program compile + named uniform table
pub mod skybox;      // cubemap skybox, equirect bake
pub mod texture;     // texture storage + uploads
pub mod uniforms;    // uniform block layouts

mod pipeline; // pipeline creation per pass kind
mod render;   // frame rendering path
mod shaders;  // embedded WGSL

pub use render::{draw_geometry, SceneData};
