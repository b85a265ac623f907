//! Halo Render
//!
//! Host side of the effects: tessellates recorded draw lists and draws them
//! with wgpu into a winit window.

pub mod error;
pub mod renderer;
pub mod tessellate;
pub mod window;

pub use error::RenderError;
pub use renderer::CanvasRenderer;
pub use tessellate::{Batch, Mesh, Tessellator, Vertex};

pub use wgpu;
pub use winit;
