//! Window management
//!
//! Cross-platform window creation via winit

use halo_core::SurfaceSize;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Halo".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Drawing surface size for a window's inner size. A minimized window
/// reports zero and has no surface.
pub fn surface_size(size: PhysicalSize<u32>) -> Option<SurfaceSize> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some(SurfaceSize::new(size.width as f32, size.height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_window_has_no_surface() {
        assert_eq!(surface_size(PhysicalSize::new(0, 600)), None);
        assert_eq!(
            surface_size(PhysicalSize::new(800, 600)),
            Some(SurfaceSize::new(800.0, 600.0))
        );
    }
}
