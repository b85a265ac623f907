use thiserror::Error;

/// Errors that can occur while setting up the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a surface for the window: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter can present to this window")]
    NoAdapter,

    #[error("adapter reports no supported surface formats")]
    UnsupportedSurface,

    #[error("failed to open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
