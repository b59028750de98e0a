//! Error types for cellfield.
//!
//! The animations themselves cannot fail: a missing surface is a valid inert
//! state. Errors only come from loading configuration and, in the native
//! viewer, from bringing up the window and the GPU.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for the expected shape.
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    /// Values parse but make no sense together.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during GPU initialization.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found (needs Vulkan, Metal, DX12 or WebGPU)")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface is not compatible with the selected adapter")]
    UnsupportedSurface,
}

/// Errors that can occur when running the native viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let e = ConfigError::Invalid("palette must not be empty".into());
        let msg = format!("{e}");
        assert!(msg.contains("invalid config"));
        assert!(msg.contains("palette"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: ConfigError = io.into();
        assert!(matches!(e, ConfigError::Io(_)));
    }
}
