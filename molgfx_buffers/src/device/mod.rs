/// Device module - the native graphics API boundary

// Module declarations
pub mod graphics_device;
pub mod texture_params;
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture_params::*;
pub use mock_graphics_device::MockGraphicsDevice;
