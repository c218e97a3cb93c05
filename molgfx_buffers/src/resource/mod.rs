/// Resource module - hash-id registry for shared GPU objects

// Module declarations
pub mod gpu_resource;
pub mod gpu_object_registry;

// Re-export everything
pub use gpu_resource::*;
pub use gpu_object_registry::*;
