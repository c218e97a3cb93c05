/*!
# Molgfx Buffers

GPU resource layer for the molgfx real-time renderer.

This crate owns the lifecycle and memory layout of vertex/index buffers, textures,
renderbuffers, framebuffers and render targets. All native calls go through the
[`GraphicsDevice`](crate::device::GraphicsDevice) trait, so the layout logic is
independent of the graphics API that ends up executing it.

## Architecture

- **VertexFormat**: closed catalog of per-vertex element formats
- **Layout engine**: separate / sequential / interleaved packing of `BufferDesc` lists
- **VertexBuffer / IndexBuffer**: buffer objects plus attribute binding and masking
- **AttribGraph**: declarative attribute conversion graph (ops, post-processors)
- **Texture / Renderbuffer / Framebuffer / RenderTarget**: RAII wrappers over native handles
- **GpuObjectRegistry**: hash-id registry used to share GPU objects by id
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod device;
pub mod buffer;
pub mod attrib;
pub mod texture;
pub mod resource;

// Main molgfx namespace module
pub mod molgfx {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Native graphics API boundary
    pub mod device {
        pub use crate::device::*;
    }

    // Vertex formats, buffer descriptors, layout engine, buffer objects
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Attribute conversion graph
    pub mod attrib {
        pub use crate::attrib::*;
    }

    // Textures, renderbuffers, framebuffers, render targets
    pub mod texture {
        pub use crate::texture::*;
    }

    // Hash-id registry
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
