/// Texture module - textures, renderbuffers, framebuffers and render targets

// Module declarations
pub mod texture;
pub mod renderbuffer;
pub mod framebuffer;
pub mod render_target;

// Re-export everything
pub use texture::*;
pub use renderbuffer::*;
pub use framebuffer::*;
pub use render_target::*;
