/// GraphicsDevice trait - the single seam to the native graphics API
///
/// Every buffer, texture, renderbuffer and framebuffer wrapper in this crate
/// issues its native calls through this trait. Calls that allocate or upload
/// return `Result` so that failures are checked after each call; pure state
/// changes are infallible.

use std::sync::{Arc, Mutex, MutexGuard};
use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::buffer::NativeType;
use crate::device::{
    TextureDim, SamplingParams, TextureImage, TextureRegion,
    RenderbufferStorage, FramebufferAttachment,
};

// ============================================================================
// Native handles
// ============================================================================

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// The unset handle
            pub const NONE: Self = Self(0);

            /// True when this handle refers to a live native object
            pub fn is_valid(&self) -> bool {
                self.0 != 0
            }
        }
    };
}

native_handle!(
    /// Native buffer object name
    BufferId
);
native_handle!(
    /// Native texture object name
    TextureId
);
native_handle!(
    /// Native renderbuffer object name
    RenderbufferId
);
native_handle!(
    /// Native framebuffer object name
    FramebufferId
);
native_handle!(
    /// Linked shader program name (owned by the surrounding renderer)
    ProgramId
);

// ============================================================================
// Buffer configuration
// ============================================================================

/// Bind point of a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data
    Array,
    /// Element indices
    ElementArray,
}

/// Upload hint passed to the native buffer allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    #[default]
    StaticDraw,
    /// Rewritten frequently through sub-data updates
    DynamicDraw,
}

/// Arguments of a vertex attribute pointer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribPointer {
    /// Components per vertex (1..=4)
    pub component_count: u32,
    /// Scalar type of each component
    pub native_type: NativeType,
    /// Whether integer data is normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
    /// Byte distance between consecutive vertices (0 = tightly packed)
    pub stride: usize,
    /// Byte offset of the first element in the bound buffer
    pub offset: usize,
}

// ============================================================================
// Framebuffer state
// ============================================================================

bitflags! {
    /// Buffers cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// Completeness of the currently bound framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDimensions,
    Unsupported,
    Undefined,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Native graphics API
///
/// Implemented by the backend that owns the rendering context. All calls
/// assume the context is current on the calling thread. `delete_*` calls must
/// accept a zero handle as a no-op.
pub trait GraphicsDevice: Send {
    // ===== BUFFERS =====

    /// Generate a new buffer object name
    fn gen_buffer(&mut self) -> Result<BufferId>;

    /// Bind a buffer to a target (`BufferId::NONE` unbinds)
    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) -> Result<()>;

    /// Allocate and fill the storage of the buffer bound to `target`
    ///
    /// Fails with `Error::OutOfMemory` when the device cannot allocate it.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) -> Result<()>;

    /// Overwrite a byte range of the buffer bound to `target`
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) -> Result<()>;

    /// Release a buffer object
    fn delete_buffer(&mut self, id: BufferId);

    // ===== VERTEX ATTRIBUTES =====

    /// Location of a named attribute in a linked program (negative when absent)
    fn attrib_location(&self, program: ProgramId, name: &str) -> i32;

    fn enable_vertex_attrib_array(&mut self, location: u32);

    fn disable_vertex_attrib_array(&mut self, location: u32);

    /// Point an attribute location at the buffer currently bound to `BufferTarget::Array`
    fn vertex_attrib_pointer(&mut self, location: u32, pointer: AttribPointer);

    // ===== TEXTURES =====

    fn gen_texture(&mut self) -> Result<TextureId>;

    fn bind_texture(&mut self, dim: TextureDim, id: TextureId);

    /// Select the texture unit subsequent `bind_texture` calls apply to
    fn active_texture(&mut self, unit: u8);

    /// Apply filter and wrap parameters to the texture bound to `dim`
    fn texture_parameters(&mut self, dim: TextureDim, params: &SamplingParams) -> Result<()>;

    /// Allocate (and optionally fill) the image of the texture bound to `dim`
    ///
    /// Fails with `Error::OutOfMemory` when the device cannot allocate it.
    fn texture_image(&mut self, dim: TextureDim, image: &TextureImage<'_>) -> Result<()>;

    /// Overwrite a region of the 2D texture currently bound
    fn texture_sub_image_2d(&mut self, region: &TextureRegion<'_>) -> Result<()>;

    fn delete_texture(&mut self, id: TextureId);

    // ===== RENDERBUFFERS =====

    fn gen_renderbuffer(&mut self) -> Result<RenderbufferId>;

    fn bind_renderbuffer(&mut self, id: RenderbufferId);

    /// Allocate storage for the bound renderbuffer
    fn renderbuffer_storage(&mut self, storage: RenderbufferStorage, width: u32, height: u32) -> Result<()>;

    fn delete_renderbuffer(&mut self, id: RenderbufferId);

    // ===== FRAMEBUFFERS =====

    fn gen_framebuffer(&mut self) -> Result<FramebufferId>;

    fn bind_framebuffer(&mut self, id: FramebufferId);

    /// Attach a 2D texture to the bound framebuffer
    fn framebuffer_texture(&mut self, attachment: FramebufferAttachment, texture: TextureId) -> Result<()>;

    /// Attach a renderbuffer to the bound framebuffer
    fn framebuffer_renderbuffer(&mut self, attachment: FramebufferAttachment, renderbuffer: RenderbufferId) -> Result<()>;

    fn framebuffer_status(&self) -> FramebufferStatus;

    fn delete_framebuffer(&mut self, id: FramebufferId);

    /// Clear the bound framebuffer
    fn clear(&mut self, color: [f32; 4], flags: ClearFlags);
}

// ============================================================================
// Shared device handle
// ============================================================================

/// Device handle shared by every resource created against the same context
pub type SharedGraphicsDevice = Arc<Mutex<dyn GraphicsDevice>>;

/// Lock a shared device, reporting a poisoned lock as a backend error
pub(crate) fn lock_device(device: &SharedGraphicsDevice) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock()
        .map_err(|_| Error::BackendError("Graphics device lock poisoned".to_string()))
}
