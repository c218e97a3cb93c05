/// Off-screen render target
///
/// Bundles one framebuffer, one depth renderbuffer and up to four colour
/// textures. `layout` (re)creates the whole attachment set; `resize` rebuilds
/// it at the new size from the last layout.
///
/// The renderbuffer is either created here (owned) or passed in by the
/// caller to share depth with another target. A shared renderbuffer is never
/// resized or recreated by this target.

use std::sync::Arc;
use glam::UVec2;

use crate::error::{Error, Result};
use crate::device::{
    SharedGraphicsDevice, ClearFlags, FramebufferAttachment, RenderbufferStorage,
    TextureFormat, TextureDataType, TextureFilter, TextureWrap, lock_device,
};
use crate::texture::{Texture, Renderbuffer, Framebuffer};
use crate::engine_debug;

/// Scalar type of a render target channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtDataType {
    UByte,
    Float,
}

impl RtDataType {
    pub fn texture_data_type(&self) -> TextureDataType {
        match self {
            RtDataType::UByte => TextureDataType::UByte,
            RtDataType::Float => TextureDataType::Float,
        }
    }
}

/// One colour attachment: channel count, scalar type, optional explicit size
///
/// A zero width/height means "use the render target's size".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetLayout {
    pub channels: u8,
    pub data_type: RtDataType,
    pub width: u32,
    pub height: u32,
}

impl RenderTargetLayout {
    pub fn new(channels: u8, data_type: RtDataType) -> Self {
        Self { channels, data_type, width: 0, height: 0 }
    }

    pub fn with_size(channels: u8, data_type: RtDataType, width: u32, height: u32) -> Self {
        Self { channels, data_type, width, height }
    }
}

pub struct RenderTarget {
    device: SharedGraphicsDevice,
    size: UVec2,
    fbo: Option<Framebuffer>,
    rbo: Option<Arc<Renderbuffer>>,
    shared_rbo: bool,
    desc: Vec<RenderTargetLayout>,
    textures: Vec<Texture>,
    hash_id: usize,
}

impl RenderTarget {
    /// Create an empty target; nothing is allocated until `layout`
    pub fn new(device: SharedGraphicsDevice, size: UVec2) -> Self {
        Self {
            device,
            size,
            fbo: None,
            rbo: None,
            shared_rbo: false,
            desc: Vec::new(),
            textures: Vec::new(),
            hash_id: 0,
        }
    }

    // ===== LAYOUT =====

    /// Rebuild the attachment set for `desc`
    ///
    /// Colour attachment `i` goes to slot `COLOR<i>`, the renderbuffer to
    /// `DEPTH`. Pass `shared_rbo` to reuse another target's depth buffer.
    pub fn layout(&mut self, desc: Vec<RenderTargetLayout>, shared_rbo: Option<Arc<Renderbuffer>>) -> Result<()> {
        if desc.len() > FramebufferAttachment::COLOR_SLOTS.len() {
            return Err(Error::InvalidConfiguration(format!(
                "render target supports {} colour attachments, {} requested",
                FramebufferAttachment::COLOR_SLOTS.len(), desc.len())));
        }
        let formats = desc.iter()
            .map(|layout| TextureFormat::from_channel_count(layout.channels).ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "render target channel count must be 1..=4, got {}", layout.channels))
            }))
            .collect::<Result<Vec<_>>>()?;

        self.teardown();

        let mut fbo = Framebuffer::new(self.device.clone())?;
        let mut textures = Vec::with_capacity(desc.len());
        for (index, (layout, format)) in desc.iter().zip(formats).enumerate() {
            let mut texture = Texture::new_2d(
                self.device.clone(),
                format,
                layout.data_type.texture_data_type(),
                TextureFilter::Linear,
                TextureFilter::Linear,
                TextureWrap::ClampToEdge,
                TextureWrap::ClampToEdge,
            )?;
            let width = if layout.width > 0 { layout.width } else { self.size.x };
            let height = if layout.height > 0 { layout.height } else { self.size.y };
            texture.texture_data_2d(width, height, None)?;
            if let Some(slot) = FramebufferAttachment::color(index) {
                fbo.attach_texture(&texture, slot)?;
            }
            textures.push(texture);
        }

        let (rbo, shared) = match shared_rbo {
            Some(rbo) => (rbo, true),
            None => (Arc::new(Renderbuffer::new(
                self.device.clone(), self.size.x, self.size.y, RenderbufferStorage::Depth24)?), false),
        };
        fbo.attach_renderbuffer(&rbo, FramebufferAttachment::Depth)?;

        engine_debug!("molgfx::RenderTarget",
            "layout {}x{}: {} colour attachment(s), {} renderbuffer",
            self.size.x, self.size.y, textures.len(), if shared { "shared" } else { "owned" });

        self.fbo = Some(fbo);
        self.rbo = Some(rbo);
        self.shared_rbo = shared;
        self.textures = textures;
        self.desc = desc;
        Ok(())
    }

    /// Recreate every attachment at `size`
    pub fn resize(&mut self, size: UVec2) -> Result<()> {
        self.size = size;
        if self.fbo.is_none() {
            return Ok(());
        }
        let desc = self.desc.clone();
        let shared = if self.shared_rbo { self.rbo.clone() } else { None };
        self.layout(desc, shared)
    }

    fn teardown(&mut self) {
        // Framebuffer first so nothing is attached when textures go
        self.fbo = None;
        self.textures.clear();
        self.rbo = None;
        self.shared_rbo = false;
    }

    // ===== BINDING =====

    /// Bind the framebuffer, optionally clearing colour to opaque black and depth
    pub fn bind(&self, clear: bool) -> Result<()> {
        self.framebuffer()?.bind()?;
        if clear {
            lock_device(&self.device)?.clear([0.0, 0.0, 0.0, 1.0], ClearFlags::COLOR | ClearFlags::DEPTH);
        }
        Ok(())
    }

    pub fn bind_fbo_rbo(&self) -> Result<()> {
        self.framebuffer()?.bind()?;
        match &self.rbo {
            Some(rbo) => rbo.bind(),
            None => Ok(()),
        }
    }

    pub fn unbind(&self) -> Result<()> {
        Framebuffer::unbind_current(&self.device)
    }

    fn framebuffer(&self) -> Result<&Framebuffer> {
        self.fbo.as_ref().ok_or_else(|| Error::InvalidResource(
            "render target has no layout".to_string()))
    }

    // ===== ACCESSORS =====

    pub fn size(&self) -> UVec2 { self.size }
    pub fn fbo(&self) -> Option<&Framebuffer> { self.fbo.as_ref() }
    pub fn rbo(&self) -> Option<&Arc<Renderbuffer>> { self.rbo.as_ref() }
    pub fn textures(&self) -> &[Texture] { &self.textures }
    pub fn layout_desc(&self) -> &[RenderTargetLayout] { &self.desc }

    /// False when the renderbuffer was shared in by the caller
    pub fn owns_renderbuffer(&self) -> bool {
        self.rbo.is_some() && !self.shared_rbo
    }

    pub fn hash_id(&self) -> usize { self.hash_id }
    pub fn set_hash_id(&mut self, id: usize) { self.hash_id = id; }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
