/// Framebuffer object
///
/// Completeness is checked after every attachment, so a bad attachment is
/// reported by the call that made it.

use std::fmt::Write as _;

use crate::error::Result;
use crate::device::{
    SharedGraphicsDevice, FramebufferId, TextureId, RenderbufferId,
    FramebufferAttachment, FramebufferStatus, lock_device,
};
use crate::texture::{Texture, Renderbuffer};
use crate::{engine_bail, engine_trace};

/// Object attached to a framebuffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachedObject {
    Texture(TextureId),
    Renderbuffer(RenderbufferId),
}

pub struct Framebuffer {
    device: SharedGraphicsDevice,
    id: FramebufferId,
    attachments: Vec<(FramebufferAttachment, AttachedObject)>,
    hash_id: usize,
}

impl Framebuffer {
    pub fn new(device: SharedGraphicsDevice) -> Result<Self> {
        let id = lock_device(&device)?.gen_framebuffer()?;
        engine_trace!("molgfx::Framebuffer", "created framebuffer {}", id.0);
        Ok(Self {
            device,
            id,
            attachments: Vec::new(),
            hash_id: 0,
        })
    }

    // ===== ATTACHMENTS =====

    /// Attach `texture` at `slot`, replacing what was there
    pub fn attach_texture(&mut self, texture: &Texture, slot: FramebufferAttachment) -> Result<()> {
        {
            let mut device = lock_device(&self.device)?;
            device.bind_framebuffer(self.id);
            device.framebuffer_texture(slot, texture.id())?;
        }
        self.record(slot, AttachedObject::Texture(texture.id()));
        self.check_status()
    }

    /// Attach `renderbuffer` at `slot`, replacing what was there
    pub fn attach_renderbuffer(&mut self, renderbuffer: &Renderbuffer, slot: FramebufferAttachment) -> Result<()> {
        {
            let mut device = lock_device(&self.device)?;
            device.bind_framebuffer(self.id);
            device.bind_renderbuffer(renderbuffer.id());
            device.framebuffer_renderbuffer(slot, renderbuffer.id())?;
        }
        self.record(slot, AttachedObject::Renderbuffer(renderbuffer.id()));
        self.check_status()
    }

    /// Fail unless the framebuffer is complete
    pub fn check_status(&self) -> Result<()> {
        let status = {
            let mut device = lock_device(&self.device)?;
            device.bind_framebuffer(self.id);
            device.framebuffer_status()
        };
        if status != FramebufferStatus::Complete {
            engine_bail!("molgfx::Framebuffer",
                "framebuffer {} is incomplete: {:?}\n{}", self.id.0, status, self.describe());
        }
        Ok(())
    }

    /// One line per attachment, for debugging
    pub fn describe(&self) -> String {
        let mut out = format!("framebuffer {}:", self.id.0);
        if self.attachments.is_empty() {
            out.push_str(" no attachments");
        }
        for (slot, object) in &self.attachments {
            match object {
                AttachedObject::Texture(id) => { let _ = write!(out, "\n  {:?}: texture {}", slot, id.0); }
                AttachedObject::Renderbuffer(id) => { let _ = write!(out, "\n  {:?}: renderbuffer {}", slot, id.0); }
            }
        }
        out
    }

    pub fn attachments(&self) -> &[(FramebufferAttachment, AttachedObject)] {
        &self.attachments
    }

    pub fn attachment(&self, slot: FramebufferAttachment) -> Option<AttachedObject> {
        self.attachments.iter().find(|(s, _)| *s == slot).map(|(_, object)| *object)
    }

    fn record(&mut self, slot: FramebufferAttachment, object: AttachedObject) {
        match self.attachments.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => entry.1 = object,
            None => self.attachments.push((slot, object)),
        }
    }

    // ===== BINDING =====

    pub fn bind(&self) -> Result<()> {
        lock_device(&self.device)?.bind_framebuffer(self.id);
        Ok(())
    }

    pub fn unbind(&self) -> Result<()> {
        Self::unbind_current(&self.device)
    }

    /// Return rendering to the default framebuffer
    pub fn unbind_current(device: &SharedGraphicsDevice) -> Result<()> {
        lock_device(device)?.bind_framebuffer(FramebufferId::NONE);
        Ok(())
    }

    pub fn id(&self) -> FramebufferId { self.id }
    pub fn hash_id(&self) -> usize { self.hash_id }
    pub fn set_hash_id(&mut self, id: usize) { self.hash_id = id; }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if let Ok(mut device) = self.device.lock() {
            device.delete_framebuffer(self.id);
        }
        engine_trace!("molgfx::Framebuffer", "released framebuffer {}", self.id.0);
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
