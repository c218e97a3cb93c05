/// Renderbuffer object (depth storage for framebuffers)

use glam::UVec2;

use crate::error::Result;
use crate::device::{SharedGraphicsDevice, RenderbufferId, RenderbufferStorage, lock_device};
use crate::{engine_error, engine_trace};

pub struct Renderbuffer {
    device: SharedGraphicsDevice,
    id: RenderbufferId,
    size: UVec2,
    storage: RenderbufferStorage,
    hash_id: usize,
}

impl Renderbuffer {
    /// Create a renderbuffer and allocate its storage
    pub fn new(device: SharedGraphicsDevice, width: u32, height: u32, storage: RenderbufferStorage) -> Result<Self> {
        let id = {
            let mut native = lock_device(&device)?;
            let id = native.gen_renderbuffer()?;
            native.bind_renderbuffer(id);
            if let Err(err) = native.renderbuffer_storage(storage, width, height) {
                native.delete_renderbuffer(id);
                engine_error!("molgfx::Renderbuffer",
                    "failed to allocate {:?} storage {}x{}: {}", storage, width, height, err);
                return Err(err);
            }
            id
        };
        engine_trace!("molgfx::Renderbuffer", "created renderbuffer {} ({}x{})", id.0, width, height);

        Ok(Self {
            device,
            id,
            size: UVec2::new(width, height),
            storage,
            hash_id: 0,
        })
    }

    pub fn bind(&self) -> Result<()> {
        lock_device(&self.device)?.bind_renderbuffer(self.id);
        Ok(())
    }

    pub fn unbind(&self) -> Result<()> {
        Self::unbind_current(&self.device)
    }

    /// Release whatever renderbuffer is bound on `device`
    pub fn unbind_current(device: &SharedGraphicsDevice) -> Result<()> {
        lock_device(device)?.bind_renderbuffer(RenderbufferId::NONE);
        Ok(())
    }

    pub fn id(&self) -> RenderbufferId { self.id }
    pub fn size(&self) -> UVec2 { self.size }
    pub fn width(&self) -> u32 { self.size.x }
    pub fn height(&self) -> u32 { self.size.y }
    pub fn storage(&self) -> RenderbufferStorage { self.storage }
    pub fn hash_id(&self) -> usize { self.hash_id }
    pub fn set_hash_id(&mut self, id: usize) { self.hash_id = id; }
}

impl Drop for Renderbuffer {
    fn drop(&mut self) {
        if let Ok(mut device) = self.device.lock() {
            device.delete_renderbuffer(self.id);
        }
        engine_trace!("molgfx::Renderbuffer", "released renderbuffer {}", self.id.0);
    }
}

#[cfg(test)]
#[path = "renderbuffer_tests.rs"]
mod tests;
