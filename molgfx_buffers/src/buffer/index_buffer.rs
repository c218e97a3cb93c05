/// Index buffer: a single contiguous element array
///
/// Whatever layout is requested, uploads are packed sequentially.

use crate::error::Result;
use crate::device::{SharedGraphicsDevice, BufferId, BufferTarget, BufferUsage, lock_device};
use crate::buffer::{BufferDesc, BufferLayout, GenericBuffer};

pub struct IndexBuffer {
    buffer: GenericBuffer,
}

impl IndexBuffer {
    pub fn new(device: SharedGraphicsDevice, usage: BufferUsage) -> Self {
        Self {
            buffer: GenericBuffer::new(device, BufferTarget::ElementArray, BufferLayout::Sequential, usage),
        }
    }

    /// Create with a requested layout; it is still packed sequentially
    pub fn with_layout(device: SharedGraphicsDevice, layout: BufferLayout, usage: BufferUsage) -> Self {
        Self {
            buffer: GenericBuffer::new(device, BufferTarget::ElementArray, layout, usage),
        }
    }

    pub fn buffer_data(&mut self, descs: Vec<BufferDesc<'_>>) -> Result<()> {
        self.buffer.buffer_data(descs)
    }

    pub fn buffer_sub_data(&self, offset: usize, data: &[u8], index: usize) -> Result<()> {
        self.buffer.buffer_sub_data(offset, data, index)
    }

    pub fn bind(&self) -> Result<()> {
        let mut device = lock_device(self.buffer.device())?;
        device.bind_buffer(BufferTarget::ElementArray, self.buffer.interleaved_id())
    }

    pub fn unbind(&self) -> Result<()> {
        let mut device = lock_device(self.buffer.device())?;
        device.bind_buffer(BufferTarget::ElementArray, BufferId::NONE)
    }

    pub fn buffer(&self) -> &GenericBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut GenericBuffer {
        &mut self.buffer
    }

    pub fn hash_id(&self) -> usize {
        self.buffer.hash_id()
    }

    pub fn set_hash_id(&mut self, id: usize) {
        self.buffer.set_hash_id(id);
    }
}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
