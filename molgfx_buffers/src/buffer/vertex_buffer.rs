/// Vertex buffer with attribute binding and masking
///
/// Wraps a `GenericBuffer` on the array target and activates its layout
/// against a program's attribute locations. Locations that the program does
/// not expose (negative location) are skipped without error.
///
/// Masked locations are still tracked, so `unbind` disables them too, but
/// they are not re-enabled and get no new pointer. The mask is consumed by
/// the next full (unindexed) bind.

use crate::error::Result;
use crate::device::{
    SharedGraphicsDevice, BufferId, BufferTarget, BufferUsage, ProgramId,
    AttribPointer, GraphicsDevice, lock_device,
};
use crate::buffer::{BufferDesc, BufferLayout, BufferRegion, GenericBuffer};
use crate::engine_trace;

pub struct VertexBuffer {
    buffer: GenericBuffer,
    /// Locations touched by binds since the last unbind
    locations: Vec<u32>,
    /// Locations whose enable call is suppressed
    mask: Vec<i32>,
}

impl VertexBuffer {
    pub fn new(device: SharedGraphicsDevice, layout: BufferLayout, usage: BufferUsage) -> Self {
        Self {
            buffer: GenericBuffer::new(device, BufferTarget::Array, layout, usage),
            locations: Vec::new(),
            mask: Vec::new(),
        }
    }

    // ===== UPLOAD =====

    /// See [`GenericBuffer::buffer_data`]
    pub fn buffer_data(&mut self, descs: Vec<BufferDesc<'_>>) -> Result<()> {
        self.buffer.buffer_data(descs)
    }

    /// See [`GenericBuffer::buffer_data_interleaved`]
    pub fn buffer_data_interleaved(&mut self, descs: Vec<BufferDesc<'_>>, data: &[u8], stride: usize) -> Result<()> {
        self.buffer.buffer_data_interleaved(descs, data, stride)
    }

    pub fn buffer_sub_data(&self, offset: usize, data: &[u8], index: usize) -> Result<()> {
        self.buffer.buffer_sub_data(offset, data, index)
    }

    pub fn buffer_replace_data(&self, offset: usize, data: &[u8]) -> Result<()> {
        self.buffer.buffer_replace_data(offset, data)
    }

    // ===== BINDING =====

    /// Bind the interleaved/sequential buffer without touching attributes
    ///
    /// Separate buffers have no single name to bind, so this does nothing.
    pub fn bind(&self) -> Result<()> {
        if !self.buffer.is_interleaved() {
            return Ok(());
        }
        let mut device = lock_device(self.buffer.device())?;
        device.bind_buffer(BufferTarget::Array, self.buffer.interleaved_id())
    }

    /// Activate the layout against `program`
    ///
    /// With `index == None` every descriptor is bound and the mask is cleared.
    /// With `Some(i)` only descriptor `i` is (re)bound.
    pub fn bind_program(&mut self, program: ProgramId, index: Option<usize>) -> Result<()> {
        let shared = self.buffer.device().clone();
        let mut device = lock_device(&shared)?;

        match index {
            Some(index) => {
                if self.buffer.is_interleaved() {
                    device.bind_buffer(BufferTarget::Array, self.buffer.interleaved_id())?;
                }
                self.bind_attrib(&mut *device, program, index)?;
            }
            None => {
                if self.buffer.is_interleaved() && self.buffer.interleaved_id().is_valid() {
                    device.bind_buffer(BufferTarget::Array, self.buffer.interleaved_id())?;
                }
                for index in 0..self.buffer.regions().len() {
                    self.bind_attrib(&mut *device, program, index)?;
                }
                self.mask.clear();
            }
        }
        Ok(())
    }

    /// Disable every tracked location and release the array binding
    pub fn unbind(&mut self) -> Result<()> {
        let mut device = lock_device(self.buffer.device())?;
        for location in self.locations.drain(..) {
            device.disable_vertex_attrib_array(location);
        }
        device.bind_buffer(BufferTarget::Array, BufferId::NONE)
    }

    /// Replace the mask with `locations`
    pub fn mask_attributes(&mut self, locations: &[i32]) {
        self.mask = locations.to_vec();
    }

    /// Add one location to the mask
    pub fn mask_attribute(&mut self, location: i32) {
        self.mask.push(location);
    }

    pub fn masked_locations(&self) -> &[i32] {
        &self.mask
    }

    /// Locations bound since the last `unbind`, masked ones included
    pub fn tracked_locations(&self) -> &[u32] {
        &self.locations
    }

    // ===== ACCESSORS =====

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

    pub fn regions(&self) -> &[BufferRegion] {
        self.buffer.regions()
    }

    // ===== INTERNAL =====

    fn bind_attrib(&mut self, device: &mut dyn GraphicsDevice, program: ProgramId, index: usize) -> Result<()> {
        let Some(region) = self.buffer.regions().get(index) else {
            return Ok(());
        };
        let location = device.attrib_location(program, &region.attr_name);
        if location < 0 {
            engine_trace!("molgfx::VertexBuffer",
                "attribute '{}' not used by program {}", region.attr_name, program.0);
            return Ok(());
        }
        let masked = self.mask.contains(&location);
        let location = location as u32;
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
        if masked {
            return Ok(());
        }

        if !self.buffer.is_interleaved() {
            let id = self.buffer.buffer_id(index).unwrap_or_default();
            if !id.is_valid() {
                // Not backed by a buffer: left to a draw-time constant
                return Ok(());
            }
            device.bind_buffer(BufferTarget::Array, id)?;
        }

        device.enable_vertex_attrib_array(location);
        device.vertex_attrib_pointer(location, AttribPointer {
            component_count: region.format.component_count(),
            native_type: region.format.native_type(),
            normalized: region.format.is_normalized(),
            stride: self.buffer.stride(),
            offset: region.offset,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
