/// Mock graphics device (no GPU required)
///
/// Keeps every native object in memory and records each call as a string
/// (`"bind_buffer(Array, 3)"`), so layout, binding and resource lifecycles can
/// be checked byte for byte in unit and integration tests. One-shot failures
/// can be injected per call name with `fail_next`, and `set_memory_limit`
/// makes oversized storage requests fail with `Error::OutOfMemory`.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::device::{
    GraphicsDevice, BufferId, TextureId, RenderbufferId, FramebufferId, ProgramId,
    BufferTarget, BufferUsage, AttribPointer, ClearFlags, FramebufferStatus,
    TextureDim, SamplingParams, TextureImage, TextureRegion,
    RenderbufferStorage, FramebufferAttachment,
};

// ============================================================================
// Mock objects
// ============================================================================

/// Buffer object storage
#[derive(Debug, Clone, Default)]
pub struct MockBufferObject {
    pub data: Vec<u8>,
    pub usage: Option<BufferUsage>,
}

/// Texture object state
#[derive(Debug, Clone, Default)]
pub struct MockTextureObject {
    pub dim: Option<TextureDim>,
    pub params: Option<SamplingParams>,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data: Vec<u8>,
}

/// Renderbuffer object state
#[derive(Debug, Clone, Default)]
pub struct MockRenderbufferObject {
    pub storage: Option<RenderbufferStorage>,
    pub width: u32,
    pub height: u32,
}

/// What a framebuffer slot points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAttachment {
    Texture(TextureId),
    Renderbuffer(RenderbufferId),
}

// ============================================================================
// Mock device
// ============================================================================

/// In-memory graphics device that records all calls
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    /// Every call in issue order
    pub calls: Vec<String>,
    next_name: u32,
    buffers: FxHashMap<BufferId, MockBufferObject>,
    bound_array: BufferId,
    bound_element_array: BufferId,
    programs: FxHashMap<ProgramId, FxHashMap<String, i32>>,
    enabled_attribs: FxHashSet<u32>,
    attrib_pointers: FxHashMap<u32, (BufferId, AttribPointer)>,
    textures: FxHashMap<TextureId, MockTextureObject>,
    bound_textures: FxHashMap<(u8, TextureDim), TextureId>,
    active_unit: u8,
    renderbuffers: FxHashMap<RenderbufferId, MockRenderbufferObject>,
    bound_renderbuffer: RenderbufferId,
    framebuffers: FxHashMap<FramebufferId, FxHashMap<FramebufferAttachment, MockAttachment>>,
    bound_framebuffer: FramebufferId,
    pending_failures: FxHashSet<String>,
    memory_limit: Option<usize>,
    forced_status: Option<FramebufferStatus>,
}

impl MockGraphicsDevice {
    /// Create an empty mock device
    pub fn new() -> Self {
        Self::default()
    }

    // ===== CONFIGURATION =====

    /// Register a linked program and its attribute locations
    pub fn define_program(&mut self, program: ProgramId, attributes: &[(&str, i32)]) {
        let table = attributes.iter()
            .map(|(name, loc)| (name.to_string(), *loc))
            .collect();
        self.programs.insert(program, table);
    }

    /// Make the next call named `call` fail (e.g. `"gen_buffer"`, `"buffer_data"`)
    pub fn fail_next(&mut self, call: &str) {
        self.pending_failures.insert(call.to_string());
    }

    /// Largest single buffer or texture allocation the device accepts
    pub fn set_memory_limit(&mut self, bytes: Option<usize>) {
        self.memory_limit = bytes;
    }

    /// Override the status reported for the bound framebuffer
    pub fn force_framebuffer_status(&mut self, status: Option<FramebufferStatus>) {
        self.forced_status = status;
    }

    // ===== INSPECTION =====

    /// Contents of a live buffer object
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(|b| b.data.as_slice())
    }

    pub fn buffer_object(&self, id: BufferId) -> Option<&MockBufferObject> {
        self.buffers.get(&id)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> BufferId {
        match target {
            BufferTarget::Array => self.bound_array,
            BufferTarget::ElementArray => self.bound_element_array,
        }
    }

    /// Enabled attribute locations, ascending
    pub fn enabled_attribs(&self) -> Vec<u32> {
        let mut locs: Vec<u32> = self.enabled_attribs.iter().copied().collect();
        locs.sort_unstable();
        locs
    }

    /// Last pointer set for a location, with the buffer that was bound at the time
    pub fn attrib_pointer(&self, location: u32) -> Option<(BufferId, AttribPointer)> {
        self.attrib_pointers.get(&location).copied()
    }

    pub fn texture_object(&self, id: TextureId) -> Option<&MockTextureObject> {
        self.textures.get(&id)
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn bound_texture(&self, unit: u8, dim: TextureDim) -> TextureId {
        self.bound_textures.get(&(unit, dim)).copied().unwrap_or_default()
    }

    pub fn renderbuffer_object(&self, id: RenderbufferId) -> Option<&MockRenderbufferObject> {
        self.renderbuffers.get(&id)
    }

    pub fn live_renderbuffer_count(&self) -> usize {
        self.renderbuffers.len()
    }

    pub fn bound_renderbuffer(&self) -> RenderbufferId {
        self.bound_renderbuffer
    }

    pub fn framebuffer_attachment(&self, fbo: FramebufferId, slot: FramebufferAttachment) -> Option<MockAttachment> {
        self.framebuffers.get(&fbo).and_then(|slots| slots.get(&slot)).copied()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn bound_framebuffer(&self) -> FramebufferId {
        self.bound_framebuffer
    }

    /// Number of recorded calls whose text starts with `prefix`
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    // ===== INTERNAL =====

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn check_failure(&mut self, call: &str) -> Result<()> {
        if self.pending_failures.remove(call) {
            return Err(Error::BackendError(format!("mock: injected failure in {}", call)));
        }
        Ok(())
    }

    fn check_allocation(&self, bytes: usize) -> Result<()> {
        match self.memory_limit {
            Some(limit) if bytes > limit => Err(Error::OutOfMemory),
            _ => Ok(()),
        }
    }

    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn bound_buffer_mut(&mut self, target: BufferTarget) -> Result<&mut MockBufferObject> {
        let id = self.bound_buffer(target);
        self.buffers.get_mut(&id)
            .ok_or_else(|| Error::BackendError(format!("mock: no buffer bound to {:?}", target)))
    }

    fn bound_texture_mut(&mut self, dim: TextureDim) -> Result<&mut MockTextureObject> {
        let id = self.bound_texture(self.active_unit, dim);
        self.textures.get_mut(&id)
            .ok_or_else(|| Error::BackendError(format!("mock: no texture bound to {:?}", dim)))
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn gen_buffer(&mut self) -> Result<BufferId> {
        self.check_failure("gen_buffer")?;
        let id = BufferId(self.next_name());
        self.buffers.insert(id, MockBufferObject::default());
        self.record(format!("gen_buffer() -> {}", id.0));
        Ok(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) -> Result<()> {
        self.check_failure("bind_buffer")?;
        self.record(format!("bind_buffer({:?}, {})", target, id.0));
        if id.is_valid() && !self.buffers.contains_key(&id) {
            return Err(Error::BackendError(format!("mock: buffer {} does not exist", id.0)));
        }
        match target {
            BufferTarget::Array => self.bound_array = id,
            BufferTarget::ElementArray => self.bound_element_array = id,
        }
        Ok(())
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) -> Result<()> {
        self.check_failure("buffer_data")?;
        self.record(format!("buffer_data({:?}, {} bytes, {:?})", target, data.len(), usage));
        self.check_allocation(data.len())?;
        let buffer = self.bound_buffer_mut(target)?;
        buffer.data = data.to_vec();
        buffer.usage = Some(usage);
        Ok(())
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) -> Result<()> {
        self.check_failure("buffer_sub_data")?;
        self.record(format!("buffer_sub_data({:?}, {}, {} bytes)", target, offset, data.len()));
        let buffer = self.bound_buffer_mut(target)?;
        let end = offset + data.len();
        if end > buffer.data.len() {
            return Err(Error::BackendError(format!(
                "mock: sub data range {}..{} exceeds buffer size {}", offset, end, buffer.data.len())));
        }
        buffer.data[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn delete_buffer(&mut self, id: BufferId) {
        self.record(format!("delete_buffer({})", id.0));
        if !id.is_valid() {
            return;
        }
        self.buffers.remove(&id);
        if self.bound_array == id {
            self.bound_array = BufferId::NONE;
        }
        if self.bound_element_array == id {
            self.bound_element_array = BufferId::NONE;
        }
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> i32 {
        self.programs.get(&program)
            .and_then(|table| table.get(name))
            .copied()
            .unwrap_or(-1)
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        self.record(format!("enable_vertex_attrib_array({})", location));
        self.enabled_attribs.insert(location);
    }

    fn disable_vertex_attrib_array(&mut self, location: u32) {
        self.record(format!("disable_vertex_attrib_array({})", location));
        self.enabled_attribs.remove(&location);
    }

    fn vertex_attrib_pointer(&mut self, location: u32, pointer: AttribPointer) {
        self.record(format!(
            "vertex_attrib_pointer({}, {}, {:?}, {}, {}, {})",
            location, pointer.component_count, pointer.native_type,
            pointer.normalized, pointer.stride, pointer.offset));
        self.attrib_pointers.insert(location, (self.bound_array, pointer));
    }

    fn gen_texture(&mut self) -> Result<TextureId> {
        self.check_failure("gen_texture")?;
        let id = TextureId(self.next_name());
        self.textures.insert(id, MockTextureObject::default());
        self.record(format!("gen_texture() -> {}", id.0));
        Ok(id)
    }

    fn bind_texture(&mut self, dim: TextureDim, id: TextureId) {
        self.record(format!("bind_texture({:?}, {})", dim, id.0));
        if let Some(texture) = self.textures.get_mut(&id) {
            texture.dim = Some(dim);
        }
        self.bound_textures.insert((self.active_unit, dim), id);
    }

    fn active_texture(&mut self, unit: u8) {
        self.record(format!("active_texture({})", unit));
        self.active_unit = unit;
    }

    fn texture_parameters(&mut self, dim: TextureDim, params: &SamplingParams) -> Result<()> {
        self.check_failure("texture_parameters")?;
        self.record(format!("texture_parameters({:?})", dim));
        self.bound_texture_mut(dim)?.params = Some(*params);
        Ok(())
    }

    fn texture_image(&mut self, dim: TextureDim, image: &TextureImage<'_>) -> Result<()> {
        self.check_failure("texture_image")?;
        self.record(format!("texture_image({:?}, {}x{}x{})", dim, image.width, image.height, image.depth));
        let size = image.byte_size();
        self.check_allocation(size)?;
        let texture = self.bound_texture_mut(dim)?;
        texture.width = image.width;
        texture.height = image.height;
        texture.depth = image.depth;
        texture.data = match image.data {
            Some(data) => data.to_vec(),
            None => vec![0; size],
        };
        Ok(())
    }

    fn texture_sub_image_2d(&mut self, region: &TextureRegion<'_>) -> Result<()> {
        self.check_failure("texture_sub_image_2d")?;
        self.record(format!(
            "texture_sub_image_2d({}, {}, {}x{})",
            region.x_offset, region.y_offset, region.width, region.height));
        let texture = self.bound_texture_mut(TextureDim::D2)?;
        if region.x_offset + region.width > texture.width || region.y_offset + region.height > texture.height {
            return Err(Error::BackendError("mock: sub image region out of bounds".to_string()));
        }
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) {
        self.record(format!("delete_texture({})", id.0));
        if id.is_valid() {
            self.textures.remove(&id);
        }
    }

    fn gen_renderbuffer(&mut self) -> Result<RenderbufferId> {
        self.check_failure("gen_renderbuffer")?;
        let id = RenderbufferId(self.next_name());
        self.renderbuffers.insert(id, MockRenderbufferObject::default());
        self.record(format!("gen_renderbuffer() -> {}", id.0));
        Ok(id)
    }

    fn bind_renderbuffer(&mut self, id: RenderbufferId) {
        self.record(format!("bind_renderbuffer({})", id.0));
        self.bound_renderbuffer = id;
    }

    fn renderbuffer_storage(&mut self, storage: RenderbufferStorage, width: u32, height: u32) -> Result<()> {
        self.check_failure("renderbuffer_storage")?;
        self.record(format!("renderbuffer_storage({:?}, {}x{})", storage, width, height));
        let id = self.bound_renderbuffer;
        let rbo = self.renderbuffers.get_mut(&id)
            .ok_or_else(|| Error::BackendError("mock: no renderbuffer bound".to_string()))?;
        rbo.storage = Some(storage);
        rbo.width = width;
        rbo.height = height;
        Ok(())
    }

    fn delete_renderbuffer(&mut self, id: RenderbufferId) {
        self.record(format!("delete_renderbuffer({})", id.0));
        if id.is_valid() {
            self.renderbuffers.remove(&id);
            if self.bound_renderbuffer == id {
                self.bound_renderbuffer = RenderbufferId::NONE;
            }
        }
    }

    fn gen_framebuffer(&mut self) -> Result<FramebufferId> {
        self.check_failure("gen_framebuffer")?;
        let id = FramebufferId(self.next_name());
        self.framebuffers.insert(id, FxHashMap::default());
        self.record(format!("gen_framebuffer() -> {}", id.0));
        Ok(id)
    }

    fn bind_framebuffer(&mut self, id: FramebufferId) {
        self.record(format!("bind_framebuffer({})", id.0));
        self.bound_framebuffer = id;
    }

    fn framebuffer_texture(&mut self, attachment: FramebufferAttachment, texture: TextureId) -> Result<()> {
        self.check_failure("framebuffer_texture")?;
        self.record(format!("framebuffer_texture({:?}, {})", attachment, texture.0));
        let fbo = self.bound_framebuffer;
        let slots = self.framebuffers.get_mut(&fbo)
            .ok_or_else(|| Error::BackendError("mock: no framebuffer bound".to_string()))?;
        slots.insert(attachment, MockAttachment::Texture(texture));
        Ok(())
    }

    fn framebuffer_renderbuffer(&mut self, attachment: FramebufferAttachment, renderbuffer: RenderbufferId) -> Result<()> {
        self.check_failure("framebuffer_renderbuffer")?;
        self.record(format!("framebuffer_renderbuffer({:?}, {})", attachment, renderbuffer.0));
        let fbo = self.bound_framebuffer;
        let slots = self.framebuffers.get_mut(&fbo)
            .ok_or_else(|| Error::BackendError("mock: no framebuffer bound".to_string()))?;
        slots.insert(attachment, MockAttachment::Renderbuffer(renderbuffer));
        Ok(())
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        if let Some(status) = self.forced_status {
            return status;
        }
        match self.framebuffers.get(&self.bound_framebuffer) {
            None => FramebufferStatus::Undefined,
            Some(slots) if slots.is_empty() => FramebufferStatus::MissingAttachment,
            Some(_) => FramebufferStatus::Complete,
        }
    }

    fn delete_framebuffer(&mut self, id: FramebufferId) {
        self.record(format!("delete_framebuffer({})", id.0));
        if id.is_valid() {
            self.framebuffers.remove(&id);
            if self.bound_framebuffer == id {
                self.bound_framebuffer = FramebufferId::NONE;
            }
        }
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) {
        self.record(format!("clear({:?}, {:?})", color, flags));
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
