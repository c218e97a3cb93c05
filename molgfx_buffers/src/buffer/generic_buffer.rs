/// Generic buffer object shared by vertex and index buffers
///
/// Owns the native buffer names created for one `buffer_data` call and the
/// data-free regions describing where each descriptor landed.
///
/// Rules:
/// - Sub-data updates assume the layout has not changed since `buffer_data`.
/// - Binding must follow the same descriptor order as the upload.

use crate::error::{Error, Result};
use crate::device::{
    SharedGraphicsDevice, BufferId, BufferTarget, BufferUsage, lock_device,
};
use crate::buffer::{BufferDesc, BufferRegion, BufferLayout, pack_sequential, pack_interleaved};
use crate::{engine_bail, engine_debug, engine_error, engine_trace};

/// Buffer object with a fixed target, layout and usage hint
pub struct GenericBuffer {
    device: SharedGraphicsDevice,
    target: BufferTarget,
    layout: BufferLayout,
    usage: BufferUsage,
    hash_id: usize,
    interleaved: bool,
    interleaved_id: BufferId,
    stride: usize,
    regions: Vec<BufferRegion>,
    desc_ids: Vec<BufferId>,
}

impl GenericBuffer {
    /// Create an empty buffer object (no native allocation yet)
    pub fn new(device: SharedGraphicsDevice, target: BufferTarget, layout: BufferLayout, usage: BufferUsage) -> Self {
        Self {
            device,
            target,
            layout,
            usage,
            hash_id: 0,
            interleaved: false,
            interleaved_id: BufferId::NONE,
            stride: 0,
            regions: Vec::new(),
            desc_ids: Vec::new(),
        }
    }

    // ===== UPLOAD =====

    /// Lay out and upload a list of descriptors
    ///
    /// Element-array buffers are always packed sequentially, whatever layout
    /// was requested. The first native failure aborts the call; names created
    /// before it stay owned by this buffer and are released on drop.
    pub fn buffer_data(&mut self, mut descs: Vec<BufferDesc<'_>>) -> Result<()> {
        self.release();
        self.desc_ids = vec![BufferId::NONE; descs.len()];

        let layout = self.effective_layout();
        engine_debug!("molgfx::GenericBuffer",
            "{:?} layout of {} descriptor(s) into {:?} buffer", layout, descs.len(), self.target);

        let result = match layout {
            BufferLayout::Separate => self.separate_buffer_data(&descs),
            BufferLayout::Sequential => self.sequential_buffer_data(&mut descs),
            BufferLayout::Interleaved => self.interleaved_buffer_data(&mut descs),
        };

        self.regions = descs.iter().map(|d| d.region()).collect();
        result
    }

    /// Upload data that the caller already interleaved with its own stride
    ///
    /// The descriptors only provide names, formats and offsets for binding.
    pub fn buffer_data_interleaved(&mut self, descs: Vec<BufferDesc<'_>>, data: &[u8], stride: usize) -> Result<()> {
        self.release();
        self.desc_ids = vec![BufferId::NONE; descs.len()];
        self.regions = descs.iter().map(|d| d.region()).collect();
        self.interleaved = true;
        self.stride = stride;

        engine_debug!("molgfx::GenericBuffer",
            "pre-interleaved upload: {} bytes, stride {}", data.len(), stride);
        self.interleaved_id = self.gen_buffer(data)?;
        Ok(())
    }

    /// Rewrite a byte range of the buffer holding descriptor `index`
    ///
    /// Targets the single interleaved/sequential buffer when there is one.
    pub fn buffer_sub_data(&self, offset: usize, data: &[u8], index: usize) -> Result<()> {
        if index >= self.regions.len() || index >= self.desc_ids.len() {
            return Err(Error::InvalidResource(format!(
                "descriptor index {} out of range ({} descriptors)", index, self.regions.len())));
        }
        let id = if self.interleaved { self.interleaved_id } else { self.desc_ids[index] };
        let mut device = lock_device(&self.device)?;
        device.bind_buffer(self.target, id)?;
        device.buffer_sub_data(self.target, offset, data)
    }

    /// Rewrite a byte range of the interleaved buffer
    pub fn buffer_replace_data(&self, offset: usize, data: &[u8]) -> Result<()> {
        if !self.interleaved_id.is_valid() {
            engine_bail!("molgfx::GenericBuffer", "buffer_replace_data on a buffer with no interleaved storage");
        }
        let mut device = lock_device(&self.device)?;
        device.bind_buffer(self.target, self.interleaved_id)?;
        device.buffer_sub_data(self.target, offset, data)
    }

    // ===== ACCESSORS =====

    pub fn target(&self) -> BufferTarget { self.target }

    /// Layout requested at construction
    pub fn layout(&self) -> BufferLayout { self.layout }

    /// Layout actually used by `buffer_data`
    pub fn effective_layout(&self) -> BufferLayout {
        match self.target {
            BufferTarget::ElementArray => BufferLayout::Sequential,
            BufferTarget::Array => self.layout,
        }
    }

    pub fn usage(&self) -> BufferUsage { self.usage }

    /// True when all descriptors live in one native buffer
    pub fn is_interleaved(&self) -> bool { self.interleaved }

    /// Native name of the single interleaved/sequential buffer
    pub fn interleaved_id(&self) -> BufferId { self.interleaved_id }

    /// Native name of descriptor `index`'s own buffer (separate layout)
    pub fn buffer_id(&self, index: usize) -> Option<BufferId> {
        self.desc_ids.get(index).copied()
    }

    /// Vertex stride (0 unless interleaved)
    pub fn stride(&self) -> usize { self.stride }

    /// Where each descriptor was placed, in declaration order
    pub fn regions(&self) -> &[BufferRegion] { &self.regions }

    pub fn hash_id(&self) -> usize { self.hash_id }

    pub fn set_hash_id(&mut self, id: usize) { self.hash_id = id; }

    pub(crate) fn device(&self) -> &SharedGraphicsDevice { &self.device }

    // ===== STRATEGIES =====

    fn separate_buffer_data(&mut self, descs: &[BufferDesc<'_>]) -> Result<()> {
        for (index, desc) in descs.iter().enumerate() {
            let Some(data) = desc.data else { continue };
            if desc.data_size == 0 {
                continue;
            }
            let bytes = data.get(..desc.data_size).ok_or_else(|| Error::InvalidResource(format!(
                "descriptor '{}' declares {} bytes but only {} are provided",
                desc.attr_name, desc.data_size, data.len())))?;
            self.desc_ids[index] = self.gen_buffer(bytes)?;
        }
        Ok(())
    }

    fn sequential_buffer_data(&mut self, descs: &mut [BufferDesc<'_>]) -> Result<()> {
        self.interleaved = true;
        let pack = pack_sequential(descs)?;
        engine_debug!("molgfx::GenericBuffer", "sequential buffer: {} bytes", pack.data.len());
        self.interleaved_id = self.gen_buffer(&pack.data)?;
        Ok(())
    }

    fn interleaved_buffer_data(&mut self, descs: &mut [BufferDesc<'_>]) -> Result<()> {
        let pack = pack_interleaved(descs)?;
        self.stride = pack.stride;
        engine_debug!("molgfx::GenericBuffer",
            "interleaved buffer: {} vertices, stride {}, {} bytes",
            pack.vertex_count, pack.stride, pack.data.len());
        self.interleaved = true;
        self.interleaved_id = self.gen_buffer(&pack.data)?;
        Ok(())
    }

    /// Generate, bind and fill one native buffer
    ///
    /// The name is kept in `self` by the caller only on success; a name
    /// generated before a failed bind/upload is released right away.
    fn gen_buffer(&self, data: &[u8]) -> Result<BufferId> {
        let mut device = lock_device(&self.device)?;
        let id = device.gen_buffer()?;
        let upload = device.bind_buffer(self.target, id)
            .and_then(|_| device.buffer_data(self.target, data, self.usage));
        if let Err(err) = upload {
            device.delete_buffer(id);
            if matches!(err, Error::OutOfMemory) {
                engine_error!("molgfx::GenericBuffer", "out of memory uploading {} bytes", data.len());
                return Err(err);
            }
            engine_bail!("molgfx::GenericBuffer", "upload of {} bytes failed: {}", data.len(), err);
        }
        engine_trace!("molgfx::GenericBuffer", "created buffer {} ({} bytes)", id.0, data.len());
        Ok(id)
    }

    /// Release every native name owned by this buffer
    fn release(&mut self) {
        let ids: Vec<BufferId> = self.desc_ids.drain(..)
            .chain(std::iter::once(self.interleaved_id))
            .filter(|id| id.is_valid())
            .collect();
        self.interleaved_id = BufferId::NONE;
        self.interleaved = false;
        self.stride = 0;
        self.regions.clear();
        if ids.is_empty() {
            return;
        }
        if let Ok(mut device) = self.device.lock() {
            for id in ids {
                device.delete_buffer(id);
            }
        }
    }
}

impl Drop for GenericBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "generic_buffer_tests.rs"]
mod tests;
