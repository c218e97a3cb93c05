/// Texture object (1D, 2D or 3D)
///
/// The native texture is created, bound and given its sampling parameters on
/// construction. Storage is allocated by the `texture_data_*` calls, which
/// must match the texture's dimensionality.

use glam::UVec3;

use crate::error::{Error, Result};
use crate::device::{
    SharedGraphicsDevice, TextureId, TextureDim, TextureFormat, TextureDataType,
    TextureFilter, TextureWrap, SamplingParams, TextureImage, TextureRegion, lock_device,
};
use crate::{engine_error, engine_trace};

pub struct Texture {
    device: SharedGraphicsDevice,
    id: TextureId,
    dim: TextureDim,
    format: TextureFormat,
    data_type: TextureDataType,
    sampling: SamplingParams,
    size: UVec3,
    hash_id: usize,
}

impl Texture {
    /// Create a 1D texture
    pub fn new_1d(
        device: SharedGraphicsDevice,
        format: TextureFormat,
        data_type: TextureDataType,
        mag_filter: TextureFilter,
        min_filter: TextureFilter,
        wrap_s: TextureWrap,
    ) -> Result<Self> {
        let sampling = SamplingParams { mag_filter, min_filter, wrap_s, wrap_t: None, wrap_r: None };
        Self::create(device, TextureDim::D1, format, data_type, sampling)
    }

    /// Create a 2D texture
    pub fn new_2d(
        device: SharedGraphicsDevice,
        format: TextureFormat,
        data_type: TextureDataType,
        mag_filter: TextureFilter,
        min_filter: TextureFilter,
        wrap_s: TextureWrap,
        wrap_t: TextureWrap,
    ) -> Result<Self> {
        let sampling = SamplingParams { mag_filter, min_filter, wrap_s, wrap_t: Some(wrap_t), wrap_r: None };
        Self::create(device, TextureDim::D2, format, data_type, sampling)
    }

    /// Create a 3D texture
    #[allow(clippy::too_many_arguments)]
    pub fn new_3d(
        device: SharedGraphicsDevice,
        format: TextureFormat,
        data_type: TextureDataType,
        mag_filter: TextureFilter,
        min_filter: TextureFilter,
        wrap_s: TextureWrap,
        wrap_t: TextureWrap,
        wrap_r: TextureWrap,
    ) -> Result<Self> {
        let sampling = SamplingParams {
            mag_filter, min_filter, wrap_s, wrap_t: Some(wrap_t), wrap_r: Some(wrap_r),
        };
        Self::create(device, TextureDim::D3, format, data_type, sampling)
    }

    fn create(
        device: SharedGraphicsDevice,
        dim: TextureDim,
        format: TextureFormat,
        data_type: TextureDataType,
        sampling: SamplingParams,
    ) -> Result<Self> {
        let id = {
            let mut native = lock_device(&device)?;
            let id = native.gen_texture()?;
            native.bind_texture(dim, id);
            if let Err(err) = native.texture_parameters(dim, &sampling) {
                native.delete_texture(id);
                engine_error!("molgfx::Texture", "failed to set sampling parameters: {}", err);
                return Err(err);
            }
            id
        };
        engine_trace!("molgfx::Texture", "created {:?} texture {}", dim, id.0);

        Ok(Self {
            device,
            id,
            dim,
            format,
            data_type,
            sampling,
            size: UVec3::ZERO,
            hash_id: 0,
        })
    }

    // ===== BINDING =====

    pub fn bind(&self) -> Result<()> {
        let mut device = lock_device(&self.device)?;
        device.bind_texture(self.dim, self.id);
        Ok(())
    }

    /// Bind to texture unit `unit` (0, 1, 2, ...)
    pub fn bind_to_texture_unit(&self, unit: u8) -> Result<()> {
        let mut device = lock_device(&self.device)?;
        device.active_texture(unit);
        device.bind_texture(self.dim, self.id);
        Ok(())
    }

    pub fn unbind(&self) -> Result<()> {
        let mut device = lock_device(&self.device)?;
        device.bind_texture(self.dim, TextureId::NONE);
        Ok(())
    }

    // ===== STORAGE =====

    /// Allocate (and optionally fill) a 1D image
    pub fn texture_data_1d(&mut self, width: u32, data: Option<&[u8]>) -> Result<()> {
        self.texture_data(TextureDim::D1, UVec3::new(width, 0, 0), data)
    }

    pub fn texture_data_2d(&mut self, width: u32, height: u32, data: Option<&[u8]>) -> Result<()> {
        self.texture_data(TextureDim::D2, UVec3::new(width, height, 0), data)
    }

    pub fn texture_data_3d(&mut self, width: u32, height: u32, depth: u32, data: Option<&[u8]>) -> Result<()> {
        self.texture_data(TextureDim::D3, UVec3::new(width, height, depth), data)
    }

    /// Replace a rectangle of a 2D image
    pub fn texture_subdata_2d(&self, x_offset: u32, y_offset: u32, width: u32, height: u32, data: &[u8]) -> Result<()> {
        self.expect_dim(TextureDim::D2)?;
        let region = TextureRegion {
            x_offset,
            y_offset,
            width,
            height,
            format: self.format,
            data_type: self.data_type,
            data,
        };
        let needed = width as usize * height as usize * self.texel_size();
        if data.len() < needed {
            return Err(Error::InvalidResource(format!(
                "sub image {}x{} needs {} bytes, got {}", width, height, needed, data.len())));
        }
        let mut device = lock_device(&self.device)?;
        device.bind_texture(self.dim, self.id);
        device.texture_sub_image_2d(&region)
    }

    fn texture_data(&mut self, dim: TextureDim, size: UVec3, data: Option<&[u8]>) -> Result<()> {
        self.expect_dim(dim)?;
        let image = TextureImage {
            width: size.x,
            height: size.y,
            depth: size.z,
            format: self.format,
            data_type: self.data_type,
            data,
        };
        if let Some(bytes) = data {
            if bytes.len() < image.byte_size() {
                return Err(Error::InvalidResource(format!(
                    "{:?} image {}x{}x{} needs {} bytes, got {}",
                    dim, size.x, size.y, size.z, image.byte_size(), bytes.len())));
            }
        }
        {
            let mut device = lock_device(&self.device)?;
            device.bind_texture(self.dim, self.id);
            device.texture_image(self.dim, &image)?;
        }
        self.size = size;
        Ok(())
    }

    fn expect_dim(&self, dim: TextureDim) -> Result<()> {
        if self.dim != dim {
            return Err(Error::InvalidResource(format!(
                "{:?} operation on a {:?} texture", dim, self.dim)));
        }
        Ok(())
    }

    fn texel_size(&self) -> usize {
        self.format.channel_count() as usize * self.data_type.size_bytes()
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> TextureId { self.id }
    pub fn dim(&self) -> TextureDim { self.dim }
    pub fn format(&self) -> TextureFormat { self.format }
    pub fn data_type(&self) -> TextureDataType { self.data_type }
    pub fn sampling(&self) -> &SamplingParams { &self.sampling }
    pub fn width(&self) -> u32 { self.size.x }
    pub fn height(&self) -> u32 { self.size.y }
    pub fn depth(&self) -> u32 { self.size.z }

    /// Width, height, depth of the last allocated image (unused axes are 0)
    pub fn size(&self) -> UVec3 { self.size }

    pub fn hash_id(&self) -> usize { self.hash_id }
    pub fn set_hash_id(&mut self, id: usize) { self.hash_id = id; }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Ok(mut device) = self.device.lock() {
            device.delete_texture(self.id);
        }
        engine_trace!("molgfx::Texture", "released texture {}", self.id.0);
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
