/// Enumerated texture, renderbuffer and framebuffer configuration
///
/// Construction of every image resource is driven by these closed enums;
/// there is no free-form parameter path.

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDim {
    D1,
    D2,
    D3,
}

impl TextureDim {
    /// Number of wrap axes (s, t, r) meaningful for this dimensionality
    pub fn axis_count(&self) -> usize {
        match self {
            TextureDim::D1 => 1,
            TextureDim::D2 => 2,
            TextureDim::D3 => 3,
        }
    }
}

/// Texel channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R,
    Rg,
    Rgb,
    Rgba,
}

impl TextureFormat {
    /// Channel layout holding `channels` components (1..=4)
    pub fn from_channel_count(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(TextureFormat::R),
            2 => Some(TextureFormat::Rg),
            3 => Some(TextureFormat::Rgb),
            4 => Some(TextureFormat::Rgba),
            _ => None,
        }
    }

    pub fn channel_count(&self) -> u8 {
        match self {
            TextureFormat::R => 1,
            TextureFormat::Rg => 2,
            TextureFormat::Rgb => 3,
            TextureFormat::Rgba => 4,
        }
    }
}

/// Scalar type of each texel channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDataType {
    UByte,
    Float,
    HalfFloat,
}

impl TextureDataType {
    /// Size of one channel in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            TextureDataType::UByte => 1,
            TextureDataType::Float => 4,
            TextureDataType::HalfFloat => 2,
        }
    }
}

/// Minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipNearest,
    NearestMipLinear,
    LinearMipNearest,
    LinearMipLinear,
}

impl TextureFilter {
    /// True for the variants that sample from a mip chain
    pub fn uses_mipmaps(&self) -> bool {
        !matches!(self, TextureFilter::Nearest | TextureFilter::Linear)
    }
}

/// Per-axis wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    Repeat,
    Clamp,
    MirrorRepeat,
    ClampToEdge,
    ClampToBorder,
    MirrorClampToEdge,
}

/// Filter and wrap parameters fixed at texture construction
///
/// Wrap modes beyond the texture's dimensionality are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplingParams {
    pub mag_filter: TextureFilter,
    pub min_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: Option<TextureWrap>,
    pub wrap_r: Option<TextureWrap>,
}

/// Full image upload for the texture bound to a dimension
#[derive(Debug, Clone, Copy)]
pub struct TextureImage<'a> {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: TextureFormat,
    pub data_type: TextureDataType,
    /// `None` allocates storage without initializing it
    pub data: Option<&'a [u8]>,
}

impl TextureImage<'_> {
    /// Byte size of a fully specified image
    pub fn byte_size(&self) -> usize {
        self.width.max(1) as usize
            * self.height.max(1) as usize
            * self.depth.max(1) as usize
            * self.format.channel_count() as usize
            * self.data_type.size_bytes()
    }
}

/// Sub-region upload into the bound 2D texture
#[derive(Debug, Clone, Copy)]
pub struct TextureRegion<'a> {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data_type: TextureDataType,
    pub data: &'a [u8],
}

/// Depth storage of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderbufferStorage {
    Depth16,
    Depth24,
}

/// Framebuffer attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FramebufferAttachment {
    Color0,
    Color1,
    Color2,
    Color3,
    Depth,
}

impl FramebufferAttachment {
    /// Colour slots in attachment order
    pub const COLOR_SLOTS: [FramebufferAttachment; 4] = [
        FramebufferAttachment::Color0,
        FramebufferAttachment::Color1,
        FramebufferAttachment::Color2,
        FramebufferAttachment::Color3,
    ];

    /// Colour slot for the `index`-th colour attachment
    pub fn color(index: usize) -> Option<Self> {
        Self::COLOR_SLOTS.get(index).copied()
    }

    pub fn is_color(&self) -> bool {
        !matches!(self, FramebufferAttachment::Depth)
    }
}
