/// Buffer descriptors
///
/// A `BufferDesc` names one source array destined for a buffer. The data is
/// borrowed, so it only has to outlive the layout call; what a buffer keeps
/// afterwards is the data-free `BufferRegion`.

use crate::buffer::VertexFormat;

/// One named source array destined for a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc<'a> {
    /// Shader attribute name this array feeds
    pub attr_name: String,
    /// Element format
    pub format: VertexFormat,
    /// Byte length of the region
    pub data_size: usize,
    /// Source bytes; `None` reserves space to be uploaded later
    pub data: Option<&'a [u8]>,
    /// Byte offset assigned by the layout engine
    pub offset: usize,
}

impl<'a> BufferDesc<'a> {
    /// Descriptor with explicit size and optional data
    pub fn new(attr_name: &str, format: VertexFormat, data_size: usize, data: Option<&'a [u8]>) -> Self {
        Self {
            attr_name: attr_name.to_string(),
            format,
            data_size,
            data,
            offset: 0,
        }
    }

    /// Descriptor covering all of `data`
    pub fn with_data(attr_name: &str, format: VertexFormat, data: &'a [u8]) -> Self {
        Self::new(attr_name, format, data.len(), Some(data))
    }

    /// Descriptor reserving `data_size` bytes without source data
    pub fn reserved(attr_name: &str, format: VertexFormat, data_size: usize) -> Self {
        Self::new(attr_name, format, data_size, None)
    }

    /// Number of whole elements described by `data_size`
    pub fn element_count(&self) -> usize {
        self.data_size / self.format.size_bytes()
    }

    /// True when the descriptor carries bytes to upload
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Data-free record kept by a buffer after layout
    pub fn region(&self) -> BufferRegion {
        BufferRegion {
            attr_name: self.attr_name.clone(),
            format: self.format,
            data_size: self.data_size,
            offset: self.offset,
        }
    }
}

/// Placement of one descriptor inside a laid-out buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRegion {
    pub attr_name: String,
    pub format: VertexFormat,
    pub data_size: usize,
    pub offset: usize,
}
