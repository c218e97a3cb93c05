/// Layout engine: packing strategies for lists of buffer descriptors
///
/// These functions are pure. They compute offsets/strides, write the assigned
/// offset back into each descriptor and produce the staging bytes; the buffer
/// objects take care of the native upload.

use crate::error::{Error, Result};
use crate::buffer::BufferDesc;

/// Physical layout requested for a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferLayout {
    /// One native buffer per descriptor
    #[default]
    Separate,
    /// One native buffer, descriptors concatenated in order
    Sequential,
    /// One native buffer, one stride-sized block per vertex
    Interleaved,
}

/// Staging bytes produced by the sequential strategy
#[derive(Debug, Clone)]
pub struct SequentialPack {
    pub data: Vec<u8>,
    /// Offset of each descriptor's region
    pub offsets: Vec<usize>,
}

/// Staging bytes produced by the interleaved strategy
#[derive(Debug, Clone)]
pub struct InterleavedPack {
    pub data: Vec<u8>,
    pub stride: usize,
    pub vertex_count: usize,
    /// Offset of each descriptor inside one vertex block
    pub offsets: Vec<usize>,
}

/// Round `n` up to the next multiple of 4
pub fn align_to_word(n: usize) -> usize {
    let m = n % 4;
    if m != 0 { n + (4 - m) } else { n }
}

/// Per-element offsets and total stride of an interleaved vertex
///
/// The running total is word-aligned after every addition, so padding depends
/// on the order of the elements (13 + 3 gives 16 + 3 -> 20, not 16 + 4).
pub fn interleaved_stride(element_sizes: &[usize]) -> (Vec<usize>, usize) {
    let mut offsets = Vec::with_capacity(element_sizes.len());
    let mut stride = 0;
    for size in element_sizes {
        offsets.push(stride);
        stride = align_to_word(stride + size);
    }
    (offsets, stride)
}

/// Source bytes of a descriptor, truncated to its declared size
fn source_bytes<'d>(desc: &BufferDesc<'d>) -> Result<Option<&'d [u8]>> {
    match desc.data {
        Some(data) if data.len() < desc.data_size => Err(Error::InvalidResource(format!(
            "descriptor '{}' declares {} bytes but only {} are provided",
            desc.attr_name, desc.data_size, data.len()))),
        Some(data) => Ok(Some(&data[..desc.data_size])),
        None => Ok(None),
    }
}

/// Concatenate descriptors in declaration order
///
/// Each descriptor's offset becomes the byte total of everything before it;
/// descriptors without data leave a zero-filled region.
pub fn pack_sequential(descs: &mut [BufferDesc<'_>]) -> Result<SequentialPack> {
    let total: usize = descs.iter().map(|d| d.data_size).sum();
    let mut data = vec![0u8; total];
    let mut offsets = Vec::with_capacity(descs.len());
    let mut offset = 0;

    for desc in descs.iter_mut() {
        desc.offset = offset;
        offsets.push(offset);
        if let Some(src) = source_bytes(desc)? {
            data[offset..offset + src.len()].copy_from_slice(src);
        }
        offset += desc.data_size;
    }

    Ok(SequentialPack { data, offsets })
}

/// Interleave descriptors vertex by vertex
///
/// The vertex count comes from the first descriptor; every descriptor with
/// data must hold at least that many elements. Descriptors without data keep
/// their slot in the vertex block, zero-filled.
pub fn pack_interleaved(descs: &mut [BufferDesc<'_>]) -> Result<InterleavedPack> {
    let first = descs.first()
        .ok_or_else(|| Error::InvalidResource("interleaved layout needs at least one descriptor".to_string()))?;

    let sizes: Vec<usize> = descs.iter().map(|d| d.format.size_bytes()).collect();
    let vertex_count = first.data_size / sizes[0];
    let (offsets, stride) = interleaved_stride(&sizes);

    let mut sources = Vec::with_capacity(descs.len());
    for (desc, offset) in descs.iter_mut().zip(&offsets) {
        desc.offset = *offset;
        let src = source_bytes(desc)?;
        if let Some(bytes) = src {
            let needed = vertex_count * desc.format.size_bytes();
            if bytes.len() < needed {
                return Err(Error::InvalidResource(format!(
                    "descriptor '{}' holds {} bytes, interleaving {} vertices needs {}",
                    desc.attr_name, bytes.len(), vertex_count, needed)));
            }
        }
        sources.push(src);
    }

    let mut data = vec![0u8; vertex_count * stride];
    for vertex in 0..vertex_count {
        let base = vertex * stride;
        for ((src, size), offset) in sources.iter().zip(&sizes).zip(&offsets) {
            let Some(src) = src else { continue };
            let dst_start = base + offset;
            debug_assert!(dst_start + size <= data.len());
            let src_start = vertex * size;
            data[dst_start..dst_start + size].copy_from_slice(&src[src_start..src_start + size]);
        }
    }

    Ok(InterleavedPack { data, stride, vertex_count, offsets })
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
