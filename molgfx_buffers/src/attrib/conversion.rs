/// Conversion kinds used by attribute ops
///
/// Generic kinds (float copies, float to unsigned byte, byte copies, pick
/// data) are executed here. Cap and interpolation kinds depend on the
/// renderer's primitive semantics and are reported as not handled, so the
/// caller runs its own routine for them.

use crate::error::{Error, Result};

/// Copy-and-convert routine selected by an attribute op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    NoCopy,
    FloatToFloat,
    Float2ToFloat2,
    Float3ToFloat3,
    Float4ToFloat4,
    Float3ToUb3,
    /// One float written to the fourth byte of a 4-byte attribute
    Float1ToUb4th,
    Ub3ToUb3,
    /// Object index (u32) and atom index (i32)
    UintIntToPickData,
    Ub1InterpToCap,
    Float1ToInterp,
    Ub4ToUb4,
    PickDataToPickData,
    CylCapToCap,
    Float1InterpToCap,
    Ub1ToInterp,
    CylCapsAreRound,
    CylCapsAreFlat,
    CylCapsAreCustom,
    Float4ToUb4,
}

impl ConversionKind {
    /// Every kind, in op-code order
    pub const ALL: [ConversionKind; 20] = [
        ConversionKind::NoCopy,
        ConversionKind::FloatToFloat,
        ConversionKind::Float2ToFloat2,
        ConversionKind::Float3ToFloat3,
        ConversionKind::Float4ToFloat4,
        ConversionKind::Float3ToUb3,
        ConversionKind::Float1ToUb4th,
        ConversionKind::Ub3ToUb3,
        ConversionKind::UintIntToPickData,
        ConversionKind::Ub1InterpToCap,
        ConversionKind::Float1ToInterp,
        ConversionKind::Ub4ToUb4,
        ConversionKind::PickDataToPickData,
        ConversionKind::CylCapToCap,
        ConversionKind::Float1InterpToCap,
        ConversionKind::Ub1ToInterp,
        ConversionKind::CylCapsAreRound,
        ConversionKind::CylCapsAreFlat,
        ConversionKind::CylCapsAreCustom,
        ConversionKind::Float4ToUb4,
    ];

    /// Numeric op code
    pub fn code(&self) -> u8 {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0) as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Bytes read from the source, when this module executes the kind
    pub fn source_size(&self) -> Option<usize> {
        match self {
            ConversionKind::NoCopy => Some(0),
            ConversionKind::FloatToFloat | ConversionKind::Float1ToUb4th => Some(4),
            ConversionKind::Float2ToFloat2 => Some(8),
            ConversionKind::Float3ToFloat3 | ConversionKind::Float3ToUb3 => Some(12),
            ConversionKind::Float4ToFloat4 | ConversionKind::Float4ToUb4 => Some(16),
            ConversionKind::Ub3ToUb3 => Some(3),
            ConversionKind::Ub4ToUb4 => Some(4),
            ConversionKind::UintIntToPickData | ConversionKind::PickDataToPickData => Some(8),
            _ => None,
        }
    }

    /// Bytes of the destination vertex slot that must exist
    pub fn dest_size(&self) -> Option<usize> {
        match self {
            ConversionKind::NoCopy => Some(0),
            ConversionKind::FloatToFloat => Some(4),
            ConversionKind::Float2ToFloat2 => Some(8),
            ConversionKind::Float3ToFloat3 => Some(12),
            ConversionKind::Float4ToFloat4 => Some(16),
            ConversionKind::Float3ToUb3 | ConversionKind::Ub3ToUb3 => Some(3),
            ConversionKind::Float1ToUb4th | ConversionKind::Ub4ToUb4 | ConversionKind::Float4ToUb4 => Some(4),
            ConversionKind::UintIntToPickData | ConversionKind::PickDataToPickData => Some(8),
            _ => None,
        }
    }

    /// True when `apply` executes this kind
    pub fn is_builtin(&self) -> bool {
        self.source_size().is_some()
    }

    /// Convert `src` into `dst`
    ///
    /// Returns `Ok(false)` without touching `dst` for renderer-specific kinds.
    pub fn apply(&self, src: &[u8], dst: &mut [u8]) -> Result<bool> {
        let (Some(src_size), Some(dst_size)) = (self.source_size(), self.dest_size()) else {
            return Ok(false);
        };
        if src.len() < src_size || dst.len() < dst_size {
            return Err(Error::InvalidResource(format!(
                "{:?} needs {} source and {} destination bytes, got {} and {}",
                self, src_size, dst_size, src.len(), dst.len())));
        }

        match self {
            ConversionKind::NoCopy => {}
            ConversionKind::Float3ToUb3 | ConversionKind::Float4ToUb4 => {
                for (out, chunk) in dst[..dst_size].iter_mut().zip(src.chunks_exact(4)) {
                    *out = unit_float_to_ubyte(read_f32(chunk));
                }
            }
            ConversionKind::Float1ToUb4th => {
                dst[3] = unit_float_to_ubyte(read_f32(&src[..4]));
            }
            _ => dst[..dst_size].copy_from_slice(&src[..src_size]),
        }
        Ok(true)
    }
}

/// Map [0, 1] to [0, 255], clamping out-of-range input
pub fn unit_float_to_ubyte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn read_f32(bytes: &[u8]) -> f32 {
    bytemuck::pod_read_unaligned(&bytes[..4])
}

#[cfg(test)]
#[path = "conversion_tests.rs"]
mod tests;
