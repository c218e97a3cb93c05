/// Vertex element format catalog
///
/// Closed set of per-vertex element formats and their static metadata.
/// Every lookup is total; there is no failure path.

/// Per-vertex element format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    // 8 bit
    Byte,
    Byte2,
    Byte3,
    Byte4,
    ByteNorm,
    Byte2Norm,
    Byte3Norm,
    Byte4Norm,
    UByte,
    UByte2,
    UByte3,
    UByte4,
    UByteNorm,
    UByte2Norm,
    UByte3Norm,
    UByte4Norm,

    // Single precision
    Float,
    Float2,
    Float3,
    Float4,

    // 32 bit integer
    Int,
    Int2,
    Int3,
    Int4,
    UInt,
    UInt2,
    UInt3,
    UInt4,
}

/// Scalar family of a vertex format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormatBaseType {
    Byte,
    UByte,
    Float,
    Int,
    UInt,
}

/// Scalar type handed to the native attribute pointer call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Byte,
    UnsignedByte,
    Float,
    Int,
    UnsignedInt,
}

impl NativeType {
    /// Size of one scalar in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            NativeType::Byte | NativeType::UnsignedByte => 1,
            NativeType::Float | NativeType::Int | NativeType::UnsignedInt => 4,
        }
    }
}

impl VertexFormat {
    /// Every format, in declaration order
    pub const ALL: [VertexFormat; 28] = [
        VertexFormat::Byte,
        VertexFormat::Byte2,
        VertexFormat::Byte3,
        VertexFormat::Byte4,
        VertexFormat::ByteNorm,
        VertexFormat::Byte2Norm,
        VertexFormat::Byte3Norm,
        VertexFormat::Byte4Norm,
        VertexFormat::UByte,
        VertexFormat::UByte2,
        VertexFormat::UByte3,
        VertexFormat::UByte4,
        VertexFormat::UByteNorm,
        VertexFormat::UByte2Norm,
        VertexFormat::UByte3Norm,
        VertexFormat::UByte4Norm,
        VertexFormat::Float,
        VertexFormat::Float2,
        VertexFormat::Float3,
        VertexFormat::Float4,
        VertexFormat::Int,
        VertexFormat::Int2,
        VertexFormat::Int3,
        VertexFormat::Int4,
        VertexFormat::UInt,
        VertexFormat::UInt2,
        VertexFormat::UInt3,
        VertexFormat::UInt4,
    ];

    /// Scalar family of this format
    pub fn base_type(&self) -> VertexFormatBaseType {
        use VertexFormat::*;
        match self {
            Byte | Byte2 | Byte3 | Byte4
            | ByteNorm | Byte2Norm | Byte3Norm | Byte4Norm => VertexFormatBaseType::Byte,
            UByte | UByte2 | UByte3 | UByte4
            | UByteNorm | UByte2Norm | UByte3Norm | UByte4Norm => VertexFormatBaseType::UByte,
            Float | Float2 | Float3 | Float4 => VertexFormatBaseType::Float,
            Int | Int2 | Int3 | Int4 => VertexFormatBaseType::Int,
            UInt | UInt2 | UInt3 | UInt4 => VertexFormatBaseType::UInt,
        }
    }

    /// Native scalar type used in attribute pointer calls
    pub fn native_type(&self) -> NativeType {
        match self.base_type() {
            VertexFormatBaseType::Byte => NativeType::Byte,
            VertexFormatBaseType::UByte => NativeType::UnsignedByte,
            VertexFormatBaseType::Float => NativeType::Float,
            VertexFormatBaseType::Int => NativeType::Int,
            VertexFormatBaseType::UInt => NativeType::UnsignedInt,
        }
    }

    /// Number of components (1..=4)
    pub fn component_count(&self) -> u32 {
        use VertexFormat::*;
        match self {
            Byte | ByteNorm | UByte | UByteNorm | Float | Int | UInt => 1,
            Byte2 | Byte2Norm | UByte2 | UByte2Norm | Float2 | Int2 | UInt2 => 2,
            Byte3 | Byte3Norm | UByte3 | UByte3Norm | Float3 | Int3 | UInt3 => 3,
            Byte4 | Byte4Norm | UByte4 | UByte4Norm | Float4 | Int4 | UInt4 => 4,
        }
    }

    /// Whether integer components are normalized when read by the shader
    pub fn is_normalized(&self) -> bool {
        use VertexFormat::*;
        matches!(
            self,
            ByteNorm | Byte2Norm | Byte3Norm | Byte4Norm
                | UByteNorm | UByte2Norm | UByte3Norm | UByte4Norm
        )
    }

    /// Size of one element (all components) in bytes
    pub fn size_bytes(&self) -> usize {
        self.component_count() as usize * self.native_type().size_bytes()
    }
}

#[cfg(test)]
#[path = "vertex_format_tests.rs"]
mod tests;
