//! Vertex formats, buffer descriptors, the layout engine and buffer objects
//!
//! Buffer layouts:
//!
//! ```text
//! Separate:    buf1 [ data1 ]  buf2 [ data2 ]  ...  bufN [ dataN ]
//! Sequential:  buf  [ data1 | data2 | ... | dataN ]
//! Interleaved: buf  [ data1[0] data2[0] .. dataN[0] | ... | data1[M] data2[M] .. dataN[M] ]
//! ```

pub mod vertex_format;
pub mod buffer_desc;
pub mod layout;
mod generic_buffer;
mod vertex_buffer;
mod index_buffer;

pub use vertex_format::{VertexFormat, VertexFormatBaseType, NativeType};
pub use buffer_desc::{BufferDesc, BufferRegion};
pub use layout::{
    BufferLayout, InterleavedPack, SequentialPack,
    align_to_word, interleaved_stride, pack_sequential, pack_interleaved,
};
pub use generic_buffer::GenericBuffer;
pub use vertex_buffer::VertexBuffer;
pub use index_buffer::IndexBuffer;
