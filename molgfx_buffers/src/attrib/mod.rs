/// Attribute module - declarative conversion graph from primitive operands to vertex arrays

// Module declarations
pub mod conversion;
pub mod attrib_desc;
pub mod attrib_graph;
pub mod vertex_arrays;

// Re-export everything
pub use conversion::*;
pub use attrib_desc::*;
pub use attrib_graph::*;
pub use vertex_arrays::*;
