/// Attribute descriptors: how a shader attribute is filled from primitive operands
///
/// An `AttribDesc` lists the `AttribOp`s that write it. Each op is tied to a
/// primitive op code, reads its operand at a byte offset (or copies another
/// attribute), converts with a `ConversionKind`, and may emit vertices. Ops
/// that emit vertices can carry post-processors, called once per emitted
/// vertex on a named target attribute.

use std::fmt;
use std::sync::Arc;

use crate::buffer::VertexFormat;
use crate::attrib::ConversionKind;

// ============================================================================
// Post-processors
// ============================================================================

/// Per-vertex transform run when an op emits a vertex
///
/// `vertex` is the target attribute's slot for the vertex being emitted,
/// `operand` the primitive operand that triggered the op, and
/// `emitted_index` the index of that vertex.
pub trait VertexPostProcessor: Send + Sync {
    fn process(&self, vertex: &mut [u8], operand: &[u8], emitted_index: usize);
}

impl<F> VertexPostProcessor for F
where
    F: Fn(&mut [u8], &[u8], usize) + Send + Sync,
{
    fn process(&self, vertex: &mut [u8], operand: &[u8], emitted_index: usize) {
        self(vertex, operand, emitted_index)
    }
}

/// Post-processor bound to a target attribute name
///
/// The name is resolved to an attribute index once, when the graph is built.
#[derive(Clone)]
pub struct AttribOpFuncData {
    attr_name: String,
    processor: Arc<dyn VertexPostProcessor>,
    target: Option<usize>,
}

impl AttribOpFuncData {
    pub fn new<P: VertexPostProcessor + 'static>(attr_name: &str, processor: P) -> Self {
        Self {
            attr_name: attr_name.to_string(),
            processor: Arc::new(processor),
            target: None,
        }
    }

    /// Share one processor instance between several bindings
    pub fn from_shared(attr_name: &str, processor: Arc<dyn VertexPostProcessor>) -> Self {
        Self {
            attr_name: attr_name.to_string(),
            processor,
            target: None,
        }
    }

    pub fn attr_name(&self) -> &str {
        &self.attr_name
    }

    /// Index of the target attribute (set by `AttribGraph::build`)
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn processor(&self) -> &dyn VertexPostProcessor {
        self.processor.as_ref()
    }

    pub(crate) fn resolve(&mut self, index: usize) {
        self.target = Some(index);
    }
}

impl fmt::Debug for AttribOpFuncData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttribOpFuncData")
            .field("attr_name", &self.attr_name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// AttribOp
// ============================================================================

/// One conversion step for a primitive op code
#[derive(Debug, Clone)]
pub struct AttribOp {
    /// Primitive op code this step reacts to
    pub op_code: u16,
    /// Execution order among the steps of the same op code
    pub order: usize,
    /// Byte offset into the primitive's operand block
    pub offset: usize,
    pub conversion: ConversionKind,
    /// Vertices emitted after the conversion (0 = pure copy)
    pub incr_vertices: usize,
    /// Read from this (earlier) attribute's current vertex instead of the operand
    pub copy_from_attr: Option<usize>,
    pub post_processors: Vec<AttribOpFuncData>,
}

impl AttribOp {
    pub fn new(op_code: u16, order: usize, conversion: ConversionKind, offset: usize) -> Self {
        Self {
            op_code,
            order,
            offset,
            conversion,
            incr_vertices: 0,
            copy_from_attr: None,
            post_processors: Vec::new(),
        }
    }

    pub fn with_incr_vertices(mut self, count: usize) -> Self {
        self.incr_vertices = count;
        self
    }

    pub fn copy_from(mut self, attr_index: usize) -> Self {
        self.copy_from_attr = Some(attr_index);
        self
    }

    pub fn with_post_processor(mut self, func: AttribOpFuncData) -> Self {
        self.post_processors.push(func);
        self
    }
}

// ============================================================================
// AttribDesc
// ============================================================================

/// Shader attribute and the ops that populate it
#[derive(Debug, Clone)]
pub struct AttribDesc {
    pub attr_name: String,
    pub format: VertexFormat,
    /// Position of the attribute in the vertex buffer
    pub order: i32,
    pub ops: Vec<AttribOp>,
    /// Value used for every vertex unless an op overwrites it
    pub default_value: Option<Vec<u8>>,
    /// Values cycled through vertex by vertex
    pub repeat_value: Option<Vec<u8>>,
}

impl AttribDesc {
    pub fn new(attr_name: &str, format: VertexFormat) -> Self {
        Self {
            attr_name: attr_name.to_string(),
            format,
            order: 0,
            ops: Vec::new(),
            default_value: None,
            repeat_value: None,
        }
    }

    pub fn with_ops(mut self, ops: Vec<AttribOp>) -> Self {
        self.ops = ops;
        self
    }

    pub fn with_op(mut self, op: AttribOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_default(mut self, value: &[u8]) -> Self {
        self.default_value = Some(value.to_vec());
        self
    }

    /// Cycle through `values` (a whole number of elements of this format)
    pub fn with_repeat(mut self, values: &[u8]) -> Self {
        self.repeat_value = Some(values.to_vec());
        self
    }

    /// Bytes of one element
    pub fn element_size(&self) -> usize {
        self.format.size_bytes()
    }

    /// Number of values in the repeat pattern
    pub fn repeat_value_length(&self) -> usize {
        match &self.repeat_value {
            Some(values) if self.element_size() > 0 => values.len() / self.element_size(),
            _ => 0,
        }
    }

    /// Uniform across all vertices: a default value and nothing writing per vertex
    pub fn is_constant(&self) -> bool {
        self.ops.is_empty() && self.repeat_value.is_none() && self.default_value.is_some()
    }
}

#[cfg(test)]
#[path = "attrib_desc_tests.rs"]
mod tests;
