/// Per-vertex arrays filled by walking an `AttribGraph`
///
/// The caller feeds primitive operands op by op. Ops write into the current
/// vertex; ops with `incr_vertices > 0` then emit that many vertices, running
/// their post-processors on each one. After an emission the current vertex
/// starts as a copy of the emitted one, except for attributes with a repeat
/// pattern, which keep their cyclic fill. One scratch slot past `capacity`
/// holds the vertex being built once the arrays are full.

use crate::error::{Error, Result};
use crate::attrib::{AttribGraph, AttribOp, OpRef};
use crate::buffer::BufferDesc;
use crate::engine_trace;

pub struct VertexArrays<'g> {
    graph: &'g AttribGraph,
    capacity: usize,
    /// One array per attribute, `None` for constant attributes
    arrays: Vec<Option<Vec<u8>>>,
    current: usize,
}

impl<'g> VertexArrays<'g> {
    /// Allocate room for `capacity` vertices and apply default and repeat fills
    pub fn new(graph: &'g AttribGraph, capacity: usize) -> Self {
        let arrays = graph.attribs().iter().map(|attrib| {
            if attrib.is_constant() {
                return None;
            }
            let size = attrib.element_size();
            let mut array = vec![0u8; size * (capacity + 1)];
            if let Some(default) = &attrib.default_value {
                for slot in array.chunks_exact_mut(size) {
                    slot.copy_from_slice(default);
                }
            }
            if let Some(pattern) = &attrib.repeat_value {
                let values: Vec<&[u8]> = pattern.chunks_exact(size).collect();
                for (vertex, slot) in array.chunks_exact_mut(size).enumerate() {
                    slot.copy_from_slice(values[vertex % values.len()]);
                }
            }
            Some(array)
        }).collect();

        Self { graph, capacity, arrays, current: 0 }
    }

    // ===== EXECUTION =====

    /// Run one op into the current vertex
    ///
    /// Returns `Ok(false)` when the op's conversion is renderer-specific and
    /// was left to the caller.
    pub fn apply_op(&mut self, op_ref: OpRef, operand: &[u8]) -> Result<bool> {
        let op = self.op(op_ref)?;
        let source: Vec<u8> = match op.copy_from_attr {
            Some(source_attr) => self.copy_source(source_attr),
            None => operand.get(op.offset..).unwrap_or(&[]).to_vec(),
        };
        let conversion = op.conversion;
        let Some(slot) = self.slot_mut(op_ref.attr_index, self.current) else {
            return Err(Error::InvalidResource(format!(
                "attribute {} has no per-vertex storage", op_ref.attr_index)));
        };
        conversion.apply(&source, slot)
    }

    /// Emit the op's vertices, running its post-processors on each
    pub fn emit_vertices(&mut self, op_ref: OpRef, operand: &[u8]) -> Result<usize> {
        let op = self.op(op_ref)?;
        let count = op.incr_vertices;
        if self.current + count > self.capacity {
            return Err(self.overflow());
        }

        for _ in 0..count {
            let index = self.current;
            for func in &op.post_processors {
                let Some(target) = func.target() else { continue };
                if let Some(slot) = self.slot_mut(target, index) {
                    func.processor().process(slot, operand, index);
                }
            }
            self.current += 1;
            self.carry_forward(index);
        }
        Ok(count)
    }

    /// Run every op for `op_code` in order, emitting where requested
    ///
    /// `fallback` is called for ops whose conversion is renderer-specific,
    /// with the current vertex slot of the op's attribute.
    pub fn process<F>(&mut self, op_code: u16, operand: &[u8], mut fallback: F) -> Result<()>
    where
        F: FnMut(&AttribOp, &[u8], &mut [u8]) -> Result<()>,
    {
        let graph = self.graph;
        for &op_ref in graph.ops_for(op_code) {
            if !self.apply_op(op_ref, operand)? {
                let op = self.op(op_ref)?;
                let current = self.current;
                if let Some(slot) = self.slot_mut(op_ref.attr_index, current) {
                    fallback(op, operand, slot)?;
                }
            }
            self.emit_vertices(op_ref, operand)?;
        }
        Ok(())
    }

    // ===== OUTPUT =====

    /// Vertices emitted so far
    pub fn vertex_count(&self) -> usize {
        self.current
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes of `attr_index` for vertex `vertex`
    pub fn vertex(&self, attr_index: usize, vertex: usize) -> Option<&[u8]> {
        let size = self.graph.attrib(attr_index)?.element_size();
        let array = self.arrays.get(attr_index)?.as_ref()?;
        array.get(vertex * size..(vertex + 1) * size)
    }

    /// Bytes of `attr_index` for the vertex being built
    pub fn current_vertex(&self, attr_index: usize) -> Option<&[u8]> {
        self.vertex(attr_index, self.current)
    }

    /// Emitted data as buffer descriptors, in attribute buffer order
    pub fn buffer_descs(&self) -> Vec<BufferDesc<'_>> {
        let count = self.current;
        self.graph.vertex_attribute_indices().into_iter().filter_map(|index| {
            let attrib = self.graph.attrib(index)?;
            let array = self.arrays.get(index)?.as_ref()?;
            let size = count * attrib.element_size();
            Some(BufferDesc::with_data(&attrib.attr_name, attrib.format, &array[..size]))
        }).collect()
    }

    // ===== INTERNAL =====

    fn op(&self, op_ref: OpRef) -> Result<&'g AttribOp> {
        self.graph.op(op_ref).ok_or_else(|| Error::InvalidResource(format!(
            "no op {} on attribute {}", op_ref.op_index, op_ref.attr_index)))
    }

    /// Current bytes of `attr_index`, or its default when it is constant
    fn copy_source(&self, attr_index: usize) -> Vec<u8> {
        if let Some(bytes) = self.current_vertex(attr_index) {
            return bytes.to_vec();
        }
        self.graph.attrib(attr_index)
            .and_then(|attrib| attrib.default_value.clone())
            .unwrap_or_default()
    }

    fn slot_mut(&mut self, attr_index: usize, vertex: usize) -> Option<&mut [u8]> {
        let size = self.graph.attrib(attr_index)?.element_size();
        let array = self.arrays.get_mut(attr_index)?.as_mut()?;
        array.get_mut(vertex * size..(vertex + 1) * size)
    }

    fn carry_forward(&mut self, from: usize) {
        let to = from + 1;
        if to > self.capacity {
            return;
        }
        for (attrib, array) in self.graph.attribs().iter().zip(self.arrays.iter_mut()) {
            let Some(array) = array else { continue };
            if attrib.repeat_value.is_some() {
                continue;
            }
            let size = attrib.element_size();
            array.copy_within(from * size..to * size, to * size);
        }
        engine_trace!("molgfx::VertexArrays", "emitted vertex {}", from);
    }

    fn overflow(&self) -> Error {
        Error::InvalidResource(format!(
            "vertex capacity {} exceeded at vertex {}", self.capacity, self.current))
    }
}

#[cfg(test)]
#[path = "vertex_arrays_tests.rs"]
mod tests;
