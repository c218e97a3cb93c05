/// Validated attribute graph
///
/// `AttribGraph::build` takes ownership of the attribute list and checks it
/// once: names are unique, default and repeat values fit the format, copy
/// sources point at earlier attributes, and every post-processor target name
/// resolves. Ops are then indexed by primitive op code in ascending `order`.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::attrib::{AttribDesc, AttribOp};
use crate::engine_debug;

/// Reference to one op inside the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpRef {
    /// Attribute owning the op
    pub attr_index: usize,
    /// Position of the op in that attribute's op list
    pub op_index: usize,
}

#[derive(Debug)]
pub struct AttribGraph {
    attribs: Vec<AttribDesc>,
    names: FxHashMap<String, usize>,
    ops_by_code: FxHashMap<u16, Vec<OpRef>>,
}

impl AttribGraph {
    /// Validate `attribs` and resolve every name reference
    pub fn build(mut attribs: Vec<AttribDesc>) -> Result<Self> {
        let mut names = FxHashMap::default();
        for (index, attrib) in attribs.iter().enumerate() {
            if names.insert(attrib.attr_name.clone(), index).is_some() {
                return Err(Error::InvalidConfiguration(format!(
                    "attribute '{}' declared twice", attrib.attr_name)));
            }
            Self::check_values(attrib)?;
        }

        for index in 0..attribs.len() {
            let attr_name = attribs[index].attr_name.clone();
            for op in attribs[index].ops.iter_mut() {
                if let Some(source) = op.copy_from_attr {
                    if source >= index {
                        return Err(Error::InvalidConfiguration(format!(
                            "attribute '{}' copies from attribute {}, which is not declared before it",
                            attr_name, source)));
                    }
                }
                for func in op.post_processors.iter_mut() {
                    let target = names.get(func.attr_name()).copied().ok_or_else(|| {
                        Error::InvalidConfiguration(format!(
                            "post-processor on '{}' targets unknown attribute '{}'",
                            attr_name, func.attr_name()))
                    })?;
                    func.resolve(target);
                }
            }
        }

        // Post-processors write into per-vertex arrays only
        for attrib in &attribs {
            for func in attrib.ops.iter().flat_map(|op| op.post_processors.iter()) {
                if let Some(target) = func.target() {
                    if attribs[target].is_constant() {
                        return Err(Error::InvalidConfiguration(format!(
                            "post-processor targets constant attribute '{}'", func.attr_name())));
                    }
                }
            }
        }

        let mut ops_by_code: FxHashMap<u16, Vec<OpRef>> = FxHashMap::default();
        for (attr_index, attrib) in attribs.iter().enumerate() {
            for (op_index, op) in attrib.ops.iter().enumerate() {
                ops_by_code.entry(op.op_code).or_default().push(OpRef { attr_index, op_index });
            }
        }
        for refs in ops_by_code.values_mut() {
            refs.sort_by_key(|r| attribs[r.attr_index].ops[r.op_index].order);
        }

        engine_debug!("molgfx::AttribGraph",
            "built graph: {} attribute(s), {} op code(s)", attribs.len(), ops_by_code.len());

        Ok(Self { attribs, names, ops_by_code })
    }

    fn check_values(attrib: &AttribDesc) -> Result<()> {
        let size = attrib.element_size();
        if let Some(value) = &attrib.default_value {
            if value.len() != size {
                return Err(Error::InvalidConfiguration(format!(
                    "default value of '{}' is {} bytes, format {:?} needs {}",
                    attrib.attr_name, value.len(), attrib.format, size)));
            }
        }
        if let Some(values) = &attrib.repeat_value {
            if values.is_empty() || values.len() % size != 0 {
                return Err(Error::InvalidConfiguration(format!(
                    "repeat values of '{}' ({} bytes) are not a whole number of {:?} elements",
                    attrib.attr_name, values.len(), attrib.format)));
            }
        }
        Ok(())
    }

    // ===== QUERIES =====

    pub fn attribs(&self) -> &[AttribDesc] {
        &self.attribs
    }

    pub fn attrib(&self, index: usize) -> Option<&AttribDesc> {
        self.attribs.get(index)
    }

    pub fn attrib_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn op(&self, op: OpRef) -> Option<&AttribOp> {
        self.attribs.get(op.attr_index).and_then(|a| a.ops.get(op.op_index))
    }

    /// Ops reacting to `op_code`, in ascending `order`
    pub fn ops_for(&self, op_code: u16) -> &[OpRef] {
        self.ops_by_code.get(&op_code).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Ops of one attribute, in ascending `order`
    pub fn ops_of(&self, attr_index: usize) -> Vec<OpRef> {
        let Some(attrib) = self.attribs.get(attr_index) else {
            return Vec::new();
        };
        let mut refs: Vec<OpRef> = (0..attrib.ops.len())
            .map(|op_index| OpRef { attr_index, op_index })
            .collect();
        refs.sort_by_key(|r| attrib.ops[r.op_index].order);
        refs
    }

    /// Attributes uniform over every vertex, set once at draw time
    pub fn constant_attributes(&self) -> impl Iterator<Item = &AttribDesc> {
        self.attribs.iter().filter(|a| a.is_constant())
    }

    /// Indices of attributes stored per vertex, in buffer order
    pub fn vertex_attribute_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.attribs.len())
            .filter(|&i| !self.attribs[i].is_constant())
            .collect();
        indices.sort_by_key(|&i| self.attribs[i].order);
        indices
    }
}

#[cfg(test)]
#[path = "attrib_graph_tests.rs"]
mod tests;
