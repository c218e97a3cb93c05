/// Unit tests for AttribGraph validation and op indexing.

use super::*;
use crate::attrib::{AttribOpFuncData, ConversionKind};
use crate::buffer::VertexFormat;

const OP_VERTEX: u16 = 4;
const OP_COLOR: u16 = 6;

fn noop() -> impl Fn(&mut [u8], &[u8], usize) + Send + Sync {
    |_: &mut [u8], _: &[u8], _: usize| {}
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_unresolved_post_processor_target_fails() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3).with_op(
            AttribOp::new(OP_VERTEX, 0, ConversionKind::Float3ToFloat3, 0)
                .with_incr_vertices(1)
                .with_post_processor(AttribOpFuncData::new("a_Missing", noop())),
        ),
    ];

    let result = AttribGraph::build(attribs);

    assert!(matches!(result, Err(Error::InvalidConfiguration(ref msg)) if msg.contains("a_Missing")));
}

#[test]
fn test_post_processor_target_resolved_once() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3).with_op(
            AttribOp::new(OP_VERTEX, 0, ConversionKind::Float3ToFloat3, 0)
                .with_incr_vertices(1)
                .with_post_processor(AttribOpFuncData::new("a_Interp", noop())),
        ),
        AttribDesc::new("a_Interp", VertexFormat::Float),
    ];

    let graph = AttribGraph::build(attribs).unwrap();

    let op = graph.op(OpRef { attr_index: 0, op_index: 0 }).unwrap();
    assert_eq!(op.post_processors[0].target(), Some(1));
}

#[test]
fn test_self_copy_is_rejected() {
    let attribs = vec![
        AttribDesc::new("a_Color", VertexFormat::UByte4)
            .with_op(AttribOp::new(OP_COLOR, 0, ConversionKind::Ub4ToUb4, 0).copy_from(0)),
    ];
    assert!(matches!(AttribGraph::build(attribs), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_forward_copy_is_rejected() {
    let attribs = vec![
        AttribDesc::new("a_Color2", VertexFormat::UByte4)
            .with_op(AttribOp::new(OP_COLOR, 0, ConversionKind::Ub4ToUb4, 0).copy_from(1)),
        AttribDesc::new("a_Color", VertexFormat::UByte4),
    ];
    assert!(matches!(AttribGraph::build(attribs), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_backward_copy_is_accepted() {
    let attribs = vec![
        AttribDesc::new("a_Color", VertexFormat::UByte4),
        AttribDesc::new("a_Color2", VertexFormat::UByte4)
            .with_op(AttribOp::new(OP_COLOR, 0, ConversionKind::Ub4ToUb4, 0).copy_from(0)),
    ];
    assert!(AttribGraph::build(attribs).is_ok());
}

#[test]
fn test_duplicate_names_are_rejected() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3),
        AttribDesc::new("a_Vertex", VertexFormat::Float4),
    ];
    assert!(matches!(AttribGraph::build(attribs), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_default_value_size_must_match_format() {
    let bad = vec![AttribDesc::new("a_Color", VertexFormat::UByte4Norm).with_default(&[255, 255, 255])];
    assert!(AttribGraph::build(bad).is_err());

    let good = vec![AttribDesc::new("a_Color", VertexFormat::UByte4Norm).with_default(&[255; 4])];
    assert!(AttribGraph::build(good).is_ok());
}

#[test]
fn test_repeat_value_must_be_whole_elements() {
    let bad = vec![AttribDesc::new("a_Flags", VertexFormat::UByte2).with_repeat(&[0, 1, 2])];
    assert!(AttribGraph::build(bad).is_err());

    let empty = vec![AttribDesc::new("a_Flags", VertexFormat::UByte2).with_repeat(&[])];
    assert!(AttribGraph::build(empty).is_err());
}

#[test]
fn test_post_processor_on_constant_attribute_is_rejected() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3).with_op(
            AttribOp::new(OP_VERTEX, 0, ConversionKind::Float3ToFloat3, 0)
                .with_incr_vertices(1)
                .with_post_processor(AttribOpFuncData::new("a_Color", noop())),
        ),
        AttribDesc::new("a_Color", VertexFormat::UByte4Norm).with_default(&[0; 4]),
    ];
    assert!(matches!(AttribGraph::build(attribs), Err(Error::InvalidConfiguration(_))));
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn test_ops_for_code_are_sorted_by_order() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3)
            .with_op(AttribOp::new(OP_VERTEX, 2, ConversionKind::Float3ToFloat3, 0).with_incr_vertices(1)),
        AttribDesc::new("a_Color", VertexFormat::UByte4Norm)
            .with_op(AttribOp::new(OP_COLOR, 0, ConversionKind::Float4ToUb4, 0))
            .with_op(AttribOp::new(OP_VERTEX, 0, ConversionKind::NoCopy, 0)),
        AttribDesc::new("a_Normal", VertexFormat::Float3)
            .with_op(AttribOp::new(OP_VERTEX, 1, ConversionKind::Float3ToFloat3, 12)),
    ];

    let graph = AttribGraph::build(attribs).unwrap();

    assert_eq!(graph.ops_for(OP_VERTEX), &[
        OpRef { attr_index: 1, op_index: 1 },
        OpRef { attr_index: 2, op_index: 0 },
        OpRef { attr_index: 0, op_index: 0 },
    ]);
    assert_eq!(graph.ops_for(OP_COLOR), &[OpRef { attr_index: 1, op_index: 0 }]);
    assert!(graph.ops_for(99).is_empty());
}

#[test]
fn test_ops_of_attribute_ascending() {
    let attribs = vec![
        AttribDesc::new("a_Color", VertexFormat::UByte4Norm)
            .with_op(AttribOp::new(OP_VERTEX, 5, ConversionKind::NoCopy, 0))
            .with_op(AttribOp::new(OP_COLOR, 1, ConversionKind::Float4ToUb4, 0)),
    ];
    let graph = AttribGraph::build(attribs).unwrap();

    let orders: Vec<usize> = graph.ops_of(0).iter().map(|r| graph.op(*r).unwrap().order).collect();
    assert_eq!(orders, vec![1, 5]);
    assert!(graph.ops_of(3).is_empty());
}

#[test]
fn test_name_lookup_and_constants() {
    let attribs = vec![
        AttribDesc::new("a_Vertex", VertexFormat::Float3)
            .with_op(AttribOp::new(OP_VERTEX, 0, ConversionKind::Float3ToFloat3, 0)),
        AttribDesc::new("a_Color", VertexFormat::UByte4Norm).with_default(&[255; 4]),
        AttribDesc::new("a_Normal", VertexFormat::Float3).with_order(-1)
            .with_op(AttribOp::new(OP_VERTEX, 0, ConversionKind::Float3ToFloat3, 12)),
    ];
    let graph = AttribGraph::build(attribs).unwrap();

    assert_eq!(graph.attrib_index("a_Color"), Some(1));
    assert_eq!(graph.attrib_index("a_Missing"), None);

    let constants: Vec<&str> = graph.constant_attributes().map(|a| a.attr_name.as_str()).collect();
    assert_eq!(constants, vec!["a_Color"]);
    assert_eq!(graph.vertex_attribute_indices(), vec![2, 0]);
}
