/// Unit tests for VertexBuffer binding and masking.

use super::*;
use std::sync::{Arc, Mutex};
use crate::buffer::{VertexFormat, NativeType};
use crate::device::MockGraphicsDevice;

// ============================================================================
// Helpers
// ============================================================================

const PROGRAM: ProgramId = ProgramId(7);

fn setup() -> (Arc<Mutex<MockGraphicsDevice>>, SharedGraphicsDevice) {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    mock.lock().unwrap().define_program(PROGRAM, &[
        ("position", 0),
        ("normal", 2),
        ("color", 5),
    ]);
    let device: SharedGraphicsDevice = mock.clone();
    (mock, device)
}

fn three_attribute_buffer(device: &SharedGraphicsDevice, layout: BufferLayout) -> VertexBuffer {
    let positions = [0u8; 24];
    let normals = [0u8; 24];
    let colors = [0u8; 8];
    let mut vbo = VertexBuffer::new(device.clone(), layout, BufferUsage::StaticDraw);
    vbo.buffer_data(vec![
        BufferDesc::with_data("position", VertexFormat::Float3, &positions),
        BufferDesc::with_data("normal", VertexFormat::Float3, &normals),
        BufferDesc::with_data("color", VertexFormat::UByte4Norm, &colors),
    ]).unwrap();
    vbo
}

// ============================================================================
// Full bind
// ============================================================================

#[test]
fn test_full_bind_enables_every_location() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);

    vbo.bind_program(PROGRAM, None).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.enabled_attribs(), vec![0, 2, 5]);
    assert_eq!(vbo.tracked_locations(), &[0, 2, 5]);
}

#[test]
fn test_interleaved_pointers_share_stride() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);

    vbo.bind_program(PROGRAM, None).unwrap();

    let mock = mock.lock().unwrap();
    let (buffer, color) = mock.attrib_pointer(5).unwrap();
    assert_eq!(buffer, vbo.buffer().interleaved_id());
    assert_eq!(color.stride, 28);
    assert_eq!(color.offset, 24);
    assert_eq!(color.component_count, 4);
    assert_eq!(color.native_type, NativeType::UnsignedByte);
    assert!(color.normalized);

    let (_, normal) = mock.attrib_pointer(2).unwrap();
    assert_eq!(normal.offset, 12);
    assert!(!normal.normalized);
}

#[test]
fn test_separate_pointers_use_own_buffers() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Separate);

    vbo.bind_program(PROGRAM, None).unwrap();

    let mock = mock.lock().unwrap();
    for (index, location) in [(0usize, 0u32), (1, 2), (2, 5)] {
        let (buffer, pointer) = mock.attrib_pointer(location).unwrap();
        assert_eq!(Some(buffer), vbo.buffer().buffer_id(index));
        assert_eq!(pointer.stride, 0);
        assert_eq!(pointer.offset, 0);
    }
}

#[test]
fn test_sequential_pointers_use_region_offsets() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Sequential);

    vbo.bind_program(PROGRAM, None).unwrap();

    let mock = mock.lock().unwrap();
    let (_, color) = mock.attrib_pointer(5).unwrap();
    assert_eq!(color.stride, 0);
    assert_eq!(color.offset, 48);
}

#[test]
fn test_unknown_attribute_is_skipped() {
    let (mock, device) = setup();
    let positions = [0u8; 12];
    let extra = [0u8; 4];
    let mut vbo = VertexBuffer::new(device.clone(), BufferLayout::Interleaved, BufferUsage::StaticDraw);
    vbo.buffer_data(vec![
        BufferDesc::with_data("position", VertexFormat::Float3, &positions),
        BufferDesc::with_data("not_in_shader", VertexFormat::Float, &extra),
    ]).unwrap();

    assert!(vbo.bind_program(PROGRAM, None).is_ok());
    assert_eq!(vbo.tracked_locations(), &[0]);
    assert_eq!(mock.lock().unwrap().enabled_attribs(), vec![0]);
}

#[test]
fn test_plain_bind_binds_interleaved_buffer() {
    let (mock, device) = setup();
    let vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);
    mock.lock().unwrap().bind_buffer(BufferTarget::Array, BufferId::NONE).unwrap();

    vbo.bind().unwrap();

    assert_eq!(mock.lock().unwrap().bound_buffer(BufferTarget::Array), vbo.buffer().interleaved_id());
}

#[test]
fn test_plain_bind_is_a_no_op_for_separate_buffers() {
    let (mock, device) = setup();
    let vbo = three_attribute_buffer(&device, BufferLayout::Separate);
    mock.lock().unwrap().clear_calls();

    vbo.bind().unwrap();

    assert_eq!(mock.lock().unwrap().count_calls("bind_buffer("), 0);
}

// ============================================================================
// Indexed bind
// ============================================================================

#[test]
fn test_indexed_bind_touches_one_location() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Separate);

    vbo.bind_program(PROGRAM, Some(1)).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.enabled_attribs(), vec![2]);
    assert_eq!(vbo.tracked_locations(), &[2]);
}

#[test]
fn test_indexed_bind_keeps_mask() {
    let (_mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);
    vbo.mask_attribute(2);

    vbo.bind_program(PROGRAM, Some(0)).unwrap();

    assert_eq!(vbo.masked_locations(), &[2]);
}

// ============================================================================
// Masking
// ============================================================================

#[test]
fn test_masked_locations_are_tracked_but_not_enabled() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);
    vbo.mask_attributes(&[2, 5]);

    vbo.bind_program(PROGRAM, None).unwrap();

    {
        let mock = mock.lock().unwrap();
        assert_eq!(mock.enabled_attribs(), vec![0]);
        assert_eq!(mock.count_calls("enable_vertex_attrib_array(2)"), 0);
        assert_eq!(mock.count_calls("enable_vertex_attrib_array(5)"), 0);
        assert!(mock.attrib_pointer(2).is_none());
    }
    assert_eq!(vbo.tracked_locations(), &[0, 2, 5]);
    // Consumed by the full bind
    assert!(vbo.masked_locations().is_empty());

    vbo.bind_program(PROGRAM, None).unwrap();
    assert_eq!(mock.lock().unwrap().enabled_attribs(), vec![0, 2, 5]);
}

#[test]
fn test_mask_attribute_accumulates_and_mask_attributes_replaces() {
    let (_mock, device) = setup();
    let mut vbo = VertexBuffer::new(device.clone(), BufferLayout::Separate, BufferUsage::StaticDraw);

    vbo.mask_attribute(1);
    vbo.mask_attribute(3);
    assert_eq!(vbo.masked_locations(), &[1, 3]);

    vbo.mask_attributes(&[4]);
    assert_eq!(vbo.masked_locations(), &[4]);
}

// ============================================================================
// Unbind
// ============================================================================

#[test]
fn test_unbind_disables_tracked_locations() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);
    vbo.mask_attributes(&[5]);
    vbo.bind_program(PROGRAM, None).unwrap();

    vbo.unbind().unwrap();

    let mock = mock.lock().unwrap();
    assert!(mock.enabled_attribs().is_empty());
    assert_eq!(mock.count_calls("disable_vertex_attrib_array"), 3);
    assert_eq!(mock.bound_buffer(BufferTarget::Array), BufferId::NONE);
    assert!(vbo.tracked_locations().is_empty());
}

#[test]
fn test_repeated_binds_track_location_once() {
    let (mock, device) = setup();
    let mut vbo = three_attribute_buffer(&device, BufferLayout::Interleaved);

    vbo.bind_program(PROGRAM, None).unwrap();
    vbo.bind_program(PROGRAM, Some(0)).unwrap();
    vbo.unbind().unwrap();

    assert_eq!(mock.lock().unwrap().count_calls("disable_vertex_attrib_array(0)"), 1);
}

#[test]
fn test_separate_descriptor_without_data_is_not_enabled() {
    let (mock, device) = setup();
    let positions = [0u8; 12];
    let mut vbo = VertexBuffer::new(device.clone(), BufferLayout::Separate, BufferUsage::StaticDraw);
    vbo.buffer_data(vec![
        BufferDesc::with_data("position", VertexFormat::Float3, &positions),
        BufferDesc::reserved("color", VertexFormat::UByte4Norm, 4),
    ]).unwrap();

    vbo.bind_program(PROGRAM, None).unwrap();

    assert_eq!(mock.lock().unwrap().enabled_attribs(), vec![0]);
    assert_eq!(vbo.tracked_locations(), &[0, 5]);
}
