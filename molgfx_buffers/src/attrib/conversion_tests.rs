/// Unit tests for ConversionKind.

use super::*;

fn floats(values: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}

// ============================================================================
// Op codes
// ============================================================================

#[test]
fn test_codes_follow_declaration_order() {
    assert_eq!(ConversionKind::NoCopy.code(), 0);
    assert_eq!(ConversionKind::Float3ToUb3.code(), 5);
    assert_eq!(ConversionKind::UintIntToPickData.code(), 8);
    assert_eq!(ConversionKind::Float4ToUb4.code(), 19);
    for kind in ConversionKind::ALL {
        assert_eq!(ConversionKind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(ConversionKind::from_code(20), None);
}

#[test]
fn test_renderer_specific_kinds_are_not_builtin() {
    let specific = [
        ConversionKind::Ub1InterpToCap,
        ConversionKind::Float1ToInterp,
        ConversionKind::CylCapToCap,
        ConversionKind::Float1InterpToCap,
        ConversionKind::Ub1ToInterp,
        ConversionKind::CylCapsAreRound,
        ConversionKind::CylCapsAreFlat,
        ConversionKind::CylCapsAreCustom,
    ];
    for kind in specific {
        assert!(!kind.is_builtin(), "{:?}", kind);
        let mut dst = [7u8; 4];
        assert_eq!(kind.apply(&[1, 2, 3, 4], &mut dst).unwrap(), false);
        assert_eq!(dst, [7; 4]);
    }
    assert_eq!(ConversionKind::ALL.iter().filter(|k| k.is_builtin()).count(), 12);
}

// ============================================================================
// Built-in conversions
// ============================================================================

#[test]
fn test_float_copies() {
    let src = floats(&[1.0, 2.0, 3.0, 4.0]);
    let mut dst = [0u8; 16];

    assert!(ConversionKind::Float3ToFloat3.apply(&src, &mut dst).unwrap());
    assert_eq!(&dst[..12], &src[..12]);
    assert_eq!(&dst[12..], &[0; 4]);

    assert!(ConversionKind::Float4ToFloat4.apply(&src, &mut dst).unwrap());
    assert_eq!(&dst[..], &src[..]);
}

#[test]
fn test_float3_to_ubyte3_scales_and_clamps() {
    let src = floats(&[0.0, 0.5, 2.0]);
    let mut dst = [0u8; 3];

    ConversionKind::Float3ToUb3.apply(&src, &mut dst).unwrap();

    assert_eq!(dst, [0, 128, 255]);
}

#[test]
fn test_float4_to_ubyte4() {
    let src = floats(&[1.0, 0.0, -1.0, 0.2]);
    let mut dst = [0u8; 4];

    ConversionKind::Float4ToUb4.apply(&src, &mut dst).unwrap();

    assert_eq!(dst, [255, 0, 0, 51]);
}

#[test]
fn test_float1_goes_to_fourth_byte_only() {
    let src = floats(&[1.0]);
    let mut dst = [10u8, 20, 30, 0];

    ConversionKind::Float1ToUb4th.apply(&src, &mut dst).unwrap();

    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn test_pick_data_copies_eight_bytes() {
    let mut src = Vec::new();
    src.extend_from_slice(&42u32.to_ne_bytes());
    src.extend_from_slice(&(-3i32).to_ne_bytes());
    let mut dst = [0u8; 8];

    ConversionKind::UintIntToPickData.apply(&src, &mut dst).unwrap();

    assert_eq!(&dst[..], &src[..]);
}

#[test]
fn test_no_copy_leaves_destination() {
    let mut dst = [9u8; 4];
    assert!(ConversionKind::NoCopy.apply(&[], &mut dst).unwrap());
    assert_eq!(dst, [9; 4]);
}

#[test]
fn test_short_buffers_are_rejected() {
    let mut dst = [0u8; 12];
    assert!(matches!(
        ConversionKind::Float3ToFloat3.apply(&[0; 8], &mut dst),
        Err(Error::InvalidResource(_))
    ));
    let mut small = [0u8; 2];
    assert!(ConversionKind::Ub3ToUb3.apply(&[1, 2, 3], &mut small).is_err());
}

#[test]
fn test_unit_float_to_ubyte() {
    assert_eq!(unit_float_to_ubyte(0.0), 0);
    assert_eq!(unit_float_to_ubyte(1.0), 255);
    assert_eq!(unit_float_to_ubyte(1.5), 255);
    assert_eq!(unit_float_to_ubyte(-0.5), 0);
}
