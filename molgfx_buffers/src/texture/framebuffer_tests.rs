/// Unit tests for Framebuffer.

use super::*;
use std::sync::{Arc, Mutex};
use crate::device::{
    MockGraphicsDevice, RenderbufferStorage, TextureFormat, TextureDataType, TextureFilter, TextureWrap,
};
use crate::device::mock_graphics_device::MockAttachment;
use crate::error::Error;

fn setup() -> (Arc<Mutex<MockGraphicsDevice>>, SharedGraphicsDevice) {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    let device: SharedGraphicsDevice = mock.clone();
    (mock, device)
}

fn color_texture(device: &SharedGraphicsDevice) -> Texture {
    let mut texture = Texture::new_2d(device.clone(), TextureFormat::Rgba, TextureDataType::UByte,
        TextureFilter::Linear, TextureFilter::Linear, TextureWrap::ClampToEdge, TextureWrap::ClampToEdge).unwrap();
    texture.texture_data_2d(16, 16, None).unwrap();
    texture
}

#[test]
fn test_attach_texture_and_renderbuffer() {
    let (mock, device) = setup();
    let texture = color_texture(&device);
    let rbo = Renderbuffer::new(device.clone(), 16, 16, RenderbufferStorage::Depth24).unwrap();
    let mut fbo = Framebuffer::new(device.clone()).unwrap();

    fbo.attach_texture(&texture, FramebufferAttachment::Color0).unwrap();
    fbo.attach_renderbuffer(&rbo, FramebufferAttachment::Depth).unwrap();

    assert_eq!(fbo.attachment(FramebufferAttachment::Color0), Some(AttachedObject::Texture(texture.id())));
    assert_eq!(fbo.attachment(FramebufferAttachment::Depth), Some(AttachedObject::Renderbuffer(rbo.id())));
    let mock = mock.lock().unwrap();
    assert_eq!(mock.framebuffer_attachment(fbo.id(), FramebufferAttachment::Color0),
        Some(MockAttachment::Texture(texture.id())));
    assert_eq!(mock.framebuffer_attachment(fbo.id(), FramebufferAttachment::Depth),
        Some(MockAttachment::Renderbuffer(rbo.id())));
}

#[test]
fn test_reattaching_slot_replaces_record() {
    let (_mock, device) = setup();
    let first = color_texture(&device);
    let second = color_texture(&device);
    let mut fbo = Framebuffer::new(device.clone()).unwrap();

    fbo.attach_texture(&first, FramebufferAttachment::Color1).unwrap();
    fbo.attach_texture(&second, FramebufferAttachment::Color1).unwrap();

    assert_eq!(fbo.attachments().len(), 1);
    assert_eq!(fbo.attachment(FramebufferAttachment::Color1), Some(AttachedObject::Texture(second.id())));
}

#[test]
fn test_incomplete_framebuffer_is_reported() {
    let (mock, device) = setup();
    let texture = color_texture(&device);
    let mut fbo = Framebuffer::new(device.clone()).unwrap();
    mock.lock().unwrap().force_framebuffer_status(Some(FramebufferStatus::IncompleteDimensions));

    let result = fbo.attach_texture(&texture, FramebufferAttachment::Color0);

    assert!(matches!(result, Err(Error::BackendError(ref msg)) if msg.contains("IncompleteDimensions")));
}

#[test]
fn test_empty_framebuffer_fails_status_check() {
    let (_mock, device) = setup();
    let fbo = Framebuffer::new(device.clone()).unwrap();
    assert!(fbo.check_status().is_err());
}

#[test]
fn test_describe_lists_attachments() {
    let (_mock, device) = setup();
    let texture = color_texture(&device);
    let mut fbo = Framebuffer::new(device.clone()).unwrap();
    assert!(fbo.describe().contains("no attachments"));

    fbo.attach_texture(&texture, FramebufferAttachment::Color2).unwrap();

    let text = fbo.describe();
    assert!(text.contains(&format!("Color2: texture {}", texture.id().0)));
}

#[test]
fn test_bind_and_global_unbind() {
    let (mock, device) = setup();
    let fbo = Framebuffer::new(device.clone()).unwrap();

    fbo.bind().unwrap();
    assert_eq!(mock.lock().unwrap().bound_framebuffer(), fbo.id());
    Framebuffer::unbind_current(&device).unwrap();
    assert_eq!(mock.lock().unwrap().bound_framebuffer(), FramebufferId::NONE);
}

#[test]
fn test_drop_deletes_framebuffer() {
    let (mock, device) = setup();
    drop(Framebuffer::new(device.clone()).unwrap());
    assert_eq!(mock.lock().unwrap().live_framebuffer_count(), 0);
}
