//! Unit tests for the Engine context
//!
//! ENGINE_STATE and LOGGER are process-wide, so every test is #[serial].

use crate::molgfx::{Engine, Error};
use crate::device::{MockGraphicsDevice, BufferTarget, BufferUsage};
use crate::buffer::{GenericBuffer, BufferLayout, BufferDesc, VertexFormat};
use crate::texture::Renderbuffer;
use crate::device::RenderbufferStorage;
use crate::molgfx::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(format!("{:?}|{}|{}", entry.severity, entry.source, entry.message));
    }
}

fn install_test_logger() -> Arc<Mutex<Vec<String>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(TestLogger { entries: entries.clone() });
    entries
}

/// Entries from `source` only; non-serial tests may log concurrently
fn entries_from(entries: &Arc<Mutex<Vec<String>>>, source: &str) -> Vec<String> {
    let tag = format!("|{}|", source);
    entries.lock().unwrap().iter().filter(|e| e.contains(&tag)).cloned().collect()
}

fn setup() {
    Engine::reset_for_testing();
    let _ = Engine::initialize();
}

// ============================================================================
// INITIALIZATION AND SHUTDOWN
// ============================================================================

#[test]
#[serial]
fn test_engine_initialize_is_idempotent() {
    setup();
    assert!(Engine::initialize().is_ok());
    assert!(Engine::initialize().is_ok());
}

#[test]
#[serial]
fn test_shutdown_clears_device_and_registry() {
    setup();
    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    Engine::create_object_registry().unwrap();

    Engine::shutdown();

    assert!(Engine::graphics_device().is_err());
    assert!(Engine::object_registry().is_err());
}

// ============================================================================
// GRAPHICS DEVICE
// ============================================================================

#[test]
#[serial]
fn test_create_and_get_graphics_device() {
    setup();
    let created = Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    let fetched = Engine::graphics_device().unwrap();
    assert!(Arc::ptr_eq(&created, &fetched));
}

#[test]
#[serial]
fn test_create_graphics_device_twice_fails() {
    setup();
    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
#[serial]
fn test_graphics_device_missing_fails() {
    setup();
    assert!(matches!(Engine::graphics_device(), Err(Error::InitializationFailed(_))));
}

#[test]
#[serial]
fn test_destroy_graphics_device_allows_recreate() {
    setup();
    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    Engine::destroy_graphics_device().unwrap();
    assert!(Engine::graphics_device().is_err());
    assert!(Engine::create_graphics_device(MockGraphicsDevice::new()).is_ok());
}

#[test]
#[serial]
fn test_device_handle_outlives_destroy() {
    setup();
    let device = Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    let mut buffer = GenericBuffer::new(
        device.clone(),
        BufferTarget::Array,
        BufferLayout::Sequential,
        BufferUsage::StaticDraw,
    );
    let positions = [0u8; 12];
    buffer.buffer_data(vec![BufferDesc::with_data("position", VertexFormat::Float3, &positions)]).unwrap();

    Engine::destroy_graphics_device().unwrap();

    assert!(buffer.interleaved_id().is_valid());
    drop(buffer);
}

// ============================================================================
// OBJECT REGISTRY
// ============================================================================

#[test]
#[serial]
fn test_object_registry_lifecycle() {
    setup();
    Engine::create_object_registry().unwrap();
    assert!(Engine::create_object_registry().is_err());

    let registry = Engine::object_registry().unwrap();
    assert_eq!(registry.lock().unwrap().object_count(), 0);

    Engine::destroy_object_registry().unwrap();
    assert!(Engine::object_registry().is_err());
}

#[test]
#[serial]
fn test_registry_shares_objects_by_id() {
    setup();
    let device = Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    Engine::create_object_registry().unwrap();

    let rbo = Renderbuffer::new(device, 64, 64, RenderbufferStorage::Depth24).unwrap();
    let id = Engine::object_registry().unwrap().lock().unwrap().register(rbo);

    let registry = Engine::object_registry().unwrap();
    let registry = registry.lock().unwrap();
    let fetched = registry.get::<Renderbuffer>(id).unwrap();
    assert_eq!(fetched.hash_id(), id);
}

// ============================================================================
// LOGGING
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_engine_errors() {
    setup();
    let entries = install_test_logger();

    let _ = Engine::graphics_device();

    let entries_snapshot = entries_from(&entries, "molgfx::Engine");
    Engine::reset_logger();

    assert_eq!(entries_snapshot.len(), 1);
    assert!(entries_snapshot[0].starts_with("Error|molgfx::Engine|"));
    assert!(entries_snapshot[0].contains("GraphicsDevice not created"));
}

#[test]
#[serial]
fn test_log_and_log_detailed() {
    let entries = install_test_logger();

    Engine::log(LogSeverity::Info, "molgfx::Test", "plain".to_string());
    Engine::log_detailed(LogSeverity::Warn, "molgfx::Test", "detailed".to_string(), "file.rs", 42);

    let entries_snapshot = entries_from(&entries, "molgfx::Test");
    Engine::reset_logger();

    assert_eq!(entries_snapshot, vec![
        "Info|molgfx::Test|plain".to_string(),
        "Warn|molgfx::Test|detailed".to_string(),
    ]);
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let entries = install_test_logger();
    Engine::reset_logger();

    Engine::log(LogSeverity::Debug, "molgfx::Test", "after reset".to_string());

    assert!(entries_from(&entries, "molgfx::Test").is_empty());
}

/// Records where each entry came from
struct LocationLogger {
    locations: Arc<Mutex<Vec<(Option<&'static str>, Option<u32>)>>>,
}

impl Logger for LocationLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "molgfx::Location" {
            self.locations.lock().unwrap().push((entry.file, entry.line));
        }
    }
}

#[test]
#[serial]
fn test_only_detailed_entries_carry_file_and_line() {
    let locations = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(LocationLogger { locations: locations.clone() });

    Engine::log(LogSeverity::Info, "molgfx::Location", "plain".to_string());
    Engine::log_detailed(LogSeverity::Error, "molgfx::Location", "detailed".to_string(), "buffer.rs", 7);
    Engine::reset_logger();

    assert_eq!(*locations.lock().unwrap(), vec![(None, None), (Some("buffer.rs"), Some(7))]);
}
