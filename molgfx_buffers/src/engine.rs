/// Molgfx Engine - process-wide context for the GPU resource layer
///
/// Holds the graphics device and the GPU object registry as optional
/// singletons, plus the logger used by the `engine_*!` macros. All state
/// lives in statics guarded by `RwLock`s.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::device::{GraphicsDevice, SharedGraphicsDevice};
use crate::resource::GpuObjectRegistry;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct EngineState {
    graphics_device: RwLock<Option<SharedGraphicsDevice>>,
    object_registry: RwLock<Option<Arc<Mutex<GpuObjectRegistry>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            graphics_device: RwLock::new(None),
            object_registry: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Engine singleton manager
///
/// # Example
///
/// ```no_run
/// use molgfx_buffers::molgfx::Engine;
/// use molgfx_buffers::molgfx::device::MockGraphicsDevice;
///
/// Engine::initialize()?;
/// Engine::create_graphics_device(MockGraphicsDevice::new())?;
/// Engine::create_object_registry()?;
///
/// let device = Engine::graphics_device()?;
/// // Create buffers and textures against `device`...
///
/// Engine::shutdown();
/// # Ok::<(), molgfx_buffers::molgfx::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log an error before handing it back (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("molgfx::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("molgfx::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("molgfx::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine (idempotent)
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop the registry, then the graphics device
    ///
    /// Registered objects release their native handles through the device,
    /// so the registry goes first.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut registry) = state.object_registry.write() {
                *registry = None;
            }
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== GRAPHICS DEVICE API =====

    /// Register `device` as the shared graphics device
    ///
    /// # Errors
    ///
    /// Fails if the engine is not initialized or a device already exists.
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(device: D) -> Result<SharedGraphicsDevice> {
        let shared: SharedGraphicsDevice = Arc::new(Mutex::new(device));
        Self::register_graphics_device(shared.clone())?;
        crate::engine_info!("molgfx::Engine", "Graphics device singleton created successfully");
        Ok(shared)
    }

    /// Register a device the caller already shares
    ///
    /// Lets the caller keep a typed handle (e.g. `Arc<Mutex<MockGraphicsDevice>>`)
    /// next to the engine's type-erased one.
    pub fn register_graphics_device(device: SharedGraphicsDevice) -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice already exists. Call Engine::destroy_graphics_device() first.".to_string())
            ));
        }

        *lock = Some(device);
        Ok(())
    }

    /// Get the shared graphics device
    pub fn graphics_device() -> Result<SharedGraphicsDevice> {
        let state = Self::state()?;
        let lock = state.graphics_device.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice not created. Call Engine::create_graphics_device() first.".to_string())
            ))
    }

    /// Remove the graphics device singleton
    ///
    /// Handles already given out stay valid until dropped.
    pub fn destroy_graphics_device() -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        *lock = None;
        crate::engine_info!("molgfx::Engine", "Graphics device singleton destroyed");
        Ok(())
    }

    // ===== OBJECT REGISTRY API =====

    /// Create the GPU object registry singleton
    pub fn create_object_registry() -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.object_registry.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GpuObjectRegistry lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("GpuObjectRegistry already exists. Call Engine::destroy_object_registry() first.".to_string())
            ));
        }

        *lock = Some(Arc::new(Mutex::new(GpuObjectRegistry::new())));
        crate::engine_info!("molgfx::Engine", "GpuObjectRegistry singleton created successfully");
        Ok(())
    }

    pub fn object_registry() -> Result<Arc<Mutex<GpuObjectRegistry>>> {
        let state = Self::state()?;
        let lock = state.object_registry.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GpuObjectRegistry lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("GpuObjectRegistry not created. Call Engine::create_object_registry() first.".to_string())
            ))
    }

    pub fn destroy_object_registry() -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.object_registry.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GpuObjectRegistry lock poisoned".to_string())
            ))?;

        *lock = None;
        crate::engine_info!("molgfx::Engine", "GpuObjectRegistry singleton destroyed");
        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Install `logger` for every subsequent `engine_*!` message
    ///
    /// ```no_run
    /// use molgfx_buffers::molgfx::{Engine, log::{Logger, LogEntry, LogSeverity}};
    ///
    /// /// Report upload failures only
    /// struct UploadFailures;
    /// impl Logger for UploadFailures {
    ///     fn log(&self, entry: &LogEntry) {
    ///         if entry.severity == LogSeverity::Error && entry.source == "molgfx::GenericBuffer" {
    ///             eprintln!("buffer upload: {}", entry.message);
    ///         }
    ///     }
    /// }
    ///
    /// Engine::set_logger(UploadFailures);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = Self::logger().write() {
            *lock = Box::new(logger);
        }
    }

    /// Go back to `DefaultLogger`
    pub fn reset_logger() {
        Self::set_logger(DefaultLogger);
    }

    /// Log without file:line (used by `engine_trace!` .. `engine_warn!`)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Log with file:line (used by `engine_error!`)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn logger() -> &'static RwLock<Box<dyn Logger>> {
        LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if let Ok(lock) = Self::logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
