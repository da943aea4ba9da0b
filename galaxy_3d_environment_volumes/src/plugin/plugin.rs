/// Plugin - host entry points and the process-wide blender singleton.
///
/// Holds the one EnvironmentBlender registered with the host, the class
/// database and the global logger, in thread-safe static storage.

use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::SystemTime;
use crate::blender::{BlenderConfig, EnvironmentBlender};
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::volume::EnvironmentVolume;
use super::class_db::{ClassDb, ClassInfo, RegisteredClass};
use super::config::PluginConfig;

/// Name under which the blender singleton is published to scripts
pub const BLENDER_SINGLETON_NAME: &str = "EnvironmentBlender";

// ===== INTERNAL STATE =====

/// Global plugin state storage
static PLUGIN_STATE: OnceLock<PluginState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding the plugin singletons
struct PluginState {
    /// Blender singleton (wrapped in Mutex for thread-safe mutable access)
    blender: RwLock<Option<Arc<Mutex<EnvironmentBlender>>>>,
    /// Classes registered with the host
    class_db: RwLock<ClassDb>,
}

impl PluginState {
    fn new() -> Self {
        Self {
            blender: RwLock::new(None),
            class_db: RwLock::new(ClassDb::new()),
        }
    }
}

/// Host initialization stages, in the order the host runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InitializationLevel {
    /// Core types; the console logger is installed here
    Core,
    Servers,
    /// Scene types; classes and the blender singleton are registered here
    Scene,
    Editor,
}

// ===== PUBLIC API =====

/// Plugin entry points and singleton manager
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_environment_volumes::galaxy3d::{InitializationLevel, Plugin};
///
/// Plugin::initialize(InitializationLevel::Core)?;
/// Plugin::initialize(InitializationLevel::Scene)?;
///
/// let blender = Plugin::singleton("EnvironmentBlender")?;
/// blender.lock().unwrap().tick(1.0 / 60.0);
///
/// Plugin::terminate(InitializationLevel::Scene);
/// # Ok::<(), galaxy_3d_environment_volumes::galaxy3d::Error>(())
/// ```
pub struct Plugin;

impl Plugin {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::SingletonViolation(msg) => {
                crate::plugin_error!("galaxy3d::Plugin", "Singleton violation: {}", msg);
            }
            Error::InitializationFailed(msg) => {
                crate::plugin_error!("galaxy3d::Plugin", "Initialization failed: {}", msg);
            }
            _ => {
                crate::plugin_error!("galaxy3d::Plugin", "Plugin error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static PluginState> {
        PLUGIN_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Plugin not initialized. Call Plugin::initialize() first.".to_string())
        ))
    }

    /// Run one host initialization stage with the default configuration.
    pub fn initialize(level: InitializationLevel) -> Result<()> {
        Self::initialize_with_config(level, PluginConfig::default())
    }

    /// Run one host initialization stage.
    ///
    /// - `Core`: installs the console logger at `config.log_level`
    /// - `Scene`: registers the plugin classes and creates the blender
    ///   singleton from `config.blender`
    ///
    /// # Errors
    ///
    /// `Error::SingletonViolation` if the scene stage runs while a blender
    /// singleton already exists.
    pub fn initialize_with_config(level: InitializationLevel, config: PluginConfig) -> Result<()> {
        let state = PLUGIN_STATE.get_or_init(PluginState::new);

        match level {
            InitializationLevel::Core => {
                Self::set_logger(DefaultLogger::with_min_severity(config.log_level));
            }
            InitializationLevel::Scene => {
                {
                    let mut db = state.class_db.write()
                        .map_err(|_| Self::log_and_return_error(
                            Error::LockPoisoned("ClassDb lock poisoned".to_string())
                        ))?;
                    db.register::<EnvironmentVolume>();
                    db.register::<EnvironmentBlender>();
                }
                Self::create_blender(config.blender)?;
            }
            InitializationLevel::Servers | InitializationLevel::Editor => {}
        }

        crate::plugin_debug!("galaxy3d::Plugin", "Initialized level {:?}", level);
        Ok(())
    }

    /// Tear down one host initialization stage.
    ///
    /// At scene level the blender singleton is dropped and the plugin
    /// classes are unregistered. Outstanding blender references stay valid
    /// until dropped.
    pub fn terminate(level: InitializationLevel) {
        let Some(state) = PLUGIN_STATE.get() else {
            return;
        };

        if level == InitializationLevel::Scene {
            match state.blender.write() {
                Ok(mut blender) => {
                    if blender.take().is_some() {
                        crate::plugin_info!("galaxy3d::Plugin", "EnvironmentBlender singleton destroyed");
                    }
                }
                Err(_) => {
                    crate::plugin_warn!("galaxy3d::Plugin",
                        "Blender lock poisoned, singleton not destroyed");
                }
            }
            match state.class_db.write() {
                Ok(mut db) => {
                    db.unregister(<EnvironmentBlender as RegisteredClass>::CLASS_NAME);
                    db.unregister(<EnvironmentVolume as RegisteredClass>::CLASS_NAME);
                }
                Err(_) => {
                    crate::plugin_warn!("galaxy3d::Plugin",
                        "ClassDb lock poisoned, classes not unregistered");
                }
            }
        }

        crate::plugin_debug!("galaxy3d::Plugin", "Terminated level {:?}", level);
    }

    // ===== BLENDER SINGLETON =====

    /// Create and register the blender singleton.
    ///
    /// # Errors
    ///
    /// - `Error::InitializationFailed` if the plugin is not initialized
    /// - `Error::SingletonViolation` if a blender already exists (the
    ///   existing instance stays registered)
    pub fn create_blender(config: BlenderConfig) -> Result<Arc<Mutex<EnvironmentBlender>>> {
        let state = Self::state()?;

        let mut lock = state.blender.write()
            .map_err(|_| Self::log_and_return_error(
                Error::LockPoisoned("EnvironmentBlender lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::SingletonViolation("EnvironmentBlender already exists. Call Plugin::destroy_blender() first.".to_string())
            ));
        }

        let blender = Arc::new(Mutex::new(EnvironmentBlender::new(config)));
        *lock = Some(blender.clone());

        crate::plugin_info!("galaxy3d::Plugin", "EnvironmentBlender singleton created");

        Ok(blender)
    }

    /// Get the blender singleton.
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` if the plugin is not initialized or no
    /// blender has been created.
    pub fn blender() -> Result<Arc<Mutex<EnvironmentBlender>>> {
        let state = Self::state()?;

        let lock = state.blender.read()
            .map_err(|_| Self::log_and_return_error(
                Error::LockPoisoned("EnvironmentBlender lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("EnvironmentBlender not created. Call Plugin::create_blender() first.".to_string())
            ))
    }

    /// Whether a blender singleton is currently registered.
    pub fn has_blender() -> bool {
        PLUGIN_STATE.get()
            .and_then(|state| state.blender.read().ok().map(|lock| lock.is_some()))
            .unwrap_or(false)
    }

    /// Look up an engine singleton by its script-visible name.
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` for an unknown name, otherwise as [`Plugin::blender`].
    pub fn singleton(name: &str) -> Result<Arc<Mutex<EnvironmentBlender>>> {
        if name != BLENDER_SINGLETON_NAME {
            return Err(Self::log_and_return_error(
                Error::InvalidHandle(format!("Unknown singleton '{}'", name))
            ));
        }
        Self::blender()
    }

    /// Destroy the blender singleton.
    ///
    /// `instance` must be the registered singleton; outstanding references
    /// stay valid until dropped.
    ///
    /// # Errors
    ///
    /// `Error::SingletonViolation` if `instance` is not the registered
    /// blender (or none is registered).
    pub fn destroy_blender(instance: &Arc<Mutex<EnvironmentBlender>>) -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.blender.write()
            .map_err(|_| Self::log_and_return_error(
                Error::LockPoisoned("EnvironmentBlender lock poisoned".to_string())
            ))?;

        match lock.as_ref() {
            Some(current) if Arc::ptr_eq(current, instance) => {}
            _ => {
                return Err(Self::log_and_return_error(
                    Error::SingletonViolation("Instance is not the registered EnvironmentBlender".to_string())
                ));
            }
        }

        *lock = None;

        crate::plugin_info!("galaxy3d::Plugin", "EnvironmentBlender singleton destroyed");

        Ok(())
    }

    // ===== CLASS DATABASE =====

    /// Whether a class is currently registered with the host.
    pub fn is_class_registered(name: &str) -> bool {
        PLUGIN_STATE.get()
            .and_then(|state| state.class_db.read().ok().map(|db| db.is_registered(name)))
            .unwrap_or(false)
    }

    /// Registration record of a class.
    pub fn class_info(name: &str) -> Option<ClassInfo> {
        let state = PLUGIN_STATE.get()?;
        let db = state.class_db.read().ok()?;
        db.class_info(name).cloned()
    }

    /// Names of all registered classes, sorted.
    pub fn registered_classes() -> Vec<&'static str> {
        PLUGIN_STATE.get()
            .and_then(|state| state.class_db.read().ok().map(|db| db.class_names()))
            .unwrap_or_default()
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = PLUGIN_STATE.get() {
            state.blender.clear_poison();
            state.class_db.clear_poison();
            if let Ok(mut blender) = state.blender.write() {
                *blender = None;
            }
            if let Ok(mut db) = state.class_db.write() {
                db.clear();
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the global logger (editor output panel, file sink, ...).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_environment_volumes::galaxy3d::{Plugin, log::{Logger, LogEntry}};
    ///
    /// struct EditorLogger;
    /// impl Logger for EditorLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Forward to the editor...
    ///     }
    /// }
    ///
    /// Plugin::set_logger(EditorLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger at INFO)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like plugin_info!, plugin_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the plugin_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
