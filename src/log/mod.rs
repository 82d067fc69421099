//! Logging for the simulation. This is diagnostic output about what the model is doing, not to
//! be confused with the per-tick history, which is the model's data product and is written by
//! [`crate::report`].
//!
//! The module re-exports the five `log` macros, so model code writes
//!
//! ```rust
//! use epigrid::log::info;
//!
//! info!("lockdown declared");
//! ```
//!
//! Logging is _disabled_ by default. The runner turns it on with `--log-level <spec>`; from code
//! use:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only messages with priority at least `level`
//!
//! Per-module filters are set with `set_module_filter()` / `set_module_filters()` and removed
//! with `remove_module_filter()`:
//!
//! ```rust
//! use epigrid::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! set_log_level(LevelFilter::Info);
//! // Per-agent transitions are only interesting when debugging the state machine.
//! set_module_filter("epigrid::person", LevelFilter::Trace);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::collections::hash_map::Entry;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard};

#[cfg(feature = "logging")]
use log4rs::Handle;
use rustc_hash::FxHashMap;

use crate::error::EpiError;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// A level filter for messages whose target starts with `module` (e.g. `"epigrid::simulation"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    module: String,
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Singleton holding the filter levels and the handle of the installed logger. The public API
/// is the set of free functions below, which lock the singleton and forward to it.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Level for targets without their own filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: FxHashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: FxHashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration changed.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().level == level {
                    return false;
                }
                entry.get_mut().level = level;
            }
            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    fn set_module_filters(&mut self, module_filters: &[(&str, LevelFilter)]) {
        let mut mutated = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module, *level);
        }
        if mutated {
            self.set_config();
        }
    }

    fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

/// Enables all log messages. Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level: LevelFilter) {
    get_log_configuration().set_module_filters(&[(module_path, level)]);
}

/// Sets level filters for several modules at once, rebuilding the logger only once.
pub fn set_module_filters(module_filters: &[(&str, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// Removes a module filter; the global level applies to that module afterwards.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Applies a log specification of the form `level` or `module=level[,module=level...]`, as
/// accepted by the runner's `--log-level` option. A bare level sets the global level; a
/// specification with only module entries enables those modules and leaves the rest off.
///
/// # Errors
/// Returns an error naming the offending entry if a level is not recognized.
pub fn apply_log_spec(spec: &str) -> Result<(), EpiError> {
    let mut global = None;
    let mut modules = Vec::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((module, level)) => modules.push((module.trim(), parse_level(level)?)),
            None => global = Some(parse_level(entry)?),
        }
    }

    let mut configuration = get_log_configuration();
    for (module, level) in &modules {
        configuration.insert_module_filter(module, *level);
    }
    let level = match global {
        Some(level) => level,
        // Module entries alone must still get through the root logger.
        None if modules.is_empty() => configuration.global_log_level,
        None => LevelFilter::Off,
    };
    configuration.set_log_level(level);
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter, EpiError> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| EpiError::EpiError(format!("unrecognized log level `{}`", level.trim())))
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}
