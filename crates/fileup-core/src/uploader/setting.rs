//! Literal and deferred configuration values.

use crate::adapter::AdapterKind;
use crate::destination::Destination;
use std::fmt;
use std::sync::Arc;

/// A computation evaluated at save time against the fields resolved so far.
pub type Deferred<T> = Arc<dyn Fn(&DestinationView) -> T + Send + Sync>;

/// A configuration value: known now, or computed when the session saves.
pub enum Setting<T> {
    Value(T),
    Deferred(Deferred<T>),
}

impl<T> Setting<T> {
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&DestinationView) -> T + Send + Sync + 'static,
    {
        Setting::Deferred(Arc::new(f))
    }
}

impl<T: Clone> Clone for Setting<T> {
    fn clone(&self) -> Self {
        match self {
            Setting::Value(v) => Setting::Value(v.clone()),
            Setting::Deferred(f) => Setting::Deferred(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Setting::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<bool> for Setting<bool> {
    fn from(v: bool) -> Self {
        Setting::Value(v)
    }
}

impl From<&str> for Setting<String> {
    fn from(v: &str) -> Self {
        Setting::Value(v.to_string())
    }
}

impl From<String> for Setting<String> {
    fn from(v: String) -> Self {
        Setting::Value(v)
    }
}

impl From<&String> for Setting<String> {
    fn from(v: &String) -> Self {
        Setting::Value(v.clone())
    }
}

/// Options in the order their deferred values are evaluated. Each deferred
/// value sees the results of the options before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    Destination,
    Prefix,
    Overwrite,
    CreateDir,
    Directory,
    Filename,
    Extension,
}

impl ConfigOption {
    pub const EVALUATION_ORDER: [ConfigOption; 7] = [
        ConfigOption::Destination,
        ConfigOption::Prefix,
        ConfigOption::Overwrite,
        ConfigOption::CreateDir,
        ConfigOption::Directory,
        ConfigOption::Filename,
        ConfigOption::Extension,
    ];
}

/// Read-only state handed to deferred values.
///
/// `destination` holds the caller's values resolved so far, with fields the
/// caller left unset filled from the adapter's inference.
#[derive(Debug, Clone)]
pub struct DestinationView {
    pub cwd: String,
    pub adapter: AdapterKind,
    pub destination: Destination,
    pub overwrite: bool,
    pub create_dir: bool,
}
