//! Form application state
//!
//! Field errors and the current config file path live in an explicit
//! [`FormState`] owned by the form layer. The config file path survives
//! sessions through a [`StateStore`]; observers are notified on change.

mod store;

pub use store::{default_state_path, FileStore, MemoryStore, StateError, StateStore, STATE_PATH_ENV};

use indexmap::IndexMap;
use serde_json::Value;

use crate::value::validate;

/// Store key holding the current config file path.
pub const CONFIGFILE_KEY: &str = "configfile";

type Observer = Box<dyn FnMut(&str)>;

/// Editing state shared by the form components.
pub struct FormState<S: StateStore> {
    errors: IndexMap<String, String>,
    configfile: String,
    store: S,
    observers: Vec<Observer>,
}

impl<S: StateStore> FormState<S> {
    /// Restore state from `store`; the path is empty when never saved.
    pub fn load(store: S) -> Self {
        let configfile = store.get(CONFIGFILE_KEY).unwrap_or_default();
        Self {
            errors: IndexMap::new(),
            configfile,
            store,
            observers: Vec::new(),
        }
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(key.into(), message.into());
    }

    pub fn remove_error(&mut self, key: &str) {
        self.errors.shift_remove(key);
    }

    pub fn replace_errors(&mut self, errors: IndexMap<String, String>) {
        self.errors = errors;
    }

    /// Run `tags` against a field value and record or clear its error.
    ///
    /// Returns whether the field is valid.
    pub fn validate_field<T: AsRef<str>>(&mut self, key: &str, raw: Option<&Value>, tags: &[T]) -> bool {
        match validate(raw, tags) {
            Some(message) => {
                self.set_error(key, message);
                false
            }
            None => {
                self.remove_error(key);
                true
            }
        }
    }

    pub fn configfile(&self) -> &str {
        &self.configfile
    }

    /// Change the current config file, persist it and notify observers.
    pub fn set_configfile(&mut self, path: impl Into<String>) -> Result<(), StateError> {
        self.configfile = path.into();
        self.store.set(CONFIGFILE_KEY, &self.configfile)?;
        for observer in &mut self.observers {
            observer(&self.configfile);
        }
        Ok(())
    }

    /// Register a callback invoked with the new path on every change.
    pub fn subscribe_configfile(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
