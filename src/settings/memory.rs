//! In-process settings store.
//!
//! Mirrors the registry behaviour the accessor relies on: opening a missing
//! key fails with `NotFound`, reading a missing value fails with `NotFound`,
//! reading a value of the wrong type fails with `InvalidData`, and a key
//! opened for [`Access::Read`] refuses writes (and the other way round).

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;

use super::{Access, SettingsKey, SettingsStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U32(u32),
    String(String),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: RefCell<HashMap<String, HashMap<String, Value>>>,
    denied: RefCell<HashSet<String>>,
    opened: Cell<usize>,
    open_handles: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_key(&self, path: &str) {
        self.keys.borrow_mut().entry(path.to_string()).or_default();
    }

    /// Sets a raw value, creating the key if needed. Bypasses access checks.
    pub fn set_value(&self, path: &str, name: &str, value: Value) {
        self.keys
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    pub fn value(&self, path: &str, name: &str) -> Option<Value> {
        self.keys.borrow().get(path)?.get(name).cloned()
    }

    /// Makes every later open of `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: &str) {
        self.denied.borrow_mut().insert(path.to_string());
    }

    /// Total successful opens so far.
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// Keys opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

impl SettingsStore for MemoryStore {
    type Key<'a> = MemoryKey<'a>;

    fn open(&self, path: &str, access: Access) -> io::Result<MemoryKey<'_>> {
        if self.denied.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access to {path} is denied"),
            ));
        }
        if !self.keys.borrow().contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path} does not exist"),
            ));
        }
        self.opened.set(self.opened.get() + 1);
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MemoryKey {
            store: self,
            path: path.to_string(),
            access,
        })
    }
}

#[derive(Debug)]
pub struct MemoryKey<'a> {
    store: &'a MemoryStore,
    path: String,
    access: Access,
}

impl MemoryKey<'_> {
    fn check(&self, wanted: Access) -> io::Result<()> {
        if self.access == wanted {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} opened with {:?} access", self.path, self.access),
            ))
        }
    }

    fn get(&self, name: &str) -> io::Result<Value> {
        self.check(Access::Read)?;
        self.store.value(&self.path, name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{name} does not exist"))
        })
    }

    fn set(&self, name: &str, value: Value) -> io::Result<()> {
        self.check(Access::Write)?;
        self.store.set_value(&self.path, name, value);
        Ok(())
    }
}

impl Drop for MemoryKey<'_> {
    fn drop(&mut self) {
        self.store
            .open_handles
            .set(self.store.open_handles.get() - 1);
    }
}

fn type_mismatch(name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{name} has an unexpected type"),
    )
}

impl SettingsKey for MemoryKey<'_> {
    fn get_u32(&self, name: &str) -> io::Result<u32> {
        match self.get(name)? {
            Value::U32(v) => Ok(v),
            Value::String(_) => Err(type_mismatch(name)),
        }
    }

    fn get_string(&self, name: &str) -> io::Result<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s),
            Value::U32(_) => Err(type_mismatch(name)),
        }
    }

    fn set_u32(&self, name: &str, value: u32) -> io::Result<()> {
        self.set(name, Value::U32(value))
    }

    fn set_string(&self, name: &str, value: &str) -> io::Result<()> {
        self.set(name, Value::String(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_level_is_enforced() {
        let store = MemoryStore::new();
        store.set_value("k", "n", Value::U32(1));

        let read = store.open("k", Access::Read).unwrap();
        assert_eq!(read.get_u32("n").unwrap(), 1);
        let err = read.set_u32("n", 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        let write = store.open("k", Access::Write).unwrap();
        write.set_u32("n", 0).unwrap();
        let err = write.get_u32("n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        assert_eq!(store.open_handles(), 2);
        drop(read);
        drop(write);
        assert_eq!(store.open_handles(), 0);
        assert_eq!(store.value("k", "n"), Some(Value::U32(0)));
    }

    #[test]
    fn missing_key_and_denied_key() {
        let store = MemoryStore::new();
        let err = store.open("nope", Access::Read).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        store.create_key("k");
        store.deny("k");
        let err = store.open("k", Access::Write).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(store.opened(), 0);
    }

    #[test]
    fn values_are_typed() {
        let store = MemoryStore::new();
        store.set_value("k", "s", Value::String("x".into()));
        let key = store.open("k", Access::Read).unwrap();
        assert_eq!(key.get_string("s").unwrap(), "x");
        assert_eq!(
            key.get_u32("s").unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
        assert_eq!(
            key.get_string("missing").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
