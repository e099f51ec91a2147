use std::io;

use thiserror::Error;
use tracing::{debug, info};

pub mod memory;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::RegistryStore;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::RegistryStore;

pub use memory::MemoryStore;

/// Proxy subtree of the current user's hive.
pub const INTERNET_SETTINGS_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Internet Settings";

/// DWORD, 0 or 1.
pub const PROXY_ENABLE: &str = "ProxyEnable";

/// String, opaque to this crate (`host:port` or a per-protocol list).
pub const PROXY_SERVER: &str = "ProxyServer";

/// Access level requested when opening a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Query values only.
    Read,
    /// Set values only.
    Write,
}

/// A hierarchical key/value store such as the Windows registry.
pub trait SettingsStore {
    /// An open key. Dropping it closes the underlying handle.
    type Key<'a>: SettingsKey
    where
        Self: 'a;

    fn open(&self, path: &str, access: Access) -> io::Result<Self::Key<'_>>;
}

/// Value access on an open key. Each call is a single store operation.
pub trait SettingsKey {
    fn get_u32(&self, name: &str) -> io::Result<u32>;
    fn get_string(&self, name: &str) -> io::Result<String>;
    fn set_u32(&self, name: &str, value: u32) -> io::Result<()>;
    fn set_string(&self, name: &str, value: &str) -> io::Result<()>;
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: &'static str,
        #[source]
        source: io::Error,
    },

    /// The value has never been written, typically before the first proxy
    /// configuration on this account.
    #[error("{name} is not configured")]
    NotConfigured { name: &'static str },

    #[error("cannot read {name}: {source}")]
    Read {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid value read {value}")]
    InvalidEnable { value: u32 },

    #[error("cannot write {name}: {source}")]
    Write {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Proxy enable flag and server string of the current user.
///
/// Nothing is cached: every getter opens the key read-only, every setter
/// opens it for writing, and the handle is closed before returning.
#[derive(Debug)]
pub struct InternetSettings<S> {
    store: S,
}

impl InternetSettings<RegistryStore> {
    /// Settings backed by `HKEY_CURRENT_USER`.
    pub fn current_user() -> Self {
        Self::new(RegistryStore)
    }
}

impl<S: SettingsStore> InternetSettings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn open(&self, access: Access) -> Result<S::Key<'_>, SettingsError> {
        debug!(path = INTERNET_SETTINGS_KEY, ?access, "opening settings key");
        self.store
            .open(INTERNET_SETTINGS_KEY, access)
            .map_err(|source| SettingsError::Open {
                path: INTERNET_SETTINGS_KEY,
                source,
            })
    }

    /// Reads `ProxyEnable`. Anything other than 0 or 1 is an error, the
    /// stored value is never coerced.
    pub fn get_enable(&self) -> Result<bool, SettingsError> {
        let key = self.open(Access::Read)?;
        let value = key
            .get_u32(PROXY_ENABLE)
            .map_err(|e| read_error(PROXY_ENABLE, e))?;
        match value {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SettingsError::InvalidEnable { value }),
        }
    }

    /// Reads `ProxyServer` verbatim.
    pub fn get_server(&self) -> Result<String, SettingsError> {
        let key = self.open(Access::Read)?;
        key.get_string(PROXY_SERVER)
            .map_err(|e| read_error(PROXY_SERVER, e))
    }

    /// Writes 1 or 0 to `ProxyEnable`. The change is persisted immediately;
    /// when connections pick it up is up to the OS.
    pub fn set_enable(&self, enabled: bool) -> Result<(), SettingsError> {
        let key = self.open(Access::Write)?;
        key.set_u32(PROXY_ENABLE, u32::from(enabled))
            .map_err(|source| SettingsError::Write {
                name: PROXY_ENABLE,
                source,
            })?;
        info!(enabled, "proxy enable flag written");
        Ok(())
    }

    /// Writes `ProxyServer` without any validation.
    pub fn set_server(&self, server: &str) -> Result<(), SettingsError> {
        let key = self.open(Access::Write)?;
        key.set_string(PROXY_SERVER, server)
            .map_err(|source| SettingsError::Write {
                name: PROXY_SERVER,
                source,
            })?;
        info!(server, "proxy server written");
        Ok(())
    }
}

fn read_error(name: &'static str, source: io::Error) -> SettingsError {
    if source.kind() == io::ErrorKind::NotFound {
        SettingsError::NotConfigured { name }
    } else {
        SettingsError::Read { name, source }
    }
}
