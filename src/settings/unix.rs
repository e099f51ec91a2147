use std::io;

use super::memory::MemoryKey;
use super::{Access, SettingsStore};

/// Stand-in for the Windows registry. Every open fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStore;

impl SettingsStore for RegistryStore {
    type Key<'a> = MemoryKey<'a>;

    fn open(&self, path: &str, _access: Access) -> io::Result<MemoryKey<'_>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("the Windows registry is not available on this platform ({path})"),
        ))
    }
}
