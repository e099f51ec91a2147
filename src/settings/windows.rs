use std::io;

use winreg::RegKey;
use winreg::enums::*;

use super::{Access, SettingsKey, SettingsStore};

/// The current user's registry hive.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStore;

impl SettingsStore for RegistryStore {
    type Key<'a> = RegKey;

    fn open(&self, path: &str, access: Access) -> io::Result<RegKey> {
        let flags = match access {
            Access::Read => KEY_QUERY_VALUE,
            Access::Write => KEY_SET_VALUE,
        };
        RegKey::predef(HKEY_CURRENT_USER).open_subkey_with_flags(path, flags)
    }
}

// RegKey closes its handle on drop.
impl SettingsKey for RegKey {
    fn get_u32(&self, name: &str) -> io::Result<u32> {
        self.get_value::<u32, _>(name)
    }

    fn get_string(&self, name: &str) -> io::Result<String> {
        self.get_value::<String, _>(name)
    }

    fn set_u32(&self, name: &str, value: u32) -> io::Result<()> {
        self.set_value(name, &value)
    }

    fn set_string(&self, name: &str, value: &str) -> io::Result<()> {
        self.set_value(name, &value.to_string())
    }
}
