//! 10C Miner save/load.
//!
//! The record lives in a single key-value slot as
//! `{"state": {"user": {...}, "isInitialized": bool}, "version": N}`.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: the format written by this build. Bump it when fields
//!   are added.
//! - `MIN_COMPATIBLE_VERSION`: the oldest format that still loads. Bump it
//!   only for breaking changes (a field changing meaning or being removed).
//!
//! Version 0 is the unversioned browser-store format. It stored the
//! check-in date as `"Mon Oct 19 2026"` and a `level` field that is now
//! derived; both are handled on load. Missing fields take defaults and
//! unknown fields are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::UserRecord;
use crate::console;

const SAVE_VERSION: u32 = 1;

const MIN_COMPATIBLE_VERSION: u32 = 0;

/// Storage key of the snapshot slot.
pub const STORAGE_KEY: &str = "10c-game-storage";

/// A named key-value slot store.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&mut self, key: &str);
}

/// `window.localStorage`. Looked up on every access.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        let storage = get_storage().ok_or("localStorage unavailable")?;
        storage.get_item(key).map_err(|e| format!("{e:?}"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        let storage = get_storage().ok_or("localStorage unavailable")?;
        storage.set_item(key, value).map_err(|e| format!("{e:?}"))
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = get_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-process storage. Used natively and in tests; `fail_writes`
/// simulates a full quota.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStorage {
    #[cfg(test)]
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut s = Self::default();
        s.items.insert(key.to_string(), value.to_string());
        s
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        if self.fail_writes {
            return Err("QuotaExceededError".into());
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

#[cfg(test)]
impl<S: Storage + ?Sized> Storage for std::rc::Rc<std::cell::RefCell<S>> {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        self.borrow().get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.borrow_mut().set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) {
        self.borrow_mut().remove_item(key)
    }
}

#[derive(Deserialize)]
struct SaveData {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PersistedState {
    user: UserRecord,
    is_initialized: bool,
}

/// A record restored from storage.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub user: UserRecord,
    pub initialized: bool,
}

fn is_compatible(version: u32) -> bool {
    (MIN_COMPATIBLE_VERSION..=SAVE_VERSION).contains(&version)
}

fn to_json(user: &UserRecord, initialized: bool) -> serde_json::Result<String> {
    // Serialize from a borrowed view; the record is not cloned on every write.
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct StateRef<'a> {
        user: &'a UserRecord,
        is_initialized: bool,
    }
    #[derive(Serialize)]
    struct SaveRef<'a> {
        state: StateRef<'a>,
        version: u32,
    }
    serde_json::to_string(&SaveRef {
        state: StateRef {
            user,
            is_initialized: initialized,
        },
        version: SAVE_VERSION,
    })
}

fn from_json(json: &str) -> serde_json::Result<SaveData> {
    serde_json::from_str(json)
}

/// Write the record through to storage. Failures are logged and otherwise
/// ignored: the in-memory record stays authoritative.
pub fn save_game(storage: &mut dyn Storage, user: &UserRecord, initialized: bool) -> bool {
    let json = match to_json(user, initialized) {
        Ok(j) => j,
        Err(e) => {
            console::warn(&format!("failed to serialize save: {e}"));
            return false;
        }
    };

    match storage.set_item(STORAGE_KEY, &json) {
        Ok(()) => true,
        Err(e) => {
            console::warn(&format!("failed to write save: {e}"));
            false
        }
    }
}

/// Restore the record. Corrupt or incompatible data is removed and `None`
/// is returned, so the caller starts a new game.
pub fn load_game(storage: &mut dyn Storage) -> Option<Snapshot> {
    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        Ok(None) => return None,
        Err(e) => {
            console::warn(&format!("failed to read save: {e}"));
            return None;
        }
    };

    let save_data = match from_json(&json) {
        Ok(d) => d,
        Err(e) => {
            console::warn(&format!("discarding unreadable save: {e}"));
            storage.remove_item(STORAGE_KEY);
            return None;
        }
    };

    if !is_compatible(save_data.version) {
        console::log(&format!(
            "incompatible save version (saved={}, supported={}..={}), starting fresh",
            save_data.version, MIN_COMPATIBLE_VERSION, SAVE_VERSION
        ));
        storage.remove_item(STORAGE_KEY);
        return None;
    }

    if save_data.version < SAVE_VERSION {
        console::log(&format!(
            "migrating save (saved={}, current={})",
            save_data.version, SAVE_VERSION
        ));
    }

    let mut user = save_data.state.user;
    user.normalize();
    Some(Snapshot {
        user,
        initialized: save_data.state.is_initialized,
    })
}
