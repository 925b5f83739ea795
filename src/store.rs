//! Persistence port and an allocation-free in-memory backend.

use heapless::{LinearMap, String};

/// Namespace under which backends group every key written by the engine.
pub const NAMESPACE: &str = "pomodoro";

/// Longest key the engine writes, rounded up.
pub const KEY_CAPACITY: usize = 16;

/// Trait for abstracting the persistent key-value storage backend.
///
/// Implement this over NVS, an EEPROM page, a flash sector map or anything
/// else able to store small scalars by name. Loads never fail: a missing or
/// unreadable key yields the supplied default.
pub trait SettingsStore {
    /// Error returned when a write does not make it to storage.
    type Error;

    /// Loads an unsigned byte, falling back to `default`.
    fn load_u8(&self, key: &str, default: u8) -> u8;

    /// Loads a flag, falling back to `default`.
    fn load_bool(&self, key: &str, default: bool) -> bool;

    /// Stores an unsigned byte.
    fn store_u8(&mut self, key: &str, value: u8) -> Result<(), Self::Error>;

    /// Stores a flag.
    fn store_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;
}

/// Errors raised by [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Every slot is taken by another key.
    Full,

    /// The key does not fit in [`KEY_CAPACITY`] bytes.
    KeyTooLong,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreError::Full => write!(f, "store is full, cannot add more keys"),
            StoreError::KeyTooLong => {
                write!(f, "key exceeds {} bytes", KEY_CAPACITY)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

/// A value held by [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredValue {
    U8(u8),
    Bool(bool),
}

/// Fixed-capacity key-value store kept in RAM.
///
/// Useful on host simulators and as a persistence double in tests. The
/// default capacity holds every key the engine writes.
///
/// # Type Parameters
/// * `N` - Maximum number of distinct keys
#[derive(Debug, Clone)]
pub struct MemoryStore<const N: usize = 48> {
    entries: LinearMap<String<KEY_CAPACITY>, StoredValue, N>,
    writes: u32,
}

impl<const N: usize> MemoryStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: LinearMap::new(),
            writes: 0,
        }
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| *v)
    }

    /// Returns the byte stored under `key`, if any.
    pub fn get_u8(&self, key: &str) -> Option<u8> {
        match self.get(key) {
            Some(StoredValue::U8(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the flag stored under `key`, if any.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(StoredValue::Bool(value)) => Some(value),
            _ => None,
        }
    }

    /// Number of successful writes since creation.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let mut owned = String::new();
        owned.push_str(key).map_err(|_| StoreError::KeyTooLong)?;

        self.entries
            .insert(owned, value)
            .map_err(|_| StoreError::Full)?;
        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SettingsStore for MemoryStore<N> {
    type Error = StoreError;

    fn load_u8(&self, key: &str, default: u8) -> u8 {
        self.get_u8(key).unwrap_or(default)
    }

    fn load_bool(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    fn store_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.put(key, StoredValue::U8(value))
    }

    fn store_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, StoredValue::Bool(value))
    }
}
