//! Persisted cycle duration adapters.
//!
//! Both implement [`DurationStore`] and hold the value in the decimal
//! ASCII format of [`crate::persist`].
//!
//! | Adapter             | Medium                                   |
//! |---------------------|------------------------------------------|
//! | `NvsDurationStore`  | ESP-IDF NVS blob `filter::cycle_ms`      |
//! |                     | (in-memory map off-target)               |
//! | `FileDurationStore` | a `settings.txt`-style text file         |
//!
//! NVS commits are atomic per `nvs_commit()`, so a power cut during a save
//! leaves the previous value in place.  The file store gets the same
//! guarantee by writing a sibling `.tmp` file and renaming it over the
//! target.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::DurationStore;
use crate::error::PersistenceError;
use crate::persist::{decode_duration, encode_duration, MAX_ENCODED_LEN};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const NAMESPACE: &str = "filter";
const KEY: &str = "cycle_ms";

// ───────────────────────────────────────────────────────────────
// NVS store
// ───────────────────────────────────────────────────────────────

pub struct NvsDurationStore {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
    #[cfg(not(target_os = "espidf"))]
    fail_io: bool,
}

impl NvsDurationStore {
    /// Initialise NVS flash.  On first boot or after a version mismatch the
    /// partition is erased and re-initialised.
    pub fn new() -> Result<Self, PersistenceError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32
            {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(PersistenceError::Io);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(PersistenceError::Io);
                }
            } else if ret != ESP_OK as i32 {
                return Err(PersistenceError::Io);
            }
            info!("NvsDurationStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsDurationStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
            #[cfg(not(target_os = "espidf"))]
            fail_io: false,
        })
    }

    /// Make every subsequent read and write report an I/O error.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_fail_io(&mut self, fail: bool) {
        self.fail_io = fail;
    }

    /// Store raw bytes under the duration key, bypassing encoding.
    #[cfg(not(target_os = "espidf"))]
    pub fn put_raw(&mut self, raw: &[u8]) {
        self.store
            .borrow_mut()
            .insert(Self::composite_key(NAMESPACE, KEY), raw.to_vec());
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Open the namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t, &[u8; 16]) -> Result<T, i32>,
    {
        let ns_buf = cstr_buf(NAMESPACE);
        let key_buf = cstr_buf(KEY);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle, &key_buf);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

/// NUL-terminated copy of an NVS name (max 15 chars).
#[cfg(target_os = "espidf")]
fn cstr_buf(name: &str) -> [u8; 16] {
    let mut buf = [0u8; 16];
    let bytes = name.as_bytes();
    let len = bytes.len().min(15);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

impl DurationStore for NvsDurationStore {
    fn store(&mut self, duration_ms: u32) -> Result<(), PersistenceError> {
        let encoded = encode_duration(duration_ms);

        #[cfg(not(target_os = "espidf"))]
        {
            if self.fail_io {
                return Err(PersistenceError::Io);
            }
            self.put_raw(encoded.as_bytes());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let data = encoded.as_bytes();
            Self::with_nvs_handle(true, |handle, key| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key.as_ptr() as *const _,
                        data.as_ptr() as *const _,
                        data.len(),
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(|rc| {
                warn!("NVS write failed (rc={})", rc);
                PersistenceError::Io
            })
        }
    }

    fn fetch(&self) -> Result<u32, PersistenceError> {
        #[cfg(not(target_os = "espidf"))]
        {
            if self.fail_io {
                return Err(PersistenceError::Io);
            }
            match self.store.borrow().get(&Self::composite_key(NAMESPACE, KEY)) {
                Some(raw) => decode_duration(raw),
                None => Err(PersistenceError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let mut buf = [0u8; MAX_ENCODED_LEN + 8];
            let result = Self::with_nvs_handle(false, |handle, key| {
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(size)
            });
            match result {
                Ok(size) => decode_duration(&buf[..size]),
                // Also returned by a READONLY open of a namespace never written.
                Err(rc) if rc == ESP_ERR_NVS_NOT_FOUND as i32 => Err(PersistenceError::NotFound),
                // Blob larger than any encoding we write.
                Err(rc) if rc == ESP_ERR_NVS_INVALID_LENGTH as i32 => {
                    Err(PersistenceError::Corrupted)
                }
                Err(_) => Err(PersistenceError::Io),
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// File store
// ───────────────────────────────────────────────────────────────

/// Duration kept in a plain text file (e.g. on a mounted SPIFFS/FAT
/// partition, or on the host during simulation).
pub struct FileDurationStore {
    path: std::path::PathBuf,
}

impl FileDurationStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        info!("FileDurationStore: {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Staging file renamed over `path` once fully written.
    fn staging_path(&self) -> std::path::PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        name.into()
    }
}

impl DurationStore for FileDurationStore {
    fn store(&mut self, duration_ms: u32) -> Result<(), PersistenceError> {
        let staging = self.staging_path();
        let staged = std::fs::write(&staging, encode_duration(duration_ms).as_bytes())
            .and_then(|()| std::fs::rename(&staging, &self.path));
        if staged.is_err() {
            // The target is untouched; drop any partial staging file.
            let _ = std::fs::remove_file(&staging);
            return Err(PersistenceError::Io);
        }
        Ok(())
    }

    fn fetch(&self) -> Result<u32, PersistenceError> {
        match std::fs::read(&self.path) {
            // More than a sign, ten digits and some whitespace cannot be ours.
            Ok(raw) if raw.len() > MAX_ENCODED_LEN + 16 => Err(PersistenceError::Corrupted),
            Ok(raw) => decode_duration(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PersistenceError::NotFound),
            Err(_) => Err(PersistenceError::Io),
        }
    }
}
