//! RTC-memory state store adapter.
//!
//! Implements [`StatePort`] over RTC slow memory, which keeps its
//! contents through deep sleep but loses them on power failure — exactly
//! the retention the cold-boot policy expects.
//!
//! Blob layout: `[MAGIC(2) | STATE_VERSION(1) | LEN(1) | postcard bytes]`.
//! All-zero (never written) memory loads as [`StateError::Absent`];
//! anything failing the framing or decode checks loads as
//! [`StateError::Corrupted`].  The scheduler maps both to cold-boot
//! defaults.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a `.rtc.data` static survives deep sleep.
//! On host/test: a per-instance buffer with absent/corrupt injection.

use log::info;

use crate::app::ports::{StateError, StatePort};
use crate::state::{STATE_VERSION, WakeupState};

const MAGIC: [u8; 2] = [0xD1, 0x7E];
const BLOB_CAP: usize = 32;
const HEADER_LEN: usize = 4;

// ── Backing memory ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod backing {
    use super::BLOB_CAP;

    // RTC slow memory: retained across deep sleep, cleared on power loss.
    #[unsafe(link_section = ".rtc.data")]
    static mut RTC_BLOB: [u8; BLOB_CAP] = [0; BLOB_CAP];

    /// SAFETY: the controller is strictly single-threaded; the blob is
    /// only touched from the wakeup cycle, never from an ISR.
    pub fn read() -> [u8; BLOB_CAP] {
        unsafe { core::ptr::read(&raw const RTC_BLOB) }
    }

    /// SAFETY: see [`read`].
    pub fn write(blob: &[u8; BLOB_CAP]) {
        unsafe { core::ptr::write(&raw mut RTC_BLOB, *blob) }
    }
}

// ── Framing ───────────────────────────────────────────────────

fn encode_blob(state: &WakeupState) -> Result<[u8; BLOB_CAP], StateError> {
    let payload = postcard::to_allocvec(state).map_err(|_| StateError::IoError)?;
    if payload.len() > BLOB_CAP - HEADER_LEN {
        return Err(StateError::IoError);
    }
    let mut blob = [0u8; BLOB_CAP];
    blob[..2].copy_from_slice(&MAGIC);
    blob[2] = STATE_VERSION;
    blob[3] = payload.len() as u8;
    blob[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(&payload);
    Ok(blob)
}

fn decode_blob(blob: &[u8]) -> Result<WakeupState, StateError> {
    if blob.iter().all(|&b| b == 0) {
        return Err(StateError::Absent);
    }
    if blob.len() < HEADER_LEN || blob[..2] != MAGIC {
        return Err(StateError::Corrupted);
    }
    if blob[2] != STATE_VERSION {
        return Err(StateError::Corrupted);
    }
    let len = blob[3] as usize;
    if len > blob.len() - HEADER_LEN {
        return Err(StateError::Corrupted);
    }
    postcard::from_bytes(&blob[HEADER_LEN..HEADER_LEN + len]).map_err(|_| StateError::Corrupted)
}

// ── Adapter ───────────────────────────────────────────────────

pub struct RtcStateStore {
    #[cfg(not(target_os = "espidf"))]
    sim: Option<Vec<u8>>,
}

impl RtcStateStore {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim: None,
        }
    }
}

impl Default for RtcStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl RtcStateStore {
    /// Simulate a power loss: the blob is gone.
    pub fn sim_clear(&mut self) {
        self.sim = None;
    }

    /// Simulate a trashed blob (bad magic, garbage payload).
    pub fn sim_corrupt(&mut self) {
        self.sim = Some(vec![0xFF; 8]);
    }
}

impl StatePort for RtcStateStore {
    fn load(&mut self) -> Result<WakeupState, StateError> {
        #[cfg(target_os = "espidf")]
        {
            let blob = backing::read();
            let state = decode_blob(&blob)?;
            info!("rtc_store: restored {:?}", state);
            Ok(state)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            match &self.sim {
                None => Err(StateError::Absent),
                Some(bytes) => decode_blob(bytes),
            }
        }
    }

    fn save(&mut self, state: &WakeupState) -> Result<(), StateError> {
        let blob = encode_blob(state)?;

        #[cfg(target_os = "espidf")]
        backing::write(&blob);

        #[cfg(not(target_os = "espidf"))]
        {
            self.sim = Some(blob.to_vec());
        }

        info!("rtc_store: saved {:?}", state);
        Ok(())
    }
}
