//! Durable temperature history ring buffer.
//!
//! Fixed capacity of 120 samples at the 1 s sampling cadence (two minutes
//! of history).  A sample is `Option<f32>` — `None` is the missing
//! sentinel recorded when the sensor faults.  The whole ring (samples +
//! write cursor + wrapped flag) is persisted through the storage port
//! after every single insertion: an explicit choice favouring simplicity
//! and data-loss avoidance over write wear.  NVS wear-levels internally;
//! at one write per second the budget holds for the device's lifetime.
//!
//! On load, anything suspicious — undecodable blob, wrong sample count,
//! cursor out of range — resets the ring to the all-missing empty state.
//! Corruption is recovered, never fatal.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::StoragePort;
use crate::error::StorageError;

/// Ring capacity: 120 samples = 2 minutes at the 1 s cadence.
pub const HISTORY_CAPACITY: usize = 120;

const HISTORY_NAMESPACE: &str = "history";
const HISTORY_KEY: &str = "ring";

/// Upper bound on the persisted blob: length prefix + 5 bytes per sample
/// (tag + f32) + cursor + flag, with headroom.
const HISTORY_BLOB_MAX: usize = 768;

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

/// Wire form of the ring.  `samples` always carries exactly
/// [`HISTORY_CAPACITY`] entries; a shorter or longer blob is corrupt.
#[derive(Serialize, Deserialize)]
struct PersistedRing {
    samples: heapless::Vec<Option<f32>, HISTORY_CAPACITY>,
    index: u32,
    filled: bool,
}

// ---------------------------------------------------------------------------
// TemperatureHistory
// ---------------------------------------------------------------------------

/// Fixed-capacity ring of temperature samples with durable persistence.
pub struct TemperatureHistory {
    samples: [Option<f32>; HISTORY_CAPACITY],
    /// Write cursor, always in `[0, HISTORY_CAPACITY)`.
    index: usize,
    /// Set once the cursor has wrapped at least once.
    filled: bool,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureHistory {
    /// An empty ring: every slot holds the missing sentinel.
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_CAPACITY],
            index: 0,
            filled: false,
        }
    }

    /// Load the persisted ring, or reinitialise on absence/corruption.
    pub fn load_or_init(storage: &dyn StoragePort) -> Self {
        let mut buf = [0u8; HISTORY_BLOB_MAX];
        let len = match storage.read(HISTORY_NAMESPACE, HISTORY_KEY, &mut buf) {
            Ok(len) => len,
            Err(_) => return Self::new(),
        };

        match postcard::from_bytes::<PersistedRing>(&buf[..len]) {
            Ok(ring)
                if ring.samples.len() == HISTORY_CAPACITY
                    && (ring.index as usize) < HISTORY_CAPACITY =>
            {
                let mut samples = [None; HISTORY_CAPACITY];
                samples.copy_from_slice(&ring.samples);
                Self {
                    samples,
                    index: ring.index as usize,
                    filled: ring.filled,
                }
            }
            Ok(_) => {
                warn!("history blob has bad shape, resetting to empty");
                Self::new()
            }
            Err(_) => {
                warn!("history blob undecodable, resetting to empty");
                Self::new()
            }
        }
    }

    /// Insert a sample at the cursor, advance (wrapping sets `filled`),
    /// and persist the entire ring before returning.
    pub fn append(
        &mut self,
        sample: Option<f32>,
        storage: &mut dyn StoragePort,
    ) -> Result<(), StorageError> {
        self.samples[self.index] = sample;
        self.index += 1;
        if self.index == HISTORY_CAPACITY {
            self.index = 0;
            self.filled = true;
        }
        self.persist(storage)
    }

    /// Iterate the valid samples oldest → newest.
    ///
    /// Before the first wrap the valid range is `[0, index)`; afterwards
    /// it is the full ring starting at `index` (the oldest slot) through
    /// `index - 1`.
    pub fn read_ordered(&self) -> impl Iterator<Item = Option<f32>> + '_ {
        let start = if self.filled { self.index } else { 0 };
        (0..self.len()).map(move |i| self.samples[(start + i) % HISTORY_CAPACITY])
    }

    /// Number of valid samples (capacity once filled).
    pub fn len(&self) -> usize {
        if self.filled {
            HISTORY_CAPACITY
        } else {
            self.index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cursor has completed at least one full wrap.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Current write cursor (exposed for persistence tests).
    pub fn cursor(&self) -> usize {
        self.index
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn persist(&self, storage: &mut dyn StoragePort) -> Result<(), StorageError> {
        let mut samples = heapless::Vec::new();
        for s in &self.samples {
            // Capacity matches exactly; the push cannot fail.
            let _ = samples.push(*s);
        }
        let ring = PersistedRing {
            samples,
            index: self.index as u32,
            filled: self.filled,
        };
        let bytes = postcard::to_allocvec(&ring).map_err(|_| StorageError::IoError)?;
        storage.write(HISTORY_NAMESPACE, HISTORY_KEY, &bytes)
    }
}
