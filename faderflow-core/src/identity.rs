//! Persistent device identity
//!
//! The identifier is stored as a 17-byte record under
//! [`StorageKey::DeviceIdentity`]: a marker byte followed by the 16 random
//! identifier bytes. A record without the marker is treated as absent.

use faderflow_hal::{FlashError, FlashStorage, StorageKey};
use faderflow_protocol::{DeviceIdentity, UUID_LEN};
use rand_core::RngCore;

/// First byte of a valid identity record
pub const IDENTITY_MARKER: u8 = 0xAB;

/// Marker plus identifier
pub const IDENTITY_RECORD_LEN: usize = 1 + UUID_LEN;

/// Identity storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentityError {
    /// Flash operation failed
    Flash(FlashError),
    /// A record exists but is not a valid identity
    Corrupted,
}

impl From<FlashError> for IdentityError {
    fn from(e: FlashError) -> Self {
        IdentityError::Flash(e)
    }
}

/// Where a loaded identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentitySource {
    /// Read back from flash
    Stored,
    /// Generated and persisted on this boot
    Generated,
}

/// Loads the device identity, generating it on first boot
pub struct IdentityStore<S> {
    storage: S,
}

impl<S: FlashStorage> IdentityStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Return the underlying storage for other users
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the stored identity
    ///
    /// Returns `Flash(NotFound)` if none was ever written and `Corrupted` if
    /// the record lacks the marker or has the wrong length.
    pub async fn load(&mut self) -> Result<DeviceIdentity, IdentityError> {
        let mut record = [0u8; IDENTITY_RECORD_LEN + 1];
        let len = self
            .storage
            .read(StorageKey::DeviceIdentity, &mut record)
            .await?;

        if len != IDENTITY_RECORD_LEN || record[0] != IDENTITY_MARKER {
            return Err(IdentityError::Corrupted);
        }
        DeviceIdentity::from_slice(&record[1..IDENTITY_RECORD_LEN]).ok_or(IdentityError::Corrupted)
    }

    /// Read the stored identity, or generate and persist a new one
    ///
    /// `rng` is only used when no valid record exists.
    pub async fn load_or_generate<R: RngCore>(
        &mut self,
        rng: &mut R,
    ) -> Result<(DeviceIdentity, IdentitySource), IdentityError> {
        match self.load().await {
            Ok(identity) => return Ok((identity, IdentitySource::Stored)),
            Err(IdentityError::Flash(FlashError::NotFound)) | Err(IdentityError::Corrupted) => {}
            Err(e) => return Err(e),
        }

        let mut bytes = [0u8; UUID_LEN];
        rng.fill_bytes(&mut bytes);
        let identity = DeviceIdentity::new(bytes);

        let mut record = [0u8; IDENTITY_RECORD_LEN];
        record[0] = IDENTITY_MARKER;
        record[1..].copy_from_slice(identity.as_bytes());
        self.storage
            .write(StorageKey::DeviceIdentity, &record)
            .await?;

        Ok((identity, IdentitySource::Generated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use std::collections::BTreeMap;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockFlash {
        records: BTreeMap<u8, Vec<u8>>,
        fail_reads: bool,
        writes: usize,
    }

    impl FlashStorage for MockFlash {
        async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            if self.fail_reads {
                return Err(FlashError::Flash);
            }
            let data = self
                .records
                .get(&key.as_u8())
                .ok_or(FlashError::NotFound)?;
            if data.len() > buffer.len() {
                return Err(FlashError::BufferTooSmall);
            }
            buffer[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }

        async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
            self.writes += 1;
            self.records.insert(key.as_u8(), data.to_vec());
            Ok(())
        }

        async fn exists(&mut self, key: StorageKey) -> bool {
            self.records.contains_key(&key.as_u8())
        }

        async fn erase_all(&mut self) -> Result<(), FlashError> {
            self.records.clear();
            Ok(())
        }
    }

    /// Counting byte source
    struct StepRng {
        next: u8,
        used: usize,
    }

    impl RngCore for StepRng {
        fn next_u32(&mut self) -> u32 {
            let mut b = [0u8; 4];
            self.fill_bytes(&mut b);
            u32::from_le_bytes(b)
        }

        fn next_u64(&mut self) -> u64 {
            let mut b = [0u8; 8];
            self.fill_bytes(&mut b);
            u64::from_le_bytes(b)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.next;
                self.next = self.next.wrapping_add(1);
                self.used += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn rng() -> StepRng {
        StepRng { next: 1, used: 0 }
    }

    #[test]
    fn test_first_boot_generates_and_persists() {
        let mut store = IdentityStore::new(MockFlash::default());
        let mut rng = rng();

        let (id, source) = block_on(store.load_or_generate(&mut rng)).unwrap();
        assert_eq!(source, IdentitySource::Generated);
        assert_eq!(id.as_bytes()[0], 1);
        assert_eq!(id.as_bytes()[15], 16);

        let flash = store.into_storage();
        let record = &flash.records[&StorageKey::DeviceIdentity.as_u8()];
        assert_eq!(record.len(), IDENTITY_RECORD_LEN);
        assert_eq!(record[0], IDENTITY_MARKER);
        assert_eq!(&record[1..], id.as_bytes());
    }

    #[test]
    fn test_second_boot_reuses_identity() {
        let mut store = IdentityStore::new(MockFlash::default());
        let (first, _) = block_on(store.load_or_generate(&mut rng())).unwrap();

        let mut store = IdentityStore::new(store.into_storage());
        let mut rng = rng();
        let (second, source) = block_on(store.load_or_generate(&mut rng)).unwrap();

        assert_eq!(source, IdentitySource::Stored);
        assert_eq!(first, second);
        assert_eq!(rng.used, 0);
        assert_eq!(store.into_storage().writes, 1);
    }

    #[test]
    fn test_missing_marker_regenerates() {
        let mut flash = MockFlash::default();
        let mut bad = std::vec![0u8; IDENTITY_RECORD_LEN];
        bad[0] = 0xFF;
        flash.records.insert(StorageKey::DeviceIdentity.as_u8(), bad);

        let mut store = IdentityStore::new(flash);
        assert_eq!(block_on(store.load()), Err(IdentityError::Corrupted));

        let (_, source) = block_on(store.load_or_generate(&mut rng())).unwrap();
        assert_eq!(source, IdentitySource::Generated);
        assert!(block_on(store.load()).is_ok());
    }

    #[test]
    fn test_short_record_is_corrupted() {
        let mut flash = MockFlash::default();
        flash
            .records
            .insert(StorageKey::DeviceIdentity.as_u8(), std::vec![IDENTITY_MARKER, 1, 2]);

        let mut store = IdentityStore::new(flash);
        assert_eq!(block_on(store.load()), Err(IdentityError::Corrupted));
    }

    #[test]
    fn test_flash_failure_propagates() {
        let flash = MockFlash {
            fail_reads: true,
            ..Default::default()
        };
        let mut store = IdentityStore::new(flash);
        let mut rng = rng();

        assert_eq!(
            block_on(store.load_or_generate(&mut rng)),
            Err(IdentityError::Flash(FlashError::Flash))
        );
        assert_eq!(rng.used, 0);
    }
}
