//! Uid - 64-bit time-ordered unique identifier
//!
//! Layout:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time-ordered 64-bit unique identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uid(i64);

impl Uid {
    /// Custom epoch: 2023-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_672_531_200_000;

    /// Create a new Uid from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if the Uid is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    /// Convert the embedded timestamp to `DateTime<Utc>`
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        use chrono::{TimeZone, Utc};
        Utc.timestamp_millis_opt(self.timestamp())
            .single()
            .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, UidParseError> {
        s.parse::<i64>().map(Uid).map_err(|_| UidParseError::InvalidFormat)
    }
}

/// Error when parsing a Uid from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UidParseError {
    #[error("invalid id format")]
    InvalidFormat,
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Uid {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Uid> for i64 {
    fn from(id: Uid) -> Self {
        id.0
    }
}

impl std::str::FromStr for Uid {
    type Err = UidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uid::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de;

        struct UidVisitor;

        impl de::Visitor<'_> for UidVisitor {
            type Value = Uid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an id as a string or integer")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Uid, E> {
                Ok(Uid(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Uid, E> {
                i64::try_from(value)
                    .map(Uid)
                    .map_err(|_| de::Error::custom("id out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Uid, E> {
                value
                    .parse::<i64>()
                    .map(Uid)
                    .map_err(|_| de::Error::custom("invalid id string"))
            }
        }

        deserializer.deserialize_any(UidVisitor)
    }
}

/// Thread-safe Uid generator
///
/// Generates unique IDs at up to 4096 per millisecond per worker.
pub struct UidGenerator {
    worker_id: u16,
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_timestamp: i64,
    sequence: i64,
}

impl UidGenerator {
    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if `worker_id` >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    /// Generate a new unique Uid
    pub fn generate(&self) -> Uid {
        let mut state = self.state.lock().expect("uid generator mutex poisoned");

        let mut timestamp = current_timestamp();
        if timestamp < state.last_timestamp {
            // Clock moved backwards, reuse the last observed timestamp
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & 0xFFF;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond, wait for the next one
                while timestamp <= state.last_timestamp {
                    std::hint::spin_loop();
                    timestamp = current_timestamp();
                }
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        let id = ((timestamp - Uid::EPOCH) << 22)
            | (i64::from(self.worker_id) << 12)
            | state.sequence;
        Uid::new(id)
    }

    /// Get the worker ID of this generator
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[inline]
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_uid_creation() {
        let id = Uid::new(123_456_789);
        assert_eq!(id.into_inner(), 123_456_789);
    }

    #[test]
    fn test_uid_zero() {
        assert!(Uid::default().is_zero());
        assert!(!Uid::new(1).is_zero());
    }

    #[test]
    fn test_uid_parse() {
        let id = Uid::parse("123456789").unwrap();
        assert_eq!(id.into_inner(), 123_456_789);

        assert!(Uid::parse("invalid").is_err());
    }

    #[test]
    fn test_uid_display() {
        assert_eq!(Uid::new(123_456_789).to_string(), "123456789");
    }

    #[test]
    fn test_uid_serialize_json() {
        let id = Uid::new(123_456_789_012_345_678);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123456789012345678\"");
    }

    #[test]
    fn test_uid_deserialize_string() {
        let id: Uid = serde_json::from_str("\"123456789012345678\"").unwrap();
        assert_eq!(id.into_inner(), 123_456_789_012_345_678);
    }

    #[test]
    fn test_uid_deserialize_number() {
        let id: Uid = serde_json::from_str("12345").unwrap();
        assert_eq!(id.into_inner(), 12345);
    }

    #[test]
    fn test_uid_ordering() {
        assert!(Uid::new(100) < Uid::new(200));
    }

    #[test]
    fn test_generator_creates_unique_ids() {
        let generator = UidGenerator::new(1);
        let mut ids = HashSet::new();

        for _ in 0..1000 {
            assert!(ids.insert(generator.generate()));
        }
    }

    #[test]
    fn test_generator_ids_are_time_ordered() {
        let generator = UidGenerator::new(2);
        let first = generator.generate();
        let second = generator.generate();
        assert!(first < second);
    }

    #[test]
    fn test_generator_concurrent_uniqueness() {
        let generator = Arc::new(UidGenerator::new(3));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let generator = Arc::clone(&generator);
            handles.push(thread::spawn(move || {
                (0..500).map(|_| generator.generate()).collect::<Vec<_>>()
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(all.len(), 2000);
    }

    #[test]
    fn test_worker_id_roundtrip() {
        let generator = UidGenerator::new(42);
        assert_eq!(generator.worker_id(), 42);
    }
}
