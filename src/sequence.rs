use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Largest sequence number SMPP permits (1..=0x7FFFFFFF).
const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Invalid `(offset, increment)` relation, detected at construction.
#[derive(Debug, PartialEq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: &str) -> Self {
        ConfigError {
            message: String::from(message),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Allocates strictly increasing SMPP sequence numbers from an
/// `(offset, increment)` pair.
///
/// Clones share one cursor, so a supervisor can lend the allocator to
/// each connection's engine and sequence numbers keep increasing across
/// reconnects. Wraps back to `offset` after 0x7FFFFFFF.
#[derive(Clone)]
pub struct SequenceAllocator {
    offset: u32,
    increment: u32,
    cursor: Arc<Mutex<u32>>,
}

impl SequenceAllocator {
    pub fn new(offset: u32, increment: u32) -> Result<Self, ConfigError> {
        if increment < 1 {
            return Err(ConfigError::new("increment may not be less than 1"));
        }
        if offset < 1 {
            return Err(ConfigError::new("offset may not be less than 1"));
        }
        if increment < offset {
            return Err(ConfigError::new(
                "increment may not be less than offset",
            ));
        }
        Ok(SequenceAllocator {
            offset,
            increment,
            cursor: Arc::new(Mutex::new(offset)),
        })
    }

    /// Returns the cursor value and advances it by `increment`.
    pub fn next(&self) -> u32 {
        let mut cursor = self.cursor.lock().unwrap();
        let current = *cursor;
        *cursor = if current > MAX_SEQUENCE_NUMBER - self.increment {
            self.offset
        } else {
            current + self.increment
        };
        current
    }

    /// The value the next call to `next` will return.
    pub fn peek(&self) -> u32 {
        *self.cursor.lock().unwrap()
    }

    /// Overwrites the cursor, e.g. to restore a persisted value before
    /// the first connection.
    pub fn set_latest(&self, latest: u32) {
        *self.cursor.lock().unwrap() = latest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_start_at_offset_and_step_by_increment() {
        let seq = SequenceAllocator::new(2, 5).unwrap();
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.next(), 7);
        assert_eq!(seq.next(), 12);
        assert_eq!(seq.peek(), 17);
    }

    #[test]
    fn allocations_are_congruent_to_offset_mod_increment() {
        let seq = SequenceAllocator::new(3, 7).unwrap();
        for _ in 0..1000 {
            assert_eq!(seq.next() % 7, 3 % 7);
        }
    }

    #[test]
    fn clones_share_one_cursor() {
        let seq = SequenceAllocator::new(1, 1).unwrap();
        let other = seq.clone();
        assert_eq!(seq.next(), 1);
        assert_eq!(other.next(), 2);
        assert_eq!(seq.next(), 3);
    }

    #[test]
    fn cursor_wraps_to_offset_at_the_smpp_maximum() {
        let seq = SequenceAllocator::new(4, 10).unwrap();
        seq.set_latest(0x7FFF_FFFE);
        assert_eq!(seq.next(), 0x7FFF_FFFE);
        assert_eq!(seq.next(), 4);
    }

    #[test]
    fn invalid_relations_are_rejected() {
        assert!(SequenceAllocator::new(0, 1).is_err());
        assert!(SequenceAllocator::new(1, 0).is_err());
        assert!(SequenceAllocator::new(5, 4).is_err());
        assert!(SequenceAllocator::new(5, 5).is_ok());
    }
}
