//! Core types for the CAN signal decoder library
//!
//! This module defines the frame type the decoder consumes, the output map
//! it produces, and the errors that can occur while loading a signal
//! configuration. Decoding itself never errors - see the error policy notes
//! on [`ConfigError`].

use std::collections::HashMap;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Decoded signal values for one frame, keyed by signal name
///
/// Produced fresh per frame; the caller merges it into whatever state
/// tracking it maintains.
pub type DecodedSignals = HashMap<String, f64>;

/// Raw CAN frame from a live bus
///
/// This represents a single CAN frame as received from the interface,
/// before any signal decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanFrame {
    /// CAN message ID (11-bit or 29-bit)
    pub can_id: u32,
    /// Frame data bytes (0-8 bytes for classic CAN)
    pub data: Vec<u8>,
    /// True if this is an extended (29-bit) CAN ID
    pub is_extended: bool,
}

impl CanFrame {
    /// Create a frame, inferring the extended flag from the ID width
    pub fn new(can_id: u32, data: Vec<u8>) -> Self {
        Self {
            can_id,
            data,
            is_extended: can_id > 0x7FF,
        }
    }

    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Errors that can occur while loading a signal configuration
///
/// These are the only fatal errors in the crate: they surface operator
/// mistakes before streaming begins. Once a configuration has loaded,
/// decoding tolerates malformed input - short frames read as zero and
/// failed formulas fall back to linear scaling - so a live stream keeps
/// producing output.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid message identifier {0:?}: expected decimal or 0x-prefixed hex")]
    InvalidIdentifier(String),

    #[error("Signal '{0}' must declare exactly one of start/length or bits")]
    AmbiguousOrMissingExtraction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_extended_flag() {
        assert!(!CanFrame::new(0x7FF, vec![]).is_extended);
        assert!(CanFrame::new(0x800, vec![]).is_extended);
        assert!(CanFrame::new(0x18FF_50E5, vec![]).is_extended);
    }

    #[test]
    fn test_frame_dlc() {
        let frame = CanFrame::new(0x100, vec![0x10, 0x27, 0, 0]);
        assert_eq!(frame.dlc(), 4);
    }
}
