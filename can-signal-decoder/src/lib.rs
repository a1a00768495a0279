//! CAN Signal Decoder Library
//!
//! A stateless, reusable library for decoding named signals out of raw CAN
//! frames using a declarative per-message-ID JSON configuration.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Loads and validates the JSON signal configuration
//! - Extracts raw values as byte ranges or arbitrary bit spans
//!   (little-endian)
//! - Applies linear scale/offset conversion
//! - Evaluates optional sandboxed formulas for non-linear signals
//!
//! The library does NOT:
//! - Acquire frames from a bus
//! - Track last-known signal state across frames
//! - Persist or display decoded values
//!
//! All of that lives in the application layer (can-signal-cli). The core is
//! side-effect-free: a loaded [`Configuration`] is immutable and can be
//! shared across any number of concurrent decode calls without
//! synchronization.
//!
//! # Example Usage
//!
//! ```
//! use can_signal_decoder::{CanFrame, Configuration, FrameDecoder};
//!
//! let config = Configuration::from_json(r#"{
//!     "0x100": {"signals": {"speed_kph": {"start": 0, "length": 2, "scale": 0.01}}}
//! }"#).unwrap();
//!
//! let frame = CanFrame::new(0x100, vec![0x10, 0x27, 0, 0, 0, 0, 0, 0]);
//! let decoded = FrameDecoder::decode_frame(&frame, &config).unwrap();
//! assert_eq!(decoded["speed_kph"], 100.0);
//!
//! // Frames with unconfigured IDs are simply not ours
//! let other = CanFrame::new(0x42, vec![1, 2, 3]);
//! assert!(FrameDecoder::decode_frame(&other, &config).is_none());
//! ```

// Public modules
pub mod config;
pub mod expr;
pub mod extract;
pub mod frame_decoder;
pub mod types;

// Re-export main types for convenience
pub use config::{ConfigStats, Configuration, Extraction, FrameSpec, SignalSpec};
pub use expr::{evaluate, Expr, ExprError};
pub use extract::{extract_bits, extract_bytes};
pub use frame_decoder::FrameDecoder;
pub use types::{CanFrame, ConfigError, DecodedSignals, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
