//! Signal configuration loading and validation
//!
//! Parses the declarative JSON mapping from CAN message identifier to
//! signal definitions and validates it into an immutable, queryable form:
//!
//! ```json
//! {
//!   "0x100": {
//!     "signals": {
//!       "speed_kph": { "start": 0, "length": 2, "scale": 0.01 },
//!       "brake_on":  { "bits": [4, 1] }
//!     }
//!   }
//! }
//! ```
//!
//! Identifier keys accept `0x`-prefixed hex or plain decimal. Every signal
//! must declare exactly one extraction mode - whole bytes (`start` +
//! `length`) or an arbitrary bit span (`bits: [start_bit, bit_length]`) -
//! and violations fail the load rather than being skipped at decode time.

use crate::expr::Expr;
use crate::types::{ConfigError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// How a signal's raw value is extracted from the frame payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// `length` whole bytes starting at byte `start`, little-endian
    Bytes { start: usize, length: usize },
    /// `bit_length` bits starting at `start_bit`, little-endian bit order
    Bits { start_bit: u32, bit_length: u32 },
}

/// A validated signal definition
#[derive(Debug, Clone)]
pub struct SignalSpec {
    /// Where the raw value lives in the payload
    pub extraction: Extraction,
    /// Scale factor applied to the raw value
    pub scale: f64,
    /// Offset added after scaling
    pub offset: f64,
    /// Compiled formula, when the configuration supplied one that parses.
    /// Takes the raw value as `x` and replaces the scaled value outright
    /// when it evaluates to a finite result.
    pub formula: Option<Expr>,
}

/// All signals configured for one CAN message ID
#[derive(Debug, Clone, Default)]
pub struct FrameSpec {
    /// Signal definitions by name; names are unique per message
    pub signals: HashMap<String, SignalSpec>,
}

/// Immutable mapping from CAN message ID to its signal set
///
/// Built once at startup and read-only thereafter, so it can be shared by
/// reference (or `Arc`) across any number of concurrent decode calls.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    frames: HashMap<u32, FrameSpec>,
}

/// Counts of what a configuration defines, for startup reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigStats {
    /// Number of configured message IDs
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
}

/// Raw serde shape of one signal entry, before validation
#[derive(Debug, Deserialize)]
struct RawSignalSpec {
    start: Option<usize>,
    length: Option<usize>,
    bits: Option<[u32; 2]>,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    offset: f64,
    formula: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

/// Raw serde shape of one message entry
#[derive(Debug, Deserialize)]
struct RawFrameSpec {
    #[serde(default)]
    signals: HashMap<String, RawSignalSpec>,
}

impl Configuration {
    /// Load a configuration from a JSON file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Configuration> {
        let path = path.as_ref();
        log::info!("Loading signal config: {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(text: &str) -> Result<Configuration> {
        let raw: HashMap<String, RawFrameSpec> = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Build a configuration from an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Configuration> {
        let raw: HashMap<String, RawFrameSpec> = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: HashMap<String, RawFrameSpec>) -> Result<Configuration> {
        let mut frames = HashMap::with_capacity(raw.len());

        for (key, frame) in raw {
            let can_id = parse_message_id(&key)?;
            let mut signals = HashMap::with_capacity(frame.signals.len());
            for (name, spec) in frame.signals {
                let validated = validate_signal(&name, spec)?;
                signals.insert(name, validated);
            }
            frames.insert(can_id, FrameSpec { signals });
        }

        Ok(Configuration { frames })
    }

    /// Look up the signal set for a CAN message ID
    pub fn frame(&self, can_id: u32) -> Option<&FrameSpec> {
        self.frames.get(&can_id)
    }

    /// All configured message IDs, sorted
    pub fn message_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.frames.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All configured signal names across every message, sorted and deduped
    ///
    /// Used by callers to pre-seed state snapshots and CSV columns.
    pub fn signal_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .frames
            .values()
            .flat_map(|frame| frame.signals.keys().cloned())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Get statistics about the loaded configuration
    pub fn stats(&self) -> ConfigStats {
        ConfigStats {
            num_messages: self.frames.len(),
            num_signals: self.frames.values().map(|f| f.signals.len()).sum(),
        }
    }
}

/// Parse a message identifier key: `0x`-prefixed keys are hex, everything
/// else decimal
fn parse_message_id(key: &str) -> Result<u32> {
    let trimmed = key.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u32>()
    };
    parsed.map_err(|_| ConfigError::InvalidIdentifier(key.to_string()))
}

fn validate_signal(name: &str, raw: RawSignalSpec) -> Result<SignalSpec> {
    let extraction = match (raw.start, raw.length, raw.bits) {
        (Some(start), Some(length), None) => Extraction::Bytes { start, length },
        (None, None, Some([start_bit, bit_length])) => Extraction::Bits {
            start_bit,
            bit_length,
        },
        _ => return Err(ConfigError::AmbiguousOrMissingExtraction(name.to_string())),
    };

    // A formula that fails to parse is not fatal: evaluation failures fall
    // back to linear scaling, and a load-time parse failure is just the
    // earliest place to apply that policy.
    let formula = match raw.formula.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => match Expr::parse(text) {
            Ok(expr) => Some(expr),
            Err(e) => {
                log::warn!("Ignoring formula for signal '{}': {}", name, e);
                None
            }
        },
    };

    Ok(SignalSpec {
        extraction,
        scale: raw.scale,
        offset: raw.offset,
        formula,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_normalization() {
        assert_eq!(parse_message_id("0x7FF").unwrap(), 2047);
        assert_eq!(parse_message_id("0X100").unwrap(), 256);
        assert_eq!(parse_message_id("100").unwrap(), 100);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(matches!(
            parse_message_id("0xZZ"),
            Err(ConfigError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_message_id("speed"),
            Err(ConfigError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_message_id("-5"),
            Err(ConfigError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_load_byte_range_signal() {
        let config = Configuration::from_json(
            r#"{"0x100": {"signals": {"speed_kph": {"start": 0, "length": 2, "scale": 0.01}}}}"#,
        )
        .unwrap();

        let frame = config.frame(0x100).unwrap();
        let spec = &frame.signals["speed_kph"];
        assert_eq!(
            spec.extraction,
            Extraction::Bytes {
                start: 0,
                length: 2
            }
        );
        assert_eq!(spec.scale, 0.01);
        assert_eq!(spec.offset, 0.0);
        assert!(spec.formula.is_none());
    }

    #[test]
    fn test_load_bit_range_signal() {
        let config = Configuration::from_json(
            r#"{"0x200": {"signals": {"gear": {"bits": [4, 4]}}}}"#,
        )
        .unwrap();

        let spec = &config.frame(0x200).unwrap().signals["gear"];
        assert_eq!(
            spec.extraction,
            Extraction::Bits {
                start_bit: 4,
                bit_length: 4
            }
        );
        assert_eq!(spec.scale, 1.0);
    }

    #[test]
    fn test_missing_extraction_mode_fails_load() {
        let result = Configuration::from_json(
            r#"{"0x100": {"signals": {"speed_kph": {"scale": 0.01}}}}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::AmbiguousOrMissingExtraction(name)) if name == "speed_kph"
        ));
    }

    #[test]
    fn test_ambiguous_extraction_mode_fails_load() {
        let result = Configuration::from_json(
            r#"{"0x100": {"signals": {"speed_kph": {"start": 0, "length": 2, "bits": [0, 8]}}}}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::AmbiguousOrMissingExtraction(_))
        ));
    }

    #[test]
    fn test_partial_byte_range_fails_load() {
        let result =
            Configuration::from_json(r#"{"0x100": {"signals": {"speed_kph": {"start": 0}}}}"#);
        assert!(matches!(
            result,
            Err(ConfigError::AmbiguousOrMissingExtraction(_))
        ));
    }

    #[test]
    fn test_unparseable_formula_is_ignored_not_fatal() {
        let config = Configuration::from_json(
            r#"{"0x100": {"signals": {"temp": {"start": 0, "length": 1, "formula": "y + 1"}}}}"#,
        )
        .unwrap();
        assert!(config.frame(0x100).unwrap().signals["temp"].formula.is_none());
    }

    #[test]
    fn test_valid_formula_is_compiled() {
        let config = Configuration::from_json(
            r#"{"0x100": {"signals": {"temp": {"start": 0, "length": 1, "formula": "max(0, x - 40)"}}}}"#,
        )
        .unwrap();
        let spec = &config.frame(0x100).unwrap().signals["temp"];
        assert_eq!(spec.formula.as_ref().unwrap().eval(50.0), 10.0);
    }

    #[test]
    fn test_malformed_document_fails_load() {
        assert!(matches!(
            Configuration::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Configuration::from_json(r#"{"0x100": 42}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_signals_object_is_empty_frame() {
        let config = Configuration::from_json(r#"{"0x100": {}}"#).unwrap();
        assert!(config.frame(0x100).unwrap().signals.is_empty());
    }

    #[test]
    fn test_stats_and_lookups() {
        let config = Configuration::from_json(
            r#"{
                "0x100": {"signals": {"speed_kph": {"start": 0, "length": 2}}},
                "0x200": {"signals": {
                    "gear": {"bits": [4, 4]},
                    "brake_position_pct": {"start": 1, "length": 1}
                }}
            }"#,
        )
        .unwrap();

        let stats = config.stats();
        assert_eq!(stats.num_messages, 2);
        assert_eq!(stats.num_signals, 3);
        assert_eq!(config.message_ids(), vec![0x100, 0x200]);
        assert_eq!(
            config.signal_names(),
            vec!["brake_position_pct", "gear", "speed_kph"]
        );
        assert!(config.frame(0x300).is_none());
    }
}
