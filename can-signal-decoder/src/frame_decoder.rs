//! Frame decoding engine
//!
//! Extracts signal values from raw CAN frames based on the loaded
//! configuration: byte or bit extraction, linear scale/offset conversion,
//! and optional formula post-processing.

use crate::config::{Configuration, Extraction, SignalSpec};
use crate::extract::{extract_bits, extract_bytes};
use crate::types::{CanFrame, DecodedSignals};

/// Frame decoder - extracts signals from CAN frames
///
/// Purely functional: given the same frame and configuration, repeated
/// calls yield identical output.
pub struct FrameDecoder;

impl FrameDecoder {
    /// Decode a CAN frame against the configuration.
    ///
    /// # Returns
    /// * `Some(DecodedSignals)` with every signal declared for the frame's
    ///   ID when the ID is configured
    /// * `None` when the ID is not configured - an unrecognized frame,
    ///   not an error
    pub fn decode_frame(frame: &CanFrame, config: &Configuration) -> Option<DecodedSignals> {
        let frame_spec = config.frame(frame.can_id)?;

        let mut decoded = DecodedSignals::with_capacity(frame_spec.signals.len());
        for (name, spec) in &frame_spec.signals {
            let value = Self::decode_signal(&frame.data, spec);
            log::trace!("0x{:X} {} = {}", frame.can_id, name, value);
            decoded.insert(name.clone(), value);
        }

        Some(decoded)
    }

    /// Decode a single signal from frame data.
    ///
    /// The raw value is extracted per the spec's mode, then converted with
    /// `raw * scale + offset`. A formula, when present, sees the raw value
    /// (not the scaled one) and replaces the linear conversion outright
    /// when it evaluates to a finite result; otherwise the scaled value
    /// stands. Never fails: out-of-range extractions read as zero.
    pub fn decode_signal(data: &[u8], spec: &SignalSpec) -> f64 {
        let raw = match spec.extraction {
            Extraction::Bytes { start, length } => extract_bytes(data, start, length),
            Extraction::Bits {
                start_bit,
                bit_length,
            } => extract_bits(data, start_bit, bit_length),
        };

        let scaled = raw as f64 * spec.scale + spec.offset;

        match &spec.formula {
            Some(expr) => {
                let computed = expr.eval(raw as f64);
                if computed.is_finite() {
                    computed
                } else {
                    scaled
                }
            }
            None => scaled,
        }
    }
}
