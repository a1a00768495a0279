//! Last-known-value signal state
//!
//! The decoder library is stateless; the monitor owns the accumulating
//! snapshot of every configured signal's most recent value. Ordered so CSV
//! columns and dashboard iteration are deterministic.

use can_signal_decoder::{Configuration, DecodedSignals};
use std::collections::BTreeMap;

/// Accumulated snapshot: signal name -> last decoded value
#[derive(Debug, Clone)]
pub struct SignalState {
    values: BTreeMap<String, Option<f64>>,
}

impl SignalState {
    /// Seed the snapshot with every signal name in the configuration,
    /// all unknown until a frame carries them
    pub fn new(config: &Configuration) -> SignalState {
        let values = config
            .signal_names()
            .into_iter()
            .map(|name| (name, None))
            .collect();
        SignalState { values }
    }

    /// Merge one frame's decoded signals into the snapshot
    pub fn apply(&mut self, decoded: &DecodedSignals) {
        for (name, value) in decoded {
            self.values.insert(name.clone(), Some(*value));
        }
    }

    /// Last known value for a signal, if any frame has carried it yet
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// First known value among several candidate signal names
    pub fn first_of(&self, names: &[String]) -> Option<f64> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Signal names in column order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Values in the same order as [`Self::names`]
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Configuration {
        Configuration::from_json(
            r#"{
                "0x100": {"signals": {"speed_kph": {"start": 0, "length": 2, "scale": 0.01}}},
                "0x200": {"signals": {"gear": {"bits": [4, 4]}}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_state_seeded_from_config() {
        let state = SignalState::new(&test_config());
        let names: Vec<&str> = state.names().collect();
        assert_eq!(names, vec!["gear", "speed_kph"]);
        assert_eq!(state.get("speed_kph"), None);
        assert_eq!(state.get("unconfigured"), None);
    }

    #[test]
    fn test_apply_merges_latest_values() {
        let mut state = SignalState::new(&test_config());

        let mut decoded = DecodedSignals::new();
        decoded.insert("speed_kph".to_string(), 42.5);
        state.apply(&decoded);

        assert_eq!(state.get("speed_kph"), Some(42.5));
        assert_eq!(state.get("gear"), None);

        decoded.insert("speed_kph".to_string(), 50.0);
        state.apply(&decoded);
        assert_eq!(state.get("speed_kph"), Some(50.0));
    }

    #[test]
    fn test_first_of_falls_back_in_order() {
        let mut state = SignalState::new(&test_config());
        let names = vec!["missing".to_string(), "gear".to_string()];
        assert_eq!(state.first_of(&names), None);

        let mut decoded = DecodedSignals::new();
        decoded.insert("gear".to_string(), 3.0);
        state.apply(&decoded);
        assert_eq!(state.first_of(&names), Some(3.0));
    }
}
