//! Single-line console dashboard
//!
//! Rewrites one status line in place (carriage return, no newline) at a
//! fixed refresh period, so the terminal reads like a live instrument
//! cluster while the CSV log captures every frame.

use crate::config::{DashboardConfig, DashboardItem};
use crate::state::SignalState;
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub struct Dashboard {
    items: Vec<DashboardItem>,
    period: Duration,
    last_render: Option<Instant>,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Dashboard {
        Dashboard {
            items: config.items.clone(),
            period: Duration::from_millis(config.refresh_ms),
            last_render: None,
        }
    }

    /// Redraw the status line if the refresh period has elapsed
    pub fn refresh(&mut self, state: &SignalState) {
        let now = Instant::now();
        if let Some(last) = self.last_render {
            if now.duration_since(last) < self.period {
                return;
            }
        }
        self.last_render = Some(now);

        print!("\r{}", self.render(state));
        let _ = io::stdout().flush();
    }

    fn render(&self, state: &SignalState) -> String {
        let parts: Vec<String> = self.items.iter().map(|item| item.format(state)).collect();
        parts.join(" | ")
    }
}
