use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Saturating counters for one dashboard session.
#[derive(Debug, Default, Clone)]
pub struct BoardMetrics {
    placements: u64,
    items_added: u64,
    items_removed: u64,
    geometry_updates: u64,
    saves: u64,
    saves_skipped: u64,
}

impl BoardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One batch of charts was placed: `count` logical items across
    /// `breakpoints` tiers.
    pub fn record_added(&mut self, count: usize, breakpoints: usize) {
        self.items_added = self.items_added.saturating_add(count as u64);
        self.placements = self
            .placements
            .saturating_add((count * breakpoints) as u64);
    }

    pub fn record_removed(&mut self) {
        self.items_removed = self.items_removed.saturating_add(1);
    }

    pub fn record_geometry_updates(&mut self, count: usize) {
        if count > 0 {
            self.geometry_updates = self.geometry_updates.saturating_add(count as u64);
        }
    }

    pub fn record_save(&mut self) {
        self.saves = self.saves.saturating_add(1);
    }

    pub fn record_save_skipped(&mut self) {
        self.saves_skipped = self.saves_skipped.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            placements: self.placements,
            items_added: self.items_added,
            items_removed: self.items_removed,
            geometry_updates: self.geometry_updates,
            saves: self.saves,
            saves_skipped: self.saves_skipped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub placements: u64,
    pub items_added: u64,
    pub items_removed: u64,
    pub geometry_updates: u64,
    pub saves: u64,
    pub saves_skipped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "board_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("items_added".to_string(), json!(self.items_added));
        map.insert("items_removed".to_string(), json!(self.items_removed));
        map.insert(
            "geometry_updates".to_string(),
            json!(self.geometry_updates),
        );
        map.insert("saves".to_string(), json!(self.saves));
        map.insert("saves_skipped".to_string(), json!(self.saves_skipped));
        map
    }
}
