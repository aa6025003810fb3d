//! Session state for one authenticated dashboard.
//!
//! The session is the explicit model half of the model/view split: it owns
//! the layout, the settings, the plan ceiling, and the persistence policy,
//! and exposes the three gestures the presentation layer produces (add a
//! batch of charts, commit drag/resize geometry, remove a chart). The
//! presentation layer re-renders from the returned state; it never mutates
//! the layout directly.

use std::time::Instant;

use serde_json::json;

use crate::autosave::SaveDebouncer;
use crate::breakpoint::{Breakpoint, BreakpointKey};
use crate::entitlement::Plan;
use crate::error::Result;
use crate::layout::{BoardLayout, GeometryUpdate, NewChart};
use crate::logging::{LogLevel, Logger, json_kv};
use crate::metrics::{BoardMetrics, MetricSnapshot};
use crate::settings::ChartSettings;
use crate::store::LayoutStore;

const LOG_TARGET: &str = "board.session";

pub struct BoardSession<S: LayoutStore> {
    layout: BoardLayout,
    settings: ChartSettings,
    plan: Plan,
    store: S,
    debouncer: SaveDebouncer,
    metrics: BoardMetrics,
    logger: Option<Logger>,
    started: Instant,
}

impl<S: LayoutStore> BoardSession<S> {
    /// Load the persisted layout (empty when none exists) and start a
    /// session around it.
    pub fn open(store: S, settings: ChartSettings, plan: Plan) -> Result<Self> {
        let layout = store.load()?;
        Ok(Self {
            layout,
            settings,
            plan,
            store,
            debouncer: SaveDebouncer::default(),
            metrics: BoardMetrics::new(),
            logger: None,
            started: Instant::now(),
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_debouncer(mut self, debouncer: SaveDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    /// Replace the settings record. Future placements pick up the new
    /// per-tier default sizes; existing geometry is untouched.
    pub fn update_settings(&mut self, settings: ChartSettings) {
        self.settings = settings;
        self.emit(LogLevel::Debug, "settings_updated", []);
    }

    /// The billing collaborator reported a plan change (checkout completed,
    /// subscription lapsed).
    pub fn update_plan(&mut self, plan: Plan) {
        self.plan = plan;
        self.emit(
            LogLevel::Info,
            "plan_updated",
            [json_kv("max_charts", json!(plan.max_charts()))],
        );
    }

    /// Place as many of `requests` as the plan ceiling admits, in caller
    /// order, across every responsive tier. Returns how many were admitted;
    /// the tail of the batch beyond the ceiling is dropped, matching the
    /// add-symbols dialog truncating its selection.
    pub fn add_charts(&mut self, requests: &[NewChart], now: Instant) -> Result<usize> {
        let admitted = self
            .plan
            .allowed_additions(self.layout.chart_count(), requests.len());
        if admitted == 0 {
            if !requests.is_empty() {
                self.emit(
                    LogLevel::Warn,
                    "chart_quota_reached",
                    [json_kv("max_charts", json!(self.plan.max_charts()))],
                );
            }
            return Ok(0);
        }

        let profiles = Breakpoint::standard(&self.settings.default_sizes);
        self.layout.add_items(&requests[..admitted], &profiles)?;
        self.metrics.record_added(admitted, profiles.len());
        self.mark_mutated(now);
        self.emit(
            LogLevel::Info,
            "charts_added",
            [
                json_kv("admitted", json!(admitted)),
                json_kv("requested", json!(requests.len())),
                json_kv("total", json!(self.layout.chart_count())),
            ],
        );
        Ok(admitted)
    }

    /// Commit a drag/resize gesture for one breakpoint.
    pub fn update_geometry(
        &mut self,
        key: BreakpointKey,
        updates: &[GeometryUpdate],
        now: Instant,
    ) {
        self.layout.apply_geometry_updates(key, updates);
        self.metrics.record_geometry_updates(updates.len());
        self.mark_mutated(now);
    }

    /// Remove a chart from every breakpoint.
    pub fn remove_chart(&mut self, id: &str, now: Instant) {
        if !self.layout.contains(id) {
            return;
        }
        self.layout.remove_item(id);
        self.metrics.record_removed();
        self.mark_mutated(now);
        self.emit(LogLevel::Info, "chart_removed", [json_kv("id", json!(id))]);
    }

    /// Drive the autosave policy. Persists a snapshot whose quiet window has
    /// elapsed; returns whether a save happened.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let Some(snapshot) = self.debouncer.poll(now) else {
            return Ok(false);
        };
        self.store.save(&snapshot)?;
        self.metrics.record_save();
        self.emit(
            LogLevel::Debug,
            "layout_saved",
            [json_kv("charts", json!(snapshot.chart_count()))],
        );
        Ok(true)
    }

    /// Flush any pending snapshot and hand back the store.
    pub fn close(mut self) -> Result<S> {
        if let Some(snapshot) = self.debouncer.flush() {
            self.store.save(&snapshot)?;
            self.metrics.record_save();
        }
        if let Some(logger) = &self.logger {
            let snapshot = self.metrics.snapshot(self.started.elapsed());
            let _ = logger.log_event(snapshot.to_log_event(LOG_TARGET));
        }
        Ok(self.store)
    }

    pub fn metrics_snapshot(&self) -> MetricSnapshot {
        self.metrics.snapshot(self.started.elapsed())
    }

    /// Hand the current layout to the debouncer. A snapshot matching the
    /// last persisted state is dropped there; count the skip so the
    /// metrics show how often the hash gate saved a write.
    fn mark_mutated(&mut self, now: Instant) {
        if !self.debouncer.note_mutation(&self.layout, now) {
            self.metrics.record_save_skipped();
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_with_fields(level, LOG_TARGET, message, fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::layout::ChartPayload;
    use crate::logging::MemorySink;
    use crate::store::MemoryStore;

    fn chart(id: &str) -> NewChart {
        NewChart::new(id, ChartPayload::new("SYM", "Sym"))
    }

    fn open_session(plan: Plan) -> BoardSession<MemoryStore> {
        BoardSession::open(MemoryStore::new(), ChartSettings::default(), plan).unwrap()
    }

    #[test]
    fn add_respects_plan_ceiling() {
        let mut session = open_session(Plan::None);
        let batch: Vec<NewChart> = (0..8).map(|n| chart(&format!("c{n}"))).collect();
        let admitted = session.add_charts(&batch, Instant::now()).unwrap();
        assert_eq!(admitted, 5);
        assert_eq!(session.layout().chart_count(), 5);
    }

    #[test]
    fn premium_plan_raises_the_ceiling() {
        let mut session = open_session(Plan::Lifetime);
        let batch: Vec<NewChart> = (0..8).map(|n| chart(&format!("c{n}"))).collect();
        let admitted = session.add_charts(&batch, Instant::now()).unwrap();
        assert_eq!(admitted, 8);
    }

    #[test]
    fn saves_are_debounced_until_quiet() {
        let mut session = open_session(Plan::None)
            .with_debouncer(SaveDebouncer::new(Duration::from_millis(200)));
        let start = Instant::now();

        session.add_charts(&[chart("a")], start).unwrap();
        assert!(!session.tick(start + Duration::from_millis(100)).unwrap());

        // A second gesture inside the window restarts it.
        session.remove_chart("a", start + Duration::from_millis(150));
        assert!(!session.tick(start + Duration::from_millis(250)).unwrap());
        assert!(session.tick(start + Duration::from_millis(400)).unwrap());

        let snapshot = session.metrics_snapshot();
        assert_eq!(snapshot.saves, 1);
    }

    #[test]
    fn recommitting_identical_geometry_skips_the_save() {
        let mut session = open_session(Plan::None)
            .with_debouncer(SaveDebouncer::new(Duration::from_millis(10)));
        let start = Instant::now();
        session.add_charts(&[chart("a")], start).unwrap();
        assert!(session.tick(start + Duration::from_millis(10)).unwrap());

        // Drag ends exactly where the item already sits: nothing to persist.
        let rect = session.layout().items(BreakpointKey::Lg)[0].rect;
        session.update_geometry(
            BreakpointKey::Lg,
            &[GeometryUpdate::new("a", rect)],
            start + Duration::from_millis(20),
        );

        assert!(!session.tick(start + Duration::from_millis(100)).unwrap());
        let snapshot = session.metrics_snapshot();
        assert_eq!(snapshot.saves, 1);
        assert_eq!(snapshot.saves_skipped, 1);
    }

    #[test]
    fn close_flushes_pending_snapshot() {
        let mut session = open_session(Plan::None);
        session.add_charts(&[chart("a")], Instant::now()).unwrap();
        let store = session.close().unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().chart_count(), 1);
    }

    #[test]
    fn reopened_session_sees_persisted_layout() {
        let mut session = open_session(Plan::None);
        session
            .add_charts(&[chart("a"), chart("b")], Instant::now())
            .unwrap();
        let store = session.close().unwrap();

        let reopened = BoardSession::open(store, ChartSettings::default(), Plan::None).unwrap();
        assert_eq!(reopened.layout().chart_count(), 2);
        assert!(reopened.layout().contains("a"));
    }

    #[test]
    fn geometry_updates_flow_through_to_the_store() {
        let mut session = open_session(Plan::None)
            .with_debouncer(SaveDebouncer::new(Duration::from_millis(10)));
        let start = Instant::now();
        session.add_charts(&[chart("a")], start).unwrap();
        session.update_geometry(
            BreakpointKey::Lg,
            &[GeometryUpdate::new("a", crate::geometry::Rect::new(4, 4, 10, 8))],
            start,
        );
        assert!(session.tick(start + Duration::from_millis(10)).unwrap());

        let store = session.close().unwrap();
        let persisted = store.load().unwrap();
        assert_eq!(
            persisted.items(BreakpointKey::Lg)[0].rect,
            crate::geometry::Rect::new(4, 4, 10, 8)
        );
    }

    #[test]
    fn quota_breach_is_logged() {
        let sink = Arc::new(MemorySink::new());
        let mut session = open_session(Plan::None).with_logger(Logger::new(sink.clone()));
        let batch: Vec<NewChart> = (0..5).map(|n| chart(&format!("c{n}"))).collect();
        session.add_charts(&batch, Instant::now()).unwrap();
        session.add_charts(&[chart("extra")], Instant::now()).unwrap();

        let events = sink.events();
        assert!(
            events
                .iter()
                .any(|event| event.message == "chart_quota_reached")
        );
    }

    #[test]
    fn removing_unknown_chart_changes_nothing() {
        let mut session = open_session(Plan::None);
        session.add_charts(&[chart("a")], Instant::now()).unwrap();
        let before = session.layout().clone();
        session.remove_chart("ghost", Instant::now());
        assert_eq!(session.layout(), &before);
        assert_eq!(session.metrics_snapshot().items_removed, 0);
    }
}
