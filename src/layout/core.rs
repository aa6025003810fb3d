use std::collections::{BTreeMap, BTreeSet};

use crate::breakpoint::{Breakpoint, BreakpointKey};
use crate::error::{BoardError, Result};
use crate::geometry::Rect;
use crate::layout::placement::find_free_position;

/// Opaque stable identity for a chart. Unique within a layout, assigned at
/// creation, never reused.
pub type ItemId = String;

/// Data carried alongside an item's geometry. Placement never reads it; it
/// must survive every geometric operation unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPayload {
    pub symbol: String,
    pub label: String,
}

impl ChartPayload {
    pub fn new(symbol: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
        }
    }
}

/// One placed chart at one breakpoint: identity, geometry, payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    pub id: ItemId,
    pub rect: Rect,
    pub payload: ChartPayload,
}

/// A logical chart awaiting placement. The caller assigns the id; geometry
/// is computed per breakpoint when the batch is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChart {
    pub id: ItemId,
    pub payload: ChartPayload,
}

impl NewChart {
    pub fn new(id: impl Into<ItemId>, payload: ChartPayload) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// One entry of the interactive drag/resize stream: new geometry for an
/// already-placed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryUpdate {
    pub id: ItemId,
    pub rect: Rect,
}

impl GeometryUpdate {
    pub fn new(id: impl Into<ItemId>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

/// The full dashboard arrangement: per-breakpoint item lists sharing one id
/// set. Every chart appears in every breakpoint's list with the same id and
/// payload but independent geometry.
///
/// All mutation goes through [`add_items`](Self::add_items),
/// [`apply_geometry_updates`](Self::apply_geometry_updates), and
/// [`remove_item`](Self::remove_item); each is a deterministic in-memory
/// operation with no I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    items: BTreeMap<BreakpointKey, Vec<GridItem>>,
}

impl BoardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(items: BTreeMap<BreakpointKey, Vec<GridItem>>) -> Self {
        Self { items }
    }

    /// Items at one breakpoint, in insertion order. Empty when the
    /// breakpoint has never been touched.
    pub fn items(&self, key: BreakpointKey) -> &[GridItem] {
        self.items.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Breakpoints that currently carry an item list, in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (BreakpointKey, &[GridItem])> {
        self.items.iter().map(|(key, list)| (*key, list.as_slice()))
    }

    /// Union of ids across every breakpoint, sorted.
    pub fn ids(&self) -> BTreeSet<ItemId> {
        self.items
            .values()
            .flatten()
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items
            .values()
            .flatten()
            .any(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(Vec::is_empty)
    }

    /// Number of charts on the board: the largest per-breakpoint list. The
    /// coordinator keeps the lists in lockstep, so this is the chart count
    /// the entitlement ceiling compares against.
    pub fn chart_count(&self) -> usize {
        self.items.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Place a batch of new charts at every given breakpoint.
    ///
    /// Each breakpoint is solved independently with its own column budget
    /// and default size, but every chart keeps one id and payload across all
    /// of them. Within the batch, placement respects caller order: each
    /// chart joins the occupancy snapshot before the next one searches, so
    /// charts in one batch never collide with each other.
    ///
    /// An empty batch is a no-op. A duplicate id, either within the batch or
    /// against an item already on the board, fails with
    /// [`BoardError::DuplicateIdentity`] before anything is mutated.
    pub fn add_items(&mut self, new_items: &[NewChart], breakpoints: &[Breakpoint]) -> Result<()> {
        if new_items.is_empty() {
            return Ok(());
        }

        let mut batch_ids = BTreeSet::new();
        for chart in new_items {
            if !batch_ids.insert(chart.id.as_str()) || self.contains(&chart.id) {
                return Err(BoardError::DuplicateIdentity(chart.id.clone()));
            }
        }
        for profile in breakpoints {
            if profile.default_size.width == 0 || profile.default_size.height == 0 {
                return Err(BoardError::InvalidDimensions {
                    width: profile.default_size.width,
                    height: profile.default_size.height,
                });
            }
        }

        for profile in breakpoints {
            let list = self.items.entry(profile.key).or_default();
            let mut occupied: Vec<Rect> = list.iter().map(|item| item.rect).collect();
            for chart in new_items {
                let rect = find_free_position(&occupied, profile.default_size, profile.columns)?;
                occupied.push(rect);
                list.push(GridItem {
                    id: chart.id.clone(),
                    rect,
                    payload: chart.payload.clone(),
                });
            }
        }
        Ok(())
    }

    /// Apply committed drag/resize geometry for one breakpoint.
    ///
    /// Payloads are untouched and updates naming an unknown id are silently
    /// skipped; the interactive surface can emit stale ids across rerenders.
    /// No overlap re-validation happens here: the drag surface enforces
    /// collision rules live, and this call only records what it settled on.
    pub fn apply_geometry_updates(&mut self, key: BreakpointKey, updates: &[GeometryUpdate]) {
        let Some(list) = self.items.get_mut(&key) else {
            return;
        };
        for update in updates {
            if let Some(item) = list.iter_mut().find(|item| item.id == update.id) {
                item.rect = update.rect;
            }
        }
    }

    /// Remove an item from every breakpoint's list. Identity is
    /// cross-breakpoint, so a chart disappears everywhere at once. Unknown
    /// ids are a no-op.
    pub fn remove_item(&mut self, id: &str) {
        for list in self.items.values_mut() {
            list.retain(|item| item.id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::settings::DefaultSizes;

    fn chart(id: &str, symbol: &str) -> NewChart {
        NewChart::new(id, ChartPayload::new(symbol, symbol))
    }

    fn two_tier() -> Vec<Breakpoint> {
        vec![
            Breakpoint::new(BreakpointKey::Lg, 8, Size::new(4, 3)),
            Breakpoint::new(BreakpointKey::Sm, 4, Size::new(4, 3)),
        ]
    }

    fn assert_no_overlap(layout: &BoardLayout) {
        for (key, items) in layout.iter() {
            for (i, a) in items.iter().enumerate() {
                for b in &items[i + 1..] {
                    assert!(
                        !a.rect.overlaps(&b.rect),
                        "{} and {} overlap at {key}",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }

    #[test]
    fn batch_fills_wide_tier_side_by_side() {
        let mut layout = BoardLayout::new();
        layout
            .add_items(&[chart("a", "AAPL"), chart("b", "MSFT")], &two_tier())
            .unwrap();

        let lg = layout.items(BreakpointKey::Lg);
        assert_eq!(lg[0].rect, Rect::new(0, 0, 4, 3));
        assert_eq!(lg[1].rect, Rect::new(4, 0, 4, 3));

        // The narrow tier only fits one item per row.
        let sm = layout.items(BreakpointKey::Sm);
        assert_eq!(sm[0].rect, Rect::new(0, 0, 4, 3));
        assert_eq!(sm[1].rect, Rect::new(0, 3, 4, 3));
        assert_no_overlap(&layout);
    }

    #[test]
    fn every_breakpoint_carries_the_same_id_set() {
        let mut layout = BoardLayout::new();
        layout
            .add_items(&[chart("a", "AAPL"), chart("b", "MSFT")], &two_tier())
            .unwrap();
        layout.add_items(&[chart("c", "NVDA")], &two_tier()).unwrap();

        let lg_ids: BTreeSet<_> = layout
            .items(BreakpointKey::Lg)
            .iter()
            .map(|item| item.id.clone())
            .collect();
        let sm_ids: BTreeSet<_> = layout
            .items(BreakpointKey::Sm)
            .iter()
            .map(|item| item.id.clone())
            .collect();
        assert_eq!(lg_ids, sm_ids);
        assert_eq!(layout.chart_count(), 3);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        let before = layout.clone();
        layout.add_items(&[], &two_tier()).unwrap();
        assert_eq!(layout, before);
    }

    #[test]
    fn duplicate_id_in_batch_fails_without_mutating() {
        let mut layout = BoardLayout::new();
        let before = layout.clone();
        let err = layout
            .add_items(&[chart("a", "AAPL"), chart("a", "MSFT")], &two_tier())
            .unwrap_err();
        assert!(matches!(err, BoardError::DuplicateIdentity(id) if id == "a"));
        assert_eq!(layout, before);
    }

    #[test]
    fn id_colliding_with_existing_item_fails_without_mutating() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        let before = layout.clone();
        let err = layout
            .add_items(&[chart("b", "MSFT"), chart("a", "NVDA")], &two_tier())
            .unwrap_err();
        assert!(matches!(err, BoardError::DuplicateIdentity(id) if id == "a"));
        assert_eq!(layout, before);
    }

    #[test]
    fn geometry_update_changes_one_breakpoint_only() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        let sm_before = layout.items(BreakpointKey::Sm).to_vec();

        layout.apply_geometry_updates(
            BreakpointKey::Lg,
            &[GeometryUpdate::new("a", Rect::new(2, 5, 6, 4))],
        );

        assert_eq!(layout.items(BreakpointKey::Lg)[0].rect, Rect::new(2, 5, 6, 4));
        assert_eq!(layout.items(BreakpointKey::Sm), sm_before.as_slice());
    }

    #[test]
    fn geometry_update_preserves_payload() {
        let mut layout = BoardLayout::new();
        layout
            .add_items(
                &[NewChart::new("a", ChartPayload::new("FX:USDJPY", "USD/JPY"))],
                &two_tier(),
            )
            .unwrap();

        for turn in 0..3 {
            layout.apply_geometry_updates(
                BreakpointKey::Lg,
                &[GeometryUpdate::new("a", Rect::new(turn, turn, 4, 3))],
            );
        }

        let item = &layout.items(BreakpointKey::Lg)[0];
        assert_eq!(item.payload, ChartPayload::new("FX:USDJPY", "USD/JPY"));
    }

    #[test]
    fn stale_update_ids_are_ignored() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        let before = layout.clone();
        layout.apply_geometry_updates(
            BreakpointKey::Lg,
            &[GeometryUpdate::new("gone", Rect::new(0, 9, 4, 3))],
        );
        assert_eq!(layout, before);
    }

    #[test]
    fn removal_propagates_to_every_breakpoint() {
        let mut layout = BoardLayout::new();
        layout
            .add_items(&[chart("a", "AAPL"), chart("b", "MSFT")], &two_tier())
            .unwrap();
        layout.remove_item("a");

        assert!(!layout.contains("a"));
        for (_, items) in layout.iter() {
            assert!(items.iter().all(|item| item.id != "a"));
            assert_eq!(items.len(), 1);
        }
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        let before = layout.clone();
        layout.remove_item("never-existed");
        assert_eq!(layout, before);
    }

    #[test]
    fn freed_id_can_be_replaced_by_a_fresh_one() {
        let mut layout = BoardLayout::new();
        layout.add_items(&[chart("a", "AAPL")], &two_tier()).unwrap();
        layout.remove_item("a");
        layout.add_items(&[chart("a2", "AAPL")], &two_tier()).unwrap();

        assert!(!layout.contains("a"));
        assert!(layout.contains("a2"));
    }

    #[test]
    fn add_sequences_never_overlap() {
        let profiles = Breakpoint::standard(&DefaultSizes::default());
        let mut layout = BoardLayout::new();
        for round in 0..4 {
            let batch: Vec<NewChart> = (0..3)
                .map(|n| chart(&format!("r{round}n{n}"), "SYM"))
                .collect();
            layout.add_items(&batch, &profiles).unwrap();
            assert_no_overlap(&layout);
        }
        assert_eq!(layout.chart_count(), 12);
    }

    #[test]
    fn zero_default_size_is_rejected() {
        let mut layout = BoardLayout::new();
        let bad = vec![Breakpoint::new(BreakpointKey::Lg, 8, Size::new(0, 3))];
        let err = layout.add_items(&[chart("a", "AAPL")], &bad).unwrap_err();
        assert!(matches!(err, BoardError::InvalidDimensions { .. }));
        assert!(layout.is_empty());
    }
}
