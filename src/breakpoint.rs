use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::settings::DefaultSizes;

/// Pixel height of one grid row in the rendered dashboard.
pub const ROW_HEIGHT_PX: u16 = 16;

/// Responsive tier labels, widest viewport first.
///
/// The ordering here drives `BTreeMap` iteration over layouts, so tests and
/// the wire encoding see breakpoints in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointKey {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl BreakpointKey {
    pub const ALL: [BreakpointKey; 5] = [
        BreakpointKey::Lg,
        BreakpointKey::Md,
        BreakpointKey::Sm,
        BreakpointKey::Xs,
        BreakpointKey::Xxs,
    ];

    /// Column count for this tier. Static configuration, never persisted
    /// per user.
    pub const fn columns(self) -> u16 {
        match self {
            BreakpointKey::Lg => 48,
            BreakpointKey::Md => 40,
            BreakpointKey::Sm => 24,
            BreakpointKey::Xs => 16,
            BreakpointKey::Xxs => 12,
        }
    }

    /// Minimum viewport width (px) at which this tier activates.
    pub const fn min_width(self) -> u32 {
        match self {
            BreakpointKey::Lg => 1280,
            BreakpointKey::Md => 1024,
            BreakpointKey::Sm => 768,
            BreakpointKey::Xs => 480,
            BreakpointKey::Xxs => 0,
        }
    }

    /// Widest tier whose threshold the viewport clears.
    pub fn for_width(viewport_px: u32) -> BreakpointKey {
        Self::ALL
            .into_iter()
            .find(|key| viewport_px >= key.min_width())
            .unwrap_or(BreakpointKey::Xxs)
    }

    pub const fn label(self) -> &'static str {
        match self {
            BreakpointKey::Lg => "lg",
            BreakpointKey::Md => "md",
            BreakpointKey::Sm => "sm",
            BreakpointKey::Xs => "xs",
            BreakpointKey::Xxs => "xxs",
        }
    }
}

impl fmt::Display for BreakpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Placement profile for one responsive tier: the column budget plus the
/// default size auto-placed charts take at this tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub key: BreakpointKey,
    pub columns: u16,
    pub default_size: Size,
}

impl Breakpoint {
    pub const fn new(key: BreakpointKey, columns: u16, default_size: Size) -> Self {
        Self {
            key,
            columns,
            default_size,
        }
    }

    /// The five-tier profile set built from the static column table and the
    /// user's per-tier default chart sizes.
    pub fn standard(sizes: &DefaultSizes) -> Vec<Breakpoint> {
        BreakpointKey::ALL
            .into_iter()
            .map(|key| Breakpoint::new(key, key.columns(), sizes.get(key)))
            .collect()
    }
}
