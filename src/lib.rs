//! Responsive multi-breakpoint grid-layout engine for a chart dashboard.
//!
//! The crate models a dashboard as a [`BoardLayout`]: one item list per
//! responsive tier, every chart carrying the same id and payload at every
//! tier with independent geometry. New charts are auto-placed by a
//! deterministic topmost-leftmost scan ([`find_free_position`]), committed
//! drag/resize geometry and removals flow through the layout's mutation
//! methods, and a caller-driven [`SaveDebouncer`] batches persistence into a
//! [`LayoutStore`]. [`BoardSession`] ties the pieces together for one
//! authenticated user.

pub mod autosave;
pub mod breakpoint;
pub mod entitlement;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod session;
pub mod settings;
pub mod store;

pub use autosave::{DEFAULT_DEBOUNCE, SaveDebouncer};
pub use breakpoint::{Breakpoint, BreakpointKey, ROW_HEIGHT_PX};
pub use entitlement::{FREE_MAX_CHARTS, PREMIUM_MAX_CHARTS, Plan};
pub use error::{BoardError, Result};
pub use geometry::{Rect, Size};
pub use layout::{
    BoardLayout, ChartPayload, GeometryUpdate, GridItem, ItemId, NewChart, find_free_position,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{BoardMetrics, MetricSnapshot};
pub use session::BoardSession;
pub use settings::{ChartSettings, ChartStyle, DefaultSizes, Interval};
pub use store::{JsonFileStore, LayoutStore, MemoryStore, StoreError, StoreResult};
