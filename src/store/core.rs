use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use blake3::Hash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::breakpoint::BreakpointKey;
use crate::geometry::Rect;
use crate::layout::{BoardLayout, ChartPayload, GridItem};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced while loading or saving a layout document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One item as exchanged with the backend: flat record with the payload
/// fields (`symbol`, `label`) spelled out and the id under `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ItemRecord {
    i: String,
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    symbol: String,
    label: String,
}

impl From<&GridItem> for ItemRecord {
    fn from(item: &GridItem) -> Self {
        Self {
            i: item.id.clone(),
            x: item.rect.x,
            y: item.rect.y,
            w: item.rect.width,
            h: item.rect.height,
            symbol: item.payload.symbol.clone(),
            label: item.payload.label.clone(),
        }
    }
}

impl From<ItemRecord> for GridItem {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.i,
            rect: Rect::new(record.x, record.y, record.w, record.h),
            payload: ChartPayload {
                symbol: record.symbol,
                label: record.label,
            },
        }
    }
}

type WireDocument = BTreeMap<BreakpointKey, Vec<ItemRecord>>;

/// Serialize a layout to the wire JSON document: breakpoint label to ordered
/// item records.
pub fn encode(layout: &BoardLayout) -> StoreResult<String> {
    let document: WireDocument = layout
        .iter()
        .map(|(key, items)| (key, items.iter().map(ItemRecord::from).collect()))
        .collect();
    Ok(serde_json::to_string(&document)?)
}

/// Parse a wire JSON document back into a layout.
pub fn decode(json: &str) -> StoreResult<BoardLayout> {
    let document: WireDocument = serde_json::from_str(json)?;
    let items = document
        .into_iter()
        .map(|(key, records)| (key, records.into_iter().map(GridItem::from).collect()))
        .collect();
    Ok(BoardLayout::from_parts(items))
}

/// Persistence boundary for one user's layout. `save` is an idempotent full
/// replace; `load` yields an empty layout when nothing was ever persisted.
pub trait LayoutStore {
    fn load(&self) -> StoreResult<BoardLayout>;
    fn save(&self, layout: &BoardLayout) -> StoreResult<()>;
}

/// In-process store used by tests and sessions without a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    saves: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls observed.
    pub fn save_count(&self) -> u64 {
        *self.saves.lock().expect("store mutex poisoned")
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self) -> StoreResult<BoardLayout> {
        let guard = self.slot.lock().expect("store mutex poisoned");
        match guard.as_deref() {
            Some(json) => decode(json),
            None => Ok(BoardLayout::new()),
        }
    }

    fn save(&self, layout: &BoardLayout) -> StoreResult<()> {
        let json = encode(layout)?;
        *self.slot.lock().expect("store mutex poisoned") = Some(json);
        *self.saves.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }
}

/// Whole-file JSON store. Each save truncates and rewrites the document,
/// except when the content hash matches the previous save, in which case the
/// write is skipped entirely.
pub struct JsonFileStore {
    path: PathBuf,
    last_hash: Mutex<Option<Hash>>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last_hash: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, json: &str) -> StoreResult<()> {
        let file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl LayoutStore for JsonFileStore {
    fn load(&self) -> StoreResult<BoardLayout> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => decode(&json),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BoardLayout::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, layout: &BoardLayout) -> StoreResult<()> {
        let json = encode(layout)?;
        let hash = blake3::hash(json.as_bytes());
        let mut guard = self.last_hash.lock().expect("store mutex poisoned");
        if guard.map(|last| last == hash).unwrap_or(false) {
            return Ok(());
        }
        self.write_document(&json)?;
        *guard = Some(hash);
        Ok(())
    }
}
