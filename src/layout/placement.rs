use crate::error::{BoardError, Result};
use crate::geometry::{Rect, Size};

/// Find the topmost, then leftmost position where a rectangle of `size` fits
/// without overlapping anything in `existing`, inside a grid `columns` cells
/// wide.
///
/// The scan is row-major: `y` ascends from `0` to one item-height past the
/// lowest occupied edge, and `x` ascends from `0` to the last column that
/// still fits the full width. The first free candidate wins, so two calls
/// with identical arguments always return the same slot. When `columns` is
/// narrower than the requested width only `x = 0` is considered; the search
/// still succeeds at the first free row.
///
/// Zero-sized requests are rejected rather than clamped; the caller asked
/// for a concrete chart size and silently shrinking it would be worse than
/// failing.
pub fn find_free_position(existing: &[Rect], size: Size, columns: u16) -> Result<Rect> {
    if size.width == 0 || size.height == 0 {
        return Err(BoardError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }

    let max_y = existing.iter().map(Rect::bottom).max().unwrap_or(0);
    let last_x = columns.saturating_sub(size.width);

    for y in 0..=max_y.saturating_add(size.height) {
        for x in 0..=last_x {
            let candidate = Rect::from_size(x, y, size);
            if existing.iter().all(|occupied| !candidate.overlaps(occupied)) {
                return Ok(candidate);
            }
        }
    }

    // The row at max_y is free by construction, so the scan above returns
    // before reaching here whenever columns >= width.
    Ok(Rect::from_size(0, max_y, size))
}
