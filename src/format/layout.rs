//! Column width distribution.

use super::error::LayoutError;
use super::types::Column;

/// Narrowest width a proportional column may be given.
pub const MIN_PROPORTIONAL_WIDTH: i64 = 4;

/// Assign every column its effective `width` for a line `available`
/// characters wide.
///
/// Fixed columns keep their declared size. What is left is split between
/// proportional columns by factor; the last proportional column takes the
/// whole rounding remainder. Arithmetic saturates, so no width is ever
/// negative or wider than `available`.
pub fn layout(columns: &mut [Column], available: usize) -> Result<(), LayoutError> {
    let mut size_left = i64::try_from(available).unwrap_or(i64::MAX);
    let mut factors_sum: i64 = 0;
    let mut proportional: i64 = 0;
    let mut last_proportional = None;

    for (i, col) in columns.iter().enumerate() {
        if col.is_proportional() {
            factors_sum = factors_sum.saturating_add(to_signed(col.factor));
            proportional += 1;
            last_proportional = Some(i);
        } else {
            size_left = size_left.saturating_sub(to_signed(col.size));
        }
    }

    let needed = proportional * MIN_PROPORTIONAL_WIDTH;
    if size_left < needed {
        return Err(LayoutError::TerminalTooSmall {
            needed,
            available: size_left,
        });
    }

    let size_step = if factors_sum > 0 {
        size_left / factors_sum
    } else {
        0
    };

    for (i, col) in columns.iter_mut().enumerate() {
        if !col.is_proportional() {
            col.width = col.size;
        } else if Some(i) == last_proportional {
            col.width = to_width(size_left);
        } else {
            let width = size_step.saturating_mul(to_signed(col.factor)).min(size_left);
            col.width = to_width(width);
            size_left -= width;
        }
    }
    Ok(())
}

fn to_signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn to_width(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}
