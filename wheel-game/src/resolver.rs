//! Terminal angle to prize index.
//!
//! The pointer sits at the top of the wheel, 90° from the angle origin, and
//! slices are laid out clockwise from the origin, hence the `+ 90` offset and
//! the `360 − x` reversal.

use std::f64::consts::PI;

/// Width of one slice in radians, `2π / item_count`.
pub fn slice_arc(item_count: usize) -> f64 {
    PI * 2.0 / item_count as f64
}

/// Index of the slice under the pointer, `None` for an empty wheel or a
/// non-finite angle.
pub fn resolve_index(angle: f64, item_count: usize) -> Option<usize> {
    if item_count == 0 || !angle.is_finite() {
        return None;
    }

    let degrees = angle * 180.0 / PI + 90.0;
    let arcd = slice_arc(item_count) * 180.0 / PI;
    // `%` keeps the sign of `degrees`, so this lies in (0, 720)
    let index = ((360.0 - degrees % 360.0) / arcd).floor() as usize;

    Some(index % item_count)
}

/// Index and label of the winning slice.
pub fn resolve(angle: f64, items: &[String]) -> Option<(usize, &str)> {
    let index = resolve_index(angle, items.len())?;
    Some((index, items[index].as_str()))
}
