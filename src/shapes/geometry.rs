//! Regular-polygon arithmetic.

use crate::{Error, ErrorContext, Result};

fn require_polygon(sides: u32) -> Result<()> {
    if sides < 3 {
        return Err(Error::validation_with_context(
            format!("a polygon needs at least 3 sides, got {}", sides),
            ErrorContext::new()
                .with_field_path("sides")
                .with_details("expected n >= 3"),
        ));
    }
    Ok(())
}

/// Number of diagonals of an n-gon: `n(n-3)/2`.
///
/// Computed in `u64`, which holds the result for every `u32` side count.
pub fn diagonals(sides: u32) -> Result<u64> {
    require_polygon(sides)?;
    let n = u64::from(sides);
    Ok(n * (n - 3) / 2)
}

/// Sum of interior angles in degrees: `(n-2)·180`.
pub fn interior_angle_sum(sides: u32) -> Result<u64> {
    require_polygon(sides)?;
    Ok((u64::from(sides) - 2) * 180)
}

/// Diagonals that can be drawn from one vertex: `n-3`.
pub fn diagonals_from_vertex(sides: u32) -> Result<u32> {
    require_polygon(sides)?;
    Ok(sides - 3)
}
