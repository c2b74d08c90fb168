//! Sample years shown in the projection table
//!
//! Short horizons are shown year by year. Longer horizons show the first three
//! years, then every fifth year, then the retirement year itself.

/// Horizons up to this many years are sampled densely
pub const DENSE_HORIZON_YEARS: i32 = 5;

/// Near-term years always shown for long horizons
const NEAR_TERM_YEARS: [u32; 3] = [1, 2, 3];

/// Step between sparse sample years
const SPARSE_STEP: i32 = 5;

/// Produce the year offsets (0 = today) at which the projection is evaluated.
///
/// `span` is `retirement_age - current_age`. A non-positive span yields `[0]`.
/// For `span > 5` the multiples of five stop at `5 * ((span - 1) / 5)`, which is
/// always below `span`, so the final offset is appended exactly once.
pub fn sample_timeframe(span: i32) -> Vec<u32> {
    let mut years = vec![0];

    if span <= DENSE_HORIZON_YEARS {
        years.extend((1..=span).map(|y| y as u32));
        return years;
    }

    years.extend_from_slice(&NEAR_TERM_YEARS);
    let multiples = (span - 1) / SPARSE_STEP;
    years.extend((1..=multiples).map(|k| (k * SPARSE_STEP) as u32));
    years.push(span as u32);

    years
}
