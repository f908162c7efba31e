use super::Counter;

/// Counter value at which a dispenser of `denomination` wraps.
///
/// Denominations outside the table return 0, meaning the roll is assumed to
/// never wrap.
pub fn roll_limit(denomination: f64) -> Counter {
    if denomination == 1.0 {
        250
    } else if denomination == 2.0 || denomination == 3.0 {
        150
    } else if denomination == 5.0 {
        75
    } else if denomination == 10.0 || denomination == 20.0 {
        25
    } else {
        0
    }
}
