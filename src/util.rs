use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_cost(value: f64) -> String {
    const UNITS: [&str; 4] = ["", "k", "M", "B"];

    let mut scaled = value;
    let mut unit = 0usize;
    while scaled.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{scaled:.0}")
    } else {
        format!("{scaled:.1}{}", UNITS[unit])
    }
}

pub fn format_hours(hours: f64) -> String {
    if hours >= 8.0 * 5.0 {
        format!("{:.1}w", hours / 40.0)
    } else if hours >= 8.0 {
        format!("{:.1}d", hours / 8.0)
    } else {
        format!("{hours:.1}h")
    }
}

/// Deterministic pseudo-random pair in `[-1, 1]` derived from an id.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
