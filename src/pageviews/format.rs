// src/pageviews/format.rs

/// Text shown while no count is known.
pub const PLACEHOLDER: &str = "-";

/// Compact view count: `950`, `1.5k+`, `12k+`.
pub fn format_view_count(count: u64) -> String {
    if count >= 10_000 {
        format!("{}k+", count / 1000)
    } else if count >= 1000 {
        let short = format!("{:.1}", count as f64 / 1000.0);
        let short = short.strip_suffix(".0").unwrap_or(&short);
        format!("{short}k+")
    } else {
        count.to_string()
    }
}
