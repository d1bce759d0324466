//! Shared formatting helpers for dashboard fields.
//!
//! Pure string functions only: no terminal commands, no layout lookups.
//! Widths are counted in `char`s.

/// Placeholder for a rate that could not be computed.
pub const UNAVAILABLE: &str = "-";

/// Format a per-second rate with one decimal, right-aligned in `width`.
///
/// Switches to `K`/`M` suffixes when the plain form would not fit, and renders
/// [`UNAVAILABLE`] for `None` so a missing sample never reads as `0.0`.
pub fn format_rate(rate: Option<f64>, width: usize) -> String {
    let Some(rate) = rate.filter(|r| r.is_finite()) else {
        return format!("{:>width$}", UNAVAILABLE);
    };
    let plain = format!("{:.1}", rate);
    let text = if plain.chars().count() <= width {
        plain
    } else if rate >= 1_000_000.0 {
        format!("{:.1}M", rate / 1_000_000.0)
    } else {
        format!("{:.1}K", rate / 1_000.0)
    };
    format!("{:>width$}", text)
}

/// Format a bytes-per-second rate as megabytes per second.
pub fn format_mb_rate(bytes_per_sec: Option<f64>, width: usize) -> String {
    format_rate(bytes_per_sec.map(|b| b / 1024.0 / 1024.0), width)
}

/// Format a whole-number percentage, right-aligned in `width`: `"45%"`.
pub fn format_percent(value: Option<f64>, width: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:>width$}", format!("{:.0}%", v)),
        None => format!("{:>width$}", UNAVAILABLE),
    }
}

/// Format a window share as a 4-column percentage: `" 50%"`, `"100%"`.
///
/// A clamped share renders `">100"` so it is not mistaken for an exact 100%.
pub fn format_share(percent: u64, clamped: bool) -> String {
    if clamped {
        ">100".to_string()
    } else {
        format!("{:>3}%", percent)
    }
}

/// Leftmost `width` characters of `text`.
pub fn clip(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncates `text` to `width`, marking the cut with `..`.
pub fn ellipsize(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(2);
    format!("{}..", clip(text, keep))
}

/// Pads `text` on the right with `fill` up to `width`, clipping if longer.
pub fn pad_right(text: &str, width: usize, fill: char) -> String {
    let mut out = clip(text, width).to_string();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(fill, width - len));
    out
}
