//! Number formatting for bounds, labels and the cursor readout.
//!
//! Every string produced here only uses glyphs the bitmap fonts carry.

use std::f64::consts::PI;

/// Longest boundary label, in characters.
pub const LABEL_CHARS: usize = 4;
/// Longest cursor readout, in characters.
pub const READOUT_CHARS: usize = 8;

/// Nearest multiple of π when `value` is within `tolerance` of it.
fn pi_multiple(value: f64, tolerance: f64) -> Option<i64> {
    let ratio = value / PI;
    let nearest = ratio.round();
    ((ratio - nearest).abs() < tolerance).then_some(nearest as i64)
}

fn truncated(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text,
    }
}

/// Format a viewport bound for writing back into a text field.
///
/// Multiples of π stay symbolic so they survive a round trip through the
/// expression evaluator.
///
/// ```
/// use monoplot::format::format_bound;
///
/// assert_eq!(format_bound(std::f64::consts::PI), "pi");
/// assert_eq!(format_bound(-2.0 * std::f64::consts::PI), "-2*pi");
/// assert_eq!(format_bound(1.5), "1.50");
/// ```
pub fn format_bound(value: f64) -> String {
    match pi_multiple(value, 0.001) {
        Some(0) => "0".to_string(),
        Some(1) => "pi".to_string(),
        Some(-1) => "-pi".to_string(),
        Some(k) => format!("{k}*pi"),
        None => format!("{value:.2}"),
    }
}

/// Format a bound label drawn at the plot edge in the small font.
pub fn format_axis_label(value: f64) -> String {
    let magnitude = value.abs();
    let text = if value == 0.0 {
        "0".to_string()
    } else if magnitude > 99.0 {
        format!("{}", value as i64)
    } else if magnitude >= 1.0 {
        format!("{value:.1}")
    } else if magnitude >= 0.1 {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    };
    truncated(text, LABEL_CHARS)
}

/// Format one cursor coordinate behind a one-letter prefix.
///
/// Values near small multiples of π print as `3.14` or `{k}p`; the rest get
/// fewer decimals as they grow.
pub fn format_readout(value: f64, prefix: char) -> String {
    if let Some(k) = pi_multiple(value, 0.01).filter(|k| k.abs() < 10) {
        return match k {
            0 => format!("{prefix} 0"),
            1 => format!("{prefix} 3.14"),
            -1 => format!("{prefix}-3.14"),
            k => format!("{prefix}{k}p"),
        };
    }
    let magnitude = value.abs();
    let text = if magnitude < 0.01 {
        format!("{prefix} 0")
    } else if magnitude < 10.0 {
        format!("{prefix}{value:.2}")
    } else if magnitude < 100.0 {
        format!("{prefix}{value:.1}")
    } else {
        format!("{prefix}{}", value as i64)
    };
    truncated(text, READOUT_CHARS)
}

/// Readout shown when the function has no value at the cursor.
pub fn undefined_readout(prefix: char) -> String {
    format!("{prefix} undef")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(format_bound(0.0), "0");
        assert_eq!(format_bound(-PI), "-pi");
        assert_eq!(format_bound(3.0 * PI), "3*pi");
        assert_eq!(format_bound(-10.0), "-10.00");
        assert_eq!(format_bound(0.004), "0.00");
    }

    #[test]
    fn labels() {
        assert_eq!(format_axis_label(0.0), "0");
        assert_eq!(format_axis_label(-20.0), "-20.");
        assert_eq!(format_axis_label(150.7), "150");
        assert_eq!(format_axis_label(-1234.0), "-123");
        assert_eq!(format_axis_label(0.25), "0.25");
        assert_eq!(format_axis_label(0.05), "0");
    }

    #[test]
    fn readouts_near_pi() {
        assert_eq!(format_readout(PI, 'x'), "x 3.14");
        assert_eq!(format_readout(-PI * 1.001, 'x'), "x-3.14");
        assert_eq!(format_readout(2.0 * PI, 'x'), "x2p");
        assert_eq!(format_readout(-3.0 * PI, 'y'), "y-3p");
        assert_eq!(format_readout(0.02, 'x'), "x 0");
    }

    #[test]
    fn readouts_by_magnitude() {
        assert_eq!(format_readout(0.5, 'y'), "y0.50");
        assert_eq!(format_readout(-2.5, 'y'), "y-2.50");
        assert_eq!(format_readout(42.26, 'x'), "x42.3");
        assert_eq!(format_readout(-123456789.0, 'y'), "y-123456");
        assert_eq!(format_readout(40.0 * PI, 'x'), "x125");
        assert_eq!(undefined_readout('y'), "y undef");
    }
}
