use crate::error::BoxPressError;

// The design-token scale uses rem lengths; the canvas works in pixels at the
// conventional 16px root font size.
const PX_PER_REM: f32 = 16.0;

/// Converts a design-token length ("1.5rem", "0.375rem", plain "2") to
/// pixels. Historical token data uses "," as a decimal separator and embeds
/// stray spaces; both are tolerated. Every value is scaled by the rem
/// multiplier, suffixed or not.
pub fn to_px(value: &str) -> f32 {
    let raw = value.trim();
    let raw = raw.strip_suffix("rem").unwrap_or(raw);
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            ' ' => {}
            ',' => cleaned.push('.'),
            _ => cleaned.push(ch),
        }
    }
    parse_leading_float(&cleaned) * PX_PER_REM
}

// Longest-numeric-prefix parse: "9999px" is 9999, garbage coasts to zero.
fn parse_leading_float(value: &str) -> f32 {
    let bytes = value.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    value[..end].parse::<f32>().unwrap_or(0.0)
}

/// Converts a 3- or 6-digit hex color (leading `#` optional) into three
/// channel intensities in 0..1. Anything else is corrupt theme data and
/// fails hard rather than painting a wrong color.
pub fn hex_to_intensity(hex: &str) -> Result<[f32; 3], BoxPressError> {
    let trimmed = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String = if trimmed.len() == 3 {
        trimmed.chars().flat_map(|c| [c, c]).collect()
    } else {
        trimmed.to_string()
    };
    if expanded.len() != 6 {
        return Err(BoxPressError::InvalidColorFormat(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| -> Result<f32, BoxPressError> {
        let byte = u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| BoxPressError::InvalidColorFormat(hex.to_string()))?;
        Ok(byte as f32 / 255.0)
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// The fixed spacing scale behind `p-*`/`m-*` tokens. Keys are the
/// documented scale steps; anything else is a miss the caller treats as a
/// no-op.
pub fn spacing_px(key: &str) -> Option<f32> {
    let value = match key {
        "0" => 0.0,
        "1" => 4.0,
        "2" => 8.0,
        "3" => 12.0,
        "4" => 16.0,
        "5" => 20.0,
        "6" => 24.0,
        "7" => 28.0,
        "8" => 32.0,
        "9" => 36.0,
        "10" => 40.0,
        "11" => 44.0,
        "12" => 48.0,
        "14" => 56.0,
        "16" => 64.0,
        "20" => 80.0,
        "24" => 96.0,
        "28" => 112.0,
        "32" => 128.0,
        "36" => 144.0,
        "40" => 160.0,
        "44" => 176.0,
        "48" => 192.0,
        "52" => 208.0,
        "56" => 224.0,
        "60" => 240.0,
        "64" => 256.0,
        "72" => 288.0,
        "80" => 320.0,
        "96" => 384.0,
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rem_lengths_scale_by_sixteen() {
        assert_eq!(to_px("1.5rem"), 24.0);
        assert_eq!(to_px("0.375rem"), 6.0);
        assert_eq!(to_px("1rem"), 16.0);
    }

    #[test]
    fn bare_numerals_scale_like_rem() {
        assert_eq!(to_px("2"), 32.0);
        assert_eq!(to_px("1"), 16.0);
    }

    #[test]
    fn numeric_noise_is_tolerated() {
        assert_eq!(to_px("1,5rem"), 24.0);
        assert_eq!(to_px(" 1 , 5 rem"), 24.0);
    }

    #[test]
    fn trailing_units_are_ignored_after_the_numeral() {
        assert_eq!(to_px("9999px"), 9999.0 * 16.0);
        assert_eq!(to_px("0px"), 0.0);
    }

    #[test]
    fn unparsable_lengths_coast_to_zero() {
        assert_eq!(to_px(""), 0.0);
        assert_eq!(to_px("auto"), 0.0);
    }

    #[test]
    fn hex_expands_three_digit_shorthand() {
        assert_eq!(hex_to_intensity("#fff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_intensity("#000000").unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(hex_to_intensity("abc").unwrap(), hex_to_intensity("#aabbcc").unwrap());
    }

    #[test]
    fn hex_rejects_other_lengths() {
        for bad in ["abcd", "#ab", "1234567", ""] {
            match hex_to_intensity(bad) {
                Err(BoxPressError::InvalidColorFormat(_)) => {}
                other => panic!("expected InvalidColorFormat for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn hex_rejects_non_hex_digits() {
        assert!(matches!(
            hex_to_intensity("#zzzzzz"),
            Err(BoxPressError::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn spacing_scale_matches_documented_steps() {
        let table = [
            ("0", 0.0),
            ("1", 4.0),
            ("2", 8.0),
            ("4", 16.0),
            ("8", 32.0),
            ("12", 48.0),
            ("14", 56.0),
            ("16", 64.0),
            ("20", 80.0),
            ("32", 128.0),
            ("64", 256.0),
            ("96", 384.0),
        ];
        for (key, expected) in table {
            assert_eq!(spacing_px(key), Some(expected), "key {key}");
        }
    }

    #[test]
    fn spacing_scale_misses_are_none() {
        for key in ["13", "15", "97", "100", "px", "", "-1"] {
            assert_eq!(spacing_px(key), None, "key {key}");
        }
    }
}
