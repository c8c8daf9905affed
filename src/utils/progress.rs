// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Progress percentages reported by CDI, V2V conversion pods and VM imports.

/// Parses a progress percentage such as `"45"`, `"45.20%"` or `" 7 % "`.
///
/// The fractional part is truncated and the result clamped to `0..=100`.
/// Anything non-numeric (`"N/A"`, empty, NaN) yields 0.
pub fn parse(raw: &str) -> u8 {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn test_parse_accepts_percent_suffix_and_fraction() {
        assert_eq!(parse("45"), 45);
        assert_eq!(parse("45.70%"), 45);
        assert_eq!(parse(" 7 % "), 7);
        assert_eq!(parse("100.0%"), 100);
    }

    #[test]
    fn test_parse_clamps_out_of_range_values() {
        assert_eq!(parse("250"), 100);
        assert_eq!(parse("-3"), 0);
    }

    #[test]
    fn test_parse_malformed_is_zero() {
        assert_eq!(parse("N/A"), 0);
        assert_eq!(parse(""), 0);
        assert_eq!(parse("%"), 0);
        assert_eq!(parse("NaN"), 0);
        assert_eq!(parse("inf"), 0);
    }
}
