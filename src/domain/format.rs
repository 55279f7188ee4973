/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Numeric formatting helpers for report cells.

const UNITS: &[&str] = &["bytes", "KB", "MB", "GB", "TB"];
const THRESHOLD: f64 = 1024.0;

/// Convert a byte count to the largest readable unit.
///
/// Divides by 1024 through bytes -> KB -> MB -> GB -> TB and renders with
/// exactly one decimal digit. Values past the TB range stay in TB rather
/// than falling back to a raw number.
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= THRESHOLD && unit < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

/// Render the three load-average samples as percentages.
pub fn format_load(load: &[f64; 3]) -> String {
    format!("{:>6.2}% {:>6.2}% {:>6.2}%", load[0], load[1], load[2])
}

/// Render a total/free/used-percentage triple for a memory or disk pool.
pub fn format_pool(total: u64, free: u64, used_percent: f64) -> String {
    format!(
        "{:>10} {:>10} {:>6.1}%",
        format_bytes(total),
        format_bytes(free),
        used_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.0 bytes");
        assert_eq!(format_bytes(512), "512.0 bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(8 * 1024 * 1024), "8.0 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.0 GB");
        assert_eq!(format_bytes(2 * 1024_u64.pow(4)), "2.0 TB");
    }

    #[test]
    fn test_format_bytes_picks_smallest_fitting_unit() {
        // b / 1024^k must be < 1024 for the chosen unit
        assert_eq!(format_bytes(1023), "1023.0 bytes");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024 - 1), "1024.0 KB");
    }

    #[test]
    fn test_format_bytes_clamps_to_tb() {
        // Exabyte-scale inputs stay in TB instead of degrading to a raw
        // unitless number.
        assert_eq!(format_bytes(1024_u64.pow(6)), "1048576.0 TB");
        let rendered = format_bytes(u64::MAX);
        assert!(rendered.ends_with(" TB"));
    }

    #[test]
    fn test_format_load() {
        let rendered = format_load(&[1.25, 0.8, 0.5]);
        assert!(rendered.contains("1.25%"));
        assert!(rendered.contains("0.80%"));
        assert!(rendered.contains("0.50%"));
    }

    #[test]
    fn test_format_pool() {
        let rendered = format_pool(2 * 1024 * 1024 * 1024, 1024 * 1024 * 1024, 50.0);
        assert!(rendered.contains("2.0 GB"));
        assert!(rendered.contains("1.0 GB"));
        assert!(rendered.contains("50.0%"));
    }
}
