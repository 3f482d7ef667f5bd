use std::cmp::Ordering;

/// Numeric segments of a plain dotted release id (`1.20.4` -> `[1, 20, 4]`).
///
/// Returns `None` for snapshots, pre-releases and anything else that is not
/// purely digits separated by dots.
pub fn numeric_segments(version: &str) -> Option<Vec<u64>> {
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse::<u64>().ok()
            }
        })
        .collect()
}

/// Per-segment numeric comparison; a missing segment counts as zero,
/// so `1.21` and `1.21.0` compare equal.
pub fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Leading decimal digits of `segment`, the way a lenient integer parse
/// reads a build tag (`"72"` -> 72, `"3-beta"` -> 3, `"beta"` -> none).
pub fn leading_number(segment: &str) -> Option<u64> {
    let digits: &str = {
        let end = segment
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(segment.len());
        &segment[..end]
    };
    digits.parse().ok()
}
