//! Order statistics and peak helpers for short analysis windows

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Median by in-place partition selection
///
/// Reorders `values`. Runs in expected linear time: each round picks a
/// median-of-three pivot, partitions the active range around it and keeps
/// only the side holding the middle index. For even lengths the lower of the
/// two middle elements is returned. Returns 0.0 for an empty slice.
pub fn median_select(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut low = 0;
    let mut high = values.len() - 1;
    let median = (low + high) / 2;

    loop {
        if high <= low {
            return values[median];
        }

        if high == low + 1 {
            if values[low] > values[high] {
                values.swap(low, high);
            }
            return values[median];
        }

        // Median of low, middle and high goes to `low`, with
        // values[middle] <= values[low] <= values[high]
        let middle = (low + high) / 2;
        if values[middle] > values[high] {
            values.swap(middle, high);
        }
        if values[low] > values[high] {
            values.swap(low, high);
        }
        if values[middle] > values[low] {
            values.swap(middle, low);
        }

        // values[low + 1] <= pivot now bounds the downward scan
        values.swap(middle, low + 1);

        let pivot = values[low];
        let mut ll = low + 1;
        let mut hh = high;
        loop {
            ll += 1;
            while ll < high && pivot > values[ll] {
                ll += 1;
            }
            hh -= 1;
            while hh > low && values[hh] > pivot {
                hh -= 1;
            }
            if hh < ll {
                break;
            }
            values.swap(ll, hh);
        }

        values.swap(low, hh);

        if hh <= median {
            low = ll;
        }
        if hh >= median {
            high = hh - 1;
        }
    }
}

/// Median by full sort, the reference for [`median_select`]
///
/// Same convention: lower middle element for even lengths, 0.0 when empty.
pub fn median_sorted(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted[(sorted.len() - 1) / 2]
}

/// True when `values[pos]` is a strict, positive local maximum
///
/// The first and last positions are never peaks.
pub fn is_peak(values: &[f32], pos: usize) -> bool {
    if pos == 0 || pos + 1 >= values.len() {
        return false;
    }
    let center = values[pos];
    center > values[pos - 1] && center > values[pos + 1] && center > 0.0
}

/// Sub-sample peak position from a parabola through three neighbours
///
/// Returns `pos + 0.5·(left - right) / (left - 2·center + right)`. Boundary
/// positions and a flat neighbourhood (degenerate denominator) return `pos`
/// unchanged.
pub fn quadratic_peak_pos(values: &[f32], pos: usize) -> f32 {
    if pos == 0 || pos + 1 >= values.len() {
        return pos as f32;
    }

    let s0 = values[pos - 1];
    let s1 = values[pos];
    let s2 = values[pos + 1];
    let denom = s0 - 2.0 * s1 + s2;
    if denom.abs() < EPSILON {
        return pos as f32;
    }

    pos as f32 + 0.5 * (s0 - s2) / denom
}

/// Round half up: `floor(x + 0.5)`
pub fn round_half_up(x: f32) -> f32 {
    (x + 0.5).floor()
}
