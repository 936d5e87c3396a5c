//! Peak detection on the PPG gradient
//!
//! Beats show up as local maxima in the first derivative of the filtered,
//! standardized PPG. The detector implements prominence and minimum-distance
//! suppression explicitly so that tie-breaking is reproducible bit for bit:
//! when two candidates are too close, the taller one wins, and equal heights
//! fall back to the earlier index.

use std::cmp::Ordering;

/// First derivative with central differences, one-sided at the boundaries.
///
/// Unit sample spacing; callers working in seconds scale by the sampling
/// rate themselves.
pub fn gradient(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = Vec::with_capacity(n);
            out.push(signal[1] - signal[0]);
            for i in 1..n - 1 {
                out.push((signal[i + 1] - signal[i - 1]) / 2.0);
            }
            out.push(signal[n - 1] - signal[n - 2]);
            out
        }
    }
}

/// Find local maxima subject to minimum spacing and minimum prominence.
///
/// A sample is a candidate when it is strictly higher than both neighbors;
/// boundary samples never qualify. Prominence is measured as the smaller of
/// the two drops from the peak to the lowest point reached while scanning
/// outward, stopping at the first value greater than or equal to the peak or
/// at the sequence boundary. Surviving candidates closer than
/// `min_distance_samples` are thinned by keeping the higher peak.
///
/// Returns indices in increasing order; an empty result is valid.
pub fn find_peaks(signal: &[f64], min_distance_samples: usize, min_prominence: f64) -> Vec<usize> {
    if signal.len() < 3 {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = (1..signal.len() - 1)
        .filter(|&i| signal[i] > signal[i - 1] && signal[i] > signal[i + 1])
        .collect();
    candidates.retain(|&i| prominence(signal, i) >= min_prominence);

    if candidates.len() < 2 || min_distance_samples < 2 {
        return candidates;
    }

    // Thin in priority order: taller first, earlier index on equal height.
    // Each survivor removes every lower-priority candidate within range, so
    // one pass settles the spacing constraint.
    let mut priority: Vec<usize> = (0..candidates.len()).collect();
    priority.sort_by(|&i, &j| {
        match signal[candidates[j]].total_cmp(&signal[candidates[i]]) {
            Ordering::Equal => candidates[i].cmp(&candidates[j]),
            unequal => unequal,
        }
    });

    let mut keep = vec![true; candidates.len()];
    for &i in &priority {
        if !keep[i] {
            continue;
        }
        for j in 0..candidates.len() {
            if j != i && keep[j] && candidates[i].abs_diff(candidates[j]) < min_distance_samples {
                keep[j] = false;
            }
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(index, kept)| kept.then_some(index))
        .collect()
}

fn prominence(signal: &[f64], peak: usize) -> f64 {
    let height = signal[peak];

    let mut left_min = height;
    let mut i = peak;
    while i > 0 {
        i -= 1;
        if signal[i] >= height {
            break;
        }
        left_min = left_min.min(signal[i]);
    }

    let mut right_min = height;
    let mut i = peak;
    while i + 1 < signal.len() {
        i += 1;
        if signal[i] >= height {
            break;
        }
        right_min = right_min.min(signal[i]);
    }

    (height - left_min).min(height - right_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gradient_central_differences() {
        assert_eq!(gradient(&[0.0, 1.0, 4.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(gradient(&[5.0]), vec![0.0]);
        assert!(gradient(&[]).is_empty());
    }

    #[test]
    fn test_simple_peaks() {
        let signal = [0.0, 1.0, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&signal, 1, 0.5), vec![1, 3]);
    }

    #[test]
    fn test_boundaries_never_qualify() {
        // Monotonic ramps have their extremes at the boundaries only.
        assert!(find_peaks(&[0.0, 1.0, 2.0, 3.0], 1, 0.0).is_empty());
        assert!(find_peaks(&[3.0, 2.0, 1.0, 0.0], 1, 0.0).is_empty());
    }

    #[test]
    fn test_prominence_filters_ripple() {
        // A shallow wiggle riding a tall peak: the wiggle's drop on the left
        // side is only 0.1, so it falls below a 0.5 prominence floor.
        let signal = [0.0, 3.0, 2.6, 2.7, 0.0];
        assert_eq!(find_peaks(&signal, 1, 0.5), vec![1]);
        let all = find_peaks(&signal, 1, 0.05);
        assert_eq!(all, vec![1, 3]);
    }

    #[test]
    fn test_distance_keeps_taller_peak() {
        let signal = [0.0, 1.0, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&signal, 3, 0.5), vec![3]);
    }

    #[test]
    fn test_distance_tie_keeps_earlier_index() {
        let signal = [0.0, 5.0, 0.0, 5.0, 0.0];
        assert_eq!(find_peaks(&signal, 3, 0.5), vec![1]);
    }

    #[test]
    fn test_spacing_property_holds() {
        let signal: Vec<f64> = (0..400)
            .map(|i| (i as f64 * 0.23).sin() + 0.4 * (i as f64 * 0.71).sin())
            .collect();
        for distance in [2usize, 10, 25, 60] {
            let peaks = find_peaks(&signal, distance, 0.05);
            for pair in peaks.windows(2) {
                assert!(
                    pair[1] - pair[0] >= distance,
                    "peaks {} and {} violate spacing {}",
                    pair[0],
                    pair[1],
                    distance
                );
            }
        }
    }

    #[test]
    fn test_empty_result_is_valid() {
        assert!(find_peaks(&[0.0; 50], 10, 0.1).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 1, 0.0).is_empty());
    }
}
