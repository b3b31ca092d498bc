//! Local-maximum detection with height, distance, prominence and width
//! filters, applied in that order.

use log::debug;

use crate::stats;

/// Detected local maximum and its topographic properties
#[derive(Debug, Clone, PartialEq)]
pub struct PeakCandidate {
    /// Sample index of the apex (plateau midpoint for flat tops)
    pub index: usize,
    /// Value at the apex
    pub height: f64,
    /// Height above the higher of the two surrounding bases
    pub prominence: f64,
    /// Index of the lowest point on the left before higher ground
    pub left_base: usize,
    /// Index of the lowest point on the right before higher ground
    pub right_base: usize,
    /// Width at half prominence, in samples
    pub width: f64,
}

/// Filters for [`find_peaks`]. `None` disables a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakParams {
    /// Minimum apex value
    pub min_height: Option<f64>,
    /// Minimum prominence
    pub min_prominence: Option<f64>,
    /// Minimum width at half prominence, in samples
    pub min_width: Option<f64>,
    /// Minimum apex separation in samples; taller peaks win
    pub distance: usize,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            min_height: None,
            min_prominence: None,
            min_width: None,
            distance: 1,
        }
    }
}

/// Find local maxima in `data`, sorted by index
pub fn find_peaks(data: &[f64], params: &PeakParams) -> Vec<PeakCandidate> {
    let mut maxima = local_maxima(data);

    if let Some(min_height) = params.min_height {
        maxima.retain(|&i| data[i] >= min_height);
    }

    if params.distance > 1 {
        maxima = select_by_distance(&maxima, data, params.distance);
    }

    let mut peaks: Vec<PeakCandidate> = maxima
        .into_iter()
        .map(|index| peak_properties(data, index))
        .collect();

    if let Some(min_prominence) = params.min_prominence {
        peaks.retain(|p| p.prominence >= min_prominence);
    }
    if let Some(min_width) = params.min_width {
        peaks.retain(|p| p.width >= min_width);
    }

    peaks
}

/// Strict local maxima and flat-topped plateaus (midpoint, rounded down).
/// Edges are never maxima.
fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if data.len() < 3 {
        return maxima;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }
            if data[ahead] < data[i] {
                let right = ahead - 1;
                maxima.push((i + right) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    maxima
}

/// Drop peaks closer than `distance` samples to a taller kept peak. Of two
/// equally tall peaks the later one is kept.
fn select_by_distance(maxima: &[usize], data: &[f64], distance: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..maxima.len()).collect();
    // Stable ascending sort, walked tallest first
    order.sort_by(|&a, &b| data[maxima[a]].total_cmp(&data[maxima[b]]));

    let mut keep = vec![true; maxima.len()];
    for &i in order.iter().rev() {
        if !keep[i] {
            continue;
        }
        let apex = maxima[i];
        for j in (0..i).rev() {
            if apex - maxima[j] >= distance {
                break;
            }
            keep[j] = false;
        }
        for j in i + 1..maxima.len() {
            if maxima[j] - apex >= distance {
                break;
            }
            keep[j] = false;
        }
    }

    maxima
        .iter()
        .zip(keep)
        .filter_map(|(&m, k)| k.then_some(m))
        .collect()
}

fn peak_properties(data: &[f64], index: usize) -> PeakCandidate {
    let height = data[index];

    let mut left_base = index;
    let mut left_min = height;
    let mut i = index;
    loop {
        if data[i] > height {
            break;
        }
        if data[i] < left_min {
            left_min = data[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_base = index;
    let mut right_min = height;
    for (j, &v) in data.iter().enumerate().skip(index) {
        if v > height {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = j;
        }
    }

    let prominence = height - left_min.max(right_min);
    let width = half_prominence_width(data, index, prominence, left_base, right_base);

    PeakCandidate {
        index,
        height,
        prominence,
        left_base,
        right_base,
        width,
    }
}

/// Width at `height - prominence / 2`, interpolated and bounded by the bases
fn half_prominence_width(
    data: &[f64],
    index: usize,
    prominence: f64,
    left_base: usize,
    right_base: usize,
) -> f64 {
    let level = data[index] - prominence * 0.5;

    let mut i = index;
    while left_base < i && level < data[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if data[i] < level {
        left_ip += (level - data[i]) / (data[i + 1] - data[i]);
    }

    let mut i = index;
    while i < right_base && level < data[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if data[i] < level {
        right_ip -= (level - data[i]) / (data[i - 1] - data[i]);
    }

    right_ip - left_ip
}

/// Apex index of the peak to integrate.
///
/// Peaks are searched with prominence `max(3 * std, 0.5% * max)`, height
/// `2 * std` and a separation of 3 samples; the candidate nearest
/// `target_time` wins. Without candidates the global maximum is used.
/// Returns `None` only for empty input.
pub fn locate_peak_maximum(times: &[f64], values: &[f64], target_time: f64) -> Option<usize> {
    let std = stats::std_dev(values);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let params = PeakParams {
        min_height: Some(2.0 * std),
        min_prominence: Some((3.0 * std).max(0.005 * max)),
        min_width: None,
        distance: 3,
    };

    let peaks = find_peaks(values, &params);
    if peaks.is_empty() {
        debug!("No peak candidates, using global maximum");
        return stats::argmax(values);
    }

    let apex_times: Vec<f64> = peaks.iter().map(|p| times[p.index]).collect();
    stats::argmin_abs_diff(&apex_times, target_time).map(|i| peaks[i].index)
}
