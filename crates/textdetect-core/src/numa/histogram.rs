//! Histogram statistics for Numa
//!
//! Moments of a histogram and the Otsu-style bi-level split used by the
//! tile thresholder.
//!
//! All values are in the x-domain of the histogram, not bin indices.
//! The x-value for bin i is: `startx + i * deltax`

use super::Numa;
use crate::error::{Error, Result};

/// Statistics computed from a histogram
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistogramStats {
    /// Mean value (weighted average)
    pub mean: f32,
    /// Median value (50th percentile)
    pub median: f32,
    /// Mode value (most frequent)
    pub mode: f32,
    /// Variance
    pub variance: f32,
}

/// Result of splitting a histogram into two classes
///
/// `threshold` is the valley bin. The class statistics count the valley
/// in the lower class `[0, threshold]`; binarization at `threshold` marks
/// only values strictly below it, so valley pixels end up in the light
/// class of a two-level mask.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SplitDistribution {
    /// Valley bin of the split
    pub threshold: u32,
    /// Mean of the lower class (0 if the class is empty)
    pub mean_below: f32,
    /// Mean of the upper class (0 if the class is empty)
    pub mean_above: f32,
    /// Total count in the lower class
    pub sum_below: f32,
    /// Total count in the upper class
    pub sum_above: f32,
}

impl Numa {
    /// Get statistical measures from a histogram
    ///
    /// Returns `None` if the histogram is empty or has no mass.
    pub fn histogram_stats(&self, startx: f32, deltax: f32) -> Option<HistogramStats> {
        self.histogram_stats_on_interval(startx, deltax, 0, None)
    }

    /// Get histogram statistics on the bin interval `[ifirst, ilast]`
    ///
    /// `ilast = None` means the last bin. Returns `None` if the interval is
    /// empty or holds no mass.
    pub fn histogram_stats_on_interval(
        &self,
        startx: f32,
        deltax: f32,
        ifirst: usize,
        ilast: Option<usize>,
    ) -> Option<HistogramStats> {
        let n = self.len();
        if n == 0 || ifirst >= n {
            return None;
        }
        let ilast = ilast.unwrap_or(n - 1).min(n - 1);
        if ifirst > ilast {
            return None;
        }

        let bins = &self.as_slice()[ifirst..=ilast];
        let xval = |i: usize| startx as f64 + (ifirst + i) as f64 * deltax as f64;

        let mut sum = 0.0f64;
        let mut moment = 0.0f64;
        let mut moment2 = 0.0f64;
        for (i, &count) in bins.iter().enumerate() {
            let c = count as f64;
            let x = xval(i);
            sum += c;
            moment += c * x;
            moment2 += c * x * x;
        }
        if sum <= 0.0 {
            return None;
        }

        let mean = moment / sum;
        let variance = (moment2 / sum - mean * mean).max(0.0);

        let half = sum / 2.0;
        let mut cumulative = 0.0f64;
        let mut median = xval(bins.len() - 1);
        for (i, &count) in bins.iter().enumerate() {
            cumulative += count as f64;
            if cumulative >= half {
                median = xval(i);
                break;
            }
        }

        let mut mode_index = 0;
        for (i, &count) in bins.iter().enumerate() {
            if count > bins[mode_index] {
                mode_index = i;
            }
        }

        Some(HistogramStats {
            mean: mean as f32,
            median: median as f32,
            mode: xval(mode_index) as f32,
            variance: variance as f32,
        })
    }

    /// Variance of the histogram in the x-domain `startx + i * deltax`
    ///
    /// Returns `None` if the histogram holds no mass.
    pub fn variance(&self, startx: f32, deltax: f32) -> Option<f32> {
        self.histogram_stats(startx, deltax).map(|s| s.variance)
    }

    /// Split a histogram into two classes (Otsu-style).
    ///
    /// Every split index `i` (lower class `[0..=i]`) is scored by the
    /// normalized between-class separation. The first maximum is located,
    /// then the contiguous run of indices around it whose score stays within
    /// `score_fraction` of the maximum is scanned for the histogram valley:
    /// the index with the smallest count, lowest index on ties. That index
    /// is returned as the threshold.
    ///
    /// Typical `score_fraction` values are 0.01 for full-resolution tiles and
    /// 0.1 for subsampled images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the histogram has fewer than
    /// two bins, no mass, or `score_fraction` is outside `[0, 1]`.
    pub fn split_distribution(&self, score_fraction: f32) -> Result<SplitDistribution> {
        let n = self.len();
        if n <= 1 {
            return Err(Error::InvalidParameter(format!(
                "histogram needs at least 2 bins, got {}",
                n
            )));
        }
        if !(0.0..=1.0).contains(&score_fraction) {
            return Err(Error::InvalidParameter(format!(
                "score_fraction must be in [0, 1], got {}",
                score_fraction
            )));
        }
        let bins = self.as_slice();
        let sum: f64 = bins.iter().map(|&v| v as f64).sum();
        if sum <= 0.0 {
            return Err(Error::InvalidParameter(
                "histogram has no mass".to_string(),
            ));
        }

        let norm = 4.0 / ((n - 1) as f64 * (n - 1) as f64);
        let mut ave1_prev = 0.0f64;
        let mut ave2_prev = bins
            .iter()
            .enumerate()
            .map(|(i, &v)| i as f64 * v as f64)
            .sum::<f64>()
            / sum;
        let mut num1_prev = 0.0f64;
        let mut num2_prev = sum;

        let mut scores = Vec::with_capacity(n);
        let mut max_score = 0.0f64;
        let mut max_index = n / 2;
        for (i, &count) in bins.iter().enumerate() {
            let val = count as f64;
            let x = i as f64;
            let num1 = num1_prev + val;
            let ave1 = if num1 == 0.0 {
                ave1_prev
            } else {
                (num1_prev * ave1_prev + x * val) / num1
            };
            let num2 = num2_prev - val;
            let ave2 = if num2 == 0.0 {
                ave2_prev
            } else {
                (num2_prev * ave2_prev - x * val) / num2
            };
            let fract1 = num1 / sum;
            let score = norm * fract1 * (1.0 - fract1) * (ave2 - ave1) * (ave2 - ave1);
            scores.push(score);
            if score > max_score {
                max_score = score;
                max_index = i;
            }
            num1_prev = num1;
            num2_prev = num2;
            ave1_prev = ave1;
            ave2_prev = ave2;
        }

        let min_score = max_score * (1.0 - score_fraction as f64);
        let mut lo = max_index;
        while lo > 0 && scores[lo - 1] >= min_score {
            lo -= 1;
        }
        let mut hi = max_index;
        while hi + 1 < n && scores[hi + 1] >= min_score {
            hi += 1;
        }

        let mut best = lo;
        for i in lo + 1..=hi {
            if bins[i] < bins[best] {
                best = i;
            }
        }
        let sum_below = self.sum_on_interval(0, best).unwrap_or(0.0);
        let mean_below = self
            .histogram_stats_on_interval(0.0, 1.0, 0, Some(best))
            .map_or(0.0, |s| s.mean);
        let (sum_above, mean_above) = if best + 1 < n {
            (
                self.sum_on_interval(best + 1, n - 1).unwrap_or(0.0),
                self.histogram_stats_on_interval(0.0, 1.0, best + 1, None)
                    .map_or(0.0, |s| s.mean),
            )
        } else {
            (0.0, 0.0)
        };

        Ok(SplitDistribution {
            threshold: best as u32,
            mean_below,
            mean_above,
            sum_below,
            sum_above,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bimodal(low: usize, low_count: f32, high: usize, high_count: f32) -> Numa {
        let mut bins = vec![0.0f32; 256];
        bins[low] = low_count;
        bins[high] = high_count;
        Numa::from_vec(bins)
    }

    #[test]
    fn test_histogram_stats_two_spikes() {
        let na = bimodal(0, 50.0, 200, 50.0);
        let stats = na.histogram_stats(0.0, 1.0).unwrap();
        assert!((stats.mean - 100.0).abs() < 1e-4);
        assert!((stats.variance - 10000.0).abs() < 1e-2);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.mode, 0.0);
    }

    #[test]
    fn test_histogram_stats_empty() {
        let na = Numa::from_vec(vec![0.0; 256]);
        assert!(na.histogram_stats(0.0, 1.0).is_none());
        assert!(na.variance(0.0, 1.0).is_none());
        assert!(Numa::new().histogram_stats(0.0, 1.0).is_none());
    }

    #[test]
    fn test_histogram_stats_on_interval() {
        let na: Numa = [1.0, 1.0, 0.0, 4.0].into_iter().collect();
        let s = na.histogram_stats_on_interval(0.0, 1.0, 2, None).unwrap();
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.variance, 0.0);
        assert!(na.histogram_stats_on_interval(0.0, 1.0, 2, Some(2)).is_none());
    }

    #[test]
    fn test_stats_respect_x_domain() {
        let na: Numa = [2.0, 2.0].into_iter().collect();
        let s = na.histogram_stats(10.0, 2.0).unwrap();
        assert_eq!(s.mean, 11.0);
        assert_eq!(s.variance, 1.0);
    }

    #[test]
    fn test_split_two_spikes_lands_in_valley() {
        let na = bimodal(0, 100.0, 255, 900.0);
        let split = na.split_distribution(0.01).unwrap();
        // Every split between the spikes scores the same; the first empty
        // bin is the lowest valley.
        assert_eq!(split.threshold, 1);
        assert_eq!(split.sum_below, 100.0);
        assert_eq!(split.sum_above, 900.0);
        assert_eq!(split.mean_below, 0.0);
        assert_eq!(split.mean_above, 255.0);
    }

    #[test]
    fn test_split_uniform_histogram_is_degenerate() {
        let mut bins = vec![0.0f32; 256];
        bins[128] = 1024.0;
        let split = Numa::from_vec(bins).split_distribution(0.01).unwrap();
        // All scores are zero: the whole range qualifies and bin 0 is the
        // lowest empty bin.
        assert_eq!(split.threshold, 0);
        assert_eq!(split.sum_below, 0.0);
        assert_eq!(split.mean_below, 0.0);
        assert_eq!(split.sum_above, 1024.0);
        assert_eq!(split.mean_above, 128.0);
    }

    #[test]
    fn test_split_separates_gaussian_like_modes() {
        let mut bins = vec![0.0f32; 256];
        for (i, bin) in bins.iter_mut().enumerate() {
            let d1 = i as f32 - 60.0;
            let d2 = i as f32 - 190.0;
            *bin = 1000.0 * (-d1 * d1 / 200.0).exp() + 1000.0 * (-d2 * d2 / 200.0).exp();
        }
        let split = Numa::from_vec(bins).split_distribution(0.01).unwrap();
        assert!(split.threshold > 80 && split.threshold < 170);
        assert!((split.mean_below - 60.0).abs() < 2.0);
        assert!((split.mean_above - 190.0).abs() < 2.0);
    }

    #[test]
    fn test_split_counts_populated_valley_in_lower_class() {
        // Two equal spikes over a floor of 2 per level, with a single
        // count at 127 as the only minimum near the center
        let mut bins = vec![2.0f32; 256];
        bins[127] = 1.0;
        bins[40] += 768.0;
        bins[215] += 767.0;
        let na = Numa::from_vec(bins);
        let split = na.split_distribution(0.01).unwrap();
        assert_eq!(split.threshold, 127);
        assert_eq!(split.sum_below, na.sum_on_interval(0, 127).unwrap());
        assert_eq!(split.sum_above, na.sum_on_interval(128, 255).unwrap());
        assert_eq!(split.sum_below, 127.0 * 2.0 + 1.0 + 768.0);
    }

    #[test]
    fn test_split_is_deterministic() {
        let na = bimodal(30, 10.0, 220, 40.0);
        let a = na.split_distribution(0.1).unwrap();
        let b = na.split_distribution(0.1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(Numa::from_slice(&[3.0]).split_distribution(0.01).is_err());
        assert!(Numa::from_vec(vec![0.0; 256]).split_distribution(0.01).is_err());
        assert!(bimodal(0, 1.0, 9, 1.0).split_distribution(1.5).is_err());
    }
}
