/// Token-count statistics over a chunk corpus.
///
/// Computes descriptive statistics, a fixed-range histogram, percentile-based
/// outlier lists, and free-text recommendations driven by the configured
/// thresholds. Callers must supply a non-empty corpus; the loader guarantees
/// this.
use std::collections::HashMap;

use serde::Serialize;

use crate::config::Thresholds;
use crate::corpus::Corpus;

// ── Report structs ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TokenStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Percentile values computed by sorted-index truncation, not interpolation:
/// `sorted[len * p / 100]`, clamped to the last index.
#[derive(Debug, Serialize)]
pub struct Percentiles {
    pub p25: u64,
    pub p75: u64,
    pub p90: u64,
    pub p95: u64,
}

/// Histogram over fixed token-count ranges. Every chunk lands in exactly
/// one bucket.
#[derive(Debug, Default, Serialize)]
pub struct Distribution {
    #[serde(rename = "0-50")]
    pub range_0_50: usize,

    #[serde(rename = "51-100")]
    pub range_51_100: usize,

    #[serde(rename = "101-200")]
    pub range_101_200: usize,

    #[serde(rename = "201-500")]
    pub range_201_500: usize,

    #[serde(rename = "501-1000")]
    pub range_501_1000: usize,

    #[serde(rename = "1001+")]
    pub range_1001_plus: usize,
}

impl Distribution {
    fn record(&mut self, tokens: u64) {
        match tokens {
            0..=50 => self.range_0_50 += 1,
            51..=100 => self.range_51_100 += 1,
            101..=200 => self.range_101_200 += 1,
            201..=500 => self.range_201_500 += 1,
            501..=1000 => self.range_501_1000 += 1,
            _ => self.range_1001_plus += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.range_0_50
            + self.range_51_100
            + self.range_101_200
            + self.range_201_500
            + self.range_501_1000
            + self.range_1001_plus
    }
}

#[derive(Debug, Serialize)]
pub struct Outlier {
    pub id: String,
    pub file_path: String,
    pub language: String,
    pub token_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SizeReport {
    pub statistics: TokenStats,
    pub percentiles: Percentiles,
    pub distribution: Distribution,
    pub small_outliers: Vec<Outlier>,
    pub large_outliers: Vec<Outlier>,
    pub recommendations: Vec<String>,
}

// ── Analysis ─────────────────────────────────────────────────────────

/// Analyze the token-count distribution of a corpus.
#[must_use]
pub fn analyze(corpus: &Corpus, thresholds: &Thresholds) -> SizeReport {
    let mut sorted: Vec<u64> = corpus.chunks.iter().map(|c| c.token_count).collect();
    sorted.sort_unstable();

    let n = sorted.len();
    let mean = sorted.iter().sum::<u64>() as f64 / n as f64;
    let median = if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    };
    let std_dev = sample_std_dev(&sorted, mean);

    let statistics = TokenStats {
        count: n,
        min: sorted[0],
        max: sorted[n - 1],
        mean,
        median,
        std_dev,
    };

    let percentiles = Percentiles {
        p25: percentile(&sorted, 25),
        p75: percentile(&sorted, 75),
        p90: percentile(&sorted, 90),
        p95: percentile(&sorted, 95),
    };

    let mut distribution = Distribution::default();
    for chunk in &corpus.chunks {
        distribution.record(chunk.token_count);
    }

    // small = below half the 25th percentile, large = above the 95th
    let small_cutoff = percentiles.p25 as f64 / 2.0;
    let mut small_outliers = Vec::new();
    let mut large_outliers = Vec::new();
    for chunk in &corpus.chunks {
        if (chunk.token_count as f64) < small_cutoff {
            small_outliers.push(outlier_of(chunk));
        } else if chunk.token_count > percentiles.p95 {
            large_outliers.push(outlier_of(chunk));
        }
    }

    let recommendations = recommend(&statistics, &small_outliers, &large_outliers, thresholds);

    SizeReport {
        statistics,
        percentiles,
        distribution,
        small_outliers,
        large_outliers,
        recommendations,
    }
}

fn outlier_of(chunk: &crate::corpus::Chunk) -> Outlier {
    Outlier {
        id: chunk.id.clone(),
        file_path: chunk.file_path.clone(),
        language: chunk.language.clone(),
        token_count: chunk.token_count,
    }
}

fn recommend(
    stats: &TokenStats,
    small_outliers: &[Outlier],
    large_outliers: &[Outlier],
    thresholds: &Thresholds,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if stats.max as f64 > thresholds.max_median_ratio * stats.median {
        recommendations.push(format!(
            "Largest chunk ({} tokens) exceeds {:.0}x the median ({}); consider splitting oversized chunks",
            stats.max, thresholds.max_median_ratio, stats.median
        ));
    }

    let small_share = small_outliers.len() as f64 / stats.count as f64;
    if small_share > thresholds.small_share {
        recommendations.push(format!(
            "{:.1}% of chunks fall below half the 25th percentile; consider merging them with neighboring chunks",
            small_share * 100.0
        ));
    }

    if stats.mean > 0.0 {
        let variation = stats.std_dev / stats.mean;
        if variation > thresholds.variation_limit {
            recommendations.push(format!(
                "Token counts vary widely (coefficient of variation {variation:.2}); a more uniform chunking granularity may help"
            ));
        }
    }

    let mut by_language: HashMap<&str, usize> = HashMap::new();
    for outlier in large_outliers {
        *by_language.entry(outlier.language.as_str()).or_default() += 1;
    }
    let mut flagged: Vec<(&str, usize)> = by_language
        .into_iter()
        .filter(|&(_, count)| count > thresholds.language_outlier_limit)
        .collect();
    flagged.sort();
    for (language, count) in flagged {
        recommendations.push(format!(
            "Language '{language}' contributes {count} oversized chunks; review its chunking rules"
        ));
    }

    recommendations
}

// ── Numeric helpers ──────────────────────────────────────────────────

/// Percentile by index truncation over a sorted slice.
fn percentile(sorted: &[u64], pct: usize) -> u64 {
    let idx = (sorted.len() * pct / 100).min(sorted.len() - 1);
    sorted[idx]
}

/// Sample standard deviation; 0.0 for a single value.
fn sample_std_dev(values: &[u64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

// ── Tests ────────────────────────────────────────────────────────────
