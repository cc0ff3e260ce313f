/// Lowest confidence of each weight class, best class first.
const WEIGHT_BINS: [(f64, u8); 3] = [(0.8, 0), (0.6, 1), (0.4, 2)];

/// Weight assigned to picks below every bin.
pub const LOWEST_QUALITY: u8 = 3;

/// Quality weight of a pick with the given detection confidence.
///
/// | confidence     | weight |
/// |----------------|--------|
/// | `>= 0.8`       |   0    |
/// | `[0.6, 0.8)`   |   1    |
/// | `[0.4, 0.6)`   |   2    |
/// | `< 0.4`        |   3    |
///
/// Lower weight means a more trusted pick. Values outside `[0, 1]` are binned
/// like any other value.
pub fn quality_weight(confidence: f64) -> u8 {
    WEIGHT_BINS
        .iter()
        .find(|(lower, _)| confidence >= *lower)
        .map(|(_, weight)| *weight)
        .unwrap_or(LOWEST_QUALITY)
}
