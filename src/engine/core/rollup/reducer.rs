use std::fmt;

/// Per-field accumulation policy applied while folding records into a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    /// `field += value`
    Sum,
    /// `field = max(field, value)`, for totals reported cumulatively
    Max,
    /// `field = value`; the last record processed for the key wins
    OverwriteLast,
    /// `field = (field + value) / 2`. Weighs recent values far above early ones
    /// and halves the first contribution against the zeroed start.
    PairwiseAverage,
    /// Running `(sum, count)` mean over every contribution
    Mean,
    /// Min/max pair seeded by the first observation, exposed as `<target>.min` / `<target>.max`
    Range,
    /// Number of records that carried the source field
    Count,
    /// Text: keeps the first value seen
    Label,
    /// Text: keeps the last value seen
    LabelLast,
}

impl Reducer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reducer::Sum => "sum",
            Reducer::Max => "max",
            Reducer::OverwriteLast => "overwrite-last",
            Reducer::PairwiseAverage => "pairwise-average",
            Reducer::Mean => "mean",
            Reducer::Range => "range",
            Reducer::Count => "count",
            Reducer::Label => "label",
            Reducer::LabelLast => "label-last",
        }
    }

    /// True for reducers that keep a text label instead of a number.
    pub fn is_text(&self) -> bool {
        matches!(self, Reducer::Label | Reducer::LabelLast)
    }

    /// Folds `value` into `current` for the single-slot numeric reducers.
    /// Returns `None` for reducers that need more state than one number.
    #[inline]
    pub fn fold_number(&self, current: f64, value: f64) -> Option<f64> {
        match self {
            Reducer::Sum => Some(current + value),
            Reducer::Max => Some(current.max(value)),
            Reducer::OverwriteLast => Some(value),
            Reducer::PairwiseAverage => Some((current + value) / 2.0),
            _ => None,
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
