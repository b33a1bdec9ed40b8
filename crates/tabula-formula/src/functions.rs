//! Aggregate functions over a single cell or a rectangular range

/// Built-in aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Sum,
    Average,
    Min,
    Max,
    Count,
}

impl Aggregate {
    /// Look up an aggregate by name (case-insensitive, Spanish aliases accepted)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" | "SUMA" => Some(Aggregate::Sum),
            "AVERAGE" | "AVG" | "PROMEDIO" => Some(Aggregate::Average),
            "MIN" => Some(Aggregate::Min),
            "MAX" => Some(Aggregate::Max),
            "COUNT" | "CONTAR" => Some(Aggregate::Count),
            _ => None,
        }
    }

    /// Canonical function name
    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Average => "AVERAGE",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Count => "COUNT",
        }
    }
}

/// Running totals for an aggregate over the cells of a range.
///
/// Stored cells are pushed one at a time; the empty remainder of the
/// rectangle is added in bulk as zeros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    sum: f64,
    min: f64,
    max: f64,
    len: u64,
    non_zero: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            len: 0,
            non_zero: 0,
        }
    }

    /// Add one coerced cell value
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.len += 1;
        if value != 0.0 {
            self.non_zero += 1;
        }
    }

    /// Add `count` empty cells, each read as `0`
    pub fn push_zeros(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        self.min = self.min.min(0.0);
        self.max = self.max.max(0.0);
        self.len += count;
    }

    /// Number of cells seen so far
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Result of `function` over every cell seen.
    ///
    /// AVERAGE divides by the number of cells, empties included; COUNT counts
    /// non-zero values. No cells at all gives `0`.
    pub fn finish(&self, function: Aggregate) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        match function {
            Aggregate::Sum => self.sum,
            Aggregate::Average => self.sum / self.len as f64,
            Aggregate::Min => self.min,
            Aggregate::Max => self.max,
            Aggregate::Count => self.non_zero as f64,
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `name` is the conditional function (`IF` or `SI`)
pub fn is_conditional(name: &str) -> bool {
    name.eq_ignore_ascii_case("IF") || name.eq_ignore_ascii_case("SI")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Aggregate::from_name("suma"), Some(Aggregate::Sum));
        assert_eq!(Aggregate::from_name("Promedio"), Some(Aggregate::Average));
        assert_eq!(Aggregate::from_name("AVG"), Some(Aggregate::Average));
        assert_eq!(Aggregate::from_name("contar"), Some(Aggregate::Count));
        assert_eq!(Aggregate::from_name("ABS"), None);
        assert!(is_conditional("si"));
        assert!(!is_conditional("IFS"));
    }

    fn accumulate(values: &[f64]) -> Accumulator {
        let mut acc = Accumulator::new();
        for value in values {
            acc.push(*value);
        }
        acc
    }

    #[test]
    fn test_finish() {
        let acc = accumulate(&[1.0, 0.0, 3.0, -2.0]);
        assert_eq!(acc.finish(Aggregate::Sum), 2.0);
        assert_eq!(acc.finish(Aggregate::Average), 0.5);
        assert_eq!(acc.finish(Aggregate::Min), -2.0);
        assert_eq!(acc.finish(Aggregate::Max), 3.0);
        assert_eq!(acc.finish(Aggregate::Count), 3.0);
    }

    #[test]
    fn test_empty_cells_count_as_zero() {
        let mut acc = accumulate(&[5.0, 7.0]);
        acc.push_zeros(2);
        assert_eq!(acc.len(), 4);
        assert_eq!(acc.finish(Aggregate::Min), 0.0);
        assert_eq!(acc.finish(Aggregate::Average), 3.0);
        assert_eq!(acc.finish(Aggregate::Count), 2.0);

        let mut negative = accumulate(&[-1.0]);
        negative.push_zeros(1);
        assert_eq!(negative.finish(Aggregate::Max), 0.0);
    }

    #[test]
    fn test_nothing_seen() {
        let mut acc = Accumulator::new();
        acc.push_zeros(0);
        assert!(acc.is_empty());
        assert_eq!(acc.finish(Aggregate::Min), 0.0);
        assert_eq!(acc.finish(Aggregate::Average), 0.0);
    }
}
