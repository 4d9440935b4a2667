/**
Weights of the universal dependency relations, used to compute the weighted LAS. The weights can be
parsed from their text format: one `relation weight` pair per line, blank lines and lines starting
with `#` being ignored.
*/
use ahash::AHashMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Weight of the relations absent from the table.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Maps a dependency relation (without subtype) to its weight.
///
/// # Example
///
/// ```rust
/// use udeval::DeprelWeights;
///
/// let weights: DeprelWeights = "# weights\nnsubj 2\npunct 0.5\n".parse().unwrap();
/// assert_eq!(weights.weight("nsubj"), 2.0);
/// assert_eq!(weights.weight("punct"), 0.5);
/// assert_eq!(weights.weight("obj"), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeprelWeights(AHashMap<String, f64>);

impl DeprelWeights {
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the weight of a relation and returns its previous weight, if any.
    pub fn insert<S: Into<String>>(&mut self, deprel: S, weight: f64) -> Option<f64> {
        self.0.insert(deprel.into(), weight)
    }
    /// Weight of the relation, `DEFAULT_WEIGHT` if it is not in the table.
    pub fn weight(&self, deprel: &str) -> f64 {
        self.0.get(deprel).copied().unwrap_or(DEFAULT_WEIGHT)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for DeprelWeights {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FromStr for DeprelWeights {
    type Err = WeightsParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = Self::new();
        for (index, line) in s.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let columns: Vec<&str> = line.split_whitespace().collect();
            let [deprel, weight] = columns.as_slice() else {
                return Err(WeightsParsingError::ColumnCount {
                    line_number,
                    line: String::from(line),
                });
            };
            let weight = weight
                .parse::<f64>()
                .map_err(|_| WeightsParsingError::InvalidWeight {
                    line_number,
                    weight: String::from(*weight),
                })?;
            weights.insert(*deprel, weight);
        }
        Ok(weights)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when a line of a weights file cannot be parsed.
pub enum WeightsParsingError {
    /// The line is not made of exactly two whitespace-separated columns.
    ColumnCount { line_number: usize, line: String },
    /// The second column is not a number.
    InvalidWeight { line_number: usize, weight: String },
}

impl Display for WeightsParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { line_number, line } => write!(
                f,
                "Expected two columns in the UD Relations weights file on line {}: '{}'",
                line_number, line
            ),
            Self::InvalidWeight {
                line_number,
                weight,
            } => write!(
                f,
                "Could not parse the weight '{}' on line {} of the UD Relations weights file",
                weight, line_number
            ),
        }
    }
}

impl Error for WeightsParsingError {}
