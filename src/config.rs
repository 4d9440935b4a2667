/*
 * This modules contains some quality of life structs. Most importantly, it contains the
 * `EvaluationConfig` struct, which implements the default trait. This config can be passed to the
 * `evaluate_conf` function or the `evaluate_str` function to simplify their arguments.
*/
use crate::metrics::DEFAULT_CONTEXT_WIDTH;
use crate::weights::DeprelWeights;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq)]
/// Config struct used to simplify the inputs of parameters to the main functions of `udeval`. It
/// implements the default trait.
pub struct EvaluationConfig {
    /// Weights of the dependency relations. When they are given, the `WeightedLAS` metric is
    /// computed. Relations without a weight count for 1.
    deprel_weights: Option<DeprelWeights>,
    /// How many characters of each document are shown when the texts of the two documents
    /// differ.
    context_width: usize,
}

impl EvaluationConfig {
    pub fn new() -> Self {
        Self {
            deprel_weights: None,
            context_width: DEFAULT_CONTEXT_WIDTH,
        }
    }
    pub fn deprel_weights(&self) -> Option<&DeprelWeights> {
        self.deprel_weights.as_ref()
    }
    pub fn context_width(&self) -> usize {
        self.context_width
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<(Option<DeprelWeights>, usize)> for EvaluationConfig {
    fn from(value: (Option<DeprelWeights>, usize)) -> Self {
        Self {
            deprel_weights: value.0,
            context_width: value.1,
        }
    }
}

impl From<EvaluationConfig> for (Option<DeprelWeights>, usize) {
    fn from(value: EvaluationConfig) -> Self {
        (value.deprel_weights, value.context_width)
    }
}

impl From<EvaluationConfigBuilder> for EvaluationConfig {
    fn from(value: EvaluationConfigBuilder) -> Self {
        Self {
            deprel_weights: value.deprel_weights,
            context_width: value.context_width,
        }
    }
}

impl Display for EvaluationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let weights = match &self.deprel_weights {
            Some(w) => format!("{} relations", w.len()),
            None => String::from("None"),
        };
        let string = format!(
            "Relation weights: {}\n Characters shown on text mismatch: {}",
            weights, self.context_width
        );
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize an `EvaluationConfig` structure.
#[derive(Clone, Debug)]
pub struct EvaluationConfigBuilder {
    deprel_weights: Option<DeprelWeights>,
    context_width: usize,
}

impl Default for EvaluationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationConfigBuilder {
    pub fn deprel_weights(mut self, deprel_weights: DeprelWeights) -> Self {
        self.deprel_weights = Some(deprel_weights);
        self
    }
    pub fn context_width(mut self, context_width: usize) -> Self {
        self.context_width = context_width;
        self
    }
    pub fn new() -> Self {
        Self {
            deprel_weights: None,
            context_width: DEFAULT_CONTEXT_WIDTH,
        }
    }
    pub fn build(self) -> EvaluationConfig {
        EvaluationConfig::from(self)
    }
}
