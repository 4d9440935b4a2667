/**
This modules gives a few tools to prettyprint the metrics computed by the evaluation, as a table,
as the one-line LAS summary or as `measure` blocks.
*/
use crate::metrics::{Comparison, F1Score};
use ahash::AHashMap;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Enumeration of the metrics computed by the evaluation. The metrics are ordered as they are
/// reported. `&str` can be parsed to create a `Metric`.
#[derive(
    Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Sequence, Serialize, Deserialize,
)]
pub enum Metric {
    /// How well do the gold tokens match the system tokens.
    Tokens,
    /// How well do the gold sentences match the system sentences.
    Sentences,
    /// How well can the gold words be aligned to the system words.
    Words,
    #[serde(rename = "UPOS")]
    Upos,
    #[serde(rename = "XPOS")]
    Xpos,
    Feats,
    AllTags,
    Lemmas,
    #[serde(rename = "UAS")]
    Uas,
    #[serde(rename = "LAS")]
    Las,
    /// LAS where each word counts for the weight of its relation. Only computed when weights are
    /// given.
    #[serde(rename = "WeightedLAS")]
    WeightedLas,
}

impl Metric {
    /// The comparison of aligned words behind this metric. Tokens and sentences are compared by
    /// their spans and have none.
    pub(crate) fn comparison(&self) -> Option<Comparison> {
        match self {
            Self::Tokens | Self::Sentences => None,
            Self::Words => Some(Comparison::Alignment),
            Self::Upos => Some(Comparison::Upos),
            Self::Xpos => Some(Comparison::Xpos),
            Self::Feats => Some(Comparison::Feats),
            Self::AllTags => Some(Comparison::AllTags),
            Self::Lemmas => Some(Comparison::Lemma),
            Self::Uas => Some(Comparison::Head),
            Self::Las | Self::WeightedLas => Some(Comparison::HeadDeprel),
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Tokens => "Tokens",
            Self::Sentences => "Sentences",
            Self::Words => "Words",
            Self::Upos => "UPOS",
            Self::Xpos => "XPOS",
            Self::Feats => "Feats",
            Self::AllTags => "AllTags",
            Self::Lemmas => "Lemmas",
            Self::Uas => "UAS",
            Self::Las => "LAS",
            Self::WeightedLas => "WeightedLAS",
        };
        // `pad` keeps the width and alignment flags working
        f.pad(name)
    }
}

impl FromStr for Metric {
    type Err = MetricParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" => Ok(Metric::Tokens),
            "sentences" => Ok(Metric::Sentences),
            "words" => Ok(Metric::Words),
            "upos" => Ok(Metric::Upos),
            "xpos" => Ok(Metric::Xpos),
            "feats" => Ok(Metric::Feats),
            "alltags" => Ok(Metric::AllTags),
            "lemmas" => Ok(Metric::Lemmas),
            "uas" => Ok(Metric::Uas),
            "las" => Ok(Metric::Las),
            "weightedlas" => Ok(Metric::WeightedLas),
            _ => Err(MetricParsingError(String::from(s))),
        }
    }
}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub struct MetricParsingError(String);
impl Display for MetricParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Impossible to parse the string ({}) into a Metric", self.0)
    }
}
impl Error for MetricParsingError {}

/// The reporter holds the score of every computed metric. It can be displayed as a table (i.e.
/// prettyprinted), summarized by its LAS, displayed as `measure` blocks or converted into a
/// `HashMap`. The reporter is built by the `evaluate` functions.
///
/// # Example
///
/// ```rust
/// use udeval::{evaluate_str, EvaluationConfig, Metric};
///
/// let gold = "1\tVoy\tir\tVERB\t_\t_\t0\troot\t_\t_\n2\t.\t.\tPUNCT\t_\t_\t1\tpunct\t_\t_\n\n";
/// let system = "1\tVoy\tir\tVERB\t_\t_\t0\troot\t_\t_\n2\t.\t.\tPUNCT\t_\t_\t0\tpunct\t_\t_\n\n";
///
/// let reporter = evaluate_str(gold, system, EvaluationConfig::default()).unwrap();
/// assert_eq!(reporter.get(Metric::Las).unwrap().f1, 0.5);
/// assert_eq!(reporter.las_summary(), "LAS F1 Score: 50.00");
///
/// let expected_table = "Metrics    | Precision |    Recall |  F1 Score
/// -----------+-----------+-----------+-----------
/// Tokens     |    100.00 |    100.00 |    100.00
/// Sentences  |    100.00 |    100.00 |    100.00
/// Words      |    100.00 |    100.00 |    100.00
/// UPOS       |    100.00 |    100.00 |    100.00
/// XPOS       |    100.00 |    100.00 |    100.00
/// Feats      |    100.00 |    100.00 |    100.00
/// AllTags    |    100.00 |    100.00 |    100.00
/// Lemmas     |    100.00 |    100.00 |    100.00
/// UAS        |     50.00 |     50.00 |     50.00
/// LAS        |     50.00 |     50.00 |     50.00
/// ";
/// assert_eq!(reporter.to_string(), expected_table);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Reporter {
    pub(crate) metrics: BTreeMap<Metric, F1Score>,
}

impl Reporter {
    pub(crate) fn insert(&mut self, metric: Metric, score: F1Score) -> Option<F1Score> {
        self.metrics.insert(metric, score)
    }
    pub fn get(&self, metric: Metric) -> Option<&F1Score> {
        self.metrics.get(&metric)
    }
    /// Iterates over the computed metrics, in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (&Metric, &F1Score)> {
        self.metrics.iter()
    }
    pub fn len(&self) -> usize {
        self.metrics.len()
    }
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
    /// The main score of the CoNLL 2017 shared task, as a single line.
    pub fn las_summary(&self) -> String {
        let f1 = self.get(Metric::Las).map_or(0.0, |s| s.f1);
        format!("LAS F1 Score: {:.2}", 100.0 * f1)
    }
    /// Key/value view of the reporter. Each metric gives three `measure` blocks, one for the
    /// precision, one for the recall and one for the F1 score.
    pub fn measures(&self) -> Measures<'_> {
        Measures(self)
    }
}

/// By converting the reporter into an `AHashMap`, you lose the reporting order of the metrics.
impl From<Reporter> for AHashMap<Metric, F1Score> {
    fn from(value: Reporter) -> Self {
        value.metrics.into_iter().collect()
    }
}

/// The reporter acts as a table when displayed. Scores are given in percent.
impl Display for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Metrics    | Precision |    Recall |  F1 Score")?;
        writeln!(f, "-----------+-----------+-----------+-----------")?;
        for (metric, score) in self.metrics.iter() {
            writeln!(
                f,
                "{:11}|{:10.2} |{:10.2} |{:10.2}",
                metric,
                100.0 * score.precision,
                100.0 * score.recall,
                100.0 * score.f1
            )?
        }
        Ok(())
    }
}

/// Displays a reporter as `measure` blocks. Built with `Reporter::measures`.
#[derive(Debug, Clone, Copy)]
pub struct Measures<'r>(&'r Reporter);

impl Display for Measures<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (metric, score) in self.0.metrics.iter() {
            let values = [
                ("precision", score.precision),
                ("recall", score.recall),
                ("f1", score.f1),
            ];
            for (name, value) in values {
                writeln!(
                    f,
                    "measure{{\n  key: \"{}-{}\"\n  value: \"{:.6}\"\n}}",
                    metric,
                    name,
                    100.0 * value
                )?
            }
        }
        Ok(())
    }
}
