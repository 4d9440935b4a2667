/*!
This library is a re-implementation of the CoNLL 2017 UD Parsing evaluation. It scores a system
CoNLL-U file against a gold CoNLL-U file. It is built with a focus on performance and soundness.

# METRICS
The following metrics are computed, each as a precision, a recall and an F1 score:
* Tokens: how well do the gold tokens match the system tokens.
* Sentences: how well do the gold sentences match the system sentences.
* Words: how well can the gold words be aligned to the system words.
* UPOS, XPOS, Feats: using aligned words, how well does the given column match.
* AllTags: using aligned words, how well do UPOS, XPOS and FEATS match together.
* Lemmas: using aligned words, how well does LEMMA match.
* UAS: using aligned words, how well does HEAD match.
* LAS: using aligned words, how well do HEAD and DEPREL (subtypes ignored) match.
* WeightedLAS: LAS where each word counts for the weight of its relation. Only computed when
    weights are given.

# Token matching
The texts resulting from the concatenation of the gold tokens and of the system tokens must be
the same. If they are not, the evaluation fails. Every token is represented as a span of this
text, and tokens are equal only if their spans are the same.

# Word matching
Words which are their own token are matched as tokens. The words of multi-word tokens are grouped
into multi-word spans: the smallest spans of the text containing at least one multi-word token,
such that no multi-word token (gold or system) sticks out of them. Inside a multi-word span, the
gold and the system words are aligned with a longest common subsequence on their forms.

# Terminology
* A token is read from one line of the CoNLL-U file. It is either a word or a multi-word token,
    such as the spanish `al`, made of the words `a` and `el`.
* A word is a node of the dependency tree. Tags, lemmas, heads and relations are compared on
    aligned words.
* A span is a half-open interval of character offsets in the concatenated text.
*/

mod alignment;
mod config;
mod conllu;
mod metrics;
mod reporter;
mod weights;

// The public api starts here
pub use conllu::{load_conllu, Document, FormatError, Span, Word};

pub use alignment::{align_words, AlignedWord, Alignment};

pub use metrics::{
    alignment_f1_score, evaluate, spans_f1_score, Comparison, DocumentKind, EvaluationError,
    F1Score, TextMismatchError, DEFAULT_CONTEXT_WIDTH,
};

pub use reporter::{Measures, Metric, MetricParsingError, Reporter};

pub use weights::{DeprelWeights, WeightsParsingError, DEFAULT_WEIGHT};

pub use config::{EvaluationConfig, EvaluationConfigBuilder};

/// Main entrypoint of the udeval library. This function evaluates a system document against a
/// gold document and returns the score of every metric. The returned structure can be used to
/// prettyprint the results or be converted into a HashMap. Instead of taking in the raw
/// parameters, this function takes an `EvaluationConfig` struct and uses sensible defaults.
///
/// * `gold`: Gold document
/// * `system`: System document
/// * `config`: Parameters of the evaluation.
///
/// # Example
/// ```rust
/// use udeval::{load_conllu, evaluate_conf, DeprelWeights, EvaluationConfigBuilder, Metric};
///
/// let gold = load_conllu("1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\t_\n\n").unwrap();
/// let system = load_conllu("1\tHi\thi\tINTJ\t_\t_\t0\tdiscourse\t_\t_\n\n").unwrap();
/// let config = EvaluationConfigBuilder::default()
///     .deprel_weights(DeprelWeights::from_iter([("root", 2.0)]))
///     .build();
///
/// let reporter = evaluate_conf(&gold, &system, config).unwrap();
/// assert_eq!(reporter.get(Metric::Uas).unwrap().f1, 1.0);
/// assert_eq!(reporter.get(Metric::Las).unwrap().f1, 0.0);
/// let weighted = reporter.get(Metric::WeightedLas).unwrap();
/// assert_eq!((weighted.precision, weighted.recall), (0.0, 0.0));
/// ```
pub fn evaluate_conf(
    gold: &Document,
    system: &Document,
    config: EvaluationConfig,
) -> Result<Reporter, EvaluationError> {
    let (deprel_weights, context_width) = config.into();
    metrics::evaluate_inner(gold, system, deprel_weights.as_ref(), context_width)
}

/// Loads the gold and the system CoNLL-U documents and evaluates them. The error tells which of
/// the two documents could not be loaded.
///
/// * `gold`: Content of the gold CoNLL-U file
/// * `system`: Content of the system CoNLL-U file
/// * `config`: Parameters of the evaluation.
pub fn evaluate_str(
    gold: &str,
    system: &str,
    config: EvaluationConfig,
) -> Result<Reporter, EvaluationError> {
    let gold_document = load_conllu(gold).map_err(|error| EvaluationError::Format {
        document: DocumentKind::Gold,
        error,
    })?;
    let system_document = load_conllu(system).map_err(|error| EvaluationError::Format {
        document: DocumentKind::System,
        error,
    })?;
    evaluate_conf(&gold_document, &system_document, config)
}
