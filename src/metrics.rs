/**
This module computes the metrics (precision, recall, F1 score) of a system document against a gold
document: the span metrics of tokens and sentences, and the metrics of the aligned words.
*/
use crate::alignment::{align_words, Alignment};
use crate::conllu::{Document, FormatError, Span, Word};
use crate::reporter::{Metric, Reporter};
use crate::weights::DeprelWeights;
use core::fmt;
use enum_iterator::all;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Display};

/// Number of characters shown from each document when their texts differ.
pub const DEFAULT_CONTEXT_WIDTH: usize = 20;

/// Precision, recall and F1 score of a metric. A score whose denominator is zero is `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct F1Score {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl F1Score {
    /// * `gold_total`: Number (or total weight) of the gold items
    /// * `system_total`: Number (or total weight) of the system items
    /// * `correct`: Number (or total weight) of the correct system items
    pub fn new(gold_total: f64, system_total: f64, correct: f64) -> Self {
        let ratio = |numerator: f64, denominator: f64| {
            if denominator != 0.0 {
                numerator / denominator
            } else {
                0.0
            }
        };
        F1Score {
            precision: ratio(correct, system_total),
            recall: ratio(correct, gold_total),
            f1: ratio(2.0 * correct, system_total + gold_total),
        }
    }
}

impl Display for F1Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision: {}, recall: {}, f1: {}",
            self.precision, self.recall, self.f1
        )
    }
}

/// Scores two lists of spans, sorted by their start. A system span is correct if a gold span
/// has the same start and the same end.
pub fn spans_f1_score(gold_spans: &[Span], system_spans: &[Span]) -> F1Score {
    let (mut correct, mut gi, mut si) = (0_usize, 0, 0);
    while gi < gold_spans.len() && si < system_spans.len() {
        let (gold, system) = (gold_spans[gi], system_spans[si]);
        if system.start < gold.start {
            si += 1;
        } else if gold.start < system.start {
            gi += 1;
        } else {
            correct += usize::from(gold.end == system.end);
            gi += 1;
            si += 1;
        }
    }
    F1Score::new(
        gold_spans.len() as f64,
        system_spans.len() as f64,
        correct as f64,
    )
}

/// What must be equal for two aligned words to count as a correct system word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Being aligned is enough.
    Alignment,
    Upos,
    Xpos,
    Feats,
    /// UPOS, XPOS and FEATS.
    AllTags,
    Lemma,
    Head,
    /// HEAD and DEPREL, the subtypes of DEPREL being ignored.
    HeadDeprel,
}

impl Comparison {
    pub fn agree(&self, gold: &Word, system: &Word) -> bool {
        match self {
            Self::Alignment => true,
            Self::Upos => gold.upos == system.upos,
            Self::Xpos => gold.xpos == system.xpos,
            Self::Feats => gold.feats == system.feats,
            Self::AllTags => {
                (gold.upos, gold.xpos, gold.feats) == (system.upos, system.xpos, system.feats)
            }
            Self::Lemma => gold.lemma == system.lemma,
            Self::Head => gold.head == system.head,
            Self::HeadDeprel => (gold.head, gold.deprel) == (system.head, system.deprel),
        }
    }
}

/// Scores the aligned words with the given comparison. Without weights, every word counts for 1.
/// With weights, every word counts for the weight of its relation and an aligned pair counts for
/// the weight of its gold word.
pub fn alignment_f1_score(
    alignment: &Alignment,
    comparison: Comparison,
    deprel_weights: Option<&DeprelWeights>,
) -> F1Score {
    let weight = |word: &Word| deprel_weights.map_or(1.0, |w| w.weight(word.deprel));
    let gold: f64 = alignment.gold_words().iter().map(weight).sum();
    let system: f64 = alignment.system_words().iter().map(weight).sum();
    let correct: f64 = alignment
        .matched_pairs()
        .filter(|(g, s)| comparison.agree(g, s))
        .map(|(g, _)| weight(g))
        .sum();
    F1Score::new(gold, system, correct)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when the concatenations of the tokens of the gold and the system documents
/// differ. Nothing can be aligned in that case.
pub struct TextMismatchError {
    /// Offset of the first differing character.
    pub offset: usize,
    /// Characters of the gold document starting at `offset`.
    pub gold_context: String,
    /// Characters of the system document starting at `offset`.
    pub system_context: String,
}

impl Display for TextMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The catenation of tokens in gold file and in system file differ!\nFirst differing characters (offset {}) in gold file: '{}' and system file: '{}'",
            self.offset, self.gold_context, self.system_context
        )
    }
}

impl Error for TextMismatchError {}

fn check_characters(
    gold: &[char],
    system: &[char],
    context_width: usize,
) -> Result<(), TextMismatchError> {
    if gold == system {
        return Ok(());
    }
    let offset = gold
        .iter()
        .zip(system)
        .take_while(|(g, s)| g == s)
        .count();
    let context = |characters: &[char]| -> String {
        characters.iter().skip(offset).take(context_width).collect()
    };
    Err(TextMismatchError {
        offset,
        gold_context: context(gold),
        system_context: context(system),
    })
}

/// Which of the two evaluated documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Gold,
    System,
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enum error encompassing the failures that could happen when evaluating a system document.
pub enum EvaluationError {
    /// One of the documents is not a valid CoNLL-U document.
    Format {
        document: DocumentKind,
        error: FormatError,
    },
    /// The documents do not describe the same text.
    TextMismatch(TextMismatchError),
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { document, error } => {
                write!(f, "Could not load the {} file: {}", document, error)
            }
            Self::TextMismatch(mismatch_err) => Display::fmt(mismatch_err, f),
        }
    }
}

impl Error for EvaluationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format { error, .. } => Some(error),
            Self::TextMismatch(err) => Some(err),
        }
    }
}

impl From<TextMismatchError> for EvaluationError {
    fn from(value: TextMismatchError) -> Self {
        Self::TextMismatch(value)
    }
}

/// Evaluates a system document against a gold document. The `WeightedLAS` metric is only
/// computed when `deprel_weights` is given.
///
/// * `gold`: Gold document
/// * `system`: System document
/// * `deprel_weights`: Optional weights of the dependency relations.
pub fn evaluate(
    gold: &Document,
    system: &Document,
    deprel_weights: Option<&DeprelWeights>,
) -> Result<Reporter, EvaluationError> {
    evaluate_inner(gold, system, deprel_weights, DEFAULT_CONTEXT_WIDTH)
}

pub(crate) fn evaluate_inner(
    gold: &Document,
    system: &Document,
    deprel_weights: Option<&DeprelWeights>,
    context_width: usize,
) -> Result<Reporter, EvaluationError> {
    check_characters(&gold.characters, &system.characters, context_width)?;

    let alignment = align_words(&gold.words, &system.words);
    log::debug!(
        "Aligned {} of {} gold words and {} system words",
        alignment.matched_words().len(),
        gold.words.len(),
        system.words.len()
    );

    let mut reporter = Reporter::default();
    for metric in all::<Metric>() {
        let score = match (metric, metric.comparison()) {
            (Metric::Tokens, _) => spans_f1_score(&gold.tokens, &system.tokens),
            (Metric::Sentences, _) => spans_f1_score(&gold.sentences, &system.sentences),
            (Metric::WeightedLas, Some(comparison)) => match deprel_weights {
                Some(weights) => alignment_f1_score(&alignment, comparison, Some(weights)),
                None => continue,
            },
            (_, Some(comparison)) => alignment_f1_score(&alignment, comparison, None),
            (_, None) => continue,
        };
        reporter.insert(metric, score);
    }
    Ok(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conllu::{conllu_from_tokens, load_conllu};
    use itertools::Itertools;
    use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
    use rstest::rstest;
    use std::mem::take;

    fn spans(bounds: &[(usize, usize)]) -> Vec<Span> {
        bounds.iter().map(|&(s, e)| Span::new(s, e)).collect()
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0, F1Score { precision: 0.0, recall: 0.0, f1: 0.0 })]
    #[case(4.0, 0.0, 0.0, F1Score { precision: 0.0, recall: 0.0, f1: 0.0 })]
    #[case(0.0, 2.0, 0.0, F1Score { precision: 0.0, recall: 0.0, f1: 0.0 })]
    #[case(4.0, 2.0, 2.0, F1Score { precision: 1.0, recall: 0.5, f1: 4.0 / 6.0 })]
    #[case(2.0, 2.0, 2.0, F1Score { precision: 1.0, recall: 1.0, f1: 1.0 })]
    fn test_f1_score(
        #[case] gold: f64,
        #[case] system: f64,
        #[case] correct: f64,
        #[case] expected: F1Score,
    ) {
        assert_eq!(F1Score::new(gold, system, correct), expected)
    }

    #[test]
    fn test_spans_f1_score() {
        let gold = spans(&[(0, 3), (3, 5), (5, 9), (9, 10)]);
        let system = spans(&[(0, 3), (3, 7), (7, 9), (9, 10)]);
        let score = spans_f1_score(&gold, &system);
        assert_eq!(score, F1Score::new(4.0, 4.0, 2.0));
        assert_eq!(spans_f1_score(&gold, &[]), F1Score::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_spans_same_start_different_end() {
        // Empty spans share their start with the following span
        let gold = spans(&[(0, 2), (2, 2), (2, 4)]);
        let system = spans(&[(0, 2), (2, 4)]);
        let score = spans_f1_score(&gold, &system);
        assert_eq!(score, F1Score::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_text_mismatch() {
        let gold_text = conllu_from_tokens(&["a", "bc", "d"]);
        let system_text = conllu_from_tokens(&["a", "bd", "d"]);
        let gold = load_conllu(&gold_text).unwrap();
        let system = load_conllu(&system_text).unwrap();
        let err = evaluate(&gold, &system, None).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::TextMismatch(TextMismatchError {
                offset: 2,
                gold_context: String::from("cd"),
                system_context: String::from("dd"),
            })
        );
    }

    #[rstest]
    #[case(&["a"], &["b"], 0)]
    #[case(&["ab"], &["abc"], 2)]
    #[case(&["abc"], &["ab"], 2)]
    fn test_text_mismatch_offset(
        #[case] gold: &[&str],
        #[case] system: &[&str],
        #[case] offset: usize,
    ) {
        let (gold_text, system_text) = (conllu_from_tokens(gold), conllu_from_tokens(system));
        let gold = load_conllu(&gold_text).unwrap();
        let system = load_conllu(&system_text).unwrap();
        match evaluate(&gold, &system, None) {
            Err(EvaluationError::TextMismatch(err)) => assert_eq!(err.offset, offset),
            other => panic!("Expected a text mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_context_width() {
        let err = check_characters(&['a', 'b', 'c', 'd'], &['a', 'x', 'y', 'z'], 2).unwrap_err();
        assert_eq!(err.gold_context, "bc");
        assert_eq!(err.system_context, "xy");
    }

    #[rstest]
    #[case(&["a"], &["a"], 1)]
    #[case(&["abc a b c"], &["a", "b", "c"], 3)]
    #[case(&["abcd"], &["a", "b", "c", "d"], 0)]
    #[case(&["a", "bc b c", "d"], &["a", "b", "cd"], 2)]
    #[case(&["abc a b c", "de d e"], &["a", "bcd b c d", "e"], 5)]
    fn test_words_score(#[case] gold: &[&str], #[case] system: &[&str], #[case] correct: usize) {
        let word_count = |tokens: &[&str]| -> usize {
            tokens
                .iter()
                .map(|t| usize::max(1, t.split(' ').count() - 1))
                .sum()
        };
        let (gold_text, system_text) = (conllu_from_tokens(gold), conllu_from_tokens(system));
        let gold_document = load_conllu(&gold_text).unwrap();
        let system_document = load_conllu(&system_text).unwrap();
        let reporter = evaluate(&gold_document, &system_document, None).unwrap();
        let (gold_words, system_words) = (word_count(gold) as f64, word_count(system) as f64);
        let correct = correct as f64;
        let words = reporter.get(Metric::Words).unwrap();
        assert_eq!(
            (words.precision, words.recall, words.f1),
            (
                correct / system_words,
                correct / gold_words,
                2.0 * correct / (gold_words + system_words)
            )
        );
    }

    const GOLD: &str = "1\tThey\tthey\tPRON\tPRP\tCase=Nom\t2\tnsubj\t_\t_
2\tmet\tmeet\tVERB\tVBD\tTense=Past\t0\troot\t_\t_
3\tyesterday\tyesterday\tNOUN\tNN\t_\t2\tobl:tmod\t_\t_
4\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

";
    const SYSTEM: &str = "1\tThey\tthey\tPRON\tPRP\tCase=Nom\t2\tnsubj\t_\t_
2\tmet\tmet\tVERB\tVBN\tTense=Past\t0\troot\t_\t_
3\tyesterday\tyesterday\tADV\tNN\t_\t2\tobl\t_\t_
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_

";

    #[rstest]
    #[case(Metric::Tokens, 4.0)]
    #[case(Metric::Sentences, 1.0)]
    #[case(Metric::Words, 4.0)]
    #[case(Metric::Upos, 3.0)]
    #[case(Metric::Xpos, 3.0)]
    #[case(Metric::Feats, 4.0)]
    #[case(Metric::AllTags, 2.0)]
    #[case(Metric::Lemmas, 3.0)]
    #[case(Metric::Uas, 3.0)]
    #[case(Metric::Las, 3.0)]
    fn test_word_metrics(#[case] metric: Metric, #[case] correct: f64) {
        let gold = load_conllu(GOLD).unwrap();
        let system = load_conllu(SYSTEM).unwrap();
        let reporter = evaluate(&gold, &system, None).unwrap();
        let total = if matches!(metric, Metric::Sentences) {
            1.0
        } else {
            4.0
        };
        assert_eq!(
            reporter.get(metric),
            Some(&F1Score::new(total, total, correct))
        );
        assert!(reporter.get(Metric::WeightedLas).is_none());
    }

    #[test]
    fn test_weighted_las() {
        let gold = load_conllu(GOLD).unwrap();
        let system = load_conllu(SYSTEM).unwrap();
        let weights = DeprelWeights::from_iter([("punct", 0.5), ("obl", 2.0)]);
        let reporter = evaluate(&gold, &system, Some(&weights)).unwrap();
        // gold: nsubj 1 + root 1 + obl 2 + punct 0.5, the punctuation is attached wrongly
        assert_eq!(
            reporter.get(Metric::WeightedLas),
            Some(&F1Score::new(4.5, 4.5, 4.0))
        );
        assert_eq!(reporter.len(), 11);
    }

    #[test]
    fn test_deprel_subtype_is_ignored_for_las() {
        let gold = load_conllu(GOLD).unwrap();
        let system = load_conllu(SYSTEM).unwrap();
        let alignment = align_words(gold.words(), system.words());
        let (g, s) = alignment.matched_pairs().nth(2).unwrap();
        assert_eq!((g.deprel(), s.deprel()), ("obl", "obl"));
        assert!(Comparison::HeadDeprel.agree(g, s));
        assert!(!Comparison::Upos.agree(g, s));
    }

    /// Two segmentations of the same random text. Some tokens are multi-word tokens whose words
    /// are their characters.
    #[derive(Debug, Clone)]
    struct SegmentedText {
        gold: Vec<String>,
        system: Vec<String>,
    }

    fn segment(text: &[char], g: &mut Gen) -> Vec<String> {
        let mut tokens = vec![];
        let mut current = String::new();
        for (i, c) in text.iter().enumerate() {
            current.push(*c);
            if i + 1 == text.len() || bool::arbitrary(g) {
                let token = take(&mut current);
                if token.chars().count() > 1 && bool::arbitrary(g) {
                    let words = token.chars().join(" ");
                    tokens.push(format!("{} {}", token, words));
                } else {
                    tokens.push(token);
                }
            }
        }
        tokens
    }

    impl Arbitrary for SegmentedText {
        fn arbitrary(g: &mut Gen) -> Self {
            let length = usize::arbitrary(g) % 12 + 1;
            let text: Vec<char> = (0..length)
                .map(|_| *g.choose(&['a', 'b', 'c']).unwrap())
                .collect();
            SegmentedText {
                gold: segment(&text, g),
                system: segment(&text, g),
            }
        }
    }

    #[test]
    fn test_identical_documents_score_one() {
        fn identical(text: SegmentedText) -> TestResult {
            let conllu = conllu_from_tokens(&text.gold);
            let document = load_conllu(&conllu).unwrap();
            let weights = DeprelWeights::from_iter([("_", 3.0)]);
            let reporter = evaluate(&document, &document, Some(&weights)).unwrap();
            let perfect = F1Score::new(1.0, 1.0, 1.0);
            TestResult::from_bool(
                reporter.len() == 11 && reporter.iter().all(|(_, score)| *score == perfect),
            )
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(identical as fn(SegmentedText) -> TestResult)
    }

    #[test]
    fn test_swapping_spans_swaps_precision_and_recall() {
        fn swapped(text: SegmentedText) -> TestResult {
            let (gold_text, system_text) = (
                conllu_from_tokens(&text.gold),
                conllu_from_tokens(&text.system),
            );
            let gold = load_conllu(&gold_text).unwrap();
            let system = load_conllu(&system_text).unwrap();
            let forward = spans_f1_score(gold.tokens(), system.tokens());
            let backward = spans_f1_score(system.tokens(), gold.tokens());
            TestResult::from_bool(
                forward.precision == backward.recall
                    && forward.recall == backward.precision
                    && forward.f1 == backward.f1,
            )
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(swapped as fn(SegmentedText) -> TestResult)
    }
}
