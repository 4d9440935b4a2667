/**
This module aligns the words of a gold document to the words of a system document. Words which are
their own token are aligned by span. Words belonging to multi-word tokens are grouped into
multi-word spans, and the gold and system words of such a span are aligned with a longest common
subsequence over their forms.
*/
use crate::conllu::Word;
use itertools::iproduct;

/// A pair of aligned words, given as indices into the gold words and the system words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlignedWord {
    pub(crate) gold: usize,
    pub(crate) system: usize,
}

impl AlignedWord {
    pub(crate) fn new(gold: usize, system: usize) -> Self {
        AlignedWord { gold, system }
    }
    pub fn gold(&self) -> usize {
        self.gold
    }
    pub fn system(&self) -> usize {
        self.system
    }
}

/// Result of the alignment of two lists of words. A word appears in at most one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment<'d, 'a> {
    gold_words: &'d [Word<'a>],
    system_words: &'d [Word<'a>],
    matched_words: Vec<AlignedWord>,
}

impl<'d, 'a> Alignment<'d, 'a> {
    pub fn gold_words(&self) -> &'d [Word<'a>] {
        self.gold_words
    }
    pub fn system_words(&self) -> &'d [Word<'a>] {
        self.system_words
    }
    pub fn matched_words(&self) -> &[AlignedWord] {
        &self.matched_words
    }
    /// Iterates over the aligned `(gold, system)` words.
    pub fn matched_pairs(&self) -> impl Iterator<Item = (&'d Word<'a>, &'d Word<'a>)> + '_ {
        let (gold_words, system_words) = (self.gold_words, self.system_words);
        self.matched_words
            .iter()
            .map(move |m| (&gold_words[m.gold], &system_words[m.system]))
    }
}

/// Aligns the gold words with the system words. Both lists must be in document order.
pub fn align_words<'d, 'a>(
    gold_words: &'d [Word<'a>],
    system_words: &'d [Word<'a>],
) -> Alignment<'d, 'a> {
    let mut matched_words = Vec::with_capacity(gold_words.len().min(system_words.len()));
    let (mut gi, mut si) = (0, 0);
    while gi < gold_words.len() && si < system_words.len() {
        let (gold, system) = (&gold_words[gi], &system_words[si]);
        let gold_opens_span = gold.is_multiword && gold.span.start <= system.span.start;
        let system_opens_span = system.is_multiword && system.span.start <= gold.span.start;
        if !gold_opens_span && !system_opens_span {
            if gold.span == system.span {
                matched_words.push(AlignedWord::new(gi, si));
                gi += 1;
                si += 1;
            } else if gold.span.start <= system.span.start {
                gi += 1;
            } else {
                si += 1;
            }
        } else {
            let (gold_start, system_start) = (gi, si);
            (gi, si) = multiword_span_ends(gold_words, system_words, gi, si);
            if (gi, si) == (gold_start, system_start) {
                // An empty multi-word token spans nothing, skip the word opening the span
                if gold_opens_span {
                    gi += 1;
                } else {
                    si += 1;
                }
                continue;
            }
            if gi > gold_start && si > system_start {
                let pairs = longest_common_subsequence(
                    &gold_words[gold_start..gi],
                    &system_words[system_start..si],
                );
                log::trace!(
                    "Multi-word span: gold words {}..{}, system words {}..{}, {} aligned",
                    gold_start,
                    gi,
                    system_start,
                    si,
                    pairs.len()
                );
                matched_words.extend(
                    pairs
                        .into_iter()
                        .map(|(g, s)| AlignedWord::new(gold_start + g, system_start + s)),
                );
            }
        }
    }
    Alignment {
        gold_words,
        system_words,
        matched_words,
    }
}

/// Finds the multi-word span opened at `(gi, si)` and returns the indices of the first gold word
/// and the first system word after it. The end of the span grows each time it takes a word of a
/// multi-word token sticking out of it.
fn multiword_span_ends(
    gold_words: &[Word],
    system_words: &[Word],
    mut gi: usize,
    mut si: usize,
) -> (usize, usize) {
    let mut span_end = if gold_words[gi].is_multiword {
        gold_words[gi].span.end
    } else {
        system_words[si].span.end
    };
    while gold_words
        .get(gi)
        .is_some_and(|w| w.fits_multiword_span(span_end))
        || system_words
            .get(si)
            .is_some_and(|w| w.fits_multiword_span(span_end))
    {
        let take_gold = match (gold_words.get(gi), system_words.get(si)) {
            (Some(gold), Some(system)) => gold.span.start <= system.span.start,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let word = if take_gold {
            gi += 1;
            &gold_words[gi - 1]
        } else {
            si += 1;
            &system_words[si - 1]
        };
        if word.is_multiword && word.span.end > span_end {
            span_end = word.span.end;
        }
    }
    (gi, si)
}

/// Aligns two lists of words with a longest common subsequence of their forms. Returns the pairs
/// of aligned indices, relative to the given slices. When backtracking, the gold side is advanced
/// whenever doing so keeps the optimal length.
fn longest_common_subsequence(gold: &[Word], system: &[Word]) -> Vec<(usize, usize)> {
    let (n, m) = (gold.len(), system.len());
    // lcs[g][s] is the length of the LCS of gold[g..] and system[s..]
    let mut lcs = vec![vec![0_usize; m + 1]; n + 1];
    for (g, s) in iproduct!((0..n).rev(), (0..m).rev()) {
        let diagonal = if gold[g].form == system[s].form {
            1 + lcs[g + 1][s + 1]
        } else {
            0
        };
        lcs[g][s] = diagonal.max(lcs[g + 1][s]).max(lcs[g][s + 1]);
    }

    let mut pairs = Vec::with_capacity(lcs[0][0]);
    let (mut g, mut s) = (0, 0);
    while g < n && s < m {
        if gold[g].form == system[s].form {
            pairs.push((g, s));
            g += 1;
            s += 1;
        } else if lcs[g][s] == lcs[g + 1][s] {
            g += 1;
        } else {
            s += 1;
        }
    }
    pairs
}
