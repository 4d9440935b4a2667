/**
This module loads a CoNLL-U document into the representation used by the evaluation: the
concatenation of the token forms (the character stream), the spans of the tokens and of the
sentences over this stream, and the words with their columns.
*/
use serde::Serialize;
use std::fmt::Display;
use std::str::Lines;

mod record;

pub use record::FormatError;
use record::{Columns, WordId};

/// Lines starting with this character are comments, when they appear between two sentences.
pub(crate) const COMMENT_MARKER: char = '#';
/// Language-specific subtypes of a dependency relation are introduced by this delimiter.
pub(crate) const DEPREL_SUBTYPE_DELIMITER: char = ':';

/// Half-open interval `[start, end)` over the character stream of a document. The offsets count
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
    pub fn start(&self) -> usize {
        self.start
    }
    pub fn end(&self) -> usize {
        self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A word is a node of the dependency graph. Its span is the span of its token; the words of a
/// multi-word token all share the span of the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Word<'a> {
    pub(crate) span: Span,
    pub(crate) is_multiword: bool,
    pub(crate) form: &'a str,
    pub(crate) lemma: &'a str,
    pub(crate) upos: &'a str,
    pub(crate) xpos: &'a str,
    pub(crate) feats: &'a str,
    pub(crate) head: &'a str,
    /// Universal part of the relation. The subtype (e.g. `poss` in `nmod:poss`) is dropped.
    pub(crate) deprel: &'a str,
    pub(crate) deps: &'a str,
    pub(crate) misc: &'a str,
}

impl<'a> Word<'a> {
    fn new(span: Span, columns: Columns<'a>, is_multiword: bool) -> Self {
        let deprel = columns.deprel();
        let deprel = match deprel.find(DEPREL_SUBTYPE_DELIMITER) {
            Some(index) => &deprel[..index],
            None => deprel,
        };
        Word {
            span,
            is_multiword,
            form: columns.form(),
            lemma: columns.lemma(),
            upos: columns.upos(),
            xpos: columns.xpos(),
            feats: columns.feats(),
            head: columns.head(),
            deprel,
            deps: columns.deps(),
            misc: columns.misc(),
        }
    }

    /// Does this word lie inside a multi-word span ending at `end`? The words of a multi-word
    /// token only need to start inside of it, the other words must end inside of it.
    pub(crate) fn fits_multiword_span(&self, end: usize) -> bool {
        if self.is_multiword {
            self.span.start < end
        } else {
            self.span.end <= end
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
    pub fn is_multiword(&self) -> bool {
        self.is_multiword
    }
    pub fn form(&self) -> &'a str {
        self.form
    }
    pub fn lemma(&self) -> &'a str {
        self.lemma
    }
    pub fn upos(&self) -> &'a str {
        self.upos
    }
    pub fn xpos(&self) -> &'a str {
        self.xpos
    }
    pub fn feats(&self) -> &'a str {
        self.feats
    }
    pub fn head(&self) -> &'a str {
        self.head
    }
    pub fn deprel(&self) -> &'a str {
        self.deprel
    }
    pub fn deps(&self) -> &'a str {
        self.deps
    }
    pub fn misc(&self) -> &'a str {
        self.misc
    }
}

/// In-memory representation of a CoNLL-U document. It borrows the text it was loaded from.
///
/// # Example
///
/// ```rust
/// use udeval::Document;
///
/// let text = "1-2\tal\t_\t_\t_\t_\t_\t_\t_\t_
/// 1\ta\ta\tADP\t_\t_\t2\tcase\t_\t_
/// 2\tel\tel\tDET\t_\t_\t0\troot\t_\t_
///
/// ";
/// let document = Document::try_from(text).unwrap();
/// assert_eq!(document.characters().len(), 2);
/// assert_eq!(document.tokens().len(), 1);
/// assert_eq!(document.words().len(), 2);
/// assert_eq!(document.sentences().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document<'a> {
    pub(crate) characters: Vec<char>,
    pub(crate) tokens: Vec<Span>,
    pub(crate) sentences: Vec<Span>,
    pub(crate) words: Vec<Word<'a>>,
}

impl<'a> Document<'a> {
    pub fn characters(&self) -> &[char] {
        &self.characters
    }
    pub fn tokens(&self) -> &[Span] {
        &self.tokens
    }
    pub fn sentences(&self) -> &[Span] {
        &self.sentences
    }
    pub fn words(&self) -> &[Word<'a>] {
        &self.words
    }
}

impl<'a> TryFrom<&'a str> for Document<'a> {
    type Error = FormatError;
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        load_conllu(value)
    }
}

/// Iterates over the lines of a document and keeps track of the current line number. The loader
/// pulls the words of multi-word tokens out of the same cursor.
pub(crate) struct LineCursor<'a> {
    lines: Lines<'a>,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        LineCursor {
            lines: text.lines(),
            line_number: 0,
        }
    }
    /// Number of the last line returned, `0` before the first call to `next`.
    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (usize, &'a str);
    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some((
            self.line_number,
            line.trim_end_matches(|c| c == '\r' || c == '\n'),
        ))
    }
}

/// Loads a CoNLL-U document. Sentences are separated by empty lines and the document must end with
/// one. Comments are only allowed before a sentence. Empty nodes (`ID` such as `8.1`) are ignored.
///
/// * `text`: Complete content of the CoNLL-U file.
pub fn load_conllu(text: &str) -> Result<Document<'_>, FormatError> {
    let mut document = Document::default();
    let mut cursor = LineCursor::new(text);
    let mut index = 0;
    let mut in_sentence = false;

    while let Some((line_number, line)) = cursor.next() {
        if !in_sentence {
            if line.starts_with(COMMENT_MARKER) {
                continue;
            }
            document.sentences.push(Span::new(index, 0));
            in_sentence = true;
        }
        if line.is_empty() {
            if let Some(sentence) = document.sentences.last_mut() {
                sentence.end = index;
            }
            in_sentence = false;
            continue;
        }

        let columns = Columns::try_split(line, line_number)?;
        let id = WordId::try_parse(columns.id(), line_number)?;
        if matches!(id, WordId::Empty) {
            continue;
        }

        let form = columns.form();
        document.characters.extend(form.chars());
        let span = Span::new(index, index + form.chars().count());
        document.tokens.push(span);
        index = span.end;

        match id {
            WordId::Range { .. } => {
                for _ in 0..id.word_count() {
                    let (word_line_number, word_line) =
                        cursor
                            .next()
                            .ok_or_else(|| FormatError::TruncatedMultiword {
                                line_number: cursor.line_number(),
                                id: String::from(columns.id()),
                            })?;
                    let word_columns = Columns::try_split(word_line, word_line_number)?;
                    document.words.push(Word::new(span, word_columns, true));
                }
            }
            _ => document.words.push(Word::new(span, columns, false)),
        }
    }

    if in_sentence {
        return Err(FormatError::MissingTerminator {
            line_number: cursor.line_number(),
        });
    }
    log::debug!(
        "Loaded CoNLL-U document: {} sentences, {} tokens, {} words",
        document.sentences.len(),
        document.tokens.len(),
        document.words.len()
    );
    Ok(document)
}

/// Builds a CoNLL-U document from a list of tokens. A token made of a single form is a word. A
/// token such as `"abc a b c"` is a multi-word token `abc` made of the words `a`, `b` and `c`.
#[cfg(test)]
pub(crate) fn conllu_from_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut lines = Vec::with_capacity(tokens.len() + 1);
    let mut word_count = 0;
    for token in tokens {
        let parts: Vec<&str> = token.as_ref().split(' ').collect();
        if parts.len() == 1 {
            lines.push(format!("{}\t{}\t_\t_\t_\t_\t_\t_\t_\t_", word_count + 1, parts[0]));
            word_count += 1;
        } else {
            lines.push(format!(
                "{}-{}\t{}\t_\t_\t_\t_\t_\t_\t_\t_",
                word_count + 1,
                word_count + parts.len() - 1,
                parts[0]
            ));
            for part in &parts[1..] {
                lines.push(format!("{}\t{}\t_\t_\t_\t_\t_\t_\t_\t_", word_count + 1, part));
                word_count += 1;
            }
        }
    }
    lines.push(String::from("\n"));
    lines.join("\n")
}
