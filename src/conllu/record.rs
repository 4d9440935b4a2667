/**
This modules splits a single CoNLL-U line into its ten columns and classifies the `ID` column of a
record. All the ways a record can be malformed are described by the `FormatError` enum.
*/
use std::error::Error;
use std::fmt::Display;

/// Number of tab-separated columns of every CoNLL-U record.
pub(crate) const COLUMN_COUNT: usize = 10;

const ID: usize = 0;
const FORM: usize = 1;
const LEMMA: usize = 2;
const UPOS: usize = 3;
const XPOS: usize = 4;
const FEATS: usize = 5;
const HEAD: usize = 6;
const DEPREL: usize = 7;
const DEPS: usize = 8;
const MISC: usize = 9;

/// The ten columns of a record. They are borrowed from the loaded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Columns<'a>([&'a str; COLUMN_COUNT]);

impl<'a> Columns<'a> {
    /// Splits the line on tabulations. Returns an error if the line does not contain exactly
    /// `COLUMN_COUNT` columns.
    pub(crate) fn try_split(line: &'a str, line_number: usize) -> Result<Self, FormatError> {
        let mut columns = [""; COLUMN_COUNT];
        let mut count = 0;
        for column in line.split('\t') {
            if count < COLUMN_COUNT {
                columns[count] = column;
            }
            count += 1;
        }
        if count != COLUMN_COUNT {
            return Err(FormatError::ColumnCount {
                line_number,
                line: String::from(line),
            });
        }
        Ok(Self(columns))
    }
    pub(crate) fn id(&self) -> &'a str {
        self.0[ID]
    }
    pub(crate) fn form(&self) -> &'a str {
        self.0[FORM]
    }
    pub(crate) fn lemma(&self) -> &'a str {
        self.0[LEMMA]
    }
    pub(crate) fn upos(&self) -> &'a str {
        self.0[UPOS]
    }
    pub(crate) fn xpos(&self) -> &'a str {
        self.0[XPOS]
    }
    pub(crate) fn feats(&self) -> &'a str {
        self.0[FEATS]
    }
    pub(crate) fn head(&self) -> &'a str {
        self.0[HEAD]
    }
    pub(crate) fn deprel(&self) -> &'a str {
        self.0[DEPREL]
    }
    pub(crate) fn deps(&self) -> &'a str {
        self.0[DEPS]
    }
    pub(crate) fn misc(&self) -> &'a str {
        self.0[MISC]
    }
}

/// Kind of record, as given by its `ID` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordId {
    /// A regular word, such as `3`. It is its own token.
    Single,
    /// A multi-word token, such as `2-3`. The words are on the following lines.
    Range { start: i64, end: i64 },
    /// An empty node, such as `8.1`. It has no surface form.
    Empty,
}

impl WordId {
    pub(crate) fn try_parse(id: &str, line_number: usize) -> Result<Self, FormatError> {
        if id.contains('.') {
            return Ok(Self::Empty);
        }
        if !id.contains('-') {
            return Ok(Self::Single);
        }
        let range_error = || FormatError::MultiwordRange {
            line_number,
            id: String::from(id),
        };
        let mut bounds = id.split('-');
        match (bounds.next(), bounds.next(), bounds.next()) {
            (Some(start), Some(end), None) => {
                let start = start.trim().parse::<i64>().map_err(|_| range_error())?;
                let end = end.trim().parse::<i64>().map_err(|_| range_error())?;
                Ok(Self::Range { start, end })
            }
            _ => Err(range_error()),
        }
    }

    /// Number of word lines following a multi-word token. A reversed range holds no word.
    pub(crate) fn word_count(&self) -> usize {
        match self {
            Self::Range { start, end } => end
                .checked_sub(*start)
                .and_then(|d| d.checked_add(1))
                .and_then(|d| usize::try_from(d).ok())
                .unwrap_or(0),
            Self::Single => 1,
            Self::Empty => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when a CoNLL-U document cannot be loaded. Every variant carries the (1-based)
/// number of the offending line.
pub enum FormatError {
    /// The line is not made of exactly 10 tab-separated columns.
    ColumnCount { line_number: usize, line: String },
    /// The `ID` of a multi-word token is not of the form `start-end`.
    MultiwordRange { line_number: usize, id: String },
    /// The document ends before all the words of a multi-word token were read.
    TruncatedMultiword { line_number: usize, id: String },
    /// The last sentence is not followed by an empty line.
    MissingTerminator { line_number: usize },
}

impl FormatError {
    pub fn line_number(&self) -> usize {
        match self {
            Self::ColumnCount { line_number, .. }
            | Self::MultiwordRange { line_number, .. }
            | Self::TruncatedMultiword { line_number, .. }
            | Self::MissingTerminator { line_number } => *line_number,
        }
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { line_number, line } => write!(
                f,
                "The CoNLL-U line {} does not contain {} tab-separated columns: '{}'",
                line_number, COLUMN_COUNT, line
            ),
            Self::MultiwordRange { line_number, id } => write!(
                f,
                "Cannot parse multi-word token ID '{}' on line {}",
                id, line_number
            ),
            Self::TruncatedMultiword { line_number, id } => write!(
                f,
                "The CoNLL-U file ends on line {} before all the words of the multi-word token '{}'",
                line_number, id
            ),
            Self::MissingTerminator { line_number } => write!(
                f,
                "The CoNLL-U file does not end with empty line (last line: {})",
                line_number
            ),
        }
    }
}

impl Error for FormatError {}
