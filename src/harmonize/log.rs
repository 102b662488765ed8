//! Decision log entries and their tallies.
//!
//! Each entry is one line of free text prefixed with the input line number:
//!
//! ```text
//! Line 12: (WARNING) Chromosome of rs123 at chr99:100 is not in reference.
//! Line 13: Alleles AT/A of rs456 at chr2:500 changed to R/D.
//! Line 13: rs456 changed to chr2:500:INDEL.
//! ```

use std::fmt;

use crate::core::types::AlleleCode;

const WARNING_KINDS: usize = 8;
const MESSAGE_KINDS: usize = 3;

/// Per-record problems that stop a record from being harmonized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    ChromosomeMissing,
    NotInReference,
    TypeMismatch,
    AllelesMismatch,
    StrandMismatch,
    BadPosition,
    BadIdentifier,
    UnrecognizedAlleles,
}

impl Warning {
    pub const ALL: [Warning; WARNING_KINDS] = [
        Self::ChromosomeMissing,
        Self::NotInReference,
        Self::TypeMismatch,
        Self::AllelesMismatch,
        Self::StrandMismatch,
        Self::BadPosition,
        Self::BadIdentifier,
        Self::UnrecognizedAlleles,
    ];

    /// Label used in summaries
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ChromosomeMissing => "Chromosome name is not in reference",
            Self::NotInReference => "Variant is not in reference",
            Self::TypeMismatch => "Variation type mismatch in input file and reference",
            Self::AllelesMismatch => "Alleles mismatch in input file and reference",
            Self::StrandMismatch => "Strand mismatch in input file and reference",
            Self::BadPosition => "Position is not numeric in input file",
            Self::BadIdentifier => {
                "Identifier does not follow CHR:POS, CHR:POS:TYPE or rsID formats"
            }
            Self::UnrecognizedAlleles => "Unrecognized alleles in input file",
        }
    }

    fn describe(self, site: &Site) -> String {
        let Site {
            id,
            chromosome,
            alleles: (first, second),
            ..
        } = site;
        let locus = site.locus();
        match self {
            Self::ChromosomeMissing => {
                format!("Chromosome of {id} at {locus} is not in reference.")
            }
            Self::NotInReference => format!("{id} at {locus} is not in reference."),
            Self::TypeMismatch => {
                format!("Type of {id} at {locus} doesn't match type in reference.")
            }
            Self::AllelesMismatch => format!(
                "Alleles {first}/{second} of {id} at {locus} don't match alleles in reference."
            ),
            Self::StrandMismatch => {
                format!("Strand of {id} at {locus} doesn't match strand in reference.")
            }
            Self::BadPosition => format!(
                "Position {} of {id} on chromosome {chromosome} can't be parsed to integer.",
                site.position.as_deref().unwrap_or_default()
            ),
            Self::BadIdentifier => format!(
                "{id} identifier doesn't follow CHR:POS, CHR:POS:TYPE, or rsID formats."
            ),
            Self::UnrecognizedAlleles => format!(
                "Alleles {first}/{second} of {id} at {locus} don't match any variation type."
            ),
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::ChromosomeMissing => 0,
            Self::NotInReference => 1,
            Self::TypeMismatch => 2,
            Self::AllelesMismatch => 3,
            Self::StrandMismatch => 4,
            Self::BadPosition => 5,
            Self::BadIdentifier => 6,
            Self::UnrecognizedAlleles => 7,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Changes made to a record that was harmonized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    StrandFlipped,
    AllelesChanged,
    IdChanged,
}

impl Message {
    pub const ALL: [Message; MESSAGE_KINDS] =
        [Self::StrandFlipped, Self::AllelesChanged, Self::IdChanged];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::StrandFlipped => "Strand flipped",
            Self::AllelesChanged => "Alleles changed",
            Self::IdChanged => "ID changed",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::StrandFlipped => 0,
            Self::AllelesChanged => 1,
            Self::IdChanged => 2,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a record looked like when it was read, for log text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub chromosome: String,
    /// Position text, when the record carries one
    pub position: Option<String>,
    pub alleles: (String, String),
}

impl Site {
    /// `CHR:POS`, or just `CHR` when no position is known
    #[must_use]
    pub fn locus(&self) -> String {
        match &self.position {
            Some(position) => format!("{}:{}", self.chromosome, position),
            None => self.chromosome.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Warning(Warning),
    Message(Message),
}

/// One line of the decision log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// 1-based input line number
    pub line: u64,
    pub kind: EntryKind,
    text: String,
}

impl LogEntry {
    #[must_use]
    pub fn warning(line: u64, warning: Warning, site: &Site) -> Self {
        Self {
            line,
            kind: EntryKind::Warning(warning),
            text: warning.describe(site),
        }
    }

    #[must_use]
    pub fn strand_flipped(line: u64, site: &Site) -> Self {
        Self {
            line,
            kind: EntryKind::Message(Message::StrandFlipped),
            text: format!("Strand of {} at {} flipped.", site.id, site.locus()),
        }
    }

    #[must_use]
    pub fn alleles_changed(line: u64, site: &Site, codes: (AlleleCode, AlleleCode)) -> Self {
        let (first, second) = &site.alleles;
        Self {
            line,
            kind: EntryKind::Message(Message::AllelesChanged),
            text: format!(
                "Alleles {first}/{second} of {} at {} changed to {}/{}.",
                site.id,
                site.locus(),
                codes.0,
                codes.1
            ),
        }
    }

    #[must_use]
    pub fn id_changed(line: u64, from: &str, to: &str) -> Self {
        Self {
            line,
            kind: EntryKind::Message(Message::IdChanged),
            text: format!("{from} changed to {to}."),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Warning(_) => write!(f, "Line {}: (WARNING) {}", self.line, self.text),
            EntryKind::Message(_) => write!(f, "Line {}: {}", self.line, self.text),
        }
    }
}

/// Counts of every warning and message kind written to the log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    warnings: [u64; WARNING_KINDS],
    messages: [u64; MESSAGE_KINDS],
}

impl Tally {
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Warning(w) => self.warnings[w.slot()] += 1,
            EntryKind::Message(m) => self.messages[m.slot()] += 1,
        }
    }

    #[must_use]
    pub fn warning_count(&self, warning: Warning) -> u64 {
        self.warnings[warning.slot()]
    }

    #[must_use]
    pub fn message_count(&self, message: Message) -> u64 {
        self.messages[message.slot()]
    }

    /// Every warning kind with its count, in a fixed order
    pub fn warnings(&self) -> impl Iterator<Item = (Warning, u64)> + '_ {
        Warning::ALL.iter().map(|w| (*w, self.warning_count(*w)))
    }

    /// Every message kind with its count, in a fixed order
    pub fn messages(&self) -> impl Iterator<Item = (Message, u64)> + '_ {
        Message::ALL.iter().map(|m| (*m, self.message_count(*m)))
    }

    #[must_use]
    pub fn total_warnings(&self) -> u64 {
        self.warnings.iter().sum()
    }

    #[must_use]
    pub fn total_messages(&self) -> u64 {
        self.messages.iter().sum()
    }
}
