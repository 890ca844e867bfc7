use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a trace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceTag {
    System,
    State,
    Nlp,
    Constraint,
    Data,
    Filter,
    Rank,
}

impl TraceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceTag::System => "SYSTEM",
            TraceTag::State => "STATE",
            TraceTag::Nlp => "NLP",
            TraceTag::Constraint => "CONSTRAINT",
            TraceTag::Data => "DATA",
            TraceTag::Filter => "FILTER",
            TraceTag::Rank => "RANK",
        }
    }
}

impl fmt::Display for TraceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamped decision or event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub timestamp: NaiveTime,
    pub tag: TraceTag,
    pub message: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.tag,
            self.message
        )
    }
}

/// Append-only record of one search
///
/// Every entry is mirrored to `tracing` at debug level as it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tag: TraceTag, message: impl Into<String>) {
        let entry = TraceEntry {
            timestamp: Local::now().time(),
            tag,
            message: message.into(),
        };
        tracing::debug!(tag = tag.as_str(), "{}", entry.message);
        self.entries.push(entry);
    }

    /// Append another trace, keeping its entries and timestamps as recorded
    pub fn absorb(&mut self, other: Trace) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn with_tag(&self, tag: TraceTag) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |entry| entry.tag == tag)
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
