//! Journal Output
//!
//! [`ActionJournal`] buffers the records a tick produces. When an
//! [`ActionLogger`] is installed, the journal is drained into it at the end of
//! every tick; the logger appends one JSON object per line and keeps a running
//! count of each record kind so summaries never need the records themselves.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use skill_events::ActionEvent;

/// Resource: append-only JSONL sink with per-kind totals
#[derive(Resource)]
pub struct ActionLogger {
    sink: Option<BufWriter<File>>,
    written: BTreeMap<&'static str, u64>,
}

impl ActionLogger {
    /// Start a fresh journal file at `path`, replacing any previous run
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_sink(Some(BufWriter::new(file))))
    }

    /// Count records without writing them anywhere
    pub fn discard() -> Self {
        Self::with_sink(None)
    }

    fn with_sink(sink: Option<BufWriter<File>>) -> Self {
        Self {
            sink,
            written: BTreeMap::new(),
        }
    }

    /// Append `records` in order. Stops at the first write error.
    pub fn append(&mut self, records: &[ActionEvent]) -> io::Result<()> {
        for record in records {
            if let Some(sink) = self.sink.as_mut() {
                let line = record.to_jsonl()?;
                writeln!(sink, "{line}")?;
            }
            *self.written.entry(record.kind.label()).or_default() += 1;
        }
        Ok(())
    }

    /// Records of one kind (by journal label) appended so far
    pub fn written(&self, label: &str) -> u64 {
        self.written.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.written.values().sum()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ActionLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to flush action log");
        }
    }
}

/// Resource: journal records not yet handed to a logger, in order
#[derive(Resource, Debug, Default)]
pub struct ActionJournal {
    events: Vec<ActionEvent>,
}

impl ActionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ActionEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = ActionEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_events::fixtures::sample_journal;
    use std::io::BufRead;

    #[test]
    fn test_appended_lines_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = sample_journal();

        let mut logger = ActionLogger::create(&path).unwrap();
        logger.append(&journal[..4]).unwrap();
        logger.append(&journal[4..]).unwrap();
        logger.flush().unwrap();

        let lines: Vec<String> = io::BufReader::new(File::open(&path).unwrap())
            .lines()
            .map(|l| l.unwrap())
            .collect();
        let parsed: Vec<ActionEvent> = lines
            .iter()
            .map(|line| ActionEvent::from_jsonl(line).unwrap())
            .collect();
        assert_eq!(parsed, journal);
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        std::fs::write(&path, "stale\nstale\n").unwrap();

        let mut logger = ActionLogger::create(&path).unwrap();
        logger.append(&sample_journal()[..1]).unwrap();
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_totals_by_kind() {
        let mut logger = ActionLogger::discard();
        logger.append(&sample_journal()).unwrap();
        assert_eq!(logger.total(), 8);
        assert_eq!(logger.written("rewarded"), 1);
        assert_eq!(logger.written("mutation_fired"), 1);
        assert_eq!(logger.written("mutation_skipped"), 0);
    }

    #[test]
    fn test_journal_drain() {
        let mut journal = ActionJournal::new();
        let records = sample_journal();
        journal.extend(records[..3].iter().cloned());
        journal.push(records[3].clone());
        assert_eq!(journal.len(), 4);

        assert_eq!(journal.drain(), records[..4].to_vec());
        assert!(journal.is_empty());
    }
}
