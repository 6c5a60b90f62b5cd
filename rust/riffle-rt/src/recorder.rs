//! Result persistence for the coordinator's timing observations.
//!
//! One record per run: the group size and the mean timed window, written
//! as a tab-separated line with seven decimal digits of seconds. Only the
//! coordinator records; an unavailable sink is fatal to the whole run, not
//! just to the coordinator, because a run whose results cannot land
//! anywhere is worth less than no run at all being reported.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// The result sink could not be opened or written.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("result sink unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts one `(group_size, mean duration)` observation per run.
pub trait Recorder {
    fn record(&mut self, group_size: usize, mean: Duration) -> Result<(), RecorderError>;
}

/// The canonical record format: `<group_size>\t<seconds to 7 digits>`.
pub fn record_line(group_size: usize, mean: Duration) -> String {
    format!("{}\t{:.7}", group_size, mean.as_secs_f64())
}

/// Appends records to a file, one line each.
pub struct FileRecorder {
    out: BufWriter<File>,
}

impl FileRecorder {
    /// Open `path` for appending, creating it if absent. Failing to open
    /// the sink must abort the run before any group member starts.
    pub fn append(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }
}

impl Recorder for FileRecorder {
    fn record(&mut self, group_size: usize, mean: Duration) -> Result<(), RecorderError> {
        writeln!(self.out, "{}", record_line(group_size, mean))?;
        self.out.flush()?;
        Ok(())
    }
}

/// In-memory recorder for tests.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    pub entries: Vec<(usize, Duration)>,
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, group_size: usize, mean: Duration) -> Result<(), RecorderError> {
        self.entries.push((group_size, mean));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn record_line_has_seven_decimal_digits() {
        let line = record_line(4, Duration::from_secs_f64(0.1234567));
        assert_eq!(line, "4\t0.1234567");
        assert_eq!(record_line(2, Duration::from_millis(1500)), "2\t1.5000000");
        assert_eq!(record_line(1, Duration::ZERO), "1\t0.0000000");
    }

    #[test]
    fn file_recorder_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "riffle-recorder-test-{}.tsv",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut recorder = FileRecorder::append(&path).unwrap();
        recorder.record(2, Duration::from_millis(250)).unwrap();
        recorder.record(4, Duration::from_millis(125)).unwrap();
        drop(recorder);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "2\t0.2500000\n4\t0.1250000\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unreachable_sink_fails_to_open() {
        let missing_dir = std::env::temp_dir()
            .join("riffle-recorder-no-such-dir")
            .join("results.tsv");
        assert!(FileRecorder::append(missing_dir).is_err());
    }

    #[test]
    fn memory_recorder_keeps_entries() {
        let mut recorder = MemoryRecorder::default();
        recorder.record(8, Duration::from_secs(1)).unwrap();
        assert_eq!(recorder.entries, vec![(8, Duration::from_secs(1))]);
    }
}
