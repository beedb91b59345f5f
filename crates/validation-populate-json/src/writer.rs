//! Bounded-memory JSON array writer.
//!
//! Output layout:
//!
//! ```text
//! [
//!   {"trip_id":"T1","stop_id":"A","validation_time":"08:00:00"},
//!   {"trip_id":"T2","stop_id":"C","validation_time":"20:00:00"}
//! ]
//! ```
//!
//! At most `batch_size` events are held at once; each full batch is
//! serialized, written to the sink and flushed together. A run with no
//! elements produces `[`, a blank line and `]`, which is still valid JSON.

use crate::error::JsonPopulatorError;
use chrono::NaiveDate;
use rand::Rng;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use transit_schedule::ValidationEvent;
use validation_generator::SamplingEngine;

/// Default number of serialized elements held before a forced flush.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default number of written elements between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

const ARRAY_OPEN: &[u8] = b"[\n";
const ARRAY_CLOSE: &[u8] = b"\n]";
const ELEMENT_SEPARATOR: &[u8] = b",\n";
const ELEMENT_INDENT: &[u8] = b"  ";

/// Writer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Serialized elements buffered before the batch is written and flushed.
    pub batch_size: usize,
    /// Written elements between progress notifications.
    pub progress_interval: u64,
    /// Optional `YYYY-MM-DD` date added to every element as `validation_date`.
    pub validation_date: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            validation_date: None,
        }
    }
}

impl StreamConfig {
    /// Reject settings the writer cannot honour.
    pub fn validate(&self) -> Result<(), JsonPopulatorError> {
        if self.batch_size == 0 {
            return Err(JsonPopulatorError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(JsonPopulatorError::InvalidConfig(
                "progress interval must be at least 1".to_string(),
            ));
        }
        if let Some(date) = &self.validation_date {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                JsonPopulatorError::InvalidConfig(format!(
                    "validation date '{date}' is not YYYY-MM-DD: {e}"
                ))
            })?;
        }
        Ok(())
    }
}

/// What a completed stream wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Generation attempts consumed.
    pub attempts: u64,
    /// Elements written to the array.
    pub written: u64,
    /// Attempts that produced no event.
    pub skipped: u64,
    /// Batches written to the sink.
    pub batches: u64,
    /// Bytes written to the sink, delimiters included.
    pub bytes: u64,
    /// Largest number of elements ever held unflushed.
    pub max_pending: usize,
    /// Time spent producing events.
    pub generation_duration: Duration,
    /// Time spent serializing and writing.
    pub write_duration: Duration,
}

/// Streams validation events into a JSON array on `sink`.
///
/// Events are collected into a batch of at most `batch_size` elements, then
/// the batch is serialized, written and flushed in one go. Timing is taken
/// once per batch, not per element.
pub struct StreamWriter<W: Write> {
    sink: W,
    config: StreamConfig,
    validation_date: Option<Arc<str>>,
    batch: Vec<ValidationEvent>,
    buffer: Vec<u8>,
    summary: StreamSummary,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(sink: W, config: StreamConfig) -> Result<Self, JsonPopulatorError> {
        config.validate()?;
        let validation_date = config.validation_date.as_deref().map(Arc::from);
        let batch = Vec::with_capacity(config.batch_size.min(DEFAULT_BATCH_SIZE));
        Ok(Self {
            sink,
            config,
            validation_date,
            batch,
            buffer: Vec::new(),
            summary: StreamSummary::default(),
        })
    }

    /// Generate `count` attempts with `engine` and write the resulting document.
    ///
    /// Returns the number of elements written, which is lower than `count`
    /// when the engine has nothing to sample from.
    pub fn run<R: Rng>(
        self,
        engine: &SamplingEngine<'_>,
        count: u64,
        rng: &mut R,
    ) -> Result<u64, JsonPopulatorError> {
        let summary = self.write_attempts((0..count).map(|_| engine.generate_one(rng)))?;
        Ok(summary.written)
    }

    /// Write one array element per `Some` attempt; `None` attempts are skipped.
    pub fn write_attempts<I>(mut self, attempts: I) -> Result<StreamSummary, JsonPopulatorError>
    where
        I: IntoIterator<Item = Option<ValidationEvent>>,
    {
        self.write_raw(ARRAY_OPEN)?;

        let mut attempts = attempts.into_iter();
        loop {
            let gen_start = Instant::now();
            let exhausted = self.fill_batch(&mut attempts);
            self.summary.generation_duration += gen_start.elapsed();

            let write_start = Instant::now();
            self.write_batch()?;
            self.summary.write_duration += write_start.elapsed();

            if exhausted {
                break;
            }
        }

        self.write_raw(ARRAY_CLOSE)?;
        self.sink.flush()?;

        debug!(
            "Stream closed: {} elements in {} batches, {} bytes",
            self.summary.written, self.summary.batches, self.summary.bytes
        );
        Ok(self.summary)
    }

    /// Pull attempts until the batch is full. Returns `true` once `attempts`
    /// is exhausted.
    fn fill_batch<I>(&mut self, attempts: &mut I) -> bool
    where
        I: Iterator<Item = Option<ValidationEvent>>,
    {
        while self.batch.len() < self.config.batch_size {
            let Some(attempt) = attempts.next() else {
                return true;
            };
            self.summary.attempts += 1;

            let Some(event) = attempt else {
                self.summary.skipped += 1;
                continue;
            };
            let event = match &self.validation_date {
                Some(date) => event.with_date(date.clone()),
                None => event,
            };
            self.batch.push(event);

            let generated = self.summary.written + self.batch.len() as u64;
            if generated % self.config.progress_interval == 0 {
                info!("Generated {} validations...", generated);
            }
        }
        false
    }

    /// Serialize the pending batch, write it to the sink and flush.
    fn write_batch(&mut self) -> Result<(), JsonPopulatorError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.summary.max_pending = self.summary.max_pending.max(self.batch.len());

        for event in self.batch.drain(..) {
            if self.summary.written > 0 {
                self.buffer.extend_from_slice(ELEMENT_SEPARATOR);
            }
            self.buffer.extend_from_slice(ELEMENT_INDENT);
            serde_json::to_writer(&mut self.buffer, &event)?;
            self.summary.written += 1;
        }

        self.sink.write_all(&self.buffer)?;
        self.sink.flush()?;
        self.summary.bytes += self.buffer.len() as u64;
        self.summary.batches += 1;
        self.buffer.clear();
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), JsonPopulatorError> {
        self.sink.write_all(bytes)?;
        self.summary.bytes += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde::de::IgnoredAny;
    use serde::Deserialize;
    use std::cell::Cell;
    use std::fs::File;
    use std::io::{self, BufReader, BufWriter};
    use std::rc::Rc;
    use tempfile::TempDir;
    use transit_schedule::ScheduleIndex;
    use validation_generator::SamplingStrategy;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Element {
        trip_id: String,
        stop_id: String,
        validation_time: String,
    }

    fn event(trip: &str, stop: &str, time: &str) -> ValidationEvent {
        ValidationEvent::new(trip.into(), stop.into(), time.to_string())
    }

    fn small_batches(batch_size: usize) -> StreamConfig {
        StreamConfig {
            batch_size,
            ..StreamConfig::default()
        }
    }

    /// Records each `write_all` call separately.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    /// Fails every write after the first `allowed` bytes.
    struct FailingSink {
        allowed: usize,
        written: Vec<u8>,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.allowed {
                return Err(io::Error::other("disk full"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_zero_elements_is_valid_json() {
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, StreamConfig::default()).unwrap();
        let summary = writer.write_attempts(std::iter::empty()).unwrap();

        assert_eq!(summary.written, 0);
        assert_eq!(out, b"[\n\n]");
        let parsed: Vec<Element> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_layout_and_separators() {
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, StreamConfig::default()).unwrap();
        writer
            .write_attempts(vec![
                Some(event("T1", "A", "08:00:00")),
                Some(event("T2", "C", "20:00:00")),
            ])
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[\n  {\"trip_id\":\"T1\",\"stop_id\":\"A\",\"validation_time\":\"08:00:00\"},\n  \
             {\"trip_id\":\"T2\",\"stop_id\":\"C\",\"validation_time\":\"20:00:00\"}\n]"
        );
    }

    #[test]
    fn test_none_attempts_are_skipped() {
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, StreamConfig::default()).unwrap();
        let summary = writer
            .write_attempts(vec![
                None,
                Some(event("T1", "A", "08:00:00")),
                None,
                Some(event("T1", "B", "08:10:00")),
                None,
            ])
            .unwrap();

        assert_eq!(summary.attempts, 5);
        assert_eq!(summary.written, 2);
        assert_eq!(summary.skipped, 3);
        let parsed: Vec<Element> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].stop_id, "B");
    }

    #[test]
    fn test_only_none_attempts_is_empty_array() {
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, StreamConfig::default()).unwrap();
        let summary = writer.write_attempts(vec![None, None]).unwrap();
        assert_eq!(summary.written, 0);
        assert_eq!(out, b"[\n\n]");
    }

    #[test]
    fn test_batches_never_exceed_batch_size() {
        let mut sink = RecordingSink::default();
        let writer = StreamWriter::new(&mut sink, small_batches(7)).unwrap();
        let attempts = (0..100).map(|i| Some(event("T1", &format!("S{i}"), "08:00:00")));
        let summary = writer.write_attempts(attempts).unwrap();

        assert_eq!(summary.written, 100);
        assert_eq!(summary.max_pending, 7);
        assert_eq!(summary.batches, 15);

        // First write is the opening bracket, last is the closing one.
        let batches = &sink.writes[1..sink.writes.len() - 1];
        assert_eq!(batches.len(), 15);
        for batch in batches {
            let elements = batch.windows(10).filter(|w| *w == &b"\"trip_id\":"[..]).count();
            assert!(elements <= 7, "batch held {elements} elements");
        }
        assert!(sink.flushes >= 15);
    }

    #[test]
    fn test_bytes_match_output() {
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, small_batches(3)).unwrap();
        let attempts = (0..10).map(|_| Some(event("T1", "A", "08:00:00")));
        let summary = writer.write_attempts(attempts).unwrap();
        assert_eq!(summary.bytes, out.len() as u64);
    }

    #[test]
    fn test_validation_date_field() {
        let config = StreamConfig {
            validation_date: Some("2025-06-22".to_string()),
            ..StreamConfig::default()
        };
        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, config).unwrap();
        writer
            .write_attempts(vec![Some(event("T1", "A", "08:00:00"))])
            .unwrap();

        let parsed: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["validation_date"], "2025-06-22");
        assert_eq!(parsed[0].as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut out = Vec::new();
        assert!(matches!(
            StreamWriter::new(&mut out, small_batches(0)),
            Err(JsonPopulatorError::InvalidConfig(_))
        ));

        let config = StreamConfig {
            progress_interval: 0,
            ..StreamConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StreamConfig {
            validation_date: Some("22/06/2025".to_string()),
            ..StreamConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut sink = FailingSink {
            allowed: 100,
            written: Vec::new(),
        };
        let writer = StreamWriter::new(&mut sink, small_batches(2)).unwrap();
        let attempts = (0..50).map(|_| Some(event("T1", "A", "08:00:00")));
        let result = writer.write_attempts(attempts);

        assert!(matches!(result, Err(JsonPopulatorError::Io(_))));
        assert!(sink.written.starts_with(b"[\n"));
        assert!(!sink.written.ends_with(b"]"));
    }

    #[test]
    fn test_run_with_engine() {
        let index = ScheduleIndex::from_reader(
            "trip_id,arrival_time,stop_id\nT1,08:00:00,A\nT1,08:10:00,B\nT2,20:00:00,C\n".as_bytes(),
        )
        .unwrap();
        let engine = SamplingEngine::new(&index, SamplingStrategy::Weighted);
        let mut rng = StdRng::seed_from_u64(42);

        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, small_batches(16)).unwrap();
        let written = writer.run(&engine, 1000, &mut rng).unwrap();

        assert_eq!(written, 1000);
        let parsed: Vec<Element> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 1000);
        for element in &parsed {
            let visits = index.visits(&element.trip_id).unwrap();
            assert!(visits.iter().any(|v| v.stop_id.as_ref() == element.stop_id));
            assert_eq!(element.validation_time.len(), 8);
        }
    }

    #[test]
    fn test_attempts_are_pulled_one_batch_at_a_time() {
        /// Records how many attempts had been pulled at each write.
        struct PullSink {
            pulled: Rc<Cell<u64>>,
            pulled_at_write: Vec<u64>,
        }

        impl Write for PullSink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.pulled_at_write.push(self.pulled.get());
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let pulled = Rc::new(Cell::new(0u64));
        let mut sink = PullSink {
            pulled: pulled.clone(),
            pulled_at_write: Vec::new(),
        };
        let attempts = (0..100).map(|_| {
            pulled.set(pulled.get() + 1);
            Some(event("T1", "A", "08:00:00"))
        });

        let writer = StreamWriter::new(&mut sink, small_batches(25)).unwrap();
        let summary = writer.write_attempts(attempts).unwrap();

        assert_eq!(summary.batches, 4);
        // Opening bracket, four batches, closing bracket.
        assert_eq!(sink.pulled_at_write, vec![0, 25, 50, 75, 100, 100]);
    }

    #[test]
    fn test_run_millions_of_attempts() {
        /// Streams to a file and tracks the most elements seen in one write.
        struct CountingSink {
            file: BufWriter<File>,
            max_elements_per_write: usize,
        }

        impl Write for CountingSink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                let elements = buf.iter().filter(|&&b| b == b'{').count();
                self.max_elements_per_write = self.max_elements_per_write.max(elements);
                self.file.write_all(buf)?;
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                self.file.flush()
            }
        }

        let index = ScheduleIndex::from_reader(
            "trip_id,arrival_time,stop_id\n\
             T1,07:45:00,A\nT1,07:52:00,B\nT1,08:01:00,C\n\
             T2,12:10:00,B\nT2,12:20:00,D\n\
             T3,17:30:00,A\nT3,17:41:00,D\n\
             T4,24:50:00,C\n"
                .as_bytes(),
        )
        .unwrap();
        let engine = SamplingEngine::new(&index, SamplingStrategy::Weighted);
        let mut rng = StdRng::seed_from_u64(42);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("validations.json");
        let mut sink = CountingSink {
            file: BufWriter::new(File::create(&path).unwrap()),
            max_elements_per_write: 0,
        };

        let count = 1_500_000;
        let writer = StreamWriter::new(&mut sink, StreamConfig::default()).unwrap();
        let written = writer.run(&engine, count, &mut rng).unwrap();

        assert_eq!(written, count);
        assert!(sink.max_elements_per_write <= DEFAULT_BATCH_SIZE);

        let reader = BufReader::new(File::open(&path).unwrap());
        let parsed: Vec<IgnoredAny> = serde_json::from_reader(reader).unwrap();
        assert_eq!(parsed.len() as u64, count);
    }

    #[test]
    fn test_run_with_empty_index() {
        let index = ScheduleIndex::from_reader("trip_id,arrival_time,stop_id\n".as_bytes()).unwrap();
        let engine = SamplingEngine::new(&index, SamplingStrategy::Weighted);
        let mut rng = StdRng::seed_from_u64(42);

        let mut out = Vec::new();
        let writer = StreamWriter::new(&mut out, StreamConfig::default()).unwrap();
        assert_eq!(writer.run(&engine, 500, &mut rng).unwrap(), 0);
        assert_eq!(out, b"[\n\n]");
    }
}
