//! Per-tick telemetry archived as CSV.
//!
//! A [TelemetryWriter] is opened at the start of a driving session and
//! flushes every record as it is written. Dropping the writer flushes
//! whatever remains, so the archive is complete however the session ends.

use crate::error::TelemetryError;
use csv::{Terminator, WriterBuilder};
use log::warn;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// One tick of telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// The host's simulation time in s.
    pub time: f64,
    pub steering: f64,
    pub throttle: f64,
    /// The distance from the vehicle to the road curve, zero when not tracking.
    pub lateral_distance: f64,
    /// Whether the vehicle has crashed. Part of the schema but not populated by the controller.
    pub crash: Option<bool>,
}

impl TelemetryRecord {
    /// The CSV header row.
    pub const HEADER: [&'static str; 5] = ["time", "steering", "throttle", "lateral_distance", "crash"];
}

/// Writes telemetry records to a CSV archive.
pub struct TelemetryWriter<W: Write> {
    writer: Option<csv::Writer<W>>,
}

impl TelemetryWriter<File> {
    /// Creates (or truncates) a telemetry file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TelemetryError> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> TelemetryWriter<W> {
    /// Wraps a writer, immediately writing the header row.
    pub fn from_writer(inner: W) -> Result<Self, TelemetryError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        writer.write_record(TelemetryRecord::HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer: Some(writer),
        })
    }

    /// Appends a record and flushes it.
    pub fn record(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let writer = self.writer.as_mut().ok_or(TelemetryError::Closed)?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Flushes and closes the archive, returning the underlying writer.
    pub fn finish(mut self) -> Result<W, TelemetryError> {
        let mut writer = self.writer.take().ok_or(TelemetryError::Closed)?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| TelemetryError::Io(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

impl<W: Write> Drop for TelemetryWriter<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                warn!("Failed to flush telemetry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(time: f64, lateral_distance: f64) -> TelemetryRecord {
        TelemetryRecord {
            time,
            steering: -0.25,
            throttle: 0.1,
            lateral_distance,
            crash: None,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut writer = TelemetryWriter::from_writer(vec![]).unwrap();
        writer.record(&record(0.0, 1.5)).unwrap();
        writer.record(&record(0.02, 0.0)).unwrap();
        let bytes = writer.finish().unwrap();

        let text = String::from_utf8(bytes).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "time,steering,throttle,lateral_distance,crash",
                "0.0,-0.25,0.1,1.5,",
                "0.02,-0.25,0.1,0.0,",
            ]
        );
    }

    #[test]
    fn header_written_without_records() {
        let writer = TelemetryWriter::from_writer(vec![]).unwrap();
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(text, "time,steering,throttle,lateral_distance,crash\n");
    }

    #[test]
    fn file_is_flushed_on_drop() {
        let path = std::env::temp_dir().join(format!("curve-drive-telemetry-{}.csv", std::process::id()));
        {
            let mut writer = TelemetryWriter::create(&path).unwrap();
            writer.record(&record(1.0, 2.0)).unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().nth(1), Some("1.0,-0.25,0.1,2.0,"));
    }
}
