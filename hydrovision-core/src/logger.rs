use crate::error::HydroError;
use csv::Writer;
use hydrovision_schemas::snapshot::SensorSnapshot;
use std::fs;
use std::path::Path;

/// Writes snapshots as CSV rows, one column per snapshot field.
pub struct TimeSeriesLogger {
    writer: Writer<fs::File>,
    path: String,
    rows: usize,
}

impl TimeSeriesLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, HydroError> {
        let path = path.as_ref().display().to_string();
        let writer = Writer::from_path(&path).map_err(|e| HydroError::CsvError(path.clone(), e))?;
        tracing::debug!(path = %path, "time series log opened");
        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    pub fn log_snapshot(&mut self, snapshot: &SensorSnapshot) -> Result<(), HydroError> {
        self.writer
            .serialize(snapshot)
            .map_err(|e| HydroError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| HydroError::FileIO(self.path.clone(), e))?;
        self.rows += 1;
        Ok(())
    }

    pub fn log_all<'a, I>(&mut self, snapshots: I) -> Result<(), HydroError>
    where
        I: IntoIterator<Item = &'a SensorSnapshot>,
    {
        for snapshot in snapshots {
            self.log_snapshot(snapshot)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::GeneratorBuilder;
    use chrono::Duration;

    #[test]
    fn rows_read_back_as_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let mut generator = GeneratorBuilder::new().with_seed(11).build().unwrap();
        let history: Vec<_> = generator.produce_history(Duration::hours(1), 12).collect();

        let mut logger = TimeSeriesLogger::new(&path).unwrap();
        logger.log_all(&history).unwrap();
        assert_eq!(logger.rows_written(), 12);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "timestamp");
        assert_eq!(&headers[2], "ph");

        let rows: Vec<SensorSnapshot> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 12);
        for (read, written) in rows.iter().zip(&history) {
            assert_eq!(read.sequence_step, written.sequence_step);
            assert_eq!(read.ph, written.ph);
            assert_eq!(read.timestamp, written.timestamp);
        }
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let result = TimeSeriesLogger::new("/nonexistent-dir/log.csv");
        assert!(matches!(result, Err(HydroError::CsvError(..))));
    }
}
