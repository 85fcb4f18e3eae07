//! JSON export of a search run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tourmap::{BusinessRecord, RunSummary, SearchResults, map_center};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct Point {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
}

impl From<(f64, f64)> for Point {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Export<'a> {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) target: Option<Point>,
    pub(crate) center: Option<Point>,
    pub(crate) summary: &'a RunSummary,
    pub(crate) hit_rate: u8,
    pub(crate) records: &'a [BusinessRecord],
}

impl<'a> Export<'a> {
    pub(crate) fn new(
        results: &'a SearchResults,
        target: Option<(f64, f64)>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            target: target.map(Point::from),
            center: map_center(target, &results.records).map(Point::from),
            summary: &results.summary,
            hit_rate: results.summary.hit_rate(),
            records: &results.records,
        }
    }

    pub(crate) fn write(&self, mut writer: impl Write) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub(crate) fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))
    }
}
