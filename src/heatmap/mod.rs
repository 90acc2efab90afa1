// src/heatmap/mod.rs

//! Contribution calendar: date range → index → classified cells → sink.

pub mod grid;
pub mod html;
pub mod index;
pub mod interaction;
pub mod legend;
pub mod level;
pub mod range;
pub mod sink;

use chrono::{NaiveDate, NaiveDateTime};
use std::{fs, io, path::Path};
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::error::HeatmapError;
use grid::Grid;
use index::{ActivityRecord, ContributionIndex};
use range::DateRange;
use sink::RenderSink;

/// Global the site template assigns the records to.
const EMBED_PREFIX: &str = "window.HEATMAP_DATA";

/// Where the records come from. `Absent` (no data at all) and an empty list
/// are different: the first skips rendering, the second shows the empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Absent,
    Records(Vec<ActivityRecord>),
}

/// What the data-ready signal delivers.
pub type DataReady = Result<DataSource, HeatmapError>;

impl DataSource {
    /// Read records from a JSON file; a missing file is `Absent`.
    pub fn load(path: &Path) -> DataReady {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "heatmap data file not found");
                Ok(DataSource::Absent)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Accepts a bare JSON array or the page-embedded
    /// `window.HEATMAP_DATA = [...];` form. `null` means absent.
    pub fn parse(text: &str) -> DataReady {
        let mut body = text.trim();
        if let Some(rest) = body.strip_prefix(EMBED_PREFIX) {
            body = rest.trim_start().trim_start_matches('=').trim();
            body = body.strip_suffix(';').unwrap_or(body).trim_end();
        }
        let records: Option<Vec<ActivityRecord>> = serde_json::from_str(body)?;
        Ok(records.map_or(DataSource::Absent, DataSource::Records))
    }
}

/// Range plus index for one render cycle.
#[derive(Debug, Clone)]
pub struct Calendar {
    range: DateRange,
    index: ContributionIndex,
}

impl Calendar {
    pub fn new(
        records: Vec<ActivityRecord>,
        months_back: u32,
        now: NaiveDateTime,
    ) -> Result<Self, HeatmapError> {
        let range = DateRange::trailing(months_back, now)?;
        Ok(Calendar {
            range,
            index: ContributionIndex::build(records),
        })
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn index(&self) -> &ContributionIndex {
        &self.index
    }

    /// Fresh cell descriptors; identical inputs give identical grids.
    pub fn grid(&self) -> Grid<'_> {
        Grid::build(&self.range, &self.index)
    }
}

/// Result of turning the data-ready signal into something drawable.
#[derive(Debug)]
pub enum Prepared {
    Absent,
    Empty,
    Ready(Calendar),
    Failed(String),
}

pub fn prepare(data: DataReady, months_back: u32, now: NaiveDateTime) -> Prepared {
    let records = match data {
        Ok(DataSource::Absent) => return Prepared::Absent,
        Ok(DataSource::Records(records)) if records.is_empty() => return Prepared::Empty,
        Ok(DataSource::Records(records)) => records,
        Err(e) => return Prepared::Failed(e.to_string()),
    };
    match Calendar::new(records, months_back, now) {
        Ok(calendar) => Prepared::Ready(calendar),
        Err(e) => Prepared::Failed(e.to_string()),
    }
}

/// Await the data-ready signal. A dropped sender means the data never came.
pub async fn prepare_when_ready(
    ready: oneshot::Receiver<DataReady>,
    months_back: u32,
    now: NaiveDateTime,
) -> Prepared {
    let data = ready.await.unwrap_or(Ok(DataSource::Absent));
    prepare(data, months_back, now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoContainer,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Skipped(SkipReason),
    Empty,
    Rendered { weeks: usize, active_days: usize },
    Failed(String),
}

/// One render pass into `sink`. A missing sink or missing data leaves
/// everything untouched; failures are drawn once as the error state.
pub fn render<S: RenderSink + ?Sized>(
    sink: Option<&mut S>,
    data: DataReady,
    months_back: u32,
    now: NaiveDateTime,
) -> RenderOutcome {
    let Some(sink) = sink else {
        debug!("heatmap container missing, skipping render");
        return RenderOutcome::Skipped(SkipReason::NoContainer);
    };

    match prepare(data, months_back, now) {
        Prepared::Absent => {
            debug!("heatmap data missing, skipping render");
            RenderOutcome::Skipped(SkipReason::NoData)
        }
        Prepared::Empty => {
            sink.clear();
            sink.empty_state();
            RenderOutcome::Empty
        }
        Prepared::Failed(message) => {
            error!(%message, "heatmap render failed");
            sink.clear();
            sink.error_state(&message);
            RenderOutcome::Failed(message)
        }
        Prepared::Ready(calendar) => {
            let grid = calendar.grid();
            grid.render_into(sink);
            RenderOutcome::Rendered {
                weeks: grid.weeks(),
                active_days: grid.active_days(),
            }
        }
    }
}

/// [`render`] once the data-ready signal fires.
pub async fn render_when_ready<S: RenderSink + ?Sized>(
    sink: Option<&mut S>,
    ready: oneshot::Receiver<DataReady>,
    months_back: u32,
    now: NaiveDateTime,
) -> RenderOutcome {
    let data = ready.await.unwrap_or(Ok(DataSource::Absent));
    render(sink, data, months_back, now)
}

/// `June 1, 2024`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
