//! Scripted page source and in-memory sinks for driving the engine without
//! a live portal.

use crate::TEST_ROOT;
use async_trait::async_trait;
use connectors::{
    http::{
        error::HttpError,
        page::{FetchedPage, PageSource},
        upsert::{DeleteRow, ReportStore},
    },
    registry::OverrideRegistry,
    sink::{ProblemSink, SinkError, StatsSink},
};
use model::{
    pagination::{PageOutcome, PageRequest},
    records::Record,
    report::{FieldRow, OverviewRow, ProblemRow},
    schema::FieldSchema,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

/// One scripted response: the page shape plus the schema hint header the
/// transport would have carried.
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub outcome: PageOutcome,
    pub schema_hint: Option<String>,
}

impl ScriptedPage {
    pub fn records(records: Vec<Record>, hint: Option<&str>) -> Self {
        ScriptedPage {
            outcome: PageOutcome::Records(records),
            schema_hint: hint.map(|h| h.to_string()),
        }
    }

    pub fn empty(hint: Option<&str>) -> Self {
        ScriptedPage {
            outcome: PageOutcome::Empty,
            schema_hint: hint.map(|h| h.to_string()),
        }
    }

    pub fn transport_error(reason: &str) -> Self {
        ScriptedPage {
            outcome: PageOutcome::TransportError(reason.to_string()),
            schema_hint: None,
        }
    }
}

/// Page source that replays a fixed script per api id and records every
/// request it receives.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, VecDeque<ScriptedPage>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, api_id: &str, pages: Vec<ScriptedPage>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(api_id.to_string(), pages.into());
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch(&self, request: &PageRequest) -> FetchedPage {
        self.requests.lock().unwrap().push(request.clone());
        let page = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&request.api_id)
            .and_then(|pages| pages.pop_front())
            .unwrap_or_else(|| ScriptedPage::empty(None));
        FetchedPage {
            outcome: page.outcome,
            schema_hint: page.schema_hint,
            url: request.url(TEST_ROOT),
        }
    }
}

/// Report store replaying fixed row pages and capturing published deletes,
/// for driving the retention sweep without a live portal.
#[derive(Default)]
pub struct ScriptedReportStore {
    pages: Mutex<VecDeque<Vec<Record>>>,
    requests: Mutex<Vec<PageRequest>>,
    deletes: Mutex<Vec<(String, Vec<DeleteRow>)>>,
}

impl ScriptedReportStore {
    pub fn new(pages: Vec<Vec<Record>>) -> Self {
        ScriptedReportStore {
            pages: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(String, Vec<DeleteRow>)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportStore for ScriptedReportStore {
    async fn fetch_rows(&self, request: &PageRequest) -> Result<Vec<Record>, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn upsert_deletes(&self, dataset_id: &str, rows: &[DeleteRow]) -> Result<(), HttpError> {
        self.deletes
            .lock()
            .unwrap()
            .push((dataset_id.to_string(), rows.to_vec()));
        Ok(())
    }
}

/// Registry backed by a plain map, for resolver fallback tests.
#[derive(Default)]
pub struct MapRegistry {
    schemas: HashMap<String, FieldSchema>,
}

impl MapRegistry {
    pub fn with(mut self, api_id: &str, fields: &[&str]) -> Self {
        self.schemas.insert(
            api_id.to_string(),
            FieldSchema::new(fields.iter().map(|f| f.to_string()).collect()),
        );
        self
    }
}

impl OverrideRegistry for MapRegistry {
    fn lookup(&self, api_id: &str) -> Option<&FieldSchema> {
        self.schemas.get(api_id)
    }
}

/// Statistics sink capturing rows in memory.
#[derive(Default)]
pub struct MemoryStatsSink {
    pub overview: Mutex<Vec<OverviewRow>>,
    pub fields: Mutex<Vec<FieldRow>>,
}

#[async_trait]
impl StatsSink for MemoryStatsSink {
    async fn record_overview(&self, row: &OverviewRow) -> Result<(), SinkError> {
        self.overview.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn record_fields(&self, rows: &[FieldRow]) -> Result<(), SinkError> {
        self.fields.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }
}

/// Problem sink capturing rows in memory.
#[derive(Default)]
pub struct MemoryProblemSink {
    pub rows: Mutex<Vec<ProblemRow>>,
}

#[async_trait]
impl ProblemSink for MemoryProblemSink {
    async fn report(&self, row: &ProblemRow) -> Result<(), SinkError> {
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// Builds `count` records shaped like `template`.
pub fn records_like(template: &str, count: usize) -> Vec<Record> {
    let record: Record = serde_json::from_str(template).expect("valid record json");
    vec![record; count]
}
