use crate::{
    classify::{self, AbortReason},
    error::EngineError,
    resolver::SchemaResolver,
};
use connectors::{
    http::page::PageSource,
    sink::{ProblemSink, StatsSink},
};
use model::{
    catalog::DatasetDescriptor,
    identifiers::today_string,
    pagination::{PageOutcome, PageRequest},
    records::Record,
    report::{self, FieldRow, OverviewRow, ProblemRow},
    result::DatasetResult,
    schema::FieldSchema,
    summary::RunSummary,
    tally::NullCounters,
};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Tuning knobs for one run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Read root for dataset resources, e.g. `https://portal/resource`.
    pub resource_root: String,
    pub page_limit: usize,
    pub page_delay: Duration,
    pub skip_name_prefixes: Vec<String>,
}

/// Result sinks for one run. The problem recorder is always present; any
/// number of interchangeable statistics recorders can be attached.
pub struct RunSinks {
    pub stats: Vec<Arc<dyn StatsSink>>,
    pub problems: Arc<dyn ProblemSink>,
}

/// Pagination state machine for one dataset. Each termination path maps to
/// exactly one named state or abort reason. Once resolved, the schema and
/// its counters travel inside the states that can reach `Done`, so a
/// completed dataset always has both by construction.
enum InspectState {
    Start,
    ResolvingSchema {
        outcome: PageOutcome,
        hint: Option<String>,
    },
    Fetching {
        progress: Option<Progress>,
    },
    Aggregating {
        progress: Progress,
        records: Vec<Record>,
    },
    Done {
        progress: Progress,
    },
    Aborted(AbortReason),
}

/// Resolved schema plus its running tallies.
struct Progress {
    schema: FieldSchema,
    counters: NullCounters,
}

impl Progress {
    fn new(schema: FieldSchema) -> Self {
        let counters = NullCounters::for_schema(&schema);
        Progress { schema, counters }
    }
}

/// Per-dataset loop state. Fully isolated: nothing here outlives or is
/// shared across datasets.
struct DatasetRun {
    offset: usize,
    cumulative: usize,
    last_url: String,
}

impl DatasetRun {
    fn new(hyperlink: String) -> Self {
        DatasetRun {
            offset: 0,
            cumulative: 0,
            // Until a fetch happens, the dataset page itself is the most
            // useful resource to point diagnostics at.
            last_url: hyperlink,
        }
    }
}

pub struct InspectionEngine {
    source: Arc<dyn PageSource>,
    resolver: SchemaResolver,
    options: EngineOptions,
}

impl InspectionEngine {
    pub fn new(source: Arc<dyn PageSource>, resolver: SchemaResolver, options: EngineOptions) -> Self {
        InspectionEngine {
            source,
            resolver,
            options,
        }
    }

    /// Inspects every dataset in catalog order, handing each result to the
    /// sinks. Stops between datasets when cancellation is requested;
    /// results already sunk stay valid.
    pub async fn run(
        &self,
        catalog: &[DatasetDescriptor],
        sinks: &RunSinks,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, EngineError> {
        let started = std::time::Instant::now();
        let mut summary = RunSummary::new(catalog.len());
        let date = today_string();

        for (index, descriptor) in catalog.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    "Shutdown requested; stopping after {} of {} datasets",
                    index,
                    catalog.len()
                );
                break;
            }

            info!(
                "{}/{}: {} ............. {}",
                index + 1,
                catalog.len(),
                descriptor.name.to_uppercase(),
                descriptor.api_id
            );

            let result = self.inspect_dataset(descriptor).await;
            summary.record(&result);
            self.dispatch(&result, sinks, &date).await?;
        }

        summary.elapsed = started.elapsed();
        info!(
            "Run finished: {} processed, {} clean, {} with nulls, {} problems, {:.2} minutes",
            summary.processed,
            summary.clean,
            summary.with_nulls,
            summary.problem,
            summary.elapsed_minutes()
        );
        Ok(summary)
    }

    /// Runs the pagination state machine for one dataset and produces its
    /// terminal result.
    pub async fn inspect_dataset(&self, descriptor: &DatasetDescriptor) -> DatasetResult {
        let hyperlink =
            report::dataset_hyperlink(&self.options.resource_root, &descriptor.api_id);
        let mut run = DatasetRun::new(hyperlink);
        let mut state = InspectState::Start;

        loop {
            state = match state {
                InspectState::Start => {
                    if classify::matches_skip_list(
                        &descriptor.name,
                        &self.options.skip_name_prefixes,
                    ) {
                        InspectState::Aborted(AbortReason::NamedExportSkip)
                    } else {
                        InspectState::Fetching { progress: None }
                    }
                }

                InspectState::Fetching { progress } => {
                    let request = PageRequest::new(
                        &descriptor.api_id,
                        self.options.page_limit,
                        run.offset,
                        run.cumulative,
                    );
                    let page = self.source.fetch(&request).await;
                    run.last_url = page.url.clone();

                    match (page.outcome, progress) {
                        (PageOutcome::TransportError(reason), _) => {
                            InspectState::Aborted(AbortReason::Transport { reason })
                        }
                        // Schema resolution is coupled to the first page:
                        // its metadata seeds the resolver.
                        (outcome, None) => InspectState::ResolvingSchema {
                            outcome,
                            hint: page.schema_hint,
                        },
                        // A follow-up page can legitimately come back empty
                        // when the record count is an exact multiple of the
                        // limit; records have already been aggregated here.
                        (PageOutcome::Empty, Some(progress)) => InspectState::Done { progress },
                        (PageOutcome::Records(records), Some(progress)) => {
                            InspectState::Aggregating { progress, records }
                        }
                    }
                }

                InspectState::ResolvingSchema { outcome, hint } => match outcome {
                    // An empty first page outranks schema trouble.
                    PageOutcome::Empty => InspectState::Aborted(AbortReason::EmptyResponse),
                    PageOutcome::Records(records) => {
                        match self
                            .resolver
                            .resolve(&descriptor.api_id, hint.as_deref())
                        {
                            Ok(schema) => InspectState::Aggregating {
                                progress: Progress::new(schema),
                                records,
                            },
                            Err(err) => {
                                InspectState::Aborted(AbortReason::SchemaUnresolved(err))
                            }
                        }
                    }
                    // Transport errors were already diverted in Fetching.
                    PageOutcome::TransportError(reason) => {
                        InspectState::Aborted(AbortReason::Transport { reason })
                    }
                },

                InspectState::Aggregating {
                    mut progress,
                    records,
                } => {
                    progress.counters.tally(&records);
                    run.cumulative += records.len();

                    if records.len() == self.options.page_limit {
                        run.offset += records.len();
                        // Give the remote servers a small interval before
                        // requesting more.
                        tokio::time::sleep(self.options.page_delay).await;
                        InspectState::Fetching {
                            progress: Some(progress),
                        }
                    } else {
                        InspectState::Done { progress }
                    }
                }

                InspectState::Done { progress } => {
                    return DatasetResult::completed(
                        descriptor.clone(),
                        &progress.schema,
                        &progress.counters,
                        run.cumulative as u64,
                    );
                }

                InspectState::Aborted(reason) => {
                    return classify::problem_result(descriptor, &reason, &run.last_url);
                }
            };
        }
    }

    async fn dispatch(
        &self,
        result: &DatasetResult,
        sinks: &RunSinks,
        date: &str,
    ) -> Result<(), EngineError> {
        if let Some(row) = ProblemRow::from_result(result) {
            warn!(
                "Problem dataset {}: {}",
                result.descriptor.name,
                result
                    .problem
                    .as_ref()
                    .map(|p| p.message.as_str())
                    .unwrap_or_default()
            );
            sinks.problems.report(&row).await?;
            return Ok(());
        }

        let overview = OverviewRow::from_result(result, &self.options.resource_root, date);
        let fields = FieldRow::rows_from_result(result, &self.options.resource_root, date);
        for sink in &sinks.stats {
            sink.record_overview(&overview).await?;
            sink.record_fields(&fields).await?;
        }
        Ok(())
    }
}
