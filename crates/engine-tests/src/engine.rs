#[cfg(test)]
mod tests {
    use crate::{
        TEST_ROOT,
        mock::{
            MapRegistry, MemoryProblemSink, MemoryStatsSink, ScriptedPage, ScriptedSource,
            records_like,
        },
    };
    use engine::{
        inspect::{EngineOptions, InspectionEngine, RunSinks},
        resolver::SchemaResolver,
    };
    use model::{
        catalog::DatasetDescriptor,
        result::DatasetStatus,
    };
    use std::{sync::Arc, time::Duration};
    use tokio_util::sync::CancellationToken;

    const API_ID: &str = "abcd-1234";
    const SKIP_PREFIX: &str = "Statewide Vehicle Crashes";

    fn descriptor(name: &str) -> DatasetDescriptor {
        DatasetDescriptor::new(name, API_ID, "Agency")
    }

    fn engine_with(
        source: Arc<ScriptedSource>,
        registry: MapRegistry,
        page_limit: usize,
    ) -> InspectionEngine {
        InspectionEngine::new(
            source,
            SchemaResolver::new(Arc::new(registry)),
            EngineOptions {
                resource_root: TEST_ROOT.to_string(),
                page_limit,
                page_delay: Duration::ZERO,
                skip_name_prefixes: vec![SKIP_PREFIX.to_string()],
            },
        )
    }

    fn memory_sinks() -> (RunSinks, Arc<MemoryStatsSink>, Arc<MemoryProblemSink>) {
        let stats = Arc::new(MemoryStatsSink::default());
        let problems = Arc::new(MemoryProblemSink::default());
        let sinks = RunSinks {
            stats: vec![stats.clone()],
            problems: problems.clone(),
        };
        (sinks, stats, problems)
    }

    #[tokio::test]
    async fn single_page_dataset_tallies_missing_fields() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![ScriptedPage::records(
                vec![
                    serde_json::from_str(r#"{"a": 1, "b": 2}"#).unwrap(),
                    serde_json::from_str(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap(),
                ],
                Some("a, b, c"),
            )],
        ));
        let engine = engine_with(source.clone(), MapRegistry::default(), 10_000);

        let result = engine.inspect_dataset(&descriptor("Bridges")).await;

        assert_eq!(result.status, DatasetStatus::WithNulls);
        assert_eq!(result.total_records, 2);
        assert_eq!(result.total_columns, 3);
        assert_eq!(result.total_values, 6);
        assert_eq!(result.total_nulls, 1);
        assert_eq!(result.percent_null, 16.67);
        assert_eq!(
            result.field_counts,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 0),
                ("c".to_string(), 1)
            ]
        );
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn full_page_advances_offset_and_short_page_ends_loop() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![
                ScriptedPage::records(records_like(r#"{"a": 1}"#, 3), Some("a, b")),
                ScriptedPage::records(records_like(r#"{"a": 1, "b": 2}"#, 2), None),
            ],
        ));
        let engine = engine_with(source.clone(), MapRegistry::default(), 3);

        let result = engine.inspect_dataset(&descriptor("Permits")).await;

        assert_eq!(result.status, DatasetStatus::WithNulls);
        assert_eq!(result.total_records, 5);
        assert_eq!(result.total_nulls, 3); // "b" missing from the first page

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].offset, 0);
        assert_eq!(requests[0].cumulative, 0);
        assert!(!requests[0].url(TEST_ROOT).contains("$offset"));
        assert_eq!(requests[1].offset, 3);
        assert_eq!(requests[1].cumulative, 3);
        assert!(requests[1].url(TEST_ROOT).contains("$offset=3"));
    }

    #[tokio::test]
    async fn empty_tail_page_after_exact_multiple_is_not_a_problem() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![
                ScriptedPage::records(records_like(r#"{"a": 1}"#, 3), Some("a")),
                ScriptedPage::empty(None),
            ],
        ));
        let engine = engine_with(source.clone(), MapRegistry::default(), 3);

        let result = engine.inspect_dataset(&descriptor("Inspections")).await;

        assert_eq!(result.status, DatasetStatus::Clean);
        assert_eq!(result.total_records, 3);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn skip_listed_dataset_is_problem_with_zero_fetches() {
        let source = Arc::new(ScriptedSource::new());
        let engine = engine_with(source.clone(), MapRegistry::default(), 10_000);

        let result = engine
            .inspect_dataset(&descriptor("Statewide Vehicle Crashes 2017 Q2"))
            .await;

        assert_eq!(result.status, DatasetStatus::Problem);
        let problem = result.problem.unwrap();
        assert!(problem.message.contains("Intentionally skipped"));
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn missing_hint_without_override_is_schema_unresolved() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![ScriptedPage::records(
                records_like(r#"{"a": 1}"#, 1),
                None,
            )],
        ));
        let engine = engine_with(source, MapRegistry::default(), 10_000);

        let result = engine.inspect_dataset(&descriptor("Wide Parcels")).await;

        assert_eq!(result.status, DatasetStatus::Problem);
        let problem = result.problem.unwrap();
        assert!(problem.message.contains("Too many fields"));
        assert!(problem.resource.contains(API_ID));
    }

    #[tokio::test]
    async fn override_registry_supplies_schema_when_hint_missing() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![ScriptedPage::records(
                records_like(r#"{"county": "Kent"}"#, 2),
                None,
            )],
        ));
        let registry = MapRegistry::default().with(API_ID, &["county", "acreage"]);
        let engine = engine_with(source, registry, 10_000);

        let result = engine.inspect_dataset(&descriptor("Wide Parcels")).await;

        assert_eq!(result.status, DatasetStatus::WithNulls);
        assert_eq!(result.total_columns, 2);
        assert_eq!(
            result.field_counts,
            vec![("county".to_string(), 0), ("acreage".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn empty_first_page_is_flagged_even_with_resolvable_schema() {
        let source = Arc::new(
            ScriptedSource::new().script(API_ID, vec![ScriptedPage::empty(Some("a, b"))]),
        );
        let engine = engine_with(source, MapRegistry::default(), 10_000);

        let result = engine.inspect_dataset(&descriptor("Spreadsheet Export")).await;

        assert_eq!(result.status, DatasetStatus::Problem);
        let problem = result.problem.unwrap();
        assert_eq!(problem.message, "Response object was empty");
        assert_eq!(result.total_records, 0);
    }

    #[tokio::test]
    async fn transport_error_aborts_only_that_dataset() {
        let source = Arc::new(
            ScriptedSource::new()
                .script(
                    "bad0-0000",
                    vec![ScriptedPage::transport_error(
                        "Failed to reach a server. Reason: connection refused",
                    )],
                )
                .script(
                    API_ID,
                    vec![ScriptedPage::records(
                        records_like(r#"{"a": 1}"#, 1),
                        Some("a"),
                    )],
                ),
        );
        let engine = engine_with(source, MapRegistry::default(), 10_000);
        let (sinks, stats, problems) = memory_sinks();

        let catalog = vec![
            DatasetDescriptor::new("Broken", "bad0-0000", "Agency"),
            DatasetDescriptor::new("Healthy", API_ID, "Agency"),
        ];
        let summary = engine
            .run(&catalog, &sinks, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.problem, 1);
        assert_eq!(summary.clean, 1);

        let problem_rows = problems.rows.lock().unwrap();
        assert_eq!(problem_rows.len(), 1);
        assert!(problem_rows[0].message.contains("connection refused"));

        // Problem datasets contribute no statistics rows.
        let overview = stats.overview.lock().unwrap();
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].dataset_name, "Healthy");
    }

    #[tokio::test]
    async fn run_dispatches_overview_and_field_rows() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![ScriptedPage::records(
                vec![serde_json::from_str(r#"{"a": ""}"#).unwrap()],
                Some("a, b"),
            )],
        ));
        let engine = engine_with(source, MapRegistry::default(), 10_000);
        let (sinks, stats, problems) = memory_sinks();

        let catalog = vec![descriptor("Toll Rates")];
        let summary = engine
            .run(&catalog, &sinks, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.with_nulls, 1);
        assert!(problems.rows.lock().unwrap().is_empty());

        let overview = stats.overview.lock().unwrap();
        assert_eq!(overview.len(), 1);
        // Empty string counts as present, so only "b" is null.
        assert_eq!(overview[0].total_null_count, 1);
        assert!(overview[0].row_id.starts_with("abcd-1234."));

        let fields = stats.fields.lock().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_name, "a");
        assert_eq!(fields[0].null_count, 0);
        assert_eq!(fields[1].field_name, "b");
        assert_eq!(fields[1].null_count, 1);
        assert_eq!(fields[1].percent_null, 100.0);
    }

    #[tokio::test]
    async fn repeated_runs_over_fixed_source_are_identical() {
        let script = || {
            Arc::new(ScriptedSource::new().script(
                API_ID,
                vec![
                    ScriptedPage::records(records_like(r#"{"a": 1}"#, 2), Some("a, b")),
                ],
            ))
        };

        let first = engine_with(script(), MapRegistry::default(), 10_000)
            .inspect_dataset(&descriptor("Fixed"))
            .await;
        let second = engine_with(script(), MapRegistry::default(), 10_000)
            .inspect_dataset(&descriptor("Fixed"))
            .await;

        assert_eq!(first.status, second.status);
        assert_eq!(first.total_records, second.total_records);
        assert_eq!(first.total_nulls, second.total_nulls);
        assert_eq!(first.percent_null, second.percent_null);
        assert_eq!(first.field_counts, second.field_counts);
    }

    #[tokio::test]
    async fn cancelled_run_stops_before_fetching() {
        let source = Arc::new(ScriptedSource::new().script(
            API_ID,
            vec![ScriptedPage::records(
                records_like(r#"{"a": 1}"#, 1),
                Some("a"),
            )],
        ));
        let engine = engine_with(source.clone(), MapRegistry::default(), 10_000);
        let (sinks, _, _) = memory_sinks();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = engine
            .run(&[descriptor("Never Reached")], &sinks, &cancel)
            .await
            .unwrap();

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.datasets_in_catalog, 1);
        assert_eq!(source.request_count(), 0);
    }
}
