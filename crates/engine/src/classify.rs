use crate::resolver::ResolveError;
use model::{catalog::DatasetDescriptor, result::DatasetResult};

/// Named termination reason for an aborted dataset. Every path out of the
/// pagination loop other than a short final page maps to exactly one of
/// these, so the failure taxonomy stays exhaustive and testable.
///
/// Priority when several could apply: a skip-list match is decided before
/// any fetch; a transport error is reported over anything derived from the
/// page body; an empty response before any record outranks an unresolved
/// schema.
#[derive(Debug)]
pub enum AbortReason {
    /// Dataset name matched the configured non-tabular export skip-list.
    NamedExportSkip,
    /// A page fetch failed at the transport level.
    Transport { reason: String },
    /// A page parsed to zero records before the dataset produced any.
    /// Indistinguishable from non-tabular content, so flagged rather than
    /// treated as end-of-data.
    EmptyResponse,
    /// No schema hint and no override registry entry.
    SchemaUnresolved(ResolveError),
}

impl AbortReason {
    pub fn message(&self) -> String {
        match self {
            AbortReason::NamedExportSkip => {
                "Intentionally skipped. Dataset is a known non-tabular export that endlessly returns empty pages."
                    .to_string()
            }
            AbortReason::Transport { reason } => reason.clone(),
            AbortReason::EmptyResponse => "Response object was empty".to_string(),
            AbortReason::SchemaUnresolved(err) => err.to_string(),
        }
    }
}

/// Produces the Problem result for an aborted dataset. The message and the
/// offending resource are the only fields populated besides the descriptor.
pub fn problem_result(
    descriptor: &DatasetDescriptor,
    reason: &AbortReason,
    resource: &str,
) -> DatasetResult {
    DatasetResult::problem(descriptor.clone(), reason.message(), resource.to_string())
}

/// Skip-list check: known spreadsheet-backed "datasets" that never return
/// real records are skipped before any fetch. Data, not code; new entries
/// are configuration additions.
pub fn matches_skip_list(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_str()))
}
