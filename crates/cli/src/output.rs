use crate::error::CliError;
use model::{catalog::DatasetDescriptor, summary::RunSummary};

pub fn print_summary(summary: &RunSummary) {
    println!("Run summary");
    println!("-----------------------------");
    println!("{:<28} {}", "Datasets in catalog", summary.datasets_in_catalog);
    println!("{:<28} {}", "Datasets processed", summary.processed);
    println!("{:<28} {}", "Clean", summary.clean);
    println!("{:<28} {}", "With nulls", summary.with_nulls);
    println!("{:<28} {}", "Problems", summary.problem);
    println!(
        "{:<28} {:.2}",
        "Process time (minutes)",
        summary.elapsed_minutes()
    );
}

pub fn print_catalog(catalog: &[DatasetDescriptor]) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(catalog)?;
    println!("{json}");
    Ok(())
}
