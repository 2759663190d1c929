use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect every cataloged dataset and record null statistics
    Inspect {
        #[arg(long, help = "Config file path")]
        config: String,

        #[arg(long, help = "Also append statistics to local CSV files")]
        csv: bool,

        #[arg(long, help = "Skip upserting statistics to the reporting datasets")]
        no_upsert: bool,
    },
    /// Print the resolved dataset catalog as JSON
    Catalog {
        #[arg(long, help = "Config file path")]
        config: String,
    },
    /// Delete aged rows from the reporting datasets
    Cleanup {
        #[arg(long, help = "Config file path")]
        config: String,

        #[arg(long, help = "Delete rows dated strictly before this date (YYYY-MM-DD)")]
        before: String,

        #[arg(long, help = "Actually publish the deletes; otherwise dry-run")]
        apply: bool,
    },
}
