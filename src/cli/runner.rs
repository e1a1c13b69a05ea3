//! CLI runner - executes commands

use crate::cli::commands::{ActivityBy, Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{open_output, write_json_lines, write_parquet, write_pretty, Table};
use crate::pagination::FetchResult;
use crate::pardot::{ActivityScope, Pardot, PardotV5};
use crate::types::StringMap;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let started = Instant::now();

        let result = match &self.cli.command {
            Commands::Validate => {
                println!(
                    "Configuration for business unit '{}' is valid",
                    config.business_unit_id
                );
                return Ok(());
            }
            Commands::Prospects { fields } => {
                let pardot = Pardot::from_config(&config)?;
                let (records, _) = pardot.get_active_prospects(fields.as_deref()).await?;
                records
            }
            Commands::Visits { prospect_ids } => {
                let pardot = Pardot::from_config(&config)?;
                let ids = Self::resolve_prospect_ids(&pardot, prospect_ids).await?;
                pardot.get_visits(&ids).await?
            }
            Commands::Activities {
                by,
                prospect_ids,
                types,
            } => {
                let mut pardot = Pardot::from_config(&config)?;
                if let Some(types) = types {
                    pardot = pardot.with_activity_types(types.as_str());
                }
                match by {
                    ActivityBy::Updated => pardot.get_activities(ActivityScope::Updated).await?,
                    ActivityBy::Id => {
                        let ids = Self::resolve_prospect_ids(&pardot, prospect_ids).await?;
                        pardot.get_activities(ActivityScope::ByProspects(&ids)).await?
                    }
                }
            }
            Commands::V5 { object, params } => {
                let v5 = PardotV5::from_config(&config)?;
                let params: StringMap = params.iter().cloned().collect();
                v5.get(object, &params).await?
            }
        };

        let written = self.write_records(&result)?;
        info!(
            "Wrote {} records in {:.1}s",
            written,
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Load configuration, apply command-line dates, and validate it
    pub fn load_config(&self) -> Result<Config> {
        // Inline config takes precedence
        let mut config = if let Some(json_str) = &self.cli.config_json {
            Config::from_json_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?
        } else if let Some(path) = &self.cli.config {
            Config::load(path)?
        } else {
            return Err(Error::config(
                "No configuration given (use -C <file> or --config-json)",
            ));
        };

        if self.cli.from.is_some() {
            config.date_from.clone_from(&self.cli.from);
        }
        if self.cli.to.is_some() {
            config.date_to.clone_from(&self.cli.to);
        }

        config.validate()?;
        Ok(config)
    }

    /// Explicit IDs, or the IDs of the active prospects
    async fn resolve_prospect_ids(pardot: &Pardot, given: &[String]) -> Result<Vec<String>> {
        if !given.is_empty() {
            return Ok(given.to_vec());
        }
        info!("No prospect IDs given, fetching active prospects first");
        let (_, ids) = pardot.get_active_prospects(None).await?;
        Ok(ids)
    }

    /// Write records in the selected format
    fn write_records(&self, result: &FetchResult) -> Result<usize> {
        let output = self.cli.output.as_deref();
        match self.cli.format {
            OutputFormat::Json => {
                let mut out = open_output(output)?;
                write_json_lines(&mut out, result.records())
            }
            OutputFormat::Pretty => {
                let mut out = open_output(output)?;
                write_pretty(&mut out, &Table::from_records(result.records()))
            }
            OutputFormat::Parquet => {
                let path = output
                    .ok_or_else(|| Error::config("Parquet format requires --output path"))?;
                write_parquet(path, &Table::from_records(result.records()))
            }
        }
    }
}
