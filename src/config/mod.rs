pub mod categories;
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-sections")]
#[command(about = "Render category product sections into a storefront page")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storefront.toml")]
    pub config: String,

    /// Override site.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override site.output
    #[arg(long)]
    pub output: Option<String>,

    /// Show the sections that would be rendered without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config)?;
        if let Some(base_url) = &self.base_url {
            validation::validate_url("base_url", base_url)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
