use anyhow::Context;
use clap::Parser;
use storefront_sections::config::toml_config::TomlConfig;
use storefront_sections::utils::{logger, validation::Validate};
use storefront_sections::{
    CatalogSyncPipeline, LocalStorage, StorefrontEngine, StorefrontError, SupplierClient,
};

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Refresh the product catalog from the supplier API")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "storefront.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.json_logs);
    tracing::info!("🔄 Starting catalog sync");

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    let sync = match config.sync_config() {
        Ok(sync) => sync,
        Err(e) => report_and_exit(&e),
    };
    if let Err(e) = sync.validate() {
        report_and_exit(&e);
    }

    let client = SupplierClient::new(sync.supplier_settings())
        .context("failed to set up the supplier HTTP client")?;
    let storage = LocalStorage::new(config.site.root_dir.clone());
    let pipeline = CatalogSyncPipeline::new(
        storage.clone(),
        client,
        config.catalog.path.clone(),
        sync.cdn_base(),
        sync.concurrent_requests,
    );

    match StorefrontEngine::new(pipeline).run().await {
        Ok(path) => {
            let full_path = storage.full_path(&path);
            tracing::info!("✅ Products updated successfully: {}", full_path.display());
            println!("✅ Products updated successfully: {}", full_path.display());
        }
        Err(e) => report_and_exit(&e),
    }

    Ok(())
}

fn report_and_exit(e: &StorefrontError) -> ! {
    tracing::error!(
        "❌ Catalog sync failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code().max(1));
}
