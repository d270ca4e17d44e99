use anyhow::Context;
use clap::Parser;
use storefront_sections::config::toml_config::{CatalogSourceKind, TomlConfig};
use storefront_sections::core::{ConfigProvider, Pipeline};
use storefront_sections::utils::{logger, validation::Validate};
use storefront_sections::{
    CliConfig, HttpCatalogSource, LocalStorage, PagePipeline, StorageCatalogSource,
    StorefrontEngine, StorefrontError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting storefront-sections");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = args.validate() {
        report_and_exit(&e);
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    config.apply_overrides(args.base_url.clone(), args.output.clone());

    if let Err(e) = config.validate() {
        report_and_exit(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::new(config.site.root_dir.clone());
    let result = match config.catalog.source {
        CatalogSourceKind::Http => {
            let source = HttpCatalogSource::new(
                &config.site.base_url,
                &config.catalog.path,
                config.catalog_timeout(),
            )
            .context("failed to set up the catalog HTTP client")?;
            run(PagePipeline::new(storage.clone(), config.clone(), source)).await
        }
        CatalogSourceKind::File => {
            let source = StorageCatalogSource::new(storage.clone(), config.catalog.path.clone());
            run(PagePipeline::new(storage.clone(), config.clone(), source)).await
        }
    };

    match result {
        Ok(output_path) => {
            let full_path = storage.full_path(&output_path);
            tracing::info!("✅ Storefront page written to {}", full_path.display());
            println!("✅ Storefront page written to {}", full_path.display());
        }
        Err(e) => report_and_exit(&e),
    }

    Ok(())
}

async fn run<P: Pipeline>(pipeline: P) -> storefront_sections::Result<String> {
    StorefrontEngine::new(pipeline).run().await
}

fn report_and_exit(e: &StorefrontError) -> ! {
    tracing::error!(
        "❌ Storefront build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code().max(1));
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Site: {}", config.site.base_url);
    println!("  Template: {}", config.template_path());
    println!("  Output: {}", config.output_file());
    println!(
        "  Catalog: {} ({:?})",
        config.catalog.path, config.catalog.source
    );
    println!("  Locale: {}", config.site.locale);
    println!("  Sections: {}", config.sections.len());
    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    for request in config.section_requests()? {
        let categories: Vec<&str> = request.categories.iter().map(|c| c.as_str()).collect();
        println!("  #{} \"{}\"", request.section_id, request.title);
        println!("     mode: {}, categories: {}", request.mode, categories.join(", "));
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
