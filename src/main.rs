use clap::Parser;
use master_hierarchy::utils::{logger, validation::Validate};
use master_hierarchy::{CliConfig, HierarchyEngine, HierarchyPipeline, LocalStorage, SystemClock};

fn main() {
    let cli = CliConfig::parse();
    let dry_run = cli.dry_run;
    let config_file = cli.config.clone();

    // 載入配置 (命令列 + TOML)
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "❌ Failed to load config file '{}': {}",
                config_file.as_deref().unwrap_or("-"),
                e
            );
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose, config.log_level.as_deref());
    } else {
        logger::init_cli_logger(config.verbose, config.log_level.as_deref());
    }

    tracing::info!("Starting master-hierarchy");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new(config.resources_dir.clone());
    let pipeline = HierarchyPipeline::new(storage, config, SystemClock);
    let engine = HierarchyEngine::new(pipeline);

    let outcome = if dry_run {
        engine.run_dry()
    } else {
        engine.run()
    };

    match outcome {
        Ok(summary) => {
            if !summary.warnings.is_empty() {
                tracing::warn!("⚠️ {} records were skipped or marked with errors", summary.warnings.len());
            }
            match summary.to_json() {
                Ok(report) => tracing::debug!(report = %report, "Run summary"),
                Err(e) => tracing::debug!("Could not serialize run summary: {}", e),
            }
            match summary.output_path {
                Some(output_path) => {
                    tracing::info!("✅ Master hierarchy generated successfully!");
                    println!("✅ Successfully generated {}", output_path);
                }
                None => {
                    println!(
                        "🔍 Dry run complete: {} categories, {} assemblies, {} components",
                        summary.stats.categories, summary.stats.assemblies, summary.stats.components
                    );
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
