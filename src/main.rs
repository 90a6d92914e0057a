use anyhow::Context;
use clap::Parser;
use ovsia_content::config::cli::{Cli, Command};
use ovsia_content::utils::error::ContentError;
use ovsia_content::utils::{logger, validation::Validate};
use ovsia_content::{
    generate_build_report, BuildOptions, BuildTimeOrchestrator, ContentCache, ContentConfig,
    LocalStorage, NotionClient,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        std::process::exit(report_failure(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ContentConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Command::Build {
            force_fresh,
            output,
            report,
        } => {
            let orchestrator = BuildTimeOrchestrator::from_config(config);
            let build = orchestrator
                .fetch_build_time_content(BuildOptions { force_fresh })
                .await?;

            let json = serde_json::to_vec_pretty(&build)?;
            write_output(&output, &json).await?;
            println!("✅ Site content ({}) written to {}", build.metadata.source, output.display());

            if let Some(report_path) = report {
                write_output(&report_path, generate_build_report(&build).as_bytes()).await?;
                println!("📝 Build report written to {}", report_path.display());
            }
        }
        Command::Check { ping } => {
            let env_report = config.check_environment();
            for error in &env_report.errors {
                println!("❌ {}", error);
            }
            for warning in &env_report.warnings {
                println!("⚠️ {}", warning);
            }

            if ping {
                let bot = NotionClient::new(&config).check_connection().await?;
                println!("🔗 Connected to Notion as {}", bot);
            }

            if env_report.is_ready() {
                println!("✅ Environment ready for a content build");
            } else {
                anyhow::bail!(ContentError::ConfigError {
                    message: format!("{} configuration error(s) found", env_report.errors.len()),
                });
            }
        }
        Command::ClearCache => {
            let directory = config.cache.directory.clone();
            let cache = ContentCache::new(LocalStorage::new(directory.clone()), &config.cache);
            let removed = cache.clear().await?;
            println!("🧹 Removed {} cache file(s) from {}", removed, directory.display());
        }
    }

    Ok(())
}

async fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// 記錄錯誤並依嚴重程度決定退出碼
fn report_failure(error: &anyhow::Error) -> i32 {
    let Some(e) = error.downcast_ref::<ContentError>() else {
        tracing::error!("❌ {:#}", error);
        eprintln!("❌ {:#}", error);
        return 1;
    };

    tracing::error!(
        "❌ Content build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    e.severity().exit_code()
}
