use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "ovsia-content")]
#[command(about = "Resolve Ovsia site content from Notion with cache and fallback")]
pub struct Cli {
    /// TOML 設定檔，覆蓋環境變數
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve the site content snapshot and write it to disk
    Build {
        /// Skip the cache and fetch from Notion
        #[arg(long)]
        force_fresh: bool,

        #[arg(long, default_value = "content/site-content.json")]
        output: PathBuf,

        /// Also write a Markdown build report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Report configuration problems
    Check {
        /// Verify the token against the Notion API
        #[arg(long)]
        ping: bool,
    },
    /// Remove every cached entry
    ClearCache,
}
