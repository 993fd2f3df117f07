use crate::config::Settings;
use crate::core::render::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "grana")]
#[command(about = "Brazilian market data functions for spreadsheets")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a grana.toml config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "E-mail sent with every request")]
    pub email: Option<String>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub stocks_url: Option<String>,

    #[arg(long, global = true, help = "HTTP timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Tsv)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Evaluate one or more formulas, e.g. 'CDB(1000; "115%"; "01/01/2017")'
    Eval {
        #[arg(required = true)]
        formulas: Vec<String>,
    },
    /// List the available functions
    List,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(email) = &self.email {
            settings.email = Some(email.clone());
        }
        if let Some(url) = &self.base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(url) = &self.stocks_url {
            settings.stocks_base_url = url.clone();
        }
        if self.timeout.is_some() {
            settings.timeout_seconds = self.timeout;
        }
        if self.json_logs {
            settings.json_logs = true;
        }
    }
}
