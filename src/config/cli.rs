use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "a11y-lens")]
#[command(about = "Preview any public web page under accessibility style profiles")]
#[command(version)]
pub struct CliConfig {
    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Listen address, overrides server.listen_addr")]
    pub listen: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
