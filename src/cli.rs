use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(author, about, version)]
pub struct Args {
    /// Optional path to overwrite the config
    #[arg(short, long, default_value = "repofix.toml")]
    pub config_path: PathBuf,

    /// Print the configuration and exit
    #[arg(long)]
    pub print_config: bool,
}
