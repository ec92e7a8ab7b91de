use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cat-agency")]
#[command(version)]
#[command(about = "Spy cat agency: agents, missions and targets over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Directory holding default.toml and environment overrides
        #[arg(short, long, default_value = "config", env = "AGENCY_CONFIG_DIR")]
        config_dir: String,
        /// Override server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate {
        #[arg(short, long, default_value = "config", env = "AGENCY_CONFIG_DIR")]
        config_dir: String,
    },
}
