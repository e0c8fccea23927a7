//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueHint};

/// Legend table-of-contents for map services: toggle sub-layer visibility with group propagation
#[derive(Parser, Debug)]
#[command(name = "legendtoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .legendtoc.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the map document and legend responses come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Map document (overrides map_file)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub map: Option<PathBuf>,

    /// Legend response directory (overrides legend_dir)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub legends: Option<PathBuf>,
}

/// New check state of an entry.
#[derive(Args, Debug, Clone, Copy)]
#[command(group(ArgGroup::new("state").required(true).args(["on", "off"])))]
pub struct CheckArgs {
    /// Check the entry
    #[arg(long)]
    pub on: bool,

    /// Uncheck the entry
    #[arg(long)]
    pub off: bool,
}

impl CheckArgs {
    pub fn checked(&self) -> bool {
        self.on && !self.off
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the legend menu
    Menu {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Check/uncheck a sub-layer entry and print the published visible layers
    Toggle {
        #[command(flatten)]
        source: SourceArgs,
        /// Service id
        #[arg(short, long)]
        service: String,
        /// Sub-layer id
        #[arg(short = 'L', long, allow_negative_numbers = true)]
        layer: i64,
        #[command(flatten)]
        state: CheckArgs,
        /// Render the menu after the toggle
        #[arg(long)]
        tree: bool,
    },

    /// Check/uncheck a service header (show or hide the whole service)
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Service id
        #[arg(short, long)]
        service: String,
        #[command(flatten)]
        state: CheckArgs,
    },

    /// Run the toggle engine on a single node, without a map document
    Engine {
        /// Node id
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        /// Legend-record layer id (takes precedence over id)
        #[arg(long)]
        layer_id: Option<i64>,
        /// Parent group id (-1: none)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        parent: i64,
        /// Sub-layer ids, comma separated
        #[arg(long, value_delimiter = ',')]
        sub: Vec<i64>,
        /// Currently visible ids, comma separated
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        visible: Vec<i64>,
        #[command(flatten)]
        state: CheckArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
