use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version = crate::built_info::PKG_VERSION,
    about = "File selection filtered by extension and MIME type",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Show build information
    #[arg(long)]
    pub build_info: bool,

    /// Generate default configuration file
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Expand acceptance tokens into the accepted extensions and MIME types.
    Accept(AcceptArgs),
    /// Show MIME types for an extension, or extensions for a MIME type.
    Lookup(LookupArgs),
    /// Drop files onto a virtual region and report which are accepted.
    Check(CheckArgs),
    /// Open the native file picker.
    Pick(PickArgs),
    /// Print a file's text or its data URI.
    Read(ReadArgs),
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AcceptArgs {
    /// Extensions (`png`, `.png`) or MIME types (`image/png`).
    #[arg(value_name = "TOKEN", required = true)]
    pub tokens: Vec<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LookupArgs {
    /// Extension or MIME type.
    #[arg(value_name = "EXT_OR_MIME")]
    pub token: String,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CheckArgs {
    /// Acceptance token; defaults to the configured `[selection]` list.
    #[arg(short, long = "accept", value_name = "TOKEN")]
    pub accept: Vec<String>,
    /// Also read a `text/uri-list` payload from stdin.
    #[arg(long)]
    pub uri_list: bool,
    /// Paths or `file://` URIs to drop.
    #[arg(value_name = "FILE_OR_URI")]
    pub files: Vec<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PickArgs {
    /// Acceptance token; defaults to the configured `[selection]` list.
    #[arg(short, long = "accept", value_name = "TOKEN")]
    pub accept: Vec<String>,
    /// Allow selecting several files.
    #[arg(short, long)]
    pub multi: bool,
    /// Picker profile name, or `auto`.
    #[arg(long, conflicts_with = "picker_command")]
    pub picker: Option<String>,
    /// Picker command line to run instead of a configured profile.
    #[arg(long, value_name = "COMMAND")]
    pub picker_command: Option<String>,
    /// Dialog title.
    #[arg(long)]
    pub title: Option<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReadArgs {
    /// Path or `file://` URI.
    #[arg(value_name = "FILE_OR_URI")]
    pub file: String,
    /// Print a base64 `data:` URI instead of text.
    #[arg(long)]
    pub data_uri: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
    /// Write the script to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Binary name used in the script.
    #[arg(long, default_value = "file-input")]
    pub bin_name: String,
}

pub fn show_build_info() {
    println!("Version: {}", crate::built_info::PKG_VERSION);
    println!("Built: {}", crate::built_info::BUILT_TIME_UTC);

    if let Some(hash) = crate::built_info::GIT_COMMIT_HASH {
        println!("Commit: {hash}");
    } else {
        println!("Commit: unknown");
    }

    if let Some(branch) = crate::built_info::GIT_HEAD_REF {
        println!("Branch: {branch}");
    } else {
        println!("Branch: unknown");
    }

    println!("Target: {}", crate::built_info::TARGET);
    println!("Rustc: {}", crate::built_info::RUSTC_VERSION);

    match crate::built_info::GIT_DIRTY {
        Some(true) => println!("Git status: dirty (uncommitted changes)"),
        Some(false) => println!("Git status: clean"),
        None => println!("Git status: unknown"),
    }

    println!("Profile: {}", crate::built_info::PROFILE);
}
