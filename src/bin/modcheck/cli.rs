//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// modcheck - Check that a Go project agrees with its dependencies on module
/// versions
#[derive(Parser)]
#[command(name = "modcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Package pattern to check (passed to `go list`)
    pub pattern: String,

    /// Require <dependency>'s version of <module> to match the project's,
    /// as <dependency>:<module> (repeatable, comma separated)
    #[arg(long, value_name = "DEP:MODULE", value_delimiter = ',')]
    pub match_dep: Vec<String>,

    /// Require the replace directives of these dependencies to match the
    /// project's (repeatable, comma separated)
    #[arg(long, value_name = "DEP", value_delimiter = ',')]
    pub match_replaces: Vec<String>,

    /// Read `go list -e -deps -json` output from a file instead of running go
    #[arg(long, value_name = "FILE")]
    pub from_json: Option<PathBuf>,

    /// Path to the go binary
    #[arg(long, value_name = "PATH", env = "MODCHECK_GO")]
    pub go: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output format: human or json
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
