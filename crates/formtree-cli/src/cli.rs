//! CLI definitions for formtree.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "formtree",
    version,
    about = "Render form documents into template data",
    after_help = "Examples:\n  formtree render signup.toml\n  formtree render signup.toml --renderer keyed --config render.toml\n  formtree render signup.toml --values post.json --validate\n  formtree script signup.toml"
)]
pub struct Cli {
    /// Log rendering details to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the output model as pretty JSON.
    Render {
        /// Form document (TOML).
        form: PathBuf,
        /// Output shape.
        #[arg(long, value_enum, default_value_t = RendererKind::Object)]
        renderer: RendererKind,
        /// Render configuration (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Submitted values (JSON object).
        #[arg(long)]
        values: Option<PathBuf>,
        /// Uploaded files (JSON object keyed by field name).
        #[arg(long)]
        uploads: Option<PathBuf>,
        /// Run the server checks before rendering.
        #[arg(long)]
        validate: bool,
    },
    /// Print the client validation script.
    Script {
        /// Form document (TOML).
        form: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Records in order, split into sections at headers.
    Object,
    /// Records placed at the key paths of their names.
    Keyed,
}
