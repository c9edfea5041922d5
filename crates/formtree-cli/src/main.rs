//! CLI entrypoint for formtree.

mod cli;
mod document;
mod style;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use cli::{Cli, Command, RendererKind};
use document::FormDocument;
use formtree_elements::{Form, UploadTable};
use formtree_render::{render_keyed, render_object, RenderConfig};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{}", style::error(format!("Error: {err:#}")));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render {
            form,
            renderer,
            config,
            values,
            uploads,
            validate,
        } => run_render(&form, renderer, config, values, uploads, validate),
        Command::Script { form } => {
            let form = FormDocument::load(&form)?.into_form()?;
            println!("{}", form.validation_script());
            Ok(())
        }
    }
}

fn run_render(
    path: &Path,
    renderer: RendererKind,
    config: Option<PathBuf>,
    values: Option<PathBuf>,
    uploads: Option<PathBuf>,
    validate: bool,
) -> anyhow::Result<()> {
    let document = FormDocument::load(path)?;
    let frozen = document.frozen();
    let mut form = document.into_form()?;
    if let Some(values) = values {
        apply_values(&mut form, &values)?;
    }
    if let Some(uploads) = uploads {
        let text = std::fs::read_to_string(&uploads)
            .with_context(|| format!("failed to read uploads '{}'", uploads.display()))?;
        let table: UploadTable = serde_json::from_str(&text)
            .with_context(|| format!("invalid uploads '{}'", uploads.display()))?;
        form.bind_uploads(&table);
    }
    if validate && !form.validate() {
        eprintln!(
            "{}",
            style::warning(format!(
                "Warning: {} invalid element(s) in form '{}'",
                form.errors().len(),
                form.name()
            ))
        );
    }
    if frozen {
        form.freeze();
    }
    let config = match config {
        Some(path) => RenderConfig::load(&path)?,
        None => RenderConfig::default(),
    };
    debug!("rendering '{}' with the {renderer:?} renderer", form.name());
    let json = match renderer {
        RendererKind::Object => serde_json::to_string_pretty(&render_object(&form, &config)?)?,
        RendererKind::Keyed => serde_json::to_string_pretty(&render_keyed(&form, &config)?)?,
    };
    println!("{json}");
    info!("rendered form '{}'", form.name());
    Ok(())
}

fn apply_values(form: &mut Form, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read values '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid values '{}'", path.display()))?;
    let serde_json::Value::Object(values) = value else {
        anyhow::bail!("values file '{}' must hold a JSON object", path.display());
    };
    form.set_values(&values);
    Ok(())
}
