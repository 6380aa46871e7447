//! Juka CLI Tool
//!
//! Command-line interface for checking, summarising and rewriting
//! `jukaconfig.json` export files.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use juka_core::format::{FormatConfig, format_document};
use juka_core::interpolate::interpolate;
use juka_core::layout::{Canvas, parse_preset};
use juka_core::lint::{LintSeverity, lint_project};
use juka_core::parser::parse_document;
use juka_core::project::Project;
use juka_editor::io::save_export;
use juka_editor::{EditorConfig, EditorSession};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "juka")]
#[command(about = "Juka - check and rewrite scene editor export files")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and report dangling references
    #[command(alias = "validate")]
    Lint {
        /// Export file path
        input: PathBuf,

        /// Exit with an error if any warning is reported
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Print title, variables and per-scene element counts
    Info {
        /// Export file path
        input: PathBuf,
    },

    /// Write a blank document (one scene with a menu)
    New {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Document title
        #[arg(long, default_value = "")]
        title: String,
    },

    /// Rewrite a document in canonical form
    Fmt {
        /// Export file path
        input: PathBuf,

        /// Overwrite the input instead of printing
        #[arg(short, long)]
        write: bool,

        /// Canvas size as WxH
        #[arg(long, default_value = "1280x720")]
        canvas: String,

        /// Clamp every element inside the canvas
        #[arg(long)]
        fit: bool,
    },

    /// Show element text with variables substituted
    Preview {
        /// Export file path
        input: PathBuf,

        /// Only this scene
        #[arg(long)]
        scene: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Lint {
            input,
            deny_warnings,
        } => lint(&input, deny_warnings)?,
        Commands::Info { input } => print!("{}", render_info(&load(&input)?)),
        Commands::New { out, title } => new_document(&out, &title)?,
        Commands::Fmt {
            input,
            write,
            canvas,
            fit,
        } => fmt(&input, write, &canvas, fit)?,
        Commands::Preview { input, scene } => {
            print!("{}", render_preview(&load(&input)?, scene.as_deref())?)
        }
    }

    Ok(())
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

fn load(path: &Path) -> Result<Project> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&text, Canvas::default())
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn lint(path: &Path, deny_warnings: bool) -> Result<()> {
    let project = load(path)?;
    let diags = lint_project(&project);

    let mut warnings = 0;
    for d in &diags {
        let level = match d.severity {
            LintSeverity::Warning => {
                warnings += 1;
                "warning"
            }
            LintSeverity::Info => "info",
        };
        println!("{level}[{}] {}: {}", d.rule, d.scene, d.message);
    }
    println!(
        "{}: {} scene(s), {} finding(s)",
        path.display(),
        project.scenes.len(),
        diags.len()
    );

    if deny_warnings && warnings > 0 {
        bail!("{warnings} warning(s) in {}", path.display());
    }
    Ok(())
}

fn render_info(project: &Project) -> String {
    let meta = &project.meta;
    let mut out = String::new();
    let _ = writeln!(out, "Title:       {}", meta.title);
    let _ = writeln!(out, "Author:      {}", meta.author);
    let _ = writeln!(out, "Description: {}", meta.description);
    let _ = writeln!(
        out,
        "Background:  {}",
        meta.background_image.as_deref().unwrap_or("(none)")
    );
    let fs = &meta.font_sizes;
    let _ = writeln!(
        out,
        "Font sizes:  title {} / big {} / medium {} / small {}",
        fs.title, fs.big, fs.medium, fs.small
    );

    let _ = writeln!(out, "Variables ({}):", project.variables.len());
    for (name, value) in project.variables.iter() {
        let _ = writeln!(out, "  {name} = {value:?}");
    }

    let _ = writeln!(out, "Scenes ({}):", project.scenes.len());
    for scene in project.scenes.iter() {
        let _ = writeln!(out, "  {} ({} element(s))", scene.name, scene.elements.len());
    }
    out
}

fn render_preview(project: &Project, only: Option<&str>) -> Result<String> {
    if let Some(name) = only.filter(|name| !project.scenes.contains(name)) {
        bail!("No scene named {name:?}");
    }

    let mut out = String::new();
    for scene in project.scenes.iter() {
        if only.is_some_and(|name| name != scene.name) {
            continue;
        }
        let _ = writeln!(out, "[{}]", scene.name);
        for element in &scene.elements {
            if !element.kind.has_text() || element.text.is_empty() {
                continue;
            }
            let result = interpolate(&element.text, &project.variables);
            if result.has_variables() {
                let _ = writeln!(
                    out,
                    "  {:<14} {} -> {}",
                    element.kind.tag(),
                    element.text,
                    result.evaluated
                );
            } else {
                let _ = writeln!(out, "  {:<14} {}", element.kind.tag(), element.text);
            }
        }
    }
    Ok(out)
}

fn new_document(dir: &Path, title: &str) -> Result<()> {
    let mut session = EditorSession::new(EditorConfig {
        startup_menu: true,
        ..Default::default()
    });
    session.set_metadata(title, "", "");
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = save_export(&mut session, dir).context("Failed to write document")?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn fmt(path: &Path, write: bool, canvas: &str, fit: bool) -> Result<()> {
    let (width, height) =
        parse_preset(canvas).with_context(|| format!("Invalid canvas size {canvas:?}"))?;
    let config = FormatConfig {
        canvas: Canvas { width, height },
        fit_to_canvas: fit,
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let formatted = format_document(&text, &config)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if write {
        std::fs::write(path, format!("{formatted}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("formatted {}", path.display());
    } else {
        println!("{formatted}");
    }
    Ok(())
}
