use clap::{Parser, Subcommand};
use std::path::PathBuf;
use travel_book::config::{self, BookConfig};
use travel_book::enrich::Services;
use travel_book::{book, output, plan, theme, types};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Flags shared by commands that read travels and a book config.
#[derive(clap::Args, Clone)]
struct BookArgs {
    /// JSON array of travel records
    #[arg(long)]
    travels: PathBuf,

    /// Book config (missing file = stock defaults)
    #[arg(long, default_value = "book.toml")]
    config: PathBuf,

    /// Override `[book] theme`
    #[arg(long)]
    theme: Option<String>,
}

#[derive(Parser)]
#[command(name = "travel-book")]
#[command(about = "Print-ready A4 travel book generator")]
#[command(long_about = "\
Print-ready A4 travel book generator

Reads travel records (JSON) and a book config (TOML) and writes one
self-contained HTML document, one A4 page per .pdf-page section, ready for
any HTML-to-PDF renderer.

Page sequence:

  Cover
  Table of contents          include_toc
  per travel:
    Separator                include_separators (3+ travels)
    Photo page
    Content page
    Gallery pages            include_gallery
    Map page                 include_map (travels with locations)
  Checklist                  include_checklists
  Final page

Run 'travel-book gen-config' to generate a documented book.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Log enrichment and planning progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the book to an HTML document
    Generate {
        #[command(flatten)]
        args: BookArgs,

        /// Output HTML file
        #[arg(long, default_value = "book.html")]
        output: PathBuf,
    },
    /// Show the page plan without rendering
    Plan {
        #[command(flatten)]
        args: BookArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in themes
    Themes,
    /// Print a stock book.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Generate { args, output: path } => {
            let config = resolve_config(&args)?;
            let travels = types::load_travels(&args.travels)?;
            let sorted = book::sort_travels(&travels, config.book.sort_order);
            let plan = plan::plan_book(&sorted, &config.book);
            output::print_plan(&config.book.title, &config.book.theme, &sorted, &plan);

            let services = Services::new(&config);
            let html = book::generate_blocking(&travels, &config, &services)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &html)?;
            println!();
            println!(
                "{}",
                output::format_written(&path.display().to_string(), plan.total_pages, html.len())
            );
        }
        Command::Plan { args, json } => {
            let config = resolve_config(&args)?;
            let travels = types::load_travels(&args.travels)?;
            let sorted = book::sort_travels(&travels, config.book.sort_order);
            let plan = plan::plan_book(&sorted, &config.book);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&config.book.title, &config.book.theme, &sorted, &plan);
            }
        }
        Command::Themes => {
            output::print_themes(theme::all_themes());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults, then the config file, then CLI flags.
fn resolve_config(args: &BookArgs) -> Result<BookConfig, config::ConfigError> {
    let mut overlays = Vec::new();
    if let Some(file) = config::load_raw_config(&args.config)? {
        overlays.push(file);
    }
    if let Some(name) = &args.theme {
        overlays.push(config::overlay_value("book", "theme", toml::Value::String(name.clone())));
    }
    config::resolve_config(config::stock_defaults_value()?, overlays)
}

/// Default filter directive; `RUST_LOG` still adds to it.
fn log_filter(verbose: bool) -> tracing::Level {
    if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    }
}

/// Library code logs through the `log` facade; the subscriber bridges it.
fn init_logger(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_filter(verbose).into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_log_level() {
        assert_eq!(log_filter(true), tracing::Level::DEBUG);
        assert_eq!(log_filter(false), tracing::Level::WARN);
    }

    #[test]
    fn cli_accepts_global_verbose() {
        let cli = Cli::try_parse_from(["travel-book", "themes", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Themes));
    }
}
