use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modvisc", version, about = "Module visibility checker for module-level traits")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). MODVIS_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every call site in a declaration manifest
    Check {
        /// Manifest path (.toml)
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Fail when the check produces warnings
        #[arg(long)]
        deny_warnings: bool,
    },
    /// List the declarations of a manifest with their module attribution
    Decls {
        /// Manifest path (.toml)
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn init_logging(verbose: u8) {
    let filter = match std::env::var("MODVIS_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_or_exit(file: &Path) -> (modvis::typeck::Program, String) {
    let filename = file.to_string_lossy();
    let source = match modvis::read_manifest(file) {
        Ok(source) => source,
        Err(err) => {
            modvis::diagnostics::render_error("", &filename, &err);
            std::process::exit(1);
        }
    };
    match modvis::load_source(file, &source) {
        Ok(program) => (program, source),
        Err(err) => {
            modvis::diagnostics::render_error(&source, &filename, &err);
            std::process::exit(1);
        }
    }
}

fn to_json_or_exit<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: failed to serialize output: {err}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { file, format, deny_warnings } => {
            let (program, source) = load_or_exit(&file);
            let filename = file.to_string_lossy().to_string();
            let report = match modvis::typeck::check_program(&program) {
                Ok(report) => report,
                Err(err) => {
                    modvis::diagnostics::render_error(&source, &filename, &err);
                    std::process::exit(1);
                }
            };

            match format {
                Format::Json => println!("{}", to_json_or_exit(&report)),
                Format::Text => {
                    modvis::diagnostics::render_report(&source, &filename, &report);
                    if report.is_clean() {
                        eprintln!("ok: {} call site(s) checked", report.checked);
                    } else {
                        eprintln!(
                            "error: {} of {} call site(s) rejected",
                            report.rejections.len(),
                            report.checked
                        );
                    }
                }
            }

            if !report.is_clean() || (deny_warnings && report.has_warnings()) {
                std::process::exit(1);
            }
        }
        Commands::Decls { file, format } => {
            let (program, source) = load_or_exit(&file);
            let rows = match modvis::typeck::summarize(&program.table) {
                Ok(rows) => rows,
                Err(err) => {
                    modvis::diagnostics::render_error(&source, &file.to_string_lossy(), &err);
                    std::process::exit(1);
                }
            };
            match format {
                Format::Json => println!("{}", to_json_or_exit(&rows)),
                Format::Text => {
                    for row in &rows {
                        let mut line = format!("{:<8} {:<20} {:<18} module {}", row.visibility, row.name, row.kind, row.module);
                        if let Some(attributed) = &row.attributed_to {
                            line.push_str(&format!(" (attributed to {attributed})"));
                        }
                        if !row.uses.is_empty() {
                            line.push_str(&format!(" uses {}", row.uses.join(", ")));
                        }
                        if program.entry_point == Some(row.id) {
                            line.push_str(" [entry point]");
                        }
                        println!("{line}");
                    }
                }
            }
        }
    }
}
