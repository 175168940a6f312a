//! code-manager CLI
//!
//! Generate, catalog, edit, print and back up QR codes and Code128 barcodes.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use catalog_db::{CatalogRecord, RecordOrder};
use code_engine::{CodeType, WifiAuth};
use code_manager_lib::services::batch::{self, BatchSpec, ERROR_PREVIEW_LIMIT};
use code_manager_lib::services::{backup, generate, printer, records, regenerate};
use code_manager_lib::{AppConfig, AppContext};

#[derive(Parser)]
#[command(name = "code-manager")]
#[command(about = "Generate and catalog QR codes and barcodes", long_about = None)]
struct Cli {
    /// Data directory holding config.env, the catalog and generated images
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog tables and the codes directory
    Setup,

    /// Generate a single code
    Generate {
        /// QR or BAR
        #[arg(short = 't', long = "type", default_value = "QR")]
        code_type: CodeType,

        /// Text to encode
        data: String,

        /// Base file name (without type suffix or extension)
        #[arg(short, long)]
        name: String,
    },

    /// Generate a Wi-Fi join QR code
    Wifi {
        #[arg(long)]
        ssid: String,

        #[arg(long, default_value = "")]
        password: String,

        /// WPA, WEP or none
        #[arg(long, default_value = "WPA")]
        auth: WifiAuth,

        #[arg(short, long)]
        name: String,
    },

    /// Generate one code per number in a range
    Batch {
        #[arg(short = 't', long = "type", default_value = "QR")]
        code_type: CodeType,

        #[arg(long, default_value = "")]
        prefix: String,

        #[arg(long, default_value = "")]
        suffix: String,

        #[arg(long)]
        start: u64,

        #[arg(long)]
        end: u64,

        /// Zero-pad numbers to this many digits
        #[arg(long, default_value_t = 1)]
        pad: usize,

        /// Run large batches without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// List catalog records
    List {
        /// Order by id instead of creation date
        #[arg(long)]
        by_id: bool,
    },

    /// Show one catalog record
    Show { id: i64 },

    /// Change a record's data and regenerate its image
    Update { id: i64, data: String },

    /// Delete a record and its image
    Delete { id: i64 },

    /// Copy a record's image to a file or directory
    Export { id: i64, dest: PathBuf },

    /// Check that a record's image still encodes its data
    Verify { id: i64 },

    /// List printers known to CUPS
    Printers,

    /// Print a record's image
    Print {
        id: i64,

        /// Printer name (defaults to PRINTER from config, then the system default)
        #[arg(short, long)]
        printer: Option<String>,
    },

    /// Copy the catalog database into the backup directory
    Backup,

    /// Delete every record and every generated image
    Reset {
        #[arg(short, long)]
        yes: bool,
    },

    /// Record a scanned payload
    Scan { data: String },

    /// List recorded scans
    Scans,

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print effective settings
    Show,
    /// Persist one setting to config.env
    Set { key: String, value: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Set { key, value },
    } = &cli.command
    {
        let dir = cli.data_dir.clone().unwrap_or_else(code_manager_lib::config::data_dir);
        std::fs::create_dir_all(&dir)?;
        AppConfig::set_value(&dir, &key.to_ascii_uppercase(), value)?;
        println!("{} updated in {}", key.to_ascii_uppercase(), AppConfig::config_path(&dir).display());
        return Ok(());
    }

    let ctx = code_manager_lib::init_foundation(cli.data_dir.as_deref())?;
    run(&ctx, cli.command, cli.json)
}

fn run(ctx: &AppContext, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Setup => {
            ctx.db().setup()?;
            ctx.generator().ensure_output_dir()?;
            println!("Catalog ready at {}", ctx.config().database_path.display());
            println!("Images go to {}", ctx.config().codes_dir.display());
        }

        Commands::Generate {
            code_type,
            data,
            name,
        } => {
            let record = generate::generate_single(ctx, code_type, &data, &name)?;
            emit(json, &record, print_record)?;
        }

        Commands::Wifi {
            ssid,
            password,
            auth,
            name,
        } => {
            let record = generate::generate_wifi(ctx, &ssid, &password, auth, &name)?;
            emit(json, &record, print_record)?;
        }

        Commands::Batch {
            code_type,
            prefix,
            suffix,
            start,
            end,
            pad,
            yes,
        } => {
            let spec = BatchSpec::new(code_type, &prefix, &suffix, start, end, pad);
            run_batch_command(ctx, &spec, yes, json)?;
        }

        Commands::List { by_id } => {
            let order = if by_id {
                RecordOrder::IdDescending
            } else {
                RecordOrder::NewestFirst
            };
            let rows = records::list_codes(ctx, order)?;
            emit(json, &rows, |rows| {
                if rows.is_empty() {
                    println!("No codes in the catalog.");
                }
                for r in rows {
                    println!(
                        "{:>6}  {:<3}  {}  {}  {}",
                        r.id,
                        r.code_type.as_str(),
                        r.date_created.format("%Y-%m-%d %H:%M:%S"),
                        r.data,
                        r.image_path.display()
                    );
                }
            })?;
        }

        Commands::Show { id } => {
            let record = records::get_code(ctx, id)?;
            emit(json, &record, print_record)?;
        }

        Commands::Update { id, data } => {
            let outcome = regenerate::update_and_regenerate(ctx, id, &data)?;
            emit(json, &outcome.record, print_record)?;
            if outcome.previous_file_removed && !json {
                println!("Removed old image {}", outcome.previous_path.display());
            }
        }

        Commands::Delete { id } => {
            let outcome = records::delete_code(ctx, id)?;
            if outcome.file_removed {
                println!("Deleted code {id} and {}", outcome.record.image_path.display());
            } else {
                println!("Deleted code {id} (image was already gone)");
            }
        }

        Commands::Export { id, dest } => {
            let path = records::export_image(ctx, id, &dest)?;
            println!("Exported to {}", path.display());
        }

        Commands::Verify { id } => {
            if records::verify_code(ctx, id)? {
                println!("Code {id}: image matches its data");
            } else {
                bail!("code {id}: image is missing or does not match its data");
            }
        }

        Commands::Printers => {
            let printers = printer::list_system_printers()?;
            emit(json, &printers, |printers| {
                if printers.is_empty() {
                    println!("No printers configured.");
                }
                let default = printer::default_printer().ok().flatten();
                for p in printers {
                    let marker = if default.as_deref() == Some(p.name.as_str()) { "*" } else { " " };
                    println!("{marker} {}  ({})", p.name, p.status);
                }
            })?;
        }

        Commands::Print { id, printer: name } => {
            printer::print_code(ctx, id, name.as_deref())?;
            println!("Sent code {id} to the printer");
        }

        Commands::Backup => {
            let path = backup::backup_catalog(ctx)?;
            println!("Backup written to {}", path.display());
        }

        Commands::Reset { yes } => {
            if !yes {
                bail!(
                    "reset deletes every record and every image in {}; re-run with --yes",
                    ctx.config().codes_dir.display()
                );
            }
            let outcome = backup::reset_catalog(ctx)?;
            println!(
                "Removed {} codes, {} scans, {} files",
                outcome.rows.created, outcome.rows.scanned, outcome.files_removed
            );
        }

        Commands::Scan { data } => {
            let id = ctx.db().add_scanned_code(&data)?;
            println!("Recorded scan {id}");
        }

        Commands::Scans => {
            let scans = ctx.db().list_scanned_codes()?;
            emit(json, &scans, |scans| {
                for s in scans {
                    println!("{:>6}  {}  {}", s.id, s.date_scanned.format("%Y-%m-%d %H:%M:%S"), s.data);
                }
            })?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let values = ctx.config().to_values();
                emit(json, &values, |values| {
                    for (k, v) in values {
                        println!("{k}={v}");
                    }
                })?;
            }
            // handled before the catalog is opened
            ConfigAction::Set { .. } => {}
        },
    }

    Ok(())
}

fn run_batch_command(ctx: &AppContext, spec: &BatchSpec, yes: bool, json: bool) -> anyhow::Result<()> {
    spec.validate()?;

    let threshold = ctx.config().large_batch_threshold;
    if spec.is_large(threshold) && !yes {
        bail!(
            "this batch would generate {} codes (threshold {threshold}); re-run with --yes to continue",
            spec.total()
        );
    }

    let report = batch::run_batch_in(ctx, spec)?;

    if json {
        #[derive(Serialize)]
        struct Summary<'a> {
            total: u64,
            generated: u64,
            failed: u64,
            errors: Vec<String>,
            output_dir: &'a Path,
        }
        let summary = Summary {
            total: report.total,
            generated: report.generated,
            failed: report.failed(),
            errors: report.errors.iter().map(ToString::to_string).collect(),
            output_dir: ctx.generator().output_dir(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Generated {} of {} codes in {}",
            report.generated,
            report.total,
            ctx.generator().output_dir().display()
        );
        for line in report.error_preview(ERROR_PREVIEW_LIMIT) {
            println!("  {line}");
        }
        if report.errors.len() > ERROR_PREVIEW_LIMIT {
            println!("  ... and {} more", report.errors.len() - ERROR_PREVIEW_LIMIT);
        }
    }

    if !report.is_complete() {
        bail!("{} of {} items failed", report.failed(), report.total);
    }
    Ok(())
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
        println!("{out}");
    } else {
        text(value);
    }
    Ok(())
}

fn print_record(r: &CatalogRecord) {
    println!("id:       {}", r.id);
    println!("type:     {}", r.code_type);
    println!("data:     {}", r.data);
    println!("image:    {}", r.image_path.display());
    println!("created:  {}", r.date_created.format("%Y-%m-%d %H:%M:%S"));
}
