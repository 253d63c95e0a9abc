use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sheet2json::convert::{
    convert_file, CompositeObserver, ConversionObserver, ConvertOptions, FileObserver, TracingObserver,
    DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_SHEET_NAME,
};
use sheet2json::export::MissingCellPolicy;
use sheet2json::ingestion::sheet_names;

/// Convert one sheet of a spreadsheet workbook into a JSON array of row objects.
#[derive(Debug, Parser)]
#[command(name = "sheet2json", version, about)]
struct Cli {
    /// Input workbook (.xlsx, .xlsm, .xlsb, .xls, .ods).
    #[arg(default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Name of the sheet to convert.
    #[arg(short, long, env = "SHEET2JSON_SHEET", default_value = DEFAULT_SHEET_NAME)]
    sheet: String,

    /// Output JSON file (created or overwritten).
    #[arg(short, long, env = "SHEET2JSON_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// How empty cells are written.
    #[arg(long, value_enum, default_value_t = MissingCellPolicy::Null)]
    missing: MissingCellPolicy,

    /// Keep data rows whose cells are all empty.
    #[arg(long)]
    keep_empty_rows: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print the workbook's sheet names and exit.
    #[arg(long)]
    list_sheets: bool,

    /// Append conversion events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "sheet2json=debug,info" } else { "sheet2json=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    if cli.list_sheets {
        let names = sheet_names(&cli.input)
            .with_context(|| format!("failed to list sheets of {}", cli.input.display()))?;
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let mut observers: Vec<Arc<dyn ConversionObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(log_file) = &cli.log_file {
        observers.push(Arc::new(FileObserver::new(log_file)));
    }

    let options = ConvertOptions {
        sheet_name: cli.sheet.clone(),
        output_path: cli.output.clone(),
        missing_cells: cli.missing,
        skip_empty_rows: !cli.keep_empty_rows,
        pretty: cli.pretty,
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    let stats = convert_file(&cli.input, &options).with_context(|| {
        format!(
            "failed to convert sheet '{}' of {}",
            cli.sheet,
            cli.input.display()
        )
    })?;

    println!(
        "wrote {} records ({} columns) to {}",
        stats.rows,
        stats.columns,
        cli.output.display()
    );
    Ok(())
}
