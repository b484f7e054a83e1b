use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use walkdir::WalkDir;

use fts_parser_rs::logger::{log_error, set_log_file, set_log_prefix};
use fts_parser_rs::metadata::{Charset, ColumnLayout, FieldType, TableKind, TimeUnit};
use fts_parser_rs::parser::DecoderKind;
use fts_parser_rs::{CsvSink, FtsFile, ReadOptions, TableSet, write_table};

#[derive(Parser)]
#[command(
    name = "ftsdump",
    version,
    about = "Inspect, dump and convert FastTrack Schedule (.fts) files"
)]
struct Cli {
    /// Mirror warnings and errors into this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert each recovered table to a delimited text file.
    Convert(ConvertArgs),
    /// Print the version and the tables recovered from a file.
    Inspect(InspectArgs),
    /// Write a block-by-block trace of the scan.
    Dump(DumpArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    Csv,
    Tsv,
}

#[derive(Parser, Clone)]
struct ConvertArgs {
    /// Input files or directories (recurses directories).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory. Defaults to the directory of each input.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Sink kind: csv or tsv.
    #[arg(long, value_enum, default_value_t = SinkKind::Csv)]
    sink: SinkKind,

    /// Delimiter override. Defaults to ',' for csv and '\t' for tsv.
    #[arg(long)]
    delimiter: Option<char>,

    /// Write header row.
    #[arg(long = "headers", action = ArgAction::SetTrue, default_value_t = true)]
    headers: bool,
    /// Disable header row.
    #[arg(long = "no-headers", action = ArgAction::SetFalse, overrides_with = "headers")]
    _no_headers: bool,

    /// Fail on files with an unknown version code instead of skipping them.
    #[arg(long)]
    strict_version: bool,

    /// Number of concurrent worker threads.
    #[arg(long)]
    jobs: Option<usize>,

    /// Stop on first error.
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Parser, Clone)]
struct InspectArgs {
    input: PathBuf,
    /// Emit JSON instead of human readable output.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Clone)]
struct DumpArgs {
    input: PathBuf,
    /// Trace file to write. Defaults to the input path with a `.dump.txt` suffix.
    #[arg(long)]
    out: Option<PathBuf>,
}

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        set_log_file(path)?;
    }

    match cli.command {
        Command::Convert(args) => run_convert(&args),
        Command::Inspect(args) => run_inspect(&args),
        Command::Dump(args) => run_dump(&args),
    }
}

fn run_convert(args: &ConvertArgs) -> Result<(), AnyError> {
    if let Some(jobs) = args.jobs {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global();
    }
    let delimiter = match (args.sink, args.delimiter) {
        (_, Some(ch)) => u8::try_from(ch).map_err(|_| format!("delimiter {ch:?} is not ASCII"))?,
        (SinkKind::Tsv, None) => b'\t',
        (SinkKind::Csv, None) => b',',
    };
    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    let files = discover_inputs(&args.inputs);
    let process = |input: &PathBuf| -> Result<(), AnyError> {
        let _prefix = set_log_prefix(input.display().to_string());
        convert_one(input, args, delimiter)
    };

    if args.fail_fast {
        files
            .par_iter()
            .map(process)
            .collect::<Result<Vec<_>, _>>()?;
    } else {
        let failures = files
            .par_iter()
            .map(|input| {
                let res = process(input);
                if let Err(ref e) = res {
                    log_error(&format!("{}: {e}", input.display()));
                }
                res
            })
            .filter(Result::is_err)
            .count();
        if failures > 0 {
            eprintln!("completed with {failures} failures");
        }
    }

    Ok(())
}

fn convert_one(input: &Path, args: &ConvertArgs, delimiter: u8) -> Result<(), AnyError> {
    let options = ReadOptions::new().with_strict_version(args.strict_version);
    let file = FtsFile::open_with_options(input, &options)?;

    for table in file.tables().tables().filter(|table| !table.is_empty()) {
        let output = output_path(input, table.kind(), args);
        let mut sink = CsvSink::new(BufWriter::new(File::create(&output)?))
            .with_delimiter(delimiter)
            .with_headers(args.headers);
        write_table(&mut sink, table)?;
        println!("{} -> {}", input.display(), output.display());
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), AnyError> {
    let file = FtsFile::open(&args.input)?;
    let tables = file.tables();
    if args.json {
        #[derive(serde::Serialize)]
        struct ColumnJson {
            name: String,
            field: String,
            kind: DecoderKind,
            offset: usize,
            values: usize,
        }
        #[derive(serde::Serialize)]
        struct TableJson {
            name: &'static str,
            rows: usize,
            columns: Vec<ColumnJson>,
        }
        #[derive(serde::Serialize)]
        struct InspectJson {
            version_code: i32,
            supported: bool,
            charset: Option<Charset>,
            layout: Option<ColumnLayout>,
            duration_unit: Option<TimeUnit>,
            work_unit: Option<TimeUnit>,
            tables: Vec<TableJson>,
        }
        let payload = InspectJson {
            version_code: tables.version_code(),
            supported: tables.is_supported(),
            charset: tables.version().map(|version| version.charset),
            layout: tables.version().map(|version| version.layout),
            duration_unit: tables.inferred_duration_unit(),
            work_unit: tables.inferred_work_unit(),
            tables: tables
                .tables()
                .map(|table| TableJson {
                    name: table.kind().name(),
                    rows: table.len(),
                    columns: table
                        .columns()
                        .iter()
                        .map(|column| ColumnJson {
                            name: column.name.clone(),
                            field: field_label(column.field),
                            kind: column.kind,
                            offset: column.offset,
                            values: column.values,
                        })
                        .collect(),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(std::io::stdout(), &payload)?;
        println!();
    } else {
        print_summary(tables);
    }
    Ok(())
}

fn print_summary(tables: &TableSet) {
    match tables.version() {
        Some(version) => println!(
            "Version: {}  Charset: {:?}  Layout: {:?}",
            version.code, version.charset, version.layout
        ),
        None => {
            println!("Version: {} (unsupported)", tables.version_code());
            return;
        }
    }
    println!(
        "Duration unit: {:?}  Work unit: {:?}",
        tables.duration_unit(),
        tables.work_unit()
    );
    for table in tables.tables() {
        println!("\n{}  rows={}", table.kind(), table.len());
        for column in table.columns() {
            println!(
                "  {name:<32}  {kind:<12}  {field:<40}  values={values}",
                name = column.name,
                kind = format!("{:?}", column.kind),
                field = field_label(column.field),
                values = column.values,
            );
        }
    }
}

fn run_dump(args: &DumpArgs) -> Result<(), AnyError> {
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| args.input.with_extension("dump.txt"));
    let options = ReadOptions::new().with_trace_file(&out);
    let file = FtsFile::open_with_options(&args.input, &options)?;
    print_summary(file.tables());
    println!("trace written to {}", out.display());
    Ok(())
}

fn field_label(field: FieldType) -> String {
    field.to_string()
}

fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if path.is_file() && is_fts(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_fts(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("fts"))
}

/// `<dir>/<stem>.<table>.<ext>`, e.g. `plan.activities.csv`.
fn output_path(input: &Path, table: TableKind, args: &ConvertArgs) -> PathBuf {
    let ext = match args.sink {
        SinkKind::Csv => "csv",
        SinkKind::Tsv => "tsv",
    };
    let stem = input.file_stem().unwrap_or_else(|| OsStr::new("output"));
    let name = format!(
        "{}.{}.{ext}",
        stem.to_string_lossy(),
        table.name().to_ascii_lowercase()
    );
    args.out_dir.as_ref().map_or_else(
        || input.with_file_name(&name),
        |dir| dir.join(&name),
    )
}
