//! Steepbook - tea session log
//!
//! Command-line front end over the session book:
//! - Record, edit, list and delete brewing sessions
//! - Export the log as CSV or JSON
//! - Import a CSV or JSON file, replacing the current log

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use sb_common::{
    is_valid_datetime, normalize_local, ExchangeFormat, Message, Session, StaticField,
};
use sb_core::book::SessionBook;
use sb_core::config::{load_config, ConfigOptions, ResolvedConfig};
use sb_core::exit_codes::ExitCode;
use sb_core::form::{
    custom_field_label, default_datetime, entries_for, parse_custom_entry, session_from_entries,
};
use sb_core::import::{apply_import, TerminalNotifier};
use sb_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use sb_core::store::SessionStore;
use sb_exchange::{codec_for, export_sessions, import_bytes, Classification, DirectorySink};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Steepbook - keep a log of your tea sessions
#[derive(Parser)]
#[command(name = "steepbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Directory holding the session store
    #[arg(long, global = true, env = "STEEPBOOK_DATA")]
    data_dir: Option<PathBuf>,

    /// Override config directory
    #[arg(long, global = true, env = "STEEPBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Omit timestamps from log lines
    #[arg(long, global = true)]
    no_timestamps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded sessions
    List,

    /// Show every field of one session
    Show {
        /// Session number as shown by `list`
        index: usize,
    },

    /// Record a new session
    Add(SessionArgs),

    /// Change an existing session
    Edit {
        /// Session number as shown by `list`
        index: usize,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Delete a session
    Delete {
        /// Session number as shown by `list`
        index: usize,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Write all sessions to steepbook_sessions.csv or .json
    Export(ExportArgs),

    /// Replace all sessions with the contents of a CSV or JSON file
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
struct SessionArgs {
    /// When the session happened (default: now)
    #[arg(long)]
    datetime: Option<String>,

    #[arg(long)]
    tea_name: Option<String>,

    #[arg(long)]
    brewing_vessel: Option<String>,

    #[arg(long)]
    tea_producer: Option<String>,

    #[arg(long)]
    origin: Option<String>,

    #[arg(long)]
    purchase_location: Option<String>,

    #[arg(long)]
    dry_leaf: Option<String>,

    #[arg(long)]
    wet_leaf: Option<String>,

    #[arg(long = "notes")]
    additional_notes: Option<String>,

    /// Steep note, in brewing order (repeatable; replaces all steeps on edit)
    #[arg(long = "steep")]
    steeps: Vec<String>,

    /// Custom field as LABEL=VALUE (repeatable)
    #[arg(long = "custom", value_name = "LABEL=VALUE")]
    custom: Vec<String>,
}

impl SessionArgs {
    fn static_overrides(&self) -> Vec<(StaticField, &str)> {
        [
            (StaticField::Datetime, &self.datetime),
            (StaticField::TeaName, &self.tea_name),
            (StaticField::BrewingVessel, &self.brewing_vessel),
            (StaticField::TeaProducer, &self.tea_producer),
            (StaticField::Origin, &self.origin),
            (StaticField::PurchaseLocation, &self.purchase_location),
            (StaticField::DryLeaf, &self.dry_leaf),
            (StaticField::WetLeaf, &self.wet_leaf),
            (StaticField::AdditionalNotes, &self.additional_notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output format
    #[arg(long, value_enum)]
    format: ExchangeFormat,

    /// Directory to write into (default: current directory)
    #[arg(long, env = "STEEPBOOK_EXPORT_DIR")]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// File to import
    file: PathBuf,

    /// Input format (default: from the file extension)
    #[arg(long, value_enum)]
    format: Option<ExchangeFormat>,

    /// Do not ask before overwriting current sessions
    #[arg(long, short = 'y')]
    yes: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    }
}

fn main() {
    let cli = parse_cli();

    let options = ConfigOptions {
        config_dir: cli.global.config.clone(),
        data_dir: cli.global.data_dir.clone(),
        export_dir: match &cli.command {
            Commands::Export(args) => args.out_dir.clone(),
            _ => None,
        },
    };

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LogConfig::from_env(cli.global.log_level, cli.global.log_format));
            error!(error = %e, "Failed to load configuration");
            eprintln!("steepbook: {e}");
            std::process::exit(ExitCode::ArgsError.as_i32());
        }
    };

    let mut log_config = LogConfig::resolve(
        config.log_level,
        config.log_format,
        cli.global.log_level,
        cli.global.log_format,
    );
    if cli.global.quiet {
        log_config.level = LogLevel::Error;
    } else if cli.global.verbose > 0 {
        log_config.level = log_config.level.louder(cli.global.verbose);
    }
    if cli.global.no_timestamps {
        log_config = log_config.with_timestamps(false);
    }
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let exit_code = span.in_scope(|| {
        debug!(
            data_dir = %config.data_dir.display(),
            config_file = ?config.config_path,
            "Configuration resolved"
        );
        let app = App::new(config);
        match cli.command {
            Commands::List => app.list(),
            Commands::Show { index } => app.show(index),
            Commands::Add(args) => app.add(&args),
            Commands::Edit { index, session } => app.edit(index, &session),
            Commands::Delete { index, yes } => app.delete(index, yes),
            Commands::Export(args) => app.export(args.format),
            Commands::Import(args) => app.import(&args),
        }
    });

    debug!(run_id = %run_id, exit_code = %exit_code, "Finished");
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

struct App {
    config: ResolvedConfig,
    store: SessionStore,
}

/// Ask a yes/no question; anything but an explicit yes is a no.
fn confirm(message: Message, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    if !std::io::stdin().is_terminal() {
        warn!(prompt = message.code_name(), "No terminal to confirm on; pass --yes");
        return false;
    }
    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message.text())
        .default(false)
        .interact()
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "Confirmation prompt failed");
            false
        }
    }
}

/// 1-based position from the CLI to a book index.
fn book_index(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

impl App {
    fn new(config: ResolvedConfig) -> Self {
        let store = SessionStore::new(&config.data_dir);
        Self { config, store }
    }

    fn load_book(&self) -> Result<SessionBook, ExitCode> {
        match self.store.load() {
            Ok(sessions) => Ok(SessionBook::from_sessions(sessions)),
            Err(e) => {
                error!(error = %e, "Failed to load sessions");
                eprintln!("{}", e.message());
                Err(ExitCode::StorageError)
            }
        }
    }

    fn save_book(&self, book: &SessionBook) -> Result<(), ExitCode> {
        self.store.save(book.sessions()).map_err(|e| {
            error!(error = %e, "Failed to save sessions");
            eprintln!("{}", e.message());
            ExitCode::StorageError
        })
    }

    fn resolve_index(&self, book: &SessionBook, position: usize) -> Result<usize, ExitCode> {
        match book_index(position).filter(|index| *index < book.len()) {
            Some(index) => Ok(index),
            None => {
                eprintln!(
                    "No session #{position} (there are {} sessions)",
                    book.len()
                );
                Err(ExitCode::ArgsError)
            }
        }
    }

    fn list(&self) -> ExitCode {
        let book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        if book.is_empty() {
            println!("No sessions recorded yet.");
            return ExitCode::Clean;
        }
        for (i, session) in book.iter().enumerate() {
            println!(
                "{:>3}. {} - {} - {}",
                i + 1,
                session.date(),
                session.tea_producer,
                session.tea_name
            );
        }
        ExitCode::Clean
    }

    fn show(&self, position: usize) -> ExitCode {
        let book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        let index = match self.resolve_index(&book, position) {
            Ok(index) => index,
            Err(code) => return code,
        };
        let Ok(session) = book.get(index) else {
            return ExitCode::InternalError;
        };

        for field in StaticField::ALL {
            println!("{}: {}", field.label(), session.field(field));
        }
        for (i, steep) in session.steeps.iter().enumerate() {
            println!("Steep {}: {}", i + 1, steep);
        }
        for field in &session.custom_fields {
            println!("{}: {}", custom_field_label(&field.name), field.value);
        }
        ExitCode::Clean
    }

    /// Build a session from flags on top of `base` form entries.
    fn assemble(base: Vec<(String, String)>, args: &SessionArgs) -> Result<Session, ExitCode> {
        let mut entries = base;

        for (field, value) in args.static_overrides() {
            match entries.iter_mut().find(|(key, _)| key == field.name()) {
                Some(entry) => entry.1 = value.to_string(),
                None => entries.push((field.name().to_string(), value.to_string())),
            }
        }

        if !args.steeps.is_empty() {
            entries.retain(|(key, _)| !key.starts_with(sb_common::STEEP_PREFIX));
            entries.extend(
                args.steeps
                    .iter()
                    .enumerate()
                    .map(|(i, steep)| (format!("{}{}", sb_common::STEEP_PREFIX, i + 1), steep.clone())),
            );
        }

        for raw in &args.custom {
            let (key, value) = parse_custom_entry(raw).map_err(|e| {
                eprintln!("Invalid --custom: {e}");
                ExitCode::ArgsError
            })?;
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }

        let mut session = session_from_entries(entries);

        if session.tea_name.trim().is_empty() {
            eprintln!("A tea name is required (--tea-name)");
            return Err(ExitCode::ArgsError);
        }
        if !is_valid_datetime(&session.datetime) {
            eprintln!("Invalid datetime '{}'", session.datetime);
            return Err(ExitCode::ArgsError);
        }
        if let Some(local) = normalize_local(&session.datetime) {
            session.datetime = local;
        }
        Ok(session)
    }

    fn add(&self, args: &SessionArgs) -> ExitCode {
        let mut book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        let base = vec![(StaticField::Datetime.name().to_string(), default_datetime())];
        let session = match Self::assemble(base, args) {
            Ok(session) => session,
            Err(code) => return code,
        };
        self.submit(&mut book, session)
    }

    fn edit(&self, position: usize, args: &SessionArgs) -> ExitCode {
        let mut book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        let index = match self.resolve_index(&book, position) {
            Ok(index) => index,
            Err(code) => return code,
        };
        let base = match book.begin_edit(index) {
            Ok(existing) => entries_for(existing),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::ArgsError;
            }
        };
        let session = match Self::assemble(base, args) {
            Ok(session) => session,
            Err(code) => {
                book.cancel_edit();
                return code;
            }
        };
        self.submit(&mut book, session)
    }

    fn submit(&self, book: &mut SessionBook, session: Session) -> ExitCode {
        let outcome = match book.submit(session) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::ArgsError;
            }
        };
        if let Err(code) = self.save_book(book) {
            return code;
        }
        info!(index = outcome.index(), "Session stored");
        println!("{}", outcome.message());
        ExitCode::Clean
    }

    fn delete(&self, position: usize, yes: bool) -> ExitCode {
        let mut book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        let index = match self.resolve_index(&book, position) {
            Ok(index) => index,
            Err(code) => return code,
        };
        if !confirm(Message::DeleteSessionConfirm, yes || self.config.assume_yes) {
            info!(index, "Delete declined");
            return ExitCode::Declined;
        }
        let removed = match book.remove(index) {
            Ok(removed) => removed,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::ArgsError;
            }
        };
        if let Err(code) = self.save_book(&book) {
            return code;
        }
        info!(index, tea = %removed.tea_name, "Session deleted");
        println!("{}", Message::SessionDeleteSuccess);
        ExitCode::Clean
    }

    fn export(&self, format: ExchangeFormat) -> ExitCode {
        let book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };
        let mut sink = DirectorySink::new(&self.config.export_dir);
        let codec = codec_for(format);
        match export_sessions(codec.as_ref(), book.sessions(), &mut sink) {
            Ok(()) => {
                println!("{}", Message::SessionExportSuccess);
                for path in sink.written() {
                    println!("{}", path.display());
                }
                ExitCode::Clean
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                eprintln!("{}", e.message());
                ExitCode::ExportError
            }
        }
    }

    fn import(&self, args: &ImportArgs) -> ExitCode {
        let Some(format) = args.format.or_else(|| ExchangeFormat::from_path(&args.file)) else {
            eprintln!(
                "Cannot tell the format of {}; pass --format csv|json",
                args.file.display()
            );
            return ExitCode::ArgsError;
        };

        let mut book = match self.load_book() {
            Ok(book) => book,
            Err(code) => return code,
        };

        if !confirm(Message::ImportOverwriteConfirm, args.yes || self.config.assume_yes) {
            info!("Import declined; sessions unchanged");
            return ExitCode::Declined;
        }

        let bytes = match std::fs::read(&args.file) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %args.file.display(), error = %e, "Failed to read import file");
                eprintln!("{}", Message::import_error(format));
                return ExitCode::ImportError;
            }
        };

        let outcome = import_bytes(format, &bytes);
        let report = apply_import(&mut book, &self.store, outcome, &mut TerminalNotifier);
        debug!(?report, "Import applied");

        match report.classification {
            Classification::TotalFailure => ExitCode::ImportError,
            _ if !report.saved => ExitCode::StorageError,
            Classification::PartialSuccess => ExitCode::PartialImport,
            Classification::FullSuccess => ExitCode::Clean,
        }
    }
}
