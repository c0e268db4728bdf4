mod exceptions;
mod form;
mod notify;
mod panel;
mod settings;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossbeam_channel::{unbounded, Receiver};
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::exceptions::{ExceptionList, ExceptionRecord, ExceptionType, WindowIdentity};
use crate::form::{apply_value, Field, FieldValue};
use crate::notify::{NoopNotifier, PanelEvent, ReloadNotifier, SessionBusNotifier};
use crate::panel::ConfigPanel;
use crate::settings::DecorationSettings;
use crate::store::{ConfigStore, STORE_NAME};

#[derive(Parser)]
#[command(name = "sierrabreeze-config")]
#[command(about = "Edit SierraBreeze window decoration settings and window exceptions")]
struct Cli {
    /// Directory holding the decoration configuration (default: XDG config dir)
    #[arg(long, global = true, env = "SIERRABREEZE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Do not ask KWin and the Breeze style to reload after saving
    #[arg(long, global = true)]
    no_broadcast: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every setting and the exception list
    Show,
    /// Change settings, e.g. `set buttonSize=24 shadowStrength=50`
    Set {
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,

        /// Report whether anything changed without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Reset every setting except the exceptions to its default
    Defaults {
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage per-window exceptions
    Exception {
        #[command(subcommand)]
        action: ExceptionCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MatchKind {
    /// Match against the window class name
    Class,
    /// Match against the window title
    Title,
}

impl From<MatchKind> for ExceptionType {
    fn from(kind: MatchKind) -> Self {
        match kind {
            MatchKind::Class => ExceptionType::WindowClass,
            MatchKind::Title => ExceptionType::WindowTitle,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[derive(Subcommand)]
enum ExceptionCommand {
    /// List exceptions in priority order
    List,
    /// Append an exception
    Add {
        /// Regular expression matched against the window class or title
        #[arg(long)]
        pattern: String,

        #[arg(long = "match", value_enum, default_value = "class")]
        kind: MatchKind,

        /// Add the exception disabled
        #[arg(long)]
        disabled: bool,

        /// Settings overridden by this exception
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,
    },
    /// Change an existing exception
    Edit {
        index: usize,

        #[arg(long)]
        pattern: Option<String>,

        #[arg(long = "match", value_enum)]
        kind: Option<MatchKind>,

        /// Reset the exception's settings to the defaults before applying --set
        #[arg(long)]
        reset: bool,

        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,
    },
    /// Delete an exception
    Remove { index: usize },
    /// Enable or disable an exception
    Toggle { index: usize },
    /// Change an exception's priority
    Move {
        index: usize,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Show which exception applies to a window
    Match {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        class: String,
    },
}

pub fn get_config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".config"))
}

/// Split `field=value` and parse the value for that field
fn parse_assignment(assignment: &str) -> Result<(Field, FieldValue)> {
    let (name, raw) = assignment
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got '{}'", assignment))?;
    let field: Field = name.parse()?;
    let value = field.parse_value(raw)?;
    Ok((field, value))
}

fn apply_overrides(settings: &mut DecorationSettings, overrides: &[String]) -> Result<()> {
    for assignment in overrides {
        let (field, value) = parse_assignment(assignment)?;
        apply_value(settings, field, value);
    }
    Ok(())
}

fn describe_exception(index: usize, record: &ExceptionRecord) -> String {
    format!(
        "{:>3}  [{}] {} ~ /{}/",
        index,
        if record.enabled { "x" } else { " " },
        record.exception_type.label(),
        record.pattern
    )
}

fn print_settings(panel: &ConfigPanel) {
    for field in Field::ALL {
        let value = panel.form().value(field);
        println!("{} = {}", field, field.format_value(&value));
    }

    let exceptions = panel.form().exceptions().exceptions();
    println!();
    println!("Exceptions ({}):", exceptions.len());
    for (index, record) in exceptions.iter().enumerate() {
        println!("{}", describe_exception(index, record));
    }
}

/// Latest dirty state reported by the panel
fn last_changed(events: &Receiver<PanelEvent>) -> Option<bool> {
    events.try_iter().last().map(|event| match event {
        PanelEvent::Changed(changed) => changed,
    })
}

/// Save if the panel reports unsaved changes
fn save_if_changed(panel: &mut ConfigPanel, dry_run: bool) -> Result<()> {
    let changed = panel.is_changed();
    println!("Unsaved changes: {}", if changed { "yes" } else { "no" });

    if dry_run {
        info!("Dry run, nothing written");
    } else if changed {
        panel.save()?;
        println!("Saved.");
    }
    Ok(())
}

fn run_exception_command(panel: &mut ConfigPanel, action: ExceptionCommand) -> Result<()> {
    match action {
        ExceptionCommand::List => {
            for (index, record) in panel.form().exceptions().exceptions().iter().enumerate() {
                println!("{}", describe_exception(index, record));
            }
            return Ok(());
        }
        ExceptionCommand::Match { title, class } => {
            let list = ExceptionList::read_config(panel.store());
            let window = WindowIdentity {
                title: &title,
                class: &class,
            };
            match list.find_match(&window) {
                Some(record) => println!(
                    "Matched: /{}/ ({})",
                    record.pattern,
                    record.exception_type.label()
                ),
                None => println!("No exception matches; global settings apply."),
            }
            return Ok(());
        }
        ExceptionCommand::Add {
            pattern,
            kind,
            disabled,
            overrides,
        } => {
            let mut record = ExceptionRecord::new(pattern, kind.into());
            record.enabled = !disabled;
            record.settings = DecorationSettings::load(panel.store());
            apply_overrides(&mut record.settings, &overrides)?;
            panel.edit_exceptions(|editor| {
                editor.add(record);
                Ok(())
            })?;
        }
        ExceptionCommand::Edit {
            index,
            pattern,
            kind,
            reset,
            overrides,
        } => {
            let mut record = panel
                .form()
                .exceptions()
                .exceptions()
                .get(index)
                .cloned()
                .with_context(|| format!("No exception at index {}", index))?;
            if let Some(pattern) = pattern {
                record.pattern = pattern;
            }
            if let Some(kind) = kind {
                record.exception_type = kind.into();
            }
            if reset {
                record.settings.set_defaults();
            }
            apply_overrides(&mut record.settings, &overrides)?;
            panel.edit_exceptions(|editor| editor.replace(index, record))?;
        }
        ExceptionCommand::Remove { index } => {
            let removed = panel.edit_exceptions(|editor| editor.remove(index))?;
            info!("Removed exception /{}/", removed.pattern);
        }
        ExceptionCommand::Toggle { index } => {
            panel.edit_exceptions(|editor| {
                let enabled = editor
                    .exceptions()
                    .get(index)
                    .map(|record| record.enabled)
                    .unwrap_or_default();
                editor.set_enabled(index, !enabled)
            })?;
        }
        ExceptionCommand::Move { index, direction } => {
            panel.edit_exceptions(|editor| match direction {
                Direction::Up => editor.move_up(index),
                Direction::Down => editor.move_down(index),
            })?;
        }
    }

    save_if_changed(panel, false)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("sierrabreeze_config={}", cli.log_level).parse()?),
        )
        .init();

    let config_dir = cli.config_dir.clone().unwrap_or_else(get_config_dir);
    let store = ConfigStore::open(&config_dir, STORE_NAME);
    info!("Using configuration {:?}", store.path());

    let reload: Box<dyn ReloadNotifier> = if cli.no_broadcast {
        Box::new(NoopNotifier)
    } else {
        Box::new(SessionBusNotifier)
    };

    let (event_tx, event_rx) = unbounded();
    let mut panel = ConfigPanel::new(store, reload).with_observer(event_tx);
    panel.load();
    if last_changed(&event_rx) != Some(false) {
        warn!("Panel did not report a clean state after loading");
    }

    match cli.command {
        Commands::Show => print_settings(&panel),
        Commands::Set {
            assignments,
            dry_run,
        } => {
            for assignment in &assignments {
                let (field, value) = parse_assignment(assignment)?;
                panel.on_field_changed(field, value)?;
                info!("{} -> {}", field, field.format_value(&panel.form().value(field)));
            }
            save_if_changed(&mut panel, dry_run)?;
        }
        Commands::Defaults { dry_run } => {
            panel.defaults();
            panel.update_changed();
            save_if_changed(&mut panel, dry_run)?;
        }
        Commands::Exception { action } => run_exception_command(&mut panel, action)?,
    }

    Ok(())
}
