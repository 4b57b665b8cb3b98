pub mod render;
pub mod session;

use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use render::{render_palette, render_row, render_today, Painter};
use session::run_session;
use tokio::io::BufReader;
use tracing::level_filters::LevelFilter;

use crate::{
    feelings::{entities::FeelingRecord, Feeling},
    storage::{
        key_value::{FileKeyValueStore, KeyValueStore},
        record_store::RecordStore,
    },
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
        time::format_time_of_day,
    },
    view::{DisplayRow, TodayView, ViewAction},
};

#[derive(Parser, Debug)]
#[command(name = "Feelog", version, long_about = None)]
#[command(about = "Log how you feel throughout the day", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Open the interactive screen. This is the default")]
    Session {},
    #[command(about = "Record a feeling right now")]
    Record {
        #[arg(help = "Label, english alias or number of the feeling. See `labels`")]
        feeling: Feeling,
    },
    #[command(about = "Display feelings recorded today")]
    Today {},
    #[command(about = "Display the feelings that can be recorded")]
    Labels {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let records = open_record_store(&app_dir)?;
    let mut stdout = std::io::stdout();
    let painter = Painter::new(stdout.is_terminal());

    match args.commands.unwrap_or(Commands::Session {}) {
        Commands::Session {} => {
            let input = BufReader::new(tokio::io::stdin());
            run_session(&records, input, &mut stdout, painter).await?;
            Ok(())
        }
        Commands::Record { feeling } => {
            let record = records.append(feeling).await;
            print_recorded(record.as_ref(), &mut stdout, painter)
        }
        Commands::Today {} => print_today(&records, &mut stdout, painter).await,
        Commands::Labels {} => {
            write!(stdout, "{}", render_palette(painter))?;
            Ok(())
        }
    }
}

/// Record store living in `<app_dir>/store`.
pub fn open_record_store(app_dir: &Path) -> Result<RecordStore<FileKeyValueStore>> {
    let store = FileKeyValueStore::new(app_dir.join("store"))?;
    Ok(RecordStore::new(store, Box::new(DefaultClock)))
}

fn print_recorded(
    record: Option<&FeelingRecord>,
    out: &mut impl Write,
    painter: Painter,
) -> Result<()> {
    match record {
        Some(record) => {
            let row = DisplayRow {
                time: format_time_of_day(record.timestamp),
                feeling: record.feeling,
            };
            writeln!(out, "{}", render_row(&row, painter))?;
        }
        None => writeln!(out, "Not recorded")?,
    }
    Ok(())
}

async fn print_today<S: KeyValueStore>(
    records: &RecordStore<S>,
    out: &mut impl Write,
    painter: Painter,
) -> Result<()> {
    let view = TodayView::default().reduce(ViewAction::Loaded(records.load_today().await));
    write!(out, "{}", render_today(&view, painter))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use clap::Parser;
    use tempfile::tempdir;

    use crate::{
        cli::render::Painter,
        feelings::Feeling,
        storage::{key_value::FileKeyValueStore, record_store::RecordStore},
        utils::{clock::ManualClock, time::local_time},
    };

    use super::{print_recorded, print_today, Args, Commands};

    #[test]
    fn test_parse_record_command() {
        let args = Args::parse_from(["feelog", "record", "hunger", "--dir", "/tmp/feelog"]);
        assert!(matches!(
            args.commands,
            Some(Commands::Record {
                feeling: Feeling::Hunger
            })
        ));
        assert_eq!(args.dir.as_deref(), Some(std::path::Path::new("/tmp/feelog")));

        let args = Args::parse_from(["feelog", "record", "心慌"]);
        assert!(matches!(
            args.commands,
            Some(Commands::Record {
                feeling: Feeling::Palpitations
            })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_feeling() {
        assert!(Args::try_parse_from(["feelog", "record", "bored"]).is_err());
    }

    #[test]
    fn test_no_command_means_session() {
        let args = Args::parse_from(["feelog", "--log"]);
        assert!(args.commands.is_none());
        assert!(args.log);
    }

    #[tokio::test]
    async fn test_record_then_print_today() -> Result<()> {
        let dir = tempdir()?;
        let clock = ManualClock::new(local_time(2024, 6, 10, 9, 0));
        let records = RecordStore::new(
            FileKeyValueStore::new(dir.path().to_owned())?,
            Box::new(clock.clone()),
        );

        let mut out = Vec::new();
        let record = records.append(Feeling::Hunger).await;
        print_recorded(record.as_ref(), &mut out, Painter::plain())?;
        clock.set(local_time(2024, 6, 10, 21, 45));
        let record = records.append(Feeling::ColdExtremities).await;
        print_recorded(record.as_ref(), &mut out, Painter::plain())?;
        assert_eq!(String::from_utf8(out)?, "09:00  饥饿\n21:45  手脚冰凉\n");

        let mut out = Vec::new();
        print_today(&records, &mut out, Painter::plain()).await?;
        assert_eq!(String::from_utf8(out)?, "21:45  手脚冰凉\n09:00  饥饿\n");
        Ok(())
    }

    #[test]
    fn test_print_not_recorded() -> Result<()> {
        let mut out = Vec::new();
        print_recorded(None, &mut out, Painter::plain())?;
        assert_eq!(String::from_utf8(out)?, "Not recorded\n");
        Ok(())
    }
}
