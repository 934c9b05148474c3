//! cantata - play a personalised song in the terminal
//!
//! Run with: cargo run -- song.mp3 --title "Happy Birthday" --name Sam

mod app;
mod ui;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use std::path::{Path, PathBuf};

use app::App;
use cantata::{PlayerConfig, PlayerProps};

const USAGE: &str =
    "usage: cantata <file> [--title T] [--name N] [--theme T] [--download URL] [--log PATH]";

/// Parsed command line
struct Args {
    source: String,
    title: Option<String>,
    name: Option<String>,
    theme: Option<String>,
    download: Option<String>,
    log: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> EyreResult<Self> {
        let mut source = None;
        let mut parsed = Args {
            source: String::new(),
            title: None,
            name: None,
            theme: None,
            download: None,
            log: None,
        };

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| eyre!("{} needs a value\n{}", flag, USAGE))
            };
            match arg.as_str() {
                "--title" => parsed.title = Some(value("--title")?),
                "--name" => parsed.name = Some(value("--name")?),
                "--theme" => parsed.theme = Some(value("--theme")?),
                "--download" => parsed.download = Some(value("--download")?),
                "--log" => parsed.log = Some(PathBuf::from(value("--log")?)),
                "-h" | "--help" => return Err(eyre!(USAGE)),
                flag if flag.starts_with("--") => {
                    return Err(eyre!("unknown option {}\n{}", flag, USAGE))
                }
                _ if source.is_none() => source = Some(arg.clone()),
                _ => return Err(eyre!("unexpected argument {}\n{}", arg, USAGE)),
            }
        }

        parsed.source = source.ok_or_else(|| eyre!(USAGE))?;
        Ok(parsed)
    }

    fn props(&self) -> PlayerProps {
        let title = self.title.clone().unwrap_or_else(|| {
            Path::new(&self.source)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.source.clone())
        });

        let mut props = PlayerProps::new(self.source.clone(), title);
        if let Some(name) = &self.name {
            props = props.name(name.clone());
        }
        if let Some(theme) = &self.theme {
            props = props.theme(theme.clone());
        }
        if let Some(url) = &self.download {
            props = props.download(url.clone());
        }
        props
    }
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> EyreResult<()> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .wrap_err("failed to install logger")?;
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = Args::parse(std::env::args().skip(1))?;
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let app = App::new(args.props(), PlayerConfig::default());

    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)
        .wrap_err("failed to enable mouse capture")?;

    let res = app.run(&mut terminal);

    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    res
}
