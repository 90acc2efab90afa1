use std::{
    error::Error,
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use post_heatmap::app::{self, config::Config, state::App};
use post_heatmap::heatmap::{
    self, html, prepare_when_ready, render_when_ready, sink::TextSink, DataReady, DataSource,
};
use post_heatmap::pageviews::{
    edge::{self, EdgeState, SnapshotSource},
    PageViewClient, ViewCache,
};

type BoxResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "post-heatmap", version, about = "Blog post contribution heatmap and page-view counter")]
struct Cli {
    /// Config file instead of ~/.config/post-heatmap/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Defaults to `tui`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the calendar in the terminal
    Tui(DataArgs),
    /// Render the calendar as HTML
    Html {
        #[command(flatten)]
        data: DataArgs,
        /// Page containing the `heatmap-container` element to render into
        #[arg(long)]
        page: Option<PathBuf>,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the calendar as plain text
    Text(DataArgs),
    /// Show the view count of one page
    Views {
        /// Page path, e.g. /posts/hello/
        path: String,
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Run the page-view service
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// JSON snapshot of view counts per path
        #[arg(long)]
        counts: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
struct DataArgs {
    /// Activity export (JSON list or `window.HEATMAP_DATA = [...];`)
    #[arg(long)]
    data: Option<PathBuf>,
    /// How many months back the calendar reaches
    #[arg(long)]
    months: Option<u32>,
    /// Reference date instead of today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl DataArgs {
    fn months(&self, config: &Config) -> u32 {
        self.months.unwrap_or(config.heatmap.months_back)
    }

    fn now(&self) -> NaiveDateTime {
        match self.today {
            Some(day) => day.and_time(NaiveTime::default()),
            None => Local::now().naive_local(),
        }
    }

    fn data_path(&self, config: &Config) -> Option<PathBuf> {
        self.data.clone().or_else(|| config.heatmap.resolved_data_path())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui(DataArgs::default()));
    init_logging(matches!(command, Command::Tui(_)));

    let config = Config::load(cli.config.as_deref());
    match run(command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("post-heatmap: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, except in the terminal UI where they would draw over
/// the screen and go to `<data_dir>/post-heatmap/post-heatmap.log` instead.
fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let Some(dir) = dirs::data_dir().map(|d| d.join("post-heatmap")) else {
        return;
    };
    let file = fs::create_dir_all(&dir).and_then(|_| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("post-heatmap.log"))
    });
    if let Ok(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

/// Load the records off the async runtime and signal when they are ready.
fn spawn_loader(path: Option<PathBuf>) -> oneshot::Receiver<DataReady> {
    let (tx, rx) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        let data = match path {
            Some(path) => DataSource::load(&path),
            None => Ok(DataSource::Absent),
        };
        // the receiver may already be gone on shutdown
        let _ = tx.send(data);
    });
    rx
}

async fn run(command: Command, config: Config) -> BoxResult<()> {
    match command {
        Command::Tui(args) => {
            let months = args.months(&config);
            let ready = spawn_loader(args.data_path(&config));
            let prepared = prepare_when_ready(ready, months, args.now()).await;

            let mut app = App::new(prepared, months, config.theme);
            tokio::task::spawn_blocking(move || app::run(&mut app)).await??;
        }

        Command::Html { data, page, output } => {
            let page = page.map(fs::read_to_string).transpose()?;
            let has_container = page
                .as_deref()
                .map_or(true, |p| html::mount(p, "").is_some());

            let mut sink = html::HtmlSink::new();
            let ready = spawn_loader(data.data_path(&config));
            let outcome = render_when_ready(
                has_container.then_some(&mut sink),
                ready,
                data.months(&config),
                data.now(),
            )
            .await;
            info!(?outcome, "heatmap rendered");

            let markup = sink.into_string();
            let out = match page {
                Some(page) => html::mount_rendered(page, &outcome, &markup),
                None => markup,
            };
            write_output(output.as_deref(), &out)?;
        }

        Command::Text(args) => {
            let mut sink = TextSink::new();
            let ready = spawn_loader(args.data_path(&config));
            let outcome =
                render_when_ready(Some(&mut sink), ready, args.months(&config), args.now()).await;
            info!(?outcome, "heatmap rendered");
            if let heatmap::RenderOutcome::Skipped(reason) = outcome {
                println!("nothing to render ({reason:?})");
            } else {
                println!("{}", sink.as_str());
            }
        }

        Command::Views { path, endpoint } => {
            let ttl = Duration::from_secs(config.pageviews.cache_ttl_secs);
            let cache = ViewCache::open_default(ttl)?;
            let client = PageViewClient::new(endpoint.unwrap_or(config.pageviews.endpoint), cache)?;
            let display = client.display(&path).await;
            println!("{} views", display.text);
        }

        Command::Serve { bind, counts } => {
            let bind = match bind {
                Some(bind) => bind,
                None => config.edge.bind.parse()?,
            };
            let source = SnapshotSource::new(counts.unwrap_or(config.edge.counts_path));
            let state = EdgeState::new(
                source,
                config.edge.allowed_origins,
                Duration::from_secs(config.edge.cache_ttl_secs),
            );
            edge::serve(bind, state).await?;
        }
    }
    Ok(())
}

fn write_output(path: Option<&Path>, text: &str) -> BoxResult<()> {
    match path {
        Some(path) => fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}
