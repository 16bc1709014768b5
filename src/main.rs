//! # clipdeck CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Interactive clip picker against the configured backend
//! clipdeck
//!
//! # Use another backend
//! clipdeck --server http://render-box:8000
//!
//! # Headless: list clips for a keyword
//! clipdeck search ocean
//!
//! # Headless: search, pick clips 2 then 0, render
//! clipdeck generate --keyword ocean --select 2,0 --layout shorts --script "Waves"
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: `~/.config/clipdeck/config.json`, overridden by
//!    `CLIPDECK_SERVER` and `--server`
//! 2. **UI loop**: draws [`App`] every tick and turns key presses into
//!    [`Action`]s
//! 3. **Requests**: each search or render runs in its own tokio task and
//!    reports back over a channel as an [`AppEvent`]
//!
//! ## Key Bindings
//!
//! ### Keyword bar
//! - `Enter` - Search
//! - `Esc` - Go to the clip list
//!
//! ### Clip list
//! - `j` / `Down`, `k` / `Up` - Move
//! - `Space` / `Enter` / click - Select or unselect
//! - `p` - Play clip
//! - `c` - Clear selection
//! - `g` - Render selected clips
//! - `o` - Play the rendered video
//! - `q` - Quit
//!
//! ### Anywhere
//! - `Tab` / `Shift+Tab` - Switch pane
//! - `Ctrl+G` - Render
//! - `F1` - Help
//! - `Ctrl+C` - Quit

use clipdeck::api::ClipClient;
use clipdeck::clip::{ClipBoard, GenerationOptions, GenerationRequest, Layout};
use clipdeck::config::Config;
use clipdeck::logging::{self, LogTarget};
use clipdeck::player;
use clipdeck::ui::{self, Action, App, AppEvent, ScreenLayout};
use clipdeck::ui::app::StatusLevel;
use clipdeck::ui::theme::Theme;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// clipdeck - pick stock clips and render them into a video
#[derive(Parser, Debug)]
#[command(name = "clipdeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search stock clips, pick a few, render a video", long_about = None)]
struct Args {
    /// Backend base URL (overrides config file and CLIPDECK_SERVER)
    #[arg(short, long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search clips and print them with their index and media URL
    Search {
        /// Search keyword (may be empty)
        #[arg(default_value = "")]
        keyword: String,
    },

    /// Search, select clips by index (in playback order) and render a video
    Generate {
        /// Search keyword
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// Clip indices in playback order, e.g. `2,0`
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<usize>,

        /// `landscape` or `shorts`
        #[arg(long)]
        layout: Option<Layout>,

        /// Narration script
        #[arg(long, default_value = "")]
        script: String,

        #[arg(long)]
        font_size: Option<u32>,

        #[arg(long)]
        font_family: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The TUI owns the terminal, so it logs to a file
    let log_target = match args.command {
        Some(_) => LogTarget::Stderr,
        None => LogTarget::File(logging::default_log_file()?),
    };
    logging::init(&log_target)?;

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let server_url = config.resolve_server_url(args.server.as_deref());
    let client = ClipClient::new(&server_url, config.timeout())
        .with_context(|| format!("Failed to create client for {}", server_url))?;

    match args.command {
        Some(Command::Search { keyword }) => run_search(&client, &keyword).await,
        Some(Command::Generate {
            keyword,
            select,
            layout,
            script,
            font_size,
            font_family,
        }) => {
            let defaults = config.generation_defaults();
            let options = GenerationOptions {
                layout: layout.unwrap_or(defaults.layout),
                script,
                font_size: font_size.unwrap_or(defaults.font_size),
                font_family: font_family.unwrap_or(defaults.font_family),
            };
            run_generate(&client, &keyword, &select, &options).await
        }
        None => run_tui(&client, &config).await,
    }
}

async fn run_search(client: &ClipClient, keyword: &str) -> Result<()> {
    let clips = client
        .search(keyword)
        .await
        .with_context(|| format!("Search for \"{}\" failed", keyword))?;

    if clips.is_empty() {
        eprintln!("No clips found for \"{}\"", keyword);
        return Ok(());
    }

    for (i, clip) in clips.iter().enumerate() {
        println!("{:>3}  {}  {}", i, clip, client.clip_url(clip));
    }
    Ok(())
}

async fn run_generate(
    client: &ClipClient,
    keyword: &str,
    select: &[usize],
    options: &GenerationOptions,
) -> Result<()> {
    let clips = client
        .search(keyword)
        .await
        .with_context(|| format!("Search for \"{}\" failed", keyword))?;

    let board = select_clips(clips, select)?;
    let request = GenerationRequest::build(&board, options)?;

    eprintln!("Rendering: {}", request.clips.join(", "));
    let video = client.generate(&request).await.context("Render failed")?;
    println!("{}", client.final_video_url(&video));
    Ok(())
}

/// Build a board from search results and select `indices` in order.
fn select_clips(clips: Vec<String>, indices: &[usize]) -> Result<ClipBoard> {
    let mut board = ClipBoard::with_clips(clips);
    for &index in indices {
        if board.is_selected(index) {
            anyhow::bail!("Clip {} selected more than once", index);
        }
        board.toggle(index)?;
    }
    Ok(board)
}

async fn run_tui(client: &ClipClient, config: &Config) -> Result<()> {
    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let theme = Theme::by_name_or_default(&config.theme).clone();
    let mut app = App::new(
        client.base_url().to_string(),
        config.generation_defaults(),
        theme,
    );

    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        client,
        &config.player,
        &mut event_reader,
        (&tx, &mut rx),
    )
    .await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);
    let _ = panic::take_hook();

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ClipClient,
    player_cmd: &str,
    event_reader: &mut dyn EventReader,
    (tx, rx): (&UnboundedSender<AppEvent>, &mut UnboundedReceiver<AppEvent>),
) -> Result<()> {
    loop {
        drain_events(app, rx);

        let size = terminal.size()?;
        let layout = ScreenLayout::new(Rect::new(0, 0, size.width, size.height));
        app.sync_gallery(layout.gallery_rows());

        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        // Poll faster while requests are in flight so results show promptly
        let poll_timeout = if app.is_busy() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        let event = match event_reader.read_event(poll_timeout)? {
            Some(e) => e,
            None => continue,
        };

        let action = match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                app.handle_click(&layout, mouse.column, mouse.row);
                None
            }
            _ => None,
        };

        if let Some(action) = action {
            dispatch(app, action, client, player_cmd, tx);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Apply every finished request waiting in the channel.
fn drain_events(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.apply(event);
    }
}

/// Run an action. Network calls are spawned and report back through `tx`.
fn dispatch(
    app: &mut App,
    action: Action,
    client: &ClipClient,
    player_cmd: &str,
    tx: &UnboundedSender<AppEvent>,
) {
    match action {
        Action::Search { ticket, keyword } => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = client.search(&keyword).await;
                let _ = tx.send(AppEvent::SearchFinished {
                    ticket,
                    keyword,
                    result,
                });
            });
        }
        Action::Generate(request) => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = client.generate(&request).await;
                let _ = tx.send(AppEvent::GenerateFinished(result));
            });
        }
        Action::Play(url) => {
            if let Err(e) = player::play(player_cmd, &url) {
                app.set_status(StatusLevel::Error, format!("{:#}", e));
            }
        }
    }
}
