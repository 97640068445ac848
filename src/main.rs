use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use lyricsync::app::cli::{Args, Command};
use lyricsync::app::config::{AppConfig, PersistentState, UserConfig};
use lyricsync::app::events::AppEvent;
use lyricsync::app::{inputs, Album, App};
use lyricsync::lyrics::cache::LocalTextCache;
use lyricsync::lyrics::lrc::parse_lrc;
use lyricsync::lyrics::remote::HttpLyricsStore;
use lyricsync::lyrics::{LyricsResolver, PlainTextStore, ResolveRequest, SyncedLyricsStore, TrackKey};
use lyricsync::ui::{self, theme};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fs, io};
use tokio::sync::mpsc;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;

type Resolver = LyricsResolver<HttpLyricsStore, HttpLyricsStore>;

/// Logs go to a daily file: stdout belongs to the UI.
fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let dir = dirs::cache_dir()?.join("lyricsync").join("logs");
    fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "lyricsync.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Some(guard)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    // Leave raw mode before the panic report prints
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        report(info);
    }));

    let args = Args::parse();
    let _log_guard = init_logging(args.verbose);

    if args.generate_config {
        println!("{}", toml::to_string_pretty(&UserConfig::default())?);
        return Ok(());
    }

    let (mut config, state) = AppConfig::load();
    if let Some(lang) = &args.lang {
        config.lang = lang.clone();
    }
    if let Some(api) = &args.api {
        config.api_base_url = api.clone();
    }

    // Performance Optimization: Global HTTP Client (Reused)
    let client = reqwest::Client::builder()
        .user_agent(concat!("lyricsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default();
    let store = Arc::new(HttpLyricsStore::new(client, config.remote_settings()));

    if let Some(command) = args.command {
        return run_command(command, &store, &config.lang).await;
    }

    let Some(album_path) = args
        .album
        .clone()
        .or_else(|| state.last_album.as_ref().map(PathBuf::from))
    else {
        bail!("no album to play: pass --album <manifest.json>");
    };
    let album = Album::load(&album_path)?;
    let start_track = start_track(&album, &album_path, args.track.as_deref(), &state);
    info!(album = %album.id, tracks = album.tracks.len(), "starting");

    let resolver: Arc<Resolver> = Arc::new(
        LyricsResolver::new(store.clone(), store, LocalTextCache::default_location())
            .with_embedded_fallback_on_absent(config.embedded_fallback_on_absent),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        config,
        state,
        album,
        Some(album_path),
        start_track,
        Instant::now(),
    );
    app.theme = theme::load_current_theme();

    let (tx, mut rx) = mpsc::channel(100);

    // 1. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(AppEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    // 2. Theme Watcher Task 🎨
    let tx_theme = tx.clone();
    tokio::spawn(async move {
        let mut last = theme::load_current_theme();
        loop {
            tokio::time::sleep(Duration::from_millis(250)).await;
            let new_theme = theme::load_current_theme();
            if new_theme != last {
                last = new_theme.clone();
                if tx_theme.send(AppEvent::ThemeUpdate(new_theme)).await.is_err() {
                    break;
                }
            }
        }
    });

    // 3. Animation Tick Task ⚡
    let tx_tick = tx.clone();
    tokio::spawn(async move {
        // 60 FPS Update Rate (approx 16ms)
        let mut interval = tokio::time::interval(Duration::from_millis(16));
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    if let Some(request) = app.poll_track_change(Instant::now()) {
        spawn_resolve(&resolver, &tx, request);
    }

    loop {
        terminal.draw(|f| ui::ui(f, &mut app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        let now = Instant::now();
        match event {
            AppEvent::Input(input) => inputs::handle_event(input, &mut app, now),
            AppEvent::LyricsResolved(key, resolved) => {
                app.on_lyrics_resolved(now, key, resolved);
            }
            AppEvent::ThemeUpdate(new_theme) => app.theme = new_theme,
            AppEvent::Tick => app.on_tick(now),
        }

        // Navigation anywhere above may have switched tracks
        if let Some(request) = app.poll_track_change(now) {
            spawn_resolve(&resolver, &tx, request);
        }

        if !app.is_running {
            break;
        }
    }

    restore_terminal();
    terminal.show_cursor()?;

    // Save state on exit
    app.save_state();
    info!("bye");
    Ok(())
}

/// Resolution runs off the loop; the key travels with the result so a late
/// answer for an old track is dropped on arrival.
fn spawn_resolve(resolver: &Arc<Resolver>, tx: &mpsc::Sender<AppEvent>, request: ResolveRequest) {
    let resolver = resolver.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let resolved = resolver.resolve(&request).await;
        let _ = tx.send(AppEvent::LyricsResolved(request.key, resolved)).await;
    });
}

fn start_track(album: &Album, path: &Path, requested: Option<&str>, state: &PersistentState) -> Option<usize> {
    if let Some(id) = requested {
        return album.track_index(id);
    }
    // Resume only within the album played last time
    let same_album = state
        .last_album
        .as_deref()
        .is_some_and(|last| Path::new(last) == path);
    state
        .last_track
        .as_deref()
        .filter(|_| same_album)
        .and_then(|id| album.track_index(id))
}

async fn run_command(command: Command, store: &HttpLyricsStore, lang: &str) -> Result<()> {
    match command {
        Command::PushSync {
            album_id,
            track_id,
            file,
            authorship,
        } => {
            let lines = parse_lrc(&fs::read_to_string(&file)?);
            if lines.is_empty() {
                bail!("{} has no timed lines", file.display());
            }
            let key = TrackKey::new(&album_id, &track_id, lang);
            if let Err(e) = store.put_synced(&key, &lines, authorship.as_deref()).await {
                error!(key = %key, error = %e, "push-sync failed");
                return Err(e.into());
            }
            println!("Saved {} synced lines for {}", lines.len(), key);
        }
        Command::PushText {
            album_id,
            track_id,
            file,
            authorship,
        } => {
            let content = fs::read_to_string(&file)?;
            let key = TrackKey::new(&album_id, &track_id, lang);
            LocalTextCache::default_location().save(&key, &content)?;
            if let Err(e) = store.put_text(&key, &content, authorship.as_deref()).await {
                error!(key = %key, error = %e, "push-text failed");
                return Err(e.into());
            }
            println!("Saved lyric text for {}", key);
        }
    }
    Ok(())
}
