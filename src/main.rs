use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use probewatch::config::Settings;
use probewatch::logging::{self, LogTarget};
use probewatch::source::{fetch, QueryData, QueryKey};
use probewatch::{
    ApiClient, App, AppOptions, ChartExport, ChartFilter, ColorMode, Fetcher, Session,
};
use probewatch_client::MonitorApi;
use probewatch_types::TimeRange;

#[derive(Parser, Debug)]
#[command(name = "probewatch")]
#[command(about = "Terminal dashboard for public uptime monitors and per-agent response times")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the monitor API
    #[arg(short, long)]
    url: Option<String>,

    /// Open this monitor directly
    #[arg(short, long)]
    monitor: Option<String>,

    /// Initial time range (1h, 6h, 1d, 3d, 7d)
    #[arg(long)]
    range: Option<TimeRange>,

    /// Poll interval in seconds for monitor detail and agent stats
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Agent color assignment (positional, hashed)
    #[arg(long)]
    color_mode: Option<ColorMode>,

    /// Log in before fetching
    #[arg(long, requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, requires = "username")]
    password: Option<String>,

    /// Write logs here instead of the default file in the temp directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch the monitor once, write its chart as JSON and exit (requires --monitor)
    #[arg(short, long, requires = "monitor")]
    export: Option<PathBuf>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref url) = self.url {
            settings.api.base_url = url.clone();
        }
        if let Some(range) = self.range {
            settings.ui.default_range = range;
        }
        if let Some(secs) = self.refresh {
            settings.refresh.poll_interval_secs = secs;
        }
        if let Some(mode) = self.color_mode {
            settings.ui.color_mode = mode;
        }
        if let Some(ref path) = self.log_file {
            settings.log.file = Some(path.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    // The TUI owns the terminal, so interactive runs log to a file
    let target = match (&settings.log.file, &args.export) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, Some(_)) => LogTarget::Stderr,
        (None, None) => LogTarget::File(logging::default_log_file()),
    };
    let _guard = logging::init(&settings.log.level, &target)?;
    info!(endpoint = %settings.api.base_url, "starting probewatch");

    let runtime = tokio::runtime::Runtime::new()?;

    let session = match settings.api.token {
        Some(ref token) => Session::with_token(token.clone()),
        None => Session::anonymous(),
    };
    let client = ApiClient::builder()
        .endpoint(settings.api.base_url.clone())
        .timeout(settings.timeout())
        .session(session)
        .build()?;

    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        let user = runtime
            .block_on(client.login(username, password))
            .context("Login failed")?;
        info!(user = %user.username, "logged in");
    }

    if let Some(ref export_path) = args.export {
        let monitor_id = args.monitor.as_deref().unwrap_or_default();
        return runtime.block_on(export_to_file(&client, monitor_id, &settings, export_path));
    }

    let options = AppOptions {
        poll_interval: settings.poll_interval(),
        default_range: settings.ui.default_range,
        color_mode: settings.ui.color_mode,
        endpoint: settings.api.base_url.clone(),
    };
    let fetcher = Fetcher::new(Arc::new(client.clone()), runtime.handle().clone());
    let mut app = App::new(fetcher, options);
    if let Some(ref id) = args.monitor {
        app.open_monitor(id);
    }

    let result = run_tui(&mut app);

    client.logout();
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| probewatch::ui::draw(frame, app))?;

        if let Some(event) = probewatch::events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => probewatch::events::handle_key_event(app, key),
                // Rows start after header (1) + table border (1) + table header (1)
                Event::Mouse(mouse) => probewatch::events::handle_mouse_event(app, mouse, 2),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Fetch detail, agent stats and history once and write the chart JSON.
async fn export_to_file(
    api: &dyn MonitorApi,
    monitor_id: &str,
    settings: &Settings,
    export_path: &Path,
) -> Result<()> {
    if monitor_id.trim().is_empty() {
        bail!("--export needs a monitor id");
    }
    let id = monitor_id.trim().to_string();
    let filter = ChartFilter::new(settings.ui.default_range);

    let detail_key = QueryKey::MonitorDetail(id.clone());
    let stats_key = QueryKey::AgentStats(id.clone());
    let history_key = QueryKey::History(id.clone(), filter.time_range);
    let (detail, stats, history) = tokio::join!(
        fetch(api, &detail_key),
        fetch(api, &stats_key),
        fetch(api, &history_key),
    );

    let monitor = match detail? {
        QueryData::Detail(monitor) => Some(monitor),
        _ => None,
    };
    let stats = match stats {
        Ok(QueryData::AgentStats(stats)) => stats,
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "agent stats unavailable, exporting without them");
            Vec::new()
        }
    };
    let history = match history? {
        QueryData::History(history) => Some(history),
        _ => None,
    };

    ChartExport::new(
        &id,
        monitor.as_ref(),
        &stats,
        history.as_ref(),
        &filter,
        settings.ui.color_mode,
    )
    .write_to(export_path)?;

    println!("Exported chart for {} to: {}", id, export_path.display());
    Ok(())
}
