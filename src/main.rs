//! Dashboard CLI
//!
//! Runs the dashboard workflows from a terminal.
//!
//! ```text
//! dashboard-cli --config client.toml login ana
//! dashboard-cli --token <t> transcribe meeting.wav --language en
//! dashboard-cli --token <t> chat "Summarize today's bookings"
//! dashboard-cli --token <t> speak "Welcome!" --out welcome.wav
//! dashboard-cli --token <t> list bookings --sort check_in --order descend
//! dashboard-cli --token <t> availability 3 2024-07-01 2024-07-31
//! dashboard-cli --token <t> trainer --attempt attempt.wav
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use dashboard_client::api::{Credentials, SortOrder, TableState};
use dashboard_client::config::{load_config, ClientConfig};
use dashboard_client::media::{AudioCapture, BufferedRecorder};
use dashboard_client::observability::logging::init_logging;
use dashboard_client::ui::{ConsoleNavigator, ConsoleNotifier, LogProgress};
use dashboard_client::{AppContext, Collaborators, Dashboard, Feature, Session};

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Terminal client for the AI dashboard and booking CRM", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(short, long)]
    url: Option<String>,

    /// Auth token from an earlier login
    #[arg(short, long, env = "DASHBOARD_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the issued token
    Login {
        username: String,
        #[arg(short, long, env = "DASHBOARD_PASSWORD")]
        password: String,
    },
    /// Transcribe an audio file
    Transcribe {
        file: PathBuf,
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Send a chat message
    Chat {
        message: String,
    },
    /// Synthesize speech and write the audio to a file
    Speak {
        text: String,
        #[arg(short, long)]
        voice: Option<String>,
        #[arg(short, long, default_value = "speech.wav")]
        out: PathBuf,
    },
    /// List a CRM resource
    List {
        resource: ResourceKind,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, value_enum)]
        order: Option<Order>,
    },
    /// Print the dashboard counters
    Stats,
    /// Show bookings that intersect a date range for one property
    Availability {
        property: u64,
        /// YYYY-MM-DD
        start: String,
        /// YYYY-MM-DD
        end: String,
    },
    /// List Google calendars, or bind one to a property
    Calendars {
        #[arg(long, requires = "calendar")]
        property: Option<u64>,
        #[arg(long)]
        calendar: Option<String>,
        /// Print the Google consent URL instead
        #[arg(long, conflicts_with_all = ["property", "calendar"])]
        connect: bool,
    },
    /// Practice German pronunciation
    Trainer {
        /// Where to write the sentence audio
        #[arg(short, long, default_value = "sentence.wav")]
        out: PathBuf,
        /// Recording of your attempt, read after you press Enter
        #[arg(short, long, default_value = "attempt.wav")]
        attempt: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Locations,
    Properties,
    Customers,
    Bookings,
    Tasks,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Ascend,
    Descend,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Ascend => SortOrder::Ascend,
            Order::Descend => SortOrder::Descend,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.observability);
    tracing::debug!(base_url = %config.api.base_url, "Starting dashboard CLI");

    let session = Arc::new(match &cli.token {
        Some(token) => Session::with_token(token.clone()),
        None => Session::new(),
    });
    let ctx = AppContext::new(
        config,
        Collaborators {
            notifier: Arc::new(ConsoleNotifier),
            navigator: Arc::new(ConsoleNavigator),
            progress: Arc::new(LogProgress),
        },
    )
    .with_session(session);
    let dashboard = Dashboard::new(ctx)?;

    match cli.command {
        Commands::Login { username, password } => {
            let response = dashboard.login(&Credentials { username, password }).await?;
            println!("{}", response.token);
        }
        Commands::Transcribe { file, language } => {
            let transcription = dashboard.transcribe_file(&file, language.as_deref()).await?;
            println!("{}", transcription.text);
        }
        Commands::Chat { message } => {
            let reply = dashboard.send_message(&message).await?;
            println!("{}", reply.ai_message.content);
        }
        Commands::Speak { text, voice, out } => {
            let audio = dashboard.synthesize_speech(&text, voice.as_deref()).await?;
            tokio::fs::write(&out, &audio).await?;
            println!("Wrote {} bytes to {}", audio.len(), out.display());
        }
        Commands::List {
            resource,
            page,
            page_size,
            sort,
            order,
        } => {
            let mut table = TableState::default();
            table.set_page(page, page_size);
            table.set_sort(sort, order.map(SortOrder::from));
            list(&dashboard, resource, &table).await?;
        }
        Commands::Stats => {
            let stats = dashboard.stats().await?;
            println!("{}", serde_json::to_string(&stats)?);
        }
        Commands::Availability { property, start, end } => {
            let client = dashboard.client();
            let (start, end) = (start.as_str(), end.as_str());
            let availability = dashboard
                .handler()
                .handle_request(move || client.properties().availability(property, start, end))
                .await?;
            print_rows(&availability.booked)?;
        }
        Commands::Calendars {
            property,
            calendar,
            connect,
        } => {
            if connect {
                println!("{}", dashboard.google_auth_url().await?);
            } else if let (Some(property), Some(calendar)) = (property, calendar) {
                dashboard.bind_calendar(property, &calendar).await?;
            } else {
                for item in dashboard.google_calendars().await {
                    println!("{}\t{}", item.id, item.summary);
                }
            }
        }
        Commands::Trainer { out, attempt } => trainer(&dashboard, &out, &attempt).await?,
    }

    Ok(())
}

async fn list(
    dashboard: &Dashboard,
    resource: ResourceKind,
    table: &TableState,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = dashboard.client();
    let handler = dashboard.handler();

    match resource {
        ResourceKind::Locations => {
            let items = handler.handle_request(move || client.locations().list()).await?;
            print_rows(&table.paginate(&items))
        }
        ResourceKind::Properties => {
            let items = handler.handle_request(move || client.properties().list()).await?;
            print_rows(&table.paginate(&items))
        }
        ResourceKind::Customers => {
            let items = handler.handle_request(move || client.customers().list()).await?;
            print_rows(&table.paginate(&items))
        }
        ResourceKind::Bookings => {
            let items = handler.handle_request(move || client.bookings().list()).await?;
            print_rows(&table.paginate(&items))
        }
        ResourceKind::Tasks => {
            let items = handler.handle_request(move || client.tasks().list()).await?;
            print_rows(&table.paginate(&items))
        }
    }
}

async fn trainer(dashboard: &Dashboard, out: &Path, attempt: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dashboard.open_feature(Feature::Trainer).is_err() {
        return Ok(());
    }
    let sentence = dashboard.generate_sentence().await?;
    println!("{}", sentence);

    let audio = dashboard.play_sentence().await?;
    tokio::fs::write(out, &audio).await?;
    println!("Wrote the sentence audio to {}", out.display());

    println!("Record your attempt to {} and press Enter", attempt.display());
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    let mut recorder = BufferedRecorder::new();
    recorder.start()?;
    recorder.on_data(&tokio::fs::read(attempt).await?);
    recorder.stop();

    let feedback = dashboard.analyze_pronunciation(&mut recorder).await?;
    match feedback.score {
        Some(score) => println!("Score: {}/100", score),
        None => println!("{}", feedback.raw),
    }
    if !feedback.feedback.is_empty() {
        println!("Feedback: {}", feedback.feedback);
    }
    if !feedback.tips.is_empty() {
        println!("Tips: {}", feedback.tips);
    }
    Ok(())
}

fn print_rows<T: Serialize>(rows: &[T]) -> Result<(), Box<dyn std::error::Error>> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
