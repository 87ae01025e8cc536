use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use disaster_whisperer::api::{AppState, alert_status};
use disaster_whisperer::{
    Language, MapView, Report, ReportPipeline, SessionState, Severity, Submission, UiText,
    VERSION, WhisperConfig, logging, web,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "disaster-whisperer")]
#[command(about = "Disaster Whisperer - live maps, multilingual safety advice and SMS alerts", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// UI and advice language: English, Hindi or Telugu
    #[arg(long, global = true)]
    language: Option<Language>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report a situation: locate it, generate advice and alert contacts
    Report {
        /// City, pincode or landmark, e.g. "Hyderabad" or "500001"
        #[arg(long)]
        place: String,

        /// Low, Moderate, High or Extreme
        #[arg(long, default_value = "Low")]
        severity: Severity,

        /// Describe the situation
        #[arg(long)]
        description: String,
    },

    /// Serve the HTTP API for one interactive session
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Print the UI text of the active language as JSON
    UiText,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = WhisperConfig::load_from_path(cli.config)?;
    if let Some(language) = cli.language {
        config.ui.language = language;
    }
    logging::init(&config.logging, cli.verbose)?;
    info!("Disaster Whisperer v{} starting", VERSION);

    match cli.command {
        Commands::Report {
            place,
            severity,
            description,
        } => {
            let pipeline = ReportPipeline::from_config(&config)?;
            let mut session = SessionState::new();
            let report = Report::new(place, severity, description);

            match pipeline.submit(&mut session, &report).await {
                Ok(submission) => {
                    print_submission(&report, &submission, &session, config.ui.language.ui_text());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("❌ {}", e.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Serve { port } => {
            let pipeline = ReportPipeline::from_config(&config)?;
            web::run(AppState::new(pipeline), port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::UiText => {
            println!(
                "{}",
                serde_json::to_string_pretty(config.ui.language.ui_text())?
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_submission(
    report: &Report,
    submission: &Submission,
    session: &SessionState,
    text: &UiText,
) {
    let location = &submission.location;
    println!(
        "📍 {} ({:.4}, {:.4})",
        location.address, location.latitude, location.longitude
    );
    println!(
        "{}: {}",
        text.severity_label,
        text.severity_name(report.severity)
    );
    if let Some(weather) = &submission.weather {
        println!("🌡 Temp {}", weather.format_temperature());
    }

    for outcome in &submission.dispatch.outcomes {
        match (&outcome.provider_message_id, &outcome.error) {
            (Some(sid), _) => println!("✅ SMS sent to {} (SID: {})", outcome.recipient, sid),
            (None, Some(err)) => println!("❌ Error sending to {}: {}", outcome.recipient, err),
            (None, None) => println!("❌ Error sending to {}", outcome.recipient),
        }
    }
    println!("{}", alert_status(submission, text));

    if let Some(advice) = session.advice() {
        println!();
        println!("## {}", text.persistent_title);
        println!("### {}", text.advice_header);
        println!("{advice}");
        if let Some(time) = session.formatted_time() {
            println!("⏱ {time}");
        }
    }

    if let Some(map) = MapView::from_session(session) {
        println!();
        println!("🗺  {} ({})", map.center.place, MapView::MARKER_TOOLTIP);
        println!("   {}", map.osm_url());
    }
}
