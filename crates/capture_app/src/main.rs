mod platform;

use std::path::PathBuf;

use clap::Parser;
use platform::devices::LocationMode;

#[derive(Parser, Debug)]
#[command(
    name = "capture",
    about = "Run the food donation capture workflow against synthetic devices",
    version
)]
struct Cli {
    /// Optional RON file with settings overrides
    #[arg(long, default_value = "capture.ron")]
    config: PathBuf,
    /// Simulate a denied camera permission
    #[arg(long)]
    deny_camera: bool,
    /// How the geolocation device behaves
    #[arg(long, value_enum, default_value_t = LocationMode::Granted)]
    location: LocationMode,
    /// Latitude reported when location is granted
    #[arg(long, default_value_t = 18.5204, allow_negative_numbers = true)]
    latitude: f64,
    /// Longitude reported when location is granted
    #[arg(long, default_value_t = 73.8567, allow_negative_numbers = true)]
    longitude: f64,
    /// Image file offered by the file picker
    #[arg(long)]
    photo: Option<PathBuf>,
    /// Take one shot, discard it, and shoot again before sending
    #[arg(long)]
    retake: bool,
    /// Make the first submission attempt fail
    #[arg(long)]
    fail_first: bool,
    /// Send without a location instead of an approximate one
    #[arg(long)]
    withhold_location: bool,
    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Also log to the terminal at debug level
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(capture_logging::DEFAULT_LOG_FILE));
    let (destination, level) = if cli.verbose {
        (
            capture_logging::LogDestination::Both(log_file),
            log::LevelFilter::Debug,
        )
    } else {
        (
            capture_logging::LogDestination::File(log_file),
            log::LevelFilter::Info,
        )
    };
    capture_logging::initialize(&destination, level);

    let mut settings = platform::config::load_settings(&cli.config)?;
    if cli.withhold_location {
        settings.fallback.policy = capture_engine::FallbackPolicy::Withhold;
    }

    platform::app::run_app(
        platform::app::RunOptions {
            deny_camera: cli.deny_camera,
            location: cli.location,
            position: capture_engine::Position {
                latitude: cli.latitude,
                longitude: cli.longitude,
            },
            photo: cli.photo,
            retake: cli.retake,
            fail_first: cli.fail_first,
        },
        settings,
    )
    .await
}
