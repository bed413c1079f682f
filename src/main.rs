use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use delivery_collage::capture::{Capture, CaptureError, FileCapture, choose_device};
use delivery_collage::location::FixedLocator;
use delivery_collage::output::{self, StopOutcome};
use delivery_collage::types::Coordinates;
use delivery_collage::workflow::{Workflow, save_document, save_report_image};
use delivery_collage::{config, plan};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "delivery-collage")]
#[command(about = "Photo collages and PDF reports for delivery stops")]
#[command(long_about = "\
Photo collages and PDF reports for delivery stops

Each stop's photos are laid out two per row on a 1200x900 canvas, with a
caption band for the stop id, capture time and location, and an optional
PNG watermark. A day of stops is exported as one paginated PDF.

Session plan (TOML, or JSON when the file ends in .json):

  watermark = \"logo.png\"            # optional
  include_metadata = true

  [[stops]]
  id = \"Cliente 12\"                 # optional, \"Stop N\" otherwise
  label = \"Dock 4\"
  captured_at = \"2026-03-07T09:05:00\"
  location = { latitude = -33.4489, longitude = -70.6693, address = \"Av. Providencia 1234\" }
  photos = [\"stop1/front.jpg\", \"stop1/parcel.jpg\"]

Run 'delivery-collage gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (stock defaults when missing)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Directory for report images and the exported document
    #[arg(long, default_value = "out", global = true)]
    output: PathBuf,

    /// Session password (only needed when auth.secret is configured)
    #[arg(long, default_value = "", global = true)]
    password: String,

    /// Leave the caption band empty
    #[arg(long, global = true)]
    no_metadata: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Photos in grid order; the first one's metadata goes in the caption
    #[arg(required = true)]
    photos: Vec<PathBuf>,

    /// Report id (default: "Stop 1")
    #[arg(long)]
    id: Option<String>,

    /// Stop label shown in the caption
    #[arg(long, default_value = "")]
    label: String,

    /// PNG overlaid on the photo area
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Latitude of the stop
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the stop
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Street address for the caption (needs --lat/--lon)
    #[arg(long, requires = "lat")]
    address: Option<String>,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Session plan file
    plan: PathBuf,

    /// Also save every stop's collage as a JPEG
    #[arg(long)]
    save_stops: bool,

    /// Preferred capture device id
    #[arg(long)]
    camera: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Compose one report image from photo files
    Compose(ComposeArgs),
    /// Replay a session plan and export the day's PDF
    Run(RunArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Compose(args) => compose(&cli, args)?,
        Command::Run(args) => run(&cli, args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn compose(cli: &Cli, args: &ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.config)?;
    let mut workflow = Workflow::from_config(&config)?;
    workflow.start_session(&cli.password)?;
    workflow.set_include_metadata(!cli.no_metadata);
    if let Some(path) = &args.watermark {
        workflow.load_watermark(path)?;
    }

    let coordinates = args.lat.zip(args.lon).map(|(lat, lon)| Coordinates::new(lat, lon));
    let mut locator = FixedLocator::new(coordinates, args.address.clone());
    let mut camera = FileCapture::new(args.photos.iter().cloned());
    camera.start(None)?;
    let captured_at = now();
    for _ in &args.photos {
        workflow.capture_photo(&mut camera, &mut locator, &args.label, captured_at)?;
    }
    camera.stop();

    let photo_count = workflow.photo_count();
    let report = workflow.save_stop(args.id.as_deref())?;
    let path = save_report_image(&report, &cli.output)?;
    output::print_compose_output(&report, photo_count, &path);
    Ok(())
}

fn run(cli: &Cli, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.config)?;
    let plan = plan::load_plan(&args.plan)?;
    let mut workflow = Workflow::from_config(&config)?;
    workflow.start_session(&cli.password)?;
    workflow.set_include_metadata(plan.include_metadata && !cli.no_metadata);
    if let Some(path) = &plan.watermark {
        workflow.load_watermark(path)?;
    }

    let mut camera = FileCapture::new(Vec::new());
    let devices = camera.list_devices()?;
    let device = choose_device(&devices, args.camera.as_deref()).ok_or(CaptureError::NotFound(None))?;
    camera.start(Some(&device.id))?;

    let mut stops = Vec::with_capacity(plan.stops.len());
    for stop in &plan.stops {
        camera.enqueue(stop.photos.iter().cloned());
        let mut locator = stop.locator();
        let captured_at = stop.captured_at.unwrap_or_else(now);
        for _ in &stop.photos {
            workflow.capture_photo(&mut camera, &mut locator, &stop.label, captured_at)?;
        }

        let photo_count = workflow.photo_count();
        let report = workflow.save_stop(stop.id.as_deref())?;
        let saved = if args.save_stops {
            Some(save_report_image(&report, &cli.output)?)
        } else {
            None
        };
        stops.push(StopOutcome {
            report,
            photo_count,
            saved,
        });
    }
    camera.stop();

    let document = workflow.close_session()?;
    let path = save_document(&document, &cli.output)?;
    output::print_run_output(&stops, &document, &path);
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
