//! DriveFlow CLI
//!
//! Usage:
//!   driveflow render --data <JSON> --reservation <KEY> --kind <CATEGORY>
//!   driveflow quote --data <JSON> --reservation <KEY>
//!   driveflow penalties --data <JSON> --reservation <KEY> --returned-at <DATETIME>
//!   driveflow template --kind <CATEGORY> [--format json|toml]
//!   driveflow check --template <FILE>
//!   driveflow placeholders
//!
//! Logs go to stderr; set RUST_LOG or pass --verbose for more detail.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use driveflow::billing::{assess, ReturnReading};
use driveflow::records::dates::parse_datetime;
use driveflow::records::FuelLevel;
use driveflow::template::{default_template, Placeholder};
use driveflow::{
    lint, parse_text, render_with_lint, AgencyConfig, Category, Dataset, DocumentRequest,
    DocumentTemplate, PrintConfig, Quote, RenderConfig, RenderError, Stylesheet,
};

#[derive(Parser)]
#[command(name = "driveflow", version)]
#[command(about = "Print rental documents from reservation data")]
struct Cli {
    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document as printable HTML
    Render {
        /// Dataset JSON file (collections or backup envelope)
        #[arg(short, long)]
        data: PathBuf,
        /// Reservation id or number
        #[arg(short, long)]
        reservation: String,
        /// Document category (devis, contrat, versement, facture, checkin, checkout)
        #[arg(short, long)]
        kind: Category,
        /// Template file (JSON or TOML) used instead of the saved one
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Inspection to report on
        #[arg(long)]
        inspection: Option<String>,
        /// Agency configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Stylesheet file for color palette (TOML format)
        #[arg(short, long)]
        stylesheet: Option<PathBuf>,
        /// Write HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not open the print dialog on load
        #[arg(long)]
        no_print: bool,
    },
    /// Print the invoice breakdown of a reservation
    Quote {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        reservation: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Assess return penalties for a reservation
    Penalties {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        reservation: String,
        /// Actual return time (e.g. 2024-05-04T12:30)
        #[arg(long, value_parser = parse_return_time)]
        returned_at: chrono::NaiveDateTime,
        /// Odometer reading at return
        #[arg(long)]
        mileage: Option<u32>,
        /// Fuel level at return (vide, 1/8, 1/4, 1/2, 3/4, plein)
        #[arg(long)]
        fuel: Option<FuelLevel>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the built-in template of a category
    Template {
        #[arg(short, long)]
        kind: Category,
        #[arg(short, long, value_enum, default_value_t = TemplateFormat::Json)]
        format: TemplateFormat,
        /// Locale of the layout (fr, ar)
        #[arg(long, default_value = "fr")]
        locale: driveflow::Locale,
    },
    /// Parse every element of a template and report defects
    Check {
        #[arg(short, long)]
        template: PathBuf,
    },
    /// List supported placeholders
    Placeholders,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateFormat {
    Json,
    Toml,
}

fn parse_return_time(value: &str) -> Result<chrono::NaiveDateTime, String> {
    parse_datetime(value).ok_or_else(|| format!("invalid date-time '{}'", value))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();
}

fn load_agency(path: Option<&Path>) -> Result<AgencyConfig, RenderError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading agency configuration");
            Ok(AgencyConfig::from_file(path)?)
        }
        None => Ok(AgencyConfig::default()),
    }
}

fn run(command: Commands) -> Result<(), RenderError> {
    match command {
        Commands::Render {
            data,
            reservation,
            kind,
            template,
            inspection,
            config,
            stylesheet,
            output,
            no_print,
        } => {
            let dataset = Dataset::from_file(&data)?;
            let agency = load_agency(config.as_deref())?;
            let stylesheet = match &stylesheet {
                Some(path) => Stylesheet::from_file(path)?,
                None => Stylesheet::default(),
            };

            let mut print = PrintConfig::default().with_auto_print(!no_print);
            if let Some(dir) = config.as_deref().and_then(Path::parent) {
                print = print.with_asset_dir(dir);
            }

            let mut request = DocumentRequest::new(reservation, kind);
            if let Some(path) = &template {
                request = request.with_template(DocumentTemplate::from_file(path)?);
            }
            if let Some(id) = inspection {
                request = request.with_inspection(id);
            }

            let render_config = RenderConfig::new()
                .with_agency(agency)
                .with_print(print)
                .with_stylesheet(stylesheet);
            let (html, warnings) = render_with_lint(&dataset, &request, &render_config)?;
            if !warnings.is_empty() {
                eprintln!("{} template warning(s); run `driveflow check` for details", warnings.len());
            }

            match output {
                Some(path) => {
                    fs::write(&path, html)?;
                    info!(path = %path.display(), "document written");
                }
                None => println!("{}", html),
            }
        }
        Commands::Quote {
            data,
            reservation,
            config,
            json,
        } => {
            let dataset = Dataset::from_file(&data)?;
            let agency = load_agency(config.as_deref())?;
            let res = dataset.reservation(&reservation)?;
            let vehicle = dataset.vehicle(&res.vehicle_id)?;
            let quote = Quote::for_reservation(res, vehicle, agency.document.tva_rate);

            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
                return Ok(());
            }

            let locale = agency.document.locale;
            let currency = &agency.document.currency;
            println!("{} ({})", res.reservation_number, vehicle.display_name());
            for line in quote.lines(&vehicle.display_name(), &res.options) {
                let qty = line.quantity.map(|q| format!("x{}", q)).unwrap_or_default();
                println!(
                    "  {:<32} {:>4} {:>14} {}",
                    line.label,
                    qty,
                    locale.format_amount(line.amount),
                    currency
                );
            }
            println!("  {:<32} {:>4} {:>14} {}", "Total", "", locale.format_amount(quote.final_total), currency);
            println!("  {:<32} {:>4} {:>14} {}", "Versé", "", locale.format_amount(quote.paid), currency);
            println!("  {:<32} {:>4} {:>14} {}", "Reste", "", locale.format_amount(quote.rest), currency);
        }
        Commands::Penalties {
            data,
            reservation,
            returned_at,
            mileage,
            fuel,
            config,
            json,
        } => {
            let dataset = Dataset::from_file(&data)?;
            let agency = load_agency(config.as_deref())?;
            let res = dataset.reservation(&reservation)?;
            let vehicle = dataset.vehicle(&res.vehicle_id)?;
            let reading = ReturnReading {
                returned_at,
                mileage,
                fuel,
            };
            let breakdown = assess(res, vehicle, &agency.return_policy(), &reading);

            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
                return Ok(());
            }

            let amount = |v: f64| format!("{} {}", agency.document.locale.format_amount(v), agency.document.currency);
            println!("Retard: {} min -> {}", breakdown.late_minutes, amount(breakdown.late_fee));
            match breakdown.allowance_km {
                Some(allowance) => println!(
                    "Kilométrage: {} km (forfait {} km, excédent {} km) -> {}",
                    breakdown.distance_km,
                    allowance,
                    breakdown.excess_km,
                    amount(breakdown.mileage_fee)
                ),
                None => println!("Kilométrage: {} km (illimité)", breakdown.distance_km),
            }
            println!(
                "Carburant: {} huitième(s) manquant(s) -> {}",
                breakdown.missing_eighths,
                amount(breakdown.fuel_fee)
            );
            println!("Total pénalités: {}", amount(breakdown.total));
        }
        Commands::Template {
            kind,
            format,
            locale,
        } => {
            let template = default_template(kind, locale);
            let text = match format {
                TemplateFormat::Json => template.to_json()?,
                TemplateFormat::Toml => template.to_toml()?,
            };
            println!("{}", text);
        }
        Commands::Check { template } => {
            let tpl = DocumentTemplate::from_file(&template)?;
            let filename = template.display().to_string();

            for elem in tpl.elements.iter().filter(|e| e.has_text()) {
                if let Err(errors) = parse_text(&elem.content) {
                    for err in errors {
                        eprintln!("{}", err.format(&elem.content, &format!("{}#{}", filename, elem.id)));
                    }
                }
            }

            let warnings = lint::check(&tpl);
            for warning in &warnings {
                println!("warning{}", warning);
            }
            println!(
                "{}: {} element(s), {} page(s), {} warning(s)",
                tpl.display_name(),
                tpl.elements.len(),
                tpl.page_count(),
                warnings.len()
            );
        }
        Commands::Placeholders => {
            for placeholder in Placeholder::ALL {
                println!("{{{{{}}}}}  {}", placeholder.name(), placeholder.description());
            }
        }
    }
    Ok(())
}
