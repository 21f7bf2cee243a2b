use asm_app::{AppError, AppResult, Calculation};
use asm_machine::resolve_synchronous_speed;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "asm-cli")]
#[command(about = "Induction motor re-rating tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-rate the machine of a case file to its operating point
    Calculate {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
        /// Print the full report instead of the calculation steps
        #[arg(long)]
        full: bool,
        /// Write the full report to a text file
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the result records as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the sampled torque and current curves as CSV
        #[arg(long)]
        curves: Option<PathBuf>,
    },
    /// Check a case file and list every problem in it
    Validate {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// Resolve pole count and synchronous speed
    Poles {
        /// Nominal speed (rpm)
        #[arg(long)]
        speed: f64,
        /// Supply frequency (Hz)
        #[arg(long, default_value_t = 50.0)]
        frequency: f64,
    },
    /// Write a starter case file
    Template {
        /// Output path (.yaml or .json)
        output: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            case_path,
            full,
            report,
            json,
            curves,
        } => cmd_calculate(
            &case_path,
            full,
            report.as_deref(),
            json.as_deref(),
            curves.as_deref(),
        ),
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Poles { speed, frequency } => cmd_poles(speed, frequency),
        Commands::Template { output } => cmd_template(&output),
    }
}

fn cmd_calculate(
    case_path: &Path,
    full: bool,
    report: Option<&Path>,
    json: Option<&Path>,
    curves: Option<&Path>,
) -> AppResult<()> {
    let case = asm_app::load_case(case_path)?;
    let calc = asm_app::calculate_case(&case)?;

    if full {
        println!("{}", calc.report.full);
    } else {
        print_summary(&calc);
    }

    for failure in calc.curves.failures() {
        warn!("{failure}");
        println!("⚠ Curves not available: {failure}");
    }

    if let Some(path) = report {
        write_file(path, &calc.report.full)?;
        println!("✓ Report written to {}", path.display());
    }
    if let Some(path) = json {
        write_file(path, &calc.records_json()?)?;
        println!("✓ Result records written to {}", path.display());
    }
    if let Some(path) = curves {
        write_file(path, &calc.curves.to_csv())?;
        let points: usize = calc.curves.samples().iter().map(|(_, s)| s.len()).sum();
        println!("✓ Exported {} curve points to {}", points, path.display());
    }

    Ok(())
}

fn print_summary(calc: &Calculation) {
    if calc.audit.is_empty() {
        println!("Operating point equals the rating; nothing to re-rate.");
    } else {
        println!("{}", calc.report.abbreviated.trim_start());
    }

    println!("\n{}:", calc.operating.label);
    for field in calc.result.display_fields() {
        println!("  {:<28} {}", field.name, field.value.display());
    }
    if calc.operating.rotor.is_some() {
        for field in calc.rotor.display_fields() {
            println!("  {:<28} {}", field.name, field.value.display());
        }
    }

    println!("\nPercentual changes:");
    println!("{}", calc.report.changes.render());
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let problems = asm_app::validate_case(case_path)?;

    if problems.is_empty() {
        println!("✓ Case is valid");
        return Ok(());
    }

    for problem in &problems {
        println!("  ✗ {}", problem);
    }
    Err(AppError::Validation(format!(
        "{} problem(s) in {}",
        problems.len(),
        case_path.display()
    )))
}

fn cmd_poles(speed: f64, frequency: f64) -> AppResult<()> {
    let sync = resolve_synchronous_speed(speed, frequency)?;
    println!(
        "{} poles, synchronous speed {:.0} rpm (slip {:.2} %)",
        sync.poles,
        sync.speed_rpm,
        sync.slip(speed) * 100.0
    );
    Ok(())
}

fn cmd_template(output: &Path) -> AppResult<()> {
    asm_app::write_template(output)?;
    println!("✓ Template written to {}", output.display());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
