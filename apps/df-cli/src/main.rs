use clap::{Parser, Subcommand};
use df_fluids::FluidState;
use df_solver::{
    DataDrivenFluid, FluidSettings, InputPair, SolveReport, SolverResult, SweepDefinition,
    SweepSpacing, sweep_second,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "df-cli")]
#[command(about = "Data-driven fluid CLI - evaluate states from an entropy surrogate", long_about = None)]
struct Cli {
    /// Fluid settings YAML (defaults to ideal-gas air)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one state from an input pair (rhoe, pt, prho, rhot, hs, ps)
    Eval {
        pair: InputPair,
        #[arg(allow_negative_numbers = true)]
        first: f64,
        #[arg(allow_negative_numbers = true)]
        second: f64,
    },
    /// Sweep the second input with the first held fixed
    Sweep {
        pair: InputPair,
        /// Fixed first input
        #[arg(long, allow_negative_numbers = true)]
        first: f64,
        #[arg(long, allow_negative_numbers = true)]
        start: f64,
        #[arg(long, allow_negative_numbers = true)]
        end: f64,
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Logarithmic spacing
        #[arg(long)]
        log: bool,
    },
    /// Print the default settings as YAML
    Settings,
}

fn main() -> SolverResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Eval {
            pair,
            first,
            second,
        } => cmd_eval(&settings, pair, first, second),
        Commands::Sweep {
            pair,
            first,
            start,
            end,
            points,
            log,
        } => {
            let spacing = if log {
                SweepSpacing::Logarithmic
            } else {
                SweepSpacing::Linear
            };
            let sweep = SweepDefinition::new(start, end, points, spacing)?;
            cmd_sweep(&settings, pair, first, &sweep)
        }
        Commands::Settings => {
            print!("{}", settings.to_yaml_string()?);
            Ok(())
        }
    }
}

fn load_settings(path: Option<&Path>) -> SolverResult<FluidSettings> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading fluid settings");
            FluidSettings::load_yaml(path)
        }
        None => Ok(FluidSettings::ideal_air()),
    }
}

fn cmd_eval(settings: &FluidSettings, pair: InputPair, first: f64, second: f64) -> SolverResult<()> {
    let mut fluid: DataDrivenFluid = settings.build()?;
    println!(
        "Backend: {} | {} = {}, {} = {}",
        fluid.backend_name(),
        pair.first_label(),
        first,
        pair.second_label(),
        second
    );

    info!(%pair, first, second, backend = fluid.backend_name(), "evaluating state");
    let report = fluid.solve(pair, first, second)?;
    print_report(&report);
    print_state(fluid.state());
    Ok(())
}

fn cmd_sweep(
    settings: &FluidSettings,
    pair: InputPair,
    first: f64,
    sweep: &SweepDefinition,
) -> SolverResult<()> {
    let fluid = settings.build()?;
    println!(
        "Backend: {} | {} = {} | {}",
        fluid.backend_name(),
        pair.first_label(),
        first,
        sweep
    );

    info!(%pair, first, points = sweep.num_points, "running sweep");
    let result = sweep_second(&fluid, pair, first, sweep);
    println!(
        "{:>14} {:>14} {:>12} {:>14} {:>14} {:>10} {:>6}",
        "input", "P [Pa]", "T [K]", "rho [kg/m3]", "e [J/kg]", "a [m/s]", "iters"
    );
    for (&(_, second), outcome) in result.targets.iter().zip(&result.outcomes) {
        match outcome {
            Ok(point) => {
                let s = &point.state;
                let a = s
                    .speed_of_sound()
                    .map(|a| format!("{a:.2}"))
                    .unwrap_or_else(|| "n/a".to_string());
                let flag = if point.report.converged() { "" } else { " *" };
                println!(
                    "{:>14.6e} {:>14.6e} {:>12.4} {:>14.6e} {:>14.6e} {:>10} {:>6}{}",
                    second,
                    s.pressure(),
                    s.temperature(),
                    s.density(),
                    s.energy(),
                    a,
                    point.report.iterations,
                    flag
                );
            }
            Err(err) => println!("{:>14.6e} failed: {}", second, err),
        }
    }
    println!(
        "{} of {} points solved, {} converged",
        result.num_successful(),
        result.targets.len(),
        result.num_converged()
    );
    Ok(())
}

fn print_report(report: &SolveReport) {
    if !report.pair.is_iterative() {
        println!("✓ {} set directly", report.pair);
    } else if report.converged() {
        println!(
            "✓ {} converged in {} iterations",
            report.pair, report.iterations
        );
    } else {
        println!(
            "⚠ {} stopped after {} iterations (max scaled residual {:.3e})",
            report.pair, report.iterations, report.max_scaled_residual
        );
    }
}

fn print_state(state: &FluidState) {
    println!("  {}", state.property_pack().summary());
    println!("  e = {:.6e} J/kg", state.energy());
    println!("  R = {:.4} J/(kg·K), γ-1 = {:.6}", state.gas_constant(), state.gamma_minus_one());
    if state.is_extrapolated() {
        println!("  (surrogate extrapolated outside its data range)");
    }
}
