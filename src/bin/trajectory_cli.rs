use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use trajectory_engine::{
    write_csv, DatasetGenerator, Direction, MissileParameters, OptimizationEngine, OutcomePredictor,
    OutputMetric, PhysicsEngine, PredictionEngine, ScenarioComparator, SensitivityAnalyzer,
    TrajectorySample,
};

#[derive(Parser)]
#[command(name = "trajectory")]
#[command(version = "0.1.0")]
#[command(about = "Ballistic trajectory simulator and surrogate predictor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Launch parameters shared by most subcommands.
#[derive(Args, Debug, Clone)]
struct ParamArgs {
    /// Initial velocity (m/s)
    #[arg(short = 'v', long, default_value = "800.0")]
    velocity: f64,

    /// Launch angle (degrees)
    #[arg(short = 'a', long, default_value = "45.0")]
    angle: f64,

    /// Mass (kg)
    #[arg(short = 'm', long, default_value = "500.0")]
    mass: f64,

    /// Drag coefficient
    #[arg(long, default_value = "0.4")]
    drag_coefficient: f64,

    /// Cross-sectional area (m²)
    #[arg(long, default_value = "0.2")]
    area: f64,

    /// Horizontal wind speed, positive down-range (m/s)
    #[arg(short = 'w', long, default_value = "0.0")]
    wind: f64,
}

impl ParamArgs {
    fn to_params(&self) -> MissileParameters {
        MissileParameters {
            initial_velocity: self.velocity,
            launch_angle: self.angle,
            mass: self.mass,
            drag_coefficient: self.drag_coefficient,
            cross_sectional_area: self.area,
            wind_speed: self.wind,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate one exact trajectory with the physics engine
    Simulate {
        #[command(flatten)]
        params: ParamArgs,

        /// Integration time step (seconds)
        #[arg(long, default_value = "0.01")]
        time_step: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Include all trajectory samples, not just the summary
        #[arg(long)]
        full: bool,
    },

    /// Infer outcome metrics from a trained model artifact
    Predict {
        #[command(flatten)]
        params: ParamArgs,

        /// Path to the model artifact (JSON bundle)
        #[arg(long)]
        model: PathBuf,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Search for the launch angle optimizing a metric
    Optimize {
        #[command(flatten)]
        params: ParamArgs,

        /// Path to the model artifact; omit to search on the exact engine
        #[arg(long)]
        model: Option<PathBuf>,

        /// Metric to optimize (range, height, time, impact-velocity, apogee)
        #[arg(long, default_value = "range")]
        metric: String,

        /// Minimize instead of maximize
        #[arg(long)]
        minimize: bool,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Finite-difference sensitivities of all metrics to each input
    Sensitivity {
        #[command(flatten)]
        params: ParamArgs,

        /// Path to the model artifact; omit to analyze the exact engine
        #[arg(long)]
        model: Option<PathBuf>,

        /// Relative perturbation step (fraction, not percent)
        #[arg(long, default_value = "0.02")]
        step: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Evaluate and rank a batch of scenarios from a JSON file
    Compare {
        /// JSON file holding an array of parameter sets
        #[arg(long)]
        scenarios: PathBuf,

        /// Path to the model artifact; omit to evaluate exactly
        #[arg(long)]
        model: Option<PathBuf>,

        /// Metric to rank by
        #[arg(long, default_value = "range")]
        metric: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Generate a physics-labeled training corpus as CSV
    Dataset {
        /// Number of samples
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,

        /// Corpus seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },

    /// Display engine information
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Either backend behind one dispatch point for the analysis commands.
enum Backend {
    Surrogate(PredictionEngine),
    Exact(PhysicsEngine),
}

impl Backend {
    fn open(model: Option<&PathBuf>) -> Result<Self> {
        match model {
            Some(path) => {
                let engine = PredictionEngine::from_file(path)
                    .with_context(|| format!("loading model artifact {}", path.display()))?;
                eprintln!(
                    "[trajectory] loaded model artifact version {}",
                    engine.artifact().model_version
                );
                Ok(Backend::Surrogate(engine))
            }
            None => Ok(Backend::Exact(PhysicsEngine::new())),
        }
    }
}

impl OutcomePredictor for Backend {
    fn predict_summary(
        &self,
        params: &MissileParameters,
    ) -> Result<trajectory_engine::TrajectorySummary, trajectory_engine::EngineError> {
        match self {
            Backend::Surrogate(engine) => engine.predict_summary(params),
            Backend::Exact(engine) => engine.predict_summary(params),
        }
    }
}

fn parse_metric(name: &str) -> Result<OutputMetric> {
    OutputMetric::parse(name)
        .with_context(|| format!("unknown metric `{name}` (try range, height, time, impact-velocity, apogee)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            params,
            time_step,
            output,
            full,
        } => {
            let params = params.to_params();
            params.validate()?;
            let mut engine = PhysicsEngine::new();
            engine.set_time_step(time_step)?;
            let (state, summary) = engine.simulate(&params)?;
            display_summary(&summary, output)?;
            if full {
                display_samples(&state.samples, output)?;
            }
        }

        Commands::Predict {
            params,
            model,
            output,
        } => {
            let params = params.to_params();
            params.validate()?;
            let engine = PredictionEngine::from_file(&model)
                .with_context(|| format!("loading model artifact {}", model.display()))?;
            let summary = engine.predict(&params)?;
            display_summary(&summary, output)?;
        }

        Commands::Optimize {
            params,
            model,
            metric,
            minimize,
            output,
        } => {
            let params = params.to_params();
            params.validate()?;
            let backend = Backend::open(model.as_ref())?;
            let metric = parse_metric(&metric)?;
            let direction = if minimize {
                Direction::Minimize
            } else {
                Direction::Maximize
            };
            let result =
                OptimizationEngine::new().optimize(&backend, &params, metric, direction)?;
            match output {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                _ => {
                    println!("OPTIMIZATION RESULT");
                    println!("  Metric:          {}", result.metric);
                    println!("  Direction:       {:?}", result.direction);
                    println!("  Optimal angle:   {:.2}°", result.optimal_angle_deg);
                    println!("  Evaluations:     {}", result.evaluations);
                    display_summary(&result.summary, OutputFormat::Table)?;
                }
            }
        }

        Commands::Sensitivity {
            params,
            model,
            step,
            output,
        } => {
            let params = params.to_params();
            params.validate()?;
            if step <= 0.0 || step >= 1.0 {
                bail!("relative step must be in (0, 1), got {step}");
            }
            let backend = Backend::open(model.as_ref())?;
            let result = SensitivityAnalyzer::with_step(step).analyze(&backend, &params)?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => {
                    println!("field,delta_used,asymmetric,metric,absolute_delta,elasticity");
                    for field in &result.fields {
                        for r in &field.responses {
                            println!(
                                "{},{:.6e},{},{},{:.6e},{:.6e}",
                                field.field,
                                field.absolute_delta_used,
                                field.asymmetric,
                                r.metric,
                                r.absolute_delta,
                                r.elasticity
                            );
                        }
                    }
                }
                OutputFormat::Table => {
                    println!("SENSITIVITY ANALYSIS (elasticity: % output per % input)");
                    print!("{:<22}", "field");
                    for metric in OutputMetric::ALL {
                        print!("{:>20}", metric.name());
                    }
                    println!();
                    for field in &result.fields {
                        print!("{:<22}", field.field);
                        for r in &field.responses {
                            print!("{:>20.4}", r.elasticity);
                        }
                        if field.asymmetric {
                            print!("  (one-sided)");
                        }
                        println!();
                    }
                }
            }
        }

        Commands::Compare {
            scenarios,
            model,
            metric,
            output,
        } => {
            let text = fs::read_to_string(&scenarios)
                .with_context(|| format!("reading scenario file {}", scenarios.display()))?;
            let list: Vec<MissileParameters> =
                serde_json::from_str(&text).context("parsing scenario file")?;
            if list.is_empty() {
                bail!("scenario file holds no scenarios");
            }
            let backend = Backend::open(model.as_ref())?;
            let metric = parse_metric(&metric)?;
            let comparison = ScenarioComparator::new(metric).compare(&backend, &list);
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
                _ => {
                    println!(
                        "SCENARIO COMPARISON ({} scenarios, ranked by {})",
                        comparison.outcomes.len(),
                        comparison.metric
                    );
                    for (rank, &index) in comparison.ranking.iter().enumerate() {
                        if let Some(summary) = &comparison.outcomes[index].summary {
                            println!(
                                "  #{:<3} scenario {:<3} {} = {:.3}",
                                rank + 1,
                                index,
                                comparison.metric,
                                summary.metric(comparison.metric)
                            );
                        }
                    }
                    for (index, outcome) in comparison.outcomes.iter().enumerate() {
                        if let Some(err) = &outcome.error {
                            println!("  !    scenario {index:<3} failed: {err}");
                        }
                    }
                }
            }
        }

        Commands::Dataset { samples, seed, out } => {
            eprintln!("[trajectory] generating {samples} labeled samples (seed {seed})");
            let corpus = DatasetGenerator::with_seed(seed).generate(samples)?;
            let mut file = fs::File::create(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            write_csv(&corpus, &mut file)?;
            eprintln!("[trajectory] wrote {} samples to {}", corpus.len(), out.display());
        }

        Commands::Info => {
            println!("╔══════════════════════════════════════════╗");
            println!("║        TRAJECTORY ENGINE v0.1.0          ║");
            println!("╠══════════════════════════════════════════╣");
            println!("║ Physics-based trajectory simulation      ║");
            println!("║ with ML surrogate prediction.            ║");
            println!("╠══════════════════════════════════════════╣");
            println!("║ Features:                                ║");
            println!("║ • RK4 integration, drag and wind         ║");
            println!("║ • Model-artifact inference               ║");
            println!("║ • Launch-angle optimization              ║");
            println!("║ • Sensitivity analysis                   ║");
            println!("║ • Scenario comparison                    ║");
            println!("║ • Training-corpus generation             ║");
            println!("╚══════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_summary(
    summary: &trajectory_engine::TrajectorySummary,
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Csv => {
            println!("max_height_km,max_range_km,time_of_flight_s,impact_velocity_m_s,apogee_time_s");
            println!(
                "{:.6},{:.6},{:.6},{:.6},{:.6}",
                summary.max_height_km,
                summary.max_range_km,
                summary.time_of_flight_s,
                summary.impact_velocity_m_s,
                summary.apogee_time_s
            );
        }
        OutputFormat::Table => {
            println!("TRAJECTORY SUMMARY");
            println!("  Max height:      {:.3} km", summary.max_height_km);
            println!("  Max range:       {:.3} km", summary.max_range_km);
            println!("  Time of flight:  {:.2} s", summary.time_of_flight_s);
            println!("  Impact velocity: {:.1} m/s", summary.impact_velocity_m_s);
            println!("  Apogee time:     {:.2} s", summary.apogee_time_s);
        }
    }
    Ok(())
}

fn display_samples(samples: &[TrajectorySample], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct Point {
                time: f64,
                x: f64,
                y: f64,
                vx: f64,
                vy: f64,
            }
            let points: Vec<Point> = samples
                .iter()
                .map(|s| Point {
                    time: s.time,
                    x: s.position.x,
                    y: s.position.y,
                    vx: s.velocity.x,
                    vy: s.velocity.y,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        _ => {
            println!("time_s,x_m,y_m,vx_mps,vy_mps");
            for s in samples {
                println!(
                    "{:.4},{:.3},{:.3},{:.3},{:.3}",
                    s.time, s.position.x, s.position.y, s.velocity.x, s.velocity.y
                );
            }
        }
    }
    Ok(())
}
