//! flowc compiler CLI

use clap::{Parser, Subcommand};
use flowc_engine::{IrEngine, SemanticProvider, StaticProvider};
use flowc_spec::{SemanticContext, WorkflowSpec};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "flowc")]
#[command(version = "0.1.0")]
#[command(about = "Workflow IR compiler and optimizer", long_about = None)]
struct Cli {
    /// Semantic context JSON file, used during compilation
    #[arg(long, global = true, value_name = "FILE")]
    context: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compiles a workflow file and prints the IR
    Compile {
        /// Workflow JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Compiles and optimizes a workflow, then prints the optimized IR
    Optimize {
        /// Workflow JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Optimization level (1-3)
        #[arg(short, long, default_value_t = 2)]
        level: u8,
    },

    /// Generates code for a target platform
    Emit {
        /// Workflow JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target platform (must be declared by the workflow)
        #[arg(short, long, default_value = "nodejs")]
        target: String,

        /// Optimization level applied before emitting (0 skips)
        #[arg(short, long, default_value_t = 0)]
        level: u8,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Prints complexity analysis for a compiled workflow
    Analyze {
        /// Workflow JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn load_spec(path: &PathBuf) -> Result<WorkflowSpec, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid workflow {}: {}", path.display(), e))
}

fn load_engine(context: &Option<PathBuf>) -> Result<IrEngine, String> {
    let provider: Arc<dyn SemanticProvider> = match context {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            let ctx: SemanticContext = serde_json::from_str(&text)
                .map_err(|e| format!("invalid context {}: {}", path.display(), e))?;
            Arc::new(StaticProvider::new(ctx))
        }
        None => Arc::new(flowc_engine::NullProvider),
    };
    Ok(IrEngine::with_provider(provider))
}

async fn run(cli: Cli) -> Result<(), String> {
    let engine = load_engine(&cli.context)?;

    match cli.command {
        Commands::Compile { input } => {
            let spec = load_spec(&input)?;
            let program = engine
                .compile_workflow(&spec)
                .await
                .map_err(|e| e.to_string())?;
            print!("{}", program);
        }
        Commands::Optimize { input, level } => {
            let spec = load_spec(&input)?;
            let program = engine
                .compile_workflow(&spec)
                .await
                .map_err(|e| e.to_string())?;
            let optimized = engine
                .optimize_program(&program.id, level)
                .await
                .map_err(|e| e.to_string())?;
            print!("{}", optimized);
        }
        Commands::Emit {
            input,
            target,
            level,
            output,
        } => {
            let spec = load_spec(&input)?;
            let mut program = engine
                .compile_workflow(&spec)
                .await
                .map_err(|e| e.to_string())?;
            if level > 0 {
                program = engine
                    .optimize_program(&program.id, level)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            let code = engine
                .generate_code(&program.id, &target)
                .await
                .map_err(|e| e.to_string())?;
            match output {
                Some(path) => {
                    fs::write(&path, &code.source)
                        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
                    eprintln!(
                        "wrote {} ({} bytes, checksum {})",
                        path.display(),
                        code.metadata.size,
                        code.metadata.checksum
                    );
                }
                None => print!("{}", code.source),
            }
        }
        Commands::Analyze { input } => {
            let spec = load_spec(&input)?;
            let program = engine
                .compile_workflow(&spec)
                .await
                .map_err(|e| e.to_string())?;
            let analysis = engine
                .analyze_complexity(&program.id)
                .await
                .map_err(|e| e.to_string())?;
            let rendered = serde_json::to_string_pretty(&analysis)
                .map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    flowc_engine::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
