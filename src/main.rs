//! Limb Match - Entry Point
//!
//! Acts as the input source for the limb tools: loads a JSON scene, runs
//! one capture or match request against it and writes the scene back.

use clap::{Parser, Subcommand};
use limb_match::command::CommandExecutor;
use limb_match::core::config::{MatchConfig, StoreBackend};
use limb_match::core::error::Result;
use limb_match::matcher::MatchOutcome;
use limb_match::record::FIELD_COUNT;
use limb_match::scene::InMemoryScene;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Capture IK/FK limb mappings and snap limbs between IK and FK
#[derive(Parser, Debug)]
#[command(name = "limb-match")]
#[command(about = "Capture IK/FK limb mappings and match limbs between modes")]
struct Args {
    /// Scene file (JSON) to read and, for mutating commands, write back
    #[arg(long, short = 's')]
    scene: PathBuf,

    /// TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the record directory of the file store
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Store strategy: file or scene
    #[arg(long)]
    backend: Option<StoreBackend>,

    /// Mode-detection tolerance (0 = exact)
    #[arg(long)]
    tolerance: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a limb from fourteen fields: root, blend attr, 3 IK joints,
    /// 3 IK controls, 3 FK joints, 3 FK controls
    Capture {
        #[arg(num_args = FIELD_COUNT, value_names = ["ROOT", "BLEND_ATTR", "IK_J1", "IK_J2", "IK_J3", "IK_C1", "IK_C2", "IK_C3", "FK_J1", "FK_J2", "FK_J3", "FK_C1", "FK_C2", "FK_C3"])]
        fields: Vec<String>,
    },
    /// List recorded limbs
    List,
    /// Print a recorded limb as JSON
    Show { limb_id: String },
    /// Switch a recorded limb between IK and FK, keeping its pose
    Match { limb_id: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("limb_match=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(tolerance) = args.tolerance {
        config.blend_tolerance = tolerance;
    }

    let scene = InMemoryScene::load(&args.scene)?;
    tracing::debug!(scene = %args.scene.display(), ?config, "loaded scene");
    let mut executor = CommandExecutor::new(scene, config)?;

    let dirty = match args.command {
        Command::Capture { fields } => {
            let outcome = executor.capture(fields)?;
            if outcome.replaced {
                println!("Updated limb record '{}'", outcome.limb_id);
            } else {
                println!("Saved limb record '{}'", outcome.limb_id);
            }
            executor.config().backend == StoreBackend::Scene
        }
        Command::List => {
            for limb_id in executor.list_limbs()? {
                println!("{}", limb_id);
            }
            false
        }
        Command::Show { limb_id } => {
            let record = executor.show(&limb_id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            false
        }
        Command::Match { limb_id } => match executor.match_limb(&limb_id)? {
            MatchOutcome::IkToFk => {
                println!("{}: IK -> FK", limb_id);
                true
            }
            MatchOutcome::FkToIk => {
                println!("{}: FK -> IK", limb_id);
                true
            }
            MatchOutcome::Skipped { current } => {
                println!("{}: blend value {} is between IK and FK, nothing to do", limb_id, current);
                false
            }
        },
    };

    if dirty {
        executor.into_scene().save(&args.scene)?;
    }
    Ok(())
}
