use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tessera_blocks::{BlockRegistry, BlockTypeId, StateId, initialize_block_data};
use tessera_geom::Direction;

#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Inspect the block-state table")]
struct Args {
    /// Load this TOML block table instead of the built-in one
    #[arg(long, value_name = "PATH")]
    blocks: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the block and property labels of a state id
    Decode { state: StateId },
    /// Build a state id from a block name and prop=value pairs
    Encode {
        name: String,
        #[arg(value_name = "PROP=VALUE")]
        props: Vec<String>,
    },
    /// Print the default state of a block
    Default { name: String },
    /// Print the collision model and full faces of a block
    Faces { name: String },
    /// Table totals
    Stats,
    /// Decode and re-encode every state
    Check,
}

fn block_id(reg: &BlockRegistry, name: &str) -> Result<BlockTypeId, Box<dyn Error>> {
    reg.id_by_name(name)
        .ok_or_else(|| format!("unknown block '{name}'").into())
}

fn describe(reg: &BlockRegistry, state: StateId) -> Result<String, Box<dyn Error>> {
    let ty = reg
        .block_type_of(state)
        .ok_or_else(|| format!("state {state} is not assigned"))?;
    let loc = reg.resource_location(ty).unwrap_or_default();
    let labels = reg.state_labels(state).unwrap_or_default();
    if labels.is_empty() {
        return Ok(format!("{state} {loc}"));
    }
    let props: Vec<String> = labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
    Ok(format!("{state} {loc}[{}]", props.join(",")))
}

fn parse_pair(s: &str) -> Result<(&str, &str), Box<dyn Error>> {
    s.split_once('=')
        .ok_or_else(|| format!("expected PROP=VALUE, got '{s}'").into())
}

fn run(reg: &BlockRegistry, cmd: Command) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Decode { state } => {
            println!("{}", describe(reg, state)?);
        }
        Command::Encode { name, props } => {
            let ty = block_id(reg, &name)?;
            let pairs = props
                .iter()
                .map(|p| parse_pair(p))
                .collect::<Result<Vec<_>, _>>()?;
            let state = reg.state_from_labels(ty, &pairs)?;
            println!("{}", describe(reg, state)?);
        }
        Command::Default { name } => {
            let ty = block_id(reg, &name)?;
            let state = reg
                .default_state(ty)
                .ok_or_else(|| format!("block '{name}' has no states"))?;
            println!("{}", describe(reg, state)?);
        }
        Command::Faces { name } => {
            let ty = block_id(reg, &name)?;
            let state = reg
                .default_state(ty)
                .ok_or_else(|| format!("block '{name}' has no states"))?;
            let Some(model) = reg.collision_model(state) else {
                println!("{name}: no collision model");
                return Ok(());
            };
            let full: Vec<String> = Direction::ALL
                .iter()
                .filter(|&&d| model.is_face_full(d))
                .map(|d| format!("{d:?}").to_lowercase())
                .collect();
            println!(
                "{name}: model '{}', {} boxes, full faces [{}]",
                model.name,
                model.boxes.len(),
                full.join(",")
            );
        }
        Command::Stats => {
            println!("namespace  {}", reg.namespace);
            println!("types      {}", reg.block_count());
            println!("states     {}", reg.total_state_count());
            println!("models     {}", reg.models.len());
            println!("groups     {}", reg.groups.len());
        }
        Command::Check => {
            let mut bad = 0usize;
            for s in 0..reg.total_state_count() {
                let s = s as StateId;
                let ok = reg.decode(s).map(|info| reg.encode(&info) == Ok(s));
                if ok != Some(true) {
                    log::warn!("state {s} does not round trip");
                    bad += 1;
                }
            }
            if bad > 0 {
                return Err(format!("{bad} states failed the round trip").into());
            }
            println!("{} states round trip", reg.total_state_count());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let reg = match &args.blocks {
        Some(path) => match BlockRegistry::load_from_path(path) {
            Ok(reg) => reg,
            Err(e) => {
                log::error!("failed to load {:?}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => initialize_block_data(),
    };

    if let Err(e) = run(&reg, args.cmd) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
