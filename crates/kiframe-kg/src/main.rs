//! kiframe CLI: grow global information from a scenario file and project it
//! onto the interface nodes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use kiframe_kg::{
    GlobalInformation, GlobalKnowledge, KiConfig, NodeArena, NodeId, Scenario, Structure,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kiframe", version = env!("CARGO_PKG_VERSION"), about = "Federated knowledge growth over agent-local graphs")]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(short, long, default_value = "kiframe.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grow every interface node and print the grown structures and projection
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Serialize)]
struct Report<'a> {
    /// Agent name → published root.
    agents: &'a IndexMap<String, Option<NodeId>>,
    structures: &'a IndexMap<NodeId, Structure>,
    projection: &'a Structure,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = KiConfig::load(&cli.config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .init();

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml());
            Ok(())
        }
        Command::Run { scenario, json } => run(&config, &scenario, json),
    }
}

fn run(config: &KiConfig, path: &Path, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)?;
    let mut arena = NodeArena::new();

    let agents = scenario
        .build_agents(&mut arena)
        .context("building agents")?;
    let published: IndexMap<String, Option<NodeId>> = scenario
        .agents
        .iter()
        .zip(&agents)
        .map(|(spec, agent)| (spec.name.clone(), agent.root().cloned()))
        .collect();
    let mut global = GlobalInformation::with_config(
        &mut arena,
        scenario.interface_nodes(),
        agents,
        config.growth.clone(),
    )?;
    global.grow(&mut arena).context("growing global information")?;

    let mut knowledge = GlobalKnowledge::new(&mut arena, scenario.interface_nodes())?;
    knowledge.add_edges(&global)?;

    if json {
        let report = Report {
            agents: &published,
            structures: global.structures(),
            projection: knowledge.structure(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Agents ===");
    for (name, root) in &published {
        match root {
            Some(root) => println!("{}: root {}", name, root),
            None => println!("{}: no root", name),
        }
    }

    println!("\n=== Grown structures ===");
    for (seed, structure) in global.structures() {
        println!("{}: {}", seed, structure);
    }
    for id in global.init_nodes() {
        if !global.structures().contains_key(id) {
            if let Some(owner) = global.structure_for(id).and_then(Structure::root) {
                println!("{}: grown in {}", id, owner);
            }
        }
    }

    println!("\n=== Interface projection ===");
    println!("{}", knowledge.structure());
    Ok(())
}
