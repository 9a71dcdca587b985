//! CLI for swarm-manager
//!
//! Subcommands:
//! - `demo`: walk through serving and requesting two keys, printing the
//!   swarm's view after each step
//! - `chaos`: fire interleaved serve/unserve/request/unrequest calls at one
//!   key and report where the swarm settles

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures::future::join_all;
use serde_json::json;
use swarm_manager::config::{Settings, load_config_from};
use swarm_manager::utils::logging;
use swarm_manager::{Manager, MemorySwarm, SwarmProvider, TopicId};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "swarm-manager")]
enum Command {
    /// Serve and request two dummy keys and print the served/requested sets
    Demo {
        /// Configuration file base path
        #[arg(long, default_value = swarm_manager::config::DEFAULT_CONFIG_PATH)]
        config: String,
    },
    /// Run interleaved intents against one key without waiting in between
    Chaos {
        /// Configuration file base path
        #[arg(long, default_value = swarm_manager::config::DEFAULT_CONFIG_PATH)]
        config: String,
        /// Number of serve/unserve/request/unrequest rounds
        #[arg(long, default_value_t = 10)]
        reps: usize,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cmd = Command::parse();
    let path = match &cmd {
        Command::Demo { config } | Command::Chaos { config, .. } => config.clone(),
    };

    let config = match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    logging::init(&config.logging.level);

    let result = match cmd {
        Command::Demo { .. } => run_demo(&config).await,
        Command::Chaos { reps, json, .. } => run_chaos(&config, reps, json).await,
    };

    if let Err(e) = result {
        error!("Run failed: {}", e);
    }
}

fn build_manager(config: &Settings) -> Manager<MemorySwarm> {
    let swarm = MemorySwarm::with_latency(Duration::from_millis(config.demo.latency_ms));
    info!(sequencing = ?config.manager.sequencing, "starting manager");
    Manager::with_settings(Arc::new(swarm), &config.manager)
}

async fn run_demo(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let manager = build_manager(config);

    // Some dummy discovery keys
    let keys: [TopicId; 2] = ["a".repeat(64).parse()?, "b".repeat(64).parse()?];

    manager.serve(keys[0]);
    manager.serve(keys[1]);
    manager.request(keys[1]);
    manager.serve(keys[1]); // served twice

    print_state("", &manager);

    manager.unserve(keys[1]).await?; // still served once
    print_state("after one unserve", &manager);

    manager.unserve(keys[1]).await?; // no longer served, still requested
    print_state("after second unserve", &manager);

    manager.unrequest(keys[1]).await?;
    print_state("final", &manager);

    manager.close().await?;
    Ok(())
}

async fn run_chaos(
    config: &Settings,
    reps: usize,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = build_manager(config);
    let key: TopicId = "c".repeat(64).parse()?;

    manager.request(key);

    let mut pending = Vec::with_capacity(reps * 2);
    for _ in 0..reps {
        manager.serve(key);
        pending.push(manager.unserve(key));
        manager.request(key);
        pending.push(manager.unrequest(key));
    }
    for result in join_all(pending).await {
        result?;
    }
    while manager.pending_topics() > 0 {
        tokio::time::sleep(Duration::from_millis(config.demo.latency_ms.max(1))).await;
    }

    let served = manager.served_keys();
    let requested = manager.requested_keys();
    let issued = manager.provider().calls().len();

    if as_json {
        let report = json!({
            "reps": reps,
            "sequencing": manager.sequencing(),
            "served": served,
            "requested": requested,
            "role": manager.role(key),
            "issued_operations": issued,
            "live_topics": manager.provider().topics(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("After {reps} rounds ({issued} swarm operations issued):");
        print_state("", &manager);
    }

    manager.unrequest(key).await?;
    manager.close().await?;
    Ok(())
}

fn print_state<P: SwarmProvider>(label: &str, manager: &Manager<P>) {
    let sep = if label.is_empty() { "" } else { " " };
    println!("\nServed keys{sep}{label}:");
    print_keys(&manager.served_keys());
    println!("Requested keys{sep}{label}:");
    print_keys(&manager.requested_keys());
}

fn print_keys(keys: &[TopicId]) {
    if keys.is_empty() {
        println!("/");
    } else {
        for key in keys {
            println!(" - {key}");
        }
    }
}
