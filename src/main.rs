use log::{error, info};
use std::process;
use std::sync::Arc;

use naiveledger_rs::error::ServerError;
use naiveledger_rs::http_server::init_http_server;
use naiveledger_rs::{Config, Node};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{e}");
        process::exit(1);
    }
}

fn run() -> Result<(), ServerError> {
    let config = Config::from_env()?;
    let node = Arc::new(Node::from_config(&config)?);

    info!(
        "node {} running on {} with difficulty {} and {} initial peers",
        node.node_id(),
        config.http_addr(),
        config.difficulty,
        config.peers.len()
    );

    if let Some(interval) = config.resolve_interval {
        info!("resolving conflicts every {}s", interval.as_secs());
        Node::spawn_resolver(Arc::clone(&node), interval);
    }

    init_http_server(node, &config.http_addr())
}
