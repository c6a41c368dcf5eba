use defer_lite::defer;
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    process::{Child, Command, Stdio},
    time::Duration,
};

use naiveledger_rs::message::{ChainPayload, MinedBlock, ResolveResponse};
use naiveledger_rs::{PowValidator, Validator};

const HTTP_PORT_0: &str = "18730";
const HTTP_PORT_1: &str = "18731";
const DIFFICULTY: usize = 2;

struct InstanceConfig {
    pub http_port: String,
    pub node_id: String,
    pub peers: Vec<String>,
}

fn start_instance(config: &InstanceConfig) -> Child {
    Command::new(env!("CARGO_BIN_EXE_naiveledger-rs"))
        .env("HTTP_HOST", "127.0.0.1")
        .env("HTTP_PORT", &config.http_port)
        .env("NODE_ID", &config.node_id)
        .env("PEERS", config.peers.join(","))
        .env("DIFFICULTY", DIFFICULTY.to_string())
        .env("PEER_TIMEOUT_MS", "2000")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to execute process")
}

async fn wait_until_up(client: &Client, port: &str) {
    for _ in 0..50 {
        if client
            .get(format!("http://127.0.0.1:{}/chain", port))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("node on port {} did not come up", port);
}

async fn mine_block(client: &Client, port: &str) -> MinedBlock {
    client
        .get(format!("http://127.0.0.1:{}/mine", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn get_chain(client: &Client, port: &str) -> ChainPayload {
    client
        .get(format!("http://127.0.0.1:{}/chain", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn send_transaction(client: &Client, port: &str, body: Value) -> (u16, String) {
    let res = client
        .post(format!("http://127.0.0.1:{}/transactions/new", port))
        .json(&body)
        .send()
        .await
        .unwrap();

    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

async fn register(client: &Client, port: &str, nodes: &[&str]) -> u16 {
    client
        .post(format!("http://127.0.0.1:{}/nodes/register", port))
        .json(&json!({ "nodes": nodes }))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

async fn resolve(client: &Client, port: &str) -> ResolveResponse {
    client
        .get(format!("http://127.0.0.1:{}/nodes/resolve", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_all() {
    let mut instances = vec![
        start_instance(&InstanceConfig {
            http_port: HTTP_PORT_0.into(),
            node_id: "node0".into(),
            peers: vec![],
        }),
        start_instance(&InstanceConfig {
            http_port: HTTP_PORT_1.into(),
            node_id: "node1".into(),
            // node0 is known from startup, the second entry is never reachable
            peers: vec![format!("http://127.0.0.1:{}", HTTP_PORT_0), "127.0.0.1:9".into()],
        }),
    ];
    defer! {
        for instance in instances.iter_mut() {
            instance.kill().expect("could not kill child process");
            let _ = instance.wait();
        }
    }

    let client = Client::new();
    wait_until_up(&client, HTTP_PORT_0).await;
    wait_until_up(&client, HTTP_PORT_1).await;

    // transactions are predicted to land in the next block
    let (status, body) = send_transaction(
        &client,
        HTTP_PORT_0,
        json!({"sender": "alice", "recipient": "bob", "amount": 5}),
    )
    .await;
    assert_eq!(status, 201);
    assert!(body.contains("Transaction will be added to Block 2"));

    let (status, body) =
        send_transaction(&client, HTTP_PORT_0, json!({"sender": "alice", "amount": 5})).await;
    assert_eq!(status, 400);
    assert_eq!(body, "Missing values");

    // mining drains the pool and pays node0
    let block = mine_block(&client, HTTP_PORT_0).await;
    assert_eq!(block.index, 2);
    assert_eq!(block.transactions.len(), 2);
    assert_eq!(block.transactions[0].sender, "alice");
    assert_eq!(block.transactions[1].sender, "0");
    assert_eq!(block.transactions[1].recipient, "node0");
    assert!(PowValidator::new(DIFFICULTY).verify(100, block.proof));

    mine_block(&client, HTTP_PORT_0).await;
    let chain0 = get_chain(&client, HTTP_PORT_0).await;
    assert_eq!(chain0.length, 3);

    // node1 adopts the longer chain, skipping the dead peer
    let res = resolve(&client, HTTP_PORT_1).await;
    assert!(res.replaced);
    assert_eq!(res.chain, chain0.chain);
    assert_eq!(get_chain(&client, HTTP_PORT_1).await, chain0);

    // equal length chains never replace each other
    assert_eq!(
        register(&client, HTTP_PORT_0, &[format!("http://127.0.0.1:{}", HTTP_PORT_1).as_str()]).await,
        201
    );
    let res = resolve(&client, HTTP_PORT_0).await;
    assert!(!res.replaced);
    assert_eq!(res.message, "Our chain is authoritative");

    // node1 pulls ahead and node0 follows
    mine_block(&client, HTTP_PORT_1).await;
    let res = resolve(&client, HTTP_PORT_0).await;
    assert!(res.replaced);
    let chain0 = get_chain(&client, HTTP_PORT_0).await;
    assert_eq!(chain0.length, 4);
    assert_eq!(chain0, get_chain(&client, HTTP_PORT_1).await);
    assert_eq!(chain0.chain[3].transactions[0].recipient, "node1");

    assert_eq!(register(&client, HTTP_PORT_0, &[]).await, 201);
}
