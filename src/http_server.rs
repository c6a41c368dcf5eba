use log::{debug, info, warn};
use rouille::{input::json_input, Request, Response};
use std::sync::Arc;

use crate::error::ServerError;
use crate::message::{
    MinedBlock, RegisterRequest, RegisterResponse, ResolveResponse, SubmitResponse,
};
use crate::node::Node;
use crate::peer::PeerAddr;
use crate::transaction::TransactionRequest;

fn mine(node: &Node) -> Response {
    let block = node.mine();

    Response::json(&MinedBlock::from(block))
}

fn new_transaction(node: &Node, request: &Request) -> Response {
    let req: TransactionRequest = match json_input(request) {
        Ok(req) => req,
        Err(e) => {
            warn!("unreadable transaction: {e}");
            return Response::text("Invalid transaction").with_status_code(400);
        }
    };

    match node.submit_transaction(req) {
        Ok(index) => Response::json(&SubmitResponse {
            message: format!("Transaction will be added to Block {index}"),
        })
        .with_status_code(201),
        Err(_) => Response::text("Missing values").with_status_code(400),
    }
}

fn full_chain(node: &Node) -> Response {
    Response::json(&node.chain())
}

fn register_nodes(node: &Node, request: &Request) -> Response {
    let nodes = match json_input::<RegisterRequest>(request) {
        Ok(RegisterRequest { nodes: Some(nodes) }) => nodes,
        _ => {
            return Response::text("Error: Please supply a valid list of nodes")
                .with_status_code(400)
        }
    };

    let addrs = match nodes
        .iter()
        .map(|n| n.parse())
        .collect::<Result<Vec<PeerAddr>, _>>()
    {
        Ok(addrs) => addrs,
        Err(e) => return Response::text(format!("Error: {e}")).with_status_code(400),
    };

    for addr in addrs {
        node.register_peer(addr);
    }

    Response::json(&RegisterResponse {
        message: String::from("New nodes have been added."),
        total_nodes: node.peers(),
    })
    .with_status_code(201)
}

fn consensus(node: &Node) -> Response {
    let res = node.resolve_now();
    let message = if res.replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };

    Response::json(&ResolveResponse {
        message: message.into(),
        replaced: res.replaced,
        chain: res.chain.blocks().to_vec(),
    })
}

pub fn handle_request(node: &Node, request: &Request) -> Response {
    debug!("{} {}", request.method(), request.url());

    rouille::router!(request,

     (GET) (/mine) => {
        mine(node)
     },

     (POST) (/transactions/new) => {
        new_transaction(node, request)
     },

     (GET) (/chain) => {
        full_chain(node)
     },

     (POST) (/nodes/register) => {
        register_nodes(node, request)
     },

     (GET) (/nodes/resolve) => {
        consensus(node)
     },

     _ => Response::empty_404()

    )
}

/// serve the node over http until the process exits
pub fn init_http_server(node: Arc<Node>, addr: &str) -> Result<(), ServerError> {
    let server = rouille::Server::new(addr, move |request| handle_request(&node, request))
        .map_err(|e| ServerError::Bind {
            addr: addr.to_owned(),
            reason: e.to_string(),
        })?;

    info!("http server listening on {}", server.server_addr());
    server.run();

    Ok(())
}
