use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::node::DEFAULT_MINING_REWARD;
use crate::peer::PeerAddr;
use crate::validator::pow::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Node settings, read from the environment.
///
/// | variable | default |
/// |---|---|
/// | `HTTP_HOST` | `0.0.0.0` |
/// | `HTTP_PORT` | `5000` |
/// | `PEERS` | comma separated peer addresses, none by default |
/// | `DIFFICULTY` | `4` leading hex zeros, at most `64` |
/// | `PEER_TIMEOUT_MS` | `5000` |
/// | `NODE_ID` | random |
/// | `MINING_REWARD` | `1` |
/// | `RESOLVE_INTERVAL_SECS` | unset or `0` disables periodic resolution |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub peers: Vec<PeerAddr>,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    pub node_id: Option<String>,
    pub mining_reward: u64,
    pub resolve_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let peers = get("PEERS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|peer| !peer.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<PeerAddr>, _>>()?;

        let resolve_secs: u64 = parse_var(&get, "RESOLVE_INTERVAL_SECS", 0)?;

        let difficulty = parse_var(&get, "DIFFICULTY", DEFAULT_DIFFICULTY)?;
        if difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::Invalid {
                var: "DIFFICULTY",
                value: difficulty.to_string(),
            });
        }

        Ok(Config {
            http_host: get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: parse_var(&get, "HTTP_PORT", 5000)?,
            peers,
            difficulty,
            peer_timeout: Duration::from_millis(parse_var(&get, "PEER_TIMEOUT_MS", 5000)?),
            node_id: get("NODE_ID").filter(|id| !id.is_empty()),
            mining_reward: parse_var(&get, "MINING_REWARD", DEFAULT_MINING_REWARD)?,
            resolve_interval: (resolve_secs > 0).then(|| Duration::from_secs(resolve_secs)),
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_var<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        _ => Ok(default),
    }
}
