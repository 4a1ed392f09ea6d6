//! Network configuration, read from an optional TOML file and layered over built-in defaults.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::TaskError;

/// RPC endpoint of a local development node
pub const LOCALNET_RPC: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// When set, the endpoint's chain id is checked before any transaction is sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let networks = [
            ("localnet", LOCALNET_RPC, None),
            (
                "zeta_testnet",
                "https://zetachain-athens-evm.blockpi.network/v1/rpc/public",
                Some(7001),
            ),
            (
                "zeta_mainnet",
                "https://zetachain-evm.blockpi.network/v1/rpc/public",
                Some(7000),
            ),
            (
                "sepolia_testnet",
                "https://ethereum-sepolia-rpc.publicnode.com",
                Some(11155111),
            ),
            ("base_sepolia", "https://sepolia.base.org", Some(84532)),
        ]
        .into_iter()
        .map(|(name, rpc_url, chain_id)| {
            (
                name.to_string(),
                NetworkConfig {
                    rpc_url: rpc_url.to_string(),
                    chain_id,
                },
            )
        })
        .collect();

        Self { networks }
    }
}

impl Config {
    /// Load the built-in networks and overlay the ones defined in `path`, if it exists.
    pub fn load(path: &Path) -> Result<Self, TaskError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using built-in networks");
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: Config = toml::from_str(&content).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), networks = file.networks.len(), "loaded config file");
        config.networks.extend(file.networks);
        Ok(config)
    }

    /// Resolve the network to connect to. An explicit RPC URL wins over the config and
    /// makes unknown network names acceptable.
    pub fn network(
        &self,
        name: &str,
        rpc_override: Option<&str>,
    ) -> Result<NetworkConfig, TaskError> {
        match (self.networks.get(name), rpc_override) {
            (Some(network), Some(url)) => Ok(NetworkConfig {
                rpc_url: url.to_string(),
                chain_id: network.chain_id,
            }),
            (Some(network), None) => Ok(network.clone()),
            (None, Some(url)) => Ok(NetworkConfig {
                rpc_url: url.to_string(),
                chain_id: None,
            }),
            (None, None) => Err(TaskError::UnknownNetwork(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_include_localnet() {
        let c = Config::default();
        let localnet = c.network("localnet", None).unwrap();
        assert_eq!(localnet.rpc_url, LOCALNET_RPC);
        assert!(localnet.chain_id.is_none());
        assert_eq!(c.networks["zeta_testnet"].chain_id, Some(7001));
    }

    #[test]
    fn unknown_network_without_override_fails() {
        let c = Config::default();
        let err = c.network("nowhere", None).unwrap_err();
        assert!(matches!(err, TaskError::UnknownNetwork(name) if name == "nowhere"));
    }

    #[test]
    fn rpc_override_keeps_chain_id() {
        let c = Config::default();
        let n = c
            .network("zeta_testnet", Some("http://localhost:9000"))
            .unwrap();
        assert_eq!(n.rpc_url, "http://localhost:9000");
        assert_eq!(n.chain_id, Some(7001));

        let n = c.network("adhoc", Some("http://localhost:9000")).unwrap();
        assert!(n.chain_id.is_none());
    }

    #[test]
    fn file_overlays_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[networks.localnet]
rpc_url = "http://127.0.0.1:9545"

[networks.devnet]
rpc_url = "http://10.0.0.2:8545"
chain_id = 1337
"#
        )
        .unwrap();

        let c = Config::load(file.path()).unwrap();
        assert_eq!(c.networks["localnet"].rpc_url, "http://127.0.0.1:9545");
        assert_eq!(c.networks["devnet"].chain_id, Some(1337));
        // Built-in networks not mentioned in the file survive.
        assert!(c.networks.contains_key("zeta_mainnet"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::load(&dir.path().join("networks.toml")).unwrap();
        assert_eq!(c.networks.len(), Config::default().networks.len());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[networks.localnet]\nrpc_url = 42").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(TaskError::Config { .. })
        ));
    }
}
