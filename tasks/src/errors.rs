//! Errors raised by the tasks themselves, as opposed to transport or contract errors
//! which are passed through as [`eyre::Report`]s.

use std::path::PathBuf;

use alloy::primitives::TxHash;

/// Message shown when no signer key is configured
pub const WALLET_NOT_FOUND: &str = "Wallet not found. Please, set the PRIVATE_KEY env variable \
     (for example, in a .env file) or pass --private-key";

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{}", WALLET_NOT_FOUND)]
    WalletNotFound,
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("unknown network \"{0}\", add it to the config file or pass --rpc-url")]
    UnknownNetwork(String),
    #[error("network \"{network}\" expects chain id {expected}, the RPC endpoint reports {actual}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
    #[error("error reading config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
    #[error("artifact for contract \"{name}\" not found under {dir}")]
    ArtifactNotFound { name: String, dir: PathBuf },
    #[error(
        "several artifacts are named \"{name}\": {}; use a fully qualified name like path/To.sol:Name",
        paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    AmbiguousArtifact { name: String, paths: Vec<PathBuf> },
    #[error("error parsing artifact {path}: {reason}")]
    ArtifactParsing { path: PathBuf, reason: String },
    #[error("error constructing calldata: {0}")]
    CalldataConstruction(String),
    #[error("deployment transaction {0} did not create a contract")]
    ContractNotDeployed(TxHash),
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("invalid amount \"{0}\": expected a non-negative decimal number")]
    InvalidAmount(String),
    #[error("invalid receiver \"{0}\": {1}")]
    InvalidReceiver(String, String),
}
