use std::{path::PathBuf, str::FromStr};

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, TxHash},
    providers::Provider,
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::Transport,
};
use eyre::WrapErr;
use tracing::{debug, info};

use crate::{artifacts::Artifact, errors::TaskError};

/// Everything a task needs: a provider that signs as `sender`, and where to find artifacts
pub struct TaskContext<P> {
    pub provider: P,
    pub sender: Address,
    pub network: String,
    pub artifacts: PathBuf,
}

impl<P> TaskContext<P> {
    /// Wrap `provider`, checking the endpoint's chain id when the network pins one.
    pub async fn connect<T>(
        provider: P,
        sender: Address,
        network: &str,
        expected_chain_id: Option<u64>,
        artifacts: PathBuf,
    ) -> eyre::Result<Self>
    where
        P: Provider<T, Ethereum>,
        T: Transport + Clone,
    {
        let chain_id = provider
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("failed to reach the {network} RPC endpoint"))?;

        if let Some(expected) = expected_chain_id {
            if expected != chain_id {
                return Err(TaskError::ChainIdMismatch {
                    network: network.to_string(),
                    expected,
                    actual: chain_id,
                }
                .into());
            }
        }

        info!(network, chain_id, %sender, "connected");
        Ok(Self {
            provider,
            sender,
            network: network.to_string(),
            artifacts,
        })
    }

    pub fn artifact(&self, name: &str) -> Result<Artifact, TaskError> {
        Artifact::load(&self.artifacts, name)
    }
}

/// Build the signer from a hex private key, with or without the `0x` prefix.
pub fn resolve_signer(private_key: Option<&str>) -> Result<PrivateKeySigner, TaskError> {
    let key = match private_key.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => return Err(TaskError::WalletNotFound),
    };

    let signer = PrivateKeySigner::from_str(key)
        .map_err(|e| TaskError::InvalidPrivateKey(e.to_string()))?;
    debug!(address = %signer.address(), "resolved signer");
    Ok(signer)
}

/// The receipt's transaction hash, or an error if the transaction reverted.
pub fn ensure_success(receipt: &TransactionReceipt) -> Result<TxHash, TaskError> {
    if receipt.status() {
        Ok(receipt.transaction_hash)
    } else {
        Err(TaskError::Reverted(receipt.transaction_hash))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;
    use crate::errors::WALLET_NOT_FOUND;

    // First default anvil/hardhat account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn missing_key_reports_wallet_not_found() {
        let err = resolve_signer(None).unwrap_err();
        assert!(matches!(err, TaskError::WalletNotFound));
        assert_eq!(err.to_string(), WALLET_NOT_FOUND);

        assert!(matches!(
            resolve_signer(Some("  ")),
            Err(TaskError::WalletNotFound)
        ));
    }

    #[test]
    fn malformed_key_is_not_a_missing_wallet() {
        assert!(matches!(
            resolve_signer(Some("0x1234")),
            Err(TaskError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn dev_key_resolves_to_known_address() {
        let expected = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(resolve_signer(Some(DEV_KEY)).unwrap().address(), expected);
        assert_eq!(
            resolve_signer(Some(DEV_KEY.trim_start_matches("0x")))
                .unwrap()
                .address(),
            expected
        );
    }
}
