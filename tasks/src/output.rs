//! Task results, printed either as a human-readable summary or as one line of JSON.

use std::fmt::{self, Display, Formatter};

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployReport {
    #[serde(skip)]
    pub name: String,
    pub contract_address: Address,
    pub deployer: Address,
    pub network: String,
    pub transaction_hash: TxHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    pub contract_address: Address,
    pub transfer_transaction_hash: TxHash,
    pub sender: Address,
    pub token_id: String,
    #[serde(skip)]
    pub path: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    #[serde(skip)]
    pub setter: &'static str,
    pub contract_address: Address,
    /// What the contract now points at; a hex address or chain-agnostic bytes
    pub linked: String,
    pub network: String,
    pub transaction_hash: TxHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDeployReport {
    pub swap_stats: Address,
    pub enhanced_swap: Address,
    pub enhanced_swap_implementation: Address,
    pub link_transaction_hash: TxHash,
    pub deployer: Address,
    pub network: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub executor: Address,
    pub approve_transaction_hash: TxHash,
    pub transaction_hash: TxHash,
    pub sender: Address,
    /// Amount in the token's smallest unit, decimal
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteReport {
    pub executor: Address,
    pub order_id: String,
    pub advanced_seconds: u64,
    pub transaction_hash: TxHash,
    pub network: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Deploy(DeployReport),
    Transfer(TransferReport),
    Link(LinkReport),
    SwapDeploy(SwapDeployReport),
    Schedule(ScheduleReport),
    Execute(ExecuteReport),
}

impl Output {
    pub fn render(&self, json: bool) -> Result<String, serde_json::Error> {
        if json {
            serde_json::to_string(self)
        } else {
            Ok(self.to_string())
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Output::Deploy(r) => write!(
                f,
                "🚀 Successfully deployed \"{}\" contract on {}.\n\
                 📜 Contract address: {}\n\
                 🔗 Transaction hash: {}",
                r.name, r.network, r.contract_address, r.transaction_hash
            ),
            Output::Transfer(r) => write!(
                f,
                "🚀 Successfully transferred NFT to the contract ({} path).\n\
                 📜 Contract address: {}\n\
                 🆔 Token ID: {}\n\
                 🔗 Transaction hash: {}",
                r.path, r.contract_address, r.token_id, r.transfer_transaction_hash
            ),
            Output::Link(r) => write!(
                f,
                "🔗 Called {} on {} ({}).\n\
                 📜 Linked to: {}\n\
                 🔗 Transaction hash: {}",
                r.setter, r.contract_address, r.network, r.linked, r.transaction_hash
            ),
            Output::SwapDeploy(r) => write!(
                f,
                "🚀 Successfully deployed the swap contracts on {}.\n\
                 📜 SwapStats: {}\n\
                 📜 EnhancedSwap proxy: {}\n\
                 📜 EnhancedSwap implementation: {}\n\
                 🔗 SwapStats linked to EnhancedSwap in: {}",
                r.network,
                r.swap_stats,
                r.enhanced_swap,
                r.enhanced_swap_implementation,
                r.link_transaction_hash
            ),
            Output::Schedule(r) => write!(
                f,
                "⏳ Scheduled a swap of {} on executor {}.\n\
                 🔗 Approve transaction hash: {}\n\
                 🔗 Transaction hash: {}",
                r.amount, r.executor, r.approve_transaction_hash, r.transaction_hash
            ),
            Output::Execute(r) => write!(
                f,
                "⏩ Advanced {} by {}s and executed swap for order {}.\n\
                 🔗 Transaction hash: {}",
                r.network, r.advanced_seconds, r.order_id, r.transaction_hash
            ),
        }
    }
}
