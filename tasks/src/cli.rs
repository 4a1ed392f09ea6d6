//! Definitions of CLI arguments and commands

use std::path::PathBuf;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::Provider,
    transports::Transport,
};
use clap::{Args, Parser, Subcommand};

use crate::{
    calls::{RevertArgs, TransferRequest, TxOptions},
    commands::{nft, swap},
    context::TaskContext,
    output::Output,
};

/// Gateway on a local development network
pub const LOCALNET_GATEWAY: &str = "0x9A676e781A523b5d0C0e43731313A708CB607508";

#[derive(Parser)]
#[command(
    name = "universal-tasks",
    about = "Deploy, link and transfer tasks for universal cross-chain contracts",
    version
)]
pub struct Cli {
    /// Network to run against, as named in the config file
    #[arg(long, default_value = "localnet", global = true)]
    pub network: String,

    /// Network config file
    #[arg(long, default_value = "networks.toml", global = true)]
    pub config: PathBuf,

    /// Override the network's RPC endpoint
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = "artifacts", global = true)]
    pub artifacts: PathBuf,

    /// Private key of the signer
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,

    /// Output the result in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy the NFT contract
    NftDeploy(NftDeployArgs),
    /// Transfer and lock an NFT
    Transfer(TransferArgs),
    /// Point a connected-chain contract at its universal counterpart
    SetUniversal(SetUniversalArgs),
    /// Register a connected-chain contract on the universal contract
    SetConnected(SetConnectedArgs),
    /// Deploy SwapStats and an upgradeable EnhancedSwap, then link them
    SwapDeploy(SwapDeployArgs),
    /// Deploy the StatTracker contract
    DeployStatTracker,
    /// Point a swap contract at a StatTracker
    SetStatTracker(SetStatTrackerArgs),
    /// Deploy a DelayedSwapExecutor for a swap contract
    DeployDelayedSwapExecutor(DeployDelayedSwapExecutorArgs),
    /// Approve tokens and schedule a delayed swap
    ScheduleSwap(ScheduleSwapArgs),
    /// Advance the local chain clock and execute a scheduled swap
    ExecuteDelayedSwap(ExecuteDelayedSwapArgs),
}

impl Command {
    pub async fn run<P, T>(self, ctx: &TaskContext<P>) -> eyre::Result<Output>
    where
        P: Provider<T, Ethereum>,
        T: Transport + Clone,
    {
        let output = match self {
            Command::NftDeploy(args) => Output::Deploy(nft::deploy(ctx, args).await?),
            Command::Transfer(args) => Output::Transfer(nft::transfer(ctx, args.into()).await?),
            Command::SetUniversal(args) => Output::Link(nft::set_universal(ctx, args).await?),
            Command::SetConnected(args) => Output::Link(nft::set_connected(ctx, args).await?),
            Command::SwapDeploy(args) => Output::SwapDeploy(swap::deploy(ctx, args).await?),
            Command::DeployStatTracker => Output::Deploy(swap::deploy_stat_tracker(ctx).await?),
            Command::SetStatTracker(args) => {
                Output::Link(swap::set_stat_tracker(ctx, args).await?)
            }
            Command::DeployDelayedSwapExecutor(args) => {
                Output::Deploy(swap::deploy_delayed_swap_executor(ctx, args).await?)
            }
            Command::ScheduleSwap(args) => Output::Schedule(swap::schedule(ctx, args).await?),
            Command::ExecuteDelayedSwap(args) => {
                Output::Execute(swap::execute_delayed(ctx, args).await?)
            }
        };
        Ok(output)
    }
}

#[derive(Args)]
pub struct NftDeployArgs {
    /// The contract name to deploy, or `path/To.sol:Name` when several share the name
    #[arg(long, default_value = "Universal")]
    pub name: String,

    /// Gateway address
    #[arg(long, default_value = LOCALNET_GATEWAY)]
    pub gateway: Address,
}

#[derive(Args)]
pub struct TransferArgs {
    /// The address of the NFT contract
    #[arg(long)]
    pub contract: Address,

    /// The ID of the NFT to transfer
    #[arg(long)]
    pub token_id: U256,

    /// The receiver on the destination chain, hex encoded
    #[arg(long)]
    pub receiver: Bytes,

    /// ZRC-20 of the gas token of the destination chain
    #[arg(long, default_value_t = Address::ZERO)]
    pub destination: Address,

    /// The amount of gas to transfer, in whole native tokens
    #[arg(long, default_value = "0")]
    pub amount: String,

    /// The gas price for the transaction
    #[arg(long, default_value_t = 10_000_000_000)]
    pub tx_options_gas_price: u128,

    /// The gas limit for the transaction
    #[arg(long, default_value_t = 7_000_000)]
    pub tx_options_gas_limit: u64,

    /// Whether to call on revert
    #[arg(long)]
    pub call_on_revert: bool,

    /// The address to call on revert
    #[arg(long, default_value_t = Address::ZERO)]
    pub revert_address: Address,

    /// The message to send on revert
    #[arg(long, default_value = "0x")]
    pub revert_message: String,

    /// The gas limit for the revert transaction
    #[arg(long, default_value_t = 7_000_000)]
    pub on_revert_gas_limit: u64,

    /// Whether the call is arbitrary
    #[arg(long)]
    pub is_arbitrary_call: bool,
}

impl From<TransferArgs> for TransferRequest {
    fn from(args: TransferArgs) -> Self {
        TransferRequest {
            contract: args.contract,
            token_id: args.token_id,
            receiver: args.receiver,
            destination: args.destination,
            amount: args.amount,
            is_arbitrary_call: args.is_arbitrary_call,
            revert: RevertArgs {
                call_on_revert: args.call_on_revert,
                revert_address: args.revert_address,
                revert_message: args.revert_message,
                on_revert_gas_limit: args.on_revert_gas_limit,
            },
            tx: TxOptions {
                gas_price: args.tx_options_gas_price,
                gas_limit: args.tx_options_gas_limit,
            },
        }
    }
}

#[derive(Args)]
pub struct SetUniversalArgs {
    /// The connected-chain contract
    #[arg(long)]
    pub contract: Address,

    /// The universal contract on the universal chain
    #[arg(long)]
    pub universal: Address,
}

#[derive(Args)]
pub struct SetConnectedArgs {
    /// The universal contract
    #[arg(long)]
    pub contract: Address,

    /// ZRC-20 of the gas token of the connected chain
    #[arg(long)]
    pub zrc20: Address,

    /// The connected-chain contract, hex encoded
    #[arg(long)]
    pub connected: Bytes,
}

#[derive(Args)]
pub struct SwapDeployArgs {
    /// Gateway address
    #[arg(long)]
    pub gateway: Address,

    /// Uniswap router address
    #[arg(long)]
    pub uniswap_router: Address,

    /// Gas limit for cross-chain withdrawals
    #[arg(long, default_value_t = 300_000)]
    pub gas_limit: u64,

    /// Swap fee in basis points
    #[arg(long, default_value_t = 50)]
    pub fee_basis_points: u16,

    /// Fee collector, the signer when omitted
    #[arg(long)]
    pub fee_collector: Option<Address>,
}

#[derive(Args)]
pub struct SetStatTrackerArgs {
    /// The swap contract
    #[arg(long)]
    pub swap: Address,

    /// The StatTracker contract
    #[arg(long)]
    pub stat_tracker: Address,
}

#[derive(Args)]
pub struct DeployDelayedSwapExecutorArgs {
    /// The swap contract the executor forwards to
    #[arg(long)]
    pub swap: Address,
}

#[derive(Args)]
pub struct ScheduleSwapArgs {
    /// The DelayedSwapExecutor contract
    #[arg(long)]
    pub executor: Address,

    /// Token to swap from
    #[arg(long)]
    pub input_token: Address,

    /// Token to swap to
    #[arg(long)]
    pub target_token: Address,

    /// Recipient of the swapped tokens
    #[arg(long)]
    pub recipient: Address,

    /// Amount of the input token, 18 decimals
    #[arg(long, default_value = "1")]
    pub amount: String,

    /// Withdraw the output to its origin chain
    #[arg(long)]
    pub withdraw: bool,

    /// Delay before the swap can execute, in seconds
    #[arg(long, default_value_t = 30)]
    pub delay: u64,
}

#[derive(Args)]
pub struct ExecuteDelayedSwapArgs {
    /// The DelayedSwapExecutor contract
    #[arg(long)]
    pub executor: Address,

    /// The scheduled order to execute
    #[arg(long, default_value_t = U256::ZERO)]
    pub order_id: U256,

    /// Seconds to advance the chain clock by before executing
    #[arg(long, default_value_t = 31)]
    pub advance: u64,
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn nft_deploy_defaults() {
        let cli = Cli::parse_from(["universal-tasks", "nft-deploy", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.network, "localnet");
        let Command::NftDeploy(args) = cli.command else {
            panic!("expected nft-deploy");
        };
        assert_eq!(args.name, "Universal");
        assert_eq!(
            args.gateway,
            address!("0x9A676e781A523b5d0C0e43731313A708CB607508")
        );
    }

    #[test]
    fn transfer_defaults_match_the_documented_ones() {
        let cli = Cli::parse_from([
            "universal-tasks",
            "--network",
            "zeta_testnet",
            "transfer",
            "--contract",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--token-id",
            "1",
            "--receiver",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        ]);
        assert_eq!(cli.network, "zeta_testnet");
        let Command::Transfer(args) = cli.command else {
            panic!("expected transfer");
        };
        let req = TransferRequest::from(args);
        assert_eq!(req.token_id, U256::from(1));
        assert_eq!(req.receiver.len(), 20);
        assert_eq!(req.destination, Address::ZERO);
        assert_eq!(req.amount, "0");
        assert_eq!(req.tx.gas_price, 10_000_000_000);
        assert_eq!(req.tx.gas_limit, 7_000_000);
        assert_eq!(req.revert.revert_message, "0x");
        assert_eq!(req.revert.on_revert_gas_limit, 7_000_000);
        assert!(!req.revert.call_on_revert);
        assert!(!req.is_arbitrary_call);
    }

    #[test]
    fn transfer_requires_a_receiver() {
        let res = Cli::try_parse_from([
            "universal-tasks",
            "transfer",
            "--contract",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--token-id",
            "1",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_address_is_rejected_at_parse_time() {
        let res = Cli::try_parse_from([
            "universal-tasks",
            "set-universal",
            "--contract",
            "0x1234",
            "--universal",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn execute_delayed_swap_defaults() {
        let cli = Cli::parse_from([
            "universal-tasks",
            "execute-delayed-swap",
            "--executor",
            "0xa35338035e83BFcba35f8f713388d45c94A106a4",
        ]);
        let Command::ExecuteDelayedSwap(args) = cli.command else {
            panic!("expected execute-delayed-swap");
        };
        assert_eq!(args.order_id, U256::ZERO);
        assert_eq!(args.advance, 31);
    }
}
