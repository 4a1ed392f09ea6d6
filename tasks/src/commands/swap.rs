//! Tasks for the swap contracts: deployment, linking and delayed execution

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::Provider,
    sol_types::SolValue,
    transports::Transport,
};
use eyre::WrapErr;
use tracing::info;

use crate::{
    bindings::{DelayedSwapExecutor, Swap, SwapStats, IERC20},
    calls::parse_amount,
    cli::{
        DeployDelayedSwapExecutorArgs, ExecuteDelayedSwapArgs, ScheduleSwapArgs,
        SetStatTrackerArgs, SwapDeployArgs,
    },
    context::{ensure_success, TaskContext},
    output::{DeployReport, ExecuteReport, LinkReport, ScheduleReport, SwapDeployReport},
};

const SWAP_STATS: &str = "SwapStats";
const ENHANCED_SWAP: &str = "EnhancedSwap";
const UUPS_PROXY: &str = "ERC1967Proxy";
const STAT_TRACKER: &str = "StatTracker";
const DELAYED_SWAP_EXECUTOR: &str = "DelayedSwapExecutor";

/// Deploy `SwapStats`, then `EnhancedSwap` behind a UUPS proxy, then link the two.
pub async fn deploy<P, T>(
    ctx: &TaskContext<P>,
    args: SwapDeployArgs,
) -> eyre::Result<SwapDeployReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let owner = ctx.sender;
    let fee_collector = args.fee_collector.unwrap_or(owner);
    info!(
        gateway = %args.gateway,
        uniswap_router = %args.uniswap_router,
        gas_limit = args.gas_limit,
        %owner,
        fee_basis_points = args.fee_basis_points,
        %fee_collector,
        "deploying EnhancedSwap"
    );

    // Load everything up front so a missing artifact fails before any transaction
    let stats_artifact = ctx.artifact(SWAP_STATS)?;
    let swap_artifact = ctx.artifact(ENHANCED_SWAP)?;
    let proxy_artifact = ctx.artifact(UUPS_PROXY)?;

    let stats = stats_artifact
        .deploy(&ctx.provider, &[owner.to_string()])
        .await?;

    let implementation = swap_artifact.deploy(&ctx.provider, &[]).await?;
    let init = swap_artifact.calldata(
        "initialize",
        &[
            args.gateway.to_string(),
            args.uniswap_router.to_string(),
            args.gas_limit.to_string(),
            owner.to_string(),
            stats.address.to_string(),
            args.fee_basis_points.to_string(),
            fee_collector.to_string(),
        ],
    )?;
    let proxy = proxy_artifact
        .deploy(
            &ctx.provider,
            &[implementation.address.to_string(), init.to_string()],
        )
        .await?;

    let receipt = SwapStats::new(stats.address, &ctx.provider)
        .setSwapContract(proxy.address)
        .send()
        .await
        .wrap_err("failed to send setSwapContract")?
        .get_receipt()
        .await?;
    let link_hash = ensure_success(&receipt)?;
    info!(swap_stats = %stats.address, enhanced_swap = %proxy.address, "SwapStats linked to EnhancedSwap");

    Ok(SwapDeployReport {
        swap_stats: stats.address,
        enhanced_swap: proxy.address,
        enhanced_swap_implementation: implementation.address,
        link_transaction_hash: link_hash,
        deployer: owner,
        network: ctx.network.clone(),
    })
}

pub async fn deploy_stat_tracker<P, T>(ctx: &TaskContext<P>) -> eyre::Result<DeployReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let deployment = ctx.artifact(STAT_TRACKER)?.deploy(&ctx.provider, &[]).await?;
    Ok(DeployReport {
        name: STAT_TRACKER.to_string(),
        contract_address: deployment.address,
        deployer: ctx.sender,
        network: ctx.network.clone(),
        transaction_hash: deployment.tx_hash,
    })
}

pub async fn set_stat_tracker<P, T>(
    ctx: &TaskContext<P>,
    args: SetStatTrackerArgs,
) -> eyre::Result<LinkReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    info!(swap = %args.swap, stat_tracker = %args.stat_tracker, "setting StatTracker address");
    let receipt = Swap::new(args.swap, &ctx.provider)
        .setStatTracker(args.stat_tracker)
        .send()
        .await
        .wrap_err("failed to send setStatTracker")?
        .get_receipt()
        .await?;
    let tx_hash = ensure_success(&receipt)?;

    Ok(LinkReport {
        setter: "setStatTracker",
        contract_address: args.swap,
        linked: args.stat_tracker.to_string(),
        network: ctx.network.clone(),
        transaction_hash: tx_hash,
    })
}

pub async fn deploy_delayed_swap_executor<P, T>(
    ctx: &TaskContext<P>,
    args: DeployDelayedSwapExecutorArgs,
) -> eyre::Result<DeployReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let deployment = ctx
        .artifact(DELAYED_SWAP_EXECUTOR)?
        .deploy(&ctx.provider, &[args.swap.to_string()])
        .await?;
    Ok(DeployReport {
        name: DELAYED_SWAP_EXECUTOR.to_string(),
        contract_address: deployment.address,
        deployer: ctx.sender,
        network: ctx.network.clone(),
        transaction_hash: deployment.tx_hash,
    })
}

/// The executor forwards the recipient as `abi.encode(address)`.
pub fn encode_recipient(recipient: Address) -> Bytes {
    recipient.abi_encode().into()
}

pub async fn schedule<P, T>(
    ctx: &TaskContext<P>,
    args: ScheduleSwapArgs,
) -> eyre::Result<ScheduleReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let amount = parse_amount(&args.amount)?;

    let receipt = IERC20::new(args.input_token, &ctx.provider)
        .approve(args.executor, amount)
        .send()
        .await
        .wrap_err("failed to send token approval")?
        .get_receipt()
        .await?;
    let approve_hash = ensure_success(&receipt)?;
    info!(token = %args.input_token, %amount, tx_hash = %approve_hash, "approved executor");

    let receipt = DelayedSwapExecutor::new(args.executor, &ctx.provider)
        .scheduleSwap(
            args.input_token,
            amount,
            args.target_token,
            encode_recipient(args.recipient),
            args.withdraw,
            U256::from(args.delay),
        )
        .send()
        .await
        .wrap_err("failed to send scheduleSwap")?
        .get_receipt()
        .await?;
    let tx_hash = ensure_success(&receipt)?;
    info!(executor = %args.executor, delay = args.delay, %tx_hash, "swap scheduled");

    Ok(ScheduleReport {
        executor: args.executor,
        approve_transaction_hash: approve_hash,
        transaction_hash: tx_hash,
        sender: ctx.sender,
        amount: amount.to_string(),
    })
}

/// Move the chain clock forward and mine a block so the next call sees the new timestamp.
/// Only development nodes (anvil, hardhat) support this.
pub async fn advance_time<P, T>(provider: &P, seconds: u64) -> eyre::Result<()>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    provider
        .raw_request::<_, serde_json::Value>("evm_increaseTime".into(), (seconds,))
        .await
        .wrap_err("evm_increaseTime failed, is this a development node?")?;
    provider
        .raw_request::<_, serde_json::Value>("evm_mine".into(), ())
        .await
        .wrap_err("evm_mine failed")?;
    Ok(())
}

pub async fn execute_delayed<P, T>(
    ctx: &TaskContext<P>,
    args: ExecuteDelayedSwapArgs,
) -> eyre::Result<ExecuteReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    advance_time(&ctx.provider, args.advance).await?;
    info!(seconds = args.advance, "advanced chain clock");

    let receipt = DelayedSwapExecutor::new(args.executor, &ctx.provider)
        .executeSwap(args.order_id)
        .send()
        .await
        .wrap_err("failed to send executeSwap")?
        .get_receipt()
        .await?;
    let tx_hash = ensure_success(&receipt)?;
    info!(order_id = %args.order_id, %tx_hash, "executed swap");

    Ok(ExecuteReport {
        executor: args.executor,
        order_id: args.order_id.to_string(),
        advanced_seconds: args.advance,
        transaction_hash: tx_hash,
        network: ctx.network.clone(),
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn recipient_is_one_abi_word() {
        let recipient = address!("0x1234567890123456789012345678901234567890");
        let encoded = encode_recipient(recipient);
        assert_eq!(encoded.len(), 32);
        assert!(encoded[..12].iter().all(|b| *b == 0));
        assert_eq!(&encoded[12..], recipient.as_slice());
    }
}
