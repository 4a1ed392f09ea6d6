//! Tasks for the universal NFT contracts

use alloy::{
    contract::Error as ContractError,
    network::Ethereum,
    primitives::Address,
    providers::Provider,
    transports::{RpcError, Transport},
};
use eyre::WrapErr;
use tracing::{debug, info};

use crate::{
    bindings::{ConnectedNFT, IUniversal, IERC721, IZRC20, UniversalNFT},
    calls::{TransferPath, TransferRequest},
    cli::{NftDeployArgs, SetConnectedArgs, SetUniversalArgs},
    context::{ensure_success, TaskContext},
    output::{DeployReport, LinkReport, TransferReport},
};

/// Deploy `args.name` with `(gateway, signer)` as constructor arguments.
pub async fn deploy<P, T>(ctx: &TaskContext<P>, args: NftDeployArgs) -> eyre::Result<DeployReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let artifact = ctx.artifact(&args.name)?;
    let deployment = artifact
        .deploy(
            &ctx.provider,
            &[args.gateway.to_string(), ctx.sender.to_string()],
        )
        .await?;

    Ok(DeployReport {
        name: args.name,
        contract_address: deployment.address,
        deployer: ctx.sender,
        network: ctx.network.clone(),
        transaction_hash: deployment.tx_hash,
    })
}

/// Whether the contract reports itself as universal.
///
/// A revert or an undecodable answer (no code, no such function) counts as "no".
/// Transport failures are returned as errors.
pub async fn is_universal<P, T>(provider: &P, contract: Address) -> eyre::Result<bool>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let answer = IUniversal::new(contract, provider)
        .isUniversal()
        .call()
        .await
        .map(|ret| ret._0);
    capability(contract, answer).wrap_err("failed to query isUniversal()")
}

fn capability(
    contract: Address,
    answer: Result<bool, ContractError>,
) -> Result<bool, ContractError> {
    match answer {
        Ok(universal) => Ok(universal),
        Err(
            e @ (ContractError::AbiError(_)
            | ContractError::TransportError(RpcError::ErrorResp(_))),
        ) => {
            debug!(%contract, error = %e, "isUniversal() failed, treating as connected contract");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub async fn transfer<P, T>(
    ctx: &TaskContext<P>,
    req: TransferRequest,
) -> eyre::Result<TransferReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let nft = IERC721::new(req.contract, &ctx.provider);
    let receipt = nft
        .approve(req.contract, req.token_id)
        .send()
        .await
        .wrap_err("failed to send NFT approval")?
        .get_receipt()
        .await?;
    let approve_hash = ensure_success(&receipt)?;
    info!(tx_hash = %approve_hash, token_id = %req.token_id, "approved NFT");

    let path = req.plan(is_universal(&ctx.provider, req.contract).await?)?;
    info!(path = path.name(), contract = %req.contract, "transferring cross-chain");

    let tx_hash = match &path {
        TransferPath::GasFee {
            gas_limit,
            call_options,
            receiver,
        } => {
            let zrc20 = IZRC20::new(req.destination, &ctx.provider);
            let gas_fee = zrc20
                .withdrawGasFeeWithGasLimit(*gas_limit)
                .call()
                .await
                .wrap_err("failed to query the destination gas fee")?
                ._1;
            debug!(%gas_fee, destination = %req.destination, "destination gas fee");

            let receipt = zrc20
                .approve(req.contract, gas_fee)
                .gas_price(req.tx.gas_price)
                .gas(req.tx.gas_limit)
                .send()
                .await
                .wrap_err("failed to send gas fee approval")?
                .get_receipt()
                .await?;
            ensure_success(&receipt)?;

            let receipt = UniversalNFT::new(req.contract, &ctx.provider)
                .transferCrossChain(
                    req.token_id,
                    receiver.clone(),
                    req.destination,
                    call_options.clone(),
                    req.revert_options(),
                )
                .gas_price(req.tx.gas_price)
                .gas(req.tx.gas_limit)
                .send()
                .await
                .wrap_err("failed to send transferCrossChain")?
                .get_receipt()
                .await?;
            ensure_success(&receipt)?
        }
        TransferPath::ValueAttached { value, receiver } => {
            let receipt = ConnectedNFT::new(req.contract, &ctx.provider)
                .transferCrossChain(
                    req.token_id,
                    *receiver,
                    req.destination,
                    req.revert_options(),
                )
                .gas_price(req.tx.gas_price)
                .gas(req.tx.gas_limit)
                .value(*value)
                .send()
                .await
                .wrap_err("failed to send transferCrossChain")?
                .get_receipt()
                .await?;
            ensure_success(&receipt)?
        }
    };

    Ok(TransferReport {
        contract_address: req.contract,
        transfer_transaction_hash: tx_hash,
        sender: ctx.sender,
        token_id: req.token_id.to_string(),
        path: path.name(),
    })
}

pub async fn set_universal<P, T>(
    ctx: &TaskContext<P>,
    args: SetUniversalArgs,
) -> eyre::Result<LinkReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let receipt = ConnectedNFT::new(args.contract, &ctx.provider)
        .setUniversal(args.universal)
        .send()
        .await
        .wrap_err("failed to send setUniversal")?
        .get_receipt()
        .await?;
    let tx_hash = ensure_success(&receipt)?;

    Ok(LinkReport {
        setter: "setUniversal",
        contract_address: args.contract,
        linked: args.universal.to_string(),
        network: ctx.network.clone(),
        transaction_hash: tx_hash,
    })
}

pub async fn set_connected<P, T>(
    ctx: &TaskContext<P>,
    args: SetConnectedArgs,
) -> eyre::Result<LinkReport>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    let receipt = UniversalNFT::new(args.contract, &ctx.provider)
        .setConnected(args.zrc20, args.connected.clone())
        .send()
        .await
        .wrap_err("failed to send setConnected")?
        .get_receipt()
        .await?;
    let tx_hash = ensure_success(&receipt)?;
    info!(contract = %args.contract, zrc20 = %args.zrc20, connected = %args.connected, "registered connected contract");

    Ok(LinkReport {
        setter: "setConnected",
        contract_address: args.contract,
        linked: args.connected.to_string(),
        network: ctx.network.clone(),
        transaction_hash: tx_hash,
    })
}
