use alloy::primitives::{utils::parse_ether, Address, Bytes, U256};

use crate::{
    bindings::{CallOptions, RevertOptions},
    errors::TaskError,
};

/// Gas settings attached to every transaction a transfer sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_price: u128,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertArgs {
    pub call_on_revert: bool,
    pub revert_address: Address,
    pub revert_message: String,
    pub on_revert_gas_limit: u64,
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub contract: Address,
    pub token_id: U256,
    /// Chain-agnostic encoding of the receiver, raw bytes
    pub receiver: Bytes,
    /// ZRC-20 of the destination chain's gas token
    pub destination: Address,
    pub amount: String,
    pub is_arbitrary_call: bool,
    pub revert: RevertArgs,
    pub tx: TxOptions,
}

/// The call sequence a transfer follows once the contract's capability is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferPath {
    /// Universal contract: pay the destination gas fee in ZRC-20, no value attached
    GasFee {
        gas_limit: U256,
        call_options: CallOptions,
        receiver: Bytes,
    },
    /// Connected contract: attach the amount as native value
    ValueAttached { value: U256, receiver: Address },
}

impl TransferPath {
    pub fn name(&self) -> &'static str {
        match self {
            TransferPath::GasFee { .. } => "gas-fee",
            TransferPath::ValueAttached { .. } => "value-attached",
        }
    }
}

impl TransferRequest {
    /// Pick the call sequence from the contract's `isUniversal()` answer.
    pub fn plan(&self, is_universal: bool) -> Result<TransferPath, TaskError> {
        if is_universal {
            let gas_limit = U256::from(self.tx.gas_limit);
            Ok(TransferPath::GasFee {
                gas_limit,
                call_options: CallOptions {
                    gasLimit: gas_limit,
                    isArbitraryCall: self.is_arbitrary_call,
                },
                receiver: self.receiver.clone(),
            })
        } else {
            Ok(TransferPath::ValueAttached {
                value: parse_amount(&self.amount)?,
                receiver: receiver_address(&self.receiver)?,
            })
        }
    }

    pub fn revert_options(&self) -> RevertOptions {
        (&self.revert).into()
    }
}

impl From<&RevertArgs> for RevertOptions {
    fn from(args: &RevertArgs) -> Self {
        RevertOptions {
            revertAddress: args.revert_address,
            callOnRevert: args.call_on_revert,
            abortAddress: Address::ZERO,
            revertMessage: Bytes::copy_from_slice(args.revert_message.as_bytes()),
            onRevertGasLimit: U256::from(args.on_revert_gas_limit),
        }
    }
}

/// Parse a decimal amount of the native token (18 decimals) into wei.
pub fn parse_amount(amount: &str) -> Result<U256, TaskError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(TaskError::InvalidAmount(amount.to_string()));
    }
    parse_ether(trimmed).map_err(|_| TaskError::InvalidAmount(amount.to_string()))
}

/// A connected-chain contract takes the receiver as an EVM address.
fn receiver_address(receiver: &Bytes) -> Result<Address, TaskError> {
    if receiver.len() != 20 {
        return Err(TaskError::InvalidReceiver(
            receiver.to_string(),
            format!("expected 20 bytes, got {}", receiver.len()),
        ));
    }
    Ok(Address::from_slice(receiver))
}
