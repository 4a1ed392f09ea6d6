//! Compiled contract artifacts and deployment from them.
//!
//! Artifacts are looked up by contract name under a directory laid out the way Hardhat
//! (`artifacts/**/<Name>.sol/<Name>.json`) or Foundry (`out/<Name>.sol/<Name>.json`)
//! write them. A name may be fully qualified as `contracts/Universal.sol:Universal` to pick
//! one of several contracts sharing a name. Constructor and function arguments are given as strings and coerced to
//! the parameter types declared in the artifact's ABI.

use std::path::{Path, PathBuf};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::{JsonAbi, Param},
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::TransactionRequest,
    transports::Transport,
};
use eyre::WrapErr;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::TaskError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// Hardhat: `"bytecode": "0x..."`
    Hex(Bytes),
    /// Foundry: `"bytecode": { "object": "0x...", ... }`
    Object { object: Bytes },
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    abi: JsonAbi,
    bytecode: BytecodeField,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Find and parse the artifact of contract `name` below `dir`.
    ///
    /// `name` is either a bare contract name or `source/Path.sol:Name`, the source path
    /// being relative to `dir`.
    pub fn load(dir: &Path, name: &str) -> Result<Self, TaskError> {
        let not_found = || TaskError::ArtifactNotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        };
        if !dir.is_dir() {
            return Err(not_found());
        }

        let (source, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(Path::new(source)), contract),
            None => (None, name),
        };

        let mut found = Vec::new();
        find_artifacts(dir, contract, &mut found)?;
        if let Some(source) = source {
            found.retain(|path| {
                path.parent()
                    .and_then(|parent| parent.strip_prefix(dir).ok())
                    .is_some_and(|rel| rel == source)
            });
        }

        match found.len() {
            0 => Err(not_found()),
            1 => Self::from_file(contract, &found[0]),
            _ => Err(TaskError::AmbiguousArtifact {
                name: name.to_string(),
                paths: found,
            }),
        }
    }

    pub fn from_file(name: &str, path: &Path) -> Result<Self, TaskError> {
        let parsing = |reason: String| TaskError::ArtifactParsing {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| parsing(e.to_string()))?;
        let raw: RawArtifact = serde_json::from_str(&content).map_err(|e| parsing(e.to_string()))?;

        let bytecode = match raw.bytecode {
            BytecodeField::Hex(b) | BytecodeField::Object { object: b } => b,
        };
        if bytecode.is_empty() {
            return Err(parsing(
                "empty bytecode, the contract is abstract or an interface".into(),
            ));
        }

        debug!(contract = name, path = %path.display(), "loaded artifact");
        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            abi: raw.abi,
            bytecode,
        })
    }

    /// Creation code followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(&self, args: &[String]) -> Result<Bytes, TaskError> {
        let encoded = match self.abi.constructor() {
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(TaskError::CalldataConstruction(format!(
                    "{} has no constructor but {} argument(s) were given",
                    self.name,
                    args.len()
                )))
            }
            Some(constructor) => {
                let values = coerce_args(&constructor.inputs, args)?;
                constructor
                    .abi_encode_input(&values)
                    .map_err(|e| TaskError::CalldataConstruction(e.to_string()))?
            }
        };

        Ok(self.bytecode.iter().copied().chain(encoded).collect())
    }

    /// Calldata for `function(args)`, picking the overload whose arity matches.
    pub fn calldata(&self, function: &str, args: &[String]) -> Result<Bytes, TaskError> {
        let func = self
            .abi
            .function(function)
            .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == args.len()))
            .ok_or_else(|| {
                TaskError::CalldataConstruction(format!(
                    "{} has no function {function} taking {} argument(s)",
                    self.name,
                    args.len()
                ))
            })?;

        let values = coerce_args(&func.inputs, args)?;
        func.abi_encode_input(&values)
            .map(Into::into)
            .map_err(|e| TaskError::CalldataConstruction(e.to_string()))
    }

    /// Send the creation transaction and wait for its receipt.
    pub async fn deploy<P, T>(&self, provider: &P, args: &[String]) -> eyre::Result<Deployment>
    where
        P: Provider<T, Ethereum>,
        T: Transport + Clone,
    {
        let code = self.deploy_code(args)?;
        let tx = TransactionRequest::default().with_deploy_code(code);

        info!(contract = %self.name, "sending deployment transaction");
        let receipt = provider
            .send_transaction(tx)
            .await
            .wrap_err_with(|| format!("failed to send deployment of {}", self.name))?
            .get_receipt()
            .await
            .wrap_err_with(|| format!("failed to confirm deployment of {}", self.name))?;

        let tx_hash = receipt.transaction_hash;
        if !receipt.status() {
            return Err(TaskError::Reverted(tx_hash).into());
        }
        let address = receipt
            .contract_address
            .ok_or(TaskError::ContractNotDeployed(tx_hash))?;

        info!(contract = %self.name, %address, %tx_hash, "deployed");
        Ok(Deployment { address, tx_hash })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: TxHash,
}

fn coerce_args(params: &[Param], args: &[String]) -> Result<Vec<DynSolValue>, TaskError> {
    if params.len() != args.len() {
        return Err(TaskError::CalldataConstruction(format!(
            "expected {} argument(s), got {}",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| TaskError::CalldataConstruction(e.to_string()))?;
            ty.coerce_str(arg).map_err(|e| {
                TaskError::CalldataConstruction(format!(
                    "argument {} ({}) from \"{arg}\": {e}",
                    param.name,
                    ty.sol_type_name()
                ))
            })
        })
        .collect()
}

fn find_artifacts(dir: &Path, name: &str, found: &mut Vec<PathBuf>) -> Result<(), TaskError> {
    let file_name = format!("{name}.json");
    let parent_name = format!("{name}.sol");

    let entries = std::fs::read_dir(dir).map_err(|e| TaskError::ArtifactParsing {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().and_then(|f| f.to_str()) == Some(file_name.as_str())
            && dir.file_name().and_then(|f| f.to_str()) == Some(parent_name.as_str())
        {
            found.push(path);
        }
    }

    // build-info holds compiler input and output, never artifacts
    subdirs.sort();
    for sub in subdirs {
        if sub.file_name().and_then(|f| f.to_str()) == Some("build-info") {
            continue;
        }
        find_artifacts(&sub, name, found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, hex, U256};

    use super::*;

    // Init code returning an empty runtime: PUSH1 0 PUSH1 0 RETURN
    const INIT_CODE: &str = "0x60006000f3";

    fn write_artifact(dir: &Path, rel: &str, body: serde_json::Value) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    fn nft_abi() -> serde_json::Value {
        serde_json::json!([
            {
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    { "name": "gateway", "type": "address", "internalType": "address" },
                    { "name": "owner", "type": "address", "internalType": "address" }
                ]
            },
            {
                "type": "function",
                "name": "initialize",
                "stateMutability": "nonpayable",
                "inputs": [
                    { "name": "gasLimit", "type": "uint256", "internalType": "uint256" },
                    { "name": "feeBps", "type": "uint16", "internalType": "uint16" }
                ],
                "outputs": []
            }
        ])
    }

    #[test]
    fn loads_hardhat_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/Universal.sol/Universal.dbg.json",
            serde_json::json!({ "buildInfo": "../../build-info/x.json" }),
        );
        let path = write_artifact(
            dir.path(),
            "contracts/Universal.sol/Universal.json",
            serde_json::json!({
                "_format": "hh-sol-artifact-1",
                "contractName": "Universal",
                "abi": nft_abi(),
                "bytecode": INIT_CODE,
            }),
        );

        let artifact = Artifact::load(dir.path(), "Universal").unwrap();
        assert_eq!(artifact.path, path);
        assert_eq!(artifact.bytecode, Bytes::from(hex!("60006000f3")));
        assert!(artifact.abi.constructor().is_some());
    }

    #[test]
    fn loads_foundry_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "StatTracker.sol/StatTracker.json",
            serde_json::json!({
                "abi": [],
                "bytecode": { "object": INIT_CODE, "linkReferences": {} },
            }),
        );

        let artifact = Artifact::load(dir.path(), "StatTracker").unwrap();
        assert_eq!(artifact.deploy_code(&[]).unwrap(), artifact.bytecode);
    }

    #[test]
    fn missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::load(dir.path(), "Nope").unwrap_err();
        assert!(matches!(err, TaskError::ArtifactNotFound { .. }));
    }

    #[test]
    fn same_name_in_a_dependency_is_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({ "abi": nft_abi(), "bytecode": INIT_CODE });
        let dependency = write_artifact(
            dir.path(),
            "@zetachain/standard-contracts/contracts/Universal.sol/Universal.json",
            body.clone(),
        );
        let local = write_artifact(dir.path(), "contracts/Universal.sol/Universal.json", body);

        match Artifact::load(dir.path(), "Universal") {
            Err(TaskError::AmbiguousArtifact { paths, .. }) => {
                assert_eq!(paths, vec![dependency.clone(), local.clone()]);
            }
            other => panic!("expected an ambiguity error, got {other:?}"),
        }

        let artifact = Artifact::load(dir.path(), "contracts/Universal.sol:Universal").unwrap();
        assert_eq!(artifact.path, local);
        assert_eq!(artifact.name, "Universal");

        let artifact = Artifact::load(
            dir.path(),
            "@zetachain/standard-contracts/contracts/Universal.sol:Universal",
        )
        .unwrap();
        assert_eq!(artifact.path, dependency);

        assert!(matches!(
            Artifact::load(dir.path(), "other/Universal.sol:Universal"),
            Err(TaskError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn interface_artifact_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "IERC721.sol/IERC721.json",
            serde_json::json!({ "abi": [], "bytecode": "0x" }),
        );
        assert!(matches!(
            Artifact::load(dir.path(), "IERC721"),
            Err(TaskError::ArtifactParsing { .. })
        ));
    }

    #[test]
    fn constructor_args_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "Universal.sol/Universal.json",
            serde_json::json!({ "abi": nft_abi(), "bytecode": INIT_CODE }),
        );
        let artifact = Artifact::load(dir.path(), "Universal").unwrap();

        let gateway = address!("0x9A676e781A523b5d0C0e43731313A708CB607508");
        let owner = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let code = artifact
            .deploy_code(&[gateway.to_string(), owner.to_string()])
            .unwrap();

        assert_eq!(code.len(), 5 + 64);
        assert_eq!(&code[..5], &hex!("60006000f3"));
        assert_eq!(&code[5 + 12..5 + 32], gateway.as_slice());
        assert_eq!(&code[5 + 44..], owner.as_slice());

        assert!(artifact.deploy_code(&[gateway.to_string()]).is_err());
        assert!(artifact
            .deploy_code(&["nope".into(), owner.to_string()])
            .is_err());
    }

    #[test]
    fn calldata_coerces_by_abi_type() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "EnhancedSwap.sol/EnhancedSwap.json",
            serde_json::json!({ "abi": nft_abi(), "bytecode": INIT_CODE }),
        );
        let artifact = Artifact::load(dir.path(), "EnhancedSwap").unwrap();

        let data = artifact
            .calldata("initialize", &["300000".into(), "50".into()])
            .unwrap();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(
            U256::from_be_slice(&data[4..36]),
            U256::from(300_000)
        );
        assert_eq!(U256::from_be_slice(&data[36..]), U256::from(50));
        assert!(artifact
            .calldata("initialize", &["1".into(), "fifty".into()])
            .is_err());
        assert!(artifact.calldata("missing", &[]).is_err());
    }

    #[test]
    fn contract_without_constructor_takes_no_args() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "StatTracker.sol/StatTracker.json",
            serde_json::json!({ "abi": [], "bytecode": INIT_CODE }),
        );
        let artifact = Artifact::load(dir.path(), "StatTracker").unwrap();
        assert!(artifact.deploy_code(&["1".into()]).is_err());
    }
}
