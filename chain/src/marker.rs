//! The `markTaskAsVerified` write path.

use std::sync::Arc;

use ethers::contract::abigen;
use ethers::core::types::{Address, U256};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::keccak256;
use serde::Serialize;
use tracing::{info, warn};

use taskgate_types::{TaskId, WalletAddress};

use crate::error::ChainError;

abigen!(
    RewardsContract,
    r#"[
        function markTaskAsVerified(address user, uint256 taskId)
        function hasRole(bytes32 role, address account) view returns (bool)
        event TaskVerified(address indexed user, uint256 indexed taskId)
    ]"#
);

/// Role identifier the rewards contract grants to oracle wallets.
pub fn verifier_role() -> [u8; 32] {
    keccak256(b"VERIFIER_ROLE")
}

/// Connection settings for the rewards contract.
#[derive(Clone, Debug)]
pub struct MarkerConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub verifier_private_key: String,
}

/// Receipt of a confirmed `markTaskAsVerified` transaction.
#[derive(Clone, Debug, Serialize)]
pub struct MarkReceipt {
    pub tx_hash: String,
    pub block_number: u64,
}

type VerifierClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Writes task completions to the rewards contract, signed by the
/// dedicated verifier wallet.
///
/// No gas-price strategy, no nonce management beyond the middleware's, no
/// retry on transient RPC failure: a dropped or underpriced transaction
/// surfaces as an error to the caller.
pub struct EvmTaskMarker {
    contract: RewardsContract<VerifierClient>,
    verifier: Address,
}

impl EvmTaskMarker {
    /// Build the signing client and contract binding. Performs no network
    /// I/O; bad URLs, keys, and addresses fail here.
    pub fn connect(config: &MarkerConfig) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ChainError::Config(format!("invalid rpc url: {e}")))?;

        let wallet: LocalWallet = config
            .verifier_private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| ChainError::Config(format!("invalid verifier private key: {e}")))?;
        let wallet = wallet.with_chain_id(config.chain_id);
        let verifier = wallet.address();

        let contract_address: Address = config
            .contract_address
            .parse()
            .map_err(|e| ChainError::Config(format!("invalid contract address: {e}")))?;

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = RewardsContract::new(contract_address, client);

        info!(verifier = %format!("{verifier:#x}"), contract = %config.contract_address,
              chain_id = config.chain_id, "task marker connected");
        Ok(Self { contract, verifier })
    }

    /// Address of the signing verifier wallet.
    pub fn verifier_address(&self) -> String {
        format!("{:#x}", self.verifier)
    }

    /// Mark `task` complete for `user` on the rewards contract.
    ///
    /// Checks `hasRole(VERIFIER_ROLE, verifier)` first and fails fast
    /// rather than submitting a transaction that would revert; then sends
    /// the write and waits for one confirmation.
    pub async fn mark_task_verified(
        &self,
        user: &WalletAddress,
        task: TaskId,
    ) -> Result<MarkReceipt, ChainError> {
        let user_address: Address = user
            .as_str()
            .parse()
            .map_err(|e| ChainError::Contract(format!("invalid user address: {e}")))?;

        let authorized = self
            .contract
            .has_role(verifier_role(), self.verifier)
            .call()
            .await
            .map_err(|e| ChainError::Provider(e.to_string()))?;
        if !authorized {
            warn!(verifier = %self.verifier_address(), "verifier wallet lacks VERIFIER_ROLE");
            return Err(ChainError::MissingVerifierRole(self.verifier_address()));
        }

        let call = self
            .contract
            .mark_task_as_verified(user_address, U256::from(task.0));
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::Contract(e.to_string()))?;

        let receipt = pending
            .await
            .map_err(|e| ChainError::Provider(e.to_string()))?
            .ok_or(ChainError::TransactionDropped)?;

        let mark = MarkReceipt {
            tx_hash: format!("{:#x}", receipt.transaction_hash),
            block_number: receipt.block_number.map(|b| b.as_u64()).unwrap_or(0),
        };
        info!(user = %user, task = %task, tx = %mark.tx_hash, block = mark.block_number,
              "task marked verified on-chain");
        Ok(mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MarkerConfig {
        MarkerConfig {
            rpc_url: "http://localhost:8545".into(),
            chain_id: 84532,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
            verifier_private_key:
                "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".into(),
        }
    }

    #[test]
    fn verifier_role_is_stable_and_nonzero() {
        let role = verifier_role();
        assert_eq!(role, verifier_role());
        assert_ne!(role, [0u8; 32]);
        assert_ne!(role, keccak256(b"ADMIN_ROLE"));
    }

    #[test]
    fn connect_accepts_well_formed_config() {
        let marker = EvmTaskMarker::connect(&config()).unwrap();
        // The well-known dev key above resolves to a fixed address.
        assert_eq!(
            marker.verifier_address(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn connect_rejects_bad_private_key() {
        let mut cfg = config();
        cfg.verifier_private_key = "0xnot-a-key".into();
        assert!(matches!(
            EvmTaskMarker::connect(&cfg),
            Err(ChainError::Config(_))
        ));
    }

    #[test]
    fn connect_rejects_bad_contract_address() {
        let mut cfg = config();
        cfg.contract_address = "not-an-address".into();
        assert!(matches!(
            EvmTaskMarker::connect(&cfg),
            Err(ChainError::Config(_))
        ));
    }
}
