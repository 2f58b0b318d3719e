use crate::config::FallbackGasLimits;
use crate::core::state::TransactionKind;
use crate::error::Result;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A state-changing call against the vault or the USDC token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    /// USDC allowance for the vault
    Approve { spender: String, amount: BigUint },
    /// `referral_code` is zero when none was given
    Deposit { amount: BigUint, referral_code: u32 },
    Withdraw { amount: BigUint },
    ClaimDepositReward,
    ClaimReferralReward,
    GenerateReferralCode,
}

impl ContractCall {
    /// Solidity method the call maps to
    pub fn method_name(&self) -> &'static str {
        match self {
            ContractCall::Approve { .. } => "approve",
            ContractCall::Deposit { .. } => "depositFunds",
            ContractCall::Withdraw { .. } => "withdraw",
            ContractCall::ClaimDepositReward => "claimDepositReward",
            ContractCall::ClaimReferralReward => "claimReferralReward",
            ContractCall::GenerateReferralCode => "generateReferralCode",
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            ContractCall::Approve { .. } => TransactionKind::Approve,
            ContractCall::Deposit { .. } => TransactionKind::Deposit,
            ContractCall::Withdraw { .. } => TransactionKind::Withdraw,
            ContractCall::ClaimDepositReward => TransactionKind::ClaimRewards,
            ContractCall::ClaimReferralReward => TransactionKind::ClaimReferralRewards,
            ContractCall::GenerateReferralCode => TransactionKind::GenerateReferralCode,
        }
    }

    /// Token amount moved by the call, in base units
    pub fn amount(&self) -> Option<&BigUint> {
        match self {
            ContractCall::Approve { amount, .. }
            | ContractCall::Deposit { amount, .. }
            | ContractCall::Withdraw { amount } => Some(amount),
            _ => None,
        }
    }

    /// Gas limit used when the node cannot estimate the call
    pub fn fallback_gas_limit(&self, limits: &FallbackGasLimits) -> Option<u64> {
        match self {
            ContractCall::Approve { .. } => Some(limits.approval),
            ContractCall::Deposit { .. } => Some(limits.deposit),
            ContractCall::Withdraw { .. } => Some(limits.withdraw),
            ContractCall::ClaimDepositReward | ContractCall::ClaimReferralReward => {
                Some(limits.claim)
            }
            ContractCall::GenerateReferralCode => None,
        }
    }
}

/// Gas price (wei) and limit attached to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasParameters {
    pub gas_price: BigUint,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: String,
    pub block_number: Option<u64>,
    /// False when the transaction was mined but reverted
    pub success: bool,
}

/// Rank data as stored on chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankInfo {
    pub rank_name: String,
    /// Basis points
    pub bonus_rate: u64,
    /// Basis points of the way to the next rank
    pub progress_to_next_rank: u64,
}

/// Chain access for the vault and its USDC token
///
/// Amounts are USDC base units and gas prices are wei.
pub trait VaultContract: Send + Sync {
    fn gas_price(&self) -> Result<BigUint>;

    fn estimate_gas(&self, from: &str, call: &ContractCall) -> Result<u64>;

    /// Sign and broadcast; returns the transaction hash
    fn send(&self, from: &str, call: &ContractCall, gas: &GasParameters) -> Result<String>;

    /// Block until the transaction has `confirmations` confirmations
    fn wait_for_receipt(&self, hash: &str, confirmations: u64) -> Result<TransactionReceipt>;

    fn usdc_balance(&self, owner: &str) -> Result<BigUint>;

    fn allowance(&self, owner: &str, spender: &str) -> Result<BigUint>;

    fn deposits(&self, owner: &str) -> Result<BigUint>;

    fn calculate_reward(&self, owner: &str) -> Result<BigUint>;

    fn user_rank(&self, owner: &str) -> Result<RankInfo>;
}
