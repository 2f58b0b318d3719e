//! User-level vault operations
//!
//! Each action checks the session, builds the contract call and hands it to
//! the [`TransactionExecutor`]. After a confirmed transaction the account
//! data in the store is refreshed from chain.

use crate::core::context::AppContext;
use crate::core::events::AlertLevel;
use crate::core::monetary::{from_usdc_units, to_usdc_units};
use crate::core::state::{BalanceUpdate, RankUpdate, RewardsUpdate, StateUpdate};
use crate::error::{Result, VaultError};
use crate::transactions::contract::{ContractCall, RankInfo, TransactionReceipt, VaultContract};
use crate::transactions::executor::{TransactionExecutor, TransactionRequest};
use crate::utils::validators::{validate_amount, validate_referral_code};
use log::{debug, info, warn};
use num_bigint::BigUint;
use std::sync::Arc;

/// Rank progress in percent, capped at 100
pub fn rank_progress(info: &RankInfo) -> f64 {
    (info.progress_to_next_rank as f64 / 10_000.0 * 100.0).min(100.0)
}

/// Rank bonus in percent
pub fn rank_bonus(info: &RankInfo) -> f64 {
    info.bonus_rate as f64 / 100.0
}

pub struct VaultActions {
    ctx: AppContext,
    contract: Arc<dyn VaultContract>,
    executor: TransactionExecutor,
}

impl VaultActions {
    pub fn new(ctx: AppContext, contract: Arc<dyn VaultContract>) -> VaultActions {
        let executor = TransactionExecutor::new(ctx.clone(), Arc::clone(&contract));
        VaultActions {
            ctx,
            contract,
            executor,
        }
    }

    pub fn executor(&self) -> &TransactionExecutor {
        &self.executor
    }

    /// Deposit `amount` USDC, approving the vault first when needed
    pub fn deposit(
        &self,
        amount: &str,
        referral_code: Option<&str>,
    ) -> Result<TransactionReceipt> {
        let owner = self.connected_account()?;
        let balance = self.ctx.store.get_state().balance.usdc;
        let units = validate_amount(amount, Some(&balance))?;

        let referral_code = match referral_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) if validate_referral_code(code) => code
                .parse::<u32>()
                .map_err(|_| VaultError::Validation("Invalid referral code".to_string()))?,
            Some(_) => {
                return Err(VaultError::Validation("Invalid referral code".to_string()));
            }
            None => 0,
        };

        self.ensure_allowance(&owner, &units)?;

        let request = TransactionRequest::new(ContractCall::Deposit {
            amount: units,
            referral_code,
        })
        .with_available(to_usdc_units(&balance)?);
        let receipt = self.executor.execute(&owner, request)?;
        self.refresh_after_transaction();
        Ok(receipt)
    }

    /// Withdraw `amount` USDC from the vault
    pub fn withdraw(&self, amount: &str) -> Result<TransactionReceipt> {
        let owner = self.connected_account()?;
        let deposits = self.ctx.store.get_state().balance.deposits;
        let units = validate_amount(amount, Some(&deposits))?;

        let request = TransactionRequest::new(ContractCall::Withdraw { amount: units })
            .with_available(to_usdc_units(&deposits)?);
        let receipt = self.executor.execute(&owner, request)?;
        self.refresh_after_transaction();
        Ok(receipt)
    }

    pub fn claim_rewards(&self) -> Result<TransactionReceipt> {
        self.submit(ContractCall::ClaimDepositReward)
    }

    pub fn claim_referral_rewards(&self) -> Result<TransactionReceipt> {
        self.submit(ContractCall::ClaimReferralReward)
    }

    pub fn generate_referral_code(&self) -> Result<TransactionReceipt> {
        self.submit(ContractCall::GenerateReferralCode)
    }

    /// Read deposits, rewards, wallet balance and rank from chain into the store
    pub fn refresh_account_data(&self) -> Result<()> {
        let owner = self.connected_account()?;

        let deposits = self.contract.deposits(&owner)?;
        let reward = self.contract.calculate_reward(&owner)?;
        let usdc = self.contract.usdc_balance(&owner)?;
        let rank = self.contract.user_rank(&owner)?;
        debug!("Refreshed account data for {owner}");

        self.ctx.store.update_state(
            StateUpdate {
                balance: Some(BalanceUpdate {
                    usdc: Some(from_usdc_units(&usdc)),
                    deposits: Some(from_usdc_units(&deposits)),
                    rewards: Some(from_usdc_units(&reward)),
                }),
                rewards: Some(RewardsUpdate {
                    pending: Some(from_usdc_units(&reward)),
                    ..Default::default()
                }),
                rank: Some(RankUpdate {
                    current: Some(rank.rank_name.clone()),
                    bonus: Some(rank_bonus(&rank)),
                    progress: Some(rank_progress(&rank)),
                }),
                ..Default::default()
            },
            false,
        );
        Ok(())
    }

    fn submit(&self, call: ContractCall) -> Result<TransactionReceipt> {
        let owner = self.connected_account()?;
        let receipt = self.executor.execute(&owner, TransactionRequest::new(call))?;
        self.refresh_after_transaction();
        Ok(receipt)
    }

    fn ensure_allowance(&self, owner: &str, amount: &BigUint) -> Result<()> {
        let spender = self.ctx.settings.vault_address()?.to_string();
        let allowance = self.contract.allowance(owner, &spender)?;
        if allowance >= *amount {
            return Ok(());
        }

        info!(
            "Allowance {} USDC below {} USDC, requesting approval",
            from_usdc_units(&allowance),
            from_usdc_units(amount)
        );
        let request = TransactionRequest::new(ContractCall::Approve {
            spender,
            amount: amount.clone(),
        })
        .with_message("Please approve USDC spending in your wallet");
        self.executor.execute(owner, request)?;
        Ok(())
    }

    fn refresh_after_transaction(&self) {
        if let Err(e) = self.refresh_account_data() {
            warn!("Failed to refresh account data: {e}");
            self.ctx
                .alerts
                .show("Failed to update dashboard data", AlertLevel::Error);
        }
    }

    fn connected_account(&self) -> Result<String> {
        let wallet = self.ctx.store.get_state().wallet;
        if !wallet.is_connected || wallet.address.is_empty() {
            return Err(VaultError::Wallet("Wallet is not connected".to_string()));
        }
        Ok(wallet.address)
    }
}
