use crate::core::context::AppContext;
use crate::core::events::{AlertLevel, Event};
use crate::core::monetary::from_usdc_units;
use crate::core::state::{TransactionInfo, TransactionKind, TransactionStatus};
use crate::error::{Result, VaultError};
use crate::transactions::contract::{
    ContractCall, GasParameters, TransactionReceipt, VaultContract,
};
use crate::transactions::gas::GasEstimator;
use crate::utils::validators::validate_amount;
use log::{error, info, warn};
use num_bigint::BigUint;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const CONFIRM_IN_WALLET: &str = "Please confirm the transaction in your wallet";
const WAITING_FOR_CONFIRMATION: &str = "Waiting for confirmation...";

/// A call to submit plus what it is checked against
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub call: ContractCall,
    /// Upper bound for the call amount, in base units
    pub available: Option<BigUint>,
    /// Loading message while the wallet prompt is open
    pub message: Option<String>,
}

impl TransactionRequest {
    pub fn new(call: ContractCall) -> Self {
        Self {
            call,
            available: None,
            message: None,
        }
    }

    pub fn with_available(mut self, available: BigUint) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Alert text for a confirmed transaction
pub fn success_message(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Approve => "USDC approval confirmed",
        TransactionKind::Deposit => "Deposit successful!",
        TransactionKind::Withdraw => "Withdrawal successful!",
        TransactionKind::ClaimRewards => "Rewards claimed successfully!",
        TransactionKind::ClaimReferralRewards => "Referral rewards claimed successfully!",
        TransactionKind::GenerateReferralCode => "Referral code generated successfully!",
    }
}

/// Runs a contract call through validation, gas preparation, submission
/// and confirmation, mirroring every step into the store and the bus
pub struct TransactionExecutor {
    ctx: AppContext,
    contract: Arc<dyn VaultContract>,
    gas: GasEstimator,
}

impl TransactionExecutor {
    pub fn new(ctx: AppContext, contract: Arc<dyn VaultContract>) -> TransactionExecutor {
        let gas = GasEstimator::new(
            ctx.settings.gas.clone(),
            Arc::clone(&contract),
            Arc::clone(&ctx.alerts),
        );
        TransactionExecutor { ctx, contract, gas }
    }

    pub fn gas(&self) -> &GasEstimator {
        &self.gas
    }

    /// Submit `request` from `from` and wait for it to be mined
    ///
    /// Emits `transaction:started`, then either `transaction:success` and
    /// `transaction:confirmed` or `transaction:error`. The loading flag is
    /// cleared whatever the outcome.
    pub fn execute(&self, from: &str, request: TransactionRequest) -> Result<TransactionReceipt> {
        let kind = request.call.kind();
        let outcome = self.run(from, &request);
        self.ctx.store.set_loading(false, "");

        match outcome {
            Ok(receipt) => {
                info!("{kind} transaction {} confirmed", receipt.hash);
                self.ctx.bus.emit(Event::TransactionSuccess {
                    kind,
                    hash: receipt.hash.clone(),
                });
                self.ctx.bus.emit(Event::TransactionConfirmed {
                    hash: receipt.hash.clone(),
                    block_number: receipt.block_number,
                });
                self.ctx
                    .alerts
                    .show(success_message(kind), AlertLevel::Success);
                Ok(receipt)
            }
            Err(e) => {
                error!("{kind} transaction failed: {e}");
                self.ctx.bus.emit(Event::TransactionError {
                    kind,
                    error: e.to_string(),
                });
                if e.is_user_rejection() {
                    self.ctx
                        .alerts
                        .show("Transaction was rejected", AlertLevel::Warning);
                } else {
                    self.ctx.alerts.show(e.to_string(), AlertLevel::Error);
                }
                Err(e)
            }
        }
    }

    fn run(&self, from: &str, request: &TransactionRequest) -> Result<TransactionReceipt> {
        self.validate(request)?;

        let kind = request.call.kind();
        self.ctx.bus.emit(Event::TransactionStarted { kind });
        self.ctx.store.set_loading(
            true,
            request.message.as_deref().unwrap_or(CONFIRM_IN_WALLET),
        );

        let gas = self.prepare_gas(from, &request.call)?;
        let hash = self.send_with_retry(from, &request.call, &gas)?;
        self.confirm(&hash, &request.call)
    }

    fn validate(&self, request: &TransactionRequest) -> Result<()> {
        match (&request.call, request.call.amount()) {
            (ContractCall::Deposit { .. } | ContractCall::Withdraw { .. }, Some(amount)) => {
                let available = request.available.as_ref().map(from_usdc_units);
                validate_amount(&from_usdc_units(amount), available.as_deref())?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn prepare_gas(&self, from: &str, call: &ContractCall) -> Result<GasParameters> {
        let prepared = self
            .gas
            .prepare_gas_parameters(from, call)
            .and_then(|params| {
                self.gas.validate_gas_parameters(&params)?;
                Ok(params)
            });
        prepared.map_err(|e| {
            error!("Gas parameter preparation error: {e}");
            VaultError::Gas("Failed to prepare gas parameters".to_string())
        })
    }

    /// Broadcast, retrying transient failures
    ///
    /// Only the broadcast itself is retried; once a hash exists the call is
    /// never sent again.
    fn send_with_retry(
        &self,
        from: &str,
        call: &ContractCall,
        gas: &GasParameters,
    ) -> Result<String> {
        let settings = &self.ctx.settings.transactions;
        let max_attempts = settings.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.contract.send(from, call, gas) {
                Ok(hash) => return Ok(hash),
                Err(e) if e.is_user_rejection() || attempt >= max_attempts => return Err(e),
                Err(e) => {
                    warn!(
                        "{} attempt {attempt}/{max_attempts} failed: {e}",
                        call.method_name()
                    );
                    thread::sleep(Duration::from_millis(settings.retry_delay_ms));
                }
            }
        }
    }

    fn confirm(&self, hash: &str, call: &ContractCall) -> Result<TransactionReceipt> {
        let info = |status| {
            let info = TransactionInfo::new(status).with_kind(call.kind());
            match call.amount() {
                Some(amount) => info.with_amount(from_usdc_units(amount)),
                None => info,
            }
        };

        self.ctx
            .store
            .update_transaction(hash, info(TransactionStatus::Pending));
        self.ctx.store.set_loading(true, WAITING_FOR_CONFIRMATION);

        let confirmations = self.ctx.settings.transactions.confirmation_blocks;
        let receipt = match self.contract.wait_for_receipt(hash, confirmations) {
            Ok(receipt) => receipt,
            Err(e) => {
                self.ctx.store.update_transaction(
                    hash,
                    info(TransactionStatus::Failed).with_error(e.to_string()),
                );
                return Err(e);
            }
        };

        if !receipt.success {
            let message = format!("Transaction {hash} reverted");
            self.ctx.store.update_transaction(
                hash,
                info(TransactionStatus::Failed).with_error(message.clone()),
            );
            return Err(VaultError::Transaction(message));
        }

        self.ctx
            .store
            .update_transaction(hash, info(TransactionStatus::Success));
        Ok(receipt)
    }
}
