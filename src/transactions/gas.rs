use crate::config::GasSettings;
use crate::core::events::AlertLevel;
use crate::core::monetary::{
    apply_percent, format_units, gwei_to_wei, parse_units, ETHER_DECIMALS, GWEI_DECIMALS,
};
use crate::error::{Result, VaultError};
use crate::notify::AlertCenter;
use crate::transactions::contract::{ContractCall, GasParameters, VaultContract};
use log::{debug, error, warn};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HIGH_COST_WARNING: &str = "This transaction requires a relatively high gas fee.";

/// Total cost of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCost {
    /// Gas cost plus value, in ETH
    pub cost: String,
    pub is_high_cost: bool,
    pub warning: Option<String>,
}

/// `gas_price * gas_limit + value`, flagged when above `threshold_eth`
pub fn transaction_cost(
    gas_price: &BigUint,
    gas_limit: u64,
    value: &BigUint,
    threshold_eth: &str,
) -> Result<TransactionCost> {
    let total = gas_price * BigUint::from(gas_limit) + value;
    let threshold = parse_units(threshold_eth, ETHER_DECIMALS)
        .map_err(|_| VaultError::Config(format!("Invalid cost threshold: {threshold_eth}")))?;

    let is_high_cost = total > threshold;
    Ok(TransactionCost {
        cost: format_units(&total, ETHER_DECIMALS),
        is_high_cost,
        warning: is_high_cost.then(|| HIGH_COST_WARNING.to_string()),
    })
}

/// Gas limit with a percentage buffer, rounded up
pub fn buffered_limit(estimate: u64, percent: u32) -> u64 {
    let scaled = estimate as u128 * percent as u128;
    scaled.div_ceil(100).min(u64::MAX as u128) as u64
}

/// Gas price and limit estimation with user warnings
pub struct GasEstimator {
    settings: GasSettings,
    contract: Arc<dyn VaultContract>,
    alerts: Arc<AlertCenter>,
}

impl GasEstimator {
    pub fn new(
        settings: GasSettings,
        contract: Arc<dyn VaultContract>,
        alerts: Arc<AlertCenter>,
    ) -> GasEstimator {
        GasEstimator {
            settings,
            contract,
            alerts,
        }
    }

    /// Current gas price in wei with the configured buffer
    ///
    /// Warns above the high threshold and refuses above the extreme one.
    /// When the node cannot be asked, the fallback price is used.
    pub fn estimate_gas_price(&self) -> Result<BigUint> {
        let price = match self.contract.gas_price() {
            Ok(price) => price,
            Err(e) => {
                warn!("Gas price estimation error: {e}");
                return Ok(gwei_to_wei(self.settings.fallback_price_gwei));
            }
        };

        if price > gwei_to_wei(self.settings.extreme_price_gwei) {
            self.alerts.show(
                "Gas prices are extremely high. Consider waiting.",
                AlertLevel::Error,
            );
            return Err(VaultError::Gas("Gas price too high".to_string()));
        }
        if price > gwei_to_wei(self.settings.high_price_gwei) {
            self.alerts
                .show("Gas prices are higher than usual.", AlertLevel::Warning);
        }

        let adjusted = apply_percent(&price, self.settings.price_buffer_percent, false);
        debug!(
            "Gas price {} gwei, submitting at {} gwei",
            format_units(&price, GWEI_DECIMALS),
            format_units(&adjusted, GWEI_DECIMALS)
        );
        Ok(adjusted)
    }

    /// Gas limit for `call` with the configured buffer
    ///
    /// If the node cannot estimate the call, the per-call fallback is used;
    /// calls without one propagate the estimation error.
    pub fn estimate_gas_limit(&self, from: &str, call: &ContractCall) -> Result<u64> {
        let estimate = match self.contract.estimate_gas(from, call) {
            Ok(estimate) => estimate,
            Err(e) => {
                warn!("Gas limit estimation error for {}: {e}", call.method_name());
                return call
                    .fallback_gas_limit(&self.settings.fallback_limits)
                    .ok_or(e);
            }
        };

        let adjusted = buffered_limit(estimate, self.settings.limit_buffer_percent);
        if adjusted > self.settings.network_max_gas_limit {
            return Err(VaultError::Gas(
                "Gas limit exceeds network maximum".to_string(),
            ));
        }
        Ok(adjusted)
    }

    /// Total cost in ETH of a transaction with `gas_limit` and `value` wei
    pub fn estimate_transaction_cost(
        &self,
        gas_limit: u64,
        value: &BigUint,
    ) -> Result<TransactionCost> {
        let gas_price = self.estimate_gas_price().map_err(|e| {
            error!("Transaction cost estimation error: {e}");
            e
        })?;
        transaction_cost(
            &gas_price,
            gas_limit,
            value,
            &self.settings.high_cost_threshold_eth,
        )
    }

    pub fn prepare_gas_parameters(
        &self,
        from: &str,
        call: &ContractCall,
    ) -> Result<GasParameters> {
        let gas_price = self.estimate_gas_price()?;
        let gas_limit = self.estimate_gas_limit(from, call)?;
        Ok(GasParameters {
            gas_price,
            gas_limit,
        })
    }

    /// Check prepared parameters against the configured bounds
    pub fn validate_gas_parameters(&self, params: &GasParameters) -> Result<()> {
        if params.gas_limit == 0 || params.gas_limit > self.settings.network_max_gas_limit {
            return Err(VaultError::Gas(format!(
                "Invalid gas limit: {}",
                params.gas_limit
            )));
        }

        let gwei = format_units(&params.gas_price, GWEI_DECIMALS);
        let in_range = gwei
            .parse::<f64>()
            .map(|price| {
                price >= self.settings.min_price_gwei && price <= self.settings.max_price_gwei
            })
            .unwrap_or(false);
        if !in_range {
            return Err(VaultError::Gas(format!("Invalid gas price: {gwei} gwei")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bus::EventBus;
    use crate::core::events::{Event, EventKind};
    use crate::testnet::{record_events, MockChain, TEST_ACCOUNT};

    fn estimator(chain: Arc<MockChain>) -> (GasEstimator, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let alerts = Arc::new(AlertCenter::new(Arc::clone(&bus), Default::default()));
        (
            GasEstimator::new(GasSettings::default(), chain, alerts),
            bus,
        )
    }

    #[test]
    fn test_gas_price_buffer() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_price = Some(gwei_to_wei(10)));
        let (gas, _) = estimator(chain);
        assert_eq!(gas.estimate_gas_price().unwrap(), gwei_to_wei(11));
    }

    #[test]
    fn test_high_gas_price_warns() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_price = Some(gwei_to_wei(50)));
        let (gas, bus) = estimator(chain);
        let seen = record_events(&bus, &[EventKind::AlertShown]);

        assert_eq!(gas.estimate_gas_price().unwrap(), gwei_to_wei(55));
        let events = seen.lock().unwrap();
        match &events[0] {
            Event::AlertShown { level, .. } => assert_eq!(*level, AlertLevel::Warning),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_extreme_gas_price_is_refused() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_price = Some(gwei_to_wei(150)));
        let (gas, _) = estimator(chain);
        assert_eq!(
            gas.estimate_gas_price().unwrap_err(),
            VaultError::Gas("Gas price too high".to_string())
        );
    }

    #[test]
    fn test_gas_price_fallback() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_price = None);
        let (gas, _) = estimator(chain);
        assert_eq!(gas.estimate_gas_price().unwrap(), gwei_to_wei(1));
    }

    #[test]
    fn test_gas_limit_buffer_and_fallback() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_estimate = Some(100_001));
        let (gas, _) = estimator(Arc::clone(&chain));
        let withdraw = ContractCall::Withdraw {
            amount: BigUint::from(1u32),
        };
        assert_eq!(gas.estimate_gas_limit(TEST_ACCOUNT, &withdraw).unwrap(), 120_002);

        chain.update(|state| state.gas_estimate = None);
        assert_eq!(gas.estimate_gas_limit(TEST_ACCOUNT, &withdraw).unwrap(), 150_000);
        assert!(gas
            .estimate_gas_limit(TEST_ACCOUNT, &ContractCall::GenerateReferralCode)
            .is_err());
    }

    #[test]
    fn test_gas_limit_above_network_max() {
        let chain = Arc::new(MockChain::new());
        chain.update(|state| state.gas_estimate = Some(29_000_000));
        let (gas, _) = estimator(chain);
        assert!(matches!(
            gas.estimate_gas_limit(TEST_ACCOUNT, &ContractCall::ClaimDepositReward),
            Err(VaultError::Gas(_))
        ));
    }

    #[test]
    fn test_transaction_cost() {
        // 1 gwei * 21000 = 0.000021 ETH
        let cost = transaction_cost(&gwei_to_wei(1), 21_000, &BigUint::from(0u32), "0.001").unwrap();
        assert_eq!(cost.cost, "0.000021");
        assert!(!cost.is_high_cost);
        assert_eq!(cost.warning, None);

        let cost = transaction_cost(&gwei_to_wei(100), 21_000, &BigUint::from(0u32), "0.001").unwrap();
        assert_eq!(cost.cost, "0.0021");
        assert!(cost.is_high_cost);
        assert_eq!(cost.warning.as_deref(), Some(HIGH_COST_WARNING));
    }

    #[test]
    fn test_validate_gas_parameters() {
        let (gas, _) = estimator(Arc::new(MockChain::new()));
        let ok = GasParameters {
            gas_price: gwei_to_wei(1),
            gas_limit: 100_000,
        };
        assert!(gas.validate_gas_parameters(&ok).is_ok());

        let no_limit = GasParameters {
            gas_limit: 0,
            ..ok.clone()
        };
        assert!(gas.validate_gas_parameters(&no_limit).is_err());

        let too_expensive = GasParameters {
            gas_price: gwei_to_wei(600),
            ..ok
        };
        assert!(gas.validate_gas_parameters(&too_expensive).is_err());
    }
}
