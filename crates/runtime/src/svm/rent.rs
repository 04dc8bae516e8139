//! Rent calculation, mirroring `original_source/include/svm/rent_calculator.h`.

use validator_sdk::{Lamports, Slot};

const SLOTS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0 * 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentConfig {
    pub lamports_per_byte_year: Lamports,
    pub exemption_threshold: f64,
    pub slots_per_epoch: Slot,
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3_480,
            exemption_threshold: 2.0,
            slots_per_epoch: 432_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentCollection {
    pub collected_rent: Lamports,
    pub new_balance: Lamports,
    pub account_destroyed: bool,
}

pub struct RentCalculator {
    config: RentConfig,
}

impl RentCalculator {
    pub fn new(config: RentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RentConfig {
        &self.config
    }

    pub fn calculate_rent(&self, data_size: usize) -> Lamports {
        if data_size == 0 {
            return 0;
        }
        let per_epoch = (data_size as f64) * (self.config.lamports_per_byte_year as f64)
            * (self.config.slots_per_epoch as f64)
            / SLOTS_PER_YEAR;
        per_epoch.floor() as Lamports
    }

    pub fn minimum_balance(&self, data_size: usize) -> Lamports {
        ((data_size as f64) * (self.config.lamports_per_byte_year as f64) * self.config.exemption_threshold)
            .floor() as Lamports
    }

    pub fn is_rent_exempt(&self, balance: Lamports, data_size: usize) -> bool {
        balance >= self.minimum_balance(data_size)
    }

    pub fn collect_rent(
        &self,
        balance: Lamports,
        data_size: usize,
        current_slot: Slot,
        rent_epoch_start_slot: Slot,
    ) -> RentCollection {
        if self.is_rent_exempt(balance, data_size) {
            return RentCollection {
                collected_rent: 0,
                new_balance: balance,
                account_destroyed: false,
            };
        }

        let slots_elapsed = current_slot.saturating_sub(rent_epoch_start_slot);
        let rent_due = ((data_size as f64)
            * (self.config.lamports_per_byte_year as f64)
            * (slots_elapsed as f64)
            / SLOTS_PER_YEAR)
            .floor() as Lamports;

        if balance >= rent_due {
            RentCollection {
                collected_rent: rent_due,
                new_balance: balance - rent_due,
                account_destroyed: false,
            }
        } else {
            RentCollection {
                collected_rent: balance,
                new_balance: 0,
                account_destroyed: true,
            }
        }
    }
}

impl Default for RentCalculator {
    fn default() -> Self {
        Self::new(RentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_account_has_zero_rent() {
        let calc = RentCalculator::default();
        assert_eq!(calc.calculate_rent(0), 0);
    }

    #[test]
    fn minimum_balance_scales_with_size_and_threshold() {
        let calc = RentCalculator::default();
        let small = calc.minimum_balance(100);
        let large = calc.minimum_balance(200);
        assert!(large > small);
        assert_eq!(large, small * 2);
    }

    #[test]
    fn exempt_account_collects_no_rent() {
        let calc = RentCalculator::default();
        let exempt_balance = calc.minimum_balance(100);
        let collection = calc.collect_rent(exempt_balance, 100, 1_000_000, 0);
        assert_eq!(collection.collected_rent, 0);
        assert!(!collection.account_destroyed);
    }

    #[test]
    fn underfunded_account_is_destroyed_rather_than_go_negative() {
        let calc = RentCalculator::default();
        let collection = calc.collect_rent(1, 100, 100_000_000, 0);
        assert!(collection.account_destroyed);
        assert_eq!(collection.new_balance, 0);
        assert_eq!(collection.collected_rent, 1);
    }
}
