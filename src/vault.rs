//! Custodial vault interface
//!
//! The vault holds the organization's treasury: token bounties are funded
//! out of it and killed bounties refund into it. The board only ever talks
//! to it through the [`Vault`] trait so the lifecycle invariants can be
//! exercised against an in-memory double.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Address, Amount, Currency};

pub trait Vault: Send + Sync {
    /// The vault's own account identity, used as payer/refund destination
    /// when talking to escrows.
    fn address(&self) -> Address;

    /// Credits the vault with `amount` of `currency`.
    fn deposit(&self, currency: &Currency, amount: Amount) -> Result<()>;

    /// Current holdings in `currency`.
    fn balance(&self, currency: &Currency) -> Amount;

    /// Debits the vault, sending `amount` of `currency` to `dest`. Fails
    /// when holdings are insufficient.
    fn transfer_out(&self, dest: &Address, currency: &Currency, amount: Amount) -> Result<()>;
}

/// Balance-map vault used for tests and for locally-wired deployments.
pub struct InMemoryVault {
    address: Address,
    balances: Mutex<HashMap<Currency, Amount>>,
}

impl InMemoryVault {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Builder-style preload, for fixtures.
    pub fn with_balance(self, currency: Currency, amount: Amount) -> Self {
        self.balances.lock().insert(currency, amount);
        self
    }
}

impl Vault for InMemoryVault {
    fn address(&self) -> Address {
        self.address
    }

    fn deposit(&self, currency: &Currency, amount: Amount) -> Result<()> {
        let mut balances = self.balances.lock();
        let entry = balances.entry(*currency).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| Error::vault(format!("balance overflow in {currency}")))?;
        debug!(%currency, amount, balance = *entry, "vault deposit");
        Ok(())
    }

    fn balance(&self, currency: &Currency) -> Amount {
        self.balances.lock().get(currency).copied().unwrap_or(0)
    }

    fn transfer_out(&self, dest: &Address, currency: &Currency, amount: Amount) -> Result<()> {
        let mut balances = self.balances.lock();
        let entry = balances.entry(*currency).or_insert(0);
        if *entry < amount {
            return Err(Error::vault(format!(
                "insufficient {currency} balance: have {entry}, need {amount}"
            )));
        }
        *entry -= amount;
        debug!(%dest, %currency, amount, balance = *entry, "vault transfer out");
        Ok(())
    }
}
