//! Bounty escrow interface
//!
//! The external bounty registry holds deposited funds and mediates
//! fulfillment, acceptance and refund. The board treats it as a pluggable
//! collaborator behind the [`BountyEscrow`] trait; the active one is chosen
//! through the settings store and every funded bounty remembers which escrow
//! holds its external id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Address, Amount, Currency, ExternalId};

pub trait BountyEscrow: Send + Sync {
    /// The escrow's account identity.
    fn address(&self) -> Address;

    /// Lightweight capability check used at settings-write time. A conforming
    /// escrow answers true; anything else is rejected as an allocator.
    fn probe(&self) -> bool;

    /// Deposits `amount` of `currency` against a new bounty entry and
    /// returns its external id.
    fn issue_and_fund(
        &self,
        metadata: &str,
        payer: &Address,
        deadline: DateTime<Utc>,
        currency: &Currency,
        amount: Amount,
    ) -> Result<ExternalId>;

    /// Records delivered work against a bounty. Invoked by fulfillers, not
    /// by the board; the board only observes the result. Returns the
    /// fulfillment index.
    fn fulfill(&self, id: ExternalId, fulfillers: &[Address], evidence: &str) -> Result<usize>;

    /// Number of fulfillments recorded against a bounty.
    fn fulfillment_count(&self, id: ExternalId) -> usize;

    /// Releases the bounty to the fulfillment at `index` with the given
    /// payout split.
    fn accept_fulfillment(&self, id: ExternalId, index: usize, payout: &[Amount]) -> Result<()>;

    /// Marks the fulfillment at `index` rejected. Funds stay escrowed.
    fn reject_fulfillment(&self, id: ExternalId, index: usize, comment: &str) -> Result<()>;

    /// Withdraws the remaining balance of a bounty, returning the refunded
    /// amount.
    fn refund(&self, id: ExternalId) -> Result<Amount>;
}

/// Maps allocator addresses to live escrow handles so a settings write can
/// resolve and probe the address it was given.
#[derive(Clone, Default)]
pub struct EscrowDirectory {
    inner: Arc<Mutex<HashMap<Address, Arc<dyn BountyEscrow>>>>,
}

impl EscrowDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, escrow: Arc<dyn BountyEscrow>) {
        self.inner.lock().insert(escrow.address(), escrow);
    }

    pub fn resolve(&self, address: &Address) -> Option<Arc<dyn BountyEscrow>> {
        self.inner.lock().get(address).cloned()
    }
}

/// One delivered-work record inside the escrow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EscrowFulfillment {
    pub fulfillers: Vec<Address>,
    pub evidence: String,
    pub accepted: bool,
    pub rejected: bool,
}

#[derive(Debug)]
struct EscrowedBounty {
    metadata: String,
    payer: Address,
    deadline: DateTime<Utc>,
    currency: Currency,
    balance: Amount,
    fulfillments: Vec<EscrowFulfillment>,
    accepted: bool,
    refunded: bool,
}

#[derive(Debug, Default)]
struct EscrowState {
    next_id: ExternalId,
    bounties: HashMap<ExternalId, EscrowedBounty>,
}

/// Escrow double holding balances in memory. Doubles as the default wiring
/// for a locally-run board.
pub struct InMemoryEscrow {
    address: Address,
    state: Mutex<EscrowState>,
}

impl InMemoryEscrow {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: Mutex::new(EscrowState {
                next_id: 1,
                bounties: HashMap::new(),
            }),
        }
    }

    /// Remaining escrowed balance for a bounty, for assertions and display.
    pub fn escrowed_balance(&self, id: ExternalId) -> Amount {
        self.state
            .lock()
            .bounties
            .get(&id)
            .map(|b| b.balance)
            .unwrap_or(0)
    }

    /// Read view of one escrowed bounty.
    pub fn entry(&self, id: ExternalId) -> Option<EscrowEntryView> {
        self.state.lock().bounties.get(&id).map(|b| EscrowEntryView {
            metadata: b.metadata.clone(),
            payer: b.payer,
            deadline: b.deadline,
            currency: b.currency,
            balance: b.balance,
            accepted: b.accepted,
            refunded: b.refunded,
            fulfillments: b.fulfillments.clone(),
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EscrowEntryView {
    pub metadata: String,
    pub payer: Address,
    pub deadline: DateTime<Utc>,
    pub currency: Currency,
    pub balance: Amount,
    pub accepted: bool,
    pub refunded: bool,
    pub fulfillments: Vec<EscrowFulfillment>,
}

impl BountyEscrow for InMemoryEscrow {
    fn address(&self) -> Address {
        self.address
    }

    fn probe(&self) -> bool {
        true
    }

    fn issue_and_fund(
        &self,
        metadata: &str,
        payer: &Address,
        deadline: DateTime<Utc>,
        currency: &Currency,
        amount: Amount,
    ) -> Result<ExternalId> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.bounties.insert(
            id,
            EscrowedBounty {
                metadata: metadata.to_string(),
                payer: *payer,
                deadline,
                currency: *currency,
                balance: amount,
                fulfillments: Vec::new(),
                accepted: false,
                refunded: false,
            },
        );
        debug!(id, %currency, amount, "escrow funded");
        Ok(id)
    }

    fn fulfill(&self, id: ExternalId, fulfillers: &[Address], evidence: &str) -> Result<usize> {
        let mut state = self.state.lock();
        let bounty = state
            .bounties
            .get_mut(&id)
            .ok_or_else(|| Error::escrow(format!("unknown bounty {id}")))?;
        if bounty.refunded {
            return Err(Error::escrow(format!("bounty {id} was refunded")));
        }
        bounty.fulfillments.push(EscrowFulfillment {
            fulfillers: fulfillers.to_vec(),
            evidence: evidence.to_string(),
            accepted: false,
            rejected: false,
        });
        Ok(bounty.fulfillments.len() - 1)
    }

    fn fulfillment_count(&self, id: ExternalId) -> usize {
        self.state
            .lock()
            .bounties
            .get(&id)
            .map(|b| b.fulfillments.len())
            .unwrap_or(0)
    }

    fn accept_fulfillment(&self, id: ExternalId, index: usize, payout: &[Amount]) -> Result<()> {
        let mut state = self.state.lock();
        let bounty = state
            .bounties
            .get_mut(&id)
            .ok_or_else(|| Error::escrow(format!("unknown bounty {id}")))?;
        if bounty.accepted {
            return Err(Error::escrow(format!("bounty {id} already paid out")));
        }
        if bounty.refunded {
            return Err(Error::escrow(format!("bounty {id} was refunded")));
        }
        let fulfillment = bounty
            .fulfillments
            .get_mut(index)
            .ok_or_else(|| Error::escrow(format!("bounty {id} has no fulfillment {index}")))?;
        let total: Amount = payout.iter().sum();
        if total != bounty.balance {
            return Err(Error::escrow(format!(
                "payout split totals {total}, escrowed {balance}",
                balance = bounty.balance
            )));
        }
        fulfillment.accepted = true;
        bounty.accepted = true;
        bounty.balance = 0;
        debug!(id, index, "escrow released");
        Ok(())
    }

    fn reject_fulfillment(&self, id: ExternalId, index: usize, comment: &str) -> Result<()> {
        let mut state = self.state.lock();
        let bounty = state
            .bounties
            .get_mut(&id)
            .ok_or_else(|| Error::escrow(format!("unknown bounty {id}")))?;
        let fulfillment = bounty
            .fulfillments
            .get_mut(index)
            .ok_or_else(|| Error::escrow(format!("bounty {id} has no fulfillment {index}")))?;
        fulfillment.rejected = true;
        debug!(id, index, comment, "escrow fulfillment rejected");
        Ok(())
    }

    fn refund(&self, id: ExternalId) -> Result<Amount> {
        let mut state = self.state.lock();
        let bounty = state
            .bounties
            .get_mut(&id)
            .ok_or_else(|| Error::escrow(format!("unknown bounty {id}")))?;
        if bounty.accepted {
            return Err(Error::escrow(format!("bounty {id} already paid out")));
        }
        if bounty.refunded {
            return Err(Error::escrow(format!("bounty {id} already refunded")));
        }
        bounty.refunded = true;
        let amount = bounty.balance;
        bounty.balance = 0;
        debug!(id, amount, "escrow refunded");
        Ok(amount)
    }
}
