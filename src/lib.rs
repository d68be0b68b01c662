//! Bounty Board - fund, assign, and settle bounties on registered repos
//!
//! Tracks development bounties attached to externally-identified
//! repositories and issues, routes attached funds through a custodial vault
//! and an external bounty escrow, and governs the full lifecycle of an
//! issue from open-for-assignment through fulfilled-and-paid or withdrawn.
//!
//! # How it works
//!
//! 1. Repos are registered by their externally-supplied ids
//! 2. A manager funds issues in bulk; each bounty is deposited into the
//!    active escrow, which hands back an external id
//! 3. Workers request assignment; a reviewer accepts one, making them the
//!    assignee (bounties funded through the open path skip this gate)
//! 4. Delivered work is recorded in the escrow and reviewed; acceptance
//!    releases the payout and settles the bounty
//! 5. A live, unfulfilled bounty can be killed at any time, refunding its
//!    full size to the vault in the funded currency
//!
//! # Guarantees
//!
//! - Batched funding and killing are all-or-nothing: one bad entry aborts
//!   the whole batch before any funds move
//! - A bounty settles at most once; a killed bounty cannot settle and a
//!   settled bounty cannot be killed
//! - Every bounty resolves against the escrow that holds its funds, even
//!   after the active allocator is swapped out

pub mod board;
pub mod config;
pub mod curation;
pub mod error;
pub mod escrow;
pub mod registry;
pub mod server;
pub mod settings;
pub mod types;
pub mod vault;

pub use board::{BountyBoard, IssueMetadata, MAX_BATCH};
pub use curation::{CurationEntry, CurationLedger};
pub use error::{Error, Result};
pub use escrow::{BountyEscrow, EscrowDirectory, InMemoryEscrow};
pub use registry::RepoRegistry;
pub use settings::BountySettings;
pub use types::{
    Address, Amount, Application, ApplicationStatus, BountyReceipt, Currency, ExternalId,
    IssueView, RepoId,
};
pub use vault::{InMemoryVault, Vault};
