//! Issue & bounty lifecycle
//!
//! The central state machine. Tracks per-(repo, issue) bounty funding,
//! assignment requests and submission review, delegating fund custody to
//! the vault and fund accounting to the external bounty escrow. Every
//! state-changing call runs under one write lock and either fully commits
//! or fully fails; batched calls validate their whole input set before the
//! first external call is made.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::curation::{CurationEntry, CurationLedger};
use crate::error::{Error, Result};
use crate::escrow::BountyEscrow;
use crate::registry::RepoRegistry;
use crate::settings::BountySettings;
use crate::types::{
    Address, Amount, Application, ApplicationStatus, BountyReceipt, Currency, ExternalId,
    IssueView, RepoId,
};
use crate::vault::Vault;

/// Hard cap on batched funding/removal calls.
pub const MAX_BATCH: usize = 256;

/// Display/deadline metadata carried by a live bounty.
#[derive(Clone, Debug, Serialize)]
pub struct IssueMetadata {
    pub data: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    /// Funding instance counter for this (repo, issue); bumps on every
    /// funding so a re-funded issue is never confused with its predecessor.
    pub generation: u64,
}

struct IssueRecord {
    has_bounty: bool,
    external_id: Option<ExternalId>,
    fulfilled: bool,
    bounty_size: Amount,
    currency: Currency,
    assignee: Option<Address>,
    /// Set when funded through the no-assignment path; such bounties never
    /// take assignment review.
    open_submission: bool,
    applicants: Vec<Application>,
    deadline: Option<DateTime<Utc>>,
    data: String,
    description: String,
    generation: u64,
    /// The escrow holding this funding's external id. Kill and settlement
    /// always resolve against this handle, not the currently-configured
    /// allocator.
    allocator: Option<Arc<dyn BountyEscrow>>,
}

impl IssueRecord {
    fn new() -> Self {
        Self {
            has_bounty: false,
            external_id: None,
            fulfilled: false,
            bounty_size: 0,
            currency: Currency::Native,
            assignee: None,
            open_submission: false,
            applicants: Vec::new(),
            deadline: None,
            data: String::new(),
            description: String::new(),
            generation: 0,
            allocator: None,
        }
    }

    fn view(&self) -> IssueView {
        IssueView {
            has_bounty: self.has_bounty,
            external_id: self.external_id,
            fulfilled: self.fulfilled,
            bounty_size: self.bounty_size,
            assignee: self.assignee,
        }
    }
}

struct BoardState {
    repos: RepoRegistry,
    issues: HashMap<(RepoId, u64), IssueRecord>,
    settings: BountySettings,
    allocator: Arc<dyn BountyEscrow>,
    curations: CurationLedger,
}

/// The bounty board. One instance owns all lifecycle state; collaborators
/// (vault, escrow) are injected and reached through their traits.
pub struct BountyBoard {
    state: RwLock<BoardState>,
    vault: Arc<dyn Vault>,
}

struct FundPlan {
    repo_id: RepoId,
    issue_number: u64,
    size: Amount,
    deadline: DateTime<Utc>,
    currency: Currency,
}

impl BountyBoard {
    /// Creates a board wired to the given escrow and vault. The escrow must
    /// answer the capability probe, same as any later allocator change.
    pub fn new(escrow: Arc<dyn BountyEscrow>, vault: Arc<dyn Vault>) -> Result<Self> {
        let settings = BountySettings {
            bounty_allocator: escrow.address(),
            ..BountySettings::default()
        };
        Self::with_settings(escrow, vault, settings)
    }

    pub fn with_settings(
        escrow: Arc<dyn BountyEscrow>,
        vault: Arc<dyn Vault>,
        mut settings: BountySettings,
    ) -> Result<Self> {
        if escrow.address().is_zero() || !escrow.probe() {
            return Err(Error::InvalidAllocator);
        }
        settings.validate()?;
        settings.bounty_allocator = escrow.address();
        Ok(Self {
            state: RwLock::new(BoardState {
                repos: RepoRegistry::new(),
                issues: HashMap::new(),
                settings,
                allocator: escrow,
                curations: CurationLedger::new(),
            }),
            vault,
        })
    }

    // ========================================================================
    // REPO REGISTRY
    // ========================================================================

    pub fn add_repo(&self, id: RepoId) -> Result<()> {
        let mut state = self.state.write();
        state.repos.add(id.clone())?;
        info!("Registered repo {}", id);
        Ok(())
    }

    /// Unregisters a repo. Issue records under it stay stored but become
    /// unreachable until the repo is registered again.
    pub fn remove_repo(&self, id: &RepoId) -> Result<()> {
        let mut state = self.state.write();
        state.repos.remove(id)?;
        info!("Removed repo {}", id);
        Ok(())
    }

    pub fn is_registered(&self, id: &RepoId) -> bool {
        self.state.read().repos.contains(id)
    }

    pub fn repo_count(&self) -> usize {
        self.state.read().repos.len()
    }

    /// Current registry position of a repo. Unstable across removals.
    pub fn repo_index(&self, id: &RepoId) -> Result<usize> {
        self.state.read().repos.position(id)
    }

    pub fn repos(&self) -> Vec<RepoId> {
        self.state.read().repos.iter().cloned().collect()
    }

    // ========================================================================
    // BOUNTY FUNDING
    // ========================================================================

    /// Funds a batch of issues. Entries are processed in input order; the
    /// receipts preserve that order. `deposit` stands for the native funds
    /// attached to the call and must equal the sum of native-denominated
    /// entries; token entries draw on the vault.
    #[allow(clippy::too_many_arguments)]
    pub fn add_bounties(
        &self,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        bounty_sizes: &[Amount],
        deadlines: &[DateTime<Utc>],
        token_types: &[u16],
        token_contracts: &[Address],
        metadata: &str,
        description: &str,
        deposit: Amount,
    ) -> Result<Vec<BountyReceipt>> {
        self.fund(
            repo_ids,
            issue_numbers,
            bounty_sizes,
            deadlines,
            token_types,
            token_contracts,
            metadata,
            description,
            deposit,
            true,
        )
    }

    /// Same as [`add_bounties`](Self::add_bounties), but the bounties stay
    /// open: first qualified submission wins and assignment review is
    /// permanently disabled for these records.
    #[allow(clippy::too_many_arguments)]
    pub fn add_bounties_no_assignment(
        &self,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        bounty_sizes: &[Amount],
        deadlines: &[DateTime<Utc>],
        token_types: &[u16],
        token_contracts: &[Address],
        metadata: &str,
        description: &str,
        deposit: Amount,
    ) -> Result<Vec<BountyReceipt>> {
        self.fund(
            repo_ids,
            issue_numbers,
            bounty_sizes,
            deadlines,
            token_types,
            token_contracts,
            metadata,
            description,
            deposit,
            false,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn fund(
        &self,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        bounty_sizes: &[Amount],
        deadlines: &[DateTime<Utc>],
        token_types: &[u16],
        token_contracts: &[Address],
        metadata: &str,
        description: &str,
        deposit: Amount,
        assignable: bool,
    ) -> Result<Vec<BountyReceipt>> {
        let mut state = self.state.write();

        // Plan: every precondition is checked before any funds move.
        let count = check_batch(&[
            repo_ids.len(),
            issue_numbers.len(),
            bounty_sizes.len(),
            deadlines.len(),
            token_types.len(),
            token_contracts.len(),
        ])?;

        let mut plans = Vec::with_capacity(count);
        let mut native_total: Amount = 0;
        let mut vault_needs: HashMap<Currency, Amount> = HashMap::new();
        for i in 0..count {
            if !state.repos.contains(&repo_ids[i]) {
                return Err(Error::not_found(format!("repo {}", repo_ids[i])));
            }
            let currency = Currency::from_token_config(token_types[i], token_contracts[i])?;
            match currency {
                Currency::Native => native_total += bounty_sizes[i],
                Currency::Token(_) => *vault_needs.entry(currency).or_insert(0) += bounty_sizes[i],
            }
            plans.push(FundPlan {
                repo_id: repo_ids[i].clone(),
                issue_number: issue_numbers[i],
                size: bounty_sizes[i],
                deadline: deadlines[i],
                currency,
            });
        }
        if deposit != native_total {
            return Err(Error::DepositMismatch {
                expected: native_total,
                got: deposit,
            });
        }
        for (currency, needed) in &vault_needs {
            let held = self.vault.balance(currency);
            if held < *needed {
                return Err(Error::vault(format!(
                    "insufficient {currency} balance: have {held}, need {needed}"
                )));
            }
        }

        // Execute: fund the escrow entry for each bounty, in input order.
        let allocator = state.allocator.clone();
        let payer = self.vault.address();
        let mut issued: Vec<(ExternalId, Currency, Amount)> = Vec::with_capacity(count);
        for plan in &plans {
            if let Currency::Token(_) = plan.currency {
                if let Err(e) =
                    self.vault
                        .transfer_out(&allocator.address(), &plan.currency, plan.size)
                {
                    self.unwind_issued(&allocator, &issued);
                    return Err(e);
                }
            }
            match allocator.issue_and_fund(
                metadata,
                &payer,
                plan.deadline,
                &plan.currency,
                plan.size,
            ) {
                Ok(id) => issued.push((id, plan.currency, plan.size)),
                Err(e) => {
                    error!("Escrow funding failed mid-batch: {}", e);
                    self.unwind_issued(&allocator, &issued);
                    if let Currency::Token(_) = plan.currency {
                        // The transfer for this entry already left the vault.
                        let _ = self.vault.deposit(&plan.currency, plan.size);
                    }
                    return Err(e);
                }
            }
        }

        // Commit: overwrite each issue record as a fresh funding instance.
        let mut receipts = Vec::with_capacity(count);
        for (plan, (external_id, currency, size)) in plans.iter().zip(&issued) {
            let record = state
                .issues
                .entry((plan.repo_id.clone(), plan.issue_number))
                .or_insert_with(IssueRecord::new);
            record.has_bounty = true;
            record.external_id = Some(*external_id);
            record.fulfilled = false;
            record.bounty_size = *size;
            record.currency = *currency;
            record.assignee = None;
            record.open_submission = !assignable;
            record.applicants.clear();
            record.deadline = Some(plan.deadline);
            record.data = metadata.to_string();
            record.description = description.to_string();
            record.generation += 1;
            record.allocator = Some(allocator.clone());

            info!(
                "Funded bounty of {} ({}) on {}#{} as escrow entry {}",
                size, currency, plan.repo_id, plan.issue_number, external_id
            );
            receipts.push(BountyReceipt {
                repo_id: plan.repo_id.clone(),
                issue_number: plan.issue_number,
                bounty_size: *size,
                external_id: *external_id,
            });
        }
        Ok(receipts)
    }

    /// Best-effort compensation for a batch that failed after some entries
    /// were already escrowed: refund them back into the vault.
    fn unwind_issued(
        &self,
        allocator: &Arc<dyn BountyEscrow>,
        issued: &[(ExternalId, Currency, Amount)],
    ) {
        for (id, currency, amount) in issued {
            match allocator.refund(*id) {
                Ok(refunded) => {
                    if let Err(e) = self.vault.deposit(currency, refunded) {
                        warn!("Could not return refund for escrow entry {}: {}", id, e);
                    }
                }
                Err(e) => warn!(
                    "Could not unwind escrow entry {} holding {}: {}",
                    id, amount, e
                ),
            }
        }
    }

    /// Updates display/deadline metadata of a live bounty. Funding, assignee
    /// and review state are untouched.
    pub fn update_bounty(
        &self,
        repo_id: &RepoId,
        issue_number: u64,
        data: &str,
        new_deadline: DateTime<Utc>,
        description: &str,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        let record = state
            .issues
            .get_mut(&(repo_id.clone(), issue_number))
            .filter(|r| r.has_bounty)
            .ok_or_else(|| Error::not_found(format!("bounty on {repo_id}#{issue_number}")))?;
        record.data = data.to_string();
        record.deadline = Some(new_deadline);
        record.description = description.to_string();
        info!("Updated bounty metadata on {}#{}", repo_id, issue_number);
        Ok(())
    }

    /// Kills a batch of live bounties, refunding each into the vault in its
    /// funded currency. All-or-nothing: one bad entry fails the whole batch
    /// before any funds move.
    pub fn remove_bounties(
        &self,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        reason: &str,
    ) -> Result<()> {
        let mut state = self.state.write();

        // Plan.
        let count = check_batch(&[repo_ids.len(), issue_numbers.len()])?;
        let mut seen: HashSet<(RepoId, u64)> = HashSet::new();
        for i in 0..count {
            if !state.repos.contains(&repo_ids[i]) {
                return Err(Error::not_found(format!("repo {}", repo_ids[i])));
            }
            let key = (repo_ids[i].clone(), issue_numbers[i]);
            if !seen.insert(key.clone()) {
                return Err(Error::AlreadyRemoved);
            }
            match state.issues.get(&key) {
                None => {
                    return Err(Error::not_found(format!(
                        "bounty on {}#{}",
                        repo_ids[i], issue_numbers[i]
                    )))
                }
                Some(record) if record.fulfilled => return Err(Error::AlreadyFulfilled),
                Some(record) if !record.has_bounty => {
                    if record.generation > 0 {
                        return Err(Error::AlreadyRemoved);
                    }
                    return Err(Error::not_found(format!(
                        "bounty on {}#{}",
                        repo_ids[i], issue_numbers[i]
                    )));
                }
                Some(_) => {}
            }
        }

        // Execute: pull each refund out of its own escrow into the vault.
        for i in 0..count {
            let key = (repo_ids[i].clone(), issue_numbers[i]);
            let record = &state.issues[&key];
            let allocator = record
                .allocator
                .clone()
                .ok_or_else(|| Error::escrow("live bounty without an escrow handle"))?;
            let external_id = record
                .external_id
                .ok_or_else(|| Error::escrow("live bounty without an external id"))?;
            let currency = record.currency;
            let refunded = allocator.refund(external_id).map_err(|e| {
                error!("Escrow refund failed mid-batch: {}", e);
                e
            })?;
            self.vault.deposit(&currency, refunded)?;
        }

        // Commit.
        for i in 0..count {
            let key = (repo_ids[i].clone(), issue_numbers[i]);
            let record = state.issues.get_mut(&key).expect("validated above");
            info!(
                "Killed bounty of {} on {}#{}: {}",
                record.bounty_size, repo_ids[i], issue_numbers[i], reason
            );
            record.has_bounty = false;
            record.bounty_size = 0;
            record.external_id = None;
            record.allocator = None;
        }
        Ok(())
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Bounty state of an issue. A never-funded issue under a registered
    /// repo reads as the zero view.
    pub fn get_issue(&self, repo_id: &RepoId, issue_number: u64) -> Result<IssueView> {
        let state = self.state.read();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        Ok(state
            .issues
            .get(&(repo_id.clone(), issue_number))
            .map(|r| r.view())
            .unwrap_or_default())
    }

    /// Display metadata of a live bounty.
    pub fn issue_metadata(&self, repo_id: &RepoId, issue_number: u64) -> Result<IssueMetadata> {
        let state = self.state.read();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        state
            .issues
            .get(&(repo_id.clone(), issue_number))
            .filter(|r| r.has_bounty)
            .map(|r| IssueMetadata {
                data: r.data.clone(),
                description: r.description.clone(),
                deadline: r.deadline,
                generation: r.generation,
            })
            .ok_or_else(|| Error::not_found(format!("bounty on {repo_id}#{issue_number}")))
    }

    // ========================================================================
    // ASSIGNMENT WORKFLOW
    // ========================================================================

    /// Appends an unreviewed assignment request from `applicant`. At most
    /// one unreviewed request per applicant per issue.
    pub fn request_assignment(
        &self,
        repo_id: &RepoId,
        issue_number: u64,
        applicant: Address,
        pitch: &str,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        let record = state
            .issues
            .entry((repo_id.clone(), issue_number))
            .or_insert_with(IssueRecord::new);
        let pending = record
            .applicants
            .iter()
            .any(|a| a.applicant == applicant && a.status == ApplicationStatus::Unreviewed);
        if pending {
            return Err(Error::DuplicateApplication);
        }
        record.applicants.push(Application {
            applicant,
            pitch: pitch.to_string(),
            status: ApplicationStatus::Unreviewed,
        });
        info!(
            "Assignment requested by {} on {}#{}",
            applicant, repo_id, issue_number
        );
        Ok(())
    }

    /// Application at `index`, in insertion order.
    pub fn applicant(&self, repo_id: &RepoId, issue_number: u64, index: usize) -> Result<Application> {
        let state = self.state.read();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        state
            .issues
            .get(&(repo_id.clone(), issue_number))
            .and_then(|r| r.applicants.get(index))
            .cloned()
            .ok_or_else(|| {
                Error::not_found(format!("application {index} on {repo_id}#{issue_number}"))
            })
    }

    pub fn applicants_len(&self, repo_id: &RepoId, issue_number: u64) -> Result<usize> {
        let state = self.state.read();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        Ok(state
            .issues
            .get(&(repo_id.clone(), issue_number))
            .map(|r| r.applicants.len())
            .unwrap_or(0))
    }

    /// Reviews the unreviewed application from `applicant`. Accepting sets
    /// the issue's assignee; rejecting leaves it unset. Matching targets
    /// unreviewed entries only, so re-reviewing a decided application fails
    /// the same way as reviewing one that never existed.
    pub fn review_application(
        &self,
        repo_id: &RepoId,
        issue_number: u64,
        applicant: Address,
        comment: &str,
        accept: bool,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        let record = state
            .issues
            .get_mut(&(repo_id.clone(), issue_number))
            .ok_or_else(|| {
                Error::not_found(format!("application on {repo_id}#{issue_number}"))
            })?;
        if record.open_submission {
            return Err(Error::OpenBountyNotAssignable);
        }
        let application = record
            .applicants
            .iter_mut()
            .find(|a| a.applicant == applicant && a.status == ApplicationStatus::Unreviewed)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "unreviewed application from {applicant} on {repo_id}#{issue_number}"
                ))
            })?;
        if accept {
            application.status = ApplicationStatus::Accepted;
            record.assignee = Some(applicant);
            info!(
                "Assigned {}#{} to {}: {}",
                repo_id, issue_number, applicant, comment
            );
        } else {
            application.status = ApplicationStatus::Rejected;
            info!(
                "Rejected assignment of {} on {}#{}: {}",
                applicant, repo_id, issue_number, comment
            );
        }
        Ok(())
    }

    // ========================================================================
    // SUBMISSION REVIEW
    // ========================================================================

    /// Reviews delivered work recorded in the escrow at `submission_index`.
    /// Accepting releases the payout and settles the bounty; a second accept
    /// fails. Rejecting forwards the rejection to the escrow and leaves the
    /// bounty open for further submissions.
    pub fn review_submission(
        &self,
        repo_id: &RepoId,
        issue_number: u64,
        submission_index: usize,
        accept: bool,
        comment: &str,
        payout: &[Amount],
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.repos.contains(repo_id) {
            return Err(Error::not_found(format!("repo {repo_id}")));
        }
        let record = state
            .issues
            .get_mut(&(repo_id.clone(), issue_number))
            .filter(|r| r.has_bounty)
            .ok_or_else(|| Error::not_found(format!("bounty on {repo_id}#{issue_number}")))?;
        if record.fulfilled {
            return Err(Error::AlreadyFulfilled);
        }
        let allocator = record
            .allocator
            .clone()
            .ok_or_else(|| Error::escrow("live bounty without an escrow handle"))?;
        let external_id = record
            .external_id
            .ok_or_else(|| Error::escrow("live bounty without an external id"))?;
        if submission_index >= allocator.fulfillment_count(external_id) {
            return Err(Error::not_found(format!(
                "submission {submission_index} on {repo_id}#{issue_number}"
            )));
        }
        if accept {
            allocator.accept_fulfillment(external_id, submission_index, payout)?;
            record.fulfilled = true;
            info!(
                "Accepted submission {} on {}#{}: {}",
                submission_index, repo_id, issue_number, comment
            );
        } else {
            allocator.reject_fulfillment(external_id, submission_index, comment)?;
            info!(
                "Rejected submission {} on {}#{}: {}",
                submission_index, repo_id, issue_number, comment
            );
        }
        Ok(())
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    /// Replaces the bounty settings, swapping the active allocator for
    /// future fundings. Live bounties keep resolving against the escrow
    /// that holds their external id.
    pub fn change_bounty_settings(
        &self,
        xp_multipliers: Vec<u64>,
        experience_levels: Vec<String>,
        base_rate: u64,
        bounty_deadline_offset: u64,
        bounty_currency: Option<Address>,
        allocator: Arc<dyn BountyEscrow>,
    ) -> Result<()> {
        let settings = BountySettings {
            xp_multipliers,
            experience_levels,
            base_rate,
            bounty_deadline_offset,
            bounty_currency,
            bounty_allocator: allocator.address(),
        };
        settings.validate()?;
        if allocator.address().is_zero() || !allocator.probe() {
            return Err(Error::InvalidAllocator);
        }
        let mut state = self.state.write();
        state.settings = settings;
        state.allocator = allocator;
        info!(
            "Bounty settings changed, allocator now {}",
            state.settings.bounty_allocator
        );
        Ok(())
    }

    pub fn settings(&self) -> BountySettings {
        self.state.read().settings.clone()
    }

    // ========================================================================
    // CURATION
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    pub fn curate_issues(
        &self,
        priorities: &[u64],
        description_indices: &[usize],
        issue_descriptions: &str,
        description: &str,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        curation_id: u64,
    ) -> Result<()> {
        let mut state = self.state.write();
        state.curations.curate(
            priorities,
            description_indices,
            issue_descriptions,
            description,
            repo_ids,
            issue_numbers,
            curation_id,
        )?;
        info!("Curated {} issues under id {}", priorities.len(), curation_id);
        Ok(())
    }

    pub fn curations(&self) -> Vec<CurationEntry> {
        self.state.read().curations.entries().to_vec()
    }
}

fn check_batch(lengths: &[usize]) -> Result<usize> {
    let count = lengths[0];
    if lengths.iter().any(|&l| l != count) {
        return Err(Error::LengthMismatch);
    }
    if count > MAX_BATCH {
        return Err(Error::LengthExceeded(count));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escrow::InMemoryEscrow;
    use crate::vault::InMemoryVault;
    use chrono::Duration;

    const REPO: &str = "MDEwOlJlcG9zaXRvcnkxNjY3Mjk=";

    fn addr(value: u64) -> Address {
        Address::from_low_u64(value)
    }

    fn deadline() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    struct Fixture {
        board: BountyBoard,
        vault: Arc<InMemoryVault>,
        escrow: Arc<InMemoryEscrow>,
    }

    fn fixture() -> Fixture {
        let vault = Arc::new(InMemoryVault::new(addr(0xfa)));
        let escrow = Arc::new(InMemoryEscrow::new(addr(0xe5)));
        let board = BountyBoard::new(escrow.clone(), vault.clone()).unwrap();
        board.add_repo(RepoId::from(REPO)).unwrap();
        Fixture {
            board,
            vault,
            escrow,
        }
    }

    fn repo() -> RepoId {
        RepoId::from(REPO)
    }

    /// Funds native bounties of 10, 20, 30 on issues 1..=3.
    fn fund_three(board: &BountyBoard) -> Vec<BountyReceipt> {
        board
            .add_bounties(
                &[repo(), repo(), repo()],
                &[1, 2, 3],
                &[10, 20, 30],
                &[deadline(), deadline(), deadline()],
                &[0, 0, 0],
                &[Address::ZERO, Address::ZERO, Address::ZERO],
                "QmbUSy8HCn8J4TMDRRdxCbK2uCCtkQyZtY6XYv3y7kLgDC",
                "something",
                60,
            )
            .unwrap()
    }

    fn fund_one(board: &BountyBoard, issue_number: u64, size: Amount) -> BountyReceipt {
        board
            .add_bounties(
                &[repo()],
                &[issue_number],
                &[size],
                &[deadline()],
                &[0],
                &[Address::ZERO],
                "QmbUSy8HCn8J4TMDRRdxCbK2uCCtkQyZtY6XYv3y7kLgDC",
                "test description",
                size,
            )
            .unwrap()
            .remove(0)
    }

    /// Walks an issue through assignment and fulfillment, up to (not
    /// including) submission review.
    fn assign_and_fulfill(fx: &Fixture, issue_number: u64, worker: Address) -> usize {
        fx.board
            .request_assignment(&repo(), issue_number, worker, "Qm-pitch")
            .unwrap();
        fx.board
            .review_application(&repo(), issue_number, worker, "Qm-comment", true)
            .unwrap();
        let external_id = fx
            .board
            .get_issue(&repo(), issue_number)
            .unwrap()
            .external_id
            .unwrap();
        fx.escrow.fulfill(external_id, &[worker], "test").unwrap()
    }

    // ------------------------------------------------------------------
    // funding
    // ------------------------------------------------------------------

    #[test]
    fn funding_round_trip() {
        let fx = fixture();
        let receipts = fund_three(&fx.board);
        assert_eq!(receipts.len(), 3);
        for (i, receipt) in receipts.iter().enumerate() {
            assert_eq!(receipt.repo_id, repo());
            assert_eq!(receipt.issue_number, (i + 1) as u64);
            assert_eq!(receipt.bounty_size, ((i + 1) * 10) as Amount);
            assert!(receipt.external_id > 0);
        }

        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert!(issue.has_bounty);
        assert!(!issue.fulfilled);
        assert_eq!(issue.bounty_size, 10);
        assert_eq!(issue.assignee, None);
        assert_eq!(issue.external_id, Some(receipts[0].external_id));
        assert_eq!(fx.escrow.escrowed_balance(receipts[0].external_id), 10);
    }

    #[test]
    fn never_funded_issue_reads_as_zero_view() {
        let fx = fixture();
        let issue = fx.board.get_issue(&repo(), 99).unwrap();
        assert_eq!(issue, IssueView::default());
    }

    #[test]
    fn get_issue_requires_registered_repo() {
        let fx = fixture();
        assert!(matches!(
            fx.board.get_issue(&RepoId::from("0xdeadbeef"), 1),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn token_bounties_draw_from_vault() {
        let fx = fixture();
        let token = addr(0x70);
        let currency = Currency::Token(token);
        fx.vault.deposit(&currency, 6).unwrap();

        let receipts = fx
            .board
            .add_bounties(
                &[repo(), repo(), repo()],
                &[1, 2, 3],
                &[1, 2, 3],
                &[deadline(), deadline(), deadline()],
                &[1, 1, 1],
                &[token, token, token],
                "Qm-data",
                "something",
                0,
            )
            .unwrap();

        assert_eq!(fx.vault.balance(&currency), 0);
        for receipt in &receipts {
            assert!(receipt.external_id > 0);
            let entry = fx.escrow.entry(receipt.external_id).unwrap();
            assert_eq!(entry.currency, currency);
            assert_eq!(entry.payer, fx.vault.address());
        }
    }

    #[test]
    fn insufficient_vault_balance_fails_whole_batch() {
        let fx = fixture();
        let token = addr(0x70);
        fx.vault.deposit(&Currency::Token(token), 2).unwrap();

        let err = fx
            .board
            .add_bounties(
                &[repo(), repo()],
                &[1, 2],
                &[1, 2],
                &[deadline(), deadline()],
                &[1, 1],
                &[token, token],
                "Qm-data",
                "something",
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Vault(_)));
        assert_eq!(fx.vault.balance(&Currency::Token(token)), 2);
        assert_eq!(fx.board.get_issue(&repo(), 1).unwrap(), IssueView::default());
    }

    #[test]
    fn deposit_must_match_native_total() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo()],
                &[1],
                &[10],
                &[deadline()],
                &[0],
                &[Address::ZERO],
                "Qm-data",
                "something",
                9,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DepositMismatch {
                expected: 10,
                got: 9
            }
        ));
        assert_eq!(fx.board.get_issue(&repo(), 1).unwrap(), IssueView::default());
    }

    #[test]
    fn rejects_non_fungible_token_class() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo()],
                &[7],
                &[5],
                &[deadline()],
                &[721],
                &[Address::ZERO],
                "Qm-data",
                "something",
                5,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTokenConfig(_)));
    }

    #[test]
    fn rejects_native_bounty_with_token_contract() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo()],
                &[7],
                &[5],
                &[deadline()],
                &[0],
                &[addr(1)],
                "Qm-data",
                "something",
                5,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTokenConfig(_)));
    }

    #[test]
    fn rejects_token_bounty_without_contract() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo()],
                &[7],
                &[5],
                &[deadline()],
                &[1],
                &[Address::ZERO],
                "Qm-data",
                "something",
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTokenConfig(_)));
    }

    #[test]
    fn unregistered_repo_fails_whole_batch() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo(), RepoId::from("0xdeadbeef")],
                &[1, 2],
                &[10, 20],
                &[deadline(), deadline()],
                &[0, 0],
                &[Address::ZERO, Address::ZERO],
                "Qm-data",
                "something",
                30,
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        // Nothing was funded, not even the valid entry.
        assert_eq!(fx.board.get_issue(&repo(), 1).unwrap(), IssueView::default());
        assert_eq!(fx.escrow.escrowed_balance(1), 0);
    }

    #[test]
    fn batch_arrays_must_have_equal_length() {
        let fx = fixture();
        let err = fx
            .board
            .add_bounties(
                &[repo(), repo()],
                &[1],
                &[10],
                &[deadline()],
                &[0],
                &[Address::ZERO],
                "Qm-data",
                "something",
                10,
            )
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch));
    }

    #[test]
    fn batch_length_is_capped() {
        let fx = fixture();
        let n = MAX_BATCH + 1;
        let err = fx
            .board
            .remove_bounties(&vec![repo(); n], &vec![6; n], "reasons")
            .unwrap_err();
        assert!(matches!(err, Error::LengthExceeded(_)));
    }

    #[test]
    fn refunding_same_issue_starts_a_fresh_generation() {
        let fx = fixture();
        let first = fund_one(&fx.board, 6, 10);
        fx.board.remove_bounties(&[repo()], &[6], "reasons").unwrap();
        let second = fund_one(&fx.board, 6, 10);
        assert_ne!(first.external_id, second.external_id);
        assert_eq!(fx.board.issue_metadata(&repo(), 6).unwrap().generation, 2);
    }

    #[test]
    fn update_bounty_touches_metadata_only() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let later = deadline() + Duration::days(1);
        fx.board
            .update_bounty(&repo(), 1, "example data", later, "example description")
            .unwrap();
        let metadata = fx.board.issue_metadata(&repo(), 1).unwrap();
        assert_eq!(metadata.data, "example data");
        assert_eq!(metadata.description, "example description");
        assert_eq!(metadata.deadline, Some(later));
        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert_eq!(issue.bounty_size, 10);
        assert!(issue.has_bounty);
    }

    #[test]
    fn update_bounty_requires_live_bounty() {
        let fx = fixture();
        assert!(matches!(
            fx.board.update_bounty(&repo(), 1, "d", deadline(), "d"),
            Err(Error::NotFound(_))
        ));
    }

    // ------------------------------------------------------------------
    // killing
    // ------------------------------------------------------------------

    #[test]
    fn kill_resets_bounty_and_refunds_vault() {
        let fx = fixture();
        fund_one(&fx.board, 6, 10);
        let before = fx.vault.balance(&Currency::Native);

        fx.board
            .remove_bounties(&[repo()], &[6], "test removal")
            .unwrap();

        let issue = fx.board.get_issue(&repo(), 6).unwrap();
        assert!(!issue.has_bounty);
        assert_eq!(issue.bounty_size, 0);
        assert_eq!(issue.external_id, None);
        assert_eq!(fx.vault.balance(&Currency::Native) - before, 10);
    }

    #[test]
    fn kill_refunds_tokens_in_kind() {
        let fx = fixture();
        let token = addr(0x70);
        let currency = Currency::Token(token);
        fx.vault.deposit(&currency, 5).unwrap();
        fx.board
            .add_bounties(
                &[repo()],
                &[1],
                &[5],
                &[deadline()],
                &[1],
                &[token],
                "Qm-data",
                "something",
                0,
            )
            .unwrap();
        assert_eq!(fx.vault.balance(&currency), 0);

        fx.board
            .remove_bounties(&[repo()], &[1], "test removal")
            .unwrap();
        assert_eq!(fx.vault.balance(&currency), 5);
    }

    #[test]
    fn cannot_kill_a_bounty_that_does_not_exist() {
        let fx = fixture();
        assert!(matches!(
            fx.board.remove_bounties(&[repo()], &[6], "reasons"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn cannot_kill_a_bounty_twice() {
        let fx = fixture();
        fund_one(&fx.board, 6, 10);
        fx.board.remove_bounties(&[repo()], &[6], "reasons").unwrap();
        assert!(matches!(
            fx.board.remove_bounties(&[repo()], &[6], "reasons"),
            Err(Error::AlreadyRemoved)
        ));
    }

    #[test]
    fn cannot_kill_a_fulfilled_bounty() {
        let fx = fixture();
        fund_one(&fx.board, 6, 10);
        let worker = addr(0xbb);
        let index = assign_and_fulfill(&fx, 6, worker);
        fx.board
            .review_submission(&repo(), 6, index, true, "Qm-comment", &[10])
            .unwrap();
        assert!(matches!(
            fx.board.remove_bounties(&[repo()], &[6], "reasons"),
            Err(Error::AlreadyFulfilled)
        ));
    }

    #[test]
    fn one_bad_entry_aborts_the_whole_kill_batch() {
        let fx = fixture();
        fund_one(&fx.board, 6, 10);
        let before = fx.vault.balance(&Currency::Native);
        let err = fx
            .board
            .remove_bounties(&[repo(), repo()], &[6, 7], "reasons")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        // The valid entry is still live and no refund landed.
        assert!(fx.board.get_issue(&repo(), 6).unwrap().has_bounty);
        assert_eq!(fx.vault.balance(&Currency::Native), before);
    }

    #[test]
    fn kill_batch_arrays_must_pair_up() {
        let fx = fixture();
        fund_one(&fx.board, 6, 10);
        assert!(matches!(
            fx.board.remove_bounties(&[repo(), repo()], &[6], "reasons"),
            Err(Error::LengthMismatch)
        ));
    }

    // ------------------------------------------------------------------
    // assignment workflow
    // ------------------------------------------------------------------

    #[test]
    fn request_assignment_records_application() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        assert_eq!(fx.board.applicants_len(&repo(), 1).unwrap(), 1);
        let application = fx.board.applicant(&repo(), 1, 0).unwrap();
        assert_eq!(application.applicant, applicant);
        assert_eq!(application.pitch, "Qm-pitch");
        assert_eq!(application.status, ApplicationStatus::Unreviewed);
    }

    #[test]
    fn duplicate_unreviewed_application_is_rejected() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        assert!(matches!(
            fx.board.request_assignment(&repo(), 1, applicant, "Qm-pitch"),
            Err(Error::DuplicateApplication)
        ));
    }

    #[test]
    fn reapplying_after_review_is_allowed() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        fx.board
            .review_application(&repo(), 1, applicant, "Qm-comment", false)
            .unwrap();
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch-2")
            .unwrap();
        assert_eq!(fx.board.applicants_len(&repo(), 1).unwrap(), 2);
    }

    #[test]
    fn accepting_an_application_sets_the_assignee() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        fx.board
            .review_application(&repo(), 1, applicant, "Qm-comment", true)
            .unwrap();
        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert_eq!(issue.assignee, Some(applicant));
        assert_eq!(
            fx.board.applicant(&repo(), 1, 0).unwrap().status,
            ApplicationStatus::Accepted
        );
    }

    #[test]
    fn rejecting_an_application_leaves_issue_unassigned() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        fx.board
            .review_application(&repo(), 1, applicant, "Qm-comment", false)
            .unwrap();
        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert_eq!(issue.assignee, None);
        assert_eq!(
            fx.board.applicant(&repo(), 1, 0).unwrap().status,
            ApplicationStatus::Rejected
        );
    }

    #[test]
    fn cannot_review_an_application_that_was_never_made() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        assert!(matches!(
            fx.board
                .review_application(&repo(), 1, Address::ZERO, "Qm-comment", true),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn reviewed_application_cannot_be_reviewed_again() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        fx.board
            .review_application(&repo(), 1, applicant, "Qm-comment", true)
            .unwrap();
        assert!(matches!(
            fx.board
                .review_application(&repo(), 1, applicant, "Qm-comment", false),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn open_bounty_refuses_assignment_review() {
        let fx = fixture();
        fx.board
            .add_bounties_no_assignment(
                &[repo()],
                &[1],
                &[10],
                &[deadline()],
                &[0],
                &[Address::ZERO],
                "Qm-data",
                "something",
                10,
            )
            .unwrap();
        let applicant = addr(0xaa);
        fx.board
            .request_assignment(&repo(), 1, applicant, "Qm-pitch")
            .unwrap();
        assert!(matches!(
            fx.board
                .review_application(&repo(), 1, applicant, "Qm-comment", true),
            Err(Error::OpenBountyNotAssignable)
        ));
    }

    // ------------------------------------------------------------------
    // submission review
    // ------------------------------------------------------------------

    #[test]
    fn accepting_work_settles_the_bounty() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let worker = addr(0xbb);
        let index = assign_and_fulfill(&fx, 1, worker);
        fx.board
            .review_submission(&repo(), 1, index, true, "Qm-comment", &[10])
            .unwrap();
        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert!(issue.fulfilled);
        assert!(issue.has_bounty);
        assert_eq!(fx.escrow.escrowed_balance(issue.external_id.unwrap()), 0);
    }

    #[test]
    fn work_cannot_be_accepted_twice() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let worker = addr(0xbb);
        let index = assign_and_fulfill(&fx, 1, worker);
        fx.board
            .review_submission(&repo(), 1, index, true, "Qm-comment", &[10])
            .unwrap();
        assert!(matches!(
            fx.board
                .review_submission(&repo(), 1, index, true, "Qm-comment", &[10]),
            Err(Error::AlreadyFulfilled)
        ));
    }

    #[test]
    fn rejecting_work_leaves_the_bounty_open() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        let worker = addr(0xbb);
        let index = assign_and_fulfill(&fx, 1, worker);
        fx.board
            .review_submission(&repo(), 1, index, false, "Qm-comment", &[0])
            .unwrap();
        let issue = fx.board.get_issue(&repo(), 1).unwrap();
        assert!(!issue.fulfilled);
        assert!(issue.has_bounty);
        assert_eq!(fx.escrow.escrowed_balance(issue.external_id.unwrap()), 10);

        // A later submission can still be accepted.
        let second = fx
            .escrow
            .fulfill(issue.external_id.unwrap(), &[worker], "retry")
            .unwrap();
        fx.board
            .review_submission(&repo(), 1, second, true, "Qm-comment", &[10])
            .unwrap();
        assert!(fx.board.get_issue(&repo(), 1).unwrap().fulfilled);
    }

    #[test]
    fn submission_review_requires_recorded_work() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        assert!(matches!(
            fx.board
                .review_submission(&repo(), 1, 0, true, "Qm-comment", &[10]),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn killed_bounty_cannot_be_submitted_against() {
        let fx = fixture();
        fund_one(&fx.board, 1, 10);
        fx.board.remove_bounties(&[repo()], &[1], "reasons").unwrap();
        assert!(matches!(
            fx.board
                .review_submission(&repo(), 1, 0, true, "Qm-comment", &[10]),
            Err(Error::NotFound(_))
        ));
    }

    // ------------------------------------------------------------------
    // settings
    // ------------------------------------------------------------------

    #[test]
    fn settings_round_trip() {
        let fx = fixture();
        let other = Arc::new(InMemoryEscrow::new(addr(0xe6)));
        fx.board
            .change_bounty_settings(
                vec![100, 300, 500, 1000],
                vec![
                    "Beginner".to_string(),
                    "Intermediate".to_string(),
                    "Advanced".to_string(),
                    "Expert".to_string(),
                ],
                1,
                336,
                None,
                other.clone(),
            )
            .unwrap();
        let settings = fx.board.settings();
        assert_eq!(settings.xp_multipliers, vec![100, 300, 500, 1000]);
        assert_eq!(settings.experience_levels.len(), 4);
        assert_eq!(settings.base_rate, 1);
        assert_eq!(settings.bounty_deadline_offset, 336);
        assert_eq!(settings.bounty_currency, None);
        assert_eq!(settings.bounty_allocator, other.address());
    }

    #[test]
    fn settings_experience_arrays_must_pair_up() {
        let fx = fixture();
        let other = Arc::new(InMemoryEscrow::new(addr(0xe6)));
        assert!(matches!(
            fx.board.change_bounty_settings(
                vec![100, 300, 500, 1000],
                vec![
                    "Beginner".to_string(),
                    "Intermediate".to_string(),
                    "Advanced".to_string(),
                ],
                1,
                336,
                None,
                other,
            ),
            Err(Error::LengthMismatch)
        ));
    }

    #[test]
    fn allocator_must_answer_the_probe() {
        struct DeadEscrow;
        impl BountyEscrow for DeadEscrow {
            fn address(&self) -> Address {
                addr(0xdead)
            }
            fn probe(&self) -> bool {
                false
            }
            fn issue_and_fund(
                &self,
                _: &str,
                _: &Address,
                _: DateTime<Utc>,
                _: &Currency,
                _: Amount,
            ) -> Result<ExternalId> {
                Err(Error::escrow("dead"))
            }
            fn fulfill(&self, _: ExternalId, _: &[Address], _: &str) -> Result<usize> {
                Err(Error::escrow("dead"))
            }
            fn fulfillment_count(&self, _: ExternalId) -> usize {
                0
            }
            fn accept_fulfillment(&self, _: ExternalId, _: usize, _: &[Amount]) -> Result<()> {
                Err(Error::escrow("dead"))
            }
            fn reject_fulfillment(&self, _: ExternalId, _: usize, _: &str) -> Result<()> {
                Err(Error::escrow("dead"))
            }
            fn refund(&self, _: ExternalId) -> Result<Amount> {
                Err(Error::escrow("dead"))
            }
        }

        let fx = fixture();
        assert!(matches!(
            fx.board.change_bounty_settings(
                vec![100],
                vec!["Beginner".to_string()],
                1,
                336,
                None,
                Arc::new(DeadEscrow),
            ),
            Err(Error::InvalidAllocator)
        ));
    }

    #[test]
    fn live_bounties_keep_their_original_escrow() {
        let fx = fixture();
        let receipt = fund_one(&fx.board, 1, 10);
        let other = Arc::new(InMemoryEscrow::new(addr(0xe6)));
        fx.board
            .change_bounty_settings(
                vec![100],
                vec!["Beginner".to_string()],
                1,
                336,
                None,
                other.clone(),
            )
            .unwrap();

        // Killing the pre-existing bounty refunds from the escrow that
        // funded it, not the new allocator.
        fx.board.remove_bounties(&[repo()], &[1], "reasons").unwrap();
        assert!(fx.escrow.entry(receipt.external_id).unwrap().refunded);
        assert!(other.entry(receipt.external_id).is_none());

        // New fundings land on the new allocator.
        let fresh = fund_one(&fx.board, 2, 10);
        assert!(other.entry(fresh.external_id).is_some());
    }

    #[test]
    fn board_rejects_non_conforming_escrow_at_construction() {
        let vault = Arc::new(InMemoryVault::new(addr(0xfa)));
        let zero_addr_escrow = Arc::new(InMemoryEscrow::new(Address::ZERO));
        assert!(matches!(
            BountyBoard::new(zero_addr_escrow, vault),
            Err(Error::InvalidAllocator)
        ));
    }

    // ------------------------------------------------------------------
    // repos
    // ------------------------------------------------------------------

    #[test]
    fn repo_registry_round_trip() {
        let fx = fixture();
        assert!(fx.board.is_registered(&repo()));
        assert_eq!(fx.board.repo_count(), 1);
        assert_eq!(fx.board.repo_index(&repo()).unwrap(), 0);

        fx.board.remove_repo(&repo()).unwrap();
        assert!(!fx.board.is_registered(&repo()));
        assert!(matches!(
            fx.board.repo_index(&repo()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn cannot_fund_under_unregistered_repo() {
        let fx = fixture();
        fx.board.remove_repo(&repo()).unwrap();
        let err = fx
            .board
            .add_bounties(
                &[repo()],
                &[1],
                &[10],
                &[deadline()],
                &[0],
                &[Address::ZERO],
                "Qm-data",
                "something",
                10,
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    // ------------------------------------------------------------------
    // curation
    // ------------------------------------------------------------------

    #[test]
    fn curation_is_recorded() {
        let fx = fixture();
        fx.board
            .curate_issues(
                &[2, 1],
                &[0, 0],
                "",
                "triage pass",
                &[repo(), repo()],
                &[1, 2],
                0,
            )
            .unwrap();
        let entries = fx.board.curations();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "triage pass");
        assert_eq!(entries[0].issues[0].priority, 2);
    }
}
