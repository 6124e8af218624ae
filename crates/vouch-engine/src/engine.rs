use std::sync::Arc;

use tracing::{error, info, warn};

use vouch_core::config::{ClaimPolicy, Config, RewardPolicy, ScorePolicy};
use vouch_core::constants::INITIAL_SCORE;
use vouch_core::curve::tetrahedral_position;
use vouch_core::error::VouchError;
use vouch_core::participant::Participant;
use vouch_core::reward::reward_amount;
use vouch_core::types::{AccountId, Score, Symbol, Timestamp, TokenAmount};
use vouch_store::ReferralStore;

use crate::context::{AccountDirectory, AuthProof, TokenLedger};

/// The referral state-transition engine.
///
/// Each entry point runs to completion against the store with no internal
/// suspension point; correctness of the claim path relies on this
/// single-writer serialization. A front-end that introduces concurrency
/// must serialize calls (or hold a per-account lock around `claim`).
pub struct ReferralEngine<D, L> {
    pub store: Arc<ReferralStore>,
    directory: D,
    ledger: L,
    /// The platform/root identity: bootstraps governance, seeds the
    /// forest, and is the sending side of reward transfers.
    authority: AccountId,
}

impl<D: AccountDirectory, L: TokenLedger> ReferralEngine<D, L> {
    pub fn new(store: Arc<ReferralStore>, directory: D, ledger: L, authority: AccountId) -> Self {
        Self { store, directory, ledger, authority }
    }

    pub fn authority(&self) -> &AccountId {
        &self.authority
    }

    /// Active configuration; pre-bootstrap reads fall back to defaults
    /// with the platform authority as admin and reward ledger.
    pub fn config(&self) -> Result<Config, VouchError> {
        match self.store.get_config()? {
            Some(cfg) => Ok(cfg),
            None => Ok(Config {
                admin: self.authority.clone(),
                min_account_age_secs: 30 * 86_400,
                cooldown_secs: 3_600,
                enabled: true,
                max_referral_depth: 5,
                score_policy: ScorePolicy::Flat,
                claim_policy: ClaimPolicy::SingleClaim,
                reward_policy: RewardPolicy::CurveBased,
                reward_ledger: self.authority.clone(),
                reward_symbol: Symbol::new("VOUCH", 4).expect("static symbol"),
                reward_rate: 100,
                strict_inviter_cooldown: false,
            }),
        }
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Admit `user` into the forest under `inviter` and propagate score up
    /// the inviter's chain.
    ///
    /// Naming the platform authority as inviter while the authority itself
    /// is unregistered seeds a new tree: the participant is stored with no
    /// upline and no propagation runs.
    pub fn register(
        &self,
        auth: &dyn AuthProof,
        now: Timestamp,
        user: &AccountId,
        inviter: &AccountId,
    ) -> Result<(), VouchError> {
        if !auth.authorized_as(user) && !auth.authorized_as(&self.authority) {
            return Err(VouchError::NotAuthorized(user.to_string()));
        }
        if !self.directory.account_exists(inviter) {
            return Err(VouchError::UnknownAccount(inviter.to_string()));
        }
        if inviter == user {
            return Err(VouchError::SelfReferral);
        }
        if self.store.participant_exists(user) {
            return Err(VouchError::AlreadyRegistered(user.to_string()));
        }

        let inviter_row = self.store.get_participant(inviter)?;
        let seeding = inviter_row.is_none() && *inviter == self.authority;
        if inviter_row.is_none() && !seeding {
            return Err(VouchError::InviterNotRegistered(inviter.to_string()));
        }

        let cfg = self.config()?;
        if !cfg.enabled {
            return Err(VouchError::Disabled);
        }

        let age_secs = now - self.directory.creation_time(user)?;
        if age_secs < cfg.min_account_age_secs {
            return Err(VouchError::AccountTooYoung {
                required_secs: cfg.min_account_age_secs,
                age_secs,
            });
        }

        if cfg.strict_inviter_cooldown {
            if let Some(row) = &inviter_row {
                let remaining = row.cooldown_remaining(cfg.cooldown_secs, now);
                if remaining > 0 {
                    return Err(VouchError::InviterCoolingDown { retry_in_secs: remaining });
                }
            }
        }

        let invited_by = if seeding { None } else { Some(inviter.clone()) };
        self.store
            .put_participant(&Participant::new(user.clone(), invited_by, INITIAL_SCORE, now))?;

        let mut stats = self.store.get_stats()?;
        stats.total_users += 1;
        if !seeding {
            stats.total_referrals += 1;
        }
        stats.last_registered = Some(user.clone());
        self.store.put_stats(&stats)?;

        if !seeding {
            self.propagate_score(&cfg, inviter, now)?;
        }

        info!(user = %user, inviter = %inviter, seed = seeding, "registered participant");
        Ok(())
    }

    // ── Score propagation ────────────────────────────────────────────────────

    /// Walk the upline from `direct_inviter` for up to `max_referral_depth`
    /// hops and apply the configured increment to every ancestor whose
    /// cooldown has elapsed. A cooling-down ancestor is skipped outright;
    /// the increment is lost, never queued.
    fn propagate_score(
        &self,
        cfg: &Config,
        direct_inviter: &AccountId,
        now: Timestamp,
    ) -> Result<(), VouchError> {
        let mut upline: Vec<(AccountId, u16)> = Vec::new();
        let mut cursor = self.store.get_participant(direct_inviter)?;
        let mut level: u16 = 1;

        while let Some(row) = cursor {
            if level > cfg.max_referral_depth {
                break;
            }
            upline.push((row.account.clone(), level));
            cursor = match &row.invited_by {
                Some(parent) => self.store.get_participant(parent)?,
                None => None,
            };
            level += 1;
        }

        for (account, level) in upline {
            // Re-fetch: earlier iterations may have touched this row.
            let Some(mut row) = self.store.get_participant(&account)? else {
                continue;
            };
            if now - row.last_updated < cfg.cooldown_secs {
                continue;
            }
            let increment = score_increment(&cfg.score_policy, level, row.score);
            row.score = row.score.saturating_add(increment);
            row.last_updated = now;
            self.store.put_participant(&row)?;
            info!(account = %account, level, increment, score = row.score, "score propagated");
        }
        Ok(())
    }

    // ── Claim ────────────────────────────────────────────────────────────────

    /// Convert `user`'s accumulated score into a token transfer.
    ///
    /// The claim-state flip is committed before the ledger is called, so a
    /// reentrant claim during the transfer observes the spent state. A
    /// transfer failure restores the pre-claim row and aborts: the engine
    /// never leaves a participant marked claimed with no tokens delivered.
    pub fn claim(
        &self,
        auth: &dyn AuthProof,
        now: Timestamp,
        user: &AccountId,
    ) -> Result<TokenAmount, VouchError> {
        if !auth.authorized_as(user) && !auth.authorized_as(&self.authority) {
            return Err(VouchError::NotAuthorized(user.to_string()));
        }

        let cfg = self.config()?;
        if !cfg.enabled {
            return Err(VouchError::Disabled);
        }

        let row = self
            .store
            .get_participant(user)?
            .ok_or_else(|| VouchError::NotRegistered(user.to_string()))?;
        if row.score == 0 {
            return Err(VouchError::NothingToClaim);
        }
        if cfg.claim_policy == ClaimPolicy::SingleClaim && row.claimed {
            return Err(VouchError::AlreadyClaimed);
        }

        let score = row.score;
        let amount = reward_amount(cfg.reward_policy, score, &cfg.reward_symbol, cfg.reward_rate)?;

        // State before effect: commit the spent claim first.
        let mut spent = row.clone();
        match cfg.claim_policy {
            ClaimPolicy::SingleClaim => spent.claimed = true,
            ClaimPolicy::ResetOnClaim => spent.score = 0,
        }
        self.store.put_participant(&spent)?;

        let memo = format!(
            "referral reward for {} points (position {})",
            score,
            tetrahedral_position(score)
        );
        if let Err(e) = self.ledger.transfer(
            &self.authority,
            user,
            amount,
            &cfg.reward_symbol,
            &memo,
        ) {
            // Roll the whole operation back; see module doc on atomicity.
            if let Err(restore_err) = self.store.put_participant(&row) {
                // The row is left spent with no tokens delivered. Surface the
                // storage fault, but keep the transfer failure in the log so
                // operators can tell this apart from an ordinary storage error.
                error!(
                    user = %user,
                    transfer_error = %e,
                    storage_error = %restore_err,
                    "transfer failed and claim rollback failed; row left spent"
                );
                return Err(restore_err);
            }
            warn!(user = %user, error = %e, "transfer failed; claim rolled back");
            return Err(VouchError::TransferFailed(e.to_string()));
        }

        info!(user = %user, score, amount, at = now, "claim paid");
        Ok(amount)
    }

    // ── Governance ───────────────────────────────────────────────────────────

    /// Replace the configuration record.
    ///
    /// Uninitialized → only the platform authority may set it (any valid
    /// record, including zero timers). Initialized → only the currently
    /// stored admin, with full revalidation including positive timers.
    pub fn set_config(&self, auth: &dyn AuthProof, new_config: Config) -> Result<(), VouchError> {
        match self.store.get_config()? {
            None => {
                if !auth.authorized_as(&self.authority) {
                    return Err(VouchError::AuthorityOnly);
                }
                new_config.validate(false)?;
            }
            Some(current) => {
                if !auth.authorized_as(&current.admin) {
                    return Err(VouchError::AdminOnly);
                }
                new_config.validate(true)?;
            }
        }
        self.store.put_config(&new_config)?;
        info!(admin = %new_config.admin, enabled = new_config.enabled, "configuration replaced");
        Ok(())
    }

    /// Unconditionally delete a participant row. Recovery/test tooling;
    /// bypasses every other invariant, so it is gated on the platform
    /// authority itself. Succeeds silently if the row is absent.
    pub fn remove_user(&self, auth: &dyn AuthProof, user: &AccountId) -> Result<(), VouchError> {
        if !auth.authorized_as(&self.authority) {
            return Err(VouchError::AuthorityOnly);
        }
        self.store.remove_participant(user)?;
        warn!(user = %user, "participant removed by authority");
        Ok(())
    }
}

/// Increment applied to one ancestor at `level` holding `current_score`.
fn score_increment(policy: &ScorePolicy, level: u16, current_score: Score) -> Score {
    match policy {
        ScorePolicy::Flat => 1,
        ScorePolicy::LevelWeighted { multipliers, default_multiplier } => multipliers
            .get(level as usize - 1)
            .copied()
            .unwrap_or(*default_multiplier) as Score,
        ScorePolicy::CurveWeighted { global_multiplier } => {
            let scaled =
                (tetrahedral_position(current_score) as u64 * *global_multiplier as u64) / 100;
            (scaled as Score).max(1)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
