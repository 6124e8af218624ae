use vouch_core::config::Config;
use vouch_core::curve::tetrahedral_position;
use vouch_core::error::VouchError;
use vouch_core::participant::{Participant, Stats};
use vouch_core::types::{AccountId, Timestamp};
use vouch_store::ReferralStore;

/// Read-only query helpers over the referral state.
pub struct ReferralQuery<'a> {
    store: &'a ReferralStore,
}

impl<'a> ReferralQuery<'a> {
    pub fn new(store: &'a ReferralStore) -> Self {
        Self { store }
    }

    /// Fetch a single participant by account.
    pub fn get(&self, account: &AccountId) -> Result<Option<Participant>, VouchError> {
        self.store.get_participant(account)
    }

    /// Ancestor chain of `account`, nearest first, bounded by `max_depth`
    /// hops. The forest invariant guarantees termination.
    pub fn upline(
        &self,
        account: &AccountId,
        max_depth: u16,
    ) -> Result<Vec<AccountId>, VouchError> {
        let mut chain = Vec::new();
        let start = self
            .store
            .get_participant(account)?
            .ok_or_else(|| VouchError::NotRegistered(account.to_string()))?;

        let mut next = start.invited_by;
        while let Some(parent) = next {
            if chain.len() >= max_depth as usize {
                break;
            }
            match self.store.get_participant(&parent)? {
                Some(row) => {
                    chain.push(row.account.clone());
                    next = row.invited_by;
                }
                None => break,
            }
        }
        Ok(chain)
    }

    /// Top participants by descending score.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<Participant>, VouchError> {
        self.store.top_by_score(limit)
    }

    pub fn stats(&self) -> Result<Stats, VouchError> {
        self.store.get_stats()
    }

    /// Human-readable summary of a participant's standing.
    pub fn describe(
        &self,
        account: &AccountId,
        config: &Config,
        now: Timestamp,
    ) -> Result<String, VouchError> {
        let p = self
            .store
            .get_participant(account)?
            .ok_or_else(|| VouchError::NotRegistered(account.to_string()))?;

        let invited = match &p.invited_by {
            Some(by) => format!("invited by {}", by),
            None => "forest seed".to_string(),
        };
        let remaining = p.cooldown_remaining(config.cooldown_secs, now);
        let cooldown = if remaining > 0 {
            format!("cooling down for {}s", remaining)
        } else {
            "cooldown clear".to_string()
        };
        let claimed = if p.claimed { " | claimed" } else { "" };

        Ok(format!(
            "{} | score {} (position {}) | {} | {}{}",
            p.account,
            p.score,
            tetrahedral_position(p.score),
            invited,
            cooldown,
            claimed
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vouch_core::config::{ClaimPolicy, RewardPolicy, ScorePolicy};
    use vouch_core::types::Symbol;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn temp_store(name: &str) -> Arc<ReferralStore> {
        let dir = std::env::temp_dir().join(format!("vouch_query_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        Arc::new(ReferralStore::open(&dir).expect("open temp store"))
    }

    fn chain(store: &ReferralStore) {
        // r (seed) ← a ← b
        store.put_participant(&Participant::new(acct("r"), None, 3, 1_000)).unwrap();
        store
            .put_participant(&Participant::new(acct("a"), Some(acct("r")), 2, 1_000))
            .unwrap();
        store
            .put_participant(&Participant::new(acct("b"), Some(acct("a")), 1, 1_000))
            .unwrap();
    }

    fn config() -> Config {
        Config {
            admin: acct("admin"),
            min_account_age_secs: 0,
            cooldown_secs: 600,
            enabled: true,
            max_referral_depth: 5,
            score_policy: ScorePolicy::Flat,
            claim_policy: ClaimPolicy::SingleClaim,
            reward_policy: RewardPolicy::ScoreLinear,
            reward_ledger: acct("token.ledger"),
            reward_symbol: Symbol::new("VOUCH", 4).unwrap(),
            reward_rate: 100,
            strict_inviter_cooldown: false,
        }
    }

    #[test]
    fn upline_walks_nearest_first() {
        let store = temp_store("upline");
        chain(&store);
        let q = ReferralQuery::new(&store);
        assert_eq!(q.upline(&acct("b"), 5).unwrap(), vec![acct("a"), acct("r")]);
        assert_eq!(q.upline(&acct("b"), 1).unwrap(), vec![acct("a")]);
        assert_eq!(q.upline(&acct("r"), 5).unwrap(), Vec::<AccountId>::new());
    }

    #[test]
    fn upline_of_unknown_account_errors() {
        let store = temp_store("upline_unknown");
        let q = ReferralQuery::new(&store);
        assert!(matches!(
            q.upline(&acct("ghost"), 5),
            Err(VouchError::NotRegistered(_))
        ));
    }

    #[test]
    fn describe_reports_cooldown_and_upline() {
        let store = temp_store("describe");
        chain(&store);
        let q = ReferralQuery::new(&store);

        let line = q.describe(&acct("b"), &config(), 1_100).unwrap();
        assert!(line.contains("score 1"));
        assert!(line.contains("invited by a"));
        assert!(line.contains("cooling down for 500s"));

        let line = q.describe(&acct("r"), &config(), 2_000).unwrap();
        assert!(line.contains("forest seed"));
        assert!(line.contains("cooldown clear"));
    }
}
