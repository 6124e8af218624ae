use serde::{Deserialize, Serialize};
use std::path::Path;

use vouch_core::config::Config;
use vouch_core::error::VouchError;
use vouch_core::participant::{Participant, Stats};
use vouch_core::types::{AccountId, Score, Timestamp, TokenAmount};

const META_CONFIG_KEY: &[u8] = b"config";
const META_STATS_KEY: &[u8] = b"stats";

/// A journaled outbound transfer request (the CLI sandbox ledger).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransferRecord {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: TokenAmount,
    /// Symbol string, e.g. `4,VOUCH`.
    pub symbol: String,
    pub memo: String,
    pub at: Timestamp,
}

/// Persistent referral state backed by sled (pure-Rust, no C dependencies).
///
/// Named trees (analogous to column families):
///   participants — account bytes              → bincode(Participant)
///   score_idx    — (MAX-score BE ++ account)  → account bytes
///   meta         — utf8 key bytes             → bincode singleton
///   transfers    — u64 BE sequence            → bincode(TransferRecord)
pub struct ReferralStore {
    db: sled::Db,
    participants: sled::Tree,
    score_idx: sled::Tree,
    meta: sled::Tree,
    transfers: sled::Tree,
}

fn score_idx_key(score: Score, account: &AccountId) -> Vec<u8> {
    // Big-endian complement sorts descending by score; the account suffix
    // disambiguates equal scores.
    let mut key = (Score::MAX - score).to_be_bytes().to_vec();
    key.extend_from_slice(account.as_bytes());
    key
}

impl ReferralStore {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VouchError> {
        let db = sled::open(path).map_err(|e| VouchError::Storage(e.to_string()))?;
        let participants = db.open_tree("participants").map_err(|e| VouchError::Storage(e.to_string()))?;
        let score_idx    = db.open_tree("score_idx").map_err(|e| VouchError::Storage(e.to_string()))?;
        let meta         = db.open_tree("meta").map_err(|e| VouchError::Storage(e.to_string()))?;
        let transfers    = db.open_tree("transfers").map_err(|e| VouchError::Storage(e.to_string()))?;
        Ok(Self { db, participants, score_idx, meta, transfers })
    }

    // ── Participants ─────────────────────────────────────────────────────────

    pub fn get_participant(&self, account: &AccountId) -> Result<Option<Participant>, VouchError> {
        match self
            .participants
            .get(account.as_bytes())
            .map_err(|e| VouchError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let p = bincode::deserialize(&bytes)
                    .map_err(|e| VouchError::Serialization(e.to_string()))?;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }

    /// Insert or update a participant row, keeping the descending-score
    /// secondary index in step.
    pub fn put_participant(&self, participant: &Participant) -> Result<(), VouchError> {
        if let Some(prev) = self.get_participant(&participant.account)? {
            if prev.score != participant.score {
                self.score_idx
                    .remove(score_idx_key(prev.score, &prev.account))
                    .map_err(|e| VouchError::Storage(e.to_string()))?;
            }
        }
        let bytes = bincode::serialize(participant)
            .map_err(|e| VouchError::Serialization(e.to_string()))?;
        self.participants
            .insert(participant.account.as_bytes(), bytes)
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        self.score_idx
            .insert(
                score_idx_key(participant.score, &participant.account),
                participant.account.as_bytes(),
            )
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Remove a participant and its index entry. No-op if absent.
    pub fn remove_participant(&self, account: &AccountId) -> Result<(), VouchError> {
        if let Some(prev) = self.get_participant(account)? {
            self.score_idx
                .remove(score_idx_key(prev.score, account))
                .map_err(|e| VouchError::Storage(e.to_string()))?;
            self.participants
                .remove(account.as_bytes())
                .map_err(|e| VouchError::Storage(e.to_string()))?;
        }
        Ok(())
    }

    pub fn participant_exists(&self, account: &AccountId) -> bool {
        self.participants.contains_key(account.as_bytes()).unwrap_or(false)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Top participants by descending score.
    pub fn top_by_score(&self, limit: usize) -> Result<Vec<Participant>, VouchError> {
        let mut out = Vec::new();
        for item in self.score_idx.iter() {
            if out.len() >= limit {
                break;
            }
            let (_, account_bytes) = item.map_err(|e| VouchError::Storage(e.to_string()))?;
            let account = AccountId::from_bytes(&account_bytes)?;
            if let Some(p) = self.get_participant(&account)? {
                out.push(p);
            }
        }
        Ok(out)
    }

    // ── Config singleton ─────────────────────────────────────────────────────

    pub fn get_config(&self) -> Result<Option<Config>, VouchError> {
        match self
            .meta
            .get(META_CONFIG_KEY)
            .map_err(|e| VouchError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let cfg = bincode::deserialize(&bytes)
                    .map_err(|e| VouchError::Serialization(e.to_string()))?;
                Ok(Some(cfg))
            }
            None => Ok(None),
        }
    }

    pub fn put_config(&self, config: &Config) -> Result<(), VouchError> {
        let bytes =
            bincode::serialize(config).map_err(|e| VouchError::Serialization(e.to_string()))?;
        self.meta
            .insert(META_CONFIG_KEY, bytes)
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        Ok(())
    }

    // ── Stats singleton ──────────────────────────────────────────────────────

    pub fn get_stats(&self) -> Result<Stats, VouchError> {
        match self
            .meta
            .get(META_STATS_KEY)
            .map_err(|e| VouchError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let stats = bincode::deserialize(&bytes)
                    .map_err(|e| VouchError::Serialization(e.to_string()))?;
                Ok(stats)
            }
            None => Ok(Stats::default()),
        }
    }

    pub fn put_stats(&self, stats: &Stats) -> Result<(), VouchError> {
        let bytes =
            bincode::serialize(stats).map_err(|e| VouchError::Serialization(e.to_string()))?;
        self.meta
            .insert(META_STATS_KEY, bytes)
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        Ok(())
    }

    // ── Transfer journal ─────────────────────────────────────────────────────

    pub fn append_transfer(&self, record: &TransferRecord) -> Result<(), VouchError> {
        let seq = self
            .db
            .generate_id()
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        let bytes =
            bincode::serialize(record).map_err(|e| VouchError::Serialization(e.to_string()))?;
        self.transfers
            .insert(seq.to_be_bytes(), bytes)
            .map_err(|e| VouchError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn transfers(&self) -> Result<Vec<TransferRecord>, VouchError> {
        let mut out = Vec::new();
        for item in self.transfers.iter() {
            let (_, bytes) = item.map_err(|e| VouchError::Storage(e.to_string()))?;
            let record = bincode::deserialize(&bytes)
                .map_err(|e| VouchError::Serialization(e.to_string()))?;
            out.push(record);
        }
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::config::{ClaimPolicy, RewardPolicy, ScorePolicy};
    use vouch_core::types::Symbol;

    fn temp_store(name: &str) -> ReferralStore {
        let dir = std::env::temp_dir().join(format!("vouch_store_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        ReferralStore::open(&dir).expect("open temp store")
    }

    fn acct(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn participant_roundtrip() {
        let store = temp_store("roundtrip");
        let p = Participant::new(acct("alice"), Some(acct("bob")), 1, 1_000);
        store.put_participant(&p).unwrap();
        assert_eq!(store.get_participant(&acct("alice")).unwrap().unwrap(), p);
        assert!(store.participant_exists(&acct("alice")));
        assert!(!store.participant_exists(&acct("carol")));
    }

    #[test]
    fn remove_clears_row_and_index() {
        let store = temp_store("remove");
        let p = Participant::new(acct("alice"), None, 7, 1_000);
        store.put_participant(&p).unwrap();
        store.remove_participant(&acct("alice")).unwrap();
        assert!(store.get_participant(&acct("alice")).unwrap().is_none());
        assert!(store.top_by_score(10).unwrap().is_empty());
        // Removing again is a no-op.
        store.remove_participant(&acct("alice")).unwrap();
    }

    #[test]
    fn leaderboard_orders_by_descending_score() {
        let store = temp_store("leaderboard");
        for (name, score) in [("alice", 5u32), ("bob", 12), ("carol", 1), ("dave", 12)] {
            store
                .put_participant(&Participant::new(acct(name), None, score, 0))
                .unwrap();
        }
        let top = store.top_by_score(10).unwrap();
        let scores: Vec<u32> = top.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![12, 12, 5, 1]);

        let top2 = store.top_by_score(2).unwrap();
        assert_eq!(top2.len(), 2);
    }

    #[test]
    fn leaderboard_zero_limit_is_empty() {
        let store = temp_store("leaderboard_zero");
        store
            .put_participant(&Participant::new(acct("alice"), None, 5, 0))
            .unwrap();
        assert!(store.top_by_score(0).unwrap().is_empty());
    }

    #[test]
    fn score_update_moves_index_entry() {
        let store = temp_store("idx_update");
        let mut p = Participant::new(acct("alice"), None, 1, 0);
        store.put_participant(&p).unwrap();
        store
            .put_participant(&Participant::new(acct("bob"), None, 3, 0))
            .unwrap();

        p.score = 9;
        store.put_participant(&p).unwrap();

        let top = store.top_by_score(10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].account, acct("alice"));
        assert_eq!(top[0].score, 9);
    }

    #[test]
    fn config_singleton_roundtrip() {
        let store = temp_store("config");
        assert!(store.get_config().unwrap().is_none());
        let cfg = Config {
            admin: acct("admin"),
            min_account_age_secs: 0,
            cooldown_secs: 0,
            enabled: true,
            max_referral_depth: 2,
            score_policy: ScorePolicy::Flat,
            claim_policy: ClaimPolicy::SingleClaim,
            reward_policy: RewardPolicy::ScoreLinear,
            reward_ledger: acct("token.ledger"),
            reward_symbol: Symbol::new("VOUCH", 4).unwrap(),
            reward_rate: 100,
            strict_inviter_cooldown: false,
        };
        store.put_config(&cfg).unwrap();
        assert_eq!(store.get_config().unwrap().unwrap(), cfg);
    }

    #[test]
    fn stats_default_then_roundtrip() {
        let store = temp_store("stats");
        assert_eq!(store.get_stats().unwrap(), Stats::default());
        let stats = Stats {
            total_users: 3,
            total_referrals: 2,
            last_registered: Some(acct("carol")),
        };
        store.put_stats(&stats).unwrap();
        assert_eq!(store.get_stats().unwrap(), stats);
    }

    #[test]
    fn transfer_journal_preserves_order() {
        let store = temp_store("journal");
        for i in 0..3u64 {
            store
                .append_transfer(&TransferRecord {
                    from: acct("vouch"),
                    to: acct("alice"),
                    amount: i * 100,
                    symbol: "4,VOUCH".into(),
                    memo: format!("payout {}", i),
                    at: 1_000 + i as i64,
                })
                .unwrap();
        }
        let journal = store.transfers().unwrap();
        assert_eq!(journal.len(), 3);
        assert_eq!(journal[0].amount, 0);
        assert_eq!(journal[2].amount, 200);
    }
}
