//! vouch — referral engine sandbox CLI.
//!
//! Drives a local, fully deterministic instance of the referral engine:
//! accounts live in a JSON directory file, reward transfers are journaled
//! into the state database instead of hitting a real token ledger.
//!
//! Usage:
//!   vouch seed-account --account alice --created-at 0
//!   vouch set-config --admin alice [--min-age-secs N] [--cooldown-secs N] ...
//!   vouch register --user bob --inviter alice [--as bob] [--now TS]
//!   vouch claim --user alice
//!   vouch show --account alice
//!   vouch upline --account bob
//!   vouch leaderboard [--limit N]
//!   vouch stats | vouch transfers
//!   vouch remove --user bob --as vouch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use vouch_core::config::{ClaimPolicy, Config, RewardPolicy, ScorePolicy};
use vouch_core::types::{AccountId, Symbol, Timestamp};
use vouch_engine::context::CallerIs;
use vouch_engine::{ReferralEngine, ReferralQuery};
use vouch_store::ReferralStore;

mod sandbox;
use sandbox::{JournalLedger, JsonDirectory};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vouch", version, about = "Vouch referral engine — local sandbox")]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, global = true, default_value = "~/.vouch/data")]
    data_dir: PathBuf,

    /// Identity the sandbox grants to this invocation.
    #[arg(long = "as", global = true, default_value = "vouch")]
    caller: String,

    /// Override "now" (Unix seconds UTC) for deterministic runs.
    #[arg(long, global = true)]
    now: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an account to the local directory (the age-gate oracle).
    SeedAccount {
        #[arg(long)]
        account: String,
        /// Account creation time (Unix seconds UTC).
        #[arg(long, default_value_t = 0)]
        created_at: i64,
    },

    /// Bootstrap or replace the engine configuration.
    SetConfig {
        #[arg(long)]
        admin: String,
        #[arg(long, default_value_t = 0)]
        min_age_secs: i64,
        #[arg(long, default_value_t = 0)]
        cooldown_secs: i64,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        enabled: bool,
        #[arg(long, default_value_t = 5)]
        max_depth: u16,
        /// Scoring policy: flat | level | curve.
        #[arg(long, default_value = "flat")]
        score_policy: String,
        /// Per-level multipliers for the level policy, e.g. --multipliers 5,3,2
        #[arg(long, value_delimiter = ',')]
        multipliers: Vec<u8>,
        #[arg(long, default_value_t = 1)]
        default_multiplier: u8,
        /// Global multiplier (hundredths) for the curve policy.
        #[arg(long, default_value_t = 100)]
        curve_multiplier: u16,
        /// Claim accounting: single | reset.
        #[arg(long, default_value = "single")]
        claim_policy: String,
        /// Reward formula: linear | curve.
        #[arg(long, default_value = "curve")]
        reward_policy: String,
        #[arg(long, default_value = "token.ledger")]
        reward_ledger: String,
        #[arg(long, default_value = "VOUCH")]
        symbol_code: String,
        #[arg(long, default_value_t = 4)]
        symbol_precision: u8,
        /// Reward units per point, in hundredths (100 = 1.00 token).
        #[arg(long, default_value_t = 100)]
        reward_rate: u32,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
        strict_inviter_cooldown: bool,
    },

    /// Register a user under an inviter.
    Register {
        #[arg(long)]
        user: String,
        #[arg(long)]
        inviter: String,
    },

    /// Claim accumulated score as a reward transfer.
    Claim {
        #[arg(long)]
        user: String,
    },

    /// Print one participant record.
    Show {
        #[arg(long)]
        account: String,
    },

    /// Print a participant's ancestor chain, nearest first.
    Upline {
        #[arg(long)]
        account: String,
    },

    /// Print top participants by score.
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print global registration counters.
    Stats,

    /// Print the journaled reward transfers.
    Transfers,

    /// Delete a participant (platform authority only).
    Remove {
        #[arg(long)]
        user: String,
    },
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let store = Arc::new(
        ReferralStore::open(data_dir.join("state")).context("opening state database")?,
    );
    let directory =
        JsonDirectory::load(data_dir.join("accounts.json")).context("loading account directory")?;

    let now: Timestamp = args.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let authority = AccountId::new("vouch").context("platform authority name")?;
    let auth = CallerIs(parse_account(&args.caller)?);

    match args.command {
        Command::SeedAccount { account, created_at } => {
            let account = parse_account(&account)?;
            directory.insert(account.clone(), created_at)?;
            info!(account = %account, created_at, "account seeded");
        }

        Command::SetConfig {
            admin,
            min_age_secs,
            cooldown_secs,
            enabled,
            max_depth,
            score_policy,
            multipliers,
            default_multiplier,
            curve_multiplier,
            claim_policy,
            reward_policy,
            reward_ledger,
            symbol_code,
            symbol_precision,
            reward_rate,
            strict_inviter_cooldown,
        } => {
            let score_policy = match score_policy.as_str() {
                "flat" => ScorePolicy::Flat,
                "level" => ScorePolicy::LevelWeighted {
                    multipliers: multipliers.clone(),
                    default_multiplier,
                },
                "curve" => ScorePolicy::CurveWeighted { global_multiplier: curve_multiplier },
                other => bail!("unknown score policy: {other} (expected flat|level|curve)"),
            };
            let claim_policy = match claim_policy.as_str() {
                "single" => ClaimPolicy::SingleClaim,
                "reset" => ClaimPolicy::ResetOnClaim,
                other => bail!("unknown claim policy: {other} (expected single|reset)"),
            };
            let reward_policy = match reward_policy.as_str() {
                "linear" => RewardPolicy::ScoreLinear,
                "curve" => RewardPolicy::CurveBased,
                other => bail!("unknown reward policy: {other} (expected linear|curve)"),
            };
            let config = Config {
                admin: parse_account(&admin)?,
                min_account_age_secs: min_age_secs,
                cooldown_secs,
                enabled,
                max_referral_depth: max_depth,
                score_policy,
                claim_policy,
                reward_policy,
                reward_ledger: parse_account(&reward_ledger)?,
                reward_symbol: Symbol::new(&symbol_code, symbol_precision)
                    .context("reward symbol")?,
                reward_rate,
                strict_inviter_cooldown,
            };
            let engine = make_engine(&store, &directory, now, &authority);
            engine.set_config(&auth, config).context("set_config rejected")?;
            println!("configuration replaced");
        }

        Command::Register { user, inviter } => {
            let user = parse_account(&user)?;
            let inviter = parse_account(&inviter)?;
            let engine = make_engine(&store, &directory, now, &authority);
            engine
                .register(&auth, now, &user, &inviter)
                .context("registration rejected")?;
            println!("registered {} under {}", user, inviter);
        }

        Command::Claim { user } => {
            let user = parse_account(&user)?;
            let engine = make_engine(&store, &directory, now, &authority);
            let config = engine.config()?;
            let amount = engine.claim(&auth, now, &user).context("claim rejected")?;
            println!("paid {} to {}", config.reward_symbol.format_amount(amount), user);
        }

        Command::Show { account } => {
            let account = parse_account(&account)?;
            let query = ReferralQuery::new(&store);
            match query.get(&account)? {
                Some(p) => println!("{}", serde_json::to_string_pretty(&p)?),
                None => bail!("{} is not a participant", account),
            }
        }

        Command::Upline { account } => {
            let account = parse_account(&account)?;
            let query = ReferralQuery::new(&store);
            let config = current_config(&store, &authority)?;
            let chain = query.upline(&account, config.max_referral_depth)?;
            if chain.is_empty() {
                println!("{} is a forest seed", account);
            }
            for (level, ancestor) in chain.iter().enumerate() {
                println!("level {} — {}", level + 1, ancestor);
            }
        }

        Command::Leaderboard { limit } => {
            let query = ReferralQuery::new(&store);
            let config = current_config(&store, &authority)?;
            for p in query.leaderboard(limit)? {
                println!("{}", query.describe(&p.account, &config, now)?);
            }
        }

        Command::Stats => {
            let stats = ReferralQuery::new(&store).stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            println!("participant rows: {}", store.participant_count());
        }

        Command::Transfers => {
            for t in store.transfers()? {
                println!(
                    "{} → {} | {} {} | {} | at {}",
                    t.from, t.to, t.amount, t.symbol, t.memo, t.at
                );
            }
        }

        Command::Remove { user } => {
            let user = parse_account(&user)?;
            let engine = make_engine(&store, &directory, now, &authority);
            engine.remove_user(&auth, &user).context("removal rejected")?;
            println!("removed {}", user);
        }
    }

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn make_engine<'a>(
    store: &Arc<ReferralStore>,
    directory: &'a JsonDirectory,
    now: Timestamp,
    authority: &AccountId,
) -> ReferralEngine<&'a JsonDirectory, JournalLedger> {
    ReferralEngine::new(
        store.clone(),
        directory,
        JournalLedger::new(store.clone(), now),
        authority.clone(),
    )
}

fn current_config(store: &Arc<ReferralStore>, authority: &AccountId) -> anyhow::Result<Config> {
    // Query-only paths still need depth/cooldown; fall back like the engine.
    let engine = ReferralEngine::new(
        store.clone(),
        NullDirectory,
        JournalLedger::new(store.clone(), 0),
        authority.clone(),
    );
    Ok(engine.config()?)
}

/// Directory double for read-only commands that never consult it.
struct NullDirectory;

impl vouch_engine::AccountDirectory for NullDirectory {
    fn account_exists(&self, _account: &AccountId) -> bool {
        false
    }

    fn creation_time(&self, account: &AccountId) -> Result<Timestamp, vouch_core::VouchError> {
        Err(vouch_core::VouchError::UnknownAccount(account.to_string()))
    }
}

fn parse_account(name: &str) -> anyhow::Result<AccountId> {
    AccountId::new(name).with_context(|| format!("invalid account name: {name}"))
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.clone()
}
