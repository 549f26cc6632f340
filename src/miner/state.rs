//! 10C Miner game state definitions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Coins per hour for each mining speed level.
pub const MINING_RATES: [u64; 6] = [10, 25, 50, 100, 200, 500];

/// Hours of storage for each mining capacity level.
pub const CAPACITY_HOURS: [u64; 6] = [1, 2, 4, 8, 16, 32];

pub const MINING_SPEED_COSTS: &[u64] = &[100, 500, 2_000, 5_000, 15_000];
pub const MINING_CAPACITY_COSTS: &[u64] = &[200, 800, 3_000, 8_000, 20_000];
pub const AUTO_COLLECT_COSTS: &[u64] = &[5_000];

/// Flat balance credit per confirmed referral.
pub const REFERRAL_REWARD: u64 = 100;
pub const REFERRAL_PREFIX: &str = "10C";

pub const EXP_PER_LEVEL: u64 = 100;

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Latest instant a JS `Date` can hold; stored timestamps are clamped to
/// `0..=MAX_TIMESTAMP_MS`.
pub const MAX_TIMESTAMP_MS: i64 = 8_640_000_000_000_000;

/// The three upgrade tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    MiningSpeed,
    MiningCapacity,
    AutoCollect,
}

impl UpgradeKind {
    /// All tracks in display order.
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::MiningSpeed,
            UpgradeKind::MiningCapacity,
            UpgradeKind::AutoCollect,
        ]
    }

    /// Ascending cost table. Its length is the track's max level.
    pub fn costs(&self) -> &'static [u64] {
        match self {
            UpgradeKind::MiningSpeed => MINING_SPEED_COSTS,
            UpgradeKind::MiningCapacity => MINING_CAPACITY_COSTS,
            UpgradeKind::AutoCollect => AUTO_COLLECT_COSTS,
        }
    }

    pub fn max_level(&self) -> usize {
        self.costs().len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Upgrades {
    pub mining_speed: u8,
    pub mining_capacity: u8,
    pub auto_collect: bool,
}

/// Outcome of a daily check-in attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckInResult {
    pub success: bool,
    pub reward: u64,
    pub new_streak: u32,
}

/// The player's economic record. This is the only persisted entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub balance: u64,
    /// Lifetime claimed coins. Never decreases.
    pub total_mined: u64,
    /// Always `MINING_RATES[upgrades.mining_speed]`.
    pub mining_rate: u64,
    /// Start of the current accrual window (ms since epoch).
    pub last_claim_time: i64,
    pub check_in_streak: u32,
    #[serde(deserialize_with = "de_check_in_date")]
    pub last_check_in: Option<NaiveDate>,
    pub experience: u64,
    pub referral_count: u32,
    pub referral_code: String,
    pub is_premium: bool,
    /// Recorded for display only; nothing expires the entitlement.
    pub premium_expires_at: Option<i64>,
    pub upgrades: Upgrades,
    pub completed_tasks: BTreeSet<String>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new(0)
    }
}

impl UserRecord {
    /// A fresh record whose accrual window starts at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            balance: 0,
            total_mined: 0,
            mining_rate: MINING_RATES[0],
            last_claim_time: now_ms,
            check_in_streak: 0,
            last_check_in: None,
            experience: 0,
            referral_count: 0,
            referral_code: String::new(),
            is_premium: false,
            premium_expires_at: None,
            upgrades: Upgrades::default(),
            completed_tasks: BTreeSet::new(),
        }
    }

    pub fn level(&self) -> u64 {
        self.experience / EXP_PER_LEVEL + 1
    }

    /// Experience gathered inside the current level (0..EXP_PER_LEVEL).
    pub fn level_progress(&self) -> u64 {
        self.experience % EXP_PER_LEVEL
    }

    pub fn capacity_hours(&self) -> u64 {
        CAPACITY_HOURS[self.upgrades.mining_capacity as usize]
    }

    /// Pending coins at which storage is full.
    pub fn max_pending(&self) -> u64 {
        self.mining_rate * self.capacity_hours()
    }

    /// Storage fill ratio in `[0, 1]` for a given pending amount.
    pub fn fill_ratio(&self, pending: u64) -> f64 {
        let max = self.max_pending();
        if max == 0 {
            return 0.0;
        }
        (pending as f64 / max as f64).min(1.0)
    }

    /// Current level on an upgrade track. `AutoCollect` is 0 or 1.
    pub fn upgrade_level(&self, kind: UpgradeKind) -> usize {
        match kind {
            UpgradeKind::MiningSpeed => self.upgrades.mining_speed as usize,
            UpgradeKind::MiningCapacity => self.upgrades.mining_capacity as usize,
            UpgradeKind::AutoCollect => self.upgrades.auto_collect as usize,
        }
    }

    /// Cost of the next level, or `None` when the track is maxed.
    pub fn next_upgrade_cost(&self, kind: UpgradeKind) -> Option<u64> {
        kind.costs().get(self.upgrade_level(kind)).copied()
    }

    pub fn is_task_completed(&self, task_id: &str) -> bool {
        self.completed_tasks.contains(task_id)
    }

    /// Whole days of premium left, rounded up. `None` when not premium or
    /// already past the recorded expiry.
    pub fn premium_days_left(&self, now_ms: i64) -> Option<u64> {
        if !self.is_premium {
            return None;
        }
        let remaining = self.premium_expires_at?.saturating_sub(now_ms);
        if remaining <= 0 {
            return None;
        }
        Some((remaining as u64).div_ceil(MS_PER_DAY as u64))
    }

    /// Clamp upgrade levels into their tables, timestamps into the range a
    /// browser clock can produce, and re-derive the mining rate. Applied to
    /// every record restored from storage.
    pub fn normalize(&mut self) {
        self.last_claim_time = self.last_claim_time.clamp(0, MAX_TIMESTAMP_MS);
        self.premium_expires_at = self
            .premium_expires_at
            .map(|t| t.clamp(0, MAX_TIMESTAMP_MS));
        let last = (MINING_RATES.len() - 1) as u8;
        self.upgrades.mining_speed = self.upgrades.mining_speed.min(last);
        self.upgrades.mining_capacity = self.upgrades.mining_capacity.min(last);
        self.mining_rate = MINING_RATES[self.upgrades.mining_speed as usize];
    }
}

/// Accepts ISO dates (`2026-10-19`) and the browser `toDateString` form
/// (`Mon Oct 19 2026`) written by version-0 saves.
pub fn parse_check_in_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%a %b %d %Y"))
        .ok()
}

/// Unrecognised date strings load as "never checked in" rather than
/// failing the whole record.
fn de_check_in_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_check_in_date))
}
