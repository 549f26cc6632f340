//! Static catalogs: tasks, premium plans, upgrade descriptions, check-in
//! preview and the referral link.

use super::logic::check_in_reward;
use super::state::UpgradeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Social,
    Daily,
}

/// A one-time task. `id` is the key recorded in `completed_tasks`.
#[derive(Clone, Copy, Debug)]
pub struct TaskDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: u64,
    pub kind: TaskKind,
}

pub const TASKS: &[TaskDef] = &[
    TaskDef {
        id: "telegram",
        title: "Join Telegram Channel",
        description: "Join our official Telegram for updates",
        reward: 500,
        kind: TaskKind::Social,
    },
    TaskDef {
        id: "twitter",
        title: "Follow on X (Twitter)",
        description: "Follow @10C_Official on X",
        reward: 500,
        kind: TaskKind::Social,
    },
    TaskDef {
        id: "invite3",
        title: "Invite 3 Friends",
        description: "Invite 3 friends to earn bonus",
        reward: 1_000,
        kind: TaskKind::Social,
    },
    TaskDef {
        id: "watch_ad",
        title: "Watch Video",
        description: "Watch a short video for coins",
        reward: 50,
        kind: TaskKind::Daily,
    },
];

/// A purchasable premium period. Payment happens outside the game.
#[derive(Clone, Copy, Debug)]
pub struct PremiumPlan {
    pub days: u32,
    pub price: &'static str,
    pub label: &'static str,
    pub popular: bool,
}

pub const PREMIUM_PLANS: &[PremiumPlan] = &[
    PremiumPlan {
        days: 7,
        price: "0.5 TON",
        label: "1 Week",
        popular: false,
    },
    PremiumPlan {
        days: 30,
        price: "1.5 TON",
        label: "1 Month",
        popular: true,
    },
    PremiumPlan {
        days: 90,
        price: "3.5 TON",
        label: "3 Months",
        popular: false,
    },
];

pub const PREMIUM_PERKS: &[&str] = &[
    "1.5x mining rewards",
    "2x daily check-in rewards",
    "1.5x task rewards",
];

pub struct UpgradeInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// One label per level, including level 0.
    pub levels: &'static [&'static str],
}

pub fn upgrade_info(kind: UpgradeKind) -> UpgradeInfo {
    match kind {
        UpgradeKind::MiningSpeed => UpgradeInfo {
            name: "Mining Speed",
            description: "Increase coins mined per hour",
            levels: &["10/hr", "25/hr", "50/hr", "100/hr", "200/hr", "500/hr"],
        },
        UpgradeKind::MiningCapacity => UpgradeInfo {
            name: "Storage Capacity",
            description: "Store more coins before claiming",
            levels: &["1 hour", "2 hours", "4 hours", "8 hours", "16 hours", "32 hours"],
        },
        UpgradeKind::AutoCollect => UpgradeInfo {
            name: "Auto Collector",
            description: "Automatically claim when storage is full",
            levels: &["Disabled", "Enabled"],
        },
    }
}

/// Base (non-premium) reward for streak days 1 through 7.
pub fn check_in_preview() -> [u64; 7] {
    let mut row = [0; 7];
    for (i, slot) in row.iter_mut().enumerate() {
        *slot = check_in_reward(i as u32 + 1, false);
    }
    row
}

/// Top referrers shown on the friends screen. Fixed display data; there is
/// no server-side ranking.
#[derive(Clone, Copy, Debug)]
pub struct LeaderboardEntry {
    pub name: &'static str,
    pub referrals: u32,
    pub reward: u64,
}

pub const LEADERBOARD: &[LeaderboardEntry] = &[
    LeaderboardEntry {
        name: "CryptoKing",
        referrals: 156,
        reward: 10_000,
    },
    LeaderboardEntry {
        name: "MiningPro",
        referrals: 134,
        reward: 7_500,
    },
    LeaderboardEntry {
        name: "TON_Master",
        referrals: 98,
        reward: 5_000,
    },
    LeaderboardEntry {
        name: "BlockHunter",
        referrals: 87,
        reward: 2_500,
    },
    LeaderboardEntry {
        name: "DiamondHands",
        referrals: 76,
        reward: 1_000,
    },
];

pub const REFERRAL_BOT_URL: &str = "https://t.me/10C_bot";

pub fn referral_link(referral_code: &str) -> String {
    format!("{REFERRAL_BOT_URL}?start={referral_code}")
}

/// Message that goes with a shared referral link.
pub fn share_text(referral_code: &str) -> String {
    format!("Join me on 10C and start mining! Use my code: {referral_code}")
}
