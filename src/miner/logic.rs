//! 10C Miner game logic — pure functions over a `UserRecord`, fully testable.
//!
//! Time enters only as arguments (`now_ms`, `today`), so every rule here is
//! deterministic. Persistence and the clock live in `store.rs`.

use chrono::NaiveDate;

use super::state::{
    CheckInResult, UpgradeKind, UserRecord, MINING_RATES, MS_PER_DAY, MS_PER_HOUR,
    REFERRAL_PREFIX, REFERRAL_REWARD,
};

pub const CHECK_IN_BASE_REWARD: u64 = 50;
pub const CHECK_IN_STREAK_BONUS: u64 = 10;
/// Streak days beyond this earn no extra bonus.
pub const CHECK_IN_STREAK_CAP: u32 = 7;

pub const CLAIM_EXP_DIVISOR: u64 = 10;
pub const CHECK_IN_EXP: u64 = 25;
pub const UPGRADE_EXP: u64 = 50;
pub const TASK_EXP: u64 = 25;

/// Auto-collect fires once storage is this full (percent).
pub const AUTO_COLLECT_THRESHOLD_PCT: u64 = 95;

const REFERRAL_TOKEN_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ── Mining ────────────────────────────────────────────────────────────

/// Coins accrued since the last claim, saturating at storage capacity.
pub fn calculate_pending_coins(user: &UserRecord, now_ms: i64) -> u64 {
    let elapsed = now_ms.saturating_sub(user.last_claim_time);
    if elapsed <= 0 {
        return 0;
    }
    let cap_ms = user.capacity_hours() as i64 * MS_PER_HOUR;
    let effective = elapsed.min(cap_ms) as u128;
    (effective * user.mining_rate as u128 / MS_PER_HOUR as u128) as u64
}

/// 1.5x for premium, floored. Used by claims and task rewards.
fn premium_boost(user: &UserRecord, amount: u64) -> u64 {
    if user.is_premium {
        amount.saturating_mul(3) / 2
    } else {
        amount
    }
}

/// Credit pending coins and restart the accrual window. Returns the amount
/// credited; 0 means nothing changed.
pub fn claim_coins(user: &mut UserRecord, now_ms: i64) -> u64 {
    let pending = calculate_pending_coins(user, now_ms);
    if pending == 0 {
        return 0;
    }
    let credited = premium_boost(user, pending);
    user.balance = user.balance.saturating_add(credited);
    user.total_mined = user.total_mined.saturating_add(credited);
    user.experience = user.experience.saturating_add(credited / CLAIM_EXP_DIVISOR);
    user.last_claim_time = now_ms;
    credited
}

/// Claim when auto-collect is owned and storage is at least 95% full.
pub fn check_auto_collect(user: &mut UserRecord, now_ms: i64) -> u64 {
    if !user.upgrades.auto_collect {
        return 0;
    }
    let pending = calculate_pending_coins(user, now_ms);
    if pending * 100 >= user.max_pending() * AUTO_COLLECT_THRESHOLD_PCT {
        claim_coins(user, now_ms)
    } else {
        0
    }
}

// ── Check-in ──────────────────────────────────────────────────────────

/// Reward for a successful check-in at the given streak.
pub fn check_in_reward(streak: u32, is_premium: bool) -> u64 {
    let bonus = streak.min(CHECK_IN_STREAK_CAP) as u64 * CHECK_IN_STREAK_BONUS;
    let reward = CHECK_IN_BASE_REWARD + bonus;
    if is_premium {
        reward * 2
    } else {
        reward
    }
}

/// Daily check-in keyed by local calendar date.
pub fn perform_check_in(user: &mut UserRecord, today: NaiveDate) -> CheckInResult {
    if user.last_check_in == Some(today) {
        return CheckInResult {
            success: false,
            reward: 0,
            new_streak: user.check_in_streak,
        };
    }

    let continues = user.last_check_in.is_some() && user.last_check_in == today.pred_opt();
    let new_streak = if continues {
        user.check_in_streak.saturating_add(1)
    } else {
        1
    };
    let reward = check_in_reward(new_streak, user.is_premium);

    user.balance = user.balance.saturating_add(reward);
    user.check_in_streak = new_streak;
    user.last_check_in = Some(today);
    user.experience = user.experience.saturating_add(CHECK_IN_EXP);

    CheckInResult {
        success: true,
        reward,
        new_streak,
    }
}

// ── Upgrades ──────────────────────────────────────────────────────────

/// Buy the next level of an upgrade track. Fails when maxed or unaffordable.
pub fn purchase_upgrade(user: &mut UserRecord, kind: UpgradeKind) -> bool {
    let cost = match user.next_upgrade_cost(kind) {
        Some(c) => c,
        None => return false,
    };
    if user.balance < cost {
        return false;
    }

    user.balance -= cost;
    match kind {
        UpgradeKind::MiningSpeed => {
            user.upgrades.mining_speed += 1;
            user.mining_rate = MINING_RATES[user.upgrades.mining_speed as usize];
        }
        UpgradeKind::MiningCapacity => user.upgrades.mining_capacity += 1,
        UpgradeKind::AutoCollect => user.upgrades.auto_collect = true,
    }
    user.experience = user.experience.saturating_add(UPGRADE_EXP);
    true
}

// ── Premium / tasks / referrals ───────────────────────────────────────

/// Grant premium for `days` from now. A repeat activation replaces the
/// previous expiry; remaining time is not carried over.
pub fn activate_premium(user: &mut UserRecord, now_ms: i64, days: u32) {
    user.is_premium = true;
    user.premium_expires_at = Some(now_ms.saturating_add(days as i64 * MS_PER_DAY));
}

/// Redeem a one-time task. Fails if the id was already redeemed.
pub fn complete_task(user: &mut UserRecord, task_id: &str, reward: u64) -> bool {
    if user.is_task_completed(task_id) {
        return false;
    }
    user.balance = user.balance.saturating_add(premium_boost(user, reward));
    user.completed_tasks.insert(task_id.to_string());
    user.experience = user.experience.saturating_add(TASK_EXP);
    true
}

pub fn add_referral(user: &mut UserRecord) {
    user.referral_count = user.referral_count.saturating_add(1);
    user.balance = user.balance.saturating_add(REFERRAL_REWARD);
}

// ── Referral code ─────────────────────────────────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// `10C` + the last six characters of the device id, uppercased. Without a
/// usable id, six pseudo-random base-36 characters derived from `seed`.
pub fn referral_code(device_id: Option<&str>, seed: u64) -> String {
    match device_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let chars: Vec<char> = id.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(REFERRAL_TOKEN_LEN)..]
                .iter()
                .collect();
            format!("{REFERRAL_PREFIX}{}", tail.to_uppercase())
        }
        None => {
            let mut state = seed;
            let token: String = (0..REFERRAL_TOKEN_LEN)
                .map(|_| {
                    state = next_rng(state);
                    BASE36[((state >> 33) % 36) as usize] as char
                })
                .collect();
            format!("{REFERRAL_PREFIX}{token}")
        }
    }
}

/// Formats an integer with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::miner::state::CAPACITY_HOURS;
    use proptest::prelude::*;

    const NOW: i64 = 1_800_000_000_000;

    fn arb_upgrade_kind() -> impl Strategy<Value = UpgradeKind> {
        prop_oneof![
            Just(UpgradeKind::MiningSpeed),
            Just(UpgradeKind::MiningCapacity),
            Just(UpgradeKind::AutoCollect),
        ]
    }

    #[derive(Clone, Debug)]
    enum Op {
        Wait(i64),
        Claim,
        AutoCollect,
        Buy(UpgradeKind),
        Task(u8, u64),
        Referral,
        Premium(u32),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0i64..20 * MS_PER_HOUR).prop_map(Op::Wait),
            Just(Op::Claim),
            Just(Op::AutoCollect),
            arb_upgrade_kind().prop_map(Op::Buy),
            (0u8..6, 0u64..2_000).prop_map(|(id, r)| Op::Task(id, r)),
            Just(Op::Referral),
            (1u32..90).prop_map(Op::Premium),
        ]
    }

    proptest! {
        #[test]
        fn prop_pending_matches_linear_until_capacity(
            speed in 0usize..6,
            capacity in 0usize..6,
            elapsed in 0i64..40 * MS_PER_HOUR,
        ) {
            let mut user = UserRecord::new(NOW - elapsed);
            user.upgrades.mining_speed = speed as u8;
            user.upgrades.mining_capacity = capacity as u8;
            user.mining_rate = MINING_RATES[speed];

            let pending = calculate_pending_coins(&user, NOW);
            let cap_ms = CAPACITY_HOURS[capacity] as i64 * MS_PER_HOUR;
            let effective = elapsed.min(cap_ms);
            let expected =
                (effective as f64 / MS_PER_HOUR as f64 * MINING_RATES[speed] as f64).floor() as u64;
            // Integer math can only differ from the float form by rounding at the boundary.
            prop_assert!(
                pending.abs_diff(expected) <= 1,
                "pending={} expected={}",
                pending,
                expected
            );
            prop_assert!(pending <= user.max_pending());
        }

        #[test]
        fn prop_claim_then_pending_is_zero(
            elapsed in 1i64..40 * MS_PER_HOUR,
            premium in any::<bool>(),
        ) {
            let mut user = UserRecord::new(NOW - elapsed);
            user.is_premium = premium;
            claim_coins(&mut user, NOW);
            prop_assert_eq!(calculate_pending_coins(&user, NOW), 0);
        }

        #[test]
        fn prop_invariants_hold_over_random_sessions(
            ops in prop::collection::vec(arb_op(), 0..60),
        ) {
            let mut user = UserRecord::new(NOW);
            user.balance = 1_000;
            let mut now = NOW;
            let mut total_mined = 0;
            let mut last_claim = user.last_claim_time;

            for op in ops {
                match op {
                    Op::Wait(ms) => now += ms,
                    Op::Claim => { claim_coins(&mut user, now); }
                    Op::AutoCollect => { check_auto_collect(&mut user, now); }
                    Op::Buy(kind) => { purchase_upgrade(&mut user, kind); }
                    Op::Task(id, reward) => {
                        complete_task(&mut user, &format!("task{id}"), reward);
                    }
                    Op::Referral => add_referral(&mut user),
                    Op::Premium(days) => activate_premium(&mut user, now, days),
                }
                let speed = user.upgrades.mining_speed as usize;
                prop_assert_eq!(user.mining_rate, MINING_RATES[speed]);
                prop_assert!(user.total_mined >= total_mined);
                prop_assert!(user.last_claim_time >= last_claim);
                prop_assert!(user.completed_tasks.len() <= 6);
                total_mined = user.total_mined;
                last_claim = user.last_claim_time;
            }
        }
    }
}
