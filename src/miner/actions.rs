//! Action IDs for miner click targets.
//!
//! Registered during render and dispatched back through `InputEvent::Click`.

pub const CLAIM: u16 = 0;
pub const CHECK_IN: u16 = 1;
pub const ADD_REFERRAL: u16 = 2;

// base + UpgradeKind::all() index
pub const BUY_UPGRADE_BASE: u16 = 100;

// base + TASKS index
pub const COMPLETE_TASK_BASE: u16 = 200;

// base + PREMIUM_PLANS index
pub const ACTIVATE_PLAN_BASE: u16 = 300;

// ── Keyboard bindings ───────────────────────────────────────────
pub const UPGRADE_KEYS: [char; 3] = ['1', '2', '3'];
pub const TASK_KEYS: [char; 4] = ['q', 'w', 'e', 'r'];
pub const PLAN_KEYS: [char; 3] = ['7', '8', '9'];
