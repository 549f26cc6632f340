//! 10C Miner: idle coin mining with upgrades, daily check-ins, tasks,
//! premium and referrals.

pub mod actions;
pub mod catalog;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::clock::Clock;
use crate::input::{ClickState, InputEvent};

use actions::*;
use catalog::{PREMIUM_PLANS, TASKS};
use logic::format_number;
use state::UpgradeKind;
use store::MinerStore;

const MAX_LOG: usize = 50;

pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

pub struct MinerGame<C: Clock> {
    pub store: MinerStore<C>,
    /// Pending coins as of the last poll or action.
    pub pending: u64,
    pub log: Vec<LogEntry>,
}

impl<C: Clock> MinerGame<C> {
    pub fn new(store: MinerStore<C>) -> Self {
        let pending = store.calculate_pending_coins();
        let mut game = Self {
            store,
            pending,
            log: Vec::new(),
        };
        game.add_log("Welcome to 10C Miner!", false);
        if pending > 0 {
            let msg = format!("{} coins mined while you were away", format_number(pending));
            game.add_log(&msg, false);
        }
        game
    }

    fn add_log(&mut self, text: &str, important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    fn refresh_pending(&mut self) {
        self.pending = self.store.calculate_pending_coins();
    }

    /// Handle a key or click. Returns true if the event mapped to an action.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let action = match event {
            InputEvent::Key(c) => match key_action(*c) {
                Some(a) => a,
                None => return false,
            },
            InputEvent::Click(id) => *id,
        };
        let handled = self.dispatch(action);
        if handled {
            self.refresh_pending();
        }
        handled
    }

    fn dispatch(&mut self, action: u16) -> bool {
        match action {
            CLAIM => self.claim(),
            CHECK_IN => self.check_in(),
            ADD_REFERRAL => {
                self.store.add_referral();
                self.add_log(
                    &format!("Friend joined! +{} coins", state::REFERRAL_REWARD),
                    true,
                );
            }
            a if a >= BUY_UPGRADE_BASE && a < COMPLETE_TASK_BASE => {
                match UpgradeKind::all().get((a - BUY_UPGRADE_BASE) as usize) {
                    Some(&kind) => self.buy_upgrade(kind),
                    None => return false,
                }
            }
            a if a >= COMPLETE_TASK_BASE && a < ACTIVATE_PLAN_BASE => {
                match TASKS.get((a - COMPLETE_TASK_BASE) as usize) {
                    Some(task) => self.complete_task(task.id, task.title, task.reward),
                    None => return false,
                }
            }
            a if a >= ACTIVATE_PLAN_BASE => {
                match PREMIUM_PLANS.get((a - ACTIVATE_PLAN_BASE) as usize) {
                    Some(plan) => {
                        self.store.activate_premium(plan.days);
                        self.add_log(&format!("Premium active for {} days", plan.days), true);
                    }
                    None => return false,
                }
            }
            _ => return false,
        }
        true
    }

    fn claim(&mut self) {
        let credited = self.store.claim_coins();
        if credited > 0 {
            self.add_log(&format!("Claimed {} coins", format_number(credited)), true);
        } else {
            self.add_log("Nothing to claim yet", false);
        }
    }

    fn check_in(&mut self) {
        let result = self.store.perform_check_in();
        if result.success {
            self.add_log(
                &format!(
                    "Day {} check-in: +{} coins",
                    result.new_streak,
                    format_number(result.reward)
                ),
                true,
            );
        } else {
            self.add_log("Already checked in today", false);
        }
    }

    fn buy_upgrade(&mut self, kind: UpgradeKind) {
        let name = catalog::upgrade_info(kind).name;
        let Some(cost) = self.store.user().next_upgrade_cost(kind) else {
            self.add_log(&format!("{name} is already maxed"), false);
            return;
        };
        if self.store.purchase_upgrade(kind) {
            let level = self.store.user().upgrade_level(kind);
            let label = catalog::upgrade_info(kind).levels[level];
            self.add_log(&format!("{name} upgraded: {label}"), true);
        } else {
            let short = cost - self.store.user().balance.min(cost);
            self.add_log(
                &format!("{name}: need {} more coins", format_number(short)),
                false,
            );
        }
    }

    fn complete_task(&mut self, id: &str, title: &str, reward: u64) {
        let before = self.store.user().balance;
        if self.store.complete_task(id, reward) {
            let credited = self.store.user().balance - before;
            self.add_log(&format!("{title}: +{} coins", format_number(credited)), true);
        } else {
            self.add_log(&format!("{title}: already completed"), false);
        }
    }

    /// Advance by `polls` poll intervals: run auto-collect and refresh the
    /// pending counter.
    pub fn tick(&mut self, polls: u32) {
        if polls == 0 {
            return;
        }
        let collected = self.store.check_auto_collect();
        if collected > 0 {
            self.add_log(
                &format!("Auto-collected {} coins", format_number(collected)),
                true,
            );
        }
        self.refresh_pending();
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

fn key_action(key: char) -> Option<u16> {
    let index_of = |keys: &[char]| keys.iter().position(|&k| k == key).map(|i| i as u16);
    match key {
        'c' => Some(CLAIM),
        'd' => Some(CHECK_IN),
        'f' => Some(ADD_REFERRAL),
        _ => index_of(&UPGRADE_KEYS)
            .map(|i| BUY_UPGRADE_BASE + i)
            .or_else(|| index_of(&TASK_KEYS).map(|i| COMPLETE_TASK_BASE + i))
            .or_else(|| index_of(&PLAN_KEYS).map(|i| ACTIVATE_PLAN_BASE + i)),
    }
}
