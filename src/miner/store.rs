//! The miner's state owner.
//!
//! `MinerStore` holds the record, the clock and the storage slot. Every
//! operation that changes the record writes it straight back to storage.

use super::logic;
use super::save::{self, Storage};
use super::state::{CheckInResult, UpgradeKind, UserRecord};
use crate::clock::Clock;

pub struct MinerStore<C: Clock> {
    user: UserRecord,
    initialized: bool,
    clock: C,
    storage: Box<dyn Storage>,
}

impl<C: Clock> MinerStore<C> {
    /// Restore from storage, or start a default (uninitialized) record.
    pub fn load(clock: C, mut storage: Box<dyn Storage>) -> Self {
        let (user, initialized) = match save::load_game(storage.as_mut()) {
            Some(snap) => (snap.user, snap.initialized),
            None => (UserRecord::new(clock.now_ms()), false),
        };
        Self {
            user,
            initialized,
            clock,
            storage,
        }
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn persist(&mut self) {
        save::save_game(self.storage.as_mut(), &self.user, self.initialized);
    }

    /// Assign the referral code and start the accrual window. No-op once
    /// initialized.
    pub fn initialize(&mut self, device_id: Option<&str>) {
        if self.initialized {
            return;
        }
        let now = self.clock.now_ms();
        self.user.referral_code = logic::referral_code(device_id, now as u64);
        self.user.last_claim_time = now;
        self.initialized = true;
        self.persist();
    }

    /// Mutations on a never-initialized record initialize it first. The
    /// accrual window is kept, so coins already pending stay claimable.
    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.user.referral_code = logic::referral_code(None, self.clock.now_ms() as u64);
        self.initialized = true;
    }

    pub fn calculate_pending_coins(&self) -> u64 {
        logic::calculate_pending_coins(&self.user, self.clock.now_ms())
    }

    pub fn claim_coins(&mut self) -> u64 {
        self.ensure_initialized();
        let credited = logic::claim_coins(&mut self.user, self.clock.now_ms());
        if credited > 0 {
            self.persist();
        }
        credited
    }

    pub fn perform_check_in(&mut self) -> CheckInResult {
        self.ensure_initialized();
        let result = logic::perform_check_in(&mut self.user, self.clock.today());
        if result.success {
            self.persist();
        }
        result
    }

    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        self.ensure_initialized();
        let bought = logic::purchase_upgrade(&mut self.user, kind);
        if bought {
            self.persist();
        }
        bought
    }

    pub fn activate_premium(&mut self, days: u32) {
        self.ensure_initialized();
        logic::activate_premium(&mut self.user, self.clock.now_ms(), days);
        self.persist();
    }

    pub fn complete_task(&mut self, task_id: &str, reward: u64) -> bool {
        self.ensure_initialized();
        let done = logic::complete_task(&mut self.user, task_id, reward);
        if done {
            self.persist();
        }
        done
    }

    pub fn add_referral(&mut self) {
        self.ensure_initialized();
        logic::add_referral(&mut self.user);
        self.persist();
    }

    /// Safe to call every poll: the claim resets the window, so a second
    /// call in the same instant finds nothing pending.
    pub fn check_auto_collect(&mut self) -> u64 {
        if !self.user.upgrades.auto_collect {
            return 0;
        }
        self.ensure_initialized();
        let collected = logic::check_auto_collect(&mut self.user, self.clock.now_ms());
        if collected > 0 {
            self.persist();
        }
        collected
    }
}
