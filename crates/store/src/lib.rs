//! In-memory system of record for the raffle platform.
//!
//! All state is volatile; the platform runs without durable storage. The
//! store
//! owns a single [`PlatformState`] behind an `RwLock`; reads clone snapshots
//! out, and every mutation runs a pure domain transformation under the write
//! lock so check-then-set sequences (ticket reservation above all) stay
//! atomic across sessions.

mod error;
mod state;

pub use error::StoreError;
pub use state::PlatformState;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use domain::models::{Organizer, PlatformConfig, Raffle, RaffleSpec, RaffleStatus};
use domain::services::draw::{self, DrawOutcome};
use domain::services::fees;
use domain::services::ledger::{self, LedgerRow, Receipt};
use domain::services::reservation::{self, BuyerInfo, Reservation};
use domain::DomainError;

/// Shared handle to the platform state.
pub struct PlatformStore {
    inner: RwLock<PlatformState>,
}

impl PlatformStore {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            inner: RwLock::new(PlatformState::new(config)),
        }
    }

    // A poisoned lock means another thread panicked mid-write; the state
    // itself is still a consistent snapshot because transformations replace
    // values wholesale, so recover the guard instead of propagating.
    fn read(&self) -> RwLockReadGuard<'_, PlatformState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PlatformState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- organizers ----

    /// Registers a new organizer. The username must already be lowercased by
    /// the caller; uniqueness is enforced here against the current set.
    pub fn register_organizer(&self, organizer: Organizer) -> Result<Organizer, StoreError> {
        let mut state = self.write();
        if state
            .organizers
            .iter()
            .any(|o| o.username == organizer.username)
        {
            return Err(DomainError::DuplicateUsername.into());
        }
        tracing::info!(username = %organizer.username, "organizer registered");
        state.organizers.push(organizer.clone());
        Ok(organizer)
    }

    pub fn organizer_by_username(&self, username: &str) -> Option<Organizer> {
        self.read()
            .organizers
            .iter()
            .find(|o| o.username == username)
            .cloned()
    }

    pub fn organizer_by_id(&self, id: Uuid) -> Option<Organizer> {
        self.read().organizers.iter().find(|o| o.id == id).cloned()
    }

    pub fn list_organizers(&self) -> Vec<Organizer> {
        self.read().organizers.clone()
    }

    /// Toggles the blocked flag. Blocking only affects authentication.
    pub fn toggle_organizer_blocked(&self, id: Uuid) -> Result<Organizer, StoreError> {
        let mut state = self.write();
        let org = state
            .organizers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::OrganizerNotFound)?;
        org.blocked = !org.blocked;
        tracing::info!(username = %org.username, blocked = org.blocked, "organizer block toggled");
        Ok(org.clone())
    }

    /// Deletes an organizer and cascades to all raffles they own.
    pub fn delete_organizer(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.write();
        if !state.organizers.iter().any(|o| o.id == id) {
            return Err(StoreError::OrganizerNotFound);
        }
        state.organizers.retain(|o| o.id != id);
        let before = state.raffles.len();
        state.raffles.retain(|r| r.organizer_id != id);
        tracing::info!(
            organizer = %id,
            raffles_removed = before - state.raffles.len(),
            "organizer deleted"
        );
        Ok(())
    }

    // ---- raffles ----

    /// Creates a raffle for an organizer, snapshotting the fee percent in
    /// effect right now and generating a code unique among current raffles.
    pub fn create_raffle(
        &self,
        organizer_id: Uuid,
        spec: RaffleSpec,
    ) -> Result<Raffle, StoreError> {
        let mut state = self.write();
        let organizer = state
            .organizers
            .iter()
            .find(|o| o.id == organizer_id)
            .cloned()
            .ok_or(StoreError::OrganizerNotFound)?;

        let code = shared::codes::generate_unique_code(|c| {
            state.raffles.iter().any(|r| r.code == c)
        });
        let raffle = Raffle::create(spec, &organizer, code, state.config.fee_percent);
        tracing::info!(code = %raffle.code, organizer = %organizer.username, "raffle created");
        state.raffles.push(raffle.clone());
        Ok(raffle)
    }

    pub fn raffle_by_id(&self, id: Uuid) -> Option<Raffle> {
        self.read().raffles.iter().find(|r| r.id == id).cloned()
    }

    pub fn raffle_by_code(&self, code: &str) -> Option<Raffle> {
        let code = code.to_uppercase();
        self.read().raffles.iter().find(|r| r.code == code).cloned()
    }

    pub fn list_raffles(&self) -> Vec<Raffle> {
        self.read().raffles.clone()
    }

    /// Active raffles for the public storefront, optionally filtered by code
    /// or name substring.
    pub fn list_active_raffles(&self, search: Option<&str>) -> Vec<Raffle> {
        let state = self.read();
        state
            .raffles
            .iter()
            .filter(|r| r.status == RaffleStatus::Active)
            .filter(|r| match search {
                Some(q) if !q.is_empty() => {
                    r.code.contains(&q.to_uppercase())
                        || r.name.to_lowercase().contains(&q.to_lowercase())
                }
                _ => true,
            })
            .cloned()
            .collect()
    }

    pub fn raffles_for_organizer(&self, organizer_id: Uuid) -> Vec<Raffle> {
        self.read()
            .raffles
            .iter()
            .filter(|r| r.organizer_id == organizer_id)
            .cloned()
            .collect()
    }

    /// Looks up a raffle and checks it belongs to the organizer.
    fn owned_raffle<'a>(
        state: &'a PlatformState,
        raffle_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<&'a Raffle, StoreError> {
        let raffle = state
            .raffles
            .iter()
            .find(|r| r.id == raffle_id)
            .ok_or(StoreError::RaffleNotFound)?;
        if raffle.organizer_id != organizer_id {
            return Err(StoreError::NotOwner);
        }
        Ok(raffle)
    }

    fn replace_raffle(state: &mut PlatformState, updated: Raffle) {
        if let Some(slot) = state.raffles.iter_mut().find(|r| r.id == updated.id) {
            *slot = updated;
        }
    }

    // ---- reservation (the critical section) ----

    /// Reserves numbers on an active raffle, addressed by its public code.
    /// Availability is re-checked under the write lock immediately before
    /// committing, so concurrent sessions cannot double-book a number.
    pub fn reserve_numbers(
        &self,
        code: &str,
        numbers: &[u32],
        buyer: &BuyerInfo,
    ) -> Result<Reservation, StoreError> {
        let mut state = self.write();
        let code = code.to_uppercase();
        let raffle = state
            .raffles
            .iter()
            .find(|r| r.code == code)
            .ok_or(StoreError::RaffleNotFound)?;

        let reservation = reservation::reserve(raffle, numbers, buyer)?;
        Self::replace_raffle(&mut state, reservation.raffle.clone());
        Ok(reservation)
    }

    // ---- payment ledger ----

    pub fn ledger(
        &self,
        raffle_id: Uuid,
        organizer_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<LedgerRow>, StoreError> {
        let state = self.read();
        let raffle = Self::owned_raffle(&state, raffle_id, organizer_id)?;
        let rows = ledger::build_ledger(raffle);
        Ok(match search {
            Some(q) => ledger::search_ledger(rows, q),
            None => rows,
        })
    }

    pub fn toggle_paid(
        &self,
        raffle_id: Uuid,
        organizer_id: Uuid,
        purchase_key: &str,
        number: u32,
    ) -> Result<Raffle, StoreError> {
        let mut state = self.write();
        let raffle = Self::owned_raffle(&state, raffle_id, organizer_id)?;
        let updated = ledger::toggle_paid(raffle, purchase_key, number);
        Self::replace_raffle(&mut state, updated.clone());
        Ok(updated)
    }

    pub fn mark_all_paid(
        &self,
        raffle_id: Uuid,
        organizer_id: Uuid,
        purchase_key: &str,
    ) -> Result<Raffle, StoreError> {
        let mut state = self.write();
        let raffle = Self::owned_raffle(&state, raffle_id, organizer_id)?;
        let updated = ledger::mark_all_paid(raffle, purchase_key);
        Self::replace_raffle(&mut state, updated.clone());
        Ok(updated)
    }

    pub fn receipt(
        &self,
        raffle_id: Uuid,
        organizer_id: Uuid,
        purchase_key: &str,
    ) -> Result<Receipt, StoreError> {
        let state = self.read();
        let raffle = Self::owned_raffle(&state, raffle_id, organizer_id)?;
        ledger::build_receipt(raffle, purchase_key).ok_or(StoreError::PurchaseNotFound)
    }

    // ---- draw ----

    /// Draws a winner among the paid numbers of the organizer's raffle,
    /// using the platform's minimum-eligible rule.
    pub fn draw(&self, raffle_id: Uuid, organizer_id: Uuid) -> Result<DrawOutcome, StoreError> {
        let state = self.read();
        let raffle = Self::owned_raffle(&state, raffle_id, organizer_id)?;
        Ok(draw::draw(raffle, state.config.min_draw_eligible)?)
    }

    // ---- fee settlement & raffle lifecycle (admin) ----

    pub fn confirm_fee(&self, raffle_id: Uuid) -> Result<Raffle, StoreError> {
        let mut state = self.write();
        let raffle = state
            .raffles
            .iter()
            .find(|r| r.id == raffle_id)
            .ok_or(StoreError::RaffleNotFound)?;
        let updated = fees::confirm_fee_payment(raffle)?;
        Self::replace_raffle(&mut state, updated.clone());
        Ok(updated)
    }

    pub fn deactivate_raffle(&self, raffle_id: Uuid) -> Result<Raffle, StoreError> {
        let mut state = self.write();
        let raffle = state
            .raffles
            .iter()
            .find(|r| r.id == raffle_id)
            .ok_or(StoreError::RaffleNotFound)?;
        let updated = fees::deactivate(raffle)?;
        Self::replace_raffle(&mut state, updated.clone());
        Ok(updated)
    }

    pub fn delete_raffle(&self, raffle_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.write();
        if !state.raffles.iter().any(|r| r.id == raffle_id) {
            return Err(StoreError::RaffleNotFound);
        }
        state.raffles.retain(|r| r.id != raffle_id);
        Ok(())
    }

    // ---- platform config & admin credential ----

    pub fn config(&self) -> PlatformConfig {
        self.read().config.clone()
    }

    /// First-time admin setup. Fails once an admin credential exists.
    pub fn setup_admin(&self, username: String, password_hash: String) -> Result<(), StoreError> {
        let mut state = self.write();
        if state.config.initialized {
            return Err(StoreError::AdminAlreadyConfigured);
        }
        state.config.admin_username = Some(username);
        state.config.admin_password_hash = Some(password_hash);
        state.config.initialized = true;
        tracing::info!("admin credential configured");
        Ok(())
    }

    pub fn admin_credential(&self) -> Option<(String, String)> {
        let state = self.read();
        match (
            &state.config.admin_username,
            &state.config.admin_password_hash,
        ) {
            (Some(u), Some(h)) => Some((u.clone(), h.clone())),
            _ => None,
        }
    }

    pub fn set_admin_password_hash(&self, password_hash: String) -> Result<(), StoreError> {
        let mut state = self.write();
        if !state.config.initialized {
            return Err(DomainError::AdminNotConfigured.into());
        }
        state.config.admin_password_hash = Some(password_hash);
        Ok(())
    }

    /// Updates platform settings. The fee percent applies to new raffles
    /// only; existing raffles keep their creation-time snapshot.
    pub fn update_platform_settings(
        &self,
        name: Option<String>,
        subtitle: Option<String>,
        fee_percent: Option<f64>,
        pix_key: Option<String>,
        pix_name: Option<String>,
        min_draw_eligible: Option<usize>,
    ) -> PlatformConfig {
        let mut state = self.write();
        if let Some(v) = name {
            state.config.name = v;
        }
        if let Some(v) = subtitle {
            state.config.subtitle = v;
        }
        if let Some(v) = fee_percent {
            state.config.fee_percent = v;
        }
        if let Some(v) = pix_key {
            state.config.pix_key = v;
        }
        if let Some(v) = pix_name {
            state.config.pix_name = v;
        }
        if let Some(v) = min_draw_eligible {
            state.config.min_draw_eligible = v;
        }
        state.config.clone()
    }
}

/// Convenience constructor for a raffle spec, used by the API layer.
pub fn raffle_spec(
    name: String,
    prize: String,
    prize_value: f64,
    total_numbers: u32,
    price_per_number: f64,
    draw_date: Option<NaiveDate>,
    description: Option<String>,
) -> RaffleSpec {
    RaffleSpec {
        name,
        prize,
        prize_value,
        total_numbers,
        price_per_number,
        draw_date,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PlatformStore {
        PlatformStore::new(PlatformConfig::default())
    }

    fn register(store: &PlatformStore, username: &str) -> Organizer {
        store
            .register_organizer(Organizer::new(
                username.into(),
                "hash".into(),
                "Ana Silva".into(),
                "8899990000".into(),
                "ana@pix".into(),
            ))
            .unwrap()
    }

    fn spec() -> RaffleSpec {
        raffle_spec("Rifa".into(), "TV".into(), 1000.0, 10, 5.0, None, None)
    }

    fn buyer() -> BuyerInfo {
        BuyerInfo {
            name: "Ana".into(),
            phone: "8888-0000".into(),
            email: None,
        }
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let s = store();
        register(&s, "ana");
        let err = s
            .register_organizer(Organizer::new(
                "ana".into(),
                "h".into(),
                "Other".into(),
                "111".into(),
                "x".into(),
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::DuplicateUsername)
        ));
        assert_eq!(s.list_organizers().len(), 1);
    }

    #[test]
    fn test_create_raffle_snapshots_current_fee() {
        let s = store();
        let org = register(&s, "ana");
        let r1 = s.create_raffle(org.id, spec()).unwrap();
        assert_eq!(r1.fee_percent, 5.0);
        assert_eq!(r1.fee_amount, 2.5);

        // fee immutability: changing the global rate leaves r1 untouched
        s.update_platform_settings(None, None, Some(10.0), None, None, None);
        let r2 = s.create_raffle(org.id, spec()).unwrap();
        assert_eq!(r2.fee_percent, 10.0);
        assert_eq!(s.raffle_by_id(r1.id).unwrap().fee_percent, 5.0);
        assert_eq!(s.raffle_by_id(r1.id).unwrap().fee_amount, 2.5);
    }

    #[test]
    fn test_raffle_codes_unique() {
        let s = store();
        let org = register(&s, "ana");
        let mut codes = std::collections::HashSet::new();
        for _ in 0..20 {
            let r = s.create_raffle(org.id, spec()).unwrap();
            assert!(codes.insert(r.code));
        }
    }

    #[test]
    fn test_storefront_lists_active_only() {
        let s = store();
        let org = register(&s, "ana");
        let pending = s.create_raffle(org.id, spec()).unwrap();
        assert!(s.list_active_raffles(None).is_empty());

        s.confirm_fee(pending.id).unwrap();
        assert_eq!(s.list_active_raffles(None).len(), 1);

        s.deactivate_raffle(pending.id).unwrap();
        assert!(s.list_active_raffles(None).is_empty());
    }

    #[test]
    fn test_storefront_search() {
        let s = store();
        let org = register(&s, "ana");
        let mut sp = spec();
        sp.name = "Rifa Solidária".into();
        let r = s.create_raffle(org.id, sp).unwrap();
        s.confirm_fee(r.id).unwrap();

        assert_eq!(s.list_active_raffles(Some("solid")).len(), 1);
        assert_eq!(s.list_active_raffles(Some(&r.code[..5])).len(), 1);
        assert!(s.list_active_raffles(Some("zzz")).is_empty());
    }

    #[test]
    fn test_reserve_via_code_requires_active() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        let err = s.reserve_numbers(&r.code, &[1], &buyer()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::RaffleNotActive)
        ));

        s.confirm_fee(r.id).unwrap();
        let res = s.reserve_numbers(&r.code, &[1, 2], &buyer()).unwrap();
        assert_eq!(res.raffle.sold_count(), 2);
        // committed to the store
        assert_eq!(s.raffle_by_id(r.id).unwrap().sold_count(), 2);
    }

    #[test]
    fn test_reserve_conflict_leaves_state_unchanged() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        s.confirm_fee(r.id).unwrap();
        s.reserve_numbers(&r.code, &[5], &buyer()).unwrap();

        let err = s.reserve_numbers(&r.code, &[4, 5], &buyer()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::NumberAlreadyTaken(5))
        ));
        assert_eq!(s.raffle_by_id(r.id).unwrap().sold_count(), 1);
    }

    #[test]
    fn test_reserve_code_case_insensitive() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        s.confirm_fee(r.id).unwrap();
        assert!(s
            .reserve_numbers(&r.code.to_lowercase(), &[1], &buyer())
            .is_ok());
    }

    #[test]
    fn test_ledger_ownership_enforced() {
        let s = store();
        let ana = register(&s, "ana");
        let bia = register(&s, "bia");
        let r = s.create_raffle(ana.id, spec()).unwrap();
        assert!(matches!(
            s.ledger(r.id, bia.id, None).unwrap_err(),
            StoreError::NotOwner
        ));
        assert!(s.ledger(r.id, ana.id, None).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_and_mark_paid_persist() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        s.confirm_fee(r.id).unwrap();
        let res = s.reserve_numbers(&r.code, &[1, 2], &buyer()).unwrap();
        let key = res.purchase_id.to_string();

        s.toggle_paid(r.id, org.id, &key, 1).unwrap();
        assert_eq!(s.raffle_by_id(r.id).unwrap().paid_count(), 1);

        s.mark_all_paid(r.id, org.id, &key).unwrap();
        assert_eq!(s.raffle_by_id(r.id).unwrap().paid_count(), 2);

        let receipt = s.receipt(r.id, org.id, &key).unwrap();
        assert!(receipt.is_paid);
    }

    #[test]
    fn test_draw_uses_platform_minimum() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        s.confirm_fee(r.id).unwrap();
        let res = s.reserve_numbers(&r.code, &[3], &buyer()).unwrap();
        s.mark_all_paid(r.id, org.id, &res.purchase_id.to_string())
            .unwrap();

        // one paid ticket < default minimum of 2
        assert!(s.draw(r.id, org.id).is_err());

        s.update_platform_settings(None, None, None, None, None, Some(1));
        assert_eq!(s.draw(r.id, org.id).unwrap().winning_number, 3);
    }

    #[test]
    fn test_delete_organizer_cascades() {
        let s = store();
        let ana = register(&s, "ana");
        let bia = register(&s, "bia");
        s.create_raffle(ana.id, spec()).unwrap();
        s.create_raffle(ana.id, spec()).unwrap();
        let kept = s.create_raffle(bia.id, spec()).unwrap();

        s.delete_organizer(ana.id).unwrap();
        assert!(s.organizer_by_id(ana.id).is_none());
        let remaining = s.list_raffles();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[test]
    fn test_admin_setup_once() {
        let s = store();
        assert!(s.admin_credential().is_none());
        s.setup_admin("demetrio".into(), "hash".into()).unwrap();
        assert!(s.admin_credential().is_some());
        assert!(matches!(
            s.setup_admin("other".into(), "h".into()).unwrap_err(),
            StoreError::AdminAlreadyConfigured
        ));
    }

    #[test]
    fn test_delete_raffle() {
        let s = store();
        let org = register(&s, "ana");
        let r = s.create_raffle(org.id, spec()).unwrap();
        s.delete_raffle(r.id).unwrap();
        assert!(s.raffle_by_id(r.id).is_none());
        assert!(matches!(
            s.delete_raffle(r.id).unwrap_err(),
            StoreError::RaffleNotFound
        ));
    }
}
