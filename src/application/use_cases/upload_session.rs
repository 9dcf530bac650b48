// ============================================================
// UPLOAD SESSION
// ============================================================
// Locally owned state for the latest upload; one upload at a time

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::error::{AppError, Result};
use crate::domain::records::UploadResult;

/// Proof that the holder owns the upload slot for one generation
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Default)]
pub struct UploadSession {
    generation: u64,
    in_flight: Option<u64>,
    current: Option<UploadResult>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the upload slot. Overlapping uploads are refused instead of
    /// letting the last writer win.
    pub fn begin(&mut self) -> Result<UploadTicket> {
        if self.in_flight.is_some() {
            return Err(AppError::Conflict(
                "an upload is already in progress".to_string(),
            ));
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        Ok(UploadTicket(self.generation))
    }

    /// Store a finished upload, replacing the previous one.
    ///
    /// Returns false, storing nothing, when the ticket was invalidated by a
    /// reset while the upload ran.
    pub fn complete(&mut self, ticket: UploadTicket, result: UploadResult) -> bool {
        if !self.holds(&ticket) {
            return false;
        }
        self.current = Some(result);
        self.in_flight = None;
        true
    }

    /// Release the slot after a failed upload; no partial state is kept
    pub fn fail(&mut self, ticket: UploadTicket) -> bool {
        if !self.holds(&ticket) {
            return false;
        }
        self.current = None;
        self.in_flight = None;
        true
    }

    /// Give the slot back without touching the stored result
    pub fn release(&mut self, ticket: UploadTicket) {
        if self.holds(&ticket) {
            self.in_flight = None;
        }
    }

    /// Clear everything. An upload still running is orphaned and its result
    /// will be discarded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.current = None;
        self.in_flight = None;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current(&self) -> Option<&UploadResult> {
        self.current.as_ref()
    }

    fn holds(&self, ticket: &UploadTicket) -> bool {
        self.in_flight == Some(ticket.0)
    }
}

/// Upload slot held across an async upload.
///
/// Dropping it without `complete`/`fail` (a cancelled request) releases the
/// slot so later uploads are not locked out.
pub struct UploadSlot {
    session: Arc<Mutex<UploadSession>>,
    ticket: Option<UploadTicket>,
}

impl UploadSlot {
    pub fn claim(session: &Arc<Mutex<UploadSession>>) -> Result<Self> {
        let ticket = lock(session).begin()?;
        Ok(Self {
            session: Arc::clone(session),
            ticket: Some(ticket),
        })
    }

    pub fn complete(mut self, result: UploadResult) -> bool {
        match self.ticket.take() {
            Some(ticket) => lock(&self.session).complete(ticket, result),
            None => false,
        }
    }

    pub fn fail(mut self) -> bool {
        match self.ticket.take() {
            Some(ticket) => lock(&self.session).fail(ticket),
            None => false,
        }
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            tracing::warn!("Upload abandoned before finishing; releasing slot");
            lock(&self.session).release(ticket);
        }
    }
}

fn lock(session: &Mutex<UploadSession>) -> std::sync::MutexGuard<'_, UploadSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::upload_processor::UploadProcessor;
    use crate::domain::records::RawRow;

    fn sample_result() -> UploadResult {
        let rows = vec![RawRow::new().with("Nombre", "Ana")];
        UploadProcessor::default()
            .process_rows("contactos.xlsx", &rows)
            .unwrap()
    }

    fn shared() -> Arc<Mutex<UploadSession>> {
        Arc::new(Mutex::new(UploadSession::new()))
    }

    #[test]
    fn test_second_begin_is_refused_while_in_flight() {
        let mut session = UploadSession::new();
        session.begin().unwrap();
        assert!(matches!(session.begin(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_complete_replaces_previous_result() {
        let mut session = UploadSession::new();
        let ticket = session.begin().unwrap();
        session.complete(ticket, sample_result());
        let first_id = session.current().unwrap().upload_id;

        let ticket = session.begin().unwrap();
        assert!(session.complete(ticket, sample_result()));
        assert_ne!(session.current().unwrap().upload_id, first_id);
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_fail_clears_result_and_releases_slot() {
        let mut session = UploadSession::new();
        let ticket = session.begin().unwrap();
        session.complete(ticket, sample_result());

        let ticket = session.begin().unwrap();
        assert!(session.fail(ticket));
        assert!(session.current().is_none());
        assert!(session.begin().is_ok());
    }

    #[test]
    fn test_reset() {
        let mut session = UploadSession::new();
        let ticket = session.begin().unwrap();
        session.complete(ticket, sample_result());
        session.reset();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_reset_orphans_running_upload() {
        let mut session = UploadSession::new();
        let first = session.begin().unwrap();
        session.reset();
        let second = session.begin().unwrap();

        // The orphaned upload finishes while the second one is running
        assert!(!session.complete(first, sample_result()));
        assert!(session.current().is_none());
        assert!(session.is_in_flight());
        assert!(matches!(session.begin(), Err(AppError::Conflict(_))));

        assert!(session.complete(second, sample_result()));
        assert!(session.current().is_some());
    }

    #[test]
    fn test_orphaned_failure_keeps_newer_result() {
        let mut session = UploadSession::new();
        let first = session.begin().unwrap();
        session.reset();
        let second = session.begin().unwrap();
        session.complete(second, sample_result());

        assert!(!session.fail(first));
        assert!(session.current().is_some());
    }

    #[test]
    fn test_dropped_slot_releases_upload() {
        let session = shared();
        let slot = UploadSlot::claim(&session).unwrap();
        assert!(matches!(
            UploadSlot::claim(&session),
            Err(AppError::Conflict(_))
        ));

        drop(slot);
        assert!(!lock(&session).is_in_flight());
        assert!(UploadSlot::claim(&session).is_ok());
    }

    #[test]
    fn test_slot_complete_stores_result() {
        let session = shared();
        let slot = UploadSlot::claim(&session).unwrap();
        assert!(slot.complete(sample_result()));

        let guard = lock(&session);
        assert!(guard.current().is_some());
        assert!(!guard.is_in_flight());
    }

    #[test]
    fn test_slot_dropped_after_reset_leaves_new_upload_alone() {
        let session = shared();
        let orphan = UploadSlot::claim(&session).unwrap();
        lock(&session).reset();
        let _running = UploadSlot::claim(&session).unwrap();

        drop(orphan);
        assert!(lock(&session).is_in_flight());
    }
}
