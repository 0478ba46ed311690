use chrono::Utc;

use crate::error::{AppError, Result};
use crate::prompt::{self, GenerationRequest};
use crate::state::{AppState, Mood, MoodSignal, PartnerDetails, Slot, TaskRecord};
use crate::store::StateStore;

/// Explicit state container for the one persisted AppState of a session.
/// All mutation funnels through the setters here, each of which flushes the
/// whole state to storage before returning.
pub struct StateManager {
    state: AppState,
    store: StateStore,
}

impl StateManager {
    pub fn new(store: StateStore) -> Self {
        let state = store.load();
        StateManager { state, store }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Both partner names must be non-empty before the main surface opens.
    pub fn is_setup_complete(&self) -> bool {
        !self.state.partner_a.name.is_empty() && !self.state.partner_b.name.is_empty()
    }

    pub fn set_partner(&mut self, slot: Slot, details: PartnerDetails) -> Result<()> {
        *self.state.partner_mut(slot) = details;
        self.store.save(&self.state)
    }

    /// Overwrite the slot's current mood and return the check-in signal.
    pub fn set_mood(&mut self, slot: Slot, mood: Mood) -> Result<MoodSignal> {
        self.state.current_moods.set(slot, mood);
        self.store.save(&self.state)?;
        Ok(MoodSignal {
            partner: slot,
            mood,
            timestamp: Utc::now(),
        })
    }

    fn record(&mut self, record: TaskRecord) -> Result<()> {
        self.state.push_record(record);
        self.store.save(&self.state)
    }
}

/// Activity lifecycle. A busy flag with a separate nullable activity would
/// allow invalid combinations; the tagged variant makes them unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityPhase {
    Idle,
    Pending,
    Ready(String),
}

/// Drives one activity lifecycle per session. The in-progress activity is
/// transient: it lives only in `ActivityPhase::Ready` and is never persisted.
pub struct ActivitySession {
    manager: StateManager,
    phase: ActivityPhase,
}

impl ActivitySession {
    pub fn new(manager: StateManager) -> Self {
        ActivitySession {
            manager,
            phase: ActivityPhase::Idle,
        }
    }

    pub fn phase(&self) -> &ActivityPhase {
        &self.phase
    }

    pub fn manager(&self) -> &StateManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut StateManager {
        &mut self.manager
    }

    /// Idle -> Pending. Assembles the generation request from current state.
    /// Only one request may be in flight; a second `begin` is rejected until
    /// the first resolves and completes.
    pub fn begin(&mut self) -> Result<GenerationRequest> {
        if self.phase != ActivityPhase::Idle {
            return Err(AppError::Busy);
        }
        let request = prompt::assemble(self.manager.state());
        self.phase = ActivityPhase::Pending;
        Ok(request)
    }

    /// Pending -> Ready on success, Pending -> Idle on failure. A failure
    /// records nothing; the error is handed back for user notification.
    /// Resolving with no request in flight leaves the machine untouched.
    pub fn resolve(&mut self, outcome: Result<String>) -> Result<String> {
        if self.phase != ActivityPhase::Pending {
            return outcome;
        }
        match outcome {
            Ok(text) => {
                self.phase = ActivityPhase::Ready(text.clone());
                Ok(text)
            }
            Err(e) => {
                self.phase = ActivityPhase::Idle;
                Err(e)
            }
        }
    }

    /// Ready -> Idle. Converts the in-progress activity plus optional
    /// feedback into a durable record with a copied mood snapshot, then
    /// clears the in-progress activity. Completing with nothing in flight is
    /// a silent no-op.
    pub fn complete(&mut self, feedback: Option<&str>) -> Result<Option<TaskRecord>> {
        let activity = match &self.phase {
            ActivityPhase::Ready(text) => text.clone(),
            _ => return Ok(None),
        };

        let record = TaskRecord::new(&activity, feedback, &self.manager.state().current_moods);
        self.manager.record(record.clone())?;
        self.phase = ActivityPhase::Idle;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::normalize_activity;
    use crate::state::{MoodPair, HISTORY_LIMIT};
    use tempfile::TempDir;

    fn test_session(dir: &TempDir) -> ActivitySession {
        let store = StateStore::new(dir.path().join("state.json")).unwrap();
        ActivitySession::new(StateManager::new(store))
    }

    fn configure_partners(session: &mut ActivitySession) {
        session
            .manager_mut()
            .set_partner(
                Slot::A,
                PartnerDetails {
                    name: "Sam".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        session
            .manager_mut()
            .set_partner(
                Slot::B,
                PartnerDetails {
                    name: "Ray".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_happy_path_scenario() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        configure_partners(&mut session);
        session.manager_mut().set_mood(Slot::A, Mood::Happy).unwrap();
        session.manager_mut().set_mood(Slot::B, Mood::Tired).unwrap();

        let request = session.begin().unwrap();
        assert!(request.prompt.contains("Sam"));
        assert_eq!(*session.phase(), ActivityPhase::Pending);

        let activity = session
            .resolve(Ok(normalize_activity(" Cook a simple meal together. ")))
            .unwrap();
        assert_eq!(activity, "Cook a simple meal together.");
        assert_eq!(
            *session.phase(),
            ActivityPhase::Ready("Cook a simple meal together.".to_string())
        );

        let record = session.complete(Some("Good")).unwrap().unwrap();
        assert_eq!(record.activity, "Cook a simple meal together.");
        assert_eq!(record.feedback.as_deref(), Some("Good"));
        assert_eq!(
            record.mood_at_time,
            Some(MoodPair {
                a: Mood::Happy,
                b: Mood::Tired
            })
        );
        assert_eq!(*session.phase(), ActivityPhase::Idle);
        assert_eq!(session.manager().state().history.len(), 1);
    }

    #[test]
    fn test_generation_failure_records_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        configure_partners(&mut session);

        session.begin().unwrap();
        let outcome = session.resolve(Err(AppError::Generation("boom".to_string())));

        assert!(outcome.is_err());
        assert_eq!(*session.phase(), ActivityPhase::Idle);
        assert!(session.manager().state().history.is_empty());
    }

    #[test]
    fn test_second_request_rejected_while_busy() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        session.begin().unwrap();
        assert!(matches!(session.begin(), Err(AppError::Busy)));

        session.resolve(Ok("Trade compliments.".to_string())).unwrap();
        assert!(matches!(session.begin(), Err(AppError::Busy)));
    }

    #[test]
    fn test_complete_without_activity_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        let before = session.manager().state().clone();
        assert!(session.complete(Some("Good")).unwrap().is_none());
        assert_eq!(*session.manager().state(), before);

        // Pending is not completable either.
        session.begin().unwrap();
        assert!(session.complete(None).unwrap().is_none());
        assert!(session.manager().state().history.is_empty());
    }

    #[test]
    fn test_mood_snapshot_is_immutable() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.manager_mut().set_mood(Slot::A, Mood::Happy).unwrap();
        session.manager_mut().set_mood(Slot::B, Mood::Tired).unwrap();

        session.begin().unwrap();
        session.resolve(Ok("Stargaze together.".to_string())).unwrap();
        session.complete(None).unwrap();

        session.manager_mut().set_mood(Slot::A, Mood::Stress).unwrap();
        session.manager_mut().set_mood(Slot::B, Mood::Calm).unwrap();

        assert_eq!(
            session.manager().state().history[0].mood_at_time,
            Some(MoodPair {
                a: Mood::Happy,
                b: Mood::Tired
            })
        );
    }

    #[test]
    fn test_history_bound_over_many_completions() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        for i in 0..35 {
            session.begin().unwrap();
            session.resolve(Ok(format!("activity {}", i))).unwrap();
            session.complete(None).unwrap();
        }

        let history = &session.manager().state().history;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].activity, "activity 34");
        assert_eq!(history[HISTORY_LIMIT - 1].activity, "activity 5");
    }

    #[test]
    fn test_mutations_survive_a_restart() {
        let dir = TempDir::new().unwrap();
        {
            let mut session = test_session(&dir);
            configure_partners(&mut session);
            session.manager_mut().set_mood(Slot::A, Mood::Calm).unwrap();
            session.begin().unwrap();
            session.resolve(Ok("Share a childhood photo.".to_string())).unwrap();
            session.complete(Some("Wonderful")).unwrap();
        }

        let session = test_session(&dir);
        let state = session.manager().state();
        assert!(session.manager().is_setup_complete());
        assert_eq!(state.partner_a.name, "Sam");
        assert_eq!(state.current_moods.a, Mood::Calm);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].feedback.as_deref(), Some("Wonderful"));
        // A restart always comes back Idle; Pending never persists.
        assert_eq!(*session.phase(), ActivityPhase::Idle);
    }

    #[test]
    fn test_setup_requires_both_names() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        assert!(!session.manager().is_setup_complete());

        session
            .manager_mut()
            .set_partner(
                Slot::A,
                PartnerDetails {
                    name: "Sam".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!session.manager().is_setup_complete());

        configure_partners(&mut session);
        assert!(session.manager().is_setup_complete());
    }
}
