use crate::models::StudySession;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{generate_id, is_blank};

pub struct StudyPlannerService<'a> {
    sessions: RecordStore<'a, StudySession>,
}

impl<'a> StudyPlannerService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            sessions: RecordStore::new(storage, CollectionKey::StudySessions),
        }
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        self.sessions.load()
    }

    pub fn add_session(&self, subject: &str, time: &str) -> Option<StudySession> {
        if is_blank(subject) || is_blank(time) {
            return None;
        }
        let session = StudySession {
            id: generate_id(),
            subject: subject.to_string(),
            time: time.to_string(),
        };
        self.sessions.insert(session.clone()).then_some(session)
    }

    pub fn delete_session(&self, id: &str) -> Option<StudySession> {
        self.sessions.remove(id)
    }
}
