use crate::models::StudentProfile;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{generate_id, is_blank};

/// Editable profile fields
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub subjects: String,
    pub goals: String,
}

impl From<StudentProfile> for ProfileDraft {
    fn from(profile: StudentProfile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            subjects: profile.subjects,
            goals: profile.goals,
        }
    }
}

/// The single student profile
pub struct ProfileService<'a> {
    profile: RecordStore<'a, StudentProfile>,
}

impl<'a> ProfileService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            profile: RecordStore::new(storage, CollectionKey::StudentProfile),
        }
    }

    pub fn profile(&self) -> Option<StudentProfile> {
        self.profile.load().into_iter().next()
    }

    /// Create the profile or overwrite the stored one, keeping its id.
    /// A blank name saves nothing.
    pub fn save_profile(&self, draft: ProfileDraft) -> Option<StudentProfile> {
        if is_blank(&draft.name) {
            return None;
        }
        let id = self.profile().map(|p| p.id).unwrap_or_else(generate_id);
        let profile = StudentProfile {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            subjects: draft.subjects,
            goals: draft.goals,
        };
        self.profile.save(std::slice::from_ref(&profile));
        tracing::debug!(id = %profile.id, "saved student profile");
        Some(profile)
    }
}
