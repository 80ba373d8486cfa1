use crate::models::Resource;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{generate_id, is_blank};

/// Saved links to course material
pub struct ResourceService<'a> {
    resources: RecordStore<'a, Resource>,
}

impl<'a> ResourceService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            resources: RecordStore::new(storage, CollectionKey::Resources),
        }
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.resources.load()
    }

    pub fn add_resource(&self, title: &str, url: &str) -> Option<Resource> {
        if is_blank(title) || is_blank(url) {
            return None;
        }
        let resource = Resource {
            id: generate_id(),
            title: title.trim().to_string(),
            url: url.trim().to_string(),
        };
        self.resources.insert(resource.clone()).then_some(resource)
    }

    pub fn delete_resource(&self, id: &str) -> Option<Resource> {
        self.resources.remove(id)
    }
}
