//! Bookmarked study resources

use super::impl_manager;
use super::types::{NewResource, Resource};
use crate::ids::{IdGenerator, RecordId};
use chrono::Utc;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone)]
pub struct ResourcesManager {
    resources: Vec<Resource>,
    ids: IdGenerator,
}

impl_manager!(ResourcesManager, Resource, resources);

impl ResourcesManager {
    pub fn new(resources: Vec<Resource>) -> Self {
        let ids = IdGenerator::seeded(resources.iter().map(|r| r.id));
        Self { resources, ids }
    }

    pub fn add_resource(&mut self, req: NewResource) -> Resource {
        let resource = Resource {
            id: self.ids.next_id(),
            title: req.title,
            kind: req.kind,
            subject: req.subject,
            url: req.url,
            date_added: Utc::now(),
            rating: 0,
        };
        self.resources.push(resource.clone());
        resource
    }

    pub fn resources_by_subject(&self, subject: &str) -> Vec<&Resource> {
        let subject = subject.to_lowercase();
        self.resources
            .iter()
            .filter(|r| r.subject.to_lowercase() == subject)
            .collect()
    }

    /// Exact match on the resource type
    pub fn resources_by_type(&self, kind: &str) -> Vec<&Resource> {
        self.resources.iter().filter(|r| r.kind == kind).collect()
    }

    /// Store a rating clamped to 0..=5. Returns the stored value.
    pub fn rate_resource(&mut self, id: RecordId, rating: i32) -> Option<u8> {
        let resource = self.resources.iter_mut().find(|r| r.id == id)?;
        resource.rating = rating.clamp(0, i32::from(MAX_RATING)) as u8;
        Some(resource.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: &str, kind: &str, subject: &str) -> NewResource {
        NewResource {
            title: title.to_string(),
            kind: kind.to_string(),
            subject: subject.to_string(),
            url: "https://example.org".to_string(),
        }
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut resources = ResourcesManager::new(Vec::new());
        let res = resources.add_resource(req("Lecture", "video", "Math"));
        assert_eq!(res.rating, 0);
        assert_eq!(resources.rate_resource(res.id, 9), Some(5));
        assert_eq!(resources.rate_resource(res.id, -3), Some(0));
        assert_eq!(resources.rate_resource(res.id, 4), Some(4));
        assert_eq!(resources.rate_resource(res.id + 1, 4), None);
    }

    #[test]
    fn test_filters() {
        let mut resources = ResourcesManager::new(Vec::new());
        resources.add_resource(req("Lecture", "video", "Math"));
        resources.add_resource(req("Textbook", "book", "math"));
        resources.add_resource(req("Podcast", "audio", "History"));

        assert_eq!(resources.resources_by_subject("MATH").len(), 2);
        assert_eq!(resources.resources_by_type("book").len(), 1);
        assert!(resources.resources_by_type("Book").is_empty());
    }
}
