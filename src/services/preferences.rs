use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{Category, Interest, PreferenceProfile};

/// Per-request lookup structures derived from a stored preference profile.
///
/// Built fresh on every feed request and discarded with it; nothing here is
/// ever written back to storage.
#[derive(Debug, Clone)]
pub struct PreferenceMaps {
    pub category_weights: HashMap<Category, i32>,
    pub interest_weights: HashMap<Interest, i32>,
    pub blocked_interests: HashSet<Interest>,
    pub following: HashSet<Uuid>,
}

impl PreferenceMaps {
    pub fn from_profile(profile: &PreferenceProfile) -> Self {
        let mut category_weights = HashMap::new();
        let mut interest_weights = HashMap::new();

        for category in &profile.categories {
            category_weights.insert(category.name, category.weight);
            for interest in &category.interests {
                interest_weights.insert(interest.name, interest.weight);
            }
        }

        Self {
            category_weights,
            interest_weights,
            blocked_interests: profile.blocked_interests.iter().copied().collect(),
            following: profile.following.iter().copied().collect(),
        }
    }

    /// The category names the user is known to care about, used as the
    /// candidate retrieval filter.
    pub fn known_categories(&self) -> Vec<Category> {
        self.category_weights.keys().copied().collect()
    }
}
