//! Sliding-window diversification of a score-sorted feed.
//!
//! The input must already be sorted descending by score. A category→count
//! histogram tracks how often each category appeared among the last
//! `WINDOW_SIZE` appended items. An item whose matched category has
//! saturated the window is demoted (score × 0.7) and re-inserted further
//! down instead of being dropped.
//!
//! This pass is order-dependent and non-commutative: occurrence counts are
//! updated only on non-demoted appends and retired first-in-first-out as the
//! result grows past the window. It is a state machine, not a sort.

use std::collections::HashMap;

use crate::models::Category;
use crate::services::scoring::ScoredDebate;

pub const WINDOW_SIZE: usize = 5;
/// ceil(WINDOW_SIZE * 0.6)
pub const SATURATION_THRESHOLD: usize = 3;
const DEMOTION_FACTOR: f64 = 0.7;

/// Reorder a score-sorted list so no category saturates the trailing window.
pub fn diversify(items: Vec<ScoredDebate>) -> Vec<ScoredDebate> {
    let mut result: Vec<ScoredDebate> = Vec::with_capacity(items.len());
    let mut occurrences: HashMap<Category, usize> = HashMap::new();

    for mut item in items {
        let saturated = item
            .matched_categories
            .iter()
            .any(|c| occurrences.get(c).copied().unwrap_or(0) >= SATURATION_THRESHOLD);

        if saturated {
            item.score *= DEMOTION_FACTOR;

            // Insert before the first lower-scored entry so the result stays
            // in descending score order. Demotions leave the window counts
            // untouched.
            let position = result
                .iter()
                .position(|r| r.score < item.score)
                .unwrap_or(result.len());
            result.insert(position, item);
        } else {
            for category in &item.matched_categories {
                *occurrences.entry(*category).or_insert(0) += 1;
            }
            result.push(item);

            // The item exactly WINDOW_SIZE positions back from the end has
            // left the window; retire its contribution (floor at zero).
            if result.len() > WINDOW_SIZE {
                let retired = &result[result.len() - WINDOW_SIZE - 1];
                for category in &retired.matched_categories {
                    if let Some(count) = occurrences.get_mut(category) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
        }
    }

    result
}
