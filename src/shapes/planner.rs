//! Random selection of shape pairs and relationships.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::catalog::{shapes_for, Relationship};
use super::ShapeAnalogyRequest;
use crate::types::Complexity;
use crate::{Error, ErrorContext, Result};

/// Chooses two distinct shapes of one tier, a relationship and an image
/// seed for each analogy. Seeded planners are reproducible.
pub struct ShapeAnalogyPlanner {
    rng: StdRng,
}

impl ShapeAnalogyPlanner {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `n` requests numbered `analogy_001` onwards.
    pub fn plan(&mut self, n: usize, complexity: Complexity) -> Result<Vec<ShapeAnalogyRequest>> {
        if n == 0 {
            return Err(Error::validation_with_context(
                "at least one analogy must be requested",
                ErrorContext::new().with_field_path("n"),
            ));
        }
        (1..=n).map(|index| self.next(index, complexity)).collect()
    }

    fn next(&mut self, index: usize, complexity: Complexity) -> Result<ShapeAnalogyRequest> {
        let shapes = shapes_for(complexity);
        let first = self.rng.random_range(0..shapes.len());
        let mut second = self.rng.random_range(0..shapes.len() - 1);
        if second >= first {
            second += 1;
        }
        let relationship = Relationship::ALL[self.rng.random_range(0..Relationship::ALL.len())];
        let seed = self.rng.random_range(1000..=9999);
        debug!(
            index,
            shape_a = shapes[first].name,
            shape_b = shapes[second].name,
            %relationship,
            "analogy planned"
        );
        ShapeAnalogyRequest::new(index, shapes[first], shapes[second], relationship, complexity, seed)
    }
}

impl Default for ShapeAnalogyPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_distinct_and_in_tier() {
        let mut planner = ShapeAnalogyPlanner::seeded(7);
        let requests = planner.plan(200, Complexity::Intermediate).unwrap();
        assert_eq!(requests.len(), 200);
        for r in &requests {
            assert_ne!(r.shape_a, r.shape_b);
            assert!(shapes_for(Complexity::Intermediate).contains(&r.shape_a));
            assert!(shapes_for(Complexity::Intermediate).contains(&r.shape_b));
            assert!((1000..=9999).contains(&r.seed));
        }
        assert_eq!(requests[0].id, "analogy_001");
        assert_eq!(requests[199].id, "analogy_200");
    }

    #[test]
    fn test_same_seed_same_plan() {
        let a = ShapeAnalogyPlanner::seeded(42).plan(10, Complexity::Advanced).unwrap();
        let b = ShapeAnalogyPlanner::seeded(42).plan(10, Complexity::Advanced).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(ShapeAnalogyPlanner::seeded(1).plan(0, Complexity::Beginner).is_err());
    }
}
