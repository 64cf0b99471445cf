//! Problem instance: an immutable road-cost matrix plus the per-city table of
//! the two cheapest incident edges consumed by the bound function.

use crate::error::{Error, Result};

/// Fixed capacity of the solver. A node's visited set is a single `u64`
/// bitset and its tour prefix a bounded inline array, so instances larger
/// than this are rejected at construction.
pub const MAX_CITIES: usize = 64;

/// Sentinel cost for a road that does not exist.
const NO_ROAD: f64 = f64::INFINITY;

/// An immutable TSP instance.
///
/// Shared read-only by every worker thread and every rank; nothing here is
/// mutated after [`ProblemBuilder::build`] returns.
#[derive(Debug, Clone)]
pub struct Problem {
    n_cities: usize,
    /// Dense row-major cost matrix; `NO_ROAD` marks a missing edge.
    costs: Vec<f64>,
    /// Per-city `(min1, min2)` cheapest incident edge costs, precomputed once.
    min_costs: Vec<(f64, f64)>,
}

impl Problem {
    pub fn n_cities(&self) -> usize {
        self.n_cities
    }

    /// Cost of the road between `from` and `to`; `f64::INFINITY` if absent.
    #[inline]
    pub fn road_cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from * self.n_cities + to]
    }

    /// Whether a road exists between the two cities.
    #[inline]
    pub fn is_neighbor(&self, from: usize, to: usize) -> bool {
        self.road_cost(from, to).is_finite()
    }

    /// Cheapest incident edge cost of `city`.
    #[inline]
    pub fn min1(&self, city: usize) -> f64 {
        self.min_costs[city].0
    }

    /// Second-cheapest incident edge cost of `city`.
    #[inline]
    pub fn min2(&self, city: usize) -> f64 {
        self.min_costs[city].1
    }
}

/// Builder for [`Problem`]. Validates the city count and every road before
/// the instance is frozen.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    n_cities: usize,
    costs: Vec<f64>,
}

impl ProblemBuilder {
    /// Start an instance with `n_cities` cities and no roads.
    ///
    /// Fails fast when the instance exceeds the fixed capacity.
    pub fn new(n_cities: usize) -> Result<Self> {
        if n_cities > MAX_CITIES {
            return Err(Error::TooManyCities(n_cities));
        }
        Ok(Self {
            n_cities,
            costs: vec![NO_ROAD; n_cities * n_cities],
        })
    }

    /// Add a bidirectional road between `a` and `b`.
    pub fn road(mut self, a: usize, b: usize, cost: f64) -> Result<Self> {
        for index in [a, b] {
            if index >= self.n_cities {
                return Err(Error::CityOutOfRange {
                    index,
                    n_cities: self.n_cities,
                });
            }
        }
        if a == b {
            return Err(Error::invalid_input(format!(
                "road from city {a} to itself"
            )));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::invalid_input(format!(
                "road {a} <-> {b} has invalid cost {cost}"
            )));
        }
        self.costs[a * self.n_cities + b] = cost;
        self.costs[b * self.n_cities + a] = cost;
        Ok(self)
    }

    /// Freeze the instance, precomputing the per-city min-cost table.
    pub fn build(self) -> Problem {
        let mut min_costs = Vec::with_capacity(self.n_cities);
        for city in 0..self.n_cities {
            let mut min1 = NO_ROAD;
            let mut min2 = NO_ROAD;
            for other in 0..self.n_cities {
                let cost = self.costs[city * self.n_cities + other];
                if !cost.is_finite() {
                    continue;
                }
                if cost < min1 {
                    min2 = min1;
                    min1 = cost;
                } else if cost < min2 {
                    min2 = cost;
                }
            }
            min_costs.push((min1, min2));
        }
        Problem {
            n_cities: self.n_cities,
            costs: self.costs,
            min_costs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_enforced_at_construction() {
        assert!(ProblemBuilder::new(MAX_CITIES).is_ok());
        assert!(matches!(
            ProblemBuilder::new(MAX_CITIES + 1),
            Err(Error::TooManyCities(n)) if n == MAX_CITIES + 1
        ));
    }

    #[test]
    fn test_road_validation() {
        let builder = ProblemBuilder::new(3).unwrap();
        assert!(matches!(
            builder.clone().road(0, 3, 1.0),
            Err(Error::CityOutOfRange { index: 3, .. })
        ));
        assert!(builder.clone().road(1, 1, 1.0).is_err());
        assert!(builder.clone().road(0, 1, -2.0).is_err());
        assert!(builder.road(0, 1, 2.0).is_ok());
    }

    #[test]
    fn test_roads_are_symmetric() {
        let problem = ProblemBuilder::new(3)
            .unwrap()
            .road(0, 1, 5.0)
            .unwrap()
            .build();
        assert_eq!(problem.road_cost(0, 1), 5.0);
        assert_eq!(problem.road_cost(1, 0), 5.0);
        assert!(problem.is_neighbor(0, 1));
        assert!(!problem.is_neighbor(0, 2));
        assert!(!problem.road_cost(0, 2).is_finite());
    }

    #[test]
    fn test_min_cost_table() {
        let problem = ProblemBuilder::new(4)
            .unwrap()
            .road(0, 1, 10.0)
            .unwrap()
            .road(0, 2, 3.0)
            .unwrap()
            .road(0, 3, 7.0)
            .unwrap()
            .road(1, 2, 4.0)
            .unwrap()
            .build();
        assert_eq!(problem.min1(0), 3.0);
        assert_eq!(problem.min2(0), 7.0);
        assert_eq!(problem.min1(1), 4.0);
        assert_eq!(problem.min2(1), 10.0);
        // city 3 has a single incident road: min2 stays at the sentinel
        assert_eq!(problem.min1(3), 7.0);
        assert!(!problem.min2(3).is_finite());
    }
}
