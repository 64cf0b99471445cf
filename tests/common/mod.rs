//! Shared helpers: small instance generators and a brute-force reference.

#![allow(dead_code)]

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tsp_bnb::{Problem, ProblemBuilder};

/// 4-city ring (10, 20, 10, 40) with expensive chords; unique optimum 80
/// via 0-1-2-3-0.
pub fn ring_with_chords() -> Problem {
    ProblemBuilder::new(4)
        .unwrap()
        .road(0, 1, 10.0)
        .unwrap()
        .road(1, 2, 20.0)
        .unwrap()
        .road(2, 3, 10.0)
        .unwrap()
        .road(3, 0, 40.0)
        .unwrap()
        .road(0, 2, 50.0)
        .unwrap()
        .road(1, 3, 50.0)
        .unwrap()
        .build()
}

/// Complete graph with integer-valued costs, so tour sums are exact in f64
/// and every engine's cost can be compared with `==`.
pub fn random_complete_problem(rng: &mut ChaCha8Rng, n_cities: usize) -> Problem {
    let mut builder = ProblemBuilder::new(n_cities).unwrap();
    for a in 0..n_cities {
        for b in (a + 1)..n_cities {
            let cost = rng.gen_range(1..=40) as f64;
            builder = builder.road(a, b, cost).unwrap();
        }
    }
    builder.build()
}

/// Random graph keeping each edge with probability `density`; may or may not
/// admit a Hamiltonian cycle.
pub fn random_sparse_problem(rng: &mut ChaCha8Rng, n_cities: usize, density: f64) -> Problem {
    let mut builder = ProblemBuilder::new(n_cities).unwrap();
    for a in 0..n_cities {
        for b in (a + 1)..n_cities {
            if rng.gen_bool(density) {
                let cost = rng.gen_range(1..=40) as f64;
                builder = builder.road(a, b, cost).unwrap();
            }
        }
    }
    builder.build()
}

/// Cost of the cycle visiting `tour` in order and returning to `tour[0]`,
/// summed in tour order; `None` if any edge is missing.
pub fn tour_cost(problem: &Problem, tour: &[u8]) -> Option<f64> {
    let mut cost = 0.0;
    for pair in tour.windows(2) {
        let (from, to) = (pair[0] as usize, pair[1] as usize);
        if !problem.is_neighbor(from, to) {
            return None;
        }
        cost += problem.road_cost(from, to);
    }
    let last = tour[tour.len() - 1] as usize;
    if !problem.is_neighbor(last, 0) {
        return None;
    }
    Some(cost + problem.road_cost(last, 0))
}

/// Assert `tour` is a permutation of all cities starting at 0, then return
/// its cost.
pub fn checked_tour_cost(problem: &Problem, tour: &[u8]) -> f64 {
    assert_eq!(tour.len(), problem.n_cities());
    assert_eq!(tour[0], 0);
    let mut seen = vec![false; problem.n_cities()];
    for &city in tour {
        assert!(!seen[city as usize], "city {city} visited twice");
        seen[city as usize] = true;
    }
    tour_cost(problem, tour).expect("tour crosses a missing edge")
}

/// Exhaustive reference: the cheapest Hamiltonian cycle, or `None` if the
/// graph admits none. Only for small instances.
pub fn brute_force_optimum(problem: &Problem) -> Option<f64> {
    let n = problem.n_cities();
    let mut rest: Vec<u8> = (1..n as u8).collect();
    let mut tour = vec![0u8];
    let mut best = None;
    permute(problem, &mut rest, &mut tour, &mut best);
    best
}

fn permute(problem: &Problem, rest: &mut Vec<u8>, tour: &mut Vec<u8>, best: &mut Option<f64>) {
    if rest.is_empty() {
        if let Some(cost) = tour_cost(problem, tour) {
            if best.map_or(true, |b| cost < b) {
                *best = Some(cost);
            }
        }
        return;
    }
    for index in 0..rest.len() {
        let city = rest.remove(index);
        tour.push(city);
        permute(problem, rest, tour, best);
        tour.pop();
        rest.insert(index, city);
    }
}
