use crate::game::*;
use crate::node::*;
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
#[inline]
pub(crate) fn into_par_iter(range: Range<usize>) -> rayon::range::Iter<usize> {
    range.into_par_iter()
}

#[cfg(not(feature = "rayon"))]
#[inline]
pub(crate) fn into_par_iter(range: Range<usize>) -> Range<usize> {
    range
}

/// Computes the best-response utilities against each player's frozen average
/// strategy.
///
/// Returns `(vs_oop, vs_ip)`:
/// - `vs_oop`: the prior-weighted utility IP attains by best-responding to
///   OOP's average strategy (IP minimizes, so this bounds the game value from
///   below);
/// - `vs_ip`: the utility OOP attains by best-responding to IP's average
///   strategy (bounding the game value from above).
///
/// Both values are OOP-relative. At an exact equilibrium they coincide at the
/// game value.
pub fn nash_dist(game: &OneStreetGame) -> (f32, f32) {
    let config = game.config();
    let root = game.root();
    let ranking = &config.ranking;

    let vs_oop = into_par_iter(0..config.num_hands)
        .map(|hand| {
            config.priors[1][hand]
                * root.best_response_util(PLAYER_OOP, hand, config.priors[0].clone(), ranking)
        })
        .sum::<f32>();

    let vs_ip = into_par_iter(0..config.num_hands)
        .map(|hand| {
            config.priors[0][hand]
                * root.best_response_util(PLAYER_IP, hand, config.priors[1].clone(), ranking)
        })
        .sum::<f32>();

    (vs_oop, vs_ip)
}

/// Computes the exploitability of the trained average strategy.
///
/// Zero at equilibrium; a correct solver never reports a (meaningfully)
/// negative value.
#[inline]
pub fn compute_exploitability(game: &OneStreetGame) -> f32 {
    let (vs_oop, vs_ip) = nash_dist(game);
    vs_ip - vs_oop
}

/// Computes the weighted average.
#[inline]
pub fn compute_average(slice: &[f32], weights: &[f32]) -> f32 {
    let mut weight_sum = 0.0;
    let mut product_sum = 0.0;
    for (&value, &weight) in slice.iter().zip(weights.iter()) {
        weight_sum += weight as f64;
        product_sum += value as f64 * weight as f64;
    }
    (product_sum / weight_sum) as f32
}

/// Returns the memory usage of a vector in bytes.
#[inline]
pub(crate) fn vec_memory_usage<T>(vec: &Vec<T>) -> u64 {
    vec.capacity() as u64 * std::mem::size_of::<T>() as u64
}
