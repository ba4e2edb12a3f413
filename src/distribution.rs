use std::ops::Index;

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

/// A probability mass over the hand universe.
///
/// The weights are not required to stay normalized between uses; call
/// [`normalize`](Self::normalize) to renormalize, optionally forcing one hand
/// (e.g., a hand known to be held by the other player) to zero weight.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct CardDistribution {
    pub(crate) weights: Vec<f32>,
}

impl CardDistribution {
    /// Creates a uniform distribution over `num_hands` hands.
    #[inline]
    pub fn uniform(num_hands: usize) -> Self {
        Self {
            weights: vec![1.0 / num_hands as f32; num_hands],
        }
    }

    /// Creates a distribution from raw weights.
    ///
    /// Every weight must be non-negative and finite. The weights do not need
    /// to sum to 1.
    pub fn new(weights: Vec<f32>) -> Result<Self, String> {
        if weights.is_empty() {
            return Err("Distribution must contain at least one hand".to_string());
        }

        for &weight in &weights {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(format!("Hand weight must be non-negative: {weight}"));
            }
        }

        Ok(Self { weights })
    }

    /// Returns the number of hands in the universe.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns whether the distribution is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the raw weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Renormalizes the weights to sum to 1.
    ///
    /// If `excluded` is given, that hand's weight is forced to zero before
    /// normalizing. If every remaining weight is zero, the distribution is
    /// reset to uniform over the non-excluded hands, so a degenerate
    /// distribution never produces a division by zero downstream.
    ///
    /// # Examples
    /// ```
    /// use onestreet_solver::CardDistribution;
    ///
    /// let mut distro = CardDistribution::new(vec![1.0, 1.0, 2.0]).unwrap();
    /// distro.normalize(Some(2));
    /// assert_eq!(distro.weights(), [0.5, 0.5, 0.0]);
    /// ```
    pub fn normalize(&mut self, excluded: Option<usize>) {
        if let Some(excluded) = excluded {
            self.weights[excluded] = 0.0;
        }

        let total = self.weights.iter().map(|&w| w as f64).sum::<f64>() as f32;

        if total == 0.0 {
            let num_included = self.weights.len() - excluded.is_some() as usize;
            self.weights.fill(1.0 / num_included as f32);
            if let Some(excluded) = excluded {
                self.weights[excluded] = 0.0;
            }
            return;
        }

        self.weights.iter_mut().for_each(|w| *w /= total);
    }
}

impl Index<usize> for CardDistribution {
    type Output = f32;

    #[inline]
    fn index(&self, hand: usize) -> &f32 {
        &self.weights[hand]
    }
}

/// A total order over the hand universe used at showdown.
///
/// Maps each hand to a rank; a higher rank always beats a lower rank. Ties
/// are not supported, so construction rejects duplicate ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct HandRanking {
    ranks: Vec<u32>,
}

impl HandRanking {
    /// Creates the ranking where each hand's index is its own rank.
    #[inline]
    pub fn identity(num_hands: usize) -> Self {
        Self {
            ranks: (0..num_hands as u32).collect(),
        }
    }

    /// Creates a ranking from explicit ranks, one per hand.
    pub fn new(ranks: Vec<u32>) -> Result<Self, String> {
        if ranks.is_empty() {
            return Err("Ranking must contain at least one hand".to_string());
        }

        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err("Hand ranks must be distinct; ties are not supported".to_string());
        }

        Ok(Self { ranks })
    }

    /// Returns the number of hands in the universe.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns whether the ranking is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Returns whether `hand` wins a showdown against `other`.
    #[inline]
    pub fn beats(&self, hand: usize, other: usize) -> bool {
        self.ranks[hand] > self.ranks[other]
    }
}
