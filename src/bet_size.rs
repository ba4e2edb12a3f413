use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

static PERCENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)%$").unwrap()
});

/// Bet size menu of a single betting round.
///
/// Each size is a fraction of the pot at the moment of betting. In the
/// `try_from()` method, multiple bet sizes can be specified using a
/// comma-separated string of percentages; a trailing comma is tolerated.
///
/// # Examples
/// ```
/// use onestreet_solver::BetMenu;
///
/// let menu = BetMenu::try_from("100%, 50%").unwrap();
/// assert_eq!(menu.sizes, vec![0.5, 1.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct BetMenu {
    /// Bet sizes as fractions of the current pot, sorted in ascending order.
    pub sizes: Vec<f32>,
}

impl BetMenu {
    /// Creates a menu from raw pot fractions.
    ///
    /// The menu must be non-empty and every size must be positive and finite.
    pub fn new(mut sizes: Vec<f32>) -> Result<Self, String> {
        if sizes.is_empty() {
            return Err("Bet menu must contain at least one size".to_string());
        }

        for &size in &sizes {
            if !(size.is_finite() && size > 0.0) {
                return Err(format!("Bet size must be positive: {size}"));
            }
        }

        sizes.sort_unstable_by(|l, r| l.partial_cmp(r).unwrap());

        Ok(Self { sizes })
    }
}

impl TryFrom<&str> for BetMenu {
    type Error = String;

    /// Attempts to convert a comma-separated string of percentages into a menu.
    ///
    /// See the [`BetMenu`] struct for the description and examples.
    fn try_from(s: &str) -> Result<Self, String> {
        let mut tokens = s.split(',').map(str::trim).collect::<Vec<_>>();

        if tokens.last().unwrap().is_empty() {
            tokens.pop();
        }

        let mut sizes = Vec::new();

        for token in tokens {
            sizes.push(bet_fraction_from_str(token)?);
        }

        BetMenu::new(sizes)
    }
}

fn bet_fraction_from_str(s: &str) -> Result<f32, String> {
    if !PERCENT_REGEX.is_match(s) {
        return Err(format!("Invalid bet size: {s}"));
    }

    let percent = s[..s.len() - 1]
        .parse::<f32>()
        .map_err(|_| format!("Invalid bet size: {s}"))?;

    Ok(percent / 100.0)
}
