//! A CFR solver for single-street betting games over a ranked hand universe.
//!
//! The game is a two-player, incomplete-information betting game: both
//! players ante into the pot, are dealt one hand each from a fixed, totally
//! ordered universe, and play one round of betting (extensible to several by
//! stacking bet menus). The solver approximates a Nash equilibrium by
//! counterfactual regret minimization and reports how far the trained
//! strategy is from equilibrium via a best-response computation.
//!
//! # Examples
//! ```
//! use onestreet_solver::*;
//!
//! // configure a 10-hand game with a half-pot and a pot-sized bet
//! let config = GameConfig {
//!     num_hands: 10,
//!     ante: 1.0,
//!     effective_stack: 10.0,
//!     bet_sizes: vec![BetMenu::try_from("50%, 100%").unwrap()],
//!     bet_after_check: true,
//!     priors: [CardDistribution::uniform(10), CardDistribution::uniform(10)],
//!     ranking: HandRanking::identity(10),
//! };
//!
//! // build the game tree
//! let mut game = OneStreetGame::with_config(config).unwrap();
//!
//! // run self-play until the average strategy is nearly unexploitable
//! let exploitability = solve(&mut game, 1000, 0.005, false);
//!
//! // the exploitability gap is never (meaningfully) negative
//! let (vs_oop, vs_ip) = nash_dist(&game);
//! assert!(vs_ip - vs_oop >= -1e-3);
//!
//! // inspect the trained strategy at the opening decision
//! if let Node::Decision(root) = game.root() {
//!     let strategy = root.average_strategy(9);
//!     println!("best hand checks {:.1}% of the time", 100.0 * strategy[0]);
//! }
//! ```
//!
//! # Implementation details
//! - **Algorithm**: vanilla CFR with regret matching; every iteration is a
//!   full traversal over all ordered pairs of distinct hands. The reported
//!   strategy is the time-averaged one, which is the quantity that converges
//!   to equilibrium.
//! - **Precision**: 32-bit floating-point numbers are used in most places.
//! - **Sign conventions**: all utilities are relative to the first player to
//!   act (OOP); the second player minimizes.
//!
//! # Crate features
//! - `bincode`: Uses [bincode] crate (2.0.0-rc.1) to serialize and
//!   deserialize the `OneStreetGame` struct. Disabled by default.
//! - `rayon`: Uses [rayon] crate to parallelize the read-only best-response
//!   computation. Training itself is strictly single-threaded. Enabled by
//!   default.
//!
//! [bincode]: https://github.com/bincode-org/bincode
//! [rayon]: https://github.com/rayon-rs/rayon

mod bet_size;
mod distribution;
mod game;
mod node;
mod sliceop;
mod solver;
mod utility;

pub use bet_size::*;
pub use distribution::*;
pub use game::*;
pub use node::*;
pub use solver::*;
pub use utility::*;
