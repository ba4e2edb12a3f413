use crate::bet_size::*;
use crate::distribution::*;
use crate::node::*;
use crate::utility::*;

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

/// A struct containing the game configuration.
///
/// # Examples
/// ```
/// use onestreet_solver::*;
///
/// let config = GameConfig {
///     num_hands: 10,
///     ante: 1.0,
///     effective_stack: 10.0,
///     bet_sizes: vec![BetMenu::try_from("200%").unwrap()],
///     bet_after_check: true,
///     priors: [CardDistribution::uniform(10), CardDistribution::uniform(10)],
///     ranking: HandRanking::identity(10),
/// };
///
/// let game = OneStreetGame::with_config(config).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct GameConfig {
    /// Number of hands in the universe. Must be at least `2`.
    pub num_hands: usize,

    /// Ante already in the pot before any action. Must be positive.
    pub ante: f32,

    /// Money either player can commit beyond the ante; once a commitment
    /// exceeds this amount no further betting is legal. Must be positive.
    pub effective_stack: f32,

    /// Bet size menus, one per betting round, in order.
    pub bet_sizes: Vec<BetMenu>,

    /// Whether IP may respond to an opening check with a bet. If `false`, a
    /// check immediately goes to showdown for the ante.
    pub bet_after_check: bool,

    /// Each player's prior distribution over their own hand.
    pub priors: [CardDistribution; 2],

    /// The showdown ranking of the hand universe.
    pub ranking: HandRanking,
}

/// The game: a single-street betting tree plus the training state inside it.
///
/// Built once from a [`GameConfig`]; the tree structure is immutable
/// afterwards, only the per-node accumulators change during training.
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct OneStreetGame {
    config: GameConfig,
    root: Node,
}

impl OneStreetGame {
    /// Creates and validates a new game, building its tree.
    pub fn with_config(config: GameConfig) -> Result<Self, String> {
        Self::check_config(&config)?;

        let mut root = Self::build_root(&config);
        Self::allocate_memory_recursive(&mut root, config.num_hands);

        Ok(Self { config, root })
    }

    /// Obtains the configuration of the game.
    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the root node of the game tree.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Runs one training iteration: a full CFR pass over every ordered pair
    /// of distinct hands, weighted by the priors.
    ///
    /// Returns the prior-weighted expected utility of the iteration
    /// (OOP-relative) as a diagnostic.
    pub fn train(&mut self) -> f32 {
        let num_hands = self.config.num_hands;
        let mut total = 0.0;

        for oop_hand in 0..num_hands {
            for ip_hand in 0..num_hands {
                if oop_hand == ip_hand {
                    continue;
                }

                let prob = self.config.priors[0][oop_hand] * self.config.priors[1][ip_hand];
                total += prob * self.root.cfr_util(oop_hand, ip_hand, prob, &self.config.ranking);
            }
        }

        total
    }

    /// Returns the number of nodes in the game tree.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        Self::count_nodes(&self.root)
    }

    /// Returns the estimated heap memory usage of the game tree in bytes.
    #[inline]
    pub fn memory_usage(&self) -> u64 {
        std::mem::size_of::<Node>() as u64 + Self::node_memory_usage(&self.root)
    }

    /// Checks the configuration.
    fn check_config(config: &GameConfig) -> Result<(), String> {
        if config.num_hands < 2 {
            return Err(format!(
                "Hand universe must contain at least two hands: {}",
                config.num_hands
            ));
        }

        if !(config.ante.is_finite() && config.ante > 0.0) {
            return Err(format!("Ante must be positive: {}", config.ante));
        }

        if !(config.effective_stack.is_finite() && config.effective_stack > 0.0) {
            return Err(format!(
                "Effective stack must be positive: {}",
                config.effective_stack
            ));
        }

        if config.bet_sizes.is_empty() {
            return Err("At least one betting round is required".to_string());
        }

        for (round, menu) in config.bet_sizes.iter().enumerate() {
            if menu.sizes.is_empty() {
                return Err(format!("Bet menu of round {round} is empty"));
            }
            for &size in &menu.sizes {
                if !(size.is_finite() && size > 0.0) {
                    return Err(format!("Bet size of round {round} must be positive: {size}"));
                }
            }
        }

        for (player, prior) in config.priors.iter().enumerate() {
            if prior.len() != config.num_hands {
                return Err(format!(
                    "Prior of player {player} covers {} hands, expected {}",
                    prior.len(),
                    config.num_hands
                ));
            }
        }

        if config.ranking.len() != config.num_hands {
            return Err(format!(
                "Ranking covers {} hands, expected {}",
                config.ranking.len(),
                config.num_hands
            ));
        }

        Ok(())
    }

    /// Builds the opening decision: OOP cannot fold, and may check or bet.
    fn build_root(config: &GameConfig) -> Node {
        let menu = &config.bet_sizes[0];
        let remaining_rounds = &config.bet_sizes[1..];

        let mut children = Vec::new();

        // check: terminal when IP may not respond, otherwise IP decides with
        // the same round's menu
        if config.bet_after_check {
            children.push(Self::build_check_response(config));
        } else {
            children.push(Node::Showdown(ShowdownNode::new(config.ante)));
        }

        // opening pot is just the ante
        for &size in &menu.sizes {
            let next_bet = config.ante * size;
            children.push(Self::build_response(
                config,
                next_bet,
                0.0,
                PLAYER_IP,
                remaining_rounds,
            ));
        }

        Node::Decision(DecisionNode::new(PLAYER_OOP, children))
    }

    /// Builds IP's decision after an opening check: no fold option, and a
    /// check-back goes to showdown for the ante.
    fn build_check_response(config: &GameConfig) -> Node {
        let menu = &config.bet_sizes[0];
        let remaining_rounds = &config.bet_sizes[1..];

        let mut children = vec![Node::Showdown(ShowdownNode::new(config.ante))];

        for &size in &menu.sizes {
            let next_bet = config.ante * size;
            children.push(Self::build_response(
                config,
                0.0,
                next_bet,
                PLAYER_OOP,
                remaining_rounds,
            ));
        }

        Node::Decision(DecisionNode::new(PLAYER_IP, children))
    }

    /// Builds a decision for a player facing a bet: fold, call, or raise from
    /// the current round's menu.
    ///
    /// `oop_put_in` / `ip_put_in` are each player's total commitment beyond
    /// the ante. Raise amounts replace the acting player's commitment.
    fn build_response(
        config: &GameConfig,
        oop_put_in: f32,
        ip_put_in: f32,
        player: u8,
        remaining_rounds: &[BetMenu],
    ) -> Node {
        let pot = oop_put_in + ip_put_in + config.ante;

        let mut children = Vec::new();

        // folding forfeits the player's own commitment plus the ante
        let fold_amount = match player {
            PLAYER_OOP => oop_put_in,
            _ => ip_put_in,
        } + config.ante;
        children.push(Node::Fold(FoldNode::new(player, fold_amount)));

        // all-in: once a commitment exceeds the stack, the only legal actions
        // are fold and call, and the call is clipped to the stack
        if oop_put_in > config.effective_stack || ip_put_in > config.effective_stack {
            children.push(Node::Showdown(ShowdownNode::new(
                config.effective_stack + config.ante,
            )));
            return Node::Decision(DecisionNode::new(player, children));
        }

        // calling matches the opponent's commitment
        let call_amount = match player {
            PLAYER_OOP => ip_put_in,
            _ => oop_put_in,
        } + config.ante;
        children.push(Node::Showdown(ShowdownNode::new(call_amount)));

        if let Some((menu, rest)) = remaining_rounds.split_first() {
            for &size in &menu.sizes {
                let next_bet = pot * size;
                let child = match player {
                    PLAYER_OOP => {
                        Self::build_response(config, next_bet, ip_put_in, PLAYER_IP, rest)
                    }
                    _ => Self::build_response(config, oop_put_in, next_bet, PLAYER_OOP, rest),
                };
                children.push(child);
            }
        }

        Node::Decision(DecisionNode::new(player, children))
    }

    /// Allocates the accumulator matrices once the child counts are known.
    fn allocate_memory_recursive(node: &mut Node, num_hands: usize) {
        if let Node::Decision(node) = node {
            let num_elements = node.children.len() * num_hands;
            node.regrets = vec![0.0; num_elements];
            node.strategy_sums = vec![0.0; num_elements];

            for child in &mut node.children {
                Self::allocate_memory_recursive(child, num_hands);
            }
        }
    }

    fn count_nodes(node: &Node) -> usize {
        match node {
            Node::Decision(node) => {
                1 + node.children.iter().map(Self::count_nodes).sum::<usize>()
            }
            _ => 1,
        }
    }

    fn node_memory_usage(node: &Node) -> u64 {
        match node {
            Node::Decision(node) => {
                vec_memory_usage(&node.children)
                    + vec_memory_usage(&node.regrets)
                    + vec_memory_usage(&node.strategy_sums)
                    + node
                        .children
                        .iter()
                        .map(Self::node_memory_usage)
                        .sum::<u64>()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> GameConfig {
        GameConfig {
            num_hands: 3,
            ante: 1.0,
            effective_stack: 10.0,
            bet_sizes: vec![BetMenu::try_from("100%").unwrap()],
            bet_after_check: false,
            priors: [CardDistribution::uniform(3), CardDistribution::uniform(3)],
            ranking: HandRanking::identity(3),
        }
    }

    #[test]
    fn check_config_rejects_bad_input() {
        let config = GameConfig {
            num_hands: 1,
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            ante: 0.0,
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            effective_stack: -1.0,
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            bet_sizes: Vec::new(),
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            bet_sizes: vec![BetMenu::default()],
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            priors: [CardDistribution::uniform(2), CardDistribution::uniform(3)],
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        let config = GameConfig {
            ranking: HandRanking::identity(4),
            ..base_config()
        };
        assert!(OneStreetGame::with_config(config).is_err());

        assert!(OneStreetGame::with_config(base_config()).is_ok());
    }

    #[test]
    fn opening_layout_without_bet_after_check() {
        let game = OneStreetGame::with_config(base_config()).unwrap();

        let Node::Decision(root) = game.root() else {
            panic!("root must be a decision");
        };
        assert_eq!(root.player(), PLAYER_OOP);
        assert_eq!(root.num_actions(), 2);

        // action 0: check straight to showdown for the ante
        let Node::Showdown(check) = root.play(0) else {
            panic!("check must be terminal");
        };
        assert_eq!(check.payoff(), 1.0);

        // action 1: pot-sized bet; IP faces fold / call and no raise remains
        let Node::Decision(facing_bet) = root.play(1) else {
            panic!("bet must lead to a decision");
        };
        assert_eq!(facing_bet.player(), PLAYER_IP);
        assert_eq!(facing_bet.num_actions(), 2);

        let Node::Fold(fold) = facing_bet.play(0) else {
            panic!("action 0 must be fold");
        };
        assert_eq!(fold.payoff(), 1.0); // IP folds, forfeiting the ante

        let Node::Showdown(call) = facing_bet.play(1) else {
            panic!("action 1 must be call");
        };
        assert_eq!(call.payoff(), 2.0); // ante + matched pot-sized bet
    }

    #[test]
    fn opening_layout_with_bet_after_check() {
        let config = GameConfig {
            bet_after_check: true,
            ..base_config()
        };
        let game = OneStreetGame::with_config(config).unwrap();

        let Node::Decision(root) = game.root() else {
            panic!("root must be a decision");
        };

        // the check now passes the action to IP instead of ending the hand
        let Node::Decision(after_check) = root.play(0) else {
            panic!("check must lead to an IP decision");
        };
        assert_eq!(after_check.player(), PLAYER_IP);
        assert_eq!(after_check.num_actions(), 2);

        let Node::Showdown(check_back) = after_check.play(0) else {
            panic!("action 0 must be a check-back");
        };
        assert_eq!(check_back.payoff(), 1.0);

        // IP's delayed bet puts OOP to a fold/call decision
        let Node::Decision(facing_delayed_bet) = after_check.play(1) else {
            panic!("action 1 must be a bet");
        };
        assert_eq!(facing_delayed_bet.player(), PLAYER_OOP);

        let Node::Fold(fold) = facing_delayed_bet.play(0) else {
            panic!("action 0 must be fold");
        };
        assert_eq!(fold.payoff(), -1.0); // OOP folds, forfeiting the ante
    }

    #[test]
    fn allin_truncates_betting() {
        // a 400% pot bet commits 4 chips against a 2-chip stack, so the
        // player facing it may only fold or call for the clipped amount, even
        // though another betting round is configured
        let config = GameConfig {
            effective_stack: 2.0,
            bet_sizes: vec![
                BetMenu::try_from("400%").unwrap(),
                BetMenu::try_from("100%").unwrap(),
            ],
            ..base_config()
        };
        let game = OneStreetGame::with_config(config).unwrap();

        let facing_allin = game.root().play(1);
        assert_eq!(facing_allin.num_actions(), 2);

        assert!(matches!(facing_allin.play(0), Node::Fold(_)));
        let Node::Showdown(call) = facing_allin.play(1) else {
            panic!("action 1 must be a clipped call");
        };
        assert_eq!(call.payoff(), 3.0); // effective stack + ante
    }

    #[test]
    fn multi_round_menus_add_raises() {
        let config = GameConfig {
            bet_sizes: vec![
                BetMenu::try_from("100%").unwrap(),
                BetMenu::try_from("50%, 100%").unwrap(),
            ],
            ..base_config()
        };
        let game = OneStreetGame::with_config(config).unwrap();

        // facing the opening bet: fold, call, and two raise sizes
        let facing_bet = game.root().play(1);
        assert_eq!(facing_bet.num_actions(), 4);

        // facing a raise: the menus are exhausted, so only fold and call
        let facing_raise = facing_bet.play(2);
        assert_eq!(facing_raise.num_actions(), 2);
    }

    #[test]
    fn train_returns_finite_utility() {
        let mut game = OneStreetGame::with_config(base_config()).unwrap();
        for _ in 0..10 {
            let util = game.train();
            assert!(util.is_finite());
        }
    }

    #[test]
    fn tree_diagnostics() {
        let game = OneStreetGame::with_config(base_config()).unwrap();

        // root (check, bet) + check showdown + facing-bet (fold, call)
        assert_eq!(game.num_nodes(), 5);
        assert!(game.memory_usage() > 0);
    }
}
