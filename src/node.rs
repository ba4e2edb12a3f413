use crate::distribution::*;
use crate::sliceop::*;

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

/// The first player to act (out of position).
pub const PLAYER_OOP: u8 = 0;

/// The second player to act (in position).
pub const PLAYER_IP: u8 = 1;

/// A node of the game tree.
///
/// The tree is a single rooted, acyclic structure: every child is owned
/// exclusively by its parent. All utilities are expressed relative to the OOP
/// player (positive = good for OOP).
#[derive(Debug)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub enum Node {
    /// An internal node where one player chooses among the child actions.
    Decision(DecisionNode),

    /// A terminal node reached by the player on move folding.
    Fold(FoldNode),

    /// A terminal node reached by a call or check-down; the pot goes to the
    /// better hand.
    Showdown(ShowdownNode),
}

/// A terminal fold state.
///
/// The payoff is fixed at construction: the amount the folding player
/// forfeits, already signed relative to OOP (negative when OOP folds).
#[derive(Debug)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct FoldNode {
    pub(crate) payoff: f32,
}

/// A terminal showdown state.
///
/// The payoff is the (positive) amount at stake; the realized utility is
/// `+payoff` when OOP's hand outranks IP's and `-payoff` otherwise.
#[derive(Debug)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct ShowdownNode {
    pub(crate) payoff: f32,
}

/// An internal decision node.
///
/// Holds, per child action and per possible hand of the player on move, a
/// cumulative regret and a cumulative strategy weight. Both matrices use the
/// action-major layout `[action][hand]`. The instantaneous regret-matching
/// strategy oscillates between iterations; the time-averaged strategy
/// accumulated in `strategy_sums` is the quantity that converges to
/// equilibrium.
#[derive(Debug)]
#[cfg_attr(feature = "bincode", derive(Decode, Encode))]
pub struct DecisionNode {
    pub(crate) player: u8,
    pub(crate) children: Vec<Node>,
    pub(crate) regrets: Vec<f32>,
    pub(crate) strategy_sums: Vec<f32>,
}

impl FoldNode {
    pub(crate) fn new(folding_player: u8, amount: f32) -> Self {
        debug_assert!(amount > 0.0);
        let sign = if folding_player == PLAYER_OOP { -1.0 } else { 1.0 };
        Self {
            payoff: sign * amount,
        }
    }

    /// Returns the pre-signed fold payoff.
    #[inline]
    pub fn payoff(&self) -> f32 {
        self.payoff
    }
}

impl ShowdownNode {
    pub(crate) fn new(payoff: f32) -> Self {
        debug_assert!(payoff > 0.0);
        Self { payoff }
    }

    /// Returns the amount at stake at this showdown.
    #[inline]
    pub fn payoff(&self) -> f32 {
        self.payoff
    }
}

impl Node {
    /// Returns whether the node is terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Node::Decision(_))
    }

    /// Returns the number of available actions (zero for terminal nodes).
    #[inline]
    pub fn num_actions(&self) -> usize {
        match self {
            Node::Decision(node) => node.num_actions(),
            _ => 0,
        }
    }

    /// Returns the node reached by taking the given action.
    ///
    /// # Panics
    /// Panics if the node is terminal or the action index is out of range.
    #[inline]
    pub fn play(&self, action: usize) -> &Node {
        match self {
            Node::Decision(node) => node.play(action),
            _ => panic!("Terminal node has no children"),
        }
    }

    /// Computes the utility of this node for one hand match-up and updates
    /// the regret and average-strategy accumulators along the way.
    ///
    /// `prob_in` is the reach probability of this node under the current
    /// strategy profile and the priors.
    pub(crate) fn cfr_util(
        &mut self,
        oop_hand: usize,
        ip_hand: usize,
        prob_in: f32,
        ranking: &HandRanking,
    ) -> f32 {
        match self {
            Node::Fold(node) => node.payoff,
            Node::Showdown(node) => {
                if ranking.beats(oop_hand, ip_hand) {
                    node.payoff
                } else {
                    -node.payoff
                }
            }
            Node::Decision(node) => node.cfr_util(oop_hand, ip_hand, prob_in, ranking),
        }
    }

    /// Computes the utility the exploiter achieves with `exploiter_hand`
    /// against the exploited player's frozen average strategy, given the
    /// exploited player's hand distribution.
    ///
    /// The distribution is renormalized on entry (excluding the exploiter's
    /// hand at decision nodes), so callers may pass it unnormalized.
    pub(crate) fn best_response_util(
        &self,
        exploited: u8,
        exploiter_hand: usize,
        mut distro: CardDistribution,
        ranking: &HandRanking,
    ) -> f32 {
        match self {
            Node::Fold(node) => node.payoff,
            Node::Showdown(node) => {
                distro.normalize(None);

                // net win/loss probability of the exploited player's hands
                // against the exploiter's fixed hand
                let mut swing = 0.0;
                for hand in 0..distro.len() {
                    if hand == exploiter_hand {
                        continue;
                    }
                    if ranking.beats(hand, exploiter_hand) {
                        swing += distro[hand];
                    } else {
                        swing -= distro[hand];
                    }
                }

                let sign = if exploited == PLAYER_OOP { 1.0 } else { -1.0 };
                node.payoff * swing * sign
            }
            Node::Decision(node) => {
                distro.normalize(Some(exploiter_hand));
                if node.player == exploited {
                    node.exploited_util(exploited, exploiter_hand, &distro, ranking)
                } else {
                    node.exploiting_util(exploited, exploiter_hand, &distro, ranking)
                }
            }
        }
    }
}

impl DecisionNode {
    pub(crate) fn new(player: u8, children: Vec<Node>) -> Self {
        Self {
            player,
            children,
            regrets: Vec::new(),
            strategy_sums: Vec::new(),
        }
    }

    /// Returns the player on move at this node ([`PLAYER_OOP`] or
    /// [`PLAYER_IP`]).
    #[inline]
    pub fn player(&self) -> u8 {
        self.player
    }

    /// Returns the number of available actions.
    #[inline]
    pub fn num_actions(&self) -> usize {
        self.children.len()
    }

    /// Returns the node reached by taking the given action.
    #[inline]
    pub fn play(&self, action: usize) -> &Node {
        &self.children[action]
    }

    #[inline]
    fn num_hands(&self) -> usize {
        self.regrets.len() / self.children.len()
    }

    /// Computes the live strategy for the given hand by regret matching.
    ///
    /// Probability mass is put only on actions with positive accumulated
    /// regret, proportional to the regret; if no regret is positive the
    /// strategy falls back to uniform exploration.
    pub fn current_strategy(&self, hand: usize) -> Vec<f32> {
        let num_actions = self.children.len();
        let num_hands = self.num_hands();

        let mut strategy = Vec::with_capacity(num_actions);
        let mut denom = 0.0;

        for action in 0..num_actions {
            let regret = row(&self.regrets, action, num_hands)[hand].max(0.0);
            strategy.push(regret);
            denom += regret;
        }

        if denom == 0.0 {
            strategy.fill(1.0 / num_actions as f32);
        } else {
            strategy.iter_mut().for_each(|prob| *prob /= denom);
        }

        strategy
    }

    /// Computes the time-averaged strategy for the given hand.
    ///
    /// Uniform if the node has not been visited for this hand yet.
    pub fn average_strategy(&self, hand: usize) -> Vec<f32> {
        let num_actions = self.children.len();
        let num_hands = self.num_hands();

        let mut strategy = Vec::with_capacity(num_actions);
        let mut denom = 0.0;

        for action in 0..num_actions {
            let weight = row(&self.strategy_sums, action, num_hands)[hand];
            strategy.push(weight);
            denom += weight;
        }

        if denom == 0.0 {
            strategy.fill(1.0 / num_actions as f32);
        } else {
            strategy.iter_mut().for_each(|prob| *prob /= denom);
        }

        strategy
    }

    fn cfr_util(&mut self, oop_hand: usize, ip_hand: usize, prob_in: f32, ranking: &HandRanking) -> f32 {
        let hand = if self.player == PLAYER_OOP {
            oop_hand
        } else {
            ip_hand
        };

        // snapshot of the strategy implied by the regrets at entry; the
        // updates below must not feed back into this visit
        let strategy = self.current_strategy(hand);

        let mut child_utils = Vec::with_capacity(self.children.len());
        let mut util = 0.0;

        for (action, child) in self.children.iter_mut().enumerate() {
            let child_util = child.cfr_util(oop_hand, ip_hand, prob_in * strategy[action], ranking);
            util += strategy[action] * child_util;
            child_utils.push(child_util);
        }

        // regret is accumulated as "how much more this player wants the
        // action", so IP's contributions are sign-flipped
        let sign = if self.player == PLAYER_OOP { 1.0 } else { -1.0 };
        let num_hands = self.num_hands();

        for (action, &child_util) in child_utils.iter().enumerate() {
            let regret = (child_util - util) * sign;
            row_mut(&mut self.regrets, action, num_hands)[hand] += prob_in * regret;
            row_mut(&mut self.strategy_sums, action, num_hands)[hand] += prob_in * strategy[action];
        }

        util
    }

    /// Best-response utility when the player on move here is the exploited
    /// one and must follow its frozen average strategy.
    ///
    /// `distro` must be normalized with the exploiter's hand excluded.
    fn exploited_util(
        &self,
        exploited: u8,
        exploiter_hand: usize,
        distro: &CardDistribution,
        ranking: &HandRanking,
    ) -> f32 {
        let num_hands = distro.len();

        let strategies = (0..num_hands)
            .map(|hand| self.average_strategy(hand))
            .collect::<Vec<_>>();

        let mut util = 0.0;

        for (action, child) in self.children.iter().enumerate() {
            // reweight the opponent's possible hands by how often each one
            // chooses this action; the forwarded distribution stays
            // unnormalized and the child renormalizes on entry
            let mut forwarded = distro.clone();
            let mut action_prob = 0.0;

            for hand in 0..num_hands {
                if hand == exploiter_hand {
                    continue;
                }
                forwarded.weights[hand] *= strategies[hand][action];
                action_prob += forwarded.weights[hand];
            }

            util += action_prob
                * child.best_response_util(exploited, exploiter_hand, forwarded, ranking);
        }

        util
    }

    /// Best-response utility when the player on move here is the exploiter:
    /// every child is evaluated under the same distribution and the best one
    /// is chosen outright.
    fn exploiting_util(
        &self,
        exploited: u8,
        exploiter_hand: usize,
        distro: &CardDistribution,
        ranking: &HandRanking,
    ) -> f32 {
        let mut best = if self.player == PLAYER_OOP {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for child in &self.children {
            let child_util =
                child.best_response_util(exploited, exploiter_hand, distro.clone(), ranking);
            best = if self.player == PLAYER_OOP {
                best.max(child_util)
            } else {
                best.min(child_util)
            };
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_action_node(regrets: [f32; 2]) -> DecisionNode {
        let children = vec![
            Node::Fold(FoldNode::new(PLAYER_OOP, 1.0)),
            Node::Showdown(ShowdownNode::new(1.0)),
        ];
        let mut node = DecisionNode::new(PLAYER_OOP, children);
        node.regrets = regrets.to_vec();
        node.strategy_sums = vec![0.0; 2];
        node
    }

    #[test]
    fn regret_matching_puts_mass_on_positive_regret() {
        let node = two_action_node([5.0, 0.0]);
        assert_eq!(node.current_strategy(0), [1.0, 0.0]);
    }

    #[test]
    fn regret_matching_zero_regrets_is_uniform() {
        let node = two_action_node([0.0, 0.0]);
        assert_eq!(node.current_strategy(0), [0.5, 0.5]);
    }

    #[test]
    fn regret_matching_clamps_negative_regrets() {
        let node = two_action_node([-1.0, -1.0]);
        assert_eq!(node.current_strategy(0), [0.5, 0.5]);
    }

    #[test]
    fn showdown_sign_convention() {
        let ranking = HandRanking::identity(4);

        for payoff in [0.5, 1.0, 2.5] {
            let mut node = Node::Showdown(ShowdownNode::new(payoff));
            for oop_hand in 0..4 {
                for ip_hand in 0..4 {
                    if oop_hand == ip_hand {
                        continue;
                    }
                    let util = node.cfr_util(oop_hand, ip_hand, 1.0, &ranking);
                    let expected = if oop_hand > ip_hand { payoff } else { -payoff };
                    assert_eq!(util, expected);
                }
            }
        }
    }

    #[test]
    fn fold_payoff_is_pre_signed() {
        assert_eq!(FoldNode::new(PLAYER_OOP, 2.0).payoff(), -2.0);
        assert_eq!(FoldNode::new(PLAYER_IP, 2.0).payoff(), 2.0);
    }

    #[test]
    fn showdown_best_response_swing() {
        let ranking = HandRanking::identity(3);
        let node = Node::Showdown(ShowdownNode::new(2.0));

        // exploiter (IP) holds the middle hand against a uniform OOP range:
        // one hand wins against it, one loses, so the swing cancels out
        let distro = CardDistribution::uniform(3);
        let util = node.best_response_util(PLAYER_OOP, 1, distro, &ranking);
        assert!(util.abs() < 1e-6);

        // against a range of only the best hand the full payoff is lost
        let distro = CardDistribution::new(vec![0.0, 0.0, 1.0]).unwrap();
        let util = node.best_response_util(PLAYER_OOP, 1, distro, &ranking);
        assert!((util - 2.0).abs() < 1e-6);

        // same spot with roles swapped: OOP exploits IP's nut-only range
        let distro = CardDistribution::new(vec![0.0, 0.0, 1.0]).unwrap();
        let util = node.best_response_util(PLAYER_IP, 1, distro, &ranking);
        assert!((util + 2.0).abs() < 1e-6);
    }

    #[test]
    fn exploiter_picks_the_best_child() {
        let ranking = HandRanking::identity(3);

        // IP to move and free to choose between folding (+1 for OOP) and a
        // showdown; exploiting IP minimizes OOP-relative utility
        let children = vec![
            Node::Fold(FoldNode::new(PLAYER_IP, 1.0)),
            Node::Showdown(ShowdownNode::new(2.0)),
        ];
        let mut node = DecisionNode::new(PLAYER_IP, children);
        node.regrets = vec![0.0; 6];
        node.strategy_sums = vec![0.0; 6];
        let node = Node::Decision(node);

        // holding the worst hand, showdown loses 2 while folding loses only
        // 1, so the minimizing exploiter folds (+1 OOP-relative)
        let distro = CardDistribution::new(vec![0.0, 1.0, 1.0]).unwrap();
        let util = node.best_response_util(PLAYER_OOP, 0, distro, &ranking);
        assert!((util - 1.0).abs() < 1e-6);

        // holding the best hand, showdown wins 2 for IP (-2 OOP-relative)
        let distro = CardDistribution::new(vec![1.0, 1.0, 0.0]).unwrap();
        let util = node.best_response_util(PLAYER_OOP, 2, distro, &ranking);
        assert!((util + 2.0).abs() < 1e-6);
    }
}
