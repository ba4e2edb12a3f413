use onestreet_solver::*;

fn main() {
    // a 10-hand universe ranked by hand index, dealt uniformly to both
    // players
    let num_hands = 10;

    // bet sizes -> one round with a 2x-pot bet
    // see the documentation of `BetMenu` for more details
    let bet_sizes = vec![BetMenu::try_from("200%").unwrap()];

    let config = GameConfig {
        num_hands,
        ante: 1.0,
        effective_stack: 10.0,
        bet_sizes,
        bet_after_check: true, // IP may bet after OOP checks
        priors: [
            CardDistribution::uniform(num_hands),
            CardDistribution::uniform(num_hands),
        ],
        ranking: HandRanking::identity(num_hands),
    };

    // build the game tree
    let mut game = OneStreetGame::with_config(config).unwrap();

    // check the tree size
    println!("Nodes: {}", game.num_nodes());
    println!("Memory usage: {:.2}KB", game.memory_usage() as f64 / 1024.0);

    // solve the game
    let max_num_iterations = 10000;
    let target_exploitability = 0.001;
    let exploitability = solve(&mut game, max_num_iterations, target_exploitability, true);
    println!("Exploitability: {:.6}", exploitability);

    // report both best-response values; their gap is the exploitability
    let (vs_oop, vs_ip) = nash_dist(&game);
    println!("Best response vs OOP: {:.4}", vs_oop);
    println!("Best response vs IP:  {:.4}", vs_ip);

    // print the trained average strategy of every decision
    print_strategy(game.root(), num_hands, String::new());

    // prior-weighted opening bet frequency
    if let Node::Decision(root) = game.root() {
        let bet_freqs = (0..num_hands)
            .map(|hand| 1.0 - root.average_strategy(hand)[0])
            .collect::<Vec<_>>();
        let average = compute_average(&bet_freqs, game.config().priors[0].weights());
        println!("Average opening bet frequency: {:.1}%", 100.0 * average);
    }
}

/// Recursively prints the average strategy of every decision node, labeling
/// each by the action path that reaches it.
fn print_strategy(node: &Node, num_hands: usize, history: String) {
    let Node::Decision(node) = node else {
        return;
    };

    let player = match node.player() {
        PLAYER_OOP => "OOP",
        _ => "IP",
    };
    println!("{player} facing [{history}]:");

    for hand in 0..num_hands {
        let strategy = node.average_strategy(hand);
        let percentages = strategy
            .iter()
            .map(|prob| format!("{:5.1}%", 100.0 * prob))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  hand {hand}: {percentages}");
    }

    for action in 0..node.num_actions() {
        let next_history = if history.is_empty() {
            action.to_string()
        } else {
            format!("{history} {action}")
        };
        print_strategy(node.play(action), num_hands, next_history);
    }
}
