use crate::game::*;
use crate::utility::*;
use std::io::{stdout, Write};

/// Performs CFR self-play until the given number of iterations or
/// exploitability is satisfied, and returns the exploitability.
pub fn solve(
    game: &mut OneStreetGame,
    num_iterations: u32,
    target_exploitability: f32,
    print_progress: bool,
) -> f32 {
    if print_progress {
        print!("iteration: 0 / {}", num_iterations);
        stdout().flush().unwrap();
    }

    let mut exploitability = f32::INFINITY;

    for t in 0..num_iterations {
        game.train();

        if (t + 1) % 10 == 0 || t + 1 == num_iterations {
            exploitability = compute_exploitability(game);
            if print_progress {
                print!("\riteration: {} / {} ", t + 1, num_iterations);
                print!("(exploitability = {:.4e})", exploitability);
                stdout().flush().unwrap();
            }
            if exploitability <= target_exploitability {
                break;
            }
        } else if print_progress {
            print!("\riteration: {} / {}", t + 1, num_iterations);
            stdout().flush().unwrap();
        }
    }

    if print_progress {
        println!();
        stdout().flush().unwrap();
    }

    if num_iterations > 0 {
        exploitability
    } else {
        compute_exploitability(game)
    }
}
