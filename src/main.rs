use colored::Colorize;
use diagonal_sudoku::{solve, Board};
use std::env;

fn main() {
    env_logger::init();
    let grid = env::args().nth(1).expect("No grid found.");
    match Board::parse(&grid) {
        Ok(board) => {
            println!("Input:\n{board}");
            match solve(board) {
                Ok((solution, iterations)) => {
                    println!("Found a solution in {iterations} iterations.\n{solution}");
                }
                Err(err) => {
                    println!("{}", format!("{err}").red());
                }
            }
        }
        Err(err) => {
            println!("{}", format!("{err}").red());
        }
    }
}
