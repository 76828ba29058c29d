//! Types command - list the closed type vocabulary.

use colored::Colorize;
use typemill::schema::ALL_CANDIDATES;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "  {:<14} {:<16} {}",
        "name".yellow().bold(),
        "display".yellow().bold(),
        "description".yellow().bold()
    );
    for candidate in ALL_CANDIDATES {
        println!(
            "  {:<14} {:<16} {}",
            candidate.snake_name().green(),
            candidate.display_name(),
            candidate.description()
        );
    }
    Ok(())
}
