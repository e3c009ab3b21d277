pub mod cli;
pub mod corpus;
pub mod fields;
pub mod foundry;
pub mod relation;
pub mod report;
pub mod scan;

use colored::Colorize;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
