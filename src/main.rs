use std::process;

use clap::Parser;

use jira_pr_link::cli::Args;
use jira_pr_link::{app, output};

fn main() {
    let args = Args::parse();

    if let Err(err) = app::run(args) {
        output::error(&err.to_string());
        process::exit(1);
    }
}
