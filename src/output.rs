//! Console logging and named outputs
//!
//! Progress lines use the `>` prefix. Warnings and errors are printed as
//! workflow commands so the CI runner turns them into annotations.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;

/// Print a progress line
pub fn info(message: &str) {
    println!("{} {}", ">".bright_green(), message);
}

/// Print a progress line with a highlighted value
pub fn value(label: &str, value: &str) {
    println!("{} {}: {}", ">".bright_green(), label, value.bright_cyan());
}

pub fn warning(message: &str) {
    println!("::warning::{}", escape_command_data(message));
}

pub fn error(message: &str) {
    println!("::error::{}", escape_command_data(message));
}

/// Workflow commands end at the first newline, so encode line breaks
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Named results of a run for later workflow steps
#[derive(Debug, Default, Clone)]
pub struct ActionOutputs {
    file: Option<PathBuf>,
}

impl ActionOutputs {
    /// Outputs are appended to `file`, or printed when there is none
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let entry = format_entry(name, value);

        match &self.file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(entry.as_bytes())?;
            }
            None => print!("{} output {}", "+".bright_green(), entry),
        }
        Ok(())
    }
}

fn format_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{}={}\n", name, value);
    }

    let mut delimiter = String::from("EOF");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}
