use crate::Result;
use crate::core::prompt::Prompter;
use crate::error::CliError;
use atty::Stream;
use rpassword::read_password;
use std::io::{self, BufRead, Write};

/// Format a prompt line, showing the default in brackets
pub fn prompt_text(label: &str, default: Option<&str>) -> String {
    match default {
        Some(default) if !default.is_empty() => format!("{} [{}]: ", label, default),
        _ => format!("{}: ", label),
    }
}

fn input_error(field: &str, message: impl ToString) -> CliError {
    CliError::Input {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn flush_stdout(field: &str) -> Result<()> {
    io::stdout()
        .flush()
        .map_err(|e| input_error(field, format!("Failed to flush stdout: {}", e)))?;
    Ok(())
}

/// Read one line from stdin without its line terminator; EOF is an error
pub fn read_line(field: &str) -> Result<String> {
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| input_error(field, e))?;

    if read == 0 {
        return Err(input_error(field, "unexpected end of input").into());
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompts on stdout, answers from stdin
#[derive(Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        print!("{}", prompt_text(label, default));
        flush_stdout(label)?;

        let answer = read_line(label)?;
        match default {
            Some(default) if answer.trim().is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn prompt_secret(&mut self, label: &str) -> Result<String> {
        print!("{}", prompt_text(label, None));
        flush_stdout(label)?;

        // rpassword needs a terminal; piped input is read as a plain line
        if atty::is(Stream::Stdin) {
            read_password().map_err(|e| input_error(label, e).into())
        } else {
            let secret = read_line(label)?;
            println!();
            Ok(secret)
        }
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            prompt_text("Enter the AGOL item ID", None),
            "Enter the AGOL item ID: "
        );
        assert_eq!(
            prompt_text("Enter your AGOL username", Some("alice")),
            "Enter your AGOL username [alice]: "
        );
        assert_eq!(prompt_text("Label", Some("")), "Label: ");
    }
}
