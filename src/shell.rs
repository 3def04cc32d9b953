//! Line-oriented front end: parses commands and drives a session.

use crate::error::{Result, WizardError};
use crate::llm::CompletionService;
use crate::loader::Datasets;
use crate::prompts::QUICK_QUESTIONS;
use crate::selection::CountryDirectory;
use crate::session::SessionContext;
use std::io::Write;
use tracing::debug;

pub const HELP: &str = "\
Commands:
  countries                 list countries
  countries <a>, <b>, ...   choose countries (clears providers)
  companies                 list providers for the chosen countries
  companies <a>, <b>, ...   choose providers
                            quote names that contain commas: \"Vodafone Group, plc\"
  proceed                   apply the selection and open the chat
  ask <question>            ask about the selected data; once chat is open a
                            plain line is a question too, but a line starting
                            with a command word needs the ask form
  q1 | q2 | q3              ask a quick question
  history                   show the conversation
  status                    show the current selection
  help                      show this help
  quit                      leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListCountries,
    SetCountries(Vec<String>),
    ListCompanies,
    SetCompanies(Vec<String>),
    Proceed,
    Ask(String),
    Quick(usize),
    History,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    Continue,
    Exit,
}

/// Parse one input line. Blank lines yield `None`. Once chat is open, any
/// line that is not a command is taken as a question.
pub fn parse_command(line: &str, chat_open: bool) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_lowercase().as_str() {
        "countries" if rest.is_empty() => Command::ListCountries,
        "countries" => Command::SetCountries(split_list(rest)),
        "companies" | "providers" if rest.is_empty() => Command::ListCompanies,
        "companies" | "providers" => Command::SetCompanies(split_list(rest)),
        "proceed" if rest.is_empty() => Command::Proceed,
        "ask" if !rest.is_empty() => Command::Ask(rest.to_string()),
        "ask" => return Err(WizardError::Command("usage: ask <question>".to_string())),
        "q1" if rest.is_empty() => Command::Quick(0),
        "q2" if rest.is_empty() => Command::Quick(1),
        "q3" if rest.is_empty() => Command::Quick(2),
        "history" if rest.is_empty() => Command::History,
        "status" if rest.is_empty() => Command::Status,
        "help" if rest.is_empty() => Command::Help,
        "quit" | "exit" if rest.is_empty() => Command::Quit,
        _ if chat_open => Command::Ask(line.to_string()),
        _ => {
            return Err(WizardError::Command(format!(
                "unknown command '{}', try 'help'",
                head
            )))
        }
    };

    Ok(Some(command))
}

/// Comma-separated names. Double quotes protect commas inside a name.
fn split_list(input: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => items.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    items.push(current);

    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Owns one session over loaded datasets and a completion backend.
pub struct Shell<'a, S: CompletionService + ?Sized> {
    datasets: &'a Datasets,
    directory: CountryDirectory,
    service: &'a S,
    session: SessionContext,
}

impl<'a, S: CompletionService + ?Sized> Shell<'a, S> {
    pub fn new(datasets: &'a Datasets, service: &'a S) -> Result<Self> {
        Ok(Self {
            directory: CountryDirectory::from_table(&datasets.dropdown)?,
            datasets,
            service,
            session: SessionContext::new(),
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Run one line and report a failed command on `out`. Only output
    /// errors are returned.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ShellControl> {
        match self.run_line(line, out).await {
            Ok(control) => Ok(control),
            Err(WizardError::Io(e)) => Err(WizardError::Io(e)),
            Err(e) => {
                debug!("[{}] Command failed: {}", self.session.id(), e);
                writeln!(out, "Error: {}", e)?;
                Ok(ShellControl::Continue)
            }
        }
    }

    /// Parse and run one line.
    pub async fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ShellControl> {
        match parse_command(line, self.session.chat_open())? {
            Some(command) => self.execute(command, out).await,
            None => Ok(ShellControl::Continue),
        }
    }

    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<ShellControl> {
        match command {
            Command::ListCountries => {
                writeln!(out, "Countries: {}", self.directory.countries().join(", "))?;
            }
            Command::SetCountries(countries) => {
                self.session.set_countries(&self.directory, countries)?;
                let available = self.session.selection.available_companies(&self.directory);
                writeln!(out, "Providers available: {}", available.join(", "))?;
            }
            Command::ListCompanies => {
                if self.session.selection.countries().is_empty() {
                    writeln!(out, "Choose countries first.")?;
                } else {
                    let available = self.session.selection.available_companies(&self.directory);
                    writeln!(out, "Providers: {}", available.join(", "))?;
                }
            }
            Command::SetCompanies(companies) => {
                self.session.set_companies(&self.directory, companies)?;
                writeln!(out, "Providers: {}", self.session.selection.companies().join(", "))?;
            }
            Command::Proceed => {
                let rows = self.session.commit(self.datasets)?.height();
                writeln!(out, "{} matching rows. Chat with AI is open.", rows)?;
            }
            Command::Ask(question) => self.ask(&question, out).await?,
            Command::Quick(index) => {
                let question = QUICK_QUESTIONS.get(index).copied().ok_or_else(|| {
                    WizardError::Command(format!("no quick question {}", index + 1))
                })?;
                self.ask(question, out).await?;
            }
            Command::History => {
                for turn in self.session.conversation().turns() {
                    writeln!(out, "[{}] {}: {}", turn.at.format("%H:%M:%S"), turn.role, turn.text)?;
                }
            }
            Command::Status => {
                let selection = &self.session.selection;
                writeln!(out, "Countries: {}", selection.countries().join(", "))?;
                writeln!(out, "Providers: {}", selection.companies().join(", "))?;
                match self.session.filtered_view() {
                    Some(view) => writeln!(out, "Filtered rows: {}", view.height())?,
                    None => writeln!(out, "No selection applied yet.")?,
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(ShellControl::Exit),
        }
        Ok(ShellControl::Continue)
    }

    async fn ask<W: Write>(&mut self, question: &str, out: &mut W) -> Result<()> {
        if !self.session.chat_open() {
            return Err(WizardError::Command(
                "apply a selection with 'proceed' before asking".to_string(),
            ));
        }
        writeln!(out, "User: {}", question)?;
        let reply = self.session.ask(self.service, question).await?;
        writeln!(out, "AI: {}", reply)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_commands() {
        assert_eq!(parse_command("countries", false).unwrap(), Some(Command::ListCountries));
        assert_eq!(
            parse_command("countries United States, UK ,", false).unwrap(),
            Some(Command::SetCountries(vec!["United States".into(), "UK".into()]))
        );
        assert_eq!(
            parse_command("providers Acme", false).unwrap(),
            Some(Command::SetCompanies(vec!["Acme".into()]))
        );
        assert_eq!(parse_command("  ", false).unwrap(), None);
    }

    #[test]
    fn test_parse_questions() {
        assert_eq!(parse_command("q2", true).unwrap(), Some(Command::Quick(1)));
        assert_eq!(
            parse_command("ask What is ARPU?", false).unwrap(),
            Some(Command::Ask("What is ARPU?".into()))
        );
        assert_eq!(
            parse_command("What is ARPU?", true).unwrap(),
            Some(Command::Ask("What is ARPU?".into()))
        );
        assert!(parse_command("What is ARPU?", false).is_err());
        assert!(parse_command("ask", true).is_err());
        assert_eq!(
            parse_command("ask countries with ARPU data?", true).unwrap(),
            Some(Command::Ask("countries with ARPU data?".into()))
        );
    }

    #[test]
    fn test_quoted_names_keep_commas() {
        assert_eq!(
            parse_command(r#"companies "Vodafone Group, plc", Acme"#, false).unwrap(),
            Some(Command::SetCompanies(vec!["Vodafone Group, plc".into(), "Acme".into()]))
        );
        assert_eq!(split_list(r#" "A, B" ,, C "#), vec!["A, B", "C"]);
    }
}
