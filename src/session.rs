//! Per-session state: selection, filtered view and conversation log.

use crate::assistant;
use crate::conversation::{ConversationLog, Role};
use crate::error::{Result, WizardError};
use crate::llm::CompletionService;
use crate::loader::Datasets;
use crate::selection::{filter_reference, CountryDirectory, Selection};
use crate::table::Table;
use tracing::{info, warn};
use uuid::Uuid;

/// State for one user session. Handlers receive it explicitly; nothing is
/// shared between sessions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: Uuid,
    pub selection: Selection,
    filtered_view: Option<Table>,
    conversation: ConversationLog,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selection: Selection::new(),
            filtered_view: None,
            conversation: ConversationLog::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The last committed view, if any.
    pub fn filtered_view(&self) -> Option<&Table> {
        self.filtered_view.as_ref()
    }

    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    /// Chat opens after the first commit.
    pub fn chat_open(&self) -> bool {
        self.filtered_view.is_some()
    }

    pub fn set_countries(&mut self, directory: &CountryDirectory, countries: Vec<String>) -> Result<()> {
        self.selection.set_countries(directory, countries)
    }

    pub fn set_companies(&mut self, directory: &CountryDirectory, companies: Vec<String>) -> Result<()> {
        self.selection.set_companies(directory, companies)
    }

    /// Recompute the filtered view from the current selection, replacing the
    /// previous one, and reset the conversation.
    pub fn commit(&mut self, datasets: &Datasets) -> Result<&Table> {
        if !self.selection.can_commit() {
            return Err(WizardError::Selection(
                "choose at least one country and one company before proceeding".to_string(),
            ));
        }

        let view = filter_reference(
            &datasets.reference,
            self.selection.countries(),
            self.selection.companies(),
        )?;
        info!(
            "[{}] Committed {} countries x {} companies -> {} rows",
            self.id,
            self.selection.countries().len(),
            self.selection.companies().len(),
            view.height()
        );

        self.reset();
        Ok(&*self.filtered_view.insert(view))
    }

    /// Clear the conversation ahead of a new view.
    pub fn reset(&mut self) {
        self.conversation.clear();
    }

    /// Ask a question about the current view. The question and the reply are
    /// logged together only when the call succeeds.
    pub async fn ask<S>(&mut self, service: &S, question: &str) -> Result<&str>
    where
        S: CompletionService + ?Sized,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(WizardError::Command("question is empty".to_string()));
        }

        let reply = match assistant::ask(service, self.filtered_view.as_ref(), question).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("[{}] Completion failed: {}", self.id, e);
                return Err(e);
            }
        };

        self.conversation.push(Role::User, question);
        self.conversation.push(Role::Assistant, reply);
        Ok(self
            .conversation
            .last()
            .map(|turn| turn.text.as_str())
            .unwrap_or_default())
    }
}
