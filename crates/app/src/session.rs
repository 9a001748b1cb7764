//! Browser session — one viewer's state across navigations and edits.
//!
//! The session owns the current location, the view mode, the rendered page,
//! the editor buffer and the message line. Its state sits behind a
//! `std::sync::Mutex` that is never held across an `.await`.
//!
//! Navigations are sequenced with a [`Navigator`]: when two overlap, only
//! the response of the newest one is applied.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::location::PageLocation;
use cimi_browser_domain::view_mode::{InvalidTransition, ViewEvent, ViewMode};

use crate::editor::EditorBuffer;
use crate::navigation::Navigator;
use crate::page::{Command, Page};
use crate::ports::{Created, ResourceClient};
use crate::services::BrowserService;

/// Whether a navigation's response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Rendered,
    /// A newer navigation started before this one finished.
    Superseded,
}

struct SessionState {
    location: PageLocation,
    mode: ViewMode,
    page: Option<Page>,
    editor: EditorBuffer,
    message: Option<String>,
}

impl SessionState {
    fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        if let Some(page) = &mut self.page {
            page.mode = mode;
        }
    }

    fn apply(&mut self, event: ViewEvent) -> Result<ViewMode, InvalidTransition> {
        let next = self.mode.transition(event)?;
        self.set_mode(next);
        Ok(next)
    }

    fn require(&self, mode: ViewMode, event: ViewEvent) -> Result<(), InvalidTransition> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(InvalidTransition {
                mode: self.mode,
                event,
            })
        }
    }

    /// Reference of the displayed page.
    fn page_reference(&self) -> String {
        match &self.page {
            Some(page) => page.reference.clone(),
            None => self.location.resolve_resource_path().to_string(),
        }
    }

    /// Command of the first button matching `predicate` on the current page.
    fn command(
        &self,
        operation: &str,
        predicate: impl Fn(&Command) -> bool,
    ) -> Result<Command, CimiError> {
        self.page
            .as_ref()
            .and_then(|page| page.find_button(predicate))
            .map(|button| button.command.clone())
            .ok_or_else(|| CimiError::MissingOperation(operation.to_string()))
    }
}

/// A single interactive viewer.
pub struct BrowserSession<C> {
    service: BrowserService<C>,
    navigator: Navigator,
    state: Mutex<SessionState>,
}

impl<C: ResourceClient> BrowserSession<C> {
    /// Create a session positioned at `location`. Nothing is fetched until
    /// [`BrowserSession::reload`] or [`BrowserSession::navigate`].
    pub fn new(service: BrowserService<C>, location: PageLocation) -> Self {
        Self {
            service,
            navigator: Navigator::new(),
            state: Mutex::new(SessionState {
                location,
                mode: ViewMode::Normal,
                page: None,
                editor: EditorBuffer::default(),
                message: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_message(&self, message: impl Into<String>) {
        self.state().message = Some(message.into());
    }

    pub fn location(&self) -> PageLocation {
        self.state().location.clone()
    }

    pub fn mode(&self) -> ViewMode {
        self.state().mode
    }

    /// The last page rendered, in the current mode.
    pub fn page(&self) -> Option<Page> {
        self.state().page.clone()
    }

    pub fn message(&self) -> Option<String> {
        self.state().message.clone()
    }

    pub fn editor_text(&self) -> String {
        self.state().editor.text().to_string()
    }

    pub fn set_editor_text(&self, text: impl Into<String>) {
        self.state().editor.set_text(text);
    }

    /// Re-indent the editor; invalid JSON is left as typed.
    pub fn format_editor(&self) -> bool {
        self.state().editor.format()
    }

    /// Fetch and render `location`.
    ///
    /// # Errors
    ///
    /// Returns the fetch or render error; the message line shows it and the
    /// previous page and location stay in place.
    pub async fn navigate(&self, location: PageLocation) -> Result<NavigationOutcome, CimiError> {
        let ticket = self.navigator.begin();
        let result = self.service.load(&location, ViewMode::Normal).await;
        if !self.navigator.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                reference = %location.resolve_resource_path(),
                "discarding superseded response"
            );
            return Ok(NavigationOutcome::Superseded);
        }

        let mut state = self.state();
        state.set_mode(ViewMode::Normal);
        match result {
            Ok(page) => {
                state.location = location;
                state.editor = EditorBuffer::new(page.json.clone());
                state.page = Some(page);
                state.message = None;
                Ok(NavigationOutcome::Rendered)
            }
            Err(err) => {
                tracing::warn!(%err, reference = %location.resolve_resource_path(), "navigation failed");
                state.message = Some(err.message());
                Err(err)
            }
        }
    }

    /// Fetch and render the current location again.
    ///
    /// # Errors
    ///
    /// See [`BrowserSession::navigate`].
    pub async fn reload(&self) -> Result<NavigationOutcome, CimiError> {
        let location = self.location();
        self.navigate(location).await
    }

    /// Open the read-only JSON panel.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::Transition`] outside normal mode, or the fetch error.
    pub async fn start_view(&self) -> Result<(), CimiError> {
        self.open_editor(ViewEvent::StartView).await
    }

    /// Close the read-only JSON panel.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::Transition`] unless the panel is open.
    pub fn finish_view(&self) -> Result<(), CimiError> {
        self.state().apply(ViewEvent::FinishView)?;
        Ok(())
    }

    /// Open the editor on a fresh copy of the current resource.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::MissingOperation`] when the resource is not
    /// editable, [`CimiError::Transition`] outside normal mode, or the fetch error.
    pub async fn start_edit(&self) -> Result<(), CimiError> {
        self.state()
            .command("edit", |c| matches!(c, Command::SaveEdit { .. }))?;
        self.open_editor(ViewEvent::StartEdit).await
    }

    /// Write the editor contents back with `PUT`, then reload.
    ///
    /// Invalid JSON keeps the editor open. A failed write closes it.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`], the transport error, or
    /// [`CimiError::Transition`] when not editing.
    pub async fn finish_edit(&self) -> Result<(), CimiError> {
        let (href, text, id) = {
            let state = self.state();
            state.require(ViewMode::Editing, ViewEvent::Saved)?;
            let Command::SaveEdit { href } =
                state.command("edit", |c| matches!(c, Command::SaveEdit { .. }))?
            else {
                return Err(CimiError::MissingOperation("edit".to_string()));
            };
            (href, state.editor.text().to_string(), state.page_reference())
        };
        self.check_json(&text)?;

        match self.service.update(&href, &text).await {
            Ok(()) => {
                self.state().apply(ViewEvent::Saved)?;
                self.reload().await?;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, %href, "update failed");
                let mut state = self.state();
                state.message = Some(format!("Update of resource {id} failed!"));
                state.apply(ViewEvent::Failed)?;
                Err(err)
            }
        }
    }

    /// Close the editor without writing.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::Transition`] when not editing.
    pub fn cancel_edit(&self) -> Result<(), CimiError> {
        let mut state = self.state();
        state.apply(ViewEvent::Cancelled)?;
        state.message = Some("Edit resource cancelled.".to_string());
        Ok(())
    }

    /// Open the editor on the new-resource template.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::MissingOperation`] when the resource does not
    /// accept additions, or [`CimiError::Transition`] outside normal mode.
    pub fn start_add(&self) -> Result<(), CimiError> {
        let mut state = self.state();
        state.command("add", |c| matches!(c, Command::SaveAdd { .. }))?;
        state.apply(ViewEvent::StartAdd)?;
        state.editor = EditorBuffer::add_template();
        Ok(())
    }

    /// Post the editor contents, then show the new resource.
    ///
    /// Without a `Location` header the current resource is reloaded.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`], the transport error, or
    /// [`CimiError::Transition`] when not adding.
    pub async fn finish_add(&self) -> Result<(), CimiError> {
        let (href, text) = {
            let state = self.state();
            state.require(ViewMode::Adding, ViewEvent::Created)?;
            let Command::SaveAdd { href } =
                state.command("add", |c| matches!(c, Command::SaveAdd { .. }))?
            else {
                return Err(CimiError::MissingOperation("add".to_string()));
            };
            (href, state.editor.text().to_string())
        };
        self.check_json(&text)?;

        match self.service.create(&href, &text).await {
            Ok(Created { location }) => {
                let target = {
                    let mut state = self.state();
                    state.apply(ViewEvent::Created)?;
                    location.map(|url| {
                        state
                            .location
                            .with_reference(self.service.base().reference_of(&url))
                    })
                };
                match target {
                    Some(target) => self.navigate(target).await?,
                    None => self.reload().await?,
                };
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, %href, "create failed");
                let mut state = self.state();
                state.message = Some("Adding resource failed!".to_string());
                state.apply(ViewEvent::Failed)?;
                Err(err)
            }
        }
    }

    /// Close the editor without creating anything.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::Transition`] when not adding.
    pub fn cancel_add(&self) -> Result<(), CimiError> {
        let mut state = self.state();
        state.apply(ViewEvent::Cancelled)?;
        state.message = Some("Adding resource cancelled.".to_string());
        Ok(())
    }

    /// `href` the delete operation of the displayed page targets.
    pub fn delete_target(&self) -> Option<String> {
        let state = self.state();
        match state.command("delete", |c| matches!(c, Command::Delete { .. })) {
            Ok(Command::Delete { href, .. }) => Some(href),
            _ => None,
        }
    }

    /// Delete the displayed resource and show the parent it was rendered
    /// with.
    ///
    /// `confirmed` is the user's answer to the confirmation prompt. Once the
    /// delete succeeds, a failure to show the parent only sets the message.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::MissingOperation`] when the resource cannot be
    /// deleted, or the transport error.
    pub async fn delete(&self, confirmed: bool) -> Result<(), CimiError> {
        let (href, parent) = {
            let state = self.state();
            let Command::Delete { href, parent } =
                state.command("delete", |c| matches!(c, Command::Delete { .. }))?
            else {
                return Err(CimiError::MissingOperation("delete".to_string()));
            };
            (href, state.location.with_reference(parent))
        };
        if !confirmed {
            self.set_message("Delete cancelled.");
            return Ok(());
        }

        match self.service.delete(&href).await {
            Ok(()) => {
                if let Err(err) = self.navigate(parent).await {
                    tracing::warn!(%err, %href, "parent view failed after delete");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, %href, "delete failed");
                self.set_message(format!("Delete of resource {href} failed!"));
                Err(err)
            }
        }
    }

    /// Run the action named `name`, then reload.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::MissingOperation`] for an unknown action, or the
    /// transport error.
    pub async fn run_action(&self, name: &str, confirmed: bool) -> Result<(), CimiError> {
        let href = {
            let state = self.state();
            let Command::Action { href, .. } = state.command(
                name,
                |c| matches!(c, Command::Action { name: action, .. } if action == name),
            )?
            else {
                return Err(CimiError::MissingOperation(name.to_string()));
            };
            href
        };
        if !confirmed {
            self.set_message("Action cancelled.");
            return Ok(());
        }

        match self.service.run_action(&href).await {
            Ok(()) => {
                self.reload().await?;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, %href, action = name, "action failed");
                self.set_message(format!("Action {name} failed!"));
                Err(err)
            }
        }
    }

    async fn open_editor(&self, event: ViewEvent) -> Result<(), CimiError> {
        let (mode, reference) = {
            let mut state = self.state();
            let mode = state.apply(event)?;
            (mode, state.location.resolve_resource_path().clone())
        };
        match self.service.fetch(&reference).await {
            Ok(document) => {
                let mut state = self.state();
                if state.mode == mode {
                    state.editor.set_text(document.to_pretty_json());
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, %reference, "editor refresh failed");
                self.set_message(err.message());
                Err(err)
            }
        }
    }

    fn check_json(&self, text: &str) -> Result<(), CimiError> {
        match EditorBuffer::new(text).validate() {
            Ok(_) => Ok(()),
            Err(err) => {
                self.set_message(err.message());
                Err(err)
            }
        }
    }
}
