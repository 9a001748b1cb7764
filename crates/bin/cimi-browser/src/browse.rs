//! Interactive terminal browser over a [`BrowserSession`].

use std::str::FromStr;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use cimi_browser_app::ports::ResourceClient;
use cimi_browser_app::session::BrowserSession;
use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::reference::ResourceReference;
use cimi_browser_domain::view_mode::ViewMode;

use crate::render::render_page;

const HELP: &str = "\
commands:
  open <reference>   go to a resource (MachineCollection/abc)
  up | root          go to the parent resource or the entry point
  reload             fetch the current resource again
  view | done        open or close the JSON panel
  edit | add         open the editor on this resource or a new one
  set <json>         replace the editor contents
  format             re-indent the editor contents
  save | cancel      write or discard the editor contents
  delete             delete this resource
  run <action>       trigger an action
  help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Open(String),
    Up,
    Root,
    Reload,
    View,
    Done,
    Edit,
    Add,
    Set(String),
    Format,
    Save,
    Cancel,
    Delete,
    Run(String),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown command `{0}`, try `help`")]
pub struct UnknownInput(String);

impl FromStr for Input {
    type Err = UnknownInput;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let input = match (command, rest) {
            ("open" | "cd", reference) => Self::Open(reference.to_string()),
            ("up", "") => Self::Up,
            ("root", "") => Self::Root,
            ("reload", "") => Self::Reload,
            ("view", "") => Self::View,
            ("done", "") => Self::Done,
            ("edit", "") => Self::Edit,
            ("add", "") => Self::Add,
            ("set", json) if !json.is_empty() => Self::Set(json.to_string()),
            ("format", "") => Self::Format,
            ("save", "") => Self::Save,
            ("cancel", "") => Self::Cancel,
            ("delete", "") => Self::Delete,
            ("run", action) if !action.is_empty() => Self::Run(action.to_string()),
            ("help" | "?", "") => Self::Help,
            ("quit" | "exit" | "q", "") => Self::Quit,
            _ => return Err(UnknownInput(line.to_string())),
        };
        Ok(input)
    }
}

/// `true` for a `y`/`yes` answer.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read commands from stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error when the terminal cannot be read or written. Failed
/// operations are reported and browsing continues.
pub async fn run<C>(session: BrowserSession<C>) -> anyhow::Result<()>
where
    C: ResourceClient + Send + Sync,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    report(session.reload().await.map(drop));
    show(&session);

    loop {
        prompt("> ").await?;
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }
        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(err) => {
                println!("{}", err.to_string().red());
                continue;
            }
        };
        match input {
            Input::Quit => return Ok(()),
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Delete => {
                let confirmed = match session.delete_target() {
                    Some(href) => confirm(&mut lines, &format!("Delete resource {href}?")).await?,
                    None => false,
                };
                report(session.delete(confirmed).await);
            }
            Input::Run(name) => {
                let confirmed = confirm(&mut lines, &format!("Run action {name}?")).await?;
                report(session.run_action(&name, confirmed).await);
            }
            other => report(execute(&session, other).await),
        }
        show(&session);
    }
}

/// Apply an input that needs no confirmation.
async fn execute<C>(session: &BrowserSession<C>, input: Input) -> Result<(), CimiError>
where
    C: ResourceClient + Send + Sync,
{
    let location = session.location();
    let current = location.resolve_resource_path();
    match input {
        Input::Open(reference) => {
            session
                .navigate(location.with_reference(ResourceReference::new(reference)))
                .await?;
        }
        Input::Up => {
            session.navigate(location.with_reference(current.parent())).await?;
        }
        Input::Root => {
            session
                .navigate(location.with_reference(ResourceReference::root()))
                .await?;
        }
        Input::Reload => {
            session.reload().await?;
        }
        Input::View => session.start_view().await?,
        Input::Done => session.finish_view()?,
        Input::Edit => session.start_edit().await?,
        Input::Add => session.start_add()?,
        Input::Set(json) => session.set_editor_text(json),
        Input::Format => {
            if !session.format_editor() {
                println!("{}", "editor does not hold valid JSON".yellow());
            }
        }
        Input::Save => match session.mode() {
            ViewMode::Adding => session.finish_add().await?,
            _ => session.finish_edit().await?,
        },
        Input::Cancel => match session.mode() {
            ViewMode::Adding => session.cancel_add()?,
            _ => session.cancel_edit()?,
        },
        Input::Delete | Input::Run(_) | Input::Help | Input::Quit => {}
    }
    Ok(())
}

fn report(result: Result<(), CimiError>) {
    if let Err(err) = result {
        tracing::debug!(%err, "operation failed");
        println!("{}", err.message().red());
    }
}

/// Print the current page, with the editor buffer in place of the document
/// while editing.
fn show<C: ResourceClient>(session: &BrowserSession<C>) {
    let Some(mut page) = session.page() else {
        return;
    };
    if page.mode.shows_editor() {
        page.editor = session.editor_text();
    }
    let message = session.message();
    println!("{}", render_page(&page, message.as_deref()));
}

async fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> std::io::Result<bool> {
    prompt(&format!("{question} [y/N] ")).await?;
    Ok(lines.next_line().await?.is_some_and(|answer| is_yes(&answer)))
}
