//! Terminal rendering of a [`Page`].

use std::fmt::Write;

use colored::Colorize;

use cimi_browser_app::page::{AclView, ContentView, NO_ACL, Page, Term};

/// Render `page`, with `message` under the title when there is one.
#[must_use]
pub fn render_page(page: &Page, message: Option<&str>) -> String {
    let mut out = String::new();

    let trail: Vec<String> = page
        .trail
        .iter()
        .map(|crumb| crumb.label.as_str().blue().underline().to_string())
        .collect();
    let _ = writeln!(out, "{}", trail.join(" / "));
    let _ = writeln!(out, "{}", page.title.bold());
    if let Some(message) = message {
        let _ = writeln!(out, "{}", message.yellow());
    }

    let buttons: Vec<String> = page
        .visible_buttons()
        .map(|button| format!("[{}]", button.label).cyan().to_string())
        .collect();
    if !buttons.is_empty() {
        let _ = writeln!(out, "{}", buttons.join(" "));
    }
    out.push('\n');

    if page.mode.shows_editor() {
        out.push_str(&page.editor);
        if !page.editor.ends_with('\n') {
            out.push('\n');
        }
        return out;
    }

    if !page.metadata.is_empty() {
        section(&mut out, "Metadata");
        terms(&mut out, &page.metadata);
    }

    section(&mut out, "ACL");
    match &page.acl {
        AclView::Rows(rows) => {
            for row in rows {
                let _ = writeln!(out, "  {:<24} {:<8} {}", row.principal, row.kind, row.right);
            }
        }
        AclView::Missing => {
            let _ = writeln!(out, "  {}", NO_ACL.dimmed());
        }
    }

    match &page.content {
        ContentView::EntryPoint(links) => {
            section(&mut out, "Resources");
            for link in links {
                match &link.url {
                    Some(url) => {
                        let _ = writeln!(out, "  {} {}", link.label.blue(), url.dimmed());
                    }
                    None => {
                        let _ = writeln!(out, "  {}", link.label);
                    }
                }
            }
        }
        ContentView::Collection(view) => {
            section(&mut out, "Members");
            let _ = writeln!(out, "  {}", view.summary());
            if !view.is_empty() {
                for row in &view.rows {
                    let _ = writeln!(
                        out,
                        "  {:<10} {:<24} {}",
                        row.tag.blue(),
                        row.name,
                        row.description.dimmed()
                    );
                }
            }
        }
        ContentView::Item(content) => {
            section(&mut out, "Content");
            terms(&mut out, content);
        }
    }
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title.bold().underline());
}

fn terms(out: &mut String, terms: &[Term]) {
    let width = terms.iter().map(|t| t.term.len()).max().unwrap_or(0);
    for term in terms {
        let _ = writeln!(out, "  {:<width$}  {}", term.term.green(), term.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimi_browser_domain::document::ResourceDocument;
    use cimi_browser_domain::location::PageLocation;
    use cimi_browser_domain::reference::BaseEndpoint;
    use cimi_browser_domain::view_mode::ViewMode;
    use serde_json::json;

    fn page(fragment: &str, document: serde_json::Value, mode: ViewMode) -> Page {
        colored::control::set_override(false);
        let location = PageLocation::parse(&format!("http://localhost/cimi/webui#{fragment}"));
        let document = ResourceDocument::try_from(document).unwrap();
        Page::build(&location, &BaseEndpoint::new("http://localhost/cimi/"), &document, mode)
            .unwrap()
    }

    #[test]
    fn should_render_trail_title_and_buttons() {
        let page = page(
            "MachineCollection/m1",
            json!({
                "resourceURI": "http://x/Machine",
                "id": "MachineCollection/m1",
                "operations": [{"rel": "edit", "href": "MachineCollection/m1"}]
            }),
            ViewMode::Normal,
        );

        let text = render_page(&page, Some("Edit resource cancelled."));

        assert!(text.starts_with("CloudEntryPoint / MachineCollection / m1\nMachine\n"));
        assert!(text.contains("Edit resource cancelled."));
        assert!(text.contains("[view json] [edit]"));
        assert!(text.contains("No explicit ACL."));
    }

    #[test]
    fn should_render_empty_collection_summary() {
        let page = page(
            "MachineCollection",
            json!({"resourceURI": "http://x/MachineCollection", "count": 0}),
            ViewMode::Normal,
        );

        let text = render_page(&page, None);

        assert!(text.contains("No items."));
    }

    #[test]
    fn should_render_acl_rows() {
        let page = page(
            "MachineCollection/m1",
            json!({
                "resourceURI": "http://x/Machine",
                "acl": {
                    "owner": {"principal": "admin", "type": "ROLE"},
                    "rules": [{"principal": "alice", "type": "USER", "right": "VIEW"}]
                }
            }),
            ViewMode::Normal,
        );

        let text = render_page(&page, None);

        assert!(text.contains("admin"));
        assert!(text.contains("alice"));
        assert!(text.contains("VIEW"));
    }

    #[test]
    fn should_show_only_json_while_viewing() {
        let page = page(
            "MachineCollection/m1",
            json!({"resourceURI": "http://x/Machine", "cpu": 2}),
            ViewMode::Viewing,
        );

        let text = render_page(&page, None);

        assert!(text.contains("\"cpu\": 2"));
        assert!(text.contains("[done]"));
        assert!(!text.contains("Content"));
    }
}
