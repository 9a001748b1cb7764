//! View modes of the browser and the transitions between them.
//!
//! ```text
//! Normal ──StartView──▶ Viewing ──FinishView──▶ Normal
//! Normal ──StartEdit──▶ Editing ──Saved | Cancelled | Failed──▶ Normal
//! Normal ──StartAdd───▶ Adding  ──Created | Cancelled | Failed──▶ Normal
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which panel and which set of buttons are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Rendered resource, operation buttons.
    #[default]
    Normal,
    /// Read-only JSON panel.
    Viewing,
    /// JSON panel editing the current resource.
    Editing,
    /// JSON panel composing a new resource.
    Adding,
}

/// User actions and request outcomes that move between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    StartView,
    FinishView,
    StartEdit,
    StartAdd,
    /// The edit was written back.
    Saved,
    /// The new resource was created.
    Created,
    Cancelled,
    /// The write failed; the panel closes.
    Failed,
}

/// A `(mode, event)` pair the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event:?} while {mode}")]
pub struct InvalidTransition {
    pub mode: ViewMode,
    pub event: ViewEvent,
}

impl ViewMode {
    /// Apply `event`, returning the next mode.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `event` makes no sense in this mode.
    pub fn transition(self, event: ViewEvent) -> Result<Self, InvalidTransition> {
        use ViewEvent as E;
        match (self, event) {
            (Self::Normal, E::StartView) => Ok(Self::Viewing),
            (Self::Normal, E::StartEdit) => Ok(Self::Editing),
            (Self::Normal, E::StartAdd) => Ok(Self::Adding),
            (Self::Viewing, E::FinishView)
            | (Self::Editing, E::Saved | E::Cancelled | E::Failed)
            | (Self::Adding, E::Created | E::Cancelled | E::Failed) => Ok(Self::Normal),
            (mode, event) => Err(InvalidTransition { mode, event }),
        }
    }

    /// `true` when the JSON panel replaces the rendered resource.
    #[must_use]
    pub fn shows_editor(self) -> bool {
        !matches!(self, Self::Normal)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Viewing => "view",
            Self::Editing => "edit",
            Self::Adding => "add",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown view mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode `{0}`")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "view" => Ok(Self::Viewing),
            "edit" => Ok(Self::Editing),
            "add" => Ok(Self::Adding),
            other => Err(UnknownViewMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_edit_flow() {
        let mode = ViewMode::Normal.transition(ViewEvent::StartEdit).unwrap();
        assert_eq!(mode, ViewMode::Editing);
        assert_eq!(mode.transition(ViewEvent::Saved).unwrap(), ViewMode::Normal);
        assert_eq!(
            mode.transition(ViewEvent::Cancelled).unwrap(),
            ViewMode::Normal
        );
    }

    #[test]
    fn should_round_trip_add_flow() {
        let mode = ViewMode::Normal.transition(ViewEvent::StartAdd).unwrap();
        assert_eq!(mode, ViewMode::Adding);
        assert_eq!(mode.transition(ViewEvent::Created).unwrap(), ViewMode::Normal);
        assert_eq!(mode.transition(ViewEvent::Failed).unwrap(), ViewMode::Normal);
    }

    #[test]
    fn should_toggle_json_view() {
        let mode = ViewMode::Normal.transition(ViewEvent::StartView).unwrap();
        assert!(mode.shows_editor());
        assert_eq!(
            mode.transition(ViewEvent::FinishView).unwrap(),
            ViewMode::Normal
        );
    }

    #[test]
    fn should_reject_save_outside_edit_mode() {
        let err = ViewMode::Adding.transition(ViewEvent::Saved).unwrap_err();
        assert_eq!(err.mode, ViewMode::Adding);
        assert_eq!(err.event, ViewEvent::Saved);
        assert!(ViewMode::Normal.transition(ViewEvent::Cancelled).is_err());
        assert!(ViewMode::Editing.transition(ViewEvent::StartAdd).is_err());
    }

    #[test]
    fn should_parse_mode_names() {
        for mode in [
            ViewMode::Normal,
            ViewMode::Viewing,
            ViewMode::Editing,
            ViewMode::Adding,
        ] {
            assert_eq!(mode.as_str().parse::<ViewMode>().unwrap(), mode);
        }
        assert!("bogus".parse::<ViewMode>().is_err());
    }
}
