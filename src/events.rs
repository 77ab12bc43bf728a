use std::fmt;

/// Input a UI adapter forwards to the editor panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    PointerEntered,
    PointerLeft,
    EntrySelected { name: String },
    ItemPicked { entry: String, pixmap_path: String },
}

impl fmt::Display for PanelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelEvent::PointerEntered => write!(f, "PointerEntered"),
            PanelEvent::PointerLeft => write!(f, "PointerLeft"),
            PanelEvent::EntrySelected { name } => write!(f, "EntrySelected name={name}"),
            PanelEvent::ItemPicked { entry, pixmap_path } => {
                write!(f, "ItemPicked entry={entry} pixmap={pixmap_path}")
            }
        }
    }
}
