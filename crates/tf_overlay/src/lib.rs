pub mod panel;
pub mod selection;

pub use panel::{EditorOverlay, OverlayStats, PanelContent, PanelState};
pub use selection::Selector;
