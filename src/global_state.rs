use leptos::*;
use once_cell::sync::OnceCell;

/// Process-wide reactive state shared by the dashboard components
pub struct Globals {
    /// Bumped after every store commit
    pub store_revision: RwSignal<u64>,
    /// Bumped after every interaction or resize that needs a redraw
    pub ui_revision: RwSignal<u64>,
    /// Latest cycle summary or load/startup problem
    pub status: RwSignal<String>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        store_revision: create_rw_signal(0),
        ui_revision: create_rw_signal(0),
        status: create_rw_signal("Starting...".to_string()),
    })
}
