use tracing::error;

use crate::ui::tui::Tui;

/// Restores the terminal before the default hook prints, and keeps a copy of
/// the panic in the log file since the screen is cleared on exit.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = Tui::restore();
        error!(panic = %panic_info, "Panicked");
        hook(panic_info);
    }));
}
