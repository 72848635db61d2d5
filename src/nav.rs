/// Offset past which the navbar gets its solid backdrop.
pub const SCROLLED_AFTER: f64 = 50.0;

pub const NAV_LINKS: [(&str, &str); 6] = [
    ("Home", "#home"),
    ("About", "#about"),
    ("Projects", "#projects"),
    ("Skills", "#skills"),
    ("Resume", "#resume"),
    ("Contact", "#contact"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub scrolled: bool,
    pub menu_open: bool,
}

impl NavState {
    /// Returns whether the backdrop state changed.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let scrolled = offset > SCROLLED_AFTER;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Following a link always closes the mobile menu.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}
