//! Open/close state for anchored popovers (country filter, country picker).
//!
//! Tracked as plain view-model state so the dismiss-on-outside-click
//! affordance stays testable without any rendering substrate.

/// A popover anchored to some trigger. Purely a UI affordance: opening,
/// closing, or dismissing it never changes any selected value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Popover {
    open: bool,
}

impl Popover {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// A click lands inside or outside the popover's bounds. Outside closes
    /// it; inside leaves it open.
    pub fn click(&mut self, inside: bool) {
        if !inside {
            self.open = false;
        }
    }
}
