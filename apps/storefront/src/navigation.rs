//! # Navigation
//!
//! Screens and the back stack. Whether the back affordance is shown is
//! derived from the stack depth.
//!
//! ```text
//!   Start ──open──► Items ──detail──► ProductDetail
//!     │                │                    │
//!     └──── cart ──────┴────── cart ────────┴──► Cart
//!     └──── signin / signup ─────────────────────► Auth
//! ```

use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub enum Screen {
    Start,
    Items,
    Cart,
    ProductDetail,
    Auth,
}

impl Screen {
    /// Title shown in the top bar.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Start => "Welcome to Quarkz",
            Screen::Items => "Choose Items",
            Screen::Cart => "Shopping Cart",
            Screen::ProductDetail => "Product Details",
            Screen::Auth => "Account",
        }
    }
}

/// Back stack. Never empty: the root is always [`Screen::Start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    stack: Vec<Screen>,
}

impl Default for NavStack {
    fn default() -> Self {
        NavStack {
            stack: vec![Screen::Start],
        }
    }
}

impl NavStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Start)
    }

    /// Pushes `screen` unless it is already on top.
    pub fn navigate(&mut self, screen: Screen) {
        if self.current() != screen {
            self.stack.push(screen);
        }
    }

    /// Pops one screen. Returns the screen that was left, or `None` at the
    /// root.
    pub fn navigate_up(&mut self) -> Option<Screen> {
        if self.can_navigate_back() {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Drops everything above the root and returns the screens that were
    /// left, top first.
    pub fn pop_to_root(&mut self) -> Vec<Screen> {
        let mut left: Vec<Screen> = self.stack.drain(1..).collect();
        left.reverse();
        left
    }

    pub fn can_navigate_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn contains(&self, screen: Screen) -> bool {
        self.stack.contains(&screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(Screen::Start.title(), "Welcome to Quarkz");
        assert_eq!(Screen::Items.title(), "Choose Items");
        assert_eq!(Screen::Cart.title(), "Shopping Cart");
        assert_eq!(Screen::ProductDetail.title(), "Product Details");
        assert_eq!(Screen::Auth.title(), "Account");
    }

    #[test]
    fn test_back_flag_follows_depth() {
        let mut nav = NavStack::new();
        assert!(!nav.can_navigate_back());

        nav.navigate(Screen::Items);
        nav.navigate(Screen::ProductDetail);
        assert!(nav.can_navigate_back());
        assert_eq!(nav.depth(), 3);

        assert_eq!(nav.navigate_up(), Some(Screen::ProductDetail));
        assert_eq!(nav.navigate_up(), Some(Screen::Items));
        assert!(!nav.can_navigate_back());
        assert_eq!(nav.navigate_up(), None);
        assert_eq!(nav.current(), Screen::Start);
    }

    #[test]
    fn test_navigate_ignores_same_screen() {
        let mut nav = NavStack::new();
        nav.navigate(Screen::Cart);
        nav.navigate(Screen::Cart);
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn test_pop_to_root() {
        let mut nav = NavStack::new();
        nav.navigate(Screen::Items);
        nav.navigate(Screen::Cart);

        assert_eq!(nav.pop_to_root(), vec![Screen::Cart, Screen::Items]);
        assert_eq!(nav.current(), Screen::Start);
        assert!(!nav.can_navigate_back());
        assert!(nav.pop_to_root().is_empty());
    }
}
