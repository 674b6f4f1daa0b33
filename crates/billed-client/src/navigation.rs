//! # Navigation
//!
//! Routes of the employee screens and the `navigate(route)` capability the
//! controllers call after an action.
//!
//! ## Routes and Highlighted Icon
//! ```text
//! ┌───────────┬─────────────────────────┬──────────────────────────────────┐
//! │ Route     │ Path                    │ Active vertical-layout icon      │
//! ├───────────┼─────────────────────────┼──────────────────────────────────┤
//! │ Login     │ /                       │ -                                │
//! │ Bills     │ #employee/bills         │ icon-window                      │
//! │ NewBill   │ #employee/bill/new      │ icon-mail                        │
//! │ Dashboard │ #admin/dashboard        │ -                                │
//! └───────────┴─────────────────────────┴──────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::info;

use crate::error::ClientError;

/// Icon highlighted while the bill list is shown.
pub const ICON_WINDOW: &str = "icon-window";

/// Icon highlighted while the new-bill form is shown.
pub const ICON_MAIL: &str = "icon-mail";

// =============================================================================
// Route
// =============================================================================

/// A screen the router can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    /// The path the router knows this screen by.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }

    /// Vertical-layout icon marked active on this screen.
    pub fn highlighted_icon(&self) -> Option<&'static str> {
        match self {
            Route::Bills => Some(ICON_WINDOW),
            Route::NewBill => Some(ICON_MAIL),
            Route::Login | Route::Dashboard => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|r| r.path() == s)
            .ok_or_else(|| ClientError::UnknownRoute(s.to_string()))
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Changes the active screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// In-process navigator that keeps the route history.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a navigator already showing `route`.
    pub fn starting_at(route: Route) -> Self {
        HistoryNavigator {
            history: Mutex::new(vec![route]),
        }
    }

    /// The screen currently shown, if any navigation happened.
    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .expect("Navigator mutex poisoned")
            .last()
            .copied()
    }

    /// Every route navigated to, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .expect("Navigator mutex poisoned")
            .clone()
    }

    /// Icon highlighted for the current screen.
    pub fn active_icon(&self) -> Option<&'static str> {
        self.current().and_then(|r| r.highlighted_icon())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        info!(path = route.path(), "Navigating");
        self.history
            .lock()
            .expect("Navigator mutex poisoned")
            .push(route);
    }
}
