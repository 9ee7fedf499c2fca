//! # Routes and Navigation
//!
//! ```text
//! Login      "/"
//! Bills      "#employee/bills"      ◄── NewBill navigates here on success
//! NewBill    "#employee/bill/new"   ◄── Bills "new bill" button
//! Dashboard  "#admin/dashboard"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A view of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.path() == s)
            .ok_or_else(|| format!("unknown route: {}", s))
    }
}

/// Performs view transitions.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Bills.path(), "#employee/bills");
        assert_eq!(Route::NewBill.to_string(), "#employee/bill/new");
        assert_eq!("/".parse::<Route>().unwrap(), Route::Login);
        assert_eq!("#admin/dashboard".parse::<Route>().unwrap(), Route::Dashboard);
        assert!("#employee/unknown".parse::<Route>().is_err());
    }
}
