//! Named routes, role dispatch and the navigation back stack.

use std::str::FromStr;

use crate::models::Role;

/// Shown in place of a home view when the role is not recognised.
pub const UNKNOWN_ROLE_MESSAGE: &str = "Unknown Role";

// ═══════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Home(Role),
    Registration,
    BookAppointment,
    Messages,
    AppointmentControl,
    SpecialistSchedule,
    Attendance,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
    #[error("Unknown Role: {0}")]
    UnknownRole(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "login".into(),
            Self::Signup => "signup".into(),
            Self::Home(role) => format!("home/{role}"),
            Self::Registration => "registration".into(),
            Self::BookAppointment => "bookapp".into(),
            Self::Messages => "message".into(),
            Self::AppointmentControl => "admin-app".into(),
            Self::SpecialistSchedule => "spec-app".into(),
            Self::Attendance => "attendance".into(),
        }
    }

    /// Parse a route path. `home/{role}` only accepts the closed role set.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        if let Some(role) = path.strip_prefix("home/") {
            return Role::from_str(role)
                .map(Self::Home)
                .map_err(|_| RouteError::UnknownRole(role.to_string()));
        }
        match path {
            "login" => Ok(Self::Login),
            "signup" => Ok(Self::Signup),
            "registration" => Ok(Self::Registration),
            "bookapp" => Ok(Self::BookAppointment),
            "message" => Ok(Self::Messages),
            "admin-app" => Ok(Self::AppointmentControl),
            "spec-app" => Ok(Self::SpecialistSchedule),
            "attendance" => Ok(Self::Attendance),
            other => Err(RouteError::UnknownRoute(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Role dispatch
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeScreen {
    Patient,
    Specialist,
    Admin,
    /// Fallback for a role string outside the closed set.
    Unknown,
}

/// Where a home menu entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Route(Route),
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: MenuTarget,
}

const SIGN_OUT: MenuItem = MenuItem {
    label: "Sign out",
    target: MenuTarget::SignOut,
};

const PATIENT_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Book Appointment",
        target: MenuTarget::Route(Route::BookAppointment),
    },
    MenuItem {
        label: "Chat with Doctor",
        target: MenuTarget::Route(Route::Messages),
    },
    SIGN_OUT,
];

const ADMIN_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Appointments",
        target: MenuTarget::Route(Route::AppointmentControl),
    },
    MenuItem {
        label: "Attendance",
        target: MenuTarget::Route(Route::Attendance),
    },
    SIGN_OUT,
];

const SPECIALIST_MENU: &[MenuItem] = &[
    MenuItem {
        label: "View Patients",
        target: MenuTarget::Route(Route::SpecialistSchedule),
    },
    MenuItem {
        label: "Messages",
        target: MenuTarget::Route(Route::Messages),
    },
    SIGN_OUT,
];

impl HomeScreen {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Patient => Self::Patient,
            Role::Specialist => Self::Specialist,
            Role::Admin => Self::Admin,
        }
    }

    pub fn menu(&self) -> &'static [MenuItem] {
        match self {
            Self::Patient => PATIENT_MENU,
            Self::Admin => ADMIN_MENU,
            Self::Specialist => SPECIALIST_MENU,
            Self::Unknown => &[],
        }
    }

    /// Text rendered instead of a menu, for the fallback view.
    pub fn fallback_message(&self) -> Option<&'static str> {
        match self {
            Self::Unknown => Some(UNKNOWN_ROLE_MESSAGE),
            _ => None,
        }
    }
}

/// Pick the home view for a role string.
pub fn dispatch_home(role: &str) -> HomeScreen {
    match Role::from_str(role) {
        Ok(role) => HomeScreen::for_role(role),
        Err(_) => {
            tracing::warn!(role, "Unrecognised role at home dispatch");
            HomeScreen::Unknown
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Navigator
// ═══════════════════════════════════════════════════════════

/// Back stack of routes. Never empty.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts at `login`.
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Login],
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = %self.current().path(), to = %route.path(), "navigate");
        self.stack.push(route);
    }

    /// Parse and push a path.
    pub fn navigate_path(&mut self, path: &str) -> Result<(), RouteError> {
        let route = Route::parse(path)?;
        self.navigate(route);
        Ok(())
    }

    /// Pop the current route. Returns `false` at the root.
    pub fn pop_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with `route`.
    pub fn reset_to(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Login,
            Route::Signup,
            Route::Home(Role::Patient),
            Route::Home(Role::Specialist),
            Route::Home(Role::Admin),
            Route::Registration,
            Route::BookAppointment,
            Route::Messages,
            Route::AppointmentControl,
            Route::SpecialistSchedule,
            Route::Attendance,
        ] {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
        assert_eq!(Route::Home(Role::Admin).path(), "home/Admin");
    }

    #[test]
    fn unknown_role_route_is_rejected() {
        assert_eq!(
            Route::parse("home/Nurse").unwrap_err(),
            RouteError::UnknownRole("Nurse".into())
        );
        assert!(matches!(Route::parse("nowhere"), Err(RouteError::UnknownRoute(_))));
    }

    #[test]
    fn dispatch_picks_exactly_one_home() {
        assert_eq!(dispatch_home("Patient"), HomeScreen::Patient);
        assert_eq!(dispatch_home("Specialist"), HomeScreen::Specialist);
        assert_eq!(dispatch_home("Admin"), HomeScreen::Admin);
        let fallback = dispatch_home("admin");
        assert_eq!(fallback, HomeScreen::Unknown);
        assert_eq!(fallback.fallback_message(), Some("Unknown Role"));
        assert!(fallback.menu().is_empty());
    }

    #[test]
    fn menus_end_with_sign_out() {
        for home in [HomeScreen::Patient, HomeScreen::Admin, HomeScreen::Specialist] {
            assert_eq!(home.menu().last().map(|m| m.target), Some(MenuTarget::SignOut));
            assert!(home.fallback_message().is_none());
        }
        assert!(HomeScreen::Admin
            .menu()
            .iter()
            .any(|m| m.target == MenuTarget::Route(Route::Attendance)));
    }

    #[test]
    fn navigator_back_stack() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), Route::Login);
        assert!(!nav.pop_back());

        nav.navigate(Route::Home(Role::Patient));
        nav.navigate_path("bookapp").unwrap();
        assert_eq!(nav.current(), Route::BookAppointment);
        assert!(nav.pop_back());
        assert_eq!(nav.current(), Route::Home(Role::Patient));

        assert!(nav.navigate_path("home/Ghost").is_err());
        assert_eq!(nav.depth(), 2);

        nav.reset_to(Route::Login);
        assert_eq!(nav.depth(), 1);
    }
}
