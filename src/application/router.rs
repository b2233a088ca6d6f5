//! Named screens and access rules.

use crate::infrastructure::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    ResumeForm,
    Dashboard,
    Admin,
}

impl Route {
    /// Resolves a path. Unknown paths fall back to `/`.
    pub fn parse(path: &str) -> Route {
        match path.trim().trim_end_matches('/') {
            "" | "/login" => Route::Login,
            "/resume-form" => Route::ResumeForm,
            "/dashboard" => Route::Dashboard,
            "/admin" => Route::Admin,
            _ => Route::Login,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::ResumeForm => "/resume-form",
            Route::Dashboard => "/dashboard",
            Route::Admin => "/admin",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::ResumeForm => "Resume",
            Route::Dashboard => "Dashboard",
            Route::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    admin_emails: Vec<String>,
}

impl Router {
    pub fn new(admin_emails: Vec<String>) -> Self {
        Self {
            admin_emails: admin_emails.into_iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    pub fn is_admin(&self, identity: Option<&Identity>) -> bool {
        identity.is_some_and(|i| self.admin_emails.iter().any(|a| *a == i.email.to_lowercase()))
    }

    /// Returns the route actually shown for a request.
    ///
    /// Signed-out users only see the sign-in screen; signed-in users skip
    /// it. The admin screen also requires an admin account.
    pub fn resolve(&self, requested: Route, identity: Option<&Identity>) -> Route {
        match (requested, identity) {
            (_, None) => Route::Login,
            (Route::Login, Some(_)) => Route::ResumeForm,
            (Route::Admin, Some(_)) if !self.is_admin(identity) => Route::ResumeForm,
            (route, Some(_)) => route,
        }
    }
}
