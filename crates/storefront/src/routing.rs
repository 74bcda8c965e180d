//! Role-gated navigation policy.
//!
//! The stores report outcomes; this layer turns them into navigation. It is
//! the only module that knows about paths, which keeps the session and cart
//! stores UI-framework-agnostic.

use easybuy_core::Role;

use crate::session::{CurrentUser, SessionHandle};

/// Where a visitor should be sent next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The public landing page.
    Landing,
    /// The login page.
    Login,
    /// The signed-in dashboard.
    Dashboard,
    /// The admin back-office landing.
    AdminDashboard,
    /// A remembered path from a pre-login redirect.
    Resume(String),
}

impl Destination {
    /// The path this destination renders to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Landing => "/",
            Self::Login => "/auth/login",
            Self::Dashboard => "/dashboard",
            Self::AdminDashboard => "/admin",
            Self::Resume(path) => path,
        }
    }
}

/// The outcome of checking a requested path against the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested path.
    Allow,
    /// Startup verification is still in flight; hold rendering of protected
    /// content until the session resolves.
    Pending,
    /// Send the visitor elsewhere.
    Redirect(Destination),
}

/// Path-prefix access rules.
///
/// Admin-namespace paths require [`Role::Admin`]; protected paths require
/// any session. Denied protected requests remember the requested path for
/// one post-login redirect.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    protected: Vec<String>,
    admin: Vec<String>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            protected: ["/dashboard", "/products", "/cart", "/orders"]
                .map(str::to_owned)
                .to_vec(),
            admin: vec!["/admin".to_owned()],
        }
    }
}

impl RoutePolicy {
    /// The default prefix sets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `path` may render for the current session.
    #[must_use]
    pub fn decide(&self, path: &str, session: &SessionHandle) -> RouteDecision {
        let snapshot = session.snapshot();
        let is_admin_route = self.admin.iter().any(|p| path.starts_with(p.as_str()));
        let is_protected = self.protected.iter().any(|p| path.starts_with(p.as_str()));

        if snapshot.is_loading() && (is_admin_route || is_protected) {
            return RouteDecision::Pending;
        }

        if is_admin_route {
            return match &snapshot.user {
                Some(user) if user.role.is_admin() => RouteDecision::Allow,
                // Missing session or mismatched role both land on the
                // public page, not the login page
                _ => RouteDecision::Redirect(Destination::Landing),
            };
        }

        if is_protected && !snapshot.is_authenticated() {
            session.remember_redirect(path);
            return RouteDecision::Redirect(Destination::Login);
        }

        // A signed-in visitor has no business on the auth pages
        if snapshot.is_authenticated()
            && (path.starts_with("/auth/login") || path.starts_with("/auth/register"))
        {
            return RouteDecision::Redirect(Destination::Dashboard);
        }

        RouteDecision::Allow
    }

    /// Where to land after a successful login or registration.
    ///
    /// A remembered pre-login path wins (and is consumed); otherwise admins
    /// land in the back office and everyone else on the dashboard.
    #[must_use]
    pub fn post_login(&self, user: &CurrentUser, session: &SessionHandle) -> Destination {
        if let Some(path) = session.take_redirect() {
            return Destination::Resume(path);
        }
        match user.role {
            Role::Admin => Destination::AdminDashboard,
            Role::Customer => Destination::Dashboard,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use easybuy_core::{Email, UserId};
    use std::sync::Arc;
    use uuid::Uuid;

    fn session_with(user: Option<CurrentUser>) -> SessionHandle {
        let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
        if let Some(user) = user {
            session.establish("tok".to_owned(), user);
        }
        session
    }

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(Uuid::nil()),
            name: "Lin".to_owned(),
            email: Email::parse("lin@example.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_admin_route_requires_admin_role() {
        let policy = RoutePolicy::new();

        let admin = session_with(Some(user(Role::Admin)));
        assert_eq!(policy.decide("/admin/products", &admin), RouteDecision::Allow);

        let customer = session_with(Some(user(Role::Customer)));
        assert_eq!(
            policy.decide("/admin/products", &customer),
            RouteDecision::Redirect(Destination::Landing)
        );

        let anonymous = session_with(None);
        assert_eq!(
            policy.decide("/admin", &anonymous),
            RouteDecision::Redirect(Destination::Landing)
        );
    }

    #[test]
    fn test_mixed_case_admin_role_routes_like_admin() {
        // Normalization happens at the wire boundary; "Admin" and "ADMIN"
        // both become Role::Admin before any routing check
        let session = session_with(Some(CurrentUser {
            role: Role::from_wire("Admin"),
            ..user(Role::Customer)
        }));
        assert_eq!(
            RoutePolicy::new().decide("/admin", &session),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_protected_route_redirects_to_login_and_remembers_path() {
        let policy = RoutePolicy::new();
        let session = session_with(None);

        assert_eq!(
            policy.decide("/cart", &session),
            RouteDecision::Redirect(Destination::Login)
        );
        assert_eq!(session.take_redirect().as_deref(), Some("/cart"));
    }

    #[test]
    fn test_authenticated_visitor_skips_auth_pages() {
        let policy = RoutePolicy::new();
        let session = session_with(Some(user(Role::Customer)));

        assert_eq!(
            policy.decide("/auth/login", &session),
            RouteDecision::Redirect(Destination::Dashboard)
        );
        assert_eq!(
            policy.decide("/auth/register", &session),
            RouteDecision::Redirect(Destination::Dashboard)
        );
    }

    #[test]
    fn test_public_routes_always_allowed() {
        let policy = RoutePolicy::new();
        assert_eq!(policy.decide("/", &session_with(None)), RouteDecision::Allow);
        assert_eq!(
            policy.decide("/about", &session_with(None)),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_post_login_prefers_remembered_path() {
        let policy = RoutePolicy::new();
        let session = session_with(None);
        session.remember_redirect("/orders/42");

        let destination = policy.post_login(&user(Role::Customer), &session);
        assert_eq!(destination, Destination::Resume("/orders/42".to_owned()));
        // consumed: a second login gets the role default
        assert_eq!(
            policy.post_login(&user(Role::Customer), &session),
            Destination::Dashboard
        );
    }

    #[test]
    fn test_post_login_routes_by_role() {
        let policy = RoutePolicy::new();
        let session = session_with(None);

        assert_eq!(
            policy.post_login(&user(Role::Admin), &session),
            Destination::AdminDashboard
        );
        assert_eq!(
            policy.post_login(&user(Role::Customer), &session),
            Destination::Dashboard
        );
    }

    #[test]
    fn test_destination_paths() {
        assert_eq!(Destination::Landing.path(), "/");
        assert_eq!(Destination::Login.path(), "/auth/login");
        assert_eq!(Destination::AdminDashboard.path(), "/admin");
        assert_eq!(Destination::Resume("/cart".into()).path(), "/cart");
    }
}
