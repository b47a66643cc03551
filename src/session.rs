//! Session phases, navigable routes, and the access-guard table.

use crate::model::User;

/// Where the session stands. `Loading` covers the window between startup and
/// the first `/auth/me` response; guards hold navigation rather than flash a
/// sign-in screen at a user who is actually signed in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthPhase {
    #[default]
    Loading,
    SignedOut,
    SignedIn(User),
}

impl AuthPhase {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Every screen the dashboard can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    NewGames,
    Bookmarks,
    Folder(String),
    PublisherTracking,
    Admin,
    SignIn,
    SignUp,
    Activation,
    NotFound,
}

impl Route {
    /// Title for the header bar.
    pub fn title(&self) -> &str {
        match self {
            Self::Landing => "GameScout",
            Self::NewGames => "New Games",
            Self::Bookmarks => "Bookmarks",
            Self::Folder(name) => name,
            Self::PublisherTracking => "Publisher Tracking",
            Self::Admin => "Admin",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::Activation => "Activate Plan",
            Self::NotFound => "Not Found",
        }
    }

    /// Parse a CLI `--route` argument.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "/" | "landing" => Self::Landing,
            "new-games" => Self::NewGames,
            "bookmarks" => Self::Bookmarks,
            "publisher-tracking" => Self::PublisherTracking,
            "admin" => Self::Admin,
            "signin" => Self::SignIn,
            "signup" => Self::SignUp,
            "activation" => Self::Activation,
            other => match other.strip_prefix("folder/") {
                Some(name) if !name.is_empty() => Self::Folder(name.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    fn needs_session(&self) -> bool {
        matches!(
            self,
            Self::NewGames
                | Self::Bookmarks
                | Self::Folder(_)
                | Self::PublisherTracking
                | Self::Admin
                | Self::Activation
        )
    }
}

/// Outcome of checking one route against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Session still resolving; keep showing the loading screen.
    Pending,
    Allow,
    Redirect(Route),
}

/// Resolve whether `route` may be shown under `phase`.
///
/// The full table, in precedence order: loading holds everything that needs
/// a session; signed-out users are sent to sign-in; signed-in users without
/// an active plan are pinned to activation; activation itself bounces users
/// who already have a plan; admin needs the admin role; auth screens bounce
/// anyone already signed in.
pub fn resolve_guard(route: &Route, phase: &AuthPhase) -> Guard {
    match phase {
        AuthPhase::Loading => {
            if route.needs_session() {
                Guard::Pending
            } else {
                Guard::Allow
            }
        }
        AuthPhase::SignedOut => {
            if route.needs_session() {
                Guard::Redirect(Route::SignIn)
            } else {
                Guard::Allow
            }
        }
        AuthPhase::SignedIn(user) => match route {
            Route::SignIn | Route::SignUp => Guard::Redirect(if user.has_active_plan {
                Route::NewGames
            } else {
                Route::Activation
            }),
            Route::Activation => {
                if user.has_active_plan {
                    Guard::Redirect(Route::NewGames)
                } else {
                    Guard::Allow
                }
            }
            Route::Admin => {
                if !user.has_active_plan {
                    Guard::Redirect(Route::Activation)
                } else if user.is_admin() {
                    Guard::Allow
                } else {
                    Guard::Redirect(Route::NewGames)
                }
            }
            _ if route.needs_session() && !user.has_active_plan => {
                Guard::Redirect(Route::Activation)
            }
            _ => Guard::Allow,
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, has_active_plan: bool) -> User {
        User {
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: role.to_string(),
            picture: None,
            has_active_plan,
        }
    }

    fn member() -> AuthPhase {
        AuthPhase::SignedIn(user("member", true))
    }

    fn admin() -> AuthPhase {
        AuthPhase::SignedIn(user("admin", true))
    }

    fn unpaid() -> AuthPhase {
        AuthPhase::SignedIn(user("member", false))
    }

    #[test]
    fn test_loading_holds_protected_routes() {
        assert_eq!(resolve_guard(&Route::NewGames, &AuthPhase::Loading), Guard::Pending);
        assert_eq!(resolve_guard(&Route::Landing, &AuthPhase::Loading), Guard::Allow);
        assert_eq!(resolve_guard(&Route::SignIn, &AuthPhase::Loading), Guard::Allow);
    }

    #[test]
    fn test_signed_out_redirects_protected_to_signin() {
        for route in [
            Route::NewGames,
            Route::Bookmarks,
            Route::Folder("Favorites".to_string()),
            Route::PublisherTracking,
            Route::Admin,
            Route::Activation,
        ] {
            assert_eq!(
                resolve_guard(&route, &AuthPhase::SignedOut),
                Guard::Redirect(Route::SignIn),
                "route {route:?}"
            );
        }
        assert_eq!(resolve_guard(&Route::Landing, &AuthPhase::SignedOut), Guard::Allow);
    }

    #[test]
    fn test_member_reaches_feed_routes() {
        assert_eq!(resolve_guard(&Route::NewGames, &member()), Guard::Allow);
        assert_eq!(resolve_guard(&Route::Bookmarks, &member()), Guard::Allow);
        assert_eq!(
            resolve_guard(&Route::Folder("Favorites".to_string()), &member()),
            Guard::Allow
        );
    }

    #[test]
    fn test_unpaid_member_pinned_to_activation() {
        assert_eq!(
            resolve_guard(&Route::NewGames, &unpaid()),
            Guard::Redirect(Route::Activation)
        );
        assert_eq!(resolve_guard(&Route::Activation, &unpaid()), Guard::Allow);
    }

    #[test]
    fn test_paid_member_bounced_off_activation() {
        assert_eq!(
            resolve_guard(&Route::Activation, &member()),
            Guard::Redirect(Route::NewGames)
        );
    }

    #[test]
    fn test_admin_route_needs_admin_role() {
        assert_eq!(resolve_guard(&Route::Admin, &admin()), Guard::Allow);
        assert_eq!(
            resolve_guard(&Route::Admin, &member()),
            Guard::Redirect(Route::NewGames)
        );
    }

    #[test]
    fn test_auth_screens_bounce_signed_in_users() {
        assert_eq!(
            resolve_guard(&Route::SignIn, &member()),
            Guard::Redirect(Route::NewGames)
        );
        assert_eq!(
            resolve_guard(&Route::SignUp, &unpaid()),
            Guard::Redirect(Route::Activation)
        );
    }

    #[test]
    fn test_route_parse_covers_folder_and_unknown() {
        assert_eq!(Route::parse("new-games"), Route::NewGames);
        assert_eq!(
            Route::parse("folder/Hyper Casual"),
            Route::Folder("Hyper Casual".to_string())
        );
        assert_eq!(Route::parse("folder/"), Route::NotFound);
        assert_eq!(Route::parse("no-such-page"), Route::NotFound);
    }
}
