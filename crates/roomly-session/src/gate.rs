//! The authorization gate: a pure decision over session state.
//!
//! Consulted before rendering any protected view and re-evaluated on every
//! session change. The decision is never cached, so a logout while a
//! protected view is open flips it immediately.

use crate::handle::SessionStatus;

/// What a protected view should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The session is still resolving; show a waiting state, decide nothing.
    RenderLoading,
    /// Not authenticated; send the user to the login view.
    RedirectToLogin,
    /// Authenticated but not an admin on an admin-only view; send the user
    /// to the regular authenticated landing view.
    RedirectToFallback,
    /// Render the protected content.
    RenderProtected,
}

/// Decide what a protected view may do, first match wins:
///
/// 1. session still loading → [`GateDecision::RenderLoading`]
/// 2. not authenticated → [`GateDecision::RedirectToLogin`]
/// 3. admin required but actor is not one → [`GateDecision::RedirectToFallback`]
/// 4. otherwise → [`GateDecision::RenderProtected`]
///
/// Pure: the same inputs always produce the same decision.
#[must_use]
pub const fn evaluate(
    status: SessionStatus,
    is_authenticated: bool,
    is_admin: bool,
    require_admin: bool,
) -> GateDecision {
    if matches!(status, SessionStatus::Loading) {
        return GateDecision::RenderLoading;
    }
    if !is_authenticated {
        return GateDecision::RedirectToLogin;
    }
    if require_admin && !is_admin {
        return GateDecision::RedirectToFallback;
    }
    GateDecision::RenderProtected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_wins_over_everything() {
        // Even an authenticated admin waits while the session resolves.
        assert_eq!(
            evaluate(SessionStatus::Loading, true, true, true),
            GateDecision::RenderLoading
        );
        assert_eq!(
            evaluate(SessionStatus::Loading, false, false, false),
            GateDecision::RenderLoading
        );
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        assert_eq!(
            evaluate(SessionStatus::Anonymous, false, false, false),
            GateDecision::RedirectToLogin
        );
        assert_eq!(
            evaluate(SessionStatus::Anonymous, false, false, true),
            GateDecision::RedirectToLogin
        );
    }

    #[test]
    fn non_admin_on_admin_view_falls_back() {
        assert_eq!(
            evaluate(SessionStatus::Authenticated, true, false, true),
            GateDecision::RedirectToFallback
        );
    }

    #[test]
    fn authenticated_views_render() {
        assert_eq!(
            evaluate(SessionStatus::Authenticated, true, false, false),
            GateDecision::RenderProtected
        );
        assert_eq!(
            evaluate(SessionStatus::Authenticated, true, true, true),
            GateDecision::RenderProtected
        );
    }

    #[test]
    fn decision_is_stable_across_repeated_evaluations() {
        for _ in 0..3 {
            assert_eq!(
                evaluate(SessionStatus::Authenticated, true, false, true),
                GateDecision::RedirectToFallback
            );
        }
    }
}
