//! The edge request router.
//!
//! # Responsibilities
//! - Skip asset and API paths before anything else
//! - Run the locale normalizer; its redirects win over access control
//! - Classify the normalized path and the session
//! - Produce exactly one `RoutingDecision` per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure function of (path, cookies) apart from the observer
//! - Access rules are evaluated in a fixed order, first match wins

use std::sync::Arc;

use url::form_urlencoded;

use crate::config::{CookieConfig, GateConfig, LocaleConfig, PathConfig};
use crate::error::GateError;
use crate::observability::{DecisionEvent, DecisionObserver, NoopObserver, TracingObserver};
use crate::routing::context::RequestContext;
use crate::routing::decision::{RedirectReason, RoutingDecision};
use crate::routing::locale::{self, LocaleNormalizer, LocaleOutcome, PrefixNormalizer};
use crate::routing::matcher::{AnyMatcher, ExactMatcher, PathMatcher, PrefixMatcher};
use crate::session::{Role, SessionState};

/// Compiled path policy.
#[derive(Debug)]
struct PathPolicy {
    static_paths: PrefixMatcher,
    public: AnyMatcher,
    company_pages: ExactMatcher,
    auth: String,
    company_login: String,
    profile: String,
    company_landing: String,
}

impl PathPolicy {
    fn compile(paths: &PathConfig) -> Self {
        Self {
            static_paths: PrefixMatcher::new(paths.static_prefixes.iter().cloned()),
            public: AnyMatcher::new(vec![
                Box::new(ExactMatcher::new(paths.public_paths.iter().cloned())),
                Box::new(PrefixMatcher::new(paths.public_prefixes.iter().cloned())),
            ]),
            company_pages: ExactMatcher::new(paths.company_pages.iter().cloned()),
            auth: paths.auth.clone(),
            company_login: paths.company_login.clone(),
            profile: paths.profile.clone(),
            company_landing: paths.company_landing.clone(),
        }
    }

    /// Where a signed-in user with `role` belongs.
    fn landing(&self, role: Role) -> &str {
        if role.is_company() {
            &self.company_landing
        } else {
            &self.profile
        }
    }
}

/// Routes each request to continue, rewrite, or redirect.
pub struct EdgeRouter {
    locales: LocaleConfig,
    cookies: CookieConfig,
    policy: PathPolicy,
    normalizer: Arc<dyn LocaleNormalizer>,
    observer: Arc<dyn DecisionObserver>,
}

impl std::fmt::Debug for EdgeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeRouter")
            .field("locales", &self.locales)
            .field("cookies", &self.cookies)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl EdgeRouter {
    /// Build a router from validated configuration with the default
    /// normalizer, logging decisions when `trace_decisions` is set.
    pub fn from_config(config: &GateConfig) -> Self {
        let observer: Arc<dyn DecisionObserver> = if config.observability.trace_decisions {
            Arc::new(TracingObserver)
        } else {
            Arc::new(NoopObserver)
        };

        Self {
            locales: config.locales.clone(),
            cookies: config.cookies.clone(),
            policy: PathPolicy::compile(&config.paths),
            normalizer: Arc::new(PrefixNormalizer::new()),
            observer,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn LocaleNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn locales(&self) -> &LocaleConfig {
        &self.locales
    }

    /// Active locale and normalized path for a raw request path.
    pub fn resolve_locale(&self, path: &str) -> (String, String) {
        let (locale, normalized) = locale::resolve(path, &self.locales);
        (locale.to_string(), normalized)
    }

    /// Decide what to do with one request.
    ///
    /// Only a failing locale normalizer produces an error.
    pub fn decide(&self, ctx: &RequestContext) -> Result<RoutingDecision, GateError> {
        if self.policy.static_paths.matches(&ctx.path) {
            self.emit(DecisionEvent::StaticBypass { path: ctx.path.clone() });
            return Ok(RoutingDecision::Continue);
        }

        let fallthrough = match self.normalizer.normalize(ctx, &self.locales)? {
            LocaleOutcome::Redirect { location } => {
                self.emit(DecisionEvent::LocaleRedirect { location: location.clone() });
                return Ok(RoutingDecision::Redirect {
                    location,
                    reason: RedirectReason::Locale,
                });
            }
            LocaleOutcome::Rewrite { locale, path } => RoutingDecision::Rewrite { locale, path },
            LocaleOutcome::Pass => RoutingDecision::Continue,
        };

        let (locale, normalized) = locale::resolve(&ctx.path, &self.locales);
        let explicit = locale::split_locale(&ctx.path, &self.locales).is_some();
        let public = self.policy.public.matches(&normalized);
        self.emit(DecisionEvent::Classified {
            locale: locale.to_string(),
            normalized_path: normalized.clone(),
            public,
        });

        let session = SessionState::from_cookies(&ctx.cookies, &self.cookies);
        self.emit(DecisionEvent::Token { present: session.authenticated });

        if !session.authenticated {
            if public {
                return Ok(self.allow(normalized, fallthrough));
            }
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("redirect", &normalized)
                .finish();
            let location = format!("{}?{}", self.local_path(locale, &self.policy.auth, explicit), query);
            return Ok(self.redirect(location, RedirectReason::Unauthenticated));
        }

        let role = session.role;
        let path = normalized.as_str();

        if path == self.policy.auth || path == self.policy.company_login {
            self.emit(DecisionEvent::RoleResolved { role });
            // No role yet: the sign-in page settles it once the backend sets the cookie.
            if let Some(role) = role {
                return Ok(self.redirect_local(locale, self.policy.landing(role), explicit, RedirectReason::SignedIn));
            }
        } else if path == self.policy.profile {
            self.emit(DecisionEvent::RoleResolved { role });
            if role == Some(Role::CompanyUser) {
                return Ok(self.redirect_local(
                    locale,
                    &self.policy.company_landing,
                    explicit,
                    RedirectReason::RoleMismatch,
                ));
            }
        } else if self.policy.company_pages.matches(path) {
            self.emit(DecisionEvent::RoleResolved { role });
            if role.is_some_and(|r| !r.is_company()) {
                return Ok(self.redirect_local(locale, &self.policy.profile, explicit, RedirectReason::RoleMismatch));
            }
        }

        Ok(self.allow(normalized, fallthrough))
    }

    fn allow(&self, normalized_path: String, decision: RoutingDecision) -> RoutingDecision {
        self.emit(DecisionEvent::Allowed { normalized_path });
        decision
    }

    /// Keeps the locale segment when the request URL carried one.
    fn local_path(&self, locale: &str, path: &str, explicit: bool) -> String {
        if explicit {
            LocaleConfig::prefixed(locale, path)
        } else {
            self.locales.localize(locale, path)
        }
    }

    fn redirect_local(&self, locale: &str, path: &str, explicit: bool, reason: RedirectReason) -> RoutingDecision {
        self.redirect(self.local_path(locale, path, explicit), reason)
    }

    fn redirect(&self, location: String, reason: RedirectReason) -> RoutingDecision {
        self.emit(DecisionEvent::Redirect {
            location: location.clone(),
            reason,
        });
        RoutingDecision::Redirect { location, reason }
    }

    fn emit(&self, event: DecisionEvent) {
        self.observer.observe(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefixMode;
    use crate::observability::RecordingObserver;

    fn router() -> EdgeRouter {
        EdgeRouter::from_config(&GateConfig::default()).with_observer(Arc::new(NoopObserver))
    }

    fn redirect(location: &str, reason: RedirectReason) -> RoutingDecision {
        RoutingDecision::Redirect {
            location: location.to_string(),
            reason,
        }
    }

    fn signed_in(path: &str, role: Option<&str>) -> RequestContext {
        let ctx = RequestContext::new(path).with_cookie("act", "token");
        match role {
            Some(r) => ctx.with_cookie("user_role", r),
            None => ctx,
        }
    }

    #[test]
    fn test_static_paths_bypass_everything() {
        let r = router();
        for path in ["/api/anything", "/_next/static/app.js", "/favicon.ico", "/images/logo.png", "/.well-known/x"] {
            assert_eq!(r.decide(&RequestContext::new(path)).unwrap(), RoutingDecision::Continue);
            let company = RequestContext::new(path).with_cookie("act", "t").with_cookie("user_role", "CompanyUser");
            assert_eq!(r.decide(&company).unwrap(), RoutingDecision::Continue);
        }
    }

    #[test]
    fn test_public_paths_without_cookies() {
        let r = router();
        for path in [
            "/en",
            "/en/auth",
            "/en/jobs",
            "/th/companies",
            "/en/companies/acme",
            "/en/company-login",
            "/en/company-register",
            "/en/company-pending-approval",
            "/th/about",
            "/en/contact",
        ] {
            assert_eq!(r.decide(&RequestContext::new(path)).unwrap(), RoutingDecision::Continue, "{}", path);
        }
    }

    #[test]
    fn test_protected_paths_redirect_to_auth() {
        let r = router();
        assert_eq!(
            r.decide(&RequestContext::new("/en/profile")).unwrap(),
            redirect("/en/auth?redirect=%2Fprofile", RedirectReason::Unauthenticated)
        );
        assert_eq!(
            r.decide(&RequestContext::new("/th/profile/abc123")).unwrap(),
            redirect("/th/auth?redirect=%2Fprofile%2Fabc123", RedirectReason::Unauthenticated)
        );
        // Trailing slash is not in the allow-list.
        assert_eq!(
            r.decide(&RequestContext::new("/en/jobs/")).unwrap(),
            redirect("/en/auth?redirect=%2Fjobs%2F", RedirectReason::Unauthenticated)
        );
    }

    #[test]
    fn test_empty_token_cookies_are_unauthenticated() {
        let ctx = RequestContext::new("/en/profile").with_cookie("act", "").with_cookie("rft", "");
        assert_eq!(router().decide(&ctx).unwrap().kind(), "redirect");
    }

    #[test]
    fn test_refresh_token_alone_authenticates() {
        let ctx = RequestContext::new("/en/settings").with_cookie("rft", "r");
        assert_eq!(router().decide(&ctx).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_signed_in_auth_page_by_role() {
        let r = router();
        assert_eq!(
            r.decide(&signed_in("/en/auth", Some("CompanyUser"))).unwrap(),
            redirect("/en/company-public-profile", RedirectReason::SignedIn)
        );
        assert_eq!(
            r.decide(&signed_in("/th/auth", Some("PersonaUser"))).unwrap(),
            redirect("/th/profile", RedirectReason::SignedIn)
        );
        assert_eq!(
            r.decide(&signed_in("/en/auth", Some("Admin"))).unwrap(),
            redirect("/en/profile", RedirectReason::SignedIn)
        );
        assert_eq!(r.decide(&signed_in("/en/auth", None)).unwrap(), RoutingDecision::Continue);
        assert_eq!(r.decide(&signed_in("/en/auth", Some("garbage"))).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_signed_in_company_login_by_role() {
        let r = router();
        assert_eq!(
            r.decide(&signed_in("/en/company-login", Some("CompanyUser"))).unwrap(),
            redirect("/en/company-public-profile", RedirectReason::SignedIn)
        );
        assert_eq!(
            r.decide(&signed_in("/en/company-login", Some("PersonaUser"))).unwrap(),
            redirect("/en/profile", RedirectReason::SignedIn)
        );
        assert_eq!(r.decide(&signed_in("/en/company-login", None)).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_company_user_kept_off_bare_profile() {
        let r = router();
        assert_eq!(
            r.decide(&signed_in("/en/profile", Some("CompanyUser"))).unwrap(),
            redirect("/en/company-public-profile", RedirectReason::RoleMismatch)
        );
        assert_eq!(
            r.decide(&signed_in("/en/profile/abc123", Some("CompanyUser"))).unwrap(),
            RoutingDecision::Continue
        );
        assert_eq!(r.decide(&signed_in("/en/profile", Some("PersonaUser"))).unwrap(), RoutingDecision::Continue);
        assert_eq!(r.decide(&signed_in("/en/profile", None)).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_company_pages_guarded_from_other_roles() {
        let r = router();
        for page in ["/en/company-profile", "/en/company-public-profile"] {
            assert_eq!(
                r.decide(&signed_in(page, Some("PersonaUser"))).unwrap(),
                redirect("/en/profile", RedirectReason::RoleMismatch)
            );
            assert_eq!(
                r.decide(&signed_in(page, Some("Admin"))).unwrap(),
                redirect("/en/profile", RedirectReason::RoleMismatch)
            );
            assert_eq!(r.decide(&signed_in(page, Some("CompanyUser"))).unwrap(), RoutingDecision::Continue);
            assert_eq!(r.decide(&signed_in(page, None)).unwrap(), RoutingDecision::Continue);
            assert_eq!(r.decide(&signed_in(page, Some("Owner"))).unwrap(), RoutingDecision::Continue);
        }
    }

    #[test]
    fn test_redirect_targets_are_stable() {
        let r = router();
        let cases = [
            ("/en/auth", Some("CompanyUser")),
            ("/en/auth", Some("PersonaUser")),
            ("/en/company-login", Some("Admin")),
            ("/en/profile", Some("CompanyUser")),
            ("/en/company-profile", Some("PersonaUser")),
            ("/th/company-public-profile", Some("Admin")),
        ];
        for (path, role) in cases {
            let first = r.decide(&signed_in(path, role)).unwrap();
            let target = first.location().unwrap().to_string();
            assert_eq!(r.decide(&signed_in(&target, role)).unwrap(), RoutingDecision::Continue, "{} -> {}", path, target);
        }

        let login = r.decide(&RequestContext::new("/en/profile")).unwrap();
        let target = login.location().unwrap();
        let path = target.split('?').next().unwrap();
        assert_eq!(r.decide(&RequestContext::new(path)).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_locale_redirect_precedes_auth() {
        let recorder = Arc::new(RecordingObserver::new());
        let r = router().with_observer(recorder.clone());

        assert_eq!(
            r.decide(&RequestContext::new("/profile")).unwrap(),
            redirect("/en/profile", RedirectReason::Locale)
        );
        let events = recorder.drain();
        assert_eq!(events, vec![DecisionEvent::LocaleRedirect { location: "/en/profile".into() }]);
    }

    #[test]
    fn test_observer_does_not_change_decisions() {
        let recorder = Arc::new(RecordingObserver::new());
        let observed = router().with_observer(recorder.clone());
        let silent = router();

        for ctx in [
            RequestContext::new("/en/profile"),
            signed_in("/en/auth", Some("CompanyUser")),
            signed_in("/th/company-profile", Some("PersonaUser")),
            RequestContext::new("/api/x"),
            RequestContext::new("/jobs"),
        ] {
            assert_eq!(observed.decide(&ctx).unwrap(), silent.decide(&ctx).unwrap());
        }
        assert!(!recorder.drain().is_empty());
    }

    #[test]
    fn test_decision_trace() {
        let recorder = Arc::new(RecordingObserver::new());
        let r = router().with_observer(recorder.clone());
        r.decide(&signed_in("/th/profile", Some("CompanyUser"))).unwrap();

        assert_eq!(
            recorder.drain(),
            vec![
                DecisionEvent::Classified {
                    locale: "th".into(),
                    normalized_path: "/profile".into(),
                    public: false,
                },
                DecisionEvent::Token { present: true },
                DecisionEvent::RoleResolved { role: Some(Role::CompanyUser) },
                DecisionEvent::Redirect {
                    location: "/th/company-public-profile".into(),
                    reason: RedirectReason::RoleMismatch,
                },
            ]
        );
    }

    struct FailingNormalizer;

    impl LocaleNormalizer for FailingNormalizer {
        fn normalize(&self, _ctx: &RequestContext, _locales: &LocaleConfig) -> Result<LocaleOutcome, GateError> {
            Err(GateError::Locale("catalog unavailable".into()))
        }
    }

    #[test]
    fn test_normalizer_failure_propagates() {
        let r = router().with_normalizer(Arc::new(FailingNormalizer));
        assert!(matches!(r.decide(&RequestContext::new("/en/jobs")), Err(GateError::Locale(_))));
        // Static paths never reach the normalizer.
        assert_eq!(r.decide(&RequestContext::new("/api/x")).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_as_needed_rewrite_survives_access_checks() {
        let mut config = GateConfig::default();
        config.locales.prefix_mode = PrefixMode::AsNeeded;
        let r = EdgeRouter::from_config(&config).with_observer(Arc::new(NoopObserver));

        assert_eq!(
            r.decide(&RequestContext::new("/jobs")).unwrap(),
            RoutingDecision::Rewrite {
                locale: "en".into(),
                path: "/en/jobs".into(),
            }
        );
        assert_eq!(
            r.decide(&RequestContext::new("/profile")).unwrap(),
            redirect("/auth?redirect=%2Fprofile", RedirectReason::Unauthenticated)
        );
        assert_eq!(
            r.decide(&RequestContext::new("/th/profile")).unwrap(),
            redirect("/th/auth?redirect=%2Fprofile", RedirectReason::Unauthenticated)
        );
        assert_eq!(
            r.decide(&RequestContext::new("/en/profile")).unwrap(),
            redirect("/en/auth?redirect=%2Fprofile", RedirectReason::Unauthenticated)
        );
    }

    #[test]
    fn test_as_needed_default_locale_reachable_for_other_language_visitors() {
        let mut config = GateConfig::default();
        config.locales.prefix_mode = PrefixMode::AsNeeded;
        let r = EdgeRouter::from_config(&config).with_observer(Arc::new(NoopObserver));

        let first = RequestContext::new("/en/jobs").with_accept_language("th");
        assert_eq!(r.decide(&first).unwrap(), RoutingDecision::Continue);

        // A signed-in company user stays in English across the role redirect.
        let signed_in = RequestContext::new("/en/auth")
            .with_accept_language("th")
            .with_cookie("act", "token")
            .with_cookie("user_role", "CompanyUser");
        let hop = r.decide(&signed_in).unwrap();
        assert_eq!(hop, redirect("/en/company-public-profile", RedirectReason::SignedIn));

        let second = RequestContext::new(hop.location().unwrap())
            .with_accept_language("th")
            .with_cookie("act", "token")
            .with_cookie("user_role", "CompanyUser");
        assert_eq!(r.decide(&second).unwrap(), RoutingDecision::Continue);
    }

    #[test]
    fn test_nested_slash_paths_never_redirect_off_site() {
        let mut config = GateConfig::default();
        config.locales.prefix_mode = PrefixMode::AsNeeded;
        let as_needed = EdgeRouter::from_config(&config).with_observer(Arc::new(NoopObserver));

        for r in [router(), as_needed] {
            for path in ["/en//evil.example", "//evil.example", "/th//evil.example"] {
                if let Some(location) = r.decide(&RequestContext::new(path)).unwrap().location() {
                    assert!(
                        location.starts_with('/') && !location.starts_with("//"),
                        "{} -> {}",
                        path,
                        location
                    );
                }
            }
        }
    }

    #[test]
    fn test_resolve_locale() {
        let r = router();
        assert_eq!(r.resolve_locale("/th"), ("th".to_string(), "/".to_string()));
        assert_eq!(r.resolve_locale("/about"), ("en".to_string(), "/about".to_string()));
    }
}
