//! Static route classification table.

use serde::Serialize;

/// Login page; redirect target for unauthenticated access to protected paths.
pub const LOGIN_PATH: &str = "/auth/login";

/// Default authenticated landing path.
pub const LANDING_PATH: &str = "/";

/// Query parameter carrying the originally-requested path across a login
/// redirect.
pub const NEXT_PARAM: &str = "next";

/// Technical paths excluded from all checks (probes, assets, dev tooling).
const EXEMPT_PREFIXES: &[&str] = &["/dev-tools", "/_assets", "/.well-known"];
const EXEMPT_EXACT: &[&str] = &["/favicon.ico", "/health"];

/// Reachable only *without* a session; authenticated users get bounced to
/// the landing path.
const AUTH_ONLY_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
];

/// Admin-only refinement of the protected set.
const ADMIN_ONLY_PREFIXES: &[&str] = &["/configuracoes"];

/// ERP sections requiring any session. `/` is handled separately (an exact
/// match; as a prefix it would swallow every path).
const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/cobrancas",
    "/clientes",
    "/perfil",
    "/pessoas",
    "/negocios",
    "/configuracoes",
    "/relatorios",
    "/contas-receber",
    "/contas-pagar",
    "/movimentacoes-bancarias",
    "/projetos",
    "/contratos",
    "/servicos",
    "/nfs-e",
    "/despesas",
    "/email",
];

/// Primary bucket of a path.
///
/// The partition is total: every path falls into exactly one class, with
/// `AdminOnly` refining `Protected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Technical set; no checks at all.
    Exempt,
    /// Anyone, session or not.
    Public,
    /// Login/register flows; session must be absent.
    AuthOnly,
    /// Requires any session.
    Protected,
    /// Requires a session *and* an active admin profile.
    AdminOnly,
}

/// Prefix match on segment boundaries: `/clientes` matches `/clientes` and
/// `/clientes/42` but not `/clientesx`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Classify `path` (query/fragment ignored). Evaluation order mirrors the
/// guard's rule order: exempt first, then the auth-only set, then the
/// admin refinement, then the protected set.
pub fn classify(path: &str) -> RouteClass {
    let path = strip_query(path);

    if EXEMPT_EXACT.contains(&path) || EXEMPT_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        return RouteClass::Exempt;
    }

    if AUTH_ONLY_PATHS.iter().any(|p| matches_prefix(path, p)) {
        return RouteClass::AuthOnly;
    }

    if ADMIN_ONLY_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        return RouteClass::AdminOnly;
    }

    if path == LANDING_PATH || PROTECTED_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        return RouteClass::Protected;
    }

    RouteClass::Public
}

/// All protected-or-stricter prefixes, for table-driven tests.
pub fn protected_prefixes() -> impl Iterator<Item = &'static str> {
    PROTECTED_PREFIXES.iter().copied()
}

/// The auth-only set, for table-driven tests.
pub fn auth_only_paths() -> impl Iterator<Item = &'static str> {
    AUTH_ONLY_PATHS.iter().copied()
}
