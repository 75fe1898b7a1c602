//! Placeholder page shells for the ERP sections.
//!
//! Rendering is out of scope for this core; the shells exist so the guard
//! has real routes to protect. The fallback is keyed off the same
//! classification table the guard uses — no second route list to drift.

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use rumoerp_routing::{RouteClass, classify};

use crate::app::errors::json_error;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn page(uri: Uri) -> Response {
    let path = uri.path();
    match classify(path) {
        RouteClass::Protected | RouteClass::AdminOnly | RouteClass::AuthOnly => {
            Html(shell(path)).into_response()
        }
        RouteClass::Exempt | RouteClass::Public => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no page at {path}"),
        ),
    }
}

fn shell(path: &str) -> String {
    let title = section_title(path);
    format!(
        "<!doctype html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\"><title>{title} — RumoERP</title></head><body><main data-page=\"{path}\"><h1>{title}</h1></main></body></html>"
    )
}

fn section_title(path: &str) -> &'static str {
    let section = path.trim_start_matches('/').split('/').next().unwrap_or("");
    match section {
        "" | "dashboard" => "Dashboard",
        "auth" => match path {
            "/auth/login" => "Entrar",
            "/auth/register" => "Criar conta",
            "/auth/forgot-password" => "Recuperar senha",
            "/auth/reset-password" => "Redefinir senha",
            _ => "Autenticação",
        },
        "cobrancas" => "Cobranças",
        "clientes" => "Clientes",
        "perfil" => "Perfil",
        "pessoas" => "Pessoas",
        "negocios" => "Negócios",
        "configuracoes" => "Configurações",
        "relatorios" => "Relatórios",
        "contas-receber" => "Contas a Receber",
        "contas-pagar" => "Contas a Pagar",
        "movimentacoes-bancarias" => "Movimentações Bancárias",
        "projetos" => "Projetos",
        "contratos" => "Contratos",
        "servicos" => "Serviços",
        "nfs-e" => "NFS-e",
        "despesas" => "Despesas",
        "email" => "E-mail",
        _ => "RumoERP",
    }
}
