use std::collections::HashMap;

use chrono::Utc;
use html_tables_to_csv::ExtractionReport;
use serde::Serialize;
use worker::{Context, Env, FormEntry, Request, Response, Result, RouteContext, Router};

use crate::cache;
use crate::error::ApiError;
use crate::models::{CSV_CONTENT_TYPE, DEFAULT_TABLE_CACHE_TTL_SECONDS, TableView, TablesResponse};
use crate::notify::{self, ScrapeAlert, ScrapeStatus};
use crate::page::{MISSING_URL_MESSAGE, Notice, PageView, SUCCESS_MESSAGE, error_notice, render_page};
use crate::scrape_pipeline;

#[derive(Debug, Clone)]
pub struct AppState {
    pub cache_ttl_seconds: u32,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let raw_ttl = env
        .var("TABLE_CACHE_TTL_SECONDS")
        .map(|value| value.to_string())
        .ok();
    let cache_ttl_seconds = match parse_cache_ttl(raw_ttl.as_deref()) {
        Ok(ttl) => ttl,
        Err(error) => return error.into_response(),
    };

    Router::with_data(AppState { cache_ttl_seconds })
        .get_async("/", form_route)
        .post_async("/", scrape_form_route)
        .get_async("/download/:filename", download_route)
        .get_async("/api/v1/tables", tables_route)
        .run(req, env)
        .await
}

async fn form_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    html_response(&render_page(&PageView::default()))
}

async fn scrape_form_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    let form = match req.form_data().await {
        Ok(form) => form,
        Err(error) => return ApiError::from(error).into_response(),
    };
    let url = match form.get("url") {
        Some(FormEntry::Field(value)) => value.trim().to_string(),
        _ => String::new(),
    };

    if url.is_empty() {
        return html_response(&render_page(&PageView {
            notice: Some(Notice::Error(MISSING_URL_MESSAGE)),
            ..PageView::default()
        }));
    }

    let outcome = scrape_pipeline::scrape_and_store(&url, ctx.data.cache_ttl_seconds).await;
    report_outcome(&ctx.env, &client_ip(&req), &url, &outcome).await;

    match outcome {
        Ok(report) => {
            let tables = report.results.iter().map(TableView::from).collect::<Vec<_>>();
            html_response(&render_page(&PageView {
                url: &url,
                notice: Some(Notice::Success(SUCCESS_MESSAGE)),
                tables: &tables,
            }))
        }
        Err(error) => {
            let message = error_notice(error.message());
            html_response(&render_page(&PageView {
                url: &url,
                notice: Some(Notice::Error(&message)),
                tables: &[],
            }))
        }
    }
}

async fn download_route(_req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match download_response(ctx.param("filename").map(String::as_str)).await {
        Ok(response) => Ok(response),
        Err(error) => error.into_response(),
    }
}

async fn tables_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    let url = match required_url_query(&req) {
        Ok(url) => url,
        Err(error) => return error.into_response(),
    };

    let outcome = scrape_pipeline::scrape_and_store(&url, ctx.data.cache_ttl_seconds).await;
    report_outcome(&ctx.env, &client_ip(&req), &url, &outcome).await;

    match outcome {
        Ok(report) => json_response(&TablesResponse::from(&report)),
        Err(error) => error.into_response(),
    }
}

async fn download_response(raw_name: Option<&str>) -> Result<Response, ApiError> {
    let raw_name = raw_name.ok_or_else(|| ApiError::BadRequest("missing file name".to_string()))?;
    let decoded = urlencoding::decode(raw_name)
        .map_err(|error| ApiError::BadRequest(format!("invalid file name encoding: {error}")))?;
    let filename = scrape_pipeline::validate_download_name(&decoded)?;

    let Some(csv) = cache::load_table(filename).await? else {
        return Err(ApiError::NotFound(format!(
            "no stored table named {filename}"
        )));
    };

    let mut response = Response::from_bytes(csv)?;
    let headers = response.headers_mut();
    headers.set("Content-Type", CSV_CONTENT_TYPE)?;
    headers.set("Content-Disposition", &content_disposition(filename))?;
    headers.set("Cache-Control", "no-store")?;
    Ok(response)
}

async fn report_outcome(
    env: &Env,
    client_ip: &str,
    url: &str,
    outcome: &Result<ExtractionReport, ApiError>,
) {
    let alert = match outcome {
        Ok(report) => ScrapeAlert {
            status: ScrapeStatus::Success,
            client_ip,
            url,
            at: Utc::now(),
            table_count: Some(report.results.len()),
            error: None,
        },
        Err(error) => {
            worker::console_error!("scraping failed for {url}: {error}");
            ScrapeAlert {
                status: ScrapeStatus::Error,
                client_ip,
                url,
                at: Utc::now(),
                table_count: None,
                error: Some(error.message()),
            }
        }
    };
    notify::notify(env, &alert).await;
}

fn html_response(body: &str) -> Result<Response> {
    let mut response = Response::from_html(body)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}

fn required_url_query(req: &Request) -> Result<String, ApiError> {
    parse_query(req)?
        .get("url")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing url query parameter".to_string()))
}

fn client_ip(req: &Request) -> String {
    let header = |name: &str| req.headers().get(name).ok().flatten();
    pick_client_ip(
        header("CF-Connecting-IP").as_deref(),
        header("X-Forwarded-For").as_deref(),
    )
}

/// Prefers the edge-supplied address, then the first forwarded hop.
pub fn pick_client_ip(connecting_ip: Option<&str>, forwarded_for: Option<&str>) -> String {
    connecting_ip
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            forwarded_for
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .unwrap_or("unknown")
        .to_string()
}

pub fn parse_cache_ttl(raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_TABLE_CACHE_TTL_SECONDS);
    };

    let ttl = raw.parse::<u32>()?;
    if ttl == 0 {
        return Err(ApiError::Validation(
            "TABLE_CACHE_TTL_SECONDS must be positive".to_string(),
        ));
    }
    Ok(ttl)
}

pub fn content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}
