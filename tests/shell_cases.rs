use chrono::{DateTime, Utc};
use html_tables_to_csv::{Document, ExtractError, ExtractOptions, MemorySink, extract_document, parse_url};
use pretty_assertions::assert_eq;

use html_table_scraper_worker::cache::table_cache_key;
use html_table_scraper_worker::error::ApiError;
use html_table_scraper_worker::models::{
    DEFAULT_TABLE_CACHE_TTL_SECONDS, MAX_ALERT_LOG_CHARS, TablesResponse, download_path,
};
use html_table_scraper_worker::notify::{ScrapeAlert, ScrapeStatus, format_alert, truncate_chars};
use html_table_scraper_worker::page::{
    MISSING_URL_MESSAGE, Notice, PageView, SUCCESS_MESSAGE, error_notice, render_page,
};
use html_table_scraper_worker::routes::{content_disposition, parse_cache_ttl, pick_client_ip};
use html_table_scraper_worker::scrape_pipeline::validate_download_name;

const PAGE: &str = r"
    <h2>Prices & fees</h2>
    <table>
      <tr><th>Item</th><th>Price</th></tr>
      <tr><td>Tea</td><td>2</td></tr>
      <tr><td>broken</td></tr>
    </table>
    <table><tr><td>a</td></tr></table>
";

fn sample_report() -> html_tables_to_csv::ExtractionReport {
    let url = parse_url("https://shop.example/menu").expect("valid url");
    let mut sink = MemorySink::new();
    extract_document(&Document::new(url, PAGE), &ExtractOptions::default(), &mut sink)
        .expect("extraction should succeed")
}

fn at() -> DateTime<Utc> {
    "2026-03-01T12:30:00Z".parse().expect("valid datetime")
}

#[test]
fn download_names_must_be_plain_csv_files() {
    assert_eq!(
        validate_download_name("menu_Prices__fees.csv").expect("valid"),
        "menu_Prices__fees.csv"
    );
    assert_eq!(
        validate_download_name("report_Loading....csv").expect("dots are kept"),
        "report_Loading....csv"
    );
    for bad in ["../secret.csv", "a/b.csv", r"a\b.csv", "..\\x.csv", "menu.txt", ".csv", "x.csv/"] {
        let error = validate_download_name(bad).expect_err(bad);
        assert_eq!(error.status_code(), 400, "{bad}");
    }
}

#[test]
fn tables_response_mirrors_the_report() {
    let report = sample_report();
    let response = TablesResponse::from(&report);

    assert_eq!(response.page_name, "menu");
    assert_eq!(response.table_count, 2);
    assert_eq!(response.tables.len(), 1);
    let table = &response.tables[0];
    assert_eq!(table.name, "Prices_&_fees");
    assert_eq!(table.filename, "menu_Prices_&_fees.csv");
    assert_eq!(table.download_url, "/download/menu_Prices_%26_fees.csv");
    assert_eq!((table.rows, table.columns), (1, 2));

    let codes = response
        .warnings
        .iter()
        .map(|warning| warning.code.as_str())
        .collect::<Vec<_>>();
    assert!(codes.contains(&"row_width_mismatch"), "{codes:?}");
    assert!(codes.contains(&"empty_table"), "{codes:?}");
}

#[test]
fn tables_response_serializes_with_stable_keys() {
    let json = serde_json::to_value(TablesResponse::from(&sample_report())).expect("json");
    assert_eq!(json["tables"][0]["rows"], 1);
    assert_eq!(json["warnings"][0]["table"], 1);
    assert!(json["tables"][0]["html_preview"]
        .as_str()
        .is_some_and(|html| html.starts_with("<table class=\"table table-striped\">")));
}

#[test]
fn extract_errors_map_to_http_statuses() {
    let cases = [
        (
            ApiError::from(parse_url("nope").expect_err("invalid")),
            400,
        ),
        (
            ApiError::from(ExtractError::Fetch {
                url: "https://a.example/".to_string(),
                reason: "status 503".to_string(),
            }),
            502,
        ),
        (
            ApiError::from(ExtractError::NoTablesFound {
                url: "https://a.example/".to_string(),
            }),
            404,
        ),
        (
            ApiError::from(ExtractError::InvalidOption("bad delimiter".to_string())),
            422,
        ),
        (
            ApiError::from(ExtractError::Io(std::io::Error::other("disk"))),
            500,
        ),
        (
            ApiError::from(ExtractError::HttpClient("no TLS backend".to_string())),
            500,
        ),
    ];

    for (error, status) in cases {
        assert_eq!(error.status_code(), status, "{error}");
    }
}

#[test]
fn no_tables_message_reaches_the_user() {
    let error = ApiError::from(ExtractError::NoTablesFound {
        url: "https://a.example/".to_string(),
    });
    assert_eq!(
        error_notice(error.message()),
        "An error occurred: No tables found on https://a.example/"
    );
}

#[test]
fn page_renders_notice_and_previews() {
    let report = sample_report();
    let tables = TablesResponse::from(&report).tables;
    let html = render_page(&PageView {
        url: "https://shop.example/menu?q=\"x\"",
        notice: Some(Notice::Success(SUCCESS_MESSAGE)),
        tables: &tables,
    });

    assert!(html.contains("value=\"https://shop.example/menu?q=&quot;x&quot;\""));
    assert!(html.contains("Scraping completed successfully!"));
    assert!(html.contains("<h2>Prices_&amp;_fees</h2>"));
    assert!(html.contains("href=\"/download/menu_Prices_%26_fees.csv\""));
    assert!(html.contains("<td>Tea</td>"));
}

#[test]
fn empty_form_shows_missing_url_error() {
    let html = render_page(&PageView {
        notice: Some(Notice::Error(MISSING_URL_MESSAGE)),
        ..PageView::default()
    });
    assert!(html.contains("alert-danger\">Please enter a URL.</div>"));
    assert!(!html.contains("<section"));
}

#[test]
fn success_alert_lists_request_details() {
    let text = format_alert(&ScrapeAlert {
        status: ScrapeStatus::Success,
        client_ip: "203.0.113.7",
        url: "https://shop.example/menu",
        at: at(),
        table_count: Some(3),
        error: None,
    });

    assert_eq!(
        text,
        "Web Scraping Alert!\n\nStatus: SUCCESS\nIP: 203.0.113.7\nURL: https://shop.example/menu\n\
         Time: 2026-03-01 12:30:00 UTC\nTables saved: 3\nScraping completed successfully!"
    );
}

#[test]
fn error_alert_truncates_long_logs() {
    let log = "x".repeat(MAX_ALERT_LOG_CHARS + 10);
    let text = format_alert(&ScrapeAlert {
        status: ScrapeStatus::Error,
        client_ip: "unknown",
        url: "https://shop.example/menu",
        at: at(),
        table_count: None,
        error: Some(&log),
    });

    assert!(text.contains("Status: ERROR"));
    assert!(text.contains("Scraping failed."));
    assert!(text.ends_with("... (truncated)"));
    assert!(!text.contains(&log));
}

#[test]
fn truncation_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé... (truncated)");
    assert_eq!(truncate_chars("short", 10), "short");
}

#[test]
fn client_ip_prefers_edge_header() {
    assert_eq!(pick_client_ip(Some("198.51.100.1"), Some("10.0.0.1")), "198.51.100.1");
    assert_eq!(pick_client_ip(None, Some(" 10.0.0.1 , 10.0.0.2")), "10.0.0.1");
    assert_eq!(pick_client_ip(Some(" "), None), "unknown");
}

#[test]
fn cache_ttl_defaults_and_validates() {
    assert_eq!(parse_cache_ttl(None).expect("default"), DEFAULT_TABLE_CACHE_TTL_SECONDS);
    assert_eq!(parse_cache_ttl(Some("")).expect("default"), DEFAULT_TABLE_CACHE_TTL_SECONDS);
    assert_eq!(parse_cache_ttl(Some("3600")).expect("explicit"), 3600);
    assert!(parse_cache_ttl(Some("0")).is_err());
    assert!(parse_cache_ttl(Some("soon")).is_err());
}

#[test]
fn stored_tables_use_versioned_keys() {
    assert_eq!(table_cache_key("menu_Prices.csv"), "table:v1:menu_Prices.csv");
    assert_eq!(download_path("menu_Café.csv"), "/download/menu_Caf%C3%A9.csv");
    assert_eq!(
        content_disposition("menu_Café.csv"),
        "attachment; filename*=UTF-8''menu_Caf%C3%A9.csv"
    );
}

#[test]
fn every_extracted_file_is_downloadable() {
    let html = r"
        <h2>Loading...</h2><table><tr><th>a</th></tr><tr><td>1</td></tr></table>
        <h2>50% off</h2><table><tr><th>a</th></tr><tr><td>2</td></tr></table>
        <h2>Prices & fees</h2><table><tr><th>a</th></tr><tr><td>3</td></tr></table>
        <h2>Café über</h2><table><tr><th>a</th></tr><tr><td>4</td></tr></table>
        <h3>etc..</h3><table><tr><th>a</th></tr><tr><td>5</td></tr></table>
    ";
    let url = parse_url("https://example.com/v1..2").expect("valid url");
    let mut sink = MemorySink::new();
    let report = extract_document(&Document::new(url, html), &ExtractOptions::default(), &mut sink)
        .expect("extraction should succeed");

    let response = TablesResponse::from(&report);
    assert_eq!(response.tables.len(), 5);
    for table in &response.tables {
        let encoded = table
            .download_url
            .strip_prefix("/download/")
            .expect("download route prefix");
        let decoded = urlencoding::decode(encoded).expect("percent-decoding");
        let validated = validate_download_name(&decoded).expect("download name should be accepted");
        assert_eq!(validated, table.filename);
    }

    let filenames = response
        .tables
        .iter()
        .map(|table| table.filename.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        filenames,
        vec![
            "v1..2_Loading....csv",
            "v1..2_50%_off.csv",
            "v1..2_Prices_&_fees.csv",
            "v1..2_Café_über.csv",
            "v1..2_etc...csv",
        ]
    );
}

#[test]
fn tables_response_round_trips_through_json() {
    let response = TablesResponse::from(&sample_report());
    let json = serde_json::to_string(&response).expect("serialize");
    let parsed = serde_json::from_str::<TablesResponse>(&json).expect("deserialize");
    assert_eq!(parsed, response);
}
