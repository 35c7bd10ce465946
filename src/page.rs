use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::TableView;

pub const SUCCESS_MESSAGE: &str = "Scraping completed successfully!";
pub const MISSING_URL_MESSAGE: &str = "Please enter a URL.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Success(&'a str),
    Error(&'a str),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageView<'a> {
    /// Echoed back into the form field.
    pub url: &'a str,
    pub notice: Option<Notice<'a>>,
    pub tables: &'a [TableView],
}

pub fn error_notice(message: &str) -> String {
    format!("An error occurred: {message}")
}

/// The single page of the web shell: form, status line and table previews.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <title>HTML Table Scraper</title>\n  <link rel=\"stylesheet\" \
         href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css\">\n\
         </head>\n<body class=\"container py-4\">\n  <h1>HTML Table Scraper</h1>\n",
    );

    html.push_str(&format!(
        "  <form method=\"post\" action=\"/\" class=\"mb-4\">\n    \
         <input type=\"text\" name=\"url\" class=\"form-control\" placeholder=\"https://\" value=\"{}\">\n    \
         <button type=\"submit\" class=\"btn btn-primary mt-2\">Scrape</button>\n  </form>\n",
        encode_double_quoted_attribute(view.url)
    ));

    match view.notice {
        Some(Notice::Success(message)) => html.push_str(&format!(
            "  <div class=\"alert alert-success\">{}</div>\n",
            encode_text(message)
        )),
        Some(Notice::Error(message)) => html.push_str(&format!(
            "  <div class=\"alert alert-danger\">{}</div>\n",
            encode_text(message)
        )),
        None => {}
    }

    for table in view.tables {
        html.push_str(&format!(
            "  <section class=\"mb-4\">\n    <h2>{}</h2>\n    <a href=\"{}\" class=\"btn btn-secondary btn-sm\">Download {}</a>\n{}\n  </section>\n",
            encode_text(&table.name),
            encode_double_quoted_attribute(&table.download_url),
            encode_text(&table.filename),
            table.html_preview
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}
