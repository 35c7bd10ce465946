use scraper::{ElementRef, Html};
use url::Url;

use crate::error::ExtractError;
use crate::options::HeadingLevels;

/// A `<table>` inside a parsed page, borrowed from the page tree.
#[derive(Debug, Clone, Copy)]
pub struct TableElement<'a> {
    /// 1-based position in document order, nested tables included.
    pub ordinal: usize,
    pub element: ElementRef<'a>,
    /// Nearest heading that starts before the table in document order.
    pub heading: Option<ElementRef<'a>>,
}

/// Walks the tree once in document order, collecting every table at any
/// depth together with the last heading seen before it.
pub fn locate_tables<'a>(
    html: &'a Html,
    url: &Url,
    levels: &HeadingLevels,
) -> Result<Vec<TableElement<'a>>, ExtractError> {
    let mut tables = Vec::new();
    let mut last_heading = None;

    for node in html.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let name = element.value().name();
        if name == "table" {
            tables.push(TableElement {
                ordinal: tables.len() + 1,
                element,
                heading: last_heading,
            });
        } else if levels.contains_tag(name) {
            last_heading = Some(element);
        }
    }

    if tables.is_empty() {
        return Err(ExtractError::NoTablesFound {
            url: url.to_string(),
        });
    }
    Ok(tables)
}

/// Descendants of `root` named `tag` whose closest `boundary` ancestor is
/// `root` itself, so rows and cells of nested tables stay with their own
/// table.
pub(crate) fn owned_descendants<'a>(
    root: ElementRef<'a>,
    tags: &'a [&'a str],
    boundary: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |element| tags.contains(&element.value().name()))
        .filter(move |element| {
            element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == boundary)
                .is_some_and(|ancestor| ancestor.id() == root.id())
        })
}

pub(crate) fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
