// Bazos-specific HTML parsing
use crate::model::{ListingMetadata, ListingPage, ParserError};
use crate::utils::parse_digits;
use reqwest::Url;
use ::scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects listing URLs from one search result page, in page order and
/// without duplicates. Relative links are resolved against `base_url`.
pub fn parse_search_page(html: &str, base_url: &str) -> Result<Vec<String>, ParserError> {
    let document = Html::parse_document(html);
    let link_selector = selector("div.inzeraty div.inzeratynadpis a")?;
    let base = Url::parse(base_url).map_err(|e| ParserError::HtmlParseError(e.to_string()))?;

    let mut urls: Vec<String> = Vec::new();
    for link in document.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            continue;
        };
        let url = url.to_string();
        if !urls.contains(&url) {
            urls.push(url);
        }
    }

    Ok(urls)
}

/// Pulls the title, the lower-cased description and the metadata table out of
/// a listing page.
pub fn parse_listing_page(html: &str, url: &str) -> Result<ListingPage, ParserError> {
    let document = Html::parse_document(html);
    let title_selector = selector("div.inzeratydetnadpis")?;
    let description_selector = selector("div.popisdetail")?;
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let title = document
        .select(&title_selector)
        .next()
        .map(element_text)
        .ok_or(ParserError::MissingField("title"))?;

    let description = document
        .select(&description_selector)
        .next()
        .map(|e| element_text(e).to_lowercase())
        .ok_or(ParserError::MissingField("description"))?;

    let mut metadata_rows = Vec::new();
    if let Some(table) = document.select(&table_selector).nth(1) {
        for row in table.select(&row_selector) {
            let mut cells = row.select(&cell_selector).map(element_text);
            if let (Some(label), Some(value)) = (cells.next(), cells.next()) {
                metadata_rows.push((label, value));
            }
        }
    }

    Ok(ListingPage {
        url: url.to_string(),
        title,
        description,
        metadata_rows,
    })
}

/// Picks the view count ("Vidělo") and price ("Cena") rows, digits only.
pub fn parse_metadata(rows: &[(String, String)]) -> ListingMetadata {
    let mut metadata = ListingMetadata::default();
    for (label, value) in rows {
        if label.starts_with("Vid") {
            metadata.views = parse_digits(value);
        } else if label.starts_with("Cena") {
            metadata.price = parse_digits(value);
        }
    }
    metadata
}
