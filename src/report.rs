// HTML report: result tables pasted into a template
use crate::export::csv::{header, row};
use crate::model::Listing;
use std::fs;
use std::io;
use std::path::Path;

/// Placeholder in the template replaced by the tables.
pub const TABLES_TOKEN: &str = "#tables";

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/report_template.html");

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Reads the template at `path`, or the built-in one when no path is set.
pub fn load_template(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

pub fn render_table(listings: &[Listing]) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n<thead>\n<tr>");
    for column in header() {
        html.push_str(&format!("<th>{}</th>", column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for listing in listings {
        html.push_str("<tr>");
        for cell in row(listing) {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

/// Pastes the Air and Pro tables into `template` and drops line breaks.
pub fn render_report(template: &str, airs: &[Listing], pros: &[Listing]) -> String {
    let tables = format!("{}<br/><br/>{}", render_table(airs), render_table(pros));
    template.replace(TABLES_TOKEN, &tables).replace('\n', "")
}
