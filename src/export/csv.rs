// Semicolon-separated result tables
use crate::model::Listing;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub const SEPARATOR: char = ';';

const HEADER: [&str; 11] = [
    "date", "variant", "year", "ram", "storage", "touchbar", "m1", "cpu_ghz", "url", "views", "price",
];

fn escape(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Cells of one listing, in `HEADER` order. Missing values are empty.
pub fn row(listing: &Listing) -> Vec<String> {
    let attrs = &listing.attributes;
    vec![
        attrs.date.clone(),
        attrs.variant.to_string(),
        attrs.year.to_string(),
        attrs.ram.to_string(),
        attrs.storage.to_string(),
        attrs.touchbar.to_string(),
        attrs.m1_chip.to_string(),
        attrs.cpu_ghz.to_string(),
        attrs.url.clone(),
        listing.metadata.views.map(|v| v.to_string()).unwrap_or_default(),
        listing.metadata.price.map(|p| p.to_string()).unwrap_or_default(),
    ]
}

pub fn header() -> &'static [&'static str] {
    &HEADER
}

fn write_line<W: Write>(out: &mut W, cells: impl IntoIterator<Item = String>) -> io::Result<()> {
    let separator = SEPARATOR.to_string();
    let line = cells.into_iter().map(|c| escape(&c)).collect::<Vec<_>>().join(separator.as_str());
    writeln!(out, "{}", line)
}

pub fn write_rows<W: Write>(out: &mut W, listings: &[Listing]) -> io::Result<()> {
    write_line(out, HEADER.iter().map(|h| h.to_string()))?;
    for listing in listings {
        write_line(out, row(listing))?;
    }
    Ok(())
}

pub fn write_table(path: &Path, listings: &[Listing]) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_rows(&mut file, listings)?;
    file.flush()
}

/// Writes `all.csv`, `airs.csv` and `pros.csv` into `dir`.
pub fn export_all(dir: &Path, all: &[Listing], airs: &[Listing], pros: &[Listing]) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    write_table(&dir.join("all.csv"), all)?;
    write_table(&dir.join("airs.csv"), airs)?;
    write_table(&dir.join("pros.csv"), pros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::selection::fixtures::listing;
    use crate::model::{FieldValue, Variant};

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a;b"), "\"a;b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_rows() {
        let mut l = listing("https://x/1", Variant::Air, Some("2020"), true, Some(20000));
        l.attributes.storage = FieldValue::Ambiguous(vec!["1".to_string(), "1000".to_string()]);

        let mut out = Vec::new();
        write_rows(&mut out, &[l]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "date;variant;year;ram;storage;touchbar;m1;cpu_ghz;url;views;price");
        assert_eq!(lines[1], "15.3.2021;Air;2020;16;{1, 1000};;true;;https://x/1;10;20000");
    }

    #[test]
    fn test_export_all_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");
        let all = vec![listing("a", Variant::Pro, None, false, None)];

        export_all(&out, &all, &[], &all).unwrap();

        for name in ["all.csv", "airs.csv", "pros.csv"] {
            assert!(out.join(name).exists(), "{name} missing");
        }
        let airs = fs::read_to_string(out.join("airs.csv")).unwrap();
        assert_eq!(airs.lines().count(), 1);
    }
}
