use std::io::Write;
use std::path::Path;

use harvest_core::HeritageRecord;
use serde::Serialize;

use crate::{ExportError, ExportFormat};

/// Byte-order mark so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

const HERITAGE_HEADER: [&str; 4] = ["country", "site_name", "type", "year"];

/// Quote a field when it holds a delimiter, quote or line break.
pub fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields
        .iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Render a header plus rows as CSV text (no BOM).
pub fn table_csv<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = String::new();
    csv_row(&mut out, header);
    for row in rows {
        csv_row(&mut out, row);
    }
    out
}

/// The four-column heritage table, in record order.
pub fn heritage_csv(records: &[HeritageRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.country.clone(),
                r.site_name.clone(),
                r.heritage_type.as_str().to_string(),
                r.year.clone(),
            ]
        })
        .collect();
    table_csv(&HERITAGE_HEADER, &rows)
}

pub fn heritage_json(records: &[HeritageRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write the heritage table to `path`, creating parent directories.
///
/// CSV output is prefixed with a UTF-8 BOM.
pub fn export_heritage(
    records: &[HeritageRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = match format {
        ExportFormat::Csv => format!("{UTF8_BOM}{}", heritage_csv(records)),
        ExportFormat::Json => heritage_json(records)?,
    };
    write_file(path, &content)?;
    tracing::info!(path = %path.display(), rows = records.len(), "heritage table written");
    Ok(())
}

/// Write a plain CSV table (no BOM) to `path`.
pub fn write_table_csv<S: AsRef<str>>(
    path: &Path,
    header: &[&str],
    rows: &[Vec<S>],
) -> Result<(), ExportError> {
    write_file(path, &table_csv(header, rows))
}

/// Pretty-print any serializable value as JSON to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let content = serde_json::to_string_pretty(value)?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::HeritageType;

    fn record(country: &str, name: &str, t: HeritageType, year: &str) -> HeritageRecord {
        HeritageRecord {
            country: country.to_string(),
            site_name: name.to_string(),
            heritage_type: t,
            year: year.to_string(),
        }
    }

    #[test]
    fn test_csv_escape_quotes() {
        assert_eq!(csv_escape(r#"He said "hi""#), r#""He said ""hi""""#);
    }

    #[test]
    fn test_csv_escape_comma() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_csv_escape_newline() {
        assert_eq!(csv_escape("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn test_csv_escape_clean() {
        assert_eq!(csv_escape("Kakadu National Park"), "Kakadu National Park");
    }

    #[test]
    fn heritage_csv_has_fixed_header_and_order() {
        let records = vec![
            record("Australia", "Kakadu National Park", HeritageType::Mixed, "1981"),
            record("Italy", "Historic Centre of Rome, the Holy See", HeritageType::Cultural, "1980"),
        ];
        let csv = heritage_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "country,site_name,type,year");
        assert_eq!(lines[1], "Australia,Kakadu National Park,Mixed,1981");
        assert_eq!(lines[2], "Italy,\"Historic Centre of Rome, the Holy See\",Cultural,1980");
    }

    #[test]
    fn heritage_json_uses_type_key() {
        let records = vec![record("Peru", "Machu Picchu", HeritageType::Mixed, "1983")];
        let json = heritage_json(&records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "Mixed");
        assert_eq!(value[0]["year"], "1983");
    }

    #[test]
    fn csv_export_starts_with_bom_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("heritage.csv");
        let records = vec![record("Belgium", "Flemish Béguinages", HeritageType::Cultural, "1998")];
        export_heritage(&records, ExportFormat::Csv, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains("Belgium,Flemish Béguinages,Cultural,1998"));
    }

    #[test]
    fn empty_table_is_header_only() {
        let csv = heritage_csv(&[]);
        assert_eq!(csv, "country,site_name,type,year\n");
    }

    #[test]
    fn plain_table_has_no_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.csv");
        let rows = vec![vec!["DJIA", "46,000.12", "+0.4%"]];
        write_table_csv(&path, &["Symbol", "StockPosition", "ChangePct"], &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Symbol,StockPosition,ChangePct\nDJIA,\"46,000.12\",+0.4%\n"
        );
    }
}
