use csv::ReaderBuilder;

use super::headers::unique_headers;
use crate::domain::error::{AppError, Result};
use crate::domain::records::{CellValue, RawRow};

/// Read a delimited text export. UTF-8 first, Windows-1252 as fallback.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let content = decode(bytes);
    let delimiter = detect_delimiter(&content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = unique_headers(
        reader
            .headers()
            .map_err(|e| AppError::FileRead(format!("Failed to read CSV headers: {}", e)))?
            .iter(),
    );

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::FileRead(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;

        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = match record.get(idx) {
                    Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
                    _ => CellValue::Empty,
                };
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "CSV decoded");
    Ok(rows)
}

fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

/// Pick the delimiter (comma, semicolon, tab, pipe) with the most consistent
/// per-line count over the first lines
fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<_> = content.lines().take(10).collect();

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    if sample_lines.is_empty() {
        return best_delimiter;
    }

    for &delimiter in &candidates {
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_export_with_latin1_accents() {
        // "Teléfono" and "Muñoz" encoded as Windows-1252
        let bytes = b"Nombre;Tel\xe9fono\nMu\xf1oz;612345678\n;\n".to_vec();
        let rows = read_csv(&bytes).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Teléfono"), Some(&CellValue::Text("612345678".to_string())));
        assert_eq!(rows[0].get("Nombre"), Some(&CellValue::Text("Muñoz".to_string())));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let bytes = "\u{feff}DNI,Nombre\n1234Z,Ana\n".as_bytes().to_vec();
        let rows = read_csv(&bytes).unwrap();
        assert_eq!(rows[0].headers().next(), Some("DNI"));
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let rows = read_csv(b"Nombre,Movil,CUPS\nAna,600\n").unwrap();
        assert_eq!(rows[0].get("CUPS"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a\tb\n1\t2"), b'\t');
        assert_eq!(detect_delimiter("a,b\n1,2"), b',');
    }
}
