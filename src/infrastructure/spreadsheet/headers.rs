use std::collections::HashMap;

/// Make sheet headers usable as row keys.
///
/// Blank headers become `__EMPTY`, `__EMPTY_1`, ... and repeated headers get a
/// `_1`, `_2` suffix, so every column keeps its own key.
pub(super) fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for header in raw {
        let header = header.as_ref();
        let base = if header.trim().is_empty() {
            "__EMPTY".to_string()
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{}_{}", base, count);
            if !seen.contains_key(&name) {
                break;
            }
        }
        seen.entry(name.clone()).or_insert(0);
        headers.push(name);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_repeated_headers() {
        let headers = unique_headers(["Nombre", "", "Nombre", " ", "Nombre"]);
        assert_eq!(
            headers,
            vec!["Nombre", "__EMPTY", "Nombre_1", "__EMPTY_1", "Nombre_2"]
        );
    }
}
