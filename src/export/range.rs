use std::collections::BTreeSet;

/// Parse the host's numeric export-range syntax into sorted, de-duplicated
/// 0-based frame indices.
///
/// Tokens are comma-separated; each is a 1-based index (`"3"`), an inclusive
/// range (`"5-7"`), or an open-ended range (`"10-"`). Out-of-range values
/// clamp to the valid index span. Malformed tokens are dropped with a warning,
/// never fatal. An empty result means "export nothing" — callers must not
/// reinterpret it as "export all".
pub fn parse_frame_ranges(input: &str, frame_count: usize) -> Vec<usize> {
    let mut indices = BTreeSet::new();
    if frame_count == 0 {
        return Vec::new();
    }

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once('-') {
            let Ok(start) = start.trim().parse::<usize>() else {
                tracing::warn!(token, "dropping malformed range token");
                continue;
            };
            let end = match end.trim() {
                "" => frame_count,
                text => match text.parse::<usize>() {
                    Ok(v) => v,
                    Err(_) => {
                        tracing::warn!(token, "dropping malformed range token");
                        continue;
                    }
                },
            };
            if start > end {
                tracing::warn!(token, "dropping inverted range token");
                continue;
            }
            let start = start.clamp(1, frame_count);
            let end = end.clamp(1, frame_count);
            indices.extend(start..=end);
        } else {
            match token.parse::<usize>() {
                Ok(v) => {
                    indices.insert(v.clamp(1, frame_count));
                }
                Err(_) => {
                    tracing::warn!(token, "dropping malformed range token");
                }
            }
        }
    }

    indices.into_iter().map(|v| v - 1).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/export/range.rs"]
mod tests;
