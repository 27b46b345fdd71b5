//! Relay connection pagination
//!
//! The collection resolvers fetch the full ordered row set for a table and
//! window it here. Cursors are "natural": the base64 of `["natural", index]`
//! where index is the row's position in the ordered set, so they stay valid
//! across `first`/`last`/`offset` combinations against the same ordering.

use async_graphql::Value;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Pagination arguments after cursor decoding
#[derive(Debug, Clone, Default)]
pub struct PageArgs {
    pub first: Option<usize>,
    pub last: Option<usize>,
    pub offset: Option<usize>,
    /// Decoded index of the `after` cursor
    pub after: Option<usize>,
    /// Decoded index of the `before` cursor
    pub before: Option<usize>,
}

/// One window over the ordered row set
#[derive(Debug)]
pub struct Page {
    /// (absolute index, row) pairs; the index produces the row's cursor
    pub nodes: Vec<(usize, Value)>,
    pub total_count: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Page {
    pub fn start_cursor(&self) -> Option<String> {
        self.nodes.first().map(|(i, _)| encode_cursor(*i))
    }

    pub fn end_cursor(&self) -> Option<String> {
        self.nodes.last().map(|(i, _)| encode_cursor(*i))
    }
}

pub fn encode_cursor(index: usize) -> String {
    BASE64.encode(format!("[\"natural\",{}]", index))
}

pub fn decode_cursor(cursor: &str) -> Option<usize> {
    let bytes = BASE64.decode(cursor).ok()?;
    let json: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let parts = json.as_array()?;
    match parts.as_slice() {
        [serde_json::Value::String(tag), serde_json::Value::Number(index)] if tag == "natural" => {
            index.as_u64().map(|i| i as usize)
        }
        _ => None,
    }
}

/// Window the ordered rows per the relay pagination algorithm
pub fn paginate(rows: Vec<Value>, args: &PageArgs) -> Page {
    let total = rows.len();
    let mut start = 0usize;
    let mut end = total;

    if let Some(after) = args.after {
        start = start.max(after.saturating_add(1));
    }
    if let Some(before) = args.before {
        end = end.min(before);
    }
    if let Some(offset) = args.offset {
        start = start.saturating_add(offset);
    }
    if let Some(first) = args.first {
        end = end.min(start.saturating_add(first));
    }
    if let Some(last) = args.last {
        start = start.max(end.saturating_sub(last));
    }
    let start = start.min(end).min(total);
    let end = end.min(total);

    let nodes = rows
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .collect();

    Page {
        nodes,
        total_count: total,
        has_next_page: end < total,
        has_previous_page: start > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Value> {
        (0..n).map(|i| Value::Number((i as i64).into())).collect()
    }

    fn indexes(page: &Page) -> Vec<usize> {
        page.nodes.iter().map(|(i, _)| *i).collect()
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = encode_cursor(3);
        assert_eq!(decode_cursor(&cursor), Some(3));
        assert_eq!(decode_cursor("garbage"), None);
    }

    #[test]
    fn test_no_args_returns_everything() {
        let page = paginate(rows(4), &PageArgs::default());
        assert_eq!(indexes(&page), vec![0, 1, 2, 3]);
        assert_eq!(page.total_count, 4);
        assert!(!page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn test_first_limits_and_flags_next() {
        let page = paginate(
            rows(5),
            &PageArgs {
                first: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(indexes(&page), vec![0, 1]);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn test_last_takes_tail() {
        let page = paginate(
            rows(5),
            &PageArgs {
                last: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(indexes(&page), vec![3, 4]);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_after_resumes_past_cursor() {
        let page = paginate(
            rows(5),
            &PageArgs {
                after: Some(1),
                first: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(indexes(&page), vec![2, 3]);
        assert!(page.has_next_page);
        assert!(page.has_previous_page);
    }

    #[test]
    fn test_before_truncates() {
        let page = paginate(
            rows(5),
            &PageArgs {
                before: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(indexes(&page), vec![0, 1, 2]);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_offset_skips() {
        let page = paginate(
            rows(5),
            &PageArgs {
                offset: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(indexes(&page), vec![3, 4]);
        assert!(page.has_previous_page);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let page = paginate(
            rows(2),
            &PageArgs {
                offset: Some(10),
                ..Default::default()
            },
        );
        assert!(page.nodes.is_empty());
        assert_eq!(page.total_count, 2);
        assert!(page.start_cursor().is_none());
    }

    #[test]
    fn test_cursors_are_absolute() {
        let page = paginate(
            rows(5),
            &PageArgs {
                offset: Some(2),
                first: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(page.start_cursor(), Some(encode_cursor(2)));
        assert_eq!(page.end_cursor(), Some(encode_cursor(3)));
    }
}
