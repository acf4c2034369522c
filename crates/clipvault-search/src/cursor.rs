//! Offset cursor protocol
//!
//! A cursor is the decimal encoding of an absolute offset into the ordered
//! sequence computed for the current request. Offsets are not stable when the
//! underlying collection changes between requests: an insert or delete can
//! make the next page skip or repeat a record.

use clipvault_core::Page;

/// Decode a cursor into an offset; anything unparseable means the start
pub fn decode_offset(cursor: Option<&str>) -> usize {
    cursor
        .and_then(|c| c.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

pub fn encode_offset(offset: usize) -> String {
    offset.to_string()
}

/// Slice one page out of a fully computed sequence
pub fn paginate<T>(items: Vec<T>, cursor: Option<&str>, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let offset = decode_offset(cursor);
    let end = offset.saturating_add(page_size);
    let is_done = end >= items.len();

    let page = items.into_iter().skip(offset).take(page_size).collect();

    Page {
        page,
        is_done,
        continue_cursor: if is_done { None } else { Some(encode_offset(end)) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_cursor_is_offset_zero() {
        assert_eq!(decode_offset(None), 0);
        assert_eq!(decode_offset(Some("")), 0);
        assert_eq!(decode_offset(Some("abc")), 0);
        assert_eq!(decode_offset(Some("-3")), 0);
        assert_eq!(decode_offset(Some("1.5")), 0);
        assert_eq!(decode_offset(Some("7")), 7);
    }

    #[test]
    fn test_first_page() {
        let page = paginate((0..5).collect(), None, 2);
        assert_eq!(page.page, vec![0, 1]);
        assert!(!page.is_done);
        assert_eq!(page.continue_cursor.as_deref(), Some("2"));
    }

    #[test]
    fn test_exact_fit_is_done() {
        let page = paginate((0..4).collect(), Some("2"), 2);
        assert_eq!(page.page, vec![2, 3]);
        assert!(page.is_done);
        assert_eq!(page.continue_cursor, None);
    }

    #[test]
    fn test_offset_past_end() {
        let page = paginate((0..3).collect::<Vec<i32>>(), Some("10"), 2);
        assert!(page.page.is_empty());
        assert!(page.is_done);
    }

    #[test]
    fn test_empty_sequence() {
        let page = paginate(Vec::<i32>::new(), None, 20);
        assert!(page.page.is_empty());
        assert!(page.is_done);
        assert_eq!(page.continue_cursor, None);
    }

    #[test]
    fn test_following_cursors_reproduces_sequence() {
        let items: Vec<i32> = (0..23).collect();
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = paginate(items.clone(), cursor.as_deref(), 5);
            collected.extend(page.page);
            if page.is_done {
                break;
            }
            cursor = page.continue_cursor;
        }

        assert_eq!(collected, items);
    }
}
