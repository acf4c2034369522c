//! Token search over an owner's clips

use clipvault_core::{effective_page_size, Clip, OwnerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::paginate;
use crate::engine::QueryEngine;
use crate::error::Result;
use crate::tokenizer::tokenize;

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Clip>,

    /// Cursor for the next page; `None` once results are exhausted
    pub cursor: Option<String>,

    pub is_done: bool,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            cursor: None,
            is_done: true,
        }
    }
}

/// Tokens a clip can be found by: its tags, object key, angle and apparatus
pub fn searchable_tokens(clip: &Clip) -> Vec<String> {
    let mut parts: Vec<&str> = clip.tags.iter().map(String::as_str).collect();
    parts.push(&clip.object_key);
    parts.push(clip.angle.map(|angle| angle.as_str()).unwrap_or(""));
    parts.push(clip.apparatus.map(|apparatus| apparatus.as_str()).unwrap_or(""));
    tokenize(&parts.join(" "))
}

/// Every query token must overlap some search token, in either direction
///
/// Overlap means one token is a substring of the other, so "hand" finds
/// "handstand" and "handstands" finds "handstand". There is no typo
/// tolerance.
pub fn matches_query(query_tokens: &[String], search_tokens: &[String]) -> bool {
    query_tokens.iter().all(|query| {
        search_tokens
            .iter()
            .any(|token| token.contains(query.as_str()) || query.contains(token.as_str()))
    })
}

impl QueryEngine {
    /// Search an owner's clips, newest first
    ///
    /// Blank queries return an empty, finished page without reading the
    /// store. `limit` of `None` or zero means the default page size.
    pub async fn search_clips(
        &self,
        owner: &OwnerId,
        query: &str,
        limit: Option<usize>,
        cursor: Option<&str>,
    ) -> Result<SearchPage> {
        if query.trim().is_empty() {
            return Ok(SearchPage::empty());
        }
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(SearchPage::empty());
        }

        let candidates = self.owner_clips(owner, None).await?;
        let scanned = candidates.len();

        let matched: Vec<Clip> = candidates
            .into_iter()
            .filter(|clip| matches_query(&query_tokens, &searchable_tokens(clip)))
            .collect();

        debug!(
            "Search {:?} for {}: {} of {} clips matched",
            query_tokens,
            owner,
            matched.len(),
            scanned
        );

        let page = paginate(matched, cursor, effective_page_size(limit));
        Ok(SearchPage {
            results: page.page,
            cursor: page.continue_cursor,
            is_done: page.is_done,
        })
    }
}
