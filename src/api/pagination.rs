// src/api/pagination.rs
//! Cursor pagination over list endpoints.

use super::responses::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use futures::stream::{self, Stream, TryStreamExt};

/// Everything collected from a paginated endpoint.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    pub has_more: bool,
}

/// Fetches all pages using async closures directly.
///
/// `fetch_fn` receives the page size and the cursor of the page to load.
/// With `max_pages`, collection stops early and `has_more` tells whether
/// anything was left behind.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: Option<u32>,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;
    let mut has_more = true;

    while has_more {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(NOTION_API_PAGE_SIZE as u32, cursor.take()).await?;
        pages_fetched += 1;
        items.extend(response.results);

        cursor = response.next_cursor;
        has_more = response.has_more && cursor.is_some();
    }

    log::debug!("Fetched {} item(s) over {} page(s)", items.len(), pages_fetched);

    Ok(PaginationResult {
        items,
        pages_fetched,
        has_more,
    })
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream items from a paginated endpoint, loading pages on demand.
pub fn paginate<T, F, Fut>(fetch_fn: F) -> impl Stream<Item = Result<T, AppError>>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    stream::try_unfold(
        (fetch_fn, Cursor::Start),
        |(mut fetch_fn, cursor)| async move {
            let start_cursor = match cursor {
                Cursor::Done => return Ok::<_, AppError>(None),
                Cursor::Start => None,
                Cursor::Next(cursor) => Some(cursor),
            };

            let page = fetch_fn(NOTION_API_PAGE_SIZE as u32, start_cursor).await?;
            let next = match page.next_cursor {
                Some(cursor) if page.has_more => Cursor::Next(cursor),
                _ => Cursor::Done,
            };

            let items = stream::iter(page.results.into_iter().map(Ok::<T, AppError>));
            Ok::<_, AppError>(Some((items, (fetch_fn, next))))
        },
    )
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Mutex;

    fn pages() -> Vec<PaginatedResponse<u32>> {
        vec![
            PaginatedResponse {
                object: "list".to_string(),
                results: vec![1, 2],
                next_cursor: Some("b".to_string()),
                has_more: true,
            },
            PaginatedResponse {
                object: "list".to_string(),
                results: vec![3],
                next_cursor: None,
                has_more: false,
            },
        ]
    }

    #[tokio::test]
    async fn test_fetch_all_pages_follows_cursors() {
        let cursors = Mutex::new(Vec::new());
        let responses = Mutex::new(pages().into_iter());
        let (cursors_ref, responses_ref) = (&cursors, &responses);

        let result = fetch_all_pages(
            move |_, cursor| async move {
                cursors_ref.lock().unwrap().push(cursor);
                Ok::<_, AppError>(responses_ref.lock().unwrap().next().unwrap())
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3]);
        assert_eq!(result.pages_fetched, 2);
        assert!(!result.has_more);
        assert_eq!(
            *cursors.lock().unwrap(),
            vec![None, Some("b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_pages_respects_limit() {
        let responses = Mutex::new(pages().into_iter());
        let responses_ref = &responses;

        let result = fetch_all_pages(
            move |_, _| async move { Ok::<_, AppError>(responses_ref.lock().unwrap().next().unwrap()) },
            Some(1),
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2]);
        assert!(result.has_more);
    }

    #[tokio::test]
    async fn test_paginate_streams_items() {
        let responses = Mutex::new(pages().into_iter());
        let responses_ref = &responses;

        let items: Vec<u32> = paginate(move |_, _| async move {
            Ok::<_, AppError>(responses_ref.lock().unwrap().next().unwrap())
        })
        .map(|item| item.unwrap())
        .collect()
        .await;

        assert_eq!(items, vec![1, 2, 3]);
    }
}
