//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Root of every REST endpoint.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Value sent in the `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// How many children a single append request may carry.
pub const NOTION_APPEND_BATCH_SIZE: usize = 100;

/// Environment variable holding the integration token.
pub const NOTION_API_KEY_ENV: &str = "NOTION_API_KEY";

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Attempts made for a request that fails with a retryable error.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled after each failure.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the delay between retries.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

/// Timeout for a single HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Parsing boundaries
// ---------------------------------------------------------------------------

/// Maximum element nesting the HTML parser descends into.
///
/// Rendering is recursive, so this bounds stack use on hostile input.
/// Real documents stay far below it.
pub const HTML_MAX_NESTING_DEPTH: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
