//! Food listing: which read a `GET /v1/api/foodItems` request performs.
//!
//! The query parameters pick exactly one [`ListMode`], by fixed precedence;
//! parameters are never combined. Selecting the mode and turning it into a
//! [`FoodQuery`] are both pure, so the whole decision is made before the
//! store is touched.

use serde::Deserialize;
use thiserror::Error;

use super::auth::{AuthError, SessionIdentity};
use crate::db::{FoodFilter, FoodQuery, FoodSort};

/// Items returned when no parameter selects a mode.
pub const DEFAULT_LIMIT: u64 = 6;

/// Items returned by the best-sellers mode.
pub const TOP_LIMIT: u64 = 6;

/// Page size when `page` is given without `size`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest accepted `size`.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest number of items a page may skip. The store takes skips as `i64`.
pub const MAX_SKIP: u64 = i64::MAX.unsigned_abs();

/// Raw query parameters of the listing endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(alias = "category")]
    pub food_category: Option<String>,
    pub email: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub top_item: Option<String>,
}

/// A listing parameter that could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListParamsError {
    #[error("page must be a non-negative integer (got {0:?})")]
    InvalidPage(String),

    #[error("size must be an integer between 1 and 100 (got {0:?})")]
    InvalidSize(String),

    #[error("page {page} with size {size} is out of range")]
    PageOutOfRange { page: u64, size: u64 },
}

/// The read a listing request performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    /// Items in one category.
    Category(String),
    /// Items listed by one owner. Only the owner may ask.
    Owner(String),
    /// A window of the whole collection in store order.
    Page { page: u64, size: u64 },
    /// Items whose name contains the term.
    Search(String),
    /// Best sellers.
    Top,
    /// The first few items.
    Default,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl ListMode {
    /// Pick the mode for a set of parameters.
    ///
    /// # Errors
    ///
    /// Returns `ListParamsError` if paging was selected with a malformed
    /// `page` or `size`, or with a page that starts beyond [`MAX_SKIP`].
    pub fn select(params: &ListParams) -> Result<Self, ListParamsError> {
        if let Some(category) = present(params.food_category.as_ref()) {
            return Ok(Self::Category(category.to_owned()));
        }
        if let Some(email) = present(params.email.as_ref()) {
            return Ok(Self::Owner(email.to_owned()));
        }
        if let Some(page) = present(params.page.as_ref()) {
            let page = page
                .parse::<u64>()
                .map_err(|_| ListParamsError::InvalidPage(page.to_owned()))?;
            let size = match present(params.size.as_ref()) {
                None => DEFAULT_PAGE_SIZE,
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
                    .ok_or_else(|| ListParamsError::InvalidSize(raw.to_owned()))?,
            };
            if page.checked_mul(size).is_none_or(|skip| skip > MAX_SKIP) {
                return Err(ListParamsError::PageOutOfRange { page, size });
            }
            return Ok(Self::Page { page, size });
        }
        if let Some(term) = present(params.search.as_ref()) {
            return Ok(Self::Search(term.to_owned()));
        }
        if present(params.top_item.as_ref()).is_some() {
            return Ok(Self::Top);
        }
        Ok(Self::Default)
    }

    /// The owner email this mode is restricted to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Owner(email) => Some(email),
            _ => None,
        }
    }

    /// Check that `session` may perform this read.
    ///
    /// Only the owner mode is restricted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredential` when the owner mode is requested
    /// without a session, and `AuthError::Forbidden` when the session belongs
    /// to someone else.
    pub fn authorize(&self, session: Option<&SessionIdentity>) -> Result<(), AuthError> {
        let Some(owner) = self.owner() else {
            return Ok(());
        };
        let session = session.ok_or(AuthError::MissingCredential)?;
        if session.email.matches(owner) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// The store query for this mode.
    #[must_use]
    pub fn query(&self) -> FoodQuery {
        match self {
            Self::Category(category) => FoodQuery::matching(FoodFilter::Category(category.clone())),
            Self::Owner(email) => FoodQuery::matching(FoodFilter::Owner(email.clone())),
            Self::Page { page, size } => FoodQuery {
                skip: page.saturating_mul(*size),
                limit: Some(*size),
                ..FoodQuery::matching(FoodFilter::All)
            },
            Self::Search(term) => FoodQuery::matching(FoodFilter::NameContains(term.clone())),
            Self::Top => FoodQuery {
                sort: FoodSort::OrderedCountDesc,
                limit: Some(TOP_LIMIT),
                ..FoodQuery::matching(FoodFilter::All)
            },
            Self::Default => FoodQuery {
                limit: Some(DEFAULT_LIMIT),
                ..FoodQuery::matching(FoodFilter::All)
            },
        }
    }
}
