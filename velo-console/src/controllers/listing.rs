//! Photo listing controller
//!
//! Paginated photo summaries for a (cruise, date) filter. Fixed page size,
//! silent step-back when a requested page lies beyond the last non-empty
//! page, filter persistence across sessions and one-shot auto-resume.

use crate::models::photo::PhotoSummary;
use crate::services::photos::PhotosClient;
use crate::store::SessionStore;
use velo_common::{time, Error, Result};

/// Fixed page size for all listing fetches
pub const PAGE_SIZE: u32 = 10;

/// Seam between the listing controller and the photo catalog endpoint
#[allow(async_fn_in_trait)]
pub trait PhotoCatalog {
    async fn fetch_page(&self, cruise_id: i64, date: &str, page: u32)
        -> Result<Vec<PhotoSummary>>;
}

impl PhotoCatalog for PhotosClient<'_> {
    async fn fetch_page(
        &self,
        cruise_id: i64,
        date: &str,
        page: u32,
    ) -> Result<Vec<PhotoSummary>> {
        self.list(cruise_id, date, page).await
    }
}

/// Pagination and filter state for the listing screen
pub struct ListingController<C: PhotoCatalog> {
    catalog: C,
    store: SessionStore,
    cruise_id: Option<i64>,
    date: Option<String>,
    page: u32,
    photos: Vec<PhotoSummary>,
    empty_message: Option<String>,
    auto_searched: bool,
}

impl<C: PhotoCatalog> ListingController<C> {
    pub fn new(catalog: C, store: SessionStore) -> Self {
        Self {
            catalog,
            store,
            cruise_id: None,
            date: None,
            page: 1,
            photos: Vec::new(),
            empty_message: None,
            auto_searched: false,
        }
    }

    pub fn photos(&self) -> &[PhotoSummary] {
        &self.photos
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// "No photos" message for an empty first page, None otherwise
    pub fn empty_message(&self) -> Option<&str> {
        self.empty_message.as_deref()
    }

    /// Run a fresh search from page 1 and persist the filter
    pub async fn search(&mut self, cruise_id: i64, date: &str) -> Result<()> {
        if !time::is_valid_complete_date(date) {
            return Err(Error::Validation(format!("Incomplete or invalid date: {date}")));
        }
        self.cruise_id = Some(cruise_id);
        self.date = Some(date.to_string());
        self.page = 1;
        self.fetch_current().await?;

        self.store.save_filter(cruise_id, date).await?;
        self.store.save_page(self.page).await?;
        Ok(())
    }

    /// Jump to a page of the current filter, persisting the landing page
    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        self.page = page.max(1);
        self.fetch_current().await?;
        self.store.save_page(self.page).await
    }

    pub async fn next_page(&mut self) -> Result<()> {
        self.go_to_page(self.page + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<()> {
        self.go_to_page(self.page.saturating_sub(1)).await
    }

    /// Restore the persisted filter and auto-search once when it is valid
    /// and complete. Back-navigation from a photo detail re-arms the
    /// auto-search so the list refreshes. Returns true when a search ran.
    pub async fn resume(&mut self) -> Result<bool> {
        let returning = self.store.take_returning_from_detail().await?;
        if self.auto_searched && !returning {
            return Ok(false);
        }
        self.auto_searched = true;

        let saved = self.store.saved_filter().await?;

        let (cruise_id, date) = match (saved.cruise_id, saved.date) {
            (Some(cruise_id), Some(date)) if time::is_valid_complete_date(&date) => {
                (cruise_id, date)
            }
            _ => return Ok(false),
        };

        self.cruise_id = Some(cruise_id);
        self.date = Some(date);
        self.page = saved.page.unwrap_or(1).max(1);
        tracing::debug!(cruise_id, page = self.page, returning, "resuming saved listing filter");
        self.fetch_current().await?;
        self.store.save_page(self.page).await?;
        Ok(true)
    }

    /// Fetch the current page. An empty result beyond page 1 means the page
    /// is past the last non-empty one: silently step back and refetch
    /// instead of showing an empty page.
    async fn fetch_current(&mut self) -> Result<()> {
        let cruise_id = self
            .cruise_id
            .ok_or_else(|| Error::Validation("Select a cruise and date first".to_string()))?;
        let date = self
            .date
            .clone()
            .ok_or_else(|| Error::Validation("Select a cruise and date first".to_string()))?;

        let mut photos = self.catalog.fetch_page(cruise_id, &date, self.page).await?;
        while photos.is_empty() && self.page > 1 {
            self.page -= 1;
            tracing::debug!(page = self.page, "page beyond last result, stepping back");
            photos = self.catalog.fetch_page(cruise_id, &date, self.page).await?;
        }

        self.empty_message = if photos.is_empty() {
            Some(format!(
                "No photos found for {date} at the selected cruise"
            ))
        } else {
            None
        };
        self.photos = photos;
        Ok(())
    }
}
