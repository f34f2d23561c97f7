//! Listing controller tests
//!
//! Scripted catalog pages drive pagination, the silent step-back past the
//! last page, filter persistence and the one-shot auto-resume.

use std::collections::HashMap;
use std::sync::Mutex;

use velo_common::{Error, Result};
use velo_console::controllers::listing::{ListingController, PhotoCatalog, PAGE_SIZE};
use velo_console::models::photo::PhotoSummary;
use velo_console::store::SessionStore;

struct ScriptedCatalog {
    /// Page number → photos on that page; missing pages are empty
    pages: HashMap<u32, Vec<PhotoSummary>>,
    fetched: Mutex<Vec<u32>>,
}

impl ScriptedCatalog {
    fn with_full_pages(full_pages: u32) -> Self {
        let mut pages = HashMap::new();
        for page in 1..=full_pages {
            let photos = (0..PAGE_SIZE)
                .map(|i| summary((page * 100 + i) as i64))
                .collect();
            pages.insert(page, photos);
        }
        Self {
            pages,
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched_pages(&self) -> Vec<u32> {
        self.fetched.lock().unwrap().clone()
    }
}

impl PhotoCatalog for &ScriptedCatalog {
    async fn fetch_page(
        &self,
        _cruise_id: i64,
        _date: &str,
        page: u32,
    ) -> Result<Vec<PhotoSummary>> {
        self.fetched.lock().unwrap().push(page);
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

fn summary(id: i64) -> PhotoSummary {
    PhotoSummary {
        id,
        photo_base64: String::new(),
        photo_date: "2024-03-15".to_string(),
        photo_status: "pending".to_string(),
    }
}

#[tokio::test]
async fn test_search_starts_at_page_one_and_persists_filter() {
    let catalog = ScriptedCatalog::with_full_pages(2);
    let store = SessionStore::in_memory().await.unwrap();
    let mut listing = ListingController::new(&catalog, store.clone());

    listing.search(3, "2024-03-15").await.unwrap();

    assert_eq!(listing.page(), 1);
    assert_eq!(listing.photos().len(), PAGE_SIZE as usize);
    assert!(listing.empty_message().is_none());

    let saved = store.saved_filter().await.unwrap();
    assert_eq!(saved.cruise_id, Some(3));
    assert_eq!(saved.date.as_deref(), Some("2024-03-15"));
    assert_eq!(saved.page, Some(1));
}

#[tokio::test]
async fn test_search_rejects_incomplete_date() {
    let catalog = ScriptedCatalog::with_full_pages(1);
    let store = SessionStore::in_memory().await.unwrap();
    let mut listing = ListingController::new(&catalog, store);

    let err = listing.search(3, "2024-03").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(catalog.fetched_pages().is_empty());
}

#[tokio::test]
async fn test_page_beyond_last_steps_back_and_refetches() {
    // Two pages of data; requesting page 3 must land on page 2
    let catalog = ScriptedCatalog::with_full_pages(2);
    let store = SessionStore::in_memory().await.unwrap();
    let mut listing = ListingController::new(&catalog, store.clone());

    listing.search(3, "2024-03-15").await.unwrap();
    listing.go_to_page(3).await.unwrap();

    assert_eq!(listing.page(), 2);
    assert!(!listing.photos().is_empty());
    assert!(listing.empty_message().is_none());
    assert_eq!(catalog.fetched_pages(), vec![1, 3, 2]);
    // The landing page is what persists
    assert_eq!(store.saved_filter().await.unwrap().page, Some(2));
}

#[tokio::test]
async fn test_next_and_previous_page() {
    let catalog = ScriptedCatalog::with_full_pages(3);
    let store = SessionStore::in_memory().await.unwrap();
    let mut listing = ListingController::new(&catalog, store);

    listing.search(3, "2024-03-15").await.unwrap();
    listing.next_page().await.unwrap();
    assert_eq!(listing.page(), 2);
    listing.previous_page().await.unwrap();
    assert_eq!(listing.page(), 1);

    // Page floor is 1
    listing.previous_page().await.unwrap();
    assert_eq!(listing.page(), 1);
}

#[tokio::test]
async fn test_empty_first_page_shows_message() {
    let catalog = ScriptedCatalog::with_full_pages(0);
    let store = SessionStore::in_memory().await.unwrap();
    let mut listing = ListingController::new(&catalog, store);

    listing.search(3, "2024-03-15").await.unwrap();

    assert_eq!(listing.page(), 1);
    assert!(listing.photos().is_empty());
    let message = listing.empty_message().unwrap();
    assert!(message.contains("2024-03-15"));
}

#[tokio::test]
async fn test_resume_restores_saved_filter_once() {
    let catalog = ScriptedCatalog::with_full_pages(3);
    let store = SessionStore::in_memory().await.unwrap();
    store.save_filter(3, "2024-03-15").await.unwrap();
    store.save_page(2).await.unwrap();

    let mut listing = ListingController::new(&catalog, store);

    assert!(listing.resume().await.unwrap());
    assert_eq!(listing.page(), 2);
    assert!(!listing.photos().is_empty());

    // Auto-search happens only once
    assert!(!listing.resume().await.unwrap());
    assert_eq!(catalog.fetched_pages(), vec![2]);
}

#[tokio::test]
async fn test_returning_from_detail_rearms_resume() {
    let catalog = ScriptedCatalog::with_full_pages(2);
    let store = SessionStore::in_memory().await.unwrap();
    store.save_filter(3, "2024-03-15").await.unwrap();

    let mut listing = ListingController::new(&catalog, store.clone());
    assert!(listing.resume().await.unwrap());
    assert!(!listing.resume().await.unwrap());

    // Coming back from a photo detail refreshes the list once more
    store.set_returning_from_detail().await.unwrap();
    assert!(listing.resume().await.unwrap());
    assert_eq!(catalog.fetched_pages(), vec![1, 1]);
}

#[tokio::test]
async fn test_resume_skips_invalid_saved_date() {
    let catalog = ScriptedCatalog::with_full_pages(1);
    let store = SessionStore::in_memory().await.unwrap();
    store.save_filter(3, "2024-03").await.unwrap();

    let mut listing = ListingController::new(&catalog, store);

    assert!(!listing.resume().await.unwrap());
    assert!(catalog.fetched_pages().is_empty());
}

#[tokio::test]
async fn test_resume_without_saved_filter_does_nothing() {
    let catalog = ScriptedCatalog::with_full_pages(1);
    let store = SessionStore::in_memory().await.unwrap();

    let mut listing = ListingController::new(&catalog, store);

    assert!(!listing.resume().await.unwrap());
    assert!(catalog.fetched_pages().is_empty());
}

#[tokio::test]
async fn test_resume_accepts_display_date_form() {
    let catalog = ScriptedCatalog::with_full_pages(1);
    let store = SessionStore::in_memory().await.unwrap();
    store.save_filter(3, "15/03/2024").await.unwrap();

    let mut listing = ListingController::new(&catalog, store);

    assert!(listing.resume().await.unwrap());
    assert_eq!(listing.page(), 1);
}

#[tokio::test]
async fn test_resume_past_last_page_steps_back() {
    // Saved page 5 but only 2 pages of data remain
    let catalog = ScriptedCatalog::with_full_pages(2);
    let store = SessionStore::in_memory().await.unwrap();
    store.save_filter(3, "2024-03-15").await.unwrap();
    store.save_page(5).await.unwrap();

    let mut listing = ListingController::new(&catalog, store.clone());

    assert!(listing.resume().await.unwrap());
    assert_eq!(listing.page(), 2);
    assert_eq!(store.saved_filter().await.unwrap().page, Some(2));
}
