use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Local;
use tokio::sync::Mutex;

use crate::{errors::AppResult, models::Book};

/// Process-local book catalog: an insertion-ordered list plus the id counter.
///
/// Creates take the list lock before assigning an id and hold it across the
/// image write and the append, so ids stay strictly increasing in insertion
/// order even under concurrent requests. Nothing survives a restart.
pub struct CatalogStore {
    books: Mutex<Vec<Book>>,
    next_id: AtomicU64,
    upload_dir: PathBuf,
}

impl CatalogStore {
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            upload_dir: upload_dir.into(),
        }
    }

    /// Persist the uploaded image and append a new record.
    ///
    /// The image lands at `{upload_dir}/book_{id}{ext}` before the record is
    /// appended. An id consumed by a failed write is never reused; a gap in
    /// the sequence is acceptable, reuse is not.
    ///
    /// # Errors
    /// Returns an I/O error if writing the image file fails.
    pub async fn create(
        &self,
        title: String,
        author: String,
        publisher: String,
        image_bytes: &[u8],
        image_extension: &str,
    ) -> AppResult<Book> {
        let mut books = self.books.lock().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let filename = format!("book_{id}{image_extension}");
        tokio::fs::write(self.upload_dir.join(&filename), image_bytes).await?;

        let book = Book {
            id,
            title,
            author,
            publisher,
            image_url: format!("/images/{filename}"),
            created_at: Local::now().to_rfc3339(),
        };
        books.push(book.clone());

        tracing::debug!(id, image_url = %book.image_url, "book created");
        Ok(book)
    }

    /// Case-insensitive substring search over title, author and publisher
    /// (any field matching qualifies), preserving insertion order.
    ///
    /// Returns the window `[(page-1)*page_size ..][..page_size]` of the
    /// filtered list along with the full match count.
    pub async fn search(&self, query: &str, page: usize, page_size: usize) -> (Vec<Book>, usize) {
        let q = query.to_lowercase();
        let books = self.books.lock().await;

        let matches: Vec<&Book> = books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&q)
                    || b.author.to_lowercase().contains(&q)
                    || b.publisher.to_lowercase().contains(&q)
            })
            .collect();

        let total = matches.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let items = matches
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        (items, total)
    }
}
