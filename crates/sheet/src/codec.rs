//! Conversion between a [`Book`] and the bytes stored on disk.

use crate::book::Book;
use crate::error::Result;

/// Encodes and decodes whole workbooks.
///
/// Implementations own the container format; everything above this trait
/// works on the in-memory [`Book`] model only.
pub trait WorkbookCodec {
    /// Parse stored bytes into a book
    fn decode(&self, bytes: &[u8]) -> Result<Book>;

    /// Serialize a book into bytes suitable for storage
    fn encode(&self, book: &Book) -> Result<Vec<u8>>;
}

impl<C: WorkbookCodec + ?Sized> WorkbookCodec for &C {
    fn decode(&self, bytes: &[u8]) -> Result<Book> {
        (**self).decode(bytes)
    }

    fn encode(&self, book: &Book) -> Result<Vec<u8>> {
        (**self).encode(book)
    }
}

impl<C: WorkbookCodec + ?Sized> WorkbookCodec for Box<C> {
    fn decode(&self, bytes: &[u8]) -> Result<Book> {
        (**self).decode(bytes)
    }

    fn encode(&self, book: &Book) -> Result<Vec<u8>> {
        (**self).encode(book)
    }
}
