//! Per-user wishlist/cart document and the updates applied to it inside a
//! store transaction.

use serde::{Deserialize, Serialize};

use super::book::Book;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    Buy,
    Rent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub book: Book,
    #[serde(rename = "type")]
    pub kind: PurchaseType,
}

/// The remote document holding both collections for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub wishlist: Vec<Book>,
    #[serde(default)]
    pub cart: Vec<CartEntry>,
}

/// Array-style mutations, keyed by book id.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentUpdate {
    WishlistUnion(Book),
    WishlistRemove(String),
    CartUnion(CartEntry),
    CartRemove(String),
    ClearCart,
}

impl UserDocument {
    /// Document created on first write for a user.
    pub fn from_update(update: &DocumentUpdate) -> Self {
        let mut document = Self::default();
        document.apply(update);
        document
    }

    /// Applies the update in place and reports whether anything changed.
    ///
    /// Unions never duplicate a book id, and a cart union for a book that is
    /// already in the cart keeps the existing entry untouched.
    pub fn apply(&mut self, update: &DocumentUpdate) -> bool {
        match update {
            DocumentUpdate::WishlistUnion(book) => {
                if self.in_wishlist(&book.id) {
                    return false;
                }
                self.wishlist.push(book.clone());
                true
            }
            DocumentUpdate::WishlistRemove(book_id) => {
                let before = self.wishlist.len();
                self.wishlist.retain(|b| &b.id != book_id);
                self.wishlist.len() != before
            }
            DocumentUpdate::CartUnion(entry) => {
                if self.in_cart(&entry.book.id) {
                    return false;
                }
                self.cart.push(entry.clone());
                true
            }
            DocumentUpdate::CartRemove(book_id) => {
                let before = self.cart.len();
                self.cart.retain(|e| &e.book.id != book_id);
                self.cart.len() != before
            }
            DocumentUpdate::ClearCart => {
                let changed = !self.cart.is_empty();
                self.cart.clear();
                changed
            }
        }
    }

    pub fn in_wishlist(&self, book_id: &str) -> bool {
        self.wishlist.iter().any(|b| b.id == book_id)
    }

    pub fn in_cart(&self, book_id: &str) -> bool {
        self.cart.iter().any(|e| e.book.id == book_id)
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.iter().map(|e| e.book.price_for(e.kind)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{AuthorRef, Availability, CoverImage, GenreRef};

    fn book(id: &str, price: Option<f64>, rental_price: Option<f64>) -> Book {
        Book {
            id: id.to_string(),
            title: format!("Book {}", id),
            author: AuthorRef {
                id: "a1".to_string(),
                name: "Author".to_string(),
            },
            genre: GenreRef {
                id: "g1".to_string(),
                name: "Fiction".to_string(),
            },
            price,
            rental_price,
            cover_image: CoverImage::default(),
            description: String::new(),
            availability: Availability::InStock,
        }
    }

    #[test]
    fn wishlist_union_is_keyed_by_id() {
        let mut doc = UserDocument::default();
        assert!(doc.apply(&DocumentUpdate::WishlistUnion(book("1", Some(10.0), None))));
        // Same id, different payload: still a duplicate
        assert!(!doc.apply(&DocumentUpdate::WishlistUnion(book("1", Some(12.0), None))));
        assert_eq!(doc.wishlist.len(), 1);
        assert_eq!(doc.wishlist[0].price, Some(10.0));
    }

    #[test]
    fn cart_union_does_not_upsert_type() {
        let mut doc = UserDocument::default();
        let b = book("1", Some(399.0), Some(49.0));
        doc.apply(&DocumentUpdate::CartUnion(CartEntry {
            book: b.clone(),
            kind: PurchaseType::Buy,
        }));
        let changed = doc.apply(&DocumentUpdate::CartUnion(CartEntry {
            book: b,
            kind: PurchaseType::Rent,
        }));
        assert!(!changed);
        assert_eq!(doc.cart.len(), 1);
        assert_eq!(doc.cart[0].kind, PurchaseType::Buy);
    }

    #[test]
    fn removals_report_missing_ids_as_unchanged() {
        let mut doc = UserDocument::from_update(&DocumentUpdate::WishlistUnion(book(
            "1", None, None,
        )));
        assert!(!doc.apply(&DocumentUpdate::WishlistRemove("2".to_string())));
        assert!(doc.apply(&DocumentUpdate::WishlistRemove("1".to_string())));
        assert!(doc.wishlist.is_empty());
        assert!(!doc.apply(&DocumentUpdate::CartRemove("1".to_string())));
        assert!(!doc.apply(&DocumentUpdate::ClearCart));
    }

    #[test]
    fn cart_total_uses_rental_price_for_rentals() {
        let mut doc = UserDocument::default();
        doc.apply(&DocumentUpdate::CartUnion(CartEntry {
            book: book("1", Some(399.0), None),
            kind: PurchaseType::Buy,
        }));
        doc.apply(&DocumentUpdate::CartUnion(CartEntry {
            book: book("2", Some(899.0), Some(99.0)),
            kind: PurchaseType::Rent,
        }));
        // Rental without a rental price contributes nothing
        doc.apply(&DocumentUpdate::CartUnion(CartEntry {
            book: book("3", Some(250.0), None),
            kind: PurchaseType::Rent,
        }));
        assert_eq!(doc.cart_total(), 498.0);
    }

    #[test]
    fn document_serializes_with_type_field() {
        let doc = UserDocument::from_update(&DocumentUpdate::CartUnion(CartEntry {
            book: book("1", Some(5.0), None),
            kind: PurchaseType::Rent,
        }));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["cart"][0]["type"], "rent");
        assert_eq!(json["cart"][0]["book"]["coverImage"]["url"], "");
        assert_eq!(json["wishlist"], serde_json::json!([]));
    }
}
