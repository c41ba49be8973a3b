//! Catalog reference data as seen by the storefront.

use serde::{Deserialize, Serialize};

use super::cart::PurchaseType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    /// Short description used for image placeholders
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in-stock",
            Availability::OutOfStock => "out-of-stock",
        }
    }

    /// Unknown values are treated as out of stock.
    pub fn parse(value: &str) -> Self {
        match value {
            "in-stock" => Availability::InStock,
            _ => Availability::OutOfStock,
        }
    }
}

/// A catalog book. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: AuthorRef,
    pub genre: GenreRef,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_price: Option<f64>,
    #[serde(default)]
    pub cover_image: CoverImage,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub availability: Availability,
}

impl Book {
    /// Price charged for this book under the given purchase type; a missing
    /// price counts as zero.
    pub fn price_for(&self, kind: PurchaseType) -> f64 {
        match kind {
            PurchaseType::Buy => self.price,
            PurchaseType::Rent => self.rental_price,
        }
        .unwrap_or(0.0)
    }
}
