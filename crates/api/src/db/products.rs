//! Product catalog repository.

use serde::Deserialize;

use levelup_core::{Clp, ProductId};

use super::{Db, RepositoryError};
use crate::models::Product;

/// Category assigned when the client leaves it out.
const DEFAULT_CATEGORY: &str = "Consolas";

/// Input for creating a product. Doubles as the request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<Clp>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub specifications: String,
    pub category: Option<String>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub is_top_selling: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
}

/// Partial product update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Clp>,
    pub image_url: Option<String>,
    pub specifications: Option<String>,
    pub category: Option<String>,
    pub count_in_stock: Option<u32>,
    pub is_top_selling: Option<bool>,
    pub rating: Option<f64>,
    pub num_reviews: Option<u32>,
}

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    db: &'a Db,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List the whole catalog in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Product> {
        self.db.read().products.iter().cloned().collect()
    }

    /// List the products flagged for the top-selling strip.
    #[must_use]
    pub fn list_top_selling(&self) -> Vec<Product> {
        self.db
            .read()
            .products
            .iter()
            .filter(|p| p.is_top_selling)
            .cloned()
            .collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        self.db
            .read()
            .products
            .get(id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank or the
    /// price is below 1 peso.
    pub fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let name = required_name(new.name.as_deref())?;
        let price = new.price.ok_or_else(|| {
            RepositoryError::Validation("price is required".to_owned())
        })?;
        validate_price(price)?;

        let id = ProductId::generate();
        let product = Product {
            id,
            name,
            description: new.description,
            price,
            image_url: new.image_url,
            specifications: new.specifications,
            category: new
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            count_in_stock: new.count_in_stock,
            is_top_selling: new.is_top_selling,
            rating: new.rating,
            num_reviews: new.num_reviews,
        };

        let mut tables = self.db.write();
        tables.products.insert(id.as_uuid(), product.clone());

        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    /// Returns `RepositoryError::Validation` if a provided name is blank or
    /// a provided price is below 1 peso.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, RepositoryError> {
        if let Some(name) = patch.name.as_deref() {
            required_name(Some(name))?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let mut tables = self.db.write();
        let product = tables
            .products
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = image_url;
        }
        if let Some(specifications) = patch.specifications {
            product.specifications = specifications;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(count_in_stock) = patch.count_in_stock {
            product.count_in_stock = count_in_stock;
        }
        if let Some(is_top_selling) = patch.is_top_selling {
            product.is_top_selling = is_top_selling;
        }
        if let Some(rating) = patch.rating {
            product.rating = rating;
        }
        if let Some(num_reviews) = patch.num_reviews {
            product.num_reviews = num_reviews;
        }

        Ok(product.clone())
    }

    /// Remove a product from the catalog.
    ///
    /// Orders keep their snapshots; their lines simply stop resolving.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.db
            .write()
            .products
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

fn required_name(name: Option<&str>) -> Result<String, RepositoryError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.to_owned()),
        _ => Err(RepositoryError::Validation("name is required".to_owned())),
    }
}

fn validate_price(price: Clp) -> Result<(), RepositoryError> {
    if price.as_i64() < 1 {
        return Err(RepositoryError::Validation(
            "price must be at least 1 peso".to_owned(),
        ));
    }
    Ok(())
}
