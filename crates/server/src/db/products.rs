use chrono::Utc;
use fruit_porter_core::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Product;
use crate::store::query::{Predicate, Query};
use crate::store::views::{project_products, ProductView};
use crate::store::Database;

#[derive(Debug)]
pub struct NewProduct {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
    pub is_seasonal: bool,
}

/// Full replacement of a product's editable columns.
#[derive(Debug)]
pub struct ProductUpdate {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
    pub is_seasonal: bool,
}

/// Storefront catalog filters. `search` matches name or description,
/// case-insensitively; paging applies after filtering.
#[derive(Debug, Default)]
pub struct ProductListFilter {
    pub category: Option<CategoryId>,
    pub featured: bool,
    pub seasonal: bool,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// A best-seller row for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

pub struct ProductRepository<'a> {
    db: &'a mut Database,
}

impl<'a> ProductRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, new_product: NewProduct) -> ProductId {
        let id = self.db.issue_product_id();
        self.db.products.push(Product {
            id,
            category_id: new_product.category_id,
            name: new_product.name,
            description: new_product.description,
            price: new_product.price,
            original_price: new_product.original_price,
            image_url: new_product.image_url,
            stock: new_product.stock,
            is_featured: new_product.is_featured,
            is_seasonal: new_product.is_seasonal,
            created_at: Utc::now(),
        });
        id
    }

    /// The raw row, without the category join.
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.db.products.iter().find(|p| p.id == id).cloned()
    }

    /// The joined row shown to the storefront.
    pub fn find(&self, id: ProductId) -> Option<ProductView> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .run_one(&project_products(self.db))
    }

    /// Filtered catalog page plus the total match count before paging.
    pub fn list(&self, filter: &ProductListFilter) -> (Vec<ProductView>, usize) {
        let mut query = Query::new().newest_first();
        if let Some(category) = filter.category {
            query = query.filter(Predicate::CategoryEq(category));
        }
        if filter.featured {
            query = query.filter(Predicate::Featured);
        }
        if filter.seasonal {
            query = query.filter(Predicate::Seasonal);
        }
        let mut matched = query.run(&project_products(self.db));
        if let Some(needle) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let needle = needle.to_lowercase();
            matched.retain(|view| {
                view.product.name.to_lowercase().contains(&needle)
                    || view
                        .product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            });
        }
        let total = matched.len();
        let mut page: Vec<_> = matched.into_iter().skip(filter.offset).collect();
        if let Some(limit) = filter.limit {
            page.truncate(limit);
        }
        (page, total)
    }

    pub fn featured(&self, limit: usize) -> Vec<ProductView> {
        Query::new()
            .filter(Predicate::Featured)
            .newest_first()
            .limit(limit)
            .run(&project_products(self.db))
    }

    pub fn seasonal(&self, limit: usize) -> Vec<ProductView> {
        Query::new()
            .filter(Predicate::Seasonal)
            .newest_first()
            .limit(limit)
            .run(&project_products(self.db))
    }

    /// Every product for the admin console, newest first.
    pub fn all(&self) -> Vec<ProductView> {
        Query::new().newest_first().run(&project_products(self.db))
    }

    pub fn update(&mut self, id: ProductId, update: ProductUpdate) -> usize {
        self.db
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .map_or(0, |product| {
                product.category_id = update.category_id;
                product.name = update.name;
                product.description = update.description;
                product.price = update.price;
                product.original_price = update.original_price;
                product.image_url = update.image_url;
                product.stock = update.stock;
                product.is_featured = update.is_featured;
                product.is_seasonal = update.is_seasonal;
                1
            })
    }

    /// Adds `delta` to the stock level; negative deltas deduct.
    pub fn adjust_stock(&mut self, id: ProductId, delta: i32) -> usize {
        self.db
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .map_or(0, |product| {
                product.stock += delta;
                1
            })
    }

    pub fn delete(&mut self, id: ProductId) -> usize {
        let before = self.db.products.len();
        self.db.products.retain(|p| p.id != id);
        before - self.db.products.len()
    }

    /// Best sellers by units across non-cancelled orders.
    pub fn top_sellers(&self, limit: usize) -> Vec<TopProduct> {
        use std::collections::BTreeMap;

        use fruit_porter_core::OrderStatus;

        let mut totals: BTreeMap<ProductId, TopProduct> = BTreeMap::new();
        for item in &self.db.order_items {
            let counted = self
                .db
                .orders
                .iter()
                .any(|o| o.id == item.order_id && o.status != OrderStatus::Cancelled);
            if !counted {
                continue;
            }
            let entry = totals.entry(item.product_id).or_insert_with(|| TopProduct {
                product_id: item.product_id,
                name: item.product_name.clone(),
                total_quantity: 0,
                total_revenue: Decimal::ZERO,
            });
            entry.total_quantity += i64::from(item.quantity);
            entry.total_revenue += item.unit_price * Decimal::from(item.quantity);
        }
        let mut ranked: Vec<_> = totals.into_values().collect();
        ranked.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
        ranked.truncate(limit);
        ranked
    }
}
