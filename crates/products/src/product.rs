use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use showcase_core::{DomainError, DomainResult, Entity, ProductId};

use crate::calendar::{Month, YearMonth};
use crate::category::Category;
use crate::visibility::VisibilityFlags;

/// Earliest release year accepted for a product.
pub const MIN_YEAR: i32 = 1950;

/// How far into the future a release year may be scheduled.
pub const MAX_YEARS_AHEAD: i32 = 10;

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Active,
    Hidden,
    Archived,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [
        ProductStatus::Active,
        ProductStatus::Hidden,
        ProductStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Hidden => "Hidden",
            ProductStatus::Archived => "Archived",
        }
    }
}

impl core::str::FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("invalid status: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A catalog product: the unit of curation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub product_link: String,
    pub price: f64,
    pub category: Category,
    pub sku: String,
    pub images: Vec<ProductImage>,
    pub year: i32,
    pub month: Month,
    pub status: ProductStatus,
    pub visibility: VisibilityFlags,
    pub tags: Vec<String>,
    pub stock: u32,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn release(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// Check descriptive attributes against the catalog rules.
    ///
    /// `current_year` bounds how far ahead a release may be scheduled.
    pub fn validate(&self, current_year: i32) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Product name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("Description is required"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("Price cannot be negative"));
        }
        let max_year = current_year + MAX_YEARS_AHEAD;
        if self.year < MIN_YEAR || self.year > max_year {
            return Err(DomainError::validation(format!(
                "Year must be between {MIN_YEAR} and {max_year}"
            )));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Admin input for creating a product. Visibility always starts cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub product_link: String,
    pub price: f64,
    pub category: Category,
    pub sku: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub year: i32,
    pub month: Month,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stock: u32,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> DomainResult<Product> {
        let product = Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            product_link: self.product_link.trim().to_string(),
            price: self.price,
            category: self.category,
            sku: self.sku.trim().to_string(),
            images: self.images,
            year: self.year,
            month: self.month,
            status: self.status,
            visibility: VisibilityFlags::default(),
            tags: normalize_tags(self.tags),
            stock: self.stock,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        product.validate(YearMonth::of(now).year)?;
        Ok(product)
    }
}

/// Partial update of descriptive attributes and lifecycle status.
///
/// There are deliberately no visibility fields here: curated flags change only
/// through [`crate::visibility::apply_visibility_change`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_link: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub sku: Option<String>,
    pub images: Option<Vec<ProductImage>>,
    pub year: Option<i32>,
    pub month: Option<Month>,
    pub status: Option<ProductStatus>,
    pub tags: Option<Vec<String>>,
    pub stock: Option<u32>,
}

impl ProductPatch {
    /// Apply onto `product`, leaving it untouched if the result would be invalid.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = product.clone();
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(link) = &self.product_link {
            next.product_link = link.trim().to_string();
        }
        if let Some(price) = self.price {
            next.price = price;
        }
        if let Some(category) = self.category {
            next.category = category;
        }
        if let Some(sku) = &self.sku {
            next.sku = sku.trim().to_string();
        }
        if let Some(images) = &self.images {
            next.images = images.clone();
        }
        if let Some(year) = self.year {
            next.year = year;
        }
        if let Some(month) = self.month {
            next.month = month;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(tags) = &self.tags {
            next.tags = normalize_tags(tags.clone());
        }
        if let Some(stock) = self.stock {
            next.stock = stock;
        }

        next.validate(YearMonth::of(now).year)?;
        next.updated_at = now;
        *product = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    fn draft() -> NewProduct {
        NewProduct {
            name: "  Oak Stool ".to_string(),
            description: "Hand finished".to_string(),
            product_link: String::new(),
            price: 120.0,
            category: Category::Furniture,
            sku: "OAK-1".to_string(),
            images: vec![],
            year: 2026,
            month: Month::March,
            status: ProductStatus::Active,
            tags: vec![" wood ".to_string(), "  ".to_string()],
            stock: 3,
        }
    }

    #[test]
    fn new_product_starts_with_cleared_visibility() {
        let product = draft().into_product(ProductId::new(), test_time()).unwrap();
        assert_eq!(product.visibility, VisibilityFlags::default());
        assert_eq!(product.views, 0);
        assert_eq!(product.name, "Oak Stool");
        assert_eq!(product.tags, vec!["wood".to_string()]);
        assert_eq!(product.created_at, test_time());
    }

    #[test]
    fn create_rejects_empty_name() {
        let mut d = draft();
        d.name = "   ".to_string();
        let err = d.into_product(ProductId::new(), test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn create_rejects_negative_price() {
        let mut d = draft();
        d.price = -1.0;
        assert!(matches!(
            d.into_product(ProductId::new(), test_time()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_years_out_of_range() {
        let mut d = draft();
        d.year = 1949;
        assert!(d.clone().into_product(ProductId::new(), test_time()).is_err());
        d.year = 2036;
        assert!(d.clone().into_product(ProductId::new(), test_time()).is_ok());
        d.year = 2037;
        assert!(d.into_product(ProductId::new(), test_time()).is_err());
    }

    #[test]
    fn patch_updates_status_and_keeps_visibility() {
        let mut product = draft().into_product(ProductId::new(), test_time()).unwrap();
        product.visibility.editors_pick = true;
        let later = test_time() + chrono::Duration::hours(1);

        let patch = ProductPatch {
            status: Some(ProductStatus::Hidden),
            price: Some(99.5),
            ..Default::default()
        };
        patch.apply(&mut product, later).unwrap();

        assert_eq!(product.status, ProductStatus::Hidden);
        assert_eq!(product.price, 99.5);
        assert!(product.visibility.editors_pick);
        assert_eq!(product.updated_at, later);
        assert_eq!(product.created_at, test_time());
    }

    #[test]
    fn invalid_patch_leaves_product_untouched() {
        let mut product = draft().into_product(ProductId::new(), test_time()).unwrap();
        let before = product.clone();
        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            sku: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(patch.apply(&mut product, test_time()).is_err());
        assert_eq!(product, before);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("hidden".parse::<ProductStatus>().unwrap(), ProductStatus::Hidden);
        assert!("deleted".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn serializes_with_camel_case_visibility() {
        let product = draft().into_product(ProductId::new(), test_time()).unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["visibility"]["bestSellers"], false);
        assert_eq!(json["visibility"]["popularFeatured"], false);
        assert_eq!(json["status"], "Active");
        assert_eq!(json["month"], "March");
        assert!(json.get("createdAt").is_some());
    }
}
