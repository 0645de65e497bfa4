//! Products domain module.
//!
//! This crate contains the catalog record and the business rules that govern
//! curated visibility, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage).

pub mod calendar;
pub mod category;
pub mod product;
pub mod visibility;

pub use calendar::{Month, YearMonth};
pub use category::Category;
pub use product::{NewProduct, Product, ProductImage, ProductPatch, ProductStatus};
pub use visibility::{
    apply_visibility_change, CollectionState, FieldWrite, Precondition, RuleViolation,
    VisibilityChange, VisibilityFlag, VisibilityFlags, WriteSet, MAIN_SHOWCASE_LIMIT,
};
