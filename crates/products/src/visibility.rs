//! Visibility rule engine.
//!
//! Decides, for one requested flag change, every field write needed across the
//! collection to keep the curation invariants:
//!
//! 1. at most one of `bestSellers`, `bestSelling`, `editorsPick`, `featuredProduct`
//!    per product (group A);
//! 2. at most [`MAIN_SHOWCASE_LIMIT`] products hold `bestSellers`;
//! 3. at most one product holds `popularFeatured`;
//! 4. `popularFeatured` and `published` are independent of group A.
//!
//! The engine never touches storage. It returns a [`WriteSet`] whose
//! preconditions let the store apply it as a single conditional write.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use showcase_core::ProductId;

use crate::product::Product;

/// Capacity of the Main Showcase (`bestSellers`) section.
pub const MAIN_SHOWCASE_LIMIT: usize = 4;

/// A curated visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibilityFlag {
    BestSellers,
    BestSelling,
    EditorsPick,
    FeaturedProduct,
    PopularFeatured,
    Published,
}

impl VisibilityFlag {
    pub const ALL: [VisibilityFlag; 6] = [
        VisibilityFlag::BestSellers,
        VisibilityFlag::BestSelling,
        VisibilityFlag::EditorsPick,
        VisibilityFlag::FeaturedProduct,
        VisibilityFlag::PopularFeatured,
        VisibilityFlag::Published,
    ];

    /// The mutually exclusive curation flags.
    pub const GROUP_A: [VisibilityFlag; 4] = [
        VisibilityFlag::BestSellers,
        VisibilityFlag::BestSelling,
        VisibilityFlag::EditorsPick,
        VisibilityFlag::FeaturedProduct,
    ];

    pub fn is_group_a(self) -> bool {
        Self::GROUP_A.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityFlag::BestSellers => "bestSellers",
            VisibilityFlag::BestSelling => "bestSelling",
            VisibilityFlag::EditorsPick => "editorsPick",
            VisibilityFlag::FeaturedProduct => "featuredProduct",
            VisibilityFlag::PopularFeatured => "popularFeatured",
            VisibilityFlag::Published => "published",
        }
    }

    /// Storefront section the flag feeds.
    pub fn section_name(self) -> &'static str {
        match self {
            VisibilityFlag::BestSellers => "Main Showcase",
            VisibilityFlag::BestSelling => "Popular",
            VisibilityFlag::EditorsPick => "Editor's Pick",
            VisibilityFlag::FeaturedProduct => "Featured",
            VisibilityFlag::PopularFeatured => "Popular-Featured",
            VisibilityFlag::Published => "Published",
        }
    }
}

impl core::fmt::Display for VisibilityFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityFlag {
    type Err = RuleViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| RuleViolation::InvalidFlag(s.to_string()))
    }
}

/// The visibility flag set carried by every product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityFlags {
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub best_sellers: bool,
    #[serde(default)]
    pub best_selling: bool,
    #[serde(default)]
    pub editors_pick: bool,
    #[serde(default)]
    pub featured_product: bool,
    #[serde(default)]
    pub popular_featured: bool,
}

impl VisibilityFlags {
    pub fn get(&self, flag: VisibilityFlag) -> bool {
        match flag {
            VisibilityFlag::BestSellers => self.best_sellers,
            VisibilityFlag::BestSelling => self.best_selling,
            VisibilityFlag::EditorsPick => self.editors_pick,
            VisibilityFlag::FeaturedProduct => self.featured_product,
            VisibilityFlag::PopularFeatured => self.popular_featured,
            VisibilityFlag::Published => self.published,
        }
    }

    pub fn set(&mut self, flag: VisibilityFlag, value: bool) {
        match flag {
            VisibilityFlag::BestSellers => self.best_sellers = value,
            VisibilityFlag::BestSelling => self.best_selling = value,
            VisibilityFlag::EditorsPick => self.editors_pick = value,
            VisibilityFlag::FeaturedProduct => self.featured_product = value,
            VisibilityFlag::PopularFeatured => self.popular_featured = value,
            VisibilityFlag::Published => self.published = value,
        }
    }

    /// Number of group A flags currently set (0 or 1 when consistent).
    pub fn group_a_count(&self) -> usize {
        VisibilityFlag::GROUP_A
            .into_iter()
            .filter(|f| self.get(*f))
            .count()
    }

    fn select_group_a(&mut self, chosen: VisibilityFlag) {
        for flag in VisibilityFlag::GROUP_A {
            self.set(flag, flag == chosen);
        }
    }
}

/// A single requested flag change on one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityChange {
    pub product_id: ProductId,
    pub flag: VisibilityFlag,
    pub value: bool,
}

impl VisibilityChange {
    pub fn new(product_id: ProductId, flag: VisibilityFlag, value: bool) -> Self {
        Self {
            product_id,
            flag,
            value,
        }
    }

    /// Build a change from a client-supplied flag name.
    pub fn parse(product_id: ProductId, flag: &str, value: bool) -> Result<Self, RuleViolation> {
        Ok(Self::new(product_id, flag.parse()?, value))
    }
}

/// What the engine needs to know about the collection to decide one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    pub product_id: ProductId,
    /// Current flags of the target, `None` when it does not exist.
    pub target_flags: Option<VisibilityFlags>,
    /// Products other than the target holding `bestSellers`.
    pub showcase_holders: usize,
    /// Products other than the target holding `popularFeatured`.
    pub popular_featured_holders: Vec<ProductId>,
}

impl CollectionState {
    /// Derive the state for `product_id` from a full in-memory collection.
    pub fn from_products<'a>(
        product_id: ProductId,
        products: impl IntoIterator<Item = &'a Product>,
    ) -> Self {
        let mut state = Self {
            product_id,
            target_flags: None,
            showcase_holders: 0,
            popular_featured_holders: Vec::new(),
        };
        for p in products {
            if p.id == product_id {
                state.target_flags = Some(p.visibility);
                continue;
            }
            if p.visibility.best_sellers {
                state.showcase_holders += 1;
            }
            if p.visibility.popular_featured {
                state.popular_featured_holders.push(p.id);
            }
        }
        state.popular_featured_holders.sort();
        state
    }
}

/// One field assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWrite {
    pub product_id: ProductId,
    pub flag: VisibilityFlag,
    pub value: bool,
}

/// A condition the store must re-check, atomically with the writes, before applying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precondition {
    /// The product exists and its flags are exactly as observed.
    FlagsUnchanged {
        product_id: ProductId,
        flags: VisibilityFlags,
    },
    /// Fewer than `limit` products other than `excluding` hold `bestSellers`.
    ShowcaseCapacity { excluding: ProductId, limit: usize },
    /// The `popularFeatured` holders other than `excluding` are exactly `holders` (sorted).
    PopularFeaturedHolders {
        excluding: ProductId,
        holders: Vec<ProductId>,
    },
}

/// The complete, all-or-nothing result of one visibility decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSet {
    target: ProductId,
    writes: Vec<FieldWrite>,
    preconditions: Vec<Precondition>,
}

impl WriteSet {
    pub fn target(&self) -> ProductId {
        self.target
    }

    pub fn writes(&self) -> &[FieldWrite] {
        &self.writes
    }

    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    /// True when applying the set would not change any stored value.
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }

    /// Apply the writes addressed to `product`; other writes are ignored.
    pub fn apply_to(&self, product: &mut Product) {
        for w in self.writes.iter().filter(|w| w.product_id == product.id) {
            product.visibility.set(w.flag, w.value);
        }
    }
}

/// Why a visibility change was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("invalid visibility flag: {0}")]
    InvalidFlag(String),

    #[error("limit reached: {current} of {limit} Main Showcase slots used")]
    LimitReached { current: usize, limit: usize },

    #[error("product not found")]
    NotFound,
}

impl RuleViolation {
    /// Admin-facing wording; actionable for `LimitReached`.
    pub fn user_message(&self) -> String {
        match self {
            RuleViolation::LimitReached { current, limit } => format!(
                "{current} of {limit} Main Showcase slots used — remove one before adding another"
            ),
            RuleViolation::InvalidFlag(flag) => format!("Unknown visibility flag '{flag}'"),
            RuleViolation::NotFound => "Product not found".to_string(),
        }
    }
}

/// Decide the write-set for `change` against the observed collection `state`.
///
/// Writes that would assign a value a field already holds are dropped, so a
/// request that restates current state yields a no-op write-set.
pub fn apply_visibility_change(
    change: &VisibilityChange,
    state: &CollectionState,
) -> Result<WriteSet, RuleViolation> {
    if state.product_id != change.product_id {
        return Err(RuleViolation::NotFound);
    }
    let current = state.target_flags.ok_or(RuleViolation::NotFound)?;
    let target = change.product_id;

    let mut desired = current;
    let mut foreign = Vec::new();
    let mut preconditions = vec![Precondition::FlagsUnchanged {
        product_id: target,
        flags: current,
    }];

    match (change.flag, change.value) {
        (VisibilityFlag::PopularFeatured, true) => {
            desired.popular_featured = true;
            foreign.extend(
                state
                    .popular_featured_holders
                    .iter()
                    .filter(|id| **id != target)
                    .map(|id| FieldWrite {
                        product_id: *id,
                        flag: VisibilityFlag::PopularFeatured,
                        value: false,
                    }),
            );
            let mut holders = state.popular_featured_holders.clone();
            holders.retain(|id| *id != target);
            holders.sort();
            preconditions.push(Precondition::PopularFeaturedHolders {
                excluding: target,
                holders,
            });
        }
        (VisibilityFlag::BestSellers, true) => {
            // A product already in the showcase does not take a new slot.
            if !current.best_sellers {
                if state.showcase_holders >= MAIN_SHOWCASE_LIMIT {
                    return Err(RuleViolation::LimitReached {
                        current: state.showcase_holders,
                        limit: MAIN_SHOWCASE_LIMIT,
                    });
                }
                preconditions.push(Precondition::ShowcaseCapacity {
                    excluding: target,
                    limit: MAIN_SHOWCASE_LIMIT,
                });
            }
            desired.select_group_a(VisibilityFlag::BestSellers);
        }
        (flag, true) if flag.is_group_a() => desired.select_group_a(flag),
        (flag, value) => desired.set(flag, value),
    }

    let mut writes: Vec<FieldWrite> = VisibilityFlag::ALL
        .into_iter()
        .filter(|f| current.get(*f) != desired.get(*f))
        .map(|flag| FieldWrite {
            product_id: target,
            flag,
            value: desired.get(flag),
        })
        .collect();
    writes.extend(foreign);

    Ok(WriteSet {
        target,
        writes,
        preconditions,
    })
}
