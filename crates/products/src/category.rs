//! Fixed catalog category set.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use showcase_core::DomainError;

macro_rules! categories {
    ($($variant:ident => $label:literal),+ $(,)?) => {
        /// Product category. The label is the wire representation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Category {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category {
            pub const ALL: &'static [Category] = &[$(Category::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $(Category::$variant => $label,)+
                }
            }
        }
    };
}

categories! {
    Furniture => "Furniture",
    Accessories => "Accessories",
    Arts => "Arts",
    Apps => "Apps",
    Agriculture => "Agriculture",
    AutomotiveIndustrial => "Automative and Industrial",
    BabyKidsParenting => "Baby, Kids & Parenting",
    BeautyPersonalCare => "Beauty, Personal Care & Wellness",
    B2bIndustrial => "B2B, Industrial & Manufacturing",
    D2cBrands => "D2C Brands & Consumer Products",
    Fashion => "Fashion, Apparel & Accessories",
    Entertainment => "Entertainment",
    Education => "Education, Learning & EdTech",
    Mobility => "Electric Vehicles, Mobility & Transport",
    FoodBeverage => "Food, Beverage & FMCG",
    HealthFitness => "Health, Fitness & Medical",
    HomeKitchen => "Home, Kitchen & Lifestyle",
    Services => "Services & Marketplaces",
    Sustainability => "Sustainability & Green Products",
    SportsOutdoor => "Sports & Outdoor",
    Gift => "Gift",
    TechElectronics => "Tech & Electronics",
    Miscellaneous => "Miscellaneous",
    Lighting => "Lighting",
    Decor => "Decor",
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| DomainError::validation(format!("invalid category: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_twenty_five_categories() {
        assert_eq!(Category::ALL.len(), 25);
    }

    #[test]
    fn labels_are_the_wire_form() {
        let json = serde_json::to_string(&Category::TechElectronics).unwrap();
        assert_eq!(json, "\"Tech & Electronics\"");
        let back: Category = serde_json::from_str("\"Baby, Kids & Parenting\"").unwrap();
        assert_eq!(back, Category::BabyKidsParenting);
    }

    #[test]
    fn parses_labels() {
        assert_eq!("Decor".parse::<Category>().unwrap(), Category::Decor);
        assert!("Weapons".parse::<Category>().is_err());
    }
}
