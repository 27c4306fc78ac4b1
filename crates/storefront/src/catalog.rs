//! Static product catalog and quiz questions.
//!
//! The storefront has no product backend. The quiz catalog, the trending
//! products shown in search, and the quiz question set are compiled in and
//! seeded on first access.

use std::sync::LazyLock;

use dewdrop_core::{Price, ProductId, Sensitivity, SkinConcern, SkinType};
use serde::{Deserialize, Serialize};

// =============================================================================
// Quiz Catalog
// =============================================================================

/// A product the skin quiz can recommend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Price>,
    pub image: String,
    /// Skin types the product is formulated for.
    pub suitable_for: Vec<SkinType>,
    /// Concerns the product treats.
    pub concerns: Vec<SkinConcern>,
    /// Sensitivity levels the product is gentle enough for.
    pub sensitivity_level: Vec<Sensitivity>,
}

static QUIZ_CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        Product {
            id: ProductId::new("1"),
            name: "Gentle Cleansing Foam".to_string(),
            description: "A mild, pH-balanced cleanser suitable for all skin types".to_string(),
            price: Price::from_cents(2499),
            discounted_price: None,
            image: "/products/cleanser.jpg".to_string(),
            suitable_for: vec![
                SkinType::Normal,
                SkinType::Dry,
                SkinType::Combination,
                SkinType::Oily,
            ],
            concerns: vec![SkinConcern::Acne, SkinConcern::Sensitivity],
            sensitivity_level: vec![Sensitivity::SlightlySensitive, Sensitivity::VerySensitive],
        },
        Product {
            id: ProductId::new("2"),
            name: "Hydrating Serum".to_string(),
            description: "Intensive moisture boost with hyaluronic acid".to_string(),
            price: Price::from_cents(3999),
            discounted_price: None,
            image: "/products/serum.jpg".to_string(),
            suitable_for: vec![SkinType::Dry, SkinType::Normal, SkinType::Combination],
            concerns: vec![SkinConcern::Aging, SkinConcern::Sensitivity],
            sensitivity_level: vec![Sensitivity::NotSensitive, Sensitivity::SlightlySensitive],
        },
        Product {
            id: ProductId::new("3"),
            name: "Brightening Treatment".to_string(),
            description: "Targets dark spots and uneven skin tone".to_string(),
            price: Price::from_cents(4999),
            discounted_price: None,
            image: "/products/treatment.jpg".to_string(),
            suitable_for: vec![SkinType::Normal, SkinType::Combination, SkinType::Oily],
            concerns: vec![SkinConcern::DarkSpots, SkinConcern::Aging],
            sensitivity_level: vec![Sensitivity::NotSensitive],
        },
        Product {
            id: ProductId::new("4"),
            name: "Oil Control Moisturizer".to_string(),
            description: "Light, non-comedogenic formula for oily skin".to_string(),
            price: Price::from_cents(2999),
            discounted_price: None,
            image: "/products/moisturizer.jpg".to_string(),
            suitable_for: vec![SkinType::Oily, SkinType::Combination],
            concerns: vec![SkinConcern::Acne],
            sensitivity_level: vec![Sensitivity::NotSensitive, Sensitivity::SlightlySensitive],
        },
    ]
});

/// Products the skin quiz chooses from, in display order.
#[must_use]
pub fn quiz_catalog() -> &'static [Product] {
    &QUIZ_CATALOG
}

/// Look up a quiz product by ID.
#[must_use]
pub fn find_quiz_product(id: &ProductId) -> Option<&'static Product> {
    QUIZ_CATALOG.iter().find(|product| &product.id == id)
}

// =============================================================================
// Trending Products (search overlay)
// =============================================================================

/// A product surfaced by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Price>,
    pub image: String,
    /// Storefront path of the product page.
    pub href: String,
}

impl TrendingProduct {
    /// The price the shopper actually pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discounted_price.unwrap_or(self.price)
    }
}

static TRENDING: LazyLock<Vec<TrendingProduct>> = LazyLock::new(|| {
    vec![
        TrendingProduct {
            id: ProductId::new("1"),
            name: "Brightening Serum".to_string(),
            category: "Skincare".to_string(),
            price: Price::from_cents(4999),
            discounted_price: Some(Price::from_cents(3999)),
            image: "/products/brightening-serum.jpg".to_string(),
            href: "/shop/skincare/brightening-serum".to_string(),
        },
        TrendingProduct {
            id: ProductId::new("2"),
            name: "Hydrating Cream".to_string(),
            category: "Moisturizer".to_string(),
            price: Price::from_cents(3499),
            discounted_price: None,
            image: "/products/moisturizer.jpg".to_string(),
            href: "/shop/skincare/hydrating-cream".to_string(),
        },
        TrendingProduct {
            id: ProductId::new("3"),
            name: "Anti-Aging Bundle".to_string(),
            category: "Bundles".to_string(),
            price: Price::from_cents(12999),
            discounted_price: Some(Price::from_cents(9999)),
            image: "/products/anti-aging-bundle.jpg".to_string(),
            href: "/shop/bundles/anti-aging".to_string(),
        },
        TrendingProduct {
            id: ProductId::new("4"),
            name: "Acne Control Kit".to_string(),
            category: "Skincare".to_string(),
            price: Price::from_cents(7999),
            discounted_price: Some(Price::from_cents(6999)),
            image: "/products/acne-kit.jpg".to_string(),
            href: "/shop/skincare/acne-control".to_string(),
        },
    ]
});

/// Products shown in the search overlay, in display order.
#[must_use]
pub fn trending_products() -> &'static [TrendingProduct] {
    &TRENDING
}

// =============================================================================
// Quiz Questions
// =============================================================================

/// Question IDs, fixed by the order the quiz asks them.
pub mod question_ids {
    pub const SKIN_TYPE: u8 = 1;
    pub const SKIN_CONCERN: u8 = 2;
    pub const SENSITIVITY: u8 = 3;
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    pub id: &'static str,
    /// Label shown to the shopper.
    pub text: &'static str,
    /// Tag recorded when the option is chosen.
    pub value: &'static str,
}

/// A quiz question with its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub id: u8,
    pub question: &'static str,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    /// Returns `true` if `value` is one of this question's option tags.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

const fn option(value: &'static str, text: &'static str) -> QuizOption {
    QuizOption {
        id: value,
        text,
        value,
    }
}

static QUESTIONS: LazyLock<Vec<QuizQuestion>> = LazyLock::new(|| {
    vec![
        QuizQuestion {
            id: question_ids::SKIN_TYPE,
            question: "What's your skin type?",
            options: vec![
                option(SkinType::Normal.as_str(), "Normal"),
                option(SkinType::Dry.as_str(), "Dry"),
                option(SkinType::Oily.as_str(), "Oily"),
                option(SkinType::Combination.as_str(), "Combination"),
            ],
        },
        QuizQuestion {
            id: question_ids::SKIN_CONCERN,
            question: "What are your main skin concerns?",
            options: vec![
                option(SkinConcern::Acne.as_str(), "Acne"),
                option(SkinConcern::Aging.as_str(), "Anti-aging"),
                option(SkinConcern::DarkSpots.as_str(), "Dark spots"),
                option(SkinConcern::Sensitivity.as_str(), "Sensitivity"),
            ],
        },
        QuizQuestion {
            id: question_ids::SENSITIVITY,
            question: "How would you describe your skin's sensitivity?",
            options: vec![
                option(Sensitivity::NotSensitive.as_str(), "Not sensitive"),
                option(Sensitivity::SlightlySensitive.as_str(), "Slightly sensitive"),
                option(Sensitivity::VerySensitive.as_str(), "Very sensitive"),
            ],
        },
    ]
});

/// The quiz questions, in the order they are asked.
#[must_use]
pub fn quiz_questions() -> &'static [QuizQuestion] {
    &QUESTIONS
}
