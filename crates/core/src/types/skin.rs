//! Skin quiz answer tags.
//!
//! Each quiz question offers a fixed set of answers. The tag strings
//! (`"normal"`, `"dark-spots"`, `"very-sensitive"`, ...) are what the quiz
//! submits and what is stored in quiz history.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known answer tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} tag: {value}")]
pub struct TagError {
    /// Which question the tag was meant for.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! define_tag {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every tag, in quiz option order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The tag string as submitted by the quiz.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)+
                    _ => Err(TagError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

define_tag! {
    /// Answer to "What's your skin type?".
    SkinType, "skin type" {
        Normal => "normal",
        Dry => "dry",
        Oily => "oily",
        Combination => "combination",
    }
}

define_tag! {
    /// Answer to "What are your main skin concerns?".
    SkinConcern, "skin concern" {
        Acne => "acne",
        /// Shown to shoppers as "Anti-aging".
        Aging => "aging",
        DarkSpots => "dark-spots",
        Sensitivity => "sensitivity",
    }
}

define_tag! {
    /// Answer to "How would you describe your skin's sensitivity?".
    Sensitivity, "sensitivity" {
        NotSensitive => "not-sensitive",
        SlightlySensitive => "slightly-sensitive",
        VerySensitive => "very-sensitive",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!("oily".parse::<SkinType>().unwrap(), SkinType::Oily);
        assert_eq!(
            "dark-spots".parse::<SkinConcern>().unwrap(),
            SkinConcern::DarkSpots
        );
        assert_eq!(
            "very-sensitive".parse::<Sensitivity>().unwrap(),
            Sensitivity::VerySensitive
        );
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "greasy".parse::<SkinType>().unwrap_err();
        assert_eq!(err.kind, "skin type");
        assert_eq!(err.to_string(), "unknown skin type tag: greasy");
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!("Normal".parse::<SkinType>().is_err());
    }

    #[test]
    fn test_serde_uses_tag_strings() {
        for tag in SkinConcern::ALL {
            let json = serde_json::to_string(tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
        let parsed: Sensitivity = serde_json::from_str("\"not-sensitive\"").unwrap();
        assert_eq!(parsed, Sensitivity::NotSensitive);
    }

    #[test]
    fn test_all_in_option_order() {
        assert_eq!(
            SkinType::ALL,
            &[
                SkinType::Normal,
                SkinType::Dry,
                SkinType::Oily,
                SkinType::Combination
            ]
        );
        assert_eq!(Sensitivity::ALL.len(), 3);
    }
}
