//! Closed classification sets shared by requests and records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        Error::validation_with_context(
                            format!("'{}' is not a valid {}", s, $field),
                            ErrorContext::new()
                                .with_field_path($field)
                                .with_details(format!("expected one of: {}", allowed.join(", "))),
                        )
                    })
            }
        }
    };
}

closed_enum! {
    /// Shape-analogy difficulty tier.
    Complexity, "complexity_level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

impl Complexity {
    pub fn estimated_minutes(&self) -> u32 {
        match self {
            Complexity::Beginner => 2,
            Complexity::Intermediate => 4,
            Complexity::Advanced => 6,
        }
    }
}

closed_enum! {
    /// Target audience of animations and difficulty of topic summaries.
    Audience, "target_audience" {
        Elementary => "elementary",
        MiddleSchool => "middle_school",
        HighSchool => "high_school",
        College => "college",
        Graduate => "graduate",
    }
}

closed_enum! {
    AnimationType, "animation_type" {
        Gif => "gif",
        Mp4 => "mp4",
    }
}
