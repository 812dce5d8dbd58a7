//! Shape tables and analogy text templates.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::geometry::diagonals;
use crate::types::Complexity;
use crate::{Error, ErrorContext, Result};

/// A regular polygon as used in analogies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub name: &'static str,
    pub sides: u32,
    /// Interior angle sum in degrees.
    pub angles: u32,
    /// Lines of symmetry.
    pub symmetry: u32,
    /// Phrase used in image prompts.
    pub visual: &'static str,
}

const fn shape(name: &'static str, sides: u32, angles: u32, visual: &'static str) -> Shape {
    Shape {
        name,
        sides,
        angles,
        symmetry: sides,
        visual,
    }
}

const BEGINNER: [Shape; 5] = [
    shape("Triangle", 3, 180, "geometric triangle with three equal sides"),
    shape("Square", 4, 360, "perfect square with four equal sides"),
    shape("Pentagon", 5, 540, "regular pentagon with five equal sides"),
    shape("Hexagon", 6, 720, "hexagonal shape with six equal sides"),
    shape("Octagon", 8, 1080, "octagonal shape with eight equal sides"),
];

const INTERMEDIATE: [Shape; 4] = [
    shape("Heptagon", 7, 900, "heptagonal shape with seven equal sides"),
    shape("Nonagon", 9, 1260, "nonagonal shape with nine equal sides"),
    shape("Decagon", 10, 1440, "decagonal shape with ten equal sides"),
    shape("Dodecagon", 12, 1800, "dodecagonal shape with twelve equal sides"),
];

const ADVANCED: [Shape; 4] = [
    shape("Tridecagon", 13, 1980, "tridecagonal shape with thirteen equal sides"),
    shape("Tetradecagon", 14, 2160, "tetradecagonal shape with fourteen equal sides"),
    shape("Pentadecagon", 15, 2340, "pentadecagonal shape with fifteen equal sides"),
    shape("Icosagon", 20, 3240, "icosagonal shape with twenty equal sides"),
];

/// Shapes available at one complexity tier.
pub fn shapes_for(complexity: Complexity) -> &'static [Shape] {
    match complexity {
        Complexity::Beginner => &BEGINNER,
        Complexity::Intermediate => &INTERMEDIATE,
        Complexity::Advanced => &ADVANCED,
    }
}

/// Look a shape up by name in any tier, ignoring case.
pub fn find_shape(name: &str) -> Option<Shape> {
    let wanted = name.trim();
    Complexity::ALL
        .iter()
        .flat_map(|c| shapes_for(*c).iter())
        .find(|s| s.name.eq_ignore_ascii_case(wanted))
        .copied()
}

/// Property an analogy compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Sides,
    Angles,
    Symmetry,
    Diagonals,
    Vertices,
    Edges,
    InteriorAngles,
    ExteriorAngles,
    Area,
    Perimeter,
}

impl Relationship {
    pub const ALL: [Relationship; 10] = [
        Relationship::Sides,
        Relationship::Angles,
        Relationship::Symmetry,
        Relationship::Diagonals,
        Relationship::Vertices,
        Relationship::Edges,
        Relationship::InteriorAngles,
        Relationship::ExteriorAngles,
        Relationship::Area,
        Relationship::Perimeter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Sides => "sides",
            Relationship::Angles => "angles",
            Relationship::Symmetry => "symmetry",
            Relationship::Diagonals => "diagonals",
            Relationship::Vertices => "vertices",
            Relationship::Edges => "edges",
            Relationship::InteriorAngles => "interior angles",
            Relationship::ExteriorAngles => "exterior angles",
            Relationship::Area => "area",
            Relationship::Perimeter => "perimeter",
        }
    }

    /// Analogy question text.
    pub fn prompt(&self, a: &Shape, b: &Shape) -> Result<String> {
        Ok(match self {
            Relationship::Sides => format!(
                "{} is to {} sides as {} is to {} sides",
                a.name, a.sides, b.name, b.sides
            ),
            Relationship::Angles => format!(
                "{} is to {}° total angles as {} is to {}° total angles",
                a.name, a.angles, b.name, b.angles
            ),
            Relationship::Symmetry => format!(
                "{} is to {} symmetry axes as {} is to {} symmetry axes",
                a.name, a.symmetry, b.name, b.symmetry
            ),
            Relationship::Diagonals => format!(
                "{} is to {} diagonals as {} is to {} diagonals",
                a.name,
                diagonals(a.sides)?,
                b.name,
                diagonals(b.sides)?
            ),
            other => format!(
                "{} is to {} as {} is to {}",
                a.name,
                other.as_str(),
                b.name,
                other.as_str()
            ),
        })
    }

    /// Text-to-image prompt for the illustration.
    pub fn visual_prompt(&self, a: &Shape, b: &Shape) -> Result<String> {
        let detail = match self {
            Relationship::Sides => format!(
                ", clearly labeled with side counts {} and {}, clean mathematical illustration",
                a.sides, b.sides
            ),
            Relationship::Angles => format!(
                ", showing interior angle measurements {}° and {}°, geometric diagram",
                a.angles, b.angles
            ),
            Relationship::Symmetry => format!(
                ", highlighting symmetry axes {} and {}, educational geometry",
                a.symmetry, b.symmetry
            ),
            Relationship::Diagonals => format!(
                ", showing diagonal lines {} and {}, mathematical visualization",
                diagonals(a.sides)?,
                diagonals(b.sides)?
            ),
            _ => ", mathematical relationship diagram, clean educational style".to_string(),
        };
        Ok(format!(
            "Educational diagram showing geometric shapes: {} and {}{}",
            a.visual, b.visual, detail
        ))
    }

    /// Exactly three follow-up questions.
    pub fn tricky_questions(&self, a: &Shape, b: &Shape) -> [String; 3] {
        let a = a.name.to_lowercase();
        let b = b.name.to_lowercase();
        match self {
            Relationship::Sides => [
                format!("How many diagonals does a {} have?", a),
                format!("What is the sum of interior angles in a {}?", b),
                format!("Which polygon has more symmetry axes: {} or {}?", a, b),
            ],
            Relationship::Angles => [
                format!("What is the measure of each interior angle in a regular {}?", a),
                format!("How many degrees are in each exterior angle of a {}?", b),
                format!("Which shape has a larger total angle sum: {} or {}?", a, b),
            ],
            Relationship::Symmetry => [
                format!("How many lines of symmetry does a regular {} have?", a),
                format!("What is the rotational symmetry order of a {}?", b),
                format!("Which polygon has more rotational symmetry: {} or {}?", a, b),
            ],
            Relationship::Diagonals => [
                format!("How many diagonals can be drawn from one vertex of a {}?", a),
                format!("What is the total number of diagonals in a {}?", b),
                format!("Which polygon has more diagonals: {} or {}?", a, b),
            ],
            _ => [
                format!("What is the perimeter of a regular {} with side length 1?", a),
                format!("How many vertices does a {} have?", b),
                format!("Which shape is more complex: {} or {}?", a, b),
            ],
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', " ");
        Relationship::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("unknown relationship '{}'", s),
                    ErrorContext::new().with_field_path("relationship"),
                )
            })
    }
}
