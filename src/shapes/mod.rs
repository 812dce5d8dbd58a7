//! 形状类比模块：多边形表、类比模板、随机规划与图像生成。
//!
//! # Shape Analogies
//!
//! Analogy questions of the form *"Triangle is to 3 sides as Hexagon is to
//! 6 sides"*, each with an illustration and three follow-up questions.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`catalog`] | Polygon tables per [`Complexity`](crate::types::Complexity) and text templates per [`Relationship`] |
//! | [`geometry`] | Diagonal and angle arithmetic |
//! | [`ShapeAnalogyPlanner`] | Seedable choice of shapes, relationship and image seed |
//! | [`ShapeAnalogyDomain`] | Pipeline domain: Hugging Face image or offline mock |

pub mod catalog;
mod domain;
pub mod geometry;
mod planner;

pub use catalog::{Relationship, Shape};
pub use domain::{ShapeAnalogyDomain, ShapeAnalogyRequest};
pub use planner::ShapeAnalogyPlanner;

/// Runs larger than this need explicit confirmation.
pub const CONFIRM_THRESHOLD: usize = 50;
