//! 概念动画模块：视频生成服务链、教学元数据、本地绘制的 GIF 与文本占位动画。
//!
//! # Concept Animations
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`catalog`] | Curated goals, points and questions for seven concepts |
//! | [`AnimationRequest`] | Concept, 5–15 s duration, audience and format |
//! | [`render`] | Sine wave, pendulum, wave propagation and generic GIF scenes |
//! | [`ConceptAnimationDomain`] | Hugging Face → Replicate → Stability → rendered GIF → text animation |

pub mod catalog;
mod domain;
pub mod render;

pub use domain::{
    AnimationRequest, ConceptAnimationDomain, DEFAULT_DURATION, MAX_DURATION, MIN_DURATION,
};
