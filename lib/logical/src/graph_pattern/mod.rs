mod builder;
mod tree;

pub use builder::GraphPatternBuilder;
pub use tree::{GraphPattern, PatternModifier};
