pub mod parallax;
pub mod reveal;

pub use parallax::{LayerTransform, LoopState, ParallaxController, ParallaxLayer, ParallaxOptions};
pub use reveal::{RevealController, RevealKey, RevealOptions, RevealState};
