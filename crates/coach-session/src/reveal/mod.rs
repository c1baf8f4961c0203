// Progressive text reveal: tokenizing, prefix-safe markup and the timer task
pub mod animator;
pub mod markup;
pub mod tokens;

pub use animator::{RevealFrame, RevealFrames, RevealHandle, TextRevealAnimator};
pub use markup::{render_segments, stable_prefix_len, to_html, Segment};
pub use tokens::tokenize;
