pub mod episodes;

pub use episodes::{Episode, EpisodeList};
