mod game;
mod player;
mod recall;
mod recording;
pub use game::*;
pub use player::*;
pub use recall::*;
pub use recording::*;
