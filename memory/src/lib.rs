pub use card::*;
pub use config::*;
pub use controller::*;
pub use deck::*;
pub use errors::*;
pub use game::*;
pub use render::*;
pub use scheduler::*;
pub use score::*;
pub use token::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod card;
mod config;
mod controller;
mod deck;
mod errors;
mod game;
mod render;
mod scheduler;
mod score;
mod token;
mod visualization;
