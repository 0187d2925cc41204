pub mod auth;
pub mod flashcards;
pub mod languages;
pub mod quiz;
pub mod results;
