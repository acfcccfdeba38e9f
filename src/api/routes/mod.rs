pub mod health;
pub mod suggestions;
