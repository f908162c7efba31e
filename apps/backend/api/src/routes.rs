pub mod health;
pub mod scratchoff;
pub mod settings;
