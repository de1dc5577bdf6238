pub mod curve;
pub mod inventory;
pub mod material;
pub mod operator;
pub mod registry;
pub mod roster;
pub mod validate;
