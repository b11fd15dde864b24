pub mod extract;
pub mod inspect;
pub mod inventory;
