pub mod catalog;
pub mod persist;
pub mod picks;
pub mod present;
pub mod selection;
pub mod state;
pub mod table;
pub mod validate;
