pub mod housing;
pub mod inventory;
pub mod timing;
