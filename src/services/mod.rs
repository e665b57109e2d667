pub mod auth;
pub mod ledger;
pub mod notify;
pub mod phone;
pub mod reviews;
pub mod slots;
