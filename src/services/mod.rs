pub mod backend;
pub mod content;
pub mod intake;
pub mod notify;
pub mod phone;
pub mod session;
pub mod validation;
