pub mod accounts;
pub mod admins;
pub mod registration;
pub mod roles;
