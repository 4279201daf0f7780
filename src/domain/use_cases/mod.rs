pub mod contact;
pub mod spam;
