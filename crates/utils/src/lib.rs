pub mod organization;
pub mod url;
