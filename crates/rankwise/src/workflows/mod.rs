pub mod decision;
pub mod import;
