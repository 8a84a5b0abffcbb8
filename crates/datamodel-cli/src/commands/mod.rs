pub mod check;
pub mod decl_loader;
pub mod print;
