pub mod codes;
pub mod fetch;
pub mod process;
