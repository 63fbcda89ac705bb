pub mod carray;
pub mod files;
pub mod hex;
