pub mod header;
pub mod reader;
pub mod writer;
