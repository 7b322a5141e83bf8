pub mod attribute;
pub mod canvas;
pub mod codec;
pub mod palette;
