pub mod bars;
pub mod panels;
pub mod radar;
