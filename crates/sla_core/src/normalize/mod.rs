pub mod labels;
pub mod timestamps;
