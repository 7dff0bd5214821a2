pub mod descriptor;
pub mod tables;
