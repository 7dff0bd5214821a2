pub mod grammar;
pub mod highlight;
pub mod naming;
pub mod passive;
pub mod pipeline;
pub mod selector;
