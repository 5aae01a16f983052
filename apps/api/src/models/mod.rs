pub mod competency;
pub mod raw;
pub mod roadmap;
pub mod role;
