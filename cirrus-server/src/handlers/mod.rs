pub mod resources;
pub mod sign;
pub mod system;
