pub mod lit;
pub mod ocean;
pub mod shadow;
pub mod unlit;
