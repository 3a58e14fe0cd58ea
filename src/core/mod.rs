pub mod bvh;
pub mod clock;
pub mod input;
pub mod input_adapter;
pub mod pointer;
pub mod timer;
