pub mod body_part;
pub mod frame;
pub mod matrix;
pub mod mesh;
pub mod scene;
pub mod skeleton;
pub mod voxel;

pub use body_part::*;
pub use frame::*;
pub use matrix::*;
pub use mesh::*;
pub use scene::*;
pub use skeleton::*;
pub use voxel::*;
