//! Asset loading: CPU-side mesh data and the Wavefront OBJ parser.

pub mod mesh;
pub mod obj;

pub use mesh::{MeshData, MeshVertex};
pub use obj::{ObjError, load_obj_from_path, load_obj_from_reader, load_obj_from_str};
