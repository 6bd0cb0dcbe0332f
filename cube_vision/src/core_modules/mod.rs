pub mod chunk;
pub mod color_classifier;
pub mod face;
pub mod face_resolver;
pub mod facelet;
pub mod grid_manager;
pub mod orientation;
pub mod pixel;
pub mod validator;
