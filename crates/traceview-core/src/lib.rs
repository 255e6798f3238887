pub mod calibration;
pub mod capture;
pub mod compositor;
pub mod consts;
pub mod document;
pub mod error;
pub mod export;
pub mod filters;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod overlay;
pub mod session;
pub mod tools;
pub mod view;
