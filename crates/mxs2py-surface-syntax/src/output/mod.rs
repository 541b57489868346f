//! Output writers - emit the node arena as source code.

pub mod python;

pub use python::{PythonWriter, RenderOptions};
