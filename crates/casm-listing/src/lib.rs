pub mod model;

pub use model::{assemble_file, build_report, load_image, Report};
