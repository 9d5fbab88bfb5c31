pub mod color_grade;
pub mod effect;
pub mod error;
pub mod filter;
pub mod gs;
pub mod params;
pub mod render_target;
pub mod settings;
pub mod state;
pub mod texture;

pub use color_grade::ColorGradeFilter;
pub use error::{GraphicsError, GraphicsResult, PassError};
pub use filter::{
    create_instance, FailureLog, FilterContext, FilterHost, PassTimings, RenderOutcome, VideoFilter,
};
pub use params::ParameterSet;
pub use settings::Settings;
