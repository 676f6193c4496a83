pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod schedule;
pub mod signal;
pub mod source;
pub mod stack;
