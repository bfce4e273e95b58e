//! Terminal front end

pub mod input;
pub mod play;
pub mod view_state;
