pub mod app_state;
pub mod errors;
pub mod panic;
pub mod startup;
