pub mod flash;
pub mod guards;
pub mod router;
pub mod routes;

pub use router::{AppState, jobboard_router};
