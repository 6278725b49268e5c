mod callback;
mod plan;
mod route;
mod session;
mod stats;
mod trip;

pub use callback::*;
pub use plan::*;
pub use route::*;
pub use session::*;
pub use stats::*;
pub use trip::*;
