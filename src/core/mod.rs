pub mod adapter;
pub mod handlers;
pub mod http_cycle;
pub mod lifespan;

pub use crate::domain::model::{BufferedResponse, EventContext, InvocationContext, RequestScope};
pub use crate::domain::ports::{EventHandler, Lifespan};
pub use crate::utils::error::Result;
