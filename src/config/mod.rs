mod loader;
mod routing;

pub use loader::{BackendConfig, Config, DisplayConfig, RoutingConfig};
pub use routing::RoutingPolicy;
