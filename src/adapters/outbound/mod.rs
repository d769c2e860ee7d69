mod ipstack_provider;
mod sqlite_geolocation_store;
mod system_name_resolver;

pub use ipstack_provider::{IpStackConfig, IpStackProvider};
pub use sqlite_geolocation_store::SqliteGeolocationStore;
pub use system_name_resolver::SystemNameResolver;
