mod geolocation_provider;
mod geolocation_store;
mod name_resolver;

pub use geolocation_provider::GeolocationProvider;
pub use geolocation_store::GeolocationStore;
pub use name_resolver::NameResolver;
