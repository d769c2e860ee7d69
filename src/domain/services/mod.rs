mod address_normalizer;

pub use address_normalizer::{
    AddressNormalizer, AddressValidator, DomainNameValidator, IpValidator,
};
