//! Enumeration resolution
//!
//! Turns "list distinct X" requests into terms aggregations and reshapes
//! the buckets into pages of typed records.

pub mod adapters;
pub mod decoder;
pub mod order;
pub mod pagination;
pub mod resolver;

pub use adapters::{
    EnumerationAdapter, HostOperatingSystem, HostOperatingSystemsAdapter,
    HostOperatingSystemsArgs, HostTag, HostTagsAdapter, HostTagsArgs, OperatingSystemOrderBy,
    TagFilter, TagOrderBy, TagSearch,
};
pub use decoder::{
    decode_operating_system_key, decode_tag_key, OperatingSystemKey, TagKey,
    OPERATING_SYSTEM_DELIMITER,
};
pub use order::{resolve_order, OrderByKey};
pub use pagination::{PageWindow, DEFAULT_LIMIT, DEFAULT_OFFSET, MAX_LIMIT};
pub use resolver::{
    org_scope, EnumerationMeta, EnumerationRequest, EnumerationResolver, EnumerationResult,
    ENTITY_PATH_PREFIX,
};
