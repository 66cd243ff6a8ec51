//! Distinct host operating systems
//!
//! Operating systems are not indexed as a single keyword, so the
//! aggregation runs over a script that joins name, major and minor version
//! for hosts that report all three.

use serde::{Deserialize, Serialize};

use super::EnumerationAdapter;
use crate::enumeration::decoder::{
    decode_operating_system_key, OperatingSystemKey, OPERATING_SYSTEM_DELIMITER,
};
use crate::enumeration::order::OrderByKey;
use crate::error::EnumerationError;
use crate::filter::FilterTree;
use crate::search::{AggregationBucket, SortField, TermsAggregation};

const OS_NAME_FIELD: &str = "host.system_profile_facts.operating_system.name";
const OS_MAJOR_FIELD: &str = "host.system_profile_facts.operating_system.major";
const OS_MINOR_FIELD: &str = "host.system_profile_facts.operating_system.minor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystemOrderBy {
    Count,
    OperatingSystem,
}

impl OrderByKey for OperatingSystemOrderBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Self::Count),
            "operating_system" => Some(Self::OperatingSystem),
            _ => None,
        }
    }

    fn sort_field(self) -> SortField {
        match self {
            Self::Count => SortField::Count,
            Self::OperatingSystem => SortField::Key,
        }
    }
}

/// Arguments of the "list distinct operating systems" operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostOperatingSystemsArgs {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    pub order_how: Option<String>,
    #[serde(rename = "hostFilter")]
    pub host_filter: Option<FilterTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostOperatingSystem {
    pub operating_system: OperatingSystemKey,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostOperatingSystemsAdapter;

/// Painless script emitting `name||||major||||minor`, or nothing when a
/// part is missing
pub fn operating_system_script() -> String {
    let d = OPERATING_SYSTEM_DELIMITER;
    format!(
        "if(doc['{name}'].size()!=0 && doc['{major}'].size()!=0 && doc['{minor}'].size()!=0)\
         {{return doc['{name}'].value + '{d}' + doc['{major}'].value + '{d}' + doc['{minor}'].value;}}",
        name = OS_NAME_FIELD,
        major = OS_MAJOR_FIELD,
        minor = OS_MINOR_FIELD,
    )
}

impl EnumerationAdapter for HostOperatingSystemsAdapter {
    type OrderBy = OperatingSystemOrderBy;
    type Record = HostOperatingSystem;

    fn kind(&self) -> &'static str {
        "operating_systems"
    }

    fn aggregation(&self) -> TermsAggregation {
        TermsAggregation::script(operating_system_script())
    }

    fn decode(
        &self,
        bucket: &AggregationBucket,
    ) -> Result<Option<HostOperatingSystem>, EnumerationError> {
        Ok(
            decode_operating_system_key(&bucket.key).map(|operating_system| HostOperatingSystem {
                operating_system,
                count: bucket.doc_count,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::TermsSource;

    #[test]
    fn test_script_joins_all_three_parts() {
        let script = operating_system_script();
        assert_eq!(
            script,
            "if(doc['host.system_profile_facts.operating_system.name'].size()!=0 \
             && doc['host.system_profile_facts.operating_system.major'].size()!=0 \
             && doc['host.system_profile_facts.operating_system.minor'].size()!=0)\
             {return doc['host.system_profile_facts.operating_system.name'].value + '||||' \
             + doc['host.system_profile_facts.operating_system.major'].value + '||||' \
             + doc['host.system_profile_facts.operating_system.minor'].value;}"
        );
    }

    #[test]
    fn test_aggregation_is_scripted_without_include() {
        let terms = HostOperatingSystemsAdapter.aggregation();
        assert!(matches!(terms.source, TermsSource::Script(_)));
        assert_eq!(terms.include, None);
        assert_eq!(terms.size, 10_000);
    }

    #[test]
    fn test_decode() {
        let record = HostOperatingSystemsAdapter
            .decode(&AggregationBucket::new("RHEL||||8||||4", 12))
            .unwrap()
            .unwrap();
        assert_eq!(record.operating_system.name, "RHEL");
        assert_eq!(record.count, 12);

        assert_eq!(
            HostOperatingSystemsAdapter
                .decode(&AggregationBucket::new("", 3))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_order_by_names() {
        assert_eq!(
            OperatingSystemOrderBy::parse("operating_system"),
            Some(OperatingSystemOrderBy::OperatingSystem)
        );
        assert_eq!(OperatingSystemOrderBy::parse("tag"), None);
    }
}
