//! The resource model: typed records for one conversion run plus the
//! canonical-key index used to resolve cross-resource references.

pub mod records;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConvertOptions;
use crate::output;
use records::{
    DynamoTable, FirehoseDeliveryStream, LambdaEventSource, LambdaFunction, LogGroup, Queue, Role,
    Topic, TopicSubscription,
};

/// The canonical projection of a discovered resource: everything code
/// generation and the import script need, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Terraform resource kind, e.g. `aws_dynamodb_table`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Raw, pre-normalization name (the stack-local logical ID).
    pub identifier: String,
    /// Value `terraform import` needs: name, ARN, URL, or UUID by kind.
    pub import_key: String,
    /// Attribute other resources reference, `arn` for every supported kind.
    pub output_key: String,
}

/// All typed records discovered for one run, grouped by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackResources {
    #[serde(default)]
    pub tables: Vec<DynamoTable>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub delivery_streams: Vec<FirehoseDeliveryStream>,
    #[serde(default)]
    pub functions: Vec<LambdaFunction>,
    #[serde(default)]
    pub event_sources: Vec<LambdaEventSource>,
    #[serde(default)]
    pub log_groups: Vec<LogGroup>,
    #[serde(default)]
    pub queues: Vec<Queue>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub subscriptions: Vec<TopicSubscription>,
}

/// Aggregate over all discovered resources for one conversion run.
///
/// The index is built once here and never mutated afterwards, which is what
/// makes reference resolution during rendering safe without synchronization.
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub service_name: String,
    pub additional_tags: BTreeMap<String, String>,
    index: BTreeMap<String, Resource>,
    pub resources: StackResources,
}

impl Stack {
    pub fn new(options: &ConvertOptions, resources: StackResources) -> Self {
        let index = build_index(&resources);

        Self {
            name: options.stack_name.clone(),
            service_name: options.service_name.clone(),
            additional_tags: options.additional_tags.clone(),
            index,
            resources,
        }
    }

    /// Look a canonical key up in the index. Absent keys are simply not found.
    pub fn lookup(&self, key: &str) -> Option<&Resource> {
        self.index.get(key)
    }

    pub fn index(&self) -> &BTreeMap<String, Resource> {
        &self.index
    }

    /// Every record's projection, indexed or not. This is the set the import
    /// script covers, and it matches what the templates render.
    pub fn all_resources(&self) -> Vec<Resource> {
        let r = &self.resources;
        let mut all = Vec::new();

        all.extend(r.tables.iter().map(DynamoTable::resource));
        all.extend(r.roles.iter().map(Role::resource));
        all.extend(r.delivery_streams.iter().map(FirehoseDeliveryStream::resource));
        all.extend(r.functions.iter().map(LambdaFunction::resource));
        all.extend(r.event_sources.iter().map(LambdaEventSource::resource));
        all.extend(r.log_groups.iter().map(LogGroup::resource));
        all.extend(r.queues.iter().map(Queue::resource));
        all.extend(r.topics.iter().map(Topic::resource));
        all.extend(r.subscriptions.iter().map(TopicSubscription::resource));
        all
    }
}

/// Build the canonical-key index over the kinds other resources reference.
///
/// Log groups, event-source mappings, delivery streams, and subscriptions are
/// never cross-referenced, so they are not indexed. A record with an empty key
/// is a data-integrity fault: reported and excluded rather than indexed under
/// an empty string.
fn build_index(resources: &StackResources) -> BTreeMap<String, Resource> {
    let mut index = BTreeMap::new();

    let mut insert = |key: &str, resource: Resource| {
        if key.is_empty() {
            output::warning(&format!(
                "{} '{}' has no canonical key, excluded from reference index",
                resource.resource_type, resource.identifier
            ));
            return;
        }
        index.insert(key.to_string(), resource);
    };

    for record in &resources.tables {
        insert(record.key(), record.resource());
    }
    for record in &resources.roles {
        insert(record.key(), record.resource());
    }
    for record in &resources.functions {
        insert(record.key(), record.resource());
    }
    for record in &resources.queues {
        insert(record.key(), record.resource());
    }
    for record in &resources.topics {
        insert(record.key(), record.resource());
    }

    index
}

#[cfg(test)]
mod tests {
    use super::records::*;
    use super::*;
    use crate::config::ConvertOptions;

    fn options() -> ConvertOptions {
        ConvertOptions {
            stack_name: "orders-prod".to_string(),
            service_name: "orders".to_string(),
            region: String::new(),
            additional_tags: BTreeMap::new(),
        }
    }

    fn table(logical_id: &str, name: &str, arn: &str) -> DynamoTable {
        DynamoTable {
            logical_id: logical_id.to_string(),
            description: TableDescription {
                table_name: name.to_string(),
                table_arn: arn.to_string(),
                key_schema: vec![KeySchemaElement {
                    attribute_name: "id".to_string(),
                    key_type: KeyType::Hash,
                }],
                attribute_definitions: vec![AttributeDefinition {
                    attribute_name: "id".to_string(),
                    attribute_type: "S".to_string(),
                }],
                provisioned_throughput: ProvisionedThroughput {
                    read_capacity_units: 1,
                    write_capacity_units: 1,
                },
                global_secondary_indexes: Vec::new(),
            },
        }
    }

    #[test]
    fn test_index_contains_keyed_kinds_only() {
        let resources = StackResources {
            tables: vec![table(
                "OrdersTable",
                "orders-prod",
                "arn:aws:dynamodb:us-east-1:123456789012:table/orders-prod",
            )],
            log_groups: vec![LogGroup {
                logical_id: "ApiLogGroup".to_string(),
                description: LogGroupDescription {
                    log_group_name: "/aws/lambda/api".to_string(),
                    retention_in_days: Some(14),
                },
            }],
            ..Default::default()
        };
        let stack = Stack::new(&options(), resources);

        assert_eq!(stack.index().len(), 1);

        let resource = stack
            .lookup("arn:aws:dynamodb:us-east-1:123456789012:table/orders-prod")
            .unwrap();
        assert_eq!(resource.resource_type, "aws_dynamodb_table");
        assert_eq!(resource.identifier, "OrdersTable");
    }

    #[test]
    fn test_lookup_missing_key() {
        let stack = Stack::new(&options(), StackResources::default());
        assert!(stack.lookup("arn:aws:sqs:us-east-1:123456789012:ghost").is_none());
    }

    #[test]
    fn test_empty_key_excluded() {
        let resources = StackResources {
            queues: vec![Queue {
                logical_id: "BrokenQueue".to_string(),
                attributes: BTreeMap::new(),
            }],
            ..Default::default()
        };
        let stack = Stack::new(&options(), resources);

        assert!(stack.index().is_empty());
        // The record still exists and still gets an import command.
        assert_eq!(stack.all_resources().len(), 1);
    }

    #[test]
    fn test_all_resources_covers_every_kind() {
        let resources = StackResources {
            tables: vec![table(
                "OrdersTable",
                "orders-prod",
                "arn:aws:dynamodb:us-east-1:123456789012:table/orders-prod",
            )],
            event_sources: vec![LambdaEventSource {
                logical_id: "WorkerEventSource".to_string(),
                description: EventSourceMappingConfiguration {
                    uuid: "a1b2c3d4".to_string(),
                    event_source_arn: "arn:aws:sqs:us-east-1:123456789012:jobs".to_string(),
                    function_arn: "arn:aws:lambda:us-east-1:123456789012:function:worker"
                        .to_string(),
                },
            }],
            subscriptions: vec![TopicSubscription {
                logical_id: "AlertsSubscription".to_string(),
                attributes: [(
                    "SubscriptionArn".to_string(),
                    "arn:aws:sns:us-east-1:123456789012:alerts:deadbeef".to_string(),
                )]
                .into(),
            }],
            ..Default::default()
        };
        let stack = Stack::new(&options(), resources);

        let all = stack.all_resources();
        let types: Vec<&str> = all.iter().map(|r| r.resource_type.as_str()).collect();

        assert_eq!(all.len(), 3);
        assert!(types.contains(&"aws_dynamodb_table"));
        assert!(types.contains(&"aws_lambda_event_source_mapping"));
        assert!(types.contains(&"aws_sns_topic_subscription"));
    }
}
