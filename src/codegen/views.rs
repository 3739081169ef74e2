//! Typed views handed to the templates.
//!
//! One view struct per template category, so the contract between the
//! rendering engine and each template is checkable in Rust instead of being
//! duck-typed inside the templates. The views flatten the typed records into
//! exactly the fields the templates consume.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stack::records::{
    DynamoTable, FirehoseDeliveryStream, KeyType, LambdaEventSource, LambdaFunction, LogGroup,
    Queue, RedrivePolicy, Role, Topic, TopicSubscription,
};
use crate::stack::{Resource, Stack};

/// Root data context for every template render.
#[derive(Debug, Serialize)]
pub struct StackView {
    pub name: String,
    pub service_name: String,
    pub additional_tags: BTreeMap<String, String>,
    /// Canonical key to resource, read by the `lookup` helper.
    pub index: BTreeMap<String, Resource>,
    pub tables: Vec<TableView>,
    pub roles: Vec<RoleView>,
    pub delivery_streams: Vec<StreamView>,
    pub functions: Vec<FunctionView>,
    pub event_sources: Vec<EventSourceView>,
    pub log_groups: Vec<LogGroupView>,
    pub queues: Vec<QueueView>,
    pub topics: Vec<TopicView>,
    pub subscriptions: Vec<SubscriptionView>,
}

#[derive(Debug, Serialize)]
pub struct TableView {
    pub logical_id: String,
    pub table_name: String,
    pub read_capacity: i64,
    pub write_capacity: i64,
    pub hash_key: Option<String>,
    pub range_key: Option<String>,
    pub attributes: Vec<AttributeView>,
    pub global_secondary_indexes: Vec<SecondaryIndexView>,
}

#[derive(Debug, Serialize)]
pub struct AttributeView {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
}

#[derive(Debug, Serialize)]
pub struct SecondaryIndexView {
    pub name: String,
    pub hash_key: Option<String>,
    pub range_key: Option<String>,
    pub read_capacity: i64,
    pub write_capacity: i64,
    pub projection_type: String,
    pub non_key_attributes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleView {
    pub logical_id: String,
    pub role_name: String,
    /// Still percent-encoded; decoded at render time by `parse_policy`.
    pub assume_role_policy_document: String,
    pub policy_documents: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct StreamView {
    pub logical_id: String,
    pub delivery_stream_name: String,
    pub extended_s3_destinations: Vec<S3DestinationView>,
}

#[derive(Debug, Serialize)]
pub struct S3DestinationView {
    pub role_arn: String,
    pub bucket_arn: String,
    pub prefix: String,
    pub error_output_prefix: String,
    pub buffering_size: i64,
    pub buffering_interval: i64,
    pub compression_format: String,
}

#[derive(Debug, Serialize)]
pub struct FunctionView {
    pub logical_id: String,
    pub function_name: String,
    pub role: String,
    pub handler: String,
    pub runtime: String,
    pub memory_size: i64,
    pub timeout: i64,
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct EventSourceView {
    pub logical_id: String,
    pub event_source_arn: String,
    pub function_arn: String,
}

#[derive(Debug, Serialize)]
pub struct LogGroupView {
    pub logical_id: String,
    pub log_group_name: String,
    pub retention_in_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct QueueView {
    pub logical_id: String,
    pub queue_name: String,
    pub policy: Option<String>,
    pub redrive_policy: Option<RedrivePolicy>,
}

#[derive(Debug, Serialize)]
pub struct TopicView {
    pub logical_id: String,
    pub topic_name: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    pub logical_id: String,
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
}

impl StackView {
    pub fn from_stack(stack: &Stack) -> Self {
        let r = &stack.resources;

        Self {
            name: stack.name.clone(),
            service_name: stack.service_name.clone(),
            additional_tags: stack.additional_tags.clone(),
            index: stack.index().clone(),
            tables: r.tables.iter().map(TableView::from_record).collect(),
            roles: r.roles.iter().map(RoleView::from_record).collect(),
            delivery_streams: r.delivery_streams.iter().map(StreamView::from_record).collect(),
            functions: r.functions.iter().map(FunctionView::from_record).collect(),
            event_sources: r.event_sources.iter().map(EventSourceView::from_record).collect(),
            log_groups: r.log_groups.iter().map(LogGroupView::from_record).collect(),
            queues: r.queues.iter().map(QueueView::from_record).collect(),
            topics: r.topics.iter().map(TopicView::from_record).collect(),
            subscriptions: r.subscriptions.iter().map(SubscriptionView::from_record).collect(),
        }
    }
}

impl TableView {
    fn from_record(record: &DynamoTable) -> Self {
        let d = &record.description;

        Self {
            logical_id: record.logical_id.clone(),
            table_name: d.table_name.clone(),
            read_capacity: d.provisioned_throughput.read_capacity_units,
            write_capacity: d.provisioned_throughput.write_capacity_units,
            hash_key: DynamoTable::key_schema_element(&d.key_schema, KeyType::Hash),
            range_key: DynamoTable::key_schema_element(&d.key_schema, KeyType::Range),
            attributes: d
                .attribute_definitions
                .iter()
                .map(|a| AttributeView {
                    name: a.attribute_name.clone(),
                    attribute_type: a.attribute_type.clone(),
                })
                .collect(),
            global_secondary_indexes: d
                .global_secondary_indexes
                .iter()
                .map(|gsi| SecondaryIndexView {
                    name: gsi.index_name.clone(),
                    hash_key: DynamoTable::key_schema_element(&gsi.key_schema, KeyType::Hash),
                    range_key: DynamoTable::key_schema_element(&gsi.key_schema, KeyType::Range),
                    read_capacity: gsi.provisioned_throughput.read_capacity_units,
                    write_capacity: gsi.provisioned_throughput.write_capacity_units,
                    projection_type: gsi.projection.projection_type.clone(),
                    non_key_attributes: gsi.projection.non_key_attributes.clone(),
                })
                .collect(),
        }
    }
}

impl RoleView {
    fn from_record(record: &Role) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            role_name: record.description.role_name.clone(),
            assume_role_policy_document: record.description.assume_role_policy_document.clone(),
            policy_documents: record.description.policy_documents.clone(),
        }
    }
}

impl StreamView {
    fn from_record(record: &FirehoseDeliveryStream) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            delivery_stream_name: record.description.delivery_stream_name.clone(),
            extended_s3_destinations: record
                .description
                .extended_s3_destinations
                .iter()
                .map(|d| S3DestinationView {
                    role_arn: d.role_arn.clone(),
                    bucket_arn: d.bucket_arn.clone(),
                    prefix: d.prefix.clone(),
                    error_output_prefix: d.error_output_prefix.clone(),
                    buffering_size: d.buffering_size,
                    buffering_interval: d.buffering_interval,
                    compression_format: d.compression_format.clone(),
                })
                .collect(),
        }
    }
}

impl FunctionView {
    fn from_record(record: &LambdaFunction) -> Self {
        let d = &record.description;

        Self {
            logical_id: record.logical_id.clone(),
            function_name: d.function_name.clone(),
            role: d.role.clone(),
            handler: d.handler.clone(),
            runtime: d.runtime.clone(),
            memory_size: d.memory_size,
            timeout: d.timeout,
            environment: d.environment.clone(),
        }
    }
}

impl EventSourceView {
    fn from_record(record: &LambdaEventSource) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            event_source_arn: record.description.event_source_arn.clone(),
            function_arn: record.description.function_arn.clone(),
        }
    }
}

impl LogGroupView {
    fn from_record(record: &LogGroup) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            log_group_name: record.description.log_group_name.clone(),
            retention_in_days: record.description.retention_in_days,
        }
    }
}

impl QueueView {
    fn from_record(record: &Queue) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            queue_name: record.queue_name().to_string(),
            policy: record.policy().map(str::to_string),
            redrive_policy: record.redrive_policy(),
        }
    }
}

impl TopicView {
    fn from_record(record: &Topic) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            topic_name: record.topic_name().to_string(),
        }
    }
}

impl SubscriptionView {
    fn from_record(record: &TopicSubscription) -> Self {
        Self {
            logical_id: record.logical_id.clone(),
            topic_arn: record.attribute("TopicArn").to_string(),
            protocol: record.attribute("Protocol").to_string(),
            endpoint: record.attribute("Endpoint").to_string(),
        }
    }
}
