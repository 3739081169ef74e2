//! Typed records for every supported resource kind.
//!
//! Each record wraps the description returned by the discovery phase plus the
//! stack-local logical ID, and projects into the canonical [`Resource`] used
//! by code generation and the import script. Kinds that other resources
//! reference by ARN additionally expose `key()`, the canonical index key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamoTable {
    pub logical_id: String,
    pub description: TableDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescription {
    pub table_name: String,
    pub table_arn: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub provisioned_throughput: ProvisionedThroughput,
    #[serde(default)]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    Hash,
    Range,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    pub provisioned_throughput: ProvisionedThroughput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub projection_type: String,
    #[serde(default)]
    pub non_key_attributes: Vec<String>,
}

impl DynamoTable {
    pub fn key(&self) -> &str {
        &self.description.table_arn
    }

    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_dynamodb_table".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.table_name.clone(),
            output_key: "arn".to_string(),
        }
    }

    /// Attribute name of the schema element with the given key type.
    pub fn key_schema_element(schema: &[KeySchemaElement], key_type: KeyType) -> Option<String> {
        schema
            .iter()
            .find(|element| element.key_type == key_type)
            .map(|element| element.attribute_name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub logical_id: String,
    pub description: RoleDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDescription {
    pub role_name: String,
    pub arn: String,
    /// Percent-encoded JSON, exactly as IAM returns it.
    pub assume_role_policy_document: String,
    /// Inline policy name to percent-encoded policy document.
    #[serde(default)]
    pub policy_documents: BTreeMap<String, String>,
}

impl Role {
    pub fn key(&self) -> &str {
        &self.description.arn
    }

    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_iam_role".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.role_name.clone(),
            output_key: "arn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirehoseDeliveryStream {
    pub logical_id: String,
    pub description: DeliveryStreamDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStreamDescription {
    pub delivery_stream_name: String,
    pub delivery_stream_arn: String,
    #[serde(default)]
    pub extended_s3_destinations: Vec<ExtendedS3Destination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedS3Destination {
    pub role_arn: String,
    pub bucket_arn: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub error_output_prefix: String,
    pub buffering_size: i64,
    pub buffering_interval: i64,
    pub compression_format: String,
}

impl FirehoseDeliveryStream {
    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_kinesis_firehose_delivery_stream".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.delivery_stream_arn.clone(),
            output_key: "arn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaFunction {
    pub logical_id: String,
    pub description: FunctionConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfiguration {
    pub function_name: String,
    pub function_arn: String,
    pub role: String,
    pub handler: String,
    pub runtime: String,
    pub memory_size: i64,
    pub timeout: i64,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl LambdaFunction {
    pub fn key(&self) -> &str {
        &self.description.function_arn
    }

    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_lambda_function".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.function_name.clone(),
            output_key: "arn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaEventSource {
    pub logical_id: String,
    pub description: EventSourceMappingConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSourceMappingConfiguration {
    pub uuid: String,
    pub event_source_arn: String,
    pub function_arn: String,
}

impl LambdaEventSource {
    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_lambda_event_source_mapping".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.uuid.clone(),
            output_key: "arn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogGroup {
    pub logical_id: String,
    pub description: LogGroupDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogGroupDescription {
    pub log_group_name: String,
    #[serde(default)]
    pub retention_in_days: Option<i64>,
}

impl LogGroup {
    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_cloudwatch_log_group".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.description.log_group_name.clone(),
            output_key: "arn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub logical_id: String,
    /// Raw queue attributes as returned by `GetQueueAttributes`.
    pub attributes: BTreeMap<String, String>,
}

/// Dead-letter configuration parsed from a queue's `RedrivePolicy` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrivePolicy {
    #[serde(rename(deserialize = "deadLetterTargetArn"))]
    pub dead_letter_target_arn: String,
    #[serde(rename(deserialize = "maxReceiveCount"))]
    pub max_receive_count: i64,
}

impl Queue {
    pub fn key(&self) -> &str {
        self.attribute("QueueArn")
    }

    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_sqs_queue".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.queue_url(),
            output_key: "arn".to_string(),
        }
    }

    pub fn queue_name(&self) -> &str {
        self.key().rsplit(':').next().unwrap_or_default()
    }

    /// Queue URL reconstructed from the ARN, the identifier `terraform import`
    /// expects for SQS queues.
    pub fn queue_url(&self) -> String {
        let parts: Vec<&str> = self.key().split(':').collect();
        match (parts.get(3), parts.get(4), parts.get(5)) {
            (Some(region), Some(account), Some(name)) => {
                format!("https://{}.queue.amazonaws.com/{}/{}", region, account, name)
            }
            _ => String::new(),
        }
    }

    pub fn policy(&self) -> Option<&str> {
        self.attributes.get("Policy").map(String::as_str)
    }

    /// Absent or malformed attribute JSON yields `None`, never a partial value.
    pub fn redrive_policy(&self) -> Option<RedrivePolicy> {
        let raw = self.attributes.get("RedrivePolicy")?;
        serde_json::from_str(raw).ok()
    }

    fn attribute(&self, name: &str) -> &str {
        self.attributes.get(name).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub logical_id: String,
    pub attributes: BTreeMap<String, String>,
}

impl Topic {
    pub fn key(&self) -> &str {
        self.attribute("TopicArn")
    }

    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_sns_topic".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.key().to_string(),
            output_key: "arn".to_string(),
        }
    }

    pub fn topic_name(&self) -> &str {
        self.key().rsplit(':').next().unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> &str {
        self.attributes.get(name).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSubscription {
    pub logical_id: String,
    pub attributes: BTreeMap<String, String>,
}

impl TopicSubscription {
    pub fn resource(&self) -> Resource {
        Resource {
            resource_type: "aws_sns_topic_subscription".to_string(),
            identifier: self.logical_id.clone(),
            import_key: self.attribute("SubscriptionArn").to_string(),
            output_key: "arn".to_string(),
        }
    }

    pub fn attribute(&self, name: &str) -> &str {
        self.attributes.get(name).map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_with(attributes: &[(&str, &str)]) -> Queue {
        Queue {
            logical_id: "JobsQueue".to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_queue_url_from_arn() {
        let queue = queue_with(&[("QueueArn", "arn:aws:sqs:us-east-1:123456789012:jobs")]);

        assert_eq!(queue.queue_name(), "jobs");
        assert_eq!(
            queue.queue_url(),
            "https://us-east-1.queue.amazonaws.com/123456789012/jobs"
        );
    }

    #[test]
    fn test_queue_url_malformed_arn() {
        let queue = queue_with(&[("QueueArn", "not-an-arn")]);
        assert_eq!(queue.queue_url(), "");
    }

    #[test]
    fn test_redrive_policy_absent() {
        let queue = queue_with(&[("QueueArn", "arn:aws:sqs:us-east-1:123456789012:jobs")]);
        assert_eq!(queue.redrive_policy(), None);
    }

    #[test]
    fn test_redrive_policy_malformed() {
        let queue = queue_with(&[("RedrivePolicy", "{not json")]);
        assert_eq!(queue.redrive_policy(), None);
    }

    #[test]
    fn test_redrive_policy_present() {
        let queue = queue_with(&[(
            "RedrivePolicy",
            r#"{"deadLetterTargetArn":"arn:aws:sqs:us-east-1:123456789012:jobs-dlq","maxReceiveCount":3}"#,
        )]);

        let policy = queue.redrive_policy().unwrap();
        assert_eq!(
            policy.dead_letter_target_arn,
            "arn:aws:sqs:us-east-1:123456789012:jobs-dlq"
        );
        assert_eq!(policy.max_receive_count, 3);
    }

    #[test]
    fn test_topic_name_from_arn() {
        let topic = Topic {
            logical_id: "AlertsTopic".to_string(),
            attributes: [(
                "TopicArn".to_string(),
                "arn:aws:sns:us-east-1:123456789012:alerts".to_string(),
            )]
            .into(),
        };

        assert_eq!(topic.topic_name(), "alerts");
        assert_eq!(topic.resource().import_key, "arn:aws:sns:us-east-1:123456789012:alerts");
    }

    #[test]
    fn test_key_schema_element() {
        let schema = vec![
            KeySchemaElement {
                attribute_name: "id".to_string(),
                key_type: KeyType::Hash,
            },
            KeySchemaElement {
                attribute_name: "created_at".to_string(),
                key_type: KeyType::Range,
            },
        ];

        assert_eq!(
            DynamoTable::key_schema_element(&schema, KeyType::Hash),
            Some("id".to_string())
        );
        assert_eq!(
            DynamoTable::key_schema_element(&schema, KeyType::Range),
            Some("created_at".to_string())
        );
        assert_eq!(DynamoTable::key_schema_element(&schema[..1], KeyType::Range), None);
    }
}
