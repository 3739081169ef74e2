//! Sources of discovered stack resources.
//!
//! Live discovery against the cloud provider happens outside this tool; the
//! core only needs something that can hand it a fully-materialized
//! [`StackResources`]. The shipped implementation reads a JSON snapshot of a
//! discovery run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::output;
use crate::stack::StackResources;
use crate::stack::records::{
    DynamoTable, FirehoseDeliveryStream, LambdaEventSource, LambdaFunction, LogGroup, Queue, Role,
    Topic, TopicSubscription,
};

/// Anything that can produce the resource set for one conversion run.
pub trait StackSource {
    fn load(&self) -> Result<StackResources>;
}

/// Loads a stack snapshot file: `{"resources": [{"resource_type", "logical_id",
/// "description"}, ...]}` as written by a discovery run.
pub struct SnapshotSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    resources: Vec<SnapshotEntry>,
}

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    resource_type: String,
    logical_id: String,
    #[serde(default)]
    description: Value,
}

/// Gateway kinds the stack may contain that have no Terraform counterpart
/// here; skipped without a warning, matching long-standing behavior.
const IGNORED_RESOURCE_TYPES: &[&str] = &[
    "AWS::ApiGateway::Authorizer",
    "AWS::ApiGateway::Deployment",
    "AWS::ApiGateway::Method",
    "AWS::ApiGateway::Resource",
    "AWS::ApiGateway::RestApi",
    "AWS::ApiGatewayV2::Api",
    "AWS::ApiGatewayV2::Integration",
    "AWS::ApiGatewayV2::Route",
    "AWS::ApiGatewayV2::Stage",
];

impl SnapshotSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl StackSource for SnapshotSource {
    fn load(&self) -> Result<StackResources> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("unable to read snapshot file: {}", self.path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).context("unable to parse stack snapshot")?;

        collect_resources(snapshot)
    }
}

/// Classify snapshot entries into typed records.
///
/// An entry of a supported kind that fails to deserialize is fatal: a partial
/// stack would silently lose cross-reference targets. Unsupported kinds are
/// warned about and skipped.
fn collect_resources(snapshot: Snapshot) -> Result<StackResources> {
    let mut resources = StackResources::default();

    for entry in snapshot.resources {
        match entry.resource_type.as_str() {
            "AWS::DynamoDB::Table" => {
                resources.tables.push(DynamoTable {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::IAM::Role" => {
                resources.roles.push(Role {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::KinesisFirehose::DeliveryStream" => {
                resources.delivery_streams.push(FirehoseDeliveryStream {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::Lambda::Function" => {
                resources.functions.push(LambdaFunction {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::Lambda::EventSourceMapping" => {
                resources.event_sources.push(LambdaEventSource {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::Logs::LogGroup" => {
                resources.log_groups.push(LogGroup {
                    description: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::SQS::Queue" => {
                resources.queues.push(Queue {
                    attributes: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::SNS::Topic" => {
                resources.topics.push(Topic {
                    attributes: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            "AWS::SNS::Subscription" => {
                resources.subscriptions.push(TopicSubscription {
                    attributes: parse_description(&entry)?,
                    logical_id: entry.logical_id,
                });
            }
            ignored if IGNORED_RESOURCE_TYPES.contains(&ignored) => {}
            unsupported => {
                output::warning(&format!(
                    "unsupported resource type '{}' for '{}', skipping",
                    unsupported, entry.logical_id
                ));
            }
        }
    }

    Ok(resources)
}

fn parse_description<T: serde::de::DeserializeOwned>(entry: &SnapshotEntry) -> Result<T> {
    if entry.description.is_null() {
        bail!(
            "snapshot entry '{}' ({}) has no description",
            entry.logical_id,
            entry.resource_type
        );
    }

    serde_json::from_value(entry.description.clone()).with_context(|| {
        format!(
            "unable to parse description of '{}' ({})",
            entry.logical_id, entry.resource_type
        )
    })
}
