use std::fmt;
use std::sync::Arc;

use crate::prelude::*;

use super::client::{Ec2Api, Instance, IpFilter};
use super::error::InspectionError;
use super::render;

/// Result of an instance lookup by IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceLookup {
    Found(Instance),
    NotFound,
}

impl fmt::Display for InstanceLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceLookup::Found(instance) => {
                f.write_str(instance.instance_type.as_deref().unwrap_or("unknown"))
            }
            InstanceLookup::NotFound => f.write_str("Instance not found"),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct Ec2InstanceTypeByIpInput {
    /// Public or private IPv4 address of the instance
    pub ip: String,
}

/// Finds the type of the EC2 instance holding an IP address.
///
/// The public address is tried first, then the private one.
pub struct Ec2InstanceTypeByIp {
    ec2: Arc<dyn Ec2Api>,
}

impl Ec2InstanceTypeByIp {
    pub fn new(ec2: Arc<dyn Ec2Api>) -> Self {
        Self { ec2 }
    }

    pub async fn inspect(&self, ip: &str) -> Result<InstanceLookup, InspectionError> {
        for filter in [IpFilter::PublicIp, IpFilter::PrivateIp] {
            let reservations = self
                .ec2
                .describe_instances(filter, ip)
                .await
                .map_err(|e| {
                    log::debug!("DescribeInstances {}={} failed: {}", filter.filter_name(), ip, e);
                    InspectionError::DescribeInstances(e)
                })?;

            if let Some(instance) = reservations.into_iter().flat_map(|r| r.instances).next() {
                return Ok(InstanceLookup::Found(instance));
            }
        }

        Ok(InstanceLookup::NotFound)
    }
}

impl Tool for Ec2InstanceTypeByIp {
    type Input = Ec2InstanceTypeByIpInput;

    fn name(&self) -> &str {
        "ec2_instance_type_by_ip"
    }

    fn description(&self) -> &str {
        "Given an IP address, return the instance type of the EC2 instance."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(render(self.inspect(&input.ip).await))
    }
}
