use std::fmt;
use std::sync::Arc;

use crate::prelude::*;

use super::client::IamApi;
use super::error::{AwsApiError, InspectionError};
use super::render;

/// Policy names of one IAM user, managed policies first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPolicies {
    pub user: String,
    pub attached: Vec<String>,
    pub inline: Vec<String>,
}

impl UserPolicies {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attached
            .iter()
            .chain(self.inline.iter())
            .map(String::as_str)
    }
}

impl fmt::Display for UserPolicies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attached.is_empty() && self.inline.is_empty() {
            return write!(f, "User {} has no policies.", self.user);
        }
        f.write_str(&self.names().collect::<Vec<_>>().join("\n"))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DescribeUserPermissionsInput {
    /// IAM user name
    pub user: String,
}

/// Lists the managed and inline policy names of an IAM user.
pub struct DescribeUserPermissions {
    iam: Arc<dyn IamApi>,
}

impl DescribeUserPermissions {
    pub fn new(iam: Arc<dyn IamApi>) -> Self {
        Self { iam }
    }

    pub async fn inspect(&self, user: &str) -> Result<UserPolicies, InspectionError> {
        let failed = |source: AwsApiError| {
            log::debug!("policy listing for {} failed: {}", user, source);
            InspectionError::DescribeUser {
                user: user.to_string(),
                source,
            }
        };

        let attached = self
            .iam
            .list_attached_user_policies(user)
            .await
            .map_err(failed)?;
        let inline = self.iam.list_user_policies(user).await.map_err(failed)?;

        Ok(UserPolicies {
            user: user.to_string(),
            attached,
            inline,
        })
    }
}

impl Tool for DescribeUserPermissions {
    type Input = DescribeUserPermissionsInput;

    fn name(&self) -> &str {
        "describe_user_permissions"
    }

    fn description(&self) -> &str {
        "Return list of attached IAM policies for the given user."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(render(self.inspect(&input.user).await))
    }
}
