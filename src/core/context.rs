use crate::errors::{AppError, AppResult};
use crate::models::role::{Capability, Role};
use serde::{Deserialize, Serialize};

/// Where a request comes from. Recorded on every audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSource {
    pub address: Option<String>,
    pub client: Option<String>,
}

impl RequestSource {
    pub fn new<A: Into<String>, C: Into<String>>(address: A, client: C) -> Self {
        Self {
            address: Some(address.into()),
            client: Some(client.into()),
        }
    }

    /// Source describing this binary on the local machine.
    pub fn local() -> Self {
        Self::new(
            "127.0.0.1",
            format!("timeportal-cli/{}", env!("CARGO_PKG_VERSION")),
        )
    }
}

/// Identity and request metadata of the acting user, passed explicitly to
/// every core operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub source: RequestSource,
}

impl RequestContext {
    pub fn new(user_id: i64, username: &str, role: Role, source: RequestSource) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            role,
            source,
        }
    }

    pub fn can(&self, cap: Capability) -> bool {
        self.role.can(cap)
    }

    pub fn require(&self, cap: Capability) -> AppResult<()> {
        if self.can(cap) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "role '{}' is not allowed to {}",
                self.role, cap
            )))
        }
    }
}
