use async_trait::async_trait;

use crate::{entities::notification::OutboundEmail, errors::DispatchError};

/// Hands a rendered notification to whatever actually delivers mail.
/// One call per accepted submission; implementations must not retry.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}
