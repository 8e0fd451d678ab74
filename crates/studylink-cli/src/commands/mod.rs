//! Command implementations.

pub mod list;
pub mod partner;
pub mod register;
pub mod request;

pub use self::list::{execute_history, execute_incoming, execute_outgoing};
pub use self::partner::{execute_partners, execute_remove};
pub use self::register::execute_register;
pub use self::request::{execute_cancel, execute_respond, execute_send, execute_show};

use crate::error::Result;
use studylink_domain::{ActorId, RequestId};
use studylink_service::ServiceError;

/// Parse an actor identifier from the command line.
pub fn parse_actor(value: &str) -> Result<ActorId> {
    ActorId::new(value)
        .map_err(|e| ServiceError::InvalidIdentifier(format!("actor '{}': {}", value, e)).into())
}

/// Parse a request ID from the command line.
pub fn parse_request_id(value: &str) -> Result<RequestId> {
    RequestId::from_string(value).map_err(|e| ServiceError::InvalidIdentifier(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_parse_actor() {
        assert_eq!(parse_actor(" alice ").unwrap().as_str(), "alice");
        assert!(matches!(
            parse_actor("   "),
            Err(CliError::Service(ServiceError::InvalidIdentifier(_)))
        ));
    }

    #[test]
    fn test_parse_request_id() {
        let id = RequestId::new();
        assert_eq!(parse_request_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_request_id("not-a-uuid"),
            Err(CliError::Service(ServiceError::InvalidIdentifier(_)))
        ));
    }
}
