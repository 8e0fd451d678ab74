//! Request command implementations.

use super::{parse_actor, parse_request_id};
use crate::cli::{RequestArgs, RespondArgs, SendArgs};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use studylink_domain::{ActorId, EventSink, StudyRequest};
use studylink_service::{ServiceError, StudyService};

/// Execute the send command.
pub fn execute_send<S: EventSink>(
    args: SendArgs,
    actor: &ActorId,
    service: &mut StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let receiver = parse_actor(&args.to)?;
    let request = service.send_request(actor, &receiver)?;
    print_outcome(
        &request,
        &format!("Study request sent to {}", receiver),
        formatter,
    )
}

/// Execute the respond command.
pub fn execute_respond<S: EventSink>(
    args: RespondArgs,
    actor: &ActorId,
    service: &mut StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_request_id(&args.id)?;
    let request = service.respond_to_request_str(actor, id, &args.decision)?;
    print_outcome(
        &request,
        &format!(
            "Request from {} is now {}",
            request.sender,
            formatter.status(request.status)
        ),
        formatter,
    )
}

/// Execute the cancel command.
pub fn execute_cancel<S: EventSink>(
    args: RequestArgs,
    actor: &ActorId,
    service: &mut StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_request_id(&args.id)?;
    let request = service.cancel_request(actor, id)?;
    print_outcome(
        &request,
        &format!("Request to {} cancelled", request.receiver),
        formatter,
    )
}

/// Execute the show command.
///
/// Only the sender and receiver of a request may see it; anyone else gets the
/// same answer as for a request that does not exist.
pub fn execute_show<S: EventSink>(
    args: RequestArgs,
    actor: &ActorId,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_request_id(&args.id)?;
    let request = service
        .get_request(id)?
        .filter(|request| request.involves(actor))
        .ok_or(ServiceError::RequestNotFound(id))?;
    println!("{}", formatter.format_request(&request)?);
    Ok(())
}

fn print_outcome(request: &StudyRequest, message: &str, formatter: &Formatter) -> Result<()> {
    match formatter.format() {
        OutputFormat::Table => {
            println!("{}", formatter.success(&format!("{} ({})", message, request.id)))
        }
        _ => println!("{}", formatter.format_request(request)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use studylink_domain::{NullSink, RequestStatus};
    use studylink_service::ServiceConfig;

    fn setup() -> (StudyService<NullSink>, ActorId, ActorId) {
        let service = StudyService::open(ServiceConfig::in_memory(), NullSink).unwrap();
        let alice = ActorId::new("alice").unwrap();
        let bob = ActorId::new("bob").unwrap();
        service.register_actor(&alice).unwrap();
        service.register_actor(&bob).unwrap();
        (service, alice, bob)
    }

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    #[test]
    fn test_send_and_respond() {
        let (mut service, alice, bob) = setup();

        execute_send(SendArgs { to: "bob".into() }, &alice, &mut service, &quiet()).unwrap();
        let request = service.incoming_pending(&bob).next().unwrap().unwrap();

        let args = RespondArgs {
            id: request.id.to_string(),
            decision: "approve".into(),
        };
        execute_respond(args, &bob, &mut service, &quiet()).unwrap();

        assert!(service.are_partners(&alice, &bob).unwrap());
    }

    #[test]
    fn test_invalid_decision_is_service_error() {
        let (mut service, alice, bob) = setup();
        let request = service.send_request(&alice, &bob).unwrap();

        let args = RespondArgs {
            id: request.id.to_string(),
            decision: "later".into(),
        };
        let result = execute_respond(args, &bob, &mut service, &quiet());
        assert!(matches!(
            result,
            Err(CliError::Service(ServiceError::InvalidDecision(_)))
        ));
    }

    #[test]
    fn test_cancel() {
        let (mut service, alice, bob) = setup();
        let request = service.send_request(&alice, &bob).unwrap();

        let args = RequestArgs {
            id: request.id.to_string(),
        };
        execute_cancel(args, &alice, &mut service, &quiet()).unwrap();

        let stored = service.get_request(request.id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Closed);
    }

    #[test]
    fn test_show_hidden_from_outsiders() {
        let (mut service, alice, bob) = setup();
        let carol = ActorId::new("carol").unwrap();
        let request = service.send_request(&alice, &bob).unwrap();

        let args = RequestArgs {
            id: request.id.to_string(),
        };
        execute_show(args, &bob, &service, &quiet()).unwrap();

        let args = RequestArgs {
            id: request.id.to_string(),
        };
        let result = execute_show(args, &carol, &service, &quiet());
        assert!(matches!(
            result,
            Err(CliError::Service(ServiceError::RequestNotFound(_)))
        ));
    }
}
