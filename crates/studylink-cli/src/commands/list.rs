//! Request listing commands.
//!
//! Listings walk the service's lazy cursors, so `--limit` stops fetching as
//! soon as enough rows have been read.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;
use studylink_domain::{ActorId, EventSink, StudyRequest};
use studylink_service::{ServiceError, StudyService};

/// Execute the incoming command.
pub fn execute_incoming<S: EventSink>(
    args: ListArgs,
    actor: &ActorId,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    print_requests(service.incoming_pending(actor), args.limit, formatter)
}

/// Execute the outgoing command.
pub fn execute_outgoing<S: EventSink>(
    args: ListArgs,
    actor: &ActorId,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    print_requests(service.outgoing_pending(actor), args.limit, formatter)
}

/// Execute the history command.
pub fn execute_history<S: EventSink>(
    args: ListArgs,
    actor: &ActorId,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    print_requests(service.history(actor), args.limit, formatter)
}

fn print_requests<I, E>(cursor: I, limit: Option<usize>, formatter: &Formatter) -> Result<()>
where
    I: Iterator<Item = std::result::Result<StudyRequest, E>>,
    ServiceError: From<E>,
{
    let requests = collect_limited(cursor, limit)?;
    println!("{}", formatter.format_requests(&requests)?);
    Ok(())
}

fn collect_limited<I, E>(cursor: I, limit: Option<usize>) -> Result<Vec<StudyRequest>>
where
    I: Iterator<Item = std::result::Result<StudyRequest, E>>,
    ServiceError: From<E>,
{
    let collected: std::result::Result<Vec<_>, E> = match limit {
        Some(limit) => cursor.take(limit).collect(),
        None => cursor.collect(),
    };
    Ok(collected.map_err(ServiceError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studylink_domain::NullSink;
    use studylink_service::ServiceConfig;

    #[test]
    fn test_limit_is_applied() {
        let config = ServiceConfig {
            page_size: 1,
            ..ServiceConfig::in_memory()
        };
        let mut service = StudyService::open(config, NullSink).unwrap();
        let hub = ActorId::new("hub").unwrap();
        service.register_actor(&hub).unwrap();
        for i in 0..4 {
            let peer = ActorId::new(format!("peer-{}", i)).unwrap();
            service.register_actor(&peer).unwrap();
            service.send_request(&peer, &hub).unwrap();
        }

        let limited = collect_limited(service.incoming_pending(&hub), Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].sender.as_str(), "peer-3");

        let all = collect_limited(service.history(&hub), None).unwrap();
        assert_eq!(all.len(), 4);
        assert!(collect_limited(service.outgoing_pending(&hub), None)
            .unwrap()
            .is_empty());
    }
}
