//! Register command implementation.

use super::parse_actor;
use crate::cli::RegisterArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use studylink_domain::{ActorId, EventSink};
use studylink_service::StudyService;

/// Execute the register command.
pub fn execute_register<S: EventSink>(
    args: RegisterArgs,
    acting: Option<&ActorId>,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let actors = if args.actors.is_empty() {
        vec![acting.cloned().ok_or(CliError::NoActor)?]
    } else {
        args.actors
            .iter()
            .map(|name| parse_actor(name))
            .collect::<Result<Vec<_>>>()?
    };

    for actor in &actors {
        if service.register_actor(actor)? {
            println!("{}", formatter.success(&format!("Registered {}", actor)));
        } else {
            println!("{}", formatter.info(&format!("{} is already registered", actor)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use studylink_domain::NullSink;
    use studylink_service::ServiceConfig;

    #[test]
    fn test_register_named_actors() {
        let service = StudyService::open(ServiceConfig::in_memory(), NullSink).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = RegisterArgs {
            actors: vec!["alice".into(), "bob".into()],
        };
        execute_register(args, None, &service, &formatter).unwrap();

        assert!(service.store().actor_exists(&ActorId::new("bob").unwrap()).unwrap());
    }

    #[test]
    fn test_register_defaults_to_acting_actor() {
        let service = StudyService::open(ServiceConfig::in_memory(), NullSink).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_register(RegisterArgs { actors: vec![] }, None, &service, &formatter);
        assert!(matches!(result, Err(CliError::NoActor)));

        let alice = ActorId::new("alice").unwrap();
        execute_register(RegisterArgs { actors: vec![] }, Some(&alice), &service, &formatter)
            .unwrap();
        assert!(service.store().actor_exists(&alice).unwrap());
    }
}
