//! Partner command implementations.

use super::parse_actor;
use crate::cli::RemoveArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::io::{self, Write};
use studylink_domain::{ActorId, EventSink};
use studylink_service::StudyService;

/// Execute the partners command.
pub fn execute_partners<S: EventSink>(
    actor: &ActorId,
    service: &StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let partners = service.my_partners(actor)?;
    println!("{}", formatter.format_partners(&partners)?);
    Ok(())
}

/// Execute the remove command.
pub fn execute_remove<S: EventSink>(
    args: RemoveArgs,
    actor: &ActorId,
    service: &mut StudyService<S>,
    formatter: &Formatter,
) -> Result<()> {
    let partner = parse_actor(&args.partner)?;

    // Confirm removal unless --yes is specified
    if !args.yes {
        print!("Stop being study partners with {}? [y/N] ", partner);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let removal = service.remove_partner(actor, &partner)?;
    println!("{}", formatter.format_removal(&removal)?);
    Ok(())
}
