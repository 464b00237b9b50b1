use super::Mode;
use crate::config::Environment;
use crate::context::ProcessContext;
use crate::error::ConflictingEnvironmentError;

/// Resolve the runtime mode and record it in the process context.
///
/// The context is only updated when it has already been initialised.
pub fn resolve<I, S>(labels: I) -> Result<Mode, ConflictingEnvironmentError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mode = Mode::select(labels)?;
    if ProcessContext::update_mode(mode) {
        tracing::debug!("Process mode set to {}", mode);
    }
    Ok(mode)
}

/// Resolve the runtime mode from the active profiles of a layered environment
pub fn resolve_environment(environment: &Environment) -> Result<Mode, ConflictingEnvironmentError> {
    resolve(environment.active_profiles())
}
