use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ActivityCatalog, ActivityDetails, MessageResponse},
};
use storage::{Catalog, RosterError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: Catalog,
}

impl ApiContext {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

pub async fn list_activities(ctx: &ApiContext) -> ActivityCatalog {
    ctx.catalog.list_all().await
}

pub async fn get_activity(
    ctx: &ApiContext,
    activity_name: &str,
) -> Result<ActivityDetails, ApiError> {
    ctx.catalog
        .get(activity_name)
        .await
        .map(ActivityDetails::from)
        .ok_or_else(ApiError::activity_not_found)
}

/// Adds `email` to the roster of `activity_name`.
///
/// `max_participants` is not consulted: a full activity still accepts signups.
pub async fn signup(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
) -> Result<MessageResponse, ApiError> {
    let email = require_email(email)?;
    ctx.catalog
        .add_participant(activity_name, email)
        .await
        .map_err(|e| rejected(activity_name, email, e))?;
    info!(activity = activity_name, email, "signed up");
    Ok(MessageResponse::new(format!(
        "Signed up {email} for {activity_name}"
    )))
}

pub async fn unregister(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
) -> Result<MessageResponse, ApiError> {
    let email = require_email(email)?;
    ctx.catalog
        .remove_participant(activity_name, email)
        .await
        .map_err(|e| rejected(activity_name, email, e))?;
    info!(activity = activity_name, email, "unregistered");
    Ok(MessageResponse::new(format!(
        "Unregistered {email} from {activity_name}"
    )))
}

/// Emails are stored exactly as received; only the empty string is refused.
fn require_email(email: &str) -> Result<&str, ApiError> {
    if email.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "email must not be empty",
        ));
    }
    Ok(email)
}

fn rejected(activity_name: &str, email: &str, err: RosterError) -> ApiError {
    debug!(activity = activity_name, email, error = %err, "roster change rejected");
    match err {
        RosterError::UnknownActivity(_) => ApiError::activity_not_found(),
        RosterError::AlreadyEnrolled { .. } => ApiError::new(
            ErrorCode::AlreadySignedUp,
            "Student already signed up for this activity",
        ),
        RosterError::NotEnrolled { .. } => ApiError::new(
            ErrorCode::NotRegistered,
            "Student is not registered for this activity",
        ),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
