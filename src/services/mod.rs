//! Resource services: typed operations on workspaces, campaigns and messages.
//!
//! Each service is a short-lived handle borrowed from [`BriqClient`](crate::BriqClient),
//! e.g. `client.workspaces().list(&params)`.

mod campaigns;
mod messages;
mod workspaces;

pub use campaigns::Campaigns;
pub use messages::Messages;
pub use workspaces::Workspaces;

use crate::client::error::BriqError;

/// Name the resource in a generic 404 coming back from an id-addressed call.
fn not_found_as(resource: &str, id: &str, err: BriqError) -> BriqError {
    if err.is_not_found() {
        BriqError::not_found(resource, Some(id.to_owned()))
    } else {
        err
    }
}

/// `Ok(false)` for a missing resource; every other error propagates.
fn found<T>(result: Result<T, BriqError>) -> Result<bool, BriqError> {
    match result {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_is_relabeled() {
        let err = not_found_as("Workspace", "w-1", BriqError::not_found("Resource", None));
        assert_eq!(err.to_string(), "Workspace with ID 'w-1' not found");

        let err = not_found_as("Workspace", "w-1", BriqError::validation("bad"));
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn found_maps_not_found_to_false() {
        assert!(found(Ok(())).unwrap());
        assert!(!found::<()>(Err(BriqError::not_found("Campaign", None))).unwrap());
        assert!(found::<()>(Err(BriqError::validation("bad"))).is_err());
    }
}
