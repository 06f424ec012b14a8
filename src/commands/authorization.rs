//! Tauri commands for camera authorization

use tauri::command;

use crate::authorization::{
    check_authorization, AuthorizationProvider, AuthorizationResult, AuthorizationStatus,
    PlatformAuthorization,
};

/// Query the platform's current camera authorization state without prompting
#[command]
pub async fn check_camera_authorization() -> Result<AuthorizationStatus, String> {
    log::debug!("Checking camera authorization status");
    Ok(PlatformAuthorization.query_status())
}

/// Run the authorization gate: prompts the user once if the state is still
/// undetermined, otherwise classifies the existing decision.
#[command]
pub async fn request_camera_authorization() -> Result<AuthorizationResult, String> {
    log::info!("Running camera authorization gate");
    Ok(check_authorization(&PlatformAuthorization).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires OS permission state - run manually"]
    async fn test_check_camera_authorization() {
        let status = check_camera_authorization().await.unwrap();
        println!("Authorization status: {}", status);
    }
}
