//! Camera authorization gate
//!
//! Maps the platform's authorization state to a binary permit/deny outcome,
//! prompting the user at most once when the state is still undetermined.

use async_trait::async_trait;

/// Platform-reported authorization state for camera access
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthorizationStatus {
    /// Access granted
    Authorized,
    /// Access denied by the user
    Denied,
    /// Access restricted (parental controls, etc)
    Restricted,
    /// User hasn't been asked yet
    NotDetermined,
    /// Platform reported a state we don't recognize
    Unknown,
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationStatus::Authorized => write!(f, "authorized"),
            AuthorizationStatus::Denied => write!(f, "denied"),
            AuthorizationStatus::Restricted => write!(f, "restricted"),
            AuthorizationStatus::NotDetermined => write!(f, "not_determined"),
            AuthorizationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Binary outcome of the authorization gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthorizationResult {
    Permitted,
    NotPermitted,
}

/// Access to the platform's permission subsystem.
///
/// `request_access` suspends until the user answers the system dialog and
/// must only be called while the status is [`AuthorizationStatus::NotDetermined`].
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    fn query_status(&self) -> AuthorizationStatus;
    async fn request_access(&self) -> bool;
}

/// Classify the platform state into a permit/deny result.
///
/// Issues exactly one permission prompt when the state is undetermined and
/// never re-prompts once the platform has already decided.
pub async fn check_authorization(provider: &dyn AuthorizationProvider) -> AuthorizationResult {
    match provider.query_status() {
        AuthorizationStatus::Authorized => AuthorizationResult::Permitted,
        AuthorizationStatus::NotDetermined => {
            log::info!("Camera permission not determined, requesting access");
            if provider.request_access().await {
                AuthorizationResult::Permitted
            } else {
                AuthorizationResult::NotPermitted
            }
        }
        AuthorizationStatus::Denied
        | AuthorizationStatus::Restricted
        | AuthorizationStatus::Unknown => AuthorizationResult::NotPermitted,
    }
}

/// The real permission subsystem for the current platform.
pub struct PlatformAuthorization;

#[async_trait]
impl AuthorizationProvider for PlatformAuthorization {
    fn query_status(&self) -> AuthorizationStatus {
        query_platform_status()
    }

    async fn request_access(&self) -> bool {
        #[cfg(target_os = "macos")]
        {
            request_access_macos().await
        }

        #[cfg(not(target_os = "macos"))]
        {
            // Windows and Linux have no programmatic prompt; access is
            // controlled through system settings and group membership.
            query_platform_status() == AuthorizationStatus::Authorized
        }
    }
}

fn query_platform_status() -> AuthorizationStatus {
    #[cfg(target_os = "windows")]
    {
        query_status_windows()
    }

    #[cfg(target_os = "macos")]
    {
        query_status_macos()
    }

    #[cfg(target_os = "linux")]
    {
        query_status_linux()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        AuthorizationStatus::Unknown
    }
}

#[cfg(target_os = "windows")]
fn query_status_windows() -> AuthorizationStatus {
    // Windows gates camera access through Privacy settings; device
    // enumeration is the closest observable proxy.
    use nokhwa::query;

    match query(nokhwa::utils::ApiBackend::Auto) {
        Ok(devices) if !devices.is_empty() => AuthorizationStatus::Authorized,
        Ok(_) => AuthorizationStatus::NotDetermined,
        Err(_) => AuthorizationStatus::Denied,
    }
}

#[cfg(target_os = "macos")]
fn query_status_macos() -> AuthorizationStatus {
    use objc::runtime::{Class, Object};
    use objc::{msg_send, sel, sel_impl};
    use std::ffi::CString;

    unsafe {
        let av_capture_device_class = match Class::get("AVCaptureDevice") {
            Some(class) => class,
            None => return AuthorizationStatus::Unknown,
        };

        let av_media_type_video = CString::new("vide").unwrap();
        let media_type: *mut Object =
            msg_send![av_capture_device_class, mediaTypeForString: av_media_type_video.as_ptr()];

        let auth_status: i64 =
            msg_send![av_capture_device_class, authorizationStatusForMediaType: media_type];

        // AVAuthorizationStatus: 0 = NotDetermined, 1 = Restricted,
        // 2 = Denied, 3 = Authorized
        match auth_status {
            3 => AuthorizationStatus::Authorized,
            2 => AuthorizationStatus::Denied,
            1 => AuthorizationStatus::Restricted,
            0 => AuthorizationStatus::NotDetermined,
            _ => AuthorizationStatus::Unknown,
        }
    }
}

#[cfg(target_os = "macos")]
async fn request_access_macos() -> bool {
    use block::ConcreteBlock;
    use objc::runtime::{Class, Object};
    use objc::{msg_send, sel, sel_impl};
    use std::ffi::CString;
    use tokio::sync::oneshot;

    log::info!("Requesting macOS camera permission");

    let (tx, rx) = oneshot::channel();

    unsafe {
        let av_capture_device_class = match Class::get("AVCaptureDevice") {
            Some(class) => class,
            None => return false,
        };

        let av_media_type_video = CString::new("vide").unwrap();
        let media_type: *mut Object =
            msg_send![av_capture_device_class, mediaTypeForString: av_media_type_video.as_ptr()];

        let tx = std::sync::Mutex::new(Some(tx));
        let handler = ConcreteBlock::new(move |granted: bool| {
            if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
                let _ = tx.send(granted);
            }
        });
        // Copy the block to the heap so it survives the async callback
        let handler = handler.copy();

        let _: () = msg_send![av_capture_device_class, requestAccessForMediaType:media_type completionHandler:&*handler];
    }

    rx.await.unwrap_or(false)
}

#[cfg(target_os = "linux")]
fn query_status_linux() -> AuthorizationStatus {
    use std::path::Path;

    let video_devices: Vec<_> = (0..10)
        .map(|i| format!("/dev/video{}", i))
        .filter(|path| Path::new(path).exists())
        .collect();

    if video_devices.is_empty() {
        return AuthorizationStatus::NotDetermined;
    }

    if linux_video_group_member() {
        AuthorizationStatus::Authorized
    } else {
        AuthorizationStatus::Denied
    }
}

#[cfg(target_os = "linux")]
fn linux_video_group_member() -> bool {
    use std::process::Command;

    // Device nodes are readable through 'video' or 'plugdev' membership
    let output = Command::new("groups").output().ok();

    if let Some(output) = output {
        if let Ok(groups) = String::from_utf8(output.stdout) {
            return groups.contains("video") || groups.contains("plugdev");
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubAuthorization;

    #[tokio::test]
    async fn test_authorized_is_permitted_without_prompt() {
        let provider = StubAuthorization::new(AuthorizationStatus::Authorized, false);
        let result = check_authorization(&provider).await;
        assert_eq!(result, AuthorizationResult::Permitted);
        assert_eq!(provider.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_not_determined_prompts_once_and_grant_is_permitted() {
        let provider = StubAuthorization::new(AuthorizationStatus::NotDetermined, true);
        let result = check_authorization(&provider).await;
        assert_eq!(result, AuthorizationResult::Permitted);
        assert_eq!(provider.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_not_determined_prompts_once_and_denial_is_not_permitted() {
        let provider = StubAuthorization::new(AuthorizationStatus::NotDetermined, false);
        let result = check_authorization(&provider).await;
        assert_eq!(result, AuthorizationResult::NotPermitted);
        assert_eq!(provider.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_decided_states_never_prompt() {
        for status in [
            AuthorizationStatus::Denied,
            AuthorizationStatus::Restricted,
            AuthorizationStatus::Unknown,
        ] {
            let provider = StubAuthorization::new(status, true);
            let result = check_authorization(&provider).await;
            assert_eq!(result, AuthorizationResult::NotPermitted);
            assert_eq!(provider.prompt_count(), 0, "{status} must not prompt");
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AuthorizationStatus::Authorized.to_string(), "authorized");
        assert_eq!(
            AuthorizationStatus::NotDetermined.to_string(),
            "not_determined"
        );
    }
}
