use crate::{
    PermissionGate,
    platform::{
        AuthorizationStatus, MediaKind,
        simulated::{SimulatedPlatform, SimulationOptions},
    },
};

use std::{sync::Arc, time::Duration};

fn gate(simulated: &SimulatedPlatform) -> PermissionGate {
    PermissionGate::new(Arc::clone(&simulated.platform().permissions))
}

/// WHAT: Both grants resolve true
/// WHY: The happy path must let a shortcut start recording
#[tokio::test]
async fn given_both_granted_when_requesting_then_true() {
    // Given: A platform that grants camera and microphone
    let simulated = SimulatedPlatform::new(SimulationOptions::default());

    // When: Requesting permission
    let granted = gate(&simulated).request_permission().await;

    // Then: Access is granted and the status reflects it
    assert!(granted);
    assert!(gate(&simulated).status().all_granted());
}

/// WHAT: Camera granted but microphone denied resolves false
/// WHY: Recording requires both; a partial grant must not start capture
#[tokio::test]
async fn given_audio_denied_after_video_granted_when_requesting_then_false() {
    // Given: Video answers first with a grant, audio answers later with a denial
    let simulated = SimulatedPlatform::new(SimulationOptions {
        audio_grant: false,
        video_prompt_delay: Duration::from_millis(1),
        audio_prompt_delay: Duration::from_millis(30),
        ..SimulationOptions::default()
    });

    // When: Requesting permission
    let granted = gate(&simulated).request_permission().await;

    // Then: The join resolves false
    assert!(!granted);
}

/// WHAT: Microphone denial arriving first still resolves false after both answers
/// WHY: Arrival order must not change the conjunctive outcome
#[tokio::test]
async fn given_audio_denied_before_video_granted_when_requesting_then_false_and_both_answered() {
    // Given: Audio denies quickly, video grants slowly
    let simulated = SimulatedPlatform::new(SimulationOptions {
        audio_grant: false,
        video_prompt_delay: Duration::from_millis(30),
        audio_prompt_delay: Duration::from_millis(1),
        ..SimulationOptions::default()
    });

    // When: Requesting permission
    let granted = gate(&simulated).request_permission().await;

    // Then: False, and the slower camera prompt was awaited rather than abandoned
    assert!(!granted);
    let state = gate(&simulated).status();
    assert!(state.camera_granted);
    assert!(!state.microphone_granted);
}

/// WHAT: Status reads grants without prompting
/// WHY: The UI shows onboarding based on status alone
#[test]
fn given_undetermined_grants_when_reading_status_then_not_granted() {
    // Given: A fresh platform where nobody has been asked
    let simulated = SimulatedPlatform::new(SimulationOptions::default());

    // When: Reading status
    let state = gate(&simulated).status();

    // Then: Nothing is granted and nothing was prompted
    assert!(!state.camera_granted);
    assert!(!state.microphone_granted);
    assert_eq!(
        simulated.platform().permissions.authorization_status(MediaKind::Video),
        AuthorizationStatus::NotDetermined
    );
}

/// WHAT: A previous denial is reported without prompting again
/// WHY: The OS never re-prompts after a denial; the gate must not hang waiting
#[tokio::test]
async fn given_previously_denied_camera_when_requesting_then_false() {
    // Given: Camera denied in an earlier session, microphone authorized
    let simulated = SimulatedPlatform::new(SimulationOptions::default());
    simulated.set_authorization(MediaKind::Video, AuthorizationStatus::Denied);
    simulated.set_authorization(MediaKind::Audio, AuthorizationStatus::Authorized);

    // When: Requesting permission
    let granted = gate(&simulated).request_permission().await;

    // Then: Resolves false
    assert!(!granted);
}
