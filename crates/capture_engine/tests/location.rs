mod common;

use std::time::Duration;

use capture_core::{LocationFailure, LocationFix, APPROXIMATE_QUALIFIER};
use capture_engine::{FallbackLocation, FallbackPolicy, LocationError, WorkflowSettings};
use common::{init_logging, FakeGeolocator, Setup};

async fn settled_location(setup: Setup) -> (LocationFix, Option<String>) {
    let (mut workflow, _harness) = setup.build();
    workflow.mount();
    workflow.settle_acquisition().await;
    let badge = workflow.view().location_badge.map(|badge| badge.text());
    (workflow.state().location().clone(), badge)
}

fn assert_flagged_near_reference(fix: &LocationFix, badge: Option<String>) {
    let LocationFix::Resolved {
        coordinates,
        display_name,
        is_approximate,
    } = fix
    else {
        panic!("expected approximate fix, got {fix:?}");
    };
    assert!(is_approximate);
    assert_eq!(display_name, "Mumbai, Maharashtra");
    assert!(coordinates.latitude() >= 19.0760 && coordinates.latitude() < 19.1761);
    assert!(coordinates.longitude() >= 72.8777 && coordinates.longitude() < 72.9778);
    assert_eq!(
        badge.as_deref(),
        Some(format!("Mumbai, Maharashtra {APPROXIMATE_QUALIFIER}").as_str())
    );
}

#[tokio::test(start_paused = true)]
async fn denied_location_is_flagged_approximate() {
    init_logging();
    let (fix, badge) = settled_location(Setup {
        geolocation: Some(FakeGeolocator::failing(LocationError::Denied)),
        ..Setup::default()
    })
    .await;
    assert_flagged_near_reference(&fix, badge);
}

#[tokio::test(start_paused = true)]
async fn missing_capability_uses_reference_point() {
    init_logging();
    let (fix, badge) = settled_location(Setup {
        geolocation: None,
        ..Setup::default()
    })
    .await;
    assert_flagged_near_reference(&fix, badge);
    let LocationFix::Resolved { coordinates, .. } = fix else {
        unreachable!();
    };
    assert_eq!(coordinates.latitude(), 19.0760);
    assert_eq!(coordinates.longitude(), 72.8777);
}

#[tokio::test(start_paused = true)]
async fn slow_geolocation_times_out_into_fallback() {
    init_logging();
    let (fix, badge) = settled_location(Setup {
        geolocation: Some(
            FakeGeolocator::at(1.0, 2.0).with_delay(Duration::from_secs(60)),
        ),
        ..Setup::default()
    })
    .await;
    assert_flagged_near_reference(&fix, badge);
}

#[tokio::test(start_paused = true)]
async fn non_finite_report_is_treated_as_failure() {
    init_logging();
    let (fix, badge) = settled_location(Setup {
        geolocation: Some(FakeGeolocator::at(f64::NAN, 72.0)),
        ..Setup::default()
    })
    .await;
    assert_flagged_near_reference(&fix, badge);
}

#[tokio::test(start_paused = true)]
async fn withhold_policy_sends_without_location() {
    init_logging();
    let settings = WorkflowSettings {
        fallback: FallbackLocation {
            policy: FallbackPolicy::Withhold,
            ..FallbackLocation::default()
        },
        ..WorkflowSettings::default()
    };
    let (mut workflow, harness) = Setup {
        geolocation: Some(FakeGeolocator::failing(LocationError::NoSignal)),
        settings,
        ..Setup::default()
    }
    .build();
    workflow.mount();
    workflow.settle_acquisition().await;
    assert_eq!(
        workflow.state().location(),
        &LocationFix::Unavailable(LocationFailure::NoSignal)
    );

    workflow.capture();
    workflow.send();
    tokio::task::yield_now().await;

    let requests = harness.transport.requests.lock().unwrap();
    assert_eq!(requests[0].envelope.location, None);
}

#[tokio::test(start_paused = true)]
async fn approximate_flag_is_sent_downstream() {
    init_logging();
    let (mut workflow, harness) = Setup {
        geolocation: Some(FakeGeolocator::failing(LocationError::Denied)),
        ..Setup::default()
    }
    .build();
    workflow.mount();
    workflow.settle_acquisition().await;
    workflow.capture();
    workflow.send();
    tokio::task::yield_now().await;

    let requests = harness.transport.requests.lock().unwrap();
    let location = requests[0].envelope.location.as_ref().expect("location");
    assert!(location.approximate);
}
