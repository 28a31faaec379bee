use std::path::PathBuf;
use std::sync::Arc;

use capture_core::{CameraStatus, Submission};
use capture_engine::{
    Capabilities, Geolocator, Position, SimulatedTransport, Workflow, WorkflowSettings,
};
use capture_logging::{capture_info, capture_warn};

use super::devices::{
    FlakyTransport, LocationMode, LoggingSink, PathPicker, ScriptedGeolocator, SyntheticCamera,
};
use super::ui;

pub struct RunOptions {
    pub deny_camera: bool,
    pub location: LocationMode,
    pub position: Position,
    pub photo: Option<PathBuf>,
    pub retake: bool,
    pub fail_first: bool,
}

/// Drives one capture-and-submit session from mount to navigation.
pub async fn run_app(options: RunOptions, settings: WorkflowSettings) -> anyhow::Result<()> {
    capture_info!("starting capture session with {:?}", settings);

    let geolocation = ScriptedGeolocator::for_mode(options.location, options.position)
        .map(|device| Arc::new(device) as Arc<dyn Geolocator>);
    let caps = Capabilities {
        camera: Arc::new(SyntheticCamera::new(options.deny_camera)),
        geolocation,
        picker: Arc::new(PathPicker::new(options.photo.clone())),
        transport: Arc::new(FlakyTransport::new(
            SimulatedTransport::new(settings.processing_delay),
            options.fail_first,
        )),
        navigator: Arc::new(|| println!("<- back to previous screen")),
        viewfinder: Arc::new(LoggingSink),
    };
    let mut workflow = Workflow::new(caps, settings);

    workflow.mount();
    render_if_dirty(&mut workflow);
    workflow.settle_acquisition().await;
    render_if_dirty(&mut workflow);

    if !choose_image(&mut workflow, &options).await? {
        capture_warn!("no image chosen; leaving the capture screen");
        workflow.back();
        render_if_dirty(&mut workflow);
        return Ok(());
    }

    workflow.send();
    render_if_dirty(&mut workflow);
    while workflow.next_event().await {
        render_if_dirty(&mut workflow);
        if let Some(Submission::Failed { failure, .. }) = workflow.state().submission() {
            capture_warn!("submission failed ({}); retrying", failure);
            workflow.send();
            render_if_dirty(&mut workflow);
        }
    }
    render_if_dirty(&mut workflow);
    Ok(())
}

/// Shutter when the camera is live, file picker otherwise. Returns whether
/// an image ended up captured.
async fn choose_image(workflow: &mut Workflow, options: &RunOptions) -> anyhow::Result<bool> {
    let camera_live = matches!(workflow.state().camera(), CameraStatus::Active { .. });
    if camera_live && options.photo.is_none() {
        workflow.capture();
        render_if_dirty(workflow);
        if options.retake {
            workflow.retake();
            render_if_dirty(workflow);
            workflow.settle_acquisition().await;
            render_if_dirty(workflow);
            workflow.capture();
            render_if_dirty(workflow);
        }
    } else {
        workflow.pick_file().await?;
        render_if_dirty(workflow);
    }
    Ok(workflow.state().captured_image().is_some())
}

fn render_if_dirty(workflow: &mut Workflow) {
    if workflow.consume_dirty() {
        for line in ui::render::render(&workflow.view()) {
            println!("{line}");
        }
        println!();
    }
}
